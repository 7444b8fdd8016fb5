//! Black-Scholes options calculator CLI
//!
//! # Commands
//!
//! - `bs-options price`  - Price and Greeks for a given volatility
//! - `bs-options iv`     - Implied volatility from a market price, then price and Greeks
//! - `bs-options batch`  - Price a CSV file of options
//! - `bs-options parity` - Put-call parity check

use std::fs::File;
use std::io::{self, BufReader, BufWriter};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{NaiveDate, Utc};
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use bs_options::data::{run_batch, write_csv, write_json, BatchReport};
use bs_options::prelude::*;

#[derive(Parser)]
#[command(name = "bs-options")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true, default_value = "bs-options.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Price an option and its Greeks for a given volatility
    Price {
        #[command(flatten)]
        market: MarketArgs,

        /// Annualized volatility (0.20 = 20%)
        #[arg(long)]
        vol: f64,

        #[command(flatten)]
        expiry: ExpiryArgs,

        #[arg(short, long, value_enum, default_value = "table")]
        format: OutputFormat,
    },

    /// Solve implied volatility from a market price
    Iv {
        #[command(flatten)]
        market: MarketArgs,

        /// Observed option price
        #[arg(short, long)]
        market_price: f64,

        #[command(flatten)]
        expiry: ExpiryArgs,

        #[arg(short, long, value_enum, default_value = "table")]
        format: OutputFormat,
    },

    /// Price every row of a CSV file
    Batch {
        /// Input CSV (type,spot,strike,rate,volatility,market_price,days[,quantity])
        #[arg(short, long)]
        input: PathBuf,

        /// Output file, stdout when omitted
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[arg(short, long, value_enum, default_value = "csv")]
        format: BatchFormat,
    },

    /// Check put-call parity for the given inputs
    Parity {
        #[arg(long)]
        spot: f64,

        #[arg(long)]
        strike: f64,

        #[arg(long, allow_negative_numbers = true)]
        rate: f64,

        #[arg(long)]
        vol: f64,

        #[command(flatten)]
        expiry: ExpiryArgs,
    },
}

#[derive(Args)]
struct MarketArgs {
    /// call or put
    #[arg(short = 't', long = "type")]
    option_type: OptionType,

    /// Spot price
    #[arg(long)]
    spot: f64,

    /// Strike price
    #[arg(long)]
    strike: f64,

    /// Risk-free rate (0.05 = 5%)
    #[arg(long, allow_negative_numbers = true)]
    rate: f64,
}

/// Time to expiry, given exactly one way
#[derive(Args)]
#[group(required = true, multiple = false)]
struct ExpiryArgs {
    /// Calendar days to expiry
    #[arg(long)]
    days: Option<f64>,

    /// Years to expiry
    #[arg(long)]
    time: Option<f64>,

    /// Expiry date (YYYY-MM-DD), measured from today
    #[arg(long)]
    expiry: Option<NaiveDate>,
}

impl ExpiryArgs {
    fn years(&self, day_count: &DayCountConfig) -> f64 {
        match (self.days, self.time, self.expiry) {
            (Some(days), _, _) => day_count.years_from_days(days),
            (_, Some(time), _) => time,
            (_, _, Some(expiry)) => day_count.years_between(Utc::now().date_naive(), expiry),
            // clap enforces one of the three
            (None, None, None) => 0.0,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

#[derive(Clone, Copy, ValueEnum)]
enum BatchFormat {
    Csv,
    Json,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .init();

    let config = EngineConfig::load_or_default(&cli.config)
        .with_context(|| format!("loading config {}", cli.config.display()))?;
    debug!(?config, "configuration loaded");

    match cli.command {
        Commands::Price {
            market,
            vol,
            expiry,
            format,
        } => {
            let time = expiry.years(&config.day_count);
            let request = PricingRequest::with_volatility(
                market.option_type,
                market.spot,
                market.strike,
                market.rate,
                vol,
                time,
            );
            run_single(&request, &config, format)
        }
        Commands::Iv {
            market,
            market_price,
            expiry,
            format,
        } => {
            let time = expiry.years(&config.day_count);
            let request = PricingRequest::with_market_price(
                market.option_type,
                market.spot,
                market.strike,
                market.rate,
                market_price,
                time,
            );
            run_single(&request, &config, format)
        }
        Commands::Batch {
            input,
            output,
            format,
        } => run_batch_file(&input, output.as_deref(), format, &config),
        Commands::Parity {
            spot,
            strike,
            rate,
            vol,
            expiry,
        } => {
            let time = expiry.years(&config.day_count);
            let call = bs_price(OptionType::Call, spot, strike, rate, vol, time)?;
            let put = bs_price(OptionType::Put, spot, strike, rate, vol, time)?;
            let residual = parity_gap(call, put, spot, strike, rate, time)?;

            println!("Put-Call Parity Check:");
            println!("  C - P            = {:.6}", call - put);
            println!("  S - K*e^(-rT)    = {:.6}", spot - strike * (-rate * time).exp());
            println!("  Residual         = {:.2e}", residual);
            Ok(())
        }
    }
}

fn run_single(request: &PricingRequest, config: &EngineConfig, format: OutputFormat) -> Result<()> {
    let Some(result) = evaluate(request, &config.solver)? else {
        println!("No solution: market price is below the no-arbitrage floor");
        return Ok(());
    };

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&result)?),
        OutputFormat::Table => print_table(&result, &config.day_count),
    }
    Ok(())
}

fn print_table(result: &PricingResult, day_count: &DayCountConfig) {
    let spec = &result.spec;
    println!("Black-Scholes {}:", spec.option_type);
    println!("  Spot:     {:.2}", spec.spot);
    println!("  Strike:   {:.2}", spec.strike);
    println!("  Time:     {:.4} years ({:.0} days)", spec.time, spec.time * day_count.days_per_year);
    println!("  Rate:     {:.2}%", spec.rate * 100.0);
    println!("  Vol:      {:.2}%", spec.volatility * 100.0);

    if let Some(solution) = result.solver {
        println!(
            "\nImplied Volatility: {:.4}% ({} iterations{})",
            solution.vol * 100.0,
            solution.iterations,
            if solution.converged { "" } else { ", tolerance not reached" }
        );
    }

    println!("\nPrice:    {:.4}", result.price);
    println!("  Intrinsic:  {:.4}", spec.intrinsic());
    println!("  Time value: {:.4}", result.time_value());

    let g = &result.greeks;
    println!("\nGreeks:");
    println!("  Delta:  {:.4}", g.delta);
    println!("  Gamma:  {:.6}", g.gamma);
    println!(
        "  Theta:  {:.4} /yr ({:.4} /day)",
        g.theta,
        g.theta_per_day(day_count.days_per_year)
    );
    println!("  Vega:   {:.4} per 1% vol", g.vega);
    println!("  Rho:    {:.4} per 1% rate", g.rho);
}

fn run_batch_file(
    input: &Path,
    output: Option<&Path>,
    format: BatchFormat,
    config: &EngineConfig,
) -> Result<()> {
    info!(input = %input.display(), "running batch");
    let file = File::open(input).with_context(|| format!("opening {}", input.display()))?;
    let report = run_batch(BufReader::new(file), config)?;

    match output {
        Some(path) => {
            let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
            write_report(&report, BufWriter::new(file), format)?;
            info!(output = %path.display(), "batch results written");
        }
        None => write_report(&report, io::stdout().lock(), format)?,
    }
    Ok(())
}

fn write_report<W: io::Write>(report: &BatchReport, writer: W, format: BatchFormat) -> Result<()> {
    match format {
        BatchFormat::Csv => write_csv(&report.rows, writer)?,
        BatchFormat::Json => write_json(report, writer)?,
    }
    Ok(())
}
