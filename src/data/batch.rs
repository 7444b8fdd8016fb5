//! CSV batch pricing
//!
//! Input header: `type,spot,strike,rate,volatility,market_price,days[,quantity]`.
//! Each row sets exactly one of `volatility` (pricing mode) or `market_price`
//! (implied-volatility mode). A bad row is reported in the output and does not
//! stop the batch.

use std::io::{Read, Write};

use serde::{Deserialize, Deserializer, Serialize};
use tracing::{info, warn};

use crate::calculator::{evaluate_batch, PricingRequest, VolInput};
use crate::config::{DayCountConfig, EngineConfig};
use crate::core::{BSError, BSResult, OptionType, PortfolioGreeks, PricingResult};

/// One input row
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BatchRow {
    #[serde(rename = "type", deserialize_with = "deserialize_option_type")]
    pub option_type: OptionType,
    pub spot: f64,
    pub strike: f64,
    pub rate: f64,
    pub volatility: Option<f64>,
    pub market_price: Option<f64>,
    /// Calendar days to expiry
    pub days: f64,
    /// Signed position size for portfolio totals
    #[serde(default = "default_quantity")]
    pub quantity: f64,
}

fn default_quantity() -> f64 {
    1.0
}

fn deserialize_option_type<'de, D>(deserializer: D) -> Result<OptionType, D::Error>
where
    D: Deserializer<'de>,
{
    let text = String::deserialize(deserializer)?;
    text.parse().map_err(serde::de::Error::custom)
}

impl BatchRow {
    pub fn to_request(&self, day_count: &DayCountConfig) -> BSResult<PricingRequest> {
        let input = match (self.volatility, self.market_price) {
            (Some(vol), None) => VolInput::Volatility(vol),
            (None, Some(market_price)) => VolInput::MarketPrice(market_price),
            (Some(_), Some(_)) => {
                return Err(BSError::data(
                    "row sets both volatility and market_price, expected exactly one",
                ))
            }
            (None, None) => {
                return Err(BSError::data(
                    "row sets neither volatility nor market_price",
                ))
            }
        };

        Ok(PricingRequest {
            option_type: self.option_type,
            spot: self.spot,
            strike: self.strike,
            rate: self.rate,
            time: day_count.years_from_days(self.days),
            input,
        })
    }
}

/// Row outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RowStatus {
    Ok,
    /// Market price below the no-arbitrage floor
    NoSolution,
    /// Solver hit its iteration cap; figures use the best-effort volatility
    NotConverged,
    Error,
}

/// One flat output row, suitable for CSV
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchOutputRow {
    /// 1-based data row number in the input
    pub row: usize,
    pub status: RowStatus,
    pub volatility: Option<f64>,
    pub implied_vol: Option<f64>,
    pub price: Option<f64>,
    pub delta: Option<f64>,
    pub gamma: Option<f64>,
    pub theta: Option<f64>,
    pub theta_per_day: Option<f64>,
    pub vega: Option<f64>,
    pub rho: Option<f64>,
    pub message: Option<String>,
}

impl BatchOutputRow {
    fn empty(row: usize, status: RowStatus, message: Option<String>) -> Self {
        Self {
            row,
            status,
            volatility: None,
            implied_vol: None,
            price: None,
            delta: None,
            gamma: None,
            theta: None,
            theta_per_day: None,
            vega: None,
            rho: None,
            message,
        }
    }

    fn from_result(row: usize, result: &PricingResult, day_count: &DayCountConfig) -> Self {
        let status = match result.solver {
            Some(solution) if !solution.converged => RowStatus::NotConverged,
            _ => RowStatus::Ok,
        };
        Self {
            row,
            status,
            volatility: Some(result.spec.volatility),
            implied_vol: result.implied_vol,
            price: Some(result.price),
            delta: Some(result.greeks.delta),
            gamma: Some(result.greeks.gamma),
            theta: Some(result.greeks.theta),
            theta_per_day: Some(result.greeks.theta_per_day(day_count.days_per_year)),
            vega: Some(result.greeks.vega),
            rho: Some(result.greeks.rho),
            message: None,
        }
    }
}

/// Output of a batch run
#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub rows: Vec<BatchOutputRow>,
    /// Quantity-weighted totals over the rows that priced
    pub portfolio: PortfolioGreeks,
}

impl BatchReport {
    pub fn count(&self, status: RowStatus) -> usize {
        self.rows.iter().filter(|r| r.status == status).count()
    }
}

/// Parse every input row, keeping per-row parse failures
pub fn read_rows<R: Read>(reader: R) -> Vec<BSResult<BatchRow>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    csv_reader
        .deserialize::<BatchRow>()
        .map(|record| record.map_err(BSError::from))
        .collect()
}

/// Read, price and aggregate a CSV batch
pub fn run_batch<R: Read>(reader: R, config: &EngineConfig) -> BSResult<BatchReport> {
    config.validate()?;
    let day_count = &config.day_count;

    let parsed: Vec<(usize, BSResult<(PricingRequest, f64)>)> = read_rows(reader)
        .into_iter()
        .enumerate()
        .map(|(idx, row)| {
            let request = row.and_then(|r| Ok((r.to_request(day_count)?, r.quantity)));
            (idx + 1, request)
        })
        .collect();

    let requests: Vec<PricingRequest> = parsed
        .iter()
        .filter_map(|(_, req)| req.as_ref().ok().map(|(r, _)| *r))
        .collect();
    let mut evaluated = evaluate_batch(&requests, &config.solver).into_iter();

    let mut rows = Vec::with_capacity(parsed.len());
    let mut portfolio = PortfolioGreeks::new();

    for (row, request) in parsed {
        let (_, quantity) = match request {
            Ok(ok) => ok,
            Err(e) => {
                warn!(row, error = %e, "skipping unreadable row");
                rows.push(BatchOutputRow::empty(row, RowStatus::Error, Some(e.to_string())));
                continue;
            }
        };

        // Valid rows were evaluated in the same order
        let outcome = evaluated
            .next()
            .ok_or_else(|| BSError::numerical("batch evaluation returned too few results"))?;

        match outcome {
            Ok(Some(result)) => {
                portfolio.add_position(result.price, &result.greeks, quantity);
                rows.push(BatchOutputRow::from_result(row, &result, day_count));
            }
            Ok(None) => rows.push(BatchOutputRow::empty(
                row,
                RowStatus::NoSolution,
                Some("market price below no-arbitrage floor".to_string()),
            )),
            Err(e) => {
                warn!(row, error = %e, "row failed to price");
                rows.push(BatchOutputRow::empty(row, RowStatus::Error, Some(e.to_string())));
            }
        }
    }

    let report = BatchReport { rows, portfolio };
    info!(
        rows = report.rows.len(),
        ok = report.count(RowStatus::Ok),
        no_solution = report.count(RowStatus::NoSolution),
        not_converged = report.count(RowStatus::NotConverged),
        errors = report.count(RowStatus::Error),
        "batch complete"
    );
    Ok(report)
}

/// Write output rows as CSV
pub fn write_csv<W: Write>(rows: &[BatchOutputRow], writer: W) -> BSResult<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for row in rows {
        csv_writer.serialize(row)?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Write the whole report as pretty JSON
pub fn write_json<W: Write>(report: &BatchReport, writer: W) -> BSResult<()> {
    serde_json::to_writer_pretty(writer, report)?;
    Ok(())
}
