//! Batch input and output
//!
//! Reads option rows from CSV and writes priced results as CSV or JSON.

pub mod batch;

pub use batch::*;
