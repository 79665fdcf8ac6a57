use crate::error::{LoyaltyError, Result};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::io::Read;

/// One approved order as submitted to the engine.
#[derive(Debug, Deserialize, PartialEq, Clone)]
pub struct OrderRecord {
    pub account: String,
    pub amount: Decimal,
}

/// Reads approved orders from a CSV source.
///
/// This reader wraps `csv::Reader` and provides an iterator over
/// `Result<OrderRecord>`. It handles whitespace trimming and flexible record
/// lengths automatically.
pub struct OrderReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> OrderReader<R> {
    /// Creates a new `OrderReader` from any `Read` source (e.g., File, Stdin).
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(source);
        Self { reader }
    }

    /// Returns an iterator that lazily reads and deserializes orders, so
    /// large files can be processed in a streaming fashion.
    pub fn orders(self) -> impl Iterator<Item = Result<OrderRecord>> {
        self.reader
            .into_deserialize()
            .map(|result| result.map_err(LoyaltyError::from))
    }
}
