//! Monetary amounts as they travel on the wire.
//!
//! The remote platform serializes money as a decimal string plus a currency
//! code. The string form is kept in transit and storage to avoid
//! floating-point precision loss; arithmetic parses into [`Decimal`].

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// An amount/currency pair, amount kept as a decimal string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Money {
    pub amount: String,
    pub currency_code: String,
}

impl Money {
    /// Create a new amount from its wire representation.
    pub fn new(amount: impl Into<String>, currency_code: impl Into<String>) -> Self {
        Self {
            amount: amount.into(),
            currency_code: currency_code.into(),
        }
    }

    /// Parse the amount into a [`Decimal`].
    ///
    /// Returns `None` when the stored string is not a decimal number.
    /// Callers computing aggregates treat unparsable amounts as zero.
    pub fn decimal(&self) -> Option<Decimal> {
        Decimal::from_str(self.amount.trim()).ok()
    }
}
