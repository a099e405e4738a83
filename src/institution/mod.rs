//! Institution price expectations
//!
//! Category pools, price statistics, and the JSON encoding used for the
//! `institution_prices` column.

mod pool;
mod stats;

pub use pool::{Category, CategoryPool, PoolError};
pub use stats::{aggregate, InstitutionStats};

use indexmap::IndexMap;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;
use std::str::FromStr;
use thiserror::Error;

/// Institution name to expected price, in pool display order
pub type InstitutionPrices = IndexMap<String, Decimal>;

/// Errors decoding a stored price mapping
#[derive(Debug, Error)]
pub enum PriceCodecError {
    #[error("invalid price mapping: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid price for {institution}: {value}")]
    InvalidPrice { institution: String, value: String },
}

/// Encode prices as a JSON object of numbers, non-ASCII names kept verbatim
pub fn encode_prices(prices: &InstitutionPrices) -> Result<String, PriceCodecError> {
    let mut object: IndexMap<&str, serde_json::Value> = IndexMap::with_capacity(prices.len());
    for (name, price) in prices {
        let number = price
            .to_f64()
            .and_then(serde_json::Number::from_f64)
            .ok_or_else(|| PriceCodecError::InvalidPrice {
                institution: name.clone(),
                value: price.to_string(),
            })?;
        object.insert(name, serde_json::Value::Number(number));
    }
    Ok(serde_json::to_string(&object)?)
}

/// Decode a stored price mapping
///
/// Accepts numbers and numeric strings. A NULL or blank column decodes to an
/// empty mapping.
pub fn decode_prices(raw: Option<&str>) -> Result<InstitutionPrices, PriceCodecError> {
    let raw = match raw.map(str::trim) {
        None | Some("") => return Ok(InstitutionPrices::new()),
        Some(raw) => raw,
    };

    let object: IndexMap<String, serde_json::Value> = serde_json::from_str(raw)?;
    let mut prices = InstitutionPrices::with_capacity(object.len());
    for (name, value) in object {
        let price = match &value {
            serde_json::Value::Number(n) => n.as_f64().and_then(Decimal::from_f64),
            serde_json::Value::String(s) => Decimal::from_str(s).ok(),
            _ => None,
        };
        match price {
            Some(price) => {
                prices.insert(name, price);
            }
            None => {
                return Err(PriceCodecError::InvalidPrice {
                    institution: name,
                    value: value.to_string(),
                })
            }
        }
    }
    Ok(prices)
}
