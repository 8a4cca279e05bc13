//! Purchase pricing calculations

use primitive_types::U256;
use serde::{Deserialize, Serialize};
use vesika_core::{mul_div, unit};

use crate::error::{Result, SaleError};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseQuote {
    pub vsk_amount: U256,
    pub native_amount: U256,
    pub rate: U256,
}

pub struct PriceCalculator;

impl PriceCalculator {
    /// `native * rate / 10^18`; `rate` is VSK per native unit in fixed point
    pub fn calculate_purchase(native_amount: U256, rate: U256) -> Result<PurchaseQuote> {
        let vsk_amount = mul_div(native_amount, rate, unit())
            .ok_or_else(|| SaleError::InvalidInput("purchase too large".to_string()))?;

        Ok(PurchaseQuote {
            vsk_amount,
            native_amount,
            rate,
        })
    }
}
