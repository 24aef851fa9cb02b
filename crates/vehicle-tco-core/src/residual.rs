//! Residual value of the vehicle at contract end.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::TcoError;
use crate::types::{ensure_amount, Money, Rate};
use crate::TcoResult;

/// Contract durations offered for every channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum ContractDuration {
    Months24,
    Months36,
    Months48,
    Months60,
}

impl ContractDuration {
    pub const ALL: [ContractDuration; 4] = [
        ContractDuration::Months24,
        ContractDuration::Months36,
        ContractDuration::Months48,
        ContractDuration::Months60,
    ];

    pub fn months(&self) -> u32 {
        match self {
            ContractDuration::Months24 => 24,
            ContractDuration::Months36 => 36,
            ContractDuration::Months48 => 48,
            ContractDuration::Months60 => 60,
        }
    }

    /// Duration in years, used to scale annual running costs.
    pub fn years(&self) -> Decimal {
        Decimal::from(self.months()) / dec!(12)
    }

    /// Share of the list price the vehicle retains at contract end.
    pub fn retained_value_factor(&self) -> Rate {
        match self {
            ContractDuration::Months24 => dec!(0.65),
            ContractDuration::Months36 => dec!(0.55),
            ContractDuration::Months48 => dec!(0.45),
            ContractDuration::Months60 => dec!(0.35),
        }
    }
}

impl TryFrom<u32> for ContractDuration {
    type Error = TcoError;

    fn try_from(months: u32) -> Result<Self, Self::Error> {
        ContractDuration::ALL
            .into_iter()
            .find(|d| d.months() == months)
            .ok_or(TcoError::UnsupportedDuration { months })
    }
}

impl From<ContractDuration> for u32 {
    fn from(d: ContractDuration) -> u32 {
        d.months()
    }
}

/// Retained-value factor for a duration in months.
pub fn depreciation_factor(duration_months: u32) -> TcoResult<Rate> {
    Ok(ContractDuration::try_from(duration_months)?.retained_value_factor())
}

/// Estimated resale value of a vehicle after `duration_months`.
pub fn estimate_residual(vehicle_price: Money, duration_months: u32) -> TcoResult<Money> {
    ensure_amount("vehicle_price", vehicle_price)?;
    Ok(vehicle_price * depreciation_factor(duration_months)?)
}
