//! Conventions that vary between advisory practices.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::TcoError;
use crate::types::Rate;
use crate::TcoResult;

/// Whether purchase financing interest counts as a deductible service cost.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterestTreatment {
    /// Interest joins the uncapped deductible services base
    #[default]
    Deductible,
    /// Interest is paid (with its VAT) but never deducted
    Excluded,
}

/// Price the leasing residual value is estimated from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResidualBasis {
    /// The purchase channel's price: both owned channels credit the same residual
    #[default]
    PurchasePrice,
    /// The leased vehicle's own list price
    LeasingListPrice,
}

/// Policy knobs shared by all channels of a comparison run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComparisonPolicy {
    pub interest_treatment: InterestTreatment,
    /// Multiplier on the leasing residual value (1 = same as purchase)
    pub leasing_residual_factor: Rate,
    pub leasing_residual_basis: ResidualBasis,
}

impl Default for ComparisonPolicy {
    fn default() -> Self {
        ComparisonPolicy {
            interest_treatment: InterestTreatment::Deductible,
            leasing_residual_factor: Decimal::ONE,
            leasing_residual_basis: ResidualBasis::PurchasePrice,
        }
    }
}

impl ComparisonPolicy {
    pub fn interest_deductible(&self) -> bool {
        self.interest_treatment == InterestTreatment::Deductible
    }

    pub fn validate(&self) -> TcoResult<()> {
        if self.leasing_residual_factor < Decimal::ZERO
            || self.leasing_residual_factor > Decimal::ONE
        {
            return Err(TcoError::InvalidInput {
                field: "leasing_residual_factor".into(),
                reason: format!(
                    "Leasing residual factor must be between 0 and 1, got {}",
                    self.leasing_residual_factor
                ),
            });
        }
        Ok(())
    }
}
