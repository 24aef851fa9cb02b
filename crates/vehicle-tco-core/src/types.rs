use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// All monetary values, taxable (VAT excluded) unless stated otherwise.
pub type Money = Decimal;

/// Rates expressed as decimals (0.22 = 22%). Percentages carry a `_pct` suffix.
pub type Rate = Decimal;

/// Largest amount accepted as input. Every product the engine forms from
/// amounts this size stays far inside the 96-bit decimal range.
pub const MAX_AMOUNT: Money = dec!(1000000000000);

/// Standard computation output envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationOutput<T: Serialize> {
    pub result: T,
    pub methodology: String,
    pub assumptions: serde_json::Value,
    pub warnings: Vec<String>,
    pub metadata: ComputationMetadata,
}

/// Metadata for every computation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationMetadata {
    pub version: String,
    pub computation_time_us: u64,
    pub precision: String,
}

/// Helper to wrap computation results with metadata
pub fn with_metadata<T: Serialize>(
    methodology: &str,
    assumptions: &impl Serialize,
    warnings: Vec<String>,
    elapsed_us: u64,
    result: T,
) -> ComputationOutput<T> {
    ComputationOutput {
        result,
        methodology: methodology.to_string(),
        assumptions: serde_json::to_value(assumptions).unwrap_or_default(),
        warnings,
        metadata: ComputationMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            computation_time_us: elapsed_us,
            precision: "rust_decimal_128bit".to_string(),
        },
    }
}

/// Reject negative amounts, and amounts above [`MAX_AMOUNT`], with a
/// field-specific error.
pub(crate) fn ensure_amount(field: &str, value: Decimal) -> crate::TcoResult<()> {
    if value < Decimal::ZERO {
        return Err(crate::TcoError::InvalidInput {
            field: field.into(),
            reason: format!("{field} cannot be negative, got {value}"),
        });
    }
    if value > MAX_AMOUNT {
        return Err(crate::TcoError::InvalidInput {
            field: field.into(),
            reason: format!("{field} exceeds the supported maximum of {MAX_AMOUNT}, got {value}"),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_amount_bounds() {
        assert!(ensure_amount("price", Decimal::ZERO).is_ok());
        assert!(ensure_amount("price", MAX_AMOUNT).is_ok());
        assert!(ensure_amount("price", dec!(-0.01)).is_err());
        match ensure_amount("price", MAX_AMOUNT + Decimal::ONE) {
            Err(crate::TcoError::InvalidInput { field, .. }) => assert_eq!(field, "price"),
            other => panic!("Expected InvalidInput, got {other:?}"),
        }
    }
}
