//! Constant-installment (French) loan amortization.

use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::TcoError;
use crate::types::{ensure_amount, Money};
use crate::TcoResult;

/// Monthly rates below this are treated as zero.
const NEAR_ZERO_MONTHLY_RATE: Decimal = dec!(0.000000000001);

/// Loan drawn to finance a vehicle purchase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanTerms {
    /// Amount financed (price minus down payment)
    pub principal: Money,
    /// Annual nominal rate (TAN) in percent, e.g. 5.95
    pub annual_rate_pct: Decimal,
    /// Number of monthly installments
    pub term_months: u32,
}

/// Installment and cost of a loan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanAmortization {
    pub monthly_installment: Money,
    pub total_interest: Money,
}

impl LoanAmortization {
    fn none() -> Self {
        LoanAmortization {
            monthly_installment: Decimal::ZERO,
            total_interest: Decimal::ZERO,
        }
    }
}

impl LoanTerms {
    /// Build loan terms from a vehicle price and the down payment.
    pub fn from_down_payment(
        price: Money,
        down_payment: Money,
        annual_rate_pct: Decimal,
        term_months: u32,
    ) -> TcoResult<Self> {
        ensure_amount("price", price)?;
        ensure_amount("down_payment", down_payment)?;
        Ok(LoanTerms {
            principal: price - down_payment,
            annual_rate_pct,
            term_months,
        })
    }

    /// True when the down payment covers the whole price.
    pub fn is_fully_prepaid(&self) -> bool {
        self.principal <= Decimal::ZERO
    }

    pub fn amortize(&self) -> TcoResult<LoanAmortization> {
        amortize(self.principal, self.annual_rate_pct, self.term_months)
    }
}

/// Constant monthly installment and total interest of an annuity loan.
///
/// installment = P * i * (1+i)^n / ((1+i)^n - 1), with i = rate / 100 / 12.
/// A zero rate (or one too small to survive decimal precision) falls back to
/// the linear limit P / n. A non-positive principal means nothing is financed.
pub fn amortize(
    principal: Money,
    annual_rate_pct: Decimal,
    term_months: u32,
) -> TcoResult<LoanAmortization> {
    if term_months == 0 {
        return Err(TcoError::InvalidTerm { term_months });
    }
    if annual_rate_pct < Decimal::ZERO {
        return Err(TcoError::InvalidInput {
            field: "annual_rate_pct".into(),
            reason: format!("Annual rate cannot be negative, got {annual_rate_pct}%"),
        });
    }
    if principal <= Decimal::ZERO {
        return Ok(LoanAmortization::none());
    }
    ensure_amount("principal", principal)?;

    let n = Decimal::from(term_months);
    let monthly_rate = annual_rate_pct / dec!(100) / dec!(12);

    let installment = if monthly_rate < NEAR_ZERO_MONTHLY_RATE {
        principal / n
    } else {
        let growth = (Decimal::ONE + monthly_rate)
            .checked_powu(term_months as u64)
            .ok_or_else(|| overflow(annual_rate_pct, term_months))?;
        let annuity_factor = growth - Decimal::ONE;
        if annuity_factor.is_zero() {
            principal / n
        } else {
            principal
                .checked_mul(monthly_rate)
                .and_then(|v| v.checked_mul(growth))
                .and_then(|v| v.checked_div(annuity_factor))
                .ok_or_else(|| overflow(annual_rate_pct, term_months))?
        }
    };

    let total_repaid = installment
        .checked_mul(n)
        .ok_or_else(|| overflow(annual_rate_pct, term_months))?;
    let total_interest = (total_repaid - principal).max(Decimal::ZERO);

    Ok(LoanAmortization {
        monthly_installment: installment,
        total_interest,
    })
}

fn overflow(annual_rate_pct: Decimal, term_months: u32) -> TcoError {
    TcoError::InvalidInput {
        field: "annual_rate_pct".into(),
        reason: format!("Compounding {annual_rate_pct}% over {term_months} months overflows"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_car_loan() {
        // 30,000 at 5.95% over 48 months: installment ~703.9
        let result = amortize(dec!(30000), dec!(5.95), 48).unwrap();
        assert!(
            (result.monthly_installment - dec!(703.9)).abs() < dec!(0.5),
            "installment was {}",
            result.monthly_installment
        );
        let expected_interest = result.monthly_installment * dec!(48) - dec!(30000);
        assert_eq!(result.total_interest, expected_interest);
        assert!(result.total_interest > dec!(3750) && result.total_interest < dec!(3820));
    }

    #[test]
    fn test_zero_rate_is_linear() {
        let result = amortize(dec!(24000), Decimal::ZERO, 48).unwrap();
        assert_eq!(result.monthly_installment, dec!(500));
        assert_eq!(result.total_interest, Decimal::ZERO);
    }

    #[test]
    fn test_tiny_rate_uses_limit_form() {
        let result = amortize(dec!(12000), dec!(0.0000000001), 36).unwrap();
        assert!((result.monthly_installment - dec!(12000) / dec!(36)).abs() < dec!(0.0001));
        assert!(result.total_interest < dec!(0.01));
    }

    #[test]
    fn test_prepaid_principal_skips_financing() {
        let terms = LoanTerms::from_down_payment(dec!(20000), dec!(25000), dec!(6), 48).unwrap();
        assert!(terms.is_fully_prepaid());
        let result = terms.amortize().unwrap();
        assert_eq!(result.monthly_installment, Decimal::ZERO);
        assert_eq!(result.total_interest, Decimal::ZERO);
    }

    #[test]
    fn test_zero_term_rejected() {
        let result = amortize(dec!(10000), dec!(5), 0);
        assert!(matches!(result, Err(TcoError::InvalidTerm { term_months: 0 })));
    }

    #[test]
    fn test_negative_rate_rejected() {
        let result = amortize(dec!(10000), dec!(-1), 12);
        assert!(matches!(result, Err(TcoError::InvalidInput { .. })));
    }

    #[test]
    fn test_negative_down_payment_rejected() {
        let result = LoanTerms::from_down_payment(dec!(20000), dec!(-1), dec!(5), 12);
        assert!(result.is_err());
    }

    #[test]
    fn test_extreme_rate_is_an_error_not_a_panic() {
        // (1 + i)^2 fits, but principal * i * (1 + i)^2 does not
        let result = amortize(dec!(1000000000000), dec!(1200000000000000), 2);
        assert!(matches!(result, Err(TcoError::InvalidInput { .. })));
        // (1 + i)^24 itself overflows
        let result = amortize(dec!(30000), dec!(1000000000), 24);
        assert!(matches!(result, Err(TcoError::InvalidInput { .. })));
    }

    #[test]
    fn test_higher_rate_costs_more() {
        let low = amortize(dec!(20000), dec!(3), 60).unwrap();
        let high = amortize(dec!(20000), dec!(9), 60).unwrap();
        assert!(high.monthly_installment > low.monthly_installment);
        assert!(high.total_interest > low.total_interest);
    }
}
