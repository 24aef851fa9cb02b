//! Finance leasing: down payment, monthly installments and a final buy-out.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::channels::{Channel, ChannelAssembly, ChannelResult};
use crate::error::TcoError;
use crate::fiscal::benefit::compute_benefits;
use crate::fiscal::profile::FiscalProfile;
use crate::policy::{ComparisonPolicy, ResidualBasis};
use crate::residual::{estimate_residual, ContractDuration};
use crate::types::{ensure_amount, Money, Rate};
use crate::TcoResult;

/// Final buy-out, as an amount or as a share of the list price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BuyOut {
    Amount(Money),
    /// Fraction of the list price (0.01 = 1%)
    PercentOfPrice(Rate),
}

impl BuyOut {
    pub fn resolve(&self, list_price: Money) -> TcoResult<Money> {
        match self {
            BuyOut::Amount(amount) => {
                ensure_amount("leasing.buyout", *amount)?;
                Ok(*amount)
            }
            BuyOut::PercentOfPrice(fraction) => {
                if *fraction < Decimal::ZERO || *fraction > Decimal::ONE {
                    return Err(TcoError::InvalidInput {
                        field: "leasing.buyout".into(),
                        reason: format!(
                            "Buy-out share of list price must be between 0 and 1, got {fraction}"
                        ),
                    });
                }
                Ok(list_price * fraction)
            }
        }
    }
}

/// Leasing channel inputs, VAT excluded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeasingInput {
    /// List price of the leased vehicle
    pub list_price: Money,
    /// First (down payment) installment
    pub first_installment: Money,
    pub monthly_installment: Money,
    pub buyout: BuyOut,
    /// Services not included in the installment, per year
    pub annual_service_costs: Money,
}

/// Net cost of leasing the vehicle.
///
/// The down payment and the buy-out form the capped vehicle bucket; the
/// monthly installments and services form the uncapped services bucket.
/// The residual is estimated from `purchase_price` unless the policy asks
/// for the leasing list price.
pub fn assemble_leasing(
    input: &LeasingInput,
    purchase_price: Money,
    profile: &FiscalProfile,
    duration: ContractDuration,
    policy: &ComparisonPolicy,
    warnings: &mut Vec<String>,
) -> TcoResult<ChannelResult> {
    ensure_amount("leasing.list_price", input.list_price)?;
    ensure_amount("leasing.first_installment", input.first_installment)?;
    ensure_amount("leasing.monthly_installment", input.monthly_installment)?;
    ensure_amount("leasing.annual_service_costs", input.annual_service_costs)?;

    let buyout = input.buyout.resolve(input.list_price)?;
    let installments_total = input.monthly_installment * Decimal::from(duration.months());
    let service_costs = input.annual_service_costs * duration.years();

    let vehicle_taxable = input.first_installment + buyout;
    let services_taxable = installments_total + service_costs;
    let benefits = compute_benefits(services_taxable, vehicle_taxable, profile)?;

    let residual_basis = match policy.leasing_residual_basis {
        ResidualBasis::PurchasePrice => purchase_price,
        ResidualBasis::LeasingListPrice => input.list_price,
    };
    let market_residual = estimate_residual(residual_basis, duration.months())?;
    if buyout > market_residual {
        warnings.push(format!(
            "Leasing buy-out ({buyout}) exceeds the estimated residual value ({market_residual})"
        ));
    }
    let residual_value = market_residual * policy.leasing_residual_factor;

    ChannelAssembly {
        channel: Channel::Leasing,
        vehicle_outlay: input.first_installment + installments_total + buyout,
        services_outlay: service_costs,
        financing_interest: Decimal::ZERO,
        monthly_installment: input.monthly_installment,
        benefits,
        residual_value,
    }
    .finish(duration.months())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fiscal::profile::{resolve, ClientCategory, UsageSubtype};
    use rust_decimal_macros::dec;

    fn corporation_fleet() -> FiscalProfile {
        resolve(ClientCategory::Corporation, UsageSubtype::NonExclusiveBusiness).unwrap()
    }

    fn standard_lease() -> LeasingInput {
        LeasingInput {
            list_price: dec!(35000),
            first_installment: dec!(6000),
            monthly_installment: dec!(400),
            buyout: BuyOut::Amount(dec!(350)),
            annual_service_costs: dec!(1000),
        }
    }

    #[test]
    fn test_leasing_breakdown() {
        let mut warnings = Vec::new();
        let result = assemble_leasing(
            &standard_lease(),
            dec!(35000),
            &corporation_fleet(),
            ContractDuration::Months48,
            &ComparisonPolicy::default(),
            &mut warnings,
        )
        .unwrap();

        // 6,000 + 400 * 48 + 350
        assert_eq!(result.vehicle_outlay, dec!(25550));
        assert_eq!(result.services_outlay, dec!(4000));
        // (6,350 + 19,200 + 4,000) * 22%
        assert_eq!(result.vat_paid, dec!(29550) * dec!(0.22));
        assert_eq!(result.gross_outlay, dec!(29550) + result.vat_paid);
        assert_eq!(result.residual_value, dec!(15750));
        assert_eq!(result.monthly_installment, dec!(400));
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_installments_escape_the_cap() {
        // Vehicle bucket is only 6,350 + VAT share, well under the cap
        let mut warnings = Vec::new();
        let result = assemble_leasing(
            &standard_lease(),
            dec!(35000),
            &corporation_fleet(),
            ContractDuration::Months48,
            &ComparisonPolicy::default(),
            &mut warnings,
        )
        .unwrap();
        assert!(!result.cap_applied);
        let deductible = dec!(29550) + dec!(29550) * dec!(0.22) * dec!(0.6);
        assert_eq!(result.tax_saved, deductible * dec!(0.20) * dec!(0.24));
    }

    #[test]
    fn test_buyout_percent_of_price() {
        let mut warnings = Vec::new();
        let input = LeasingInput {
            buyout: BuyOut::PercentOfPrice(dec!(0.01)),
            ..standard_lease()
        };
        let result = assemble_leasing(
            &input,
            dec!(35000),
            &corporation_fleet(),
            ContractDuration::Months48,
            &ComparisonPolicy::default(),
            &mut warnings,
        )
        .unwrap();
        assert_eq!(result.vehicle_outlay, dec!(25550));
    }

    #[test]
    fn test_discounted_residual_policy() {
        let mut warnings = Vec::new();
        let policy = ComparisonPolicy {
            leasing_residual_factor: dec!(0.9),
            ..Default::default()
        };
        let result = assemble_leasing(
            &standard_lease(),
            dec!(35000),
            &corporation_fleet(),
            ContractDuration::Months48,
            &policy,
            &mut warnings,
        )
        .unwrap();
        assert_eq!(result.residual_value, dec!(15750) * dec!(0.9));
    }

    #[test]
    fn test_buyout_above_residual_warns() {
        let mut warnings = Vec::new();
        let input = LeasingInput {
            buyout: BuyOut::Amount(dec!(20000)),
            ..standard_lease()
        };
        assemble_leasing(
            &input,
            dec!(35000),
            &corporation_fleet(),
            ContractDuration::Months48,
            &ComparisonPolicy::default(),
            &mut warnings,
        )
        .unwrap();
        assert_eq!(warnings.len(), 1);
    }

    #[test]
    fn test_residual_basis_follows_policy() {
        let cheaper_lease = LeasingInput {
            list_price: dec!(20000),
            ..standard_lease()
        };
        let mut warnings = Vec::new();
        let from_purchase = assemble_leasing(
            &cheaper_lease,
            dec!(35000),
            &corporation_fleet(),
            ContractDuration::Months48,
            &ComparisonPolicy::default(),
            &mut warnings,
        )
        .unwrap();
        assert_eq!(from_purchase.residual_value, dec!(15750));

        let policy = ComparisonPolicy {
            leasing_residual_basis: ResidualBasis::LeasingListPrice,
            ..Default::default()
        };
        let from_list = assemble_leasing(
            &cheaper_lease,
            dec!(35000),
            &corporation_fleet(),
            ContractDuration::Months48,
            &policy,
            &mut warnings,
        )
        .unwrap();
        assert_eq!(from_list.residual_value, dec!(9000));
    }

    #[test]
    fn test_invalid_buyout_share() {
        assert!(BuyOut::PercentOfPrice(dec!(1.5)).resolve(dec!(30000)).is_err());
        assert!(BuyOut::Amount(dec!(-10)).resolve(dec!(30000)).is_err());
    }
}
