//! VAT recovery and income-tax savings on a taxable cost.
//!
//! A cost is split into two buckets. The vehicle bucket (purchase price,
//! leasing down payment and buy-out) is subject to the amortizable cap.
//! The services bucket (running costs, rental fees, financing interest)
//! is never capped. In both buckets the VAT that cannot be recovered
//! becomes part of the deductible cost.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::fiscal::profile::FiscalProfile;
use crate::types::{ensure_amount, Money, Rate};
use crate::TcoResult;

/// Ordinary VAT rate applied to every taxable amount.
pub const VAT_RATE: Rate = dec!(0.22);

/// Taxable cost of one acquisition channel, VAT excluded.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CostComponents {
    /// Vehicle principal, subject to the amortizable cap
    pub vehicle_taxable: Money,
    /// Services and running costs, never capped
    pub services_taxable: Money,
    /// Financing interest; taxed as a service, deducted when the policy allows
    pub financing_interest: Money,
}

/// VAT recovered and tax saved on a taxable cost.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BenefitResult {
    /// VAT reclaimed by the client
    pub vat_recovered: Money,
    /// Income tax saved through cost deduction
    pub tax_saved: Money,
    /// VAT paid on vehicle and services
    pub total_vat_paid: Money,
    /// VAT on the vehicle bucket
    pub vat_on_vehicle: Money,
    /// VAT on the services bucket
    pub vat_on_services: Money,
    /// Deductible vehicle base after the cap
    pub deductible_vehicle_base: Money,
    /// Deductible services base
    pub deductible_services_base: Money,
    /// Whether the amortizable cap reduced the vehicle base
    pub cap_applied: bool,
}

/// Compute VAT recovery and tax savings for a services and a vehicle amount.
///
/// vat = (vehicle + services) * 22%
/// vat_recovered = vat * vat_recovery_fraction
/// vehicle_base = min(vehicle + vat_vehicle * (1 - vat_recovery_fraction), cap)
/// services_base = services + vat_services * (1 - vat_recovery_fraction)
/// tax_saved = (vehicle_base + services_base) * cost_deduction_fraction * tax_rate
pub fn compute_benefits(
    services_taxable: Money,
    vehicle_taxable: Money,
    profile: &FiscalProfile,
) -> TcoResult<BenefitResult> {
    split_benefits(services_taxable, services_taxable, vehicle_taxable, profile)
}

/// Benefits for a channel's cost components.
///
/// Financing interest always carries VAT like any other service. It enters
/// the deductible services base only when `interest_deductible` is set, so
/// the policy never changes the VAT paid.
pub fn compute_component_benefits(
    components: &CostComponents,
    profile: &FiscalProfile,
    interest_deductible: bool,
) -> TcoResult<BenefitResult> {
    ensure_amount("services_taxable", components.services_taxable)?;
    ensure_amount("financing_interest", components.financing_interest)?;
    let services = components.services_taxable + components.financing_interest;
    let deductible_services = if interest_deductible {
        services
    } else {
        components.services_taxable
    };
    split_benefits(services, deductible_services, components.vehicle_taxable, profile)
}

/// VAT is charged on all of `services_taxable`; only `deductible_services`
/// (with its share of non-recoverable VAT) enters the deductible base.
fn split_benefits(
    services_taxable: Money,
    deductible_services: Money,
    vehicle_taxable: Money,
    profile: &FiscalProfile,
) -> TcoResult<BenefitResult> {
    ensure_amount("services_taxable", services_taxable)?;
    ensure_amount("vehicle_taxable", vehicle_taxable)?;

    let vat_on_vehicle = vehicle_taxable * VAT_RATE;
    let vat_on_services = services_taxable * VAT_RATE;
    let total_vat_paid = vat_on_vehicle + vat_on_services;

    let vat_recovered = total_vat_paid * profile.vat_recovery_fraction;
    let non_recoverable = Decimal::ONE - profile.vat_recovery_fraction;

    let uncapped_vehicle_base = vehicle_taxable + vat_on_vehicle * non_recoverable;
    let deductible_vehicle_base = profile.amortizable_cap.apply(uncapped_vehicle_base);
    let deductible_services_base =
        deductible_services + deductible_services * VAT_RATE * non_recoverable;

    let tax_saved = (deductible_vehicle_base + deductible_services_base)
        * profile.cost_deduction_fraction
        * profile.tax_rate;

    Ok(BenefitResult {
        vat_recovered,
        tax_saved,
        total_vat_paid,
        vat_on_vehicle,
        vat_on_services,
        deductible_vehicle_base,
        deductible_services_base,
        cap_applied: deductible_vehicle_base < uncapped_vehicle_base,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TcoError;
    use crate::fiscal::profile::{resolve, ClientCategory, UsageSubtype};

    fn sole_trader() -> FiscalProfile {
        resolve(ClientCategory::SoleTrader, UsageSubtype::NonExclusiveBusiness).unwrap()
    }

    #[test]
    fn test_sole_trader_reference_purchase() {
        // Price 35,000 and 6,000 of running costs over four years at 35%
        let result = compute_benefits(dec!(6000), dec!(35000), &sole_trader()).unwrap();

        assert_eq!(result.total_vat_paid, dec!(9020));
        assert_eq!(result.vat_recovered, dec!(3608));
        // 35,000 + 7,700 * 0.6 = 39,620 -> capped at 18,075.99
        assert_eq!(result.deductible_vehicle_base, dec!(18075.99));
        assert!(result.cap_applied);
        // 6,000 + 1,320 * 0.6 = 6,792
        assert_eq!(result.deductible_services_base, dec!(6792));
        let expected_tax = (dec!(18075.99) + dec!(6792)) * dec!(0.20) * dec!(0.35);
        assert_eq!(result.tax_saved, expected_tax);
    }

    #[test]
    fn test_cap_does_not_touch_services() {
        // A services-only cost far above the cap is deducted in full
        let result = compute_benefits(dec!(100000), Decimal::ZERO, &sole_trader()).unwrap();
        assert!(!result.cap_applied);
        assert_eq!(
            result.deductible_services_base,
            dec!(100000) + dec!(22000) * dec!(0.6)
        );
    }

    #[test]
    fn test_cap_saturates() {
        let profile = sole_trader();
        let a = compute_benefits(dec!(1000), dec!(40000), &profile).unwrap();
        let b = compute_benefits(dec!(1000), dec!(90000), &profile).unwrap();
        assert_eq!(a.tax_saved, b.tax_saved);
        assert!(b.vat_recovered > a.vat_recovered);
    }

    #[test]
    fn test_below_cap_is_uncapped() {
        let result = compute_benefits(Decimal::ZERO, dec!(10000), &sole_trader()).unwrap();
        assert!(!result.cap_applied);
        assert_eq!(result.deductible_vehicle_base, dec!(10000) + dec!(2200) * dec!(0.6));
    }

    #[test]
    fn test_private_profile_gets_nothing() {
        let profile = resolve(ClientCategory::PrivateOrFlatRate, UsageSubtype::Standard).unwrap();
        let result = compute_benefits(dec!(5000), dec!(30000), &profile).unwrap();
        assert_eq!(result.vat_recovered, Decimal::ZERO);
        assert_eq!(result.tax_saved, Decimal::ZERO);
        assert_eq!(result.total_vat_paid, dec!(7700));
    }

    #[test]
    fn test_instrumental_full_recovery_no_cap() {
        let profile = resolve(ClientCategory::Corporation, UsageSubtype::Instrumental)
            .unwrap()
            .with_tax_rate_pct(dec!(24))
            .unwrap();
        let result = compute_benefits(dec!(2000), dec!(80000), &profile).unwrap();
        assert_eq!(result.vat_recovered, result.total_vat_paid);
        assert!(!result.cap_applied);
        // Recovered VAT never enters the deductible base
        assert_eq!(result.deductible_vehicle_base, dec!(80000));
        assert_eq!(result.tax_saved, dec!(82000) * dec!(0.24));
    }

    #[test]
    fn test_interest_follows_policy() {
        let profile = sole_trader();
        let components = CostComponents {
            vehicle_taxable: dec!(20000),
            services_taxable: dec!(3000),
            financing_interest: dec!(2000),
        };
        let with = compute_component_benefits(&components, &profile, true).unwrap();
        let without = compute_component_benefits(&components, &profile, false).unwrap();
        assert!(with.tax_saved > without.tax_saved);
        // VAT on interest is paid and recovered the same way under both policies
        assert_eq!(with.vat_on_services, dec!(5000) * VAT_RATE);
        assert_eq!(without.vat_on_services, with.vat_on_services);
        assert_eq!(without.total_vat_paid, with.total_vat_paid);
        assert_eq!(without.vat_recovered, with.vat_recovered);
        // 3,000 + 660 * 0.6 against 5,000 + 1,100 * 0.6
        assert_eq!(without.deductible_services_base, dec!(3396));
        assert_eq!(with.deductible_services_base, dec!(5660));
    }

    #[test]
    fn test_oversized_amount_is_rejected() {
        let result = compute_benefits(Decimal::from_i128_with_scale(2 * 10_i128.pow(27), 0), Decimal::ZERO, &sole_trader());
        match result {
            Err(TcoError::InvalidInput { field, .. }) => assert_eq!(field, "services_taxable"),
            other => panic!("Expected InvalidInput, got {other:?}"),
        }
    }

    #[test]
    fn test_negative_amount_rejected() {
        let result = compute_benefits(dec!(-1), Decimal::ZERO, &sole_trader());
        match result {
            Err(TcoError::InvalidInput { field, .. }) => assert_eq!(field, "services_taxable"),
            other => panic!("Expected InvalidInput, got {other:?}"),
        }
    }
}
