use clap::Args;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::Value;

use vehicle_tco_core::channels::{BuyOut, LeasingInput, PaymentMethod, PurchaseInput, RentalInput};
use vehicle_tco_core::comparison::{self, ComparisonInput};
use vehicle_tco_core::fiscal::{ClientCategory, UsageSubtype};
use vehicle_tco_core::policy::{ComparisonPolicy, InterestTreatment, ResidualBasis};

use crate::input;

/// Arguments for a three-channel comparison.
///
/// Flags default to a 35,000 car over 48 months; `--input` or piped JSON
/// replaces them entirely.
#[derive(Args)]
pub struct CompareArgs {
    /// Path to JSON or YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Client category (private_or_flat_rate, sole_trader, corporation, commercial_agent)
    #[arg(long, default_value = "sole_trader")]
    pub category: ClientCategory,

    /// Vehicle usage (standard, non_exclusive_business, employee_benefit, instrumental)
    #[arg(long)]
    pub usage: Option<UsageSubtype>,

    /// Contract duration in months (24, 36, 48, 60)
    #[arg(long, default_value = "48")]
    pub months: u32,

    /// Average tax rate in percent (defaults to 24 for corporations, 35 otherwise)
    #[arg(long)]
    pub tax_rate: Option<Decimal>,

    /// Purchase price, VAT excluded
    #[arg(long, default_value = "35000")]
    pub price: Decimal,

    /// Insurance and maintenance per year for the purchased car
    #[arg(long, default_value = "1500")]
    pub running_costs: Decimal,

    /// Finance the purchase with this down payment
    #[arg(long)]
    pub loan_down_payment: Option<Decimal>,

    /// Annual nominal loan rate (TAN) in percent
    #[arg(long, default_value = "5.95")]
    pub loan_rate: Decimal,

    /// Loan term in months (defaults to the contract duration)
    #[arg(long)]
    pub loan_months: Option<u32>,

    /// Leasing list price, VAT excluded (defaults to --price)
    #[arg(long)]
    pub lease_price: Option<Decimal>,

    /// Leasing first installment
    #[arg(long, default_value = "6000")]
    pub lease_first: Decimal,

    /// Leasing monthly installment
    #[arg(long, default_value = "400")]
    pub lease_monthly: Decimal,

    /// Leasing buy-out amount
    #[arg(long, default_value = "350", conflicts_with = "lease_buyout_pct")]
    pub lease_buyout: Decimal,

    /// Leasing buy-out as a percentage of the list price
    #[arg(long)]
    pub lease_buyout_pct: Option<Decimal>,

    /// Leasing services outside the installment, per year
    #[arg(long, default_value = "1000")]
    pub lease_services: Decimal,

    /// Rental down payment
    #[arg(long, default_value = "1500")]
    pub rental_down: Decimal,

    /// Rental monthly fee
    #[arg(long, default_value = "277")]
    pub rental_monthly: Decimal,

    /// Do not deduct purchase financing interest
    #[arg(long)]
    pub exclude_interest: bool,

    /// Multiplier on the leasing residual value (e.g. 0.9)
    #[arg(long, default_value = "1")]
    pub lease_residual_factor: Decimal,

    /// Estimate the leasing residual from the lease list price instead of the purchase price
    #[arg(long)]
    pub lease_residual_from_list_price: bool,
}

pub fn run_compare(args: CompareArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let comparison_input: ComparisonInput = if let Some(ref path) = args.input {
        input::file::read_input(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        from_flags(&args)
    };

    let result = comparison::compare_channels(&comparison_input)?;
    Ok(serde_json::to_value(result)?)
}

fn from_flags(args: &CompareArgs) -> ComparisonInput {
    let payment = match args.loan_down_payment {
        Some(down_payment) => PaymentMethod::Financed {
            down_payment,
            annual_rate_pct: args.loan_rate,
            term_months: args.loan_months,
        },
        None => PaymentMethod::Cash,
    };
    let buyout = match args.lease_buyout_pct {
        Some(pct) => BuyOut::PercentOfPrice(pct / dec!(100)),
        None => BuyOut::Amount(args.lease_buyout),
    };

    ComparisonInput {
        category: args.category,
        usage: args.usage,
        duration_months: args.months,
        tax_rate_pct: args.tax_rate,
        purchase: PurchaseInput {
            price: args.price,
            annual_running_costs: args.running_costs,
            payment,
        },
        leasing: LeasingInput {
            list_price: args.lease_price.unwrap_or(args.price),
            first_installment: args.lease_first,
            monthly_installment: args.lease_monthly,
            buyout,
            annual_service_costs: args.lease_services,
        },
        rental: RentalInput {
            down_payment: args.rental_down,
            monthly_fee: args.rental_monthly,
        },
        policy: ComparisonPolicy {
            interest_treatment: if args.exclude_interest {
                InterestTreatment::Excluded
            } else {
                InterestTreatment::Deductible
            },
            leasing_residual_factor: args.lease_residual_factor,
            leasing_residual_basis: if args.lease_residual_from_list_price {
                ResidualBasis::LeasingListPrice
            } else {
                ResidualBasis::PurchasePrice
            },
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct Harness {
        #[command(flatten)]
        args: CompareArgs,
    }

    fn flags(extra: &[&str]) -> ComparisonInput {
        let argv = std::iter::once("tco").chain(extra.iter().copied());
        from_flags(&Harness::try_parse_from(argv).unwrap().args)
    }

    #[test]
    fn test_form_defaults() {
        let input = flags(&[]);
        assert_eq!(input.category, ClientCategory::SoleTrader);
        assert_eq!(input.duration_months, 48);
        assert_eq!(input.purchase.price, dec!(35000));
        assert_eq!(input.purchase.payment, PaymentMethod::Cash);
        assert_eq!(input.leasing.list_price, dec!(35000));
        assert_eq!(input.leasing.buyout, BuyOut::Amount(dec!(350)));
        assert_eq!(input.rental.monthly_fee, dec!(277));
        assert_eq!(input.policy, ComparisonPolicy::default());
    }

    #[test]
    fn test_lease_price_follows_purchase_price() {
        let input = flags(&["--price", "42000"]);
        assert_eq!(input.leasing.list_price, dec!(42000));
        let input = flags(&["--price", "42000", "--lease-price", "39000"]);
        assert_eq!(input.leasing.list_price, dec!(39000));
    }

    #[test]
    fn test_buyout_percentage_becomes_fraction() {
        let input = flags(&["--lease-buyout-pct", "2"]);
        assert_eq!(input.leasing.buyout, BuyOut::PercentOfPrice(dec!(0.02)));
    }

    #[test]
    fn test_financing_and_policy_flags() {
        let input = flags(&[
            "--loan-down-payment",
            "5000",
            "--loan-months",
            "36",
            "--exclude-interest",
            "--lease-residual-from-list-price",
        ]);
        assert_eq!(
            input.purchase.payment,
            PaymentMethod::Financed {
                down_payment: dec!(5000),
                annual_rate_pct: dec!(5.95),
                term_months: Some(36),
            }
        );
        assert_eq!(input.policy.interest_treatment, InterestTreatment::Excluded);
        assert_eq!(input.policy.leasing_residual_basis, ResidualBasis::LeasingListPrice);
    }
}
