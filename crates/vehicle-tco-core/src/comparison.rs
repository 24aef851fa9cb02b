//! Side-by-side after-tax TCO of purchase, leasing and long-term rental.
//!
//! Resolves the fiscal profile once, runs the three channel assemblers
//! against it and lays the results out as the TCO table shown to the
//! client: one row per cost line, one column per channel.

use std::time::Instant;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::channels::{
    assemble_leasing, assemble_purchase, assemble_rental, Channel, ChannelResult, LeasingInput,
    PurchaseInput, RentalInput,
};
use crate::fiscal::profile::{resolve_with_defaults, ClientCategory, FiscalProfile, UsageSubtype};
use crate::policy::ComparisonPolicy;
use crate::residual::ContractDuration;
use crate::types::{with_metadata, ComputationOutput, Money};
use crate::TcoResult;

// ---------------------------------------------------------------------------
// Input types
// ---------------------------------------------------------------------------

/// Everything needed for one comparison run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonInput {
    pub category: ClientCategory,
    /// Usage sub-type; defaults to the category's first allowed usage
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<UsageSubtype>,
    /// Contract duration: 24, 36, 48 or 60 months
    pub duration_months: u32,
    /// Average tax rate in percent (0-50); defaults per category
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tax_rate_pct: Option<Decimal>,
    pub purchase: PurchaseInput,
    pub leasing: LeasingInput,
    pub rental: RentalInput,
    #[serde(default)]
    pub policy: ComparisonPolicy,
}

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

/// One cost line of the TCO table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TcoRow {
    pub line_item: String,
    pub purchase: Money,
    pub leasing: Money,
    pub rental: Money,
}

/// Result of a comparison run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonRun {
    pub duration_months: u32,
    pub fiscal_profile: FiscalProfile,
    pub purchase: ChannelResult,
    pub leasing: ChannelResult,
    pub rental: ChannelResult,
    /// Channel with the lowest net monthly cost
    pub cheapest: Channel,
    pub tco_table: Vec<TcoRow>,
}

impl ComparisonRun {
    pub fn channels(&self) -> [&ChannelResult; 3] {
        [&self.purchase, &self.leasing, &self.rental]
    }

    pub fn channel(&self, channel: Channel) -> &ChannelResult {
        match channel {
            Channel::Purchase => &self.purchase,
            Channel::Leasing => &self.leasing,
            Channel::Rental => &self.rental,
        }
    }
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Compare the after-tax TCO of the three acquisition channels.
pub fn compare_channels(
    input: &ComparisonInput,
) -> TcoResult<ComputationOutput<ComparisonRun>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let duration = ContractDuration::try_from(input.duration_months)?;
    input.policy.validate()?;
    let profile = resolve_with_defaults(input.category, input.usage, input.tax_rate_pct)?;

    tracing::debug!(
        category = %profile.category,
        usage = %profile.usage,
        vat_recovery = %profile.vat_recovery_fraction,
        cost_deduction = %profile.cost_deduction_fraction,
        tax_rate = %profile.tax_rate,
        "fiscal profile resolved"
    );

    if profile.is_without_benefits() {
        warnings.push(format!(
            "Category {} recovers no VAT and deducts no costs; net cost equals gross outlay \
             minus residual value",
            profile.category
        ));
    }

    let purchase = assemble_purchase(
        &input.purchase,
        &profile,
        duration,
        &input.policy,
        &mut warnings,
    )?;
    let leasing = assemble_leasing(
        &input.leasing,
        input.purchase.price,
        &profile,
        duration,
        &input.policy,
        &mut warnings,
    )?;
    let rental = assemble_rental(&input.rental, &profile, duration)?;

    let deducts_costs = profile.cost_deduction_fraction > Decimal::ZERO;
    for result in [&purchase, &leasing, &rental] {
        if deducts_costs && result.cap_applied {
            warnings.push(format!(
                "{}: deductible vehicle cost capped by the amortizable limit",
                result.channel
            ));
        }
    }

    for w in &warnings {
        tracing::warn!("{w}");
    }

    let cheapest = cheapest_channel(&[&purchase, &leasing, &rental]);
    let tco_table = build_tco_table(&purchase, &leasing, &rental);

    let run = ComparisonRun {
        duration_months: duration.months(),
        fiscal_profile: profile,
        purchase,
        leasing,
        rental,
        cheapest,
        tco_table,
    };

    let elapsed = start.elapsed().as_micros() as u64;

    Ok(with_metadata(
        "After-tax TCO: gross outlay less VAT recovery, income-tax savings and residual value",
        input,
        warnings,
        elapsed,
        run,
    ))
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

/// Lowest net monthly cost; ties go to the earlier channel.
fn cheapest_channel(results: &[&ChannelResult]) -> Channel {
    let mut best = results[0];
    for r in &results[1..] {
        if r.net_cost_per_month < best.net_cost_per_month {
            best = r;
        }
    }
    best.channel
}

fn build_tco_table(p: &ChannelResult, l: &ChannelResult, r: &ChannelResult) -> Vec<TcoRow> {
    let row = |label: &str, f: fn(&ChannelResult) -> Money| TcoRow {
        line_item: label.to_string(),
        purchase: f(p),
        leasing: f(l),
        rental: f(r),
    };

    vec![
        row("Vehicle / installments (taxable)", |c| c.vehicle_outlay),
        row("Services / maintenance (taxable)", |c| c.services_outlay),
        row("Financing interest", |c| c.financing_interest),
        row("Total VAT paid", |c| c.vat_paid),
        row("Gross outlay", |c| c.gross_outlay),
        row("VAT recovery (-)", |c| -c.vat_recovered),
        row("Tax savings (-)", |c| -c.tax_saved),
        row("Residual value (-)", |c| -c.residual_value),
        row("Net cost", |c| c.net_cost),
        row("Net monthly cost", |c| c.net_cost_per_month),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channels::{BuyOut, PaymentMethod};
    use crate::error::TcoError;
    use rust_decimal_macros::dec;

    fn form_defaults(category: ClientCategory) -> ComparisonInput {
        ComparisonInput {
            category,
            usage: None,
            duration_months: 48,
            tax_rate_pct: None,
            purchase: PurchaseInput {
                price: dec!(35000),
                annual_running_costs: dec!(1500),
                payment: PaymentMethod::Cash,
            },
            leasing: LeasingInput {
                list_price: dec!(35000),
                first_installment: dec!(6000),
                monthly_installment: dec!(400),
                buyout: BuyOut::Amount(dec!(350)),
                annual_service_costs: dec!(1000),
            },
            rental: RentalInput {
                down_payment: dec!(1500),
                monthly_fee: dec!(277),
            },
            policy: ComparisonPolicy::default(),
        }
    }

    #[test]
    fn test_table_layout() {
        let out = compare_channels(&form_defaults(ClientCategory::SoleTrader)).unwrap();
        let run = &out.result;
        assert_eq!(run.tco_table.len(), 10);
        assert_eq!(run.tco_table[4].line_item, "Gross outlay");
        assert_eq!(run.tco_table[4].purchase, run.purchase.gross_outlay);
        assert_eq!(run.tco_table[5].leasing, -run.leasing.vat_recovered);
        assert_eq!(run.tco_table[7].rental, Decimal::ZERO);
        assert_eq!(run.tco_table[9].rental, run.rental.net_cost_per_month);
    }

    #[test]
    fn test_cheapest_is_minimum() {
        let out = compare_channels(&form_defaults(ClientCategory::Corporation)).unwrap();
        let run = &out.result;
        let min = run
            .channels()
            .iter()
            .map(|c| c.net_cost_per_month)
            .min()
            .unwrap();
        assert_eq!(run.channel(run.cheapest).net_cost_per_month, min);
    }

    #[test]
    fn test_private_client_warning() {
        let out = compare_channels(&form_defaults(ClientCategory::PrivateOrFlatRate)).unwrap();
        assert!(out.warnings.iter().any(|w| w.contains("recovers no VAT")));
        assert!(!out.warnings.iter().any(|w| w.contains("capped")));
        assert_eq!(out.warnings.len(), 1);
        for c in out.result.channels() {
            assert_eq!(c.vat_recovered, Decimal::ZERO);
            assert_eq!(c.tax_saved, Decimal::ZERO);
            assert!(!c.cap_applied);
        }
    }

    #[test]
    fn test_unsupported_duration_aborts_run() {
        let mut input = form_defaults(ClientCategory::SoleTrader);
        input.duration_months = 42;
        assert!(matches!(
            compare_channels(&input),
            Err(TcoError::UnsupportedDuration { months: 42 })
        ));
    }

    #[test]
    fn test_configuration_error_aborts_run() {
        let mut input = form_defaults(ClientCategory::CommercialAgent);
        input.usage = Some(UsageSubtype::Instrumental);
        assert!(matches!(
            compare_channels(&input),
            Err(TcoError::Configuration { .. })
        ));
    }

    #[test]
    fn test_metadata_envelope() {
        let out = compare_channels(&form_defaults(ClientCategory::SoleTrader)).unwrap();
        assert_eq!(out.metadata.precision, "rust_decimal_128bit");
        assert_eq!(out.assumptions["duration_months"], 48);
        assert!(out.methodology.contains("After-tax TCO"));
    }
}
