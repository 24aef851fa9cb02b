//! Outright purchase, paid in cash or financed with an annuity loan.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::channels::{Channel, ChannelAssembly, ChannelResult};
use crate::fiscal::benefit::{compute_component_benefits, CostComponents};
use crate::fiscal::profile::FiscalProfile;
use crate::loan::LoanTerms;
use crate::policy::ComparisonPolicy;
use crate::residual::{estimate_residual, ContractDuration};
use crate::types::{ensure_amount, Money};
use crate::TcoResult;

/// How the purchase price is paid.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    #[default]
    Cash,
    Financed {
        /// Down payment on the loan
        down_payment: Money,
        /// Annual nominal rate (TAN) in percent
        annual_rate_pct: Decimal,
        /// Loan term; defaults to the contract duration
        #[serde(default, skip_serializing_if = "Option::is_none")]
        term_months: Option<u32>,
    },
}

/// Purchase channel inputs, VAT excluded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseInput {
    /// Vehicle price
    pub price: Money,
    /// Insurance and maintenance per year
    pub annual_running_costs: Money,
    #[serde(default)]
    pub payment: PaymentMethod,
}

/// Net cost of buying the vehicle.
pub fn assemble_purchase(
    input: &PurchaseInput,
    profile: &FiscalProfile,
    duration: ContractDuration,
    policy: &ComparisonPolicy,
    warnings: &mut Vec<String>,
) -> TcoResult<ChannelResult> {
    ensure_amount("purchase.price", input.price)?;
    ensure_amount("purchase.annual_running_costs", input.annual_running_costs)?;

    let running_costs = input.annual_running_costs * duration.years();

    let (monthly_installment, financing_interest) = match &input.payment {
        PaymentMethod::Cash => (Decimal::ZERO, Decimal::ZERO),
        PaymentMethod::Financed {
            down_payment,
            annual_rate_pct,
            term_months,
        } => {
            let terms = LoanTerms::from_down_payment(
                input.price,
                *down_payment,
                *annual_rate_pct,
                term_months.unwrap_or(duration.months()),
            )?;
            if terms.is_fully_prepaid() {
                warnings.push(format!(
                    "Financing down payment ({down_payment}) covers the purchase price; \
                     financing skipped"
                ));
            }
            let loan = terms.amortize()?;
            (loan.monthly_installment, loan.total_interest)
        }
    };

    let components = CostComponents {
        vehicle_taxable: input.price,
        services_taxable: running_costs,
        financing_interest,
    };
    let benefits =
        compute_component_benefits(&components, profile, policy.interest_deductible())?;
    let residual_value = estimate_residual(input.price, duration.months())?;

    ChannelAssembly {
        channel: Channel::Purchase,
        vehicle_outlay: input.price,
        services_outlay: running_costs,
        financing_interest,
        monthly_installment,
        benefits,
        residual_value,
    }
    .finish(duration.months())
}
