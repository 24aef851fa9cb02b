//! Net cost of each acquisition channel.
//!
//! Every assembler turns raw cash-flow inputs into a [`ChannelResult`]:
//! gross outlay (VAT included), minus recovered VAT, minus tax savings,
//! minus the residual value credited for owned assets.

pub mod leasing;
pub mod purchase;
pub mod rental;

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::TcoError;
use crate::fiscal::benefit::BenefitResult;
use crate::types::Money;
use crate::TcoResult;

pub use leasing::{assemble_leasing, BuyOut, LeasingInput};
pub use purchase::{assemble_purchase, PaymentMethod, PurchaseInput};
pub use rental::{assemble_rental, RentalInput};

/// Acquisition channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Channel {
    Purchase,
    Leasing,
    Rental,
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Channel::Purchase => "Purchase",
            Channel::Leasing => "Leasing",
            Channel::Rental => "Rental",
        };
        f.write_str(s)
    }
}

/// Cost breakdown of one channel over the whole contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelResult {
    pub channel: Channel,
    /// Vehicle price or contract installments, VAT excluded
    pub vehicle_outlay: Money,
    /// Running and service costs outside the contract, VAT excluded
    pub services_outlay: Money,
    /// Interest paid on purchase financing
    pub financing_interest: Money,
    /// Loan installment, or the contract's monthly installment
    pub monthly_installment: Money,
    /// Total VAT paid
    pub vat_paid: Money,
    /// Everything paid out, VAT included
    pub gross_outlay: Money,
    pub vat_recovered: Money,
    pub tax_saved: Money,
    /// Residual value credited at contract end (0 for rental)
    pub residual_value: Money,
    /// gross_outlay - vat_recovered - tax_saved - residual_value
    pub net_cost: Money,
    pub net_cost_per_month: Money,
    /// Whether the amortizable cap bound the vehicle deduction
    pub cap_applied: bool,
}

/// Cash-flow figures an assembler hands over for the net-cost roll-up.
pub(crate) struct ChannelAssembly {
    pub channel: Channel,
    pub vehicle_outlay: Money,
    pub services_outlay: Money,
    pub financing_interest: Money,
    pub monthly_installment: Money,
    pub benefits: BenefitResult,
    pub residual_value: Money,
}

impl ChannelAssembly {
    pub fn finish(self, duration_months: u32) -> TcoResult<ChannelResult> {
        let gross_outlay = self.vehicle_outlay
            + self.services_outlay
            + self.financing_interest
            + self.benefits.total_vat_paid;
        let net_cost = gross_outlay
            - self.benefits.vat_recovered
            - self.benefits.tax_saved
            - self.residual_value;
        let net_cost_per_month = per_month(net_cost, duration_months)?;

        tracing::debug!(
            channel = %self.channel,
            %gross_outlay,
            %net_cost,
            %net_cost_per_month,
            "channel assembled"
        );

        Ok(ChannelResult {
            channel: self.channel,
            vehicle_outlay: self.vehicle_outlay,
            services_outlay: self.services_outlay,
            financing_interest: self.financing_interest,
            monthly_installment: self.monthly_installment,
            vat_paid: self.benefits.total_vat_paid,
            gross_outlay,
            vat_recovered: self.benefits.vat_recovered,
            tax_saved: self.benefits.tax_saved,
            residual_value: self.residual_value,
            net_cost,
            net_cost_per_month,
            cap_applied: self.benefits.cap_applied,
        })
    }
}

fn per_month(amount: Money, duration_months: u32) -> TcoResult<Money> {
    if duration_months == 0 {
        return Err(TcoError::DivisionByZero {
            context: "net cost per month".into(),
        });
    }
    Ok(amount / Decimal::from(duration_months))
}
