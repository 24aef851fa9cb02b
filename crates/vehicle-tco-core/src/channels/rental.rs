//! Long-term rental: an all-inclusive monthly fee, no ownership.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::channels::{Channel, ChannelAssembly, ChannelResult};
use crate::fiscal::benefit::compute_benefits;
use crate::fiscal::profile::FiscalProfile;
use crate::residual::ContractDuration;
use crate::types::{ensure_amount, Money};
use crate::TcoResult;

/// Rental channel inputs, VAT excluded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RentalInput {
    pub down_payment: Money,
    /// All-inclusive fee (maintenance, insurance, assistance)
    pub monthly_fee: Money,
}

/// Net cost of renting the vehicle.
///
/// The whole fee is a service cost: the vehicle bucket and its cap never
/// apply, and no residual value is credited.
pub fn assemble_rental(
    input: &RentalInput,
    profile: &FiscalProfile,
    duration: ContractDuration,
) -> TcoResult<ChannelResult> {
    ensure_amount("rental.down_payment", input.down_payment)?;
    ensure_amount("rental.monthly_fee", input.monthly_fee)?;

    let contract_cost = input.down_payment + input.monthly_fee * Decimal::from(duration.months());
    let benefits = compute_benefits(contract_cost, Decimal::ZERO, profile)?;

    ChannelAssembly {
        channel: Channel::Rental,
        vehicle_outlay: contract_cost,
        services_outlay: Decimal::ZERO,
        financing_interest: Decimal::ZERO,
        monthly_installment: input.monthly_fee,
        benefits,
        residual_value: Decimal::ZERO,
    }
    .finish(duration.months())
}
