use clap::Args;
use rust_decimal::Decimal;
use serde_json::{json, Value};

use vehicle_tco_core::residual;

/// Arguments for residual value estimation
#[derive(Args)]
pub struct ResidualArgs {
    /// Vehicle list price, VAT excluded
    #[arg(long)]
    pub price: Decimal,

    /// Contract duration in months (24, 36, 48, 60)
    #[arg(long)]
    pub months: u32,
}

pub fn run_residual(args: ResidualArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let factor = residual::depreciation_factor(args.months)?;
    let value = residual::estimate_residual(args.price, args.months)?;
    Ok(json!({
        "result": {
            "residual_value": value,
            "retained_value_factor": factor,
        }
    }))
}
