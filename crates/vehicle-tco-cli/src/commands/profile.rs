use clap::Args;
use rust_decimal::Decimal;
use serde_json::{json, Value};

use vehicle_tco_core::fiscal::profile::{self, ClientCategory, UsageSubtype};

/// Arguments for fiscal profile resolution
#[derive(Args)]
pub struct ProfileArgs {
    /// Client category (private_or_flat_rate, sole_trader, corporation, commercial_agent)
    #[arg(long)]
    pub category: ClientCategory,

    /// Vehicle usage (defaults to the category's first allowed usage)
    #[arg(long)]
    pub usage: Option<UsageSubtype>,

    /// Average tax rate in percent (defaults per category)
    #[arg(long)]
    pub tax_rate: Option<Decimal>,
}

pub fn run_profile(args: ProfileArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let resolved = profile::resolve_with_defaults(args.category, args.usage, args.tax_rate)?;
    let allowed: Vec<String> = args
        .category
        .allowed_usages()
        .iter()
        .map(|u| u.to_string())
        .collect();

    let mut result = serde_json::to_value(resolved)?;
    if let Value::Object(map) = &mut result {
        map.insert("allowed_usages".into(), json!(allowed));
    }
    Ok(json!({ "result": result }))
}
