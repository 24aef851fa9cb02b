use clap::Args;
use rust_decimal::Decimal;
use serde_json::{json, Value};

use vehicle_tco_core::loan::LoanTerms;

/// Arguments for loan amortization
#[derive(Args)]
pub struct LoanArgs {
    /// Vehicle price, VAT excluded
    #[arg(long)]
    pub price: Decimal,

    /// Down payment
    #[arg(long, default_value = "0")]
    pub down_payment: Decimal,

    /// Annual nominal rate (TAN) in percent
    #[arg(long)]
    pub rate: Decimal,

    /// Number of monthly installments
    #[arg(long)]
    pub months: u32,
}

pub fn run_loan(args: LoanArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let terms = LoanTerms::from_down_payment(args.price, args.down_payment, args.rate, args.months)?;
    let amortization = terms.amortize()?;
    Ok(json!({
        "result": {
            "principal": terms.principal.max(Decimal::ZERO),
            "monthly_installment": amortization.monthly_installment,
            "total_interest": amortization.total_interest,
            "total_repaid": amortization.monthly_installment * Decimal::from(args.months),
        }
    }))
}
