pub mod benefit;
pub mod profile;

pub use benefit::{compute_benefits, BenefitResult, CostComponents, VAT_RATE};
pub use profile::{resolve, AmortizableCap, ClientCategory, FiscalProfile, UsageSubtype};
