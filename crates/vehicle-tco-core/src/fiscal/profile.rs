//! Fiscal regime resolution.
//!
//! A client category and a vehicle-usage sub-type select one row of a fixed
//! coefficient table: how much VAT the client recovers, what fraction of
//! the vehicle cost is deductible from taxable income, and the cap on the
//! deductible vehicle cost. Unknown combinations are configuration errors,
//! never silently defaulted.

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::TcoError;
use crate::types::{Money, Rate};
use crate::TcoResult;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Deductible vehicle cost cap for non-exclusive business use.
pub const ORDINARY_VEHICLE_CAP: Money = dec!(18075.99);
/// Deductible vehicle cost cap for commercial agents.
pub const AGENT_VEHICLE_CAP: Money = dec!(25822.84);

const MAX_TAX_RATE_PCT: Decimal = dec!(50);
const CORPORATE_DEFAULT_TAX_RATE_PCT: Decimal = dec!(24);
const PERSONAL_DEFAULT_TAX_RATE_PCT: Decimal = dec!(35);

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Tax treatment of the client acquiring the vehicle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClientCategory {
    /// Private individual or flat-rate sole proprietor
    PrivateOrFlatRate,
    /// Sole trader or ordinary-regime professional / partnership
    SoleTrader,
    /// Corporation (SRL, SPA)
    Corporation,
    /// Commercial agent
    CommercialAgent,
}

/// How the vehicle is used by the business.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UsageSubtype {
    /// No usage distinction applies to the category
    Standard,
    /// Business car not exclusively instrumental (fleet car)
    NonExclusiveBusiness,
    /// Car assigned to an employee as a benefit in kind
    EmployeeBenefit,
    /// Exclusively instrumental to the business (driving school, rental fleet)
    Instrumental,
}

/// Cap on the deductible vehicle cost basis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AmortizableCap {
    /// No cap: the full vehicle base is deductible
    Unlimited,
    /// The deductible vehicle base never exceeds this amount
    Limit(Money),
}

impl AmortizableCap {
    /// Clamp a deductible vehicle base to the cap.
    pub fn apply(&self, base: Money) -> Money {
        match self {
            AmortizableCap::Unlimited => base,
            AmortizableCap::Limit(cap) => base.min(*cap),
        }
    }
}

// ---------------------------------------------------------------------------
// Coefficient table
// ---------------------------------------------------------------------------

struct ProfileRule {
    category: ClientCategory,
    usage: UsageSubtype,
    vat_recovery_fraction: Rate,
    cost_deduction_fraction: Rate,
    amortizable_cap: AmortizableCap,
}

/// One row per supported (category, usage) pair. The first row of each
/// category is its default usage.
const PROFILE_RULES: &[ProfileRule] = &[
    ProfileRule {
        category: ClientCategory::PrivateOrFlatRate,
        usage: UsageSubtype::Standard,
        vat_recovery_fraction: dec!(0),
        cost_deduction_fraction: dec!(0),
        amortizable_cap: AmortizableCap::Unlimited,
    },
    ProfileRule {
        category: ClientCategory::SoleTrader,
        usage: UsageSubtype::NonExclusiveBusiness,
        vat_recovery_fraction: dec!(0.40),
        cost_deduction_fraction: dec!(0.20),
        amortizable_cap: AmortizableCap::Limit(ORDINARY_VEHICLE_CAP),
    },
    ProfileRule {
        category: ClientCategory::SoleTrader,
        usage: UsageSubtype::Instrumental,
        vat_recovery_fraction: dec!(1),
        cost_deduction_fraction: dec!(1),
        amortizable_cap: AmortizableCap::Unlimited,
    },
    ProfileRule {
        category: ClientCategory::Corporation,
        usage: UsageSubtype::EmployeeBenefit,
        vat_recovery_fraction: dec!(0.40),
        cost_deduction_fraction: dec!(0.70),
        amortizable_cap: AmortizableCap::Unlimited,
    },
    ProfileRule {
        category: ClientCategory::Corporation,
        usage: UsageSubtype::NonExclusiveBusiness,
        vat_recovery_fraction: dec!(0.40),
        cost_deduction_fraction: dec!(0.20),
        amortizable_cap: AmortizableCap::Limit(ORDINARY_VEHICLE_CAP),
    },
    ProfileRule {
        category: ClientCategory::Corporation,
        usage: UsageSubtype::Instrumental,
        vat_recovery_fraction: dec!(1),
        cost_deduction_fraction: dec!(1),
        amortizable_cap: AmortizableCap::Unlimited,
    },
    ProfileRule {
        category: ClientCategory::CommercialAgent,
        usage: UsageSubtype::Standard,
        vat_recovery_fraction: dec!(1),
        cost_deduction_fraction: dec!(0.80),
        amortizable_cap: AmortizableCap::Limit(AGENT_VEHICLE_CAP),
    },
];

impl ClientCategory {
    pub const ALL: [ClientCategory; 4] = [
        ClientCategory::PrivateOrFlatRate,
        ClientCategory::SoleTrader,
        ClientCategory::Corporation,
        ClientCategory::CommercialAgent,
    ];

    /// Usage sub-types that resolve for this category, default first.
    pub fn allowed_usages(&self) -> Vec<UsageSubtype> {
        PROFILE_RULES
            .iter()
            .filter(|r| r.category == *self)
            .map(|r| r.usage)
            .collect()
    }

    /// Usage assumed when the caller does not pick one.
    pub fn default_usage(&self) -> UsageSubtype {
        PROFILE_RULES
            .iter()
            .find(|r| r.category == *self)
            .map(|r| r.usage)
            .unwrap_or(UsageSubtype::Standard)
    }

    /// Suggested average tax rate in percent. A form default, not a computed value.
    pub fn default_tax_rate_pct(&self) -> Decimal {
        match self {
            ClientCategory::Corporation => CORPORATE_DEFAULT_TAX_RATE_PCT,
            _ => PERSONAL_DEFAULT_TAX_RATE_PCT,
        }
    }
}

impl fmt::Display for ClientCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ClientCategory::PrivateOrFlatRate => "private_or_flat_rate",
            ClientCategory::SoleTrader => "sole_trader",
            ClientCategory::Corporation => "corporation",
            ClientCategory::CommercialAgent => "commercial_agent",
        };
        f.write_str(s)
    }
}

impl FromStr for ClientCategory {
    type Err = TcoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        ClientCategory::ALL
            .into_iter()
            .find(|c| c.to_string() == normalized)
            .ok_or_else(|| TcoError::InvalidInput {
                field: "category".into(),
                reason: format!(
                    "Unknown client category '{s}' (expected private_or_flat_rate, \
                     sole_trader, corporation or commercial_agent)"
                ),
            })
    }
}

impl UsageSubtype {
    pub const ALL: [UsageSubtype; 4] = [
        UsageSubtype::Standard,
        UsageSubtype::NonExclusiveBusiness,
        UsageSubtype::EmployeeBenefit,
        UsageSubtype::Instrumental,
    ];
}

impl fmt::Display for UsageSubtype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            UsageSubtype::Standard => "standard",
            UsageSubtype::NonExclusiveBusiness => "non_exclusive_business",
            UsageSubtype::EmployeeBenefit => "employee_benefit",
            UsageSubtype::Instrumental => "instrumental",
        };
        f.write_str(s)
    }
}

impl FromStr for UsageSubtype {
    type Err = TcoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        UsageSubtype::ALL
            .into_iter()
            .find(|u| u.to_string() == normalized)
            .ok_or_else(|| TcoError::InvalidInput {
                field: "usage".into(),
                reason: format!(
                    "Unknown usage '{s}' (expected standard, non_exclusive_business, \
                     employee_benefit or instrumental)"
                ),
            })
    }
}

// ---------------------------------------------------------------------------
// Profile
// ---------------------------------------------------------------------------

/// Fiscal coefficients for one comparison run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FiscalProfile {
    /// Category the profile was resolved from
    pub category: ClientCategory,
    /// Usage sub-type the profile was resolved from
    pub usage: UsageSubtype,
    /// Share of paid VAT the client recovers
    pub vat_recovery_fraction: Rate,
    /// Share of the deductible cost base that reduces taxable income
    pub cost_deduction_fraction: Rate,
    /// Cap on the deductible vehicle cost basis
    pub amortizable_cap: AmortizableCap,
    /// Average income tax rate applied to deductions (fraction)
    pub tax_rate: Rate,
}

impl FiscalProfile {
    /// Replace the tax rate, given as a percentage in [0, 50].
    pub fn with_tax_rate_pct(mut self, tax_rate_pct: Decimal) -> TcoResult<Self> {
        if tax_rate_pct < Decimal::ZERO || tax_rate_pct > MAX_TAX_RATE_PCT {
            return Err(TcoError::InvalidInput {
                field: "tax_rate_pct".into(),
                reason: format!("Tax rate must be between 0% and 50%, got {tax_rate_pct}%"),
            });
        }
        self.tax_rate = tax_rate_pct / dec!(100);
        Ok(self)
    }

    /// True when the profile neither recovers VAT nor deducts anything.
    pub fn is_without_benefits(&self) -> bool {
        self.vat_recovery_fraction.is_zero() && self.cost_deduction_fraction.is_zero()
    }
}

/// Resolve the fiscal profile for a category and usage sub-type.
///
/// The tax rate is set to the category's suggested default; override it
/// with [`FiscalProfile::with_tax_rate_pct`].
pub fn resolve(category: ClientCategory, usage: UsageSubtype) -> TcoResult<FiscalProfile> {
    let rule = PROFILE_RULES
        .iter()
        .find(|r| r.category == category && r.usage == usage)
        .ok_or_else(|| TcoError::Configuration {
            category: category.to_string(),
            usage: usage.to_string(),
        })?;

    Ok(FiscalProfile {
        category,
        usage,
        vat_recovery_fraction: rule.vat_recovery_fraction,
        cost_deduction_fraction: rule.cost_deduction_fraction,
        amortizable_cap: rule.amortizable_cap,
        tax_rate: category.default_tax_rate_pct() / dec!(100),
    })
}

/// Resolve a profile from optional form values, applying category defaults.
pub fn resolve_with_defaults(
    category: ClientCategory,
    usage: Option<UsageSubtype>,
    tax_rate_pct: Option<Decimal>,
) -> TcoResult<FiscalProfile> {
    let usage = usage.unwrap_or_else(|| category.default_usage());
    let tax_rate_pct = tax_rate_pct.unwrap_or_else(|| category.default_tax_rate_pct());
    resolve(category, usage)?.with_tax_rate_pct(tax_rate_pct)
}
