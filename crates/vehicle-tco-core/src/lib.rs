//! After-tax total cost of ownership for acquiring a vehicle by outright
//! purchase, finance leasing or long-term rental under a configurable
//! fiscal regime.

pub mod channels;
pub mod comparison;
pub mod error;
pub mod fiscal;
pub mod loan;
pub mod policy;
pub mod residual;
pub mod types;

pub use error::TcoError;
pub use types::*;

/// Standard result type for all vehicle-tco operations
pub type TcoResult<T> = Result<T, TcoError>;
