pub mod compare;
pub mod loan;
pub mod profile;
pub mod residual;
