//! Displacement and covariance algebra used when legs are combined.
pub mod checks;
pub mod error;
pub mod invert;
pub mod ops;
pub mod types;

// Re-export key types for convenient access
pub use checks::{Checks, Finding};
pub use error::AlgebraError;
pub use invert::{invert_svar, invert_var};
pub use ops::{div_ds, div_dv, div_vv, mul_sd, mul_ss, mul_vd, mul_vs, mul_vv};
pub use types::{Delta, SVar, Var, THRESHOLD};
