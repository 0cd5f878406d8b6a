//! Structural self-checks over a built network.
//!
//! Nothing here is needed for correct operation; it exists so tests and
//! debug builds can confirm the leg pairing and bookkeeping hold.
pub mod error;
mod rules;
pub mod validator;

pub use error::{ValidationError, ValidationErrorType};
pub use validator::Validator;
