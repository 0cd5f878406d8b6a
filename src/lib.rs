//! Core of a cave-survey network reducer: the station/leg graph that survey
//! observations are loaded into, and the 3x3 covariance algebra the solver
//! runs on.
//!
//! Observations arrive as legs between dotted station names. Every station
//! has at most three legs; busier names are split into chains of stations
//! joined by zero-length fake legs. Equates merge names onto one shared
//! position.
//!
//! User-facing problems go through a [`diagnostics::Reporter`]. Violated
//! internal invariants are bugs: they are logged and the call panics.

/// Logs an internal invariant violation at error level, then panics with the
/// same message.
macro_rules! bug {
    ($($arg:tt)*) => {{
        tracing::error!($($arg)*);
        panic!($($arg)*)
    }};
}

pub mod algebra;
pub mod analysis;
pub mod config;
pub mod diagnostics;
pub mod graph;
pub mod store;
pub mod validation;

pub use algebra::{Delta, SVar, Var, THRESHOLD};
pub use config::{CheckConfig, ConfigError, NetworkConfig};
pub use diagnostics::{Diagnostic, InputError, InputWarning, Reporter, Severity, TracingReporter};
pub use graph::{CreateOrder, LegData, LegFlags, LegRef, Network, Observation};
pub use store::{PrefixId, StationId};
