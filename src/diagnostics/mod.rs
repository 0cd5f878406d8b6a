//! User-facing errors, warnings and the channel they are reported through.
mod error;
mod report;

pub use error::{InputError, InputWarning};
pub use report::{Diagnostic, Reporter, Severity, SourceLocation, TracingReporter};
