//! Defines the error types for the validation module.
use crate::store::StationId;

/// The specific category of a structural error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValidationErrorType {
    /// A leg whose partner is missing or does not point back.
    UnmatchedLeg,
    /// An occupied slot above an empty one.
    SlotGap,
    /// A leg pair where both or neither direction holds the measurement.
    DataPlacement,
    /// Partners that disagree about being fake.
    FakeMismatch,
    /// Name, position or list bookkeeping out of step with the stations.
    Bookkeeping,
}

/// A structured report of one broken invariant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// The station where the problem was found.
    pub station: StationId,
    pub error_type: ValidationErrorType,
    pub message: String,
}
