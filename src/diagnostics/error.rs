//! Defines the user-facing error and warning types raised while building a
//! network.
//!
//! Each variant carries the numeric message code the reading layer uses to look
//! up translated text, which is more robust than matching on the message.
use thiserror::Error;

/// Bad input. The offending item is skipped and processing continues.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InputError {
    #[error("Survey leg with same station ('{station}') at both ends - typing error?")]
    SameStationLeg { station: String },
    #[error("Tried to equate two non-equal fixed stations: '{first}' and '{second}'")]
    UnequalFixedStations { first: String, second: String },
    #[error("Station '{station}' already fixed or equated to a fixed point")]
    AlreadyFixed { station: String },
}

impl InputError {
    pub fn code(&self) -> u32 {
        match self {
            InputError::SameStationLeg { .. } => 50,
            InputError::UnequalFixedStations { .. } => 52,
            InputError::AlreadyFixed { .. } => 46,
        }
    }
}

/// Suspicious but harmless input. Reported; the graph is left as it would be
/// had the request been accepted.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InputWarning {
    #[error("Station '{station}' equated to itself")]
    SelfEquate { station: String },
    #[error("Equating two equal fixed points: '{first}' and '{second}'")]
    EqualFixedPoints { first: String, second: String },
    #[error("Station '{station}' already fixed at the same coordinates")]
    RefixedSameCoordinates { station: String },
}

impl InputWarning {
    pub fn code(&self) -> u32 {
        match self {
            InputWarning::SelfEquate { .. } => 13,
            InputWarning::EqualFixedPoints { .. } => 53,
            InputWarning::RefixedSameCoordinates { .. } => 55,
        }
    }
}
