//! Defines the station/leg network and the operations that build it.
pub mod context;
pub mod edge;
mod equate;
pub mod list;
pub mod network;
pub mod node;
pub mod snapshot;

// Re-export key types for convenient access
pub use context::SurveyContext;
pub use edge::{Leg, LegData, LegFlags, LegRef, Observation};
pub use list::{StationCursor, StationList};
pub use network::{Counts, CreateOrder, Network};
pub use node::{Station, LEG_SLOTS};
pub use snapshot::{LegSnapshot, NetworkSnapshot, StationSnapshot};
