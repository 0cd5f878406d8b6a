//! Name and position storage backing the station graph.
pub mod positions;
pub mod registry;
pub mod types;

pub use positions::PositionArena;
pub use registry::{Prefix, PrefixRegistry};
pub use types::{PosId, Position, PrefixId, StationId};
