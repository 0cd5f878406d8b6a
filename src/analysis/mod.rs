//! Whole-network analysis over the built graph.
pub mod connectivity;

pub use connectivity::{components, is_connected, unanchored, Component};
