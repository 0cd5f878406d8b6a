use crate::algebra::Delta;
use serde::{Deserialize, Serialize};

macro_rules! dense_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
        pub struct $name(pub u32);

        impl $name {
            #[inline(always)]
            pub fn index(&self) -> usize { self.0 as usize }
            pub fn new(idx: usize) -> Self { Self(idx as u32) }
        }
    };
}

dense_id!(
    /// Index of a node in the station store.
    StationId
);
dense_id!(
    /// Index of a name in the prefix tree. `PrefixId(0)` is the root.
    PrefixId
);
dense_id!(
    /// Index of a slot in the position arena.
    PosId
);

/// A station coordinate. Every prefix equated to one another shares a single
/// `Position`, so fixing one fixes them all.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub coords: Delta,
    pub fixed: bool,
}

impl Position {
    /// Coordinates still to be found by the solver.
    pub fn unfixed() -> Self {
        Self::default()
    }

    pub fn fixed_at(coords: Delta) -> Self {
        Self { coords, fixed: true }
    }
}
