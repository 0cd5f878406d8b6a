//! positions.rs
//! Arena of shared station positions with slot reuse.

use super::types::{PosId, Position};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PositionArena {
    slots: Vec<Option<Position>>,
    free: Vec<PosId>,
}

impl PositionArena {
    pub fn new() -> Self { Self::default() }

    pub fn alloc(&mut self, pos: Position) -> PosId {
        match self.free.pop() {
            Some(id) => {
                self.slots[id.index()] = Some(pos);
                id
            }
            None => {
                let id = PosId::new(self.slots.len());
                self.slots.push(Some(pos));
                id
            }
        }
    }

    #[inline(always)]
    pub fn get(&self, id: PosId) -> Option<&Position> {
        self.slots.get(id.index())?.as_ref()
    }

    pub fn get_mut(&mut self, id: PosId) -> Option<&mut Position> {
        self.slots.get_mut(id.index())?.as_mut()
    }

    /// Frees a slot once nothing refers to it any more. The id may be handed
    /// out again by a later `alloc`.
    pub fn release(&mut self, id: PosId) -> Option<Position> {
        let old = self.slots.get_mut(id.index())?.take();
        if old.is_some() {
            self.free.push(id);
        }
        old
    }

    pub fn is_live(&self, id: PosId) -> bool {
        self.get(id).is_some()
    }

    /// Number of positions currently in use.
    pub fn live_count(&self) -> usize {
        self.slots.len() - self.free.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algebra::Delta;

    #[test]
    fn test_release_recycles_slot() {
        let mut arena = PositionArena::new();
        let a = arena.alloc(Position::unfixed());
        let b = arena.alloc(Position::fixed_at(Delta::new(1.0, 2.0, 3.0)));
        assert_eq!(arena.live_count(), 2);

        assert!(arena.release(a).is_some());
        assert!(!arena.is_live(a));
        assert_eq!(arena.live_count(), 1);

        // Double release is a no-op.
        assert!(arena.release(a).is_none());
        assert_eq!(arena.live_count(), 1);

        let c = arena.alloc(Position::unfixed());
        assert_eq!(c, a);
        assert!(arena.get(b).unwrap().fixed);
    }
}
