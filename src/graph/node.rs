//! Defines the `Station`, a graph node with exactly three leg slots.
//!
//! Three is deliberate: the solver relies on bounded per-node work. A name
//! that needs more connections is represented by several stations chained
//! together with zero-length fake legs (see `Network::free_leg_slot`).

use super::edge::Leg;
use crate::store::PrefixId;
use serde::{Deserialize, Serialize};

pub const LEG_SLOTS: usize = 3;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Station {
    pub name: PrefixId,
    /// Occupied slots are packed at the low indices.
    pub legs: [Option<Leg>; LEG_SLOTS],
}

impl Station {
    pub fn new(name: PrefixId) -> Self {
        Self { name, legs: [None; LEG_SLOTS] }
    }

    /// Lowest empty slot, if any.
    pub fn first_free_slot(&self) -> Option<usize> {
        self.legs.iter().position(|leg| leg.is_none())
    }

    pub fn degree(&self) -> usize {
        self.legs.iter().take_while(|leg| leg.is_some()).count()
    }

    /// Occupied slots in order, stopping at the first gap.
    pub fn legs(&self) -> impl Iterator<Item = (usize, &Leg)> + '_ {
        self.legs
            .iter()
            .map_while(Option::as_ref)
            .enumerate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::StationId;

    #[test]
    fn test_slots_fill_lowest_first() {
        let mut stn = Station::new(PrefixId(1));
        assert_eq!(stn.first_free_slot(), Some(0));
        stn.legs[0] = Some(Leg::backward(StationId(7), 0, false));
        assert_eq!(stn.first_free_slot(), Some(1));
        stn.legs[1] = Some(Leg::backward(StationId(8), 0, false));
        stn.legs[2] = Some(Leg::backward(StationId(9), 0, false));
        assert_eq!(stn.first_free_slot(), None);
        assert_eq!(stn.degree(), 3);
        let targets: Vec<_> = stn.legs().map(|(_, leg)| leg.to).collect();
        assert_eq!(targets, vec![StationId(7), StationId(8), StationId(9)]);
    }
}
