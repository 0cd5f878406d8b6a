//! equate.rs
//! Making two names one point: position merging and the zero leg that ties
//! the stations together.

use super::edge::{LegRef, Observation};
use super::network::Network;
use crate::diagnostics::{InputError, InputWarning, Reporter};
use crate::store::{PosId, PrefixId, StationId};
use smallvec::{smallvec, SmallVec};
use std::collections::HashSet;

impl<R: Reporter> Network<R> {
    /// Declares `a` and `b` to be the same physical point.
    ///
    /// Afterwards both names share one position and their stations are joined
    /// by a fake leg with zero displacement and covariance. If only one side
    /// is fixed its position survives; otherwise `a`'s does. Two fixed names
    /// may only be equated when their coordinates agree exactly.
    pub fn equate(&mut self, a: PrefixId, b: PrefixId) -> Result<(), InputError> {
        if a == b {
            let station = self.format_name(a);
            self.warn(InputWarning::SelfEquate { station });
            return Ok(());
        }
        if let (Some(pa), Some(pb)) = (self.pos_id(a), self.pos_id(b)) {
            if pa == pb {
                tracing::trace!(first = %self.format_name(a), second = %self.format_name(b), "already equated");
                return Ok(());
            }
        }

        let sa = self.station_for(a);
        let sb = self.station_for(b);
        let (Some(pa), Some(pb)) = (self.pos_id(a), self.pos_id(b)) else {
            bug!("station created without a position while equating");
        };
        let (Some(&pos_a), Some(&pos_b)) = (self.positions.get(pa), self.positions.get(pb)) else {
            bug!("equated names refer to released positions {:?}, {:?}", pa, pb);
        };

        let keep_a = match (pos_a.fixed, pos_b.fixed) {
            (true, true) => {
                let (first, second) = (self.format_name(a), self.format_name(b));
                if pos_a.coords != pos_b.coords {
                    return Err(self.fail(InputError::UnequalFixedStations { first, second }));
                }
                self.warn(InputWarning::EqualFixedPoints { first, second });
                true
            }
            (false, true) => false,
            _ => true,
        };

        let (keep, gone, start) = if keep_a { (pa, pb, sb) } else { (pb, pa, sa) };
        self.replace_position(start, gone, keep);

        self.counts.equates += 1;
        self.install_leg(sa, sb, &Observation::zero(), true);
        tracing::debug!(first = %self.format_name(a), second = %self.format_name(b), "equated");
        Ok(())
    }

    /// Gives `new` to the station `start` and to every station reachable
    /// from it across zero-covariance legs. Positions left without a holder
    /// are released.
    fn replace_position(&mut self, start: StationId, old: PosId, new: PosId) {
        let mut stack: SmallVec<[StationId; 16]> = smallvec![start];
        let mut visited: HashSet<StationId> = HashSet::new();
        let mut superseded: HashSet<PosId> = HashSet::from([old]);

        while let Some(stn) = stack.pop() {
            if !visited.insert(stn) {
                continue;
            }
            let prefix = self.prefixes.get_mut(self.stations[stn.index()].name);
            if let Some(prev) = prefix.pos.replace(new) {
                if prev != new {
                    superseded.insert(prev);
                }
            }

            for (slot, leg) in self.stations[stn.index()].legs() {
                if !visited.contains(&leg.to) && self.leg_var(LegRef::new(stn, slot)).is_zero() {
                    stack.push(leg.to);
                }
            }
        }

        for pos in superseded {
            if self.prefixes.holders_of(pos).next().is_none() {
                self.positions.release(pos);
            }
        }
    }
}
