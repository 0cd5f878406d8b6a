//! Defines the `Leg` type, one direction of a measured (or synthetic)
//! displacement between two stations.
//!
//! A physical leg is stored as a matched pair: one record in a slot of each
//! endpoint, each naming the slot of the other. Exactly one of the two carries
//! the measurement (`data_here`); the other derives it by negating the
//! displacement. Covariance is direction-independent and copied as-is.

use crate::algebra::{Delta, SVar};
use crate::store::StationId;
use serde::{Deserialize, Serialize};

/// Opaque flags inherited from the survey context active when a leg was made
/// (instrument style, surface/underground and the like). Passed through untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LegFlags(pub u32);

/// A displacement with its uncertainty, as read from the survey data.
///
/// The argument order of [`Observation::from_components`] matches what the
/// reading layer produces.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Observation {
    pub delta: Delta,
    pub var: SVar,
}

impl Observation {
    pub fn new(delta: Delta, var: SVar) -> Self {
        Self { delta, var }
    }

    #[allow(clippy::too_many_arguments)]
    pub fn from_components(
        dx: f64, dy: f64, dz: f64,
        vx: f64, vy: f64, vz: f64,
        cyz: f64, czx: f64, cxy: f64,
    ) -> Self {
        Self {
            delta: Delta::new(dx, dy, dz),
            var: SVar::from_observation(vx, vy, vz, cyz, czx, cxy),
        }
    }

    /// Zero displacement and zero covariance: the shape of every equate and
    /// split leg.
    pub fn zero() -> Self {
        Self { delta: Delta::zeros(), var: SVar::ZERO }
    }
}

/// The measurement held by the `data_here` direction of a leg. Also the result
/// of copying a leg out of the graph.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LegData {
    pub delta: Delta,
    pub var: SVar,
    pub flags: LegFlags,
}

/// One direction of a leg, living in a station's slot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Leg {
    pub to: StationId,
    /// Slot index of the partner record at `to`.
    pub reverse: u8,
    /// Synthetic (equate or split) leg; never counted as survey data.
    pub fake: bool,
    pub(crate) data: Option<LegData>,
}

impl Leg {
    pub(crate) fn forward(to: StationId, reverse: usize, fake: bool, data: LegData) -> Self {
        Self { to, reverse: reverse as u8, fake, data: Some(data) }
    }

    pub(crate) fn backward(to: StationId, reverse: usize, fake: bool) -> Self {
        Self { to, reverse: reverse as u8, fake, data: None }
    }

    #[inline(always)]
    pub fn data_here(&self) -> bool {
        self.data.is_some()
    }

    pub fn data(&self) -> Option<&LegData> {
        self.data.as_ref()
    }
}

/// Addresses one direction of a leg: a station and one of its three slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LegRef {
    pub station: StationId,
    pub slot: u8,
}

impl LegRef {
    pub fn new(station: StationId, slot: usize) -> Self {
        debug_assert!(slot < 3);
        Self { station, slot: slot as u8 }
    }

    #[inline(always)]
    pub fn slot(&self) -> usize {
        self.slot as usize
    }
}

impl LegData {
    /// Adds `other` into this leg. `reversed` says `other` was read from the
    /// opposite direction, so its displacement is subtracted. Covariance is a
    /// magnitude and always adds.
    pub fn accumulate(&mut self, other: &LegData, reversed: bool) {
        if reversed {
            self.delta -= other.delta;
        } else {
            self.delta += other.delta;
        }
        self.var = self.var + other.var;
    }
}
