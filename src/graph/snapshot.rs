//! snapshot.rs
//! A plain, serializable picture of the network for dumps and debugging.

use super::edge::LegData;
use super::network::{Counts, Network};
use crate::diagnostics::Reporter;
use crate::store::{Position, StationId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegSnapshot {
    pub slot: u8,
    pub to: StationId,
    pub reverse: u8,
    pub fake: bool,
    /// Present on the direction that holds the measurement.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub data: Option<LegData>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StationSnapshot {
    pub id: StationId,
    pub name: String,
    pub position: Option<Position>,
    pub legs: Vec<LegSnapshot>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkSnapshot {
    pub counts: Counts,
    /// Live stations in list order.
    pub stations: Vec<StationSnapshot>,
}

impl NetworkSnapshot {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}

impl<R: Reporter> Network<R> {
    pub fn snapshot(&self) -> NetworkSnapshot {
        let stations = self
            .stations()
            .map(|id| {
                let stn = self.station(id);
                let legs = stn
                    .legs()
                    .map(|(slot, leg)| LegSnapshot {
                        slot: slot as u8,
                        to: leg.to,
                        reverse: leg.reverse,
                        fake: leg.fake,
                        data: leg.data().copied(),
                    })
                    .collect();
                StationSnapshot {
                    id,
                    name: self.format_name(stn.name),
                    position: self.position(stn.name).copied(),
                    legs,
                }
            })
            .collect();
        NetworkSnapshot { counts: self.counts(), stations }
    }
}
