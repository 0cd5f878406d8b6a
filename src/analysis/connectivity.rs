//! Connectivity of the live network, via `petgraph`.
//!
//! A component with no fixed position cannot be placed by a solver; callers
//! use [`unanchored`] to find them before attempting one.

use crate::diagnostics::Reporter;
use crate::graph::Network;
use crate::store::StationId;
use petgraph::algo::kosaraju_scc;
use petgraph::graph::{NodeIndex, UnGraph};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Component {
    /// Members in list order.
    pub stations: Vec<StationId>,
    /// At least one member's position is fixed.
    pub anchored: bool,
}

/// Builds an undirected view of the live stations. Each leg pair becomes one
/// edge; legs to stations no longer on the list are left out.
pub fn to_petgraph<R: Reporter>(net: &Network<R>) -> UnGraph<StationId, ()> {
    let mut graph = UnGraph::new_undirected();
    let index: HashMap<StationId, NodeIndex> =
        net.stations().map(|id| (id, graph.add_node(id))).collect();

    for (&id, &node) in &index {
        for (_, leg) in net.station(id).legs() {
            // One edge per pair, added from the data-holding end.
            if !leg.data_here() {
                continue;
            }
            if let Some(&other) = index.get(&leg.to) {
                graph.add_edge(node, other, ());
            }
        }
    }
    graph
}

pub fn components<R: Reporter>(net: &Network<R>) -> Vec<Component> {
    let graph = to_petgraph(net);
    let order: HashMap<StationId, usize> = net.stations().enumerate().map(|(i, id)| (id, i)).collect();

    let mut found: Vec<Component> = kosaraju_scc(&graph)
        .into_iter()
        .map(|nodes| {
            let mut stations: Vec<StationId> = nodes.into_iter().map(|n| graph[n]).collect();
            stations.sort_by_key(|id| order[id]);
            let anchored = stations.iter().any(|&id| net.is_fixed(net.station(id).name));
            Component { stations, anchored }
        })
        .collect();
    found.sort_by_key(|c| order[&c.stations[0]]);
    tracing::debug!(count = found.len(), "found connected components");
    found
}

/// Components with no fixed point anywhere in them.
pub fn unanchored<R: Reporter>(net: &Network<R>) -> Vec<Component> {
    let floating: Vec<Component> = components(net).into_iter().filter(|c| !c.anchored).collect();
    for c in &floating {
        tracing::warn!(
            station = %net.station_name(c.stations[0]),
            size = c.stations.len(),
            "component has no fixed point"
        );
    }
    floating
}

pub fn is_connected<R: Reporter>(net: &Network<R>) -> bool {
    components(net).len() <= 1
}
