//! Time-unfolded DAG construction.
//!
//! The unfolded DAG makes causal reachability explicit: its nodes are
//! (entity, layer) copies of real nodes valid at one point in time, and
//! its edges encode "occurs within delta time units after". Both the
//! exhaustive extractor and the root sampler traverse this graph.
//!
//! Only the layers actually needed to connect consecutive real edges are
//! materialized, so construction cost is bounded by the number of edges,
//! not by the magnitude of delta.

use crate::edge::{NodeId, Timestamp};
use crate::network::TemporalNetwork;
use crate::{Error, Result};
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;
use std::collections::{HashMap, VecDeque};

/// A copy of a real node valid at one unfolded layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UnfoldedNode {
    /// The real node this copy belongs to.
    pub entity: NodeId,
    /// The timestamp layer.
    pub layer: Timestamp,
}

/// Edge kind in the unfolded DAG.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnfoldedEdge {
    /// A real timestamped edge, tagged with its time.
    Event {
        /// Timestamp of the underlying edge.
        time: Timestamp,
    },
    /// The same entity carried forward from an arrival layer to a later
    /// departure layer (gap within delta). Projection to real-node paths
    /// skips these.
    Wait,
}

/// The time-unfolded DAG of a temporal network at a given delta.
///
/// Each real edge `(u, v, t)` contributes an `Event` edge from the
/// departure copy `(u, t)` to the arrival copy `(v, t)`. An arrival
/// `(v, t0)` is linked forward by a `Wait` edge to a departure `(v, t)`
/// whenever `0 < t - t0 <= delta`, which is exactly the causal chaining
/// condition. Arrival and departure copies are kept distinct so that
/// simultaneous edges (gap 0) never chain into each other.
///
/// Layers strictly increase along `Wait` edges, so the graph is acyclic
/// and every traversal terminates.
#[derive(Debug, Clone)]
pub struct UnfoldedDag {
    graph: DiGraph<UnfoldedNode, UnfoldedEdge>,
    roots: Vec<NodeIndex>,
    delta: Timestamp,
}

impl UnfoldedDag {
    /// Build the unfolded DAG for `network` at maximum time difference
    /// `delta`.
    ///
    /// Processes edges in ascending time order, maintaining per real node
    /// a sliding window of still-live arrival copies (evicted once their
    /// gap exceeds delta). Amortized O(E) window maintenance.
    ///
    /// Fails with [`Error::InvalidDelta`] when `delta` is negative.
    /// `delta = 0` degenerates to isolated event edges: every real edge
    /// is its own length-1 path and nothing chains.
    pub fn from_network(network: &TemporalNetwork, delta: Timestamp) -> Result<Self> {
        if delta < 0 {
            return Err(Error::InvalidDelta(delta));
        }

        let mut graph = DiGraph::new();
        let mut departures: HashMap<(NodeId, Timestamp), NodeIndex> = HashMap::new();
        let mut arrivals: HashMap<(NodeId, Timestamp), NodeIndex> = HashMap::new();
        // Per real node: live arrival copies, ascending by layer.
        let mut live: HashMap<NodeId, VecDeque<(Timestamp, NodeIndex)>> = HashMap::new();

        for &idx in &network.time_order() {
            let edge = network.edges()[idx];
            let t = edge.time;

            // Evict arrivals at the source that fell out of the window.
            if let Some(queue) = live.get_mut(&edge.src) {
                while queue.front().is_some_and(|&(t0, _)| t - t0 > delta) {
                    queue.pop_front();
                }
            }

            // Departure copy (u, t); link live arrivals forward on first
            // creation. Later same-source same-time edges reuse the copy
            // and the links with it.
            let dep = match departures.get(&(edge.src, t)) {
                Some(&dep) => dep,
                None => {
                    let dep = graph.add_node(UnfoldedNode {
                        entity: edge.src,
                        layer: t,
                    });
                    departures.insert((edge.src, t), dep);
                    if let Some(queue) = live.get(&edge.src) {
                        for &(t0, arrival) in queue {
                            if t - t0 > 0 {
                                graph.add_edge(arrival, dep, UnfoldedEdge::Wait);
                            }
                        }
                    }
                    dep
                }
            };

            // Arrival copy (v, t); registered live exactly once.
            let arrival = match arrivals.get(&(edge.dst, t)) {
                Some(&arrival) => arrival,
                None => {
                    let arrival = graph.add_node(UnfoldedNode {
                        entity: edge.dst,
                        layer: t,
                    });
                    arrivals.insert((edge.dst, t), arrival);
                    live.entry(edge.dst).or_default().push_back((t, arrival));
                    arrival
                }
            };

            // Parallel duplicate edges collapse to one event edge.
            if graph.find_edge(dep, arrival).is_none() {
                graph.add_edge(dep, arrival, UnfoldedEdge::Event { time: t });
            }
        }

        // A copy with no incoming edge starts a new maximal causal path.
        // Arrivals always carry an incoming event edge, so roots are
        // exactly the departures nothing chains into.
        let roots = graph
            .node_indices()
            .filter(|&n| {
                graph
                    .neighbors_directed(n, Direction::Incoming)
                    .next()
                    .is_none()
            })
            .collect();

        Ok(Self {
            graph,
            roots,
            delta,
        })
    }

    /// The underlying petgraph graph, for external consumers that want to
    /// enumerate unfolded nodes and edges directly.
    pub fn graph(&self) -> &DiGraph<UnfoldedNode, UnfoldedEdge> {
        &self.graph
    }

    /// Root copies: unfolded nodes with no incoming edge in the window.
    pub fn roots(&self) -> &[NodeIndex] {
        &self.roots
    }

    /// The unfolded node at a graph index.
    pub fn node(&self, index: NodeIndex) -> &UnfoldedNode {
        &self.graph[index]
    }

    /// The delta this DAG was built for.
    pub fn delta(&self) -> Timestamp {
        self.delta
    }

    /// Number of unfolded nodes.
    pub fn num_nodes(&self) -> usize {
        self.graph.node_count()
    }

    /// Number of unfolded edges (event and wait).
    pub fn num_edges(&self) -> usize {
        self.graph.edge_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tutorial_network() -> TemporalNetwork {
        let mut net = TemporalNetwork::new();
        net.add_edge("a", "b", 1).unwrap();
        net.add_edge("b", "a", 3).unwrap();
        net.add_edge("b", "c", 3).unwrap();
        net.add_edge("d", "c", 4).unwrap();
        net.add_edge("c", "d", 5).unwrap();
        net.add_edge("c", "b", 6).unwrap();
        net
    }

    #[test]
    fn test_negative_delta_rejected() {
        let net = tutorial_network();
        assert!(matches!(
            UnfoldedDag::from_network(&net, -1),
            Err(Error::InvalidDelta(-1))
        ));
    }

    #[test]
    fn test_delta_zero_never_chains() {
        let net = tutorial_network();
        let dag = UnfoldedDag::from_network(&net, 0).unwrap();

        // Only isolated event edges: one departure and one arrival per
        // distinct (node, time) occurrence, no wait edges. The departure
        // (b, 3) is shared by the two edges leaving b at t=3, so five
        // departures serve the six edges.
        assert!(dag
            .graph()
            .edge_weights()
            .all(|w| matches!(w, UnfoldedEdge::Event { .. })));
        assert_eq!(dag.roots().len(), 5);
    }

    #[test]
    fn test_delta_one_roots() {
        let net = tutorial_network();
        let dag = UnfoldedDag::from_network(&net, 1).unwrap();

        // Chains: only (d,c,4) -> (c,d,5). Roots are the departures of
        // (a,1), (b,3), (d,4) and (c,6).
        assert_eq!(dag.roots().len(), 4);
        let wait_edges = dag
            .graph()
            .edge_weights()
            .filter(|w| matches!(w, UnfoldedEdge::Wait))
            .count();
        assert_eq!(wait_edges, 1);
    }

    #[test]
    fn test_delta_two_roots() {
        let net = tutorial_network();
        let dag = UnfoldedDag::from_network(&net, 2).unwrap();

        // (a,1) and (d,4) are the only unchained departures.
        let mut root_entities: Vec<&str> = dag
            .roots()
            .iter()
            .map(|&r| net.node_name(dag.node(r).entity).unwrap())
            .collect();
        root_entities.sort_unstable();
        assert_eq!(root_entities, vec!["a", "d"]);
    }

    #[test]
    fn test_simultaneous_edges_do_not_chain() {
        let mut net = TemporalNetwork::new();
        net.add_edge("a", "b", 5).unwrap();
        net.add_edge("b", "c", 5).unwrap();

        let dag = UnfoldedDag::from_network(&net, 3).unwrap();
        // Two disconnected event edges; gap 0 violates 0 < gap <= delta.
        assert!(dag
            .graph()
            .edge_weights()
            .all(|w| matches!(w, UnfoldedEdge::Event { .. })));
        assert_eq!(dag.roots().len(), 2);
    }

    #[test]
    fn test_parallel_duplicate_edges_collapse() {
        let mut net = TemporalNetwork::new();
        net.add_edge("a", "b", 1).unwrap();
        net.add_edge("a", "b", 1).unwrap();

        let dag = UnfoldedDag::from_network(&net, 1).unwrap();
        assert_eq!(dag.num_nodes(), 2);
        assert_eq!(dag.num_edges(), 1);
    }

    #[test]
    fn test_window_eviction_is_strict() {
        let mut net = TemporalNetwork::new();
        net.add_edge("a", "b", 1).unwrap();
        net.add_edge("b", "c", 4).unwrap();

        // Gap 3 > delta 2: no chaining.
        let dag = UnfoldedDag::from_network(&net, 2).unwrap();
        assert_eq!(dag.roots().len(), 2);

        // Gap 3 == delta 3: chains.
        let dag = UnfoldedDag::from_network(&net, 3).unwrap();
        assert_eq!(dag.roots().len(), 1);
    }
}
