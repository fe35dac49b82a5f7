//! Temporal network storage.

use crate::edge::{NodeId, TimeInput, Timestamp, TimestampedEdge};
use crate::{Error, Result};
use chrono::NaiveDateTime;
use smallvec::SmallVec;
use std::collections::HashMap;
use std::fmt;

/// Default timestamp format for string timestamps ("YYYY-MM-DD HH:mm:SS").
pub const DEFAULT_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A temporal network: distinct nodes plus an ordered sequence of
/// timestamped directed edges.
///
/// Nodes are opaque string labels; they are created implicitly the first
/// time an edge references them (never an error). Timestamps are accepted
/// as integers or as formatted date/time strings and normalized to a
/// single integer epoch (seconds) at insertion. The conversion is one-way:
/// the original string is not retained.
///
/// The exposed edge ordering is always ascending by normalized time, ties
/// broken by insertion order. The unfolder relies on this ordering.
///
/// # Example
///
/// ```rust
/// use chronet_core::TemporalNetwork;
///
/// let mut net = TemporalNetwork::new();
/// net.add_edge("a", "b", 1).unwrap();
/// net.add_edge("b", "c", 3).unwrap();
///
/// assert_eq!(net.num_nodes(), 3);
/// assert_eq!(net.num_edges(), 2);
/// assert_eq!(net.time_range(), Some((1, 3)));
/// ```
#[derive(Debug, Clone)]
pub struct TemporalNetwork {
    /// Node id -> label.
    names: Vec<String>,
    /// Label -> node id.
    ids: HashMap<String, NodeId>,
    /// All edges, in insertion order.
    edges: Vec<TimestampedEdge>,
    /// Adjacency list: node -> outgoing edge indices (insertion order).
    adj_out: HashMap<NodeId, SmallVec<[usize; 8]>>,
    /// Format used to parse string timestamps.
    timestamp_format: String,
}

impl Default for TemporalNetwork {
    fn default() -> Self {
        Self::new()
    }
}

impl TemporalNetwork {
    /// Create an empty temporal network.
    pub fn new() -> Self {
        Self {
            names: Vec::new(),
            ids: HashMap::new(),
            edges: Vec::new(),
            adj_out: HashMap::new(),
            timestamp_format: DEFAULT_TIMESTAMP_FORMAT.to_string(),
        }
    }

    /// Create with estimated capacity.
    pub fn with_capacity(nodes: usize, edges: usize) -> Self {
        Self {
            names: Vec::with_capacity(nodes),
            ids: HashMap::with_capacity(nodes),
            edges: Vec::with_capacity(edges),
            adj_out: HashMap::with_capacity(nodes),
            timestamp_format: DEFAULT_TIMESTAMP_FORMAT.to_string(),
        }
    }

    /// Set the format used to parse string timestamps.
    pub fn with_timestamp_format(mut self, format: impl Into<String>) -> Self {
        self.timestamp_format = format.into();
        self
    }

    /// The configured string timestamp format.
    pub fn timestamp_format(&self) -> &str {
        &self.timestamp_format
    }

    /// Resolve a [`TimeInput`] to a normalized integer epoch.
    fn normalize(&self, time: TimeInput) -> Result<Timestamp> {
        match time {
            TimeInput::Epoch(t) => Ok(t),
            TimeInput::Text(s) => NaiveDateTime::parse_from_str(&s, &self.timestamp_format)
                .map(|dt| dt.and_utc().timestamp())
                .map_err(|source| Error::MalformedTimestamp {
                    value: s,
                    format: self.timestamp_format.clone(),
                    source,
                }),
        }
    }

    /// Intern a node label, creating the node if new.
    fn intern(&mut self, label: &str) -> NodeId {
        if let Some(&id) = self.ids.get(label) {
            return id;
        }
        let id = self.names.len() as NodeId;
        self.names.push(label.to_string());
        self.ids.insert(label.to_string(), id);
        self.adj_out.entry(id).or_default();
        id
    }

    /// Add a timestamped edge.
    ///
    /// `time` is an integer epoch or a formatted string (parsed with the
    /// configured timestamp format). Source and target nodes are created
    /// on first reference. A string timestamp that does not parse fails
    /// with [`Error::MalformedTimestamp`] and leaves the network unchanged.
    pub fn add_edge(&mut self, src: &str, dst: &str, time: impl Into<TimeInput>) -> Result<()> {
        // Normalize before touching any state so a parse failure leaves
        // the network unmodified.
        let time = self.normalize(time.into())?;

        let src = self.intern(src);
        let dst = self.intern(dst);

        let idx = self.edges.len();
        self.adj_out.entry(src).or_default().push(idx);
        self.edges.push(TimestampedEdge::new(src, dst, time));
        Ok(())
    }

    /// Number of distinct nodes.
    pub fn num_nodes(&self) -> usize {
        self.names.len()
    }

    /// Number of timestamped edges.
    pub fn num_edges(&self) -> usize {
        self.edges.len()
    }

    /// Look up a node id by label.
    pub fn node_id(&self, label: &str) -> Option<NodeId> {
        self.ids.get(label).copied()
    }

    /// Look up a node label by id.
    pub fn node_name(&self, id: NodeId) -> Option<&str> {
        self.names.get(id as usize).map(String::as_str)
    }

    /// Iterator over all node labels.
    pub fn node_names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    /// All edges in insertion order.
    pub fn edges(&self) -> &[TimestampedEdge] {
        &self.edges
    }

    /// Edge indices sorted ascending by time, ties by insertion order.
    ///
    /// This ordering is what the unfolder consumes.
    pub(crate) fn time_order(&self) -> Vec<usize> {
        let mut order: Vec<usize> = (0..self.edges.len()).collect();
        order.sort_by_key(|&i| self.edges[i].time);
        order
    }

    /// All edges ascending by time, ties by insertion order.
    pub fn edges_ordered(&self) -> Vec<&TimestampedEdge> {
        self.time_order()
            .into_iter()
            .map(|i| &self.edges[i])
            .collect()
    }

    /// Outgoing edges from a node, in time order.
    pub fn edges_from(&self, src: &str) -> Vec<&TimestampedEdge> {
        let Some(id) = self.node_id(src) else {
            return vec![];
        };
        let Some(indices) = self.adj_out.get(&id) else {
            return vec![];
        };
        let mut indices: Vec<usize> = indices.iter().copied().collect();
        indices.sort_by_key(|&i| (self.edges[i].time, i));
        indices.into_iter().map(|i| &self.edges[i]).collect()
    }

    /// Edges between a specific pair of nodes, in time order.
    pub fn edges_between(&self, src: &str, dst: &str) -> Vec<&TimestampedEdge> {
        let Some(dst) = self.node_id(dst) else {
            return vec![];
        };
        self.edges_from(src)
            .into_iter()
            .filter(|e| e.dst == dst)
            .collect()
    }

    /// Observation window `(min_time, max_time)`, if any edges exist.
    pub fn time_range(&self) -> Option<(Timestamp, Timestamp)> {
        let min = self.edges.iter().map(|e| e.time).min()?;
        let max = self.edges.iter().map(|e| e.time).max()?;
        Some((min, max))
    }

    /// Minimum and maximum inter-event gap between consecutive distinct
    /// timestamps. `None` with fewer than two distinct timestamps.
    ///
    /// Diagnostic only; after string normalization all units are seconds,
    /// so this reveals the effective temporal resolution of the data.
    pub fn inter_event_gaps(&self) -> Option<(Timestamp, Timestamp)> {
        let mut times: Vec<Timestamp> = self.edges.iter().map(|e| e.time).collect();
        times.sort_unstable();
        times.dedup();
        if times.len() < 2 {
            return None;
        }
        let gaps = times.windows(2).map(|w| w[1] - w[0]);
        let min = gaps.clone().min()?;
        let max = gaps.max()?;
        Some((min, max))
    }

    /// Check whether every timestamp is an exact multiple of `factor`.
    ///
    /// When true, [`rescale`](Self::rescale) by that factor loses no
    /// temporal information.
    pub fn is_multiple_of(&self, factor: Timestamp) -> bool {
        factor > 0 && self.edges.iter().all(|e| e.time % factor == 0)
    }

    /// Return a new network with every timestamp divided by `factor` and
    /// rounded to the nearest integer. The receiver is not mutated.
    ///
    /// Lossless only when every original timestamp is an exact multiple of
    /// `factor` (see [`is_multiple_of`](Self::is_multiple_of)); otherwise
    /// this is a lossy approximation that may merge or reorder events
    /// relative to sub-`factor` detail.
    pub fn rescale(&self, factor: Timestamp) -> Result<Self> {
        if factor <= 0 {
            return Err(Error::InvalidRescaleFactor(factor));
        }
        let mut rescaled = self.clone();
        for edge in &mut rescaled.edges {
            edge.time = (edge.time as f64 / factor as f64).round() as Timestamp;
        }
        Ok(rescaled)
    }

    /// Summary statistics.
    pub fn stats(&self) -> TemporalNetworkStats {
        TemporalNetworkStats {
            nodes: self.num_nodes(),
            edges: self.num_edges(),
            time_range: self.time_range(),
            inter_event_gaps: self.inter_event_gaps(),
        }
    }
}

/// Summary statistics for a temporal network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct TemporalNetworkStats {
    /// Distinct nodes.
    pub nodes: usize,
    /// Timestamped edges.
    pub edges: usize,
    /// Observation window `(min, max)`.
    pub time_range: Option<(Timestamp, Timestamp)>,
    /// Minimum and maximum inter-event gap.
    pub inter_event_gaps: Option<(Timestamp, Timestamp)>,
}

impl fmt::Display for TemporalNetworkStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Nodes:              {}", self.nodes)?;
        writeln!(f, "Time-stamped edges: {}", self.edges)?;
        match self.time_range {
            Some((min, max)) => writeln!(f, "Observation period: [{min}, {max}]")?,
            None => writeln!(f, "Observation period: (empty)")?,
        }
        match self.inter_event_gaps {
            Some((min, max)) => write!(f, "Inter-event gaps:   min {min}, max {max}"),
            None => write!(f, "Inter-event gaps:   n/a"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_edges_creates_nodes() {
        let mut net = TemporalNetwork::new();
        net.add_edge("a", "b", 1).unwrap();
        net.add_edge("b", "a", 3).unwrap();

        assert_eq!(net.num_nodes(), 2);
        assert_eq!(net.num_edges(), 2);
        assert!(net.node_id("a").is_some());
        assert!(net.node_id("c").is_none());
    }

    #[test]
    fn test_edges_ordered_by_time_ties_by_insertion() {
        let mut net = TemporalNetwork::new();
        net.add_edge("b", "a", 3).unwrap();
        net.add_edge("a", "b", 1).unwrap();
        net.add_edge("b", "c", 3).unwrap();

        let ordered = net.edges_ordered();
        assert_eq!(ordered[0].time, 1);
        assert_eq!(ordered[1].time, 3);
        assert_eq!(ordered[2].time, 3);
        // Tie at t=3: (b, a) was inserted first.
        assert_eq!(ordered[1].dst, net.node_id("a").unwrap());
        assert_eq!(ordered[2].dst, net.node_id("c").unwrap());
    }

    #[test]
    fn test_edges_from_and_between() {
        let mut net = TemporalNetwork::new();
        net.add_edge("a", "b", 5).unwrap();
        net.add_edge("a", "c", 2).unwrap();
        net.add_edge("a", "b", 9).unwrap();
        net.add_edge("b", "a", 3).unwrap();

        let from_a = net.edges_from("a");
        assert_eq!(from_a.len(), 3);
        assert_eq!(from_a[0].time, 2);
        assert_eq!(from_a[2].time, 9);

        let a_to_b = net.edges_between("a", "b");
        assert_eq!(a_to_b.len(), 2);
        assert_eq!(a_to_b[0].time, 5);

        assert!(net.edges_from("missing").is_empty());
        assert!(net.edges_between("a", "missing").is_empty());
    }

    #[test]
    fn test_string_timestamp_normalization() {
        let mut net = TemporalNetwork::new();
        net.add_edge("a", "b", "2018-08-22 14:00:00").unwrap();
        net.add_edge("b", "c", "2018-08-22 14:00:30").unwrap();

        let ordered = net.edges_ordered();
        assert_eq!(ordered[1].time - ordered[0].time, 30);
        assert_eq!(net.inter_event_gaps(), Some((30, 30)));
    }

    #[test]
    fn test_malformed_timestamp_leaves_network_unchanged() {
        let mut net = TemporalNetwork::new();
        net.add_edge("a", "b", 1).unwrap();

        let err = net.add_edge("x", "y", "not a date").unwrap_err();
        assert!(matches!(err, Error::MalformedTimestamp { .. }));
        assert_eq!(net.num_edges(), 1);
        assert_eq!(net.num_nodes(), 2);
        assert!(net.node_id("x").is_none());
    }

    #[test]
    fn test_custom_timestamp_format() {
        let mut net = TemporalNetwork::new().with_timestamp_format("%d.%m.%Y %H:%M");
        net.add_edge("a", "b", "22.08.2018 14:00").unwrap();
        net.add_edge("b", "c", "22.08.2018 14:01").unwrap();

        assert_eq!(net.inter_event_gaps(), Some((60, 60)));
    }

    #[test]
    fn test_inter_event_gaps() {
        let mut net = TemporalNetwork::new();
        net.add_edge("a", "b", 1).unwrap();
        net.add_edge("b", "a", 3).unwrap();
        net.add_edge("b", "c", 3).unwrap();
        net.add_edge("d", "c", 4).unwrap();
        net.add_edge("c", "d", 5).unwrap();
        net.add_edge("c", "b", 6).unwrap();

        // Distinct times 1, 3, 4, 5, 6 -> gaps 2, 1, 1, 1.
        assert_eq!(net.inter_event_gaps(), Some((1, 2)));
    }

    #[test]
    fn test_rescale_exact() {
        let mut net = TemporalNetwork::new();
        net.add_edge("a", "b", 20).unwrap();
        net.add_edge("b", "c", 40).unwrap();
        net.add_edge("c", "d", 80).unwrap();

        assert!(net.is_multiple_of(20));
        let coarse = net.rescale(20).unwrap();
        let times: Vec<_> = coarse.edges_ordered().iter().map(|e| e.time).collect();
        assert_eq!(times, vec![1, 2, 4]);
        // Original untouched.
        assert_eq!(net.time_range(), Some((20, 80)));
    }

    #[test]
    fn test_rescale_lossy_rounds_to_nearest() {
        let mut net = TemporalNetwork::new();
        net.add_edge("a", "b", 29).unwrap();
        net.add_edge("b", "c", 31).unwrap();

        assert!(!net.is_multiple_of(20));
        let coarse = net.rescale(20).unwrap();
        let times: Vec<_> = coarse.edges_ordered().iter().map(|e| e.time).collect();
        assert_eq!(times, vec![1, 2]);
    }

    #[test]
    fn test_rescale_invalid_factor() {
        let net = TemporalNetwork::new();
        assert!(matches!(
            net.rescale(0),
            Err(Error::InvalidRescaleFactor(0))
        ));
        assert!(matches!(
            net.rescale(-5),
            Err(Error::InvalidRescaleFactor(-5))
        ));
    }

    #[test]
    fn test_stats_display() {
        let mut net = TemporalNetwork::new();
        net.add_edge("a", "b", 1).unwrap();
        net.add_edge("b", "c", 3).unwrap();

        let text = net.stats().to_string();
        assert!(text.contains("Nodes:              3"));
        assert!(text.contains("Observation period: [1, 3]"));
    }
}
