//! Timestamped edge types.

use serde::{Deserialize, Serialize};

/// Timestamp type (integer epoch seconds, or arbitrary discrete units).
pub type Timestamp = i64;

/// Dense internal node identifier.
///
/// The [`TemporalNetwork`](crate::TemporalNetwork) owns the mapping between
/// these ids and the string labels supplied by callers.
pub type NodeId = u32;

/// A directed edge with a timestamp.
///
/// Represents an interaction that occurred instantaneously at `time`.
/// Multiple edges between the same pair of nodes are allowed, including
/// edges at the identical time (parallel events).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimestampedEdge {
    /// Source node id.
    pub src: NodeId,
    /// Target node id.
    pub dst: NodeId,
    /// Time at which the interaction occurred (normalized).
    pub time: Timestamp,
}

impl TimestampedEdge {
    /// Create a new timestamped edge.
    pub fn new(src: NodeId, dst: NodeId, time: Timestamp) -> Self {
        Self { src, dst, time }
    }

    /// Check if this edge occurs strictly before another.
    pub fn before(&self, other: &Self) -> bool {
        self.time < other.time
    }

    /// Time gap from this edge to a later one.
    pub fn gap_to(&self, other: &Self) -> Timestamp {
        other.time - self.time
    }
}

/// Timestamp supplied at insertion time.
///
/// Either an already-discrete integer epoch, or a formatted date/time
/// string parsed with the network's configured timestamp format. The tag
/// is resolved eagerly by [`TemporalNetwork::add_edge`] and never stored:
/// after insertion all times are plain integer epochs.
///
/// [`TemporalNetwork::add_edge`]: crate::TemporalNetwork::add_edge
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimeInput {
    /// Integer epoch (seconds) or abstract discrete time unit.
    Epoch(Timestamp),
    /// Formatted date/time string, e.g. `"2018-08-22 14:00:00"`.
    Text(String),
}

impl From<Timestamp> for TimeInput {
    fn from(t: Timestamp) -> Self {
        Self::Epoch(t)
    }
}

impl From<i32> for TimeInput {
    fn from(t: i32) -> Self {
        Self::Epoch(Timestamp::from(t))
    }
}

impl From<&str> for TimeInput {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for TimeInput {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}
