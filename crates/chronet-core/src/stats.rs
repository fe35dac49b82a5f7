//! Aggregated causal path statistics.

use crate::edge::NodeId;
use crate::network::TemporalNetwork;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;

/// Occurrence counts for a single causal path.
///
/// Counts are `f64` so that sampled estimates can carry fractionally
/// scaled values; exhaustive extraction always produces whole numbers.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct PathCount {
    /// Occurrences as a maximal causal path.
    pub as_longest: f64,
    /// Occurrences as a contiguous sub-path of a longer realized path.
    pub as_sub: f64,
}

impl PathCount {
    /// Total occurrences, maximal and contained.
    pub fn total(&self) -> f64 {
        self.as_longest + self.as_sub
    }

    fn add(&mut self, other: PathCount) {
        self.as_longest += other.as_longest;
        self.as_sub += other.as_sub;
    }
}

/// A mapping from causal paths to occurrence counts.
///
/// Produced fresh by every extraction or sampling call; immutable once
/// returned. Every realization of a maximal path also counts each of its
/// contiguous sub-paths of length >= 1, so shorter causal paths are
/// always contained in the longer ones that realize them, and growing
/// delta never removes a previously observed path.
///
/// Partial statistics merge via commutative, associative count addition
/// ([`merge`](Self::merge)), which is what the parallel extractor uses to
/// combine per-root results.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PathStatistics {
    counts: HashMap<Vec<NodeId>, PathCount>,
}

impl PathStatistics {
    /// Empty statistics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one realization of a maximal path: the full path counts as
    /// longest, every contiguous sub-path with at least one edge as
    /// contained.
    pub(crate) fn record_longest(&mut self, path: &[NodeId]) {
        debug_assert!(path.len() >= 2, "paths must have at least one edge");
        for start in 0..path.len() - 1 {
            for end in (start + 2)..=path.len() {
                if start == 0 && end == path.len() {
                    continue;
                }
                self.counts
                    .entry(path[start..end].to_vec())
                    .or_default()
                    .as_sub += 1.0;
            }
        }
        self.counts.entry(path.to_vec()).or_default().as_longest += 1.0;
    }

    /// Multiply every count by `factor` (sampling extrapolation).
    pub(crate) fn scale(&mut self, factor: f64) {
        for count in self.counts.values_mut() {
            count.as_longest *= factor;
            count.as_sub *= factor;
        }
    }

    /// Fold another statistics into this one by count addition.
    pub fn merge(&mut self, other: PathStatistics) {
        for (path, count) in other.counts {
            self.counts.entry(path).or_default().add(count);
        }
    }

    /// Count for a specific path, if observed.
    pub fn get(&self, path: &[NodeId]) -> Option<PathCount> {
        self.counts.get(path).copied()
    }

    /// Number of distinct paths observed.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// True when nothing was observed.
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Iterator over `(path, count)` pairs (unspecified order).
    pub fn iter(&self) -> impl Iterator<Item = (&[NodeId], PathCount)> {
        self.counts.iter().map(|(p, &c)| (p.as_slice(), c))
    }

    /// Paths with their node labels resolved against `network`, sorted by
    /// length then lexicographically for stable display.
    pub fn labelled<'a>(&self, network: &'a TemporalNetwork) -> Vec<(Vec<&'a str>, PathCount)> {
        let mut rows: Vec<(Vec<&str>, PathCount)> = self
            .counts
            .iter()
            .map(|(path, &count)| {
                let labels = path
                    .iter()
                    .map(|&id| network.node_name(id).unwrap_or("?"))
                    .collect();
                (labels, count)
            })
            .collect();
        rows.sort_by(|a, b| a.0.len().cmp(&b.0.len()).then_with(|| a.0.cmp(&b.0)));
        rows
    }

    /// Aggregate counts by path length (number of edges).
    pub fn by_length(&self) -> BTreeMap<usize, PathCount> {
        let mut lengths: BTreeMap<usize, PathCount> = BTreeMap::new();
        for (path, &count) in &self.counts {
            lengths.entry(path.len() - 1).or_default().add(count);
        }
        lengths
    }

    /// Derived summary for downstream consumers.
    pub fn summary(&self) -> PathSummary {
        let by_length = self.by_length();
        let total_observations = by_length.values().map(PathCount::total).sum();
        let nodes: HashSet<NodeId> = self.counts.keys().flatten().copied().collect();
        let edges = self
            .counts
            .iter()
            .map(|(path, count)| (path.len() - 1) as f64 * count.as_longest)
            .sum();

        PathSummary {
            distinct_paths: self.counts.len(),
            nodes: nodes.len(),
            edges,
            total_observations,
            by_length,
        }
    }
}

/// Derived summary of path statistics.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PathSummary {
    /// Distinct paths observed.
    pub distinct_paths: usize,
    /// Distinct real nodes appearing in any path.
    pub nodes: usize,
    /// Total edge traversals across maximal paths.
    pub edges: f64,
    /// Sum of all counts, maximal and contained.
    pub total_observations: f64,
    /// Counts aggregated by path length.
    pub by_length: BTreeMap<usize, PathCount>,
}

impl fmt::Display for PathSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Distinct paths: {}", self.distinct_paths)?;
        writeln!(f, "Nodes:          {}", self.nodes)?;
        writeln!(f, "Edges:          {}", self.edges)?;
        write!(f, "Paths by length (maximal / contained):")?;
        for (length, count) in &self.by_length {
            write!(f, "\n  {length}: {} / {}", count.as_longest, count.as_sub)?;
        }
        Ok(())
    }
}
