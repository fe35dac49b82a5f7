#![allow(clippy::must_use_candidate)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::uninlined_format_args)]

//! Causal path statistics for temporal networks.
//!
//! Turns a stream of timestamped directed edges into statistics about
//! causal (time-respecting) paths: node sequences whose edges occur in
//! strictly increasing time order with consecutive gaps of at most a
//! maximum time difference delta.
//!
//! - [`TemporalNetwork`] - ordered store of timestamped edges with
//!   timestamp normalization
//! - [`UnfoldedDag`] - the time-unfolded acyclic graph encoding causal
//!   reachability at a given delta
//! - [`extract_paths`] - exhaustive enumeration of maximal causal paths
//!   folded into [`PathStatistics`]
//! - [`sample_paths`] - seeded root sampling for statistically
//!   representative estimates at bounded cost
//!
//! # Example
//!
//! ```rust
//! use chronet_core::{extract_paths, ExtractOptions, TemporalNetwork};
//!
//! let mut net = TemporalNetwork::new();
//! net.add_edge("a", "b", 1)?;
//! net.add_edge("b", "c", 2)?;
//! net.add_edge("c", "d", 5)?;
//!
//! // With delta = 1 only the first two edges chain: one causal path
//! // a -> b -> c, and c -> d stays a trivial length-1 path.
//! let stats = extract_paths(&net, 1, &ExtractOptions::default())?;
//! let by_length = stats.by_length();
//! assert_eq!(by_length[&2].as_longest, 1.0);
//! assert_eq!(by_length[&1].as_longest, 1.0);
//! # Ok::<(), chronet_core::Error>(())
//! ```
//!
//! # Concurrency
//!
//! Extraction and sampling are pure functions of `(&network, delta)`:
//! nothing mutates the network, so independent extractions at different
//! deltas may run in parallel against one shared network. Within a single
//! exhaustive extraction, per-root traversals fan out across rayon
//! workers and merge by count addition.

mod dag;
mod edge;
mod error;
mod extract;
mod network;
mod sample;
mod stats;

pub use dag::{UnfoldedDag, UnfoldedEdge, UnfoldedNode};
pub use edge::{NodeId, TimeInput, Timestamp, TimestampedEdge};
pub use error::{Error, Result};
pub use extract::{extract_from_dag, extract_paths, ExtractOptions};
pub use network::{TemporalNetwork, TemporalNetworkStats, DEFAULT_TIMESTAMP_FORMAT};
pub use sample::{sample_from_dag, sample_paths, SampledPaths};
pub use stats::{PathCount, PathStatistics, PathSummary};

// Re-export petgraph so consumers can walk the unfolded DAG directly.
pub use petgraph;
