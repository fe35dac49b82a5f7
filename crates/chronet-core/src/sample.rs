//! Randomized causal path estimation by root sampling.

use crate::dag::UnfoldedDag;
use crate::edge::Timestamp;
use crate::extract::traverse_root;
use crate::network::TemporalNetwork;
use crate::stats::PathStatistics;
use crate::Result;
use rand::prelude::*;
use rand_xorshift::XorShiftRng;
use std::sync::atomic::AtomicUsize;

/// Result of a sampled extraction.
#[derive(Debug, Clone)]
pub struct SampledPaths {
    /// Estimated statistics, already scaled by `total_roots / realized`.
    pub stats: PathStatistics,
    /// Sample size that was requested.
    pub requested: usize,
    /// Roots actually traversed (smaller than `requested` when the DAG
    /// has fewer roots).
    pub realized: usize,
    /// Total roots in the unfolded DAG.
    pub total_roots: usize,
}

impl SampledPaths {
    /// The extrapolation factor applied to the counts.
    pub fn scale(&self) -> f64 {
        if self.realized == 0 {
            1.0
        } else {
            self.total_roots as f64 / self.realized as f64
        }
    }
}

/// Estimate causal path statistics by sampling `k` roots of the unfolded
/// DAG of `network` at maximum time difference `delta`.
///
/// See [`sample_from_dag`] for the estimator's guarantees.
pub fn sample_paths(
    network: &TemporalNetwork,
    delta: Timestamp,
    k: usize,
    seed: u64,
) -> Result<SampledPaths> {
    let dag = UnfoldedDag::from_network(network, delta)?;
    Ok(sample_from_dag(&dag, k, seed))
}

/// Estimate causal path statistics from `k` roots sampled uniformly at
/// random, without replacement, from the full root set.
///
/// The exhaustive traversal runs from the sampled roots only and every
/// count is scaled by `total_roots / realized`, which makes the estimate
/// unbiased in expectation. No variance guarantee is made for small `k`;
/// the estimate becomes exact as `k` reaches the total root count. The
/// result is deterministic for a given `seed` (a seeded `XorShiftRng`,
/// never global randomness).
///
/// `k = 0` and a DAG with zero roots are valid degenerate inputs: both
/// yield empty statistics rather than an error.
pub fn sample_from_dag(dag: &UnfoldedDag, k: usize, seed: u64) -> SampledPaths {
    let total_roots = dag.roots().len();
    if k == 0 || total_roots == 0 {
        return SampledPaths {
            stats: PathStatistics::new(),
            requested: k,
            realized: 0,
            total_roots,
        };
    }

    let mut rng = XorShiftRng::seed_from_u64(seed);
    let chosen: Vec<_> = dag
        .roots()
        .choose_multiple(&mut rng, k)
        .copied()
        .collect();

    let visited = AtomicUsize::new(0);
    let mut stats = PathStatistics::new();
    for &root in &chosen {
        // Budget-free traversal cannot fail.
        let partial = traverse_root(dag, root, None, &visited)
            .unwrap_or_else(|_| unreachable!("unbudgeted traversal is infallible"));
        stats.merge(partial);
    }

    let realized = chosen.len();
    stats.scale(total_roots as f64 / realized as f64);

    SampledPaths {
        stats,
        requested: k,
        realized,
        total_roots,
    }
}
