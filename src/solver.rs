//! Visiting-order solver.
//!
//! Small days are searched exhaustively; the input order is the first
//! candidate and is only replaced by a strictly cheaper one, so the result is
//! never worse than what the planner already had and ties keep the earliest
//! candidate found. Days with more activities than the threshold keep their
//! input order: there is no heuristic for them yet.

use rayon::iter::{ParallelBridge, ParallelIterator};
use tracing::debug;

use crate::config::SolveOptions;
use crate::permutations::HeapPermutations;
use crate::scorer::score;
use crate::weights::WeightGraph;

/// How the solver arrived at its answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchStrategy {
    /// Every ordering was scored.
    Exhaustive { candidates: usize },
    /// Too many activities to search; the input order was returned.
    KeptInputOrder,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolveOutcome {
    /// Spot indices in visiting order.
    pub order: Vec<usize>,
    pub baseline_score: u64,
    pub best_score: u64,
    pub strategy: SearchStrategy,
}

/// Find the cheapest ordering of `baseline` (spot indices in their current
/// order).
///
/// `activity_count` is the number of activities on the day, spots and others
/// together; it alone decides whether the search runs.
pub fn solve(
    graph: &WeightGraph,
    baseline: &[usize],
    activity_count: usize,
    options: &SolveOptions,
) -> SolveOutcome {
    let baseline_score = score(graph, baseline);

    if activity_count > options.permutation_threshold {
        debug!(
            activity_count,
            threshold = options.permutation_threshold,
            "too many activities for exhaustive search, keeping input order"
        );
        return SolveOutcome {
            order: baseline.to_vec(),
            baseline_score,
            best_score: baseline_score,
            strategy: SearchStrategy::KeptInputOrder,
        };
    }

    let candidates: usize = (1..=baseline.len()).product();

    // Sequence number 0 is the input order; keying on (score, sequence)
    // keeps the earliest candidate among equal scores.
    let best = HeapPermutations::new(baseline.to_vec())
        .enumerate()
        .par_bridge()
        .map(|(sequence, order)| (score(graph, &order), sequence, order))
        .min_by_key(|(cost, sequence, _)| (*cost, *sequence));

    let (best_score, order) = match best {
        Some((best_score, _, order)) => (best_score, order),
        None => (baseline_score, baseline.to_vec()),
    };

    debug!(candidates, baseline_score, best_score, "exhaustive search finished");

    SolveOutcome {
        order,
        baseline_score,
        best_score,
        strategy: SearchStrategy::Exhaustive { candidates },
    }
}
