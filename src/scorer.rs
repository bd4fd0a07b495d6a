//! Total travel cost of a visiting order.

use crate::weights::WeightGraph;

/// Seconds spent travelling when visiting `order` (spot indices) in sequence,
/// including the legs from the start anchor and to the end anchor.
///
/// An empty order costs nothing. Totals saturate at `u64::MAX`.
pub fn score(graph: &WeightGraph, order: &[usize]) -> u64 {
    let (Some(&first), Some(&last)) = (order.first(), order.last()) else {
        return 0;
    };

    order
        .windows(2)
        .map(|pair| graph.edge(pair[0], pair[1]))
        .fold(graph.start_weight(first), u64::saturating_add)
        .saturating_add(graph.end_weight(last))
}
