//! Entry point: suggest a visiting order for one day of a trip.
//!
//! Only spots are reordered. Other activities keep their slot in the day and
//! spots fill the remaining slots in optimized order. A start anchor is
//! placed first and an end anchor last; neither is ever moved.

use std::collections::{HashMap, HashSet};
use std::time::Instant;

use tracing::{info, warn};

use crate::config::SolveOptions;
use crate::error::OptimizeError;
use crate::model::{Activity, ActivityId, ActivityKind, ActivityOrder, TransportOverride, TravelMode};
use crate::solver::{SearchStrategy, solve};
use crate::traits::DistanceMatrixProvider;
use crate::weights::{Anchor, IndexedSpot, WeightGraph, WeightGraphBuilder};

/// Everything known about the day being optimized.
#[derive(Debug, Clone, Default)]
pub struct SuggestRequest {
    pub spots: Vec<Activity>,
    pub others: Vec<Activity>,
    pub start: Option<Activity>,
    pub end: Option<Activity>,
    pub transports: Vec<TransportOverride>,
    pub travel_mode: TravelMode,
}

/// A suggested order for the day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Suggestion {
    /// New 1-based position of every activity, anchors included.
    pub orders: Vec<ActivityOrder>,
    /// Travel seconds of the current order, when weights were fetched.
    pub baseline_score: Option<u64>,
    /// Travel seconds of the suggested order, when weights were fetched.
    pub best_score: Option<u64>,
    pub strategy: SearchStrategy,
}

pub struct ItineraryOptimizer<P> {
    provider: P,
    options: SolveOptions,
}

impl<P: DistanceMatrixProvider> ItineraryOptimizer<P> {
    pub fn new(provider: P) -> Self {
        Self::with_options(provider, SolveOptions::default())
    }

    pub fn with_options(provider: P, options: SolveOptions) -> Self {
        Self { provider, options }
    }

    pub fn options(&self) -> &SolveOptions {
        &self.options
    }

    /// Suggest a new order for the day.
    ///
    /// Any error means no suggestion is available and the current order
    /// should be kept. No partial result is ever returned.
    pub fn suggest(
        &self,
        request: &SuggestRequest,
        deadline: Option<Instant>,
    ) -> Result<Suggestion, OptimizeError> {
        let anchor_ids: HashSet<ActivityId> = request
            .start
            .iter()
            .chain(request.end.iter())
            .map(|anchor| anchor.id)
            .collect();

        let activities = day_activities(request, &anchor_ids);

        // Spots get matrix indices in the order they were supplied.
        let spots: Vec<IndexedSpot> = activities
            .iter()
            .filter_map(|activity| match activity.kind {
                ActivityKind::Spot { coordinate } => Some((activity.id, coordinate)),
                ActivityKind::Other => None,
            })
            .enumerate()
            .map(|(index, (id, coordinate))| IndexedSpot {
                id,
                index,
                coordinate,
            })
            .collect();

        let day = baseline_sequence(&activities);
        let spot_index: HashMap<ActivityId, usize> =
            spots.iter().map(|spot| (spot.id, spot.index)).collect();
        let baseline: Vec<usize> = day
            .iter()
            .filter_map(|activity| spot_index.get(&activity.id).copied())
            .collect();

        let searchable = spots.len() >= 2 && day.len() <= self.options.permutation_threshold;
        let graph = if searchable {
            WeightGraphBuilder::new(&self.provider, request.travel_mode, deadline).build(
                &spots,
                anchor(request.start.as_ref()).as_ref(),
                anchor(request.end.as_ref()).as_ref(),
                &request.transports,
            )?
        } else {
            WeightGraph::zeroed(spots.len())
        };

        if deadline.is_some_and(|deadline| Instant::now() >= deadline) {
            return Err(OptimizeError::DeadlineExceeded);
        }

        let outcome = solve(&graph, &baseline, day.len(), &self.options);
        let orders = assign_orders(request, &day, &spots, &outcome.order);

        let (baseline_score, best_score) = if searchable {
            (Some(outcome.baseline_score), Some(outcome.best_score))
        } else {
            (None, None)
        };
        info!(
            spots = spots.len(),
            others = day.len() - spots.len(),
            baseline_score,
            best_score,
            "suggested itinerary order"
        );

        Ok(Suggestion {
            orders,
            baseline_score,
            best_score,
            strategy: outcome.strategy,
        })
    }
}

/// Spots then others in the order supplied, anchors excluded. An id listed
/// more than once is kept at its first occurrence.
fn day_activities<'a>(
    request: &'a SuggestRequest,
    anchor_ids: &HashSet<ActivityId>,
) -> Vec<&'a Activity> {
    let mut seen = HashSet::new();
    request
        .spots
        .iter()
        .chain(request.others.iter())
        .filter(|activity| !anchor_ids.contains(&activity.id))
        .filter(|activity| {
            let first = seen.insert(activity.id);
            if !first {
                warn!(activity = activity.id, "activity listed twice, keeping the first entry");
            }
            first
        })
        .collect()
}

/// The day's activities sorted by their current order.
fn baseline_sequence<'a>(activities: &[&'a Activity]) -> Vec<&'a Activity> {
    let mut day = activities.to_vec();
    day.sort_by_key(|activity| activity.order);
    day
}

fn anchor(activity: Option<&Activity>) -> Option<Anchor> {
    let activity = activity?;
    let coordinate = activity.coordinate();
    if coordinate.is_none() {
        warn!(
            activity = activity.id,
            "anchor has no location, only manual travel times reach it"
        );
    }
    Some(Anchor {
        id: activity.id,
        coordinate,
    })
}

/// Put the optimized spots into the day's spot slots and number everything.
fn assign_orders(
    request: &SuggestRequest,
    day: &[&Activity],
    spots: &[IndexedSpot],
    optimized: &[usize],
) -> Vec<ActivityOrder> {
    let mut next_spot = optimized.iter().map(|&index| spots[index].id);
    let mut sequence: Vec<ActivityId> = Vec::with_capacity(day.len() + 2);

    if let Some(start) = &request.start {
        sequence.push(start.id);
    }
    for activity in day {
        let id = if activity.is_spot() {
            next_spot.next().unwrap_or(activity.id)
        } else {
            activity.id
        };
        sequence.push(id);
    }
    if let Some(end) = &request.end {
        if !sequence.contains(&end.id) {
            sequence.push(end.id);
        }
    }

    sequence
        .into_iter()
        .enumerate()
        .map(|(position, activity_id)| ActivityOrder {
            activity_id,
            order: position as i32 + 1,
        })
        .collect()
}
