//! Travel weights for one optimization run.
//!
//! Spots are addressed by the index assigned to them for this run only. The
//! graph holds spot-to-spot durations plus the cost of reaching each spot from
//! the start anchor and of leaving it for the end anchor. Manual transport
//! overrides are written over whatever the provider returned.

use std::collections::HashMap;
use std::time::Instant;

use tracing::{debug, warn};

use crate::error::OptimizeError;
use crate::model::{ActivityId, Coordinate, TransportOverride, TravelMode};
use crate::traits::{DistanceMatrixProvider, MatrixEntry};

/// A spot together with its matrix index for the current run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IndexedSpot {
    pub id: ActivityId,
    pub index: usize,
    pub coordinate: Coordinate,
}

/// A fixed first or last stop.
///
/// An anchor without a location gets no queried legs, but manual overrides
/// still reach it by id.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Anchor {
    pub id: ActivityId,
    pub coordinate: Option<Coordinate>,
}

/// Durations in seconds between the spots of one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeightGraph {
    matrix: Vec<Vec<u64>>,
    start: Vec<u64>,
    end: Vec<u64>,
}

impl WeightGraph {
    /// Graph of `size` spots with every weight zero.
    pub fn zeroed(size: usize) -> Self {
        Self {
            matrix: vec![vec![0; size]; size],
            start: vec![0; size],
            end: vec![0; size],
        }
    }

    /// Build from explicit weights. Returns `None` unless the matrix is square
    /// and both vectors match its size.
    pub fn from_parts(matrix: Vec<Vec<u64>>, start: Vec<u64>, end: Vec<u64>) -> Option<Self> {
        let size = matrix.len();
        if matrix.iter().any(|row| row.len() != size) || start.len() != size || end.len() != size {
            return None;
        }
        Some(Self { matrix, start, end })
    }

    pub fn len(&self) -> usize {
        self.matrix.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matrix.is_empty()
    }

    pub fn edge(&self, from: usize, to: usize) -> u64 {
        self.matrix[from][to]
    }

    pub fn start_weight(&self, spot: usize) -> u64 {
        self.start[spot]
    }

    pub fn end_weight(&self, spot: usize) -> u64 {
        self.end[spot]
    }

    fn fill_matrix(&mut self, entries: &[MatrixEntry]) {
        for entry in entries {
            if let Some(cell) = self
                .matrix
                .get_mut(entry.origin)
                .and_then(|row| row.get_mut(entry.destination))
            {
                *cell = entry.duration_secs;
            }
        }
    }

    /// Write manual durations over the queried ones.
    pub fn apply_overrides(
        &mut self,
        spots: &[IndexedSpot],
        start: Option<&Anchor>,
        end: Option<&Anchor>,
        overrides: &[TransportOverride],
    ) {
        let index: HashMap<ActivityId, usize> =
            spots.iter().map(|spot| (spot.id, spot.index)).collect();
        let start_id = start.map(|anchor| anchor.id);
        let end_id = end.map(|anchor| anchor.id);

        for transport in overrides {
            let Some(secs) = transport.duration_secs() else {
                warn!(
                    from = transport.from,
                    to = transport.to,
                    hours = transport.duration_hours,
                    "ignoring transport override with invalid duration"
                );
                continue;
            };

            match (index.get(&transport.from), index.get(&transport.to)) {
                (Some(&from), Some(&to)) => self.matrix[from][to] = secs,
                (None, Some(&to)) if start_id == Some(transport.from) => self.start[to] = secs,
                (Some(&from), None) if end_id == Some(transport.to) => self.end[from] = secs,
                _ => {
                    warn!(
                        from = transport.from,
                        to = transport.to,
                        "transport override matches no spot pair, ignoring"
                    );
                    continue;
                }
            }
            debug!(from = transport.from, to = transport.to, secs, "applied transport override");
        }
    }
}

/// Fetches weights through a [`DistanceMatrixProvider`], one call at a time.
pub struct WeightGraphBuilder<'a, P> {
    provider: &'a P,
    mode: TravelMode,
    deadline: Option<Instant>,
}

impl<'a, P: DistanceMatrixProvider> WeightGraphBuilder<'a, P> {
    pub fn new(provider: &'a P, mode: TravelMode, deadline: Option<Instant>) -> Self {
        Self {
            provider,
            mode,
            deadline,
        }
    }

    /// Query spot-to-spot, start-to-spot and spot-to-end durations, then
    /// apply overrides. `spots` must be listed in index order.
    pub fn build(
        &self,
        spots: &[IndexedSpot],
        start: Option<&Anchor>,
        end: Option<&Anchor>,
        overrides: &[TransportOverride],
    ) -> Result<WeightGraph, OptimizeError> {
        debug_assert!(spots.iter().enumerate().all(|(i, spot)| spot.index == i));

        let coordinates: Vec<Coordinate> = spots.iter().map(|spot| spot.coordinate).collect();
        let mut graph = WeightGraph::zeroed(spots.len());
        if spots.is_empty() {
            return Ok(graph);
        }

        self.check_deadline()?;
        let entries = self
            .provider
            .route_matrix(&coordinates, &coordinates, self.mode, self.deadline)?;
        warn_on_missing("spot matrix", entries.len(), spots.len() * spots.len());
        graph.fill_matrix(&entries);

        if let Some(coordinate) = start.and_then(|anchor| anchor.coordinate) {
            self.check_deadline()?;
            let entries = self.provider.route_matrix(
                &[coordinate],
                &coordinates,
                self.mode,
                self.deadline,
            )?;
            warn_on_missing("start weights", entries.len(), spots.len());
            for entry in entries {
                if let Some(weight) = graph.start.get_mut(entry.destination) {
                    *weight = entry.duration_secs;
                }
            }
        }

        if let Some(coordinate) = end.and_then(|anchor| anchor.coordinate) {
            self.check_deadline()?;
            let entries = self.provider.route_matrix(
                &coordinates,
                &[coordinate],
                self.mode,
                self.deadline,
            )?;
            warn_on_missing("end weights", entries.len(), spots.len());
            for entry in entries {
                if let Some(weight) = graph.end.get_mut(entry.origin) {
                    *weight = entry.duration_secs;
                }
            }
        }

        graph.apply_overrides(spots, start, end, overrides);
        Ok(graph)
    }

    fn check_deadline(&self) -> Result<(), OptimizeError> {
        match self.deadline {
            Some(deadline) if Instant::now() >= deadline => Err(OptimizeError::DeadlineExceeded),
            _ => Ok(()),
        }
    }
}

fn warn_on_missing(what: &str, received: usize, expected: usize) {
    if received < expected {
        warn!(
            what,
            received,
            expected,
            "provider returned fewer pairs than requested, missing pairs count as 0s"
        );
    }
}
