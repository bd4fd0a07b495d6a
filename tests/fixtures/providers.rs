//! Stub distance matrix providers.

use std::cell::Cell;
use std::collections::HashMap;
use std::time::Instant;

use itinerary_optimizer::error::MatrixError;
use itinerary_optimizer::traits::{DistanceMatrixProvider, MatrixEntry, check_batch_size};
use itinerary_optimizer::{Coordinate, TravelMode};

fn coordinate_key(coordinate: &Coordinate) -> String {
    format!("{:.6},{:.6}", coordinate.latitude, coordinate.longitude)
}

/// Provider answering from a fixed table of directed durations.
///
/// Pairs not in the table cost `default_secs`; a point to itself is free.
/// Counts calls and enforces the same batch ceiling as the HTTP provider.
pub struct TableProvider {
    durations: HashMap<(String, String), u64>,
    default_secs: u64,
    calls: Cell<usize>,
}

impl TableProvider {
    pub fn new() -> Self {
        Self {
            durations: HashMap::new(),
            default_secs: 24 * 3600,
            calls: Cell::new(0),
        }
    }

    /// Same duration in both directions.
    pub fn between(mut self, a: Coordinate, b: Coordinate, secs: u64) -> Self {
        self.durations
            .insert((coordinate_key(&a), coordinate_key(&b)), secs);
        self.durations
            .insert((coordinate_key(&b), coordinate_key(&a)), secs);
        self
    }

    /// Duration for one direction only.
    pub fn directed(mut self, from: Coordinate, to: Coordinate, secs: u64) -> Self {
        self.durations
            .insert((coordinate_key(&from), coordinate_key(&to)), secs);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.get()
    }

    fn lookup(&self, from: &Coordinate, to: &Coordinate) -> u64 {
        let key = (coordinate_key(from), coordinate_key(to));
        if key.0 == key.1 {
            return 0;
        }
        self.durations.get(&key).copied().unwrap_or(self.default_secs)
    }
}

impl DistanceMatrixProvider for TableProvider {
    fn route_matrix(
        &self,
        origins: &[Coordinate],
        destinations: &[Coordinate],
        _mode: TravelMode,
        _deadline: Option<Instant>,
    ) -> Result<Vec<MatrixEntry>, MatrixError> {
        check_batch_size(origins.len(), destinations.len())?;
        self.calls.set(self.calls.get() + 1);

        let mut entries = Vec::new();
        for (origin, from) in origins.iter().enumerate() {
            for (destination, to) in destinations.iter().enumerate() {
                entries.push(MatrixEntry {
                    origin,
                    destination,
                    duration_secs: self.lookup(from, to),
                });
            }
        }
        Ok(entries)
    }
}

/// Provider backed by an explicit square matrix over a list of points.
///
/// Each coordinate is mapped back to its position in `points`, so any subset
/// of origins/destinations can be answered.
pub struct GridProvider {
    points: Vec<Coordinate>,
    matrix: Vec<Vec<u64>>,
}

impl GridProvider {
    pub fn new(points: Vec<Coordinate>, matrix: Vec<Vec<u64>>) -> Self {
        Self { points, matrix }
    }

    fn position(&self, coordinate: &Coordinate) -> usize {
        let key = coordinate_key(coordinate);
        self.points
            .iter()
            .position(|point| coordinate_key(point) == key)
            .expect("coordinate not in grid")
    }
}

impl DistanceMatrixProvider for GridProvider {
    fn route_matrix(
        &self,
        origins: &[Coordinate],
        destinations: &[Coordinate],
        _mode: TravelMode,
        _deadline: Option<Instant>,
    ) -> Result<Vec<MatrixEntry>, MatrixError> {
        check_batch_size(origins.len(), destinations.len())?;
        let mut entries = Vec::new();
        for (origin, from) in origins.iter().enumerate() {
            for (destination, to) in destinations.iter().enumerate() {
                entries.push(MatrixEntry {
                    origin,
                    destination,
                    duration_secs: self.matrix[self.position(from)][self.position(to)],
                });
            }
        }
        Ok(entries)
    }
}
