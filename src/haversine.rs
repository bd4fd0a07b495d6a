//! Haversine distance matrix provider (fallback when the routing API is unavailable).
//!
//! Uses great-circle distance and a per-mode speed to estimate travel time.
//! Ignores streets and timetables, but needs no network access or API key.

use std::time::Instant;

use crate::error::MatrixError;
use crate::model::{Coordinate, TravelMode};
use crate::traits::{DistanceMatrixProvider, MatrixEntry};

/// Earth radius in kilometers.
const EARTH_RADIUS_KM: f64 = 6371.0;

/// Haversine-based distance matrix provider.
#[derive(Debug, Clone)]
pub struct HaversineMatrix {
    pub walk_kmh: f64,
    pub bicycle_kmh: f64,
    pub transit_kmh: f64,
    pub drive_kmh: f64,
}

impl Default for HaversineMatrix {
    fn default() -> Self {
        Self {
            walk_kmh: 5.0,
            bicycle_kmh: 15.0,
            transit_kmh: 25.0,
            drive_kmh: 40.0,
        }
    }
}

impl HaversineMatrix {
    /// Assumed average speed for a travel mode.
    pub fn speed_kmh(&self, mode: TravelMode) -> f64 {
        match mode {
            TravelMode::Walk => self.walk_kmh,
            TravelMode::Bicycle => self.bicycle_kmh,
            TravelMode::Transit => self.transit_kmh,
            TravelMode::Drive => self.drive_kmh,
        }
    }

    /// Calculate haversine distance between two points in kilometers.
    fn haversine_km(from: Coordinate, to: Coordinate) -> f64 {
        let lat1_rad = from.latitude.to_radians();
        let lat2_rad = to.latitude.to_radians();
        let delta_lat = (to.latitude - from.latitude).to_radians();
        let delta_lng = (to.longitude - from.longitude).to_radians();

        let a = (delta_lat / 2.0).sin().powi(2)
            + lat1_rad.cos() * lat2_rad.cos() * (delta_lng / 2.0).sin().powi(2);
        let c = 2.0 * a.sqrt().asin();

        EARTH_RADIUS_KM * c
    }

    /// Convert distance in km to travel time in seconds.
    fn km_to_seconds(&self, km: f64, mode: TravelMode) -> u64 {
        let hours = km / self.speed_kmh(mode);
        (hours * 3600.0).round() as u64
    }
}

impl DistanceMatrixProvider for HaversineMatrix {
    fn route_matrix(
        &self,
        origins: &[Coordinate],
        destinations: &[Coordinate],
        mode: TravelMode,
        _deadline: Option<Instant>,
    ) -> Result<Vec<MatrixEntry>, MatrixError> {
        let mut entries = Vec::with_capacity(origins.len() * destinations.len());
        for (origin, from) in origins.iter().enumerate() {
            for (destination, to) in destinations.iter().enumerate() {
                entries.push(MatrixEntry {
                    origin,
                    destination,
                    duration_secs: self.km_to_seconds(Self::haversine_km(*from, *to), mode),
                });
            }
        }
        Ok(entries)
    }
}
