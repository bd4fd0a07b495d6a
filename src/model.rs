//! Day itinerary data model.
//!
//! Activities are either spots (they have a location and take part in
//! travel-time optimization) or other activities (no location, never moved
//! relative to the rest of the day).

use serde::{Deserialize, Serialize};

/// Identifier of a persisted activity.
pub type ActivityId = i64;

/// A WGS84 position in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// Travel mode understood by the routing service.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TravelMode {
    #[default]
    Walk,
    Drive,
    Transit,
    Bicycle,
}

impl TravelMode {
    /// Wire name sent to the routing service.
    pub fn as_str(&self) -> &'static str {
        match self {
            TravelMode::Walk => "WALK",
            TravelMode::Drive => "DRIVE",
            TravelMode::Transit => "TRANSIT",
            TravelMode::Bicycle => "BICYCLE",
        }
    }
}

/// Whether an activity has a location.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ActivityKind {
    Spot { coordinate: Coordinate },
    Other,
}

/// One entry on a day's itinerary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    pub id: ActivityId,
    pub kind: ActivityKind,
    /// Position the planner currently has for this activity.
    pub order: i32,
}

impl Activity {
    pub fn spot(id: ActivityId, order: i32, coordinate: Coordinate) -> Self {
        Self {
            id,
            kind: ActivityKind::Spot { coordinate },
            order,
        }
    }

    pub fn other(id: ActivityId, order: i32) -> Self {
        Self {
            id,
            kind: ActivityKind::Other,
            order,
        }
    }

    /// Location of a spot, `None` for other activities.
    pub fn coordinate(&self) -> Option<Coordinate> {
        match self.kind {
            ActivityKind::Spot { coordinate } => Some(coordinate),
            ActivityKind::Other => None,
        }
    }

    pub fn is_spot(&self) -> bool {
        matches!(self.kind, ActivityKind::Spot { .. })
    }
}

/// Longest manual travel time accepted, in seconds.
pub const MAX_OVERRIDE_SECS: u64 = u32::MAX as u64;

/// A manually entered travel time for one directed pair of activities.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TransportOverride {
    pub from: ActivityId,
    pub to: ActivityId,
    pub duration_hours: f64,
}

impl TransportOverride {
    pub fn new(from: ActivityId, to: ActivityId, duration_hours: f64) -> Self {
        Self {
            from,
            to,
            duration_hours,
        }
    }

    /// Duration in whole seconds.
    ///
    /// `None` when the hours value is negative, not finite, or longer than
    /// [`MAX_OVERRIDE_SECS`].
    pub fn duration_secs(&self) -> Option<u64> {
        if !self.duration_hours.is_finite() || self.duration_hours < 0.0 {
            return None;
        }
        let secs = (self.duration_hours * 3600.0).round();
        if secs > MAX_OVERRIDE_SECS as f64 {
            return None;
        }
        Some(secs as u64)
    }
}

/// New position assigned to an activity (1-based).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityOrder {
    pub activity_id: ActivityId,
    pub order: i32,
}
