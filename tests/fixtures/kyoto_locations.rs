//! Real Kyoto sightseeing locations for realistic test fixtures.
//!
//! Coordinates sourced from OpenStreetMap.

use itinerary_optimizer::Coordinate;

/// A named location with coordinates.
#[derive(Debug, Clone)]
pub struct Location {
    pub name: &'static str,
    pub lat: f64,
    pub lng: f64,
}

impl Location {
    pub const fn new(name: &'static str, lat: f64, lng: f64) -> Self {
        Self { name, lat, lng }
    }

    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.lat, self.lng)
    }
}

// ============================================================================
// Hotels (good for start/end anchors)
// ============================================================================

pub const HOTELS: &[Location] = &[
    Location::new("Hotel Granvia Kyoto", 34.9855, 135.7587),
    Location::new("The Westin Miyako", 35.0107, 135.7874),
];

// ============================================================================
// Eastern Kyoto (Higashiyama)
// ============================================================================

pub const HIGASHIYAMA: &[Location] = &[
    Location::new("Kiyomizu-dera", 34.9949, 135.7850),
    Location::new("Yasaka Shrine", 35.0037, 135.7785),
    Location::new("Kodai-ji", 35.0005, 135.7811),
    Location::new("Ginkaku-ji", 35.0270, 135.7982),
    Location::new("Nanzen-ji", 35.0110, 135.7944),
    Location::new("Heian Shrine", 35.0160, 135.7824),
];

// ============================================================================
// Central and western Kyoto
// ============================================================================

pub const CENTRAL: &[Location] = &[
    Location::new("Nishiki Market", 35.0050, 135.7649),
    Location::new("Nijo Castle", 35.0142, 135.7482),
    Location::new("Kinkaku-ji", 35.0394, 135.7292),
    Location::new("Fushimi Inari", 34.9671, 135.7727),
];
