//! Test fixtures for itinerary-optimizer.
//!
//! Provides realistic test data including:
//! - Real Kyoto locations (from OpenStreetMap)
//! - Stub providers with fixed durations

pub mod kyoto_locations;
pub mod providers;

pub use kyoto_locations::*;
pub use providers::*;
