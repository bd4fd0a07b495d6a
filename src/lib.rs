//! itinerary-optimizer
//!
//! Suggests the visiting order for a day of a trip that minimizes travel
//! time, using durations from a rate-limited routing service.

pub mod config;
pub mod error;
pub mod haversine;
pub mod model;
pub mod optimizer;
pub mod permutations;
pub mod rate_limiter;
pub mod routes;
pub mod scorer;
pub mod solver;
pub mod throttled;
pub mod traits;
pub mod weights;

pub use config::{RateLimitConfig, RoutesApiConfig, SolveOptions};
pub use error::{MatrixError, OptimizeError, RateLimitError, TransportError};
pub use model::{Activity, ActivityId, ActivityKind, ActivityOrder, Coordinate, TransportOverride, TravelMode};
pub use optimizer::{ItineraryOptimizer, SuggestRequest, Suggestion};
pub use rate_limiter::RateLimiter;
pub use routes::RouteMatrixProvider;
pub use traits::DistanceMatrixProvider;
