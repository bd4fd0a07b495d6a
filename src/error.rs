//! Error types for the optimizer and the routing layer beneath it.

use thiserror::Error;

/// The rate limiter could not hand out a slot in time.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RateLimitError {
    #[error("deadline passed while waiting for a {family} request slot")]
    DeadlineExceeded { family: String },
}

/// Failure to reach the routing service at all.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("request to {url} timed out")]
    Timeout { url: String },
    #[error("request to {url} failed: {message}")]
    Network { url: String, message: String },
}

/// Errors from a [`crate::traits::DistanceMatrixProvider`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MatrixError {
    /// Origins x destinations exceeds what one request may carry.
    #[error("{origins} origins x {destinations} destinations exceeds the limit of {max} elements")]
    TooManyElements {
        origins: usize,
        destinations: usize,
        max: usize,
    },
    /// The routing service answered with a non-success status.
    #[error("routing service returned HTTP {status}: {message}")]
    ExternalService { status: u16, message: String },
    /// The response body was not a route matrix.
    #[error("failed to decode route matrix: {message}")]
    Decode { message: String },
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error(transparent)]
    RateLimit(#[from] RateLimitError),
}

/// Errors from [`crate::optimizer::ItineraryOptimizer::suggest`].
///
/// Callers should treat every variant as "no suggestion" and keep the
/// existing order.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OptimizeError {
    #[error("failed to build travel weights: {0}")]
    Matrix(#[from] MatrixError),
    #[error("deadline passed before the itinerary could be optimized")]
    DeadlineExceeded,
}
