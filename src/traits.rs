//! Seam between the optimizer and whatever supplies travel durations.

use std::time::Instant;

use crate::error::MatrixError;
use crate::model::{Coordinate, TravelMode};

/// Most origin x destination pairs one matrix request may carry.
pub const MAX_MATRIX_ELEMENTS: usize = 49;

/// Travel time for one origin/destination pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatrixEntry {
    pub origin: usize,
    pub destination: usize,
    pub duration_secs: u64,
}

/// Provides travel durations between two sets of coordinates.
///
/// Entries are indexed by position in `origins` and `destinations`. Pairs the
/// provider could not route may be missing from the result.
pub trait DistanceMatrixProvider {
    fn route_matrix(
        &self,
        origins: &[Coordinate],
        destinations: &[Coordinate],
        mode: TravelMode,
        deadline: Option<Instant>,
    ) -> Result<Vec<MatrixEntry>, MatrixError>;
}

impl<P: DistanceMatrixProvider + ?Sized> DistanceMatrixProvider for &P {
    fn route_matrix(
        &self,
        origins: &[Coordinate],
        destinations: &[Coordinate],
        mode: TravelMode,
        deadline: Option<Instant>,
    ) -> Result<Vec<MatrixEntry>, MatrixError> {
        (**self).route_matrix(origins, destinations, mode, deadline)
    }
}

/// Reject batches the routing service would refuse.
pub fn check_batch_size(origins: usize, destinations: usize) -> Result<(), MatrixError> {
    if origins * destinations > MAX_MATRIX_ELEMENTS {
        return Err(MatrixError::TooManyElements {
            origins,
            destinations,
            max: MAX_MATRIX_ELEMENTS,
        });
    }
    Ok(())
}
