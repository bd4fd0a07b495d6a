//! Route matrix adapter for the Google Routes `computeRouteMatrix` API.
//!
//! One call carries every origin/destination pair. The service answers with a
//! JSON array of elements such as
//! `{"originIndex": 0, "destinationIndex": 1, "duration": "160s"}`, where
//! zero-valued indices may be omitted.

use std::time::Instant;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::RoutesApiConfig;
use crate::error::MatrixError;
use crate::model::{Coordinate, TravelMode};
use crate::rate_limiter::RateLimiter;
use crate::throttled::{JsonRequest, ReqwestTransport, ThrottledClient, Transport};
use crate::traits::{DistanceMatrixProvider, MatrixEntry, check_batch_size};

const MATRIX_PATH: &str = "/distanceMatrix/v2:computeRouteMatrix";
const FIELD_MASK: &str = "originIndex,destinationIndex,duration";

#[derive(Debug, Clone)]
pub struct RouteMatrixProvider<T = ReqwestTransport> {
    config: RoutesApiConfig,
    client: ThrottledClient<T>,
}

impl RouteMatrixProvider<ReqwestTransport> {
    /// Provider talking HTTP through `reqwest`, paced by `limiter`.
    pub fn new(config: RoutesApiConfig, limiter: RateLimiter) -> Result<Self, reqwest::Error> {
        let transport = ReqwestTransport::new(&config)?;
        Ok(Self::with_transport(config, transport, limiter))
    }
}

impl<T: Transport> RouteMatrixProvider<T> {
    pub fn with_transport(config: RoutesApiConfig, transport: T, limiter: RateLimiter) -> Self {
        Self {
            config,
            client: ThrottledClient::new(transport, limiter),
        }
    }

    pub fn transport(&self) -> &T {
        self.client.transport()
    }

    pub fn limiter(&self) -> &RateLimiter {
        self.client.limiter()
    }

    fn build_request(
        &self,
        origins: &[Coordinate],
        destinations: &[Coordinate],
        mode: TravelMode,
    ) -> Result<JsonRequest, MatrixError> {
        let body = MatrixRequestBody {
            origins: origins.iter().map(RouteMatrixWaypoint::from).collect(),
            destinations: destinations.iter().map(RouteMatrixWaypoint::from).collect(),
            travel_mode: mode,
        };
        let body = serde_json::to_value(&body).map_err(|err| MatrixError::Decode {
            message: err.to_string(),
        })?;

        Ok(JsonRequest {
            url: format!(
                "{}{}",
                self.config.base_url.trim_end_matches('/'),
                MATRIX_PATH
            ),
            headers: vec![
                ("X-Goog-Api-Key".to_string(), self.config.api_key.clone()),
                ("X-Goog-FieldMask".to_string(), FIELD_MASK.to_string()),
            ],
            body,
        })
    }
}

impl<T: Transport> DistanceMatrixProvider for RouteMatrixProvider<T> {
    fn route_matrix(
        &self,
        origins: &[Coordinate],
        destinations: &[Coordinate],
        mode: TravelMode,
        deadline: Option<Instant>,
    ) -> Result<Vec<MatrixEntry>, MatrixError> {
        check_batch_size(origins.len(), destinations.len())?;
        if origins.is_empty() || destinations.is_empty() {
            return Ok(Vec::new());
        }

        let request = self.build_request(origins, destinations, mode)?;
        debug!(
            origins = origins.len(),
            destinations = destinations.len(),
            mode = mode.as_str(),
            "requesting route matrix"
        );

        let response = self.client.post_json(&request, deadline)?;
        if !response.is_success() {
            return Err(MatrixError::ExternalService {
                status: response.status,
                message: error_message(&response.body),
            });
        }

        let elements: Vec<MatrixElement> =
            serde_json::from_str(&response.body).map_err(|err| MatrixError::Decode {
                message: err.to_string(),
            })?;

        Ok(convert_elements(elements, origins.len(), destinations.len()))
    }
}

fn convert_elements(
    elements: Vec<MatrixElement>,
    origin_count: usize,
    destination_count: usize,
) -> Vec<MatrixEntry> {
    elements
        .into_iter()
        .filter_map(|element| {
            if element.origin_index >= origin_count || element.destination_index >= destination_count
            {
                warn!(
                    origin = element.origin_index,
                    destination = element.destination_index,
                    "route matrix element out of range, skipping"
                );
                return None;
            }
            Some(MatrixEntry {
                origin: element.origin_index,
                destination: element.destination_index,
                duration_secs: parse_duration_secs(element.duration.as_deref()),
            })
        })
        .collect()
}

/// Parse a `"123s"` duration. Anything else counts as zero seconds.
fn parse_duration_secs(raw: Option<&str>) -> u64 {
    let parsed = raw.and_then(|value| value.strip_suffix('s').unwrap_or(value).parse::<u64>().ok());
    match parsed {
        Some(secs) => secs,
        None => {
            warn!(raw = ?raw, "unparsable route duration, treating as 0s");
            0
        }
    }
}

/// Pull `error.message` out of an error body, falling back to the raw text.
fn error_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|value| {
            value
                .pointer("/error/message")
                .and_then(Value::as_str)
                .map(str::to_owned)
        })
        .unwrap_or_else(|| body.to_string())
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct MatrixRequestBody {
    origins: Vec<RouteMatrixWaypoint>,
    destinations: Vec<RouteMatrixWaypoint>,
    travel_mode: TravelMode,
}

#[derive(Debug, Serialize)]
struct RouteMatrixWaypoint {
    waypoint: Waypoint,
}

#[derive(Debug, Serialize)]
struct Waypoint {
    location: Location,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Location {
    lat_lng: Coordinate,
}

impl From<&Coordinate> for RouteMatrixWaypoint {
    fn from(coordinate: &Coordinate) -> Self {
        Self {
            waypoint: Waypoint {
                location: Location {
                    lat_lng: *coordinate,
                },
            },
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MatrixElement {
    #[serde(default)]
    origin_index: usize,
    #[serde(default)]
    destination_index: usize,
    duration: Option<String>,
}
