//! HTTP route matrix provider tests against a local one-shot server.
//!
//! The server answers a single request with a canned response and hands the
//! raw request back to the test for inspection.

use std::io::{BufRead, BufReader, Read, Write};
use std::net::TcpListener;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use itinerary_optimizer::error::TransportError;
use itinerary_optimizer::throttled::{JsonRequest, JsonResponse, Transport};
use itinerary_optimizer::traits::MatrixEntry;
use itinerary_optimizer::{
    Coordinate, DistanceMatrixProvider, MatrixError, RateLimitConfig, RateLimiter,
    RouteMatrixProvider, RoutesApiConfig, TravelMode,
};

/// Captured request: header lines and body.
struct Captured {
    head: Vec<String>,
    body: String,
}

/// Serve one request with `status` and `body`; returns the base URL and a
/// receiver for the captured request.
fn one_shot_server(status: u16, body: &'static str) -> (String, mpsc::Receiver<Captured>) {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind local port");
    let address = listener.local_addr().expect("local address");
    let (sender, receiver) = mpsc::channel();

    thread::spawn(move || {
        let (stream, _) = listener.accept().expect("accept connection");
        let mut reader = BufReader::new(stream.try_clone().expect("clone stream"));

        let mut head = Vec::new();
        let mut content_length = 0usize;
        loop {
            let mut line = String::new();
            reader.read_line(&mut line).expect("read request line");
            let line = line.trim_end().to_string();
            if line.is_empty() {
                break;
            }
            if let Some((name, value)) = line.split_once(':') {
                if name.eq_ignore_ascii_case("content-length") {
                    content_length = value.trim().parse().expect("content length");
                }
            }
            head.push(line);
        }

        let mut request_body = vec![0u8; content_length];
        reader.read_exact(&mut request_body).expect("read body");

        let reason = if status == 200 { "OK" } else { "Error" };
        let response = format!(
            "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status,
            reason,
            body.len(),
            body
        );
        let mut stream = stream;
        stream.write_all(response.as_bytes()).expect("write response");
        stream.flush().expect("flush response");

        let _ = sender.send(Captured {
            head,
            body: String::from_utf8_lossy(&request_body).into_owned(),
        });
    });

    (format!("http://{}", address), receiver)
}

fn provider(base_url: &str) -> RouteMatrixProvider {
    let config = RoutesApiConfig::new("test-key")
        .with_base_url(base_url)
        .with_timeout(Duration::from_secs(5));
    let limiter = RateLimiter::new(RateLimitConfig::new("routes", 5, Duration::from_secs(1)));
    RouteMatrixProvider::new(config, limiter).expect("build provider")
}

fn coords(count: usize) -> Vec<Coordinate> {
    (0..count)
        .map(|i| Coordinate::new(35.0 + i as f64 * 0.01, 135.75))
        .collect()
}

#[test]
fn test_fetches_matrix_over_http() {
    let (base_url, captured) = one_shot_server(
        200,
        r#"[{"destinationIndex":1,"duration":"300s"},{"originIndex":1,"duration":"310s"}]"#,
    );

    let entries = provider(&base_url)
        .route_matrix(&coords(2), &coords(2), TravelMode::Bicycle, None)
        .expect("matrix");

    assert_eq!(
        entries,
        vec![
            MatrixEntry { origin: 0, destination: 1, duration_secs: 300 },
            MatrixEntry { origin: 1, destination: 0, duration_secs: 310 },
        ]
    );

    let request = captured
        .recv_timeout(Duration::from_secs(5))
        .expect("captured request");
    assert!(request.head[0].starts_with("POST /distanceMatrix/v2:computeRouteMatrix"));
    assert!(
        request
            .head
            .iter()
            .any(|line| line.eq_ignore_ascii_case("x-goog-api-key: test-key"))
    );

    let body: serde_json::Value = serde_json::from_str(&request.body).expect("json body");
    assert_eq!(body["travelMode"], "BICYCLE");
    assert_eq!(body["origins"].as_array().map(Vec::len), Some(2));
}

#[test]
fn test_http_error_is_external_service_error() {
    let (base_url, _captured) = one_shot_server(
        429,
        r#"{"error":{"code":429,"message":"Quota exceeded"}}"#,
    );

    let err = provider(&base_url)
        .route_matrix(&coords(1), &coords(3), TravelMode::Walk, None)
        .expect_err("quota error");

    assert_eq!(
        err,
        MatrixError::ExternalService {
            status: 429,
            message: "Quota exceeded".to_string(),
        }
    );
}

#[test]
fn test_unreachable_service_is_transport_error() {
    // Bind and drop to get a port with nothing listening.
    let address = TcpListener::bind("127.0.0.1:0")
        .and_then(|listener| listener.local_addr())
        .expect("local address");

    let err = provider(&format!("http://{}", address))
        .route_matrix(&coords(1), &coords(1), TravelMode::Walk, None)
        .expect_err("nothing listening");

    assert!(matches!(err, MatrixError::Transport(_)));
}

/// Counts calls without touching the network.
struct CountingTransport {
    calls: std::cell::Cell<usize>,
}

impl Transport for CountingTransport {
    fn post_json(&self, _request: &JsonRequest) -> Result<JsonResponse, TransportError> {
        self.calls.set(self.calls.get() + 1);
        Ok(JsonResponse {
            status: 200,
            body: "[]".to_string(),
        })
    }
}

#[test]
fn test_oversized_request_never_reaches_transport() {
    let provider = RouteMatrixProvider::with_transport(
        RoutesApiConfig::new("test-key"),
        CountingTransport {
            calls: std::cell::Cell::new(0),
        },
        RateLimiter::new(RateLimitConfig::default()),
    );

    let err = provider
        .route_matrix(&coords(8), &coords(8), TravelMode::Walk, None)
        .expect_err("too many elements");
    assert!(matches!(err, MatrixError::TooManyElements { .. }));

    provider
        .route_matrix(&coords(7), &coords(7), TravelMode::Walk, None)
        .expect("at the limit");
    assert_eq!(provider_calls(&provider), 1);
}

fn provider_calls(provider: &RouteMatrixProvider<CountingTransport>) -> usize {
    provider.transport().calls.get()
}
