//! Local stand-in for the catalogue API, served by axum on an ephemeral port

#![allow(dead_code)]

use axum::{
    Router,
    extract::{Path, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use std::collections::HashMap;
use std::io;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use product_ingest::infrastructure::{HttpClientConfig, ProductApiClient};
use tracing::subscriber::DefaultGuard;
use tracing_subscriber::fmt::MakeWriter;

/// Canned reply for one product id
#[derive(Clone)]
pub struct Fixture {
    pub status: u16,
    pub body: String,
    pub delay: Duration,
}

impl Fixture {
    pub fn json(body: &str) -> Self {
        Self {
            status: 200,
            body: body.to_string(),
            delay: Duration::ZERO,
        }
    }

    pub fn product(title: &str, price: f64) -> Self {
        Self::json(&format!(
            r#"{{"title":"{title}","category":"C","price":{price:?},"description":"D"}}"#
        ))
    }

    pub fn status(status: u16) -> Self {
        Self {
            status,
            body: String::new(),
            delay: Duration::ZERO,
        }
    }

    pub fn raw(status: u16, body: &str) -> Self {
        Self {
            status,
            body: body.to_string(),
            delay: Duration::ZERO,
        }
    }

    #[must_use]
    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

#[derive(Default)]
pub struct ServerStats {
    pub in_flight: AtomicUsize,
    pub max_in_flight: AtomicUsize,
    pub requests: AtomicUsize,
}

struct ServerState {
    fixtures: HashMap<u32, Fixture>,
    stats: Arc<ServerStats>,
}

pub struct FakeCatalogue {
    pub addr: SocketAddr,
    pub stats: Arc<ServerStats>,
}

impl FakeCatalogue {
    /// Serve `fixtures`; ids without a fixture answer 404
    pub async fn start(fixtures: impl IntoIterator<Item = (u32, Fixture)>) -> Self {
        let stats = Arc::new(ServerStats::default());
        let state = Arc::new(ServerState {
            fixtures: fixtures.into_iter().collect(),
            stats: stats.clone(),
        });

        let app = Router::new()
            .route("/products/:id", get(product))
            .with_state(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { addr, stats }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn client(&self) -> ProductApiClient {
        self.client_with(|_| {})
    }

    pub fn client_with(&self, tweak: impl FnOnce(&mut HttpClientConfig)) -> ProductApiClient {
        let mut config = HttpClientConfig {
            base_url: self.base_url(),
            timeout_seconds: 5,
            ..Default::default()
        };
        tweak(&mut config);
        ProductApiClient::new(config).unwrap()
    }
}

async fn product(State(state): State<Arc<ServerState>>, Path(id): Path<u32>) -> Response {
    let stats = &state.stats;
    stats.requests.fetch_add(1, Ordering::SeqCst);
    let now = stats.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
    stats.max_in_flight.fetch_max(now, Ordering::SeqCst);

    let response = match state.fixtures.get(&id) {
        Some(fixture) => {
            if !fixture.delay.is_zero() {
                tokio::time::sleep(fixture.delay).await;
            }
            let status = StatusCode::from_u16(fixture.status).unwrap();
            (
                status,
                [(header::CONTENT_TYPE, "application/json")],
                fixture.body.clone(),
            )
                .into_response()
        }
        None => StatusCode::NOT_FOUND.into_response(),
    };

    stats.in_flight.fetch_sub(1, Ordering::SeqCst);
    response
}

/// An address nothing listens on
pub async fn closed_port_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}

/// Collects formatted log lines for the current thread while the guard lives
#[derive(Clone, Default)]
pub struct LogCapture {
    buffer: Arc<Mutex<Vec<u8>>>,
}

impl LogCapture {
    /// Capture events at `WARN` and above on this thread
    pub fn warnings() -> (Self, DefaultGuard) {
        let capture = Self::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(capture.clone())
            .with_max_level(tracing::Level::WARN)
            .with_ansi(false)
            .without_time()
            .finish();
        let guard = tracing::subscriber::set_default(subscriber);
        (capture, guard)
    }

    pub fn lines(&self) -> Vec<String> {
        let buffer = self.buffer.lock().unwrap();
        String::from_utf8_lossy(&buffer)
            .lines()
            .map(str::to_string)
            .collect()
    }

    pub fn lines_containing(&self, needle: &str) -> Vec<String> {
        self.lines()
            .into_iter()
            .filter(|line| line.contains(needle))
            .collect()
    }
}

impl io::Write for LogCapture {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buffer.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for LogCapture {
    type Writer = Self;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}
