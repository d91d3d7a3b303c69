//! Shared test fixtures for executor tests.

use std::collections::VecDeque;
use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, SystemTime};

use tokio::time::Instant;

use super::{IdGenerator, RetryPolicy};
use crate::config::ClientConfig;
use crate::time::{Clock, Sleeper};
use crate::transport::{HttpClient, HttpRequest, HttpResponse, TransportError};

/// One scripted transport outcome.
pub enum Step {
    /// Answer immediately.
    Respond(HttpResponse),
    /// Fail with a connection error.
    Fail,
    /// Answer after a delay.
    Slow(Duration, HttpResponse),
    /// Never answer.
    Hang,
}

/// Transport that replays a fixed script and records what it was sent.
pub struct ScriptedTransport {
    steps: Mutex<VecDeque<Step>>,
    requests: Mutex<Vec<HttpRequest>>,
    started: Mutex<Vec<Instant>>,
}

impl ScriptedTransport {
    pub fn new(steps: Vec<Step>) -> Arc<Self> {
        Arc::new(Self {
            steps: Mutex::new(steps.into()),
            requests: Mutex::new(Vec::new()),
            started: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn captured_requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Time between the start of consecutive calls.
    pub fn gaps(&self) -> Vec<Duration> {
        self.started
            .lock()
            .unwrap()
            .windows(2)
            .map(|pair| pair[1] - pair[0])
            .collect()
    }

    fn next_step(&self, req: HttpRequest) -> Step {
        self.requests.lock().unwrap().push(req);
        self.started.lock().unwrap().push(Instant::now());
        self.steps
            .lock()
            .unwrap()
            .pop_front()
            .expect("transport called more often than scripted")
    }
}

impl HttpClient for Arc<ScriptedTransport> {
    async fn request(&self, req: HttpRequest) -> Result<HttpResponse, TransportError> {
        match self.next_step(req) {
            Step::Respond(response) => Ok(response),
            Step::Fail => Err(TransportError::connection("connection refused")),
            Step::Slow(delay, response) => {
                tokio::time::sleep(delay).await;
                Ok(response)
            }
            Step::Hang => std::future::pending().await,
        }
    }
}

pub fn ok(body: &serde_json::Value) -> Step {
    Step::Respond(HttpResponse::json(http::StatusCode::OK, body))
}

/// Response with the given status and an empty JSON object body.
pub fn status(code: u16) -> Step {
    raw(code, "{}")
}

pub fn status_with_retry_after(code: u16, retry_after: &str) -> Step {
    let mut headers = http::HeaderMap::new();
    headers.insert(
        http::header::RETRY_AFTER,
        http::HeaderValue::from_str(retry_after).unwrap(),
    );
    Step::Respond(HttpResponse::new(
        http::StatusCode::from_u16(code).unwrap(),
        headers,
        b"{}".to_vec(),
    ))
}

pub fn raw(code: u16, body: &str) -> Step {
    Step::Respond(HttpResponse::new(
        http::StatusCode::from_u16(code).unwrap(),
        http::HeaderMap::new(),
        body.as_bytes().to_vec(),
    ))
}

/// Sleeper backed by tokio time that counts timers still alive.
///
/// A timer is live from the moment it is created until it completes or is
/// dropped.
#[derive(Debug, Clone, Default)]
pub struct TrackingSleeper {
    live: Arc<AtomicUsize>,
    created: Arc<AtomicUsize>,
}

impl TrackingSleeper {
    pub fn pending(&self) -> usize {
        self.live.load(Ordering::SeqCst)
    }

    pub fn created(&self) -> usize {
        self.created.load(Ordering::SeqCst)
    }
}

struct LiveGuard(Arc<AtomicUsize>);

impl Drop for LiveGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

impl Sleeper for TrackingSleeper {
    fn sleep(&self, duration: Duration) -> impl Future<Output = ()> + Send {
        self.created.fetch_add(1, Ordering::SeqCst);
        self.live.fetch_add(1, Ordering::SeqCst);
        let guard = LiveGuard(Arc::clone(&self.live));
        async move {
            let _guard = guard;
            tokio::time::sleep(duration).await;
        }
    }
}

/// Generates `key-1`, `key-2`, ...
#[derive(Debug, Default)]
pub struct SequentialIds {
    next: AtomicUsize,
}

impl SequentialIds {
    pub fn generated(&self) -> usize {
        self.next.load(Ordering::SeqCst)
    }
}

impl IdGenerator for Arc<SequentialIds> {
    fn generate(&self) -> String {
        let n = self.next.fetch_add(1, Ordering::SeqCst) + 1;
        format!("key-{n}")
    }
}

/// Clock pinned to a fixed instant.
pub struct FixedClock(pub SystemTime);

impl Clock for FixedClock {
    fn now(&self) -> SystemTime {
        self.0
    }
}

/// Config with a 100ms initial delay, doubling, and no jitter.
pub fn test_config() -> ClientConfig {
    ClientConfig::new("https://api.example.com", "acc_test", "tok_test")
        .unwrap()
        .with_retry_policy(
            RetryPolicy::new()
                .with_initial_delay(Duration::from_millis(100))
                .with_multiplier(2.0)
                .with_max_jitter(Duration::ZERO),
        )
}
