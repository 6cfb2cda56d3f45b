//! In-memory `CatalogSource` for unit tests.

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use reqwest::StatusCode;
use serde_json::Value;

use crate::params::Params;
use crate::source::{CatalogSource, validate_endpoint};
use crate::TransportError;

struct Route {
    path: String,
    when: Option<(String, String)>,
    delay: Duration,
    reply: Result<Value, StatusCode>,
}

/// Replies with canned JSON per path, recording every call.
/// Routes match in insertion order; unmatched paths answer 404.
pub(crate) struct ScriptedSource {
    routes: Vec<Route>,
    calls: Mutex<Vec<(String, Params)>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl ScriptedSource {
    pub(crate) fn new() -> Self {
        Self {
            routes: Vec::new(),
            calls: Mutex::new(Vec::new()),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        }
    }

    pub(crate) fn ok(mut self, path: &str, body: Value) -> Self {
        self.routes.push(Route {
            path: path.to_string(),
            when: None,
            delay: Duration::ZERO,
            reply: Ok(body),
        });
        self
    }

    pub(crate) fn fail(mut self, path: &str, status: StatusCode) -> Self {
        self.routes.push(Route {
            path: path.to_string(),
            when: None,
            delay: Duration::ZERO,
            reply: Err(status),
        });
        self
    }

    /// Restrict the last route to calls where `key` renders as `value`.
    pub(crate) fn when(mut self, key: &str, value: &str) -> Self {
        if let Some(route) = self.routes.last_mut() {
            route.when = Some((key.to_string(), value.to_string()));
        }
        self
    }

    /// Delay the last route's reply.
    pub(crate) fn delay(mut self, delay: Duration) -> Self {
        if let Some(route) = self.routes.last_mut() {
            route.delay = delay;
        }
        self
    }

    pub(crate) fn calls(&self) -> Vec<(String, Params)> {
        self.calls.lock().unwrap().clone()
    }

    pub(crate) fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub(crate) fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    fn find(&self, path: &str, params: &Params) -> Option<&Route> {
        self.routes.iter().find(|r| {
            r.path == path
                && r.when.as_ref().is_none_or(|(k, v)| {
                    params.get(k).map(|p| p.render()).as_deref() == Some(v.as_str())
                })
        })
    }
}

#[async_trait::async_trait]
impl CatalogSource for ScriptedSource {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn request(&self, path: &str, params: &Params) -> Result<Value, TransportError> {
        validate_endpoint(path)?;
        self.calls
            .lock()
            .unwrap()
            .push((path.to_string(), params.clone()));

        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        let (delay, reply) = match self.find(path, params) {
            Some(route) => (route.delay, route.reply.clone()),
            None => (Duration::ZERO, Err(StatusCode::NOT_FOUND)),
        };
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        reply.map_err(TransportError::Status)
    }
}
