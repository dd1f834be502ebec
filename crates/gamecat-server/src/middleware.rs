use std::{
    collections::HashMap,
    net::{IpAddr, Ipv4Addr, SocketAddr},
    sync::Arc,
    time::{Duration, Instant},
};

use axum::{
    extract::{ConnectInfo, Request, State},
    http::{header::RETRY_AFTER, HeaderValue},
    middleware::Next,
    response::{IntoResponse, Response},
};
use gamecat_core::AppConfig;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::api::ApiError;

/// Expired client windows are pruned once more clients than this are tracked.
const PRUNE_THRESHOLD: usize = 10_000;

/// Newtype wrapping a request ID string, stored as a request extension.
#[derive(Debug, Clone)]
pub struct RequestId(pub String);

#[derive(Debug, Clone, Copy)]
struct ClientWindow {
    opened_at: Instant,
    remaining: u32,
}

/// Fixed-window limiter keyed by peer IP.
///
/// A client's first request opens a window with the full allowance. Once the
/// window is older than its length it reopens; until then, an exhausted
/// allowance is rejected with the time left in the window.
#[derive(Debug, Clone)]
pub struct RateLimitState {
    max_calls: u32,
    window: Duration,
    clients: Arc<Mutex<HashMap<IpAddr, ClientWindow>>>,
}

impl RateLimitState {
    #[must_use]
    pub fn new(max_calls: u32, window: Duration) -> Self {
        Self {
            max_calls,
            window,
            clients: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(
            config.rate_limit_max_calls,
            Duration::from_secs(config.rate_limit_window_secs),
        )
    }

    /// Records one call from `client` at `now`.
    ///
    /// Returns `Err(wait)` with the time until the client's window reopens
    /// when its allowance is spent.
    async fn admit(&self, client: IpAddr, now: Instant) -> Result<(), Duration> {
        let mut clients = self.clients.lock().await;

        if clients.len() > PRUNE_THRESHOLD {
            let window = self.window;
            clients.retain(|_, w| now.saturating_duration_since(w.opened_at) <= window);
        }

        let entry = clients.entry(client).or_insert(ClientWindow {
            opened_at: now,
            remaining: self.max_calls,
        });

        let age = now.saturating_duration_since(entry.opened_at);
        if age > self.window {
            *entry = ClientWindow {
                opened_at: now,
                remaining: self.max_calls,
            };
        } else if entry.remaining == 0 {
            return Err(self.window - age);
        }

        entry.remaining = entry.remaining.saturating_sub(1);
        Ok(())
    }
}

/// Axum middleware that extracts or generates a request ID.
///
/// If the incoming request has an `x-request-id` header, that value is used.
/// Otherwise a new `UUIDv4` is generated. The ID is:
/// - Inserted into request extensions as [`RequestId`]
/// - Set on the response as the `x-request-id` header
pub async fn request_id(mut req: Request, next: Next) -> Response {
    let id = req
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .map_or_else(|| Uuid::new_v4().to_string(), String::from);

    req.extensions_mut().insert(RequestId(id.clone()));

    let mut res = next.run(req).await;

    if let Ok(val) = HeaderValue::from_str(&id) {
        res.headers_mut().insert("x-request-id", val);
    }

    res
}

/// Middleware enforcing the per-client call allowance.
///
/// Requests served without connection info (in-process tests) share the
/// unspecified address.
pub async fn enforce_rate_limit(
    State(rate_limit): State<RateLimitState>,
    req: Request,
    next: Next,
) -> Response {
    let client = req
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED), |info| info.0.ip());

    match rate_limit.admit(client, Instant::now()).await {
        Ok(()) => next.run(req).await,
        Err(wait) => {
            let request_id = req
                .extensions()
                .get::<RequestId>()
                .map(|id| id.0.clone())
                .unwrap_or_default();
            tracing::debug!(client = %client, wait_secs = wait.as_secs_f64(), "rate limited");
            rate_limited_response(request_id, wait)
        }
    }
}

fn rate_limited_response(request_id: String, wait: Duration) -> Response {
    let message = format!(
        "You will be able to use this api in {:.2} secs",
        wait.as_secs_f64()
    );
    let mut res = ApiError::new(request_id, "rate_limited", message).into_response();
    let retry_secs = wait.as_secs() + u64::from(wait.subsec_nanos() > 0);
    res.headers_mut()
        .insert(RETRY_AFTER, HeaderValue::from(retry_secs));
    res
}
