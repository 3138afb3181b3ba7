//! Fixed-window request rate limiting.
//!
//! Each client (keyed by peer IP) gets a budget of `max_requests` per
//! `window`. The window opens on the client's first request and resets once
//! it has fully elapsed. Requests over budget are answered with
//! `429 Too Many Requests` and a `Retry-After` header before they reach a
//! handler. While limiting is on, every response carries
//! `X-RateLimit-Limit`, `X-RateLimit-Remaining` and `X-RateLimit-Reset`
//! (epoch seconds at which the window resets).
//!
//! Requests whose peer address is unknown (for example when the router is
//! driven directly in tests) share a single bucket.

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use axum::extract::{ConnectInfo, Request, State};
use axum::http::{HeaderMap, HeaderName, HeaderValue};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use tokio::sync::Mutex;

use crate::error::ApiError;
use crate::state::AppState;

/// Default request budget per client per window.
pub const DEFAULT_MAX_REQUESTS: u32 = 120;

/// Default window length in seconds.
pub const DEFAULT_WINDOW_SECS: u64 = 60;

/// Table size above which expired windows are swept, at most once per window.
const PRUNE_THRESHOLD: usize = 1024;

/// Request budget of the current window.
pub static X_RATELIMIT_LIMIT: HeaderName = HeaderName::from_static("x-ratelimit-limit");

/// Requests left in the current window.
pub static X_RATELIMIT_REMAINING: HeaderName = HeaderName::from_static("x-ratelimit-remaining");

/// Epoch second at which the current window resets.
pub static X_RATELIMIT_RESET: HeaderName = HeaderName::from_static("x-ratelimit-reset");

/// Rate-limit settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitConfig {
    /// Requests allowed per client per window. `0` disables limiting.
    pub max_requests: u32,
    /// Length of one window.
    pub window: Duration,
}

impl RateLimitConfig {
    /// A config allowing `max_requests` per `window`.
    pub const fn new(max_requests: u32, window: Duration) -> Self {
        Self {
            max_requests,
            window,
        }
    }

    /// A config that lets every request through.
    pub const fn disabled() -> Self {
        Self::new(0, Duration::from_secs(DEFAULT_WINDOW_SECS))
    }

    /// Whether limiting is switched on.
    pub const fn is_enabled(&self) -> bool {
        self.max_requests > 0
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_REQUESTS, Duration::from_secs(DEFAULT_WINDOW_SECS))
    }
}

/// Outcome of a rate-limit check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// The request fits in the current window.
    Allowed {
        /// Requests left in the window after this one.
        remaining: u32,
        /// Time until the window resets.
        reset_after: Duration,
    },
    /// The window's budget is spent.
    Limited {
        /// Time until the window resets.
        retry_after: Duration,
    },
}

/// Per-client request counter for the current window.
#[derive(Debug, Clone, Copy)]
struct Window {
    started: Instant,
    count: u32,
}

/// Client windows plus the earliest time the next sweep may run.
#[derive(Debug, Default)]
struct WindowTable {
    windows: HashMap<Option<IpAddr>, Window>,
    next_sweep: Option<Instant>,
}

impl WindowTable {
    /// Drop expired windows once the table is large. Runs at most once per
    /// `period`.
    fn sweep_if_due(&mut self, now: Instant, period: Duration) {
        if self.windows.len() <= PRUNE_THRESHOLD {
            return;
        }
        if self.next_sweep.is_some_and(|at| now < at) {
            return;
        }
        let before = self.windows.len();
        self.windows
            .retain(|_, w| now.saturating_duration_since(w.started) < period);
        self.next_sweep = now.checked_add(period);
        tracing::debug!(
            before,
            after = self.windows.len(),
            "Swept expired rate-limit windows"
        );
    }
}

/// Fixed-window limiter shared by all request handlers.
#[derive(Debug)]
pub struct RateLimiter {
    config: RateLimitConfig,
    table: Mutex<WindowTable>,
}

impl RateLimiter {
    /// Create a limiter with the given settings.
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            config,
            table: Mutex::new(WindowTable::default()),
        }
    }

    /// The limiter's settings.
    pub const fn config(&self) -> RateLimitConfig {
        self.config
    }

    /// Count a request from `client` against its current window.
    pub async fn check(&self, client: Option<IpAddr>) -> Decision {
        self.check_at(client, Instant::now()).await
    }

    /// Count a request from `client` as if it arrived at `now`.
    pub async fn check_at(&self, client: Option<IpAddr>, now: Instant) -> Decision {
        let max = self.config.max_requests;
        let period = self.config.window;
        if max == 0 {
            return Decision::Allowed {
                remaining: u32::MAX,
                reset_after: period,
            };
        }

        let mut table = self.table.lock().await;
        table.sweep_if_due(now, period);

        let window = table.windows.entry(client).or_insert(Window {
            started: now,
            count: 0,
        });

        let elapsed = now.saturating_duration_since(window.started);
        if elapsed >= period {
            window.started = now;
            window.count = 0;
        }

        let reset_after = period.saturating_sub(now.saturating_duration_since(window.started));
        if window.count >= max {
            return Decision::Limited {
                retry_after: reset_after,
            };
        }

        window.count = window.count.saturating_add(1);
        Decision::Allowed {
            remaining: max.saturating_sub(window.count),
            reset_after,
        }
    }

    /// Number of clients currently tracked.
    pub async fn tracked_clients(&self) -> usize {
        self.table.lock().await.windows.len()
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(RateLimitConfig::default())
    }
}

/// Axum middleware applying the shared [`RateLimiter`] to every request.
pub async fn enforce(State(state): State<Arc<AppState>>, request: Request, next: Next) -> Response {
    let client = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip());

    let limiter = &state.rate_limiter;
    if !limiter.config().is_enabled() {
        return next.run(request).await;
    }
    let limit = limiter.config().max_requests;

    match limiter.check(client).await {
        Decision::Allowed {
            remaining,
            reset_after,
        } => {
            let mut response = next.run(request).await;
            insert_status_headers(response.headers_mut(), limit, remaining, reset_after);
            response
        }
        Decision::Limited { retry_after } => {
            tracing::warn!(
                client = ?client,
                retry_after_secs = retry_after.as_secs(),
                "Rate limit exceeded"
            );
            let mut response = ApiError::RateLimited {
                retry_after_secs: whole_seconds(retry_after),
            }
            .into_response();
            insert_status_headers(response.headers_mut(), limit, 0, retry_after);
            response
        }
    }
}

/// Attach the `X-RateLimit-*` status headers.
fn insert_status_headers(
    headers: &mut HeaderMap,
    limit: u32,
    remaining: u32,
    reset_after: Duration,
) {
    headers.insert(X_RATELIMIT_LIMIT.clone(), HeaderValue::from(limit));
    headers.insert(X_RATELIMIT_REMAINING.clone(), HeaderValue::from(remaining));
    if let Some(reset) = reset_epoch_secs(SystemTime::now(), reset_after) {
        headers.insert(X_RATELIMIT_RESET.clone(), HeaderValue::from(reset));
    }
}

/// Epoch second at which a window ending `reset_after` from `now` resets.
fn reset_epoch_secs(now: SystemTime, reset_after: Duration) -> Option<u64> {
    let at = now.checked_add(reset_after)?.duration_since(UNIX_EPOCH).ok()?;
    Some(whole_seconds(at))
}

/// Round a duration up to whole seconds, never below one.
fn whole_seconds(d: Duration) -> u64 {
    let secs = if d.subsec_nanos() > 0 {
        d.as_secs().saturating_add(1)
    } else {
        d.as_secs()
    };
    secs.max(1)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::arithmetic_side_effects)]
mod tests {
    use std::net::Ipv4Addr;

    use super::*;

    fn ip(last: u8) -> Option<IpAddr> {
        Some(IpAddr::V4(Ipv4Addr::new(10, 0, 0, last)))
    }

    #[tokio::test]
    async fn allows_up_to_budget_then_limits() {
        let limiter = RateLimiter::new(RateLimitConfig::new(3, Duration::from_secs(60)));
        let t0 = Instant::now();

        assert_eq!(
            limiter.check_at(ip(1), t0).await,
            Decision::Allowed {
                remaining: 2,
                reset_after: Duration::from_secs(60)
            }
        );
        assert_eq!(
            limiter.check_at(ip(1), t0).await,
            Decision::Allowed {
                remaining: 1,
                reset_after: Duration::from_secs(60)
            }
        );
        assert_eq!(
            limiter.check_at(ip(1), t0).await,
            Decision::Allowed {
                remaining: 0,
                reset_after: Duration::from_secs(60)
            }
        );

        let later = t0 + Duration::from_secs(20);
        assert_eq!(
            limiter.check_at(ip(1), later).await,
            Decision::Limited {
                retry_after: Duration::from_secs(40)
            }
        );
    }

    #[tokio::test]
    async fn window_resets_after_period() {
        let limiter = RateLimiter::new(RateLimitConfig::new(1, Duration::from_secs(60)));
        let t0 = Instant::now();

        assert!(matches!(
            limiter.check_at(ip(1), t0).await,
            Decision::Allowed { .. }
        ));
        assert!(matches!(
            limiter.check_at(ip(1), t0 + Duration::from_secs(59)).await,
            Decision::Limited { .. }
        ));
        assert!(matches!(
            limiter.check_at(ip(1), t0 + Duration::from_secs(60)).await,
            Decision::Allowed { .. }
        ));
    }

    #[tokio::test]
    async fn clients_have_independent_budgets() {
        let limiter = RateLimiter::new(RateLimitConfig::new(1, Duration::from_secs(60)));
        let t0 = Instant::now();

        assert!(matches!(
            limiter.check_at(ip(1), t0).await,
            Decision::Allowed { .. }
        ));
        assert!(matches!(
            limiter.check_at(ip(2), t0).await,
            Decision::Allowed { .. }
        ));
        assert!(matches!(
            limiter.check_at(ip(1), t0).await,
            Decision::Limited { .. }
        ));
        assert_eq!(limiter.tracked_clients().await, 2);
    }

    #[tokio::test]
    async fn disabled_limiter_never_limits() {
        let limiter = RateLimiter::new(RateLimitConfig::disabled());
        assert!(!limiter.config().is_enabled());
        for _ in 0..1000 {
            assert!(matches!(
                limiter.check(None).await,
                Decision::Allowed { .. }
            ));
        }
        assert_eq!(limiter.tracked_clients().await, 0);
    }

    #[tokio::test]
    async fn expired_windows_are_pruned_when_table_grows() {
        let limiter = RateLimiter::new(RateLimitConfig::new(5, Duration::from_secs(1)));
        let t0 = Instant::now();

        for i in 0..=PRUNE_THRESHOLD {
            let addr = IpAddr::V6(std::net::Ipv6Addr::from(u128::try_from(i).unwrap()));
            limiter.check_at(Some(addr), t0).await;
        }
        assert_eq!(limiter.tracked_clients().await, PRUNE_THRESHOLD + 1);

        limiter.check_at(ip(1), t0 + Duration::from_secs(2)).await;
        assert_eq!(limiter.tracked_clients().await, 1);
    }

    #[tokio::test]
    async fn sweep_runs_at_most_once_per_window() {
        let limiter = RateLimiter::new(RateLimitConfig::new(5, Duration::from_secs(10)));
        let t0 = Instant::now();
        let v6 = |i: usize| Some(IpAddr::V6(std::net::Ipv6Addr::from(u128::try_from(i).unwrap())));

        // Older half at t0, newer half at t0 + 5s. The first sweep fires
        // while the newer half is being added and finds nothing expired.
        for i in 0..600 {
            limiter.check_at(v6(i), t0).await;
        }
        for i in 600..1200 {
            limiter.check_at(v6(i), t0 + Duration::from_secs(5)).await;
        }
        assert_eq!(limiter.tracked_clients().await, 1200);

        // The older half has expired, but the last sweep was under a
        // window ago, so nothing is scanned.
        limiter.check_at(ip(1), t0 + Duration::from_secs(12)).await;
        assert_eq!(limiter.tracked_clients().await, 1201);
        limiter.check_at(ip(2), t0 + Duration::from_secs(14)).await;
        assert_eq!(limiter.tracked_clients().await, 1202);

        // A window after the first sweep, everything stale goes at once.
        limiter.check_at(ip(3), t0 + Duration::from_secs(16)).await;
        assert_eq!(limiter.tracked_clients().await, 3);
    }

    #[test]
    fn reset_is_reported_in_epoch_seconds() {
        let now = UNIX_EPOCH + Duration::from_millis(1_700_000_000_250);
        assert_eq!(
            reset_epoch_secs(now, Duration::from_secs(30)),
            Some(1_700_000_031)
        );
    }

    #[test]
    fn retry_after_rounds_up() {
        assert_eq!(whole_seconds(Duration::from_millis(1500)), 2);
        assert_eq!(whole_seconds(Duration::from_secs(3)), 3);
        assert_eq!(whole_seconds(Duration::ZERO), 1);
    }
}
