use axum::{
    body::Body,
    http::{Request, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use governor::{
    clock::DefaultClock,
    state::{InMemoryState, NotKeyed},
    Quota, RateLimiter,
};
use std::{env, future::Future, num::NonZeroU32, pin::Pin, sync::Arc};
use tower::{Layer, Service};

use crate::modules::auth::schema::ErrorResponse;

pub type GlobalRateLimiter = Arc<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>;

/// Two tiers: a general quota for the whole surface and a tighter one for
/// the auth endpoints (login, OTP request/verify), which are the ones worth
/// brute-forcing.
#[derive(Debug, Clone, PartialEq)]
pub struct RateLimitSettings {
    pub general_burst: u32,
    pub general_per_minute: u32,
    pub auth_burst: u32,
    pub auth_per_minute: u32,
}

impl Default for RateLimitSettings {
    fn default() -> Self {
        Self {
            general_burst: 100,
            general_per_minute: 60,
            auth_burst: 25,
            auth_per_minute: 5,
        }
    }
}

impl RateLimitSettings {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            general_burst: env_u32("RATE_LIMIT_GENERAL_BURST", defaults.general_burst),
            general_per_minute: env_u32(
                "RATE_LIMIT_GENERAL_PER_MINUTE",
                defaults.general_per_minute,
            ),
            auth_burst: env_u32("RATE_LIMIT_AUTH_BURST", defaults.auth_burst),
            auth_per_minute: env_u32("RATE_LIMIT_AUTH_PER_MINUTE", defaults.auth_per_minute),
        }
    }

    pub fn general_limiter(&self) -> GlobalRateLimiter {
        create_rate_limiter(self.general_per_minute, self.general_burst)
    }

    pub fn auth_limiter(&self) -> GlobalRateLimiter {
        create_rate_limiter(self.auth_per_minute, self.auth_burst)
    }
}

fn env_u32(key: &str, default: u32) -> u32 {
    env::var(key)
        .ok()
        .and_then(|raw| raw.parse().ok())
        .filter(|v| *v > 0)
        .unwrap_or(default)
}

pub fn create_rate_limiter(per_minute: u32, burst: u32) -> GlobalRateLimiter {
    let per_minute = NonZeroU32::new(per_minute.max(1)).unwrap();
    let burst = NonZeroU32::new(burst.max(1)).unwrap();
    let quota = Quota::per_minute(per_minute).allow_burst(burst);
    Arc::new(RateLimiter::direct(quota))
}

#[derive(Clone)]
pub struct RateLimitLayer {
    limiter: GlobalRateLimiter,
}

impl RateLimitLayer {
    pub fn new(limiter: GlobalRateLimiter) -> Self {
        Self { limiter }
    }
}

impl<S> Layer<S> for RateLimitLayer {
    type Service = RateLimitService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        RateLimitService {
            inner,
            limiter: self.limiter.clone(),
        }
    }
}

#[derive(Clone)]
pub struct RateLimitService<S> {
    inner: S,
    limiter: GlobalRateLimiter,
}

impl<S> Service<Request<Body>> for RateLimitService<S>
where
    S: Service<Request<Body>, Response = Response> + Clone + Send + 'static,
    S::Future: Send,
{
    type Response = Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut std::task::Context<'_>) -> std::task::Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, request: Request<Body>) -> Self::Future {
        let limiter = self.limiter.clone();
        let mut inner = self.inner.clone();

        Box::pin(async move {
            if limiter.check().is_err() {
                // Same JSON error shape as every other failure on the surface.
                return Ok((
                    StatusCode::TOO_MANY_REQUESTS,
                    Json(ErrorResponse::new("Too many requests, please try again later")),
                )
                    .into_response());
            }
            inner.call(request).await
        })
    }
}
