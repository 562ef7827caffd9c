// Route exports
pub mod inquiries;
pub mod reviews;

use actix_web::body::{BoxBody, MessageBody};
use actix_web::dev::{ServiceRequest, ServiceResponse};
use actix_web::middleware::Next;
use actix_web::{web, HttpResponse, Responder};
use std::sync::Arc;

use crate::models::{ErrorResponse, HealthResponse};
use crate::services::{MailRelay, RateLimiter, ReviewStore};

/// Application state shared across all handlers
///
/// The mail relay and the review store are optional: when credentials
/// are missing at startup the matching feature degrades instead of
/// keeping the whole service down.
#[derive(Clone)]
pub struct AppState {
    pub mailer: Option<Arc<dyn MailRelay>>,
    pub store: Option<Arc<dyn ReviewStore>>,
    pub limiter: Arc<RateLimiter>,
}

/// Configure all routes
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check));
    inquiries::configure(cfg);
    reviews::configure(cfg);
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let status = if state.mailer.is_some() && state.store.is_some() {
        "healthy"
    } else {
        "degraded"
    };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// Per-client quota applied ahead of the form handlers
///
/// Wrapped around the POST resources via `middleware::from_fn`. A client
/// over its window quota gets a 429 with a Retry-After header and the
/// handler never runs.
pub async fn rate_limit_guard(
    req: ServiceRequest,
    next: Next<impl MessageBody + 'static>,
) -> Result<ServiceResponse<BoxBody>, actix_web::Error> {
    let limiter = req
        .app_data::<web::Data<AppState>>()
        .map(|state| state.limiter.clone());

    if let Some(limiter) = limiter {
        let client = req
            .connection_info()
            .realip_remote_addr()
            .unwrap_or("unknown")
            .to_string();

        let decision = limiter.check(&client);
        if !decision.allowed {
            tracing::warn!("Rate limit exceeded for {} on {}", client, req.path());
            let response = HttpResponse::TooManyRequests()
                .insert_header(("Retry-After", decision.retry_after_secs.to_string()))
                .json(ErrorResponse::new("Too many requests, please try again later"));
            return Ok(req.into_response(response));
        }
    }

    next.call(req)
        .await
        .map(ServiceResponse::map_into_boxed_body)
}
