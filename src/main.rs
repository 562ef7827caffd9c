mod config;
mod models;
mod routes;
mod services;

use actix_cors::Cors;
use actix_files::Files;
use actix_web::{web, App, HttpServer, HttpResponse, middleware, error, http::StatusCode};
use crate::config::{Settings, StoreBackend};
use crate::routes::AppState;
use crate::services::{FileStore, MailRelay, RateLimiter, ReviewStore, SmtpMailer, SupabaseClient};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn, error};

/// JSON error response for malformed form payloads
#[derive(Debug, serde::Serialize)]
pub struct FormError {
    pub status: String,
    pub message: String,
}

impl std::fmt::Display for FormError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.status, self.message)
    }
}

impl std::error::Error for FormError {}

impl error::ResponseError for FormError {
    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(StatusCode::BAD_REQUEST)
            .content_type("application/json")
            .body(serde_json::to_string(self).unwrap())
    }
}

/// Handle form payload errors
pub fn handle_form_payload_error(
    err: error::UrlencodedError,
    req: &actix_web::HttpRequest,
) -> actix_web::Error {
    tracing::info!("Form payload error on {}: {}", req.path(), err);
    FormError {
        status: "error".to_string(),
        message: format!("Invalid form data: {}", err),
    }
    .into()
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    // Initialize logging
    let log_level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| "json".to_string());

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with_target(false)
        .with_level(true);

    if log_format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.init();
    }

    info!("Starting landing-api service...");

    // Load configuration
    let settings = Settings::load().unwrap_or_else(|e| {
        error!("Failed to load configuration: {}", e);
        panic!("Configuration error: {}", e);
    });

    info!("Configuration loaded successfully");

    if settings.session.secret_key.is_none() {
        warn!("SECRET_KEY not configured");
    }

    // Initialize mail relay (optional - inquiries degrade without it)
    let mailer: Option<Arc<dyn MailRelay>> = match (&settings.mail.address, &settings.mail.password)
    {
        (Some(address), Some(password)) => {
            match SmtpMailer::new(
                &settings.mail.smtp_host,
                settings.mail.smtp_port,
                address,
                password,
            ) {
                Ok(mailer) => {
                    info!("SMTP mailer initialized ({})", settings.mail.smtp_host);
                    Some(Arc::new(mailer))
                }
                Err(e) => {
                    warn!("Failed to initialize SMTP mailer ({}), inquiries disabled", e);
                    None
                }
            }
        }
        _ => {
            warn!("Email credentials not configured, inquiries disabled");
            None
        }
    };

    // Initialize review store (optional - reviews degrade without it)
    let store: Option<Arc<dyn ReviewStore>> = match settings.store.backend {
        StoreBackend::File => {
            info!("Using flat-file review store at {}", settings.store.file_path);
            Some(Arc::new(FileStore::new(&settings.store.file_path)))
        }
        StoreBackend::Supabase => match (&settings.supabase.url, &settings.supabase.key) {
            (Some(url), Some(key)) => {
                info!("Using Supabase review store (table: {})", settings.supabase.table);
                Some(Arc::new(SupabaseClient::new(
                    url.clone(),
                    key.clone(),
                    settings.supabase.table.clone(),
                )))
            }
            _ => {
                warn!("Supabase credentials not configured, review storage disabled");
                None
            }
        },
    };

    // Initialize the per-client request limiter for the form endpoints
    let limiter = Arc::new(RateLimiter::new(
        settings.rate_limit.max_requests,
        Duration::from_secs(settings.rate_limit.window_secs),
    ));

    info!(
        "Rate limiter initialized ({} requests / {}s)",
        settings.rate_limit.max_requests, settings.rate_limit.window_secs
    );

    // Build application state
    let app_state = AppState {
        mailer,
        store,
        limiter,
    };

    // Configure HTTP server
    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);
    let static_dir = settings.server.static_dir.clone();

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .app_data(web::FormConfig::default().error_handler(handle_form_payload_error))
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .configure(routes::configure_routes)
            // Landing page assets; must come after the API routes
            .service(Files::new("/", static_dir.clone()).index_file("index.html"))
    })
    .workers(workers)
    .bind((host, port))?
    .run()
    .await
}
