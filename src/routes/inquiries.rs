use actix_web::middleware::from_fn;
use actix_web::{web, HttpResponse, Responder};

use crate::models::{ErrorResponse, InquiryForm, StatusResponse};
use crate::routes::{rate_limit_guard, AppState};

/// Configure inquiry routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/send")
            .wrap(from_fn(rate_limit_guard))
            .route(web::post().to(send_inquiry)),
    );
}

/// Contact form endpoint
///
/// POST /send
///
/// Form fields: `name`, `phone`, `question`, plus the hidden `hp-field`
/// honeypot. The visible fields are not required; whatever arrives is
/// formatted into the fixed plain-text template and handed to the mail
/// relay exactly once.
async fn send_inquiry(state: web::Data<AppState>, form: web::Form<InquiryForm>) -> impl Responder {
    let form = form.into_inner();

    if !form.honeypot.trim().is_empty() {
        tracing::warn!("Honeypot field filled on /send, dropping submission");
        return HttpResponse::BadRequest().json(ErrorResponse::new("Submission rejected"));
    }

    let mailer = match &state.mailer {
        Some(mailer) => mailer,
        None => {
            tracing::warn!("Mail relay not configured, dropping inquiry");
            return HttpResponse::InternalServerError()
                .json(ErrorResponse::new("Mail delivery is not configured"));
        }
    };

    let message = form.into_message();

    match mailer.deliver(message.subject(), &message.body()).await {
        Ok(()) => {
            tracing::info!("Inquiry email delivered");
            HttpResponse::Ok().json(StatusResponse::success())
        }
        Err(e) => {
            tracing::error!("Failed to deliver inquiry email: {}", e);
            HttpResponse::InternalServerError()
                .json(ErrorResponse::new("Failed to send message"))
        }
    }
}
