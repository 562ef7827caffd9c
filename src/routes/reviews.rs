use actix_web::middleware::from_fn;
use actix_web::{web, HttpResponse, Responder};
use validator::Validate;

use crate::models::{ErrorResponse, RatingError, Review, ReviewCreatedResponse, ReviewForm};
use crate::routes::{rate_limit_guard, AppState};

/// Configure review routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/submit-review")
            .wrap(from_fn(rate_limit_guard))
            .route(web::post().to(submit_review)),
    );
    cfg.route("/get-reviews", web::get().to(get_reviews));
}

/// Review submission endpoint
///
/// POST /submit-review
///
/// Form fields: `reviewName`, `reviewComment`, `rating` (all required),
/// plus the hidden `hp-field` honeypot. The rating must be an integer
/// between 1 and 5; anything else is rejected before the store is
/// touched.
async fn submit_review(state: web::Data<AppState>, form: web::Form<ReviewForm>) -> impl Responder {
    let form = form.into_inner();

    if !form.honeypot.trim().is_empty() {
        tracing::warn!("Honeypot field filled on /submit-review, dropping submission");
        return HttpResponse::BadRequest().json(ErrorResponse::new("Submission rejected"));
    }

    // Validate request
    if let Err(errors) = form.validate() {
        tracing::info!("Validation failed for review submission: {:?}", errors);
        return HttpResponse::BadRequest().json(ErrorResponse::new("All fields are required"));
    }

    let rating = match form.parse_rating() {
        Ok(rating) => rating,
        Err(RatingError::NotAnInteger) => {
            tracing::info!("Rejected review with non-integer rating: {:?}", form.rating);
            return HttpResponse::BadRequest()
                .json(ErrorResponse::new("Rating must be a whole number"));
        }
        Err(RatingError::OutOfRange) => {
            tracing::info!("Rejected review with out-of-range rating: {}", form.rating);
            return HttpResponse::BadRequest()
                .json(ErrorResponse::new("Rating must be between 1 and 5"));
        }
    };

    let store = match &state.store {
        Some(store) => store,
        None => {
            tracing::warn!("Review store not configured, rejecting submission");
            return HttpResponse::InternalServerError()
                .json(ErrorResponse::new("Review storage is not configured"));
        }
    };

    match store.append(form.into_new_review(rating)).await {
        Ok(stored) => {
            tracing::info!("Stored review from {} ({} stars)", stored.name, stored.rating);
            HttpResponse::Ok().json(ReviewCreatedResponse::new(stored))
        }
        Err(e) => {
            tracing::error!("Failed to store review: {}", e);
            HttpResponse::InternalServerError().json(ErrorResponse::new("Failed to save review"))
        }
    }
}

/// Review listing endpoint
///
/// GET /get-reviews
///
/// Always responds 200 with a JSON array. An unconfigured or failing
/// store yields an empty array; the failure itself goes to the logs.
async fn get_reviews(state: web::Data<AppState>) -> impl Responder {
    let store = match &state.store {
        Some(store) => store,
        None => {
            tracing::debug!("Review store not configured, returning empty list");
            return HttpResponse::Ok().json(Vec::<Review>::new());
        }
    };

    match store.list_all().await {
        Ok(reviews) => HttpResponse::Ok().json(reviews),
        Err(e) => {
            tracing::error!("Failed to fetch reviews: {}", e);
            HttpResponse::Ok().json(Vec::<Review>::new())
        }
    }
}
