// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{InquiryMessage, NewReview, Review};
pub use requests::{InquiryForm, RatingError, ReviewForm};
pub use responses::{ErrorResponse, HealthResponse, ReviewCreatedResponse, StatusResponse};
