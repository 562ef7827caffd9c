//! Backend for the company landing site
//!
//! Two features behind one small HTTP surface: a contact form that emails
//! each inquiry to the site owner, and customer reviews submitted by
//! visitors and listed on the public page. Mail delivery and review
//! storage are collaborators injected at startup; either can be missing
//! and the matching feature degrades instead of taking the service down.

pub mod config;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use models::{InquiryMessage, NewReview, Review};
pub use routes::AppState;
pub use services::{FileStore, MailRelay, RateLimiter, ReviewStore, SmtpMailer, SupabaseClient};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_exports() {
        // Verify that the library exports work correctly
        let message = InquiryMessage {
            name: "Ann".to_string(),
            phone: "+1 555 0100".to_string(),
            question: "Do you deliver on weekends?".to_string(),
        };
        assert!(message.body().starts_with("Name: Ann"));
    }
}
