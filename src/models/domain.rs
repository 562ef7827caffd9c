use serde::{Deserialize, Serialize};

/// A customer review as held by the record store
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Review {
    /// Store-assigned identifier, absent until the record is persisted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    pub comment: String,
    pub rating: i32,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// A validated review that has not been persisted yet
///
/// The store assigns `id` and `created_at` when it appends the record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewReview {
    pub name: String,
    pub comment: String,
    pub rating: i32,
}

/// A contact-form inquiry
///
/// Formatted into a fixed plain-text email and handed to the mail relay;
/// never persisted.
#[derive(Debug, Clone)]
pub struct InquiryMessage {
    pub name: String,
    pub phone: String,
    pub question: String,
}

impl InquiryMessage {
    /// Subject line of the notification email
    pub fn subject(&self) -> &'static str {
        "New question from the website"
    }

    /// Plain-text body handed to the mail relay
    pub fn body(&self) -> String {
        format!(
            "Name: {}\nPhone: {}\nQuestion: {}",
            self.name, self.phone, self.question
        )
    }
}
