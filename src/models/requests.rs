use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::domain::{InquiryMessage, NewReview};

/// Contact form payload for POST /send
///
/// None of the visible fields are required; whatever arrives lands in the
/// formatted message as-is. `hp-field` is the hidden honeypot input that
/// real visitors leave empty.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InquiryForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub question: String,
    #[serde(rename = "hp-field", default)]
    pub honeypot: String,
}

impl InquiryForm {
    pub fn into_message(self) -> InquiryMessage {
        InquiryMessage {
            name: self.name,
            phone: self.phone,
            question: self.question,
        }
    }
}

/// Review form payload for POST /submit-review
///
/// Field names follow the form inputs on the landing page. The rating
/// arrives as text from the star widget and is parsed separately.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ReviewForm {
    #[validate(length(min = 1))]
    #[serde(rename = "reviewName", default)]
    pub name: String,
    #[validate(length(min = 1))]
    #[serde(rename = "reviewComment", default)]
    pub comment: String,
    #[validate(length(min = 1))]
    #[serde(default)]
    pub rating: String,
    #[serde(rename = "hp-field", default)]
    pub honeypot: String,
}

/// How a submitted rating failed to parse
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RatingError {
    NotAnInteger,
    OutOfRange,
}

impl ReviewForm {
    /// Rating bounds rendered by the star widget
    pub const MIN_RATING: i32 = 1;
    pub const MAX_RATING: i32 = 5;

    /// Parse the rating field as a bounded integer
    pub fn parse_rating(&self) -> Result<i32, RatingError> {
        let rating: i32 = self
            .rating
            .trim()
            .parse()
            .map_err(|_| RatingError::NotAnInteger)?;
        if !(Self::MIN_RATING..=Self::MAX_RATING).contains(&rating) {
            return Err(RatingError::OutOfRange);
        }
        Ok(rating)
    }

    pub fn into_new_review(self, rating: i32) -> NewReview {
        NewReview {
            name: self.name,
            comment: self.comment,
            rating,
        }
    }
}
