use crate::models::domain::Review;
use serde::{Deserialize, Serialize};

/// Status-only success body: `{"status": "success"}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub status: String,
}

impl StatusResponse {
    pub fn success() -> Self {
        Self {
            status: "success".to_string(),
        }
    }
}

/// Failure body: `{"status": "error", "message": ...}`
///
/// The message is a short human-readable sentence; collaborator error
/// detail stays in the logs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub status: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            status: "error".to_string(),
            message: message.into(),
        }
    }
}

/// Body returned once a review has been stored
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewCreatedResponse {
    pub status: String,
    pub data: Review,
}

impl ReviewCreatedResponse {
    pub fn new(data: Review) -> Self {
        Self {
            status: "success".to_string(),
            data,
        }
    }
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_wire_shapes() {
        let ok = serde_json::to_value(StatusResponse::success()).unwrap();
        assert_eq!(ok, serde_json::json!({"status": "success"}));

        let err = serde_json::to_value(ErrorResponse::new("Failed to send message")).unwrap();
        assert_eq!(
            err,
            serde_json::json!({"status": "error", "message": "Failed to send message"})
        );
    }
}
