//! SOS / emotional alert reporting.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::storage::AlertConfig;

/// A validated alert ready to be posted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertRequest {
    #[serde(rename = "alumno_id")]
    pub student_id: i64,
    #[serde(rename = "mensaje")]
    pub message: String,
}

impl AlertRequest {
    /// Trim and validate the message against the configured length bounds.
    pub fn new(
        student_id: i64,
        message: &str,
        config: &AlertConfig,
    ) -> Result<Self, ValidationError> {
        let message = message.trim();
        let len = message.chars().count();

        if len == 0 {
            return Err(ValidationError::Empty {
                field: "message".to_string(),
            });
        }
        if len < config.min_length {
            return Err(ValidationError::TooShort {
                field: "message".to_string(),
                min: config.min_length,
                len,
            });
        }
        if len > config.max_length {
            return Err(ValidationError::TooLong {
                field: "message".to_string(),
                max: config.max_length,
                len,
            });
        }

        Ok(Self {
            student_id,
            message: message.to_string(),
        })
    }
}
