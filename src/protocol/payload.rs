//! JSON request bodies.
//!
//! Field names are PascalCase on the wire.

use super::{SHARED_SECRET_KEY, SUBMISSION_POINTS, SUBMISSION_PROTOCOL};
use serde::{Deserialize, Serialize};

/// Body for every write except the submission. Empty fields are omitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct UserBody {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub user: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub secret: String,
}

impl UserBody {
    pub fn user(user: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            secret: String::new(),
        }
    }

    pub fn with_secret(mut self, secret: impl Into<String>) -> Self {
        self.secret = secret.into();
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Challenge {
    pub username: String,
    pub secret: String,
    pub points: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Content {
    pub level: i64,
    pub challenge: Challenge,
    pub protocol: String,
    pub secret_key: String,
}

/// The terminal `/submitSolution` body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SubmissionPayload {
    pub user: String,
    pub secret: String,
    pub content: Content,
}

impl SubmissionPayload {
    /// Build the submission from session values plus the fixed literals.
    pub fn new(user: &str, secret: &str, level: i64) -> Self {
        Self {
            user: user.to_string(),
            secret: secret.to_string(),
            content: Content {
                level,
                challenge: Challenge {
                    username: user.to_string(),
                    secret: secret.to_string(),
                    points: SUBMISSION_POINTS,
                },
                protocol: SUBMISSION_PROTOCOL.to_string(),
                secret_key: SHARED_SECRET_KEY.to_string(),
            },
        }
    }
}
