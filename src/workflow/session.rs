//! Per-port session state.

use crate::protocol::SubmissionPayload;

/// State accumulated while walking one port. Never shared between ports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    user: String,
    secret: Option<String>,
    level: Option<i64>,
}

impl Session {
    pub fn new(user: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            secret: None,
            level: None,
        }
    }

    pub fn user(&self) -> &str {
        &self.user
    }

    pub fn secret(&self) -> Option<&str> {
        self.secret.as_deref()
    }

    pub fn level(&self) -> Option<i64> {
        self.level
    }

    pub fn set_secret(&mut self, secret: impl Into<String>) {
        self.secret = Some(secret.into());
    }

    pub fn set_level(&mut self, level: i64) {
        self.level = Some(level);
    }

    /// The submission body, once both secret and level are known.
    pub fn submission(&self) -> Option<SubmissionPayload> {
        let secret = self.secret.as_deref()?;
        let level = self.level?;
        Some(SubmissionPayload::new(&self.user, secret, level))
    }
}
