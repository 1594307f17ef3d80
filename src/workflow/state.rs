//! Walk states and step outcomes.

use crate::client::FetchResponse;
use crate::protocol::Endpoint;
use std::fmt;

/// Where a port's walk currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowState {
    Init,
    AwaitingSecret,
    HaveSecret,
    AwaitingLevel,
    HaveLevel,
    Informational,
    Submitting,
    Done,
    Aborted,
}

impl WorkflowState {
    /// State while the step for `endpoint` is in progress.
    pub fn entering(endpoint: Endpoint) -> Self {
        match endpoint {
            Endpoint::Ping | Endpoint::Signup | Endpoint::Check => Self::Init,
            Endpoint::GetUserSecret => Self::AwaitingSecret,
            Endpoint::GetUserLevel => Self::AwaitingLevel,
            Endpoint::GetUserPoints | Endpoint::INeedAHint | Endpoint::EnterChallenge => {
                Self::Informational
            }
            Endpoint::SubmitSolution => Self::Submitting,
        }
    }

    /// State once the step for `endpoint` succeeded.
    pub fn completed(endpoint: Endpoint) -> Self {
        match endpoint {
            Endpoint::GetUserSecret => Self::HaveSecret,
            Endpoint::GetUserLevel => Self::HaveLevel,
            Endpoint::SubmitSolution => Self::Done,
            other => Self::entering(other),
        }
    }
}

impl fmt::Display for WorkflowState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Init => "init",
            Self::AwaitingSecret => "awaiting-secret",
            Self::HaveSecret => "have-secret",
            Self::AwaitingLevel => "awaiting-level",
            Self::HaveLevel => "have-level",
            Self::Informational => "informational",
            Self::Submitting => "submitting",
            Self::Done => "done",
            Self::Aborted => "aborted",
        };
        f.write_str(name)
    }
}

/// What a successful step produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    /// Response logged, nothing extracted.
    Observed {
        fetched: Option<FetchResponse>,
        reply: Option<String>,
    },
    SecretObtained { attempts: u32 },
    LevelObtained { level: i64 },
    Submitted { response: String },
}

/// One completed step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepRecord {
    pub endpoint: Endpoint,
    pub outcome: StepOutcome,
}
