//! The fixed, ordered endpoint sequence.

use serde::Serialize;
use std::fmt;

/// One remote endpoint.
///
/// Declaration order is walk order, and it encodes the data dependencies:
/// the secret is obtained before anything that sends it, and the level
/// before the submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Endpoint {
    Ping,
    Signup,
    Check,
    GetUserSecret,
    GetUserLevel,
    GetUserPoints,
    INeedAHint,
    EnterChallenge,
    SubmitSolution,
}

impl Endpoint {
    /// Every endpoint in walk order.
    pub const SEQUENCE: [Endpoint; 9] = [
        Endpoint::Ping,
        Endpoint::Signup,
        Endpoint::Check,
        Endpoint::GetUserSecret,
        Endpoint::GetUserLevel,
        Endpoint::GetUserPoints,
        Endpoint::INeedAHint,
        Endpoint::EnterChallenge,
        Endpoint::SubmitSolution,
    ];

    pub const fn path(self) -> &'static str {
        match self {
            Self::Ping => "/ping",
            Self::Signup => "/signup",
            Self::Check => "/check",
            Self::GetUserSecret => "/getUserSecret",
            Self::GetUserLevel => "/getUserLevel",
            Self::GetUserPoints => "/getUserPoints",
            Self::INeedAHint => "/iNeedAHint",
            Self::EnterChallenge => "/enterChallenge",
            Self::SubmitSolution => "/submitSolution",
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.path())
    }
}
