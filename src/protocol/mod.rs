//! Remote API contract: the fixed endpoint sequence, request bodies and the
//! literal strings the service speaks.

mod decode;
mod endpoint;
mod payload;

pub use decode::{decode_level, decode_secret, SecretReply};
pub use endpoint::Endpoint;
pub use payload::{Challenge, Content, SubmissionPayload, UserBody};

/// Body returned by `/getUserSecret` while the secret is not ready yet.
pub const NOT_READY_SENTINEL: &str = "Really don't feel like working today huh...";

/// Literal prefix in front of the secret in `/getUserSecret` responses.
pub const SECRET_PREFIX: &str = "User secret: ";

/// Literal prefix in front of the level in `/getUserLevel` responses.
pub const LEVEL_PREFIX: &str = "User level: ";

/// Shared key carried verbatim in every submission.
pub const SHARED_SECRET_KEY: &str =
    "Pasting code from the Internet into production code is like chewing gum found in the street.";

/// Protocol identifier carried in every submission.
pub const SUBMISSION_PROTOCOL: &str = "MD5";

/// Points claimed in every submission.
pub const SUBMISSION_POINTS: u32 = 100;
