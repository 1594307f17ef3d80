//! Request/response plumbing for the endpoint walk.
//!
//! [`Transport`] is the seam between the workflow engine and the network:
//! `get` is the read-only fetcher, `post` the submitter. Neither inspects
//! status codes.

mod http;

pub use http::HttpTransport;

use crate::error::{TransportError, TransportResult};
use crate::types::Port;
use async_trait::async_trait;
use serde::Serialize;
use std::collections::BTreeMap;

/// Everything a GET exchange returns.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FetchResponse {
    /// Numeric status code.
    pub status: u16,
    /// Header values grouped by lowercase name.
    pub headers: BTreeMap<String, Vec<String>>,
    /// Body decoded as UTF-8 (lossy).
    pub body: String,
}

/// Transport used by the workflow engine. One implementation talks HTTP;
/// tests substitute scripted ones.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Issue a single GET for `path` on `port`. No retry.
    async fn get(&self, port: Port, path: &str) -> TransportResult<FetchResponse>;

    /// Issue a single POST of an already-encoded JSON body and return the
    /// raw response body. No retry.
    async fn post(&self, port: Port, path: &str, body: Vec<u8>) -> TransportResult<Vec<u8>>;
}

/// Serialize `payload` and post it. Encoding failures surface as
/// [`TransportError::Encode`].
pub async fn submit<T, P>(transport: &T, port: Port, path: &str, payload: &P) -> TransportResult<Vec<u8>>
where
    T: Transport + ?Sized,
    P: Serialize + ?Sized,
{
    let body = serde_json::to_vec(payload).map_err(TransportError::Encode)?;
    transport.post(port, path, body).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::UserBody;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recorder {
        posted: Mutex<Vec<(u16, String, Vec<u8>)>>,
    }

    #[async_trait]
    impl Transport for Recorder {
        async fn get(&self, _port: Port, _path: &str) -> TransportResult<FetchResponse> {
            Ok(FetchResponse::default())
        }

        async fn post(&self, port: Port, path: &str, body: Vec<u8>) -> TransportResult<Vec<u8>> {
            self.posted
                .lock()
                .unwrap()
                .push((port.as_u16(), path.to_string(), body));
            Ok(b"ok".to_vec())
        }
    }

    #[tokio::test]
    async fn test_submit_encodes_json() {
        let recorder = Recorder::default();
        let port = Port::new(8080).unwrap();

        let reply = submit(&recorder, port, "/signup", &UserBody::user("testUser"))
            .await
            .unwrap();
        assert_eq!(reply, b"ok");

        let posted = recorder.posted.lock().unwrap();
        assert_eq!(posted.len(), 1);
        assert_eq!(posted[0].0, 8080);
        assert_eq!(posted[0].1, "/signup");
        assert_eq!(posted[0].2, br#"{"User":"testUser"}"#.to_vec());
    }
}
