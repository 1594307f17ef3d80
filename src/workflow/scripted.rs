//! In-memory transport that replays canned replies and records every call.

use crate::client::{FetchResponse, Transport};
use crate::error::{TransportError, TransportResult};
use crate::protocol::{LEVEL_PREFIX, SECRET_PREFIX};
use crate::types::Port;
use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub port: u16,
    pub method: Method,
    pub path: String,
    pub body: Option<serde_json::Value>,
}

/// Canned reply; `Err` carries a label for the simulated failure.
type Reply = Result<String, String>;

/// A transport failure as the HTTP client reports it.
fn failure(port: Port, path: &str) -> TransportError {
    let source = match reqwest::Client::new().get("unreachable").build() {
        Err(source) => source,
        Ok(_) => unreachable!("relative URL accepted"),
    };
    TransportError::Request {
        url: format!("http://127.0.0.1:{}{}", port, path),
        source,
    }
}

/// Replies are queued per (port, method, path). An empty queue falls back
/// to a well-behaved default: GETs answer "ok", the secret and level
/// endpoints answer with `abc123` and `4`, every other POST answers "ok".
#[derive(Default)]
pub struct ScriptedTransport {
    calls: Mutex<Vec<Call>>,
    replies: Mutex<HashMap<(u16, Method, String), VecDeque<Reply>>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(self, port: u16, method: Method, path: &str, reply: Reply) -> Self {
        self.replies
            .lock()
            .unwrap()
            .entry((port, method, path.to_string()))
            .or_default()
            .push_back(reply);
        self
    }

    pub fn reply_times(self, port: u16, method: Method, path: &str, reply: &str, times: usize) -> Self {
        (0..times).fold(self, |t, _| t.reply(port, method, path, Ok(reply.to_string())))
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn calls_to(&self, port: u16, method: Method, path: &str) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|c| c.port == port && c.method == method && c.path == path)
            .collect()
    }

    fn next_reply(&self, port: u16, method: Method, path: &str) -> Option<Reply> {
        self.replies
            .lock()
            .unwrap()
            .get_mut(&(port, method, path.to_string()))
            .and_then(VecDeque::pop_front)
    }

    fn default_post(path: &str) -> String {
        match path {
            "/getUserSecret" => format!("{}abc123", SECRET_PREFIX),
            "/getUserLevel" => format!("{}4", LEVEL_PREFIX),
            _ => "ok".to_string(),
        }
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn get(&self, port: Port, path: &str) -> TransportResult<FetchResponse> {
        self.calls.lock().unwrap().push(Call {
            port: port.as_u16(),
            method: Method::Get,
            path: path.to_string(),
            body: None,
        });

        let body = self
            .next_reply(port.as_u16(), Method::Get, path)
            .unwrap_or_else(|| Ok("ok".to_string()))
            .map_err(|_| failure(port, path))?;
        Ok(FetchResponse {
            status: 200,
            headers: Default::default(),
            body,
        })
    }

    async fn post(&self, port: Port, path: &str, body: Vec<u8>) -> TransportResult<Vec<u8>> {
        self.calls.lock().unwrap().push(Call {
            port: port.as_u16(),
            method: Method::Post,
            path: path.to_string(),
            body: serde_json::from_slice(&body).ok(),
        });

        let reply = self
            .next_reply(port.as_u16(), Method::Post, path)
            .unwrap_or_else(|| Ok(Self::default_post(path)))
            .map_err(|_| failure(port, path))?;
        Ok(reply.into_bytes())
    }
}
