//! Walks an in-process imitation of the remote API over real HTTP.

use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use probewalk::client::HttpTransport;
use probewalk::protocol::{Endpoint, NOT_READY_SENTINEL};
use probewalk::scanner::{run_scan, ScanOptions};
use probewalk::types::{Port, PortRange, ScanTarget};
use probewalk::workflow::{PollPolicy, PortOutcome, WorkflowEngine};
use probewalk::{OpenPortSet, StepError};
use serde_json::Value;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;

struct Api {
    not_ready_for: usize,
    level_reply: &'static str,
    secret_polls: AtomicUsize,
    hits: Mutex<Vec<String>>,
    submissions: Mutex<Vec<Value>>,
}

type Shared = Arc<Api>;

impl Api {
    fn new(not_ready_for: usize, level_reply: &'static str) -> Shared {
        Arc::new(Self {
            not_ready_for,
            level_reply,
            secret_polls: AtomicUsize::new(0),
            hits: Mutex::new(Vec::new()),
            submissions: Mutex::new(Vec::new()),
        })
    }

    fn hit(&self, what: &str) {
        self.hits.lock().unwrap().push(what.to_string());
    }
}

async fn read(State(api): State<Shared>, uri: axum::http::Uri) -> String {
    api.hit(&format!("GET {}", uri.path()));
    "pong".to_string()
}

async fn write(State(api): State<Shared>, uri: axum::http::Uri, Json(_): Json<Value>) -> String {
    api.hit(&format!("POST {}", uri.path()));
    "ok".to_string()
}

async fn secret(State(api): State<Shared>, Json(_): Json<Value>) -> String {
    api.hit("POST /getUserSecret");
    let n = api.secret_polls.fetch_add(1, Ordering::SeqCst);
    if n < api.not_ready_for {
        NOT_READY_SENTINEL.to_string()
    } else {
        "User secret: s3cr3t".to_string()
    }
}

async fn level(State(api): State<Shared>, Json(body): Json<Value>) -> String {
    api.hit("POST /getUserLevel");
    assert_eq!(body["Secret"], "s3cr3t");
    api.level_reply.to_string()
}

async fn submit(State(api): State<Shared>, Json(body): Json<Value>) -> String {
    api.hit("POST /submitSolution");
    api.submissions.lock().unwrap().push(body);
    "Congratulations".to_string()
}

async fn serve(api: Shared) -> Port {
    let app = Router::new()
        .route("/ping", get(read))
        .route("/signup", get(read).post(write))
        .route("/check", get(read).post(write))
        .route("/getUserSecret", post(secret))
        .route("/getUserLevel", post(level))
        .route("/getUserPoints", post(write))
        .route("/iNeedAHint", post(write))
        .route("/enterChallenge", post(write))
        .route("/submitSolution", post(submit))
        .with_state(api);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = Port::new(listener.local_addr().unwrap().port()).unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    port
}

fn engine() -> WorkflowEngine<HttpTransport> {
    WorkflowEngine::new(
        HttpTransport::new("127.0.0.1").unwrap(),
        "testUser",
        PollPolicy::new(50),
    )
}

#[tokio::test]
async fn scan_then_walk_single_service() {
    let api = Api::new(2, "User level: 4");
    let port = serve(api.clone()).await;

    let target = ScanTarget::new("127.0.0.1", PortRange::single(port), Duration::from_millis(500));
    let scan = run_scan(&target, &ScanOptions::default()).await.unwrap();
    assert!(scan.open.contains(port));

    let engine = WorkflowEngine::new(
        HttpTransport::for_scan(&scan).unwrap(),
        "testUser",
        PollPolicy::new(50),
    );
    let reports = engine.run_all(&scan.open).await;
    assert_eq!(reports.len(), 1);
    match &reports[0].outcome {
        PortOutcome::Done { response } => assert_eq!(response, "Congratulations"),
        other => panic!("unexpected outcome {:?}", other),
    }

    assert_eq!(api.secret_polls.load(Ordering::SeqCst), 3);

    let submissions = api.submissions.lock().unwrap();
    assert_eq!(submissions.len(), 1);
    let body = &submissions[0];
    assert_eq!(body["User"], "testUser");
    assert_eq!(body["Secret"], "s3cr3t");
    assert_eq!(body["Content"]["Level"], 4);
    assert_eq!(body["Content"]["Challenge"]["Username"], "testUser");
    assert_eq!(body["Content"]["Challenge"]["Points"], 100);
    assert_eq!(body["Content"]["Protocol"], "MD5");
    assert_eq!(
        body["Content"]["SecretKey"],
        "Pasting code from the Internet into production code is like chewing gum found in the street."
    );
}

#[tokio::test]
async fn bad_level_aborts_one_port_and_next_port_still_runs() {
    let broken = Api::new(0, "User level: not-a-number");
    let healthy = Api::new(0, "User level: 9");
    let broken_port = serve(broken.clone()).await;
    let healthy_port = serve(healthy.clone()).await;

    let open: OpenPortSet = [broken_port, healthy_port].into_iter().collect();
    let reports = engine().run_all(&open).await;
    assert_eq!(reports.len(), 2);

    let broken_report = reports.iter().find(|r| r.port == broken_port).unwrap();
    assert!(matches!(
        broken_report.outcome,
        PortOutcome::Aborted {
            error: StepError::Decode {
                endpoint: Endpoint::GetUserLevel,
                ..
            }
        }
    ));
    assert!(!broken
        .hits
        .lock()
        .unwrap()
        .iter()
        .any(|h| h.contains("/getUserPoints") || h.contains("/submitSolution")));

    let healthy_report = reports.iter().find(|r| r.port == healthy_port).unwrap();
    assert!(healthy_report.is_done());
    assert_eq!(
        healthy.submissions.lock().unwrap()[0]["Content"]["Level"],
        9
    );
}

#[tokio::test]
async fn closed_port_aborts_at_first_step() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = Port::new(listener.local_addr().unwrap().port()).unwrap();
    drop(listener);

    let report = engine().run_port(port).await;
    assert!(report.steps.is_empty());
    assert_eq!(report.failed_endpoint(), Some(Endpoint::Ping));
    assert!(matches!(
        report.outcome,
        PortOutcome::Aborted {
            error: StepError::Transport { .. }
        }
    ));
}

#[tokio::test]
async fn walk_hits_endpoints_in_protocol_order() {
    let api = Api::new(0, "User level: 1");
    let port = serve(api.clone()).await;

    let report = engine().run_port(port).await;
    assert!(report.is_done());

    let hits = api.hits.lock().unwrap().clone();
    assert_eq!(
        hits,
        vec![
            "GET /ping",
            "GET /signup",
            "POST /signup",
            "GET /check",
            "POST /check",
            "POST /getUserSecret",
            "POST /getUserLevel",
            "POST /getUserPoints",
            "POST /iNeedAHint",
            "POST /enterChallenge",
            "POST /submitSolution",
        ]
    );
}
