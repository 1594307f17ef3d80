//! Workflow engine - walks the fixed endpoint sequence on each open port.
//!
//! Within a port every step waits for the previous response. Ports are
//! walked one after another in ascending order. A failed step ends only
//! the current port; the engine then moves on to the next one.

mod poll;
mod session;
mod state;

#[cfg(test)]
mod scripted;

pub use poll::PollPolicy;
pub use session::Session;
pub use state::{StepOutcome, StepRecord, WorkflowState};

use crate::client::{submit, FetchResponse, Transport};
use crate::error::StepError;
use crate::protocol::{decode_level, decode_secret, Endpoint, SecretReply, UserBody};
use crate::scanner::OpenPortSet;
use crate::types::Port;
use serde::Serialize;
use tracing::{debug, info, warn};

/// How a port's walk ended.
#[derive(Debug)]
pub enum PortOutcome {
    /// Every step ran; carries the `/submitSolution` response.
    Done { response: String },
    /// A step failed and the remaining steps were skipped.
    Aborted { error: StepError },
}

/// Everything observed while walking one port.
#[derive(Debug)]
pub struct PortReport {
    pub port: Port,
    /// Terminal state: `Done` or `Aborted`.
    pub state: WorkflowState,
    /// State the walk was in when it stopped.
    pub last_state: WorkflowState,
    pub steps: Vec<StepRecord>,
    pub outcome: PortOutcome,
}

impl PortReport {
    pub fn is_done(&self) -> bool {
        matches!(self.outcome, PortOutcome::Done { .. })
    }

    /// Endpoint whose step ended the walk early, if any.
    pub fn failed_endpoint(&self) -> Option<Endpoint> {
        match &self.outcome {
            PortOutcome::Aborted { error } => Some(error.endpoint()),
            PortOutcome::Done { .. } => None,
        }
    }
}

/// Sequential endpoint walker.
pub struct WorkflowEngine<T> {
    transport: T,
    user: String,
    poll: PollPolicy,
}

impl<T: Transport> WorkflowEngine<T> {
    pub fn new(transport: T, user: impl Into<String>, poll: PollPolicy) -> Self {
        Self {
            transport,
            user: user.into(),
            poll,
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Walk every port, one at a time, in ascending order.
    pub async fn run_all(&self, ports: &OpenPortSet) -> Vec<PortReport> {
        let mut reports = Vec::with_capacity(ports.len());
        for port in ports.sorted() {
            reports.push(self.run_port(port).await);
        }
        reports
    }

    /// Walk the endpoint sequence on one port with a fresh session.
    pub async fn run_port(&self, port: Port) -> PortReport {
        let mut session = Session::new(&self.user);
        let mut steps = Vec::with_capacity(Endpoint::SEQUENCE.len());
        let mut state = WorkflowState::Init;

        info!(%port, user = %self.user, "starting endpoint walk");

        for endpoint in Endpoint::SEQUENCE {
            match self.step(port, endpoint, &mut session).await {
                Ok(outcome) => {
                    state = WorkflowState::completed(endpoint);
                    debug!(%port, %endpoint, %state, "step complete");
                    steps.push(StepRecord { endpoint, outcome });
                }
                Err(error) => {
                    warn!(%port, %endpoint, %error, "aborting walk for this port");
                    return PortReport {
                        port,
                        state: WorkflowState::Aborted,
                        last_state: WorkflowState::entering(endpoint),
                        steps,
                        outcome: PortOutcome::Aborted { error },
                    };
                }
            }
        }

        let response = match steps.last() {
            Some(StepRecord {
                outcome: StepOutcome::Submitted { response },
                ..
            }) => response.clone(),
            _ => String::new(),
        };
        info!(%port, %response, "walk finished");

        PortReport {
            port,
            state: WorkflowState::Done,
            last_state: state,
            steps,
            outcome: PortOutcome::Done { response },
        }
    }

    async fn step(
        &self,
        port: Port,
        endpoint: Endpoint,
        session: &mut Session,
    ) -> Result<StepOutcome, StepError> {
        match endpoint {
            Endpoint::Ping => {
                let fetched = self.fetch(port, endpoint).await?;
                Ok(StepOutcome::Observed {
                    fetched: Some(fetched),
                    reply: None,
                })
            }
            Endpoint::Signup | Endpoint::Check => {
                let fetched = self.fetch(port, endpoint).await?;
                let reply = self
                    .write(port, endpoint, &UserBody::user(session.user()))
                    .await?;
                Ok(StepOutcome::Observed {
                    fetched: Some(fetched),
                    reply: Some(reply),
                })
            }
            Endpoint::GetUserSecret => self.poll_secret(port, endpoint, session).await,
            Endpoint::GetUserLevel => {
                let body = self.secret_body(endpoint, session)?;
                let reply = self.write(port, endpoint, &body).await?;
                let level = decode_level(&reply)
                    .map_err(|source| StepError::Decode { endpoint, source })?;
                info!(%port, level, "level obtained");
                session.set_level(level);
                Ok(StepOutcome::LevelObtained { level })
            }
            Endpoint::GetUserPoints | Endpoint::INeedAHint | Endpoint::EnterChallenge => {
                let body = self.secret_body(endpoint, session)?;
                let reply = self.write(port, endpoint, &body).await?;
                Ok(StepOutcome::Observed {
                    fetched: None,
                    reply: Some(reply),
                })
            }
            Endpoint::SubmitSolution => {
                let payload = session.submission().ok_or(StepError::MissingState {
                    endpoint,
                    field: if session.secret().is_none() {
                        "secret"
                    } else {
                        "level"
                    },
                })?;
                let response = self.write(port, endpoint, &payload).await?;
                Ok(StepOutcome::Submitted { response })
            }
        }
    }

    /// Post `{User}` until the reply is something other than the sentinel,
    /// within the poll budget.
    async fn poll_secret(
        &self,
        port: Port,
        endpoint: Endpoint,
        session: &mut Session,
    ) -> Result<StepOutcome, StepError> {
        let body = UserBody::user(session.user());
        let mut attempt = 1;

        loop {
            let reply = self.write(port, endpoint, &body).await?;

            match decode_secret(&reply).map_err(|source| StepError::Decode { endpoint, source })? {
                SecretReply::Ready(secret) => {
                    info!(%port, attempts = attempt, "secret obtained");
                    session.set_secret(secret);
                    return Ok(StepOutcome::SecretObtained { attempts: attempt });
                }
                SecretReply::NotReady => match self.poll.next_delay(attempt) {
                    Some(delay) => {
                        debug!(%port, attempt, "secret not ready, polling again");
                        if !delay.is_zero() {
                            tokio::time::sleep(delay).await;
                        }
                        attempt += 1;
                    }
                    None => {
                        return Err(StepError::PollExhausted {
                            endpoint,
                            attempts: attempt,
                        })
                    }
                },
            }
        }
    }

    fn secret_body(&self, endpoint: Endpoint, session: &Session) -> Result<UserBody, StepError> {
        let secret = session.secret().ok_or(StepError::MissingState {
            endpoint,
            field: "secret",
        })?;
        Ok(UserBody::user(session.user()).with_secret(secret))
    }

    async fn fetch(&self, port: Port, endpoint: Endpoint) -> Result<FetchResponse, StepError> {
        let response = self
            .transport
            .get(port, endpoint.path())
            .await
            .map_err(|source| StepError::Transport { endpoint, source })?;

        info!(%port, %endpoint, status = response.status, body = %response.body, "GET");
        debug!(%port, %endpoint, headers = ?response.headers, "GET headers");
        Ok(response)
    }

    async fn write<B>(&self, port: Port, endpoint: Endpoint, body: &B) -> Result<String, StepError>
    where
        B: Serialize + Sync,
    {
        let raw = submit(&self.transport, port, endpoint.path(), body)
            .await
            .map_err(|source| StepError::Transport { endpoint, source })?;
        let reply = String::from_utf8_lossy(&raw).into_owned();

        info!(%port, %endpoint, body = %reply, "POST");
        Ok(reply)
    }
}
