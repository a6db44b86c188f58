//! Session telemetry.

use async_trait::async_trait;
use log::info;
use uuid::Uuid;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("trace sink error :: {0}")]
    Sink(String),
}

/// Sink for session and authentication events.
#[async_trait]
pub trait SessionTracer: Send + Sync {
    async fn trace_event(&self, message: &str) -> Result<(), Error>;

    /// Records the start of a session, tagged with `label` when known.
    async fn trace_session(&self, label: Option<&str>) -> Result<(), Error>;
}

/// Tracer writing events to the `log` facade, tagged with a per-instance
/// session id.
#[derive(Debug, Clone)]
pub struct LogTracer {
    session_id: Uuid,
}

impl Default for LogTracer {
    fn default() -> Self {
        Self::new()
    }
}

impl LogTracer {
    pub fn new() -> Self {
        Self {
            session_id: Uuid::new_v4(),
        }
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }
}

#[async_trait]
impl SessionTracer for LogTracer {
    async fn trace_event(&self, message: &str) -> Result<(), Error> {
        info!("[session {}] {}", self.session_id, message);
        Ok(())
    }

    async fn trace_session(&self, label: Option<&str>) -> Result<(), Error> {
        match label {
            Some(label) => info!("[session {}] session started ({})", self.session_id, label),
            None => info!("[session {}] session started", self.session_id),
        }
        Ok(())
    }
}
