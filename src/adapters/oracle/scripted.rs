//! Scripted oracle for tests and demos.
//!
//! Replays a fixed list of replies in order. Once the script runs out the
//! fallback reply (if any) repeats forever; otherwise the oracle reports a
//! permanent failure.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::ports::{DiagnosticOracle, OracleError};

/// One recorded `invoke` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OracleCall {
    pub complaint: String,
    pub transcript: String,
}

#[derive(Debug, Default)]
struct Script {
    replies: VecDeque<Result<String, OracleError>>,
    fallback: Option<Result<String, OracleError>>,
    calls: Vec<OracleCall>,
}

/// Oracle that replays canned replies.
#[derive(Debug, Clone, Default)]
pub struct ScriptedOracle {
    script: Arc<Mutex<Script>>,
}

impl ScriptedOracle {
    pub fn new() -> Self {
        Self::default()
    }

    /// An oracle that gives the same reply on every call.
    pub fn always(reply: impl Into<String>) -> Self {
        Self::new().with_fallback(reply)
    }

    /// Queues a raw reply.
    pub fn with_reply(self, reply: impl Into<String>) -> Self {
        self.lock().replies.push_back(Ok(reply.into()));
        self
    }

    /// Queues a transport failure.
    pub fn with_failure(self, error: OracleError) -> Self {
        self.lock().replies.push_back(Err(error));
        self
    }

    /// Reply used once the queue is empty.
    pub fn with_fallback(self, reply: impl Into<String>) -> Self {
        self.lock().fallback = Some(Ok(reply.into()));
        self
    }

    /// Failure used once the queue is empty.
    pub fn with_fallback_failure(self, error: OracleError) -> Self {
        self.lock().fallback = Some(Err(error));
        self
    }

    pub fn call_count(&self) -> usize {
        self.lock().calls.len()
    }

    pub fn calls(&self) -> Vec<OracleCall> {
        self.lock().calls.clone()
    }

    fn lock(&self) -> MutexGuard<'_, Script> {
        self.script
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl DiagnosticOracle for ScriptedOracle {
    async fn invoke(&self, complaint: &str, transcript: &str) -> Result<String, OracleError> {
        let mut script = self.lock();
        script.calls.push(OracleCall {
            complaint: complaint.to_string(),
            transcript: transcript.to_string(),
        });

        match script.replies.pop_front() {
            Some(reply) => reply,
            None => script
                .fallback
                .clone()
                .unwrap_or_else(|| Err(OracleError::permanent("script exhausted"))),
        }
    }
}
