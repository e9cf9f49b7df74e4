//! Scripted owner for tests and demos.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use crate::ports::{UserIo, UserIoError};

#[derive(Debug, Default)]
struct Script {
    answers: VecDeque<String>,
    fallback: Option<String>,
    questions: Vec<String>,
    notices: Vec<String>,
}

/// Answers questions from a fixed list and records everything it saw.
///
/// Once the list runs out, the fallback answer (if set) is used; otherwise
/// the channel reports [`UserIoError::Closed`].
#[derive(Debug, Clone, Default)]
pub struct ScriptedUserIo {
    state: Arc<Mutex<Script>>,
    delay: Duration,
}

impl ScriptedUserIo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_answer(self, answer: impl Into<String>) -> Self {
        self.lock().answers.push_back(answer.into());
        self
    }

    pub fn with_fallback(self, answer: impl Into<String>) -> Self {
        self.lock().fallback = Some(answer.into());
        self
    }

    /// Simulated thinking time before each answer.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn questions(&self) -> Vec<String> {
        self.lock().questions.clone()
    }

    pub fn notices(&self) -> Vec<String> {
        self.lock().notices.clone()
    }

    fn lock(&self) -> MutexGuard<'_, Script> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl UserIo for ScriptedUserIo {
    async fn ask(&self, question: &str) -> Result<String, UserIoError> {
        let answer = {
            let mut state = self.lock();
            state.questions.push(question.to_string());
            state.answers.pop_front().or_else(|| state.fallback.clone())
        };

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        answer.ok_or(UserIoError::Closed)
    }

    async fn notify(&self, message: &str) -> Result<(), UserIoError> {
        self.lock().notices.push(message.to_string());
        Ok(())
    }
}
