//! Channel-backed user I/O.
//!
//! Lets an interview run in one task while another task (a websocket
//! session, a UI loop, a test) plays the owner. Each question travels with
//! a oneshot sender for its answer.

use async_trait::async_trait;
use tokio::sync::{mpsc, oneshot};

use crate::ports::{UserIo, UserIoError};

/// Something the interview wants the front end to handle.
#[derive(Debug)]
pub enum FrontendEvent {
    /// A question waiting on an answer.
    Question(PendingQuestion),
    /// A final message; no reply expected.
    Notice(String),
}

/// A question the front end must answer exactly once.
#[derive(Debug)]
pub struct PendingQuestion {
    text: String,
    reply: oneshot::Sender<String>,
}

impl PendingQuestion {
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Sends the owner's answer back to the interview.
    pub fn answer(self, answer: impl Into<String>) -> Result<(), UserIoError> {
        self.reply
            .send(answer.into())
            .map_err(|_| UserIoError::Closed)
    }
}

/// Interview-side half of the channel pair.
#[derive(Debug, Clone)]
pub struct ChannelUserIo {
    events: mpsc::Sender<FrontendEvent>,
}

/// Front-end half: receives questions and notices.
#[derive(Debug)]
pub struct InterviewFrontend {
    events: mpsc::Receiver<FrontendEvent>,
}

impl ChannelUserIo {
    /// Creates a connected pair with the given event buffer size.
    pub fn pair(buffer: usize) -> (Self, InterviewFrontend) {
        let (tx, rx) = mpsc::channel(buffer.max(1));
        (Self { events: tx }, InterviewFrontend { events: rx })
    }
}

impl InterviewFrontend {
    /// Waits for the next event; `None` once the interview side is gone.
    pub async fn recv(&mut self) -> Option<FrontendEvent> {
        self.events.recv().await
    }
}

#[async_trait]
impl UserIo for ChannelUserIo {
    async fn ask(&self, question: &str) -> Result<String, UserIoError> {
        let (reply, answer) = oneshot::channel();
        self.events
            .send(FrontendEvent::Question(PendingQuestion {
                text: question.to_string(),
                reply,
            }))
            .await
            .map_err(|_| UserIoError::Closed)?;

        answer.await.map_err(|_| UserIoError::Closed)
    }

    async fn notify(&self, message: &str) -> Result<(), UserIoError> {
        self.events
            .send(FrontendEvent::Notice(message.to_string()))
            .await
            .map_err(|_| UserIoError::Closed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn question_round_trips_through_frontend() {
        let (io, mut frontend) = ChannelUserIo::pair(4);

        let owner = tokio::spawn(async move {
            match frontend.recv().await {
                Some(FrontendEvent::Question(q)) => {
                    assert_eq!(q.text(), "Is it itchy?");
                    q.answer("very").unwrap();
                }
                other => panic!("expected question, got {:?}", other),
            }
        });

        let answer = io.ask("Is it itchy?").await.unwrap();
        owner.await.unwrap();

        assert_eq!(answer, "very");
    }

    #[tokio::test]
    async fn notice_is_delivered() {
        let (io, mut frontend) = ChannelUserIo::pair(1);

        io.notify("done").await.unwrap();

        assert!(matches!(frontend.recv().await, Some(FrontendEvent::Notice(m)) if m == "done"));
    }

    #[tokio::test]
    async fn dropped_frontend_closes_channel() {
        let (io, frontend) = ChannelUserIo::pair(1);
        drop(frontend);

        assert_eq!(io.ask("anyone?").await.unwrap_err(), UserIoError::Closed);
    }

    #[tokio::test]
    async fn unanswered_question_closes_channel() {
        let (io, mut frontend) = ChannelUserIo::pair(1);

        let owner = tokio::spawn(async move {
            // Drop the question without answering.
            let _ = frontend.recv().await;
        });

        assert_eq!(io.ask("hello?").await.unwrap_err(), UserIoError::Closed);
        owner.await.unwrap();
    }
}
