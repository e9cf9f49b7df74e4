//! Terminal front end: questions on stdout, answers from stdin.

use async_trait::async_trait;
use tokio::io::{self, AsyncBufReadExt, AsyncWriteExt, BufReader, Lines, Stdin};
use tokio::sync::Mutex;

use crate::ports::{UserIo, UserIoError};

const ANSWER_PROMPT: &str = "> ";

/// Reads one line per answer. EOF closes the channel.
pub struct ConsoleUserIo {
    lines: Mutex<Lines<BufReader<Stdin>>>,
}

impl Default for ConsoleUserIo {
    fn default() -> Self {
        Self::new()
    }
}

impl ConsoleUserIo {
    pub fn new() -> Self {
        Self {
            lines: Mutex::new(BufReader::new(io::stdin()).lines()),
        }
    }

    async fn write(text: &str) -> Result<(), UserIoError> {
        let mut stdout = io::stdout();
        stdout.write_all(text.as_bytes()).await?;
        stdout.flush().await?;
        Ok(())
    }
}

#[async_trait]
impl UserIo for ConsoleUserIo {
    async fn ask(&self, question: &str) -> Result<String, UserIoError> {
        Self::write(&format!("\n{}\n{}", question, ANSWER_PROMPT)).await?;

        let mut lines = self.lines.lock().await;
        match lines.next_line().await? {
            Some(line) => Ok(line),
            None => Err(UserIoError::Closed),
        }
    }

    async fn notify(&self, message: &str) -> Result<(), UserIoError> {
        Self::write(&format!("\n{}\n", message)).await
    }
}
