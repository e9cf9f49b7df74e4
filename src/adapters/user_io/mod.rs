//! Owner-facing I/O adapters.
//!
//! - `ConsoleUserIo` - stdin/stdout terminal session
//! - `ChannelUserIo` - in-process channel pair for embedding front ends
//! - `ScriptedUserIo` - canned answers for tests

mod channel;
mod console;
mod scripted;

pub use channel::{ChannelUserIo, FrontendEvent, InterviewFrontend, PendingQuestion};
pub use console::ConsoleUserIo;
pub use scripted::ScriptedUserIo;
