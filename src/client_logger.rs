//! Logging trait for agent client operations.
//!
//! This module provides the [`ClientLogger`] trait that allows users to
//! capture and log every prompt passing through the [`AgentClient`], the
//! reply it resolved to, and any failure along the way.
//!
//! [`AgentClient`]: crate::client::AgentClient

use crate::error::Error;
use crate::types::{AgentReply, PromptRequest};

/// A trait for logging agent client operations.
///
/// Implement this trait to record every dispatched prompt and its outcome.
/// The client calls these hooks around each request; implementations decide
/// where the records go.
///
/// # Example
///
/// ```rust,ignore
/// use std::io::Write;
/// use std::sync::Mutex;
/// use wayfinder::{AgentReply, ClientLogger, Error, PromptRequest};
///
/// struct FileLogger {
///     file: Mutex<std::fs::File>,
/// }
///
/// impl ClientLogger for FileLogger {
///     fn log_prompt(&self, request: &PromptRequest) {
///         let mut file = self.file.lock().unwrap();
///         writeln!(file, "prompt [{}]: {}", request.session_id, request.message).unwrap();
///     }
///
///     fn log_reply(&self, reply: &AgentReply) {
///         let mut file = self.file.lock().unwrap();
///         writeln!(file, "reply ({:?}): {}", reply.source, reply.text).unwrap();
///     }
///
///     fn log_failure(&self, error: &Error) {
///         let mut file = self.file.lock().unwrap();
///         writeln!(file, "failure: {}", error).unwrap();
///     }
/// }
/// ```
pub trait ClientLogger: Send + Sync {
    /// Log a prompt as it is dispatched.
    ///
    /// This method is called once per request, after validation and just
    /// before the HTTP call, with the full [`PromptRequest`].
    fn log_prompt(&self, request: &PromptRequest);

    /// Log a resolved reply.
    ///
    /// This method is called once per successful request with the
    /// [`AgentReply`] the response body resolved to.
    fn log_reply(&self, reply: &AgentReply);

    /// Log a failed request.
    ///
    /// This method is called once per failed request with the detailed
    /// error. Session notices shown to users stay generic; this hook is
    /// where the specifics go.
    fn log_failure(&self, error: &Error);
}
