//! Chat application module for interactive conversations with the agent.
//!
//! This module provides a REPL chat interface built on top of the wayfinder
//! client library. It supports:
//!
//! - Prompt submission with a pending placeholder per turn
//! - Optional file attachments riding on the next prompt
//! - Slash commands for session control
//! - Identity-aware session identifiers and bearer credentials
//!
//! # Architecture
//!
//! The module is organized into several components:
//!
//! - [`config`]: CLI argument parsing and configuration
//! - [`session`]: Core chat session management and agent interaction
//! - [`commands`]: Slash command parsing and handling

mod commands;
mod config;
mod session;

pub use crate::render::{PlainTextRenderer, Renderer};
pub use commands::{ChatCommand, help_text, parse_command};
pub use config::{ChatArgs, ChatConfig, DEFAULT_NAMESPACE};
pub use session::{ChatSession, FAILURE_NOTICE, SessionStats, SubmitOutcome};
