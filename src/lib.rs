// Public modules
pub mod chat;
pub mod client;
pub mod client_logger;
pub mod error;
pub mod format;
pub mod identity;
pub mod observability;
pub mod profile;
pub mod render;
pub mod types;
pub mod utils;

// Re-exports
pub use client::{AgentClient, AgentTransport};
pub use client_logger::ClientLogger;
pub use error::{Error, Result};
pub use format::{MessageChunk, format_message_chunks};
pub use identity::{
    AuthState, IdentityEvents, IdentityProvider, PasswordIdentity, Principal, StaticIdentity,
};
pub use profile::{ProfileClient, ProfileStore, StudentProfile};
pub use render::{PlainTextRenderer, Renderer};
pub use types::*;
