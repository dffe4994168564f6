// Public modules
pub mod agent_reply;
pub mod attachment;
pub mod chat_message;
pub mod prompt_request;
pub mod session_id;

// Re-exports
pub use agent_reply::{AgentReply, ReplySource};
pub use attachment::{Attachment, AttachmentMediaType};
pub use chat_message::{Author, ChatMessage, MessageId, PENDING_TEXT};
pub use prompt_request::PromptRequest;
pub use session_id::{GUEST_MARKER, SessionId};
