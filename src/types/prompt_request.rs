use crate::types::attachment::Attachment;
use crate::types::session_id::SessionId;

/// Everything needed to deliver one prompt to the agent.
///
/// A request either travels as a JSON body (no attachment) or as a multipart
/// form (attachment present); the transport decides which from
/// [`has_attachment`](PromptRequest::has_attachment). The bearer credential
/// rides along per request rather than living in the transport, so identity
/// changes between submissions take effect without rebuilding the client.
#[derive(Debug, Clone, PartialEq)]
pub struct PromptRequest {
    /// The trimmed prompt text.
    pub message: String,

    /// The conversation the prompt belongs to.
    pub session_id: SessionId,

    /// Credential for the Authorization header, when one is available.
    pub bearer: Option<String>,

    /// File uploaded alongside the prompt, when one was staged.
    pub attachment: Option<Attachment>,
}

impl PromptRequest {
    /// Creates a request carrying only a prompt.
    pub fn new(message: impl Into<String>, session_id: SessionId) -> Self {
        PromptRequest {
            message: message.into(),
            session_id,
            bearer: None,
            attachment: None,
        }
    }

    /// Sets the bearer credential.
    pub fn with_bearer(mut self, bearer: impl Into<String>) -> Self {
        self.bearer = Some(bearer.into());
        self
    }

    /// Sets the attachment.
    pub fn with_attachment(mut self, attachment: Attachment) -> Self {
        self.attachment = Some(attachment);
        self
    }

    /// Returns true if the request carries an attachment.
    pub fn has_attachment(&self) -> bool {
        self.attachment.is_some()
    }
}
