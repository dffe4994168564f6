//! Core chat session management.
//!
//! This module provides the `ChatSession` struct which owns the transcript
//! and drives the submit lifecycle: append the user message and a pending
//! placeholder, deliver the prompt through the transport, then resolve the
//! placeholder in place or remove it on failure.

use crate::client::{AgentClient, AgentTransport};
use crate::error::Result;
use crate::identity::AuthState;
use crate::observability::{SESSION_FAILURES, SESSION_REPLIES, SESSION_SUBMISSIONS};
use crate::types::{AgentReply, Attachment, ChatMessage, PromptRequest, SessionId};

/// Notice recorded on the session when a submission fails. Deliberately
/// generic; the detailed error goes back to the caller instead.
pub const FAILURE_NOTICE: &str = "Unable to reach the agent. Confirm your token and endpoint.";

/// How a call to [`ChatSession::submit`] concluded.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// The prompt was blank after trimming; nothing was sent.
    Ignored,

    /// A previous submission is still in flight; nothing was sent.
    Busy,

    /// The agent answered and the placeholder was resolved in place.
    Replied(AgentReply),
}

/// A chat session that manages conversation state and agent interactions.
///
/// The session keeps the transcript in memory for its own lifetime. Exactly
/// one request leaves per accepted submission, and the staged attachment
/// rides on that request and is consumed whether or not it succeeds.
pub struct ChatSession<T: AgentTransport> {
    transport: T,
    messages: Vec<ChatMessage>,
    attachment: Option<Attachment>,
    sending: bool,
    notice: Option<String>,
    namespace: String,
    session_id: SessionId,
    bearer: Option<String>,
    submission_count: u64,
    reply_count: u64,
    failure_count: u64,
}

/// Aggregated stats for a chat session.
#[derive(Debug, Clone)]
pub struct SessionStats {
    /// The session identifier sent with every prompt.
    pub session_id: SessionId,
    /// The number of messages in the transcript.
    pub message_count: usize,
    /// Name of the staged attachment, if any.
    pub attachment_name: Option<String>,
    /// Size in bytes of the staged attachment, if any.
    pub attachment_size: Option<usize>,
    /// Whether a bearer credential accompanies requests.
    pub authenticated: bool,
    /// Total prompts accepted for delivery.
    pub total_submissions: u64,
    /// Total replies received.
    pub total_replies: u64,
    /// Total failed submissions.
    pub total_failures: u64,
}

impl ChatSession<AgentClient> {
    /// Creates a new chat session backed by the HTTP agent client.
    pub fn new(client: AgentClient, namespace: impl Into<String>) -> Self {
        Self::with_transport(client, namespace)
    }
}

impl<T: AgentTransport> ChatSession<T> {
    /// Creates a new chat session with a custom transport.
    ///
    /// The session starts signed out: the session identifier carries the
    /// guest marker until [`apply_identity`](ChatSession::apply_identity)
    /// supplies a uid.
    pub fn with_transport(transport: T, namespace: impl Into<String>) -> Self {
        let namespace = namespace.into();
        let session_id = SessionId::derive(&namespace, None);
        Self {
            transport,
            messages: Vec::new(),
            attachment: None,
            sending: false,
            notice: None,
            namespace,
            session_id,
            bearer: None,
            submission_count: 0,
            reply_count: 0,
            failure_count: 0,
        }
    }

    /// Submits a prompt to the agent.
    ///
    /// This method:
    /// 1. Ignores blank prompts and refuses overlapping submissions
    /// 2. Appends the user message and its pending placeholder
    /// 3. Consumes the staged attachment and delivers one request
    /// 4. Resolves the placeholder in place, or removes it on failure
    ///
    /// The user message survives a failure so the prompt can be retried by
    /// hand. The detailed error is returned to the caller; the transcript
    /// only records the generic [`FAILURE_NOTICE`].
    ///
    /// # Example
    ///
    /// ```no_run
    /// use wayfinder::AgentClient;
    /// use wayfinder::chat::{ChatSession, SubmitOutcome};
    ///
    /// # tokio_test::block_on(async {
    /// let client = AgentClient::new(None).unwrap();
    /// let mut session = ChatSession::new(client, "local-test");
    ///
    /// match session.submit("Which universities fit a 20k budget?").await {
    ///     Ok(SubmitOutcome::Replied(reply)) => println!("{}", reply.text),
    ///     Ok(_) => {}
    ///     Err(err) => eprintln!("submission failed: {}", err),
    /// }
    /// # });
    /// ```
    ///
    /// # Errors
    ///
    /// Returns an error if the transport fails or the agent answers with a
    /// non-success status.
    pub async fn submit(&mut self, prompt: &str) -> Result<SubmitOutcome> {
        let prompt = prompt.trim();
        if prompt.is_empty() {
            return Ok(SubmitOutcome::Ignored);
        }
        if self.sending {
            return Ok(SubmitOutcome::Busy);
        }
        self.sending = true;
        self.notice = None;
        self.submission_count += 1;
        SESSION_SUBMISSIONS.click();

        let user = ChatMessage::user(prompt);
        let placeholder = ChatMessage::pending_for(&user.id);
        let placeholder_id = placeholder.id.clone();
        self.messages.push(user);
        self.messages.push(placeholder);

        let mut request = PromptRequest::new(prompt, self.session_id.clone());
        if let Some(bearer) = &self.bearer {
            request = request.with_bearer(bearer.clone());
        }
        // The attachment is consumed here so it cannot ride twice, even when
        // the delivery fails.
        if let Some(attachment) = self.attachment.take() {
            request = request.with_attachment(attachment);
        }

        let outcome = self.transport.deliver(request).await;
        self.sending = false;

        match outcome {
            Ok(reply) => {
                if let Some(message) = self
                    .messages
                    .iter_mut()
                    .find(|message| message.id == placeholder_id)
                {
                    message.resolve(&reply.text);
                }
                self.reply_count += 1;
                SESSION_REPLIES.click();
                Ok(SubmitOutcome::Replied(reply))
            }
            Err(err) => {
                self.messages.retain(|message| message.id != placeholder_id);
                self.notice = Some(FAILURE_NOTICE.to_string());
                self.failure_count += 1;
                SESSION_FAILURES.click();
                Err(err)
            }
        }
    }

    /// Clears the conversation history and any failure notice. A staged
    /// attachment stays staged.
    pub fn clear(&mut self) {
        self.messages.clear();
        self.notice = None;
    }

    /// Returns the transcript in order.
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Returns the number of messages in the conversation.
    pub fn message_count(&self) -> usize {
        self.messages.len()
    }

    /// Stages a file to ride on the next submission, replacing any
    /// previously staged file.
    pub fn attach(&mut self, attachment: Attachment) {
        self.attachment = Some(attachment);
    }

    /// Drops the staged file, returning it if one was staged.
    pub fn detach(&mut self) -> Option<Attachment> {
        self.attachment.take()
    }

    /// Returns the staged attachment, if any.
    pub fn attachment(&self) -> Option<&Attachment> {
        self.attachment.as_ref()
    }

    /// Returns the notice recorded by the last failed submission, if it has
    /// not been superseded.
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    /// Returns true while a submission is in flight.
    pub fn is_sending(&self) -> bool {
        self.sending
    }

    /// Sets or clears the bearer credential sent with every prompt.
    pub fn set_bearer(&mut self, bearer: Option<String>) {
        self.bearer = bearer;
    }

    /// Adopts an identity snapshot: the bearer follows the id token and the
    /// session identifier is rederived from the uid. The transcript is kept.
    pub fn apply_identity(&mut self, state: &AuthState) {
        self.bearer = state.id_token.clone();
        self.session_id = SessionId::derive(&self.namespace, state.uid());
    }

    /// Returns the session identifier sent with every prompt.
    pub fn session_id(&self) -> &SessionId {
        &self.session_id
    }

    /// Returns the current session statistics snapshot.
    pub fn stats(&self) -> SessionStats {
        SessionStats {
            session_id: self.session_id.clone(),
            message_count: self.message_count(),
            attachment_name: self
                .attachment
                .as_ref()
                .map(|attachment| attachment.file_name.clone()),
            attachment_size: self.attachment.as_ref().map(Attachment::len),
            authenticated: self.bearer.is_some(),
            total_submissions: self.submission_count,
            total_replies: self.reply_count,
            total_failures: self.failure_count,
        }
    }
}
