//! HTTP client for the agent endpoint.
//!
//! The agent speaks two request shapes: a JSON POST for plain prompts and a
//! multipart POST to the `upload` path when a file rides along. Either way
//! the response body resolves through [`AgentReply::from_body`], so callers
//! always get display text back. The bearer credential travels per request
//! rather than per client, which lets identity changes between submissions
//! take effect without rebuilding anything.

use std::env;
use std::sync::Arc;
use std::time::{Duration, Instant};

use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::multipart::{Form, Part};
use reqwest::{Client as ReqwestClient, Response, header};
use serde::Deserialize;
use serde_json::json;

use crate::client_logger::ClientLogger;
use crate::error::{Error, Result};
use crate::observability::{
    CLIENT_REQUEST_DURATION, CLIENT_REQUEST_ERRORS, CLIENT_REQUESTS, CLIENT_UPLOADS,
    REPLY_NAMED_FIELDS, REPLY_PRETTY_JSON, REPLY_RAW_TEXT,
};
use crate::types::{AgentReply, PromptRequest, ReplySource};

const DEFAULT_AGENT_URL: &str = "http://localhost:8080/agent";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Delivery of prompts to an agent.
///
/// The chat session drives whatever implements this trait. [`AgentClient`]
/// is the HTTP implementation; tests substitute scripted fakes so the
/// session logic runs without a network.
#[async_trait::async_trait]
pub trait AgentTransport: Send + Sync {
    /// Delivers one prompt and resolves the reply.
    async fn deliver(&self, request: PromptRequest) -> Result<AgentReply>;
}

/// Client for the agent endpoint.
#[derive(Clone)]
pub struct AgentClient {
    client: ReqwestClient,
    base_url: String,
    timeout: Duration,
    logger: Option<Arc<dyn ClientLogger>>,
}

impl std::fmt::Debug for AgentClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AgentClient")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl AgentClient {
    /// Create a new agent client.
    ///
    /// The base URL can be provided directly or read from the
    /// WAYFINDER_AGENT_URL environment variable; absent both, a local
    /// development default is used. Trailing slashes are trimmed so the
    /// JSON and upload paths always derive cleanly.
    pub fn new(base_url: Option<String>) -> Result<Self> {
        Self::with_options(base_url, None)
    }

    /// Create a new client with custom settings.
    pub fn with_options(base_url: Option<String>, timeout: Option<Duration>) -> Result<Self> {
        let base_url = match base_url {
            Some(url) => url,
            None => env::var("WAYFINDER_AGENT_URL")
                .unwrap_or_else(|_| DEFAULT_AGENT_URL.to_string()),
        };
        let base_url = base_url.trim_end_matches('/').to_string();
        url::Url::parse(&base_url)?;

        let timeout = timeout.unwrap_or(DEFAULT_TIMEOUT);
        let client = ReqwestClient::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| {
                Error::http_client(
                    format!("Failed to build HTTP client: {}", e),
                    Some(Box::new(e)),
                )
            })?;

        Ok(Self {
            client,
            base_url,
            timeout,
            logger: None,
        })
    }

    /// Attach a logger that observes every prompt, reply, and failure.
    pub fn with_logger(mut self, logger: Arc<dyn ClientLogger>) -> Self {
        self.logger = Some(logger);
        self
    }

    /// Returns the configured base URL, trailing slashes trimmed.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns the URL prompts without attachments are posted to.
    pub fn endpoint(&self) -> String {
        format!("{}/", self.base_url)
    }

    /// Returns the URL prompts with attachments are posted to.
    pub fn upload_endpoint(&self) -> String {
        format!("{}/upload", self.base_url)
    }

    /// Create headers for an agent request, with the Authorization header
    /// when a credential is present.
    fn request_headers(&self, bearer: Option<&str>) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(header::ACCEPT, HeaderValue::from_static("application/json"));
        if let Some(token) = bearer {
            let value = HeaderValue::from_str(&format!("Bearer {token}")).map_err(|_| {
                Error::validation(
                    "bearer token contains characters not allowed in a header",
                    Some("bearer".to_string()),
                )
            })?;
            headers.insert(header::AUTHORIZATION, value);
        }
        Ok(headers)
    }

    /// Sends one prompt to the agent and resolves the reply text.
    ///
    /// Exactly one HTTP request is issued per call: multipart to the upload
    /// path when the request carries an attachment, JSON otherwise.
    pub async fn send_prompt(&self, request: PromptRequest) -> Result<AgentReply> {
        CLIENT_REQUESTS.click();
        if let Some(logger) = &self.logger {
            logger.log_prompt(&request);
        }

        let start = Instant::now();
        let result = self.round_trip(request).await;
        CLIENT_REQUEST_DURATION.add(start.elapsed().as_secs_f64());

        match result {
            Ok(reply) => {
                match &reply.source {
                    ReplySource::Field(_) => REPLY_NAMED_FIELDS.click(),
                    ReplySource::PrettyJson => REPLY_PRETTY_JSON.click(),
                    ReplySource::RawText => REPLY_RAW_TEXT.click(),
                }
                if let Some(logger) = &self.logger {
                    logger.log_reply(&reply);
                }
                Ok(reply)
            }
            Err(err) => {
                CLIENT_REQUEST_ERRORS.click();
                if let Some(logger) = &self.logger {
                    logger.log_failure(&err);
                }
                Err(err)
            }
        }
    }

    async fn round_trip(&self, request: PromptRequest) -> Result<AgentReply> {
        let response = self.dispatch(request).await?;

        if !response.status().is_success() {
            return Err(process_error_response(response).await);
        }

        let body = response.text().await.map_err(|e| {
            Error::http_client(
                format!("Failed to read response body: {}", e),
                Some(Box::new(e)),
            )
        })?;
        Ok(AgentReply::from_body(&body))
    }

    async fn dispatch(&self, request: PromptRequest) -> Result<Response> {
        let PromptRequest {
            message,
            session_id,
            bearer,
            attachment,
        } = request;
        let headers = self.request_headers(bearer.as_deref())?;

        match attachment {
            Some(attachment) => {
                CLIENT_UPLOADS.click();
                let part = Part::bytes(attachment.data)
                    .file_name(attachment.file_name)
                    .mime_str(attachment.media_type.as_mime())
                    .map_err(|e| {
                        Error::http_client(
                            format!("Failed to build multipart form: {}", e),
                            Some(Box::new(e)),
                        )
                    })?;
                let form = Form::new()
                    .text("message", message)
                    .text("session_id", session_id.to_string())
                    .part("file", part);
                self.client
                    .post(self.upload_endpoint())
                    .headers(headers)
                    .multipart(form)
                    .send()
                    .await
                    .map_err(|e| map_transport_error(e, self.timeout))
            }
            None => {
                let body = json!({
                    "message": message,
                    "session_id": session_id,
                });
                self.client
                    .post(self.endpoint())
                    .headers(headers)
                    .json(&body)
                    .send()
                    .await
                    .map_err(|e| map_transport_error(e, self.timeout))
            }
        }
    }
}

#[async_trait::async_trait]
impl AgentTransport for AgentClient {
    async fn deliver(&self, request: PromptRequest) -> Result<AgentReply> {
        self.send_prompt(request).await
    }
}

/// Convert a reqwest send error into our Error type.
pub(crate) fn map_transport_error(e: reqwest::Error, timeout: Duration) -> Error {
    if e.is_timeout() {
        Error::timeout(
            format!("Request timed out: {}", e),
            Some(timeout.as_secs_f64()),
        )
    } else if e.is_connect() {
        Error::connection(format!("Connection error: {}", e), Some(Box::new(e)))
    } else {
        Error::http_client(format!("Request failed: {}", e), Some(Box::new(e)))
    }
}

/// Process a non-success HTTP response and convert to our Error type
pub(crate) async fn process_error_response(response: Response) -> Error {
    let status = response.status();
    let status_code = status.as_u16();

    let retry_after = response
        .headers()
        .get("retry-after")
        .and_then(|val| val.to_str().ok())
        .and_then(|val| val.parse::<u64>().ok());

    // Services disagree about error body shapes: identity-toolkit nests an
    // object under "error", simple agents send {"error": "..."} or
    // {"detail": "..."}.
    #[derive(Deserialize)]
    struct ErrorResponse {
        error: Option<ErrorField>,
        detail: Option<String>,
    }

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum ErrorField {
        Text(String),
        Object {
            message: Option<String>,
            #[serde(rename = "status")]
            error_type: Option<String>,
        },
    }

    let error_body = match response.text().await {
        Ok(body) => body,
        Err(e) => {
            return Error::http_client(
                format!("Failed to read error response: {}", e),
                Some(Box::new(e)),
            );
        }
    };

    let parsed = serde_json::from_str::<ErrorResponse>(&error_body).ok();
    let mut error_type = None;
    let mut error_message = None;
    match parsed {
        Some(ErrorResponse {
            error: Some(ErrorField::Text(text)),
            ..
        }) => {
            error_message = Some(text);
        }
        Some(ErrorResponse {
            error:
                Some(ErrorField::Object {
                    message,
                    error_type: status,
                }),
            ..
        }) => {
            error_message = message;
            error_type = status;
        }
        Some(ErrorResponse {
            error: None,
            detail,
        }) => {
            error_message = detail;
        }
        None => {}
    }
    let error_message = error_message.unwrap_or_else(|| error_body.clone());

    match status_code {
        400 => Error::bad_request(error_message, None),
        401 => Error::authentication(error_message),
        403 => Error::permission(error_message),
        404 => Error::not_found(error_message, None, None),
        408 => Error::timeout(error_message, None),
        429 => Error::rate_limit(error_message, retry_after),
        500 => Error::internal_server(error_message),
        502..=504 => Error::service_unavailable(error_message, retry_after),
        _ => Error::api(status_code, error_type, error_message),
    }
}
