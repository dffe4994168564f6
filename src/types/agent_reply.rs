use serde_json::Value;

/// Reply fields recognized in a JSON response body, in preference order.
const REPLY_FIELDS: &[&str] = &["response", "reply", "message"];

/// How the display text of a reply was produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplySource {
    /// A recognized top-level field held a string.
    Field(&'static str),

    /// The body was JSON but carried no recognized string field; the whole
    /// document was pretty-printed.
    PrettyJson,

    /// The body was not JSON and passed through unchanged.
    RawText,
}

/// The resolved display text of a successful agent response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentReply {
    /// The text shown in place of the pending placeholder.
    pub text: String,

    /// Which resolution rule produced the text.
    pub source: ReplySource,
}

impl AgentReply {
    /// Resolves a response body into display text.
    ///
    /// Agent deployments disagree about which field carries the reply, so
    /// resolution checks `response`, then `reply`, then `message`, taking the
    /// first whose value is a string. A recognized field holding a
    /// non-string is skipped rather than stringified, which keeps the
    /// ordering meaningful. JSON with no usable field pretty-prints; bodies
    /// that are not JSON at all pass through as-is. Resolution never fails.
    pub fn from_body(body: &str) -> Self {
        let Ok(value) = serde_json::from_str::<Value>(body) else {
            return AgentReply {
                text: body.to_string(),
                source: ReplySource::RawText,
            };
        };
        for &field in REPLY_FIELDS {
            if let Some(text) = value.get(field).and_then(Value::as_str) {
                return AgentReply {
                    text: text.to_string(),
                    source: ReplySource::Field(field),
                };
            }
        }
        let text = serde_json::to_string_pretty(&value).unwrap_or_else(|_| body.to_string());
        AgentReply {
            text,
            source: ReplySource::PrettyJson,
        }
    }
}
