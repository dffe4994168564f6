use serde::{Deserialize, Serialize};

/// Marker used in place of a uid when nobody is signed in.
pub const GUEST_MARKER: &str = "guest";

/// A stable conversation identifier sent with every prompt.
///
/// The agent keys its conversation memory on this value, so it must be
/// deterministic: the same namespace and principal always derive the same
/// session id, across restarts and across sign-in/sign-out cycles.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    /// Derives the session id for a namespace and an optionally signed-in
    /// principal.
    pub fn derive(namespace: &str, uid: Option<&str>) -> Self {
        SessionId(format!("{}-{}", namespace, uid.unwrap_or(GUEST_MARKER)))
    }

    /// Returns the session id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derivation_is_deterministic() {
        let a = SessionId::derive("local-test", Some("u123"));
        let b = SessionId::derive("local-test", Some("u123"));
        assert_eq!(a, b);
        assert_eq!(a.as_str(), "local-test-u123");
    }

    #[test]
    fn signed_out_uses_the_guest_marker() {
        let id = SessionId::derive("local-test", None);
        assert_eq!(id.as_str(), "local-test-guest");
    }

    #[test]
    fn namespaces_partition_sessions() {
        let staging = SessionId::derive("staging", Some("u123"));
        let prod = SessionId::derive("prod", Some("u123"));
        assert_ne!(staging, prod);
    }
}
