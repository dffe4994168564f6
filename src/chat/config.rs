//! Configuration types for the chat shell.
//!
//! This module provides CLI argument parsing via `arrrg` and a resolved
//! configuration struct. Values resolve in order: command-line flag, then
//! YAML config file, then environment variable, then built-in default.

use std::env;
use std::path::Path;

use arrrg_derive::CommandLine;
use serde::Deserialize;

use crate::error::Result;

/// Default session namespace when none is configured.
pub const DEFAULT_NAMESPACE: &str = "local-test";

/// Command-line arguments for the wayfinder-chat tool.
#[derive(CommandLine, Debug, Default, PartialEq, Eq)]
pub struct ChatArgs {
    /// Agent endpoint base URL.
    #[arrrg(optional, "Agent base URL (default: $WAYFINDER_AGENT_URL)", "URL")]
    pub endpoint: Option<String>,

    /// Namespace prefixed onto session identifiers.
    #[arrrg(optional, "Session namespace (default: local-test)", "NAMESPACE")]
    pub namespace: Option<String>,

    /// Static bearer token sent with agent requests.
    #[arrrg(optional, "Bearer token for the agent (default: $WAYFINDER_ID_TOKEN)", "TOKEN")]
    pub token: Option<String>,

    /// Identity service base URL for password sign-in.
    #[arrrg(optional, "Identity service base URL", "URL")]
    pub identity_url: Option<String>,

    /// Identity service API key.
    #[arrrg(optional, "Identity service API key", "KEY")]
    pub identity_key: Option<String>,

    /// Profile store base URL.
    #[arrrg(optional, "Profile store base URL", "URL")]
    pub profile_url: Option<String>,

    /// Path to a YAML config file.
    #[arrrg(optional, "Read settings from a YAML file", "PATH")]
    pub config: Option<String>,

    /// Disable ANSI colors and styles.
    #[arrrg(flag, "Disable ANSI colors/styles")]
    pub no_color: bool,
}

/// On-disk form of the config file. Every field is optional; flags and the
/// environment fill whatever the file leaves out.
#[derive(Debug, Default, Deserialize, PartialEq)]
struct ChatConfigFile {
    endpoint: Option<String>,
    namespace: Option<String>,
    token: Option<String>,
    identity_url: Option<String>,
    identity_key: Option<String>,
    profile_url: Option<String>,
    profile_collection: Option<String>,
}

/// Configuration for a chat shell run.
///
/// This struct holds the resolved configuration values after processing
/// command-line arguments, the optional config file, and the environment.
#[derive(Debug, Clone)]
pub struct ChatConfig {
    /// Agent endpoint base URL. `None` defers to the client's own
    /// environment fallback.
    pub endpoint: Option<String>,

    /// Namespace prefixed onto session identifiers.
    pub namespace: String,

    /// Static bearer token. Superseded by identity sign-in when the
    /// identity service is configured.
    pub token: Option<String>,

    /// Identity service base URL.
    pub identity_url: Option<String>,

    /// Identity service API key.
    pub identity_key: Option<String>,

    /// Profile store base URL.
    pub profile_url: Option<String>,

    /// Profile store collection name.
    pub profile_collection: Option<String>,

    /// Whether to use ANSI colors and styles in output.
    pub use_color: bool,
}

impl ChatConfig {
    /// Creates a new ChatConfig with default values.
    ///
    /// Defaults:
    /// - Namespace: local-test
    /// - Color: enabled
    /// - Everything else: unset
    pub fn new() -> Self {
        Self {
            endpoint: None,
            namespace: DEFAULT_NAMESPACE.to_string(),
            token: None,
            identity_url: None,
            identity_key: None,
            profile_url: None,
            profile_collection: None,
            use_color: true,
        }
    }

    /// Resolves a full configuration from parsed arguments.
    ///
    /// Reads the YAML file named by `--config` when present, overlays the
    /// command-line flags, and finally consults WAYFINDER_SESSION_NAMESPACE
    /// and WAYFINDER_ID_TOKEN for anything still unset. Endpoint URLs stay
    /// `None` here; the clients own their environment fallbacks.
    pub fn load(args: &ChatArgs) -> Result<Self> {
        let file = match &args.config {
            Some(path) => ChatConfigFile::from_file(path)?,
            None => ChatConfigFile::default(),
        };

        let mut config = Self::new();
        config.endpoint = args.endpoint.clone().or(file.endpoint);
        config.token = args.token.clone().or(file.token);
        config.identity_url = args.identity_url.clone().or(file.identity_url);
        config.identity_key = args.identity_key.clone().or(file.identity_key);
        config.profile_url = args.profile_url.clone().or(file.profile_url);
        config.profile_collection = file.profile_collection;
        if let Some(namespace) = args.namespace.clone().or(file.namespace) {
            config.namespace = namespace;
        } else if let Ok(namespace) = env::var("WAYFINDER_SESSION_NAMESPACE") {
            config.namespace = namespace;
        }
        if config.token.is_none() {
            config.token = env::var("WAYFINDER_ID_TOKEN").ok();
        }
        if args.no_color {
            config.use_color = false;
        }
        Ok(config)
    }

    /// Sets the agent endpoint.
    pub fn with_endpoint(mut self, endpoint: String) -> Self {
        self.endpoint = Some(endpoint);
        self
    }

    /// Sets the session namespace.
    pub fn with_namespace(mut self, namespace: String) -> Self {
        self.namespace = namespace;
        self
    }

    /// Sets the static bearer token.
    pub fn with_token(mut self, token: String) -> Self {
        self.token = Some(token);
        self
    }

    /// Sets the identity service URL and API key.
    pub fn with_identity(mut self, url: String, key: String) -> Self {
        self.identity_url = Some(url);
        self.identity_key = Some(key);
        self
    }

    /// Sets the profile store URL.
    pub fn with_profile_url(mut self, url: String) -> Self {
        self.profile_url = Some(url);
        self
    }

    /// Disables ANSI color output.
    pub fn without_color(mut self) -> Self {
        self.use_color = false;
        self
    }

    /// True when password sign-in is available.
    pub fn has_identity_service(&self) -> bool {
        self.identity_url.is_some() || self.identity_key.is_some()
    }
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatConfigFile {
    fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config: Self = serde_yaml::from_str(&content)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = ChatConfig::new();
        assert_eq!(config.namespace, DEFAULT_NAMESPACE);
        assert!(config.use_color);
        assert!(config.endpoint.is_none());
        assert!(config.token.is_none());
        assert!(config.identity_url.is_none());
        assert!(config.identity_key.is_none());
        assert!(config.profile_url.is_none());
        assert!(config.profile_collection.is_none());
        assert!(!config.has_identity_service());
    }

    #[test]
    fn config_builder_pattern() {
        let config = ChatConfig::new()
            .with_endpoint("http://localhost:9000/agent".to_string())
            .with_namespace("staging".to_string())
            .with_token("tok".to_string())
            .with_identity("https://id.example.com".to_string(), "key".to_string())
            .with_profile_url("https://profiles.example.com".to_string())
            .without_color();

        assert_eq!(
            config.endpoint.as_deref(),
            Some("http://localhost:9000/agent")
        );
        assert_eq!(config.namespace, "staging");
        assert_eq!(config.token.as_deref(), Some("tok"));
        assert_eq!(config.identity_url.as_deref(), Some("https://id.example.com"));
        assert_eq!(config.identity_key.as_deref(), Some("key"));
        assert_eq!(
            config.profile_url.as_deref(),
            Some("https://profiles.example.com")
        );
        assert!(!config.use_color);
        assert!(config.has_identity_service());
    }

    #[test]
    fn flags_override_the_config_file() {
        let path = std::env::temp_dir().join(format!(
            "wayfinder-config-{}.yaml",
            uuid::Uuid::new_v4()
        ));
        std::fs::write(
            &path,
            "endpoint: http://file.example.com/agent\nnamespace: from-file\nprofile_collection: Students\n",
        )
        .unwrap();

        let args = ChatArgs {
            endpoint: Some("http://flag.example.com/agent".to_string()),
            config: Some(path.to_string_lossy().into_owned()),
            ..ChatArgs::default()
        };
        let config = ChatConfig::load(&args).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(
            config.endpoint.as_deref(),
            Some("http://flag.example.com/agent")
        );
        assert_eq!(config.namespace, "from-file");
        assert_eq!(config.profile_collection.as_deref(), Some("Students"));
    }

    #[test]
    fn missing_config_file_is_an_io_error() {
        let args = ChatArgs {
            config: Some("/nonexistent/wayfinder.yaml".to_string()),
            ..ChatArgs::default()
        };
        let err = ChatConfig::load(&args).unwrap_err();
        assert!(err.is_io());
    }

    #[test]
    fn malformed_config_file_is_a_serialization_error() {
        let path = std::env::temp_dir().join(format!(
            "wayfinder-config-{}.yaml",
            uuid::Uuid::new_v4()
        ));
        std::fs::write(&path, "endpoint: [not, a, string\n").unwrap();

        let args = ChatArgs {
            config: Some(path.to_string_lossy().into_owned()),
            ..ChatArgs::default()
        };
        let err = ChatConfig::load(&args).unwrap_err();
        std::fs::remove_file(&path).unwrap();

        assert!(err.is_serialization());
    }
}
