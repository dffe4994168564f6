//! Identity management against an identity-toolkit style REST provider.
//!
//! Identity is a collaborator, not a dependency: everything here hides
//! behind the [`IdentityProvider`] trait so chat and profile code never
//! know which provider (or fake) is underneath. Credential changes fan out
//! through [`IdentityEvents`], a watch-channel subscription that delivers
//! every sign-in, refresh, and sign-out; dropping the handle unsubscribes.

use std::env;
use std::time::Duration;

use reqwest::Client as ReqwestClient;
use serde::{Deserialize, Serialize};
use tokio::sync::{Mutex, watch};

use crate::client::{map_transport_error, process_error_response};
use crate::error::{Error, Result};
use crate::observability::{IDENTITY_FAILURES, IDENTITY_REFRESHES, IDENTITY_SIGN_INS};

const DEFAULT_IDENTITY_URL: &str = "https://identitytoolkit.googleapis.com";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

//////////////////////////////////////////// AuthState ///////////////////////////////////////////

/// A signed-in user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Principal {
    /// Stable user identifier assigned by the provider.
    pub uid: String,

    /// The account email, when the provider shares it.
    pub email: Option<String>,

    /// Display name, when one is set on the account.
    pub display_name: Option<String>,
}

/// The credential state delivered to subscribers.
///
/// Both fields are set while signed in and both are `None` while signed
/// out; refreshes keep the principal and swap the token.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AuthState {
    /// The signed-in user, if any.
    pub principal: Option<Principal>,

    /// The current id token, if any.
    pub id_token: Option<String>,
}

impl AuthState {
    /// Returns the signed-out state.
    pub fn signed_out() -> Self {
        AuthState::default()
    }

    /// Returns true if a principal is signed in.
    pub fn is_signed_in(&self) -> bool {
        self.principal.is_some()
    }

    /// Returns the signed-in uid, if any.
    pub fn uid(&self) -> Option<&str> {
        self.principal.as_ref().map(|p| p.uid.as_str())
    }
}

////////////////////////////////////////// IdentityEvents ////////////////////////////////////////

/// A subscription to credential changes.
///
/// Intermediate states may coalesce when the subscriber lags; the latest
/// state always arrives. The stream ends when the provider is dropped.
pub struct IdentityEvents {
    receiver: watch::Receiver<AuthState>,
}

impl IdentityEvents {
    /// Waits for the next credential change and returns the new state, or
    /// `None` once the provider is gone.
    pub async fn next(&mut self) -> Option<AuthState> {
        match self.receiver.changed().await {
            Ok(()) => Some(self.receiver.borrow_and_update().clone()),
            Err(_) => None,
        }
    }

    /// Returns the current state without waiting.
    pub fn current(&self) -> AuthState {
        self.receiver.borrow().clone()
    }
}

///////////////////////////////////////// IdentityProvider ///////////////////////////////////////

/// Identity behavior expected by the chat and profile layers.
#[async_trait::async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Signs in with an email and password, publishing the new state to
    /// subscribers.
    async fn sign_in(&self, email: &str, password: &str) -> Result<Principal>;

    /// Clears the local credential state and publishes the signed-out
    /// state. Nothing is revoked remotely.
    async fn sign_out(&self);

    /// Returns the current state without subscribing.
    fn snapshot(&self) -> AuthState;

    /// Subscribes to credential changes.
    fn subscribe(&self) -> IdentityEvents;
}

///////////////////////////////////////// PasswordIdentity ///////////////////////////////////////

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SignInRequest<'a> {
    email: &'a str,
    password: &'a str,
    return_secure_token: bool,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SignInResponse {
    id_token: String,
    refresh_token: String,
    local_id: String,
    email: Option<String>,
    display_name: Option<String>,
}

#[derive(Serialize)]
struct RefreshRequest<'a> {
    grant_type: &'a str,
    refresh_token: &'a str,
}

// The token grant answers in snake_case, unlike sign-in.
#[derive(Deserialize)]
struct RefreshResponse {
    id_token: String,
    refresh_token: Option<String>,
}

/// Identity provider speaking the identity-toolkit REST surface.
///
/// Supports password sign-in and a single-shot refresh-token exchange.
/// Nothing here schedules refreshes; callers decide when a token is stale.
pub struct PasswordIdentity {
    client: ReqwestClient,
    base_url: String,
    api_key: String,
    timeout: Duration,
    state: watch::Sender<AuthState>,
    refresh_token: Mutex<Option<String>>,
}

impl PasswordIdentity {
    /// Create a new password identity provider.
    ///
    /// The base URL and API key can be provided directly or read from the
    /// WAYFINDER_IDENTITY_URL and WAYFINDER_IDENTITY_KEY environment
    /// variables. The API key is required; the URL falls back to the hosted
    /// toolkit.
    pub fn new(base_url: Option<String>, api_key: Option<String>) -> Result<Self> {
        Self::with_options(base_url, api_key, None)
    }

    /// Create a new provider with custom settings.
    pub fn with_options(
        base_url: Option<String>,
        api_key: Option<String>,
        timeout: Option<Duration>,
    ) -> Result<Self> {
        let base_url = match base_url {
            Some(url) => url,
            None => env::var("WAYFINDER_IDENTITY_URL")
                .unwrap_or_else(|_| DEFAULT_IDENTITY_URL.to_string()),
        };
        let base_url = base_url.trim_end_matches('/').to_string();
        url::Url::parse(&base_url)?;

        let api_key = match api_key {
            Some(key) => key,
            None => env::var("WAYFINDER_IDENTITY_KEY").map_err(|_| {
                Error::authentication(
                    "API key not provided and WAYFINDER_IDENTITY_KEY environment variable not set",
                )
            })?,
        };

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

        let (state, _) = watch::channel(AuthState::signed_out());
        Ok(Self {
            client,
            base_url,
            api_key,
            timeout,
            state,
            refresh_token: Mutex::new(None),
        })
    }

    fn sign_in_url(&self) -> String {
        format!(
            "{}/v1/accounts:signInWithPassword?key={}",
            self.base_url, self.api_key
        )
    }

    fn refresh_url(&self) -> String {
        format!("{}/v1/token?key={}", self.base_url, self.api_key)
    }

    /// Exchange the refresh token for a fresh id token and publish the new
    /// credential to subscribers. One call, one exchange.
    pub async fn refresh(&self) -> Result<()> {
        let refresh_token = self.refresh_token.lock().await.clone();
        let Some(refresh_token) = refresh_token else {
            return Err(Error::authentication(
                "no refresh token held; sign in first",
            ));
        };

        let body = RefreshRequest {
            grant_type: "refresh_token",
            refresh_token: &refresh_token,
        };
        let response = self
            .client
            .post(self.refresh_url())
            .json(&body)
            .send()
            .await
            .map_err(|e| map_transport_error(e, self.timeout))?;

        if !response.status().is_success() {
            IDENTITY_FAILURES.click();
            return Err(process_error_response(response).await);
        }

        let grant: RefreshResponse = response.json().await.map_err(|e| {
            Error::serialization(
                format!("Failed to parse token grant: {}", e),
                Some(Box::new(e)),
            )
        })?;

        if let Some(next) = grant.refresh_token {
            *self.refresh_token.lock().await = Some(next);
        }
        let principal = self.state.borrow().principal.clone();
        self.state.send_replace(AuthState {
            principal,
            id_token: Some(grant.id_token),
        });
        IDENTITY_REFRESHES.click();
        Ok(())
    }
}

#[async_trait::async_trait]
impl IdentityProvider for PasswordIdentity {
    async fn sign_in(&self, email: &str, password: &str) -> Result<Principal> {
        let body = SignInRequest {
            email,
            password,
            return_secure_token: true,
        };
        let response = self
            .client
            .post(self.sign_in_url())
            .json(&body)
            .send()
            .await
            .map_err(|e| map_transport_error(e, self.timeout))?;

        if !response.status().is_success() {
            IDENTITY_FAILURES.click();
            let err = process_error_response(response).await;
            // The toolkit reports rejected credentials as plain 400s.
            return Err(match err {
                Error::BadRequest { message, .. } => Error::authentication(message),
                other => other,
            });
        }

        let signed_in: SignInResponse = response.json().await.map_err(|e| {
            Error::serialization(
                format!("Failed to parse sign-in response: {}", e),
                Some(Box::new(e)),
            )
        })?;

        let principal = Principal {
            uid: signed_in.local_id,
            email: signed_in.email,
            display_name: signed_in.display_name,
        };
        *self.refresh_token.lock().await = Some(signed_in.refresh_token);
        self.state.send_replace(AuthState {
            principal: Some(principal.clone()),
            id_token: Some(signed_in.id_token),
        });
        IDENTITY_SIGN_INS.click();
        Ok(principal)
    }

    async fn sign_out(&self) {
        *self.refresh_token.lock().await = None;
        self.state.send_replace(AuthState::signed_out());
    }

    fn snapshot(&self) -> AuthState {
        self.state.borrow().clone()
    }

    fn subscribe(&self) -> IdentityEvents {
        IdentityEvents {
            receiver: self.state.subscribe(),
        }
    }
}

////////////////////////////////////////// StaticIdentity ////////////////////////////////////////

/// Identity backed by a pre-issued token.
///
/// Fits deployments that mint tokens out of band, and doubles as the guest
/// vehicle when constructed empty. Sign-in is not supported.
pub struct StaticIdentity {
    state: watch::Sender<AuthState>,
}

impl StaticIdentity {
    /// Creates a provider holding the given token and principal.
    pub fn new(id_token: Option<String>, principal: Option<Principal>) -> Self {
        let (state, _) = watch::channel(AuthState {
            principal,
            id_token,
        });
        Self { state }
    }

    /// Creates a signed-out provider. Sessions built on it derive guest
    /// session ids and send no Authorization header.
    pub fn guest() -> Self {
        Self::new(None, None)
    }
}

#[async_trait::async_trait]
impl IdentityProvider for StaticIdentity {
    async fn sign_in(&self, _email: &str, _password: &str) -> Result<Principal> {
        Err(Error::validation(
            "static identity cannot sign in; configure an identity URL and key",
            None,
        ))
    }

    async fn sign_out(&self) {
        self.state.send_replace(AuthState::signed_out());
    }

    fn snapshot(&self) -> AuthState {
        self.state.borrow().clone()
    }

    fn subscribe(&self) -> IdentityEvents {
        IdentityEvents {
            receiver: self.state.subscribe(),
        }
    }
}
