//! Profile documents and their display helpers.
//!
//! Each prospective student may have one profile document in a remote
//! document store, keyed by their uid. Every field is optional and absence
//! of the whole record is an ordinary state, not an error; the reader
//! renders whatever is there. Fetch failures are scoped: callers surface
//! them inline and the chat stays usable.

use std::env;
use std::time::Duration;

use reqwest::Client as ReqwestClient;
use serde::{Deserialize, Serialize};

use crate::client::{map_transport_error, process_error_response};
use crate::error::{Error, Result};
use crate::observability::{PROFILE_ERRORS, PROFILE_FETCHES, PROFILE_MISSES};
use crate::utils;

const DEFAULT_COLLECTION: &str = "Users";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Placeholder shown for any missing profile value.
pub const MISSING_VALUE: &str = "—";

/////////////////////////////////////////// StudentProfile ///////////////////////////////////////

/// A prospective student's stored profile.
///
/// Field names mirror the stored document (camelCase on the wire). Two
/// timestamp fields exist because older documents carried `lastUpdatedAt`;
/// [`last_updated`](StudentProfile::last_updated) prefers the newer field.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StudentProfile {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub study_level: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub preferences: Option<Preferences>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<ProfileTimestamp>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_updated_at: Option<ProfileTimestamp>,
}

/// Study preferences nested inside a profile.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Preferences {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub budget: Option<BudgetPreference>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub destination_countries: Option<Vec<String>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub field_of_study: Option<FieldOfStudy>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub intake: Option<Intake>,
}

/// Budget preference.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BudgetPreference {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub annual_amount: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency_code: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub considers_loan: Option<bool>,
}

/// Field-of-study preference.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FieldOfStudy {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub focus: Option<String>,
}

/// Target intake preference.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Intake {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub month: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
}

/// A timestamp as document stores write them: either a preformatted string
/// or an epoch seconds/nanoseconds pair.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum ProfileTimestamp {
    Text(String),
    Epoch {
        seconds: i64,
        #[serde(default)]
        nanoseconds: i64,
    },
}

impl ProfileTimestamp {
    /// Renders the timestamp for display. Strings pass through unchanged;
    /// epoch pairs render as UTC RFC 3339.
    pub fn display(&self) -> String {
        match self {
            ProfileTimestamp::Text(text) => text.clone(),
            ProfileTimestamp::Epoch {
                seconds,
                nanoseconds,
            } => utils::time::from_epoch_pair(*seconds, *nanoseconds)
                .and_then(utils::time::to_rfc3339)
                .unwrap_or_else(|| seconds.to_string()),
        }
    }
}

impl StudentProfile {
    /// Returns the student's name: the display name when set, otherwise
    /// first and last composed, otherwise `None`.
    pub fn full_name(&self) -> Option<String> {
        if let Some(name) = self.display_name.as_deref().filter(|s| !s.is_empty()) {
            return Some(name.to_string());
        }
        let composed = [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        if composed.is_empty() {
            None
        } else {
            Some(composed)
        }
    }

    /// Returns the freshest update timestamp, preferring `updatedAt` over
    /// the legacy `lastUpdatedAt`.
    pub fn last_updated(&self) -> Option<&ProfileTimestamp> {
        self.updated_at.as_ref().or(self.last_updated_at.as_ref())
    }
}

impl BudgetPreference {
    /// Renders the budget line, appending a loan note when loans are in
    /// play.
    pub fn display(&self) -> String {
        let amount = format_currency(self.annual_amount, self.currency_code.as_deref());
        if self.considers_loan.unwrap_or(false) {
            format!("{amount} (loan ok)")
        } else {
            amount
        }
    }
}

impl FieldOfStudy {
    /// Renders the field of study with its focus when both are present.
    pub fn display(&self) -> String {
        match (&self.category, &self.focus) {
            (Some(category), Some(focus)) => format!("{category} · {focus}"),
            (Some(category), None) => category.clone(),
            (None, Some(focus)) => focus.clone(),
            (None, None) => MISSING_VALUE.to_string(),
        }
    }
}

impl Intake {
    /// Renders the target intake; an unset month reads as to-be-decided.
    pub fn display(&self) -> String {
        let month = self.month.as_deref().unwrap_or("TBD");
        match self.year {
            Some(year) => format!("{month} {year}"),
            None => month.to_string(),
        }
    }
}

/// Formats a currency amount with thousands grouping, or the missing-value
/// placeholder when the amount is absent or zero.
pub fn format_currency(amount: Option<f64>, currency: Option<&str>) -> String {
    let Some(amount) = amount.filter(|a| *a != 0.0) else {
        return MISSING_VALUE.to_string();
    };
    let code = currency.unwrap_or("USD");
    format!("{} {}", code, group_thousands(amount.round() as i64))
}

fn group_thousands(value: i64) -> String {
    let negative = value < 0;
    let digits = value.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if negative {
        format!("-{grouped}")
    } else {
        grouped
    }
}

//////////////////////////////////////////// ProfileStore ////////////////////////////////////////

/// Profile lookup behavior expected by the chat and profile surfaces.
#[async_trait::async_trait]
pub trait ProfileStore: Send + Sync {
    /// Fetches the profile document for a uid. A missing document is
    /// `Ok(None)`.
    async fn fetch_profile(&self, uid: &str) -> Result<Option<StudentProfile>>;
}

/// Client for a document-store REST endpoint serving profile documents.
#[derive(Debug, Clone)]
pub struct ProfileClient {
    client: ReqwestClient,
    base_url: String,
    collection: String,
    bearer: Option<String>,
    timeout: Duration,
}

impl ProfileClient {
    /// Create a new profile client.
    ///
    /// The base URL can be provided directly or read from the
    /// WAYFINDER_PROFILE_URL environment variable; there is no default
    /// host.
    pub fn new(base_url: Option<String>) -> Result<Self> {
        Self::with_options(base_url, None, None)
    }

    /// Create a new client with custom settings.
    pub fn with_options(
        base_url: Option<String>,
        collection: Option<String>,
        timeout: Option<Duration>,
    ) -> Result<Self> {
        let base_url = match base_url {
            Some(url) => url,
            None => env::var("WAYFINDER_PROFILE_URL").map_err(|_| {
                Error::validation(
                    "profile base URL not provided and WAYFINDER_PROFILE_URL environment variable not set",
                    Some("base_url".to_string()),
                )
            })?,
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
            collection: collection.unwrap_or_else(|| DEFAULT_COLLECTION.to_string()),
            bearer: None,
            timeout,
        })
    }

    /// Attach a bearer credential sent with every lookup.
    pub fn with_bearer(mut self, bearer: impl Into<String>) -> Self {
        self.bearer = Some(bearer.into());
        self
    }

    fn document_url(&self, uid: &str) -> String {
        format!("{}/{}/{}", self.base_url, self.collection, uid)
    }
}

#[async_trait::async_trait]
impl ProfileStore for ProfileClient {
    async fn fetch_profile(&self, uid: &str) -> Result<Option<StudentProfile>> {
        PROFILE_FETCHES.click();

        let mut request = self.client.get(self.document_url(uid));
        if let Some(bearer) = &self.bearer {
            request = request.bearer_auth(bearer);
        }
        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => {
                PROFILE_ERRORS.click();
                return Err(map_transport_error(e, self.timeout));
            }
        };

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            PROFILE_MISSES.click();
            return Ok(None);
        }
        if !response.status().is_success() {
            PROFILE_ERRORS.click();
            return Err(process_error_response(response).await);
        }

        match response.json::<StudentProfile>().await {
            Ok(profile) => Ok(Some(profile)),
            Err(e) => {
                PROFILE_ERRORS.click();
                Err(Error::serialization(
                    format!("Failed to parse profile document: {}", e),
                    Some(Box::new(e)),
                ))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_a_full_document() {
        let json = r#"{
            "displayName": "Asha Rao",
            "firstName": "Asha",
            "lastName": "Rao",
            "email": "asha@example.com",
            "phoneNumber": "+91 98765 43210",
            "studyLevel": "masters",
            "source": "referral",
            "preferences": {
                "budget": {"annualAmount": 25000, "currencyCode": "EUR", "considersLoan": true},
                "destinationCountries": ["Netherlands", "Germany"],
                "fieldOfStudy": {"category": "Engineering", "focus": "Robotics"},
                "intake": {"month": "September", "year": 2026}
            },
            "updatedAt": "2026-01-05T10:00:00Z"
        }"#;
        let profile: StudentProfile = serde_json::from_str(json).unwrap();
        assert_eq!(profile.full_name().as_deref(), Some("Asha Rao"));
        let preferences = profile.preferences.as_ref().unwrap();
        assert_eq!(
            preferences.destination_countries.as_deref(),
            Some(&["Netherlands".to_string(), "Germany".to_string()][..])
        );
        assert_eq!(
            preferences.budget.as_ref().unwrap().display(),
            "EUR 25,000 (loan ok)"
        );
        assert_eq!(
            preferences.field_of_study.as_ref().unwrap().display(),
            "Engineering · Robotics"
        );
        assert_eq!(
            preferences.intake.as_ref().unwrap().display(),
            "September 2026"
        );
        assert_eq!(
            profile.last_updated().unwrap().display(),
            "2026-01-05T10:00:00Z"
        );
    }

    #[test]
    fn deserializes_an_empty_document() {
        let profile: StudentProfile = serde_json::from_str("{}").unwrap();
        assert_eq!(profile, StudentProfile::default());
        assert!(profile.full_name().is_none());
        assert!(profile.last_updated().is_none());
    }

    #[test]
    fn epoch_timestamps_deserialize_and_display() {
        let profile: StudentProfile = serde_json::from_str(
            r#"{"lastUpdatedAt": {"seconds": 1700000000, "nanoseconds": 250000000}}"#,
        )
        .unwrap();
        assert_eq!(
            profile.last_updated().unwrap().display(),
            "2023-11-14T22:13:20.25Z"
        );
    }

    #[test]
    fn updated_at_outranks_last_updated_at() {
        let profile: StudentProfile = serde_json::from_str(
            r#"{"updatedAt": "new", "lastUpdatedAt": "old"}"#,
        )
        .unwrap();
        assert_eq!(profile.last_updated().unwrap().display(), "new");
    }

    #[test]
    fn full_name_composes_from_parts() {
        let profile: StudentProfile =
            serde_json::from_str(r#"{"firstName": "Asha", "lastName": "Rao"}"#).unwrap();
        assert_eq!(profile.full_name().as_deref(), Some("Asha Rao"));

        let profile: StudentProfile = serde_json::from_str(r#"{"firstName": "Asha"}"#).unwrap();
        assert_eq!(profile.full_name().as_deref(), Some("Asha"));

        let profile: StudentProfile =
            serde_json::from_str(r#"{"displayName": "A. Rao", "firstName": "Asha"}"#).unwrap();
        assert_eq!(profile.full_name().as_deref(), Some("A. Rao"));
    }

    #[test]
    fn currency_formatting() {
        assert_eq!(format_currency(None, Some("EUR")), MISSING_VALUE);
        assert_eq!(format_currency(Some(0.0), Some("EUR")), MISSING_VALUE);
        assert_eq!(format_currency(Some(12000.0), Some("EUR")), "EUR 12,000");
        assert_eq!(format_currency(Some(950.0), None), "USD 950");
        assert_eq!(
            format_currency(Some(1234567.4), Some("INR")),
            "INR 1,234,567"
        );
    }

    #[test]
    fn intake_without_year_reads_tbd() {
        let intake = Intake {
            month: None,
            year: None,
        };
        assert_eq!(intake.display(), "TBD");

        let intake = Intake {
            month: None,
            year: Some(2027),
        };
        assert_eq!(intake.display(), "TBD 2027");
    }

    #[test]
    fn document_url_shape() {
        let client = ProfileClient::with_options(
            Some("https://profiles.example.com/api/".to_string()),
            None,
            None,
        )
        .unwrap();
        assert_eq!(
            client.document_url("u123"),
            "https://profiles.example.com/api/Users/u123"
        );

        let client = ProfileClient::with_options(
            Some("https://profiles.example.com/api".to_string()),
            Some("Students".to_string()),
            None,
        )
        .unwrap();
        assert_eq!(
            client.document_url("u123"),
            "https://profiles.example.com/api/Students/u123"
        );
    }
}
