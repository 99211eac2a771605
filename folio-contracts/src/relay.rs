//! Contact-form mail relay boundary.
//!
//! The gallery never talks to the relay; the types live here so the contact
//! form and the gallery share one set of host-facing contracts.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Payload accepted by the mail relay endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactRequest {
    /// Sender name. Required.
    pub name: String,
    /// Sender email. Required.
    pub email: String,
    /// Sender's company.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    /// Service the sender asks about.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service: Option<String>,
    /// Free-form message body.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Why a contact request was refused before sending.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ContactValidationError {
    /// A required field is blank.
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    /// The email has no local part or domain.
    #[error("invalid email address: {0}")]
    InvalidEmail(String),
}

impl ContactRequest {
    /// Request with only the required fields set.
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            company: None,
            service: None,
            message: None,
        }
    }

    /// Check the fields the relay rejects on: `name` and `email` must be
    /// present and the email must at least look like one.
    pub fn validate(&self) -> Result<(), ContactValidationError> {
        if self.name.trim().is_empty() {
            return Err(ContactValidationError::MissingField("name"));
        }
        let email = self.email.trim();
        if email.is_empty() {
            return Err(ContactValidationError::MissingField("email"));
        }
        match email.split_once('@') {
            Some((local, domain)) if !local.is_empty() && !domain.is_empty() => {
                Ok(())
            }
            _ => Err(ContactValidationError::InvalidEmail(email.to_string())),
        }
    }
}

/// Outcome reported by the relay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelayResponse {
    /// The relay sent the message.
    Accepted {
        /// Confirmation text, when the relay gives one.
        message: Option<String>,
    },
    /// The relay refused the request.
    Rejected {
        /// Reason given by the relay.
        error: String,
    },
}

#[derive(Debug, Deserialize)]
struct RawRelayResponse {
    success: bool,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

impl From<RawRelayResponse> for RelayResponse {
    fn from(raw: RawRelayResponse) -> Self {
        if raw.success {
            RelayResponse::Accepted {
                message: raw.message,
            }
        } else {
            RelayResponse::Rejected {
                error: raw.error.unwrap_or_else(|| "unknown error".to_string()),
            }
        }
    }
}

impl RelayResponse {
    /// Decode the relay's JSON reply.
    pub fn from_json(body: &str) -> Result<Self, RelayError> {
        let raw: RawRelayResponse = serde_json::from_str(body)
            .map_err(|err| RelayError::MalformedResponse(err.to_string()))?;
        Ok(raw.into())
    }

    /// True when the relay sent the message.
    pub fn is_accepted(&self) -> bool {
        matches!(self, RelayResponse::Accepted { .. })
    }
}

/// Failure to submit a contact request.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RelayError {
    /// The request failed validation.
    #[error(transparent)]
    Invalid(#[from] ContactValidationError),

    /// The relay could not be reached.
    #[error("relay unreachable: {0}")]
    Transport(String),

    /// The relay replied with something other than its JSON shape.
    #[error("malformed relay response: {0}")]
    MalformedResponse(String),
}

/// Fire-and-forget submission of a contact request.
#[async_trait::async_trait]
pub trait MailRelay: Send + Sync {
    /// Validate and send `request`.
    async fn submit(
        &self,
        request: &ContactRequest,
    ) -> Result<RelayResponse, RelayError>;
}
