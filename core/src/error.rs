//! Error types for the Realtycloud client.
//!
//! # Design
//! Two families that never mix. `ValidationError` is raised while building
//! request objects, before any request exists. `ApiError` is produced by
//! `classify` from a non-2xx `HttpResponse` and carries the status code and
//! headers of that response. Transport failures stay in `TransportError`
//! and are the only kind a caller may reasonably retry.

use std::collections::BTreeMap;
use std::fmt;

use serde::Deserialize;
use thiserror::Error;

use crate::http::HttpResponse;

/// A request object or owner violated one of the API's input rules.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("invalid object key {key:?}: must match {pattern}")]
    ObjectKey { key: String, pattern: &'static str },

    #[error("address is {len} characters long, at most {max} allowed")]
    AddressTooLong { len: usize, max: usize },

    #[error("owner type must be specified: 0 for an individual, 1 for a legal entity")]
    UnknownOwnerType { value: Option<i64> },

    #[error("{field} is required")]
    MissingField { field: &'static str },

    #[error("{field} must consist of Cyrillic letters and hyphens only")]
    PersonName { field: &'static str },

    #[error("passport must be exactly {len} digits")]
    Passport { len: usize },

    #[error("birthday {value:?} must be in DD.MM.YYYY format")]
    Birthday { value: String },

    #[error("region must be 1 to {max} digits")]
    Region { max: usize },

    #[error("INN must be exactly {len} digits")]
    Inn { len: usize },

    #[error("company name is {len} characters long, at most {max} allowed")]
    CompanyNameTooLong { len: usize, max: usize },

    #[error("registration number is {len} characters long, at most {max} allowed")]
    RegistrationNumberTooLong { len: usize, max: usize },
}

/// Status code, headers and message of a failed API call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusError {
    pub message: String,
    pub status: u16,
    pub headers: BTreeMap<String, String>,
}

impl fmt::Display for StatusError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HTTP {}: {}", self.status, self.message)
    }
}

impl StatusError {
    fn from_response(response: &HttpResponse, message: String) -> Self {
        Self {
            message,
            status: response.status,
            headers: response
                .headers
                .iter()
                .map(|(name, value)| (name.to_ascii_lowercase(), value.clone()))
                .collect(),
        }
    }
}

/// The API answered with a non-success status.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// 400 Bad Request.
    #[error("bad request ({0})")]
    BadRequest(StatusError),

    /// 403 Forbidden.
    #[error("forbidden ({0})")]
    Forbidden(StatusError),

    /// 404 Not Found.
    #[error("not found ({0})")]
    NotFound(StatusError),

    /// 500 whose `error` text matched none of the known conditions.
    #[error("server error ({0})")]
    ServerError(StatusError),

    #[error("{0}")]
    InvalidKey(StatusError),

    #[error("{0}")]
    FieldError(StatusError),

    #[error("{0}")]
    RequestLimitExceeded(StatusError),

    /// Any other non-2xx status.
    #[error("{0}")]
    Status(StatusError),
}

impl ApiError {
    pub fn details(&self) -> &StatusError {
        match self {
            ApiError::BadRequest(e)
            | ApiError::Forbidden(e)
            | ApiError::NotFound(e)
            | ApiError::ServerError(e)
            | ApiError::InvalidKey(e)
            | ApiError::FieldError(e)
            | ApiError::RequestLimitExceeded(e)
            | ApiError::Status(e) => e,
        }
    }

    pub fn status(&self) -> u16 {
        self.details().status
    }

    pub fn message(&self) -> &str {
        &self.details().message
    }

    pub fn headers(&self) -> &BTreeMap<String, String> {
        &self.details().headers
    }
}

/// The request never produced an HTTP response.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("transport error: {message}")]
pub struct TransportError {
    message: String,
    timed_out: bool,
}

impl TransportError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            timed_out: false,
        }
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            timed_out: true,
        }
    }

    pub fn is_timeout(&self) -> bool {
        self.timed_out
    }
}

impl From<ureq::Error> for TransportError {
    fn from(err: ureq::Error) -> Self {
        match err {
            ureq::Error::Timeout(_) => TransportError::timeout(err.to_string()),
            other => TransportError::new(other.to_string()),
        }
    }
}

/// Errors returned by `Realtycloud` and the endpoint-group clients.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(String),

    /// A success response body could not be deserialized.
    #[error("deserialization failed: {0}")]
    Deserialization(String),

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl Error {
    /// Only transport failures may succeed when the same call is issued again.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Error::Transport(_))
    }
}

const INVALID_KEY_MARKER: &str = "невалидный ключ";
const FIELD_ERROR_MARKER: &str = "неверно указано поле";
const REQUEST_LIMIT_MARKER: &str = "вы превысили лимит использования поиска";

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: Option<String>,
}

/// Map a non-success response to the matching `ApiError` variant.
pub fn classify(response: &HttpResponse) -> ApiError {
    let raw = || StatusError::from_response(response, response.body.clone());
    match response.status {
        400 => ApiError::BadRequest(raw()),
        403 => ApiError::Forbidden(raw()),
        404 => ApiError::NotFound(raw()),
        500 => {
            let error_text = serde_json::from_str::<ErrorBody>(&response.body)
                .ok()
                .and_then(|body| body.error)
                .unwrap_or_default()
                // Markers are lowercase; the API capitalizes the first word of a message.
                .to_lowercase();
            let fixed = |message: &str| StatusError::from_response(response, message.to_string());
            if error_text.contains(INVALID_KEY_MARKER) {
                ApiError::InvalidKey(fixed("invalid API key"))
            } else if error_text.contains(FIELD_ERROR_MARKER) {
                ApiError::FieldError(fixed("a request field is specified incorrectly"))
            } else if error_text.contains(REQUEST_LIMIT_MARKER) {
                ApiError::RequestLimitExceeded(fixed("search usage limit exceeded"))
            } else {
                ApiError::ServerError(raw())
            }
        }
        _ => ApiError::Status(raw()),
    }
}
