//! Error types for the API client.

use std::fmt;

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

/// Errors that can occur when making API requests.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// No auth token was configured and `$MTS_AUTH_TOKEN` is empty.
    #[error("missing MyTimeStation API auth token")]
    MissingToken,
    /// The request could not be assembled (bad URL or header value).
    #[error("could not build request: {0}")]
    InvalidRequest(String),
    /// The JSON request body could not be serialized.
    #[error("could not marshal json")]
    EncodeJson(#[source] serde_json::Error),
    /// The form request body could not be serialized.
    #[error("could not marshal url-form-encoded: {0}")]
    EncodeForm(String),
    /// The wrapped transport failed to perform the request.
    #[error("request failed")]
    Transport(#[source] Box<Error>),
    /// Network-level failure (connect, DNS, TLS, body read).
    #[error("network error")]
    Network(#[from] reqwest::Error),
    /// The API answered with a non-2xx status.
    #[error(transparent)]
    Service(#[from] ServiceError),
    /// A success response body did not match the expected shape.
    #[error("failed to decode response")]
    Decode(#[source] serde_json::Error),
}

impl Error {
    /// Returns the service error behind this error, if any.
    pub fn service(&self) -> Option<&ServiceError> {
        match self {
            Self::Service(e) => Some(e),
            Self::Transport(inner) => inner.service(),
            _ => None,
        }
    }
}

/// Response body carrying a service error.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ErrorResponse {
    #[serde(default)]
    pub error: ServiceError,
}

/// A service error returned by the MyTimeStation API.
#[derive(thiserror::Error, Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[error("[{code}] {text}")]
pub struct ServiceError {
    #[serde(rename = "error_code", default)]
    pub code: i64,
    #[serde(rename = "error_text", default)]
    pub text: String,
}

impl ServiceError {
    /// Maps a non-2xx response to a service error.
    ///
    /// A body that is empty or not an error envelope is ignored so the
    /// original failure is not hidden behind a parse error. A zero code is
    /// replaced with the HTTP status, and an empty text with the standard
    /// reason phrase of the resulting code.
    pub fn from_response(status: StatusCode, body: &[u8]) -> Self {
        let mut err = serde_json::from_slice::<ErrorResponse>(body)
            .map(|resp| resp.error)
            .unwrap_or_default();

        if err.code == 0 {
            err.code = i64::from(status.as_u16());
        }

        if err.text.is_empty() {
            err.text = reason_phrase(err.code).to_string();
        }

        err
    }
}

/// Standard reason phrase for `code`, empty for codes without one.
fn reason_phrase(code: i64) -> &'static str {
    u16::try_from(code)
        .ok()
        .and_then(|code| StatusCode::from_u16(code).ok())
        .and_then(|status| status.canonical_reason())
        .unwrap_or("")
}

/// Several independent failures reported together, in the order they occurred.
#[derive(Debug, Default)]
pub struct ErrorList(Vec<Error>);

impl ErrorList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, err: Error) {
        self.0.push(err);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Error> {
        self.0.iter()
    }

    /// `Ok(())` when nothing failed, otherwise the list itself.
    pub fn into_result(self) -> Result<(), ErrorList> {
        if self.0.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ErrorList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("errors:")?;
        for err in &self.0 {
            write!(f, " {}", err)?;
            let mut source = std::error::Error::source(err);
            while let Some(cause) = source {
                write!(f, ": {}", cause)?;
                source = cause.source();
            }
            f.write_str(";")?;
        }
        Ok(())
    }
}

impl std::error::Error for ErrorList {}

impl FromIterator<Error> for ErrorList {
    fn from_iter<I: IntoIterator<Item = Error>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for ErrorList {
    type Item = Error;
    type IntoIter = std::vec::IntoIter<Error>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}
