use std::fmt;

use serde::{Deserialize, Serialize};

/// Request method as seen by the registration core.
///
/// Only `PUT` registers a key; everything else is carried verbatim so it
/// can be logged when rejected.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Method {
    Put,
    Other(String),
}

impl Method {
    pub fn from_http_name(name: &str) -> Self {
        if name == "PUT" {
            Self::Put
        } else {
            Self::Other(name.to_string())
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Put => write!(f, "PUT"),
            Self::Other(name) => write!(f, "{name}"),
        }
    }
}

/// A single inbound registration attempt, built by the front end and
/// consumed once by the core.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RegistrationRequest {
    pub method: Method,
    pub path: String,
    pub body: Vec<u8>,
    /// Number of body bytes the front end received. The store writes exactly
    /// this many bytes; a body shorter than this is a failed transfer.
    pub body_length: usize,
}

impl RegistrationRequest {
    pub fn new(method: Method, path: impl Into<String>, body: Vec<u8>) -> Self {
        let body_length = body.len();
        Self {
            method,
            path: path.into(),
            body,
            body_length,
        }
    }

    /// Convenience constructor for a `PUT` with a fully received body.
    pub fn put(path: impl Into<String>, body: impl Into<Vec<u8>>) -> Self {
        Self::new(Method::Put, path, body.into())
    }
}

/// Verdict of a registration attempt. Derived, never stored.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RegistrationOutcome {
    /// The Key Record was created.
    Created,
    /// A Key Record for the identifier already exists.
    Conflict,
    /// Wrong method or malformed identifier.
    BadRequest,
    /// The store failed; details are logged, never returned.
    InternalError,
}

impl RegistrationOutcome {
    /// HTTP status code the front end answers with (always an empty body).
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::Created => 201,
            Self::Conflict => 409,
            Self::BadRequest => 400,
            Self::InternalError => 500,
        }
    }

    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Created)
    }
}

impl fmt::Display for RegistrationOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Created => write!(f, "created"),
            Self::Conflict => write!(f, "conflict"),
            Self::BadRequest => write!(f, "bad request"),
            Self::InternalError => write!(f, "internal error"),
        }
    }
}
