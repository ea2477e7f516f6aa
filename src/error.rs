/// Client errors, classified by what the caller can do about them.
///
/// Server responses are folded into variants by status class in
/// [`Error::from_response`] — callers dispatch by pattern matching instead
/// of inspecting raw status codes.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// Transport-level failure (connect, timeout, decode).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The server denied the request (401) and no renewal was possible
    /// or permitted for it.
    #[error("{operation}: access denied: {detail}")]
    Unauthorized {
        operation: &'static str,
        detail: String,
    },

    /// The server rejected the request body (400), e.g. registration
    /// field errors. Never affects the session.
    #[error("{operation}: validation failed: {detail}")]
    Validation {
        operation: &'static str,
        detail: String,
    },

    /// Any other non-success status.
    #[error("{operation}: server returned {status}: {detail}")]
    Api {
        operation: &'static str,
        status: u16,
        detail: String,
    },

    /// The refresh exchange could not renew the access token. The
    /// credential store has been cleared; `detail` identifies the
    /// original denied request.
    #[error("{operation}: session expired: {detail}")]
    SessionExpired {
        operation: &'static str,
        detail: String,
    },

    /// A wire value outside its valid domain (enum discriminant, index).
    #[error("invalid value: {0}")]
    InvalidValue(String),

    /// Credential store read or write failed.
    #[error("credential store error: {0}")]
    Store(String),

    /// Missing or invalid configuration.
    #[error("configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Classify a non-success response by status code.
    #[must_use]
    pub fn from_response(operation: &'static str, status: u16, detail: String) -> Self {
        match status {
            400 => Self::Validation { operation, detail },
            401 => Self::Unauthorized { operation, detail },
            _ => Self::Api {
                operation,
                status,
                detail,
            },
        }
    }

    /// True if this error means the session was torn down after a failed
    /// token renewal. UI layers show the dedicated "please log in again"
    /// message for these instead of a generic failure.
    #[must_use]
    pub fn is_session_expired(&self) -> bool {
        matches!(self, Self::SessionExpired { .. })
    }

    /// True for a propagated 401 that did not (or could not) renew.
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_by_status() {
        assert!(matches!(
            Error::from_response("op", 400, String::new()),
            Error::Validation { .. }
        ));
        assert!(matches!(
            Error::from_response("op", 401, String::new()),
            Error::Unauthorized { .. }
        ));
        assert!(matches!(
            Error::from_response("op", 409, String::new()),
            Error::Api { status: 409, .. }
        ));
        assert!(matches!(
            Error::from_response("op", 500, String::new()),
            Error::Api { status: 500, .. }
        ));
    }

    #[test]
    fn session_expired_marker() {
        let err = Error::SessionExpired {
            operation: "fetch grid",
            detail: "token invalid".into(),
        };
        assert!(err.is_session_expired());
        assert!(!err.is_unauthorized());

        let err = Error::from_response("fetch grid", 401, "nope".into());
        assert!(err.is_unauthorized());
        assert!(!err.is_session_expired());
    }
}
