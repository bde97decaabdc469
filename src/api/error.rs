//! Error taxonomy for one submission attempt.
//!
//! Every variant is terminal for that attempt and none is fatal to the
//! process; the form stays usable afterwards.

const BODY_SNIPPET_LEN: usize = 200;

#[derive(Debug, thiserror::Error)]
pub enum CoachError {
    /// A required field was empty after trimming. Raised before any network
    /// call is made.
    #[error("{0}")]
    Validation(String),

    /// Non-2xx status with whatever message the service supplied.
    #[error("{message}")]
    Server { status: u16, message: String },

    /// 2xx status but the body was not JSON or lacked the verdict shape.
    #[error("unexpected response from the decision service (HTTP {status}): {snippet}")]
    MalformedResponse { status: u16, snippet: String },

    /// The request never completed (DNS, refused connection, timeout, CORS).
    #[error("{0}")]
    Network(String),
}

/// Discriminant used by the form's `Failed` state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    Server,
    MalformedResponse,
    Network,
}

impl CoachError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CoachError::Validation(_) => ErrorKind::Validation,
            CoachError::Server { .. } => ErrorKind::Server,
            CoachError::MalformedResponse { .. } => ErrorKind::MalformedResponse,
            CoachError::Network(_) => ErrorKind::Network,
        }
    }

    pub(crate) fn malformed(status: u16, body: &str) -> Self {
        CoachError::MalformedResponse {
            status,
            snippet: snippet(body),
        }
    }

    pub(crate) fn network(source: &reqwest::Error) -> Self {
        // Surfaced text must carry the connectivity/CORS hint, never just
        // reqwest's "error sending request".
        CoachError::Network(format!(
            "could not reach the decision service (check your connection, or CORS if running in a browser context): {}",
            source
        ))
    }
}

fn snippet(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.len() <= BODY_SNIPPET_LEN {
        trimmed.to_string()
    } else {
        let mut end = BODY_SNIPPET_LEN;
        while !trimmed.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}…", &trimmed[..end])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_snippet_is_bounded() {
        let long = "x".repeat(5000);
        match CoachError::malformed(200, &long) {
            CoachError::MalformedResponse { snippet, .. } => {
                assert!(snippet.chars().count() <= BODY_SNIPPET_LEN + 1);
            }
            other => panic!("unexpected variant: {other:?}"),
        }
    }

    #[test]
    fn kinds_match_variants() {
        assert_eq!(
            CoachError::Validation("x".into()).kind(),
            ErrorKind::Validation
        );
        assert_eq!(
            CoachError::Server { status: 500, message: "boom".into() }.kind(),
            ErrorKind::Server
        );
    }
}
