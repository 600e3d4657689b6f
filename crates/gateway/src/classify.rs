//! Gateway response classification.
//!
//! The gateway reports client-token problems only through free-text bodies
//! on HTTP 403, so the substring rules live here and nowhere else.

/// Maximum number of body characters written to the per-attempt log line.
pub const BODY_SNIPPET_CHARS: usize = 160;

/// Outcome of a single send attempt, as judged from the response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// HTTP 200: the message was accepted.
    Delivered,
    /// HTTP 403 whose body says a null token is not allowed: the
    /// `Client-Token` header did not reach the gateway.
    ClientTokenMissing,
    /// HTTP 403 whose body says "not allowed": the token is wrong for this
    /// account or instance.
    ClientTokenInvalid,
    /// HTTP 404 or 405: the endpoint was called with the wrong method.
    WrongMethod,
    /// Anything else. The caller moves on to its next attempt.
    Retry,
}

impl Verdict {
    /// Whether this verdict ends the attempt loop.
    pub fn is_final(self) -> bool {
        !matches!(self, Verdict::Retry)
    }
}

/// Classify a gateway response by status code and body text.
///
/// Body matching is case-insensitive.
pub fn classify_response(status: u16, body: &str) -> Verdict {
    match status {
        200 => Verdict::Delivered,
        403 => {
            let body = body.to_lowercase();
            if body.contains("null not allowed") {
                Verdict::ClientTokenMissing
            } else if body.contains("not allowed") {
                Verdict::ClientTokenInvalid
            } else {
                Verdict::Retry
            }
        }
        404 | 405 => Verdict::WrongMethod,
        _ => Verdict::Retry,
    }
}

/// First [`BODY_SNIPPET_CHARS`] characters of a response body.
pub fn body_snippet(body: &str) -> &str {
    match body.char_indices().nth(BODY_SNIPPET_CHARS) {
        Some((idx, _)) => &body[..idx],
        None => body,
    }
}
