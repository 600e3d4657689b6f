//! Z-API text message delivery.
//!
//! - [`ZApiClient`] — posts greetings to the gateway with a bounded retry.
//! - [`classify_response`] — maps a gateway status/body pair to a
//!   [`Verdict`]; the only place that inspects response body text.

pub mod classify;
pub mod client;

pub use classify::{classify_response, Verdict};
pub use client::{render_message, SendError, ZApiClient, MAX_ATTEMPTS, SEND_TIMEOUT};
