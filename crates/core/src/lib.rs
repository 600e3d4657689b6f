//! Domain types shared by the greeter crates.
//!
//! - [`Contact`] — a name/number pair eligible to receive a message.
//! - [`AppConfig`] — the typed, validated run configuration.
//! - [`CoreError`] — configuration and validation failures.

pub mod config;
pub mod contact;
pub mod error;

pub use config::{AppConfig, GatewayConfig, SupabaseConfig};
pub use contact::Contact;
pub use error::CoreError;
