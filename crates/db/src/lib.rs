//! Access to the hosted contacts table over its REST interface.
//!
//! [`connect`] validates the project URL and key and returns a
//! [`SupabaseClient`]; [`fetch_contacts`] runs the single contacts query.

pub mod client;
pub mod contacts;

pub use client::{connect, ConnectionError, SupabaseClient};
pub use contacts::{fetch_contacts, QueryError, FETCH_LIMIT};
