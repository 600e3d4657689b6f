//! Contact fetching.
//!
//! One `GET /rest/v1/{table}?select={name},{number}&limit=3` per run. Query
//! failures are logged and degrade to an empty list, so callers see the
//! same result for "no contacts" and "query failed".

use greeter_core::Contact;
use serde_json::Value;

use crate::client::SupabaseClient;

/// Maximum number of contacts returned by a single fetch.
pub const FETCH_LIMIT: usize = 3;

/// Maximum number of body characters kept in a [`QueryError::Api`].
const ERROR_BODY_LIMIT: usize = 500;

/// Error type for the contacts query. Never escapes [`fetch_contacts`].
#[derive(Debug, thiserror::Error)]
pub enum QueryError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Supabase API error ({status}): {body}")]
    Api { status: u16, body: String },

    #[error("Unexpected response shape: {0}")]
    Shape(String),
}

/// Fetch up to [`FETCH_LIMIT`] contacts from `table`.
///
/// Rows without a usable number are dropped. Query order is preserved.
/// Errors are logged and yield an empty list.
pub async fn fetch_contacts(
    client: &SupabaseClient,
    table: &str,
    name_column: &str,
    number_column: &str,
) -> Vec<Contact> {
    let rows = match query_rows(client, table, name_column, number_column).await {
        Ok(rows) => rows,
        Err(e) => {
            tracing::error!(table, error = %e, "Failed to fetch contacts");
            return Vec::new();
        }
    };

    let contacts: Vec<Contact> = rows
        .iter()
        .filter_map(|row| Contact::from_row(row, name_column, number_column))
        .take(FETCH_LIMIT)
        .collect();

    if contacts.is_empty() {
        tracing::warn!(table, "No contacts with a phone number found in the database");
    } else {
        tracing::info!(table, count = contacts.len(), "Contacts found");
    }

    contacts
}

/// Run the select query and return the raw JSON rows.
async fn query_rows(
    client: &SupabaseClient,
    table: &str,
    name_column: &str,
    number_column: &str,
) -> Result<Vec<Value>, QueryError> {
    let mut url = client.table_url(table);
    url.query_pairs_mut()
        .append_pair("select", &format!("{name_column},{number_column}"))
        .append_pair("limit", &FETCH_LIMIT.to_string());

    tracing::debug!(%url, "Querying contacts");

    let response = client.http().get(url).send().await?;
    let status = response.status();
    if !status.is_success() {
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "<unreadable body>".to_string());
        return Err(QueryError::Api {
            status: status.as_u16(),
            body: body.chars().take(ERROR_BODY_LIMIT).collect(),
        });
    }

    match response.json::<Value>().await? {
        Value::Array(rows) => Ok(rows),
        other => Err(QueryError::Shape(format!(
            "expected a JSON array of rows, got {}",
            json_kind(&other)
        ))),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
