//! Contact records built from raw query rows.

use serde_json::Value;

/// A name/number pair eligible to receive a message.
///
/// `number` is never empty: rows without a usable number are rejected by
/// [`Contact::from_row`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contact {
    pub name: String,
    pub number: String,
}

impl Contact {
    /// Build a contact from a JSON row, reading the two named columns.
    ///
    /// Returns `None` when the number column is missing, null, a boolean, an
    /// empty string, a numeric zero, or a non-scalar value. Other numeric
    /// columns are rendered as their decimal string. A missing or null name
    /// becomes the empty string.
    pub fn from_row(row: &Value, name_column: &str, number_column: &str) -> Option<Self> {
        let number = row
            .get(number_column)
            .filter(|v| !is_zero(v))
            .and_then(scalar_to_string)?;
        if number.is_empty() {
            return None;
        }

        let name = row
            .get(name_column)
            .and_then(scalar_to_string)
            .unwrap_or_default();

        Some(Self { name, number })
    }
}

fn is_zero(value: &Value) -> bool {
    value.as_f64() == Some(0.0)
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
