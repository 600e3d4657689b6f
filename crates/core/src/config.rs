//! Run configuration loaded from environment variables.
//!
//! [`AppConfig::from_env`] reads the process environment once at startup.
//! [`AppConfig::from_lookup`] takes any key lookup so parsing and validation
//! can be exercised without touching the process environment.

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

/// Default contacts table when `SUPABASE_TABLE` is not set.
pub const DEFAULT_TABLE: &str = "contacts";

/// Default name column when `SUPABASE_NAME_FIELD` is not set.
pub const DEFAULT_NAME_FIELD: &str = "name";

/// Default number column when `SUPABASE_NUMBER_FIELD` is not set.
pub const DEFAULT_NUMBER_FIELD: &str = "number";

/// Default gateway origin when `ZAPI_BASE_URL` is not set.
pub const DEFAULT_GATEWAY_BASE_URL: &str = "https://api.z-api.io";

/// Placeholder replaced by the contact's name in the message template.
pub const NAME_PLACEHOLDER: &str = "{name}";

/// Default greeting when `MESSAGE_TEMPLATE` is not set.
pub const DEFAULT_MESSAGE_TEMPLATE: &str = "Hello {name}, how are you?";

// ---------------------------------------------------------------------------
// Config structs
// ---------------------------------------------------------------------------

/// Connection and query settings for the hosted contacts table.
#[derive(Debug, Clone)]
pub struct SupabaseConfig {
    /// Project URL, e.g. `https://xyz.supabase.co`.
    pub url: String,
    /// Project API key, sent as `apikey` and bearer token.
    pub key: String,
    pub table: String,
    pub name_field: String,
    pub number_field: String,
}

/// Credentials and message settings for the messaging gateway.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub base_url: String,
    pub instance_id: String,
    pub api_token: String,
    /// Account security token, used verbatim. May be empty; the sender
    /// refuses to send without it.
    pub client_token: String,
    pub message_template: String,
}

/// Full run configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub supabase: SupabaseConfig,
    pub gateway: GatewayConfig,
}

impl AppConfig {
    /// Load configuration from environment variables.
    ///
    /// | Variable                | Required | Default                      |
    /// |-------------------------|----------|------------------------------|
    /// | `SUPABASE_URL`          | yes      | --                           |
    /// | `SUPABASE_KEY`          | yes      | --                           |
    /// | `SUPABASE_TABLE`        | no       | `contacts`                   |
    /// | `SUPABASE_NAME_FIELD`   | no       | `name`                       |
    /// | `SUPABASE_NUMBER_FIELD` | no       | `number`                     |
    /// | `ZAPI_INSTANCE`         | yes      | --                           |
    /// | `ZAPI_TOKEN`            | yes      | --                           |
    /// | `ZAPI_CLIENT_TOKEN`     | no       | empty                        |
    /// | `ZAPI_BASE_URL`         | no       | `https://api.z-api.io`       |
    /// | `MESSAGE_TEMPLATE`      | no       | `Hello {name}, how are you?` |
    pub fn from_env() -> Result<Self, CoreError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, CoreError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &'static str| -> Result<String, CoreError> {
            let value = lookup(key).ok_or(CoreError::MissingVar(key))?;
            let value = value.trim().to_string();
            if value.is_empty() {
                return Err(CoreError::Validation(format!("{key} must not be empty")));
            }
            Ok(value)
        };
        let optional = |key: &str, default: &str| -> String {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        let supabase = SupabaseConfig {
            url: required("SUPABASE_URL")?,
            key: required("SUPABASE_KEY")?,
            table: optional("SUPABASE_TABLE", DEFAULT_TABLE),
            name_field: optional("SUPABASE_NAME_FIELD", DEFAULT_NAME_FIELD),
            number_field: optional("SUPABASE_NUMBER_FIELD", DEFAULT_NUMBER_FIELD),
        };

        let gateway = GatewayConfig {
            base_url: optional("ZAPI_BASE_URL", DEFAULT_GATEWAY_BASE_URL),
            instance_id: required("ZAPI_INSTANCE")?,
            api_token: required("ZAPI_TOKEN")?,
            client_token: lookup("ZAPI_CLIENT_TOKEN").unwrap_or_default(),
            message_template: optional("MESSAGE_TEMPLATE", DEFAULT_MESSAGE_TEMPLATE),
        };

        validate_message_template(&gateway.message_template)?;

        Ok(Self { supabase, gateway })
    }
}

/// Validate a message template: it must mention the contact's name.
pub fn validate_message_template(template: &str) -> Result<(), CoreError> {
    if !template.contains(NAME_PLACEHOLDER) {
        return Err(CoreError::Validation(format!(
            "MESSAGE_TEMPLATE must contain the {NAME_PLACEHOLDER} placeholder"
        )));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
