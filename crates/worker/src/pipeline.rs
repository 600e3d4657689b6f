//! One greeting run: connect, fetch, then send to each contact in order.
//!
//! Only configuration and connection problems abort the run. Query
//! failures surface as zero contacts and send failures as a lower count.

use greeter_core::{AppConfig, CoreError};
use greeter_db::ConnectionError;
use greeter_gateway::{SendError, ZApiClient};

/// Errors that abort a run before any message is sent.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("Configuration error: {0}")]
    Config(#[from] CoreError),

    #[error("Database connection failed: {0}")]
    Connection(#[from] ConnectionError),

    #[error("Gateway client setup failed: {0}")]
    Gateway(#[from] SendError),
}

/// Outcome of a completed run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    /// Contacts returned by the fetch.
    pub fetched: usize,
    /// Contacts whose message the gateway accepted.
    pub sent: usize,
}

/// Load configuration from the environment and execute one run.
pub async fn run_from_env() -> Result<RunSummary, PipelineError> {
    let config = AppConfig::from_env()?;
    run(&config).await
}

/// Execute the pipeline once with the given configuration.
pub async fn run(config: &AppConfig) -> Result<RunSummary, PipelineError> {
    tracing::info!(
        table = %config.supabase.table,
        instance = %config.gateway.instance_id,
        "Starting greeting run",
    );

    let db = greeter_db::connect(&config.supabase.url, &config.supabase.key)?;
    let gateway = ZApiClient::from_config(&config.gateway)?;

    let contacts = greeter_db::fetch_contacts(
        &db,
        &config.supabase.table,
        &config.supabase.name_field,
        &config.supabase.number_field,
    )
    .await;

    let mut sent = 0;
    for contact in &contacts {
        let delivered = gateway
            .send_message(
                &config.gateway.instance_id,
                &config.gateway.api_token,
                &config.gateway.client_token,
                &contact.number,
                &contact.name,
            )
            .await;
        if delivered {
            sent += 1;
        }
    }

    tracing::info!(sent, fetched = contacts.len(), "{sent} messages sent successfully");

    Ok(RunSummary {
        fetched: contacts.len(),
        sent,
    })
}
