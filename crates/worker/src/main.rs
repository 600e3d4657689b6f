//! `greeter-worker` -- one-shot contact greeting run.
//!
//! Reads up to three contacts from a Supabase table and sends each one a
//! greeting through Z-API, then exits.
//!
//! # Environment variables
//!
//! See `greeter_core::AppConfig::from_env` for the full table. In addition:
//!
//! | Variable     | Required | Default | Description                          |
//! |--------------|----------|---------|--------------------------------------|
//! | `RUST_LOG`   | no       | --      | Overrides the default log filter     |
//! | `LOG_FORMAT` | no       | `text`  | `json` switches to JSON log lines    |

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_LOG_FILTER: &str = "greeter_worker=info,greeter_db=info,greeter_gateway=info";

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    init_tracing();

    if let Err(e) = greeter_worker::run_from_env().await {
        tracing::error!(error = %e, "Run aborted");
    }
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into());
    let json = std::env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}
