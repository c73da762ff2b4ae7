use std::env::args;
use std::str::FromStr;

use anyhow::{anyhow, Context, Result};
use tokio::net::TcpListener;
use tracing_subscriber::{
    filter::EnvFilter, fmt::format::JsonFields, layer::SubscriberExt, util::SubscriberInitExt,
    Layer,
};

mod admin;
mod api;
mod config;
mod error;
mod main_lib;

use config::Config;

const VERSION: &str = env!("CARGO_PKG_VERSION");
const USAGE: &str = "usage: btmirror-server <serve | migrate | sync-plans | \
sync-subscriptions <id>... | sync-customer <id> | sync-card <token> | version>";

#[tokio::main]
async fn main() -> Result<()> {
    if let Err(error) = dotenvy::dotenv() {
        eprintln!("no .env file loaded ({}), using the process environment", error);
    }

    let mut args = args().skip(1);
    let command = args.next();
    let rest: Vec<String> = args.collect();

    if command.as_deref() == Some("version") {
        println!("btmirror-server v{VERSION}");
        return Ok(());
    }

    let config = Config::from_env().context("error loading config")?;
    init_tracing(&config)?;

    match command.as_deref() {
        Some("serve") => serve(config).await?,
        Some("migrate") => {
            let db_path = btmirror_storage_sqlite::init(&config.data_dir)?;
            btmirror_storage_sqlite::run_migrations(&db_path)?;
            println!("Migrated {}", db_path);
        }
        Some("sync-plans") => {
            let state = main_lib::build_state_from_config(&config)?;
            let summary = state.plan_service.sync_catalog().await?;
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        Some("sync-subscriptions") => {
            if rest.is_empty() {
                return Err(anyhow!("sync-subscriptions needs at least one id\n{USAGE}"));
            }
            let state = main_lib::build_state_from_config(&config)?;
            let summary = state.sync_service.sync_all(&rest).await?;
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        Some("sync-customer") => {
            let id = rest.first().ok_or_else(|| anyhow!(USAGE))?;
            let state = main_lib::build_state_from_config(&config)?;
            let synced = state.customer_service.sync_customer(id).await?;
            println!("{}", serde_json::to_string_pretty(&synced)?);
        }
        Some("sync-card") => {
            let token = rest.first().ok_or_else(|| anyhow!(USAGE))?;
            let state = main_lib::build_state_from_config(&config)?;
            let synced = state.payment_method_service.sync_credit_card(token).await?;
            println!("{}", serde_json::to_string_pretty(&synced)?);
        }
        _ => Err(anyhow!(USAGE))?,
    }
    Ok(())
}

async fn serve(config: Config) -> Result<()> {
    let state = main_lib::build_state_from_config(&config)?;
    if state.auth.admin_password.is_none() {
        tracing::warn!("BTMIRROR_ADMIN_PASSWORD is not set, admin pages are disabled");
    }
    let app = api::app_router(state);

    let listener = TcpListener::bind(config.listen_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.listen_addr))?;
    tracing::info!("btmirror-server v{} listening on {}", VERSION, config.listen_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if let Err(err) = tokio::signal::ctrl_c().await {
                tracing::error!("failed to listen for interrupt signal: {}", err);
                return;
            }
            tracing::info!("Received interrupt signal");
        })
        .await?;
    Ok(())
}

/// Installs the global subscriber. `log` records from the library crates are
/// forwarded into it.
fn init_tracing(config: &Config) -> Result<()> {
    let filter = EnvFilter::from_str(&config.rust_log)
        .with_context(|| format!("invalid RUST_LOG '{}'", config.rust_log))?;

    let fmt_layer = if config.log_json {
        tracing_subscriber::fmt::layer()
            .fmt_fields(JsonFields::default())
            .event_format(
                tracing_subscriber::fmt::format()
                    .json()
                    .flatten_event(true)
                    .with_span_list(true),
            )
            .boxed()
    } else {
        tracing_subscriber::fmt::layer()
            .event_format(tracing_subscriber::fmt::format().pretty())
            .boxed()
    };

    tracing_subscriber::registry()
        .with(fmt_layer)
        .with(filter)
        .try_init()
        .context("failed to install tracing subscriber")?;
    Ok(())
}
