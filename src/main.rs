//! DRAFTWATCH — Live Draft Lottery Odds Tracker
//!
//! Entry point. Loads configuration, initialises structured logging,
//! restores the reveal log from disk (or starts fresh), and serves the
//! dashboard until a shutdown signal arrives.

use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::info;

use draftwatch::config::AppConfig;
use draftwatch::dashboard;
use draftwatch::dashboard::routes::DashboardState;
use draftwatch::lottery::Lottery;
use draftwatch::storage;

const BANNER: &str = r#"
 ____  ____      _    _____ _____ __        ___    _____ ____ _   _
|  _ \|  _ \    / \  |  ___|_   _|\ \      / / \  |_   _/ ___| | | |
| | | | |_) |  / _ \ | |_    | |   \ \ /\ / / _ \   | || |   | |_| |
| |_| |  _ <  / ___ \|  _|   | |    \ V  V / ___ \  | || |___|  _  |
|____/|_| \_\/_/   \_\_|     |_|     \_/\_/_/   \_\ |_| \____|_| |_|

  Live draft lottery tracker — exact odds after every reveal
  v0.1.0
"#;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (non-fatal if missing)
    let _ = dotenv::dotenv();

    // Load configuration from TOML
    let cfg = AppConfig::load("config.toml")?;

    // Initialise structured logging
    init_logging();

    // Print startup banner
    println!("{BANNER}");

    let lottery_config = cfg.lottery.to_lottery_config()?;
    info!(
        teams = lottery_config.num_teams(),
        top_picks = lottery_config.top_picks(),
        port = cfg.dashboard.port,
        "DRAFTWATCH starting up"
    );

    // -- Restore or create state -----------------------------------------

    let log_path = cfg.storage.reveal_log.clone();
    let log = storage::load_log(log_path.as_deref())?.unwrap_or_default();
    let lottery = Lottery::from_history_names(lottery_config, &log.names())
        .context("Reveal log is inconsistent with the configured lottery")?;

    if log.reveals.is_empty() {
        info!("Fresh lottery");
    } else {
        info!(
            reveals = log.reveals.len(),
            current_slot = lottery.current_slot(),
            "Resumed from saved reveal log"
        );
    }

    // -- Serve -----------------------------------------------------------

    let state = Arc::new(DashboardState::new(lottery, log, log_path));
    dashboard::serve(state, cfg.dashboard.port).await?;

    info!("DRAFTWATCH shut down cleanly.");
    Ok(())
}

/// Initialise the `tracing` subscriber.
fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("draftwatch=info"));

    let json_logging = std::env::var("DRAFTWATCH_LOG_JSON").is_ok();

    if json_logging {
        fmt()
            .json()
            .with_env_filter(env_filter)
            .with_target(true)
            .with_thread_ids(true)
            .init();
    } else {
        fmt()
            .with_env_filter(env_filter)
            .with_target(true)
            .init();
    }
}
