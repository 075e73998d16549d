//! Logging initialization and startup diagnostics
//!
//! This module provides:
//! - Logger initialization (console + file)
//! - A configuration report printed once at startup

use anyhow::Result;
use simplelog::*;
use std::fs::File;

use crate::config;

/// Initialize logger for both console and file output
///
/// # Arguments
/// * `log_file_path` - Path to the log file
///
/// # Returns
/// * `Ok(())` - Logger initialized successfully
/// * `Err(anyhow::Error)` - Failed to create the file or a logger was already installed
pub fn init_logger(log_file_path: &str) -> Result<()> {
    let log_file = File::create(log_file_path).map_err(|e| anyhow::anyhow!("Failed to create log file: {}", e))?;

    CombinedLogger::init(vec![
        TermLogger::new(
            LevelFilter::Info,
            Config::default(),
            TerminalMode::Mixed,
            ColorChoice::Auto,
        ),
        WriteLogger::new(LevelFilter::Info, Config::default(), log_file),
    ])
    .map_err(|e| anyhow::anyhow!("Failed to initialize logger: {}", e))?;

    Ok(())
}

/// Logs which configuration values are in effect.
///
/// Secrets are reported as set/unset only.
pub fn log_startup_configuration() {
    log::info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    log::info!("Configuration Check");
    log::info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    if config::BOT_TOKEN.is_empty() {
        log::error!("❌ BOT_TOKEN: not set");
    } else {
        log::info!("✅ BOT_TOKEN: set");
    }

    log::info!("✅ DATABASE_PATH: {}", config::DATABASE_PATH.as_str());

    if config::admin::is_configured() {
        log::info!("✅ ADMIN_USERNAME / ADMIN_PASSWORD: set");
    } else {
        log::error!("❌ ADMIN_USERNAME / ADMIN_PASSWORD: missing, every login attempt will be rejected");
    }

    match config::REDIS_URL.as_deref() {
        Some(_) => log::info!("✅ REDIS_URL: set, sessions survive restarts"),
        None => log::warn!("⚠️  REDIS_URL: not set, sessions are kept in memory only"),
    }

    match config::session::idle_timeout() {
        Some(timeout) => log::info!("✅ SESSION_IDLE_TIMEOUT_SECS: {}", timeout.as_secs()),
        None => log::info!("SESSION_IDLE_TIMEOUT_SECS: 0, unfinished forms never expire"),
    }
    log::info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
}
