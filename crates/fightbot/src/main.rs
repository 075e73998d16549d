use anyhow::Result;
use dotenvy::dotenv;
use std::sync::Arc;
use teloxide::prelude::*;
use teloxide::update_listeners::Polling;
use tokio::time::sleep;

use fightbot::cli::{Cli, Commands};
use fightbot::{create_bot, schema, setup_bot_commands, HandlerDeps};
use fightcore::logging::{init_logger, log_startup_configuration};
use fightcore::{config, create_pool, Credentials, Engine, MemorySessionStore, RedisSessionStore, SessionStore};

/// Main entry point for the Telegram bot
///
/// Without a subcommand the bot starts long polling; `init-db` only prepares
/// the database.
#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse_args();

    // Log panics from handlers instead of losing them on stderr
    std::panic::set_hook(Box::new(|panic_info| {
        log::error!("Panic caught: {:?}", panic_info);
        if let Some(location) = panic_info.location() {
            log::error!("Panic at {}:{}:{}", location.file(), location.line(), location.column());
        }
        if let Some(msg) = panic_info.payload().downcast_ref::<&str>() {
            log::error!("Panic message: {}", msg);
        }
    }));

    // .env goes first: every config static reads the environment once
    let _ = dotenv();

    // Initialize logger (console + file)
    init_logger(&config::LOG_FILE_PATH)?;

    match cli.command {
        Some(Commands::InitDb { database }) => {
            let path = database.unwrap_or_else(|| config::DATABASE_PATH.clone());
            create_pool(&path)?;
            log::info!("Database initialized at {}", path);
            Ok(())
        }
        Some(Commands::Run) | None => run_bot().await,
    }
}

async fn connect_sessions() -> Result<Arc<dyn SessionStore>> {
    match config::REDIS_URL.as_deref() {
        Some(url) => Ok(Arc::new(RedisSessionStore::connect(url).await?)),
        None => Ok(Arc::new(MemorySessionStore::new())),
    }
}

/// Waits for the Bot API to answer `getMe`.
///
/// A self-hosted Bot API server may still be starting, so network errors
/// are retried a limited number of times.
async fn wait_for_bot_api(bot: &Bot) -> Result<teloxide::types::Me> {
    let mut attempt = 0;
    loop {
        match bot.get_me().await {
            Ok(me) => return Ok(me),
            Err(e) => {
                let err_str = e.to_string();
                let is_retryable = err_str.contains("restart")
                    || err_str.contains("network")
                    || err_str.contains("connection")
                    || err_str.contains("timed out");

                attempt += 1;
                if attempt >= config::retry::STARTUP_ATTEMPTS || !is_retryable {
                    return Err(anyhow::anyhow!(
                        "Failed to connect to Bot API after {} attempts: {}",
                        attempt,
                        e
                    ));
                }

                log::warn!(
                    "Bot API not ready (attempt {}/{}): {}. Retrying in {} seconds...",
                    attempt,
                    config::retry::STARTUP_ATTEMPTS,
                    err_str,
                    config::retry::STARTUP_DELAY_SECS
                );
                sleep(config::retry::startup_delay()).await;
            }
        }
    }
}

async fn run_bot() -> Result<()> {
    log::info!("Starting bot...");
    log_startup_configuration();

    let pool = Arc::new(create_pool(&config::DATABASE_PATH)?);
    let sessions = connect_sessions().await?;
    let engine = Engine::new(pool, sessions, Credentials::from_config())
        .with_idle_timeout(config::session::idle_timeout());
    let deps = HandlerDeps::new(Arc::new(engine));

    let bot = create_bot()?;
    let me = wait_for_bot_api(&bot).await?;
    log::info!("Bot username: {:?}, Bot ID: {}", me.username.as_deref(), me.id);

    if let Err(e) = setup_bot_commands(&bot).await {
        log::warn!("Failed to register bot commands: {}", e);
    }

    let handler = schema(deps);
    let mut retry_count = 0;

    loop {
        let bot_clone = bot.clone();
        let handler_clone = handler.clone();

        // Each dispatcher runs in its own task so a panic can be caught via the JoinHandle
        let handle = tokio::spawn(async move {
            let listener = Polling::builder(bot_clone.clone()).drop_pending_updates().build();

            Dispatcher::builder(bot_clone, handler_clone)
                .enable_ctrlc_handler()
                .build()
                .dispatch_with_listener(
                    listener,
                    LoggingErrorHandler::with_custom_text("An error from the update listener"),
                )
                .await
        });

        match handle.await {
            Ok(()) => {
                log::info!("Dispatcher shutdown gracefully");
                break;
            }
            Err(join_err) if join_err.is_panic() && retry_count < config::retry::MAX_DISPATCHER_RETRIES => {
                retry_count += 1;
                log::error!(
                    "Dispatcher panicked: {}. Restarting (attempt {}/{})...",
                    join_err,
                    retry_count,
                    config::retry::MAX_DISPATCHER_RETRIES
                );
                sleep(config::retry::startup_delay()).await;
            }
            Err(join_err) => {
                log::error!("Dispatcher stopped: {}", join_err);
                break;
            }
        }
    }

    Ok(())
}
