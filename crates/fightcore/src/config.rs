//! Configuration for the bot.
//!
//! Every value is read once from the environment on first access; `.env`
//! must be loaded before anything touches these statics.

use once_cell::sync::Lazy;
use secrecy::SecretString;
use std::env;
use std::time::Duration;

/// Bot token
/// Read from BOT_TOKEN or TELOXIDE_TOKEN environment variable
pub static BOT_TOKEN: Lazy<String> = Lazy::new(|| {
    env::var("BOT_TOKEN")
        .or_else(|_| env::var("TELOXIDE_TOKEN"))
        .unwrap_or_default()
});

/// Database file path
/// Read from DATABASE_PATH (or the legacy DB_URI) environment variable
/// Default: fightclub.sqlite
pub static DATABASE_PATH: Lazy<String> = Lazy::new(|| {
    env::var("DATABASE_PATH")
        .or_else(|_| env::var("DB_URI"))
        .unwrap_or_else(|_| "fightclub.sqlite".to_string())
});

/// Log file path
/// Read from LOG_FILE_PATH environment variable
/// Default: fightbot.log
pub static LOG_FILE_PATH: Lazy<String> =
    Lazy::new(|| env::var("LOG_FILE_PATH").unwrap_or_else(|_| "fightbot.log".to_string()));

/// Redis URL for persistent sessions.
/// When unset, sessions live in process memory and are lost on restart.
pub static REDIS_URL: Lazy<Option<String>> =
    Lazy::new(|| env::var("REDIS_URL").ok().filter(|url| !url.trim().is_empty()));

/// Admin credential
pub mod admin {
    use super::*;

    /// Admin username
    /// Read from ADMIN_USERNAME environment variable
    pub static ADMIN_USERNAME: Lazy<String> = Lazy::new(|| env::var("ADMIN_USERNAME").unwrap_or_default());

    /// Admin password
    /// Read from ADMIN_PASSWORD environment variable
    pub static ADMIN_PASSWORD: Lazy<SecretString> =
        Lazy::new(|| SecretString::from(env::var("ADMIN_PASSWORD").unwrap_or_default()));

    /// Returns true when both halves of the credential are configured.
    pub fn is_configured() -> bool {
        use secrecy::ExposeSecret;
        !ADMIN_USERNAME.is_empty() && !ADMIN_PASSWORD.expose_secret().is_empty()
    }
}

/// Session configuration
pub mod session {
    use super::*;

    /// Idle time after which a half-filled form is discarded.
    /// Read from SESSION_IDLE_TIMEOUT_SECS; 0 (default) keeps forms forever.
    pub static IDLE_TIMEOUT_SECS: Lazy<u64> = Lazy::new(|| {
        env::var("SESSION_IDLE_TIMEOUT_SECS")
            .ok()
            .and_then(|value| value.parse().ok())
            .unwrap_or(0)
    });

    /// Idle timeout as a duration, `None` when disabled
    pub fn idle_timeout() -> Option<Duration> {
        match *IDLE_TIMEOUT_SECS {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        }
    }

    /// Redis key prefix for stored sessions
    pub const REDIS_KEY_PREFIX: &str = "fightbot:session:";
}

/// Database configuration
pub mod db {
    use super::Duration;

    /// Maximum number of pooled SQLite connections
    pub const POOL_SIZE: u32 = 8;

    /// How long a writer waits on a locked database (in seconds)
    pub const BUSY_TIMEOUT_SECS: u64 = 10;

    /// Busy timeout duration
    pub fn busy_timeout() -> Duration {
        Duration::from_secs(BUSY_TIMEOUT_SECS)
    }
}

/// Listing configuration
pub mod listing {
    /// Maximum rows shown by the "show ..." menu entries
    pub const LIMIT: i64 = 50;

    /// Longest message sent in one piece, in UTF-16 units (Telegram allows 4096)
    pub const MAX_MESSAGE_LENGTH: usize = 4000;
}

/// Validation thresholds
pub mod validation {
    /// Minimum length of a person or gym name
    pub const MIN_NAME_CHARS: usize = 2;

    /// Minimum fighter age accepted by the forms
    pub const MIN_FIGHTER_AGE: i64 = 18;

    /// Default reputation score of a new gym
    pub const DEFAULT_REPUTATION: i64 = 75;
}

/// Network configuration
pub mod network {
    use super::Duration;

    /// Request timeout for Bot API calls (in seconds)
    pub const REQUEST_TIMEOUT_SECS: u64 = 60;

    /// Request timeout duration
    pub fn timeout() -> Duration {
        Duration::from_secs(REQUEST_TIMEOUT_SECS)
    }
}

/// Retry configuration
pub mod retry {
    use super::Duration;

    /// Attempts at reaching the Bot API during startup
    pub const STARTUP_ATTEMPTS: u32 = 12;

    /// Delay between startup attempts (in seconds)
    pub const STARTUP_DELAY_SECS: u64 = 5;

    /// Startup retry delay duration
    pub fn startup_delay() -> Duration {
        Duration::from_secs(STARTUP_DELAY_SECS)
    }

    /// Times the dispatcher is restarted after a panic
    pub const MAX_DISPATCHER_RETRIES: u32 = 3;
}
