use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "fightbot")]
#[command(author, version, about = "Telegram bot for managing fighters, gyms, trainers and match events", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Run the bot with long polling (default)
    Run,

    /// Create or migrate the database schema and exit
    InitDb {
        /// Database file to initialize (defaults to DATABASE_PATH)
        #[arg(short, long)]
        database: Option<String>,
    },
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
