//! Bot initialization and command list

use reqwest::ClientBuilder;
use teloxide::prelude::*;
use teloxide::types::BotCommand;
use teloxide::utils::command::BotCommands;

use fightcore::config;
use fightcore::conversation::SlashCommand;

/// Bot commands enum with descriptions
#[derive(BotCommands, Clone, Copy, Debug, PartialEq, Eq)]
#[command(rename_rule = "lowercase", description = "Available commands:")]
pub enum Command {
    #[command(description = "show the welcome screen")]
    Start,
    #[command(description = "log in as the administrator")]
    Login,
    #[command(description = "show the main menu")]
    Menu,
    #[command(description = "explain how to use the bot")]
    Help,
    #[command(description = "abandon the current form")]
    Cancel,
    #[command(description = "end the session")]
    Logout,
}

impl From<Command> for SlashCommand {
    fn from(command: Command) -> Self {
        match command {
            Command::Start => SlashCommand::Start,
            Command::Login => SlashCommand::Login,
            Command::Menu => SlashCommand::Menu,
            Command::Help => SlashCommand::Help,
            Command::Cancel => SlashCommand::Cancel,
            Command::Logout => SlashCommand::Logout,
        }
    }
}

/// Creates a Bot instance with custom or default API URL
///
/// The token comes from BOT_TOKEN (or TELOXIDE_TOKEN). BOT_API_URL points
/// the bot at a self-hosted Bot API server.
///
/// # Returns
/// * `Ok(Bot)` - Successfully created bot instance
/// * `Err(anyhow::Error)` - Missing token, invalid URL or HTTP client failure
pub fn create_bot() -> anyhow::Result<Bot> {
    if config::BOT_TOKEN.is_empty() {
        return Err(anyhow::anyhow!("BOT_TOKEN environment variable not set"));
    }
    let client = ClientBuilder::new().timeout(config::network::timeout()).build()?;
    let bot = Bot::with_client(config::BOT_TOKEN.as_str(), client);

    let bot = if let Ok(bot_api_url) = std::env::var("BOT_API_URL") {
        log::info!("Using custom Bot API URL: {}", bot_api_url);
        let url = url::Url::parse(&bot_api_url).map_err(|e| anyhow::anyhow!("Invalid BOT_API_URL: {}", e))?;
        bot.set_api_url(url)
    } else {
        bot
    };

    Ok(bot)
}

/// Sets up bot commands in Telegram UI
///
/// # Arguments
/// * `bot` - Bot instance to configure
///
/// # Returns
/// * `Ok(())` - Commands set successfully
/// * `Err(RequestError)` - Failed to set commands
pub async fn setup_bot_commands(bot: &Bot) -> Result<(), teloxide::RequestError> {
    let commands: Vec<BotCommand> = Command::bot_commands();
    bot.set_my_commands(commands).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_descriptions() {
        let commands = Command::descriptions();
        let command_list = format!("{}", commands);

        assert!(command_list.contains("Available commands"));
        assert!(command_list.contains("start"));
        assert!(command_list.contains("logout"));
    }

    #[test]
    fn test_parse_command_with_bot_name() {
        assert_eq!(Command::parse("/menu@fight_bot", "fight_bot").unwrap(), Command::Menu);
        assert_eq!(SlashCommand::from(Command::Cancel), SlashCommand::Cancel);
    }

    #[test]
    fn test_every_command_is_registered() {
        let names: Vec<String> = Command::bot_commands().into_iter().map(|c| c.command).collect();
        assert_eq!(names.len(), 6);
        assert!(names.iter().any(|name| name.ends_with("login")));
    }
}
