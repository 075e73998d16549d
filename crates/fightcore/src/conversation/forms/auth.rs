//! Login form and the admin credential

use secrecy::{ExposeSecret, SecretString};

use crate::config;
use crate::conversation::flow::{Flow, LoginForm};
use crate::conversation::forms::Step;
use crate::conversation::reply::Keyboard;
use crate::session::Session;

const USERNAME_PROMPT: &str = "Enter your username:";
const PASSWORD_PROMPT: &str = "Enter your password:";

/// The single admin login accepted by the bot.
#[derive(Debug, Clone)]
pub struct Credentials {
    username: String,
    password: SecretString,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: SecretString) -> Self {
        Self {
            username: username.into(),
            password,
        }
    }

    /// Reads ADMIN_USERNAME / ADMIN_PASSWORD.
    pub fn from_config() -> Self {
        Self::new(
            config::admin::ADMIN_USERNAME.as_str(),
            config::admin::ADMIN_PASSWORD.clone(),
        )
    }

    /// Exact match on both halves. An unconfigured credential matches nothing.
    pub fn verify(&self, username: &str, password: &str) -> bool {
        let expected = self.password.expose_secret();
        !self.username.is_empty() && !expected.is_empty() && self.username == username && expected == password
    }
}

pub(crate) fn start() -> Step {
    Step::ask(Flow::Login(LoginForm::Username), USERNAME_PROMPT)
}

pub(crate) fn advance(form: LoginForm, input: &str, session: &mut Session, credentials: &Credentials) -> Step {
    match form {
        LoginForm::Username => {
            let username = input.trim();
            if username.is_empty() {
                return Step::retry(Flow::Login(LoginForm::Username), "The username cannot be empty.", USERNAME_PROMPT);
            }
            session.pending_username = Some(username.to_string());
            // Hide the keyboard so the password is not sent next to a button.
            Step::ask_with(Flow::Login(LoginForm::Password), PASSWORD_PROMPT, Keyboard::Remove)
        }
        LoginForm::Password => {
            let username = session.pending_username.take().unwrap_or_default();
            if credentials.verify(&username, input.trim()) {
                session.authenticated = true;
                log::info!("Admin \"{}\" logged in", username);
                Step::done("✅ Login successful. Welcome to the fight club registry!")
            } else {
                log::warn!("Failed login attempt for \"{}\"", username);
                Step::retry(
                    Flow::Login(LoginForm::Username),
                    "Wrong username or password.",
                    USERNAME_PROMPT,
                )
            }
        }
    }
}
