//! Message routing
//!
//! Order of precedence for an incoming text:
//! 1. slash commands, which always reset the chat to a menu
//! 2. the cancel button, honored at every step
//! 3. the form in progress, which consumes everything else
//! 4. menu buttons, matched by exact label
//! 5. anything else gets a hint

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;

use crate::config;
use crate::conversation::flow::{Flow, SearchTarget, TrainingView};
use crate::conversation::forms::edit::{self, EventEdit, FighterEdit, GymEdit, TrainerEdit};
use crate::conversation::forms::{auth, events, fighters, gyms, listing, search, trainers, training, Step};
use crate::conversation::forms::auth::Credentials;
use crate::conversation::menu::{is_cancel, login_keyboard, main_keyboard, training_keyboard, MenuAction, SlashCommand};
use crate::conversation::reply::Reply;
use crate::error::{AppError, AppResult};
use crate::session::{Session, SessionStore};
use crate::storage::DbPool;

const WELCOME: &str = "🥊 Welcome to the fight club registry!";
const LOGIN_REQUIRED: &str = "🔒 Please log in first.";
const HELP: &str = "Use the keyboard buttons to browse and manage fighters, gyms, trainers and events.\n\n\
     /menu - show the main menu\n\
     /cancel - abandon the current form\n\
     /logout - end the session";

/// What to do with the session once the message is handled.
enum Persist {
    Save,
    Forget,
}

/// Conversation engine shared by all chats.
pub struct Engine {
    pool: Arc<DbPool>,
    sessions: Arc<dyn SessionStore>,
    credentials: Credentials,
    idle_timeout: Option<Duration>,
}

impl Engine {
    /// Creates an engine with the idle timeout from SESSION_IDLE_TIMEOUT_SECS.
    pub fn new(pool: Arc<DbPool>, sessions: Arc<dyn SessionStore>, credentials: Credentials) -> Self {
        Self {
            pool,
            sessions,
            credentials,
            idle_timeout: config::session::idle_timeout(),
        }
    }

    /// Overrides the idle timeout; `None` keeps unfinished forms forever.
    pub fn with_idle_timeout(mut self, idle_timeout: Option<Duration>) -> Self {
        self.idle_timeout = idle_timeout;
        self
    }

    /// Handles one text message from `chat_id`.
    ///
    /// # Returns
    ///
    /// The replies to send, in order. Storage failures inside a form are
    /// reported as a reply; only session store failures are returned as
    /// errors.
    pub async fn handle_text(&self, chat_id: i64, text: &str) -> AppResult<Vec<Reply>> {
        if let Some(command) = SlashCommand::parse(text) {
            return self.handle_command(chat_id, command).await;
        }

        let mut session = self.sessions.load(chat_id).await?;
        let mut replies = Vec::new();
        if session.expire_flow(Utc::now(), self.idle_timeout) {
            log::info!("Discarded idle form of chat {}", chat_id);
            replies.push(Reply::text("⌛ Your unfinished form expired and was discarded."));
        }

        let persist = if is_cancel(text) {
            replies.push(self.cancel(&mut session));
            Persist::Save
        } else if let Some(flow) = session.flow.take() {
            replies.extend(self.continue_flow(chat_id, flow, text, &mut session));
            Persist::Save
        } else {
            match MenuAction::from_label(text) {
                Some(action) => self.run_action(action, &mut session, &mut replies),
                None => {
                    replies.push(unknown_input(&session));
                    Persist::Save
                }
            }
        };

        self.finish(chat_id, session, persist).await?;
        Ok(replies)
    }

    /// Handles a slash command. Any form in progress is dropped.
    pub async fn handle_command(&self, chat_id: i64, command: SlashCommand) -> AppResult<Vec<Reply>> {
        let mut session = self.sessions.load(chat_id).await?;
        if session.flow.take().is_some() {
            log::info!("Chat {} left its form with /{:?}", chat_id, command);
        }
        session.pending_username = None;

        let mut replies = Vec::new();
        let persist = match command {
            SlashCommand::Start | SlashCommand::Menu => {
                replies.push(home(&session, WELCOME));
                Persist::Save
            }
            SlashCommand::Help => {
                replies.push(home(&session, HELP));
                Persist::Save
            }
            SlashCommand::Login => self.run_action(MenuAction::Login, &mut session, &mut replies),
            SlashCommand::Cancel => {
                replies.push(self.cancel(&mut session));
                Persist::Save
            }
            SlashCommand::Logout => self.run_action(MenuAction::Logout, &mut session, &mut replies),
        };

        self.finish(chat_id, session, persist).await?;
        Ok(replies)
    }

    async fn finish(&self, chat_id: i64, mut session: Session, persist: Persist) -> AppResult<()> {
        match persist {
            Persist::Save => {
                session.touched_at = Some(Utc::now());
                self.sessions.save(chat_id, &session).await
            }
            Persist::Forget => self.sessions.remove(chat_id).await,
        }
    }

    fn cancel(&self, session: &mut Session) -> Reply {
        session.flow = None;
        session.pending_username = None;
        home(session, "Operation cancelled.")
    }

    /// Feeds one message to the form in progress and stores its next state.
    fn continue_flow(&self, chat_id: i64, flow: Flow, text: &str, session: &mut Session) -> Vec<Reply> {
        let in_training = flow.is_training();
        let pool = self.pool.as_ref();
        let result = match flow {
            Flow::Login(form) => Ok(auth::advance(form, text, session, &self.credentials)),
            Flow::AddGym(form) => gyms::advance(form, text, pool),
            Flow::AddFighter(form) => fighters::advance(form, text, pool),
            Flow::AddTrainer(form) => trainers::advance(form, text, pool),
            Flow::AddEvent(form) => events::advance(form, text, pool),
            Flow::Search(target) => search::advance(target, text, pool),
            Flow::EditGym(form) => edit::advance::<GymEdit>(form, text, pool),
            Flow::EditFighter(form) => edit::advance::<FighterEdit>(form, text, pool),
            Flow::EditTrainer(form) => edit::advance::<TrainerEdit>(form, text, pool),
            Flow::EditEvent(form) => edit::advance::<EventEdit>(form, text, pool),
            Flow::AssignTrainer(form) => training::advance_assign(form, text, pool),
            Flow::EndTraining(form) => training::advance_end(form, text, pool),
            Flow::ViewTraining(view) => training::advance_view(view, text, pool),
        };

        match result {
            Ok(step) => apply_step(step, session),
            Err(e) => {
                log::error!("❌ Form of chat {} aborted: {}", chat_id, e);
                let keyboard = if in_training { training_keyboard() } else { main_keyboard() };
                vec![failure_reply(&e).with_keyboard(keyboard)]
            }
        }
    }

    fn run_action(&self, action: MenuAction, session: &mut Session, replies: &mut Vec<Reply>) -> Persist {
        if action.requires_login() && !session.authenticated {
            replies.push(Reply::text(LOGIN_REQUIRED));
            replies.extend(apply_step(auth::start(), session));
            return Persist::Save;
        }

        let pool = self.pool.as_ref();
        let step = match action {
            MenuAction::Login if session.authenticated => {
                Step::done("You are already logged in.")
            }
            MenuAction::Login => auth::start(),
            MenuAction::Logout => {
                log::info!("Chat logged out");
                replies.push(Reply::text("👋 You have been logged out.").with_keyboard(login_keyboard()));
                return Persist::Forget;
            }
            MenuAction::ShowFighters => return show(listing::show_fighters(pool), replies),
            MenuAction::ShowGyms => return show(listing::show_gyms(pool), replies),
            MenuAction::ShowTrainers => return show(listing::show_trainers(pool), replies),
            MenuAction::ShowEvents => return show(listing::show_events(pool), replies),
            MenuAction::AddFighter => fighters::start(),
            MenuAction::AddGym => gyms::start(),
            MenuAction::AddTrainer => trainers::start(),
            MenuAction::AddEvent => events::start(),
            MenuAction::SearchFighter => search::start(SearchTarget::Fighter),
            MenuAction::SearchGym => search::start(SearchTarget::Gym),
            MenuAction::SearchTrainer => search::start(SearchTarget::Trainer),
            MenuAction::EditFighter => edit::start::<FighterEdit>(),
            MenuAction::EditGym => edit::start::<GymEdit>(),
            MenuAction::EditTrainer => edit::start::<TrainerEdit>(),
            MenuAction::EditEvent => edit::start::<EventEdit>(),
            MenuAction::TrainingMenu => Step::done_training("🏋️ Training management:"),
            MenuAction::AssignTrainer => training::start_assign(),
            MenuAction::EndTraining => training::start_end(),
            MenuAction::TrainersOfFighter => training::start_view(TrainingView::TrainersOfFighter),
            MenuAction::FightersOfTrainer => training::start_view(TrainingView::FightersOfTrainer),
            MenuAction::BackToMain => Step::done("Main menu:"),
        };
        replies.extend(apply_step(step, session));
        Persist::Save
    }
}

fn apply_step(step: Step, session: &mut Session) -> Vec<Reply> {
    match step {
        Step::Next(flow, reply) => {
            session.flow = Some(flow);
            vec![reply]
        }
        Step::Done(replies) => {
            session.flow = None;
            replies
        }
    }
}

fn show(listing: AppResult<Vec<Reply>>, replies: &mut Vec<Reply>) -> Persist {
    match listing {
        Ok(pages) => replies.extend(pages),
        Err(e) => {
            log::error!("❌ Listing failed: {}", e);
            replies.push(failure_reply(&e));
        }
    }
    Persist::Save
}

fn failure_reply(error: &AppError) -> Reply {
    if error.is_database() {
        Reply::text(format!("❌ Database error, nothing was saved: {}", error))
    } else {
        Reply::text(format!("❌ {}", error))
    }
}

/// Greeting plus the keyboard matching the login state.
fn home(session: &Session, text: &str) -> Reply {
    if session.authenticated {
        Reply::text(text).with_keyboard(main_keyboard())
    } else {
        Reply::text(format!("{}\n\n{}", text, LOGIN_REQUIRED)).with_keyboard(login_keyboard())
    }
}

fn unknown_input(session: &Session) -> Reply {
    if session.authenticated {
        Reply::text("Unknown command. Please use the menu buttons.").with_keyboard(main_keyboard())
    } else {
        Reply::text(LOGIN_REQUIRED).with_keyboard(login_keyboard())
    }
}
