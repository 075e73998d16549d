//! Menu buttons, keyboard layouts and slash commands
//!
//! Button text is display only. Incoming text is mapped back to a
//! [`MenuAction`] by exact label match, so renaming a label never changes
//! what an action does.

use serde::{Deserialize, Serialize};
use strum::{EnumIter, EnumString, IntoEnumIterator};

use crate::conversation::reply::Keyboard;
use crate::models::{BoutOutcome, FighterStatus};

/// Cancel button shown under every form prompt
pub const CANCEL: &str = "Cancel";

/// Confirmation buttons of edit forms
pub const CONFIRM_YES: &str = "Yes, apply";
pub const CONFIRM_NO: &str = "No, cancel";

/// True for the cancel button and anything typed like it.
pub fn is_cancel(text: &str) -> bool {
    text.trim().eq_ignore_ascii_case(CANCEL)
}

/// Everything a menu button can trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumIter)]
pub enum MenuAction {
    Login,
    Logout,
    ShowFighters,
    ShowGyms,
    ShowTrainers,
    ShowEvents,
    AddFighter,
    AddGym,
    AddTrainer,
    AddEvent,
    SearchFighter,
    SearchGym,
    SearchTrainer,
    EditFighter,
    EditGym,
    EditTrainer,
    EditEvent,
    TrainingMenu,
    AssignTrainer,
    EndTraining,
    TrainersOfFighter,
    FightersOfTrainer,
    BackToMain,
}

impl MenuAction {
    pub fn label(self) -> &'static str {
        match self {
            MenuAction::Login => "Log in",
            MenuAction::Logout => "Log out",
            MenuAction::ShowFighters => "Show fighters",
            MenuAction::ShowGyms => "Show gyms",
            MenuAction::ShowTrainers => "Show trainers",
            MenuAction::ShowEvents => "Show events",
            MenuAction::AddFighter => "Add fighter",
            MenuAction::AddGym => "Add gym",
            MenuAction::AddTrainer => "Add trainer",
            MenuAction::AddEvent => "Add event",
            MenuAction::SearchFighter => "Search fighter",
            MenuAction::SearchGym => "Search gym",
            MenuAction::SearchTrainer => "Search trainer",
            MenuAction::EditFighter => "Edit fighter",
            MenuAction::EditGym => "Edit gym",
            MenuAction::EditTrainer => "Edit trainer",
            MenuAction::EditEvent => "Edit event",
            MenuAction::TrainingMenu => "Manage training",
            MenuAction::AssignTrainer => "Assign trainer",
            MenuAction::EndTraining => "End training",
            MenuAction::TrainersOfFighter => "Trainers of fighter",
            MenuAction::FightersOfTrainer => "Pupils of trainer",
            MenuAction::BackToMain => "Back to main menu",
        }
    }

    /// Exact label match.
    pub fn from_label(text: &str) -> Option<Self> {
        let text = text.trim();
        MenuAction::iter().find(|action| action.label() == text)
    }

    /// Everything except logging in needs an authenticated chat.
    pub fn requires_login(self) -> bool {
        self != MenuAction::Login
    }
}

/// Slash commands understood in any state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, EnumIter)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum SlashCommand {
    Start,
    Login,
    Menu,
    Help,
    Cancel,
    Logout,
}

impl SlashCommand {
    /// Parses `/name` or `/name@botname`, ignoring arguments.
    pub fn parse(text: &str) -> Option<Self> {
        let word = text.trim().strip_prefix('/')?.split_whitespace().next()?;
        let name = word.split('@').next()?;
        name.parse().ok()
    }
}

fn layout(rows: &[&[MenuAction]]) -> Keyboard {
    Keyboard::rows(rows.iter().map(|row| row.iter().map(|action| action.label())))
}

/// Keyboard shown to chats that are not logged in.
pub fn login_keyboard() -> Keyboard {
    layout(&[&[MenuAction::Login]])
}

pub fn main_keyboard() -> Keyboard {
    use MenuAction::*;
    layout(&[
        &[ShowFighters, ShowGyms],
        &[ShowTrainers, ShowEvents],
        &[AddFighter, AddGym],
        &[AddTrainer, AddEvent],
        &[SearchFighter, SearchGym],
        &[SearchTrainer, TrainingMenu],
        &[EditFighter, EditGym],
        &[EditTrainer, EditEvent],
        &[Logout],
    ])
}

pub fn training_keyboard() -> Keyboard {
    use MenuAction::*;
    layout(&[
        &[AssignTrainer, EndTraining],
        &[TrainersOfFighter, FightersOfTrainer],
        &[BackToMain],
    ])
}

pub fn cancel_keyboard() -> Keyboard {
    Keyboard::rows([[CANCEL]])
}

pub fn confirm_keyboard() -> Keyboard {
    Keyboard::rows([vec![CONFIRM_YES, CONFIRM_NO], vec![CANCEL]])
}

/// `options` laid out `per_row` to a row, with a cancel row at the bottom.
pub fn choices_keyboard<S: AsRef<str>>(options: &[S], per_row: usize) -> Keyboard {
    let mut rows: Vec<Vec<String>> = options
        .chunks(per_row.max(1))
        .map(|chunk| chunk.iter().map(|s| s.as_ref().to_string()).collect())
        .collect();
    rows.push(vec![CANCEL.to_string()]);
    Keyboard::Buttons(rows)
}

/// Button text for each bout outcome.
pub fn outcome_label(outcome: BoutOutcome) -> &'static str {
    match outcome {
        BoutOutcome::FirstWins => "First fighter wins",
        BoutOutcome::SecondWins => "Second fighter wins",
        BoutOutcome::Draw => "Draw",
        BoutOutcome::NoContest => "No contest",
        BoutOutcome::Unknown => "Unknown",
    }
}

pub fn outcome_from_label(text: &str) -> Option<BoutOutcome> {
    let text = text.trim();
    BoutOutcome::iter().find(|outcome| outcome_label(*outcome).eq_ignore_ascii_case(text))
}

pub fn outcome_keyboard() -> Keyboard {
    let labels: Vec<&str> = BoutOutcome::iter().map(outcome_label).collect();
    choices_keyboard(&labels, 2)
}

pub fn status_keyboard() -> Keyboard {
    let labels: Vec<String> = FighterStatus::iter().map(|status| status.to_string()).collect();
    choices_keyboard(&labels, 3)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_labels_round_trip_and_are_unique() {
        let mut seen = HashSet::new();
        for action in MenuAction::iter() {
            assert!(seen.insert(action.label()), "duplicate label {}", action.label());
            assert_eq!(MenuAction::from_label(action.label()), Some(action));
        }
        assert!(!seen.contains(CANCEL));
    }

    #[test]
    fn test_from_label_is_exact() {
        assert_eq!(MenuAction::from_label("show fighters"), None);
        assert_eq!(MenuAction::from_label(" Show fighters "), Some(MenuAction::ShowFighters));
    }

    #[test]
    fn test_every_action_is_reachable_from_a_keyboard() {
        let mut labels: HashSet<String> = HashSet::new();
        for keyboard in [login_keyboard(), main_keyboard(), training_keyboard()] {
            labels.extend(keyboard.labels().into_iter().map(str::to_string));
        }
        for action in MenuAction::iter() {
            assert!(labels.contains(action.label()), "{:?} has no button", action);
        }
    }

    #[test]
    fn test_slash_command_parse() {
        assert_eq!(SlashCommand::parse("/start"), Some(SlashCommand::Start));
        assert_eq!(SlashCommand::parse("/Menu@fight_bot"), Some(SlashCommand::Menu));
        assert_eq!(SlashCommand::parse("/logout now"), Some(SlashCommand::Logout));
        assert_eq!(SlashCommand::parse("/unknown"), None);
        assert_eq!(SlashCommand::parse("start"), None);
    }

    #[test]
    fn test_outcome_labels() {
        for outcome in BoutOutcome::iter() {
            assert_eq!(outcome_from_label(outcome_label(outcome)), Some(outcome));
        }
        assert_eq!(outcome_from_label("draw"), Some(BoutOutcome::Draw));
        assert_eq!(outcome_from_label("knockout"), None);
    }

    #[test]
    fn test_choices_keyboard_appends_cancel() {
        let keyboard = choices_keyboard(&["a", "b", "c"], 2);
        assert_eq!(
            keyboard,
            Keyboard::rows(vec![vec!["a", "b"], vec!["c"], vec![CANCEL]])
        );
    }
}
