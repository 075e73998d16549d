//! End-to-end conversation tests: text in, replies out, rows checked
//!
//! Run with: cargo test -p fightcore --test conversation_test

mod common;

use common::{TestBot, ADMIN_PASSWORD, ADMIN_USERNAME, CHAT_ID};
use fightcore::conversation::menu::{self, CANCEL, CONFIRM_NO, CONFIRM_YES};
use fightcore::conversation::{Keyboard, MenuAction, SlashCommand};
use fightcore::storage::{fighters, gyms, training};
use fightcore::SessionStore;
use pretty_assertions::assert_eq;

// ============================================================================
// Login and routing
// ============================================================================

mod auth_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn test_start_shows_login_keyboard() {
        let bot = TestBot::new();
        let replies = bot.send("/start").await;
        assert_eq!(replies[0].keyboard, Some(menu::login_keyboard()));
    }

    #[tokio::test]
    async fn test_login_then_main_menu() {
        let bot = TestBot::new();
        bot.press(MenuAction::Login).await;
        bot.say(ADMIN_USERNAME).await;
        let replies = bot.send(ADMIN_PASSWORD).await;

        assert!(replies[0].text.contains("Login successful"));
        assert_eq!(replies[0].keyboard, Some(menu::main_keyboard()));
        assert!(bot.sessions.load(CHAT_ID).await.unwrap().authenticated);
    }

    #[tokio::test]
    async fn test_wrong_password_asks_for_username_again() {
        let bot = TestBot::new();
        bot.press(MenuAction::Login).await;
        bot.say(ADMIN_USERNAME).await;
        let text = bot.say("wrong").await;

        assert!(text.contains("Wrong username or password"));
        assert!(text.contains("Enter your username"));
        assert!(!bot.sessions.load(CHAT_ID).await.unwrap().authenticated);
    }

    #[tokio::test]
    async fn test_protected_action_starts_login() {
        let bot = TestBot::new();
        let replies = bot.send(MenuAction::ShowFighters.label()).await;

        assert!(replies[0].text.contains("Please log in first"));
        assert!(replies[1].text.contains("Enter your username"));
        assert!(bot.sessions.load(CHAT_ID).await.unwrap().flow.is_some());
    }

    #[tokio::test]
    async fn test_logout_forgets_session() {
        let bot = TestBot::new();
        bot.login().await;
        let replies = bot.send(MenuAction::Logout.label()).await;

        assert_eq!(replies[0].keyboard, Some(menu::login_keyboard()));
        assert!(bot.sessions.is_empty().await);
        let text = bot.press(MenuAction::ShowGyms).await;
        assert!(text.contains("Enter your username"));
    }

    #[tokio::test]
    async fn test_sessions_do_not_leak_between_chats() {
        let bot = TestBot::new();
        bot.login().await;
        let replies = bot.send_from(42, MenuAction::ShowFighters.label()).await;
        assert!(replies[0].text.contains("Please log in first"));
    }

    #[tokio::test]
    async fn test_unknown_text_gets_hint() {
        let bot = TestBot::new();
        bot.login().await;
        let replies = bot.send("hello there").await;
        assert!(replies[0].text.contains("Unknown command"));
        assert_eq!(replies[0].keyboard, Some(menu::main_keyboard()));
    }

    #[tokio::test]
    async fn test_slash_command_resets_form() {
        let bot = TestBot::new();
        bot.login().await;
        bot.press(MenuAction::AddGym).await;
        bot.say("Persia MMA").await;

        let replies = bot.engine.handle_command(CHAT_ID, SlashCommand::Menu).await.unwrap();
        assert_eq!(replies[0].keyboard, Some(menu::main_keyboard()));
        let session = bot.sessions.load(CHAT_ID).await.unwrap();
        assert_eq!(session.flow, None);
        assert!(session.authenticated);
        assert_eq!(bot.count("gym"), 0);
    }

    #[tokio::test]
    async fn test_idle_form_expires() {
        let mut bot = TestBot::new();
        bot.engine = bot.engine.with_idle_timeout(Some(std::time::Duration::from_secs(60)));
        bot.login().await;
        bot.press(MenuAction::AddGym).await;

        let mut session = bot.sessions.load(CHAT_ID).await.unwrap();
        session.touched_at = Some(chrono::Utc::now() - chrono::Duration::seconds(600));
        bot.sessions.save(CHAT_ID, &session).await.unwrap();

        let replies = bot.send("Persia MMA").await;
        assert!(replies[0].text.contains("expired"));
        assert_eq!(bot.count("gym"), 0);
    }
}

// ============================================================================
// Add forms
// ============================================================================

mod add_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn test_add_fighter_stores_every_field() {
        let bot = TestBot::new();
        let gym_id = bot.add_gym("Persia MMA");
        bot.login().await;

        let text = bot
            .script(&[
                MenuAction::AddFighter.label(),
                "Ali Rezaei",
                "The Lion",
                "Lightweight",
                "25",
                "Iran",
                "Persia MMA",
            ])
            .await;
        assert!(text.contains("added with ID"), "{}", text);

        let list = fighters::list_fighters(&bot.conn(), 50).unwrap();
        assert_eq!(list.len(), 1);
        let fighter = &list[0];
        assert_eq!(fighter.name, "Ali Rezaei");
        assert_eq!(fighter.nickname.as_deref(), Some("The Lion"));
        assert_eq!(fighter.weight_class, "Lightweight");
        assert_eq!(fighter.age, 25);
        assert_eq!(fighter.nationality.as_deref(), Some("Iran"));
        assert_eq!(fighter.gym_id, Some(gym_id));
    }

    #[tokio::test]
    async fn test_optional_fields_can_be_skipped() {
        let bot = TestBot::new();
        bot.login().await;
        bot.script(&[MenuAction::AddFighter.label(), "Reza", "-", "Featherweight", "30", "skip", "-"])
            .await;

        let fighter = &fighters::list_fighters(&bot.conn(), 50).unwrap()[0];
        assert_eq!(fighter.nickname, None);
        assert_eq!(fighter.nationality, None);
        assert_eq!(fighter.gym_id, None);
    }

    #[tokio::test]
    async fn test_cancel_mid_form_leaves_no_row() {
        let bot = TestBot::new();
        bot.login().await;
        bot.script(&[MenuAction::AddFighter.label(), "Ali Rezaei", "The Lion", "Lightweight"])
            .await;

        let replies = bot.send(CANCEL).await;
        assert!(replies[0].text.contains("cancelled"));
        assert_eq!(replies[0].keyboard, Some(menu::main_keyboard()));
        assert_eq!(bot.count("fighter"), 0);
        assert_eq!(bot.sessions.load(CHAT_ID).await.unwrap().flow, None);
    }

    #[tokio::test]
    async fn test_cancel_at_every_gym_step_leaves_no_row() {
        let answers = ["Persia MMA", "Tehran", "Reza Karimi"];
        // The last iteration cancels at the owner step, which is the one that writes
        for step in 0..answers.len() {
            let bot = TestBot::new();
            bot.login().await;
            bot.press(MenuAction::AddGym).await;
            bot.script(&answers[..step]).await;

            let text = bot.say(CANCEL).await;
            assert!(text.contains("cancelled"), "step {}: {}", step, text);
            assert_eq!(bot.count("gym"), 0, "step {}", step);
            assert_eq!(bot.sessions.load(CHAT_ID).await.unwrap().flow, None);
        }
    }

    #[tokio::test]
    async fn test_invalid_age_reprompts_same_step() {
        let bot = TestBot::new();
        bot.login().await;
        bot.script(&[MenuAction::AddFighter.label(), "Ali Rezaei", "-", "Lightweight"])
            .await;

        for bad in ["abc", "0", "-5", "16"] {
            let text = bot.say(bad).await;
            assert!(text.contains("Enter the age"), "{} -> {}", bad, text);
        }
        let text = bot.say("25").await;
        assert!(text.contains("nationality"));
        assert_eq!(bot.count("fighter"), 0);
    }

    #[tokio::test]
    async fn test_unknown_gym_reprompts() {
        let bot = TestBot::new();
        bot.login().await;
        let text = bot
            .script(&[MenuAction::AddTrainer.label(), "Coach Karimi", "Boxing", "Nowhere Gym"])
            .await;
        assert!(text.contains("not found"));
        assert_eq!(bot.count("trainer"), 0);

        bot.add_gym("Persia MMA");
        let text = bot.say("Persia MMA").await;
        assert!(text.contains("added with ID"));
        assert_eq!(bot.count("trainer"), 1);
    }

    #[tokio::test]
    async fn test_add_gym_rejects_short_name() {
        let bot = TestBot::new();
        bot.login().await;
        bot.press(MenuAction::AddGym).await;
        let text = bot.say("X").await;
        assert!(text.contains("at least 2 characters"));

        let text = bot.script(&["Persia MMA", "Tehran", "Reza Karimi"]).await;
        assert!(text.contains("added with ID"));
        let list = gyms::list_gyms(&bot.conn(), 50).unwrap();
        assert_eq!(list[0].gym.reputation_score, 75);
    }

    #[tokio::test]
    async fn test_menu_label_mid_form_is_field_input() {
        let bot = TestBot::new();
        bot.login().await;
        bot.press(MenuAction::AddGym).await;
        bot.say(MenuAction::ShowGyms.label()).await;
        let text = bot.script(&["Tehran", "Reza Karimi"]).await;

        assert!(text.contains("added with ID"));
        let list = gyms::list_gyms(&bot.conn(), 50).unwrap();
        assert_eq!(list[0].gym.name, "Show gyms");
    }
}

// ============================================================================
// Events
// ============================================================================

mod event_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn test_add_event_with_outcome() {
        let bot = TestBot::new();
        bot.add_fighter("Ali");
        bot.add_fighter("Reza");
        bot.login().await;

        let text = bot
            .script(&[
                MenuAction::AddEvent.label(),
                "2024-05-01 20:00",
                "2024-05-01 22:00",
                "Azadi Arena",
                "Ali",
                "Reza",
                "First fighter wins",
            ])
            .await;
        assert!(text.contains("Ali vs Reza"), "{}", text);
        assert_eq!(bot.count("match_event"), 1);
        assert_eq!(bot.count("participants"), 2);

        let listing = bot.press(MenuAction::ShowEvents).await;
        assert!(listing.contains("Winner: Ali"));
    }

    #[tokio::test]
    async fn test_cancel_at_every_event_step_leaves_no_row() {
        let answers = ["2024-05-01 20:00", "2024-05-01 22:00", "Azadi Arena", "Ali", "Reza"];
        // Up to and including the outcome step, where the match is written
        for step in 0..=answers.len() {
            let bot = TestBot::new();
            bot.add_fighter("Ali");
            bot.add_fighter("Reza");
            bot.login().await;
            bot.press(MenuAction::AddEvent).await;
            bot.script(&answers[..step]).await;

            let text = bot.say(CANCEL).await;
            assert!(text.contains("cancelled"), "step {}: {}", step, text);
            assert_eq!(bot.count("match_event"), 0, "step {}", step);
            assert_eq!(bot.count("participants"), 0, "step {}", step);
            assert_eq!(bot.sessions.load(CHAT_ID).await.unwrap().flow, None);
        }
    }

    #[tokio::test]
    async fn test_same_fighter_twice_is_rejected() {
        let bot = TestBot::new();
        bot.add_fighter("Ali");
        bot.login().await;

        let text = bot
            .script(&[MenuAction::AddEvent.label(), "2024-05-01 20:00", "unknown", "Azadi Arena", "Ali", "Ali"])
            .await;
        assert!(text.contains("cannot fight themselves"));
        assert!(text.contains("second fighter"));
        assert_eq!(bot.count("match_event"), 0);
    }

    #[tokio::test]
    async fn test_end_before_start_reprompts() {
        let bot = TestBot::new();
        bot.login().await;
        let text = bot
            .script(&[MenuAction::AddEvent.label(), "2024-05-01 20:00", "2024-05-01 19:00"])
            .await;
        assert!(text.contains("later than the start"));
        let text = bot.say("2024-05-01 21:00").await;
        assert!(text.contains("location"));
    }
}

// ============================================================================
// Edit forms
// ============================================================================

mod edit_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    async fn edit_fighter_name(bot: &TestBot, id: i64, answer: &str) -> String {
        bot.press(MenuAction::EditFighter).await;
        bot.say(&id.to_string()).await;
        bot.say("Name").await;
        let question = bot.send("Ali the Great").await;
        assert_eq!(question[0].keyboard, Some(menu::confirm_keyboard()));
        bot.say(answer).await
    }

    fn name_of(bot: &TestBot, id: i64) -> String {
        fighters::get_fighter(&bot.conn(), id).unwrap().unwrap().name
    }

    #[tokio::test]
    async fn test_confirm_applies_edit() {
        let bot = TestBot::new();
        let id = bot.add_fighter("Ali");
        bot.login().await;

        let text = edit_fighter_name(&bot, id, CONFIRM_YES).await;
        assert!(text.contains("updated"));
        assert_eq!(name_of(&bot, id), "Ali the Great");
    }

    #[tokio::test]
    async fn test_decline_leaves_record_unchanged() {
        let bot = TestBot::new();
        let id = bot.add_fighter("Ali");
        bot.login().await;

        let text = edit_fighter_name(&bot, id, CONFIRM_NO).await;
        assert!(text.contains("Nothing was changed"));
        assert_eq!(name_of(&bot, id), "Ali");
    }

    #[tokio::test]
    async fn test_cancel_at_confirmation_leaves_record_unchanged() {
        let bot = TestBot::new();
        let id = bot.add_fighter("Ali");
        bot.login().await;

        let text = edit_fighter_name(&bot, id, CANCEL).await;
        assert!(text.contains("cancelled"));
        assert_eq!(name_of(&bot, id), "Ali");
    }

    #[tokio::test]
    async fn test_other_answer_aborts_without_applying() {
        let bot = TestBot::new();
        let id = bot.add_fighter("Ali");
        bot.login().await;

        let text = edit_fighter_name(&bot, id, "maybe").await;
        assert!(text.contains("Invalid command"));
        assert_eq!(name_of(&bot, id), "Ali");
        assert_eq!(bot.sessions.load(CHAT_ID).await.unwrap().flow, None);
    }

    #[tokio::test]
    async fn test_unknown_id_reprompts() {
        let bot = TestBot::new();
        bot.login().await;
        bot.press(MenuAction::EditFighter).await;
        let text = bot.say("999").await;
        assert!(text.contains("No fighter with ID 999"));
        let text = bot.say("abc").await;
        assert!(text.contains("Enter the fighter ID"));
    }

    #[tokio::test]
    async fn test_reputation_out_of_range_is_rejected() {
        let bot = TestBot::new();
        let id = bot.add_gym("Persia MMA");
        bot.login().await;

        bot.script(&[MenuAction::EditGym.label(), &id.to_string(), "Reputation"])
            .await;
        let text = bot.say("150").await;
        assert!(text.contains("from 0 to 100"));
        let gym = gyms::get_gym(&bot.conn(), id).unwrap().unwrap();
        assert_eq!(gym.reputation_score, 75);

        bot.say("90").await;
        bot.say(CONFIRM_YES).await;
        let gym = gyms::get_gym(&bot.conn(), id).unwrap().unwrap();
        assert_eq!(gym.reputation_score, 90);
    }

    #[tokio::test]
    async fn test_edit_fighter_gym_and_status() {
        let bot = TestBot::new();
        let id = bot.add_fighter("Ali");
        let gym_id = bot.add_gym("Persia MMA");
        bot.login().await;

        bot.script(&[MenuAction::EditFighter.label(), &id.to_string(), "Gym", "Persia MMA", CONFIRM_YES])
            .await;
        let id_prompt = bot.press(MenuAction::EditFighter).await;
        assert!(id_prompt.contains("fighter ID"));
        bot.script(&[&id.to_string(), "Status"]).await;
        let replies = bot.send("sleeping").await;
        assert!(replies[0].text.contains("Unknown status"));
        bot.script(&["retired", CONFIRM_YES]).await;

        let fighter = fighters::get_fighter(&bot.conn(), id).unwrap().unwrap();
        assert_eq!(fighter.gym_id, Some(gym_id));
        assert_eq!(fighter.status.to_string(), "retired");
    }

    #[tokio::test]
    async fn test_edit_event_outcome() {
        let bot = TestBot::new();
        bot.add_fighter("Ali");
        bot.add_fighter("Reza");
        bot.login().await;
        bot.script(&[
            MenuAction::AddEvent.label(),
            "2024-05-01 20:00",
            "unknown",
            "Azadi Arena",
            "Ali",
            "Reza",
            "Unknown",
        ])
        .await;

        let text = bot.script(&[MenuAction::EditEvent.label(), "1", "Outcome", "Draw", CONFIRM_YES]).await;
        assert!(text.contains("updated"));
        let listing = bot.press(MenuAction::ShowEvents).await;
        assert!(listing.contains("Draw"));
    }

    #[tokio::test]
    async fn test_edit_event_start_must_stay_before_end() {
        let bot = TestBot::new();
        bot.add_fighter("Ali");
        bot.add_fighter("Reza");
        bot.login().await;
        bot.script(&[
            MenuAction::AddEvent.label(),
            "2024-05-01 20:00",
            "2024-05-01 22:00",
            "Azadi Arena",
            "Ali",
            "Reza",
            "Draw",
        ])
        .await;

        let text = bot
            .script(&[MenuAction::EditEvent.label(), "1", "Start", "2024-05-01 23:00"])
            .await;
        assert!(text.contains("later than the start"));
    }
}

// ============================================================================
// Training submenu
// ============================================================================

mod training_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn test_assign_then_reassign_is_rejected() {
        let bot = TestBot::new();
        let fighter = bot.add_fighter("Ali");
        let trainer = bot.add_trainer("Coach Karimi");
        bot.login().await;

        let replies = bot.send(MenuAction::TrainingMenu.label()).await;
        assert_eq!(replies[0].keyboard, Some(menu::training_keyboard()));

        let text = bot
            .script(&[MenuAction::AssignTrainer.label(), &fighter.to_string(), &trainer.to_string(), "2024-01-10"])
            .await;
        assert!(text.contains("now trains with"), "{}", text);

        let replies = bot.send(MenuAction::AssignTrainer.label()).await;
        assert_eq!(replies[0].keyboard, Some(menu::cancel_keyboard()));
        bot.say(&fighter.to_string()).await;
        let replies = bot.send(&trainer.to_string()).await;
        assert!(replies[0].text.contains("already trains with"));
        assert_eq!(replies[0].keyboard, Some(menu::training_keyboard()));
        assert_eq!(bot.count("fighter_trainer"), 1);
    }

    #[tokio::test]
    async fn test_end_training_by_number() {
        let bot = TestBot::new();
        let fighter = bot.add_fighter("Ali");
        let trainer = bot.add_trainer("Coach Karimi");
        training::assign_trainer(
            &mut bot.conn(),
            fighter,
            trainer,
            chrono::NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(),
        )
        .unwrap();
        bot.login().await;

        let replies = bot.send(MenuAction::EndTraining.label()).await;
        assert!(replies[0].text.contains("fighter ID"));
        let replies = bot.send(&fighter.to_string()).await;
        assert!(replies[0].text.contains("1. Coach Karimi"));
        let Some(Keyboard::Buttons(rows)) = &replies[0].keyboard else {
            panic!("expected numbered buttons");
        };
        assert_eq!(rows[0], vec!["1".to_string()]);

        bot.say("1").await;
        let text = bot.say("2024-01-01").await;
        assert!(text.contains("cannot be before the start date"));
        let text = bot.say("2024-02-01").await;
        assert!(text.contains("ended on 2024-02-01"));
        assert!(!training::has_open_assignment(&bot.conn(), fighter, trainer).unwrap());
    }

    #[tokio::test]
    async fn test_assign_end_and_reassign_today() {
        let bot = TestBot::new();
        let fighter = bot.add_fighter("Ali");
        let trainer = bot.add_trainer("Coach Karimi");
        bot.login().await;

        let (fighter, trainer) = (fighter.to_string(), trainer.to_string());
        let text = bot
            .script(&[MenuAction::AssignTrainer.label(), &fighter, &trainer, "today"])
            .await;
        assert!(text.contains("now trains with"), "{}", text);
        let text = bot.script(&[MenuAction::EndTraining.label(), &fighter, "1", "today"]).await;
        assert!(text.contains("ended on"), "{}", text);

        let text = bot
            .script(&[MenuAction::AssignTrainer.label(), &fighter, &trainer, "today"])
            .await;
        assert!(text.contains("now trains with"), "{}", text);
        assert_eq!(bot.count("fighter_trainer"), 2);
    }

    #[tokio::test]
    async fn test_start_inside_earlier_period_reprompts() {
        let bot = TestBot::new();
        let fighter = bot.add_fighter("Ali");
        let trainer = bot.add_trainer("Coach Karimi");
        let day = |m, d| chrono::NaiveDate::from_ymd_opt(2024, m, d).unwrap();
        training::assign_trainer(&mut bot.conn(), fighter, trainer, day(1, 10)).unwrap();
        training::end_assignment(&bot.conn(), fighter, trainer, day(2, 1)).unwrap();
        bot.login().await;

        let text = bot
            .script(&[MenuAction::AssignTrainer.label(), &fighter.to_string(), &trainer.to_string()])
            .await;
        assert!(text.contains("start date"));

        let replies = bot.send("2024-01-10").await;
        assert!(replies[0].text.contains("until 2024-02-01"), "{}", replies[0].text);
        assert!(replies[0].text.contains("Enter the start date"));
        assert!(!replies[0].text.contains("Database error"));
        assert_eq!(bot.count("fighter_trainer"), 1);

        let text = bot.say("2024-02-01").await;
        assert!(text.contains("now trains with"), "{}", text);
        assert_eq!(bot.count("fighter_trainer"), 2);
    }

    #[tokio::test]
    async fn test_end_training_without_active_trainers() {
        let bot = TestBot::new();
        let fighter = bot.add_fighter("Ali");
        bot.login().await;

        let text = bot.script(&[MenuAction::EndTraining.label(), &fighter.to_string()]).await;
        assert!(text.contains("has no active trainers"));
    }

    #[tokio::test]
    async fn test_view_trainers_of_fighter() {
        let bot = TestBot::new();
        let fighter = bot.add_fighter("Ali");
        let trainer = bot.add_trainer("Coach Karimi");
        bot.login().await;
        bot.script(&[MenuAction::AssignTrainer.label(), &fighter.to_string(), &trainer.to_string(), "today"])
            .await;

        let replies = bot.send(MenuAction::TrainersOfFighter.label()).await;
        assert!(replies[0].text.contains("fighter ID"));
        let replies = bot.send(&fighter.to_string()).await;
        assert!(replies[0].html);
        assert!(replies[0].text.contains("Active: 1 · Past: 0"));
        assert!(replies[0].text.contains("Coach Karimi"));

        let text = bot.script(&[MenuAction::FightersOfTrainer.label(), &trainer.to_string()]).await;
        assert!(text.contains("Pupils of Coach Karimi"));
    }
}

// ============================================================================
// Listings and search
// ============================================================================

mod listing_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn test_search_fighter() {
        let bot = TestBot::new();
        bot.add_fighter("Ali Rezaei");
        bot.add_fighter("Omid");
        bot.login().await;

        let replies = bot.send(MenuAction::SearchFighter.label()).await;
        assert!(replies[0].text.contains("name or nickname"));
        let replies = bot.send("rez").await;
        assert!(replies[0].html);
        assert!(replies[0].text.contains("Ali Rezaei"));
        assert!(!replies[0].text.contains("Omid"));
        assert_eq!(bot.sessions.load(CHAT_ID).await.unwrap().flow, None);
    }

    #[tokio::test]
    async fn test_search_gym_by_owner() {
        let bot = TestBot::new();
        bot.add_gym("Persia MMA");
        bot.login().await;

        let replies = bot.send(MenuAction::SearchGym.label()).await;
        assert!(replies[0].text.contains("owner"));
        let text = bot.say("Karimi").await;
        assert!(text.contains("Persia MMA"), "{}", text);
    }

    #[tokio::test]
    async fn test_long_listing_fits_telegram_messages() {
        let bot = TestBot::new();
        for n in 1..=50 {
            bot.add_fighter(&format!("Fighter Number {:02} Longname", n));
        }
        bot.login().await;

        let replies = bot.send(MenuAction::ShowFighters.label()).await;
        assert!(replies.len() > 1, "expected several messages");
        for reply in &replies {
            assert!(reply.html);
            assert!(reply.text.encode_utf16().count() <= 4096, "{} units", reply.text.encode_utf16().count());
        }
        let all = replies.iter().map(|reply| reply.text.as_str()).collect::<Vec<_>>().join("\n\n");
        for n in 1..=50 {
            assert!(all.contains(&format!("Fighter Number {:02} Longname", n)), "fighter {} missing", n);
        }
    }

    #[tokio::test]
    async fn test_listing_escapes_html() {
        let bot = TestBot::new();
        bot.add_gym("<script>");
        bot.login().await;

        let text = bot.press(MenuAction::ShowGyms).await;
        assert!(text.contains("&lt;script&gt;"));
        assert!(!text.contains("<script>"));
    }

    #[tokio::test]
    async fn test_empty_listing() {
        let bot = TestBot::new();
        bot.login().await;
        let text = bot.press(MenuAction::ShowTrainers).await;
        assert!(text.contains("Nothing found"));
    }
}
