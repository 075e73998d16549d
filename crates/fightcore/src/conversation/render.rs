//! HTML rendering of records for chat messages
//!
//! Every piece of stored text goes through [`escape_html`].

use crate::conversation::menu::outcome_label;
use crate::models::{
    BoutOutcome, FieldValue, Fighter, Gym, GymSummary, MatchEvent, PupilOfTrainer, Trainer, TrainerOfFighter,
    TrainerSummary,
};

/// Escapes the characters Telegram's HTML parse mode treats as markup.
pub fn escape_html(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            _ => result.push(c),
        }
    }
    result
}

fn or_dash(value: Option<&str>) -> String {
    value.map(escape_html).unwrap_or_else(|| "-".to_string())
}

pub fn fighter(f: &Fighter) -> String {
    let nickname = f
        .nickname
        .as_deref()
        .map(|nick| format!(" \"{}\"", escape_html(nick)))
        .unwrap_or_default();
    format!(
        "<b>#{}</b> {}{}\n{} · {} y.o. · {}\nNationality: {} · Gym: {}",
        f.id,
        escape_html(&f.name),
        nickname,
        escape_html(&f.weight_class),
        f.age,
        f.status,
        or_dash(f.nationality.as_deref()),
        or_dash(f.gym_name.as_deref()),
    )
}

pub fn fighters(title: &str, fighters: &[Fighter]) -> String {
    list(title, fighters.iter().map(fighter))
}

pub fn gym(g: &Gym) -> String {
    format!(
        "<b>#{}</b> {}\n{} · owner {} · reputation {}",
        g.id,
        escape_html(&g.name),
        escape_html(&g.location),
        escape_html(&g.owner),
        g.reputation_score
    )
}

pub fn gyms(title: &str, gyms: &[GymSummary]) -> String {
    list(
        title,
        gyms.iter().map(|summary| {
            format!(
                "{}\nFighters: {} · Trainers: {}",
                gym(&summary.gym),
                summary.fighter_count,
                summary.trainer_count
            )
        }),
    )
}

pub fn trainer(t: &Trainer) -> String {
    format!(
        "<b>#{}</b> {}\nSpecialty: {} · Gym: {}",
        t.id,
        escape_html(&t.name),
        escape_html(&t.specialty),
        or_dash(t.gym_name.as_deref())
    )
}

pub fn trainers(title: &str, trainers: &[TrainerSummary]) -> String {
    list(
        title,
        trainers
            .iter()
            .map(|summary| format!("{}\nPupils: {}", trainer(&summary.trainer), summary.pupil_count)),
    )
}

pub fn outcome_text(event: &MatchEvent) -> String {
    match event.outcome() {
        BoutOutcome::FirstWins => format!("Winner: {}", escape_html(&event.first.fighter_name)),
        BoutOutcome::SecondWins => format!("Winner: {}", escape_html(&event.second.fighter_name)),
        BoutOutcome::Draw => "Draw".to_string(),
        BoutOutcome::NoContest => "No contest".to_string(),
        BoutOutcome::Unknown => "Result not recorded".to_string(),
    }
}

pub fn match_event(event: &MatchEvent) -> String {
    let end = event
        .end
        .map(|end| end.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "unknown".to_string());
    format!(
        "<b>#{}</b> {} vs {}\n{} → {} · {}\n{}",
        event.id,
        escape_html(&event.first.fighter_name),
        escape_html(&event.second.fighter_name),
        event.start.format("%Y-%m-%d %H:%M"),
        end,
        escape_html(&event.location),
        outcome_text(event)
    )
}

pub fn match_events(title: &str, events: &[MatchEvent]) -> String {
    list(title, events.iter().map(match_event))
}

/// Training history of one fighter, split into current and past.
pub fn trainers_of_fighter(fighter_name: &str, rows: &[TrainerOfFighter]) -> String {
    let active = rows.iter().filter(|row| row.end_date.is_none()).count();
    let mut text = format!(
        "<b>Trainers of {}</b>\nActive: {} · Past: {}\n",
        escape_html(fighter_name),
        active,
        rows.len() - active
    );
    for row in rows {
        let period = match row.end_date {
            Some(end) => format!("{} – {}", row.start_date, end),
            None => format!("since {} (active)", row.start_date),
        };
        text.push_str(&format!(
            "\n#{} {} ({}), {}",
            row.trainer_id,
            escape_html(&row.trainer_name),
            escape_html(&row.specialty),
            period
        ));
    }
    text
}

/// Everyone a trainer has trained, split into current and past.
pub fn fighters_of_trainer(trainer_name: &str, rows: &[PupilOfTrainer]) -> String {
    let active = rows.iter().filter(|row| row.end_date.is_none()).count();
    let mut text = format!(
        "<b>Pupils of {}</b>\nActive: {} · Past: {}\n",
        escape_html(trainer_name),
        active,
        rows.len() - active
    );
    for row in rows {
        let period = match row.end_date {
            Some(end) => format!("{} – {}", row.start_date, end),
            None => format!("since {} (active)", row.start_date),
        };
        text.push_str(&format!(
            "\n#{} {} ({}, {}), {}",
            row.fighter_id,
            escape_html(&row.fighter_name),
            escape_html(&row.weight_class),
            row.status,
            period
        ));
    }
    text
}

/// Plain-text rendering of a pending edit value.
pub fn field_value(value: &FieldValue) -> String {
    match value {
        FieldValue::Text(text) => text.clone(),
        FieldValue::OptionalText(Some(text)) => text.clone(),
        FieldValue::OptionalText(None) | FieldValue::Reference(None) => "(empty)".to_string(),
        FieldValue::Integer(n) => n.to_string(),
        FieldValue::Status(status) => status.to_string(),
        FieldValue::Reference(Some(named)) => format!("{} (#{})", named.name, named.id),
        FieldValue::Timestamp(ts) => ts.format("%Y-%m-%d %H:%M").to_string(),
        FieldValue::OptionalTimestamp(Some(ts)) => ts.format("%Y-%m-%d %H:%M").to_string(),
        FieldValue::OptionalTimestamp(None) => "unknown".to_string(),
        FieldValue::Outcome(outcome) => outcome_label(*outcome).to_string(),
    }
}

/// Message length as Telegram counts it.
fn message_len(text: &str) -> usize {
    text.encode_utf16().count()
}

/// Cuts an over-long line without leaving half an HTML entity behind.
fn truncate_line(line: &str, max_len: usize) -> String {
    if message_len(line) <= max_len {
        return line.to_string();
    }
    let mut cut = String::new();
    for c in line.chars() {
        if message_len(&cut) + c.len_utf16() + 1 > max_len {
            break;
        }
        cut.push(c);
    }
    if let Some(amp) = cut.rfind('&') {
        if !cut[amp..].contains(';') {
            cut.truncate(amp);
        }
    }
    cut.push('…');
    cut
}

/// Joins `pieces` with `separator` into chunks of at most `max_len`.
fn pack(pieces: impl Iterator<Item = String>, separator: &str, max_len: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();
    for piece in pieces {
        if !current.is_empty() && message_len(&current) + message_len(separator) + message_len(&piece) > max_len {
            chunks.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push_str(separator);
        }
        current.push_str(&piece);
    }
    if !current.is_empty() || chunks.is_empty() {
        chunks.push(current);
    }
    chunks
}

/// Splits rendered HTML into messages of at most `max_len`.
///
/// Records (separated by blank lines) stay whole; a record too long for one
/// message is split between its lines.
pub fn split_message(text: &str, max_len: usize) -> Vec<String> {
    let blocks = text.split("\n\n").flat_map(|block| {
        if message_len(block) <= max_len {
            vec![block.to_string()]
        } else {
            pack(block.split('\n').map(|line| truncate_line(line, max_len)), "\n", max_len)
        }
    });
    pack(blocks, "\n\n", max_len)
}

fn list(title: &str, items: impl Iterator<Item = String>) -> String {
    let mut text = format!("<b>{}</b>", escape_html(title));
    let mut empty = true;
    for item in items {
        empty = false;
        text.push_str("\n\n");
        text.push_str(&item);
    }
    if empty {
        text.push_str("\n\nNothing found.");
    }
    text
}
