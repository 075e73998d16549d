//! Database access: pool, migrations and one module per table group

pub mod db;
pub mod events;
pub mod fighters;
pub mod gyms;
pub mod migrations;
pub mod trainers;
pub mod training;

// Re-exports for convenience
pub use db::{create_pool, get_connection, DbConnection, DbPool};
pub use training::AssignOutcome;

/// `LIKE` pattern matching `term` anywhere, with wildcards in `term` escaped.
///
/// Use together with `ESCAPE '\'`.
pub(crate) fn like_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in term.trim().chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}
