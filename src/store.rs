//! Workout store - record parsed workouts and build statistics reports

use anyhow::Result;
use chrono::{Local, NaiveDate};
use tracing::{debug, info};

use crate::db::{Database, ExerciseStats, WorkoutEntry};
use crate::parser::parse_message;

pub const EXAMPLE_LINE: &str = "Bench press 3x8 75kg";
pub const NOT_RECOGNIZED: &str = "Workout not recognized\nExample: Bench press 3x8 75kg";
pub const NO_RECORDS: &str = "No records yet. Add a workout!";
pub const STATS_HEADER: &str = "📊 Statistics (top 5):";

/// How many exercises the stats report shows
pub const TOP_EXERCISES: usize = 5;

/// Result of one `record` call, ready to send back to the user
#[derive(Debug, Clone, PartialEq)]
pub struct RecordOutcome {
    pub ok: bool,
    pub saved: usize,
    pub message: String,
}

pub struct WorkoutStore {
    db: Database,
}

impl WorkoutStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    /// Parse `text` line by line and save what parses, dated today
    pub fn record(&self, user_id: i64, text: &str) -> Result<RecordOutcome> {
        self.record_on(user_id, text, Local::now().date_naive())
    }

    /// Same as [`record`](Self::record) with an explicit date for every entry
    pub fn record_on(&self, user_id: i64, text: &str, date: NaiveDate) -> Result<RecordOutcome> {
        let lines = parse_message(text);
        if lines.is_empty() {
            debug!("Nothing recognized in message from user {}", user_id);
            return Ok(RecordOutcome {
                ok: false,
                saved: 0,
                message: NOT_RECOGNIZED.to_string(),
            });
        }

        let saved = lines.len();
        for line in lines {
            self.db.add_entry(&WorkoutEntry::from_parsed(user_id, date, line))?;
        }

        info!("Saved {} exercises for user {} on {}", saved, user_id, date);
        Ok(RecordOutcome {
            ok: true,
            saved,
            message: format!("Saved {} exercises for {} ✅", saved, date.format("%Y-%m-%d")),
        })
    }

    /// Top exercises by volume, rendered for chat
    pub fn stats(&self, user_id: i64) -> Result<String> {
        let stats = self.db.exercise_stats(user_id, TOP_EXERCISES)?;
        Ok(format_stats(&stats))
    }
}

pub fn format_stats(stats: &[ExerciseStats]) -> String {
    if stats.is_empty() {
        return NO_RECORDS.to_string();
    }

    let mut lines = vec![STATS_HEADER.to_string()];
    for s in stats {
        lines.push(format!(
            "• {}: {:.0} kg total • max {} kg • {} times",
            s.exercise,
            s.volume,
            format_max_weight(s.max_weight),
            s.count
        ));
    }
    lines.join("\n")
}

/// `?` when nothing (or only zero) was lifted
fn format_max_weight(weight: Option<f64>) -> String {
    match weight {
        Some(w) if w != 0.0 => format_weight(w),
        _ => "?".to_string(),
    }
}

/// Whole weights keep one decimal ("75.0"), others print as-is ("100.5").
/// Below 1e-4 and from 1e16 up the exponent form is used ("1e-05", "1e+16").
pub fn format_weight(weight: f64) -> String {
    let magnitude = weight.abs();
    if weight != 0.0 && (magnitude < 1e-4 || magnitude >= 1e16) {
        return exponent_form(weight);
    }
    if weight.fract() == 0.0 {
        format!("{:.1}", weight)
    } else {
        weight.to_string()
    }
}

/// `{:e}` with a signed, two-digit exponent: 1.5e-5 -> "1.5e-05"
fn exponent_form(weight: f64) -> String {
    let formatted = format!("{:e}", weight);
    let Some((mantissa, exponent)) = formatted.split_once('e') else {
        return formatted;
    };
    let (sign, digits) = match exponent.strip_prefix('-') {
        Some(digits) => ('-', digits),
        None => ('+', exponent),
    };
    format!("{}e{}{:0>2}", mantissa, sign, digits)
}
