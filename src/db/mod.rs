//! Database module - SQLite storage for workout entries

use std::path::Path;

use anyhow::Result;
use chrono::NaiveDate;
use rusqlite::{Connection, Row, params, types::Type};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::parser::ParsedLine;

/// Dates are stored as ISO 8601 days
const DATE_FORMAT: &str = "%Y-%m-%d";

/// One stored exercise line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutEntry {
    pub id: Option<i64>,
    pub user_id: i64,
    pub date: NaiveDate,
    pub exercise: String,
    pub sets: Option<u32>,
    pub reps: Option<String>,
    pub weight: Option<f64>,
}

impl WorkoutEntry {
    pub fn from_parsed(user_id: i64, date: NaiveDate, line: ParsedLine) -> Self {
        Self {
            id: None,
            user_id,
            date,
            exercise: line.exercise,
            sets: line.sets,
            reps: line.reps,
            weight: line.weight,
        }
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        let date_str: String = row.get(2)?;
        let date = NaiveDate::parse_from_str(&date_str, DATE_FORMAT)
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(2, Type::Text, Box::new(e)))?;

        Ok(Self {
            id: Some(row.get(0)?),
            user_id: row.get(1)?,
            date,
            exercise: row.get(3)?,
            sets: row.get(4)?,
            reps: row.get(5)?,
            weight: row.get(6)?,
        })
    }
}

/// Aggregate over one user's entries for one exercise
#[derive(Debug, Clone, PartialEq)]
pub struct ExerciseStats {
    pub exercise: String,
    /// Sum of `sets * weight`; rows without sets add nothing
    pub volume: f64,
    pub max_weight: Option<f64>,
    pub count: u32,
}

/// Database wrapper
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open or create database
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let conn = Connection::open(path)?;
        let db = Self { conn };
        db.init_schema()?;
        info!("Database opened at {}", path.display());
        Ok(db)
    }

    /// Private database that disappears with the connection
    pub fn open_in_memory() -> Result<Self> {
        let db = Self { conn: Connection::open_in_memory()? };
        db.init_schema()?;
        Ok(db)
    }

    fn init_schema(&self) -> Result<()> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS workouts (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id INTEGER NOT NULL,
                date TEXT NOT NULL,
                exercise TEXT NOT NULL,
                sets INTEGER,
                reps TEXT,
                weight REAL
            );
            CREATE INDEX IF NOT EXISTS idx_workouts_user ON workouts (user_id);",
        )?;
        Ok(())
    }

    /// Append one entry, returning its row id
    pub fn add_entry(&self, entry: &WorkoutEntry) -> Result<i64> {
        self.conn.execute(
            "INSERT INTO workouts (user_id, date, exercise, sets, reps, weight) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                entry.user_id,
                entry.date.format(DATE_FORMAT).to_string(),
                entry.exercise,
                entry.sets,
                entry.reps,
                entry.weight,
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// All entries of one user, newest first
    pub fn entries_for_user(&self, user_id: i64) -> Result<Vec<WorkoutEntry>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, user_id, date, exercise, sets, reps, weight FROM workouts
             WHERE user_id = ?1 ORDER BY date DESC, id DESC",
        )?;

        let entries = stmt
            .query_map([user_id], WorkoutEntry::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(entries)
    }

    /// Per-exercise totals for one user, highest volume first
    pub fn exercise_stats(&self, user_id: i64, limit: usize) -> Result<Vec<ExerciseStats>> {
        // TOTAL() skips the NULL products of rows without sets and gives 0.0 for an all-NULL group
        let mut stmt = self.conn.prepare(
            "SELECT exercise, TOTAL(sets * COALESCE(weight, 0)) AS volume, MAX(weight), COUNT(*)
             FROM workouts
             WHERE user_id = ?1
             GROUP BY exercise
             ORDER BY volume DESC, exercise ASC
             LIMIT ?2",
        )?;

        let stats = stmt
            .query_map(params![user_id, limit as i64], |row| {
                Ok(ExerciseStats {
                    exercise: row.get(0)?,
                    volume: row.get(1)?,
                    max_weight: row.get(2)?,
                    count: row.get(3)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(stats)
    }
}
