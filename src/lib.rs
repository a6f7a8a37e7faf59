//! gymlog - Telegram workout journal
//!
//! Free-text lines like "squat 4x10 90kg" become stored entries; /stats
//! reports the top exercises by volume.

pub mod bot;
pub mod config;
pub mod db;
pub mod parser;
pub mod store;
pub mod tui;

pub use db::{Database, WorkoutEntry};
pub use parser::{ParsedLine, parse_line};
pub use store::WorkoutStore;
