//! Runtime configuration for the bot

use std::path::PathBuf;

use anyhow::{Result, bail};

pub const TOKEN_ENV: &str = "BOT_TOKEN";
pub const DB_PATH_ENV: &str = "WORKOUTS_DB";
pub const DEFAULT_DB_PATH: &str = "workouts.db";

#[derive(Debug, Clone)]
pub struct BotConfig {
    pub token: String,
    pub db_path: PathBuf,
}

impl BotConfig {
    /// Validate what the CLI and environment provided. A missing or blank
    /// token is an error.
    pub fn new(token: Option<String>, db_path: PathBuf) -> Result<Self> {
        let token = match token.map(|t| t.trim().to_string()) {
            Some(t) if !t.is_empty() => t,
            _ => bail!("{} not set!", TOKEN_ENV),
        };

        Ok(Self { token, db_path })
    }
}
