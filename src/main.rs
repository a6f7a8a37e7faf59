//! gymlog - Telegram workout journal
//!
//! Send "Bench press 3x8 75kg" to the bot, get per-exercise totals back with /stats.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use gymlog::bot::run_bot;
use gymlog::config::{BotConfig, DB_PATH_ENV, DEFAULT_DB_PATH, TOKEN_ENV};
use gymlog::store::WorkoutStore;
use gymlog::tui::{sets_reps_label, App};
use gymlog::Database;

#[derive(Parser)]
#[command(name = "gymlog")]
#[command(author, version, about = "Telegram workout journal")]
struct Cli {
    /// SQLite database file
    #[arg(long, env = DB_PATH_ENV, default_value = DEFAULT_DB_PATH, global = true)]
    db: PathBuf,

    /// Telegram bot token
    #[arg(long, env = TOKEN_ENV, hide_env_values = true, global = true)]
    token: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start Telegram bot (default)
    Bot,

    /// Log workout lines for a user, same as messaging the bot
    Log {
        /// Telegram user id
        #[arg(short, long)]
        user: i64,

        /// One exercise per line, e.g. "squat 4x10 90kg"
        text: String,
    },

    /// Show top 5 exercises by volume
    Stats {
        #[arg(short, long)]
        user: i64,
    },

    /// List logged exercises, newest first
    History {
        #[arg(short, long)]
        user: i64,

        /// Number of records to show
        #[arg(short, long, default_value = "20")]
        limit: usize,

        /// One JSON object per line
        #[arg(long)]
        json: bool,
    },

    /// Open TUI dashboard
    Tui {
        #[arg(short, long)]
        user: i64,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command.unwrap_or(Commands::Bot) {
        Commands::Bot => {
            let config = BotConfig::new(cli.token, cli.db)?;
            println!("Starting Telegram bot...");
            println!("Database: {}", config.db_path.display());
            run_bot(config).await?;
        }

        Commands::Log { user, text } => {
            let store = WorkoutStore::new(Database::open(&cli.db)?);
            let outcome = store.record(user, &text)?;
            println!("{}", outcome.message);
        }

        Commands::Stats { user } => {
            let store = WorkoutStore::new(Database::open(&cli.db)?);
            println!("{}", store.stats(user)?);
        }

        Commands::History { user, limit, json } => {
            let db = Database::open(&cli.db)?;
            let entries = db.entries_for_user(user)?;

            for e in entries.iter().take(limit) {
                if json {
                    println!("{}", serde_json::to_string(e)?);
                } else {
                    println!(
                        "{} | {:20} | {:8} | {}",
                        e.date.format("%Y-%m-%d"),
                        e.exercise,
                        sets_reps_label(e),
                        e.weight.map(|w| format!("{} kg", w)).unwrap_or_else(|| "-".to_string())
                    );
                }
            }
        }

        Commands::Tui { user } => {
            let store = WorkoutStore::new(Database::open(&cli.db)?);
            let mut app = App::new(store, user)?;
            app.run()?;
        }
    }

    Ok(())
}
