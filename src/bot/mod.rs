//! Telegram bot module - workout logging over chat

use std::sync::Arc;

use teloxide::{prelude::*, utils::command::BotCommands};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::config::BotConfig;
use crate::db::Database;
use crate::store::{RecordOutcome, WorkoutStore};

type HandlerResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;

pub const GREETING: &str = "Hi! 💪\n\
    Send your workout (for example: Bench press 3x8 75kg)\n\
    Commands:\n\
    /stats — statistics";

#[derive(BotCommands, Clone, Debug, PartialEq)]
#[command(rename_rule = "lowercase", description = "Bot commands:")]
pub enum Command {
    #[command(description = "Start and show the log format")]
    Start,
    #[command(description = "Top 5 exercises by volume")]
    Stats,
}

/// Shared state handed to every handler, alive until the dispatcher stops
pub struct AppContext {
    store: Mutex<WorkoutStore>,
}

impl AppContext {
    pub fn new(store: WorkoutStore) -> Self {
        Self { store: Mutex::new(store) }
    }

    pub async fn record(&self, user_id: i64, text: &str) -> anyhow::Result<RecordOutcome> {
        self.store.lock().await.record(user_id, text)
    }

    pub async fn stats(&self, user_id: i64) -> anyhow::Result<String> {
        self.store.lock().await.stats(user_id)
    }

    /// Reply text for a recognized command
    pub async fn command_reply(&self, user_id: i64, cmd: &Command) -> anyhow::Result<String> {
        match cmd {
            Command::Start => Ok(GREETING.to_string()),
            Command::Stats => {
                debug!("Stats requested by user {}", user_id);
                self.stats(user_id).await
            }
        }
    }
}

/// Start the Telegram bot and poll until Ctrl+C
pub async fn run_bot(config: BotConfig) -> anyhow::Result<()> {
    let store = WorkoutStore::new(Database::open(&config.db_path)?);
    let context = Arc::new(AppContext::new(store));
    let bot = Bot::new(config.token);

    if let Err(e) = bot.set_my_commands(Command::bot_commands()).await {
        warn!("Failed to register bot commands: {}", e);
    }

    let handler = dptree::entry()
        .branch(
            Update::filter_message()
                .filter_command::<Command>()
                .endpoint(handle_command),
        )
        .branch(
            Update::filter_message()
                .endpoint(handle_message),
        );

    info!("Bot started");
    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![context])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    Ok(())
}

/// Telegram user id of the sender, or the chat id for sender-less posts
pub fn sender_id(msg: &Message) -> i64 {
    msg.from
        .as_ref()
        .map(|user| user.id.0 as i64)
        .unwrap_or(msg.chat.id.0)
}

async fn handle_command(
    bot: Bot,
    msg: Message,
    cmd: Command,
    context: Arc<AppContext>,
) -> HandlerResult {
    let text = context.command_reply(sender_id(&msg), &cmd).await?;
    bot.send_message(msg.chat.id, text).await?;
    Ok(())
}

async fn handle_message(
    bot: Bot,
    msg: Message,
    context: Arc<AppContext>,
) -> HandlerResult {
    let Some(text) = msg.text() else {
        debug!("Ignoring non-text message in chat {}", msg.chat.id);
        return Ok(());
    };

    let outcome = context.record(sender_id(&msg), text).await?;
    bot.send_message(msg.chat.id, outcome.message).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{NO_RECORDS, NOT_RECOGNIZED};

    fn context() -> AppContext {
        AppContext::new(WorkoutStore::new(Database::open_in_memory().unwrap()))
    }

    #[test]
    fn test_command_parsing() {
        assert_eq!(Command::parse("/start", "gymlog_bot").unwrap(), Command::Start);
        assert_eq!(Command::parse("/stats", "gymlog_bot").unwrap(), Command::Stats);
        assert_eq!(Command::parse("/stats@gymlog_bot", "gymlog_bot").unwrap(), Command::Stats);
        assert!(Command::parse("/help", "gymlog_bot").is_err());
        assert!(Command::parse("bench press 3x8 75kg", "gymlog_bot").is_err());
    }

    #[test]
    fn test_greeting_mentions_format_and_stats() {
        assert!(GREETING.contains("Bench press 3x8 75kg"));
        assert!(GREETING.contains("/stats"));
    }

    #[tokio::test]
    async fn test_start_reply() {
        let reply = context().command_reply(1, &Command::Start).await.unwrap();
        assert_eq!(reply, GREETING);
    }

    #[tokio::test]
    async fn test_stats_reply_without_records() {
        let reply = context().command_reply(1, &Command::Stats).await.unwrap();
        assert_eq!(reply, NO_RECORDS);
    }

    #[tokio::test]
    async fn test_text_then_stats() {
        let context = context();

        let outcome = context.record(5, "squat 4x10 90кг\nbench press 3x8 75kg").await.unwrap();
        assert!(outcome.ok);
        assert_eq!(outcome.saved, 2);

        let reply = context.command_reply(5, &Command::Stats).await.unwrap();
        assert!(reply.contains("• Squat: 360 kg total • max 90.0 kg • 1 times"));
        assert!(reply.contains("• Bench Press: 225 kg total • max 75.0 kg • 1 times"));
    }

    #[tokio::test]
    async fn test_unknown_command_text_is_not_a_workout() {
        let outcome = context().record(5, "/help").await.unwrap();
        assert!(!outcome.ok);
        assert_eq!(outcome.message, NOT_RECOGNIZED);
    }
}
