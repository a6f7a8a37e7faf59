//! TUI module - Terminal dashboard with ratatui

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph, Table, Row, Cell},
};
use std::io::{stdout, Stdout};

use crate::db::{ExerciseStats, WorkoutEntry};
use crate::store::{format_weight, WorkoutStore, TOP_EXERCISES};

type Tui = Terminal<CrosstermBackend<Stdout>>;

/// App state for TUI
pub struct App {
    store: WorkoutStore,
    user_id: i64,
    entries: Vec<WorkoutEntry>,
    stats: Vec<ExerciseStats>,
    should_quit: bool,
}

impl App {
    pub fn new(store: WorkoutStore, user_id: i64) -> Result<Self> {
        let mut app = Self {
            store,
            user_id,
            entries: Vec::new(),
            stats: Vec::new(),
            should_quit: false,
        };
        app.reload()?;
        Ok(app)
    }

    fn reload(&mut self) -> Result<()> {
        let db = self.store.database();
        self.entries = db.entries_for_user(self.user_id)?;
        self.stats = db.exercise_stats(self.user_id, TOP_EXERCISES)?;
        Ok(())
    }

    /// Run the TUI application
    pub fn run(&mut self) -> Result<()> {
        let mut terminal = init_terminal()?;

        while !self.should_quit {
            terminal.draw(|frame| self.render(frame))?;
            self.handle_events()?;
        }

        restore_terminal()?;
        Ok(())
    }

    fn render(&self, frame: &mut Frame) {
        let area = frame.area();

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(10),
                Constraint::Length(3),
            ])
            .split(area);

        let body = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(chunks[1]);

        let header = Paragraph::new(format!("gymlog - user {}", self.user_id))
            .style(Style::default().fg(Color::Cyan).bold())
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(header, chunks[0]);

        let rows: Vec<Row> = self.entries.iter().map(history_row).collect();
        let history = Table::new(
            rows,
            [
                Constraint::Length(12),
                Constraint::Min(16),
                Constraint::Length(12),
                Constraint::Length(10),
            ],
        )
        .header(Row::new(vec!["Date", "Exercise", "Sets x Reps", "Weight"])
            .style(Style::default().bold()))
        .block(Block::default().borders(Borders::ALL).title("History"));
        frame.render_widget(history, body[0]);

        let rows: Vec<Row> = self.stats.iter().map(stats_row).collect();
        let top = Table::new(
            rows,
            [
                Constraint::Min(14),
                Constraint::Length(10),
                Constraint::Length(8),
                Constraint::Length(6),
            ],
        )
        .header(Row::new(vec!["Exercise", "Volume", "Max", "Times"])
            .style(Style::default().bold()))
        .block(Block::default().borders(Borders::ALL).title("Top 5"));
        frame.render_widget(top, body[1]);

        let footer = Paragraph::new("q: quit | r: refresh")
            .style(Style::default().fg(Color::DarkGray))
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(footer, chunks[2]);
    }

    fn handle_events(&mut self) -> Result<()> {
        if event::poll(std::time::Duration::from_millis(100))?
            && let Event::Key(key) = event::read()?
                && key.kind == KeyEventKind::Press {
                    match key.code {
                        KeyCode::Char('q') => self.should_quit = true,
                        KeyCode::Char('r') => self.reload()?,
                        _ => {}
                    }
                }
        Ok(())
    }
}

fn history_row(entry: &WorkoutEntry) -> Row<'static> {
    Row::new(vec![
        Cell::from(entry.date.format("%Y-%m-%d").to_string()),
        Cell::from(entry.exercise.clone()),
        Cell::from(sets_reps_label(entry)),
        Cell::from(entry.weight.map(format_weight).unwrap_or_else(|| "-".to_string())),
    ])
}

fn stats_row(stats: &ExerciseStats) -> Row<'static> {
    Row::new(vec![
        Cell::from(stats.exercise.clone()),
        Cell::from(format!("{:.0}", stats.volume)),
        Cell::from(stats.max_weight.map(format_weight).unwrap_or_else(|| "?".to_string())),
        Cell::from(stats.count.to_string()),
    ])
}

/// "3x8", "3x?" or "-" depending on what was logged. The parser always
/// stores sets and reps together; "3x?" only shows up for rows written by
/// other tools.
pub fn sets_reps_label(entry: &WorkoutEntry) -> String {
    match (entry.sets, entry.reps.as_deref()) {
        (Some(sets), Some(reps)) => format!("{}x{}", sets, reps),
        (Some(sets), None) => format!("{}x?", sets),
        (None, _) => "-".to_string(),
    }
}

fn init_terminal() -> Result<Tui> {
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let terminal = Terminal::new(CrosstermBackend::new(stdout()))?;
    Ok(terminal)
}

fn restore_terminal() -> Result<()> {
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;
    Ok(())
}
