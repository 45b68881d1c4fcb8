use anyhow::{ensure, Context as _, Result};
use clap::Parser;
use std::fs::File;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Duration;
use tracing::Level;

use crate::games::guess_word::RoundConfig;

#[derive(Parser, Debug)]
#[command(name = "wordbuzz")]
#[command(about = "🐝 Guess the word before the clock runs out")]
#[command(version)]
pub struct Cli {
    /// Seconds on the clock for each round
    #[arg(short, long, default_value_t = 10)]
    pub countdown: u64,

    /// Buzz a warning once this many seconds remain
    #[arg(short, long = "panic-at", default_value_t = 4)]
    pub panic_at: u64,

    /// Milliseconds between clock ticks
    #[arg(long, default_value_t = 1000, hide = true)]
    pub tick_ms: u64,

    /// Fixed seed for the word shuffle
    #[arg(long)]
    pub seed: Option<u64>,

    /// Don't ring the terminal bell on buzz events
    #[arg(long)]
    pub silent: bool,

    /// Print the final summary as JSON
    #[arg(long)]
    pub json: bool,

    /// Write logs to this file (the terminal is taken by the game)
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Log level used with --log-file
    #[arg(long, default_value_t = Level::INFO)]
    pub log_level: Level,
}

impl Cli {
    /// Validate the flags and turn them into a round configuration
    pub fn round_config(&self) -> Result<RoundConfig> {
        ensure!(self.countdown > 0, "--countdown must be at least one second");
        ensure!(self.tick_ms > 0, "--tick-ms must be positive");

        Ok(RoundConfig {
            countdown_secs: self.countdown,
            tick: Duration::from_millis(self.tick_ms),
            panic_secs: self.panic_at,
            seed: self.seed,
        })
    }

    /// Install the fmt subscriber when a log file was requested
    pub fn init_logging(&self) -> Result<()> {
        let Some(path) = &self.log_file else { return Ok(()) };
        let file = File::create(path).with_context(|| format!("failed to create log file {}", path.display()))?;

        tracing_subscriber::fmt()
            .with_writer(Mutex::new(file))
            .with_ansi(false)
            .with_max_level(self.log_level)
            .init();
        Ok(())
    }
}
