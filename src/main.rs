use anyhow::Result;
use clap::Parser;
use crossterm::event::EventStream;
use tracing::info;
use wordbuzz::cli::Cli;
use wordbuzz::core::buzz::{BellBuzzer, Buzzer, SilentBuzzer};
use wordbuzz::core::engine::Engine;
use wordbuzz::games::guess_word::GuessWordGame;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    cli.init_logging()?;
    let config = cli.round_config()?;
    info!(?config, "starting");

    let buzzer: Box<dyn Buzzer> = if cli.silent { Box::new(SilentBuzzer) } else { Box::new(BellBuzzer::new()) };

    // 1. Take over the terminal and start the first round
    let mut terminal = ratatui::init();
    let engine = Engine::new(GuessWordGame::new(config), buzzer);

    // 2. Play until the player quits
    let result = engine.run(&mut terminal, EventStream::new()).await;

    ratatui::restore();
    let game = result?;

    // 3. Report
    let summary = game.summary();
    info!(?summary, "finished");
    if cli.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else if let Some(best) = summary.best {
        println!("Rounds played: {}  Best score: {}", summary.rounds_played, best);
    }
    Ok(())
}
