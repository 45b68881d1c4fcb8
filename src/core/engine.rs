use crate::core::buzz::Buzzer;
use crate::core::game::{Context, EngineCommand, Game};
use anyhow::{anyhow, Result};
use crossterm::event::{Event, KeyCode, KeyEventKind};
use futures_util::{Stream, StreamExt};
use ratatui::{backend::Backend, Terminal};
use tracing::{debug, info};

pub struct Engine<G: Game> {
    game: G,
    buzzer: Box<dyn Buzzer>,
}

impl<G: Game> Engine<G> {
    pub fn new(game: G, buzzer: Box<dyn Buzzer>) -> Self {
        Self { game, buzzer }
    }

    /// Run until the game or the player quits, then hand the game back.
    pub async fn run<B, E>(mut self, terminal: &mut Terminal<B>, mut events: E) -> Result<G>
    where
        B: Backend,
        E: Stream<Item = std::io::Result<Event>> + Unpin,
    {
        // set up the outbox games use to talk back to the engine
        let (outbox_tx, mut outbox_rx) = tokio::sync::mpsc::unbounded_channel::<EngineCommand>();
        let ctx = Context { tx: outbox_tx };

        loop {
            terminal
                .draw(|f| self.game.render(f))
                .map_err(|e| anyhow!("failed to draw frame: {e}"))?;

            tokio::select! {
                biased;

                // 1. COMMANDS: queued by the game during the last step
                Some(cmd) = outbox_rx.recv() => {
                    match cmd {
                        EngineCommand::Quit => break,
                        EngineCommand::Buzz(buzz) => {
                            debug!(?buzz, "playing buzz");
                            self.buzzer.buzz(buzz)?;
                        }
                    }
                }

                // 2. INPUT: key presses from the terminal
                maybe_event = events.next() => {
                    match maybe_event {
                        Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                            if key.code == KeyCode::Esc { break; }
                            self.game.handle_input(key, &ctx);
                        }
                        Some(Ok(_)) => {}
                        Some(Err(e)) => return Err(e.into()),
                        None => {
                            info!("input stream closed");
                            break;
                        }
                    }
                }

                // 3. TICK: game clock
                _ = self.game.tick(&ctx) => {}
            }
        }

        Ok(self.game)
    }
}
