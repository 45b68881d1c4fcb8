/// Core game interface driven by the engine loop
use crate::core::buzz::BuzzType;
use crossterm::event::KeyEvent;
use tokio::sync::mpsc::UnboundedSender;

/// Requests a game can make of the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineCommand {
    Buzz(BuzzType),
    Quit,
}

/// Handle passed into every game callback; commands are queued and handled
/// by the engine before the next input or tick.
#[derive(Clone)]
pub struct Context {
    pub tx: UnboundedSender<EngineCommand>,
}

impl Context {
    pub fn buzz(&self, buzz: BuzzType) {
        let _ = self.tx.send(EngineCommand::Buzz(buzz));
    }

    pub fn quit(&self) {
        let _ = self.tx.send(EngineCommand::Quit);
    }
}

/// Main game trait that all games must implement
#[allow(async_fn_in_trait)]
pub trait Game {
    /// Handle a key press
    fn handle_input(&mut self, key: KeyEvent, ctx: &Context);

    /// Wait for the game's next timed step and apply it.
    /// Must be cancel safe; games without a clock never resolve.
    async fn tick(&mut self, ctx: &Context);

    /// Render the current state into the Ratatui Frame
    fn render(&self, frame: &mut ratatui::Frame);
}
