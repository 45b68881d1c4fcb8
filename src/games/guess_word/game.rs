use crate::core::buzz::BuzzType;
use crate::core::game::{Context, Game};
use crate::games::guess_word::controller::{RoundConfig, RoundController, RoundSnapshot};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use serde::Serialize;
use tokio::sync::watch;
use tracing::info;

/// What the player ends up with after quitting
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameSummary {
    pub rounds_played: usize,
    pub scores: Vec<i64>,
    pub best: Option<i64>,
    /// State of the most recently finished round
    pub last_round: Option<RoundSnapshot>,
}

/// Live round plus the receivers the UI watches it through
struct Playing {
    round: RoundController,
    time_rx: watch::Receiver<u64>,
    buzz_rx: watch::Receiver<BuzzType>,
    finished_rx: watch::Receiver<bool>,
    panicked: bool,
}

impl Playing {
    fn new(config: &RoundConfig) -> Self {
        let round = RoundController::new(config);
        Self {
            time_rx: round.subscribe_time_remaining(),
            buzz_rx: round.subscribe_buzz(),
            finished_rx: round.subscribe_game_finished(),
            round,
            panicked: false,
        }
    }
}

enum Screen {
    Playing(Playing),
    Score { last: i64 },
}

/// Terminal front end for the round controller
pub struct GuessWordGame {
    config: RoundConfig,
    screen: Screen,
    scores: Vec<i64>,
    last_round: Option<RoundSnapshot>,
}

impl GuessWordGame {
    /// Starts the first round straight away
    pub fn new(config: RoundConfig) -> Self {
        let screen = Screen::Playing(Playing::new(&config));
        Self { config, screen, scores: Vec::new(), last_round: None }
    }

    pub fn round(&self) -> Option<&RoundController> {
        match &self.screen {
            Screen::Playing(p) => Some(&p.round),
            Screen::Score { .. } => None,
        }
    }

    pub fn is_over(&self) -> bool {
        matches!(self.screen, Screen::Score { .. })
    }

    pub fn summary(&self) -> GameSummary {
        GameSummary {
            rounds_played: self.scores.len(),
            scores: self.scores.clone(),
            best: self.scores.iter().copied().max(),
            last_round: self.last_round.clone(),
        }
    }

    fn next_round(&mut self) {
        if let Some(seed) = self.config.seed.as_mut() {
            *seed = seed.wrapping_add(1);
        }
        self.screen = Screen::Playing(Playing::new(&self.config));
    }

    /// React to whatever the round published since the last look
    fn observe(&mut self, ctx: &Context) {
        let Screen::Playing(playing) = &mut self.screen else { return };

        if playing.time_rx.has_changed().unwrap_or(false) {
            let remaining = *playing.time_rx.borrow_and_update();
            if !playing.panicked && remaining > 0 && remaining <= self.config.panic_secs {
                playing.panicked = true;
                playing.round.on_panic_threshold();
            }
        }

        if playing.buzz_rx.has_changed().unwrap_or(false) {
            let buzz = *playing.buzz_rx.borrow_and_update();
            if !buzz.is_none() {
                ctx.buzz(buzz);
                playing.round.acknowledge_buzz();
            }
        }

        if playing.finished_rx.has_changed().unwrap_or(false) && *playing.finished_rx.borrow_and_update() {
            playing.round.acknowledge_game_finished();
            playing.round.dispose();
            let last = playing.round.score();
            self.last_round = Some(playing.round.snapshot());
            info!(score = last, round = self.scores.len() + 1, "round finished");
            self.scores.push(last);
            self.screen = Screen::Score { last };
        }
    }

    fn render_playing(&self, frame: &mut Frame, round: &RoundController) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .margin(1)
            .constraints([Constraint::Length(3), Constraint::Min(3), Constraint::Length(1)])
            .split(frame.area());

        let time_style = if round.time_remaining() <= self.config.panic_secs {
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        frame.render_widget(
            Paragraph::new(format!("Time {}   Score {}", round.time_remaining_string(), round.score()))
                .style(time_style)
                .block(Block::default().borders(Borders::ALL))
                .alignment(Alignment::Center),
            chunks[0],
        );

        frame.render_widget(
            Paragraph::new(format!("\n\"{}\"", round.word()))
                .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
                .block(Block::default().title(" The word is ").borders(Borders::ALL))
                .alignment(Alignment::Center),
            chunks[1],
        );

        frame.render_widget(
            Paragraph::new("[C/→] Got it  [S/←] Skip  [Q] Quit").alignment(Alignment::Center),
            chunks[2],
        );
    }

    fn render_score(&self, frame: &mut Frame, last: i64) {
        let best = self.scores.iter().copied().max().unwrap_or(last);
        let text = format!(
            "Final score: {}\n\nRounds played: {}   Best: {}\n\n[R] Play again  [Q] Quit",
            last,
            self.scores.len(),
            best
        );
        frame.render_widget(
            Paragraph::new(text)
                .block(Block::default().title(" GAME OVER ").borders(Borders::ALL))
                .alignment(Alignment::Center),
            frame.area(),
        );
    }
}

impl Game for GuessWordGame {
    fn handle_input(&mut self, key: KeyEvent, ctx: &Context) {
        match key.code {
            KeyCode::Char('q') => ctx.quit(),
            KeyCode::Char('r') if self.is_over() => self.next_round(),
            code => {
                if let Screen::Playing(playing) = &mut self.screen {
                    match code {
                        KeyCode::Char('c') | KeyCode::Right | KeyCode::Enter => playing.round.on_correct(),
                        KeyCode::Char('s') | KeyCode::Left => playing.round.on_skip(),
                        _ => {}
                    }
                }
            }
        }
        self.observe(ctx);
    }

    async fn tick(&mut self, ctx: &Context) {
        match &mut self.screen {
            Screen::Playing(playing) => {
                playing.round.tick().await;
            }
            Screen::Score { .. } => std::future::pending::<()>().await,
        }
        self.observe(ctx);
    }

    fn render(&self, frame: &mut Frame) {
        match &self.screen {
            Screen::Playing(playing) => self.render_playing(frame, &playing.round),
            Screen::Score { last } => self.render_score(frame, *last),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::game::EngineCommand;
    use crossterm::event::KeyModifiers;
    use ratatui::{backend::TestBackend, Terminal};
    use tokio::sync::mpsc;

    fn setup() -> (GuessWordGame, Context, mpsc::UnboundedReceiver<EngineCommand>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let config = RoundConfig { seed: Some(11), ..RoundConfig::default() };
        (GuessWordGame::new(config), Context { tx }, rx)
    }

    fn press(game: &mut GuessWordGame, ctx: &Context, code: KeyCode) {
        game.handle_input(KeyEvent::new(code, KeyModifiers::NONE), ctx);
    }

    fn drain(rx: &mut mpsc::UnboundedReceiver<EngineCommand>) -> Vec<EngineCommand> {
        let mut out = Vec::new();
        while let Ok(cmd) = rx.try_recv() {
            out.push(cmd);
        }
        out
    }

    fn screen_text(game: &GuessWordGame) -> String {
        let mut terminal = Terminal::new(TestBackend::new(60, 12)).unwrap();
        terminal.draw(|f| game.render(f)).unwrap();
        terminal.backend().buffer().content().iter().map(|c| c.symbol()).collect()
    }

    #[tokio::test(start_paused = true)]
    async fn test_keys_score_and_forward_buzz() {
        let (mut game, ctx, mut rx) = setup();

        press(&mut game, &ctx, KeyCode::Char('c'));
        press(&mut game, &ctx, KeyCode::Right);
        press(&mut game, &ctx, KeyCode::Char('s'));

        let round = game.round().unwrap();
        assert_eq!(round.score(), 1);
        assert_eq!(round.buzz(), BuzzType::None);
        assert_eq!(
            drain(&mut rx),
            vec![EngineCommand::Buzz(BuzzType::Correct), EngineCommand::Buzz(BuzzType::Correct)]
        );

        press(&mut game, &ctx, KeyCode::Char('q'));
        assert_eq!(drain(&mut rx), vec![EngineCommand::Quit]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_panic_once_then_game_over() {
        let (mut game, ctx, mut rx) = setup();

        for _ in 0..10 {
            game.tick(&ctx).await;
        }

        assert_eq!(
            drain(&mut rx),
            vec![EngineCommand::Buzz(BuzzType::Panic), EngineCommand::Buzz(BuzzType::GameOver)]
        );
        assert!(game.is_over());
        assert!(game.round().is_none());
        let summary = game.summary();
        assert_eq!((summary.rounds_played, summary.scores, summary.best), (1, vec![0], Some(0)));
        let last = summary.last_round.unwrap();
        assert_eq!((last.score, last.time_remaining, last.buzz, last.finished), (0, 0, BuzzType::None, false));
    }

    #[tokio::test(start_paused = true)]
    async fn test_play_again_starts_fresh_round() {
        let (mut game, ctx, _rx) = setup();
        press(&mut game, &ctx, KeyCode::Char('c'));
        press(&mut game, &ctx, KeyCode::Char('c'));
        for _ in 0..10 {
            game.tick(&ctx).await;
        }
        assert!(screen_text(&game).contains("Final score: 2"));

        press(&mut game, &ctx, KeyCode::Char('r'));
        let round = game.round().unwrap();
        assert_eq!(round.score(), 0);
        assert_eq!(round.time_remaining(), 10);
        assert!(round.is_running());
        assert_eq!(game.summary().best, Some(2));
    }

    #[tokio::test(start_paused = true)]
    async fn test_renders_word_time_and_score() {
        let (mut game, ctx, _rx) = setup();
        press(&mut game, &ctx, KeyCode::Char('s'));
        game.tick(&ctx).await;

        let text = screen_text(&game);
        let word = game.round().unwrap().word();
        assert!(text.contains("Time 00:09"));
        assert!(text.contains("Score -1"));
        assert!(text.contains(&word));
    }
}
