//! Round state for the guess-the-word game.
//!
//! `RoundController` owns the word queue, score, countdown and buzz state and
//! publishes every change through an [`Observable`] field. The UI layer reads
//! or subscribes to those fields and acknowledges the one-shot ones (buzz,
//! finished) once it has acted on them.
//!
//! The controller is RUNNING from creation until its countdown elapses, then
//! FINISHED. After [`RoundController::dispose`] nothing changes any more.

use crate::core::buzz::BuzzType;
use crate::core::observable::Observable;
use crate::core::timer::{format_elapsed, Countdown, TimerEvent};
use crate::games::guess_word::words::WordQueue;
use rand::{rngs::StdRng, SeedableRng};
use serde::Serialize;
use std::time::Duration;
use tokio::sync::watch;
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundConfig {
    /// Seconds on the clock when a round starts
    pub countdown_secs: u64,
    /// Time between ticks
    pub tick: Duration,
    /// Remaining seconds at which the UI raises a panic buzz
    pub panic_secs: u64,
    /// Fixed shuffle seed; drawn from the OS when unset
    pub seed: Option<u64>,
}

impl Default for RoundConfig {
    fn default() -> Self {
        Self {
            countdown_secs: 10,
            tick: Duration::from_secs(1),
            panic_secs: 4,
            seed: None,
        }
    }
}

/// Point-in-time copy of every observable field
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoundSnapshot {
    pub word: String,
    pub score: i64,
    pub time_remaining: u64,
    pub buzz: BuzzType,
    pub finished: bool,
}

pub struct RoundController {
    words: WordQueue,
    countdown: Countdown,
    disposed: bool,

    word: Observable<String>,
    score: Observable<i64>,
    time_remaining: Observable<u64>,
    time_remaining_text: Observable<String>,
    buzz: Observable<BuzzType>,
    game_finished: Observable<bool>,
}

impl RoundController {
    /// Shuffle the words, draw the first one and start the clock.
    pub fn new(config: &RoundConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        let mut words = WordQueue::new(rng);
        let first = words.next_word();

        info!(countdown = config.countdown_secs, "RoundController created");
        Self {
            words,
            countdown: Countdown::start(config.countdown_secs, config.tick),
            disposed: false,
            word: Observable::new(first),
            score: Observable::new(0),
            time_remaining: Observable::new(config.countdown_secs),
            time_remaining_text: Observable::new(format_elapsed(config.countdown_secs)),
            buzz: Observable::new(BuzzType::None),
            game_finished: Observable::new(false),
        }
    }

    pub fn on_correct(&mut self) {
        if self.disposed {
            return;
        }
        self.score.update(|s| *s += 1);
        self.buzz.set(BuzzType::Correct);
        debug!(score = self.score.get(), "correct");
        self.next_word();
    }

    pub fn on_skip(&mut self) {
        if self.disposed {
            return;
        }
        self.score.update(|s| *s -= 1);
        debug!(score = self.score.get(), "skip");
        self.next_word();
    }

    /// Raised by the UI when the clock crosses its warning threshold
    pub fn on_panic_threshold(&mut self) {
        if self.disposed {
            return;
        }
        debug!(remaining = self.time_remaining.get(), "panic");
        self.buzz.set(BuzzType::Panic);
    }

    fn next_word(&mut self) {
        self.word.set(self.words.next_word());
    }

    /// Wait for the next clock tick and apply it.
    ///
    /// Never resolves once the round is finished or disposed. Cancel safe.
    pub async fn tick(&mut self) -> TimerEvent {
        let event = self.countdown.tick().await;
        match event {
            TimerEvent::Tick(remaining) => self.set_time_remaining(remaining),
            TimerEvent::Finished => {
                info!(score = self.score.get(), "round over");
                self.buzz.set(BuzzType::GameOver);
                self.set_time_remaining(0);
                self.game_finished.set(true);
            }
        }
        event
    }

    fn set_time_remaining(&mut self, secs: u64) {
        self.time_remaining.set(secs);
        self.time_remaining_text.set(format_elapsed(secs));
    }

    pub fn acknowledge_game_finished(&mut self) {
        if !self.disposed {
            self.game_finished.set(false);
        }
    }

    pub fn acknowledge_buzz(&mut self) {
        if !self.disposed {
            self.buzz.set(BuzzType::None);
        }
    }

    /// Cancel the clock and freeze all state
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.countdown.cancel();
        self.disposed = true;
        debug!("RoundController disposed");
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// True while the clock is still counting
    pub fn is_running(&self) -> bool {
        self.countdown.is_running()
    }

    pub fn word(&self) -> String {
        self.word.get()
    }

    pub fn score(&self) -> i64 {
        self.score.get()
    }

    pub fn time_remaining(&self) -> u64 {
        self.time_remaining.get()
    }

    /// Time remaining as `MM:SS`
    pub fn time_remaining_string(&self) -> String {
        self.time_remaining_text.get()
    }

    pub fn buzz(&self) -> BuzzType {
        self.buzz.get()
    }

    pub fn game_finished(&self) -> bool {
        self.game_finished.get()
    }

    pub fn subscribe_word(&self) -> watch::Receiver<String> {
        self.word.subscribe()
    }

    pub fn subscribe_score(&self) -> watch::Receiver<i64> {
        self.score.subscribe()
    }

    pub fn subscribe_time_remaining(&self) -> watch::Receiver<u64> {
        self.time_remaining.subscribe()
    }

    pub fn subscribe_time_remaining_string(&self) -> watch::Receiver<String> {
        self.time_remaining_text.subscribe()
    }

    pub fn subscribe_buzz(&self) -> watch::Receiver<BuzzType> {
        self.buzz.subscribe()
    }

    pub fn subscribe_game_finished(&self) -> watch::Receiver<bool> {
        self.game_finished.subscribe()
    }

    pub fn snapshot(&self) -> RoundSnapshot {
        RoundSnapshot {
            word: self.word(),
            score: self.score(),
            time_remaining: self.time_remaining(),
            buzz: self.buzz(),
            finished: self.game_finished(),
        }
    }
}

impl Drop for RoundController {
    fn drop(&mut self) {
        self.dispose();
    }
}
