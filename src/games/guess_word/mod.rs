/// Guess-the-word: one word at a time against a ten second clock
pub mod controller;
pub mod game;
pub mod words;

pub use controller::{RoundConfig, RoundController, RoundSnapshot};
pub use game::{GameSummary, GuessWordGame};
pub use words::{WordQueue, WORDS};
