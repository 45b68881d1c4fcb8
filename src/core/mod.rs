pub mod buzz;
pub mod engine;
pub mod game;
pub mod observable;
pub mod timer;
