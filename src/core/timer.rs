//! Countdown timer primitive.
//!
//! A `Countdown` fires once per period until its budget of seconds runs out.
//! It is driven by awaiting [`Countdown::tick`], which makes it usable as a
//! branch in a `tokio::select!` loop. Cancelling drops the underlying
//! interval, after which `tick` never resolves again.

use std::time::Duration;
use tokio::time::{self, Instant, Interval};

/// What a single timer fire produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerEvent {
    /// Seconds still remaining after this tick.
    Tick(u64),
    /// The final tick; nothing remains.
    Finished,
}

#[derive(Debug)]
pub struct Countdown {
    remaining: u64,
    period: Duration,
    started_at: Instant,
    running: bool,
    interval: Option<Interval>,
}

impl Countdown {
    /// Start counting down `total_secs` ticks, one per `period`.
    /// The first tick fires one `period` from now.
    ///
    /// The interval itself is armed on the first `tick`, so a countdown can
    /// be created outside a tokio runtime.
    pub fn start(total_secs: u64, period: Duration) -> Self {
        Self {
            remaining: total_secs,
            period,
            started_at: Instant::now(),
            running: total_secs > 0,
            interval: None,
        }
    }

    pub fn remaining(&self) -> u64 {
        self.remaining
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Stop all future ticks. Safe to call more than once.
    pub fn cancel(&mut self) {
        self.running = false;
        self.interval = None;
    }

    /// Wait for the next fire. Pending forever once finished or cancelled.
    ///
    /// Cancel safe: state only changes after the interval has fired.
    pub async fn tick(&mut self) -> TimerEvent {
        if !self.running {
            return std::future::pending().await;
        }
        let interval = self
            .interval
            .get_or_insert_with(|| time::interval_at(self.started_at + self.period, self.period));
        interval.tick().await;

        self.remaining = self.remaining.saturating_sub(1);
        if self.remaining == 0 {
            self.cancel();
            TimerEvent::Finished
        } else {
            TimerEvent::Tick(self.remaining)
        }
    }
}

/// Format seconds as `MM:SS`, or `H:MM:SS` once an hour is reached.
pub fn format_elapsed(secs: u64) -> String {
    let hours = secs / 3600;
    let mins = (secs % 3600) / 60;
    let secs = secs % 60;
    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, mins, secs)
    } else {
        format!("{:02}:{:02}", mins, secs)
    }
}
