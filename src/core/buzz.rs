/// Buzz signals and the haptic output seam
use serde::Serialize;
use std::io::{self, Write};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::warn;

const CORRECT_BUZZ_PATTERN: &[u64] = &[100, 100, 100, 100, 100, 100];
const PANIC_BUZZ_PATTERN: &[u64] = &[0, 200];
const GAME_OVER_BUZZ_PATTERN: &[u64] = &[0, 2000];
const NO_BUZZ_PATTERN: &[u64] = &[0];

/// One-shot cue raised by the round and consumed by the UI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BuzzType {
    Correct,
    GameOver,
    Panic,
    #[default]
    None,
}

impl BuzzType {
    /// Vibration pattern in milliseconds, alternating wait and vibrate
    pub fn pattern(self) -> &'static [u64] {
        match self {
            BuzzType::Correct => CORRECT_BUZZ_PATTERN,
            BuzzType::GameOver => GAME_OVER_BUZZ_PATTERN,
            BuzzType::Panic => PANIC_BUZZ_PATTERN,
            BuzzType::None => NO_BUZZ_PATTERN,
        }
    }

    pub fn is_none(self) -> bool {
        self == BuzzType::None
    }
}

/// Offsets from the start of a pattern at which each vibrate segment begins.
/// Zero-length vibrate segments are skipped.
pub fn pulse_offsets(pattern: &[u64]) -> Vec<Duration> {
    let mut at = 0;
    let mut pulses = Vec::new();
    for (i, &ms) in pattern.iter().enumerate() {
        if i % 2 == 1 && ms > 0 {
            pulses.push(Duration::from_millis(at));
        }
        at += ms;
    }
    pulses
}

/// Whatever actually produces the cue (vibrator, speaker, bell)
pub trait Buzzer: Send {
    fn buzz(&mut self, buzz: BuzzType) -> anyhow::Result<()>;
}

/// Plays a buzz pattern on the terminal bell, one ring per vibrate segment.
///
/// Rings are scheduled on a spawned task so the engine loop never waits on
/// a long pattern; needs a tokio runtime.
pub struct BellBuzzer<W = io::Stdout> {
    out: Arc<Mutex<W>>,
}

impl BellBuzzer {
    pub fn new() -> Self {
        Self::with_writer(Arc::new(Mutex::new(io::stdout())))
    }
}

impl Default for BellBuzzer {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Write + Send + 'static> BellBuzzer<W> {
    pub fn with_writer(out: Arc<Mutex<W>>) -> Self {
        Self { out }
    }
}

impl<W: Write + Send + 'static> Buzzer for BellBuzzer<W> {
    fn buzz(&mut self, buzz: BuzzType) -> anyhow::Result<()> {
        let pulses = pulse_offsets(buzz.pattern());
        if pulses.is_empty() {
            return Ok(());
        }
        let out = self.out.clone();
        tokio::spawn(async move {
            let start = tokio::time::Instant::now();
            for offset in pulses {
                tokio::time::sleep_until(start + offset).await;
                if let Err(e) = ring(&out) {
                    warn!(error = ?e, ?buzz, "bell failed");
                    return;
                }
            }
        });
        Ok(())
    }
}

fn ring<W: Write>(out: &Mutex<W>) -> io::Result<()> {
    let mut out = out.lock().map_err(|_| io::Error::other("bell writer poisoned"))?;
    out.write_all(b"\x07")?;
    out.flush()
}

/// Drops every signal
pub struct SilentBuzzer;

impl Buzzer for SilentBuzzer {
    fn buzz(&mut self, _buzz: BuzzType) -> anyhow::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(v: &[u64]) -> Vec<Duration> {
        v.iter().map(|&m| Duration::from_millis(m)).collect()
    }

    #[test]
    fn test_patterns() {
        assert_eq!(BuzzType::Correct.pattern().len(), 6);
        assert_eq!(BuzzType::Panic.pattern(), &[0, 200]);
        assert_eq!(BuzzType::GameOver.pattern().iter().sum::<u64>(), 2000);
        assert_eq!(BuzzType::None.pattern(), &[0]);
    }

    #[test]
    fn test_pulse_offsets() {
        assert_eq!(pulse_offsets(BuzzType::Correct.pattern()), ms(&[100, 300, 500]));
        assert_eq!(pulse_offsets(BuzzType::Panic.pattern()), ms(&[0]));
        assert_eq!(pulse_offsets(BuzzType::GameOver.pattern()), ms(&[0]));
        assert!(pulse_offsets(BuzzType::None.pattern()).is_empty());
        assert_eq!(pulse_offsets(&[50, 0, 10, 20]), ms(&[60]));
    }

    #[test]
    fn test_default_is_none() {
        assert!(BuzzType::default().is_none());
        assert!(!BuzzType::Panic.is_none());
    }

    #[test]
    fn test_serializes_screaming_case() {
        let json = serde_json::to_string(&BuzzType::GameOver).unwrap();
        assert_eq!(json, "\"GAME_OVER\"");
    }

    fn bells(out: &Arc<Mutex<Vec<u8>>>) -> usize {
        out.lock().unwrap().iter().filter(|&&b| b == 0x07).count()
    }

    #[tokio::test(start_paused = true)]
    async fn test_bell_follows_correct_pattern() {
        let out = Arc::new(Mutex::new(Vec::new()));
        let mut buzzer = BellBuzzer::with_writer(out.clone());

        buzzer.buzz(BuzzType::Correct).unwrap();
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(bells(&out), 0);
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(bells(&out), 1);
        tokio::time::sleep(Duration::from_millis(400)).await;
        assert_eq!(bells(&out), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_bell_skips_no_buzz() {
        let out = Arc::new(Mutex::new(Vec::new()));
        let mut buzzer = BellBuzzer::with_writer(out.clone());

        buzzer.buzz(BuzzType::None).unwrap();
        buzzer.buzz(BuzzType::Panic).unwrap();
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert_eq!(bells(&out), 1);
    }
}
