use rand::{rngs::StdRng, seq::SliceRandom};
use std::collections::VecDeque;

/// The fixed set every queue is shuffled from
pub const WORDS: [&str; 21] = [
    "queen",
    "hospital",
    "basketball",
    "cat",
    "change",
    "snail",
    "soup",
    "calendar",
    "sad",
    "desk",
    "guitar",
    "home",
    "railway",
    "zebra",
    "jelly",
    "car",
    "crow",
    "trade",
    "bag",
    "roll",
    "bubble",
];

/// Shuffled words, consumed from the front and reshuffled once exhausted
#[derive(Debug)]
pub struct WordQueue {
    words: VecDeque<String>,
    rng: StdRng,
}

impl WordQueue {
    pub fn new(rng: StdRng) -> Self {
        let mut queue = Self { words: VecDeque::with_capacity(WORDS.len()), rng };
        queue.refill();
        queue
    }

    /// Replace the contents with a fresh shuffle of the full set
    pub fn refill(&mut self) {
        let mut words: Vec<String> = WORDS.iter().map(|w| w.to_string()).collect();
        words.shuffle(&mut self.rng);
        self.words = words.into();
    }

    /// Take the next word, reshuffling first if nothing is left
    pub fn next_word(&mut self) -> String {
        if self.words.is_empty() {
            self.refill();
        }
        // refill always leaves WORDS.len() entries
        self.words.pop_front().unwrap_or_default()
    }

    pub fn remaining(&self) -> usize {
        self.words.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use std::collections::HashSet;

    fn queue(seed: u64) -> WordQueue {
        WordQueue::new(StdRng::seed_from_u64(seed))
    }

    #[test]
    fn test_word_set_is_unique() {
        let unique: HashSet<_> = WORDS.iter().collect();
        assert_eq!(unique.len(), 21);
    }

    #[test]
    fn test_no_repeat_before_exhausting_set() {
        let mut queue = queue(7);
        for _ in 0..3 {
            let pass: HashSet<String> = (0..WORDS.len()).map(|_| queue.next_word()).collect();
            assert_eq!(pass.len(), WORDS.len());
        }
    }

    #[test]
    fn test_refills_when_empty() {
        let mut queue = queue(1);
        for _ in 0..WORDS.len() {
            queue.next_word();
        }
        assert_eq!(queue.remaining(), 0);

        let word = queue.next_word();
        assert!(WORDS.contains(&word.as_str()));
        assert_eq!(queue.remaining(), WORDS.len() - 1);
    }

    #[test]
    fn test_same_seed_same_order() {
        let mut a = queue(42);
        let mut b = queue(42);
        for _ in 0..30 {
            assert_eq!(a.next_word(), b.next_word());
        }
    }
}
