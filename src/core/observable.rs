/// Push-based observable field backed by a `watch` channel.
///
/// Every `set` notifies subscribers, even when the new value equals the old
/// one, so one-shot signals (a second CORRECT buzz in a row) are not lost.
use tokio::sync::watch;

#[derive(Debug)]
pub struct Observable<T> {
    tx: watch::Sender<T>,
}

impl<T: Clone> Observable<T> {
    pub fn new(initial: T) -> Self {
        Self { tx: watch::Sender::new(initial) }
    }

    /// Current value.
    pub fn get(&self) -> T {
        self.tx.borrow().clone()
    }

    pub fn set(&self, value: T) {
        self.tx.send_replace(value);
    }

    /// Apply `f` to the current value in place and notify.
    pub fn update(&self, f: impl FnOnce(&mut T)) {
        self.tx.send_modify(f);
    }

    /// A receiver that sees the current value as already observed.
    pub fn subscribe(&self) -> watch::Receiver<T> {
        self.tx.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_notifies_even_when_unchanged() {
        let field = Observable::new(1);
        let mut rx = field.subscribe();
        assert!(!rx.has_changed().unwrap());

        field.set(1);
        assert!(rx.has_changed().unwrap());
        assert_eq!(*rx.borrow_and_update(), 1);
        assert!(!rx.has_changed().unwrap());
    }

    #[test]
    fn test_update_in_place() {
        let field = Observable::new(10i64);
        field.update(|v| *v -= 3);
        assert_eq!(field.get(), 7);
    }

    #[test]
    fn test_set_without_subscribers() {
        let field = Observable::new(String::from("cat"));
        field.set("zebra".into());
        assert_eq!(field.get(), "zebra");
    }
}
