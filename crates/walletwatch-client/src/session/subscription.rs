/*
[INPUT]:  Disposer closures from listener registries
[OUTPUT]: Idempotent unsubscribe handle
[POS]:    Session layer - shared subscription lifetime type
[UPDATE]: When changing unsubscribe semantics
*/

use std::fmt;
use std::sync::{Mutex, PoisonError};

type Disposer = Box<dyn FnOnce() + Send>;

/// Handle returned by `subscribe`/`on_change` style registrations.
///
/// `unsubscribe` may be called any number of times, including from inside a
/// listener. Dropping the handle unsubscribes as well.
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    disposer: Mutex<Option<Disposer>>,
}

impl Subscription {
    pub fn new(disposer: impl FnOnce() + Send + 'static) -> Self {
        Self {
            disposer: Mutex::new(Some(Box::new(disposer))),
        }
    }

    /// A handle that owns nothing.
    pub fn empty() -> Self {
        Self {
            disposer: Mutex::new(None),
        }
    }

    pub fn unsubscribe(&self) {
        let disposer = self
            .disposer
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(disposer) = disposer {
            disposer();
        }
    }

    pub fn is_active(&self) -> bool {
        self.disposer
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.unsubscribe();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.is_active())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_unsubscribe_runs_once() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let subscription = Subscription::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        assert!(subscription.is_active());
        subscription.unsubscribe();
        subscription.unsubscribe();
        drop(subscription);

        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_drop_unsubscribes() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        drop(Subscription::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        }));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(!Subscription::empty().is_active());
    }
}
