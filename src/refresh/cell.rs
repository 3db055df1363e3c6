//! View state shared with background tasks

use parking_lot::RwLock;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

struct Shared<T> {
    state: RwLock<T>,
    alive: AtomicBool,
}

/// Clonable handle to a view's state
///
/// After [`ViewCell::close`] every [`ViewCell::update`] is a no-op, so a
/// response arriving after teardown cannot touch a discarded view.
pub struct ViewCell<T> {
    shared: Arc<Shared<T>>,
}

impl<T> Clone for ViewCell<T> {
    fn clone(&self) -> Self {
        Self {
            shared: self.shared.clone(),
        }
    }
}

impl<T> ViewCell<T> {
    pub fn new(state: T) -> Self {
        Self {
            shared: Arc::new(Shared {
                state: RwLock::new(state),
                alive: AtomicBool::new(true),
            }),
        }
    }

    /// Apply `f` to the state; returns false (and skips `f`) once closed
    pub fn update<F>(&self, f: F) -> bool
    where
        F: FnOnce(&mut T),
    {
        let mut state = self.shared.state.write();
        if !self.is_alive() {
            return false;
        }
        f(&mut state);
        true
    }

    pub fn read<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        let state = self.shared.state.read();
        f(&*state)
    }

    pub fn is_alive(&self) -> bool {
        self.shared.alive.load(Ordering::SeqCst)
    }

    /// Mark the owning view as torn down
    pub fn close(&self) {
        // Taking the write lock waits out any update in progress
        let _guard = self.shared.state.write();
        self.shared.alive.store(false, Ordering::SeqCst);
    }
}

impl<T: Clone> ViewCell<T> {
    pub fn snapshot(&self) -> T {
        self.shared.state.read().clone()
    }
}
