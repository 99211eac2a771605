//! Scoped suspension of the page's scroll affordance.

use std::{
    any::type_name_of_val,
    fmt,
    sync::{
        Arc,
        atomic::{AtomicBool, AtomicUsize, Ordering},
    },
};

use folio_contracts::scroll::ScrollAffordance;
use tracing::debug;

/// Reference-counted lock over a [`ScrollAffordance`].
///
/// The first [`ScrollGuard`] suspends scrolling, dropping the last one
/// restores it.
#[derive(Clone)]
pub struct ScrollLock {
    affordance: Arc<dyn ScrollAffordance>,
    holders: Arc<AtomicUsize>,
}

impl fmt::Debug for ScrollLock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScrollLock")
            .field("affordance", &type_name_of_val(self.affordance.as_ref()))
            .field("holders", &self.holders.load(Ordering::SeqCst))
            .finish()
    }
}

impl ScrollLock {
    /// Lock over `affordance`, initially released.
    pub fn new(affordance: Arc<dyn ScrollAffordance>) -> Self {
        Self {
            affordance,
            holders: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Suspend scrolling until the returned guard is dropped.
    #[must_use = "scrolling is restored as soon as the guard is dropped"]
    pub fn acquire(&self) -> ScrollGuard {
        if self.holders.fetch_add(1, Ordering::SeqCst) == 0 {
            debug!("suspending page scroll");
            self.affordance.suspend();
        }
        ScrollGuard { lock: self.clone() }
    }

    /// Whether any guard is alive.
    pub fn is_locked(&self) -> bool {
        self.holders.load(Ordering::SeqCst) > 0
    }
}

/// Keeps page scrolling suspended while alive.
#[derive(Debug)]
pub struct ScrollGuard {
    lock: ScrollLock,
}

impl Drop for ScrollGuard {
    fn drop(&mut self) {
        if self.lock.holders.fetch_sub(1, Ordering::SeqCst) == 1 {
            debug!("restoring page scroll");
            self.lock.affordance.restore();
        }
    }
}

/// In-process scroll affordance: a flag hosts can read back when rendering.
#[derive(Debug, Default)]
pub struct PageScroll {
    suspended: AtomicBool,
}

impl PageScroll {
    /// Affordance with scrolling enabled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether scrolling is currently suspended.
    pub fn is_suspended(&self) -> bool {
        self.suspended.load(Ordering::SeqCst)
    }
}

impl ScrollAffordance for PageScroll {
    fn suspend(&self) {
        self.suspended.store(true, Ordering::SeqCst);
    }

    fn restore(&self) {
        self.suspended.store(false, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nested_guards_restore_once_the_last_one_drops() {
        let page = Arc::new(PageScroll::new());
        let lock = ScrollLock::new(page.clone());

        let outer = lock.acquire();
        let inner = lock.acquire();
        assert!(page.is_suspended());

        drop(outer);
        assert!(page.is_suspended());
        assert!(lock.is_locked());

        drop(inner);
        assert!(!page.is_suspended());
        assert!(!lock.is_locked());
    }
}
