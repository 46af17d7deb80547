//! Synchronized state abstraction
//!
//! The frame cache is written by the ingestion task and read by the control
//! task. [`SharedState`] hides the lock so the pipeline code is identical
//! against the runtime's [`EmbassyState`] and the tests' [`MockState`].

use core::cell::RefCell;
use embassy_sync::blocking_mutex::{raw::CriticalSectionRawMutex, Mutex};

/// Synchronized state access through closures
///
/// Closures run with the lock held and must not block or await.
///
/// # Example
///
/// ```
/// use robocars_hat::core::traits::{MockState, SharedState};
/// use robocars_hat_core::protocol::FrameCache;
///
/// let cache = MockState::new(FrameCache::new());
/// cache.with_mut(|c| c.ingest("3,1500,1500")).unwrap();
/// assert!(cache.with(|c| c.calibration()).is_some());
/// ```
pub trait SharedState<T> {
    /// Access state immutably
    fn with<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&T) -> R;

    /// Access state mutably
    fn with_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut T) -> R;
}

/// State behind an embassy-sync critical-section mutex
///
/// With the `std` critical-section implementation this is a process-wide
/// lock, so the state can be shared between tokio worker threads through
/// an `Arc`. Critical sections are short: one cache write or snapshot.
pub struct EmbassyState<T> {
    inner: Mutex<CriticalSectionRawMutex, RefCell<T>>,
}

impl<T> EmbassyState<T> {
    /// Const so the state can also live in a `static`
    pub const fn new(value: T) -> Self {
        Self {
            inner: Mutex::new(RefCell::new(value)),
        }
    }
}

impl<T> SharedState<T> for EmbassyState<T> {
    fn with<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&T) -> R,
    {
        self.inner.lock(|cell| f(&cell.borrow()))
    }

    fn with_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut T) -> R,
    {
        self.inner.lock(|cell| f(&mut cell.borrow_mut()))
    }
}

/// Single-threaded state using `RefCell`, for tests
///
/// # Panics
///
/// Panics if a closure re-enters the same state mutably.
pub struct MockState<T> {
    inner: RefCell<T>,
}

impl<T> MockState<T> {
    pub fn new(value: T) -> Self {
        Self {
            inner: RefCell::new(value),
        }
    }
}

impl<T> SharedState<T> for MockState<T> {
    fn with<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&T) -> R,
    {
        f(&self.inner.borrow())
    }

    fn with_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut T) -> R,
    {
        f(&mut self.inner.borrow_mut())
    }
}
