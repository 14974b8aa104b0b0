use std::fmt;
use std::sync::{Mutex, OnceLock, PoisonError};

use tracing::debug;

use crate::error::{LazyError, LazyResult};

/// A thread-safe, single-assignment memoization cell.
///
/// The initializer runs on the first call to [`get`](Self::get) and its value
/// is kept for the lifetime of the cell. Concurrent first callers serialize on
/// a mutex owned by this cell only; once populated, reads never lock.
///
/// A failed initializer leaves the cell empty, so a later `get()` tries again.
///
/// ```
/// use quorum_lazy::{LazyCell, LazyResult};
///
/// fn load() -> LazyResult<u32> {
///     Ok(42)
/// }
///
/// static ANSWER: LazyCell<u32, fn() -> LazyResult<u32>> = LazyCell::new(load);
///
/// assert_eq!(*ANSWER.get().unwrap(), 42);
/// ```
pub struct LazyCell<T, F> {
    value: OnceLock<T>,
    /// Guards the check-and-populate window only.
    populate: Mutex<()>,
    initializer: F,
}

impl<T, F> LazyCell<T, F> {
    /// Create an empty cell around `initializer`.
    pub const fn new(initializer: F) -> Self {
        Self {
            value: OnceLock::new(),
            populate: Mutex::new(()),
            initializer,
        }
    }

    /// The memoized value, if the initializer has already succeeded.
    pub fn get_if_initialized(&self) -> Option<&T> {
        self.value.get()
    }

    /// Returns `true` once a value has been stored.
    pub fn is_initialized(&self) -> bool {
        self.value.get().is_some()
    }
}

impl<T, F> LazyCell<T, F>
where
    F: Fn() -> LazyResult<T>,
{
    /// Return the memoized value, running the initializer if no value is
    /// stored yet.
    ///
    /// Every successful call observes the same value; the returned references
    /// are pointer-equal across threads.
    pub fn get(&self) -> LazyResult<&T> {
        if let Some(value) = self.value.get() {
            return Ok(value);
        }

        // A panicking initializer poisons the mutex; the guarded state is `()`
        // and the cell is still empty, so the next caller simply retries.
        let _guard = self
            .populate
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        if let Some(value) = self.value.get() {
            return Ok(value);
        }

        match (self.initializer)() {
            Ok(value) => {
                debug!(type_name = std::any::type_name::<T>(), "lazy cell populated");
                Ok(self.value.get_or_init(|| value))
            }
            Err(err) => {
                debug!(
                    type_name = std::any::type_name::<T>(),
                    error = %err,
                    "lazy initializer failed; cell remains empty"
                );
                Err(err)
            }
        }
    }
}

impl<T: fmt::Debug, F> fmt::Debug for LazyCell<T, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LazyCell")
            .field("value", &self.value.get())
            .finish_non_exhaustive()
    }
}

/// Memoize an infallible initializer.
///
/// The returned cell's `get()` only fails if `initializer` panics.
pub fn memoize<T, G>(initializer: G) -> LazyCell<T, impl Fn() -> LazyResult<T>>
where
    G: Fn() -> T,
{
    LazyCell::new(move || Ok(initializer()))
}

/// Memoize an initializer that may produce no value.
///
/// `None` is treated as an invalid result: `get()` returns
/// [`LazyError::Absent`] and the cell stays empty.
pub fn memoize_optional<T, G>(initializer: G) -> LazyCell<T, impl Fn() -> LazyResult<T>>
where
    G: Fn() -> Option<T>,
{
    LazyCell::new(move || initializer().ok_or(LazyError::Absent))
}
