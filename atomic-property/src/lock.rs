use async_lock::Mutex;
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};

/// No thread holds the lock through [`Lock::with_lock`].
const NO_OWNER: usize = 0;

/// Address of a thread-local, unique among live threads and never zero.
fn current_thread_token() -> usize {
    thread_local! {
        static TOKEN: u8 = const { 0 };
    }
    TOKEN.with(|token| token as *const u8 as usize)
}

/// Clears the recorded owner when a checked critical section ends, even by
/// unwinding.
struct OwnerReset<'a>(&'a AtomicUsize);

impl Drop for OwnerReset<'_> {
    fn drop(&mut self) {
        self.0.store(NO_OWNER, Ordering::Release);
    }
}

/// Mutual-exclusion storage for one `#[atomic]` property.
///
/// Every generated accessor goes through one of two acquisition variants:
///
/// - [`with_lock`](Self::with_lock) (checked) records the owning thread and
///   panics on reentrant acquisition instead of deadlocking.
/// - [`with_lock_unchecked`](Self::with_lock_unchecked) skips that
///   bookkeeping. The caller guarantees the closure never locks the same
///   property again.
///
/// Acquisition blocks the calling thread.
pub struct Lock<T> {
    mutex: Mutex<T>,
    owner: AtomicUsize,
}

impl<T: Send> Lock<T> {
    /// Checked construction: the protected value must be `Send`.
    pub fn new(initial_state: T) -> Self {
        Self::new_unchecked(initial_state)
    }
}

impl<T> Lock<T> {
    /// Unchecked construction: no `Send` requirement on `T`.
    ///
    /// The lock is still only `Sync` when `T: Send`.
    pub fn new_unchecked(initial_state: T) -> Self {
        Self {
            mutex: Mutex::new(initial_state),
            owner: AtomicUsize::new(NO_OWNER),
        }
    }

    /// Run `body` with exclusive access to the value.
    ///
    /// # Panics
    ///
    /// Panics if the current thread already holds this lock through
    /// `with_lock`.
    pub fn with_lock<R>(&self, body: impl FnOnce(&mut T) -> R) -> R {
        let me = current_thread_token();
        if self.owner.load(Ordering::Acquire) == me {
            panic!("reentrant acquisition of an atomic property lock on the same thread");
        }

        let mut guard = self.mutex.lock_blocking();
        self.owner.store(me, Ordering::Release);
        let _reset = OwnerReset(&self.owner);
        body(&mut guard)
    }

    /// Run `body` with exclusive access to the value, without reentrancy
    /// checks. Reentrant use deadlocks.
    pub fn with_lock_unchecked<R>(&self, body: impl FnOnce(&mut T) -> R) -> R {
        let mut guard = self.mutex.lock_blocking();
        body(&mut guard)
    }

    /// Run `body` only if the lock is free right now.
    pub fn try_with_lock<R>(&self, body: impl FnOnce(&mut T) -> R) -> Option<R> {
        let mut guard = self.mutex.try_lock()?;
        Some(body(&mut guard))
    }

    /// Mutable access without locking. Requires `&mut self`, guaranteeing
    /// exclusive access.
    pub fn get_mut(&mut self) -> &mut T {
        self.mutex.get_mut()
    }

    pub fn into_inner(self) -> T {
        self.mutex.into_inner()
    }
}

impl<T: fmt::Debug> fmt::Debug for Lock<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct("Lock");
        match self.mutex.try_lock() {
            Some(guard) => s.field("value", &*guard),
            None => s.field("value", &format_args!("<locked>")),
        };
        s.finish()
    }
}

impl<T: Default + Send> Default for Lock<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn owner_is_cleared_after_checked_section() {
        let lock = Lock::new(1);
        lock.with_lock(|value| *value += 1);
        assert_eq!(lock.owner.load(Ordering::Acquire), NO_OWNER);
        assert_eq!(lock.with_lock(|value| *value), 2);
    }

    #[test]
    fn thread_tokens_differ() {
        let here = current_thread_token();
        let there = std::thread::spawn(current_thread_token).join().unwrap();
        assert_ne!(here, NO_OWNER);
        assert_ne!(here, there);
    }
}
