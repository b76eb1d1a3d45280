//! Scoped reentrancy guard for pair operations
//!
//! A pair operation acquires the lock on entry and the returned [`LockGuard`]
//! releases it when dropped, so every exit path (including `?` early returns)
//! unlocks the pair.

use crate::error::{AmmError, AmmResult};
use std::cell::Cell;
use std::fmt;

#[derive(Default)]
pub struct ReentrancyLock {
    locked: Cell<bool>,
}

impl ReentrancyLock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquire the lock, failing with [`AmmError::Locked`] if already held
    pub fn enter(&self) -> AmmResult<LockGuard<'_>> {
        if self.locked.replace(true) {
            return Err(AmmError::Locked);
        }
        Ok(LockGuard { lock: self })
    }

    pub fn is_locked(&self) -> bool {
        self.locked.get()
    }
}

// A copied pair starts unlocked; the guard belongs to the original.
impl Clone for ReentrancyLock {
    fn clone(&self) -> Self {
        Self::new()
    }
}

impl fmt::Debug for ReentrancyLock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReentrancyLock")
            .field("locked", &self.locked.get())
            .finish()
    }
}

#[must_use = "the lock is released as soon as the guard is dropped"]
pub struct LockGuard<'a> {
    lock: &'a ReentrancyLock,
}

impl Drop for LockGuard<'_> {
    fn drop(&mut self) {
        self.lock.locked.set(false);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reentry_is_rejected() {
        let lock = ReentrancyLock::new();
        let guard = lock.enter().unwrap();
        assert!(lock.is_locked());
        assert_eq!(lock.enter().err(), Some(AmmError::Locked));
        drop(guard);
        assert!(!lock.is_locked());
        assert!(lock.enter().is_ok());
    }

    #[test]
    fn test_released_on_error_path() {
        fn failing(lock: &ReentrancyLock) -> AmmResult<()> {
            let _guard = lock.enter()?;
            Err(AmmError::K)
        }

        let lock = ReentrancyLock::new();
        assert_eq!(failing(&lock), Err(AmmError::K));
        assert!(!lock.is_locked());
    }
}
