use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};

/// Whether the station currently holds an IP address.
///
/// Written by the network event callback, awaited by the reporting task.
/// This is the only primitive shared between the two contexts.
#[derive(Debug, Default)]
pub struct ReadinessFlag {
    ready: Mutex<bool>,
    changed: Condvar,
}

impl ReadinessFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self) {
        *self.lock() = true;
        self.changed.notify_all();
    }

    pub fn clear(&self) {
        *self.lock() = false;
    }

    pub fn is_set(&self) -> bool {
        *self.lock()
    }

    /// Blocks the caller until the flag is set. There is no timeout.
    pub fn wait(&self) {
        let mut ready = self.lock();
        while !*ready {
            ready = self
                .changed
                .wait(ready)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }

    fn lock(&self) -> MutexGuard<'_, bool> {
        self.ready.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
