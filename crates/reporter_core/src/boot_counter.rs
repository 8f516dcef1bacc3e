use log::info;

/// Memory that keeps its contents across deep sleep but not across power loss.
///
/// On ESP-IDF (`.rtc.data`) any reset other than a deep-sleep wake-up also
/// reinitialises it.
pub trait RetainedStore {
    fn load(&self) -> u32;
    fn store(&mut self, value: u32);
}

/// Number of boots since the last cold start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BootCounter {
    count: u32,
}

impl BootCounter {
    /// Loads the retained value, increments it and writes it back.
    ///
    /// Call exactly once per boot, before any other task is started.
    pub fn record_boot<S: RetainedStore>(store: &mut S) -> Self {
        let count = store.load().wrapping_add(1);
        store.store(count);
        info!("Boot count: {}", count);
        Self { count }
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    /// True on the first boot after power was applied.
    pub fn is_first_boot(&self) -> bool {
        self.count == 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Cell(u32);

    impl RetainedStore for Cell {
        fn load(&self) -> u32 {
            self.0
        }

        fn store(&mut self, value: u32) {
            self.0 = value;
        }
    }

    #[test]
    fn first_boot_counts_one() {
        let mut store = Cell(0);
        let counter = BootCounter::record_boot(&mut store);
        assert_eq!(counter.count(), 1);
        assert!(counter.is_first_boot());
        assert_eq!(store.0, 1);
    }

    #[test]
    fn continues_from_retained_value() {
        let mut store = Cell(41);
        let counter = BootCounter::record_boot(&mut store);
        assert_eq!(counter.count(), 42);
        assert!(!counter.is_first_boot());
    }
}
