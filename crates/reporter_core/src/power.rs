use log::info;
use std::fmt::Debug;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DeepSleepError {
    #[error("Invalid sleep duration: {0}")]
    InvalidDuration(String),
}

/// Platform-agnostic deep-sleep abstraction.
pub trait DeepSleepPlatform {
    /// Enter deep sleep for the specified duration in microseconds.
    ///
    /// On hardware this does not return; the chip resets on wake-up.
    fn deep_sleep(&self, duration_us: u64);
}

/// Timed deep sleep with a fixed, pre-validated duration.
pub struct DeepSleep<P: DeepSleepPlatform> {
    platform: P,
    duration_us: u64,
}

impl<P: DeepSleepPlatform> DeepSleep<P> {
    /// Creates a sleeper for a fixed duration.
    ///
    /// # Arguments
    ///
    /// * `platform` - backend that enters deep sleep
    /// * `duration_seconds` - sleep time in seconds
    ///
    /// # Errors
    ///
    /// `InvalidDuration` when the duration is 0 or does not fit in
    /// microseconds as a `u64`.
    pub fn new(platform: P, duration_seconds: u64) -> Result<Self, DeepSleepError> {
        if duration_seconds == 0 {
            return Err(DeepSleepError::InvalidDuration(
                "Sleep duration must be greater than 0".to_string(),
            ));
        }

        let duration_us = duration_seconds
            .checked_mul(1_000_000)
            .ok_or_else(|| DeepSleepError::InvalidDuration("Duration overflow".to_string()))?;

        Ok(Self {
            platform,
            duration_us,
        })
    }

    pub fn duration_us(&self) -> u64 {
        self.duration_us
    }

    pub fn enter(&self) {
        info!(
            "Entering deep sleep for {} seconds ({} microseconds)",
            self.duration_us / 1_000_000,
            self.duration_us
        );
        self.platform.deep_sleep(self.duration_us);
    }
}

/// "Cycle active" output: on while a cycle runs, off before sleep.
pub trait StatusIndicator {
    type Error: Debug;

    fn turn_on(&mut self) -> Result<(), Self::Error>;
    fn turn_off(&mut self) -> Result<(), Self::Error>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[derive(Default)]
    struct RecordingPlatform {
        calls: RefCell<Vec<u64>>,
    }

    impl DeepSleepPlatform for &RecordingPlatform {
        fn deep_sleep(&self, duration_us: u64) {
            self.calls.borrow_mut().push(duration_us);
        }
    }

    #[test]
    fn converts_seconds_to_microseconds() {
        let platform = RecordingPlatform::default();
        let sleep = DeepSleep::new(&platform, 10).unwrap();
        assert_eq!(sleep.duration_us(), 10_000_000);

        sleep.enter();
        assert_eq!(*platform.calls.borrow(), vec![10_000_000]);
    }

    #[test]
    fn rejects_zero_duration() {
        let platform = RecordingPlatform::default();
        assert!(matches!(
            DeepSleep::new(&platform, 0),
            Err(DeepSleepError::InvalidDuration(_))
        ));
    }

    #[test]
    fn rejects_overflowing_duration() {
        let platform = RecordingPlatform::default();
        assert!(DeepSleep::new(&platform, u64::MAX).is_err());
    }
}
