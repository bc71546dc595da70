//! Reload scheduling with debouncing.
//!
//! Change notifications for an open document tend to arrive in bursts (an
//! editor writing a file often produces several events). The scheduler turns
//! them into as few reloads as possible.

use std::time::Duration;
use web_time::Instant;

/// Decides when a changed document should be reloaded.
///
/// Two rules keep reloads cheap:
/// 1. **Debounce delay**: after a change, wait this long before reloading so
///    that a burst of changes results in one reload.
/// 2. **Single flight**: at most one reload runs at a time. A change seen
///    while a reload is running schedules exactly one more reload after it.
#[derive(Debug)]
pub struct ReloadScheduler {
    /// Debounce delay (wait this long after last change before reloading).
    debounce_delay: Duration,

    /// Time of the last change notification.
    last_change: Option<Instant>,

    /// A reload is due once the debounce delay has passed.
    pending: bool,

    /// A reload is currently running.
    in_flight: bool,

    /// A change arrived while the reload was running.
    follow_up: bool,

    /// Whether reloading is enabled.
    enabled: bool,
}

impl ReloadScheduler {
    /// Default debounce delay.
    pub const DEFAULT_DEBOUNCE_DELAY: Duration =
        Duration::from_millis(crate::constants::DEFAULT_RELOAD_DEBOUNCE_MS);

    /// Create a new scheduler with default settings.
    pub fn new() -> Self {
        Self {
            debounce_delay: Self::DEFAULT_DEBOUNCE_DELAY,
            last_change: None,
            pending: false,
            in_flight: false,
            follow_up: false,
            enabled: true,
        }
    }

    /// Create a disabled scheduler.
    pub fn disabled() -> Self {
        let mut scheduler = Self::new();
        scheduler.enabled = false;
        scheduler
    }

    /// Set the debounce delay.
    pub fn with_debounce_delay(mut self, delay: Duration) -> Self {
        self.debounce_delay = delay;
        self
    }

    /// Record a change notification.
    pub fn mark_changed(&mut self) {
        self.last_change = Some(Instant::now());
        if self.in_flight {
            self.follow_up = true;
            log::trace!("Reload: change during reload, follow-up scheduled");
        } else {
            self.pending = true;
            log::trace!("Reload: marked pending");
        }
    }

    /// Whether a reload is waiting (debounced or not).
    pub fn is_pending(&self) -> bool {
        self.pending || self.follow_up
    }

    /// Whether a reload is running.
    pub fn is_in_flight(&self) -> bool {
        self.in_flight
    }

    /// Check if a reload should start now.
    ///
    /// Returns true if:
    /// - Reloading is enabled
    /// - A reload is pending and none is running
    /// - The debounce delay has passed since the last change
    pub fn should_reload(&self) -> bool {
        if !self.enabled || !self.pending || self.in_flight {
            return false;
        }

        let Some(last_change) = self.last_change else {
            return false;
        };

        last_change.elapsed() >= self.debounce_delay
    }

    /// Start a reload if one is due. Returns whether the caller should reload.
    pub fn begin_reload(&mut self) -> bool {
        if !self.should_reload() {
            return false;
        }
        self.pending = false;
        self.in_flight = true;
        log::trace!("Reload: started");
        true
    }

    /// Mark the running reload as finished.
    ///
    /// A failed reload is not retried; only a change that arrived while it
    /// was running schedules another one.
    pub fn finish_reload(&mut self, succeeded: bool) {
        self.in_flight = false;
        if self.follow_up {
            self.follow_up = false;
            self.pending = true;
        }
        log::trace!("Reload: finished (succeeded = {})", succeeded);
    }

    /// Set whether reloading is enabled.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        log::debug!("Reload: enabled = {}", enabled);
    }

    /// Check if reloading is enabled.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Get time since last change (if any).
    pub fn time_since_last_change(&self) -> Option<Duration> {
        self.last_change.map(|t| t.elapsed())
    }

    /// Reset all state, e.g. when a different document is opened.
    pub fn reset(&mut self) {
        self.last_change = None;
        self.pending = false;
        self.in_flight = false;
        self.follow_up = false;
    }
}

impl Default for ReloadScheduler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn immediate() -> ReloadScheduler {
        ReloadScheduler::new().with_debounce_delay(Duration::ZERO)
    }

    #[test]
    fn test_initial_state() {
        let scheduler = ReloadScheduler::new();
        assert!(!scheduler.is_pending());
        assert!(!scheduler.should_reload());
        assert!(scheduler.is_enabled());
    }

    #[test]
    fn test_debounce_prevents_immediate_reload() {
        let mut scheduler = ReloadScheduler::new().with_debounce_delay(Duration::from_secs(10));
        scheduler.mark_changed();

        assert!(scheduler.is_pending());
        assert!(!scheduler.should_reload());
        assert!(!scheduler.begin_reload());
    }

    #[test]
    fn test_burst_coalesces_into_one_reload() {
        let mut scheduler = immediate();
        for _ in 0..5 {
            scheduler.mark_changed();
        }

        assert!(scheduler.begin_reload());
        scheduler.finish_reload(true);
        assert!(!scheduler.is_pending());
        assert!(!scheduler.begin_reload());
    }

    #[test]
    fn test_single_flight_with_follow_up() {
        let mut scheduler = immediate();
        scheduler.mark_changed();
        assert!(scheduler.begin_reload());

        // Changes while running do not start a second reload
        scheduler.mark_changed();
        scheduler.mark_changed();
        assert!(scheduler.is_in_flight());
        assert!(!scheduler.begin_reload());

        scheduler.finish_reload(true);
        assert!(scheduler.begin_reload());
        scheduler.finish_reload(true);
        assert!(!scheduler.begin_reload());
    }

    #[test]
    fn test_failed_reload_is_not_retried() {
        let mut scheduler = immediate();
        scheduler.mark_changed();
        assert!(scheduler.begin_reload());
        scheduler.finish_reload(false);

        assert!(!scheduler.is_pending());
        assert!(!scheduler.begin_reload());
    }

    #[test]
    fn test_disabled() {
        let mut scheduler = ReloadScheduler::disabled().with_debounce_delay(Duration::ZERO);
        scheduler.mark_changed();
        assert!(!scheduler.should_reload());

        scheduler.set_enabled(true);
        assert!(scheduler.should_reload());
    }
}
