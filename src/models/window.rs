//! # Execution Window
//!
//! The half-open interval `[start, end)` of newly arrived data selected for one
//! execution, and the pure calculator that derives it from the prior
//! checkpoint.

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

/// Start of a window for a dataset that has never completed a cycle
pub const fn beginning_of_time() -> DateTime<Utc> {
    DateTime::<Utc>::UNIX_EPOCH
}

/// Reasons a window cannot be formed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WindowError {
    /// Checkpoint lies after the execution start (clock skew or corruption)
    #[error("window start {start} is after window end {end}")]
    Inverted {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },

    /// Stored checkpoint value is not a timestamp
    #[error("checkpoint value '{value}' is not a valid timestamp: {reason}")]
    UnparseableCheckpoint { value: String, reason: String },
}

/// Immutable `[start, end)` interval; `start <= end` always holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct ExecutionWindow {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl ExecutionWindow {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self, WindowError> {
        if start > end {
            return Err(WindowError::Inverted { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    /// Whether `instant` falls inside `[start, end)`
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.start <= instant && instant < self.end
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn length(&self) -> chrono::Duration {
        self.end - self.start
    }

    /// Whether this window starts at the beginning-of-time sentinel
    pub fn is_initial(&self) -> bool {
        self.start == beginning_of_time()
    }
}

/// Derives execution windows
#[derive(Debug, Clone, Copy, Default)]
pub struct WindowCalculator;

impl WindowCalculator {
    /// `start` is the checkpoint (or [`beginning_of_time`]), `end` is `now`.
    ///
    /// An inverted window is an error and is never clamped.
    pub fn compute(
        checkpoint: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
    ) -> Result<ExecutionWindow, WindowError> {
        let start = checkpoint.unwrap_or_else(beginning_of_time);
        ExecutionWindow::new(start, now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 30, hour, 0, 0).unwrap()
    }

    #[test]
    fn test_window_from_checkpoint() {
        let window = WindowCalculator::compute(Some(at(1)), at(2)).unwrap();
        assert_eq!(window.start(), at(1));
        assert_eq!(window.end(), at(2));
        assert!(!window.is_initial());
        assert_eq!(window.length(), chrono::Duration::hours(1));
    }

    #[test]
    fn test_first_run_starts_at_epoch() {
        let window = WindowCalculator::compute(None, at(2)).unwrap();
        assert_eq!(window.start(), beginning_of_time());
        assert_eq!(window.start().timestamp(), 0);
        assert!(window.is_initial());
    }

    #[test]
    fn test_inverted_window_rejected() {
        let error = WindowCalculator::compute(Some(at(3)), at(2)).unwrap_err();
        assert_eq!(
            error,
            WindowError::Inverted {
                start: at(3),
                end: at(2)
            }
        );
    }

    #[test]
    fn test_equal_bounds_form_empty_window() {
        let window = WindowCalculator::compute(Some(at(2)), at(2)).unwrap();
        assert!(window.is_empty());
        assert!(!window.contains(at(2)));
    }

    #[test]
    fn test_window_is_half_open() {
        let window = ExecutionWindow::new(at(1), at(2)).unwrap();
        assert!(window.contains(at(1)));
        assert!(!window.contains(at(2)));
    }
}
