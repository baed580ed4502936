//! Acquisition-timeout normalization
//!
//! Callers express how long an acquisition may wait as a signed duration;
//! this module validates it and derives the store-command timeout budget
//! from it. Validation happens before any store access.

use std::time::Duration;

use chrono::TimeDelta;

use crate::error::LockError;

/// Sentinel meaning "no timeout" (wait indefinitely).
pub const INFINITE_TIMEOUT_MILLIS: i64 = -1;

/// Seconds added on top of the acquisition wait when deriving the command
/// timeout, so the command itself is never the bottleneck.
const COMMAND_TIMEOUT_BUFFER_SECS: u64 = 30;

/// Convert a caller-supplied duration to a whole-millisecond timeout.
///
/// The valid domain is `[-1, i32::MAX]` milliseconds, `-1` meaning
/// infinite. Anything else is a contract violation.
pub fn to_i32_timeout(timeout: TimeDelta) -> Result<i32, LockError> {
    let total_millis = timeout.num_milliseconds();
    if total_millis < INFINITE_TIMEOUT_MILLIS || total_millis > i32::MAX as i64 {
        return Err(LockError::TimeoutOutOfRange(total_millis));
    }
    Ok(total_millis as i32)
}

/// Store-command timeout budget derived from an acquisition timeout.
///
/// A finite acquisition wait of N ms maps to a command budget of
/// `N/1000 + 30` seconds; the infinite sentinel maps to no bound at all.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CommandTimeout(Option<Duration>);

impl CommandTimeout {
    /// Unbounded command execution.
    pub const INFINITE: CommandTimeout = CommandTimeout(None);

    /// Validate an acquisition timeout and derive the command budget.
    pub fn from_acquire_timeout(timeout: TimeDelta) -> Result<Self, LockError> {
        Ok(Self::from_millis(to_i32_timeout(timeout)?))
    }

    /// Derive the command budget from an already-validated millisecond
    /// timeout (`-1` = infinite).
    pub fn from_millis(timeout_millis: i32) -> Self {
        if timeout_millis >= 0 {
            CommandTimeout(Some(Duration::from_secs(
                timeout_millis as u64 / 1000 + COMMAND_TIMEOUT_BUFFER_SECS,
            )))
        } else {
            CommandTimeout(None)
        }
    }

    /// The bound to apply to a single store command, or `None` when the
    /// command may run unbounded.
    pub fn budget(self) -> Option<Duration> {
        self.0
    }
}
