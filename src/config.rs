//! # Call options.
//!
//! Provides [`Options`], the resolved, immutable settings for one
//! [`capture`](crate::capture) call, and [`RawOptions`], the loosely typed
//! form read from configuration documents.
//!
//! Options are shared read-only across all retry attempts of a call.
//!
//! ## Sentinel values
//! - `timeout = 0s` → no deadline (the attempt may run forever)
//! - `retry_count = 0` → treated as `1` by [`Options::attempts`]
//!
//! ## Document keys
//! ```text
//! timeout       ms   (deprecated alias: exec_timeout)
//! retry_count   int  >= 1
//! backoff       ms
//! ok_tuple      bool
//! stacktrace    bool
//! skip_log      bool
//! crush_report  bool (alias: propagate_crash)
//! ```

use std::time::Duration;

use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

use crate::error::ConfigError;

/// Default per-attempt deadline.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Default wait between attempts.
pub const DEFAULT_BACKOFF: Duration = Duration::from_millis(100);

/// Resolved options for one call.
///
/// ## Field semantics
/// - `timeout`: per-attempt deadline (`0s` = none)
/// - `retry_count`: total number of attempts (`1` = no retry)
/// - `backoff`: fixed wait between attempts, never after the last one
/// - `ok_tuple`: require the success marker (`["ok", v]` or `{"ok": true, "value": v}`)
/// - `stacktrace`: capture and return the stack trace of raises
/// - `skip_log`: do not report terminal failures to the logger
/// - `propagate_crash`: also forward panics to the host panic hook
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Options {
    /// Per-attempt deadline.
    pub timeout: Duration,
    /// Total number of attempts.
    pub retry_count: u32,
    /// Fixed wait between attempts.
    pub backoff: Duration,
    /// Success requires the ok marker.
    pub ok_tuple: bool,
    /// Include stack traces in raised failures.
    pub stacktrace: bool,
    /// Suppress the failure log entry.
    pub skip_log: bool,
    /// Let panics reach the host panic hook as well.
    pub propagate_crash: bool,
}

impl Default for Options {
    /// Default options:
    ///
    /// - `timeout = 5s`
    /// - `retry_count = 1` (single attempt)
    /// - `backoff = 100ms`
    /// - every flag off
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            retry_count: 1,
            backoff: DEFAULT_BACKOFF,
            ok_tuple: false,
            stacktrace: false,
            skip_log: false,
            propagate_crash: false,
        }
    }
}

impl Options {
    /// Returns the per-attempt deadline as an `Option`.
    ///
    /// - `None` → no deadline
    /// - `Some(d)` → deadline applied per attempt
    #[inline]
    pub fn deadline(&self) -> Option<Duration> {
        if self.timeout == Duration::ZERO {
            None
        } else {
            Some(self.timeout)
        }
    }

    /// Returns the attempt budget clamped to a minimum of 1.
    #[inline]
    pub fn attempts(&self) -> u32 {
        self.retry_count.max(1)
    }

    /// Returns new options with updated timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Returns new options with updated retry count.
    pub fn with_retry_count(mut self, retry_count: u32) -> Self {
        self.retry_count = retry_count;
        self
    }

    /// Returns new options with updated backoff.
    pub fn with_backoff(mut self, backoff: Duration) -> Self {
        self.backoff = backoff;
        self
    }

    /// Returns new options with updated ok_tuple flag.
    pub fn with_ok_tuple(mut self, on: bool) -> Self {
        self.ok_tuple = on;
        self
    }

    /// Returns new options with updated stacktrace flag.
    pub fn with_stacktrace(mut self, on: bool) -> Self {
        self.stacktrace = on;
        self
    }

    /// Returns new options with updated skip_log flag.
    pub fn with_skip_log(mut self, on: bool) -> Self {
        self.skip_log = on;
        self
    }

    /// Returns new options with updated propagate_crash flag.
    pub fn with_propagate_crash(mut self, on: bool) -> Self {
        self.propagate_crash = on;
        self
    }
}

/// Options as read from a configuration document.
///
/// Durations are milliseconds. Missing keys fall back to [`Options::default`].
///
/// ## Example
/// ```rust
/// use capsule::RawOptions;
/// use serde_json::json;
/// use std::time::Duration;
///
/// let opts = RawOptions::from_value(json!({"timeout": 50, "retry_count": 3}))
///     .unwrap()
///     .resolve()
///     .unwrap();
/// assert_eq!(opts.timeout, Duration::from_millis(50));
/// assert_eq!(opts.retry_count, 3);
/// ```
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RawOptions {
    pub timeout: Option<u64>,
    /// Deprecated spelling of `timeout`.
    pub exec_timeout: Option<u64>,
    pub retry_count: Option<u32>,
    pub backoff: Option<u64>,
    pub ok_tuple: Option<bool>,
    pub stacktrace: Option<bool>,
    pub skip_log: Option<bool>,
    #[serde(alias = "propagate_crash")]
    pub crush_report: Option<bool>,
}

impl RawOptions {
    /// Parses options from a JSON value.
    pub fn from_value(value: Value) -> Result<Self, ConfigError> {
        Ok(serde_json::from_value(value)?)
    }

    /// Applies defaults and validates.
    ///
    /// `timeout` wins over the deprecated `exec_timeout` when both are set.
    pub fn resolve(&self) -> Result<Options, ConfigError> {
        let defaults = Options::default();

        let timeout = match (self.timeout, self.exec_timeout) {
            (Some(ms), Some(_)) => {
                warn!("option `exec_timeout` is deprecated and ignored because `timeout` is set");
                Duration::from_millis(ms)
            }
            (Some(ms), None) => Duration::from_millis(ms),
            (None, Some(ms)) => {
                warn!("option `exec_timeout` is deprecated, use `timeout`");
                Duration::from_millis(ms)
            }
            (None, None) => defaults.timeout,
        };

        let retry_count = match self.retry_count {
            Some(0) => return Err(ConfigError::ZeroRetryCount),
            Some(n) => n,
            None => defaults.retry_count,
        };

        Ok(Options {
            timeout,
            retry_count,
            backoff: self
                .backoff
                .map_or(defaults.backoff, Duration::from_millis),
            ok_tuple: self.ok_tuple.unwrap_or(defaults.ok_tuple),
            stacktrace: self.stacktrace.unwrap_or(defaults.stacktrace),
            skip_log: self.skip_log.unwrap_or(defaults.skip_log),
            propagate_crash: self.crush_report.unwrap_or(defaults.propagate_crash),
        })
    }
}

impl TryFrom<RawOptions> for Options {
    type Error = ConfigError;

    fn try_from(raw: RawOptions) -> Result<Self, Self::Error> {
        raw.resolve()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_document_yields_defaults() {
        let opts = RawOptions::from_value(json!({})).unwrap().resolve().unwrap();
        assert_eq!(opts, Options::default());
    }

    #[test]
    fn test_deprecated_timeout_alias() {
        let opts = RawOptions::from_value(json!({"exec_timeout": 250}))
            .unwrap()
            .resolve()
            .unwrap();
        assert_eq!(opts.timeout, Duration::from_millis(250));
    }

    #[test]
    fn test_timeout_wins_over_alias() {
        let opts = RawOptions::from_value(json!({"timeout": 10, "exec_timeout": 250}))
            .unwrap()
            .resolve()
            .unwrap();
        assert_eq!(opts.timeout, Duration::from_millis(10));
    }

    #[test]
    fn test_flags_and_crash_alias() {
        let opts = RawOptions::from_value(json!({
            "ok_tuple": true,
            "stacktrace": true,
            "skip_log": true,
            "propagate_crash": true,
            "backoff": 10,
        }))
        .unwrap()
        .resolve()
        .unwrap();
        assert!(opts.ok_tuple && opts.stacktrace && opts.skip_log && opts.propagate_crash);
        assert_eq!(opts.backoff, Duration::from_millis(10));

        let opts = RawOptions::from_value(json!({"crush_report": true}))
            .unwrap()
            .resolve()
            .unwrap();
        assert!(opts.propagate_crash);
    }

    #[test]
    fn test_zero_retry_count_rejected() {
        let err = RawOptions::from_value(json!({"retry_count": 0}))
            .unwrap()
            .resolve()
            .unwrap_err();
        assert!(matches!(err, ConfigError::ZeroRetryCount));
    }

    #[test]
    fn test_unknown_key_rejected() {
        let err = RawOptions::from_value(json!({"retries": 3})).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_sentinels() {
        let opts = Options::default().with_timeout(Duration::ZERO).with_retry_count(0);
        assert_eq!(opts.deadline(), None);
        assert_eq!(opts.attempts(), 1);
        assert_eq!(Options::default().deadline(), Some(DEFAULT_TIMEOUT));
    }
}
