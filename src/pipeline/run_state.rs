//! Per-run counters, cursor, and resumability marker.
//!
//! One [`RunState`] is created for each run and passed by mutable reference
//! through listing and collection. On exit it is rendered as a
//! [`ResumeMarker`] line so an interrupted run can be restarted with
//! `--start-cursor`.

use std::time::{Duration, Instant};

use serde::Serialize;

use crate::github::AdminError;

/// Largest accepted run timeout, in minutes.
pub const MAX_TIMEOUT_MINUTES: u64 = 120;

/// Run timeout applied when none is configured, in minutes.
pub const DEFAULT_TIMEOUT_MINUTES: u64 = 30;

/// Validates a timeout in minutes and converts it to a duration.
///
/// # Errors
///
/// Returns [`AdminError::InvalidTimeout`] when `minutes` exceeds
/// [`MAX_TIMEOUT_MINUTES`].
pub const fn timeout_from_minutes(minutes: u64) -> Result<Duration, AdminError> {
    if minutes > MAX_TIMEOUT_MINUTES {
        return Err(AdminError::InvalidTimeout {
            minutes,
            maximum: MAX_TIMEOUT_MINUTES,
        });
    }
    Ok(Duration::from_secs(minutes.saturating_mul(60)))
}

/// Wall-clock instant after which no new batch is started.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deadline(Instant);

impl Deadline {
    /// Fixes a deadline `timeout` from now.
    #[must_use]
    pub fn after(timeout: Duration) -> Self {
        let now = Instant::now();
        Self(now.checked_add(timeout).unwrap_or(now))
    }

    /// Returns true once the deadline has passed.
    #[must_use]
    pub fn is_reached(&self) -> bool {
        Instant::now() >= self.0
    }
}

/// Why a run stopped before processing every batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The rate limit was exhausted, either up front or via a 403.
    RateLimited,
    /// The run deadline was reached between batches.
    TimedOut,
}

impl StopReason {
    /// Returns a short label for log output.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::RateLimited => "rate limit reached",
            Self::TimedOut => "timeout reached",
        }
    }
}

/// Cumulative API call counters for one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunCounters {
    /// Successful REST calls made against repositories.
    pub total_rest_calls: u64,
    /// GraphQL page queries issued.
    pub total_graphql_calls: u64,
}

/// Resumability marker printed when a run exits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeMarker {
    /// Cursor after the last fully processed batch.
    pub last_cursor: String,
    /// Whether every batch was processed without stopping early.
    pub completed_all_calls: bool,
}

impl ResumeMarker {
    /// Renders the marker as a single JSON line without a trailing newline.
    ///
    /// # Errors
    ///
    /// Returns [`AdminError::Io`] if serialisation fails.
    pub fn to_line(&self) -> Result<String, AdminError> {
        serde_json::to_string(self).map_err(|error| AdminError::Io {
            message: format!("failed to serialise resume marker: {error}"),
        })
    }
}

/// Mutable state threaded through one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunState {
    last_cursor: String,
    completed_all_calls: bool,
    deadline: Deadline,
    counters: RunCounters,
    stop_reason: Option<StopReason>,
}

impl RunState {
    /// Starts a run resuming from `start_cursor` with a deadline `timeout`
    /// from now. Counters start at zero.
    #[must_use]
    pub fn new(start_cursor: Option<&str>, timeout: Duration) -> Self {
        Self {
            last_cursor: start_cursor.unwrap_or_default().to_owned(),
            completed_all_calls: false,
            deadline: Deadline::after(timeout),
            counters: RunCounters::default(),
            stop_reason: None,
        }
    }

    /// Cursor after the last fully processed batch.
    #[must_use]
    pub const fn last_cursor(&self) -> &str {
        self.last_cursor.as_str()
    }

    /// Whether the run processed every batch.
    #[must_use]
    pub const fn completed_all_calls(&self) -> bool {
        self.completed_all_calls
    }

    /// Deadline fixed when the run started.
    #[must_use]
    pub const fn deadline(&self) -> Deadline {
        self.deadline
    }

    /// Current call counters.
    #[must_use]
    pub const fn counters(&self) -> RunCounters {
        self.counters
    }

    /// Why the run stopped early, if it did.
    #[must_use]
    pub const fn stop_reason(&self) -> Option<StopReason> {
        self.stop_reason
    }

    /// Records a successful REST call.
    pub const fn record_rest_call(&mut self) {
        self.counters.total_rest_calls = self.counters.total_rest_calls.saturating_add(1);
    }

    /// Records an issued GraphQL page query.
    pub const fn record_graphql_call(&mut self) {
        self.counters.total_graphql_calls = self.counters.total_graphql_calls.saturating_add(1);
    }

    /// Moves the resume position past a fully processed batch.
    pub fn advance_cursor(&mut self, cursor: &str) {
        cursor.clone_into(&mut self.last_cursor);
    }

    /// Marks every batch as processed.
    pub const fn mark_completed(&mut self) {
        if self.stop_reason.is_none() {
            self.completed_all_calls = true;
        }
    }

    /// Records an early stop; the run can no longer complete.
    pub const fn stop(&mut self, reason: StopReason) {
        self.stop_reason = Some(reason);
        self.completed_all_calls = false;
    }

    /// Builds the marker emitted on exit.
    #[must_use]
    pub fn marker(&self) -> ResumeMarker {
        ResumeMarker {
            last_cursor: self.last_cursor.clone(),
            completed_all_calls: self.completed_all_calls,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use rstest::rstest;

    use super::{
        MAX_TIMEOUT_MINUTES, ResumeMarker, RunState, StopReason, timeout_from_minutes,
    };
    use crate::github::AdminError;

    #[rstest]
    fn marker_line_uses_camel_case_keys() {
        let marker = ResumeMarker {
            last_cursor: "Y3Vyc29yOjEwMA==".to_owned(),
            completed_all_calls: false,
        };

        assert_eq!(
            marker.to_line().expect("marker should serialise"),
            r#"{"lastCursor":"Y3Vyc29yOjEwMA==","completedAllCalls":false}"#
        );
    }

    #[rstest]
    fn new_state_resumes_from_start_cursor_with_zeroed_counters() {
        let state = RunState::new(Some("abc"), Duration::from_secs(60));

        assert_eq!(state.last_cursor(), "abc");
        assert!(!state.completed_all_calls());
        assert_eq!(state.counters().total_rest_calls, 0);
        assert_eq!(state.counters().total_graphql_calls, 0);
    }

    #[rstest]
    fn stopped_state_never_reports_completion() {
        let mut state = RunState::new(None, Duration::from_secs(60));
        state.stop(StopReason::RateLimited);
        state.mark_completed();

        assert!(!state.completed_all_calls());
        assert_eq!(state.stop_reason(), Some(StopReason::RateLimited));
    }

    #[rstest]
    fn zero_timeout_deadline_is_already_reached() {
        let state = RunState::new(None, Duration::ZERO);
        assert!(state.deadline().is_reached());
    }

    #[rstest]
    #[case(0, true)]
    #[case(MAX_TIMEOUT_MINUTES, true)]
    #[case(MAX_TIMEOUT_MINUTES + 1, false)]
    fn timeout_is_bounded(#[case] minutes: u64, #[case] accepted: bool) {
        let result = timeout_from_minutes(minutes);
        if accepted {
            assert_eq!(result, Ok(Duration::from_secs(minutes * 60)));
        } else {
            assert_eq!(
                result,
                Err(AdminError::InvalidTimeout {
                    minutes,
                    maximum: MAX_TIMEOUT_MINUTES,
                })
            );
        }
    }
}
