//! Application telemetry events and sinks.
//!
//! Every command ends by recording one structured event summarising what it
//! did. Sinks never transmit anything; the stderr sink exists so operators
//! can capture run summaries alongside the logs.

use std::io;

use serde::{Deserialize, Serialize};

use crate::admin::AdminSummary;
use crate::pipeline::RunState;

/// A structured telemetry event emitted by repowarden.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TelemetryEvent {
    /// A paginated traversal finished, early or not.
    RunFinished {
        /// Operation name, e.g. `webhooks`.
        operation: String,
        /// Cursor of the last fully processed batch.
        last_cursor: String,
        /// Whether every repository was processed.
        completed_all_calls: bool,
        /// REST calls that returned successfully.
        total_rest_calls: u64,
        /// GraphQL page queries issued.
        total_graphql_calls: u64,
    },
    /// A one-shot command finished walking its repository list.
    AdminCommandFinished {
        /// Operation name, e.g. `dependabot`.
        operation: String,
        /// Repositories changed.
        succeeded: usize,
        /// Repositories that failed.
        failed: usize,
        /// Whether a rate limit error stopped the command.
        stopped: bool,
    },
}

impl TelemetryEvent {
    /// Summarises a traversal's final state.
    #[must_use]
    pub fn run_finished(operation: &str, state: &RunState) -> Self {
        let counters = state.counters();
        Self::RunFinished {
            operation: operation.to_owned(),
            last_cursor: state.last_cursor().to_owned(),
            completed_all_calls: state.completed_all_calls(),
            total_rest_calls: counters.total_rest_calls,
            total_graphql_calls: counters.total_graphql_calls,
        }
    }

    /// Summarises a one-shot command's outcome.
    #[must_use]
    pub fn admin_finished(operation: &str, summary: &AdminSummary) -> Self {
        Self::AdminCommandFinished {
            operation: operation.to_owned(),
            succeeded: summary.succeeded.len(),
            failed: summary.failed.len(),
            stopped: summary.stopped,
        }
    }
}

/// A sink that can record telemetry events.
pub trait TelemetrySink: Send + Sync {
    /// Records a telemetry event.
    fn record(&self, event: TelemetryEvent);
}

/// Telemetry sink that drops all events.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopTelemetrySink;

impl TelemetrySink for NoopTelemetrySink {
    fn record(&self, _event: TelemetryEvent) {}
}

/// Records telemetry events to stderr as JSON lines (JSONL).
#[derive(Debug, Default)]
pub struct StderrJsonlTelemetrySink;

impl TelemetrySink for StderrJsonlTelemetrySink {
    fn record(&self, event: TelemetryEvent) {
        let Ok(serialised) = serde_json::to_string(&event) else {
            return;
        };

        let _ignored = writeln_stderr(&serialised);
    }
}

fn writeln_stderr(message: &str) -> io::Result<()> {
    use io::Write;

    let mut stderr = io::stderr().lock();
    writeln!(stderr, "{message}")
}
