//! Run orchestration: rate limit gate, listing, collection, and exit marker.

use std::io::Write;

use tracing::{info, warn};

use crate::github::{
    AdminError, FetchOutcome, RateLimitGateway, RepositoryName, RepositoryPage,
    RepositoryPageGateway, WebhookGateway,
};
use crate::report::WebhookCollection;

use super::collector::WebhookCollector;
use super::lister::{ListingOptions, RepositoryLister};
use super::progress::ProgressCallback;
use super::rate_gate::RateLimitGate;
use super::run_state::{RunState, StopReason, timeout_from_minutes};

/// Lifecycle of a single run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunPhase {
    /// Constructed, no call issued yet.
    Idle,
    /// Walking repository pages.
    Listing,
    /// Issuing per-repository calls.
    Collecting,
    /// Stopped normally, early or not.
    Finished,
    /// Listing failed; no output is produced.
    Aborted,
}

/// Options controlling one run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunOptions {
    /// Cursor to resume after.
    pub start_cursor: Option<String>,
    /// Skip archived repositories.
    pub ignore_archived: bool,
    /// Report what would be processed without per-repository calls.
    pub dry_run: bool,
    /// Wall-clock budget in minutes.
    pub timeout_minutes: u64,
}

/// Outcome of removing webhooks by host.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RemovalSummary {
    /// Hooks deleted (or that would be deleted in a dry run).
    pub removed: usize,
    /// Hooks whose deletion failed.
    pub failed: usize,
    /// Whether a 403 stopped removal.
    pub stopped: bool,
}

/// Drives a run from the rate limit check through to the exit marker.
///
/// The controller owns the run's [`RunState`]. Whatever path a run takes,
/// [`RunController::finish`] writes the resume marker and logs the
/// counters.
pub struct RunController<'a, R, P, W>
where
    R: RateLimitGateway,
    P: RepositoryPageGateway,
    W: WebhookGateway,
{
    rate_limits: &'a R,
    pages: &'a P,
    webhooks: &'a W,
    options: RunOptions,
    state: RunState,
    phase: RunPhase,
    on_progress: Option<ProgressCallback>,
}

impl<'a, R, P, W> RunController<'a, R, P, W>
where
    R: RateLimitGateway,
    P: RepositoryPageGateway,
    W: WebhookGateway,
{
    /// Validates options and fixes the run deadline.
    ///
    /// # Errors
    ///
    /// Returns [`AdminError::InvalidTimeout`] when the timeout exceeds the
    /// configured maximum. No network call has been made at that point.
    pub fn new(
        rate_limits: &'a R,
        pages: &'a P,
        webhooks: &'a W,
        options: RunOptions,
    ) -> Result<Self, AdminError> {
        let timeout = timeout_from_minutes(options.timeout_minutes)?;
        let state = RunState::new(options.start_cursor.as_deref(), timeout);
        Ok(Self {
            rate_limits,
            pages,
            webhooks,
            options,
            state,
            phase: RunPhase::Idle,
            on_progress: None,
        })
    }

    /// Attaches a listing progress callback.
    #[must_use]
    pub fn with_progress(mut self, on_progress: ProgressCallback) -> Self {
        self.on_progress = Some(on_progress);
        self
    }

    /// Current lifecycle phase.
    #[must_use]
    pub const fn phase(&self) -> RunPhase {
        self.phase
    }

    /// Run state accumulated so far.
    #[must_use]
    pub const fn state(&self) -> &RunState {
        &self.state
    }

    /// Lists repositories and collects their webhooks.
    ///
    /// An exhausted (or unknown) rate limit finishes the run before any
    /// listing or collection call. A dry run finishes after the first page.
    ///
    /// # Errors
    ///
    /// Returns [`AdminError::GraphQlCallFailed`] when listing fails; the run
    /// is then [`RunPhase::Aborted`].
    pub async fn collect_webhooks(&mut self) -> Result<WebhookCollection, AdminError> {
        if self.quota_exhausted().await {
            return Ok(WebhookCollection::default());
        }

        self.phase = RunPhase::Listing;
        let listing_options = listing_options(&self.options);
        let lister = RepositoryLister::new(self.pages).with_progress(self.on_progress.as_ref());
        let listing = match lister
            .list_repositories(&mut self.state, listing_options)
            .await
        {
            Ok(listing) => listing,
            Err(error) => {
                self.phase = RunPhase::Aborted;
                return Err(error);
            }
        };

        if self.options.dry_run {
            self.phase = RunPhase::Finished;
            return Ok(WebhookCollection::default());
        }

        self.phase = RunPhase::Collecting;
        let collection = WebhookCollector::new(self.webhooks)
            .collect_webhooks(&mut self.state, &listing.batches)
            .await;
        self.phase = RunPhase::Finished;
        Ok(collection)
    }

    /// Lists whole repository pages for a report.
    ///
    /// A report needs every page, so the deadline is not applied; only the
    /// rate limit gate can stop it up front.
    ///
    /// # Errors
    ///
    /// Returns [`AdminError::GraphQlCallFailed`] when listing fails.
    pub async fn collect_report_pages(&mut self) -> Result<Vec<RepositoryPage>, AdminError> {
        if self.quota_exhausted().await {
            return Ok(Vec::new());
        }

        self.phase = RunPhase::Listing;
        let listing_options = listing_options(&self.options);
        let lister = RepositoryLister::new(self.pages).with_progress(self.on_progress.as_ref());
        match lister
            .list_repository_pages(&mut self.state, listing_options)
            .await
        {
            Ok(listed) => {
                if !self.options.dry_run {
                    if let Some(last) = listed.pages.last() {
                        self.state.advance_cursor(last.end_cursor());
                    }
                    self.state.mark_completed();
                }
                self.phase = RunPhase::Finished;
                Ok(listed.pages)
            }
            Err(error) => {
                self.phase = RunPhase::Aborted;
                Err(error)
            }
        }
    }

    /// Deletes every collected webhook whose delivery host equals `host`.
    ///
    /// Per-hook failures are logged and skipped; a 403 stops removal and
    /// marks the run incomplete. A dry run only logs.
    pub async fn remove_webhooks(
        &mut self,
        collection: &WebhookCollection,
        host: &str,
    ) -> RemovalSummary {
        let mut summary = RemovalSummary::default();

        for (repository, records) in collection.iter() {
            let Ok(name) = RepositoryName::new(repository) else {
                continue;
            };
            for record in records.iter().filter(|record| record.targets_host(host)) {
                if self.options.dry_run {
                    info!(repository, hook_id = record.id, "dry run: would delete webhook");
                    summary.removed = summary.removed.saturating_add(1);
                    continue;
                }

                match self.webhooks.delete_webhook(&name, record.id).await {
                    FetchOutcome::Success(()) => {
                        self.state.record_rest_call();
                        info!(repository, hook_id = record.id, "deleted webhook");
                        summary.removed = summary.removed.saturating_add(1);
                    }
                    FetchOutcome::RateLimited => {
                        warn!(repository, "GitHub returned 403, stopping webhook removal");
                        self.state.stop(StopReason::RateLimited);
                        summary.stopped = true;
                        return summary;
                    }
                    FetchOutcome::Failed(error) => {
                        warn!(repository, hook_id = record.id, %error, "failed to delete webhook");
                        summary.failed = summary.failed.saturating_add(1);
                    }
                }
            }
        }

        summary
    }

    /// Writes the resume marker line and logs the cumulative counters.
    ///
    /// # Errors
    ///
    /// Returns [`AdminError::Io`] when the marker cannot be written.
    pub fn finish<O: Write>(&self, writer: &mut O) -> Result<(), AdminError> {
        let counters = self.state.counters();
        info!(
            total_rest_calls = counters.total_rest_calls,
            total_graphql_calls = counters.total_graphql_calls,
            stop_reason = self.state.stop_reason().map_or("none", StopReason::as_str),
            "run finished"
        );

        let line = self.state.marker().to_line()?;
        writeln!(writer, "{line}").map_err(|error| AdminError::Io {
            message: format!("failed to write resume marker: {error}"),
        })
    }

    async fn quota_exhausted(&mut self) -> bool {
        if RateLimitGate::new(self.rate_limits).has_reached_limit().await {
            self.state.stop(StopReason::RateLimited);
            self.phase = RunPhase::Finished;
            return true;
        }
        false
    }
}

fn listing_options(options: &RunOptions) -> ListingOptions<'_> {
    ListingOptions {
        start_cursor: options.start_cursor.as_deref(),
        ignore_archived: options.ignore_archived,
        dry_run: options.dry_run,
    }
}
