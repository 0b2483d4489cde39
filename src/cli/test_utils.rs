//! Shared test utilities for CLI tests.

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use camino::Utf8Path;
use repowarden::github::{
    AdminError, BranchProtectionGateway, DependabotGateway, FetchOutcome, ProtectionSettings,
    ProtectionTarget, RateLimitGateway, RateLimitInfo, RateLimitStatus, RepositoryName,
    RepositoryPage, RepositoryPageGateway, RepositoryQuery, TeamAccess, TeamGateway,
    WebhookGateway, WebhookRecord,
};
use repowarden::report::ReportWriter;
use repowarden::telemetry::{TelemetryEvent, TelemetrySink};

/// In-memory GitHub stand-in implementing every gateway trait.
///
/// Calls are appended to `calls` so tests can assert on order.
#[derive(Clone, Default)]
pub struct FakeGateway {
    /// REST calls remaining in the reported quota.
    pub rest_remaining: u32,
    /// Pages returned in order by `repository_page`.
    pub pages: Arc<Mutex<VecDeque<Result<RepositoryPage, AdminError>>>>,
    /// Webhooks per repository; missing repositories have none.
    pub hooks: HashMap<String, Vec<WebhookRecord>>,
    /// Repositories whose webhook calls answer 403.
    pub forbidden: HashSet<String>,
    /// Repositories whose webhook listing fails with a non-403 error.
    pub failing: HashSet<String>,
    /// Team permissions returned by `team_access`.
    pub team: Option<TeamAccess>,
    /// Log of mutating calls in the order they were made.
    pub calls: Arc<Mutex<Vec<String>>>,
}

impl FakeGateway {
    /// Creates a gateway with a healthy quota and the given pages.
    pub fn with_pages(pages: Vec<RepositoryPage>) -> Self {
        Self {
            rest_remaining: 5000,
            pages: Arc::new(Mutex::new(pages.into_iter().map(Ok).collect())),
            ..Self::default()
        }
    }

    /// Returns the recorded mutating calls.
    pub fn recorded_calls(&self) -> Vec<String> {
        self.calls
            .lock()
            .expect("calls mutex should be available")
            .clone()
    }

    fn record(&self, call: String) {
        self.calls
            .lock()
            .expect("calls mutex should be available")
            .push(call);
    }
}

#[async_trait]
impl RateLimitGateway for FakeGateway {
    async fn rate_limit(&self) -> Result<RateLimitStatus, AdminError> {
        Ok(RateLimitStatus {
            rest: RateLimitInfo::new(5000, self.rest_remaining, 1_700_000_000),
            graphql: RateLimitInfo::new(5000, 5000, 1_700_000_000),
        })
    }
}

#[async_trait]
impl RepositoryPageGateway for FakeGateway {
    async fn repository_page(
        &self,
        _query: RepositoryQuery,
        _after: Option<String>,
    ) -> Result<RepositoryPage, AdminError> {
        self.pages
            .lock()
            .expect("pages mutex should be available")
            .pop_front()
            .expect("test requested more pages than configured")
    }
}

#[async_trait]
impl WebhookGateway for FakeGateway {
    async fn list_webhooks(
        &self,
        repository: &RepositoryName,
    ) -> FetchOutcome<Vec<WebhookRecord>> {
        if self.forbidden.contains(repository.as_str()) {
            return FetchOutcome::RateLimited;
        }
        if self.failing.contains(repository.as_str()) {
            return FetchOutcome::Failed(AdminError::Api {
                message: format!("list webhooks for {} failed: 404", repository.as_str()),
            });
        }
        FetchOutcome::Success(
            self.hooks
                .get(repository.as_str())
                .cloned()
                .unwrap_or_default(),
        )
    }

    async fn delete_webhook(&self, repository: &RepositoryName, hook_id: u64) -> FetchOutcome<()> {
        self.record(format!("delete {} {hook_id}", repository.as_str()));
        FetchOutcome::Success(())
    }
}

#[async_trait]
impl TeamGateway for FakeGateway {
    async fn team_access(&self, team_slug: &str) -> Result<TeamAccess, AdminError> {
        self.team.clone().ok_or_else(|| AdminError::Api {
            message: format!("team {team_slug} not found"),
        })
    }
}

#[async_trait]
impl BranchProtectionGateway for FakeGateway {
    async fn protection_target(
        &self,
        repository: &RepositoryName,
    ) -> Result<ProtectionTarget, AdminError> {
        Ok(ProtectionTarget {
            repository_id: format!("R_{}", repository.as_str()),
            default_branch: Some("main".to_owned()),
            rule_id: None,
        })
    }

    async fn update_rule(
        &self,
        rule_id: &str,
        _settings: &ProtectionSettings,
    ) -> Result<(), AdminError> {
        self.record(format!("update {rule_id}"));
        Ok(())
    }

    async fn create_rule(
        &self,
        repository_id: &str,
        pattern: &str,
        _settings: &ProtectionSettings,
    ) -> Result<(), AdminError> {
        self.record(format!("create {repository_id} {pattern}"));
        Ok(())
    }
}

#[async_trait]
impl DependabotGateway for FakeGateway {
    async fn set_vulnerability_alerts(
        &self,
        repository: &RepositoryName,
        enabled: bool,
    ) -> Result<(), AdminError> {
        self.record(format!("alerts {} {enabled}", repository.as_str()));
        Ok(())
    }

    async fn set_automated_security_fixes(
        &self,
        repository: &RepositoryName,
        enabled: bool,
    ) -> Result<(), AdminError> {
        self.record(format!("fixes {} {enabled}", repository.as_str()));
        Ok(())
    }
}

/// Report writer keeping every write in memory.
#[derive(Clone, Default)]
pub struct RecordingReportWriter {
    /// Path and contents of each write.
    pub writes: Arc<Mutex<Vec<(String, Vec<u8>)>>>,
}

impl RecordingReportWriter {
    /// Returns the single recorded write as UTF-8 text.
    pub fn only_write(&self) -> (String, String) {
        let writes = self.writes.lock().expect("writes mutex should be available");
        assert_eq!(writes.len(), 1, "expected exactly one report write");
        let (path, contents) = writes.first().cloned().expect("one write recorded");
        (
            path,
            String::from_utf8(contents).expect("report should be UTF-8"),
        )
    }

    /// Returns true when nothing was written.
    pub fn is_untouched(&self) -> bool {
        self.writes
            .lock()
            .expect("writes mutex should be available")
            .is_empty()
    }
}

impl ReportWriter for RecordingReportWriter {
    fn write_report(&self, path: &Utf8Path, contents: &[u8]) -> Result<(), AdminError> {
        self.writes
            .lock()
            .expect("writes mutex should be available")
            .push((path.to_string(), contents.to_vec()));
        Ok(())
    }
}

/// Telemetry sink keeping every event in memory.
#[derive(Debug, Default)]
pub struct RecordingSink {
    events: Mutex<Vec<TelemetryEvent>>,
}

impl RecordingSink {
    /// Drains the recorded events.
    pub fn take(&self) -> Vec<TelemetryEvent> {
        self.events
            .lock()
            .expect("events mutex should be available")
            .drain(..)
            .collect()
    }
}

impl TelemetrySink for RecordingSink {
    fn record(&self, event: TelemetryEvent) {
        self.events
            .lock()
            .expect("events mutex should be available")
            .push(event);
    }
}

/// Splits captured stdout into the final resume marker and the rest.
pub fn split_marker(output: &str) -> (&str, serde_json::Value) {
    let trimmed = output.trim_end();
    let (body, marker) = trimmed.rsplit_once('\n').unwrap_or(("", trimmed));
    (
        body,
        serde_json::from_str(marker).expect("last line should be the resume marker"),
    )
}
