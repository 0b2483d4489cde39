//! Per-repository webhook collection across listed batches.

use tracing::{debug, info, warn};

use crate::github::{FetchOutcome, RepositoryCursorBatch, WebhookGateway};
use crate::report::WebhookCollection;

use super::run_state::{RunState, StopReason};

/// Fetches webhooks for every repository in a set of batches.
///
/// Calls are issued strictly in batch and page order. A repository whose
/// fetch fails is logged and skipped; a 403 or a passed deadline stops the
/// whole collection and returns what was gathered so far.
pub struct WebhookCollector<'a, G>
where
    G: WebhookGateway,
{
    gateway: &'a G,
}

impl<'a, G> WebhookCollector<'a, G>
where
    G: WebhookGateway,
{
    /// Creates a collector over the provided gateway.
    #[must_use]
    pub const fn new(gateway: &'a G) -> Self {
        Self { gateway }
    }

    /// Collects webhooks for each repository in `batches`.
    ///
    /// The run's deadline is checked before each batch. A batch's cursor
    /// becomes the run's resume position only once every repository in it
    /// has been attempted.
    pub async fn collect_webhooks(
        &self,
        state: &mut RunState,
        batches: &[RepositoryCursorBatch],
    ) -> WebhookCollection {
        let mut collection = WebhookCollection::default();

        for batch in batches {
            if state.deadline().is_reached() {
                info!(cursor = state.last_cursor(), "deadline reached, stopping collection");
                state.stop(StopReason::TimedOut);
                return collection;
            }

            for repository in batch.repositories() {
                match self.gateway.list_webhooks(repository).await {
                    FetchOutcome::Success(records) => {
                        state.record_rest_call();
                        debug!(
                            repository = repository.as_str(),
                            hooks = records.len(),
                            "collected webhooks"
                        );
                        collection.insert(repository.as_str(), records);
                    }
                    FetchOutcome::RateLimited => {
                        warn!(
                            repository = repository.as_str(),
                            "GitHub returned 403, stopping collection"
                        );
                        state.stop(StopReason::RateLimited);
                        return collection;
                    }
                    FetchOutcome::Failed(error) => {
                        warn!(
                            repository = repository.as_str(),
                            %error,
                            "skipping repository after failed webhook fetch"
                        );
                    }
                }
            }

            state.advance_cursor(batch.cursor());
        }

        state.mark_completed();
        collection
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use mockall::predicate::eq;
    use rstest::{fixture, rstest};

    use super::WebhookCollector;
    use crate::github::models::test_support::webhook;
    use crate::github::{
        AdminError, FetchOutcome, MockWebhookGateway, RepositoryCursorBatch, RepositoryName,
    };
    use crate::pipeline::run_state::{RunState, StopReason};

    fn name(value: &str) -> RepositoryName {
        RepositoryName::new(value).expect("name should be valid")
    }

    fn batch(cursor: &str, names: &[&str]) -> RepositoryCursorBatch {
        RepositoryCursorBatch::new(cursor, names.iter().map(|value| name(value)).collect())
    }

    #[fixture]
    fn state() -> RunState {
        RunState::new(None, Duration::from_secs(600))
    }

    #[rstest]
    #[tokio::test]
    async fn successful_fetches_are_keyed_by_repository(mut state: RunState) {
        let mut gateway = MockWebhookGateway::new();
        gateway
            .expect_list_webhooks()
            .times(2)
            .returning(|_| FetchOutcome::Success(vec![webhook(1, "https://ci.example.com")]));
        let collector = WebhookCollector::new(&gateway);

        let collection = collector
            .collect_webhooks(&mut state, &[batch("c1", &["repo1", "repo2"])])
            .await;

        assert_eq!(collection.repository_names(), vec!["repo1", "repo2"]);
        assert_eq!(state.counters().total_rest_calls, 2);
        assert!(state.completed_all_calls());
        assert_eq!(state.last_cursor(), "c1");
    }

    #[rstest]
    #[tokio::test]
    async fn failed_repository_is_skipped(mut state: RunState) {
        let mut gateway = MockWebhookGateway::new();
        gateway
            .expect_list_webhooks()
            .with(eq(name("broken")))
            .returning(|_| {
                FetchOutcome::Failed(AdminError::Api {
                    message: "Not Found".to_owned(),
                })
            });
        gateway
            .expect_list_webhooks()
            .with(eq(name("healthy")))
            .returning(|_| FetchOutcome::Success(Vec::new()));
        let collector = WebhookCollector::new(&gateway);

        let collection = collector
            .collect_webhooks(&mut state, &[batch("c1", &["broken", "healthy"])])
            .await;

        assert_eq!(collection.repository_names(), vec!["healthy"]);
        assert_eq!(state.counters().total_rest_calls, 1);
        assert!(state.completed_all_calls());
    }

    #[rstest]
    #[tokio::test]
    async fn rate_limit_mid_batch_keeps_previous_cursor(mut state: RunState) {
        let mut gateway = MockWebhookGateway::new();
        gateway
            .expect_list_webhooks()
            .with(eq(name("alpha")))
            .times(1)
            .returning(|_| FetchOutcome::Success(Vec::new()));
        gateway
            .expect_list_webhooks()
            .with(eq(name("beta")))
            .times(1)
            .returning(|_| FetchOutcome::Success(Vec::new()));
        gateway
            .expect_list_webhooks()
            .with(eq(name("gamma")))
            .times(1)
            .returning(|_| FetchOutcome::RateLimited);
        gateway
            .expect_list_webhooks()
            .with(eq(name("delta")))
            .never();
        let collector = WebhookCollector::new(&gateway);
        let batches = [
            batch("batch-1", &["alpha", "beta"]),
            batch("batch-2", &["gamma", "delta"]),
        ];

        let collection = collector.collect_webhooks(&mut state, &batches).await;

        assert_eq!(collection.repository_names(), vec!["alpha", "beta"]);
        assert_eq!(state.last_cursor(), "batch-1");
        assert!(!state.completed_all_calls());
        assert_eq!(state.stop_reason(), Some(StopReason::RateLimited));
    }

    #[tokio::test]
    async fn zero_timeout_issues_no_calls() {
        let mut state = RunState::new(Some("resume-here"), Duration::ZERO);
        let mut gateway = MockWebhookGateway::new();
        gateway.expect_list_webhooks().never();
        let collector = WebhookCollector::new(&gateway);

        let collection = collector
            .collect_webhooks(&mut state, &[batch("c1", &["repo1"])])
            .await;

        assert!(collection.is_empty());
        assert_eq!(state.counters().total_rest_calls, 0);
        assert_eq!(state.last_cursor(), "resume-here");
        assert_eq!(state.stop_reason(), Some(StopReason::TimedOut));
    }
}
