//! Cursor-driven traversal of an organisation's repositories.
//!
//! The lister issues one GraphQL page query per iteration, always 100
//! repositories in name order after the current cursor, and keeps going
//! while the connection reports another page. Every page counts against the
//! run's GraphQL counter. A failed page aborts the traversal without
//! returning partial results.

use tracing::{debug, info};

use crate::github::{
    AdminError, RepositoryCursorBatch, RepositoryName, RepositoryPage, RepositoryPageGateway,
    RepositoryQuery,
};

use super::progress::{ListingProgress, ProgressCallback, emit};
use super::run_state::RunState;

/// Cursor-tagged batches produced by a names-only traversal.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingOutcome {
    /// Batches in cursor order; empty for a dry run.
    pub batches: Vec<RepositoryCursorBatch>,
    /// Total repositories reported by the organisation connection.
    pub total_count: u64,
}

/// Whole pages produced by a report traversal.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListedPages {
    /// Pages in cursor order; empty for a dry run.
    pub pages: Vec<RepositoryPage>,
    /// Total repositories reported by the organisation connection.
    pub total_count: u64,
}

/// Options shared by every traversal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListingOptions<'a> {
    /// Cursor to resume after; blank or absent starts from the beginning.
    pub start_cursor: Option<&'a str>,
    /// Drop archived repositories from batches.
    pub ignore_archived: bool,
    /// Stop after the first page and report only the total.
    pub dry_run: bool,
}

/// Walks the organisation repositories connection page by page.
pub struct RepositoryLister<'a, G>
where
    G: RepositoryPageGateway,
{
    gateway: &'a G,
    on_progress: Option<&'a ProgressCallback>,
}

impl<'a, G> RepositoryLister<'a, G>
where
    G: RepositoryPageGateway,
{
    /// Creates a lister over the provided gateway.
    #[must_use]
    pub const fn new(gateway: &'a G) -> Self {
        Self {
            gateway,
            on_progress: None,
        }
    }

    /// Attaches a progress callback invoked after every page.
    #[must_use]
    pub const fn with_progress(mut self, on_progress: Option<&'a ProgressCallback>) -> Self {
        self.on_progress = on_progress;
        self
    }

    /// Lists repository names as cursor-tagged batches.
    ///
    /// # Errors
    ///
    /// Returns [`AdminError::GraphQlCallFailed`] when any page query fails.
    pub async fn list_repositories(
        &self,
        state: &mut RunState,
        options: ListingOptions<'_>,
    ) -> Result<ListingOutcome, AdminError> {
        let mut batches = Vec::new();
        let total_count = self
            .walk(RepositoryQuery::Names, state, options, |page| {
                let repositories = page
                    .nodes
                    .iter()
                    .filter(|node| !(options.ignore_archived && node.is_archived))
                    .filter_map(|node| RepositoryName::new(&node.name).ok())
                    .collect();
                batches.push(RepositoryCursorBatch::new(page.end_cursor(), repositories));
            })
            .await?;

        Ok(ListingOutcome {
            batches,
            total_count,
        })
    }

    /// Lists whole repository pages including branch protection rules.
    ///
    /// Archive filtering is left to report generation.
    ///
    /// # Errors
    ///
    /// Returns [`AdminError::GraphQlCallFailed`] when any page query fails.
    pub async fn list_repository_pages(
        &self,
        state: &mut RunState,
        options: ListingOptions<'_>,
    ) -> Result<ListedPages, AdminError> {
        let mut pages = Vec::new();
        let total_count = self
            .walk(RepositoryQuery::Report, state, options, |page| {
                pages.push(page);
            })
            .await?;

        Ok(ListedPages { pages, total_count })
    }

    async fn walk<F>(
        &self,
        query: RepositoryQuery,
        state: &mut RunState,
        options: ListingOptions<'_>,
        mut on_page: F,
    ) -> Result<u64, AdminError>
    where
        F: FnMut(RepositoryPage) + Send,
    {
        let mut cursor = options
            .start_cursor
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(str::to_owned);
        let mut seen: u64 = 0;

        loop {
            state.record_graphql_call();
            debug!(after = cursor.as_deref().unwrap_or(""), "fetching repository page");
            let page = self.gateway.repository_page(query, cursor.clone()).await?;
            let total = page.total_count;
            seen = seen.saturating_add(u64::try_from(page.nodes.len()).unwrap_or(u64::MAX));
            emit(
                self.on_progress,
                ListingProgress {
                    current: seen,
                    total,
                },
            );

            if options.dry_run {
                info!("dry run: would process {total} records");
                return Ok(total);
            }

            let has_next = page.page_info.has_next_page;
            let next = page.end_cursor().to_owned();
            if has_next && cursor.as_deref() == Some(next.as_str()) {
                return Err(AdminError::GraphQlCallFailed {
                    message: format!("repository connection repeated cursor '{next}'"),
                });
            }
            on_page(page);

            if !has_next {
                return Ok(total);
            }
            cursor = Some(next);
        }
    }
}
