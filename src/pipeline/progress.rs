//! Progress reporting for repository listing.
//!
//! Listing reports how many repositories have been paged through after each
//! GraphQL page. Callers that do not care pass `None`; the pipeline never
//! depends on a callback having been supplied.

/// Repositories paged through so far against the organisation total.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListingProgress {
    /// Repositories returned so far, before archive filtering.
    pub current: u64,
    /// Total repositories reported by the connection.
    pub total: u64,
}

/// Callback for listing progress updates.
pub type ProgressCallback = Box<dyn Fn(ListingProgress) + Send + Sync>;

/// Emit a progress update if a callback is provided.
#[inline]
pub fn emit(on_progress: Option<&ProgressCallback>, progress: ListingProgress) {
    if let Some(callback) = on_progress {
        callback(progress);
    }
}

/// Returns a callback that logs listing progress at `info` level.
#[must_use]
pub fn logging_callback() -> ProgressCallback {
    Box::new(|progress: ListingProgress| {
        tracing::info!(
            current = progress.current,
            total = progress.total,
            "listed {} of {} repositories",
            progress.current,
            progress.total
        );
    })
}
