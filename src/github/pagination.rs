//! Cursor-tagged batches produced by GraphQL pagination.
//!
//! GraphQL pagination hands back an opaque end cursor with every page. A
//! `RepositoryCursorBatch` pairs the repository names from one page with the
//! cursor that follows them, so a run that stops after a batch can resume
//! from exactly that position.

use super::locator::RepositoryName;

/// Largest page size accepted by the organisation repositories connection.
pub const MAX_PAGE_SIZE: u8 = 100;

/// One page of repository names plus the cursor after its last entry.
///
/// # Example
///
/// ```
/// use repowarden::github::pagination::RepositoryCursorBatch;
/// use repowarden::github::RepositoryName;
///
/// let names = vec![RepositoryName::new("alpha").expect("valid name")];
/// let batch = RepositoryCursorBatch::new("Y3Vyc29yOjE=", names);
/// assert_eq!(batch.cursor(), "Y3Vyc29yOjE=");
/// assert_eq!(batch.len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryCursorBatch {
    cursor: String,
    repositories: Vec<RepositoryName>,
}

impl RepositoryCursorBatch {
    /// Creates a batch from a page's end cursor and its repository names.
    #[must_use]
    pub fn new(cursor: impl Into<String>, repositories: Vec<RepositoryName>) -> Self {
        Self {
            cursor: cursor.into(),
            repositories,
        }
    }

    /// Returns the cursor following the last repository of the page.
    #[must_use]
    pub const fn cursor(&self) -> &str {
        self.cursor.as_str()
    }

    /// Returns the repository names in page order.
    #[must_use]
    pub fn repositories(&self) -> &[RepositoryName] {
        &self.repositories
    }

    /// Returns the number of repositories in the batch.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.repositories.len()
    }

    /// Returns true when every repository on the page was filtered out.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.repositories.is_empty()
    }
}
