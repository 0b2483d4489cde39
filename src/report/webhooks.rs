//! Collected webhooks keyed by repository, and their CSV/JSON renderings.

use indexmap::IndexMap;
use serde::Serialize;

use crate::github::{AdminError, WebhookRecord};

const WEBHOOK_COLUMNS: [&str; 6] = [
    "Repository Name",
    "Hook ID",
    "Active",
    "Events",
    "URL",
    "Insecure SSL",
];

/// Webhooks gathered during a run, in traversal order.
///
/// Only repositories whose fetch succeeded are present; a repository with no
/// hooks maps to an empty list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct WebhookCollection(IndexMap<String, Vec<WebhookRecord>>);

impl WebhookCollection {
    /// Stores the hooks fetched for `repository`.
    pub fn insert(&mut self, repository: &str, records: Vec<WebhookRecord>) {
        self.0.insert(repository.to_owned(), records);
    }

    /// Iterates repositories and their hooks in insertion order.
    #[must_use]
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[WebhookRecord])> {
        self.0
            .iter()
            .map(|(repository, records)| (repository.as_str(), records.as_slice()))
    }

    /// Repository names in insertion order.
    #[must_use]
    pub fn repository_names(&self) -> Vec<&str> {
        self.0.keys().map(String::as_str).collect()
    }

    /// Number of repositories collected.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true when no repository was collected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Total hooks across every repository.
    #[must_use]
    pub fn hook_count(&self) -> usize {
        self.0.values().map(Vec::len).sum()
    }

    /// Renders the collection as a JSON object of repository to hooks.
    ///
    /// # Errors
    ///
    /// Returns [`AdminError::EmptyResult`] when nothing was collected, or
    /// [`AdminError::Io`] if serialisation fails.
    pub fn to_json(&self) -> Result<Vec<u8>, AdminError> {
        if self.is_empty() {
            return Err(AdminError::EmptyResult);
        }
        serde_json::to_vec_pretty(self).map_err(|error| AdminError::Io {
            message: format!("failed to serialise webhook report: {error}"),
        })
    }

    /// Renders one CSV row per hook.
    ///
    /// # Errors
    ///
    /// Returns [`AdminError::EmptyResult`] when no hook was collected, or
    /// [`AdminError::Io`] if the CSV writer fails.
    pub fn to_csv(&self) -> Result<Vec<u8>, AdminError> {
        if self.hook_count() == 0 {
            return Err(AdminError::EmptyResult);
        }

        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record(WEBHOOK_COLUMNS).map_err(csv_error)?;
        for (repository, records) in self.iter() {
            for record in records {
                let events = record
                    .events
                    .iter()
                    .map(String::as_str)
                    .collect::<Vec<_>>()
                    .join(";");
                let id = record.id.to_string();
                let active = record.active.to_string();
                let insecure_ssl = record.config.insecure_ssl.to_string();
                writer
                    .write_record([
                        repository,
                        id.as_str(),
                        active.as_str(),
                        events.as_str(),
                        record.config.url.as_deref().unwrap_or_default(),
                        insecure_ssl.as_str(),
                    ])
                    .map_err(csv_error)?;
            }
        }
        writer.into_inner().map_err(|error| AdminError::Io {
            message: format!("failed to flush webhook report: {error}"),
        })
    }
}

fn csv_error(error: csv::Error) -> AdminError {
    AdminError::Io {
        message: format!("failed to write webhook report: {error}"),
    }
}

#[cfg(test)]
mod tests {
    use rstest::{fixture, rstest};

    use super::WebhookCollection;
    use crate::github::AdminError;
    use crate::github::models::test_support::webhook;

    #[fixture]
    fn collection() -> WebhookCollection {
        let mut collection = WebhookCollection::default();
        collection.insert("zeta", vec![webhook(9, "https://ci.example.com/z")]);
        collection.insert("alpha", Vec::new());
        collection.insert(
            "beta",
            vec![
                webhook(1, "https://ci.example.com/b"),
                webhook(2, "https://chat.example.com/b"),
            ],
        );
        collection
    }

    #[rstest]
    fn json_preserves_traversal_order(collection: WebhookCollection) {
        let bytes = collection.to_json().expect("report should generate");
        let text = String::from_utf8(bytes).expect("report should be UTF-8");

        let zeta = text.find("\"zeta\"").expect("zeta key should exist");
        let alpha = text.find("\"alpha\"").expect("alpha key should exist");
        assert!(zeta < alpha, "keys must follow insertion order");
        assert!(text.contains("\"insecureSsl\": 0"));
    }

    #[rstest]
    fn csv_has_one_row_per_hook(collection: WebhookCollection) {
        let bytes = collection.to_csv().expect("report should generate");
        let text = String::from_utf8(bytes).expect("report should be UTF-8");
        let rows: Vec<_> = text.lines().collect();

        assert_eq!(
            rows,
            vec![
                "Repository Name,Hook ID,Active,Events,URL,Insecure SSL",
                "zeta,9,true,push,https://ci.example.com/z,0",
                "beta,1,true,push,https://ci.example.com/b,0",
                "beta,2,true,push,https://chat.example.com/b,0",
            ]
        );
    }

    #[rstest]
    fn empty_collection_is_an_empty_result() {
        let collection = WebhookCollection::default();

        assert_eq!(collection.to_json(), Err(AdminError::EmptyResult));
        assert_eq!(collection.to_csv(), Err(AdminError::EmptyResult));
    }
}
