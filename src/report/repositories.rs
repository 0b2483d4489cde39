//! Repository configuration reports in CSV and JSON.
//!
//! Each repository becomes one fixed-width row: twelve repository columns
//! followed by ten columns for each of the first two branch protection
//! rules. Missing rules leave their columns blank. When team access is
//! requested two more columns carry the team slug and its permission.

use indexmap::IndexMap;

use crate::github::models::BranchProtectionRule;
use crate::github::{AdminError, RepositoryNode, RepositoryPage, TeamAccess};

use super::model::RepositoryEntry;

const REPOSITORY_COLUMNS: [&str; 12] = [
    "Repository Name",
    "Default Branch",
    "Is Archived",
    "Is Private",
    "Is Empty",
    "Is Fork",
    "Parent Repo Name",
    "Merge Commit Allowed",
    "Squash Merge Allowed",
    "Rebase Merge Allowed",
    "Delete Branch On Merge",
    "URL",
];

const RULE_COLUMNS: [&str; 10] = [
    "Pattern",
    "Admin Enforced",
    "Requires Approving Reviews",
    "Required Approving Review Count",
    "Requires Code Owner Reviews",
    "Dismisses Stale Reviews",
    "Requires Commit Signatures",
    "Requires Linear History",
    "Requires Status Checks",
    "Requires Strict Status Checks",
];

const TEAM_COLUMNS: [&str; 2] = ["Team Name", "Team Permission"];

/// Number of branch protection rules flattened into each row.
pub const RULES_PER_ROW: usize = 2;

/// Serialises the surviving repositories as a JSON object keyed by name.
///
/// # Errors
///
/// Returns [`AdminError::EmptyResult`] when no repository survives
/// filtering, or [`AdminError::Io`] if serialisation fails.
pub fn generate_json(
    ignore_archived: bool,
    pages: &[RepositoryPage],
    team_access: Option<&TeamAccess>,
) -> Result<Vec<u8>, AdminError> {
    let entries: IndexMap<&str, RepositoryEntry<'_>> = surviving(ignore_archived, pages)
        .map(|node| (node.name.as_str(), RepositoryEntry::new(node, team_access)))
        .collect();
    if entries.is_empty() {
        return Err(AdminError::EmptyResult);
    }

    serde_json::to_vec_pretty(&entries).map_err(|error| AdminError::Io {
        message: format!("failed to serialise JSON report: {error}"),
    })
}

/// Serialises the surviving repositories as CSV rows.
///
/// # Errors
///
/// Returns [`AdminError::EmptyResult`] when no repository survives
/// filtering, or [`AdminError::Io`] if the CSV writer fails.
pub fn generate_csv(
    ignore_archived: bool,
    pages: &[RepositoryPage],
    team_access: Option<&TeamAccess>,
) -> Result<Vec<u8>, AdminError> {
    let rows: Vec<Vec<String>> = surviving(ignore_archived, pages)
        .map(|node| row(node, team_access))
        .collect();
    if rows.is_empty() {
        return Err(AdminError::EmptyResult);
    }

    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(header(team_access.is_some())).map_err(csv_error)?;
    for record in &rows {
        writer.write_record(record).map_err(csv_error)?;
    }
    writer.into_inner().map_err(|error| AdminError::Io {
        message: format!("failed to flush CSV report: {error}"),
    })
}

/// Returns the CSV header: 32 columns, or 34 with team columns.
#[must_use]
pub fn header(with_team: bool) -> Vec<String> {
    let mut columns: Vec<String> = REPOSITORY_COLUMNS
        .iter()
        .map(|&column| column.to_owned())
        .collect();
    for index in 1..=RULES_PER_ROW {
        columns.extend(
            RULE_COLUMNS
                .iter()
                .map(|column| format!("Rule {index} {column}")),
        );
    }
    if with_team {
        columns.extend(TEAM_COLUMNS.iter().map(|&column| column.to_owned()));
    }
    columns
}

fn surviving(
    ignore_archived: bool,
    pages: &[RepositoryPage],
) -> impl Iterator<Item = &RepositoryNode> {
    pages
        .iter()
        .flat_map(|page| page.nodes.iter())
        .filter(move |node| !(ignore_archived && node.is_archived))
}

fn row(node: &RepositoryNode, team_access: Option<&TeamAccess>) -> Vec<String> {
    let mut cells = vec![
        node.name.clone(),
        node.default_branch().unwrap_or_default().to_owned(),
        node.is_archived.to_string(),
        node.is_private.to_string(),
        node.is_empty.to_string(),
        node.is_fork.to_string(),
        node.parent
            .as_ref()
            .map(|parent| parent.name_with_owner.clone())
            .unwrap_or_default(),
        node.merge_commit_allowed.to_string(),
        node.squash_merge_allowed.to_string(),
        node.rebase_merge_allowed.to_string(),
        node.delete_branch_on_merge.to_string(),
        node.url.clone().unwrap_or_default(),
    ];

    for index in 0..RULES_PER_ROW {
        let rule = node.branch_protection_rules.nodes.get(index);
        cells.extend(rule.map(rule_cells).unwrap_or_default());
    }

    if let Some(access) = team_access {
        cells.push(access.team().to_owned());
        cells.push(access.permission_for(&node.name).to_owned());
    }
    cells
}

fn rule_cells(rule: &BranchProtectionRule) -> [String; 10] {
    [
        rule.pattern.clone(),
        rule.is_admin_enforced.to_string(),
        rule.requires_approving_reviews.to_string(),
        rule.required_approving_review_count
            .map(|count| count.to_string())
            .unwrap_or_default(),
        rule.requires_code_owner_reviews.to_string(),
        rule.dismisses_stale_reviews.to_string(),
        rule.requires_commit_signatures.to_string(),
        rule.requires_linear_history.to_string(),
        rule.requires_status_checks.to_string(),
        rule.requires_strict_status_checks.to_string(),
    ]
}

fn csv_error(error: csv::Error) -> AdminError {
    AdminError::Io {
        message: format!("failed to write CSV report: {error}"),
    }
}

#[cfg(test)]
mod tests {
    use rstest::{fixture, rstest};

    use super::{generate_csv, generate_json, header};
    use crate::github::models::test_support::{repository_page, signed_rule};
    use crate::github::{AdminError, RepositoryPage, TeamAccess};

    #[fixture]
    fn pages() -> Vec<RepositoryPage> {
        let mut page = repository_page(&[("alpha", false), ("legacy", true)], "c1", false);
        if let Some(alpha) = page.nodes.first_mut() {
            alpha.branch_protection_rules.nodes = vec![signed_rule("BPR_1", "main")];
        }
        vec![page]
    }

    fn team() -> TeamAccess {
        TeamAccess::new("platform", [("alpha".to_owned(), "admin".to_owned())])
    }

    fn lines(bytes: &[u8]) -> Vec<String> {
        String::from_utf8(bytes.to_vec())
            .expect("report should be UTF-8")
            .lines()
            .map(str::to_owned)
            .collect()
    }

    #[rstest]
    #[case(false, 32)]
    #[case(true, 34)]
    fn header_width_depends_on_team(#[case] with_team: bool, #[case] expected: usize) {
        assert_eq!(header(with_team).len(), expected);
    }

    #[rstest]
    fn csv_rows_are_fixed_width_with_blank_missing_rules(pages: Vec<RepositoryPage>) {
        let bytes = generate_csv(false, &pages, None).expect("report should generate");
        let rows = lines(&bytes);

        assert_eq!(rows.len(), 3);
        for line in &rows {
            assert_eq!(line.split(',').count(), 32, "row {line} has the wrong width");
        }
        let alpha = rows.get(1).expect("alpha row should exist");
        assert!(alpha.starts_with("alpha,"));
        assert!(alpha.contains(",main,false,false,,false,false,true,"));
        assert!(alpha.ends_with(",,,,,,,,,,"));
    }

    #[rstest]
    fn csv_ignore_archived_drops_rows(pages: Vec<RepositoryPage>) {
        let bytes = generate_csv(true, &pages, None).expect("report should generate");
        let rows = lines(&bytes);

        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|line| !line.starts_with("legacy,")));
    }

    #[rstest]
    fn csv_team_columns_carry_permission(pages: Vec<RepositoryPage>) {
        let access = team();
        let bytes = generate_csv(false, &pages, Some(&access)).expect("report should generate");
        let rows = lines(&bytes);

        assert_eq!(rows.get(1).map(|line| line.ends_with(",platform,admin")), Some(true));
        assert_eq!(rows.get(2).map(|line| line.ends_with(",platform,")), Some(true));
    }

    #[rstest]
    fn json_is_keyed_by_repository_name(pages: Vec<RepositoryPage>) {
        let access = team();
        let bytes = generate_json(false, &pages, Some(&access)).expect("report should generate");
        let value: serde_json::Value =
            serde_json::from_slice(&bytes).expect("report should be valid JSON");

        assert_eq!(value["alpha"]["teamPermission"], "admin");
        assert_eq!(value["legacy"]["isArchived"], true);
        assert_eq!(
            value["alpha"]["branchProtectionRules"]["nodes"][0]["requiresCommitSignatures"],
            true
        );
    }

    #[rstest]
    #[case(true)]
    #[case(false)]
    fn generation_is_deterministic(pages: Vec<RepositoryPage>, #[case] csv: bool) {
        let generate = if csv { generate_csv } else { generate_json };
        let first = generate(false, &pages, None).expect("report should generate");
        let second = generate(false, &pages, None).expect("report should generate");

        assert_eq!(first, second);
    }

    #[rstest]
    fn all_archived_is_an_empty_result() {
        let pages = vec![repository_page(&[("legacy", true)], "c1", false)];

        assert_eq!(generate_csv(true, &pages, None), Err(AdminError::EmptyResult));
        assert_eq!(generate_json(true, &pages, None), Err(AdminError::EmptyResult));
    }
}
