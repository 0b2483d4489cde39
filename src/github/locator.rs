//! Identity wrappers for organisations, repositories, tokens, and API hosts.

use url::Url;

use super::error::AdminError;

/// Public GitHub REST/GraphQL API base.
pub const DEFAULT_API_BASE: &str = "https://api.github.com";

/// Organisation login wrapper to avoid stringly typed parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrganizationName(String);

impl OrganizationName {
    /// Validates that the organisation login is non-empty.
    ///
    /// # Errors
    ///
    /// Returns [`AdminError::MissingOrganization`] when the value is blank.
    pub fn new(value: &str) -> Result<Self, AdminError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(AdminError::MissingOrganization);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the organisation login.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

/// Repository name wrapper to prevent parameter mix-ups.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RepositoryName(String);

impl RepositoryName {
    /// Validates that the repository name is non-empty.
    ///
    /// # Errors
    ///
    /// Returns [`AdminError::Configuration`] when the value is blank.
    pub fn new(value: &str) -> Result<Self, AdminError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(AdminError::Configuration {
                message: "repository name must not be empty".to_owned(),
            });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the repository name.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

/// Personal access token wrapper enforcing presence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonalAccessToken(String);

impl PersonalAccessToken {
    /// Validates that the token is non-empty and trims whitespace.
    ///
    /// # Errors
    ///
    /// Returns `AdminError::MissingToken` when the supplied string is blank.
    pub fn new(token: impl AsRef<str>) -> Result<Self, AdminError> {
        let trimmed = token.as_ref().trim();
        if trimmed.is_empty() {
            return Err(AdminError::MissingToken);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the token value.
    #[must_use]
    pub const fn value(&self) -> &str {
        self.0.as_str()
    }
}

impl AsRef<str> for PersonalAccessToken {
    fn as_ref(&self) -> &str {
        self.value()
    }
}

/// Organisation plus the API base URL used to reach it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrganizationLocator {
    api_base: Url,
    organization: OrganizationName,
}

impl OrganizationLocator {
    /// Creates a locator for an organisation on github.com.
    ///
    /// # Errors
    ///
    /// Returns [`AdminError::MissingOrganization`] when the login is blank.
    pub fn new(organization: &str) -> Result<Self, AdminError> {
        Self::with_api_base(organization, DEFAULT_API_BASE)
    }

    /// Creates a locator for an organisation behind a custom API base, such
    /// as a GitHub Enterprise Server `https://host/api/v3` endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`AdminError::InvalidUrl`] when the base cannot be parsed or
    /// uses a scheme other than HTTP(S), and
    /// [`AdminError::MissingOrganization`] when the login is blank.
    pub fn with_api_base(organization: &str, api_base: &str) -> Result<Self, AdminError> {
        let parsed =
            Url::parse(api_base).map_err(|error| AdminError::InvalidUrl(error.to_string()))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(AdminError::InvalidUrl(format!(
                "unsupported scheme '{}'",
                parsed.scheme()
            )));
        }

        Ok(Self {
            api_base: parsed,
            organization: OrganizationName::new(organization)?,
        })
    }

    /// Returns the API base URL.
    #[must_use]
    pub const fn api_base(&self) -> &Url {
        &self.api_base
    }

    /// Returns the organisation login.
    #[must_use]
    pub const fn organization(&self) -> &OrganizationName {
        &self.organization
    }

    /// REST route listing a repository's webhooks.
    #[must_use]
    pub fn hooks_path(&self, repository: &RepositoryName) -> String {
        format!(
            "/repos/{}/{}/hooks",
            self.organization.as_str(),
            repository.as_str()
        )
    }

    /// REST route addressing a single webhook.
    #[must_use]
    pub fn hook_path(&self, repository: &RepositoryName, hook_id: u64) -> String {
        format!("{}/{hook_id}", self.hooks_path(repository))
    }

    /// REST route toggling Dependabot vulnerability alerts.
    #[must_use]
    pub fn vulnerability_alerts_path(&self, repository: &RepositoryName) -> String {
        format!(
            "/repos/{}/{}/vulnerability-alerts",
            self.organization.as_str(),
            repository.as_str()
        )
    }

    /// REST route toggling Dependabot security updates.
    #[must_use]
    pub fn automated_security_fixes_path(&self, repository: &RepositoryName) -> String {
        format!(
            "/repos/{}/{}/automated-security-fixes",
            self.organization.as_str(),
            repository.as_str()
        )
    }

    /// REST route listing a team's repositories.
    #[must_use]
    pub fn team_repos_path(&self, team_slug: &str) -> String {
        format!(
            "/orgs/{}/teams/{team_slug}/repos",
            self.organization.as_str()
        )
    }
}
