//! Checks whether the running build matches the latest GitHub release.

use chrono::DateTime;
use serde::{Deserialize, Deserializer};
use std::cmp::Ordering;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, error, info, warn};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
const MAX_ATTEMPTS: u32 = 3;
const MAX_NOTES_LENGTH: usize = 500;
const VERSION_PREFIXES: &[&str] = &["version", "release", "tag", "v"];

#[derive(Error, Debug)]
pub enum UpdateError {
    #[error("invalid GitHub repository URL: {0}")]
    InvalidRepoUrl(String),

    #[error("repository not found or no releases available (HTTP 404)")]
    NotFound,

    #[error("API rate limit exceeded (HTTP 403)")]
    RateLimited,

    #[error("unexpected HTTP status {0}")]
    Status(u16),

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("invalid version format: {0}")]
    InvalidVersion(String),
}

impl UpdateError {
    fn from_status(status: reqwest::StatusCode) -> Self {
        match status.as_u16() {
            404 => UpdateError::NotFound,
            403 => UpdateError::RateLimited,
            other => UpdateError::Status(other),
        }
    }

    /// Statuses that will not change by asking again.
    fn is_final(&self) -> bool {
        matches!(
            self,
            UpdateError::NotFound | UpdateError::RateLimited | UpdateError::InvalidRepoUrl(_)
        )
    }
}

/// Subset of GitHub's release payload. Absent and `null` fields both fall
/// back to their defaults.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct ReleaseInfo {
    #[serde(default = "unknown_tag", deserialize_with = "tag_or_unknown")]
    pub tag_name: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub html_url: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub published_at: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub body: String,
}

fn unknown_tag() -> String {
    "unknown".to_string()
}

fn tag_or_unknown<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_else(unknown_tag))
}

fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

impl ReleaseInfo {
    pub fn truncated_body(&self) -> String {
        match self.body.char_indices().nth(MAX_NOTES_LENGTH) {
            Some((cut, _)) => format!("{}...", &self.body[..cut]),
            None => self.body.clone(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UpdateStatus {
    UpToDate,
    Outdated,
    Ahead,
}

#[derive(Clone, Debug)]
pub struct VersionComparison {
    pub status: UpdateStatus,
    pub current_version: String,
    pub latest_version: String,
    pub current_normalized: String,
    pub latest_normalized: String,
    pub release: ReleaseInfo,
}

impl VersionComparison {
    pub fn message(&self) -> String {
        match self.status {
            UpdateStatus::UpToDate => format!(
                "The bot is up to date. Version: v{}",
                self.current_version
            ),
            UpdateStatus::Outdated => format!(
                "A newer release is available. Current: v{}, Latest: {}",
                self.current_version, self.latest_version
            ),
            UpdateStatus::Ahead => format!(
                "The bot is ahead of the latest release. Current: v{}, Latest: {}",
                self.current_version, self.latest_version
            ),
        }
    }
}

/// Converts a repository URL into its "latest release" API endpoint.
pub fn releases_api_url(repo_url: &str) -> Result<String, UpdateError> {
    let invalid = || UpdateError::InvalidRepoUrl(repo_url.to_string());
    let trimmed = repo_url.trim().trim_end_matches('/');

    let path = match trimmed.find("github.com") {
        Some(index) => {
            let rest = &trimmed[index + "github.com".len()..];
            rest.strip_prefix('/')
                .or_else(|| rest.strip_prefix(':'))
                .ok_or_else(invalid)?
        }
        None if !trimmed.contains(':') => trimmed,
        None => return Err(invalid()),
    };

    let mut segments = path.split('/');
    let (Some(owner), Some(repo), None) = (segments.next(), segments.next(), segments.next())
    else {
        return Err(invalid());
    };
    let repo = repo.strip_suffix(".git").unwrap_or(repo);
    if owner.is_empty() || repo.is_empty() {
        return Err(invalid());
    }

    Ok(format!(
        "https://api.github.com/repos/{owner}/{repo}/releases/latest"
    ))
}

/// Strips tag decorations such as `v`, `release-` or `Version ` from a version string.
pub fn normalize_version(raw: &str) -> String {
    let mut normalized = raw.trim();

    let lowered = normalized.to_ascii_lowercase();
    if let Some(prefix) = VERSION_PREFIXES
        .iter()
        .find(|prefix| lowered.starts_with(*prefix))
    {
        normalized = normalized[prefix.len()..].trim_start_matches([' ', '-', '_']);
    }

    let normalized = normalized.trim_start_matches(|c: char| !c.is_ascii_digit());
    if normalized.is_empty() {
        "0.0.0".to_string()
    } else {
        normalized.to_string()
    }
}

/// Numeric release segment of a normalized version, e.g. `1.2.3` of `1.2.3rc1`.
fn release_segment(normalized: &str) -> Result<Vec<u64>, UpdateError> {
    let end = normalized
        .find(|c: char| !c.is_ascii_digit() && c != '.')
        .unwrap_or(normalized.len());
    let segment = normalized[..end].trim_end_matches('.');
    if segment.is_empty() {
        return Err(UpdateError::InvalidVersion(normalized.to_string()));
    }

    segment
        .split('.')
        .map(|part| {
            part.parse::<u64>()
                .map_err(|_| UpdateError::InvalidVersion(normalized.to_string()))
        })
        .collect()
}

pub fn compare_versions(current: &str, latest: &str) -> Result<Ordering, UpdateError> {
    let current = release_segment(current)?;
    let latest = release_segment(latest)?;
    let width = current.len().max(latest.len());
    let padded = |parts: &[u64]| {
        let mut parts = parts.to_vec();
        parts.resize(width, 0);
        parts
    };
    Ok(padded(&current).cmp(&padded(&latest)))
}

pub fn compare(
    current_version: &str,
    release: ReleaseInfo,
) -> Result<VersionComparison, UpdateError> {
    let current_normalized = normalize_version(current_version);
    let latest_normalized = normalize_version(&release.tag_name);

    let status = match compare_versions(&current_normalized, &latest_normalized)? {
        Ordering::Less => UpdateStatus::Outdated,
        Ordering::Greater => UpdateStatus::Ahead,
        Ordering::Equal => UpdateStatus::UpToDate,
    };

    Ok(VersionComparison {
        status,
        current_version: current_version.to_string(),
        latest_version: release.tag_name.clone(),
        current_normalized,
        latest_normalized,
        release,
    })
}

/// Formats an ISO-8601 timestamp as `m/d/yyyy`.
pub fn format_date(iso: &str) -> String {
    if iso.is_empty() {
        return "Unknown".to_string();
    }

    DateTime::parse_from_rfc3339(iso)
        .map(|date| date.format("%-m/%-d/%Y").to_string())
        .unwrap_or_else(|_| "Invalid Date".to_string())
}

pub struct ReleaseChecker {
    client: reqwest::Client,
    api_url: String,
}

impl ReleaseChecker {
    pub fn new(repo_url: &str) -> Result<Self, UpdateError> {
        let api_url = releases_api_url(repo_url)?;
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(format!(
                "{}/{} ({repo_url})",
                crate::config::BOT_NAME,
                crate::config::VERSION
            ))
            .build()?;

        Ok(Self { client, api_url })
    }

    pub async fn latest_release(&self) -> Result<ReleaseInfo, UpdateError> {
        let mut attempt = 0;
        loop {
            attempt += 1;
            match self.fetch().await {
                Ok(release) => return Ok(release),
                Err(err) if err.is_final() || attempt >= MAX_ATTEMPTS => {
                    error!("release lookup failed after {attempt} attempt(s): {err}");
                    return Err(err);
                }
                Err(err) => {
                    warn!("release lookup attempt {attempt} failed: {err}");
                    tokio::time::sleep(Duration::from_secs(1 << (attempt - 1))).await;
                }
            }
        }
    }

    async fn fetch(&self) -> Result<ReleaseInfo, UpdateError> {
        let response = self
            .client
            .get(&self.api_url)
            .header(reqwest::header::ACCEPT, "application/vnd.github.v3+json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(UpdateError::from_status(status));
        }

        Ok(response.json::<ReleaseInfo>().await?)
    }
}

/// Looks up the latest release of `repo_url` and logs how the running build compares.
pub async fn check_for_updates(repo_url: &str) {
    info!("checking for updates");

    let result = async {
        let checker = ReleaseChecker::new(repo_url)?;
        let release = checker.latest_release().await?;
        compare(crate::config::VERSION, release)
    }
    .await;

    let comparison = match result {
        Ok(comparison) => comparison,
        Err(err) => {
            error!("failed to check for updates: {err}");
            return;
        }
    };

    debug!(
        current = %comparison.current_normalized,
        latest = %comparison.latest_normalized,
        "compared release versions"
    );
    match comparison.status {
        UpdateStatus::Outdated => warn!("{}", comparison.message()),
        UpdateStatus::UpToDate | UpdateStatus::Ahead => info!("{}", comparison.message()),
    }

    let release = &comparison.release;
    if !release.html_url.is_empty() {
        info!("release URL: {}", release.html_url);
        if !release.name.is_empty() {
            info!("release name: {}", release.name);
        }
        if !release.published_at.is_empty() {
            info!("published: {}", format_date(&release.published_at));
        }
    }
    if comparison.status == UpdateStatus::Outdated && !release.body.is_empty() {
        info!("release notes: {}", release.truncated_body());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn release(tag: &str) -> ReleaseInfo {
        ReleaseInfo {
            tag_name: tag.to_string(),
            name: String::new(),
            html_url: String::new(),
            published_at: String::new(),
            body: String::new(),
        }
    }

    #[test]
    fn test_releases_api_url() {
        let expected = "https://api.github.com/repos/owner/repo/releases/latest";
        for url in [
            "https://github.com/owner/repo",
            "https://github.com/owner/repo/",
            "https://github.com/owner/repo.git",
            "git@github.com:owner/repo.git",
            "owner/repo",
        ] {
            assert_eq!(releases_api_url(url).unwrap(), expected, "{url}");
        }
    }

    #[test]
    fn test_releases_api_url_rejects_garbage() {
        for url in [
            "https://gitlab.com/owner/repo",
            "https://github.com/owner",
            "owner",
            "https://github.com/owner/repo/tree/main",
        ] {
            assert!(
                matches!(releases_api_url(url), Err(UpdateError::InvalidRepoUrl(_))),
                "{url}"
            );
        }
    }

    #[test]
    fn test_normalize_version() {
        assert_eq!(normalize_version("v1.2.3"), "1.2.3");
        assert_eq!(normalize_version("Version 0.9"), "0.9");
        assert_eq!(normalize_version("release-2.0"), "2.0");
        assert_eq!(normalize_version("tag_1.0.1"), "1.0.1");
        assert_eq!(normalize_version("  0.9  "), "0.9");
        assert_eq!(normalize_version("latest"), "0.0.0");
        assert_eq!(normalize_version(""), "0.0.0");
    }

    #[test]
    fn test_compare_versions_pads_segments() {
        assert_eq!(compare_versions("1.0", "1.0.0").unwrap(), Ordering::Equal);
        assert_eq!(compare_versions("0.9", "0.10").unwrap(), Ordering::Less);
        assert_eq!(compare_versions("2.0.1", "2.0").unwrap(), Ordering::Greater);
        assert_eq!(compare_versions("1.2.3rc1", "1.2.3").unwrap(), Ordering::Equal);
    }

    #[test]
    fn test_compare_statuses() {
        assert_eq!(compare("0.9.0", release("v1.0")).unwrap().status, UpdateStatus::Outdated);
        assert_eq!(compare("0.9.0", release("v0.9")).unwrap().status, UpdateStatus::UpToDate);
        assert_eq!(compare("1.1.0", release("v1.0.5")).unwrap().status, UpdateStatus::Ahead);
    }

    #[test]
    fn test_compare_invalid_version() {
        let err = compare("0.9.0", release("v1..2")).unwrap_err();
        assert!(matches!(err, UpdateError::InvalidVersion(_)));
    }

    #[test]
    fn test_outdated_message_names_both_versions() {
        let comparison = compare("0.9.0", release("v1.0")).unwrap();
        let message = comparison.message();
        assert!(message.contains("v0.9.0"));
        assert!(message.contains("v1.0"));
    }

    #[test]
    fn test_truncated_body() {
        let mut info = release("v1");
        info.body = "a".repeat(MAX_NOTES_LENGTH);
        assert_eq!(info.truncated_body(), info.body);

        info.body = "é".repeat(MAX_NOTES_LENGTH + 1);
        let truncated = info.truncated_body();
        assert!(truncated.ends_with("..."));
        assert_eq!(truncated.chars().count(), MAX_NOTES_LENGTH + 3);
    }

    #[test]
    fn test_format_date() {
        assert_eq!(format_date("2025-06-01T09:11:43Z"), "6/1/2025");
        assert_eq!(format_date(""), "Unknown");
        assert_eq!(format_date("yesterday"), "Invalid Date");
    }

    #[test]
    fn test_release_json_defaults() {
        let info: ReleaseInfo =
            serde_json::from_str(r#"{"html_url": "https://github.com/o/r/releases/1"}"#).unwrap();
        assert_eq!(info.tag_name, "unknown");
        assert_eq!(info.name, "");
        assert_eq!(info.html_url, "https://github.com/o/r/releases/1");
    }

    #[test]
    fn test_release_json_null_fields() {
        let info: ReleaseInfo = serde_json::from_str(
            r#"{
                "tag_name": null,
                "name": null,
                "html_url": "https://github.com/o/r/releases/2",
                "published_at": null,
                "body": null
            }"#,
        )
        .unwrap();
        assert_eq!(info.tag_name, "unknown");
        assert_eq!(info.name, "");
        assert_eq!(info.published_at, "");
        assert_eq!(info.body, "");
        assert_eq!(info.truncated_body(), "");
    }

    #[test]
    fn test_status_errors() {
        assert!(matches!(
            UpdateError::from_status(reqwest::StatusCode::NOT_FOUND),
            UpdateError::NotFound
        ));
        assert!(UpdateError::from_status(reqwest::StatusCode::FORBIDDEN).is_final());
        assert!(!UpdateError::from_status(reqwest::StatusCode::BAD_GATEWAY).is_final());
    }
}
