use std::time::Duration;

use reqwest::Url;
use serde::{Deserialize, Serialize};

use crate::error::{Result, YouTrackError};

pub const DEFAULT_USER_AGENT: &str = "crashlytics-youtrack-hook";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Represents the per-project settings a hook is configured with: tracker base URL, target
/// project and the credentials used to log in.
#[derive(Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ProjectConfig {
    pub base_url: String,
    pub project_id: String,
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for ProjectConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProjectConfig")
            .field("base_url", &self.base_url)
            .field("project_id", &self.project_id)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl ProjectConfig {
    pub fn new(
        base_url: impl Into<String>,
        project_id: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            project_id: project_id.into(),
            username: username.into(),
            password: password.into(),
        }
    }

    /// Builds config from a loosely-typed settings map; absent keys stay empty and are rejected
    /// by `validate`.
    pub fn from_value(value: &serde_json::Value) -> Result<Self> {
        if value.is_null() {
            return Ok(Self::default());
        }
        serde_json::from_value(value.clone())
            .map_err(|err| YouTrackError::Settings(err.to_string()))
    }

    /// Ensures every field needed to talk to the tracker is present.
    pub fn validate(&self) -> Result<()> {
        let fields = [
            ("base_url", &self.base_url),
            ("project_id", &self.project_id),
            ("username", &self.username),
            ("password", &self.password),
        ];
        let missing: Vec<&str> = fields
            .iter()
            .filter(|(_, value)| value.trim().is_empty())
            .map(|(name, _)| *name)
            .collect();
        if !missing.is_empty() {
            return Err(YouTrackError::Settings(format!(
                "missing {}",
                missing.join(", ")
            )));
        }
        self.base()?;
        Ok(())
    }

    /// Resolves a REST path below the configured base URL, one segment per element.
    pub fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        rest_url(&self.base_url, segments)
    }

    fn base(&self) -> Result<Url> {
        parse_base_url(&self.base_url)
    }
}

/// Joins path segments onto a tracker base URL, percent-encoding each segment.
pub fn rest_url(base_url: &str, segments: &[&str]) -> Result<Url> {
    let mut url = parse_base_url(base_url)?;
    url.path_segments_mut()
        .map_err(|_| YouTrackError::Settings(format!("base_url cannot be a base: {base_url}")))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

fn parse_base_url(base_url: &str) -> Result<Url> {
    let trimmed = base_url.trim().trim_end_matches('/');
    let url = Url::parse(trimmed)
        .map_err(|err| YouTrackError::Settings(format!("base_url {trimmed:?}: {err}")))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(YouTrackError::Settings(format!(
            "base_url must use http or https, got {other}"
        ))),
    }
}

/// Transport tuning applied to every request a service makes.
#[derive(Clone, Debug)]
pub struct ClientOptions {
    pub user_agent: String,
    pub timeout: Duration,
    pub connect_timeout: Duration,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            connect_timeout: Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS),
        }
    }
}

impl ClientOptions {
    pub fn with_user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = ua.into();
        self
    }

    pub fn with_timeout(mut self, duration: Duration) -> Self {
        self.timeout = duration;
        self
    }

    pub fn with_connect_timeout(mut self, duration: Duration) -> Self {
        self.connect_timeout = duration;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn config() -> ProjectConfig {
        ProjectConfig::new(
            "http://example-project.youtrack.com",
            "foo_project_id",
            "username",
            "password",
        )
    }

    #[test]
    fn complete_config_is_valid() {
        assert!(config().validate().is_ok());
    }

    #[test]
    fn empty_config_reports_every_missing_field() {
        let err = ProjectConfig::default().validate().unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid settings: missing base_url, project_id, username, password"
        );
    }

    #[test]
    fn whitespace_only_fields_count_as_missing() {
        let mut config = config();
        config.password = "   ".into();
        assert!(matches!(config.validate(), Err(YouTrackError::Settings(_))));
    }

    #[test]
    fn non_http_base_url_is_rejected() {
        let mut config = config();
        config.base_url = "ftp://example.com".into();
        assert!(matches!(config.validate(), Err(YouTrackError::Settings(_))));
    }

    #[test]
    fn endpoint_ignores_trailing_slash_and_keeps_base_path() {
        let mut config = config();
        config.base_url = "https://tracker.example.com/youtrack/".into();
        let url = config.endpoint(&["rest", "user", "login"]).unwrap();
        assert_eq!(url.as_str(), "https://tracker.example.com/youtrack/rest/user/login");
    }

    #[test]
    fn endpoint_encodes_project_id_as_one_segment() {
        let url = config().endpoint(&["rest", "admin", "project", "a/b c"]).unwrap();
        assert_eq!(
            url.as_str(),
            "http://example-project.youtrack.com/rest/admin/project/a%2Fb%20c"
        );
    }

    #[test]
    fn from_value_tolerates_missing_keys() {
        let parsed = ProjectConfig::from_value(&json!({ "base_url": "http://x" })).unwrap();
        assert_eq!(parsed.base_url, "http://x");
        assert!(parsed.project_id.is_empty());
        assert_eq!(ProjectConfig::from_value(&json!(null)).unwrap(), ProjectConfig::default());
    }

    #[test]
    fn from_value_rejects_non_object() {
        assert!(matches!(
            ProjectConfig::from_value(&json!(42)),
            Err(YouTrackError::Settings(_))
        ));
    }

    #[test]
    fn debug_output_hides_password() {
        let rendered = format!("{:?}", config());
        assert!(!rendered.contains("\"password\""));
        assert!(rendered.contains("<redacted>"));
    }
}
