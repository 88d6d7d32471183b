//! Hook service that reports crash events to a YouTrack project.
//!
//! The service is stateless: every call validates the given configuration,
//! logs in, performs one authenticated request and drops the session.
//! Verification never fails outright, it always resolves to a
//! [`VerificationResult`]; issue submission returns an error on any failure.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use serde_json::Value;
use tracing::{info, warn};

use crate::client::YouTrackClient;
use crate::config::{ClientOptions, ProjectConfig};
use crate::description::issue_description_text;
use crate::error::{Result, YouTrackError};
use crate::models::{CreatedIssue, IssueImpactPayload};

pub const SERVICE_TITLE: &str = "YouTrack";
pub const ISSUE_SUMMARY_PREFIX: &str = "[Crashlytics] ";

pub const VERIFICATION_SUCCESS_MESSAGE: &str = "Successfully connected to your YouTrack project!";
pub const VERIFICATION_PROJECT_FAILURE_MESSAGE: &str =
    "Oops! Please check your YouTrack settings again.";
pub const VERIFICATION_SETTINGS_FAILURE_MESSAGE: &str = "Oops! Please check your settings again.";

/// Outcome of a settings check, shown to whoever configured the hook.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VerificationResult {
    pub success: bool,
    pub message: String,
}

impl VerificationResult {
    fn new(success: bool, message: &str) -> Self {
        Self {
            success,
            message: message.to_string(),
        }
    }
}

/// Events the hook framework can deliver to this service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    Verification,
    IssueImpactChange,
}

impl Event {
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::Verification => "verification",
            Event::IssueImpactChange => "issue_impact_change",
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Event {
    type Err = YouTrackError;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim() {
            "verification" => Ok(Event::Verification),
            "issue_impact_change" => Ok(Event::IssueImpactChange),
            other => Err(YouTrackError::UnsupportedEvent(other.to_string())),
        }
    }
}

/// Response handed back to the hook framework for a dispatched event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum HookResponse {
    Verification(VerificationResult),
    Issue(CreatedIssue),
}

#[derive(Debug, Clone, Default)]
pub struct YouTrackService {
    options: ClientOptions,
}

impl YouTrackService {
    pub fn new(options: ClientOptions) -> Self {
        Self { options }
    }

    pub fn title(&self) -> &'static str {
        SERVICE_TITLE
    }

    /// Checks that the credentials work and the configured project exists.
    pub async fn receive_verification(&self, config: &ProjectConfig) -> VerificationResult {
        match self.check_project(config).await {
            Ok(()) => {
                info!(project = %config.project_id, "youtrack settings verified");
                VerificationResult::new(true, VERIFICATION_SUCCESS_MESSAGE)
            }
            Err(err @ YouTrackError::Http { .. }) => {
                warn!(error = %err, "youtrack project lookup failed");
                VerificationResult::new(false, VERIFICATION_PROJECT_FAILURE_MESSAGE)
            }
            Err(
                err @ (YouTrackError::Settings(_)
                | YouTrackError::Authentication(_)
                | YouTrackError::Timeout(_)
                | YouTrackError::Network(_)
                | YouTrackError::Serialization(_)
                | YouTrackError::MissingLocation
                | YouTrackError::UnsupportedEvent(_)
                | YouTrackError::Other(_)),
            ) => {
                warn!(error = %err, "youtrack verification failed");
                VerificationResult::new(false, VERIFICATION_SETTINGS_FAILURE_MESSAGE)
            }
        }
    }

    /// Opens a YouTrack issue for a crash event and returns its location.
    pub async fn receive_issue_impact_change(
        &self,
        config: &ProjectConfig,
        payload: &IssueImpactPayload,
    ) -> Result<CreatedIssue> {
        let client = YouTrackClient::new(config.clone(), &self.options)?;
        let session = client.login().await?.ok_or_else(|| {
            YouTrackError::Authentication(format!("login rejected for {}", config.username))
        })?;

        let summary = format!("{}{}", ISSUE_SUMMARY_PREFIX, payload.title);
        let description = issue_description_text(payload);
        let created = client.create_issue(&session, &summary, &description).await?;

        info!(
            project = %config.project_id,
            url = %created.youtrack_issue_url,
            "youtrack issue created"
        );
        Ok(created)
    }

    /// Routes a raw hook delivery to the matching `receive_*` operation.
    pub async fn receive(
        &self,
        event: &str,
        config: &Value,
        payload: &Value,
    ) -> Result<HookResponse> {
        let event = event.parse::<Event>()?;
        match event {
            Event::Verification => {
                let verification = match ProjectConfig::from_value(config) {
                    Ok(config) => self.receive_verification(&config).await,
                    Err(err) => {
                        warn!(error = %err, "youtrack verification failed");
                        VerificationResult::new(false, VERIFICATION_SETTINGS_FAILURE_MESSAGE)
                    }
                };
                Ok(HookResponse::Verification(verification))
            }
            Event::IssueImpactChange => {
                let config = ProjectConfig::from_value(config)?;
                let payload: IssueImpactPayload = serde_json::from_value(payload.clone())?;
                let created = self.receive_issue_impact_change(&config, &payload).await?;
                Ok(HookResponse::Issue(created))
            }
        }
    }

    async fn check_project(&self, config: &ProjectConfig) -> Result<()> {
        let client = YouTrackClient::new(config.clone(), &self.options)?;
        let session = client.login().await?.ok_or_else(|| {
            YouTrackError::Authentication(format!("login rejected for {}", config.username))
        })?;
        client.verify_project(&session).await
    }
}
