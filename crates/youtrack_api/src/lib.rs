//! Crash report hook for YouTrack: session login, project verification and issue creation.

pub mod auth;
pub mod client;
pub mod config;
pub mod description;
pub mod error;
pub mod models;
pub mod service;

pub use auth::Session;
pub use client::YouTrackClient;
pub use config::{ClientOptions, ProjectConfig};
pub use description::issue_description_text;
pub use error::{Result, YouTrackError};
pub use models::{AppInfo, CreatedIssue, IssueImpactPayload};
pub use service::{Event, HookResponse, VerificationResult, YouTrackService};
