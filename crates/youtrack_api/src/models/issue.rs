use serde::{Deserialize, Serialize};

/// Represents an issue created in YouTrack, identified by the location the tracker returned for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedIssue {
    pub youtrack_issue_url: String,
}
