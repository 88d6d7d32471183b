mod issue;
mod payload;

pub use issue::CreatedIssue;
pub use payload::{AppInfo, IssueImpactPayload};
