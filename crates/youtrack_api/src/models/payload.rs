//! Crash event payloads delivered to the hook.

use serde::{Deserialize, Serialize};

/// Represents an issue impact change reported by the crash monitor, including the issue title,
/// the method it was detected in, impact counters, the originating app and a link back to the
/// report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueImpactPayload {
    pub title: String,
    pub method: String,
    #[serde(default)]
    pub impact_level: u32,
    #[serde(default)]
    pub impacted_devices_count: u64,
    #[serde(default)]
    pub crashes_count: u64,
    #[serde(default)]
    pub app: AppInfo,
    pub url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppInfo {
    pub name: String,
    pub bundle_identifier: String,
}

#[cfg(test)]
mod tests {
    use super::IssueImpactPayload;
    use serde_json::json;

    #[test]
    fn deserializes_full_payload() {
        let payload: IssueImpactPayload = serde_json::from_value(json!({
            "title": "foo_title",
            "method": "method name",
            "impact_level": 1,
            "impacted_devices_count": 3,
            "crashes_count": 7,
            "app": { "name": "foo name", "bundle_identifier": "foo.bar.baz" },
            "url": "http://foo.com/bar"
        }))
        .unwrap();

        assert_eq!(payload.title, "foo_title");
        assert_eq!(payload.impacted_devices_count, 3);
        assert_eq!(payload.crashes_count, 7);
        assert_eq!(payload.app.bundle_identifier, "foo.bar.baz");
    }

    #[test]
    fn counters_and_app_default_when_absent() {
        let payload: IssueImpactPayload = serde_json::from_value(json!({
            "title": "t",
            "method": "m",
            "url": "http://foo.com"
        }))
        .unwrap();

        assert_eq!(payload.impact_level, 0);
        assert_eq!(payload.crashes_count, 0);
        assert!(payload.app.name.is_empty());
    }

    #[test]
    fn missing_title_is_rejected() {
        let result = serde_json::from_value::<IssueImpactPayload>(json!({
            "method": "m",
            "url": "http://foo.com"
        }));
        assert!(result.is_err());
    }
}
