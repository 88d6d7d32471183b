//! Issue body text rendered from crash event payloads.

use crate::models::IssueImpactPayload;

/// Renders the description of a newly reported issue.
pub fn issue_description_text(payload: &IssueImpactPayload) -> String {
    let users_text = match payload.impacted_devices_count {
        1 => "at least 1 user who has crashed".to_string(),
        count => format!("at least {count} users who have crashed"),
    };
    let crashes_text = match payload.crashes_count {
        1 => "at least 1 time".to_string(),
        count => format!("at least {count} times"),
    };

    format!(
        "Crashlytics detected a new issue.\n{} in {}\n\n\
         This issue is affecting {} {}.\n\n\
         More information: {}",
        payload.title, payload.method, users_text, crashes_text, payload.url
    )
}

#[cfg(test)]
mod tests {
    use super::issue_description_text;
    use crate::models::{AppInfo, IssueImpactPayload};

    fn payload() -> IssueImpactPayload {
        IssueImpactPayload {
            title: "foo_title".into(),
            method: "method name".into(),
            impact_level: 1,
            impacted_devices_count: 1,
            crashes_count: 1,
            app: AppInfo {
                name: "foo name".into(),
                bundle_identifier: "foo.bar.baz".into(),
            },
            url: "http://foo.com/bar".into(),
        }
    }

    #[test]
    fn singular_message_for_one_impacted_device() {
        let text = issue_description_text(&payload());
        assert!(text.contains("at least 1 user who"));
        assert!(!text.contains("1 users"));
    }

    #[test]
    fn plural_message_for_multiple_impacted_devices() {
        let text = issue_description_text(&IssueImpactPayload {
            impacted_devices_count: 2,
            ..payload()
        });
        assert!(text.contains("at least 2 users"));
    }

    #[test]
    fn singular_message_for_one_crash() {
        let text = issue_description_text(&payload());
        assert!(text.contains("at least 1 time."));
    }

    #[test]
    fn plural_message_for_multiple_crashes() {
        let text = issue_description_text(&IssueImpactPayload {
            crashes_count: 2,
            ..payload()
        });
        assert!(text.contains("at least 2 times"));
    }

    #[test]
    fn zero_counts_use_plural_phrasing() {
        let text = issue_description_text(&IssueImpactPayload {
            impacted_devices_count: 0,
            crashes_count: 0,
            ..payload()
        });
        assert!(text.contains("at least 0 users"));
        assert!(text.contains("at least 0 times"));
    }

    #[test]
    fn payload_fields_appear_verbatim() {
        let text = issue_description_text(&IssueImpactPayload {
            title: "fake_title".into(),
            method: "fake_method".into(),
            url: "http://example.com/foobar".into(),
            ..payload()
        });
        assert!(text.contains("fake_title"));
        assert!(text.contains("fake_method"));
        assert!(text.contains("http://example.com/foobar"));
    }

    #[test]
    fn output_is_deterministic() {
        assert_eq!(issue_description_text(&payload()), issue_description_text(&payload()));
    }
}
