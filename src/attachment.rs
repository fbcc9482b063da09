//! Slack attachment payload and its stock builder.
//!
//! The attachment shape is the vendor's legacy message format: one colored
//! block with a title, optional short fields and a footer. Embedders with
//! richer rendering needs build their own `Attachment` values and hand them
//! to the notifier; `build_attachment` is the default used by the rule
//! action.

use crate::event::Event;
use serde::Serialize;
use std::collections::BTreeSet;

/// Accent color for rule-triggered notifications.
const ATTACHMENT_COLOR: &str = "#e03e2f";

/// A single short field inside an attachment.
#[derive(Debug, Clone, Serialize)]
pub struct AttachmentField {
    pub title: String,
    pub value: String,
    pub short: bool,
}

/// Slack message attachment.
#[derive(Debug, Clone, Serialize)]
pub struct Attachment {
    /// Plain-text summary for clients that cannot render attachments.
    pub fallback: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title_link: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<AttachmentField>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub footer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ts: Option<i64>,
}

/// Build the stock attachment for a rule firing.
///
/// `tags` selects which event tags appear as short fields, in sorted order
/// so repeated firings render identically. `rules` names every rule whose
/// firing was coalesced into this notification.
pub fn build_attachment(event: &Event, tags: &BTreeSet<String>, rules: &[String]) -> Attachment {
    let fields = tags
        .iter()
        .filter_map(|key| {
            event.tag(key).map(|value| AttachmentField {
                title: key.clone(),
                value: value.to_string(),
                short: true,
            })
        })
        .collect();

    let footer = if rules.is_empty() {
        None
    } else {
        Some(format!("via {}", rules.join(", ")))
    };

    Attachment {
        fallback: event.group.title.clone(),
        title: event.group.title.clone(),
        title_link: event.group.permalink.clone(),
        text: event.group.culprit.clone(),
        color: Some(ATTACHMENT_COLOR.to_string()),
        fields,
        footer,
        ts: Some(event.timestamp.timestamp()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::Group;
    use chrono::{TimeZone, Utc};
    use std::collections::HashMap;

    fn make_event() -> Event {
        Event {
            group: Group {
                id: 7,
                title: "Connection pool exhausted".to_string(),
                culprit: Some("db/pool".to_string()),
                permalink: Some("https://monitor.example.com/issues/7/".to_string()),
            },
            tags: HashMap::from([
                ("environment".to_string(), "production".to_string()),
                ("server".to_string(), "web-3".to_string()),
            ]),
            timestamp: Utc.with_ymd_and_hms(2026, 7, 1, 9, 0, 0).unwrap(),
        }
    }

    #[test]
    fn attachment_carries_group_context() {
        let event = make_event();
        let attachment = build_attachment(&event, &BTreeSet::new(), &[]);

        assert_eq!(attachment.fallback, "Connection pool exhausted");
        assert_eq!(attachment.title, "Connection pool exhausted");
        assert_eq!(
            attachment.title_link.as_deref(),
            Some("https://monitor.example.com/issues/7/")
        );
        assert_eq!(attachment.text.as_deref(), Some("db/pool"));
        assert_eq!(attachment.ts, Some(event.timestamp.timestamp()));
    }

    #[test]
    fn configured_tags_become_short_fields_in_sorted_order() {
        let event = make_event();
        let tags = BTreeSet::from([
            "server".to_string(),
            "environment".to_string(),
            "user".to_string(), // not on the event, skipped
        ]);

        let attachment = build_attachment(&event, &tags, &[]);

        assert_eq!(attachment.fields.len(), 2);
        assert_eq!(attachment.fields[0].title, "environment");
        assert_eq!(attachment.fields[0].value, "production");
        assert_eq!(attachment.fields[1].title, "server");
        assert!(attachment.fields.iter().all(|f| f.short));
    }

    #[test]
    fn footer_names_coalesced_rules() {
        let event = make_event();
        let rules = vec!["db-errors".to_string(), "prod-alerts".to_string()];

        let attachment = build_attachment(&event, &BTreeSet::new(), &rules);
        assert_eq!(attachment.footer.as_deref(), Some("via db-errors, prod-alerts"));

        let no_rules = build_attachment(&event, &BTreeSet::new(), &[]);
        assert_eq!(no_rules.footer, None);
    }

    #[test]
    fn serialization_omits_absent_fields() {
        let event = Event {
            group: Group {
                id: 1,
                title: "Bare".to_string(),
                culprit: None,
                permalink: None,
            },
            tags: HashMap::new(),
            timestamp: Utc.with_ymd_and_hms(2026, 7, 1, 9, 0, 0).unwrap(),
        };

        let attachment = build_attachment(&event, &BTreeSet::new(), &[]);
        let json = serde_json::to_string(&attachment).unwrap();

        assert!(json.contains("\"fallback\":\"Bare\""));
        assert!(!json.contains("title_link"));
        assert!(!json.contains("\"text\""));
        assert!(!json.contains("fields"));
        assert!(!json.contains("footer"));
    }
}
