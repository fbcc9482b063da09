//! Event and group context consumed from the external rule engine.
//!
//! These are the inputs a rule firing hands to the action; the rule engine
//! owns their lifecycle, this crate only reads them.

use chrono::{DateTime, Utc};
use std::collections::HashMap;

/// The aggregated issue an event belongs to.
#[derive(Debug, Clone)]
pub struct Group {
    pub id: u64,
    /// Short human-readable title, used as the notification headline.
    pub title: String,
    /// Code location or transaction the group is attributed to.
    pub culprit: Option<String>,
    /// Deep link back to the group in the monitoring UI.
    pub permalink: Option<String>,
}

/// A single matched event within a group.
#[derive(Debug, Clone)]
pub struct Event {
    pub group: Group,
    /// Tag key/value pairs attached to the event.
    pub tags: HashMap<String, String>,
    pub timestamp: DateTime<Utc>,
}

impl Event {
    /// Tag value for a key, if the event carries it.
    pub fn tag(&self, key: &str) -> Option<&str> {
        self.tags.get(key).map(String::as_str)
    }
}
