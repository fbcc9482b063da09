//! The rule action orchestrator.
//!
//! One evaluation per inbound event: look up the stored integration, build
//! the coalescing key and hand the external scheduler a task descriptor.
//! Rules may reference removed integrations harmlessly - the action skips
//! them without error.

use crate::attachment::build_attachment;
use crate::config::{form_fields, FieldSpec, RuleConfig};
use crate::error::NotifyError;
use crate::event::Event;
use crate::integration::{IntegrationStore, OrganizationId, PROVIDER};
use crate::notify::SlackNotifier;
use std::collections::BTreeSet;
use std::sync::Arc;

/// Deferred unit of work handed to the external scheduler.
///
/// Tasks with the same `key` target the same (integration, channel) pair
/// and may be coalesced upstream into a single notification; the scheduler
/// then invokes [`dispatch`](NotificationTask::dispatch) once with the
/// names of every coalesced rule.
#[derive(Debug, Clone)]
pub struct NotificationTask {
    /// Coalescing key: `slack:{integration_id}:{channel_id}`.
    pub key: String,
    integration: crate::integration::Integration,
    channel_id: String,
    tags: BTreeSet<String>,
    rule: String,
}

impl NotificationTask {
    /// Name of the rule that produced this task.
    pub fn rule(&self) -> &str {
        &self.rule
    }

    /// Build the attachment and post it with the integration credentials.
    ///
    /// `rules` names every rule whose task was coalesced under this key;
    /// when the scheduler passes none, the owning rule is used.
    pub async fn dispatch(
        &self,
        notifier: &SlackNotifier,
        event: &Event,
        rules: &[String],
    ) -> Result<(), NotifyError> {
        let rules = if rules.is_empty() {
            std::slice::from_ref(&self.rule)
        } else {
            rules
        };
        let attachment = build_attachment(event, &self.tags, rules);
        notifier
            .send(&self.integration, &self.channel_id, &[attachment])
            .await
    }
}

/// Rule action that posts a notification to a Slack workspace when a rule
/// matches.
pub struct SlackNotifyAction {
    store: Arc<dyn IntegrationStore>,
    organization: OrganizationId,
    rule: String,
    config: RuleConfig,
}

impl SlackNotifyAction {
    pub fn new(
        store: Arc<dyn IntegrationStore>,
        organization: OrganizationId,
        rule: impl Into<String>,
        config: RuleConfig,
    ) -> Self {
        Self {
            store,
            organization,
            rule: rule.into(),
            config,
        }
    }

    /// True iff the organization has at least one Slack integration.
    pub fn is_enabled(&self) -> bool {
        !self.store.list(PROVIDER, self.organization).is_empty()
    }

    /// Evaluate a rule firing.
    ///
    /// Returns the task descriptor to register with the scheduler, or
    /// `None` when the referenced integration has been removed - a no-op,
    /// not an error.
    pub fn after(&self) -> Option<NotificationTask> {
        let integration =
            match self
                .store
                .get(PROVIDER, self.organization, self.config.workspace)
            {
                Some(integration) => integration,
                None => {
                    // Integration removed, rule still active.
                    tracing::debug!(
                        workspace = self.config.workspace,
                        rule = %self.rule,
                        "Integration no longer exists, skipping notification"
                    );
                    return None;
                }
            };

        let key = format!("slack:{}:{}", integration.id, self.config.channel_id);

        metrics::counter!(
            "slackwire_notifications_sent_total",
            "instance" => "slack.notification"
        )
        .increment(1);

        Some(NotificationTask {
            key,
            integration,
            channel_id: self.config.channel_id.clone(),
            tags: self.config.tags_list().into_iter().collect(),
            rule: self.rule.clone(),
        })
    }

    /// Human-readable description of what this action does.
    ///
    /// Substitutes `[removed]` for the workspace name when the referenced
    /// integration no longer exists.
    pub fn render_label(&self) -> String {
        let workspace = self
            .store
            .get(PROVIDER, self.organization, self.config.workspace)
            .map(|i| i.name)
            .unwrap_or_else(|| "[removed]".to_string());

        format!(
            "Send a notification to the {} Slack workspace to {} and include tags [{}]",
            workspace,
            self.config.channel,
            self.tags_list().join(", ")
        )
    }

    /// The configured tag keys, trimmed.
    pub fn tags_list(&self) -> Vec<String> {
        self.config.tags_list()
    }

    /// Form field descriptors with live workspace choices.
    pub fn form_fields(&self) -> Vec<(&'static str, FieldSpec)> {
        form_fields(&self.store.list(PROVIDER, self.organization))
    }
}

impl std::fmt::Debug for SlackNotifyAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SlackNotifyAction")
            .field("organization", &self.organization)
            .field("rule", &self.rule)
            .field("config", &self.config)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::integration::{Integration, MemoryIntegrationStore};

    fn make_config() -> RuleConfig {
        RuleConfig {
            workspace: 10,
            channel: "#critical".to_string(),
            channel_id: "C1234".to_string(),
            tags: "environment, user ,release".to_string(),
        }
    }

    fn store_with_integration() -> Arc<MemoryIntegrationStore> {
        let mut store = MemoryIntegrationStore::new();
        store.insert(PROVIDER, 1, Integration::new(10, "Acme Corp", "xoxa-1"));
        Arc::new(store)
    }

    #[test]
    fn after_returns_task_with_coalescing_key() {
        let action = SlackNotifyAction::new(store_with_integration(), 1, "db-errors", make_config());

        let task = action.after().expect("integration exists");
        assert_eq!(task.key, "slack:10:C1234");
        assert_eq!(task.rule(), "db-errors");
    }

    #[test]
    fn after_skips_silently_when_integration_removed() {
        let action = SlackNotifyAction::new(
            Arc::new(MemoryIntegrationStore::new()),
            1,
            "db-errors",
            make_config(),
        );

        assert!(action.after().is_none());
    }

    #[test]
    fn after_skips_when_integration_belongs_to_other_organization() {
        let action = SlackNotifyAction::new(store_with_integration(), 2, "db-errors", make_config());
        assert!(action.after().is_none());
    }

    #[test]
    fn is_enabled_reflects_store_contents() {
        let enabled = SlackNotifyAction::new(store_with_integration(), 1, "r", make_config());
        assert!(enabled.is_enabled());

        let disabled = SlackNotifyAction::new(
            Arc::new(MemoryIntegrationStore::new()),
            1,
            "r",
            make_config(),
        );
        assert!(!disabled.is_enabled());
    }

    #[test]
    fn render_label_substitutes_workspace_channel_and_tags() {
        let action = SlackNotifyAction::new(store_with_integration(), 1, "r", make_config());

        assert_eq!(
            action.render_label(),
            "Send a notification to the Acme Corp Slack workspace to #critical \
             and include tags [environment, user, release]"
        );
    }

    #[test]
    fn render_label_uses_removed_placeholder() {
        let action = SlackNotifyAction::new(
            Arc::new(MemoryIntegrationStore::new()),
            1,
            "r",
            make_config(),
        );

        assert_eq!(
            action.render_label(),
            "Send a notification to the [removed] Slack workspace to #critical \
             and include tags [environment, user, release]"
        );
    }

    #[test]
    fn tags_list_trims_entries() {
        let action = SlackNotifyAction::new(store_with_integration(), 1, "r", make_config());
        assert_eq!(action.tags_list(), vec!["environment", "user", "release"]);
    }

    #[test]
    fn form_fields_list_live_workspaces() {
        let action = SlackNotifyAction::new(store_with_integration(), 1, "r", make_config());

        let fields = action.form_fields();
        match &fields[0] {
            ("workspace", FieldSpec::Choice { choices }) => {
                assert_eq!(choices, &vec![(10, "Acme Corp".to_string())]);
            }
            other => panic!("unexpected field: {:?}", other),
        }
    }
}
