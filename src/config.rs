//! Rule configuration: user-entered fields, validation, form descriptors.
//!
//! Validation is a pure function over the entered fields, the
//! organization's integrations and a [`ChannelTransformer`] - no form
//! framework involved. The external rule engine persists the validated
//! [`RuleConfig`] and hands it back on every firing.

use crate::destination::Destination;
use crate::error::FieldError;
use crate::integration::{Integration, IntegrationId};
use crate::resolver::ChannelTransformer;
use serde::{Deserialize, Serialize};

/// User-entered rule action fields, before validation.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawRuleConfig {
    /// Selected workspace; maps directly to the integration ID.
    pub workspace: Option<IntegrationId>,
    /// Free text, may carry a `#` or `@` sigil.
    #[serde(default)]
    pub channel: String,
    /// Comma-separated tag keys to include in notifications.
    #[serde(default)]
    pub tags: String,
}

/// Validated, persisted rule action configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleConfig {
    pub workspace: IntegrationId,
    /// Canonical destination string with the resolved sigil, e.g. `#critical`.
    pub channel: String,
    /// Stable vendor ID cached at validation time and reused at dispatch.
    pub channel_id: String,
    #[serde(default)]
    pub tags: String,
}

impl RuleConfig {
    /// The configured tag keys, trimmed of surrounding whitespace.
    ///
    /// Empty entries (doubled or trailing commas) are dropped.
    pub fn tags_list(&self) -> Vec<String> {
        self.tags
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    }
}

/// Validate user-entered fields by resolving the channel against the
/// selected workspace.
///
/// On success the canonical channel string (resolved sigil + stripped name)
/// and the stable ID are stored. Resolution failure with a selected
/// workspace is a user-facing field error naming the channel and the
/// workspace's display name.
pub async fn validate_rule_config(
    raw: &RawRuleConfig,
    integrations: &[Integration],
    transformer: &dyn ChannelTransformer,
) -> Result<RuleConfig, FieldError> {
    let workspace = raw.workspace.ok_or(FieldError::MissingWorkspace)?;
    let destination = Destination::parse(raw.channel.trim());

    match transformer.resolve(workspace, destination.name()).await {
        Some(resolved) => Ok(RuleConfig {
            workspace,
            channel: resolved.canonical_name(destination.name()),
            channel_id: resolved.id,
            tags: raw.tags.clone(),
        }),
        None => {
            let workspace_name = integrations
                .iter()
                .find(|i| i.id == workspace)
                .map(|i| i.name.clone())
                .unwrap_or_else(|| workspace.to_string());
            Err(FieldError::ChannelNotFound {
                channel: destination.name().to_string(),
                workspace: workspace_name,
            })
        }
    }
}

/// Description of one form field, for the embedding UI to render.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FieldSpec {
    /// Select among the organization's active workspaces.
    Choice {
        choices: Vec<(IntegrationId, String)>,
    },
    /// Free-text input.
    String {
        placeholder: &'static str,
        required: bool,
    },
}

/// The three form fields of the rule action, with live workspace choices.
pub fn form_fields(integrations: &[Integration]) -> Vec<(&'static str, FieldSpec)> {
    vec![
        (
            "workspace",
            FieldSpec::Choice {
                choices: integrations.iter().map(|i| (i.id, i.name.clone())).collect(),
            },
        ),
        (
            "channel",
            FieldSpec::String {
                placeholder: "i.e #critical",
                required: true,
            },
        ),
        (
            "tags",
            FieldSpec::String {
                placeholder: "i.e environment,user,my_tag",
                required: false,
            },
        ),
    ]
}
