//! Channel resolution against the Slack workspace.
//!
//! Maps a human-entered channel or user name to a stable vendor ID,
//! honoring the permission scopes granted to the app. Channels are checked
//! first, then direct-message users. Every vendor failure is logged and
//! collapses to "no result": resolution fails open, it never raises. No
//! retries; each lookup is a fresh set of API calls.

use crate::destination::ResolvedChannel;
use crate::error::ApiError;
use crate::integration::{IntegrationId, IntegrationStore, OrganizationId, PROVIDER};
use crate::slack::SlackClient;
use async_trait::async_trait;
use std::sync::Arc;

/// Seam between configuration validation and the live resolver.
///
/// The validator only needs "name in this workspace -> ID or nothing";
/// tests substitute a canned implementation.
#[async_trait]
pub trait ChannelTransformer: Send + Sync {
    /// Resolve a sigil-stripped name within the given workspace.
    async fn resolve(&self, workspace: IntegrationId, name: &str) -> Option<ResolvedChannel>;
}

/// Live resolver backed by the integration store and the Slack API.
///
/// Bound to one organization, like the rule configuration it validates.
pub struct ChannelResolver {
    store: Arc<dyn IntegrationStore>,
    client: SlackClient,
    organization: OrganizationId,
}

impl ChannelResolver {
    pub fn new(
        store: Arc<dyn IntegrationStore>,
        client: SlackClient,
        organization: OrganizationId,
    ) -> Self {
        Self {
            store,
            client,
            organization,
        }
    }

    fn log_failure(&self, stage: &str, err: &ApiError) {
        match err.api_error() {
            Some(api_error) => {
                tracing::info!(stage, error = %api_error, "slack resolution failed");
            }
            None => {
                tracing::warn!(stage, error = %err, "slack resolution transport failure");
            }
        }
        metrics::counter!(
            "slackwire_resolution_failures_total",
            "stage" => stage.to_string()
        )
        .increment(1);
    }
}

#[async_trait]
impl ChannelTransformer for ChannelResolver {
    async fn resolve(&self, workspace: IntegrationId, name: &str) -> Option<ResolvedChannel> {
        let integration = self.store.get(PROVIDER, self.organization, workspace)?;
        let token = integration.access_token();

        let permissions = match self.client.permissions_info(token).await {
            Ok(permissions) => permissions,
            Err(err) => {
                self.log_failure("permission_check", &err);
                return None;
            }
        };

        let channels = match self.client.channels_list(token).await {
            Ok(channels) => channels,
            Err(err) => {
                self.log_failure("channel_list", &err);
                return None;
            }
        };

        if let Some(channel) = channels.iter().find(|c| c.name == name) {
            if permissions
                .channel
                .excluded_ids
                .iter()
                .any(|id| id == &channel.id)
            {
                return None;
            }
            if !permissions.channel.wildcard
                && !permissions.channel.ids.iter().any(|id| id == &channel.id)
            {
                return None;
            }
            return Some(ResolvedChannel::channel(channel.id.clone()));
        }

        let members = match self.client.users_list(token).await {
            Ok(members) => members,
            Err(err) => {
                self.log_failure("user_list", &err);
                return None;
            }
        };

        let member = members.iter().find(|m| m.name == name)?;
        if permissions.im.ids.iter().any(|id| id == &member.id) {
            return Some(ResolvedChannel::user(member.id.clone()));
        }

        None
    }
}

impl std::fmt::Debug for ChannelResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChannelResolver")
            .field("organization", &self.organization)
            .finish()
    }
}
