//! Notification dispatch to Slack.
//!
//! One best-effort `chat.postMessage` per rule firing: no retry, no
//! backoff, no queueing. Failure policy is uniform - a vendor rejection
//! (`ok: false`) and a transport failure both come back as `NotifyError`;
//! the scheduler running the task owns terminal logging.

use crate::attachment::Attachment;
use crate::error::{ApiError, NotifyError};
use crate::integration::Integration;
use crate::slack::SlackClient;

/// Posts rule-match notifications using a resolved integration's
/// credentials.
#[derive(Debug, Clone)]
pub struct SlackNotifier {
    client: SlackClient,
}

impl SlackNotifier {
    pub fn new(client: SlackClient) -> Self {
        Self { client }
    }

    /// Post the attachments to a resolved destination.
    ///
    /// # Arguments
    ///
    /// * `integration` - workspace credentials to post with
    /// * `channel_id` - stable destination ID from the rule configuration
    /// * `attachments` - pre-built message payload
    pub async fn send(
        &self,
        integration: &Integration,
        channel_id: &str,
        attachments: &[Attachment],
    ) -> Result<(), NotifyError> {
        let span = tracing::info_span!(
            "send_slack",
            integration_id = integration.id,
            channel_id = %channel_id
        );
        let _guard = span.enter();

        match self
            .client
            .post_message(integration.access_token(), channel_id, attachments)
            .await
        {
            Ok(()) => {
                tracing::debug!("Notification posted");
                metrics::counter!("slackwire_notifications_delivered_total").increment(1);
                Ok(())
            }
            Err(err) => {
                match &err {
                    ApiError::Api { error, .. } => {
                        tracing::info!(error = %error, "Slack rejected the notification");
                        metrics::counter!(
                            "slackwire_notify_errors_total",
                            "kind" => "rejected"
                        )
                        .increment(1);
                    }
                    _ => {
                        tracing::warn!(error = %err, "Failed to reach Slack");
                        metrics::counter!(
                            "slackwire_notify_errors_total",
                            "kind" => "transport"
                        )
                        .increment(1);
                    }
                }
                Err(NotifyError::Send(err))
            }
        }
    }
}
