//! Centralized error types for slackwire using thiserror.

use thiserror::Error;

/// Errors returned by the Slack Web API client.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Connection failure or non-2xx HTTP status.
    #[error("slack request failed: {0}")]
    Transport(#[from] reqwest::Error),
    /// The API answered 200 with an `ok: false` envelope.
    #[error("slack method '{method}' failed: {error}")]
    Api { method: String, error: String },
    /// Request payload could not be serialized.
    #[error("failed to encode payload: {0}")]
    Encode(#[from] serde_json::Error),
}

impl ApiError {
    /// Vendor error string for an `ok: false` response, if that is what
    /// this error is.
    pub fn api_error(&self) -> Option<&str> {
        match self {
            ApiError::Api { error, .. } => Some(error),
            _ => None,
        }
    }
}

/// Errors related to notification dispatch.
///
/// Both transport failures and vendor rejections end up here: dispatch has
/// a single failure policy, the caller decides what to do with it.
#[derive(Error, Debug)]
pub enum NotifyError {
    #[error("failed to send notification: {0}")]
    Send(#[from] ApiError),
}

/// Configuration-validation failure surfaced to the user as a field error.
#[derive(Error, Debug)]
pub enum FieldError {
    #[error("a Slack workspace must be selected")]
    MissingWorkspace,
    #[error(
        "the Slack resource \"{channel}\" does not exist or has not been \
         granted access in the {workspace} Slack workspace"
    )]
    ChannelNotFound { channel: String, workspace: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_error_display() {
        let err = ApiError::Api {
            method: "channels.list".to_string(),
            error: "invalid_auth".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "slack method 'channels.list' failed: invalid_auth"
        );
        assert_eq!(err.api_error(), Some("invalid_auth"));
    }

    #[test]
    fn notify_error_display() {
        let err = NotifyError::Send(ApiError::Api {
            method: "chat.postMessage".to_string(),
            error: "channel_not_found".to_string(),
        });
        assert_eq!(
            err.to_string(),
            "failed to send notification: slack method 'chat.postMessage' failed: channel_not_found"
        );
    }

    #[test]
    fn field_error_interpolates_channel_and_workspace() {
        let err = FieldError::ChannelNotFound {
            channel: "critical".to_string(),
            workspace: "Acme Corp".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("\"critical\""));
        assert!(msg.contains("Acme Corp"));
    }

    #[test]
    fn field_error_missing_workspace_display() {
        let err = FieldError::MissingWorkspace;
        assert_eq!(err.to_string(), "a Slack workspace must be selected");
    }
}
