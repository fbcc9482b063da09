//! Thin typed client over the Slack Web API.
//!
//! Wraps the four endpoints this crate consumes and decodes the `ok`
//! boolean envelope in one place. The HTTP client is injected so embedders
//! share one connection pool, and the base URL is overridable so the test
//! suites can point the client at a mock server.

use crate::error::ApiError;
use crate::secret::SecretString;
use serde::de::DeserializeOwned;
use serde::Deserialize;

/// Production Slack Web API base URL.
pub const SLACK_API_BASE: &str = "https://slack.com";

/// App resource permissions for one resource type (channels or DMs).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResourcePermissions {
    /// Granted for every resource of this type.
    #[serde(default)]
    pub wildcard: bool,
    /// Explicitly granted resource IDs.
    #[serde(default)]
    pub ids: Vec<String>,
    /// Explicitly revoked resource IDs; excluded even under wildcard.
    #[serde(default)]
    pub excluded_ids: Vec<String>,
}

impl ResourcePermissions {
    /// Whether the app may post to the given resource.
    pub fn allows(&self, id: &str) -> bool {
        if self.excluded_ids.iter().any(|e| e == id) {
            return false;
        }
        self.wildcard || self.ids.iter().any(|i| i == id)
    }
}

/// Channel and direct-message permissions granted to the app.
#[derive(Debug, Clone, Default)]
pub struct AppPermissions {
    pub channel: ResourcePermissions,
    pub im: ResourcePermissions,
}

/// A channel as returned by `channels.list`.
#[derive(Debug, Clone, Deserialize)]
pub struct Channel {
    pub id: String,
    pub name: String,
}

/// A workspace member as returned by `users.list`.
#[derive(Debug, Clone, Deserialize)]
pub struct Member {
    pub id: String,
    pub name: String,
}

#[derive(Deserialize)]
struct PermissionsResponse {
    ok: bool,
    #[serde(default)]
    error: Option<String>,
    info: Option<PermissionsInfoWire>,
}

#[derive(Deserialize)]
struct PermissionsInfoWire {
    channel: ResourceWire,
    im: ResourceWire,
}

#[derive(Deserialize)]
struct ResourceWire {
    resources: ResourcePermissions,
}

#[derive(Deserialize)]
struct ChannelListResponse {
    ok: bool,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    channels: Vec<Channel>,
}

#[derive(Deserialize)]
struct UserListResponse {
    ok: bool,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    members: Vec<Member>,
}

#[derive(Deserialize)]
struct PostMessageResponse {
    ok: bool,
    #[serde(default)]
    error: Option<String>,
}

fn envelope_error(method: &str, error: Option<String>) -> ApiError {
    ApiError::Api {
        method: method.to_string(),
        error: error.unwrap_or_else(|| "unknown_error".to_string()),
    }
}

/// Slack Web API client.
#[derive(Debug, Clone)]
pub struct SlackClient {
    http: reqwest::Client,
    base_url: String,
}

impl SlackClient {
    /// Create a client against the production API.
    pub fn new(http: reqwest::Client) -> Self {
        Self::with_base_url(http, SLACK_API_BASE)
    }

    /// Create a client against a custom base URL (mock servers, proxies).
    pub fn with_base_url(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self { http, base_url }
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        method: &str,
        query: &[(&str, &str)],
    ) -> Result<T, ApiError> {
        let url = format!("{}/api/{}", self.base_url, method);
        let response = self
            .http
            .get(&url)
            .query(query)
            .send()
            .await?
            .error_for_status()?;
        Ok(response.json::<T>().await?)
    }

    /// Fetch the channel and DM permissions granted to the app.
    pub async fn permissions_info(&self, token: &SecretString) -> Result<AppPermissions, ApiError> {
        const METHOD: &str = "apps.permissions.info";
        let response: PermissionsResponse = self
            .get_json(METHOD, &[("token", token.expose())])
            .await?;
        if !response.ok {
            return Err(envelope_error(METHOD, response.error));
        }
        let info = response
            .info
            .ok_or_else(|| envelope_error(METHOD, Some("missing_info".to_string())))?;
        Ok(AppPermissions {
            channel: info.channel.resources,
            im: info.im.resources,
        })
    }

    /// List the workspace's channels, including archived ones.
    ///
    /// Membership lists are excluded from the response; only names and IDs
    /// are needed here.
    pub async fn channels_list(&self, token: &SecretString) -> Result<Vec<Channel>, ApiError> {
        const METHOD: &str = "channels.list";
        let response: ChannelListResponse = self
            .get_json(
                METHOD,
                &[
                    ("token", token.expose()),
                    ("exclude_archived", "false"),
                    ("exclude_members", "true"),
                ],
            )
            .await?;
        if !response.ok {
            return Err(envelope_error(METHOD, response.error));
        }
        Ok(response.channels)
    }

    /// List the workspace's members.
    pub async fn users_list(&self, token: &SecretString) -> Result<Vec<Member>, ApiError> {
        const METHOD: &str = "users.list";
        let response: UserListResponse =
            self.get_json(METHOD, &[("token", token.expose())]).await?;
        if !response.ok {
            return Err(envelope_error(METHOD, response.error));
        }
        Ok(response.members)
    }

    /// Post a message with the given attachments to a resolved destination.
    ///
    /// The endpoint takes a form body with the attachment list serialized
    /// as a JSON string.
    pub async fn post_message(
        &self,
        token: &SecretString,
        channel: &str,
        attachments: &[crate::attachment::Attachment],
    ) -> Result<(), ApiError> {
        const METHOD: &str = "chat.postMessage";
        let url = format!("{}/api/{}", self.base_url, METHOD);
        let attachments_json = serde_json::to_string(attachments)?;
        let form = [
            ("token", token.expose()),
            ("channel", channel),
            ("attachments", attachments_json.as_str()),
        ];
        let response = self
            .http
            .post(&url)
            .form(&form)
            .send()
            .await?
            .error_for_status()?;
        let body: PostMessageResponse = response.json().await?;
        if !body.ok {
            return Err(envelope_error(METHOD, body.error));
        }
        Ok(())
    }
}
