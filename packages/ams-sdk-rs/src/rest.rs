//! Async REST client for the AMS role API.

use std::time::Duration;

use ams_common::config::BackendConfig;
use ams_common::models::{Role, RoleId, RoleList, RolePayload};
use reqwest::{Client, Method, StatusCode, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{Result, SdkError};

const ROLE_BASE: &str = "/api/role";

/// Async AMS REST client.
///
/// ```rust,no_run
/// use ams_common::config::BackendConfig;
/// use ams_sdk::rest::RestClient;
///
/// #[tokio::main]
/// async fn main() -> ams_sdk::Result<()> {
///     let rest = RestClient::new(&BackendConfig::new("http://localhost:8080"))?;
///     let roles = rest.list_roles().await?;
///     println!("{roles:?}");
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct RestClient {
    client: Client,
    base_url: String,
}

impl RestClient {
    pub fn new(config: &BackendConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .default_headers({
                let mut h = reqwest::header::HeaderMap::new();
                if let Some(token) = &config.token {
                    let token = if token.starts_with("Bearer ") {
                        token.clone()
                    } else {
                        format!("Bearer {token}")
                    };
                    h.insert(
                        reqwest::header::AUTHORIZATION,
                        reqwest::header::HeaderValue::from_str(&token)
                            .map_err(|e| SdkError::Other(e.to_string()))?,
                    );
                }
                h
            })
            .build()
            .map_err(SdkError::Http)?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_owned(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // ── Internal ──────────────────────────────────────────────────────────────

    fn url(&self, path: &str) -> String {
        format!("{}{}{}", self.base_url, ROLE_BASE, path)
    }

    /// `/api/role/{id}` with the id escaped as a single path segment.
    fn role_url(&self, id: &RoleId) -> Result<String> {
        let mut url = Url::parse(&self.url("")).map_err(|e| SdkError::Other(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|()| SdkError::Other(format!("invalid base URL: {}", self.base_url)))?
            .push(id.as_str());
        Ok(url.into())
    }

    async fn request<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        method: Method,
        url: String,
        body: Option<&B>,
    ) -> Result<T> {
        tracing::debug!(%method, %url, "role api request");
        let mut req = self.client.request(method, &url);
        if let Some(b) = body {
            req = req.json(b);
        }
        let resp = req.send().await?;
        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.ok().and_then(|text| error_message(&text));
            tracing::debug!(status = status.as_u16(), ?message, "role api request failed");
            return Err(SdkError::Api { status: status.as_u16(), message });
        }
        if status == StatusCode::NO_CONTENT {
            return serde_json::from_value(Value::Null).map_err(SdkError::Json);
        }
        let text = resp.text().await?;
        if text.trim().is_empty() {
            return serde_json::from_value(Value::Null).map_err(SdkError::Json);
        }
        Ok(serde_json::from_str(&text)?)
    }

    // ── Roles ─────────────────────────────────────────────────────────────────

    /// GET /api/role/all
    pub async fn list_roles(&self) -> Result<Vec<Role>> {
        let list: RoleList = self.request::<(), _>(Method::GET, self.url("/all"), None).await?;
        Ok(list.into_roles())
    }

    /// POST /api/role/create. Returns the created role when the backend echoes it.
    pub async fn create_role(&self, payload: &RolePayload) -> Result<Option<Role>> {
        let body: Value = self.request(Method::POST, self.url("/create"), Some(payload)).await?;
        Ok(extract_role(body))
    }

    /// PUT /api/role/{id}. Returns the updated role when the backend echoes it.
    pub async fn update_role(&self, id: &RoleId, payload: &RolePayload) -> Result<Option<Role>> {
        let body: Value = self
            .request(Method::PUT, self.role_url(id)?, Some(payload))
            .await?;
        Ok(extract_role(body))
    }

    /// DELETE /api/role/{id}. Any acknowledgement body is ignored.
    pub async fn delete_role(&self, id: &RoleId) -> Result<()> {
        self.request::<(), Value>(Method::DELETE, self.role_url(id)?, None)
            .await?;
        Ok(())
    }
}

/// Pull a human message out of an error body: `{message}`, then `{error}`.
fn error_message(text: &str) -> Option<String> {
    let v: Value = serde_json::from_str(text).ok()?;
    ["message", "error"]
        .iter()
        .find_map(|k| v.get(*k).and_then(|m| m.as_str()))
        .filter(|m| !m.trim().is_empty())
        .map(str::to_owned)
}

/// Accept a bare role, or one wrapped as `{role: {...}}` / `{data: {...}}`.
fn extract_role(body: Value) -> Option<Role> {
    for key in ["role", "data"] {
        if let Some(inner) = body.get(key).filter(|v| v.is_object()) {
            if let Ok(role) = serde_json::from_value(inner.clone()) {
                return Some(role);
            }
        }
    }
    serde_json::from_value(body).ok()
}
