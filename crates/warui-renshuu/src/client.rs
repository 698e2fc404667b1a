use std::time::Duration;

use async_trait::async_trait;

use crate::{RenshuuError, TermSource};

const DEFAULT_BASE_URL: &str = "https://api.renshuu.org/v1";

/// HTTP client for the Renshuu API
#[derive(Clone)]
pub struct RenshuuClient {
    base_url: String,
    api_key: String,
    client: reqwest::Client,
}

impl RenshuuClient {
    pub fn new(api_key: String, timeout: Duration) -> Result<Self, RenshuuError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key,
            client,
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// GET an API path and decode the JSON body
    async fn get(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<serde_json::Value, RenshuuError> {
        if self.api_key.is_empty() {
            return Err(RenshuuError::AuthenticationError);
        }

        let url = format!("{}/{}", self.base_url, path);
        tracing::debug!("GET {} {:?}", url, query);

        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.api_key)
            .query(query)
            .send()
            .await?;

        let status = response.status();
        if status == 429 {
            return Err(RenshuuError::RateLimitExceeded);
        }

        if status == 401 || status == 403 {
            return Err(RenshuuError::AuthenticationError);
        }

        if !status.is_success() {
            return Err(RenshuuError::Api {
                status: status.as_u16(),
            });
        }

        response
            .json::<serde_json::Value>()
            .await
            .map_err(|e| RenshuuError::InvalidField {
                path: path.to_string(),
                expected: format!("JSON body ({e})"),
            })
    }
}

#[async_trait]
impl TermSource for RenshuuClient {
    async fn profile(&self) -> Result<serde_json::Value, RenshuuError> {
        self.get("profile", &[]).await
    }

    async fn schedules(&self) -> Result<serde_json::Value, RenshuuError> {
        self.get("schedule", &[]).await
    }

    async fn schedule_list(
        &self,
        schedule_id: &str,
        page: Option<u32>,
    ) -> Result<serde_json::Value, RenshuuError> {
        let path = format!("schedule/{}/list", schedule_id);
        match page {
            Some(page) => self.get(&path, &[("pg", page.to_string())]).await,
            None => self.get(&path, &[]).await,
        }
    }
}
