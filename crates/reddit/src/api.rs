use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use common::config::RedditConfig;
use reqwest::Client;
use tokio::sync::Mutex;
use tracing::debug;

use crate::models::{AccessToken, Listing};

/// Reddit caps listing pages at 100 entries.
pub const MAX_PAGE_SIZE: usize = 100;

const TOKEN_URL: &str = "https://www.reddit.com/api/v1/access_token";
const API_BASE_URL: &str = "https://oauth.reddit.com";
const TOKEN_EXPIRY_MARGIN: Duration = Duration::from_secs(60);

struct CachedToken {
    value: String,
    expires_at: Instant,
}

/// Application-only OAuth client for the Reddit listing API.
pub struct RedditAPI {
    client: Client,
    token_url: String,
    base_url: String,
    client_id: String,
    client_secret: String,
    token: Mutex<Option<CachedToken>>,
}

impl RedditAPI {
    pub fn new(config: &RedditConfig) -> Result<Self> {
        Self::with_endpoints(config, TOKEN_URL, API_BASE_URL)
    }

    /// Same client against other token and listing hosts.
    pub fn with_endpoints(config: &RedditConfig, token_url: &str, base_url: &str) -> Result<Self> {
        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(Duration::from_secs(30))
            .build()
            .context("building reddit http client")?;

        Ok(Self {
            client,
            token_url: token_url.to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
            token: Mutex::new(None),
        })
    }

    async fn access_token(&self) -> Result<String> {
        let mut cached = self.token.lock().await;
        if let Some(token) = cached.as_ref() {
            if Instant::now() < token.expires_at {
                return Ok(token.value.clone());
            }
        }

        debug!("Requesting reddit access token");
        let resp = self
            .client
            .post(&self.token_url)
            .basic_auth(&self.client_id, Some(&self.client_secret))
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await?
            .error_for_status()?;
        let token: AccessToken = resp.json().await.context("decoding access token")?;

        let lifetime = Duration::from_secs(token.expires_in).saturating_sub(TOKEN_EXPIRY_MARGIN);
        *cached = Some(CachedToken {
            value: token.access_token.clone(),
            expires_at: Instant::now() + lifetime,
        });
        Ok(token.access_token)
    }

    /// One page of a subreddit listing, e.g. `sort = "hot"`.
    pub async fn get_listing(
        &self,
        subreddit: &str,
        sort: &str,
        limit: usize,
        after: Option<&str>,
    ) -> Result<Listing> {
        let token = self.access_token().await?;
        let url = format!("{}/r/{}/{}", self.base_url, subreddit, sort);

        let mut query = vec![
            ("limit", limit.min(MAX_PAGE_SIZE).to_string()),
            ("raw_json", "1".to_string()),
        ];
        if let Some(after) = after {
            query.push(("after", after.to_string()));
        }

        let resp = self
            .client
            .get(&url)
            .bearer_auth(token)
            .query(&query)
            .send()
            .await?
            .error_for_status()?;
        let listing: Listing = resp
            .json()
            .await
            .with_context(|| format!("decoding listing from {}", url))?;
        Ok(listing)
    }
}
