use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{Context, Result};
use serde::Deserialize;

#[derive(Debug, Clone)]
pub struct RedditConfig {
    pub client_id: String,
    pub client_secret: String,
    pub user_agent: String,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
}

#[derive(Debug, Clone)]
pub struct ArticleConfig {
    pub user_agent: String,
    pub timeout_secs: u64,
}

impl Default for ArticleConfig {
    fn default() -> Self {
        Self {
            user_agent: "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_11_5) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/50.0.2661.102 Safari/537.36".to_string(),
            timeout_secs: 30,
        }
    }
}

#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub topic: String,
    pub limit: usize,
    /// Number of leading feed items dropped before enrichment. The first
    /// entry of a subreddit's hot listing is normally its pinned
    /// discussion thread.
    pub skip_leading: usize,
    pub snapshot_path: Option<PathBuf>,
    pub snapshot_every: usize,
    /// Six-field cron expression used by the scheduler.
    pub schedule: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            topic: "worldnews".to_string(),
            limit: 10,
            skip_leading: 1,
            snapshot_path: None,
            snapshot_every: 10,
            schedule: "0 0 * * * *".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub reddit: RedditConfig,
    pub database: DatabaseConfig,
    pub article: ArticleConfig,
    pub pipeline: PipelineConfig,
}

/// Layout of a `secrets.json` credentials file.
#[derive(Debug, Deserialize)]
struct Secrets {
    client_id: String,
    client_secret: String,
    user_agent: String,
    connection_string: Option<String>,
}

impl Config {
    /// Loads configuration from the environment. When `SECRETS_PATH` is set
    /// the credentials come from that file instead.
    pub fn from_env() -> Result<Self> {
        if let Ok(path) = env::var("SECRETS_PATH") {
            return Self::from_secrets_file(path);
        }

        let reddit = RedditConfig {
            client_id: env::var("REDDIT_CLIENT_ID").context("REDDIT_CLIENT_ID must be set")?,
            client_secret: env::var("REDDIT_CLIENT_SECRET")
                .context("REDDIT_CLIENT_SECRET must be set")?,
            user_agent: env::var("REDDIT_USER_AGENT").context("REDDIT_USER_AGENT must be set")?,
        };
        let database = DatabaseConfig {
            url: env::var("DATABASE_URL").context("DATABASE_URL must be set")?,
        };

        Self::with_env_settings(reddit, database)
    }

    pub fn from_secrets_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading secrets from {}", path.display()))?;
        let secrets: Secrets = serde_json::from_str(&content)
            .with_context(|| format!("parsing secrets from {}", path.display()))?;

        let database_url = secrets
            .connection_string
            .or_else(|| env::var("DATABASE_URL").ok())
            .context("connection_string (or DATABASE_URL) must be set")?;

        Self::with_env_settings(
            RedditConfig {
                client_id: secrets.client_id,
                client_secret: secrets.client_secret,
                user_agent: secrets.user_agent,
            },
            DatabaseConfig { url: database_url },
        )
    }

    fn with_env_settings(reddit: RedditConfig, database: DatabaseConfig) -> Result<Self> {
        let article_defaults = ArticleConfig::default();
        let article = ArticleConfig {
            user_agent: env::var("ARTICLE_USER_AGENT").unwrap_or(article_defaults.user_agent),
            timeout_secs: env_or("HTTP_TIMEOUT_SECS", article_defaults.timeout_secs),
        };

        let defaults = PipelineConfig::default();
        let pipeline = PipelineConfig {
            topic: env::var("PIPELINE_TOPIC").unwrap_or(defaults.topic),
            limit: env_or("PIPELINE_LIMIT", defaults.limit),
            skip_leading: env_or("PIPELINE_SKIP_LEADING", defaults.skip_leading),
            snapshot_path: env::var("PIPELINE_SNAPSHOT_PATH")
                .ok()
                .filter(|s| !s.trim().is_empty())
                .map(PathBuf::from),
            snapshot_every: env_or("PIPELINE_SNAPSHOT_EVERY", defaults.snapshot_every),
            schedule: env::var("PIPELINE_CRON").unwrap_or(defaults.schedule),
        };

        let config = Config {
            reddit,
            database,
            article,
            pipeline,
        };
        config.validate()?;
        Ok(config)
    }

    /// Fails fast on missing or unusable settings.
    pub fn validate(&self) -> Result<()> {
        let required = [
            ("client_id", &self.reddit.client_id),
            ("client_secret", &self.reddit.client_secret),
            ("user_agent", &self.reddit.user_agent),
            ("database url", &self.database.url),
            ("topic", &self.pipeline.topic),
        ];
        for (name, value) in required {
            if value.trim().is_empty() {
                anyhow::bail!("{} must not be empty", name);
            }
        }
        if self.pipeline.limit == 0 {
            anyhow::bail!("pipeline limit must be greater than zero");
        }
        if self.pipeline.snapshot_every == 0 {
            anyhow::bail!("snapshot interval must be greater than zero");
        }
        Ok(())
    }
}

fn env_or<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(default)
}
