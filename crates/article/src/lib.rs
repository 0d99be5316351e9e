pub mod extract;
pub mod publish_date;
pub mod publisher;

use std::time::Duration;

use async_trait::async_trait;
use common::config::ArticleConfig;
use common::{normalize_whitespace, ContentEnricher, EnrichedContent, PipelineError, PipelineResult};
use reqwest::Client;
use tracing::{debug, info};
use url::Url;

pub use extract::{extract_article, ExtractedArticle};
pub use publisher::brand_from_url;

/// Downloads a linked page and extracts its article content.
#[derive(Clone)]
pub struct ArticleExtractor {
    client: Client,
}

impl ArticleExtractor {
    pub fn new(config: &ArticleConfig) -> PipelineResult<Self> {
        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| PipelineError::Fetch(format!("building http client: {}", e)))?;
        Ok(Self { client })
    }

    async fn fetch(&self, url: &Url) -> PipelineResult<String> {
        let resp = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| PipelineError::Fetch(format!("{}: {}", url, e)))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(PipelineError::Fetch(format!("{} returned {}", url, status)));
        }

        resp.text()
            .await
            .map_err(|e| PipelineError::Fetch(format!("{}: reading body: {}", url, e)))
    }
}

/// Validates that the url is absolute http(s) and resolves its publisher.
pub fn resolve_publisher(url: &str) -> PipelineResult<(Url, String)> {
    let parsed =
        Url::parse(url).map_err(|e| PipelineError::Fetch(format!("invalid url {}: {}", url, e)))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(PipelineError::Fetch(format!(
            "unsupported scheme '{}' in {}",
            parsed.scheme(),
            url
        )));
    }
    let publisher = brand_from_url(&parsed)
        .ok_or_else(|| PipelineError::Fetch(format!("no host in {}", url)))?;
    Ok((parsed, publisher))
}

#[async_trait]
impl ContentEnricher for ArticleExtractor {
    async fn enrich(&self, url: &str) -> PipelineResult<EnrichedContent> {
        let (parsed, publisher) = resolve_publisher(url)?;

        let html = self.fetch(&parsed).await?;
        let article = extract_article(&html)?;
        debug!(
            "Extracted {} bytes of article text from {}",
            article.body.len(),
            url
        );

        let content = EnrichedContent {
            publisher,
            headline: article.headline,
            published_at: article.published_at,
            body: normalize_whitespace(&article.body),
        };
        info!("Enriched article '{}' ({})", content.headline, content.publisher);
        Ok(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_publisher_for_article_links() {
        let (url, publisher) =
            resolve_publisher("https://www.cbc.ca/news/politics/sophie-trudeau-feeling-great-covid-19-1.5513731")
                .unwrap();
        assert_eq!(url.host_str(), Some("www.cbc.ca"));
        assert_eq!(publisher, "cbc");
    }

    #[test]
    fn rejects_non_http_urls() {
        for bad in ["ftp://example.com/a", "not a url", "/r/worldnews/comments/x"] {
            let err = resolve_publisher(bad).unwrap_err();
            assert!(matches!(err, PipelineError::Fetch(_)), "{}", bad);
        }
    }

    #[tokio::test]
    async fn enrich_fails_before_any_request_for_bad_scheme() {
        let extractor = ArticleExtractor::new(&ArticleConfig::default()).unwrap();
        let err = extractor.enrich("mailto:desk@example.com").await.unwrap_err();
        assert!(err.is_recoverable());
    }
}
