use serde::{Deserialize, Serialize};

/// A ranked entry as yielded by a feed source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateRecord {
    pub id: String,
    pub title: String,
    pub url: String,
    pub score: i64,
    pub stickied: bool,
}

/// Structured article content extracted from a candidate's url.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnrichedContent {
    pub publisher: String,
    pub headline: String,
    /// `YYYY-MM-DD HH:MM:SS`, wall clock as reported by the page.
    pub published_at: Option<String>,
    pub body: String,
}

/// One row of the `article` table. `post_id` is the natural key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedRecord {
    pub post_id: String,
    pub post_title: String,
    pub url: String,
    pub score: i64,
    pub publisher: String,
    pub headline: String,
    pub date_published: Option<String>,
    pub content: String,
}

impl NormalizedRecord {
    pub fn assemble(candidate: CandidateRecord, enriched: EnrichedContent) -> Self {
        Self {
            post_id: candidate.id,
            post_title: candidate.title,
            url: candidate.url,
            score: candidate.score,
            publisher: enriched.publisher,
            headline: enriched.headline,
            date_published: enriched.published_at,
            content: normalize_whitespace(&enriched.body),
        }
    }
}

/// Collapses newlines and runs of whitespace into single spaces.
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assemble_collapses_body_whitespace() {
        let candidate = CandidateRecord {
            id: "abc123".into(),
            title: "Post".into(),
            url: "https://example.com/a".into(),
            score: 42,
            stickied: false,
        };
        let enriched = EnrichedContent {
            publisher: "Example".into(),
            headline: "H".into(),
            published_at: None,
            body: "line1\nline2  line3".into(),
        };

        let record = NormalizedRecord::assemble(candidate, enriched);
        assert_eq!(record.post_id, "abc123");
        assert_eq!(record.url, "https://example.com/a");
        assert_eq!(record.publisher, "Example");
        assert_eq!(record.content, "line1 line2 line3");
        assert_eq!(record.date_published, None);
    }

    #[test]
    fn normalize_handles_tabs_and_edges() {
        assert_eq!(normalize_whitespace("  a\t\tb \r\n c  "), "a b c");
        assert_eq!(normalize_whitespace(""), "");
    }
}
