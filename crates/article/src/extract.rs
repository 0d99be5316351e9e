use common::{normalize_whitespace, PipelineError, PipelineResult};
use scraper::{ElementRef, Html, Selector};

use crate::publish_date::normalize_publish_date;

/// Metadata tags checked for a publish date, in order of preference.
const DATE_SOURCES: &[(&str, &str)] = &[
    ("meta[property='article:published_time']", "content"),
    ("meta[itemprop='datePublished']", "content"),
    ("meta[name='pubdate']", "content"),
    ("meta[name='publishdate']", "content"),
    ("meta[name='date']", "content"),
    ("time[datetime]", "datetime"),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedArticle {
    pub headline: String,
    pub published_at: Option<String>,
    /// Paragraphs separated by newlines; not yet whitespace-normalized.
    pub body: String,
}

fn selector(css: &str) -> PipelineResult<Selector> {
    Selector::parse(css)
        .map_err(|e| PipelineError::Parse(format!("Failed to parse selector {}: {}", css, e)))
}

pub fn extract_article(html: &str) -> PipelineResult<ExtractedArticle> {
    let document = Html::parse_document(html);

    let headline = extract_headline(&document)?
        .ok_or_else(|| PipelineError::Parse("no headline found".to_string()))?;
    let body = extract_body(&document)?;
    if body.is_empty() {
        return Err(PipelineError::Parse("no article body found".to_string()));
    }
    let published_at = extract_publish_date(&document)?;

    Ok(ExtractedArticle {
        headline,
        published_at,
        body,
    })
}

fn extract_headline(document: &Html) -> PipelineResult<Option<String>> {
    let og_title = selector("meta[property='og:title']")?;
    let from_meta = document
        .select(&og_title)
        .filter_map(|el| el.value().attr("content"))
        .map(normalize_whitespace)
        .find(|title| !title.is_empty());
    if from_meta.is_some() {
        return Ok(from_meta);
    }

    for css in ["title", "h1"] {
        let sel = selector(css)?;
        let text = document
            .select(&sel)
            .map(element_text)
            .find(|title| !title.is_empty());
        if text.is_some() {
            return Ok(text);
        }
    }
    Ok(None)
}

/// Paragraph text from `<article>`, else `<main>`, else the whole page.
fn extract_body(document: &Html) -> PipelineResult<String> {
    let paragraph = selector("p")?;

    for css in ["article", "main"] {
        let container = selector(css)?;
        let paragraphs: Vec<String> = document
            .select(&container)
            .flat_map(|scope| scope.select(&paragraph))
            .map(element_text)
            .filter(|text| !text.is_empty())
            .collect();
        if !paragraphs.is_empty() {
            return Ok(paragraphs.join("\n"));
        }
    }

    Ok(document
        .select(&paragraph)
        .map(element_text)
        .filter(|text| !text.is_empty())
        .collect::<Vec<_>>()
        .join("\n"))
}

fn extract_publish_date(document: &Html) -> PipelineResult<Option<String>> {
    for (css, attr) in DATE_SOURCES {
        let sel = selector(css)?;
        let found = document
            .select(&sel)
            .filter_map(|el| el.value().attr(attr))
            .find_map(normalize_publish_date);
        if found.is_some() {
            return Ok(found);
        }
    }
    Ok(None)
}

fn element_text(element: ElementRef<'_>) -> String {
    normalize_whitespace(&element.text().collect::<String>())
}
