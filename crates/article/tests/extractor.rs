use article::ArticleExtractor;
use common::config::ArticleConfig;
use common::{ContentEnricher, PipelineError};
use mockito::Server;

const STORY: &str = r#"<html>
<head>
  <meta property="og:title" content="Sophie Trudeau says she is feeling great">
  <meta property="article:published_time" content="2020-04-02T14:33:00.000">
</head>
<body>
  <article>
    <p>Sophie Gregoire Trudeau says she is  feeling great.</p>
    <p>She thanked health-care workers.</p>
  </article>
</body>
</html>"#;

fn extractor() -> ArticleExtractor {
    ArticleExtractor::new(&ArticleConfig::default()).unwrap()
}

#[tokio::test]
async fn enriches_a_served_article() {
    let mut server = Server::new_async().await;
    let page = server
        .mock("GET", "/news/trudeau")
        .with_status(200)
        .with_header("content-type", "text/html")
        .with_body(STORY)
        .expect(1)
        .create_async()
        .await;

    let url = format!("{}/news/trudeau", server.url());
    let content = extractor().enrich(&url).await.unwrap();

    assert_eq!(content.headline, "Sophie Trudeau says she is feeling great");
    assert_eq!(content.published_at.as_deref(), Some("2020-04-02 14:33:00"));
    assert_eq!(
        content.body,
        "Sophie Gregoire Trudeau says she is feeling great. She thanked health-care workers."
    );
    assert_eq!(content.publisher, "127.0.0.1");
    page.assert_async().await;
}

#[tokio::test]
async fn forbidden_page_is_a_fetch_error() {
    let mut server = Server::new_async().await;
    let _page = server
        .mock("GET", "/paywalled")
        .with_status(403)
        .with_body("Forbidden")
        .create_async()
        .await;

    let err = extractor()
        .enrich(&format!("{}/paywalled", server.url()))
        .await
        .unwrap_err();

    assert!(matches!(err, PipelineError::Fetch(ref msg) if msg.contains("403")));
    assert!(err.is_recoverable());
}

#[tokio::test]
async fn server_error_is_a_fetch_error() {
    let mut server = Server::new_async().await;
    let _page = server
        .mock("GET", "/down")
        .with_status(500)
        .create_async()
        .await;

    let err = extractor()
        .enrich(&format!("{}/down", server.url()))
        .await
        .unwrap_err();

    assert!(matches!(err, PipelineError::Fetch(_)));
}

#[tokio::test]
async fn page_without_paragraphs_is_a_parse_error() {
    let mut server = Server::new_async().await;
    let _page = server
        .mock("GET", "/gallery")
        .with_status(200)
        .with_header("content-type", "text/html")
        .with_body("<html><head><title>Photo gallery</title></head><body><img src=\"a.jpg\"></body></html>")
        .create_async()
        .await;

    let err = extractor()
        .enrich(&format!("{}/gallery", server.url()))
        .await
        .unwrap_err();

    assert!(matches!(err, PipelineError::Parse(_)));
    assert!(err.is_recoverable());
}
