use common::config::{ArticleConfig, DatabaseConfig, PipelineConfig, RedditConfig};
use common::{Config, PipelineError, RunReport};

fn config_with_database(url: &str) -> Config {
    Config {
        reddit: RedditConfig {
            client_id: "id".into(),
            client_secret: "secret".into(),
            user_agent: "news-ingest-tests/0.1".into(),
        },
        database: DatabaseConfig { url: url.into() },
        article: ArticleConfig::default(),
        pipeline: PipelineConfig::default(),
    }
}

#[tokio::test]
async fn unreachable_store_fails_before_fetching() {
    let config = config_with_database("sqlite:///nonexistent-dir/for/sure/articles.db");

    let err = orchestrator::run_pipeline(&config).await.unwrap_err();

    assert!(format!("{:#}", err).contains("opening article store"));
    assert!(matches!(
        err.downcast_ref::<PipelineError>(),
        Some(PipelineError::Store(_))
    ));
}

#[test]
fn report_summarizes_failures() {
    let report = RunReport {
        attempted: 2,
        enriched: 1,
        persisted: 1,
        skipped_leading: 1,
        errors: vec![(
            "https://example.com/paywalled".to_string(),
            PipelineError::Fetch("403 Forbidden".into()),
        )],
        ..RunReport::default()
    };
    orchestrator::log_report(&report);

    let summary = report.to_string();
    assert!(
        summary.starts_with("attempted 2, enriched 1, persisted 1, failed 1 in "),
        "{}",
        summary
    );
}
