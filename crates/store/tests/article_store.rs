use common::{ArticleStore, DedupSink, NormalizedRecord, PipelineError};
use store::SqlArticleStore;

fn record(id: &str) -> NormalizedRecord {
    NormalizedRecord {
        post_id: id.to_string(),
        post_title: format!("Post {}", id),
        url: format!("https://example.com/{}", id),
        score: 7,
        publisher: "example".into(),
        headline: format!("It's a \"headline\" for {}", id),
        date_published: Some("2020-04-02 14:33:00".into()),
        content: "body text".into(),
    }
}

async fn memory_store() -> SqlArticleStore {
    SqlArticleStore::connect("sqlite::memory:").await.unwrap()
}

#[tokio::test]
async fn fresh_store_is_empty() {
    let store = memory_store().await;
    assert!(store.existing_ids().await.unwrap().is_empty());
    assert_eq!(store.count().await.unwrap(), 0);
}

#[tokio::test]
async fn appended_rows_round_trip() {
    let store = memory_store().await;
    let mut undated = record("b2");
    undated.date_published = None;

    let written = store.append(&[record("a1"), undated.clone()]).await.unwrap();
    assert_eq!(written, 2);

    let ids = store.existing_ids().await.unwrap();
    assert!(ids.contains("a1") && ids.contains("b2"));
    assert_eq!(store.find("a1").await.unwrap(), Some(record("a1")));
    assert_eq!(store.find("b2").await.unwrap(), Some(undated));
    assert_eq!(store.find("zz").await.unwrap(), None);
}

#[tokio::test]
async fn large_batches_are_chunked() {
    let store = memory_store().await;
    let batch: Vec<NormalizedRecord> = (0..250).map(|i| record(&format!("p{}", i))).collect();

    assert_eq!(store.append(&batch).await.unwrap(), 250);
    assert_eq!(store.count().await.unwrap(), 250);
}

#[tokio::test]
async fn duplicate_key_rolls_back_whole_append() {
    let store = memory_store().await;

    let err = store
        .append(&[record("a1"), record("a2"), record("a1")])
        .await
        .unwrap_err();

    assert!(matches!(err, PipelineError::Store(_)));
    assert_eq!(store.count().await.unwrap(), 0);
}

#[tokio::test]
async fn sink_writes_only_new_ids() {
    let store = memory_store().await;
    store.append(&[record("x1")]).await.unwrap();
    let sink = DedupSink::new(store);

    let written = sink
        .persist(vec![record("x1"), record("x2"), record("x3")])
        .await
        .unwrap();

    assert_eq!(written, 2);
    assert_eq!(sink.store().count().await.unwrap(), 3);
    assert_eq!(sink.persist(vec![record("x2"), record("x3")]).await.unwrap(), 0);
    assert_eq!(sink.store().count().await.unwrap(), 3);
}

#[tokio::test]
async fn file_database_persists_across_connections() {
    let dir = tempfile::tempdir().unwrap();
    let url = format!("sqlite://{}", dir.path().join("articles.db").display());

    let first = SqlArticleStore::connect(&url).await.unwrap();
    first.append(&[record("a1")]).await.unwrap();
    drop(first);

    let second = SqlArticleStore::connect(&url).await.unwrap();
    assert!(second.existing_ids().await.unwrap().contains("a1"));
}
