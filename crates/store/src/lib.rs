use std::collections::HashSet;
use std::str::FromStr;

use async_trait::async_trait;
use common::{ArticleStore, NormalizedRecord, PipelineError, PipelineResult};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::{QueryBuilder, Sqlite};
use tracing::info;

/// Keeps each INSERT under SQLite's historical 999 bind-parameter limit.
const ROWS_PER_STATEMENT: usize = 100;

const CREATE_ARTICLE_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS article (
    post_id        TEXT PRIMARY KEY NOT NULL,
    post_title     TEXT NOT NULL,
    url            TEXT NOT NULL,
    score          INTEGER NOT NULL,
    publisher      TEXT NOT NULL,
    headline       TEXT NOT NULL,
    date_published TEXT,
    content        TEXT NOT NULL
)
"#;

fn store_err(e: sqlx::Error) -> PipelineError {
    PipelineError::Store(e.to_string())
}

/// The `article` table in a SQLite database.
#[derive(Clone)]
pub struct SqlArticleStore {
    pool: SqlitePool,
}

impl SqlArticleStore {
    /// Opens (creating if needed) the database and ensures the table exists.
    pub async fn connect(database_url: &str) -> PipelineResult<Self> {
        let options = SqliteConnectOptions::from_str(database_url)
            .map_err(store_err)?
            .create_if_missing(true);

        // One connection: the pipeline is the only writer, and an in-memory
        // database only lives as long as its connection.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await
            .map_err(store_err)?;

        let store = Self { pool };
        store.ensure_schema().await?;
        info!("Connected to article store at {}", database_url);
        Ok(store)
    }

    pub async fn ensure_schema(&self) -> PipelineResult<()> {
        sqlx::query(CREATE_ARTICLE_TABLE)
            .execute(&self.pool)
            .await
            .map_err(store_err)?;
        Ok(())
    }

    pub async fn count(&self) -> PipelineResult<i64> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM article")
            .fetch_one(&self.pool)
            .await
            .map_err(store_err)
    }

    pub async fn find(&self, post_id: &str) -> PipelineResult<Option<NormalizedRecord>> {
        let row = sqlx::query_as::<_, (String, String, String, i64, String, String, Option<String>, String)>(
            "SELECT post_id, post_title, url, score, publisher, headline, date_published, content \
             FROM article WHERE post_id = ?",
        )
        .bind(post_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(store_err)?;

        Ok(row.map(
            |(post_id, post_title, url, score, publisher, headline, date_published, content)| {
                NormalizedRecord {
                    post_id,
                    post_title,
                    url,
                    score,
                    publisher,
                    headline,
                    date_published,
                    content,
                }
            },
        ))
    }
}

#[async_trait]
impl ArticleStore for SqlArticleStore {
    async fn existing_ids(&self) -> PipelineResult<HashSet<String>> {
        let ids = sqlx::query_scalar::<_, String>("SELECT DISTINCT post_id FROM article")
            .fetch_all(&self.pool)
            .await
            .map_err(store_err)?;
        Ok(ids.into_iter().collect())
    }

    /// All rows go in one transaction; a failing chunk rolls back the lot.
    async fn append(&self, rows: &[NormalizedRecord]) -> PipelineResult<u64> {
        if rows.is_empty() {
            return Ok(0);
        }

        let mut tx = self.pool.begin().await.map_err(store_err)?;
        let mut written = 0;

        for chunk in rows.chunks(ROWS_PER_STATEMENT) {
            let mut builder: QueryBuilder<Sqlite> = QueryBuilder::new(
                "INSERT INTO article \
                 (post_id, post_title, url, score, publisher, headline, date_published, content) ",
            );
            builder.push_values(chunk, |mut row, record| {
                row.push_bind(record.post_id.clone())
                    .push_bind(record.post_title.clone())
                    .push_bind(record.url.clone())
                    .push_bind(record.score)
                    .push_bind(record.publisher.clone())
                    .push_bind(record.headline.clone())
                    .push_bind(record.date_published.clone())
                    .push_bind(record.content.clone());
            });

            let result = builder
                .build()
                .execute(&mut *tx)
                .await
                .map_err(store_err)?;
            written += result.rows_affected();
        }

        tx.commit().await.map_err(store_err)?;
        Ok(written)
    }
}
