//! Maps upstream articles onto `news` and `source` rows.

use chrono::{DateTime, Utc};

use crate::clock::RowIdSequence;
use crate::error::AppError;
use crate::models::Article;
use crate::store::{Record, Row, Value, insert_records};
use crate::traits::{Clock, Store};

/// One `news` row.
#[derive(Debug, Clone, PartialEq)]
pub struct NewsRow {
    pub app_id: i64,
    pub author: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub url: Option<String>,
    pub image_url: Option<String>,
    pub published_at: DateTime<Utc>,
}

impl Record for NewsRow {
    const TABLE: &'static str = "news";
    const COLUMNS: &'static [&'static str] = &[
        "app_id",
        "author",
        "title",
        "description",
        "url",
        "image_url",
        "published_at",
    ];

    fn into_row(self) -> Row {
        Row::new(vec![
            Value::from(self.app_id),
            Value::from(self.author),
            Value::from(self.title),
            Value::from(self.description),
            Value::from(self.url),
            Value::from(self.image_url),
            Value::from(self.published_at),
        ])
    }
}

/// One `source` row, keyed by the `app_id` of the article it belongs to.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceRow {
    pub news_id: i64,
    pub id: Option<String>,
    pub name: String,
}

impl Record for SourceRow {
    const TABLE: &'static str = "source";
    const COLUMNS: &'static [&'static str] = &["news_id", "id", "name"];

    fn into_row(self) -> Row {
        Row::new(vec![
            Value::from(self.news_id),
            Value::from(self.id),
            Value::from(self.name),
        ])
    }
}

/// Build the two parallel row sets for `articles`. Every article gets a fresh
/// id from `ids`; its source row, if any, reuses that id as `news_id`.
pub fn build_rows<C: Clock>(
    ids: &RowIdSequence,
    clock: &C,
    articles: &[Article],
) -> (Vec<NewsRow>, Vec<SourceRow>) {
    let mut news = Vec::with_capacity(articles.len());
    let mut sources = Vec::with_capacity(articles.len());

    for article in articles {
        let app_id = ids.next_id(clock);
        news.push(NewsRow {
            app_id,
            author: article.author.clone(),
            title: article.title.clone(),
            description: article.description.clone(),
            url: article.url.clone(),
            image_url: article.image_url.clone(),
            published_at: article.published_at,
        });
        if let Some(source) = &article.source {
            sources.push(SourceRow {
                news_id: app_id,
                id: source.id.clone(),
                name: source.name.clone(),
            });
        }
    }

    (news, sources)
}

/// Insert `articles` into `news`, then their sources into `source`.
///
/// The first failing insert aborts the call. The `source` insert is skipped
/// when no article carries a source.
pub async fn create<S, C>(
    store: &S,
    clock: &C,
    ids: &RowIdSequence,
    articles: &[Article],
) -> Result<(), AppError>
where
    S: Store,
    C: Clock,
{
    let (news, sources) = build_rows(ids, clock, articles);
    let (news_count, source_count) = (news.len(), sources.len());

    insert_records(store, news).await?;
    insert_records(store, sources).await?;

    tracing::debug!(news = news_count, sources = source_count, "Persisted articles");
    Ok(())
}
