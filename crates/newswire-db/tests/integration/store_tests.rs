use chrono::{DateTime, Utc};
use newswire_core::clock::RowIdSequence;
use newswire_core::error::AppError;
use newswire_core::persistence::{self, NewsRow};
use newswire_core::store::{Record, Row, Value};
use newswire_core::testutil::{FixedClock, article};
use newswire_core::traits::Store;

use crate::integration::common::{count, setup_test_db};

fn news_row(app_id: i64) -> Row {
    NewsRow {
        app_id,
        author: None,
        title: Some(format!("title {app_id}")),
        description: None,
        url: None,
        image_url: None,
        published_at: "2018-07-28T00:00:00Z".parse().unwrap(),
    }
    .into_row()
}

#[tokio::test]
async fn persist_articles_links_sources_to_news() {
    let (db, _container) = setup_test_db().await;
    let store = db.store();
    let clock = FixedClock::at("2018-07-28T00:00:00Z");
    let articles = vec![
        article("one", Some(("s1", "S1"))),
        article("two", Some(("s2", "S2"))),
        article("three", None),
    ];

    persistence::create(&store, &clock, &RowIdSequence::new(), &articles)
        .await
        .unwrap();

    assert_eq!(count(&db, "news").await, 3);
    assert_eq!(count(&db, "source").await, 2);

    let linked: Vec<(String, String, DateTime<Utc>)> = sqlx::query_as(
        r#"
        SELECT n.title, s.name, n.published_at
        FROM news n JOIN source s ON s.news_id = n.app_id
        ORDER BY n.app_id
        "#,
    )
    .fetch_all(db.pool())
    .await
    .unwrap();

    assert_eq!(linked.len(), 2);
    assert_eq!((linked[0].0.as_str(), linked[0].1.as_str()), ("one", "S1"));
    assert_eq!((linked[1].0.as_str(), linked[1].1.as_str()), ("two", "S2"));
    assert_eq!(
        linked[0].2,
        "2018-07-28T14:28:41Z".parse::<DateTime<Utc>>().unwrap()
    );
}

#[tokio::test]
async fn null_columns_round_trip() {
    let (db, _container) = setup_test_db().await;

    db.store()
        .create("news", NewsRow::COLUMNS, vec![news_row(1)])
        .await
        .unwrap();

    let (author, title): (Option<String>, Option<String>) =
        sqlx::query_as("SELECT author, title FROM news WHERE app_id = 1")
            .fetch_one(db.pool())
            .await
            .unwrap();
    assert_eq!(author, None);
    assert_eq!(title.as_deref(), Some("title 1"));
}

#[tokio::test]
async fn failing_row_rolls_back_the_whole_batch() {
    let (db, _container) = setup_test_db().await;

    // Duplicate primary key in the same batch.
    let err = db
        .store()
        .create(
            "news",
            NewsRow::COLUMNS,
            vec![news_row(1), news_row(2), news_row(1)],
        )
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::DatabaseError(_)));
    assert_eq!(count(&db, "news").await, 0);
}

#[tokio::test]
async fn large_batches_span_several_statements() {
    let (db, _container) = setup_test_db().await;
    let rows: Vec<Row> = (1..=20_000).map(news_row).collect();

    db.store()
        .create("news", NewsRow::COLUMNS, rows)
        .await
        .unwrap();

    assert_eq!(count(&db, "news").await, 20_000);
}

#[tokio::test]
async fn arity_mismatch_is_rejected_before_insert() {
    let (db, _container) = setup_test_db().await;
    let short = Row::new(vec![Value::BigInt(1), Value::Text(None)]);

    let err = db
        .store()
        .create("news", NewsRow::COLUMNS, vec![short])
        .await
        .unwrap_err();

    assert!(err.to_string().contains("expected 7 columns"));
    assert_eq!(count(&db, "news").await, 0);
}

#[tokio::test]
async fn bad_identifiers_are_rejected() {
    let (db, _container) = setup_test_db().await;

    let err = db
        .store()
        .create("news; DROP TABLE news", &["app_id"], vec![Row::new(vec![Value::BigInt(1)])])
        .await
        .unwrap_err();

    assert!(err.to_string().contains("invalid identifier"));
    assert_eq!(count(&db, "news").await, 0);
}

#[tokio::test]
async fn health_check_succeeds_against_live_database() {
    let (db, _container) = setup_test_db().await;
    db.store().health_check().await.unwrap();
}
