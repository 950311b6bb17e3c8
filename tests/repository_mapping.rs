use sqlx::PgPool;
use std::sync::Arc;
use tinylink::domain::entities::NewMapping;
use tinylink::domain::repositories::{MappingRepository, StoreError, UniqueField};
use tinylink::infrastructure::persistence::PgMappingRepository;

fn new_mapping(url: &str, token: &str) -> NewMapping {
    NewMapping {
        original_url: url.to_string(),
        short_token: token.to_string(),
    }
}

#[sqlx::test]
#[ignore = "requires DATABASE_URL"]
async fn test_insert_and_find(pool: PgPool) {
    let repo = PgMappingRepository::new(Arc::new(pool));

    let created = repo
        .insert_unique(new_mapping("https://example.com", "abc123"))
        .await
        .unwrap();

    assert_eq!(created.short_token, "abc123");
    assert_eq!(created.clicks, 0);

    let by_token = repo.find_by_token("abc123").await.unwrap().unwrap();
    assert_eq!(by_token.original_url, "https://example.com");

    let by_url = repo
        .find_by_original_url("https://example.com")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(by_url.id, created.id);
}

#[sqlx::test]
#[ignore = "requires DATABASE_URL"]
async fn test_find_not_found(pool: PgPool) {
    let repo = PgMappingRepository::new(Arc::new(pool));

    assert!(repo.find_by_token("nothing").await.unwrap().is_none());
    assert!(
        repo.find_by_original_url("https://nothing.example.com")
            .await
            .unwrap()
            .is_none()
    );
}

#[sqlx::test]
#[ignore = "requires DATABASE_URL"]
async fn test_duplicate_url_reports_original_url_constraint(pool: PgPool) {
    let repo = PgMappingRepository::new(Arc::new(pool));
    repo.insert_unique(new_mapping("https://example.com", "abc123"))
        .await
        .unwrap();

    let err = repo
        .insert_unique(new_mapping("https://example.com", "def456"))
        .await
        .unwrap_err();

    assert_eq!(err, StoreError::ConstraintViolation(UniqueField::OriginalUrl));
}

#[sqlx::test]
#[ignore = "requires DATABASE_URL"]
async fn test_duplicate_token_reports_short_token_constraint(pool: PgPool) {
    let repo = PgMappingRepository::new(Arc::new(pool));
    repo.insert_unique(new_mapping("https://example.com/a", "abc123"))
        .await
        .unwrap();

    let err = repo
        .insert_unique(new_mapping("https://example.com/b", "abc123"))
        .await
        .unwrap_err();

    assert_eq!(err, StoreError::ConstraintViolation(UniqueField::ShortToken));
}

#[sqlx::test]
#[ignore = "requires DATABASE_URL"]
async fn test_increment_clicks(pool: PgPool) {
    let repo = PgMappingRepository::new(Arc::new(pool));
    repo.insert_unique(new_mapping("https://example.com", "abc123"))
        .await
        .unwrap();

    repo.increment_clicks("abc123").await.unwrap();
    let updated = repo.increment_clicks("abc123").await.unwrap().unwrap();

    assert_eq!(updated.clicks, 2);
}

#[sqlx::test]
#[ignore = "requires DATABASE_URL"]
async fn test_increment_unknown_token(pool: PgPool) {
    let repo = PgMappingRepository::new(Arc::new(pool.clone()));

    assert!(repo.increment_clicks("missing").await.unwrap().is_none());

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM short_urls")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 0);
}

#[sqlx::test]
#[ignore = "requires DATABASE_URL"]
async fn test_concurrent_increments(pool: PgPool) {
    let repo = Arc::new(PgMappingRepository::new(Arc::new(pool)));
    repo.insert_unique(new_mapping("https://example.com", "abc123"))
        .await
        .unwrap();

    let handles: Vec<_> = (0..50)
        .map(|_| {
            let repo = repo.clone();
            tokio::spawn(async move { repo.increment_clicks("abc123").await })
        })
        .collect();

    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let mapping = repo.find_by_token("abc123").await.unwrap().unwrap();
    assert_eq!(mapping.clicks, 50);
}

#[sqlx::test]
#[ignore = "requires DATABASE_URL"]
async fn test_ping(pool: PgPool) {
    let repo = PgMappingRepository::new(Arc::new(pool));

    assert!(repo.ping().await.is_ok());
}
