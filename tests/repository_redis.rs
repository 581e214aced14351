//! Tests against a live Redis Stack instance.
//!
//! Ignored by default. Run them with `REDIS_TEST_URL` pointing at Redis Stack:
//! `REDIS_TEST_URL=redis://localhost:6379 cargo test --test repository_redis -- --ignored`.

use linkify::domain::entities::NewLinkRecord;
use linkify::domain::repositories::{LinkRepository, StoreError};
use linkify::infrastructure::persistence::{RedisLinkRepository, RedisStoreOptions};
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

const TEST_INDEX: &str = "idx:linkify-test";

async fn connect() -> RedisLinkRepository {
    let url = std::env::var("REDIS_TEST_URL").expect("REDIS_TEST_URL must be set");

    let options = RedisStoreOptions {
        index_name: TEST_INDEX.to_string(),
        operation_timeout: Duration::from_secs(5),
    };
    let repo = RedisLinkRepository::connect(&url, options).await.unwrap();
    repo.ensure_index().await.unwrap();
    repo
}

/// Alias unique to one test run.
fn alias(prefix: &str) -> String {
    format!("{}-{}", prefix, &Uuid::new_v4().simple().to_string()[..12])
}

#[tokio::test]
#[ignore = "requires Redis Stack at REDIS_TEST_URL"]
async fn test_create_and_find() {
    let repo = connect().await;
    let alias = alias("create");

    let created = repo
        .create(NewLinkRecord::new(alias.clone(), "https://example.com"))
        .await
        .unwrap();
    assert_eq!(created.visits, 0);

    let found = repo.find_by_alias(&alias).await.unwrap().unwrap();
    assert_eq!(found, created);
}

#[tokio::test]
#[ignore = "requires Redis Stack at REDIS_TEST_URL"]
async fn test_ensure_index_is_idempotent() {
    let repo = connect().await;

    assert!(!repo.ensure_index().await.unwrap());
}

#[tokio::test]
#[ignore = "requires Redis Stack at REDIS_TEST_URL"]
async fn test_hyphenated_alias_lookup_is_exact() {
    let repo = connect().await;
    let id = Uuid::new_v4().simple().to_string();
    let suffix = &id[..12];
    let hyphenated = format!("my-link-{}", suffix);
    let prefix = format!("my-{}", suffix);

    repo.create(NewLinkRecord::new(hyphenated.clone(), "https://example.com/long"))
        .await
        .unwrap();

    let found = repo.find_by_alias(&hyphenated).await.unwrap().unwrap();
    assert_eq!(found.target_url, "https://example.com/long");
    assert!(repo.find_by_alias(&prefix).await.unwrap().is_none());
}

#[tokio::test]
#[ignore = "requires Redis Stack at REDIS_TEST_URL"]
async fn test_query_syntax_in_alias_is_inert() {
    let repo = connect().await;

    for probe in ["*", "a|b", "x}) | @alias:{*", "-", "{}"] {
        assert!(repo.find_by_alias(probe).await.unwrap().is_none(), "{probe}");
    }
}

#[tokio::test]
#[ignore = "requires Redis Stack at REDIS_TEST_URL"]
async fn test_duplicate_alias_rejected() {
    let repo = connect().await;
    let alias = alias("dup");

    repo.create(NewLinkRecord::new(alias.clone(), "https://a.com"))
        .await
        .unwrap();
    let result = repo
        .create(NewLinkRecord::new(alias.clone(), "https://b.com"))
        .await;

    assert_eq!(result.unwrap_err(), StoreError::AliasTaken(alias.clone()));
    let kept = repo.find_by_alias(&alias).await.unwrap().unwrap();
    assert_eq!(kept.target_url, "https://a.com");
}

#[tokio::test]
#[ignore = "requires Redis Stack at REDIS_TEST_URL"]
async fn test_concurrent_increments() {
    let repo = connect().await;
    let repo = Arc::new(repo);
    let alias = alias("visits");

    let record = repo
        .create(NewLinkRecord::new(alias.clone(), "https://example.com"))
        .await
        .unwrap();

    let mut handles = Vec::new();
    for _ in 0..20 {
        let repo = repo.clone();
        let id = record.id.clone();
        handles.push(tokio::spawn(async move { repo.increment_visits(&id).await }));
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let found = repo.find_by_alias(&alias).await.unwrap().unwrap();
    assert_eq!(found.visits, 20);
}

#[tokio::test]
#[ignore = "requires Redis Stack at REDIS_TEST_URL"]
async fn test_increment_unknown_id_leaves_no_record() {
    let repo = connect().await;
    let id = Uuid::new_v4().to_string();

    // A second attempt would succeed if the first had created the hash.
    for _ in 0..2 {
        let result = repo.increment_visits(&id).await;
        assert_eq!(result.unwrap_err(), StoreError::MissingRecord(id.clone()));
    }
}

#[tokio::test]
#[ignore = "requires Redis Stack at REDIS_TEST_URL"]
async fn test_concurrent_creates_claim_alias_once() {
    let repo = connect().await;
    let repo = Arc::new(repo);
    let alias = alias("raced");

    let mut handles = Vec::new();
    for i in 0..10 {
        let repo = repo.clone();
        let alias = alias.clone();
        handles.push(tokio::spawn(async move {
            repo.create(NewLinkRecord::new(alias, format!("https://e.com/{}", i)))
                .await
        }));
    }

    let mut created = 0;
    for handle in handles {
        if handle.await.unwrap().is_ok() {
            created += 1;
        }
    }

    assert_eq!(created, 1);
}

#[tokio::test]
#[ignore = "requires Redis Stack at REDIS_TEST_URL"]
async fn test_health_check() {
    let repo = connect().await;
    assert!(repo.health_check().await);
}
