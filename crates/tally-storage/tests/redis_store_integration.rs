//! Integration tests against a real Redis server started with testcontainers.

use std::sync::Arc;

use redis::AsyncCommands;
use tally_core::{ActorId, CounterKind, CounterStore, Delta, Slug};
use tally_storage::{FileStore, RedisStore};
use tally_test_infra::RedisMaster;

fn slug(s: &str) -> Slug {
    Slug::new(s).unwrap()
}

async fn start() -> (RedisMaster, redis::aio::MultiplexedConnection) {
    let redis = RedisMaster::new()
        .await
        .expect("Failed to start Redis container");
    let conn = redis
        .connection()
        .await
        .expect("Failed to connect to Redis container");
    (redis, conn)
}

#[tokio::test]
async fn unknown_slug_reads_as_empty() {
    let (_redis, conn) = start().await;
    let store = RedisStore::new(conn, CounterKind::Likes);

    assert_eq!(store.get_count(&slug("nope")).await.unwrap(), 0);
    assert!(!store
        .has_acted(&slug("nope"), &ActorId::new("a"))
        .await
        .unwrap());
}

#[tokio::test]
async fn writes_use_documented_key_layout() {
    let (_redis, conn) = start().await;
    let likes = RedisStore::new(conn.clone(), CounterKind::Likes);
    let views = RedisStore::new(conn.clone(), CounterKind::Views);
    let s = slug("my-post");
    let a = ActorId::new("1.2.3.4");

    likes.record_action(&s, &a, Delta::Increment).await.unwrap();
    views.record_action(&s, &a, Delta::Increment).await.unwrap();

    let mut conn = conn;
    let like_count: i64 = conn.get("likes:my-post").await.unwrap();
    let liked_by: Vec<String> = conn.smembers("likes:my-post:ips").await.unwrap();
    let view_count: i64 = conn.get("views:my-post").await.unwrap();
    let viewed_by: Vec<String> = conn.smembers("views:my-post:visitors").await.unwrap();

    assert_eq!(like_count, 1);
    assert_eq!(liked_by, vec!["1.2.3.4".to_string()]);
    assert_eq!(view_count, 1);
    assert_eq!(viewed_by, vec!["1.2.3.4".to_string()]);
}

#[tokio::test]
async fn decrement_is_floored_at_zero() {
    let (_redis, conn) = start().await;
    let store = RedisStore::new(conn.clone(), CounterKind::Likes);
    let s = slug("my-post");
    let a = ActorId::new("a");

    store.record_action(&s, &a, Delta::Increment).await.unwrap();
    assert_eq!(store.record_action(&s, &a, Delta::Decrement).await.unwrap(), 0);
    assert_eq!(store.record_action(&s, &a, Delta::Decrement).await.unwrap(), 0);

    let mut conn = conn;
    let raw: i64 = conn.get("likes:my-post").await.unwrap();
    assert_eq!(raw, 0);
    assert!(!store.has_acted(&s, &a).await.unwrap());
}

#[tokio::test]
async fn concurrent_likes_from_distinct_actors_converge() {
    let (_redis, conn) = start().await;
    let store = Arc::new(RedisStore::new(conn, CounterKind::Likes));
    let mut handles = vec![];

    for i in 0..50 {
        let store = Arc::clone(&store);
        handles.push(tokio::spawn(async move {
            store
                .record_action(
                    &slug("hot-post"),
                    &ActorId::new(format!("10.0.0.{i}")),
                    Delta::Increment,
                )
                .await
                .unwrap();
        }));
    }

    for handle in handles {
        handle.await.unwrap();
    }

    assert_eq!(store.get_count(&slug("hot-post")).await.unwrap(), 50);
}

#[tokio::test]
async fn matches_file_store_for_the_same_sequence() {
    let (_redis, conn) = start().await;
    let dir = tempfile::tempdir().unwrap();
    let redis_store = RedisStore::new(conn, CounterKind::Likes);
    let file_store = FileStore::new(dir.path(), CounterKind::Likes);

    let steps = [
        ("a", Delta::Increment),
        ("b", Delta::Increment),
        ("a", Delta::Decrement),
        ("c", Delta::Decrement),
        ("c", Delta::Decrement),
        ("b", Delta::Decrement),
        ("d", Delta::Increment),
    ];

    let s = slug("my-post");
    for (actor, delta) in steps {
        let actor = ActorId::new(actor);
        let from_redis = redis_store.record_action(&s, &actor, delta).await.unwrap();
        let from_file = file_store.record_action(&s, &actor, delta).await.unwrap();
        assert_eq!(from_redis, from_file, "diverged at {actor} {delta:?}");
    }

    for actor in ["a", "b", "c", "d"] {
        let actor = ActorId::new(actor);
        assert_eq!(
            redis_store.has_acted(&s, &actor).await.unwrap(),
            file_store.has_acted(&s, &actor).await.unwrap(),
        );
    }
}
