use async_trait::async_trait;
use redis::{AsyncCommands, Script};
use tally_core::store::Result;
use tally_core::{ActorId, CounterKind, CounterStore, Delta, Slug, StorageError};
use tracing::{debug, trace, warn};

/// Adds the actor to the set and increments the count.
const INCREMENT_SCRIPT: &str = r#"
redis.call('SADD', KEYS[2], ARGV[1])
return redis.call('INCR', KEYS[1])
"#;

/// Removes the actor from the set and decrements the count, floored at zero.
const DECREMENT_SCRIPT: &str = r#"
redis.call('SREM', KEYS[2], ARGV[1])
local count = redis.call('DECR', KEYS[1])
if count < 0 then
  redis.call('SET', KEYS[1], 0)
  count = 0
end
return count
"#;

/// Redis implementation of [`CounterStore`].
///
/// Key layout, for a store of kind `likes`:
///
/// - `likes:<slug>` holds the count as an integer string;
/// - `likes:<slug>:ips` holds the set of actors (`views:<slug>:visitors`
///   for views).
///
/// Each recorded action runs as one Lua script, so the set update, the
/// counter update and the zero floor happen atomically on the server.
#[derive(Debug, Clone)]
pub struct RedisStore {
    conn: redis::aio::MultiplexedConnection,
    kind: CounterKind,
    increment: Script,
    decrement: Script,
}

fn map_redis_error(operation: &str, err: redis::RedisError) -> StorageError {
    let message = format!("{operation}: {err}");
    let lowered = message.to_ascii_lowercase();
    if lowered.contains("timed out") {
        StorageError::Timeout(message)
    } else if lowered.contains("connection") || lowered.contains("broken pipe") {
        StorageError::Unavailable(message)
    } else if lowered.contains("response was of incompatible type")
        || lowered.contains("not an integer")
    {
        StorageError::InvalidData(message)
    } else {
        StorageError::Operation(message)
    }
}

fn count_key(kind: CounterKind, slug: &Slug) -> String {
    format!("{}:{}", kind.as_str(), slug.as_str())
}

fn actors_key(kind: CounterKind, slug: &Slug) -> String {
    format!("{}:{}:{}", kind.as_str(), slug.as_str(), kind.actors_suffix())
}

impl RedisStore {
    /// Creates a store for `kind` on top of an existing connection.
    ///
    /// # Arguments
    ///
    /// * `conn` - A multiplexed Redis connection, cheap to clone per call
    /// * `kind` - The counter kind, which selects the key namespace
    pub fn new(conn: redis::aio::MultiplexedConnection, kind: CounterKind) -> Self {
        Self {
            conn,
            kind,
            increment: Script::new(INCREMENT_SCRIPT),
            decrement: Script::new(DECREMENT_SCRIPT),
        }
    }

    /// Opens a new multiplexed connection to `redis_url`.
    pub async fn connect(redis_url: &str) -> Result<redis::aio::MultiplexedConnection> {
        let client = redis::Client::open(redis_url)
            .map_err(|e| map_redis_error("invalid redis url", e))?;
        client
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| StorageError::Unavailable(format!("failed to connect to redis: {e}")))
    }
}

#[async_trait]
impl CounterStore for RedisStore {
    async fn get_count(&self, slug: &Slug) -> Result<u64> {
        let key = count_key(self.kind, slug);
        trace!(key = %key, "reading count from redis");

        let mut conn = self.conn.clone();
        let count: Option<i64> = conn.get(&key).await.map_err(|e| {
            warn!(key = %key, error = %e, "redis error on get");
            map_redis_error("failed to read count from redis", e)
        })?;

        Ok(count.map_or(0, |c| c.max(0).unsigned_abs()))
    }

    async fn has_acted(&self, slug: &Slug, actor: &ActorId) -> Result<bool> {
        let key = actors_key(self.kind, slug);
        trace!(key = %key, "checking actor membership in redis");

        let mut conn = self.conn.clone();
        let member: bool = conn.sismember(&key, actor.as_str()).await.map_err(|e| {
            warn!(key = %key, error = %e, "redis error on sismember");
            map_redis_error("failed to check actor membership in redis", e)
        })?;

        Ok(member)
    }

    async fn record_action(&self, slug: &Slug, actor: &ActorId, delta: Delta) -> Result<u64> {
        let count_key = count_key(self.kind, slug);
        let actors_key = actors_key(self.kind, slug);

        let script = match delta {
            Delta::Increment => &self.increment,
            Delta::Decrement => &self.decrement,
        };

        let mut conn = self.conn.clone();
        let count: i64 = script
            .key(&count_key)
            .key(&actors_key)
            .arg(actor.as_str())
            .invoke_async(&mut conn)
            .await
            .map_err(|e| {
                warn!(key = %count_key, ?delta, error = %e, "redis error on record action");
                map_redis_error("failed to record action in redis", e)
            })?;

        debug!(key = %count_key, ?delta, count, "recorded action in redis");
        Ok(count.max(0).unsigned_abs())
    }
}
