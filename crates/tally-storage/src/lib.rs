//! Storage backends for the Tally engagement counters.
//!
//! Every backend implements [`CounterStore`][tally_core::CounterStore]:
//!
//! - [`RedisStore`] keeps counts and actor sets in Redis and is safe for
//!   concurrent use from many processes.
//! - [`FileStore`] keeps one JSON document per counter kind on local disk,
//!   meant for a single local development process.
//! - [`InMemoryStore`] keeps everything in a concurrent map; used in tests.

pub mod file;
pub mod memory;
pub mod redis;

pub use file::FileStore;
pub use memory::InMemoryStore;
pub use self::redis::RedisStore;
