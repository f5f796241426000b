//! Snapshot cache layers for the tally service.
//!
//! Two tiers hold the same computed snapshot:
//!
//! - [`LocalSnapshotCache`] — per-process, checked first, avoids any network
//!   round trip.
//! - [`SnapshotStore`] — durable and shared across instances, with Redis
//!   ([`RedisSnapshotStore`]) and in-memory ([`MemorySnapshotStore`])
//!   implementations.
//!
//! The tiers never reach into each other; the orchestrator alone decides
//! which layer is authoritative at a given instant.

pub mod error;
pub mod local;
pub mod memory;
pub mod redis;
pub mod store;

pub use error::StoreError;
pub use local::LocalSnapshotCache;
pub use memory::MemorySnapshotStore;
pub use redis::RedisSnapshotStore;
pub use store::{CacheEntry, DynSnapshotStore, SnapshotStore};
