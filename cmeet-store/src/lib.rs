use async_trait::async_trait;
use serde_json::Value;
use std::collections::BTreeMap;
use thiserror::Error as ThisError;

pub mod clock;
pub mod memory;
pub mod social;

pub use clock::{Clock, ManualClock, SystemClock};
pub use memory::MemoryStore;

#[derive(Debug, ThisError)]
pub enum StoreError {
    #[error("Store unavailable: {0}")]
    Unavailable(String),
    #[error("Json error, cause: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Bad store key, cause: {0}")]
    BadKey(#[from] cmeet_ref::RefError),
    #[error("No record at {0}")]
    Missing(String),
    #[error("Not permitted: {0}")]
    NotPermitted(String),
    #[error("Poll has no option {0}")]
    InvalidPollOption(usize),
}

/// A path-addressed, schemaless document store: subtree reads, single-key
/// last-write-wins writes, no cross-key atomicity. Paths are slash-separated
/// segments, e.g. `posts/{postId}` or `friends/{userId}/{friendId}`.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn get(&self, path: &str) -> Result<Option<Value>, StoreError>;

    async fn set(&self, path: &str, value: Value) -> Result<(), StoreError>;

    async fn remove(&self, path: &str) -> Result<(), StoreError>;

    /// One level of children under `path`, keyed by child segment in store
    /// key order. Key order of pushed children is insertion order.
    async fn children(&self, path: &str) -> Result<BTreeMap<String, Value>, StoreError>;

    /// A fresh store-assigned key, later in key order than any it has
    /// assigned before.
    async fn push_id(&self) -> Result<String, StoreError>;
}
