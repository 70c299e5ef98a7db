use async_trait::async_trait;
use log::trace;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use tokio::sync::RwLock;

use crate::{DocumentStore, StoreError};

/// In-process document store backed by a JSON tree. Push keys come from a
/// monotonic counter and are zero-padded, so lexicographic key order equals
/// insertion order.
pub struct MemoryStore {
    tree: RwLock<Value>,
    counter: AtomicU64,
    offline: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            tree: RwLock::new(Value::Object(Map::new())),
            counter: AtomicU64::new(0),
            offline: AtomicBool::new(false),
        }
    }

    /// While offline, every operation fails with `StoreError::Unavailable`.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    fn check_online(&self) -> Result<(), StoreError> {
        if self.offline.load(Ordering::SeqCst) {
            Err(StoreError::Unavailable("store offline".to_string()))
        } else {
            Ok(())
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

fn segments(path: &str) -> Vec<&str> {
    path.split('/').filter(|s| !s.is_empty()).collect()
}

fn lookup<'a>(root: &'a Value, path: &str) -> Option<&'a Value> {
    let mut node = root;
    for segment in segments(path) {
        node = node.as_object()?.get(segment)?;
    }
    Some(node)
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn get(&self, path: &str) -> Result<Option<Value>, StoreError> {
        self.check_online()?;
        let tree = self.tree.read().await;
        Ok(lookup(&tree, path).cloned())
    }

    async fn set(&self, path: &str, value: Value) -> Result<(), StoreError> {
        self.check_online()?;
        trace!("set {}", path);
        let mut tree = self.tree.write().await;
        let mut node = &mut *tree;
        let segments = segments(path);
        let (last, parents) = segments
            .split_last()
            .ok_or_else(|| StoreError::Missing("empty path".to_string()))?;
        for segment in parents {
            if !node.is_object() {
                *node = Value::Object(Map::new());
            }
            node = node
                .as_object_mut()
                .unwrap()
                .entry(segment.to_string())
                .or_insert_with(|| Value::Object(Map::new()));
        }
        if !node.is_object() {
            *node = Value::Object(Map::new());
        }
        node.as_object_mut()
            .unwrap()
            .insert(last.to_string(), value);
        Ok(())
    }

    async fn remove(&self, path: &str) -> Result<(), StoreError> {
        self.check_online()?;
        trace!("remove {}", path);
        let mut tree = self.tree.write().await;
        let mut node = &mut *tree;
        let segments = segments(path);
        let (last, parents) = match segments.split_last() {
            Some(split) => split,
            None => return Ok(()),
        };
        for segment in parents {
            node = match node.as_object_mut().and_then(|map| map.get_mut(*segment)) {
                Some(child) => child,
                None => return Ok(()),
            };
        }
        if let Some(map) = node.as_object_mut() {
            map.remove(*last);
        }
        Ok(())
    }

    async fn children(&self, path: &str) -> Result<BTreeMap<String, Value>, StoreError> {
        self.check_online()?;
        let tree = self.tree.read().await;
        let children = match lookup(&tree, path).and_then(|node| node.as_object()) {
            Some(map) => map
                .iter()
                .map(|(key, value)| (key.clone(), value.clone()))
                .collect(),
            None => BTreeMap::new(),
        };
        Ok(children)
    }

    async fn push_id(&self) -> Result<String, StoreError> {
        self.check_online()?;
        let n = self.counter.fetch_add(1, Ordering::SeqCst);
        Ok(format!("k{:012}", n))
    }
}
