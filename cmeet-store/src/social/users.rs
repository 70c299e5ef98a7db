use cmeet_model::{CurrentMood, User};
use cmeet_ref::UserId;
use log::{debug, trace};
use serde_json::{to_value, Value};

use crate::social::user_path;
use crate::{Clock, DocumentStore, StoreError};

pub fn decode_user(key: &str, mut value: Value) -> Option<User> {
    if let Some(map) = value.as_object_mut() {
        map.insert("id".to_string(), Value::String(key.to_string()));
    }
    match serde_json::from_value(value) {
        Ok(user) => Some(user),
        Err(error) => {
            debug!("skipping misformatted user {}: {}", key, error);
            None
        }
    }
}

pub async fn fetch_user(
    store: &dyn DocumentStore,
    user_id: &UserId,
) -> Result<Option<User>, StoreError> {
    let value = store.get(&user_path(user_id)).await?;
    Ok(value.and_then(|value| decode_user(user_id.as_str(), value)))
}

/// Candidate window for profile discovery, in store key order.
pub async fn fetch_recent_users(
    store: &dyn DocumentStore,
    limit: usize,
) -> Result<Vec<User>, StoreError> {
    let children = store.children("users").await?;
    let mut users: Vec<User> = children
        .into_iter()
        .filter_map(|(key, value)| decode_user(&key, value))
        .collect();
    users.truncate(limit);
    Ok(users)
}

pub async fn set_current_mood(
    store: &dyn DocumentStore,
    clock: &dyn Clock,
    user_id: &UserId,
    mood: String,
) -> Result<(), StoreError> {
    let current = CurrentMood {
        mood,
        timestamp_ms: clock.now_ms(),
    };
    trace!("set current mood for {}", user_id);
    store
        .set(
            &format!("{}/currentMood", user_path(user_id)),
            to_value(&current)?,
        )
        .await?;
    Ok(())
}
