use cmeet_ref::UserId;
use log::{debug, trace};
use serde_json::Value;
use std::collections::BTreeSet;

use crate::social::friend_edge_path;
use crate::{DocumentStore, StoreError};

/// The viewer's friend set, fetched once per feed request. Child keys that
/// are not valid user ids are skipped.
pub async fn fetch_friend_ids(
    store: &dyn DocumentStore,
    user_id: &UserId,
) -> Result<BTreeSet<UserId>, StoreError> {
    let children = store.children(&format!("friends/{}", user_id)).await?;
    let mut friends = BTreeSet::new();
    for (key, _value) in children {
        match UserId::from_string(key) {
            Ok(friend_id) => {
                friends.insert(friend_id);
            }
            Err(error) => debug!("skipping bad friend edge: {}", error),
        }
    }
    Ok(friends)
}

/// Accept a friend request: writes the edge into both friend sets. Two
/// independent single-key writes; another reader may observe one without
/// the other until both land.
pub async fn accept_friend(
    store: &dyn DocumentStore,
    user_id: &UserId,
    friend_id: &UserId,
) -> Result<(), StoreError> {
    trace!("accept friend {} <-> {}", user_id, friend_id);
    store
        .set(&friend_edge_path(user_id, friend_id), Value::Bool(true))
        .await?;
    store
        .set(&friend_edge_path(friend_id, user_id), Value::Bool(true))
        .await?;
    Ok(())
}

pub async fn remove_friend(
    store: &dyn DocumentStore,
    user_id: &UserId,
    friend_id: &UserId,
) -> Result<(), StoreError> {
    trace!("remove friend {} <-> {}", user_id, friend_id);
    store.remove(&friend_edge_path(user_id, friend_id)).await?;
    store.remove(&friend_edge_path(friend_id, user_id)).await?;
    Ok(())
}
