use cmeet_model::{Poll, Reaction};
use cmeet_ref::{PostId, UserId};
use log::trace;
use serde_json::{from_value, to_value, Value};

use crate::social::post_path;
use crate::{DocumentStore, StoreError};

/// Set or clear the viewer's reaction on a post. Reacting again with the
/// same kind clears it; a different kind replaces it (at most one entry per
/// user, idempotent set semantics). Returns whether a reaction is now set.
pub async fn toggle_reaction(
    store: &dyn DocumentStore,
    post_id: &PostId,
    user_id: &UserId,
    kind: Reaction,
) -> Result<bool, StoreError> {
    let path = format!("{}/likes/{}", post_path(post_id), user_id);
    let existing = store
        .get(&path)
        .await?
        .and_then(|value| from_value::<Reaction>(value).ok());
    if existing.as_ref() == Some(&kind) {
        trace!("clear reaction {} on {}", user_id, post_id);
        store.remove(&path).await?;
        Ok(false)
    } else {
        trace!("set reaction {} on {}", user_id, post_id);
        store.set(&path, to_value(&kind)?).await?;
        Ok(true)
    }
}

/// Cast a poll vote: one vote per user, last write wins. Out-of-range
/// option indices are rejected before anything is written.
pub async fn cast_poll_vote(
    store: &dyn DocumentStore,
    post_id: &PostId,
    user_id: &UserId,
    option_index: usize,
) -> Result<(), StoreError> {
    let poll_path = format!("{}/poll", post_path(post_id));
    let poll: Poll = match store.get(&poll_path).await? {
        Some(value) => from_value(value)?,
        None => return Err(StoreError::Missing(poll_path)),
    };
    if option_index >= poll.options.len() {
        return Err(StoreError::InvalidPollOption(option_index));
    }
    let vote_path = format!("{}/votes/{}", poll_path, user_id);
    store.set(&vote_path, Value::from(option_index)).await?;
    Ok(())
}
