use cmeet_model::Comment;
use cmeet_ref::{PostId, UserId};
use log::trace;
use serde_json::to_value;

use crate::social::post_path;
use crate::{Clock, DocumentStore, StoreError};

/// Append a comment under its own push key. Comments are never compacted;
/// push-key order keeps them in time order.
pub async fn add_comment(
    store: &dyn DocumentStore,
    clock: &dyn Clock,
    post_id: &PostId,
    author_id: &UserId,
    text: String,
) -> Result<Comment, StoreError> {
    let comment = Comment {
        author_id: author_id.clone(),
        text,
        timestamp_ms: clock.now_ms(),
    };
    let key = store.push_id().await?;
    let path = format!("{}/comments/{}", post_path(post_id), key);
    trace!("add comment {} on {}", key, post_id);
    store.set(&path, to_value(&comment)?).await?;
    Ok(comment)
}
