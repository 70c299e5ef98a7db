use cmeet_model::{Poll, Post, Privacy};
use cmeet_ref::{extract_hashtags, extract_mentions, PostId, UserId};
use log::{debug, trace};
use serde_json::{to_value, Value};

use crate::social::post_path;
use crate::{Clock, DocumentStore, StoreError};

pub struct PostDraft {
    pub content: String,
    pub image_url: Option<String>,
    pub privacy: Privacy,
    pub mood_tag: Option<String>,
    pub poll: Option<Poll>,
}

/// Decode one `posts/` child into a typed record. The child key is the
/// authoritative id and is injected over whatever the record carries.
/// Records that fail to decode are skipped, not fatal; the store holds
/// whatever past clients wrote.
pub fn decode_post(key: &str, mut value: Value) -> Option<Post> {
    if let Some(map) = value.as_object_mut() {
        map.insert("id".to_string(), Value::String(key.to_string()));
    }
    match serde_json::from_value(value) {
        Ok(post) => Some(post),
        Err(error) => {
            debug!("skipping misformatted post {}: {}", key, error);
            None
        }
    }
}

pub async fn fetch_post(
    store: &dyn DocumentStore,
    post_id: &PostId,
) -> Result<Option<Post>, StoreError> {
    let value = store.get(&post_path(post_id)).await?;
    Ok(value.and_then(|value| decode_post(post_id.as_str(), value)))
}

/// Bounded candidate window: the most recent `limit` decodable posts,
/// ordered by timestamp descending, ties by push key descending.
pub async fn fetch_recent_posts(
    store: &dyn DocumentStore,
    limit: usize,
) -> Result<Vec<Post>, StoreError> {
    let children = store.children("posts").await?;
    let mut posts: Vec<Post> = children
        .into_iter()
        .filter_map(|(key, value)| decode_post(&key, value))
        .collect();
    posts.sort_by(|a, b| {
        b.timestamp_ms
            .cmp(&a.timestamp_ms)
            .then_with(|| b.id.cmp(&a.id))
    });
    posts.truncate(limit);
    Ok(posts)
}

/// Create a post: assign a push id, stamp the clock, extract and cache the
/// token sets from the content. An anonymous author gets no display
/// identity on the record; past posts are untouched.
pub async fn create_post(
    store: &dyn DocumentStore,
    clock: &dyn Clock,
    author: &cmeet_model::User,
    draft: PostDraft,
) -> Result<Post, StoreError> {
    let id = PostId::from_string(store.push_id().await?)?;
    let author_name = if author.settings.anonymous {
        None
    } else {
        author.display_name.clone()
    };
    let post = Post {
        id,
        author_id: author.id.clone(),
        author_name,
        content: draft.content.clone(),
        image_url: draft.image_url,
        privacy: draft.privacy,
        timestamp_ms: clock.now_ms(),
        likes: Default::default(),
        comments: Default::default(),
        hashtags: Some(extract_hashtags(&draft.content)),
        mentions: Some(extract_mentions(&draft.content)),
        mood_tag: draft.mood_tag,
        poll: draft.poll,
    };
    trace!("create post {}", post.id);
    store.set(&post_path(&post.id), to_value(&post)?).await?;
    Ok(post)
}

/// Hard delete, author only. No tombstone; dangling references elsewhere
/// are the readers' problem.
pub async fn delete_post(
    store: &dyn DocumentStore,
    author_id: &UserId,
    post_id: &PostId,
) -> Result<bool, StoreError> {
    let post = match fetch_post(store, post_id).await? {
        Some(post) => post,
        None => return Ok(false),
    };
    if &post.author_id != author_id {
        return Err(StoreError::NotPermitted(format!(
            "only the author may delete {}",
            post_id
        )));
    }
    store.remove(&post_path(post_id)).await?;
    Ok(true)
}
