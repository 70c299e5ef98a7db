use cmeet_model::{Post, Privacy};
use cmeet_ref::UserId;
use std::collections::BTreeSet;

/// Whether `viewer_id` may see `post`. Pure function of its inputs; the
/// friendship set is fetched once per feed request, not per post.
///
/// Authors always see their own posts. Unrecognized privacy values behave
/// as `private` (default-deny).
pub fn is_visible(post: &Post, viewer_id: &UserId, viewer_friend_ids: &BTreeSet<UserId>) -> bool {
    if post.author_id == *viewer_id {
        return true;
    }
    match post.privacy {
        Privacy::Public => true,
        Privacy::Friends => viewer_friend_ids.contains(&post.author_id),
        Privacy::Private | Privacy::Unknown => false,
    }
}
