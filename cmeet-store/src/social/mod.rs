use cmeet_ref::{PostId, UserId};

mod comments;
mod friends;
mod posts;
mod reactions;
mod users;

pub use comments::add_comment;
pub use friends::{accept_friend, fetch_friend_ids, remove_friend};
pub use posts::{create_post, decode_post, delete_post, fetch_post, fetch_recent_posts, PostDraft};
pub use reactions::{cast_poll_vote, toggle_reaction};
pub use users::{decode_user, fetch_recent_users, fetch_user, set_current_mood};

pub(crate) fn post_path(post_id: &PostId) -> String {
    format!("posts/{}", post_id)
}

pub(crate) fn user_path(user_id: &UserId) -> String {
    format!("users/{}", user_id)
}

pub(crate) fn friend_edge_path(user_id: &UserId, friend_id: &UserId) -> String {
    format!("friends/{}/{}", user_id, friend_id)
}
