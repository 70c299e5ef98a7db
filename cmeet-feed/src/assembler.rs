use cmeet_ref::UserId;
use cmeet_store::social::{fetch_friend_ids, fetch_recent_posts, fetch_user};
use cmeet_store::{DocumentStore, StoreError};
use log::debug;
use thiserror::Error as ThisError;

use crate::classify::{classify, Classified};
use crate::rank::{rank, RankContext, Strategy};
use crate::visibility::is_visible;

#[derive(Debug, ThisError)]
pub enum FeedError {
    #[error("No authenticated viewer")]
    NotAuthenticated,
    #[error("Store error, cause: {0}")]
    Store(#[from] StoreError),
}

/// Opaque pagination cursor. Callers hand it back unchanged; the ordering
/// is deterministic for unchanged data, so an offset into the ranked order
/// is stable across calls.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PageState {
    offset: usize,
}

#[derive(Debug)]
pub struct FeedPage {
    pub posts: Vec<Classified>,
    pub next_page: Option<PageState>,
    /// See `RankOutcome::mood_fallback`.
    pub mood_fallback: bool,
}

/// Orchestrates one feed request: friend set once, bounded candidate
/// window, visibility filter, classifier, ranking engine, page slice.
/// Read-only; never mutates posts and never retries.
pub struct FeedAssembler<'a> {
    store: &'a dyn DocumentStore,
    /// Bound on the candidate fetch from the store.
    pub candidate_window: usize,
    pub page_size: usize,
}

impl<'a> FeedAssembler<'a> {
    pub fn new(store: &'a dyn DocumentStore) -> Self {
        Self {
            store,
            candidate_window: 200,
            page_size: 20,
        }
    }

    pub async fn get_feed(
        &self,
        viewer_id: &UserId,
        strategy: Strategy,
        page: Option<PageState>,
    ) -> Result<FeedPage, FeedError> {
        let viewer = fetch_user(self.store, viewer_id)
            .await?
            .ok_or(FeedError::NotAuthenticated)?;
        let viewer_friend_ids = fetch_friend_ids(self.store, viewer_id).await?;

        // chronological setting overrides the engagement-driven strategies
        let strategy = match strategy {
            Strategy::Popular | Strategy::Personalized
                if viewer.settings.chronological_feed =>
            {
                Strategy::Chronological
            }
            other => other,
        };

        let candidates = fetch_recent_posts(self.store, self.candidate_window).await?;
        debug!(
            "feed for {}: {} candidates, strategy {:?}",
            viewer_id,
            candidates.len(),
            strategy
        );

        let survivors: Vec<Classified> = candidates
            .into_iter()
            .filter(|post| is_visible(post, viewer_id, &viewer_friend_ids))
            .map(|post| {
                let signals = classify(&post);
                Classified { post, signals }
            })
            .collect();

        let context = RankContext {
            viewer_friend_ids,
            viewer_mood: viewer.current_mood.map(|m| m.mood),
        };
        let outcome = rank(survivors, strategy, &context);

        let offset = page.unwrap_or_default().offset;
        let total = outcome.posts.len();
        let posts: Vec<Classified> = outcome
            .posts
            .into_iter()
            .skip(offset)
            .take(self.page_size)
            .collect();
        let end = offset + posts.len();
        let next_page = if end < total {
            Some(PageState { offset: end })
        } else {
            None
        };

        Ok(FeedPage {
            posts,
            next_page,
            mood_fallback: outcome.mood_fallback,
        })
    }
}
