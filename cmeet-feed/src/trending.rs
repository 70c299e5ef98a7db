use cmeet_store::social::fetch_recent_posts;
use cmeet_store::{Clock, DocumentStore, StoreError};
use itertools::Itertools;
use log::debug;
use std::collections::BTreeMap;
use std::sync::Mutex;

use crate::classify::classify;

pub const TRENDING_WINDOW: usize = 50;
pub const TRENDING_TOP: usize = 5;
pub const TRENDING_COOLDOWN_MS: i64 = 60_000;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TagCount {
    pub tag: String,
    pub count: u64,
}

/// Windowed hashtag frequency count with a fixed cooldown: at most one
/// recomputation per 60-second window, the last result is reused in
/// between. A rate limit, not cache invalidation.
pub struct TrendingTags {
    window: usize,
    cooldown_ms: i64,
    last: Mutex<Option<(i64, Vec<TagCount>)>>,
}

impl TrendingTags {
    pub fn new() -> Self {
        Self {
            window: TRENDING_WINDOW,
            cooldown_ms: TRENDING_COOLDOWN_MS,
            last: Mutex::new(None),
        }
    }

    pub fn with_window(window: usize) -> Self {
        Self {
            window,
            ..Self::new()
        }
    }

    pub async fn compute(
        &self,
        store: &dyn DocumentStore,
        clock: &dyn Clock,
    ) -> Result<Vec<TagCount>, StoreError> {
        let now = clock.now_ms();
        {
            let last = self.last.lock().unwrap();
            if let Some((computed_at, tags)) = &*last {
                if now - computed_at < self.cooldown_ms {
                    return Ok(tags.clone());
                }
            }
        }

        let posts = fetch_recent_posts(store, self.window).await?;
        let mut counts: BTreeMap<String, u64> = BTreeMap::new();
        for post in &posts {
            for tag in classify(post).hashtags {
                *counts.entry(tag).or_insert(0) += 1;
            }
        }
        let tags: Vec<TagCount> = counts
            .into_iter()
            .map(|(tag, count)| TagCount { tag, count })
            .sorted_by(|a, b| b.count.cmp(&a.count).then_with(|| a.tag.cmp(&b.tag)))
            .take(TRENDING_TOP)
            .collect();
        debug!("recomputed trending tags over {} posts", posts.len());

        let mut last = self.last.lock().unwrap();
        *last = Some((now, tags.clone()));
        Ok(tags)
    }
}

impl Default for TrendingTags {
    fn default() -> Self {
        Self::new()
    }
}
