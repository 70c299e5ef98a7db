use cmeet_ref::UserId;
use std::collections::BTreeSet;

use crate::classify::Classified;

/// Feed ordering strategies. Mutually exclusive; selected per request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Strategy {
    /// Timestamp descending, ties by store key.
    Latest,
    /// Engagement descending, ties by timestamp descending.
    Popular,
    /// Friend-authored posts first, each bucket timestamp descending.
    Personalized,
    /// Only posts matching the viewer's current mood; falls back to all
    /// candidates (flagged) when nothing matches.
    Mood,
    /// Same order as `Latest`; selected by the viewer's settings rather
    /// than by the caller.
    Chronological,
}

pub struct RankContext {
    pub viewer_friend_ids: BTreeSet<UserId>,
    pub viewer_mood: Option<String>,
}

pub struct RankOutcome {
    pub posts: Vec<Classified>,
    /// Set when the `Mood` strategy matched nothing and all candidates were
    /// returned instead. The caller renders a distinct empty-state message;
    /// the fallback is never silent.
    pub mood_fallback: bool,
}

/// Order (or for `Mood`, filter) the candidate set. Every strategy sorts by
/// a total key, so repeated calls over unchanged data return identical
/// output.
pub fn rank(mut posts: Vec<Classified>, strategy: Strategy, context: &RankContext) -> RankOutcome {
    let mut mood_fallback = false;

    if strategy == Strategy::Mood {
        let viewer_mood = context.viewer_mood.as_deref().map(str::to_lowercase);
        let matched: Vec<Classified> = posts
            .iter()
            .filter(|c| Some(c.signals.mood.to_lowercase()) == viewer_mood)
            .cloned()
            .collect();
        if matched.is_empty() {
            mood_fallback = true;
        } else {
            posts = matched;
        }
    }

    match strategy {
        Strategy::Latest | Strategy::Chronological | Strategy::Mood => {
            posts.sort_by(|a, b| by_recency(a, b));
        }
        Strategy::Popular => {
            posts.sort_by(|a, b| {
                b.signals
                    .engagement
                    .cmp(&a.signals.engagement)
                    .then_with(|| by_recency(a, b))
            });
        }
        Strategy::Personalized => {
            posts.sort_by(|a, b| {
                let a_friend = context.viewer_friend_ids.contains(&a.post.author_id);
                let b_friend = context.viewer_friend_ids.contains(&b.post.author_id);
                b_friend.cmp(&a_friend).then_with(|| by_recency(a, b))
            });
        }
    }

    RankOutcome {
        posts,
        mood_fallback,
    }
}

// Timestamp descending; equal timestamps fall back to store key order,
// which is push (insertion) order. Total, so sorting is deterministic.
fn by_recency(a: &Classified, b: &Classified) -> std::cmp::Ordering {
    b.post
        .timestamp_ms
        .cmp(&a.post.timestamp_ms)
        .then_with(|| b.post.id.cmp(&a.post.id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::classify;
    use cmeet_model::{Comment, Post, Privacy, Reaction};

    fn post(id: &str, author: &str, timestamp_ms: i64) -> Post {
        Post {
            id: id.to_string().try_into().unwrap(),
            author_id: author.to_string().try_into().unwrap(),
            author_name: None,
            content: String::new(),
            image_url: None,
            privacy: Privacy::Public,
            timestamp_ms,
            likes: Default::default(),
            comments: Default::default(),
            hashtags: None,
            mentions: None,
            mood_tag: None,
            poll: None,
        }
    }

    fn classified(post: Post) -> Classified {
        let signals = classify(&post);
        Classified { post, signals }
    }

    fn empty_context() -> RankContext {
        RankContext {
            viewer_friend_ids: BTreeSet::new(),
            viewer_mood: None,
        }
    }

    fn ids(outcome: &RankOutcome) -> Vec<String> {
        outcome
            .posts
            .iter()
            .map(|c| c.post.id.as_str().to_string())
            .collect()
    }

    #[test]
    fn test_latest_is_deterministic() {
        let posts = vec![
            classified(post("a", "alice", 100)),
            classified(post("b", "bob", 300)),
            classified(post("c", "carol", 200)),
            classified(post("d", "dan", 200)),
        ];
        let first = rank(posts.clone(), Strategy::Latest, &empty_context());
        let second = rank(posts, Strategy::Latest, &empty_context());
        assert_eq!(ids(&first), vec!["b", "d", "c", "a"]);
        assert_eq!(ids(&first), ids(&second));
    }

    #[test]
    fn test_popular_orders_by_engagement() {
        let zero = post("a", "alice", 100);
        let mut three = post("b", "bob", 200);
        let mut five = post("c", "carol", 300);
        // (reactions, comments): (0,0) -> 0, (3,0) -> 3, (1,2) -> 5
        for n in 0..3 {
            three
                .likes
                .insert(format!("u{}", n).try_into().unwrap(), Reaction::like());
        }
        five.likes
            .insert("u0".to_string().try_into().unwrap(), Reaction::like());
        for n in 0..2 {
            five.comments.insert(
                format!("k{}", n),
                Comment {
                    author_id: "bob".to_string().try_into().unwrap(),
                    text: String::new(),
                    timestamp_ms: 0,
                },
            );
        }

        let outcome = rank(
            vec![classified(zero), classified(three), classified(five)],
            Strategy::Popular,
            &empty_context(),
        );
        assert_eq!(ids(&outcome), vec!["c", "b", "a"]);
        assert_eq!(
            outcome.posts.iter().map(|c| c.signals.engagement).collect::<Vec<_>>(),
            vec![5, 3, 0]
        );
    }

    #[test]
    fn test_personalized_buckets_friends_first() {
        let mut context = empty_context();
        context.viewer_friend_ids.insert("bob".to_string().try_into().unwrap());

        let outcome = rank(
            vec![
                classified(post("a", "stranger", 400)),
                classified(post("b", "bob", 100)),
                classified(post("c", "stranger", 300)),
                classified(post("d", "bob", 200)),
            ],
            Strategy::Personalized,
            &context,
        );
        assert_eq!(ids(&outcome), vec!["d", "b", "a", "c"]);
    }

    #[test]
    fn test_mood_filters_to_matching_posts() {
        let mut happy = post("a", "alice", 100);
        happy.mood_tag = Some("happy".to_string());
        let mut sad = post("b", "bob", 200);
        sad.mood_tag = Some("sad".to_string());

        let mut context = empty_context();
        context.viewer_mood = Some("happy".to_string());

        let outcome = rank(
            vec![classified(happy), classified(sad)],
            Strategy::Mood,
            &context,
        );
        assert_eq!(ids(&outcome), vec!["a"]);
        assert!(!outcome.mood_fallback);
    }

    #[test]
    fn test_mood_zero_match_falls_back_with_flag() {
        let mut sad = post("a", "alice", 100);
        sad.mood_tag = Some("sad".to_string());

        let mut context = empty_context();
        context.viewer_mood = Some("happy".to_string());

        let outcome = rank(vec![classified(sad)], Strategy::Mood, &context);
        assert_eq!(ids(&outcome), vec!["a"]);
        assert!(outcome.mood_fallback);
    }
}
