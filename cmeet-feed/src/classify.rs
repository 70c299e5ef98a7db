use cmeet_model::Post;
use cmeet_ref::{extract_hashtags, extract_mentions};
use std::collections::BTreeSet;

/// Keyword table for the rule-based mood classifier. Configuration, not an
/// algorithm: first mood in this order with a content match wins, and
/// `neutral` matches unconditionally.
pub const MOOD_KEYWORDS: &[(&str, &[&str])] = &[
    ("happy", &["happy", "joy", "great", "awesome", "love", "excited", "wonderful"]),
    ("motivated", &["motivated", "goal", "grind", "hustle", "progress", "workout", "focus"]),
    ("relaxed", &["relaxed", "calm", "chill", "peaceful", "rest", "cozy"]),
    ("curious", &["curious", "wonder", "why", "learn", "question", "interesting"]),
    ("sad", &["sad", "miss", "lonely", "cry", "loss", "down"]),
    ("anxious", &["anxious", "worried", "nervous", "stress", "overwhelmed", "afraid"]),
    ("angry", &["angry", "mad", "furious", "annoyed", "unfair", "hate"]),
    ("neutral", &[]),
];

pub const NEUTRAL_MOOD: &str = "neutral";

/// Secondary signals derived from a post.
#[derive(Clone, Debug, PartialEq)]
pub struct Signals {
    pub hashtags: BTreeSet<String>,
    pub mentions: BTreeSet<String>,
    pub mood: String,
    pub engagement: u64,
}

/// A post paired with its derived signals, the unit the ranking engine
/// works over.
#[derive(Clone, Debug)]
pub struct Classified {
    pub post: Post,
    pub signals: Signals,
}

pub fn classify(post: &Post) -> Signals {
    Signals {
        hashtags: cached_or_extracted(&post.hashtags, post, extract_hashtags),
        mentions: cached_or_extracted(&post.mentions, post, extract_mentions),
        mood: infer_mood(post),
        engagement: engagement_score(post),
    }
}

/// The exact popularity proxy: reactions count once, comments twice.
pub fn engagement_score(post: &Post) -> u64 {
    post.reaction_count() as u64 + 2 * post.comment_count() as u64
}

/// An explicit author-supplied mood tag is authoritative; otherwise scan
/// the lowercased content against the keyword table in priority order.
pub fn infer_mood(post: &Post) -> String {
    if let Some(tag) = &post.mood_tag {
        return tag.clone();
    }
    let content = post.content.to_lowercase();
    for (mood, keywords) in MOOD_KEYWORDS {
        if keywords.iter().any(|keyword| content.contains(keyword)) {
            return mood.to_string();
        }
    }
    NEUTRAL_MOOD.to_string()
}

/// Token sets are extracted at creation time and frozen on the record;
/// legacy posts without the cached field get an on-demand extraction.
fn cached_or_extracted(
    cached: &Option<BTreeSet<String>>,
    post: &Post,
    extract: fn(&str) -> BTreeSet<String>,
) -> BTreeSet<String> {
    match cached {
        Some(tokens) => tokens.clone(),
        None => extract(&post.content),
    }
}
