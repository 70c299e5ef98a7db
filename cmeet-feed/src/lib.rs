pub mod assembler;
pub mod classify;
pub mod discover;
pub mod rank;
pub mod trending;
pub mod visibility;

pub use assembler::{FeedAssembler, FeedError, FeedPage, PageState};
pub use classify::{classify, engagement_score, Classified, Signals};
pub use discover::{discover_profiles, match_profiles, ProfileMatch};
pub use rank::{rank, RankContext, RankOutcome, Strategy};
pub use trending::{TagCount, TrendingTags};
pub use visibility::is_visible;
