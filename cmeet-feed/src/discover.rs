use cmeet_model::User;
use cmeet_store::social::fetch_recent_users;
use cmeet_store::{DocumentStore, StoreError};
use itertools::Itertools;
use std::collections::BTreeSet;

pub const LOCATION_WEIGHT: u32 = 5;
pub const INTEREST_WEIGHT: u32 = 2;
pub const MATCH_LIMIT: usize = 6;
pub const CANDIDATE_WINDOW: usize = 100;

#[derive(Clone, Debug)]
pub struct ProfileMatch {
    pub user: User,
    pub score: u32,
    pub reasons: Vec<String>,
}

/// Heuristic people-you-may-know scoring over a candidate window: +5 for a
/// location substring overlap (case-insensitive, either direction), +2 per
/// shared comma-split interest. Zero-score candidates are dropped, the rest
/// sorted by score descending (ties by id) and truncated to 6.
pub fn match_profiles(viewer: &User, candidates: &[User]) -> Vec<ProfileMatch> {
    let viewer_interests = split_interests(&viewer.interests);

    candidates
        .iter()
        .filter(|candidate| candidate.id != viewer.id)
        .filter_map(|candidate| {
            let mut score = 0;
            let mut reasons = Vec::new();

            if locations_overlap(&viewer.location, &candidate.location) {
                score += LOCATION_WEIGHT;
                reasons.push(format!("Also in {}", candidate.location.trim()));
            }

            let shared = viewer_interests
                .intersection(&split_interests(&candidate.interests))
                .count() as u32;
            if shared > 0 {
                score += INTEREST_WEIGHT * shared;
                reasons.push(format!("{} shared interests", shared));
            }

            if score == 0 {
                None
            } else {
                Some(ProfileMatch {
                    user: candidate.clone(),
                    score,
                    reasons,
                })
            }
        })
        .sorted_by(|a, b| b.score.cmp(&a.score).then_with(|| a.user.id.cmp(&b.user.id)))
        .take(MATCH_LIMIT)
        .collect()
}

/// Score a candidate window of profiles from the store against the viewer.
pub async fn discover_profiles(
    store: &dyn DocumentStore,
    viewer: &User,
    window: usize,
) -> Result<Vec<ProfileMatch>, StoreError> {
    let candidates = fetch_recent_users(store, window).await?;
    Ok(match_profiles(viewer, &candidates))
}

fn locations_overlap(a: &str, b: &str) -> bool {
    let a = a.trim().to_lowercase();
    let b = b.trim().to_lowercase();
    !a.is_empty() && !b.is_empty() && (a.contains(&b) || b.contains(&a))
}

fn split_interests(interests: &str) -> BTreeSet<String> {
    interests
        .split(',')
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect()
}
