// SPDX-License-Identifier: MIT
//! Milestone tables and the category+rank name encoding.
//!
//! Achievement identity is carried by a code name (`FRIENDSHIP3`,
//! `DEVELOPER`, …) assigned at catalog-seed time; evaluation resolves a
//! (category, count) pair to that name and looks the id up in the catalog.
//! This keeps the engine decoupled from storage-assigned ids.
//!
//! Membership is checked by equality, not `>=`: a counter that jumps past a
//! milestone (say 0 → 7 friends in one batch) never earns the skipped
//! badges. Inherited platform behavior; covered explicitly by tests.

use super::model::Category;

/// Friendship milestones have a fifth tier; every other counted category
/// stops at four.
pub const FRIENDSHIP_THRESHOLDS: [u64; 5] = [1, 5, 10, 50, 100];
pub const OWNED_GAMES_THRESHOLDS: [u64; 4] = [1, 5, 10, 50];
pub const SOLD_GAMES_THRESHOLDS: [u64; 4] = [1, 5, 10, 50];
pub const REVIEWS_GIVEN_THRESHOLDS: [u64; 4] = [1, 5, 10, 50];
pub const REVIEWS_RECEIVED_THRESHOLDS: [u64; 4] = [1, 5, 10, 50];
pub const ACTIVITY_THRESHOLDS: [u64; 4] = [1, 2, 3, 4];
pub const POSTS_THRESHOLDS: [u64; 4] = [1, 5, 10, 50];
/// The developer badge is a boolean milestone; `1` stands for "flag set".
pub const DEVELOPER_THRESHOLDS: [u64; 1] = [1];

/// Valid milestone counts for a category. Empty for `Unknown`.
pub fn thresholds(category: Category) -> &'static [u64] {
    match category {
        Category::Friendships => &FRIENDSHIP_THRESHOLDS,
        Category::OwnedGames => &OWNED_GAMES_THRESHOLDS,
        Category::SoldGames => &SOLD_GAMES_THRESHOLDS,
        Category::ReviewsGiven => &REVIEWS_GIVEN_THRESHOLDS,
        Category::ReviewsReceived => &REVIEWS_RECEIVED_THRESHOLDS,
        Category::YearsOfActivity => &ACTIVITY_THRESHOLDS,
        Category::NumberOfPosts => &POSTS_THRESHOLDS,
        Category::Developer => &DEVELOPER_THRESHOLDS,
        Category::Unknown => &[],
    }
}

/// Encode (category, count) into the catalog code name, or `None` when
/// `count` is not a milestone of that category. The rank is the 1-based
/// position of `count` in the category's threshold list.
pub fn milestone_name(category: Category, count: u64) -> Option<String> {
    let rank = thresholds(category).iter().position(|&t| t == count)? + 1;
    let name = match category {
        Category::Friendships => format!("FRIENDSHIP{rank}"),
        Category::OwnedGames => format!("OWNEDGAMES{rank}"),
        Category::SoldGames => format!("SOLDGAMES{rank}"),
        Category::ReviewsGiven => format!("REVIEW{rank}"),
        Category::ReviewsReceived => format!("REVIEWR{rank}"),
        Category::YearsOfActivity => format!("ACTIVITY{rank}"),
        Category::NumberOfPosts => format!("POSTS{rank}"),
        // Single-tier badge, no rank suffix.
        Category::Developer => "DEVELOPER".to_string(),
        Category::Unknown => return None,
    };
    Some(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn friendship_ranks_follow_threshold_order() {
        assert_eq!(milestone_name(Category::Friendships, 1).as_deref(), Some("FRIENDSHIP1"));
        assert_eq!(milestone_name(Category::Friendships, 5).as_deref(), Some("FRIENDSHIP2"));
        assert_eq!(milestone_name(Category::Friendships, 10).as_deref(), Some("FRIENDSHIP3"));
        assert_eq!(milestone_name(Category::Friendships, 50).as_deref(), Some("FRIENDSHIP4"));
        assert_eq!(milestone_name(Category::Friendships, 100).as_deref(), Some("FRIENDSHIP5"));
    }

    #[test]
    fn non_milestone_counts_encode_to_none() {
        assert_eq!(milestone_name(Category::Friendships, 7), None);
        assert_eq!(milestone_name(Category::Friendships, 0), None);
        assert_eq!(milestone_name(Category::OwnedGames, 100), None);
        assert_eq!(milestone_name(Category::YearsOfActivity, 5), None);
    }

    #[test]
    fn each_category_uses_its_own_prefix() {
        assert_eq!(milestone_name(Category::OwnedGames, 50).as_deref(), Some("OWNEDGAMES4"));
        assert_eq!(milestone_name(Category::SoldGames, 1).as_deref(), Some("SOLDGAMES1"));
        assert_eq!(milestone_name(Category::ReviewsGiven, 10).as_deref(), Some("REVIEW3"));
        assert_eq!(milestone_name(Category::ReviewsReceived, 10).as_deref(), Some("REVIEWR3"));
        assert_eq!(milestone_name(Category::YearsOfActivity, 2).as_deref(), Some("ACTIVITY2"));
        assert_eq!(milestone_name(Category::NumberOfPosts, 5).as_deref(), Some("POSTS2"));
    }

    #[test]
    fn developer_has_a_single_unranked_name() {
        assert_eq!(milestone_name(Category::Developer, 1).as_deref(), Some("DEVELOPER"));
        assert_eq!(milestone_name(Category::Developer, 2), None);
        assert_eq!(milestone_name(Category::Developer, 0), None);
    }

    #[test]
    fn unknown_category_has_no_milestones() {
        assert!(thresholds(Category::Unknown).is_empty());
        assert_eq!(milestone_name(Category::Unknown, 1), None);
    }
}
