// SPDX-License-Identifier: MIT
//! The fixed default catalog and its one-time bootstrap.
//!
//! Thirty badge definitions: five friendship tiers, four tiers for each of
//! the other counted categories, and the single developer badge. Point
//! values follow the tier ladder 1/3/5/10/15, and the icon backfill keys on
//! those point values (bronze through diamond).

use tracing::{debug, warn};

use super::model::Category;
use super::stores::CatalogStore;

// ─── Seed definitions ─────────────────────────────────────────────────────────

/// One row of the default catalog, before storage assigns an id.
#[derive(Debug, Clone, Copy)]
pub struct SeedDefinition {
    pub name: &'static str,
    pub description: &'static str,
    pub category: Category,
    pub points: i64,
}

/// Point value per milestone rank (rank 1 → 1 pt … rank 5 → 15 pt).
pub const POINTS_BY_RANK: [i64; 5] = [1, 3, 5, 10, 15];

/// The canonical source of truth for the achievement catalog. Seeded once,
/// in this order; the `name` column is what the milestone resolver looks up.
pub const DEFAULT_CATALOG: [SeedDefinition; 30] = [
    // Friendships — the only five-tier ladder.
    SeedDefinition {
        name: "FRIENDSHIP1",
        description: "You made a friend, you get a point",
        category: Category::Friendships,
        points: 1,
    },
    SeedDefinition {
        name: "FRIENDSHIP2",
        description: "You made 5 friends, you get 3 points",
        category: Category::Friendships,
        points: 3,
    },
    SeedDefinition {
        name: "FRIENDSHIP3",
        description: "You made 10 friends, you get 5 points",
        category: Category::Friendships,
        points: 5,
    },
    SeedDefinition {
        name: "FRIENDSHIP4",
        description: "You made 50 friends, you get 10 points",
        category: Category::Friendships,
        points: 10,
    },
    SeedDefinition {
        name: "FRIENDSHIP5",
        description: "You made 100 friends, you get 15 points",
        category: Category::Friendships,
        points: 15,
    },
    // Owned games.
    SeedDefinition {
        name: "OWNEDGAMES1",
        description: "You own 1 game, you get 1 point",
        category: Category::OwnedGames,
        points: 1,
    },
    SeedDefinition {
        name: "OWNEDGAMES2",
        description: "You own 5 games, you get 3 points",
        category: Category::OwnedGames,
        points: 3,
    },
    SeedDefinition {
        name: "OWNEDGAMES3",
        description: "You own 10 games, you get 5 points",
        category: Category::OwnedGames,
        points: 5,
    },
    SeedDefinition {
        name: "OWNEDGAMES4",
        description: "You own 50 games, you get 10 points",
        category: Category::OwnedGames,
        points: 10,
    },
    // Sold games.
    SeedDefinition {
        name: "SOLDGAMES1",
        description: "You sold 1 game, you get 1 point",
        category: Category::SoldGames,
        points: 1,
    },
    SeedDefinition {
        name: "SOLDGAMES2",
        description: "You sold 5 games, you get 3 points",
        category: Category::SoldGames,
        points: 3,
    },
    SeedDefinition {
        name: "SOLDGAMES3",
        description: "You sold 10 games, you get 5 points",
        category: Category::SoldGames,
        points: 5,
    },
    SeedDefinition {
        name: "SOLDGAMES4",
        description: "You sold 50 games, you get 10 points",
        category: Category::SoldGames,
        points: 10,
    },
    // Reviews written by the user.
    SeedDefinition {
        name: "REVIEW1",
        description: "You gave 1 review, you get 1 point",
        category: Category::ReviewsGiven,
        points: 1,
    },
    SeedDefinition {
        name: "REVIEW2",
        description: "You gave 5 reviews, you get 3 points",
        category: Category::ReviewsGiven,
        points: 3,
    },
    SeedDefinition {
        name: "REVIEW3",
        description: "You gave 10 reviews, you get 5 points",
        category: Category::ReviewsGiven,
        points: 5,
    },
    SeedDefinition {
        name: "REVIEW4",
        description: "You gave 50 reviews, you get 10 points",
        category: Category::ReviewsGiven,
        points: 10,
    },
    // Reviews received on the user's games.
    SeedDefinition {
        name: "REVIEWR1",
        description: "You got 1 review, you get 1 point",
        category: Category::ReviewsReceived,
        points: 1,
    },
    SeedDefinition {
        name: "REVIEWR2",
        description: "You got 5 reviews, you get 3 points",
        category: Category::ReviewsReceived,
        points: 3,
    },
    SeedDefinition {
        name: "REVIEWR3",
        description: "You got 10 reviews, you get 5 points",
        category: Category::ReviewsReceived,
        points: 5,
    },
    SeedDefinition {
        name: "REVIEWR4",
        description: "You got 50 reviews, you get 10 points",
        category: Category::ReviewsReceived,
        points: 10,
    },
    // Account age.
    SeedDefinition {
        name: "ACTIVITY1",
        description: "You have been active for 1 year, you get 1 point",
        category: Category::YearsOfActivity,
        points: 1,
    },
    SeedDefinition {
        name: "ACTIVITY2",
        description: "You have been active for 2 years, you get 3 points",
        category: Category::YearsOfActivity,
        points: 3,
    },
    SeedDefinition {
        name: "ACTIVITY3",
        description: "You have been active for 3 years, you get 5 points",
        category: Category::YearsOfActivity,
        points: 5,
    },
    SeedDefinition {
        name: "ACTIVITY4",
        description: "You have been active for 4 years, you get 10 points",
        category: Category::YearsOfActivity,
        points: 10,
    },
    // Forum posts.
    SeedDefinition {
        name: "POSTS1",
        description: "You made 1 post, you get 1 point",
        category: Category::NumberOfPosts,
        points: 1,
    },
    SeedDefinition {
        name: "POSTS2",
        description: "You made 5 posts, you get 3 points",
        category: Category::NumberOfPosts,
        points: 3,
    },
    SeedDefinition {
        name: "POSTS3",
        description: "You made 10 posts, you get 5 points",
        category: Category::NumberOfPosts,
        points: 5,
    },
    SeedDefinition {
        name: "POSTS4",
        description: "You made 50 posts, you get 10 points",
        category: Category::NumberOfPosts,
        points: 10,
    },
    // Single-tier developer badge.
    SeedDefinition {
        name: "DEVELOPER",
        description: "You are a developer, you get 15 points",
        category: Category::Developer,
        points: 15,
    },
];

// ─── Icon backfill table ──────────────────────────────────────────────────────

/// One-time icon backfill, keyed by *point value* (not threshold count).
pub const ICON_BACKFILL: [(i64, &str); 5] = [
    (1, "https://static.gamevault.app/achievements/bronze.png"),
    (3, "https://static.gamevault.app/achievements/silver.png"),
    (5, "https://static.gamevault.app/achievements/gold.png"),
    (10, "https://static.gamevault.app/achievements/platinum.png"),
    (15, "https://static.gamevault.app/achievements/diamond.png"),
];

// ─── Bootstrap ────────────────────────────────────────────────────────────────

/// Seed the catalog if it is empty, then backfill icons.
///
/// Failures are logged and swallowed: display can proceed with an empty
/// catalog, so catalog absence is degraded operation, not a crash. Safe to
/// re-invoke — a non-empty catalog makes this a no-op.
pub async fn ensure_catalog(catalog: &dyn CatalogStore) {
    match catalog.is_empty().await {
        Ok(false) => {
            debug!("achievement catalog already seeded");
            return;
        }
        Ok(true) => {}
        Err(e) => {
            warn!(error = %e, "could not check achievement catalog; skipping bootstrap");
            return;
        }
    }

    if let Err(e) = catalog.insert_default_catalog().await {
        warn!(error = %e, "failed to seed achievement catalog");
        return;
    }
    debug!(definitions = DEFAULT_CATALOG.len(), "seeded achievement catalog");

    for (points, url) in ICON_BACKFILL {
        if let Err(e) = catalog.update_icon(points, url).await {
            warn!(points, error = %e, "failed to backfill achievement icon");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::achievements::milestones;
    use std::collections::HashSet;

    #[test]
    fn catalog_has_thirty_unique_names() {
        let names: HashSet<&str> = DEFAULT_CATALOG.iter().map(|d| d.name).collect();
        assert_eq!(names.len(), 30);
    }

    #[test]
    fn every_milestone_has_a_seed_definition() {
        let names: HashSet<&str> = DEFAULT_CATALOG.iter().map(|d| d.name).collect();
        for cat in Category::ALL {
            for &count in milestones::thresholds(cat) {
                let name = milestones::milestone_name(cat, count).unwrap();
                assert!(names.contains(name.as_str()), "missing seed for {name}");
            }
        }
    }

    #[test]
    fn points_follow_the_rank_ladder() {
        for cat in Category::ALL {
            if cat == Category::Developer {
                continue;
            }
            for (rank0, &count) in milestones::thresholds(cat).iter().enumerate() {
                let name = milestones::milestone_name(cat, count).unwrap();
                let seed = DEFAULT_CATALOG.iter().find(|d| d.name == name).unwrap();
                assert_eq!(seed.points, POINTS_BY_RANK[rank0], "points for {name}");
            }
        }
    }

    #[test]
    fn icon_table_covers_every_point_value() {
        let seeded: HashSet<i64> = DEFAULT_CATALOG.iter().map(|d| d.points).collect();
        let backfilled: HashSet<i64> = ICON_BACKFILL.iter().map(|(p, _)| *p).collect();
        assert_eq!(seeded, backfilled);
    }

    #[test]
    fn icon_urls_carry_valid_extensions() {
        for (_, url) in ICON_BACKFILL {
            assert!(url.to_ascii_lowercase().ends_with(".png"));
        }
    }
}
