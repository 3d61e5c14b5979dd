// SPDX-License-Identifier: MIT
//! Achievement data models — serialisable types shared by the evaluator,
//! the aggregation service, and the storage backend.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ─── Category ─────────────────────────────────────────────────────────────────

/// The fixed set of achievement categories.
///
/// `Unknown` absorbs unrecognised strings read back from storage; such
/// definitions still appear in the flat status list but are dropped from the
/// grouped view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Friendships,
    OwnedGames,
    SoldGames,
    ReviewsGiven,
    ReviewsReceived,
    YearsOfActivity,
    NumberOfPosts,
    Developer,
    Unknown,
}

impl Category {
    /// The eight known categories, in display order. Excludes `Unknown`.
    pub const ALL: [Category; 8] = [
        Category::Friendships,
        Category::OwnedGames,
        Category::SoldGames,
        Category::ReviewsGiven,
        Category::ReviewsReceived,
        Category::YearsOfActivity,
        Category::NumberOfPosts,
        Category::Developer,
    ];

    /// Stable string form used in the `achievements.category` column.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Friendships => "Friendships",
            Category::OwnedGames => "Owned Games",
            Category::SoldGames => "Sold Games",
            Category::ReviewsGiven => "Number of Reviews Given",
            Category::ReviewsReceived => "Number of Reviews Received",
            Category::YearsOfActivity => "Years of Activity",
            Category::NumberOfPosts => "Number of Posts",
            Category::Developer => "Developer",
            Category::Unknown => "Unknown",
        }
    }

    /// Parse the stored string form. Unrecognised input maps to `Unknown`
    /// rather than an error — a bad row must not poison the whole catalog.
    pub fn parse(s: &str) -> Category {
        match s {
            "Friendships" => Category::Friendships,
            "Owned Games" => Category::OwnedGames,
            "Sold Games" => Category::SoldGames,
            "Number of Reviews Given" => Category::ReviewsGiven,
            "Number of Reviews Received" => Category::ReviewsReceived,
            "Years of Activity" => Category::YearsOfActivity,
            "Number of Posts" => Category::NumberOfPosts,
            "Developer" => Category::Developer,
            _ => Category::Unknown,
        }
    }
}

// ─── Achievement definition ───────────────────────────────────────────────────

/// One immutable catalog row. Seeded once at bootstrap; only the icon is
/// ever updated afterwards (the one-time backfill).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AchievementDefinition {
    /// Storage-assigned identifier, unique within the catalog.
    pub id: i64,

    /// Code name encoding category + milestone rank, e.g. `"FRIENDSHIP2"`.
    /// Unique within the catalog; the evaluator resolves unlocks by it.
    pub name: String,

    /// Human-readable badge text shown on the achievement card.
    pub description: String,

    /// Which of the fixed categories this badge belongs to.
    pub category: Category,

    /// Point value awarded on unlock. Non-negative.
    pub points: i64,

    /// Badge icon URL. `None` until the icon backfill has run.
    pub icon: Option<String>,
}

impl AchievementDefinition {
    /// An icon URL is valid when it ends in `.png`, `.svg`, or `.jpg`
    /// (case-insensitive).
    pub fn has_valid_icon(&self) -> bool {
        match &self.icon {
            Some(url) => {
                let lower = url.to_ascii_lowercase();
                lower.ends_with(".png") || lower.ends_with(".svg") || lower.ends_with(".jpg")
            }
            None => false,
        }
    }
}

// ─── Unlock details ───────────────────────────────────────────────────────────

/// Ledger-side view of a single unlock, joined against the catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnlockDetails {
    /// Code name of the unlocked achievement.
    pub name: String,

    /// Badge description at unlock-query time.
    pub description: String,

    /// RFC 3339 timestamp of the unlock.
    pub unlocked_at: String,
}

// ─── Achievement status ───────────────────────────────────────────────────────

/// Per-user unlock state for one definition. Derived view, never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AchievementStatus {
    /// The catalog definition this status describes.
    pub definition: AchievementDefinition,

    /// Whether a ledger record exists for this (user, achievement) pair.
    /// There is no other unlock state.
    pub unlocked: bool,

    /// RFC 3339 unlock timestamp. `None` while locked.
    pub unlocked_at: Option<String>,
}

impl AchievementStatus {
    /// Display opacity: full for unlocked badges, dimmed for locked ones.
    /// Presentation-only; carries no business meaning.
    pub fn opacity(&self) -> f32 {
        if self.unlocked {
            1.0
        } else {
            0.5
        }
    }
}

// ─── User statistics snapshot ─────────────────────────────────────────────────

/// The seven per-user counters plus the developer flag, read fresh from the
/// statistics source on every evaluation. Never cached by the engine.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct UserStatisticsSnapshot {
    pub friend_count: u64,
    pub owned_game_count: u64,
    pub sold_game_count: u64,
    pub reviews_given_count: u64,
    pub reviews_received_count: u64,
    pub post_count: u64,
    pub years_active: u64,
    pub is_developer: bool,
}

// ─── Grouped status ───────────────────────────────────────────────────────────

/// The full per-user achievement view handed to presentation.
#[derive(Debug, Clone, Serialize)]
pub struct GroupedStatus {
    /// Every catalog definition with its unlock state, catalog order.
    pub all: Vec<AchievementStatus>,

    /// Statuses partitioned by category. Definitions with an unrecognised
    /// category appear only in `all`.
    pub by_category: HashMap<Category, Vec<AchievementStatus>>,

    /// `true` when the evaluate-on-read step failed and the view reflects
    /// last-known ledger state rather than freshly evaluated unlocks.
    pub evaluation_failed: bool,
}

// ─── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn definition(icon: Option<&str>) -> AchievementDefinition {
        AchievementDefinition {
            id: 7,
            name: "FRIENDSHIP2".to_string(),
            description: "Made 5 friends on the platform.".to_string(),
            category: Category::Friendships,
            points: 3,
            icon: icon.map(|s| s.to_string()),
        }
    }

    #[test]
    fn category_round_trips_through_stored_string() {
        for cat in Category::ALL {
            assert_eq!(Category::parse(cat.as_str()), cat);
        }
    }

    #[test]
    fn unrecognised_category_parses_to_unknown() {
        assert_eq!(Category::parse("Speedruns"), Category::Unknown);
        assert_eq!(Category::parse(""), Category::Unknown);
    }

    #[test]
    fn icon_validity_by_extension() {
        assert!(definition(Some("https://cdn.example.com/badge.png")).has_valid_icon());
        assert!(definition(Some("https://cdn.example.com/BADGE.SVG")).has_valid_icon());
        assert!(definition(Some("https://cdn.example.com/badge.Jpg")).has_valid_icon());
        assert!(!definition(Some("https://cdn.example.com/badge.gif")).has_valid_icon());
        assert!(!definition(None).has_valid_icon());
    }

    #[test]
    fn opacity_tracks_unlock_state() {
        let unlocked = AchievementStatus {
            definition: definition(None),
            unlocked: true,
            unlocked_at: Some("2026-02-25T12:00:00Z".to_string()),
        };
        let locked = AchievementStatus {
            definition: definition(None),
            unlocked: false,
            unlocked_at: None,
        };
        assert_eq!(unlocked.opacity(), 1.0);
        assert_eq!(locked.opacity(), 0.5);
    }

    #[test]
    fn status_roundtrip_json() {
        let status = AchievementStatus {
            definition: definition(Some("https://cdn.example.com/badge.png")),
            unlocked: true,
            unlocked_at: Some("2026-02-25T12:00:00Z".to_string()),
        };
        let json = serde_json::to_string(&status).unwrap();
        let back: AchievementStatus = serde_json::from_str(&json).unwrap();
        assert_eq!(back.definition.name, "FRIENDSHIP2");
        assert_eq!(back.definition.category, Category::Friendships);
        assert!(back.unlocked);
    }

    #[test]
    fn snapshot_defaults_to_zero() {
        let snap = UserStatisticsSnapshot::default();
        assert_eq!(snap.friend_count, 0);
        assert!(!snap.is_developer);
    }
}
