// SPDX-License-Identifier: MIT
//! Engine error taxonomy.
//!
//! An invalid (category, count) combination is not represented here: the
//! resolver returns `None` for it and evaluation simply performs no unlock.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AchievementError {
    /// A collaborator call failed (connectivity, constraint violation
    /// unrelated to a duplicate unlock). Never downgraded to an empty
    /// achievement list.
    #[error("achievement storage unavailable: {0}")]
    Storage(#[from] anyhow::Error),

    /// The achievement id is absent from the catalog.
    #[error("achievement {0} not found in catalog")]
    NotFound(i64),

    /// Points were requested for an achievement the user has not unlocked.
    /// Raised even when the catalog entry exists — points are only
    /// disclosed for unlocked achievements.
    #[error("achievement {achievement_id} is not unlocked for user {user_id}")]
    NotUnlocked { user_id: i64, achievement_id: i64 },
}
