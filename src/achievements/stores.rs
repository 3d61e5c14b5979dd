// SPDX-License-Identifier: MIT
//! Collaborator interfaces supplied by the storage layer.
//!
//! The engine only ever talks to these three traits; `crate::storage`
//! implements all of them over SQLite. Methods return `anyhow::Result` —
//! the service surface wraps failures into
//! [`AchievementError::Storage`](super::error::AchievementError).

use anyhow::Result;
use async_trait::async_trait;

use super::model::{AchievementDefinition, UnlockDetails};

/// Read access to the fixed achievement catalog, plus the two one-time
/// mutations the bootstrap performs (seed and icon backfill).
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// `true` when no definitions have been seeded yet.
    async fn is_empty(&self) -> Result<bool>;

    /// Insert the full default definition set. Called at most once, when
    /// the catalog is empty.
    async fn insert_default_catalog(&self) -> Result<()>;

    /// Backfill the icon URL for every definition worth `points`.
    async fn update_icon(&self, points: i64, url: &str) -> Result<()>;

    /// All definitions, in catalog order.
    async fn get_all(&self) -> Result<Vec<AchievementDefinition>>;

    /// Resolve a code name (e.g. `"FRIENDSHIP2"`) to its storage-assigned id.
    async fn find_id_by_name(&self, name: &str) -> Result<Option<i64>>;
}

/// The seven per-user counters and the developer flag. Each accessor can
/// fail independently; the evaluator fails fast on the first error.
#[async_trait]
pub trait StatisticsSource: Send + Sync {
    async fn friend_count(&self, user_id: i64) -> Result<u64>;
    async fn owned_game_count(&self, user_id: i64) -> Result<u64>;
    async fn sold_game_count(&self, user_id: i64) -> Result<u64>;
    async fn reviews_given_count(&self, user_id: i64) -> Result<u64>;
    async fn reviews_received_count(&self, user_id: i64) -> Result<u64>;
    async fn post_count(&self, user_id: i64) -> Result<u64>;
    async fn years_active(&self, user_id: i64) -> Result<u64>;
    async fn is_developer(&self, user_id: i64) -> Result<bool>;
}

/// Records which (user, achievement) pairs are unlocked, with timestamps.
///
/// Implementations must enforce pair uniqueness themselves (constraint or
/// pre-check) so that concurrent unlock attempts for the same pair leave at
/// most one record — `unlock` on an existing pair is a harmless no-op.
#[async_trait]
pub trait UnlockLedger: Send + Sync {
    async fn is_unlocked(&self, user_id: i64, achievement_id: i64) -> Result<bool>;

    /// Record an unlock now. Idempotent: no-op if the pair already exists.
    async fn unlock(&self, user_id: i64, achievement_id: i64) -> Result<()>;

    /// Delete the record for the pair if present. Removing an absent record
    /// succeeds.
    async fn remove(&self, user_id: i64, achievement_id: i64) -> Result<()>;

    /// Ids of every achievement the user has unlocked.
    async fn get_unlocked_ids(&self, user_id: i64) -> Result<Vec<i64>>;

    /// Catalog-joined details for one unlock, or `None` when the pair has
    /// no record.
    async fn get_unlock_details(
        &self,
        user_id: i64,
        achievement_id: i64,
    ) -> Result<Option<UnlockDetails>>;
}
