// SPDX-License-Identifier: MIT
//! The unlock evaluator — reads the statistics snapshot, checks each
//! category's milestones by exact match, resolves hits through the catalog
//! name index, and writes any missing unlock records.
//!
//! The seven category checks are independent: each unlock is its own write
//! with no cross-category transaction. A collaborator failure aborts the
//! remaining checks, but unlocks already written in the same call stay
//! committed.

use std::sync::Arc;

use tracing::{debug, info};

use super::error::AchievementError;
use super::milestones;
use super::model::{Category, UserStatisticsSnapshot};
use super::stores::{CatalogStore, StatisticsSource, UnlockLedger};

pub struct UnlockEvaluator {
    catalog: Arc<dyn CatalogStore>,
    statistics: Arc<dyn StatisticsSource>,
    ledger: Arc<dyn UnlockLedger>,
}

impl UnlockEvaluator {
    pub fn new(
        catalog: Arc<dyn CatalogStore>,
        statistics: Arc<dyn StatisticsSource>,
        ledger: Arc<dyn UnlockLedger>,
    ) -> Self {
        Self {
            catalog,
            statistics,
            ledger,
        }
    }

    /// Read all seven counters and the developer flag, fresh. Fails fast on
    /// the first accessor error.
    pub async fn snapshot(
        &self,
        user_id: i64,
    ) -> Result<UserStatisticsSnapshot, AchievementError> {
        Ok(UserStatisticsSnapshot {
            friend_count: self.statistics.friend_count(user_id).await?,
            owned_game_count: self.statistics.owned_game_count(user_id).await?,
            sold_game_count: self.statistics.sold_game_count(user_id).await?,
            reviews_given_count: self.statistics.reviews_given_count(user_id).await?,
            reviews_received_count: self.statistics.reviews_received_count(user_id).await?,
            post_count: self.statistics.post_count(user_id).await?,
            years_active: self.statistics.years_active(user_id).await?,
            is_developer: self.statistics.is_developer(user_id).await?,
        })
    }

    /// Resolve a (category, count) milestone to its catalog id, or `None`
    /// when the count is not a milestone or the catalog lacks the name.
    pub async fn resolve(
        &self,
        category: Category,
        count: u64,
    ) -> Result<Option<i64>, AchievementError> {
        let Some(name) = milestones::milestone_name(category, count) else {
            return Ok(None);
        };
        Ok(self.catalog.find_id_by_name(&name).await?)
    }

    /// Evaluate every category against the user's current statistics and
    /// unlock any exactly-met milestone not already recorded. Returns the
    /// ids of the newly unlocked achievements so callers can notify.
    pub async fn evaluate_and_unlock(
        &self,
        user_id: i64,
    ) -> Result<Vec<i64>, AchievementError> {
        let snapshot = self.snapshot(user_id).await?;
        debug!(user_id, ?snapshot, "evaluating achievement milestones");

        let checks: [(Category, u64); 8] = [
            (Category::Friendships, snapshot.friend_count),
            (Category::OwnedGames, snapshot.owned_game_count),
            (Category::SoldGames, snapshot.sold_game_count),
            (Category::ReviewsGiven, snapshot.reviews_given_count),
            (Category::ReviewsReceived, snapshot.reviews_received_count),
            (Category::NumberOfPosts, snapshot.post_count),
            (Category::YearsOfActivity, snapshot.years_active),
            // The developer flag is modelled as a count of 1 when set, so it
            // flows through the same milestone resolution as the counters.
            (Category::Developer, u64::from(snapshot.is_developer)),
        ];

        let mut newly_unlocked = Vec::new();
        for (category, count) in checks {
            let Some(achievement_id) = self.resolve(category, count).await? else {
                continue;
            };
            if self.ledger.is_unlocked(user_id, achievement_id).await? {
                continue;
            }
            self.ledger.unlock(user_id, achievement_id).await?;
            info!(user_id, achievement_id, category = category.as_str(), "achievement unlocked");
            newly_unlocked.push(achievement_id);
        }

        Ok(newly_unlocked)
    }
}
