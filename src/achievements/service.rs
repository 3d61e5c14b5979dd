// SPDX-License-Identifier: MIT
//! The achievement service — the surface presentation talks to.
//!
//! Owns the one-shot catalog bootstrap, triggers evaluation on every status
//! read, and joins the catalog against the unlock ledger into the grouped
//! view. All operations take a plain numeric user id; the service holds no
//! per-user state.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::OnceCell;
use tracing::warn;

use super::catalog;
use super::error::AchievementError;
use super::evaluator::UnlockEvaluator;
use super::model::{
    AchievementDefinition, AchievementStatus, Category, GroupedStatus,
};
use super::stores::{CatalogStore, StatisticsSource, UnlockLedger};

pub struct AchievementService {
    catalog: Arc<dyn CatalogStore>,
    ledger: Arc<dyn UnlockLedger>,
    evaluator: UnlockEvaluator,
    /// Guards the catalog bootstrap so concurrent first calls seed at most
    /// once per process.
    bootstrap: OnceCell<()>,
}

impl AchievementService {
    pub fn new(
        catalog: Arc<dyn CatalogStore>,
        statistics: Arc<dyn StatisticsSource>,
        ledger: Arc<dyn UnlockLedger>,
    ) -> Self {
        let evaluator =
            UnlockEvaluator::new(Arc::clone(&catalog), statistics, Arc::clone(&ledger));
        Self {
            catalog,
            ledger,
            evaluator,
            bootstrap: OnceCell::new(),
        }
    }

    /// Run the catalog bootstrap exactly once per service instance.
    /// Bootstrap failures are logged inside `ensure_catalog` and absorbed.
    async fn ensure_bootstrapped(&self) {
        self.bootstrap
            .get_or_init(|| catalog::ensure_catalog(self.catalog.as_ref()))
            .await;
    }

    /// Evaluate the user's statistics and unlock any newly met milestones.
    /// Returns the newly unlocked achievement ids. Collaborator failures
    /// propagate; unlocks already written in this call stay committed.
    pub async fn evaluate_and_unlock(
        &self,
        user_id: i64,
    ) -> Result<Vec<i64>, AchievementError> {
        self.ensure_bootstrapped().await;
        self.evaluator.evaluate_and_unlock(user_id).await
    }

    /// The full per-user achievement view: evaluate-on-read, then join the
    /// catalog against the ledger and partition by category.
    ///
    /// When evaluation fails the view is still assembled from last-known
    /// ledger state, with `evaluation_failed` set so callers can surface the
    /// degradation instead of an error page.
    pub async fn grouped_status(
        &self,
        user_id: i64,
    ) -> Result<GroupedStatus, AchievementError> {
        self.ensure_bootstrapped().await;

        let evaluation_failed = match self.evaluator.evaluate_and_unlock(user_id).await {
            Ok(_) => false,
            Err(e) => {
                warn!(user_id, error = %e, "achievement evaluation failed; serving last-known unlock state");
                true
            }
        };

        let definitions = self.catalog.get_all().await?;
        let unlocked: Vec<i64> = self.ledger.get_unlocked_ids(user_id).await?;

        let mut all = Vec::with_capacity(definitions.len());
        for definition in definitions {
            let unlocked_at = if unlocked.contains(&definition.id) {
                self.ledger
                    .get_unlock_details(user_id, definition.id)
                    .await?
                    .map(|d| d.unlocked_at)
            } else {
                None
            };
            all.push(AchievementStatus {
                unlocked: unlocked_at.is_some(),
                unlocked_at,
                definition,
            });
        }

        let mut by_category: HashMap<Category, Vec<AchievementStatus>> = HashMap::new();
        for status in &all {
            let category = status.definition.category;
            // Definitions with an unrecognised category stay in `all` only.
            if Category::ALL.contains(&category) {
                by_category.entry(category).or_default().push(status.clone());
            }
        }

        Ok(GroupedStatus {
            all,
            by_category,
            evaluation_failed,
        })
    }

    /// Every catalog definition, without unlock state.
    pub async fn all_definitions(
        &self,
    ) -> Result<Vec<AchievementDefinition>, AchievementError> {
        self.ensure_bootstrapped().await;
        Ok(self.catalog.get_all().await?)
    }

    /// Point value of an achievement the user has unlocked. Points are
    /// disclosed only against a ledger record: a catalog entry without one
    /// yields `NotUnlocked`.
    pub async fn points_for_unlocked(
        &self,
        user_id: i64,
        achievement_id: i64,
    ) -> Result<i64, AchievementError> {
        self.ensure_bootstrapped().await;
        if !self.ledger.is_unlocked(user_id, achievement_id).await? {
            return Err(AchievementError::NotUnlocked {
                user_id,
                achievement_id,
            });
        }
        self.catalog
            .get_all()
            .await?
            .into_iter()
            .find(|d| d.id == achievement_id)
            .map(|d| d.points)
            .ok_or(AchievementError::NotFound(achievement_id))
    }

    /// Administrative removal of one unlock record. Idempotent: removing an
    /// absent record succeeds.
    pub async fn remove_achievement(
        &self,
        user_id: i64,
        achievement_id: i64,
    ) -> Result<(), AchievementError> {
        self.ledger.remove(user_id, achievement_id).await?;
        Ok(())
    }

    /// Resolve a (category, count) milestone to its catalog id. `None` for
    /// a non-milestone count or a name the catalog does not carry.
    pub async fn resolve(
        &self,
        category: Category,
        count: u64,
    ) -> Result<Option<i64>, AchievementError> {
        self.ensure_bootstrapped().await;
        self.evaluator.resolve(category, count).await
    }
}
