// SPDX-License-Identifier: MIT
//! trophy-engine — achievement evaluation and unlocking for the game
//! marketplace platform.
//!
//! The engine turns raw per-user statistics (friendships, owned and sold
//! games, reviews, posts, account age, developer flag) into unlock
//! decisions against a fixed milestone catalog, and assembles the
//! category-grouped status views the profile screen renders. Storage is
//! abstracted behind the collaborator traits in [`achievements::stores`];
//! [`storage::Storage`] is the SQLite implementation.

pub mod achievements;
pub mod storage;

pub use achievements::error::AchievementError;
pub use achievements::model::{
    AchievementDefinition, AchievementStatus, Category, GroupedStatus, UnlockDetails,
    UserStatisticsSnapshot,
};
pub use achievements::service::AchievementService;
