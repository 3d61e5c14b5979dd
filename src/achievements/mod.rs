// SPDX-License-Identifier: MIT
//! Achievement engine — catalog, milestone resolver, unlock evaluator, and
//! the status aggregation service.

pub mod catalog;
pub mod error;
pub mod evaluator;
pub mod milestones;
pub mod model;
pub mod service;
pub mod stores;

pub use error::AchievementError;
pub use evaluator::UnlockEvaluator;
pub use service::AchievementService;
