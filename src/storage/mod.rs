// SPDX-License-Identifier: MIT
//! SQLite storage — the reference implementation of the three collaborator
//! traits (`CatalogStore`, `StatisticsSource`, `UnlockLedger`).
//!
//! Schema is bootstrapped via `CREATE TABLE IF NOT EXISTS` on construction;
//! no migration files are needed. The `user_achievements` primary key plus
//! `INSERT OR IGNORE` is what enforces the at-most-once unlock invariant
//! when two evaluations race on the same pair.

use anyhow::{Context as _, Result};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{sqlite::SqliteConnectOptions, SqlitePool};
use std::{path::Path, str::FromStr};

use crate::achievements::catalog::DEFAULT_CATALOG;
use crate::achievements::model::{AchievementDefinition, Category, UnlockDetails};
use crate::achievements::stores::{CatalogStore, StatisticsSource, UnlockLedger};

/// Default timeout for individual SQLite queries.
/// Prevents a hung query from blocking a status request indefinitely.
const QUERY_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(30);

/// Execute a future with the standard query timeout.
async fn with_timeout<T>(fut: impl std::future::Future<Output = Result<T>>) -> Result<T> {
    match tokio::time::timeout(QUERY_TIMEOUT, fut).await {
        Ok(result) => result,
        Err(_) => Err(anyhow::anyhow!(
            "database query timed out after {}s",
            QUERY_TIMEOUT.as_secs()
        )),
    }
}

#[derive(Clone)]
pub struct Storage {
    pool: SqlitePool,
}

impl Storage {
    pub async fn new(data_dir: &Path) -> Result<Self> {
        Self::new_with_slow_query(data_dir, 0).await
    }

    /// Create storage with slow-query logging enabled.
    ///
    /// `slow_query_ms` is the threshold in milliseconds — queries exceeding
    /// it are logged at WARN level. Set to 0 to disable slow-query logging.
    pub async fn new_with_slow_query(data_dir: &Path, slow_query_ms: u64) -> Result<Self> {
        tokio::fs::create_dir_all(data_dir).await?;
        let db_path = data_dir.join("gamevault.db");
        let mut opts =
            SqliteConnectOptions::from_str(&format!("sqlite://{}?mode=rwc", db_path.display()))?
                .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
                .synchronous(sqlx::sqlite::SqliteSynchronous::Normal)
                .create_if_missing(true);

        if slow_query_ms > 0 {
            use sqlx::ConnectOptions as _;
            opts = opts.log_slow_statements(
                log::LevelFilter::Warn,
                std::time::Duration::from_millis(slow_query_ms),
            );
        }

        let pool = SqlitePool::connect_with(opts).await?;
        Self::migrate(&pool).await?;
        Ok(Self { pool })
    }

    /// In-memory storage for tests. Pinned to a single connection — every
    /// `:memory:` connection is its own database.
    pub async fn in_memory() -> Result<Self> {
        let pool = sqlx::sqlite::SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await?;
        Self::migrate(&pool).await?;
        Ok(Self { pool })
    }

    /// Return a clone of the connection pool (cheap — Arc-backed).
    pub fn pool(&self) -> SqlitePool {
        self.pool.clone()
    }

    async fn migrate(pool: &SqlitePool) -> Result<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS achievements (
                id          INTEGER PRIMARY KEY AUTOINCREMENT,
                name        TEXT NOT NULL UNIQUE,
                description TEXT NOT NULL,
                category    TEXT NOT NULL,
                points      INTEGER NOT NULL,
                icon        TEXT
            )",
        )
        .execute(pool)
        .await
        .context("create achievements table")?;

        // The composite primary key is the uniqueness constraint the unlock
        // path relies on: concurrent INSERT OR IGNORE for the same pair
        // leaves exactly one row.
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS user_achievements (
                user_id        INTEGER NOT NULL,
                achievement_id INTEGER NOT NULL,
                unlocked_at    TEXT NOT NULL,
                PRIMARY KEY (user_id, achievement_id)
            )",
        )
        .execute(pool)
        .await
        .context("create user_achievements table")?;

        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS users (
                id           INTEGER PRIMARY KEY,
                created_at   TEXT NOT NULL,
                is_developer INTEGER NOT NULL DEFAULT 0
            )",
        )
        .execute(pool)
        .await
        .context("create users table")?;

        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS friendships (
                user_id   INTEGER NOT NULL,
                friend_id INTEGER NOT NULL,
                PRIMARY KEY (user_id, friend_id)
            )",
        )
        .execute(pool)
        .await
        .context("create friendships table")?;

        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS owned_games (
                user_id INTEGER NOT NULL,
                game_id INTEGER NOT NULL,
                PRIMARY KEY (user_id, game_id)
            )",
        )
        .execute(pool)
        .await
        .context("create owned_games table")?;

        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS sold_games (
                user_id INTEGER NOT NULL,
                game_id INTEGER NOT NULL,
                sold_at TEXT NOT NULL,
                PRIMARY KEY (user_id, game_id)
            )",
        )
        .execute(pool)
        .await
        .context("create sold_games table")?;

        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS reviews (
                id           INTEGER PRIMARY KEY AUTOINCREMENT,
                reviewer_id  INTEGER NOT NULL,
                recipient_id INTEGER NOT NULL,
                created_at   TEXT NOT NULL
            )",
        )
        .execute(pool)
        .await
        .context("create reviews table")?;

        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS posts (
                id         INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id    INTEGER NOT NULL,
                created_at TEXT NOT NULL
            )",
        )
        .execute(pool)
        .await
        .context("create posts table")?;

        Ok(())
    }

    // ─── Users & platform write helpers ──────────────────────────────────────

    /// Insert a user with an explicit creation timestamp (RFC 3339).
    /// Re-inserting an existing id refreshes nothing — it is ignored.
    pub async fn create_user(&self, user_id: i64, created_at: &str) -> Result<()> {
        sqlx::query("INSERT OR IGNORE INTO users (id, created_at) VALUES (?, ?)")
            .bind(user_id)
            .bind(created_at)
            .execute(&self.pool)
            .await
            .context("create user")?;
        Ok(())
    }

    /// Insert a user created now.
    pub async fn create_user_now(&self, user_id: i64) -> Result<()> {
        let now = Utc::now().to_rfc3339();
        self.create_user(user_id, &now).await
    }

    pub async fn set_developer(&self, user_id: i64, is_developer: bool) -> Result<()> {
        sqlx::query("UPDATE users SET is_developer = ? WHERE id = ?")
            .bind(i64::from(is_developer))
            .bind(user_id)
            .execute(&self.pool)
            .await
            .context("set developer flag")?;
        Ok(())
    }

    pub async fn add_friendship(&self, user_id: i64, friend_id: i64) -> Result<()> {
        sqlx::query("INSERT OR IGNORE INTO friendships (user_id, friend_id) VALUES (?, ?)")
            .bind(user_id)
            .bind(friend_id)
            .execute(&self.pool)
            .await
            .context("add friendship")?;
        Ok(())
    }

    pub async fn add_owned_game(&self, user_id: i64, game_id: i64) -> Result<()> {
        sqlx::query("INSERT OR IGNORE INTO owned_games (user_id, game_id) VALUES (?, ?)")
            .bind(user_id)
            .bind(game_id)
            .execute(&self.pool)
            .await
            .context("add owned game")?;
        Ok(())
    }

    /// Record a completed sale by `user_id` of `game_id`.
    pub async fn mark_game_sold(&self, user_id: i64, game_id: i64) -> Result<()> {
        let now = Utc::now().to_rfc3339();
        sqlx::query(
            "INSERT OR IGNORE INTO sold_games (user_id, game_id, sold_at) VALUES (?, ?, ?)",
        )
        .bind(user_id)
        .bind(game_id)
        .bind(&now)
        .execute(&self.pool)
        .await
        .context("mark game sold")?;
        Ok(())
    }

    pub async fn add_review(&self, reviewer_id: i64, recipient_id: i64) -> Result<()> {
        let now = Utc::now().to_rfc3339();
        sqlx::query(
            "INSERT INTO reviews (reviewer_id, recipient_id, created_at) VALUES (?, ?, ?)",
        )
        .bind(reviewer_id)
        .bind(recipient_id)
        .bind(&now)
        .execute(&self.pool)
        .await
        .context("add review")?;
        Ok(())
    }

    pub async fn add_post(&self, user_id: i64) -> Result<()> {
        let now = Utc::now().to_rfc3339();
        sqlx::query("INSERT INTO posts (user_id, created_at) VALUES (?, ?)")
            .bind(user_id)
            .bind(&now)
            .execute(&self.pool)
            .await
            .context("add post")?;
        Ok(())
    }

    async fn count(&self, sql: &str, user_id: i64) -> Result<u64> {
        let n: i64 = sqlx::query_scalar(sql)
            .bind(user_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(n as u64)
    }
}

// ─── CatalogStore ─────────────────────────────────────────────────────────────

#[async_trait]
impl CatalogStore for Storage {
    async fn is_empty(&self) -> Result<bool> {
        let n: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM achievements")
            .fetch_one(&self.pool)
            .await
            .context("count achievements")?;
        Ok(n == 0)
    }

    async fn insert_default_catalog(&self) -> Result<()> {
        for seed in DEFAULT_CATALOG {
            sqlx::query(
                "INSERT INTO achievements (name, description, category, points)
                 VALUES (?, ?, ?, ?)",
            )
            .bind(seed.name)
            .bind(seed.description)
            .bind(seed.category.as_str())
            .bind(seed.points)
            .execute(&self.pool)
            .await
            .with_context(|| format!("seed achievement {}", seed.name))?;
        }
        Ok(())
    }

    async fn update_icon(&self, points: i64, url: &str) -> Result<()> {
        sqlx::query("UPDATE achievements SET icon = ? WHERE points = ?")
            .bind(url)
            .bind(points)
            .execute(&self.pool)
            .await
            .context("backfill achievement icon")?;
        Ok(())
    }

    async fn get_all(&self) -> Result<Vec<AchievementDefinition>> {
        with_timeout(async {
            let rows: Vec<(i64, String, String, String, i64, Option<String>)> = sqlx::query_as(
                "SELECT id, name, description, category, points, icon
                   FROM achievements ORDER BY id ASC",
            )
            .fetch_all(&self.pool)
            .await
            .context("load achievement catalog")?;

            Ok(rows
                .into_iter()
                .map(|(id, name, description, category, points, icon)| AchievementDefinition {
                    id,
                    name,
                    description,
                    category: Category::parse(&category),
                    points,
                    icon,
                })
                .collect())
        })
        .await
    }

    async fn find_id_by_name(&self, name: &str) -> Result<Option<i64>> {
        Ok(
            sqlx::query_scalar("SELECT id FROM achievements WHERE name = ?")
                .bind(name)
                .fetch_optional(&self.pool)
                .await
                .context("look up achievement by name")?,
        )
    }
}

// ─── StatisticsSource ─────────────────────────────────────────────────────────

#[async_trait]
impl StatisticsSource for Storage {
    async fn friend_count(&self, user_id: i64) -> Result<u64> {
        self.count("SELECT COUNT(*) FROM friendships WHERE user_id = ?", user_id)
            .await
            .context("count friendships")
    }

    async fn owned_game_count(&self, user_id: i64) -> Result<u64> {
        self.count("SELECT COUNT(*) FROM owned_games WHERE user_id = ?", user_id)
            .await
            .context("count owned games")
    }

    async fn sold_game_count(&self, user_id: i64) -> Result<u64> {
        self.count("SELECT COUNT(*) FROM sold_games WHERE user_id = ?", user_id)
            .await
            .context("count sold games")
    }

    async fn reviews_given_count(&self, user_id: i64) -> Result<u64> {
        self.count("SELECT COUNT(*) FROM reviews WHERE reviewer_id = ?", user_id)
            .await
            .context("count reviews given")
    }

    async fn reviews_received_count(&self, user_id: i64) -> Result<u64> {
        self.count("SELECT COUNT(*) FROM reviews WHERE recipient_id = ?", user_id)
            .await
            .context("count reviews received")
    }

    async fn post_count(&self, user_id: i64) -> Result<u64> {
        self.count("SELECT COUNT(*) FROM posts WHERE user_id = ?", user_id)
            .await
            .context("count posts")
    }

    /// Whole years since the account was created. An absent user reads as
    /// zero years, matching the COUNT-based accessors.
    async fn years_active(&self, user_id: i64) -> Result<u64> {
        let created_at: Option<String> =
            sqlx::query_scalar("SELECT created_at FROM users WHERE id = ?")
                .bind(user_id)
                .fetch_optional(&self.pool)
                .await
                .context("load user creation time")?;

        let Some(created_at) = created_at else {
            return Ok(0);
        };
        let created = chrono::DateTime::parse_from_rfc3339(&created_at)
            .with_context(|| format!("malformed created_at for user {user_id}"))?;
        let days = (Utc::now() - created.with_timezone(&Utc)).num_days().max(0);
        Ok((days / 365) as u64)
    }

    async fn is_developer(&self, user_id: i64) -> Result<bool> {
        let flag: Option<i64> =
            sqlx::query_scalar("SELECT is_developer FROM users WHERE id = ?")
                .bind(user_id)
                .fetch_optional(&self.pool)
                .await
                .context("load developer flag")?;
        Ok(flag.unwrap_or(0) != 0)
    }
}

// ─── UnlockLedger ─────────────────────────────────────────────────────────────

#[async_trait]
impl UnlockLedger for Storage {
    async fn is_unlocked(&self, user_id: i64, achievement_id: i64) -> Result<bool> {
        let n: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM user_achievements WHERE user_id = ? AND achievement_id = ?",
        )
        .bind(user_id)
        .bind(achievement_id)
        .fetch_one(&self.pool)
        .await
        .context("check unlock")?;
        Ok(n > 0)
    }

    async fn unlock(&self, user_id: i64, achievement_id: i64) -> Result<()> {
        let now = Utc::now().to_rfc3339();
        // OR IGNORE rides the composite primary key: a concurrent duplicate
        // insert is a no-op, never an error.
        sqlx::query(
            "INSERT OR IGNORE INTO user_achievements (user_id, achievement_id, unlocked_at)
             VALUES (?, ?, ?)",
        )
        .bind(user_id)
        .bind(achievement_id)
        .bind(&now)
        .execute(&self.pool)
        .await
        .context("record unlock")?;
        Ok(())
    }

    async fn remove(&self, user_id: i64, achievement_id: i64) -> Result<()> {
        sqlx::query("DELETE FROM user_achievements WHERE user_id = ? AND achievement_id = ?")
            .bind(user_id)
            .bind(achievement_id)
            .execute(&self.pool)
            .await
            .context("remove unlock")?;
        Ok(())
    }

    async fn get_unlocked_ids(&self, user_id: i64) -> Result<Vec<i64>> {
        with_timeout(async {
            Ok(sqlx::query_scalar(
                "SELECT achievement_id FROM user_achievements
                  WHERE user_id = ? ORDER BY achievement_id ASC",
            )
            .bind(user_id)
            .fetch_all(&self.pool)
            .await
            .context("list unlocked achievements")?)
        })
        .await
    }

    async fn get_unlock_details(
        &self,
        user_id: i64,
        achievement_id: i64,
    ) -> Result<Option<UnlockDetails>> {
        let row: Option<(String, String, String)> = sqlx::query_as(
            "SELECT a.name, a.description, ua.unlocked_at
               FROM user_achievements ua
               JOIN achievements a ON a.id = ua.achievement_id
              WHERE ua.user_id = ? AND ua.achievement_id = ?",
        )
        .bind(user_id)
        .bind(achievement_id)
        .fetch_optional(&self.pool)
        .await
        .context("load unlock details")?;

        Ok(row.map(|(name, description, unlocked_at)| UnlockDetails {
            name,
            description,
            unlocked_at,
        }))
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::achievements::catalog::ICON_BACKFILL;

    async fn make_storage() -> Storage {
        Storage::in_memory().await.unwrap()
    }

    #[tokio::test]
    async fn catalog_seed_and_icon_backfill() {
        let storage = make_storage().await;
        assert!(storage.is_empty().await.unwrap());

        storage.insert_default_catalog().await.unwrap();
        assert!(!storage.is_empty().await.unwrap());

        for (points, url) in ICON_BACKFILL {
            storage.update_icon(points, url).await.unwrap();
        }

        let all = storage.get_all().await.unwrap();
        assert_eq!(all.len(), 30);
        assert!(all.iter().all(|d| d.has_valid_icon()));
    }

    #[tokio::test]
    async fn find_id_by_name_resolves_seeded_rows() {
        let storage = make_storage().await;
        storage.insert_default_catalog().await.unwrap();

        let id = storage.find_id_by_name("DEVELOPER").await.unwrap();
        assert!(id.is_some());
        assert!(storage.find_id_by_name("NOPE").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn unlock_is_idempotent_per_pair() {
        let storage = make_storage().await;
        storage.insert_default_catalog().await.unwrap();
        let id = storage.find_id_by_name("FRIENDSHIP1").await.unwrap().unwrap();

        storage.unlock(9, id).await.unwrap();
        storage.unlock(9, id).await.unwrap();

        assert!(storage.is_unlocked(9, id).await.unwrap());
        assert_eq!(storage.get_unlocked_ids(9).await.unwrap(), vec![id]);

        let details = storage.get_unlock_details(9, id).await.unwrap().unwrap();
        assert_eq!(details.name, "FRIENDSHIP1");
    }

    #[tokio::test]
    async fn remove_absent_record_is_a_no_op() {
        let storage = make_storage().await;
        storage.remove(1, 42).await.unwrap();
        assert!(!storage.is_unlocked(1, 42).await.unwrap());
    }

    #[tokio::test]
    async fn statistics_count_per_user() {
        let storage = make_storage().await;
        storage.create_user_now(1).await.unwrap();
        storage.create_user_now(2).await.unwrap();

        storage.add_friendship(1, 2).await.unwrap();
        storage.add_owned_game(1, 100).await.unwrap();
        storage.add_owned_game(1, 101).await.unwrap();
        storage.mark_game_sold(1, 100).await.unwrap();
        storage.add_review(1, 2).await.unwrap();
        storage.add_review(2, 1).await.unwrap();
        storage.add_post(1).await.unwrap();

        assert_eq!(storage.friend_count(1).await.unwrap(), 1);
        assert_eq!(storage.owned_game_count(1).await.unwrap(), 2);
        assert_eq!(storage.sold_game_count(1).await.unwrap(), 1);
        assert_eq!(storage.reviews_given_count(1).await.unwrap(), 1);
        assert_eq!(storage.reviews_received_count(1).await.unwrap(), 1);
        assert_eq!(storage.post_count(1).await.unwrap(), 1);

        // User 2 only wrote one review; nothing else counts against them.
        assert_eq!(storage.friend_count(2).await.unwrap(), 0);
        assert_eq!(storage.reviews_given_count(2).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn years_active_from_account_age() {
        let storage = make_storage().await;
        let three_years_ago = (Utc::now() - chrono::Duration::days(3 * 365 + 30)).to_rfc3339();
        storage.create_user(5, &three_years_ago).await.unwrap();

        assert_eq!(storage.years_active(5).await.unwrap(), 3);
        // Absent users read as zero years, not an error.
        assert_eq!(storage.years_active(99).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn developer_flag_round_trip() {
        let storage = make_storage().await;
        storage.create_user_now(7).await.unwrap();
        assert!(!storage.is_developer(7).await.unwrap());

        storage.set_developer(7, true).await.unwrap();
        assert!(storage.is_developer(7).await.unwrap());

        assert!(!storage.is_developer(404).await.unwrap());
    }
}
