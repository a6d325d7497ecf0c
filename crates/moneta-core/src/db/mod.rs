//! Database access layer with connection pooling and migrations
//!
//! This module is organized by domain:
//! - `transactions` - Transaction CRUD
//! - `ledger` - Owner-scoped aggregate queries (the ledger query interface)
//! - `budgets` - Monthly budget get-or-create and save
//! - `goals` - Savings goal operations
//! - `badges` - Achievement badge grants

use chrono::{DateTime, NaiveDate, Utc};
use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use tracing::info;

use crate::error::Result;

mod badges;
mod budgets;
mod goals;
mod ledger;
mod ledger_filter;
mod transactions;

pub use ledger::{CategoryAverage, CategoryTotal, DailyTotal};
pub use ledger_filter::LedgerFilter;

pub type DbPool = Pool<SqliteConnectionManager>;
pub type DbConn = PooledConnection<SqliteConnectionManager>;

/// Parse a SQLite datetime string into a DateTime<Utc>
pub(crate) fn parse_datetime(s: &str) -> DateTime<Utc> {
    // SQLite stores as "YYYY-MM-DD HH:MM:SS" format
    chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
        .map(|dt| dt.and_utc())
        .unwrap_or_else(|_| Utc::now())
}

/// Parse a SQLite date string into a NaiveDate
pub(crate) fn parse_date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap_or_default()
}

/// Database wrapper with connection pooling
#[derive(Clone)]
pub struct Database {
    pool: DbPool,
    /// Path to the database file
    db_path: String,
}

impl Database {
    /// Create a new database connection pool at the given path
    pub fn new(path: &str) -> Result<Self> {
        let manager = SqliteConnectionManager::file(path);
        let pool = Pool::builder().max_size(10).build(manager)?;

        let db = Self {
            pool,
            db_path: path.to_string(),
        };
        db.run_migrations()?;

        Ok(db)
    }

    /// Get the path to the database file
    pub fn path(&self) -> &str {
        &self.db_path
    }

    /// Create a throwaway database (for testing)
    ///
    /// Note: Uses a temporary file rather than `:memory:` because every
    /// pooled connection to `:memory:` would get its own private database.
    pub fn in_memory() -> Result<Self> {
        use std::sync::atomic::{AtomicU64, Ordering};
        static COUNTER: AtomicU64 = AtomicU64::new(0);

        let id = COUNTER.fetch_add(1, Ordering::SeqCst);
        let path = format!(
            "{}/moneta_test_{}_{}.db",
            std::env::temp_dir().display(),
            std::process::id(),
            id
        );

        // Remove any existing file
        let _ = std::fs::remove_file(&path);

        Self::new(&path)
    }

    /// Get a connection from the pool
    pub fn conn(&self) -> Result<DbConn> {
        Ok(self.pool.get()?)
    }

    /// Run database migrations
    fn run_migrations(&self) -> Result<()> {
        let conn = self.conn()?;

        conn.execute_batch(
            r#"
            -- Enable foreign keys
            PRAGMA foreign_keys = ON;

            -- WAL mode: readers don't block writers
            PRAGMA journal_mode = WAL;

            -- Cache size: ~8MB (2000 pages * 4KB default page size)
            PRAGMA cache_size = 2000;

            -- Synchronous NORMAL: good balance of safety and performance
            PRAGMA synchronous = NORMAL;

            -- Store temp tables in memory
            PRAGMA temp_store = MEMORY;

            -- Transactions (income/expense entries)
            -- Amounts are stored as integer minor units (cents) so SUM/COUNT
            -- aggregation is exact.
            CREATE TABLE IF NOT EXISTS transactions (
                id INTEGER PRIMARY KEY,
                user_id INTEGER NOT NULL,
                kind TEXT NOT NULL CHECK (kind IN ('INCOME', 'EXPENSE')),
                category TEXT NOT NULL CHECK (category IN ('FOOD', 'TRAVEL', 'RENT', 'SHOPPING', 'OTHER')),
                amount_minor INTEGER NOT NULL CHECK (amount_minor >= 0),
                description TEXT NOT NULL DEFAULT '',
                date DATE NOT NULL,
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP
            );

            CREATE INDEX IF NOT EXISTS idx_transactions_user_date ON transactions(user_id, date);
            CREATE INDEX IF NOT EXISTS idx_transactions_user_kind ON transactions(user_id, kind);
            CREATE INDEX IF NOT EXISTS idx_transactions_user_category ON transactions(user_id, category);

            -- Monthly budgets, unique per (user, month, year).
            -- Created lazily at zero on first access to a period.
            CREATE TABLE IF NOT EXISTS monthly_budgets (
                id INTEGER PRIMARY KEY,
                user_id INTEGER NOT NULL,
                month INTEGER NOT NULL CHECK (month BETWEEN 1 AND 12),
                year INTEGER NOT NULL CHECK (year >= 2000),
                budget_minor INTEGER NOT NULL DEFAULT 0 CHECK (budget_minor >= 0),
                UNIQUE(user_id, month, year)
            );

            -- Savings goals. Progress is never stored; it is recomputed
            -- from the ledger at read time. Completion is explicit.
            CREATE TABLE IF NOT EXISTS savings_goals (
                id INTEGER PRIMARY KEY,
                user_id INTEGER NOT NULL,
                name TEXT NOT NULL,
                target_minor INTEGER NOT NULL CHECK (target_minor > 0),
                start_date DATE NOT NULL,
                end_date DATE NOT NULL,
                monthly_commitment_minor INTEGER CHECK (monthly_commitment_minor IS NULL OR monthly_commitment_minor > 0),
                planned_months INTEGER CHECK (planned_months IS NULL OR planned_months > 0),
                completed BOOLEAN NOT NULL DEFAULT 0,
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP
            );

            CREATE INDEX IF NOT EXISTS idx_goals_user_end ON savings_goals(user_id, end_date);

            -- Achievement badges: one row per (user, badge), never revoked.
            CREATE TABLE IF NOT EXISTS achievement_badges (
                id INTEGER PRIMARY KEY,
                user_id INTEGER NOT NULL,
                badge TEXT NOT NULL CHECK (badge IN ('SAVINGS_CHAMPION', 'BUDGET_MASTER', 'EXPENSE_REDUCER')),
                awarded_at DATETIME DEFAULT CURRENT_TIMESTAMP,
                UNIQUE(user_id, badge)
            );

            CREATE INDEX IF NOT EXISTS idx_badges_user ON achievement_badges(user_id);
            "#,
        )?;

        info!("Database schema initialized");
        Ok(())
    }
}

#[cfg(test)]
mod tests;
