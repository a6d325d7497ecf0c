//! Monthly budget operations

use rusqlite::{params, OptionalExtension, Row};
use rust_decimal::Decimal;

use super::Database;
use crate::error::{Error, Result};
use crate::models::{MonthlyBudget, YearMonth};
use crate::money;

fn map_budget(row: &Row<'_>) -> rusqlite::Result<MonthlyBudget> {
    Ok(MonthlyBudget {
        id: row.get(0)?,
        user_id: row.get(1)?,
        month: row.get(2)?,
        year: row.get(3)?,
        budget_amount: money::from_minor(row.get(4)?),
    })
}

const BUDGET_COLUMNS: &str = "id, user_id, month, year, budget_minor";

impl Database {
    /// Get a month's budget if one has been configured
    pub fn get_budget(&self, user_id: i64, period: YearMonth) -> Result<Option<MonthlyBudget>> {
        let conn = self.conn()?;
        let sql = format!(
            "SELECT {} FROM monthly_budgets WHERE user_id = ? AND month = ? AND year = ?",
            BUDGET_COLUMNS
        );

        Ok(conn
            .query_row(&sql, params![user_id, period.month, period.year], map_budget)
            .optional()?)
    }

    /// Get a month's budget, creating it at zero on first access
    ///
    /// The insert-if-absent runs against the (user, month, year) unique key
    /// so concurrent requests cannot create duplicate rows.
    pub fn get_or_create_budget(&self, user_id: i64, period: YearMonth) -> Result<MonthlyBudget> {
        let conn = self.conn()?;

        conn.execute(
            r#"
            INSERT INTO monthly_budgets (user_id, month, year, budget_minor)
            VALUES (?, ?, ?, 0)
            ON CONFLICT(user_id, month, year) DO NOTHING
            "#,
            params![user_id, period.month, period.year],
        )?;

        let sql = format!(
            "SELECT {} FROM monthly_budgets WHERE user_id = ? AND month = ? AND year = ?",
            BUDGET_COLUMNS
        );
        Ok(conn.query_row(&sql, params![user_id, period.month, period.year], map_budget)?)
    }

    /// Set a month's budget amount, creating or replacing as needed
    pub fn save_budget(
        &self,
        user_id: i64,
        period: YearMonth,
        budget_amount: Decimal,
    ) -> Result<MonthlyBudget> {
        if !(1..=12).contains(&period.month) {
            return Err(Error::InvalidData(format!(
                "Month must be 1-12, got {}",
                period.month
            )));
        }
        if period.year < 2000 {
            return Err(Error::InvalidData(format!(
                "Year must be 2000 or later, got {}",
                period.year
            )));
        }
        if budget_amount < Decimal::ZERO {
            return Err(Error::InvalidAmount(format!(
                "Budget must not be negative: {}",
                budget_amount
            )));
        }

        let conn = self.conn()?;
        conn.execute(
            r#"
            INSERT INTO monthly_budgets (user_id, month, year, budget_minor)
            VALUES (?, ?, ?, ?)
            ON CONFLICT(user_id, month, year) DO UPDATE SET budget_minor = excluded.budget_minor
            "#,
            params![
                user_id,
                period.month,
                period.year,
                money::to_minor(budget_amount)
            ],
        )?;

        let sql = format!(
            "SELECT {} FROM monthly_budgets WHERE user_id = ? AND month = ? AND year = ?",
            BUDGET_COLUMNS
        );
        Ok(conn.query_row(&sql, params![user_id, period.month, period.year], map_budget)?)
    }
}
