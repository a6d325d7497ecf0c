//! Savings goal operations

use chrono::NaiveDate;
use rusqlite::{params, OptionalExtension, Row};
use rust_decimal::Decimal;

use super::{parse_date, parse_datetime, Database};
use crate::error::{Error, Result};
use crate::models::{NewSavingsGoal, SavingsGoal};
use crate::money;

fn map_goal(row: &Row<'_>) -> rusqlite::Result<SavingsGoal> {
    let start_str: String = row.get(4)?;
    let end_str: String = row.get(5)?;
    let created_at_str: String = row.get(9)?;
    let commitment_minor: Option<i64> = row.get(6)?;

    Ok(SavingsGoal {
        id: row.get(0)?,
        user_id: row.get(1)?,
        name: row.get(2)?,
        target_amount: money::from_minor(row.get(3)?),
        start_date: parse_date(&start_str),
        end_date: parse_date(&end_str),
        monthly_commitment: commitment_minor.map(money::from_minor),
        planned_months: row.get(7)?,
        completed: row.get(8)?,
        created_at: parse_datetime(&created_at_str),
    })
}

const GOAL_COLUMNS: &str = "id, user_id, name, target_minor, start_date, end_date, \
     monthly_commitment_minor, planned_months, completed, created_at";

impl Database {
    /// Create a savings goal
    pub fn create_goal(&self, user_id: i64, goal: &NewSavingsGoal) -> Result<SavingsGoal> {
        if goal.target_amount <= Decimal::ZERO {
            return Err(Error::InvalidAmount(format!(
                "Goal target must be positive: {}",
                goal.target_amount
            )));
        }
        if goal.end_date <= goal.start_date {
            return Err(Error::InvalidData(format!(
                "Goal end date {} must be after start date {}",
                goal.end_date, goal.start_date
            )));
        }
        if let Some(commitment) = goal.monthly_commitment {
            if commitment <= Decimal::ZERO {
                return Err(Error::InvalidAmount(format!(
                    "Monthly commitment must be positive: {}",
                    commitment
                )));
            }
        }
        if let Some(months) = goal.planned_months {
            if months == 0 {
                return Err(Error::InvalidData(
                    "Planned months must be positive".to_string(),
                ));
            }
        }

        let conn = self.conn()?;
        conn.execute(
            r#"
            INSERT INTO savings_goals
                (user_id, name, target_minor, start_date, end_date,
                 monthly_commitment_minor, planned_months)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
            params![
                user_id,
                goal.name,
                money::to_minor(goal.target_amount),
                goal.start_date.to_string(),
                goal.end_date.to_string(),
                goal.monthly_commitment.map(money::to_minor),
                goal.planned_months,
            ],
        )?;

        self.get_goal(user_id, conn.last_insert_rowid())
    }

    /// Get a single goal owned by the user
    pub fn get_goal(&self, user_id: i64, id: i64) -> Result<SavingsGoal> {
        let conn = self.conn()?;
        let sql = format!(
            "SELECT {} FROM savings_goals WHERE id = ? AND user_id = ?",
            GOAL_COLUMNS
        );

        conn.query_row(&sql, params![id, user_id], map_goal)
            .optional()?
            .ok_or_else(|| Error::NotFound(format!("Savings goal {}", id)))
    }

    /// List a user's goals, nearest deadline first
    pub fn list_goals(&self, user_id: i64) -> Result<Vec<SavingsGoal>> {
        let conn = self.conn()?;
        let sql = format!(
            "SELECT {} FROM savings_goals WHERE user_id = ? ORDER BY end_date ASC, id ASC",
            GOAL_COLUMNS
        );

        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(params![user_id], map_goal)?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    /// The user's nearest-deadline goal that is still open as of `today`
    pub fn active_goal(&self, user_id: i64, today: NaiveDate) -> Result<Option<SavingsGoal>> {
        let conn = self.conn()?;
        let sql = format!(
            r#"
            SELECT {}
            FROM savings_goals
            WHERE user_id = ? AND completed = 0 AND end_date >= ?
            ORDER BY end_date ASC, id ASC
            LIMIT 1
            "#,
            GOAL_COLUMNS
        );

        Ok(conn
            .query_row(&sql, params![user_id, today.to_string()], map_goal)
            .optional()?)
    }

    /// Mark a goal completed (explicit user action)
    pub fn mark_goal_completed(&self, user_id: i64, id: i64) -> Result<()> {
        let conn = self.conn()?;
        let changed = conn.execute(
            "UPDATE savings_goals SET completed = 1 WHERE id = ? AND user_id = ?",
            params![id, user_id],
        )?;

        if changed == 0 {
            return Err(Error::NotFound(format!("Savings goal {}", id)));
        }
        Ok(())
    }

    /// Delete an owned goal
    pub fn delete_goal(&self, user_id: i64, id: i64) -> Result<()> {
        let conn = self.conn()?;
        let changed = conn.execute(
            "DELETE FROM savings_goals WHERE id = ? AND user_id = ?",
            params![id, user_id],
        )?;

        if changed == 0 {
            return Err(Error::NotFound(format!("Savings goal {}", id)));
        }
        Ok(())
    }
}
