//! Transaction operations

use rusqlite::{params, OptionalExtension, Row};
use std::str::FromStr;

use super::{parse_date, parse_datetime, Database};
use crate::error::{Error, Result};
use crate::models::{Category, NewTransaction, Transaction, TransactionKind};
use crate::money;

pub(crate) fn map_transaction(row: &Row<'_>) -> rusqlite::Result<Transaction> {
    let kind_str: String = row.get(2)?;
    let category_str: String = row.get(3)?;
    let date_str: String = row.get(6)?;
    let created_at_str: String = row.get(7)?;

    Ok(Transaction {
        id: row.get(0)?,
        user_id: row.get(1)?,
        kind: TransactionKind::from_str(&kind_str)
            .unwrap_or(TransactionKind::Expense),
        category: Category::from_str(&category_str).unwrap_or(Category::Other),
        amount: money::from_minor(row.get(4)?),
        description: row.get(5)?,
        date: parse_date(&date_str),
        created_at: parse_datetime(&created_at_str),
    })
}

pub(crate) const TX_COLUMNS: &str =
    "t.id, t.user_id, t.kind, t.category, t.amount_minor, t.description, t.date, t.created_at";

impl Database {
    /// Insert a transaction, returning its ID
    pub fn insert_transaction(&self, user_id: i64, tx: &NewTransaction) -> Result<i64> {
        if tx.amount.is_sign_negative() {
            return Err(Error::InvalidAmount(format!(
                "Transaction amount must not be negative: {}",
                tx.amount
            )));
        }

        let conn = self.conn()?;
        conn.execute(
            r#"
            INSERT INTO transactions (user_id, kind, category, amount_minor, description, date)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
            params![
                user_id,
                tx.kind.as_str(),
                tx.category.as_str(),
                money::to_minor(tx.amount),
                tx.description,
                tx.date.to_string(),
            ],
        )?;

        Ok(conn.last_insert_rowid())
    }

    /// Get a single transaction owned by the user
    pub fn get_transaction(&self, user_id: i64, id: i64) -> Result<Transaction> {
        let conn = self.conn()?;
        let sql = format!(
            "SELECT {} FROM transactions t WHERE t.id = ? AND t.user_id = ?",
            TX_COLUMNS
        );

        conn.query_row(&sql, params![id, user_id], map_transaction)
            .optional()?
            .ok_or_else(|| Error::NotFound(format!("Transaction {}", id)))
    }

    /// Update an owned transaction in place
    pub fn update_transaction(&self, user_id: i64, id: i64, tx: &NewTransaction) -> Result<()> {
        if tx.amount.is_sign_negative() {
            return Err(Error::InvalidAmount(format!(
                "Transaction amount must not be negative: {}",
                tx.amount
            )));
        }

        let conn = self.conn()?;
        let changed = conn.execute(
            r#"
            UPDATE transactions
            SET kind = ?, category = ?, amount_minor = ?, description = ?, date = ?
            WHERE id = ? AND user_id = ?
            "#,
            params![
                tx.kind.as_str(),
                tx.category.as_str(),
                money::to_minor(tx.amount),
                tx.description,
                tx.date.to_string(),
                id,
                user_id,
            ],
        )?;

        if changed == 0 {
            return Err(Error::NotFound(format!("Transaction {}", id)));
        }
        Ok(())
    }

    /// Delete an owned transaction
    pub fn delete_transaction(&self, user_id: i64, id: i64) -> Result<()> {
        let conn = self.conn()?;
        let changed = conn.execute(
            "DELETE FROM transactions WHERE id = ? AND user_id = ?",
            params![id, user_id],
        )?;

        if changed == 0 {
            return Err(Error::NotFound(format!("Transaction {}", id)));
        }
        Ok(())
    }

    /// List a user's transactions, most recent first
    pub fn list_transactions(
        &self,
        user_id: i64,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Transaction>> {
        let conn = self.conn()?;
        let sql = format!(
            r#"
            SELECT {}
            FROM transactions t
            WHERE t.user_id = ?
            ORDER BY t.date DESC, t.created_at DESC, t.id DESC
            LIMIT ? OFFSET ?
            "#,
            TX_COLUMNS
        );

        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(params![user_id, limit, offset], map_transaction)?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }
}
