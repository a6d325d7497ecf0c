//! Owner-scoped aggregate queries (the ledger query interface)
//!
//! Every aggregate resolves missing data to the additive identity: a sum
//! over no rows is zero, a grouped query over no rows is an empty list.

use chrono::NaiveDate;
use rusqlite::params;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::ledger_filter::LedgerFilter;
use super::transactions::{map_transaction, TX_COLUMNS};
use super::{parse_date, Database};
use crate::error::Result;
use crate::models::{Category, Transaction, TransactionKind, YearMonth};
use crate::money;

/// One category's aggregate expense total
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryTotal {
    pub category: Category,
    pub total: Decimal,
}

/// One category's average expense amount
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryAverage {
    pub category: Category,
    pub average: Decimal,
    pub transaction_count: i64,
}

/// Aggregate expense total for one day
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyTotal {
    pub date: NaiveDate,
    pub total: Decimal,
}

impl Database {
    /// Sum of amounts matching the filter; zero if nothing matches
    pub fn sum_amount(&self, filter: LedgerFilter) -> Result<Decimal> {
        let conn = self.conn()?;
        let built = filter.build();
        let sql = format!(
            "SELECT COALESCE(SUM(t.amount_minor), 0) FROM transactions t {}",
            built.where_clause
        );

        let minor: i64 = conn.query_row(&sql, built.params_refs().as_slice(), |row| row.get(0))?;
        Ok(money::from_minor(minor))
    }

    /// Count of transactions matching the filter
    pub fn count_transactions(&self, filter: LedgerFilter) -> Result<i64> {
        let conn = self.conn()?;
        let built = filter.build();
        let sql = format!(
            "SELECT COUNT(*) FROM transactions t {}",
            built.where_clause
        );

        Ok(conn.query_row(&sql, built.params_refs().as_slice(), |row| row.get(0))?)
    }

    /// Whether the user recorded any transaction in the given month
    pub fn month_has_transactions(&self, user_id: i64, period: YearMonth) -> Result<bool> {
        let count =
            self.count_transactions(LedgerFilter::for_user(user_id).period(period))?;
        Ok(count > 0)
    }

    /// One month's total for a transaction kind
    pub fn monthly_total(
        &self,
        user_id: i64,
        kind: TransactionKind,
        period: YearMonth,
    ) -> Result<Decimal> {
        self.sum_amount(LedgerFilter::for_user(user_id).kind(kind).period(period))
    }

    /// Per-category expense totals, highest first
    ///
    /// Ties are broken by category declaration order so rankings are
    /// reproducible.
    pub fn expense_totals_by_category(
        &self,
        user_id: i64,
        period: Option<YearMonth>,
    ) -> Result<Vec<CategoryTotal>> {
        let conn = self.conn()?;
        let mut filter = LedgerFilter::for_user(user_id).kind(TransactionKind::Expense);
        if let Some(period) = period {
            filter = filter.period(period);
        }
        let built = filter.build();

        let sql = format!(
            r#"
            SELECT t.category, SUM(t.amount_minor)
            FROM transactions t
            {}
            GROUP BY t.category
            "#,
            built.where_clause
        );

        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(built.params_refs().as_slice(), |row| {
            let category_str: String = row.get(0)?;
            let minor: i64 = row.get(1)?;
            Ok((category_str, minor))
        })?;

        let mut totals: Vec<(Category, i64)> = rows
            .collect::<std::result::Result<Vec<_>, _>>()?
            .into_iter()
            .map(|(name, minor)| {
                (Category::from_str(&name).unwrap_or(Category::Other), minor)
            })
            .collect();

        totals.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.ordinal().cmp(&b.0.ordinal())));

        Ok(totals
            .into_iter()
            .map(|(category, minor)| CategoryTotal {
                category,
                total: money::from_minor(minor),
            })
            .collect())
    }

    /// All-time average expense amount per category
    ///
    /// Computed as an exact SUM/COUNT division in `Decimal` rather than
    /// SQLite's floating-point AVG.
    pub fn average_expense_by_category(&self, user_id: i64) -> Result<Vec<CategoryAverage>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT t.category, SUM(t.amount_minor), COUNT(*)
            FROM transactions t
            WHERE t.user_id = ? AND t.kind = 'EXPENSE'
            GROUP BY t.category
            "#,
        )?;

        let rows = stmt.query_map(params![user_id], |row| {
            let category_str: String = row.get(0)?;
            let sum_minor: i64 = row.get(1)?;
            let count: i64 = row.get(2)?;
            Ok((category_str, sum_minor, count))
        })?;

        let mut averages = Vec::new();
        for row in rows {
            let (name, sum_minor, count) = row?;
            let category = Category::from_str(&name).unwrap_or(Category::Other);
            let average = money::safe_div(money::from_minor(sum_minor), Decimal::from(count))
                .unwrap_or(Decimal::ZERO);
            averages.push(CategoryAverage {
                category,
                average,
                transaction_count: count,
            });
        }

        averages.sort_by_key(|a| a.category.ordinal());
        Ok(averages)
    }

    /// The user's largest expense transactions, amount descending
    pub fn largest_expenses(&self, user_id: i64, limit: i64) -> Result<Vec<Transaction>> {
        let conn = self.conn()?;
        let sql = format!(
            r#"
            SELECT {}
            FROM transactions t
            WHERE t.user_id = ? AND t.kind = 'EXPENSE'
            ORDER BY t.amount_minor DESC, t.id ASC
            LIMIT ?
            "#,
            TX_COLUMNS
        );

        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(params![user_id, limit], map_transaction)?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    /// The user's highest-spend days, aggregate total descending
    pub fn top_expense_days(&self, user_id: i64, limit: i64) -> Result<Vec<DailyTotal>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT t.date, SUM(t.amount_minor) AS total
            FROM transactions t
            WHERE t.user_id = ? AND t.kind = 'EXPENSE'
            GROUP BY t.date
            ORDER BY total DESC, t.date ASC
            LIMIT ?
            "#,
        )?;

        let rows = stmt.query_map(params![user_id, limit], |row| {
            let date_str: String = row.get(0)?;
            let minor: i64 = row.get(1)?;
            Ok((date_str, minor))
        })?;

        Ok(rows
            .collect::<std::result::Result<Vec<_>, _>>()?
            .into_iter()
            .map(|(date_str, minor)| DailyTotal {
                date: parse_date(&date_str),
                total: money::from_minor(minor),
            })
            .collect())
    }
}
