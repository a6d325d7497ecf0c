//! Ledger filter builder for constructing dynamic aggregate queries
//!
//! Every ledger query is owner-scoped; the remaining filters (kind,
//! category, calendar period, date range) are optional. The builder keeps
//! the WHERE-clause assembly in one place so the aggregate queries in
//! `ledger.rs` do not duplicate it.

use chrono::NaiveDate;

use crate::models::{Category, TransactionKind, YearMonth};

/// Builder for owner-scoped ledger query filters
pub struct LedgerFilter {
    user_id: i64,
    kind: Option<TransactionKind>,
    category: Option<Category>,
    period: Option<YearMonth>,
    date_range: Option<(NaiveDate, NaiveDate)>,
}

/// SQL components produced by [`LedgerFilter::build`]
pub(crate) struct FilterResult {
    /// WHERE clause including the "WHERE" keyword
    pub where_clause: String,
    /// Parameters for the query (boxed for rusqlite compatibility)
    pub params: Vec<Box<dyn rusqlite::ToSql>>,
}

impl LedgerFilter {
    /// Create a filter scoped to one user
    pub fn for_user(user_id: i64) -> Self {
        Self {
            user_id,
            kind: None,
            category: None,
            period: None,
            date_range: None,
        }
    }

    /// Restrict to income or expense entries
    pub fn kind(mut self, kind: TransactionKind) -> Self {
        self.kind = Some(kind);
        self
    }

    /// Restrict to one category
    pub fn category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }

    /// Restrict to one calendar month
    pub fn period(mut self, period: YearMonth) -> Self {
        self.period = Some(period);
        self
    }

    /// Restrict to an inclusive date range
    pub fn date_range(mut self, from: NaiveDate, to: NaiveDate) -> Self {
        self.date_range = Some((from, to));
        self
    }

    /// Build the WHERE clause and parameter list
    pub(crate) fn build(self) -> FilterResult {
        let mut conditions = vec!["t.user_id = ?".to_string()];
        let mut params: Vec<Box<dyn rusqlite::ToSql>> = vec![Box::new(self.user_id)];

        if let Some(kind) = self.kind {
            conditions.push("t.kind = ?".to_string());
            params.push(Box::new(kind.as_str()));
        }

        if let Some(category) = self.category {
            conditions.push("t.category = ?".to_string());
            params.push(Box::new(category.as_str()));
        }

        if let Some(period) = self.period {
            conditions.push("strftime('%Y-%m', t.date) = ?".to_string());
            params.push(Box::new(format!("{:04}-{:02}", period.year, period.month)));
        }

        if let Some((from, to)) = self.date_range {
            conditions.push("t.date >= ? AND t.date <= ?".to_string());
            params.push(Box::new(from.to_string()));
            params.push(Box::new(to.to_string()));
        }

        FilterResult {
            where_clause: format!("WHERE {}", conditions.join(" AND ")),
            params,
        }
    }
}

impl FilterResult {
    /// Get parameter references for query execution
    pub fn params_refs(&self) -> Vec<&dyn rusqlite::ToSql> {
        self.params.iter().map(|p| p.as_ref()).collect()
    }
}
