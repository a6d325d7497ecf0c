//! Achievement badge operations

use rusqlite::{params, Row};
use std::str::FromStr;
use tracing::info;

use super::{parse_datetime, Database};
use crate::error::Result;
use crate::models::{AchievementBadge, Badge};

fn map_badge(row: &Row<'_>) -> rusqlite::Result<AchievementBadge> {
    let badge_str: String = row.get(2)?;
    let awarded_at_str: String = row.get(3)?;

    Ok(AchievementBadge {
        id: row.get(0)?,
        user_id: row.get(1)?,
        badge: Badge::from_str(&badge_str).unwrap_or(Badge::SavingsChampion),
        awarded_at: parse_datetime(&awarded_at_str),
    })
}

impl Database {
    /// Grant a badge if the user does not already hold it
    ///
    /// Implemented as an atomic insert against the (user, badge) unique key
    /// so concurrent grants cannot duplicate rows. A badge is never revoked.
    ///
    /// Returns true when the badge was newly granted.
    pub fn award_badge(&self, user_id: i64, badge: Badge) -> Result<bool> {
        let conn = self.conn()?;
        let inserted = conn.execute(
            r#"
            INSERT INTO achievement_badges (user_id, badge)
            VALUES (?, ?)
            ON CONFLICT(user_id, badge) DO NOTHING
            "#,
            params![user_id, badge.as_str()],
        )?;

        if inserted > 0 {
            info!(user_id, badge = badge.as_str(), "Badge granted");
        }
        Ok(inserted > 0)
    }

    /// Whether the user already holds a badge
    pub fn has_badge(&self, user_id: i64, badge: Badge) -> Result<bool> {
        let conn = self.conn()?;
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM achievement_badges WHERE user_id = ? AND badge = ?",
            params![user_id, badge.as_str()],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    /// All badges the user holds, earliest award first
    pub fn list_badges(&self, user_id: i64) -> Result<Vec<AchievementBadge>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT id, user_id, badge, awarded_at
            FROM achievement_badges
            WHERE user_id = ?
            ORDER BY awarded_at ASC, id ASC
            "#,
        )?;

        let rows = stmt.query_map(params![user_id], map_badge)?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }
}
