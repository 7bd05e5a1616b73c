use serde::{Deserialize, Serialize};

use crate::admin::repo::{AdminStats, DailyUsageRow, UsageByModel, UsageByUser};

#[derive(Debug, Deserialize)]
pub struct StatsQuery {
    #[serde(default = "default_days")]
    pub days: i32,
}

fn default_days() -> i32 {
    7
}

#[derive(Debug, Deserialize)]
pub struct RoleQuery {
    pub role: String,
}

#[derive(Debug, Serialize)]
pub struct DailyUsage {
    pub date: String,
    pub request_count: i64,
    pub total_tokens: i64,
}

impl From<DailyUsageRow> for DailyUsage {
    fn from(row: DailyUsageRow) -> Self {
        Self {
            date: row.day.to_string(),
            request_count: row.request_count,
            total_tokens: row.total_tokens,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AdminDashboard {
    pub stats: AdminStats,
    pub usage_by_model: Vec<UsageByModel>,
    pub usage_by_user: Vec<UsageByUser>,
    pub daily_usage: Vec<DailyUsage>,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    #[test]
    fn stats_query_defaults_to_seven_days() {
        let q: StatsQuery = serde_json::from_str("{}").unwrap();
        assert_eq!(q.days, 7);
    }

    #[test]
    fn daily_usage_renders_iso_date() {
        let usage = DailyUsage::from(DailyUsageRow {
            day: date!(2026 - 08 - 06),
            request_count: 3,
            total_tokens: 120,
        });
        assert_eq!(usage.date, "2026-08-06");
    }
}
