use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::domain::{DomainScore, MetricId, ScoreBreakdown, ScoreRequest, UserId};

/// A committed weekly evaluation: the originating request together with the
/// breakdown the engine produced for it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklyMetricRecord {
    pub id: MetricId,
    pub user_id: UserId,
    pub week_date: DateTime<Utc>,
    pub request: ScoreRequest,
    pub breakdown: ScoreBreakdown,
}

impl WeeklyMetricRecord {
    /// Flattened history row for charting, matching the dashboard payload.
    pub fn history_entry(&self) -> MetricHistoryEntry {
        MetricHistoryEntry {
            id: self.id,
            week_date: self.week_date,
            computed_score: self.breakdown.final_score,
            t_minutes: self.request.t_minutes,
            b_days: self.request.b_days,
            w_weight: self.request.w_weight,
            k1_bonus: self.request.k1_bonus,
            ke_bonus: self.request.ke_bonus,
            n_violations: self.request.n_violations,
            d_severity: self.request.d_severity,
            domains: self.request.domains.clone(),
            breakdown: self.breakdown,
        }
    }

    /// Condensed row for the all-metrics overview table.
    pub fn overview_entry(&self, user_name: &str) -> MetricOverviewEntry {
        MetricOverviewEntry {
            id: self.id,
            user_name: user_name.to_string(),
            week_date: self.week_date,
            computed_score: self.breakdown.final_score,
            t_minutes: self.request.t_minutes,
            n_violations: self.request.n_violations,
        }
    }
}

/// Directory entry for a scored user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: UserId,
    pub name: String,
    pub role: String,
}

/// Metric fields for insertion; the repository assigns the id.
#[derive(Debug, Clone)]
pub struct NewMetric {
    pub user_id: UserId,
    pub week_date: DateTime<Utc>,
    pub request: ScoreRequest,
    pub breakdown: ScoreBreakdown,
}

/// Storage abstraction for committed metrics so the service can be exercised
/// against in-memory doubles.
pub trait MetricRepository: Send + Sync {
    fn insert(&self, metric: NewMetric) -> Result<WeeklyMetricRecord, RepositoryError>;
    /// All records for a user, ascending by week.
    fn history_for(&self, user: UserId) -> Result<Vec<WeeklyMetricRecord>, RepositoryError>;
    fn latest_for(&self, user: UserId) -> Result<Option<WeeklyMetricRecord>, RepositoryError>;
    /// Every record across users, descending by week.
    fn all(&self) -> Result<Vec<WeeklyMetricRecord>, RepositoryError>;
    fn count_for(&self, user: UserId) -> Result<usize, RepositoryError>;
}

/// User directory abstraction.
pub trait UserDirectory: Send + Sync {
    fn create(&self, name: &str, role: &str) -> Result<UserRecord, RepositoryError>;
    fn get(&self, id: UserId) -> Result<Option<UserRecord>, RepositoryError>;
    fn list(&self) -> Result<Vec<UserRecord>, RepositoryError>;
    /// Fetch the user, provisioning a placeholder entry under the given id on
    /// first contact.
    fn ensure(&self, id: UserId) -> Result<UserRecord, RepositoryError>;
}

/// Error enumeration for storage failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// History row with the full request fields and domain inputs for charting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricHistoryEntry {
    pub id: MetricId,
    pub week_date: DateTime<Utc>,
    pub computed_score: f64,
    #[serde(rename = "T_minutes")]
    pub t_minutes: f64,
    #[serde(rename = "B_days")]
    pub b_days: f64,
    #[serde(rename = "W_weight")]
    pub w_weight: f64,
    pub k1_bonus: f64,
    pub ke_bonus: f64,
    #[serde(rename = "N_violations")]
    pub n_violations: u32,
    #[serde(rename = "D_severity")]
    pub d_severity: f64,
    pub domains: Vec<DomainScore>,
    pub breakdown: ScoreBreakdown,
}

/// Overview row as shown on the database page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricOverviewEntry {
    pub id: MetricId,
    pub user_name: String,
    pub week_date: DateTime<Utc>,
    pub computed_score: f64,
    #[serde(rename = "T_minutes")]
    pub t_minutes: f64,
    #[serde(rename = "N_violations")]
    pub n_violations: u32,
}

/// Leaderboard row: a user's latest committed score and entry count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub user_id: UserId,
    pub name: String,
    pub role: String,
    pub latest_score: Option<f64>,
    pub total_entries: usize,
}

/// Response payload for a successful commit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommittedMetric {
    pub metric_id: MetricId,
    pub user_id: UserId,
    pub week_date: DateTime<Utc>,
    pub computed_score: f64,
    pub breakdown: ScoreBreakdown,
}
