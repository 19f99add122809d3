use std::sync::Arc;

use chrono::{DateTime, Utc};

use super::domain::{ScoreBreakdown, ScoreRequest, UserId};
use super::engine::{self, ScoreError};
use super::repository::{
    CommittedMetric, LeaderboardEntry, MetricHistoryEntry, MetricOverviewEntry, MetricRepository,
    NewMetric, RepositoryError, UserDirectory, UserRecord,
};

/// Facade composing the score engine with the metric store and user directory.
pub struct ScoreService<R, U> {
    metrics: Arc<R>,
    users: Arc<U>,
}

impl<R, U> ScoreService<R, U>
where
    R: MetricRepository + 'static,
    U: UserDirectory + 'static,
{
    pub fn new(metrics: Arc<R>, users: Arc<U>) -> Self {
        Self { metrics, users }
    }

    /// Stateless live preview; nothing is persisted.
    pub fn calculate(&self, request: &ScoreRequest) -> Result<ScoreBreakdown, ScoreServiceError> {
        Ok(engine::compute(request)?)
    }

    /// Compute and persist a weekly evaluation. The request is computed
    /// before the user is provisioned so invalid input never creates
    /// placeholder directory entries.
    pub fn commit(
        &self,
        user_id: UserId,
        request: ScoreRequest,
        week_date: DateTime<Utc>,
    ) -> Result<CommittedMetric, ScoreServiceError> {
        let breakdown = engine::compute(&request)?;
        let user = self.users.ensure(user_id)?;

        let record = self.metrics.insert(NewMetric {
            user_id: user.id,
            week_date,
            request,
            breakdown,
        })?;

        Ok(CommittedMetric {
            metric_id: record.id,
            user_id: record.user_id,
            week_date: record.week_date,
            computed_score: record.breakdown.final_score,
            breakdown: record.breakdown,
        })
    }

    /// Committed history for one user, ascending by week. Unknown users yield
    /// an empty history rather than an error.
    pub fn history(&self, user_id: UserId) -> Result<Vec<MetricHistoryEntry>, ScoreServiceError> {
        let records = self.metrics.history_for(user_id)?;
        Ok(records.iter().map(|record| record.history_entry()).collect())
    }

    /// Every committed entry across users, descending by week, with the user
    /// name resolved for display.
    pub fn all_metrics(&self) -> Result<Vec<MetricOverviewEntry>, ScoreServiceError> {
        let records = self.metrics.all()?;
        let mut rows = Vec::with_capacity(records.len());
        for record in &records {
            let name = self
                .users
                .get(record.user_id)?
                .map(|user| user.name)
                .unwrap_or_else(|| "Unknown".to_string());
            rows.push(record.overview_entry(&name));
        }
        Ok(rows)
    }

    /// Latest score per user, sorted descending; users with no commits rank
    /// last with `latest_score` absent.
    pub fn leaderboard(&self) -> Result<Vec<LeaderboardEntry>, ScoreServiceError> {
        let mut board = Vec::new();
        for user in self.users.list()? {
            let latest = self.metrics.latest_for(user.id)?;
            let total_entries = self.metrics.count_for(user.id)?;
            board.push(LeaderboardEntry {
                user_id: user.id,
                name: user.name,
                role: user.role,
                latest_score: latest.map(|record| record.breakdown.final_score),
                total_entries,
            });
        }
        board.sort_by(|a, b| {
            let a_score = a.latest_score.unwrap_or(f64::NEG_INFINITY);
            let b_score = b.latest_score.unwrap_or(f64::NEG_INFINITY);
            b_score.total_cmp(&a_score)
        });
        Ok(board)
    }

    pub fn create_user(&self, name: &str, role: &str) -> Result<UserRecord, ScoreServiceError> {
        Ok(self.users.create(name, role)?)
    }

    pub fn list_users(&self) -> Result<Vec<UserRecord>, ScoreServiceError> {
        Ok(self.users.list()?)
    }
}

/// Error raised by the score service.
#[derive(Debug, thiserror::Error)]
pub enum ScoreServiceError {
    #[error(transparent)]
    Score(#[from] ScoreError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
