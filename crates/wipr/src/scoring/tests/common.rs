use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, TimeZone, Utc};

use crate::scoring::domain::{DomainScore, MetricId, ScoreRequest, UserId};
use crate::scoring::repository::{
    MetricRepository, NewMetric, RepositoryError, UserDirectory, UserRecord, WeeklyMetricRecord,
};
use crate::scoring::service::ScoreService;

pub(super) fn default_domains() -> Vec<DomainScore> {
    vec![
        domain("Output Quality", 2.0, 8.0),
        domain("Deadline Adherence", 2.0, 8.0),
        domain("Initiative", 1.0, 8.0),
        domain("Collaboration", 1.0, 8.0),
        domain("Technical Execution", 3.0, 8.0),
    ]
}

pub(super) fn domain(name: &str, weight: f64, score: f64) -> DomainScore {
    DomainScore {
        name: name.to_string(),
        weight,
        score,
    }
}

/// The dashboard's default input vector.
pub(super) fn sample_request() -> ScoreRequest {
    ScoreRequest {
        t_minutes: 240.0,
        b_days: 3.0,
        w_weight: 1.0,
        k1_bonus: 0.05,
        ke_bonus: 0.10,
        n_violations: 1,
        d_severity: 2.0,
        domains: default_domains(),
        extra_bonuses: Vec::new(),
    }
}

pub(super) fn week(offset: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 1, 5, 0, 0, 0).single().expect("valid base week")
        + Duration::weeks(offset)
}

#[derive(Default)]
pub(super) struct MemoryMetrics {
    records: Mutex<Vec<WeeklyMetricRecord>>,
    sequence: AtomicU64,
}

impl MetricRepository for MemoryMetrics {
    fn insert(&self, metric: NewMetric) -> Result<WeeklyMetricRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("metrics mutex poisoned");
        let record = WeeklyMetricRecord {
            id: MetricId(self.sequence.fetch_add(1, Ordering::Relaxed) + 1),
            user_id: metric.user_id,
            week_date: metric.week_date,
            request: metric.request,
            breakdown: metric.breakdown,
        };
        guard.push(record.clone());
        Ok(record)
    }

    fn history_for(&self, user: UserId) -> Result<Vec<WeeklyMetricRecord>, RepositoryError> {
        let guard = self.records.lock().expect("metrics mutex poisoned");
        let mut records: Vec<_> = guard
            .iter()
            .filter(|record| record.user_id == user)
            .cloned()
            .collect();
        records.sort_by_key(|record| record.week_date);
        Ok(records)
    }

    fn latest_for(&self, user: UserId) -> Result<Option<WeeklyMetricRecord>, RepositoryError> {
        Ok(self.history_for(user)?.pop())
    }

    fn all(&self) -> Result<Vec<WeeklyMetricRecord>, RepositoryError> {
        let guard = self.records.lock().expect("metrics mutex poisoned");
        let mut records = guard.clone();
        records.sort_by_key(|record| std::cmp::Reverse(record.week_date));
        Ok(records)
    }

    fn count_for(&self, user: UserId) -> Result<usize, RepositoryError> {
        Ok(self.history_for(user)?.len())
    }
}

#[derive(Default)]
pub(super) struct MemoryUsers {
    users: Mutex<BTreeMap<u64, UserRecord>>,
    sequence: AtomicU64,
}

impl MemoryUsers {
    pub(super) fn count(&self) -> usize {
        self.users.lock().expect("users mutex poisoned").len()
    }
}

impl UserDirectory for MemoryUsers {
    fn create(&self, name: &str, role: &str) -> Result<UserRecord, RepositoryError> {
        let mut guard = self.users.lock().expect("users mutex poisoned");
        let mut id = self.sequence.fetch_add(1, Ordering::Relaxed) + 1;
        while guard.contains_key(&id) {
            id = self.sequence.fetch_add(1, Ordering::Relaxed) + 1;
        }
        let record = UserRecord {
            id: UserId(id),
            name: name.to_string(),
            role: role.to_string(),
        };
        guard.insert(id, record.clone());
        Ok(record)
    }

    fn get(&self, id: UserId) -> Result<Option<UserRecord>, RepositoryError> {
        let guard = self.users.lock().expect("users mutex poisoned");
        Ok(guard.get(&id.0).cloned())
    }

    fn list(&self) -> Result<Vec<UserRecord>, RepositoryError> {
        let guard = self.users.lock().expect("users mutex poisoned");
        Ok(guard.values().cloned().collect())
    }

    fn ensure(&self, id: UserId) -> Result<UserRecord, RepositoryError> {
        let mut guard = self.users.lock().expect("users mutex poisoned");
        let record = guard.entry(id.0).or_insert_with(|| UserRecord {
            id,
            name: format!("User {}", id.0),
            role: "Staff".to_string(),
        });
        Ok(record.clone())
    }
}

/// Metric store double that fails every call.
pub(super) struct UnavailableMetrics;

impl MetricRepository for UnavailableMetrics {
    fn insert(&self, _metric: NewMetric) -> Result<WeeklyMetricRecord, RepositoryError> {
        Err(RepositoryError::Unavailable("metrics store offline".to_string()))
    }

    fn history_for(&self, _user: UserId) -> Result<Vec<WeeklyMetricRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("metrics store offline".to_string()))
    }

    fn latest_for(&self, _user: UserId) -> Result<Option<WeeklyMetricRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("metrics store offline".to_string()))
    }

    fn all(&self) -> Result<Vec<WeeklyMetricRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("metrics store offline".to_string()))
    }

    fn count_for(&self, _user: UserId) -> Result<usize, RepositoryError> {
        Err(RepositoryError::Unavailable("metrics store offline".to_string()))
    }
}

/// Directory double whose `create` always reports a duplicate.
#[derive(Default)]
pub(super) struct ConflictUsers {
    inner: MemoryUsers,
}

impl UserDirectory for ConflictUsers {
    fn create(&self, _name: &str, _role: &str) -> Result<UserRecord, RepositoryError> {
        Err(RepositoryError::Conflict)
    }

    fn get(&self, id: UserId) -> Result<Option<UserRecord>, RepositoryError> {
        self.inner.get(id)
    }

    fn list(&self) -> Result<Vec<UserRecord>, RepositoryError> {
        self.inner.list()
    }

    fn ensure(&self, id: UserId) -> Result<UserRecord, RepositoryError> {
        self.inner.ensure(id)
    }
}

pub(super) fn memory_service() -> (
    ScoreService<MemoryMetrics, MemoryUsers>,
    Arc<MemoryMetrics>,
    Arc<MemoryUsers>,
) {
    let metrics = Arc::new(MemoryMetrics::default());
    let users = Arc::new(MemoryUsers::default());
    let service = ScoreService::new(metrics.clone(), users.clone());
    (service, metrics, users)
}
