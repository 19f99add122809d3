use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use metrics_exporter_prometheus::PrometheusHandle;
use wipr::scoring::{
    DomainScore, MetricId, MetricRepository, NewMetric, RepositoryError, UserDirectory, UserId,
    UserRecord, WeeklyMetricRecord,
};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Process-local metric store. Swap for a database-backed implementation by
/// providing another `MetricRepository`.
#[derive(Default)]
pub(crate) struct InMemoryMetricStore {
    records: Mutex<Vec<WeeklyMetricRecord>>,
    sequence: AtomicU64,
}

impl MetricRepository for InMemoryMetricStore {
    fn insert(&self, metric: NewMetric) -> Result<WeeklyMetricRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("metric store mutex poisoned");
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
        let guard = self.records.lock().expect("metric store mutex poisoned");
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
        let guard = self.records.lock().expect("metric store mutex poisoned");
        let mut records = guard.clone();
        records.sort_by_key(|record| std::cmp::Reverse(record.week_date));
        Ok(records)
    }

    fn count_for(&self, user: UserId) -> Result<usize, RepositoryError> {
        let guard = self.records.lock().expect("metric store mutex poisoned");
        Ok(guard.iter().filter(|record| record.user_id == user).count())
    }
}

/// Process-local user directory.
#[derive(Default)]
pub(crate) struct InMemoryUserDirectory {
    users: Mutex<BTreeMap<u64, UserRecord>>,
    sequence: AtomicU64,
}

impl UserDirectory for InMemoryUserDirectory {
    fn create(&self, name: &str, role: &str) -> Result<UserRecord, RepositoryError> {
        let mut guard = self.users.lock().expect("directory mutex poisoned");
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
        let guard = self.users.lock().expect("directory mutex poisoned");
        Ok(guard.get(&id.0).cloned())
    }

    fn list(&self) -> Result<Vec<UserRecord>, RepositoryError> {
        let guard = self.users.lock().expect("directory mutex poisoned");
        Ok(guard.values().cloned().collect())
    }

    fn ensure(&self, id: UserId) -> Result<UserRecord, RepositoryError> {
        let mut guard = self.users.lock().expect("directory mutex poisoned");
        let record = guard.entry(id.0).or_insert_with(|| UserRecord {
            id,
            name: format!("User {}", id.0),
            role: "Staff".to_string(),
        });
        Ok(record.clone())
    }
}

/// The dashboard's default competency areas, used by the CLI when the caller
/// passes no `--domain` flags.
pub(crate) fn default_domains() -> Vec<DomainScore> {
    [
        ("Output Quality", 2.0),
        ("Deadline Adherence", 2.0),
        ("Initiative", 1.0),
        ("Collaboration", 1.0),
        ("Technical Execution", 3.0),
    ]
    .into_iter()
    .map(|(name, weight)| DomainScore {
        name: name.to_string(),
        weight,
        score: 8.0,
    })
    .collect()
}

/// Parse a `name=weight:score` CLI argument into a domain entry.
pub(crate) fn parse_domain(raw: &str) -> Result<DomainScore, String> {
    let (name, rest) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected name=weight:score, got '{raw}'"))?;
    let (weight, score) = rest
        .split_once(':')
        .ok_or_else(|| format!("expected name=weight:score, got '{raw}'"))?;

    let weight: f64 = weight
        .trim()
        .parse()
        .map_err(|err| format!("invalid weight in '{raw}' ({err})"))?;
    let score: f64 = score
        .trim()
        .parse()
        .map_err(|err| format!("invalid score in '{raw}' ({err})"))?;

    Ok(DomainScore {
        name: name.trim().to_string(),
        weight,
        score,
    })
}
