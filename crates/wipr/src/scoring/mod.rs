//! WIPR score computation and its persistence/HTTP collaborators.
//!
//! [`engine::compute`] is the entire computational contract: a pure function
//! from a validated request to a deterministic breakdown. The rest of the
//! module provides the weekly-metric store and user directory behind traits,
//! a service facade, and the axum router callers mount.

pub mod domain;
pub mod engine;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{BonusTerm, DomainScore, MetricId, ScoreBreakdown, ScoreRequest, UserId};
pub use engine::{compute, ScoreError, ValidationError, KAPPA};
pub use repository::{
    CommittedMetric, LeaderboardEntry, MetricHistoryEntry, MetricOverviewEntry, MetricRepository,
    NewMetric, RepositoryError, UserDirectory, UserRecord, WeeklyMetricRecord,
};
pub use router::score_router;
pub use service::{ScoreService, ScoreServiceError};
