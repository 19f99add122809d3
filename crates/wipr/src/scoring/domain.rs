use serde::{Deserialize, Serialize};

/// Identifier for a registered user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UserId(pub u64);

/// Identifier for a committed weekly metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MetricId(pub u64);

/// One rated competency area. The weight scales how much the rating
/// contributes to the aggregate `G` term.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DomainScore {
    pub name: String,
    pub weight: f64,
    pub score: f64,
}

/// A named additive bonus stacked on top of the fixed `k1`/`ke` factors.
/// Every term feeds the bonus quotient `M = 1 + Σ terms`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BonusTerm {
    pub name: String,
    pub value: f64,
}

/// Full input vector for one evaluation period. Wire names follow the
/// dashboard's JSON contract (`T_minutes`, `N_violations`, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreRequest {
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
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extra_bonuses: Vec<BonusTerm>,
}

/// The computed result, fully determined by a [`ScoreRequest`]. Intermediates
/// are returned unrounded so callers own the presentation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    /// Aggregate domain score: weighted sum of domain ratings.
    #[serde(rename = "G")]
    pub g: f64,
    /// Bonus quotient: 1 plus all additive bonus terms.
    #[serde(rename = "M")]
    pub m: f64,
    /// Priority intensity index: squared product of focus-days and skill weight.
    #[serde(rename = "Pi2")]
    pub pi2: f64,
    /// Penalty index: squared product of violations, severity, and kappa.
    pub sigma2: f64,
    pub numerator: f64,
    pub denominator: f64,
    pub final_score: f64,
}
