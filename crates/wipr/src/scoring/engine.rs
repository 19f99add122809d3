//! The deterministic score computation. Pure: no I/O, no clock, no state.

use super::domain::{ScoreBreakdown, ScoreRequest};

/// Fixed penalty coefficient applied to each violation.
pub const KAPPA: f64 = 0.28572;

/// Validation failures, raised fail-fast on the first offending field.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("domains: at least one required")]
    NoDomains,
    #[error("domains[{index}]: name must be non-empty")]
    UnnamedDomain { index: usize },
    #[error("domain '{name}': score must be within 0..=10, got {value}")]
    DomainScoreOutOfRange { name: String, value: f64 },
    #[error("domain '{name}': weight must be a finite value >= 0, got {value}")]
    DomainWeightOutOfRange { name: String, value: f64 },
    #[error("{field}: must be a finite value >= 0, got {value}")]
    NegativeInput { field: &'static str, value: f64 },
    #[error("D_severity: must be within 1..=5 when violations are recorded, got {value}")]
    SeverityOutOfRange { value: f64 },
    #[error("{field}: bonus terms must be finite, got {value}")]
    NonFiniteBonus { field: String, value: f64 },
}

/// Failure modes of [`compute`].
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ScoreError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// Unreachable for validated input: `sigma2 >= 0` keeps the denominator
    /// at or above 1000. Guarded anyway rather than dividing through.
    #[error("degenerate denominator {denominator} (numerator {numerator})")]
    DegenerateDenominator { numerator: f64, denominator: f64 },
}

/// Validate a request and produce the full breakdown.
///
/// Summation over domains and bonus terms is strictly left-to-right so
/// identical input yields bit-identical output across runs and platforms.
pub fn compute(request: &ScoreRequest) -> Result<ScoreBreakdown, ScoreError> {
    validate(request)?;

    let g = request
        .domains
        .iter()
        .fold(0.0, |sum, domain| sum + domain.score * domain.weight);
    let m = request
        .extra_bonuses
        .iter()
        .fold(1.0 + request.k1_bonus + request.ke_bonus, |sum, bonus| {
            sum + bonus.value
        });
    let pi2 = (request.b_days * request.w_weight).powi(2);
    let sigma2 = (f64::from(request.n_violations) * request.d_severity * KAPPA).powi(2);

    let numerator = g * request.t_minutes * m * pi2;
    let denominator = (1.0 + sigma2) * 1000.0;

    if denominator == 0.0 {
        return Err(ScoreError::DegenerateDenominator {
            numerator,
            denominator,
        });
    }

    Ok(ScoreBreakdown {
        g,
        m,
        pi2,
        sigma2,
        numerator,
        denominator,
        final_score: numerator / denominator,
    })
}

fn validate(request: &ScoreRequest) -> Result<(), ValidationError> {
    if request.domains.is_empty() {
        return Err(ValidationError::NoDomains);
    }

    for (index, domain) in request.domains.iter().enumerate() {
        if domain.name.trim().is_empty() {
            return Err(ValidationError::UnnamedDomain { index });
        }
        if !domain.weight.is_finite() || domain.weight < 0.0 {
            return Err(ValidationError::DomainWeightOutOfRange {
                name: domain.name.clone(),
                value: domain.weight,
            });
        }
        if !domain.score.is_finite() || !(0.0..=10.0).contains(&domain.score) {
            return Err(ValidationError::DomainScoreOutOfRange {
                name: domain.name.clone(),
                value: domain.score,
            });
        }
    }

    non_negative("T_minutes", request.t_minutes)?;
    non_negative("B_days", request.b_days)?;
    non_negative("W_weight", request.w_weight)?;

    if request.n_violations > 0 {
        if !request.d_severity.is_finite() || !(1.0..=5.0).contains(&request.d_severity) {
            return Err(ValidationError::SeverityOutOfRange {
                value: request.d_severity,
            });
        }
    } else {
        // With zero violations the severity contributes nothing, so any
        // finite non-negative value is accepted.
        non_negative("D_severity", request.d_severity)?;
    }

    finite_bonus("k1_bonus", request.k1_bonus)?;
    finite_bonus("ke_bonus", request.ke_bonus)?;
    for bonus in &request.extra_bonuses {
        finite_bonus(&bonus.name, bonus.value)?;
    }

    Ok(())
}

fn non_negative(field: &'static str, value: f64) -> Result<(), ValidationError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ValidationError::NegativeInput { field, value })
    }
}

fn finite_bonus(field: &str, value: f64) -> Result<(), ValidationError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ValidationError::NonFiniteBonus {
            field: field.to_string(),
            value,
        })
    }
}
