use super::common::*;

use crate::scoring::domain::BonusTerm;
use crate::scoring::engine::{compute, ScoreError, ValidationError, KAPPA};

#[test]
fn dashboard_defaults_produce_expected_breakdown() {
    let request = sample_request();
    let breakdown = compute(&request).expect("valid request");

    assert_eq!(breakdown.g, 72.0);
    assert_eq!(breakdown.m, 1.0 + 0.05 + 0.10);
    assert_eq!(breakdown.pi2, 9.0);

    let sigma2 = (1.0 * 2.0 * KAPPA) * (1.0 * 2.0 * KAPPA);
    assert!((breakdown.sigma2 - sigma2).abs() < 1e-12);

    let numerator = 72.0 * 240.0 * breakdown.m * 9.0;
    assert!((breakdown.numerator - numerator).abs() < 1e-6);
    assert!((breakdown.denominator - (1.0 + sigma2) * 1000.0).abs() < 1e-9);
    assert!((breakdown.final_score - numerator / ((1.0 + sigma2) * 1000.0)).abs() < 1e-9);
    // ~134.82 with the dashboard defaults
    assert!((breakdown.final_score - 134.82).abs() < 0.01);
}

#[test]
fn violation_free_requests_have_exact_thousand_denominator() {
    let mut request = sample_request();
    request.n_violations = 0;
    request.d_severity = 4.5;

    let breakdown = compute(&request).expect("valid request");
    assert_eq!(breakdown.sigma2, 0.0);
    assert_eq!(breakdown.denominator, 1000.0);
}

#[test]
fn severity_is_ignored_without_violations() {
    let mut request = sample_request();
    request.n_violations = 0;
    request.d_severity = 6.0;

    let breakdown = compute(&request).expect("severity has no effect at zero violations");
    assert_eq!(breakdown.sigma2, 0.0);
}

#[test]
fn severity_range_is_enforced_with_violations() {
    let mut request = sample_request();
    request.n_violations = 1;
    request.d_severity = 6.0;

    let error = compute(&request).expect_err("severity out of range");
    assert_eq!(
        error,
        ScoreError::Validation(ValidationError::SeverityOutOfRange { value: 6.0 })
    );
}

#[test]
fn negative_severity_is_rejected_even_without_violations() {
    let mut request = sample_request();
    request.n_violations = 0;
    request.d_severity = -1.0;

    let error = compute(&request).expect_err("negative severity");
    assert!(matches!(
        error,
        ScoreError::Validation(ValidationError::NegativeInput {
            field: "D_severity",
            ..
        })
    ));
}

#[test]
fn out_of_range_domain_score_names_the_domain() {
    let mut request = sample_request();
    request.domains[2].score = 11.0;

    let error = compute(&request).expect_err("score above 10");
    match error {
        ScoreError::Validation(ValidationError::DomainScoreOutOfRange { name, value }) => {
            assert_eq!(name, "Initiative");
            assert_eq!(value, 11.0);
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn empty_domain_list_is_rejected() {
    let mut request = sample_request();
    request.domains.clear();

    let error = compute(&request).expect_err("no domains");
    assert_eq!(error, ScoreError::Validation(ValidationError::NoDomains));
    assert_eq!(error.to_string(), "domains: at least one required");
}

#[test]
fn unnamed_domain_is_rejected() {
    let mut request = sample_request();
    request.domains[0].name = "   ".to_string();

    let error = compute(&request).expect_err("blank domain name");
    assert_eq!(
        error,
        ScoreError::Validation(ValidationError::UnnamedDomain { index: 0 })
    );
}

#[test]
fn non_finite_bonus_is_rejected() {
    let mut request = sample_request();
    request.k1_bonus = f64::NAN;

    let error = compute(&request).expect_err("NaN bonus");
    assert!(matches!(
        error,
        ScoreError::Validation(ValidationError::NonFiniteBonus { ref field, .. })
            if field == "k1_bonus"
    ));
}

#[test]
fn oversized_bonuses_are_not_clamped() {
    let mut request = sample_request();
    request.k1_bonus = 40.0;

    let breakdown = compute(&request).expect("large but finite bonus accepted");
    assert_eq!(breakdown.m, 1.0 + 40.0 + 0.10);
}

#[test]
fn negative_time_is_rejected() {
    let mut request = sample_request();
    request.t_minutes = -1.0;

    let error = compute(&request).expect_err("negative minutes");
    assert!(matches!(
        error,
        ScoreError::Validation(ValidationError::NegativeInput {
            field: "T_minutes",
            ..
        })
    ));
}

#[test]
fn extra_bonus_terms_stack_additively() {
    let base = compute(&sample_request()).expect("base request");

    let mut request = sample_request();
    request.extra_bonuses.push(BonusTerm {
        name: "mentorship".to_string(),
        value: 0.2,
    });
    let boosted = compute(&request).expect("stacked request");

    assert_eq!(boosted.m, base.m + 0.2);
    assert!(boosted.final_score > base.final_score);
}

#[test]
fn non_finite_extra_bonus_is_rejected_by_name() {
    let mut request = sample_request();
    request.extra_bonuses.push(BonusTerm {
        name: "mentorship".to_string(),
        value: f64::INFINITY,
    });

    let error = compute(&request).expect_err("infinite stacked bonus");
    assert!(matches!(
        error,
        ScoreError::Validation(ValidationError::NonFiniteBonus { ref field, .. })
            if field == "mentorship"
    ));
}

#[test]
fn computation_is_bitwise_idempotent() {
    let request = sample_request();
    let first = compute(&request).expect("first run");
    let second = compute(&request).expect("second run");

    assert_eq!(first.g.to_bits(), second.g.to_bits());
    assert_eq!(first.m.to_bits(), second.m.to_bits());
    assert_eq!(first.pi2.to_bits(), second.pi2.to_bits());
    assert_eq!(first.sigma2.to_bits(), second.sigma2.to_bits());
    assert_eq!(first.numerator.to_bits(), second.numerator.to_bits());
    assert_eq!(first.denominator.to_bits(), second.denominator.to_bits());
    assert_eq!(first.final_score.to_bits(), second.final_score.to_bits());
}

#[test]
fn score_is_monotone_in_time_invested() {
    let mut request = sample_request();
    let lower = compute(&request).expect("base");
    request.t_minutes = 300.0;
    let higher = compute(&request).expect("more minutes");

    assert!(higher.final_score > lower.final_score);
}

#[test]
fn score_shrinks_as_violations_accumulate() {
    let mut request = sample_request();
    request.n_violations = 1;
    let one = compute(&request).expect("one violation");
    request.n_violations = 3;
    let three = compute(&request).expect("three violations");

    assert!(three.final_score < one.final_score);
}

#[test]
fn denominator_never_drops_below_thousand() {
    for violations in [0u32, 1, 2, 10, 100] {
        let mut request = sample_request();
        request.n_violations = violations;
        request.d_severity = 5.0;
        let breakdown = compute(&request).expect("valid request");
        assert!(breakdown.denominator >= 1000.0);
        assert!(breakdown.final_score.is_finite());
    }
}

#[test]
fn request_round_trips_with_dashboard_wire_names() {
    let request = sample_request();
    let value = serde_json::to_value(&request).expect("serializes");

    assert!(value.get("T_minutes").is_some());
    assert!(value.get("B_days").is_some());
    assert!(value.get("W_weight").is_some());
    assert!(value.get("N_violations").is_some());
    assert!(value.get("D_severity").is_some());
    assert!(value.get("k1_bonus").is_some());
    // Optional stacking list stays off the wire when unused.
    assert!(value.get("extra_bonuses").is_none());

    let parsed: crate::scoring::ScoreRequest =
        serde_json::from_value(value).expect("deserializes");
    assert_eq!(parsed, request);
}

#[test]
fn breakdown_serializes_with_formula_symbols() {
    let breakdown = compute(&sample_request()).expect("valid request");
    let value = serde_json::to_value(breakdown).expect("serializes");

    for key in ["G", "M", "Pi2", "sigma2", "numerator", "denominator", "final_score"] {
        assert!(value.get(key).is_some(), "missing key {key}");
    }
}
