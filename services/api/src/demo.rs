use crate::infra::{default_domains, parse_domain, InMemoryMetricStore, InMemoryUserDirectory};
use chrono::{Duration, Utc};
use clap::Args;
use std::sync::Arc;
use wipr::error::AppError;
use wipr::scoring::{
    compute, DomainScore, ScoreBreakdown, ScoreRequest, ScoreService, UserDirectory,
};

#[derive(Args, Debug)]
pub(crate) struct ScoreArgs {
    /// Time invested in minutes (T)
    #[arg(long, default_value_t = 240.0)]
    pub(crate) minutes: f64,
    /// Days of focused effort (B)
    #[arg(long, default_value_t = 3.0)]
    pub(crate) days: f64,
    /// Weight of the focused skill or task (W)
    #[arg(long, default_value_t = 1.0)]
    pub(crate) weight: f64,
    /// Additive k1 bonus factor
    #[arg(long, default_value_t = 0.05)]
    pub(crate) k1: f64,
    /// Additive ke bonus factor
    #[arg(long, default_value_t = 0.10)]
    pub(crate) ke: f64,
    /// Count of infractions (N)
    #[arg(long, default_value_t = 1)]
    pub(crate) violations: u32,
    /// Severity index (D), 1-5 when violations are present
    #[arg(long, default_value_t = 2.0)]
    pub(crate) severity: f64,
    /// Domain entry as name=weight:score; repeat for each domain.
    /// Defaults to the dashboard's five competency areas.
    #[arg(long = "domain", value_parser = parse_domain)]
    pub(crate) domains: Vec<DomainScore>,
}

impl ScoreArgs {
    fn into_request(self) -> ScoreRequest {
        let domains = if self.domains.is_empty() {
            default_domains()
        } else {
            self.domains
        };

        ScoreRequest {
            t_minutes: self.minutes,
            b_days: self.days,
            w_weight: self.weight,
            k1_bonus: self.k1,
            ke_bonus: self.ke,
            n_violations: self.violations,
            d_severity: self.severity,
            domains,
            extra_bonuses: Vec::new(),
        }
    }
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Number of weekly commits to simulate per user
    #[arg(long, default_value_t = 4)]
    pub(crate) weeks: u32,
}

pub(crate) fn run_score(args: ScoreArgs) -> Result<(), AppError> {
    let request = args.into_request();
    let breakdown = compute(&request)?;
    render_breakdown(&request, &breakdown);
    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let store = Arc::new(InMemoryMetricStore::default());
    let directory = Arc::new(InMemoryUserDirectory::default());
    let ash = directory.create("Ash", "Lead Engineer")?;
    let rook = directory.create("Rook", "Staff")?;
    let service = ScoreService::new(store, directory);

    let weeks = args.weeks.max(1);
    let start = Utc::now() - Duration::weeks(i64::from(weeks));

    for offset in 0..weeks {
        let week_date = start + Duration::weeks(i64::from(offset));

        let mut strong = base_request();
        strong.t_minutes = 200.0 + 25.0 * f64::from(offset);
        service
            .commit(ash.id, strong, week_date)
            .map_err(demo_commit_error)?;

        let mut steady = base_request();
        steady.t_minutes = 150.0;
        steady.n_violations = if offset % 2 == 0 { 1 } else { 0 };
        service
            .commit(rook.id, steady, week_date)
            .map_err(demo_commit_error)?;
    }

    println!("== Weekly history: {} ==", ash.name);
    for entry in service.history(ash.id).map_err(demo_commit_error)? {
        println!(
            "  {}  T={:>5.0}m  score {:>8.2}",
            entry.week_date.format("%Y-%m-%d"),
            entry.t_minutes,
            entry.computed_score
        );
    }

    println!();
    println!("== Leaderboard ==");
    for (rank, row) in service
        .leaderboard()
        .map_err(demo_commit_error)?
        .into_iter()
        .enumerate()
    {
        let latest = row
            .latest_score
            .map(|score| format!("{score:.2}"))
            .unwrap_or_else(|| "-".to_string());
        println!(
            "  #{:<2} {:<10} {:<14} latest {:>8}  entries {}",
            rank + 1,
            row.name,
            row.role,
            latest,
            row.total_entries
        );
    }

    Ok(())
}

fn base_request() -> ScoreRequest {
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

fn render_breakdown(request: &ScoreRequest, breakdown: &ScoreBreakdown) {
    println!("== Inputs ==");
    for domain in &request.domains {
        println!(
            "  {:<22} weight {:>4.1}  score {:>4.1}",
            domain.name, domain.weight, domain.score
        );
    }
    println!(
        "  T={}m  B={}d  W={}  k1={}  ke={}  N={}  D={}",
        request.t_minutes,
        request.b_days,
        request.w_weight,
        request.k1_bonus,
        request.ke_bonus,
        request.n_violations,
        request.d_severity
    );

    println!();
    println!("== Breakdown ==");
    println!("  G   (aggregate domain score)  {:>12.4}", breakdown.g);
    println!("  M   (bonus quotient)          {:>12.4}", breakdown.m);
    println!("  Pi2 (priority intensity)      {:>12.4}", breakdown.pi2);
    println!("  s2  (penalty index)           {:>12.6}", breakdown.sigma2);
    println!("  numerator                     {:>12.2}", breakdown.numerator);
    println!("  denominator                   {:>12.2}", breakdown.denominator);
    println!();
    println!("  final score                   {:>12.2}", breakdown.final_score);
}

fn demo_commit_error(error: wipr::scoring::ScoreServiceError) -> AppError {
    match error {
        wipr::scoring::ScoreServiceError::Score(err) => AppError::Score(err),
        wipr::scoring::ScoreServiceError::Repository(err) => AppError::Directory(err),
    }
}
