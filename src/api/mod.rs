use axum::{
    Router,
    extract::{Json, Query},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use chrono::Datelike;
use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::net::SocketAddr;
use thiserror::Error;
use tokio::net::TcpListener;

use crate::core::{
    ChildRearingCost, FinancialProfile, GrowthStrategy, HORIZON_AGE, HorizonSource, Months,
    MonthlySnapshot, ProjectionPolicy, SAFETY_TARGET_MULTIPLIER, TARGET_MONTH_CAP, TEN_THOUSAND,
    first_depletion_month, months_to_target, months_until_depletion, project, safety_score,
};

const MAX_CURRENT_AGE: u32 = 99;
const MAX_HORIZON_YEARS: i32 = 150;

#[derive(Debug, Error, PartialEq)]
pub enum InputError {
    #[error("{field} must be a finite number")]
    NotFinite { field: &'static str },
    #[error("currentAge must be between 0 and 99, got {0}")]
    AgeOutOfRange(u32),
    #[error("years must be between 0 and 150, got {0}")]
    HorizonOutOfRange(i32),
}

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Input(#[from] InputError),
    #[error(transparent)]
    Args(#[from] clap::Error),
    #[error("failed to encode report: {0}")]
    Encode(#[from] serde_json::Error),
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum CliGrowthMode {
    YearBoundary,
    MonthlyCompound,
}

impl From<CliGrowthMode> for GrowthStrategy {
    fn from(value: CliGrowthMode) -> Self {
        match value {
            CliGrowthMode::YearBoundary => GrowthStrategy::YearBoundary,
            CliGrowthMode::MonthlyCompound => GrowthStrategy::MonthlyCompound,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum CliHorizon {
    UntilAge,
    Years,
}

impl From<CliHorizon> for HorizonSource {
    fn from(value: CliHorizon) -> Self {
        match value {
            CliHorizon::UntilAge => HorizonSource::UntilAge,
            CliHorizon::Years => HorizonSource::ProfileYears,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
enum ApiGrowthMode {
    #[serde(alias = "yearBoundary", alias = "year_boundary", alias = "annual")]
    YearBoundary,
    #[serde(alias = "monthlyCompound", alias = "monthly_compound", alias = "monthly")]
    MonthlyCompound,
}

impl From<ApiGrowthMode> for CliGrowthMode {
    fn from(value: ApiGrowthMode) -> Self {
        match value {
            ApiGrowthMode::YearBoundary => CliGrowthMode::YearBoundary,
            ApiGrowthMode::MonthlyCompound => CliGrowthMode::MonthlyCompound,
        }
    }
}

impl From<GrowthStrategy> for ApiGrowthMode {
    fn from(value: GrowthStrategy) -> Self {
        match value {
            GrowthStrategy::YearBoundary => ApiGrowthMode::YearBoundary,
            GrowthStrategy::MonthlyCompound => ApiGrowthMode::MonthlyCompound,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case")]
enum ApiHorizon {
    #[serde(alias = "untilAge", alias = "until_age", alias = "age")]
    UntilAge,
    Years,
}

impl From<ApiHorizon> for CliHorizon {
    fn from(value: ApiHorizon) -> Self {
        match value {
            ApiHorizon::UntilAge => CliHorizon::UntilAge,
            ApiHorizon::Years => CliHorizon::Years,
        }
    }
}

/// Form state as the page sends it. Currency amounts are in ten-thousands.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct ProjectPayload {
    current_assets: Option<f64>,
    monthly_income: Option<f64>,
    side_income: Option<f64>,
    monthly_expenses: Option<f64>,
    income_growth_rate: Option<f64>,
    inflation_rate: Option<f64>,
    annual_return_rate: Option<f64>,
    monthly_return_rate: Option<f64>,
    current_age: Option<u32>,
    years: Option<i32>,
    retirement_age: Option<u32>,
    selected_month_index: Option<u32>,
    max_annual_income: Option<f64>,
    growth_mode: Option<ApiGrowthMode>,
    horizon: Option<ApiHorizon>,
    child_birth_year: Option<i32>,
}

#[derive(Parser, Debug)]
#[command(
    name = "fire-planner",
    about = "Month-by-month FIRE projection with depletion, target-time and safety metrics"
)]
struct Cli {
    #[arg(
        long,
        default_value_t = 0.0,
        allow_negative_numbers = true,
        help = "Current liquid assets in ten-thousands"
    )]
    current_assets: f64,
    #[arg(long, default_value_t = 0.0, help = "Monthly income in ten-thousands")]
    monthly_income: f64,
    #[arg(long, default_value_t = 0.0, help = "Monthly side income in ten-thousands")]
    side_income: f64,
    #[arg(long, default_value_t = 0.0, help = "Monthly expenses in ten-thousands")]
    monthly_expenses: f64,
    #[arg(
        long,
        default_value_t = 2.0,
        allow_negative_numbers = true,
        help = "Annual income growth in percent"
    )]
    income_growth_rate: f64,
    #[arg(
        long,
        default_value_t = 2.0,
        allow_negative_numbers = true,
        help = "Annual inflation in percent"
    )]
    inflation_rate: f64,
    #[arg(
        long,
        default_value_t = 4.0,
        allow_negative_numbers = true,
        help = "Annual investment return in percent"
    )]
    annual_return_rate: f64,
    #[arg(long, default_value_t = 0.5, allow_negative_numbers = true)]
    monthly_return_rate: f64,
    #[arg(long, default_value_t = 30)]
    current_age: u32,
    #[arg(
        long,
        allow_negative_numbers = true,
        help = "Horizon in years; selects the years horizon unless --horizon says otherwise"
    )]
    years: Option<i32>,
    #[arg(long, help = "Age at which income stops")]
    retirement_age: Option<u32>,
    #[arg(long, help = "Chart month index whose year becomes the retirement offset")]
    selected_month_index: Option<u32>,
    #[arg(
        long,
        default_value_t = 10_000.0,
        help = "Annual income cap in ten-thousands; 0 disables the cap"
    )]
    max_annual_income: f64,
    #[arg(long, value_enum, default_value_t = CliGrowthMode::YearBoundary)]
    growth_mode: CliGrowthMode,
    #[arg(
        long,
        value_enum,
        help = "Defaults to years when --years is given, otherwise until-age"
    )]
    horizon: Option<CliHorizon>,
    #[arg(long, help = "Calendar year a child is (or was) born")]
    child_birth_year: Option<i32>,
}

#[derive(Debug)]
struct ApiRequest {
    profile: FinancialProfile,
    policy: ProjectionPolicy,
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
struct ChartPoint {
    month: u32,
    age: u32,
    assets: f64,
    annual_income: f64,
    annual_expenses: f64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ProjectResponse {
    growth_mode: ApiGrowthMode,
    current_age: u32,
    retirement_offset_years: Option<u32>,
    retirement_age: Option<u32>,
    survival_months: Option<i64>,
    target_months: Option<i64>,
    target_months_normalized: Option<i64>,
    safety_score: u8,
    depletion_month: Option<u32>,
    depletion_age: Option<u32>,
    snapshots: Vec<MonthlySnapshot>,
    chart: Vec<ChartPoint>,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

pub fn to_base_units(display: f64) -> f64 {
    display * TEN_THOUSAND
}

pub fn to_display_units(base: f64) -> f64 {
    (base / TEN_THOUSAND).round()
}

/// An age before the current one leaves the plan without forced retirement.
pub fn retirement_offset_from_age(current_age: u32, retirement_age: u32) -> Option<u32> {
    retirement_age.checked_sub(current_age)
}

/// Whole years elapsed at a chart month index.
pub fn year_of_month(month_index: u32) -> u32 {
    month_index / 12
}

pub fn retirement_offset_from_index(month_index: u32) -> u32 {
    year_of_month(month_index)
}

fn current_year() -> i32 {
    chrono::Local::now().year()
}

fn ensure_finite(field: &'static str, value: f64) -> Result<f64, InputError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(InputError::NotFinite { field })
    }
}

// An explicit horizon wins; otherwise giving `years` means simulating that many.
fn resolve_horizon(horizon: Option<CliHorizon>, years: Option<i32>) -> CliHorizon {
    match (horizon, years) {
        (Some(horizon), _) => horizon,
        (None, Some(_)) => CliHorizon::Years,
        (None, None) => CliHorizon::UntilAge,
    }
}

fn build_inputs(cli: Cli, anchor_year: i32) -> Result<ApiRequest, InputError> {
    if cli.current_age > MAX_CURRENT_AGE {
        return Err(InputError::AgeOutOfRange(cli.current_age));
    }

    let horizon = resolve_horizon(cli.horizon, cli.years);
    let years_until_age = HORIZON_AGE as i32 - cli.current_age as i32;
    let years = match horizon {
        CliHorizon::UntilAge => years_until_age,
        CliHorizon::Years => {
            let years = cli.years.unwrap_or(years_until_age);
            if !(0..=MAX_HORIZON_YEARS).contains(&years) {
                return Err(InputError::HorizonOutOfRange(years));
            }
            years
        }
    };

    let profile = FinancialProfile {
        current_assets: to_base_units(ensure_finite("currentAssets", cli.current_assets)?),
        monthly_income: to_base_units(ensure_finite("monthlyIncome", cli.monthly_income)?),
        side_income: to_base_units(ensure_finite("sideIncome", cli.side_income)?),
        monthly_expenses: to_base_units(ensure_finite("monthlyExpenses", cli.monthly_expenses)?),
        income_growth_rate: ensure_finite("incomeGrowthRate", cli.income_growth_rate)?,
        inflation_rate: ensure_finite("inflationRate", cli.inflation_rate)?,
        monthly_return_rate: ensure_finite("monthlyReturnRate", cli.monthly_return_rate)?,
        years,
        current_age: cli.current_age,
        max_annual_income: ensure_finite("maxAnnualIncome", cli.max_annual_income)?,
    };

    let retirement_offset_years = match (cli.retirement_age, cli.selected_month_index) {
        (Some(age), _) => retirement_offset_from_age(cli.current_age, age),
        (None, Some(index)) => Some(retirement_offset_from_index(index)),
        (None, None) => None,
    };

    let policy = ProjectionPolicy {
        strategy: cli.growth_mode.into(),
        annual_return_percent: ensure_finite("annualReturnRate", cli.annual_return_rate)?,
        retirement_offset_years,
        horizon: horizon.into(),
        child_rearing: cli.child_birth_year.map(|child_birth_year| ChildRearingCost {
            child_birth_year,
            anchor_year,
        }),
    };

    Ok(ApiRequest { profile, policy })
}

fn months_json(months: Months) -> Option<i64> {
    match months {
        Months::Finite(m) => Some(m),
        Months::Never => None,
    }
}

fn run_projection(request: &ApiRequest) -> ProjectResponse {
    let profile = &request.profile;
    let policy = &request.policy;

    log::debug!(
        "recompute: retirement offset {:?}, max annual income {} (ten-thousands)",
        policy.retirement_offset_years,
        profile.max_annual_income
    );

    let snapshots = project(profile, policy);
    log::debug!(
        "recompute: first expenses {:?}",
        snapshots
            .iter()
            .take(5)
            .map(|s| s.monthly_expenses)
            .collect::<Vec<_>>()
    );

    let target = months_to_target(profile, profile.current_assets * SAFETY_TARGET_MULTIPLIER);
    let depletion_month = first_depletion_month(&snapshots);
    let chart = snapshots
        .iter()
        .map(|s| ChartPoint {
            month: s.month,
            age: profile.current_age + year_of_month(s.month),
            assets: to_display_units(s.assets),
            annual_income: to_display_units(s.monthly_income * 12.0),
            annual_expenses: to_display_units(s.monthly_expenses * 12.0),
        })
        .collect();

    ProjectResponse {
        growth_mode: policy.strategy.into(),
        current_age: profile.current_age,
        retirement_offset_years: policy.retirement_offset_years,
        retirement_age: policy
            .retirement_offset_years
            .map(|offset| profile.current_age + offset),
        survival_months: months_json(months_until_depletion(profile)),
        target_months: months_json(target.reported(TARGET_MONTH_CAP)),
        target_months_normalized: months_json(target.normalized()),
        safety_score: safety_score(profile),
        depletion_month,
        depletion_age: depletion_month.map(|m| profile.current_age + year_of_month(m)),
        snapshots,
        chart,
    }
}

/// Parses projection flags and renders the report as pretty JSON.
pub fn run_cli<I, T>(args: I) -> Result<String, CliError>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let cli = Cli::try_parse_from(args)?;
    let request = build_inputs(cli, current_year())?;
    let response = run_projection(&request);
    Ok(serde_json::to_string_pretty(&response)?)
}

pub async fn run_http_server(port: u16) -> std::io::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let app = Router::new()
        .route("/health", get(health_handler))
        .route(
            "/api/project",
            get(project_get_handler).post(project_post_handler),
        )
        .fallback(not_found_handler);

    let listener = TcpListener::bind(addr).await?;
    log::info!("FIRE planner API listening on http://{addr}");
    log::info!("Local access: http://127.0.0.1:{port}/api/project");

    axum::serve(listener, app).await
}

async fn health_handler() -> Response {
    json_response(StatusCode::OK, serde_json::json!({ "status": "ok" }))
}

async fn not_found_handler() -> Response {
    error_response(StatusCode::NOT_FOUND, "Not found")
}

async fn project_get_handler(Query(payload): Query<ProjectPayload>) -> Response {
    project_handler_impl(payload).await
}

async fn project_post_handler(Json(payload): Json<ProjectPayload>) -> Response {
    project_handler_impl(payload).await
}

async fn project_handler_impl(payload: ProjectPayload) -> Response {
    let request = match api_request_from_payload(payload, current_year()) {
        Ok(request) => request,
        Err(err) => {
            log::warn!("rejected projection request: {err}");
            return error_response(StatusCode::BAD_REQUEST, &err.to_string());
        }
    };

    json_response(StatusCode::OK, run_projection(&request))
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    let mut response = (status, Json(body)).into_response();
    response.headers_mut().insert(
        header::CACHE_CONTROL,
        header::HeaderValue::from_static("no-store"),
    );
    response
}

fn error_response(status: StatusCode, msg: &str) -> Response {
    json_response(
        status,
        ErrorResponse {
            error: msg.to_string(),
        },
    )
}

fn api_request_from_payload(
    payload: ProjectPayload,
    anchor_year: i32,
) -> Result<ApiRequest, InputError> {
    let mut cli = Cli::default_for_api();

    if let Some(v) = payload.current_assets {
        cli.current_assets = v;
    }
    if let Some(v) = payload.monthly_income {
        cli.monthly_income = v;
    }
    if let Some(v) = payload.side_income {
        cli.side_income = v;
    }
    if let Some(v) = payload.monthly_expenses {
        cli.monthly_expenses = v;
    }
    if let Some(v) = payload.income_growth_rate {
        cli.income_growth_rate = v;
    }
    if let Some(v) = payload.inflation_rate {
        cli.inflation_rate = v;
    }
    if let Some(v) = payload.annual_return_rate {
        cli.annual_return_rate = v;
    }
    if let Some(v) = payload.monthly_return_rate {
        cli.monthly_return_rate = v;
    }
    if let Some(v) = payload.current_age {
        cli.current_age = v;
    }
    if let Some(v) = payload.years {
        cli.years = Some(v);
    }
    if let Some(v) = payload.retirement_age {
        cli.retirement_age = Some(v);
    }
    if let Some(v) = payload.selected_month_index {
        cli.selected_month_index = Some(v);
    }
    if let Some(v) = payload.max_annual_income {
        cli.max_annual_income = v;
    }
    if let Some(v) = payload.growth_mode {
        cli.growth_mode = v.into();
    }
    if let Some(v) = payload.horizon {
        cli.horizon = Some(v.into());
    }
    if let Some(v) = payload.child_birth_year {
        cli.child_birth_year = Some(v);
    }

    build_inputs(cli, anchor_year)
}

impl Cli {
    fn default_for_api() -> Self {
        Cli {
            current_assets: 0.0,
            monthly_income: 0.0,
            side_income: 0.0,
            monthly_expenses: 0.0,
            income_growth_rate: 2.0,
            inflation_rate: 2.0,
            annual_return_rate: 4.0,
            monthly_return_rate: 0.5,
            current_age: 30,
            years: None,
            retirement_age: None,
            selected_month_index: None,
            max_annual_income: 10_000.0,
            growth_mode: CliGrowthMode::YearBoundary,
            horizon: None,
            child_birth_year: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;

    const EPS: f64 = 1e-6;
    const ANCHOR_YEAR: i32 = 2026;

    fn assert_approx(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() <= EPS,
            "expected {expected}, got {actual}"
        );
    }

    fn request_from_json(json: &str) -> Result<ApiRequest, InputError> {
        let payload = serde_json::from_str::<ProjectPayload>(json).expect("json should parse");
        api_request_from_payload(payload, ANCHOR_YEAR)
    }

    #[test]
    fn display_units_round_trip_through_ten_thousands() {
        assert_approx(to_base_units(300.0), 3_000_000.0);
        assert_approx(to_display_units(3_004_999.0), 300.0);
        assert_approx(to_display_units(3_005_000.0), 301.0);
    }

    #[test]
    fn retirement_age_before_current_age_is_ignored() {
        assert_eq!(retirement_offset_from_age(40, 35), None);
        assert_eq!(retirement_offset_from_age(40, 40), Some(0));
        assert_eq!(retirement_offset_from_age(40, 55), Some(15));
    }

    #[test]
    fn chart_index_maps_to_its_year() {
        assert_eq!(year_of_month(0), 0);
        assert_eq!(year_of_month(23), 1);
        assert_eq!(year_of_month(24), 2);
        assert_eq!(retirement_offset_from_index(0), 0);
        assert_eq!(retirement_offset_from_index(11), 0);
        assert_eq!(retirement_offset_from_index(12), 1);
        assert_eq!(retirement_offset_from_index(275), 22);
    }

    #[test]
    fn defaults_match_the_form() {
        let request = build_inputs(Cli::default_for_api(), ANCHOR_YEAR).expect("valid defaults");
        assert_eq!(request.profile.current_age, 30);
        assert_eq!(request.profile.years, 70);
        assert_approx(request.profile.income_growth_rate, 2.0);
        assert_approx(request.profile.inflation_rate, 2.0);
        assert_approx(request.profile.max_annual_income, 10_000.0);
        assert_approx(request.policy.annual_return_percent, 4.0);
        assert_eq!(request.policy.strategy, GrowthStrategy::YearBoundary);
        assert_eq!(request.policy.horizon, HorizonSource::UntilAge);
        assert_eq!(request.policy.retirement_offset_years, None);
        assert_eq!(request.policy.child_rearing, None);
    }

    #[test]
    fn payload_parses_web_keys_and_scales_currency() {
        let request = request_from_json(
            r#"{
              "currentAssets": 5000,
              "monthlyIncome": 400,
              "sideIncome": 50,
              "monthlyExpenses": 250,
              "incomeGrowthRate": 3,
              "inflationRate": 2.5,
              "annualReturnRate": 6,
              "currentAge": 35,
              "retirementAge": 50,
              "maxAnnualIncome": 12000,
              "growthMode": "monthly-compound",
              "childBirthYear": 2028
            }"#,
        )
        .expect("valid payload");

        let profile = &request.profile;
        assert_approx(profile.current_assets, 50_000_000.0);
        assert_approx(profile.monthly_income, 4_000_000.0);
        assert_approx(profile.side_income, 500_000.0);
        assert_approx(profile.monthly_expenses, 2_500_000.0);
        assert_approx(profile.max_annual_income, 12_000.0);
        assert_eq!(profile.years, 65);
        assert_eq!(request.policy.retirement_offset_years, Some(15));
        assert_eq!(request.policy.strategy, GrowthStrategy::MonthlyCompound);
        assert_eq!(
            request.policy.child_rearing,
            Some(ChildRearingCost {
                child_birth_year: 2028,
                anchor_year: ANCHOR_YEAR,
            })
        );
    }

    #[test]
    fn retirement_age_wins_over_selected_index() {
        let request = request_from_json(
            r#"{ "currentAge": 30, "retirementAge": 45, "selectedMonthIndex": 120 }"#,
        )
        .expect("valid payload");
        assert_eq!(request.policy.retirement_offset_years, Some(15));

        let request =
            request_from_json(r#"{ "selectedMonthIndex": 120 }"#).expect("valid payload");
        assert_eq!(request.policy.retirement_offset_years, Some(10));
    }

    #[test]
    fn growth_mode_accepts_aliases() {
        let request = request_from_json(r#"{ "growthMode": "annual", "horizon": "years", "years": 5 }"#)
            .expect("valid payload");
        assert_eq!(request.policy.strategy, GrowthStrategy::YearBoundary);
        assert_eq!(request.policy.horizon, HorizonSource::ProfileYears);
        assert_eq!(request.profile.years, 5);
    }

    #[test]
    fn rejects_age_above_limit() {
        let err = request_from_json(r#"{ "currentAge": 100 }"#).expect_err("must reject age");
        assert_eq!(err, InputError::AgeOutOfRange(100));
    }

    #[test]
    fn rejects_out_of_range_horizon() {
        let err = request_from_json(r#"{ "years": -1 }"#).expect_err("must reject horizon");
        assert_eq!(err, InputError::HorizonOutOfRange(-1));
    }

    #[test]
    fn years_alone_selects_the_years_horizon() {
        let request = request_from_json(r#"{ "years": 5 }"#).expect("valid payload");
        assert_eq!(request.policy.horizon, HorizonSource::ProfileYears);
        assert_eq!(request.profile.years, 5);
        assert_eq!(run_projection(&request).snapshots.len(), 60);
    }

    #[test]
    fn until_age_horizon_ignores_years() {
        let request =
            request_from_json(r#"{ "horizon": "until-age", "years": -1, "currentAge": 40 }"#)
                .expect("years is unused under until-age");
        assert_eq!(request.policy.horizon, HorizonSource::UntilAge);
        assert_eq!(request.profile.years, 60);
    }

    #[test]
    fn years_horizon_without_years_runs_until_age() {
        let request =
            request_from_json(r#"{ "horizon": "years", "currentAge": 90 }"#).expect("valid payload");
        assert_eq!(request.policy.horizon, HorizonSource::ProfileYears);
        assert_eq!(request.profile.years, 10);
    }

    #[test]
    fn rejects_non_finite_amounts() {
        let mut cli = Cli::default_for_api();
        cli.monthly_expenses = f64::NAN;
        let err = build_inputs(cli, ANCHOR_YEAR).expect_err("must reject NaN");
        assert_eq!(
            err,
            InputError::NotFinite {
                field: "monthlyExpenses"
            }
        );
        assert!(err.to_string().contains("monthlyExpenses"));
    }

    #[test]
    fn cli_flags_parse_into_request() {
        let cli = Cli::parse_from([
            "fire-planner",
            "--current-assets",
            "-100",
            "--monthly-income",
            "300",
            "--monthly-expenses",
            "200",
            "--growth-mode",
            "monthly-compound",
            "--horizon",
            "years",
            "--years",
            "1",
        ]);
        let request = build_inputs(cli, ANCHOR_YEAR).expect("valid flags");
        assert_approx(request.profile.current_assets, -1_000_000.0);
        assert_eq!(request.policy.strategy, GrowthStrategy::MonthlyCompound);
        assert_eq!(request.policy.horizon, HorizonSource::ProfileYears);
        assert_eq!(request.profile.years, 1);
    }

    #[test]
    fn run_cli_renders_json_report() {
        let report = run_cli([
            "fire-planner",
            "--monthly-income",
            "300",
            "--monthly-expenses",
            "200",
            "--horizon",
            "years",
            "--years",
            "1",
            "--income-growth-rate",
            "0",
            "--inflation-rate",
            "0",
            "--annual-return-rate",
            "0",
        ])
        .expect("report should render");
        let value: serde_json::Value = serde_json::from_str(&report).expect("valid json");
        assert_eq!(value["snapshots"].as_array().map(Vec::len), Some(12));
        assert_eq!(value["safetyScore"], 100);
        assert!(value["survivalMonths"].is_null());
    }

    #[test]
    fn run_cli_returns_flag_errors() {
        let result = run_cli(["fire-planner", "--current-age", "abc"]);
        assert!(matches!(result, Err(CliError::Args(_))));

        match run_cli(["fire-planner", "--help"]) {
            Err(CliError::Args(err)) => assert_eq!(err.kind(), ErrorKind::DisplayHelp),
            other => panic!("expected help output, got {other:?}"),
        }
    }

    #[test]
    fn run_cli_rejects_invalid_inputs() {
        let result = run_cli(["fire-planner", "--current-age", "120"]);
        assert!(matches!(
            result,
            Err(CliError::Input(InputError::AgeOutOfRange(120)))
        ));
    }

    #[test]
    fn chart_rounds_to_whole_ten_thousands() {
        let request = request_from_json(
            r#"{
              "currentAssets": 1000.4,
              "monthlyExpenses": 0.1,
              "inflationRate": 0,
              "annualReturnRate": 0,
              "years": 1
            }"#,
        )
        .expect("valid payload");
        let response = run_projection(&request);

        assert_approx(response.snapshots[0].assets, 10_003_000.0);
        assert_approx(response.chart[0].assets, 1_000.0);
        assert_approx(response.chart[0].annual_expenses, 1.0);
        assert_approx(response.chart[0].annual_income, 0.0);
    }

    #[test]
    fn compound_chart_age_follows_month() {
        let request = request_from_json(
            r#"{ "growthMode": "monthly-compound", "currentAge": 40, "years": 2 }"#,
        )
        .expect("valid payload");
        let response = run_projection(&request);

        assert_eq!(response.chart.len(), 25);
        assert_eq!(response.chart[11].age, 40);
        assert_eq!(response.chart[12].age, 41);
        assert_eq!(response.chart[24].age, 42);
    }

    #[test]
    fn flat_year_projection_accumulates_savings() {
        let request = request_from_json(
            r#"{
              "monthlyIncome": 300,
              "monthlyExpenses": 200,
              "incomeGrowthRate": 0,
              "inflationRate": 0,
              "annualReturnRate": 0,
              "horizon": "years",
              "years": 1
            }"#,
        )
        .expect("valid payload");
        let response = run_projection(&request);

        assert_eq!(response.snapshots.len(), 12);
        assert_approx(response.snapshots[11].assets, 12_000_000.0);
        assert_approx(response.chart[11].assets, 1_200.0);
        assert_approx(response.chart[11].annual_income, 3_600.0);
        assert_approx(response.chart[11].annual_expenses, 2_400.0);
        assert_eq!(response.depletion_month, None);
        assert_eq!(response.survival_months, None);
        assert_eq!(response.safety_score, 100);
    }

    #[test]
    fn burning_projection_reports_depletion() {
        let request = request_from_json(
            r#"{
              "currentAssets": 1000,
              "monthlyExpenses": 100,
              "inflationRate": 0,
              "annualReturnRate": 0,
              "currentAge": 40
            }"#,
        )
        .expect("valid payload");
        let response = run_projection(&request);

        assert_eq!(response.survival_months, Some(10));
        assert_eq!(response.depletion_month, Some(10));
        assert_eq!(response.depletion_age, Some(40));
        assert_eq!(response.target_months, None);
        assert_eq!(response.target_months_normalized, None);
        assert_eq!(response.chart[0].age, 40);
        assert_eq!(response.chart[12].age, 41);
        assert!(response.safety_score <= 100);
    }

    #[test]
    fn response_serialization_contains_expected_fields() {
        let request = request_from_json(r#"{ "monthlyIncome": 300, "monthlyExpenses": 200 }"#)
            .expect("valid payload");
        let response = run_projection(&request);
        let json = serde_json::to_string(&response).expect("response should serialize");
        for field in [
            "\"growthMode\":\"year-boundary\"",
            "\"snapshots\"",
            "\"chart\"",
            "\"monthlyIncome\"",
            "\"monthlyExpenses\"",
            "\"childCost\"",
            "\"annualIncome\"",
            "\"survivalMonths\"",
            "\"targetMonths\"",
            "\"targetMonthsNormalized\"",
            "\"safetyScore\"",
            "\"depletionMonth\"",
        ] {
            assert!(json.contains(field), "missing {field}");
        }
    }
}
