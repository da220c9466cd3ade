use super::rates::{annual_to_effective_monthly, annual_to_simple_monthly};
use super::types::{
    ChildRearingCost, FinancialProfile, GrowthStrategy, MonthlySnapshot, ProjectionPolicy,
    TEN_THOUSAND,
};

/// Parameters of a year-boundary projection run.
#[derive(Debug, Clone, PartialEq)]
pub struct ScenarioInputs {
    pub initial_assets: f64,
    pub monthly_income: f64,
    pub monthly_expenses: f64,
    /// Per-month fraction, already converted by the caller.
    pub monthly_return_rate: f64,
    pub inflation_rate_percent: f64,
    pub income_growth_rate_percent: f64,
    pub horizon_years: i32,
    pub retirement_offset_years: Option<u32>,
    /// Annual cap in ten-thousand units.
    pub max_annual_income: Option<f64>,
    pub child_rearing: Option<ChildRearingCost>,
}

/// Parameters of a monthly-compounding projection run. Rates are annual percents.
#[derive(Debug, Clone, PartialEq)]
pub struct CompoundInputs {
    pub initial_assets: f64,
    pub monthly_income: f64,
    pub monthly_expenses: f64,
    pub annual_return_percent: f64,
    pub inflation_rate_percent: f64,
    pub income_growth_rate_percent: f64,
    pub horizon_years: i32,
    pub retirement_offset_years: Option<u32>,
    /// Annual cap in ten-thousand units.
    pub max_annual_income: Option<f64>,
}

pub fn project(profile: &FinancialProfile, policy: &ProjectionPolicy) -> Vec<MonthlySnapshot> {
    let horizon_years = profile.horizon_years(policy.horizon);
    match policy.strategy {
        GrowthStrategy::YearBoundary => project_scenarios(&ScenarioInputs {
            initial_assets: profile.current_assets,
            monthly_income: profile.total_monthly_income(),
            monthly_expenses: profile.monthly_expenses,
            monthly_return_rate: annual_to_simple_monthly(policy.annual_return_percent),
            inflation_rate_percent: profile.inflation_rate,
            income_growth_rate_percent: profile.income_growth_rate,
            horizon_years,
            retirement_offset_years: policy.retirement_offset_years,
            max_annual_income: profile.income_cap(),
            child_rearing: policy.child_rearing,
        }),
        GrowthStrategy::MonthlyCompound => simulate_monthly_compound(&CompoundInputs {
            initial_assets: profile.current_assets,
            monthly_income: profile.total_monthly_income(),
            monthly_expenses: profile.monthly_expenses,
            annual_return_percent: policy.annual_return_percent,
            inflation_rate_percent: profile.inflation_rate,
            income_growth_rate_percent: profile.income_growth_rate,
            horizon_years,
            retirement_offset_years: policy.retirement_offset_years,
            max_annual_income: profile.income_cap(),
        }),
    }
}

/// Snapshot `i` is the state after `i + 1` completed months. Raises and
/// inflation land at each year's last month.
pub fn project_scenarios(inputs: &ScenarioInputs) -> Vec<MonthlySnapshot> {
    let total_months = months_in(inputs.horizon_years);
    let annual_cap = inputs.max_annual_income.map(|cap| cap * TEN_THOUSAND);
    let growth_factor = 1.0 + inputs.income_growth_rate_percent / 100.0;
    let inflation_factor = 1.0 + inputs.inflation_rate_percent / 100.0;

    let mut assets = inputs.initial_assets;
    let mut income = inputs.monthly_income;
    let mut expenses = inputs.monthly_expenses;
    let mut snapshots = Vec::with_capacity(total_months as usize);

    for i in 0..total_months {
        let year = i / 12;
        let effective_income = if is_retired(inputs.retirement_offset_years, year) {
            0.0
        } else {
            income
        };
        let child_cost = inputs.child_rearing.map_or(0.0, |child| {
            child_cost_for_year(&child, year, inputs.inflation_rate_percent)
        });

        assets = assets * (1.0 + inputs.monthly_return_rate)
            + (effective_income - expenses - child_cost);

        if i % 12 == 11 {
            income = grow_income_annually(income, growth_factor, annual_cap);
            expenses *= inflation_factor;
        }

        snapshots.push(MonthlySnapshot {
            month: i,
            assets,
            monthly_income: effective_income,
            monthly_expenses: expenses,
            child_cost,
        });
    }

    snapshots
}

/// Snapshot 0 is the initial state; snapshot `k` follows `k` completed months.
pub fn simulate_monthly_compound(inputs: &CompoundInputs) -> Vec<MonthlySnapshot> {
    let total_months = months_in(inputs.horizon_years);
    let return_rate = annual_to_effective_monthly(inputs.annual_return_percent);
    let growth_rate = annual_to_effective_monthly(inputs.income_growth_rate_percent);
    let inflation_rate = annual_to_effective_monthly(inputs.inflation_rate_percent);
    let monthly_cap = inputs.max_annual_income.map(|cap| cap * TEN_THOUSAND / 12.0);

    let mut assets = inputs.initial_assets;
    let mut income = inputs.monthly_income;
    let mut expenses = inputs.monthly_expenses;
    let mut snapshots = Vec::with_capacity(total_months as usize + 1);

    snapshots.push(MonthlySnapshot {
        month: 0,
        assets,
        monthly_income: if is_retired(inputs.retirement_offset_years, 0) {
            0.0
        } else {
            income
        },
        monthly_expenses: expenses,
        child_cost: 0.0,
    });

    for month in 0..total_months {
        let retired = is_retired(inputs.retirement_offset_years, month / 12);
        let investment_return = assets * return_rate;
        let net = if retired {
            -expenses
        } else {
            income - expenses
        };
        assets = assets + investment_return + net;

        if !retired {
            let grown = income * (1.0 + growth_rate);
            income = match monthly_cap {
                Some(cap) if grown > cap => cap,
                _ => grown,
            };
        }
        expenses *= 1.0 + inflation_rate;

        snapshots.push(MonthlySnapshot {
            month: month + 1,
            assets,
            monthly_income: if retired { 0.0 } else { income },
            monthly_expenses: expenses,
            child_cost: 0.0,
        });
    }

    snapshots
}

/// First month whose assets are below zero.
pub fn first_depletion_month(snapshots: &[MonthlySnapshot]) -> Option<u32> {
    snapshots
        .iter()
        .find(|snapshot| snapshot.assets < 0.0)
        .map(|snapshot| snapshot.month)
}

/// Inflation-adjusted monthly child cost during simulation year `year`.
pub fn child_cost_for_year(child: &ChildRearingCost, year: u32, inflation_percent: f64) -> f64 {
    let year_offset = i32::try_from(year).unwrap_or(i32::MAX);
    let child_age = child
        .anchor_year
        .saturating_add(year_offset)
        .saturating_sub(child.child_birth_year);
    let base = child_monthly_base_cost(child_age);
    if base == 0.0 {
        return 0.0;
    }
    base * (1.0 + inflation_percent / 100.0).powi(year_offset)
}

fn child_monthly_base_cost(child_age: i32) -> f64 {
    match child_age {
        i32::MIN..=-1 => 0.0,
        0..=3 => 750_000.0,
        4..=6 => 500_000.0,
        7..=12 => 750_000.0,
        13..=18 => 1_100_000.0,
        19..=22 => 1_250_000.0,
        _ => 0.0,
    }
}

// Compares the cap against the grown value before committing it.
fn grow_income_annually(income: f64, growth_factor: f64, annual_cap: Option<f64>) -> f64 {
    match annual_cap {
        Some(cap) if income * 12.0 * growth_factor > cap => cap / 12.0,
        _ => income * growth_factor,
    }
}

fn is_retired(retirement_offset_years: Option<u32>, year: u32) -> bool {
    retirement_offset_years.is_some_and(|offset| year >= offset)
}

fn months_in(horizon_years: i32) -> u32 {
    u32::try_from(horizon_years).unwrap_or(0).saturating_mul(12)
}
