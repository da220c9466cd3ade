use super::rates::{annual_to_effective_monthly, annual_to_simple_monthly};
use super::types::{FinancialProfile, Months, TargetEstimate};

/// Iteration cap for `months_to_target`: one hundred years.
pub const TARGET_MONTH_CAP: u32 = 1200;

/// Months of current assets used as the safety score's target.
pub const SAFETY_TARGET_MULTIPLIER: f64 = 300.0;

/// Survival horizon that earns a full survival score: ten years.
const FULL_SURVIVAL_MONTHS: f64 = 120.0;

/// Months until assets hit zero at today's burn rate, ignoring growth,
/// inflation and returns.
pub fn months_until_depletion(profile: &FinancialProfile) -> Months {
    let net_monthly = profile.net_monthly();
    if net_monthly >= 0.0 {
        return Months::Never;
    }
    Months::Finite((profile.current_assets / -net_monthly).floor() as i64)
}

/// Income growth compounds monthly while inflation erodes savings by a
/// simple monthly fraction.
pub fn months_to_target(profile: &FinancialProfile, target_amount: f64) -> TargetEstimate {
    let monthly_savings = profile.net_monthly();
    if monthly_savings <= 0.0 {
        return TargetEstimate::NoSavings;
    }

    let income_growth = annual_to_effective_monthly(profile.income_growth_rate);
    let inflation = annual_to_simple_monthly(profile.inflation_rate);
    let savings_factor = 1.0 + income_growth - inflation;

    let mut assets = profile.current_assets;
    let mut savings = monthly_savings;
    let mut months = 0;
    while assets < target_amount && months < TARGET_MONTH_CAP {
        assets += savings;
        savings *= savings_factor;
        months += 1;
    }

    if months < TARGET_MONTH_CAP || assets >= target_amount {
        TargetEstimate::Reached(months)
    } else {
        TargetEstimate::CapReached
    }
}

pub fn safety_score(profile: &FinancialProfile) -> u8 {
    let survival = match months_until_depletion(profile) {
        Months::Never => return 100,
        Months::Finite(months) if months <= 0 => return 0,
        Months::Finite(months) => months as f64,
    };

    let target = months_to_target(profile, profile.current_assets * SAFETY_TARGET_MULTIPLIER)
        .reported(TARGET_MONTH_CAP);
    let survival_score = (survival / FULL_SURVIVAL_MONTHS * 100.0).min(100.0);
    let target_score = match target {
        Months::Finite(0) => 100.0,
        Months::Finite(months) => (f64::from(TARGET_MONTH_CAP) / months as f64 * 100.0).min(100.0),
        Months::Never => 0.0,
    };

    ((survival_score + target_score) / 2.0).round().clamp(0.0, 100.0) as u8
}
