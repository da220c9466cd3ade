mod engine;
mod estimate;
mod rates;
mod types;

pub use engine::{
    CompoundInputs, ScenarioInputs, child_cost_for_year, first_depletion_month, project,
    project_scenarios, simulate_monthly_compound,
};
pub use estimate::{
    SAFETY_TARGET_MULTIPLIER, TARGET_MONTH_CAP, months_to_target, months_until_depletion,
    safety_score,
};
pub use rates::{annual_to_effective_monthly, annual_to_simple_monthly};
pub use types::{
    ChildRearingCost, FinancialProfile, GrowthStrategy, HORIZON_AGE, HorizonSource, Months,
    MonthlySnapshot, ProjectionPolicy, TEN_THOUSAND, TargetEstimate,
};
