use serde::Serialize;

/// Age the simulation runs until when the horizon is derived from the profile's age.
pub const HORIZON_AGE: u32 = 100;

/// Scale between the "ten-thousand" display unit and base currency units.
pub const TEN_THOUSAND: f64 = 10_000.0;

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum GrowthStrategy {
    /// Raises and cost-of-living adjustments applied once per completed year.
    YearBoundary,
    /// Return, raises and inflation all compounded monthly.
    MonthlyCompound,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum HorizonSource {
    /// Use `FinancialProfile::years` as given.
    ProfileYears,
    /// Simulate until `HORIZON_AGE`.
    UntilAge,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FinancialProfile {
    pub current_assets: f64,
    pub monthly_income: f64,
    pub side_income: f64,
    pub monthly_expenses: f64,
    /// Annual percent.
    pub income_growth_rate: f64,
    /// Annual percent.
    pub inflation_rate: f64,
    /// Kept for consumers outside the scenario engine.
    pub monthly_return_rate: f64,
    pub years: i32,
    pub current_age: u32,
    /// Ten-thousand units. Zero or NaN disables the cap.
    pub max_annual_income: f64,
}

impl FinancialProfile {
    pub fn total_monthly_income(&self) -> f64 {
        self.monthly_income + self.side_income
    }

    pub fn net_monthly(&self) -> f64 {
        self.total_monthly_income() - self.monthly_expenses
    }

    pub fn horizon_years(&self, source: HorizonSource) -> i32 {
        match source {
            HorizonSource::ProfileYears => self.years,
            HorizonSource::UntilAge => HORIZON_AGE as i32 - self.current_age as i32,
        }
    }

    pub fn income_cap(&self) -> Option<f64> {
        if self.max_annual_income == 0.0 || self.max_annual_income.is_nan() {
            None
        } else {
            Some(self.max_annual_income)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlySnapshot {
    pub month: u32,
    pub assets: f64,
    pub monthly_income: f64,
    pub monthly_expenses: f64,
    pub child_cost: f64,
}

/// Extra household expense for one child, banded by the child's age.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct ChildRearingCost {
    pub child_birth_year: i32,
    /// Calendar year of simulation year 0.
    pub anchor_year: i32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProjectionPolicy {
    pub strategy: GrowthStrategy,
    pub annual_return_percent: f64,
    pub retirement_offset_years: Option<u32>,
    pub horizon: HorizonSource,
    pub child_rearing: Option<ChildRearingCost>,
}

/// A month count that may never be reached.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Months {
    Finite(i64),
    Never,
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum TargetEstimate {
    Reached(u32),
    /// The iteration cap ran out before the target was reached.
    CapReached,
    /// Savings are zero or negative, so the target is never approached.
    NoSavings,
}

impl TargetEstimate {
    /// Literal reading: an exhausted cap reports the cap itself.
    pub fn reported(self, cap: u32) -> Months {
        match self {
            TargetEstimate::Reached(m) => Months::Finite(i64::from(m)),
            TargetEstimate::CapReached => Months::Finite(i64::from(cap)),
            TargetEstimate::NoSavings => Months::Never,
        }
    }

    /// Reading that treats an exhausted cap the same as never saving.
    pub fn normalized(self) -> Months {
        match self {
            TargetEstimate::Reached(m) => Months::Finite(i64::from(m)),
            TargetEstimate::CapReached | TargetEstimate::NoSavings => Months::Never,
        }
    }
}
