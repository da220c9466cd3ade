/// Monthly rate that compounds to `annual_percent` over twelve months.
pub fn annual_to_effective_monthly(annual_percent: f64) -> f64 {
    (1.0 + annual_percent / 100.0).powf(1.0 / 12.0) - 1.0
}

pub fn annual_to_simple_monthly(annual_percent: f64) -> f64 {
    annual_percent / 100.0 / 12.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::{prop_assert, proptest};

    const EPS: f64 = 1e-12;

    #[test]
    fn zero_rate_is_zero() {
        assert_eq!(annual_to_effective_monthly(0.0), 0.0);
        assert_eq!(annual_to_simple_monthly(0.0), 0.0);
    }

    #[test]
    fn effective_rate_is_below_simple_rate_for_positive_growth() {
        let effective = annual_to_effective_monthly(12.0);
        let simple = annual_to_simple_monthly(12.0);
        assert!(effective < simple, "{effective} should be < {simple}");
        assert!((simple - 0.01).abs() <= EPS);
    }

    #[test]
    fn total_loss_maps_to_minus_one() {
        assert!((annual_to_effective_monthly(-100.0) + 1.0).abs() <= EPS);
    }

    proptest! {
        #[test]
        fn prop_effective_rate_compounds_back_to_annual(bp in -9_000i32..20_000) {
            let annual_percent = bp as f64 / 100.0;
            let monthly = annual_to_effective_monthly(annual_percent);
            let compounded = (1.0 + monthly).powi(12) - 1.0;
            prop_assert!((compounded - annual_percent / 100.0).abs() <= 1e-9);
        }
    }
}
