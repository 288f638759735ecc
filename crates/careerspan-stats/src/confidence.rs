//! Pointwise confidence bounds for survival estimates.

use statrs::distribution::{ContinuousCDF, Normal};

use crate::{config::CiMethod, error::SurvivalError};

/// Returns the two-sided standard normal multiplier for a confidence level.
///
/// ```
/// use careerspan_stats::confidence::z_multiplier;
///
/// let z = z_multiplier(0.95).unwrap();
/// assert!((z - 1.959_964).abs() < 1e-6);
/// assert!(z_multiplier(1.0).is_err());
/// ```
pub fn z_multiplier(confidence_level: f64) -> Result<f64, SurvivalError> {
    if !(confidence_level > 0.0 && confidence_level < 1.0) {
        return Err(SurvivalError::InvalidConfidenceLevel {
            level: confidence_level,
        });
    }
    let alpha = 1.0 - confidence_level;
    Ok(Normal::standard().inverse_cdf(1.0 - alpha / 2.0))
}

/// Computes `(lower, upper)` bounds around a survival estimate.
///
/// `greenwood_sum` is the running sum `Σ d / (n (n - d))` up to the estimate's
/// timestamp, so the Greenwood variance is `survival² · greenwood_sum`.
#[must_use]
pub fn bounds(method: CiMethod, z: f64, survival: f64, greenwood_sum: f64) -> (f64, f64) {
    match method {
        CiMethod::Normal => {
            let half_width = z * survival * greenwood_sum.sqrt();
            (
                (survival - half_width).clamp(0.0, 1.0),
                (survival + half_width).clamp(0.0, 1.0),
            )
        }
        CiMethod::LogLog => {
            // Degenerate at the boundaries, where log(-log S) is not finite.
            if survival >= 1.0 || survival <= 0.0 || greenwood_sum <= 0.0 {
                return (survival, survival);
            }
            let log_s = survival.ln();
            let theta = (-log_s).ln();
            let se = greenwood_sum.sqrt() / log_s.abs();
            // Wide intervals underflow to exactly 0 or 1.
            let lower = (-(theta + z * se).exp()).exp().clamp(0.0, 1.0);
            let upper = (-(theta - z * se).exp()).exp().clamp(0.0, 1.0);
            (lower, upper)
        }
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    #[test]
    fn test_z_for_common_levels() {
        assert_abs_diff_eq!(z_multiplier(0.90).unwrap(), 1.644_854, epsilon = 1e-5);
        assert_abs_diff_eq!(z_multiplier(0.99).unwrap(), 2.575_829, epsilon = 1e-5);
    }

    #[test]
    fn test_z_rejects_out_of_range_levels() {
        for level in [0.0, 1.0, -1.0, 2.0, f64::NAN] {
            assert!(z_multiplier(level).is_err());
        }
    }

    #[test]
    fn test_normal_bounds_are_clipped() {
        let (lower, upper) = bounds(CiMethod::Normal, 1.96, 0.9, 0.5);
        assert!(lower >= 0.0);
        assert_eq!(upper, 1.0);
    }

    #[test]
    fn test_normal_bounds_are_symmetric_inside_unit_interval() {
        // S = 0.5, Var = 0.25 * 0.04 = 0.01, sd = 0.1
        let (lower, upper) = bounds(CiMethod::Normal, 2.0, 0.5, 0.04);
        assert_abs_diff_eq!(lower, 0.3, epsilon = 1e-12);
        assert_abs_diff_eq!(upper, 0.7, epsilon = 1e-12);
    }

    #[test]
    fn test_log_log_bounds_are_asymmetric_around_estimate() {
        // theta = ln(-ln 0.8), se = 0.1 / |ln 0.8|
        let (lower, upper) = bounds(CiMethod::LogLog, 1.96, 0.8, 0.01);
        assert_abs_diff_eq!(lower, 0.5846, epsilon = 1e-3);
        assert_abs_diff_eq!(upper, 0.9114, epsilon = 1e-3);
        assert!(upper - 0.8 < 0.8 - lower);
    }

    #[test]
    fn test_log_log_wide_interval_underflows_to_zero() {
        let (lower, upper) = bounds(CiMethod::LogLog, 1.96, 0.95, 0.5);
        assert_eq!(lower, 0.0);
        assert!((0.95..=1.0).contains(&upper));
    }

    #[test]
    fn test_log_log_degenerate_cases() {
        assert_eq!(bounds(CiMethod::LogLog, 1.96, 1.0, 0.0), (1.0, 1.0));
        assert_eq!(bounds(CiMethod::LogLog, 1.96, 0.0, 0.3), (0.0, 0.0));
    }
}
