use crate::session::Capture;
use level_traits::{Axis, LevelError, Result};
use nalgebra::{DMatrix, DVector};
use std::f64::consts::PI;
use std::fmt;

// Singular values below this fraction of the largest are treated as zero.
const RCOND: f64 = 1e-12;

/// `angle = slope * t + intercept`, in degrees and seconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearFit {
    pub slope: f64,
    pub intercept: f64,
}

impl LinearFit {
    pub fn at(&self, t: f64) -> f64 {
        self.slope * t + self.intercept
    }
}

/// Degree-1 least-squares fit of `y` against `t`.
///
/// Solved through the SVD of the `[t - mean(t), 1]` design matrix, so large
/// timestamps with a small spread keep their slope. Fewer than two distinct
/// times is not rejected; the minimum-norm solution comes back.
pub fn polyfit1(t: &[f64], y: &[f64]) -> Result<LinearFit> {
    if t.len() != y.len() {
        return Err(LevelError::Fit(format!(
            "got {} times but {} angles",
            t.len(),
            y.len()
        )));
    }
    if t.is_empty() {
        return Err(LevelError::Fit("no samples to fit".to_string()));
    }
    // The SVD iterates until convergence, which NaN never reaches.
    if t.iter().chain(y).any(|v| !v.is_finite()) {
        return Err(LevelError::Fit("samples contain non-finite values".to_string()));
    }

    let t_mean = t.iter().sum::<f64>() / t.len() as f64;
    let design = DMatrix::from_fn(t.len(), 2, |row, col| {
        if col == 0 {
            t[row] - t_mean
        } else {
            1.0
        }
    });
    let observed = DVector::from_column_slice(y);

    let svd = design.svd(true, true);
    let cutoff = svd.singular_values.max() * RCOND;
    let coefficients = svd
        .solve(&observed, cutoff)
        .map_err(|e| LevelError::Fit(e.to_string()))?;

    let slope = coefficients[0];
    Ok(LinearFit {
        slope,
        intercept: coefficients[1] - slope * t_mean,
    })
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DriftReport {
    pub axis: Axis,
    pub fit: LinearFit,
    pub rate_rad_per_s: f64,
}

impl DriftReport {
    pub fn from_fit(axis: Axis, fit: LinearFit) -> Self {
        DriftReport {
            axis,
            fit,
            rate_rad_per_s: fit.slope * PI / 180.0,
        }
    }
}

impl fmt::Display for DriftReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "dΘ/dt = {:.3e} rad/s", self.rate_rad_per_s)
    }
}

/// Fits the chosen axis against time and reports the drift rate.
pub fn analyze(capture: &Capture, axis: Axis) -> Result<DriftReport> {
    let fit = polyfit1(&capture.time, capture.angles(axis))?;
    Ok(DriftReport::from_fit(axis, fit))
}

#[cfg(test)]
mod tests {
    use super::*;
    use level_traits::Sample;

    fn assert_close(a: f64, b: f64) {
        assert!((a - b).abs() < 1e-9, "{} vs {}", a, b);
    }

    #[test]
    fn test_fit_exact_line() {
        let t = [0.0, 1.0, 2.0, 3.0];
        let y = [0.5, 2.5, 4.5, 6.5];
        let fit = polyfit1(&t, &y).unwrap();
        assert_close(fit.slope, 2.0);
        assert_close(fit.intercept, 0.5);
        assert_close(fit.at(10.0), 20.5);
    }

    #[test]
    fn test_fit_noisy_line() {
        // Alternating residuals of +-0.1 barely move the fit.
        let t: Vec<f64> = (0..20).map(f64::from).collect();
        let y: Vec<f64> = t
            .iter()
            .enumerate()
            .map(|(i, &t)| -0.25 * t + 3.0 + if i % 2 == 0 { 0.1 } else { -0.1 })
            .collect();
        let fit = polyfit1(&t, &y).unwrap();
        assert!((fit.slope + 0.25).abs() < 0.01);
        assert!((fit.intercept - 3.0).abs() < 0.1);
    }

    #[test]
    fn test_fit_two_points() {
        let fit = polyfit1(&[1.0, 3.0], &[2.0, 1.0]).unwrap();
        assert_close(fit.slope, -0.5);
        assert_close(fit.intercept, 2.5);
    }

    #[test]
    fn test_fit_single_time_is_degenerate_not_fatal() {
        let fit = polyfit1(&[5.0, 5.0, 5.0], &[1.0, 2.0, 3.0]).unwrap();
        assert!(fit.slope.is_finite() && fit.intercept.is_finite());
        // Passes through the mean at the only observed time.
        assert_close(fit.at(5.0), 2.0);
    }

    #[test]
    fn test_fit_with_large_time_offset() {
        for offset in [1e3, 3e5, 1e6, 1e9] {
            let t = [offset, offset + 1.0, offset + 2.0];
            let fit = polyfit1(&t, &[0.0, 1.0, 2.0]).unwrap();
            assert!((fit.slope - 1.0).abs() < 1e-9, "slope {} at {}", fit.slope, offset);
            assert!((fit.at(offset + 1.0) - 1.0).abs() < 1e-6);
        }
    }

    #[test]
    fn test_fit_rejects_bad_input() {
        assert!(matches!(polyfit1(&[], &[]), Err(LevelError::Fit(_))));
        assert!(matches!(polyfit1(&[0.0, 1.0], &[0.0]), Err(LevelError::Fit(_))));
        assert!(matches!(
            polyfit1(&[0.0, 1.0], &[0.0, f64::NAN]),
            Err(LevelError::Fit(_))
        ));
    }

    #[test]
    fn test_drift_rate_in_radians() {
        let capture: Capture = [
            Sample::new(0.0, 0.0, 0.0),
            Sample::new(1.0, 1.0, 0.0),
            Sample::new(2.0, 2.0, 0.0),
        ]
        .into_iter()
        .collect();

        let report = analyze(&capture, Axis::X).unwrap();
        assert_close(report.fit.slope, 1.0);
        assert_close(report.fit.intercept, 0.0);
        assert_close(report.rate_rad_per_s, PI / 180.0);
        assert!((report.rate_rad_per_s - 0.01745).abs() < 1e-5);
        assert_eq!(report.to_string(), "dΘ/dt = 1.745e-2 rad/s");

        let flat = analyze(&capture, Axis::Y).unwrap();
        assert_close(flat.fit.slope, 0.0);
        assert_eq!(flat.axis, Axis::Y);
    }
}
