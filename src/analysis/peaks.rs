use log::debug;
use serde::Serialize;

use super::spline::FittedCurve;
use crate::data::model::Spectrum;

// ---------------------------------------------------------------------------
// Peak – one detected maximum of a fitted curve
// ---------------------------------------------------------------------------

/// A detected peak of a fitted curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Peak {
    /// Wavenumber of the sample at the maximum.
    pub position: f64,
    /// Fitted intensity at the maximum.
    pub height: f64,
    /// Width at half maximum above the local baseline, as an x-span.
    pub width: f64,
}

/// Detection thresholds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PeakConfig {
    /// Minimum peak height as a multiple of the spectrum's mean intensity.
    pub height_factor: f64,
    /// Minimum width at half maximum, in (fractional) sample units.
    pub min_width_samples: f64,
}

impl Default for PeakConfig {
    fn default() -> Self {
        PeakConfig {
            height_factor: 3.0,
            min_width_samples: 2.0,
        }
    }
}

// ---------------------------------------------------------------------------
// Detection
// ---------------------------------------------------------------------------

/// Find the significant peaks of a fitted curve.
///
/// The curve is sampled at the spectrum's own x-positions. Interior samples
/// strictly above both neighbors qualify as maxima; they survive when the
/// fitted value reaches `height_factor` times the mean raw intensity and the
/// half-maximum width spans at least `min_width_samples` samples. Peaks come
/// back ordered by ascending position. Never fails; a quiet spectrum simply
/// yields an empty list.
pub fn detect(curve: &FittedCurve, spectrum: &Spectrum, config: &PeakConfig) -> Vec<Peak> {
    let xs = &spectrum.x;
    let dense: Vec<f64> = xs.iter().map(|&x| curve.evaluate(x)).collect();
    let threshold = config.height_factor * spectrum.mean_intensity();

    let mut peaks = Vec::new();
    for i in 1..dense.len().saturating_sub(1) {
        if !(dense[i] > dense[i - 1] && dense[i] > dense[i + 1]) {
            continue;
        }
        if dense[i] < threshold {
            continue;
        }

        let (left_base, right_base) = peak_bases(&dense, i);
        let prominence = dense[i] - dense[left_base].max(dense[right_base]);
        let (left_ip, right_ip) = half_height_crossings(&dense, i, left_base, right_base, prominence);

        if right_ip - left_ip < config.min_width_samples {
            continue;
        }

        peaks.push(Peak {
            position: xs[i],
            height: dense[i],
            width: x_at(xs, right_ip) - x_at(xs, left_ip),
        });
    }

    debug!(
        "'{}': {} peaks above threshold {:.4}",
        spectrum.label,
        peaks.len(),
        threshold
    );
    peaks
}

/// Indices of the lowest samples reachable from `peak` on each side without
/// passing a sample higher than the peak. The higher of the two is the local
/// baseline for prominence and width measurements.
fn peak_bases(curve: &[f64], peak: usize) -> (usize, usize) {
    let mut left = peak;
    let mut i = peak;
    while i > 0 && curve[i - 1] <= curve[peak] {
        i -= 1;
        if curve[i] < curve[left] {
            left = i;
        }
    }

    let mut right = peak;
    let mut i = peak;
    while i + 1 < curve.len() && curve[i + 1] <= curve[peak] {
        i += 1;
        if curve[i] < curve[right] {
            right = i;
        }
    }

    (left, right)
}

/// Fractional sample positions where the curve drops to half the peak's
/// prominence, walking outward no further than the bases. Crossings between
/// samples are linearly interpolated.
fn half_height_crossings(
    curve: &[f64],
    peak: usize,
    left_base: usize,
    right_base: usize,
    prominence: f64,
) -> (f64, f64) {
    let height = curve[peak] - 0.5 * prominence;

    let mut i = peak;
    while i > left_base && curve[i] > height {
        i -= 1;
    }
    let mut left_ip = i as f64;
    if curve[i] < height {
        left_ip += (height - curve[i]) / (curve[i + 1] - curve[i]);
    }

    let mut i = peak;
    while i < right_base && curve[i] > height {
        i += 1;
    }
    let mut right_ip = i as f64;
    if curve[i] < height {
        right_ip -= (height - curve[i]) / (curve[i - 1] - curve[i]);
    }

    (left_ip, right_ip)
}

/// Wavenumber at a fractional sample index.
fn x_at(xs: &[f64], idx: f64) -> f64 {
    let lo = idx.floor() as usize;
    if lo + 1 >= xs.len() {
        return xs[xs.len() - 1];
    }
    xs[lo] + (idx - lo as f64) * (xs[lo + 1] - xs[lo])
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn gaussian(x: f64, mu: f64, sigma: f64, amplitude: f64) -> f64 {
        amplitude * (-(x - mu).powi(2) / (2.0 * sigma.powi(2))).exp()
    }

    fn bump_spectrum(bumps: &[(f64, f64, f64)], baseline: f64) -> Spectrum {
        let x: Vec<f64> = (0..=200).map(|i| i as f64).collect();
        let y: Vec<f64> = x
            .iter()
            .map(|&xi| {
                baseline
                    + bumps
                        .iter()
                        .map(|&(mu, sigma, amp)| gaussian(xi, mu, sigma, amp))
                        .sum::<f64>()
            })
            .collect();
        Spectrum::new("bumps", x, y)
    }

    fn detect_default(sp: &Spectrum) -> Vec<Peak> {
        let curve = FittedCurve::fit(sp).unwrap();
        detect(&curve, sp, &PeakConfig::default())
    }

    #[test]
    fn single_bump_gives_one_peak_with_half_max_width() {
        let sp = bump_spectrum(&[(100.0, 8.0, 10.0)], 1.0);
        let peaks = detect_default(&sp);

        assert_eq!(peaks.len(), 1);
        let peak = peaks[0];
        assert_relative_eq!(peak.position, 100.0, epsilon = 1.0);
        assert_relative_eq!(peak.height, 11.0, max_relative = 0.02);
        // Analytic full width at half maximum of the bump: 2 sqrt(2 ln 2) sigma.
        let fwhm = 2.0 * (2.0 * 2.0f64.ln()).sqrt() * 8.0;
        assert_relative_eq!(peak.width, fwhm, max_relative = 0.05);
    }

    #[test]
    fn flat_spectrum_yields_no_peaks() {
        let x: Vec<f64> = (0..=100).map(|i| i as f64).collect();
        let y = vec![1.0; x.len()];
        let sp = Spectrum::new("flat", x, y);
        assert!(detect_default(&sp).is_empty());
    }

    #[test]
    fn bump_below_threshold_is_rejected() {
        // Amplitude 1 over baseline 1: the maximum stays below 3x the mean.
        let sp = bump_spectrum(&[(100.0, 8.0, 1.0)], 1.0);
        assert!(detect_default(&sp).is_empty());
    }

    #[test]
    fn boundary_maxima_are_excluded() {
        // Monotonically increasing data peaks at the last sample only.
        let x: Vec<f64> = (0..=100).map(|i| i as f64).collect();
        let y: Vec<f64> = x.iter().map(|&xi| xi.powi(2)).collect();
        let sp = Spectrum::new("ramp", x, y);
        assert!(detect_default(&sp).is_empty());
    }

    #[test]
    fn peaks_are_ordered_by_position() {
        let sp = bump_spectrum(&[(60.0, 6.0, 10.0), (150.0, 6.0, 12.0)], 1.0);
        let peaks = detect_default(&sp);
        assert_eq!(peaks.len(), 2);
        assert!(peaks[0].position < peaks[1].position);
    }

    #[test]
    fn detection_is_idempotent() {
        let sp = bump_spectrum(&[(60.0, 6.0, 10.0), (150.0, 6.0, 12.0)], 1.0);
        let curve = FittedCurve::fit(&sp).unwrap();
        let first = detect(&curve, &sp, &PeakConfig::default());
        let second = detect(&curve, &sp, &PeakConfig::default());
        assert_eq!(first, second);
    }

    #[test]
    fn narrow_spikes_fail_the_width_filter() {
        // One isolated huge sample: the interpolated half-max span around it
        // stays under two samples.
        let x: Vec<f64> = (0..=100).map(|i| i as f64).collect();
        let mut y = vec![1.0; x.len()];
        y[50] = 100.0;
        let sp = Spectrum::new("spike", x, y);

        let curve = FittedCurve::fit(&sp).unwrap();
        let wide = PeakConfig {
            min_width_samples: 2.0,
            ..PeakConfig::default()
        };
        let narrow = PeakConfig {
            min_width_samples: 0.0,
            ..PeakConfig::default()
        };
        assert!(detect(&curve, &sp, &wide).is_empty());
        assert_eq!(detect(&curve, &sp, &narrow).len(), 1);
    }
}
