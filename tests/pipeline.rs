//! End-to-end runs of the full pipeline: load-shaped spectra in, peak lists
//! and a correlation matrix out.

use approx::{assert_abs_diff_eq, assert_relative_eq};
use spectra_compare::{Correlation, Session, SessionConfig, Spectrum};

fn linspace(a: f64, b: f64, n: usize) -> Vec<f64> {
    let step = (b - a) / (n - 1) as f64;
    (0..n).map(|i| a + i as f64 * step).collect()
}

fn gaussian(x: f64, mu: f64, sigma: f64, amplitude: f64) -> f64 {
    amplitude * (-(x - mu).powi(2) / (2.0 * sigma.powi(2))).exp()
}

/// Full width at half maximum of a Gaussian bump.
fn fwhm(sigma: f64) -> f64 {
    2.0 * (2.0 * 2.0f64.ln()).sqrt() * sigma
}

fn ramp_with_bump(label: &str) -> Spectrum {
    let x = linspace(100.0, 4500.0, 1000);
    let y: Vec<f64> = x
        .iter()
        .map(|&xi| 1.0 + 0.0001 * (xi - 100.0) + gaussian(xi, 1000.0, 40.0, 10.0))
        .collect();
    Spectrum::new(label, x, y)
}

#[test]
fn identical_spectra_share_their_peak_and_correlate_fully() {
    let mut session = Session::new(SessionConfig::default());
    session.add_spectrum(ramp_with_bump("a.csv")).unwrap();
    session.add_spectrum(ramp_with_bump("b.csv")).unwrap();
    let matrix = session.finalize().unwrap().clone();

    for i in 0..2 {
        let peaks = session.peaks(i).unwrap();
        assert_eq!(peaks.len(), 1, "spectrum {i} should have exactly one peak");
        let peak = peaks[0];
        assert!((peak.position - 1000.0).abs() < 5.0);
        assert_relative_eq!(peak.height, 11.09, max_relative = 0.02);
        assert_relative_eq!(peak.width, fwhm(40.0), max_relative = 0.05);
    }

    assert_eq!(matrix.size(), 2);
    assert_abs_diff_eq!(matrix.coefficient(0, 1).unwrap(), 1.0, epsilon = 1e-9);
    assert_abs_diff_eq!(matrix.coefficient(1, 0).unwrap(), 1.0, epsilon = 1e-9);
    assert_eq!(matrix.coefficient(0, 0).unwrap(), 1.0);
    assert_eq!(matrix.coefficient(1, 1).unwrap(), 1.0);
}

#[test]
fn two_separated_bumps_are_both_characterized() {
    let x = linspace(100.0, 4500.0, 1000);
    let y: Vec<f64> = x
        .iter()
        .map(|&xi| {
            1.0 + gaussian(xi, 500.0, 50.0, 10.0) + gaussian(xi, 2000.0, 50.0, 10.0)
        })
        .collect();

    let mut session = Session::new(SessionConfig::default());
    let analysis = session.add_spectrum(Spectrum::new("two-bumps", x, y)).unwrap();
    let peaks = analysis.peaks.clone();

    assert_eq!(peaks.len(), 2);
    assert!(peaks[0].position < peaks[1].position, "peaks sorted by x");
    assert!((peaks[0].position - 500.0).abs() < 5.0);
    assert!((peaks[1].position - 2000.0).abs() < 5.0);
    for peak in &peaks {
        assert_relative_eq!(peak.height, 11.0, max_relative = 0.05);
        assert_relative_eq!(peak.width, fwhm(50.0), max_relative = 0.05);
    }
}

#[test]
fn flat_spectrum_has_no_peaks_and_degenerate_correlation() {
    let x = linspace(100.0, 4500.0, 1000);
    let flat = Spectrum::new("flat", x.clone(), vec![1.0; x.len()]);

    let mut session = Session::new(SessionConfig::default());
    session.add_spectrum(flat).unwrap();
    session.add_spectrum(ramp_with_bump("bumpy")).unwrap();
    let matrix = session.finalize().unwrap().clone();

    assert_eq!(session.peaks(0).unwrap().len(), 0);
    assert_eq!(matrix.entry(0, 0), Correlation::Degenerate);
    assert_eq!(matrix.entry(0, 1), Correlation::Degenerate);
    assert_eq!(matrix.entry(1, 0), Correlation::Degenerate);
    assert_eq!(matrix.coefficient(1, 1).unwrap(), 1.0);
}

#[test]
fn session_results_line_up_with_inputs() {
    let mut session = Session::new(SessionConfig::default());
    session.add_spectrum(ramp_with_bump("a")).unwrap();
    session.add_spectrum(ramp_with_bump("b")).unwrap();
    session.add_spectrum(ramp_with_bump("c")).unwrap();
    let matrix = session.finalize().unwrap().clone();

    assert_eq!(session.len(), 3);
    assert_eq!(session.analyses().len(), 3);
    assert_eq!(matrix.size(), 3);
    for analysis in session.analyses() {
        assert_eq!(analysis.series.len(), session.config().grid.points);
        let (lo, hi) = analysis.curve.domain();
        for peak in &analysis.peaks {
            assert!(lo < peak.position && peak.position < hi);
        }
    }
}

#[test]
fn fitted_curves_reproduce_their_inputs_through_the_session() {
    let mut session = Session::new(SessionConfig::default());
    let spectrum = ramp_with_bump("a");
    let expected = spectrum.clone();
    session.add_spectrum(spectrum).unwrap();

    let analysis = &session.analyses()[0];
    for (xi, yi) in expected.x.iter().zip(&expected.y) {
        assert_relative_eq!(analysis.curve.evaluate(*xi), *yi, max_relative = 1e-8);
    }
}
