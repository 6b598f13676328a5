use log::info;

use crate::analysis::correlate::{correlate, CorrelationMatrix};
use crate::analysis::peaks::{detect, Peak, PeakConfig};
use crate::analysis::resample::{resample, Grid, ResampledSeries};
use crate::analysis::spline::FittedCurve;
use crate::data::model::Spectrum;
use crate::error::SpectraError;

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Tunables for a comparison session.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionConfig {
    /// Maximum number of spectra accepted before the session freezes.
    pub max_spectra: usize,
    /// Peak detection thresholds.
    pub peaks: PeakConfig,
    /// Shared resampling grid.
    pub grid: Grid,
}

impl Default for SessionConfig {
    fn default() -> Self {
        SessionConfig {
            max_spectra: 5,
            peaks: PeakConfig::default(),
            grid: Grid::default(),
        }
    }
}

// ---------------------------------------------------------------------------
// Per-spectrum results
// ---------------------------------------------------------------------------

/// Everything the pipeline derives from one accepted spectrum.
#[derive(Debug, Clone)]
pub struct SpectrumAnalysis {
    pub spectrum: Spectrum,
    pub curve: FittedCurve,
    pub peaks: Vec<Peak>,
    pub series: ResampledSeries,
}

// ---------------------------------------------------------------------------
// Session – bounded accumulation with an explicit freeze
// ---------------------------------------------------------------------------

/// Orchestrates the pipeline over a bounded set of spectra.
///
/// Spectra are added one at a time; each is smoothed, peak-scanned, and
/// resampled on arrival. Reaching the configured maximum (or an explicit
/// [`Session::finalize`]) computes the correlation matrix once and freezes
/// the session; any later mutation fails with
/// [`SpectraError::SessionFinalized`].
#[derive(Debug, Clone)]
pub struct Session {
    config: SessionConfig,
    analyses: Vec<SpectrumAnalysis>,
    matrix: Option<CorrelationMatrix>,
}

impl Session {
    pub fn new(config: SessionConfig) -> Self {
        Session {
            config,
            analyses: Vec::with_capacity(config.max_spectra),
            matrix: None,
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Number of accepted spectra.
    pub fn len(&self) -> usize {
        self.analyses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.analyses.is_empty()
    }

    pub fn is_finalized(&self) -> bool {
        self.matrix.is_some()
    }

    /// All per-spectrum results, in insertion order.
    pub fn analyses(&self) -> &[SpectrumAnalysis] {
        &self.analyses
    }

    /// Peaks of the spectrum at `index`, if it exists.
    pub fn peaks(&self, index: usize) -> Option<&[Peak]> {
        self.analyses.get(index).map(|a| a.peaks.as_slice())
    }

    /// The correlation matrix, available once finalized.
    pub fn correlation(&self) -> Option<&CorrelationMatrix> {
        self.matrix.as_ref()
    }

    /// Run the pipeline on one spectrum and retain the results.
    ///
    /// A spectrum that fails validation is rejected without touching the
    /// session's other members. Accepting the `max_spectra`-th spectrum
    /// finalizes the session.
    pub fn add_spectrum(&mut self, spectrum: Spectrum) -> Result<&SpectrumAnalysis, SpectraError> {
        if self.is_finalized() {
            return Err(SpectraError::SessionFinalized);
        }

        let curve = FittedCurve::fit(&spectrum)?;
        let peaks = detect(&curve, &spectrum, &self.config.peaks);
        let series = resample(&curve, &self.config.grid);

        info!(
            "spectrum '{}': {} samples, {} peaks",
            spectrum.label,
            spectrum.len(),
            peaks.len()
        );

        self.analyses.push(SpectrumAnalysis {
            spectrum,
            curve,
            peaks,
            series,
        });

        if self.analyses.len() >= self.config.max_spectra {
            let matrix = self.compute_matrix();
            self.matrix = Some(matrix);
        }

        let idx = self.analyses.len() - 1;
        Ok(&self.analyses[idx])
    }

    /// Signal completion: compute the correlation matrix and freeze.
    /// Fails with `SessionFinalized` when already frozen.
    pub fn finalize(&mut self) -> Result<&CorrelationMatrix, SpectraError> {
        if self.is_finalized() {
            return Err(SpectraError::SessionFinalized);
        }
        let matrix = self.compute_matrix();
        Ok(self.matrix.insert(matrix))
    }

    fn compute_matrix(&self) -> CorrelationMatrix {
        let rows: Vec<&[f64]> = self.analyses.iter().map(|a| a.series.values()).collect();
        info!("correlating {} resampled series", rows.len());
        correlate(&rows)
    }
}
