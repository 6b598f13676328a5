use thiserror::Error;

// ---------------------------------------------------------------------------
// Error taxonomy
// ---------------------------------------------------------------------------

/// Failures the analysis core can report to its caller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SpectraError {
    /// The spectrum cannot be fitted: too few points, non-monotonic or
    /// duplicate wavenumbers, or non-finite values. Fatal for that spectrum
    /// only; a session rejecting it stays usable.
    #[error("invalid spectrum data for '{label}': {reason}")]
    InvalidSpectrumData { label: String, reason: String },

    /// A resampled series in the pair has (numerically) zero variance on the
    /// shared grid, so its correlation coefficient is undefined.
    #[error("degenerate series: correlation ({row}, {col}) is undefined for zero-variance input")]
    DegenerateSeries { row: usize, col: usize },

    /// The session has been frozen; no further spectra can be added.
    #[error("session already finalized")]
    SessionFinalized,
}
