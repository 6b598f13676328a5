/// Analysis pipeline: smoothing, peak detection, resampling, correlation.
///
/// ```text
///   Spectrum
///      │
///      ▼
///  ┌─────────┐
///  │ spline   │  quartic interpolating fit → FittedCurve
///  └─────────┘
///      │
///      ├──────────────────────┐
///      ▼                      ▼
///  ┌─────────┐          ┌──────────┐
///  │  peaks   │          │ resample  │  shared grid → ResampledSeries
///  └─────────┘          └──────────┘
///                             │
///                             ▼
///                       ┌───────────┐
///                       │ correlate  │  pairwise Pearson matrix
///                       └───────────┘
/// ```

pub mod correlate;
pub mod peaks;
pub mod resample;
pub mod spline;
