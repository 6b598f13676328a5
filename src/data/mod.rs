/// Data layer: core types and spectrum loading.
///
/// Architecture:
/// ```text
///  .csv / .json
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → Spectrum
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ Spectrum  │  label, x: Vec<f64>, y: Vec<f64>
///   └──────────┘
///        │
///        ▼
///    analysis pipeline (spline → peaks / resample → correlate)
/// ```

pub mod loader;
pub mod model;
