//! Spectral comparison toolkit: fits a smooth quartic spline to each loaded
//! spectrum, detects significant peaks (position, height, width at half
//! maximum), resamples every fit on a shared wavenumber grid, and computes
//! the pairwise Pearson correlation matrix across spectra.
//!
//! The typical flow is [`data::loader`] → [`Session`] → [`report`]:
//!
//! ```no_run
//! use spectra_compare::{Session, SessionConfig};
//!
//! let mut session = Session::new(SessionConfig::default());
//! let spectrum = spectra_compare::data::loader::load_file("sample_a.csv".as_ref())?;
//! session.add_spectrum(spectrum)?;
//! let matrix = session.finalize()?;
//! println!("self correlation: {}", matrix.coefficient(0, 0)?);
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod analysis;
pub mod data;
pub mod error;
pub mod report;
pub mod session;

pub use analysis::correlate::{correlate, pearson, Correlation, CorrelationMatrix};
pub use analysis::peaks::{detect, Peak, PeakConfig};
pub use analysis::resample::{resample, Grid, ResampledSeries};
pub use analysis::spline::FittedCurve;
pub use data::model::Spectrum;
pub use error::SpectraError;
pub use session::{Session, SessionConfig, SpectrumAnalysis};
