use std::io::{self, Write};

use serde::Serialize;

use crate::analysis::peaks::Peak;
use crate::analysis::resample::Grid;
use crate::session::Session;

// ---------------------------------------------------------------------------
// Serializable session summary
// ---------------------------------------------------------------------------

/// Plain numeric summary of a session for report sinks. Degenerate
/// correlation entries serialize as `null`.
#[derive(Debug, Clone, Serialize)]
pub struct SessionSummary {
    pub grid: Grid,
    pub spectra: Vec<SpectrumSummary>,
    pub correlation: Vec<Vec<Option<f64>>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SpectrumSummary {
    pub label: String,
    pub samples: usize,
    pub peaks: Vec<Peak>,
}

/// Collect a finalized (or in-progress) session into its report shape.
pub fn summarize(session: &Session) -> SessionSummary {
    SessionSummary {
        grid: session.config().grid,
        spectra: session
            .analyses()
            .iter()
            .map(|a| SpectrumSummary {
                label: a.spectrum.label.clone(),
                samples: a.spectrum.len(),
                peaks: a.peaks.clone(),
            })
            .collect(),
        correlation: session
            .correlation()
            .map(|m| m.rows())
            .unwrap_or_default(),
    }
}

/// Pretty-printed JSON rendering of the summary.
pub fn to_json(session: &Session) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&summarize(session))
}

// ---------------------------------------------------------------------------
// Text report
// ---------------------------------------------------------------------------

/// Write the classic text report: one peak table per spectrum, then the
/// correlation matrix (`n/a` marks degenerate pairs).
pub fn write_text<W: Write>(out: &mut W, session: &Session) -> io::Result<()> {
    for (i, analysis) in session.analyses().iter().enumerate() {
        writeln!(out, "Spectrum {i}: {}", analysis.spectrum.label)?;
        writeln!(out, "#, wavenumber, height, width")?;
        for (j, peak) in analysis.peaks.iter().enumerate() {
            writeln!(
                out,
                "{j}, {:.1}, {:.3}, {:.3}",
                peak.position, peak.height, peak.width
            )?;
        }
    }

    if let Some(matrix) = session.correlation() {
        writeln!(out, "Spectral correlation matrix")?;
        for row in 0..matrix.size() {
            for col in 0..matrix.size() {
                match matrix.coefficient(row, col) {
                    Ok(r) => write!(out, "{r:6.3}  ")?,
                    Err(_) => write!(out, "   n/a  ")?,
                }
            }
            writeln!(out)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::resample::Grid;
    use crate::data::model::Spectrum;
    use crate::session::SessionConfig;

    fn bump_spectrum(label: &str) -> Spectrum {
        let x: Vec<f64> = (0..100).map(|i| 100.0 + i as f64 * 4.0).collect();
        let y: Vec<f64> = x
            .iter()
            .map(|&xi| 1.0 + 10.0 * (-(xi - 300.0).powi(2) / (2.0 * 30.0f64.powi(2))).exp())
            .collect();
        Spectrum::new(label, x, y)
    }

    fn finalized_session() -> Session {
        let mut session = Session::new(SessionConfig {
            max_spectra: 5,
            grid: Grid {
                start: 100.0,
                stop: 496.0,
                points: 200,
            },
            ..SessionConfig::default()
        });
        session.add_spectrum(bump_spectrum("a.csv")).unwrap();
        session.add_spectrum(bump_spectrum("b.csv")).unwrap();
        session.finalize().unwrap();
        session
    }

    #[test]
    fn text_report_lists_peaks_and_matrix() {
        let session = finalized_session();
        let mut buf = Vec::new();
        write_text(&mut buf, &session).unwrap();
        let text = String::from_utf8(buf).unwrap();

        assert!(text.contains("Spectrum 0: a.csv"));
        assert!(text.contains("Spectrum 1: b.csv"));
        assert!(text.contains("#, wavenumber, height, width"));
        assert!(text.contains("Spectral correlation matrix"));
        assert!(text.contains(" 1.000"));
    }

    #[test]
    fn json_summary_has_matching_shapes() {
        let session = finalized_session();
        let summary = summarize(&session);
        assert_eq!(summary.spectra.len(), 2);
        assert_eq!(summary.correlation.len(), 2);
        assert_eq!(summary.correlation[0].len(), 2);
        assert_eq!(summary.correlation[0][0], Some(1.0));

        let json = to_json(&session).unwrap();
        assert!(json.contains("\"label\": \"a.csv\""));
        assert!(json.contains("\"correlation\""));
    }
}
