use crate::error::SpectraError;

// ---------------------------------------------------------------------------
// Spectrum – one measurement as ordered (wavenumber, intensity) samples
// ---------------------------------------------------------------------------

/// A single spectrum: paired wavenumber/intensity samples plus a source
/// label (file name or caller-chosen identifier). Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct Spectrum {
    /// Source label used in reports and error messages.
    pub label: String,
    /// Wavenumber axis (x).
    pub x: Vec<f64>,
    /// Intensity axis (y) – same length as `x`.
    pub y: Vec<f64>,
}

impl Spectrum {
    pub fn new(label: impl Into<String>, x: Vec<f64>, y: Vec<f64>) -> Self {
        Spectrum {
            label: label.into(),
            x,
            y,
        }
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    /// Native wavenumber range `(first, last)`, or `None` when empty.
    pub fn range(&self) -> Option<(f64, f64)> {
        match (self.x.first(), self.x.last()) {
            (Some(&lo), Some(&hi)) => Some((lo, hi)),
            _ => None,
        }
    }

    /// Mean raw intensity – the flat-baseline estimate used for peak
    /// thresholding. Zero for an empty spectrum.
    pub fn mean_intensity(&self) -> f64 {
        if self.y.is_empty() {
            return 0.0;
        }
        self.y.iter().sum::<f64>() / self.y.len() as f64
    }

    /// Check that the spectrum is fit for smoothing: at least `min_points`
    /// samples, matching axis lengths, finite values, strictly increasing x.
    pub fn validate(&self, min_points: usize) -> Result<(), SpectraError> {
        if self.x.len() != self.y.len() {
            return Err(self.invalid(format!(
                "x has {} samples but y has {}",
                self.x.len(),
                self.y.len()
            )));
        }
        if self.x.len() < min_points {
            return Err(self.invalid(format!(
                "{} samples, need at least {min_points}",
                self.x.len()
            )));
        }
        for (i, (&xi, &yi)) in self.x.iter().zip(&self.y).enumerate() {
            if !xi.is_finite() || !yi.is_finite() {
                return Err(self.invalid(format!("non-finite value at sample {i}")));
            }
        }
        for i in 1..self.x.len() {
            if self.x[i] <= self.x[i - 1] {
                return Err(self.invalid(format!(
                    "wavenumbers not strictly increasing at sample {i} ({} after {})",
                    self.x[i],
                    self.x[i - 1]
                )));
            }
        }
        Ok(())
    }

    fn invalid(&self, reason: String) -> SpectraError {
        SpectraError::InvalidSpectrumData {
            label: self.label.clone(),
            reason,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spectrum(x: Vec<f64>, y: Vec<f64>) -> Spectrum {
        Spectrum::new("test", x, y)
    }

    #[test]
    fn validate_accepts_well_formed_data() {
        let sp = spectrum(vec![1.0, 2.0, 3.0, 4.0, 5.0], vec![0.1, 0.2, 0.3, 0.2, 0.1]);
        assert!(sp.validate(5).is_ok());
    }

    #[test]
    fn validate_rejects_too_few_points() {
        let sp = spectrum(vec![1.0, 2.0, 3.0], vec![0.1, 0.2, 0.3]);
        assert!(matches!(
            sp.validate(5),
            Err(SpectraError::InvalidSpectrumData { .. })
        ));
    }

    #[test]
    fn validate_rejects_duplicate_wavenumbers() {
        let sp = spectrum(vec![1.0, 2.0, 2.0, 4.0, 5.0], vec![0.0; 5]);
        assert!(sp.validate(5).is_err());
    }

    #[test]
    fn validate_rejects_decreasing_wavenumbers() {
        let sp = spectrum(vec![5.0, 4.0, 3.0, 2.0, 1.0], vec![0.0; 5]);
        assert!(sp.validate(5).is_err());
    }

    #[test]
    fn validate_rejects_non_finite_values() {
        let sp = spectrum(
            vec![1.0, 2.0, 3.0, 4.0, 5.0],
            vec![0.0, f64::NAN, 0.0, 0.0, 0.0],
        );
        assert!(sp.validate(5).is_err());
    }

    #[test]
    fn validate_rejects_length_mismatch() {
        let sp = spectrum(vec![1.0, 2.0, 3.0, 4.0, 5.0], vec![0.0; 4]);
        assert!(sp.validate(5).is_err());
    }

    #[test]
    fn mean_intensity_is_flat_baseline_estimate() {
        let sp = spectrum(vec![1.0, 2.0, 3.0, 4.0, 5.0], vec![1.0, 2.0, 3.0, 4.0, 5.0]);
        assert_eq!(sp.mean_intensity(), 3.0);
    }
}
