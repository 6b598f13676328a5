use crate::error::SpectraError;

/// A series whose relative standard deviation over the grid falls below this
/// floor carries no correlatable signal; the residue left by a constant
/// input after spline fitting and resampling sits orders of magnitude lower.
const RELATIVE_DEVIATION_FLOOR: f64 = 1e-9;

// ---------------------------------------------------------------------------
// Correlation entries
// ---------------------------------------------------------------------------

/// One cell of the correlation matrix.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Correlation {
    /// Pearson coefficient in [-1, 1].
    Coefficient(f64),
    /// Undefined: at least one series of the pair has zero variance.
    Degenerate,
}

impl Correlation {
    pub fn value(&self) -> Option<f64> {
        match self {
            Correlation::Coefficient(r) => Some(*r),
            Correlation::Degenerate => None,
        }
    }
}

// ---------------------------------------------------------------------------
// CorrelationMatrix
// ---------------------------------------------------------------------------

/// Symmetric pairwise-correlation matrix in spectrum insertion order.
/// Non-degenerate diagonal entries are exactly 1.0.
#[derive(Debug, Clone, PartialEq)]
pub struct CorrelationMatrix {
    size: usize,
    entries: Vec<Correlation>,
}

impl CorrelationMatrix {
    /// Number of rows (and columns).
    pub fn size(&self) -> usize {
        self.size
    }

    /// The entry at `(row, col)`.
    pub fn entry(&self, row: usize, col: usize) -> Correlation {
        self.entries[row * self.size + col]
    }

    /// The coefficient at `(row, col)`, or `DegenerateSeries` for a flagged
    /// pair.
    pub fn coefficient(&self, row: usize, col: usize) -> Result<f64, SpectraError> {
        self.entry(row, col)
            .value()
            .ok_or(SpectraError::DegenerateSeries { row, col })
    }

    /// Row-major rows of optional coefficients, `None` marking degenerate
    /// pairs; the shape report sinks consume.
    pub fn rows(&self) -> Vec<Vec<Option<f64>>> {
        (0..self.size)
            .map(|i| (0..self.size).map(|j| self.entry(i, j).value()).collect())
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

/// Compute the full pairwise matrix over resampled series sharing one grid.
/// Each symmetric pair is computed once and mirrored; a degenerate series
/// flags every pair it touches without aborting the rest of the matrix.
pub fn correlate(series: &[&[f64]]) -> CorrelationMatrix {
    let k = series.len();
    let mut entries = vec![Correlation::Degenerate; k * k];

    for i in 0..k {
        for j in i..k {
            let entry = match pearson(series[i], series[j]) {
                // Self-correlation of a live series is 1 by construction;
                // pin it against rounding.
                Some(_) if i == j => Correlation::Coefficient(1.0),
                Some(r) => Correlation::Coefficient(r),
                None => Correlation::Degenerate,
            };
            entries[i * k + j] = entry;
            entries[j * k + i] = entry;
        }
    }

    CorrelationMatrix { size: k, entries }
}

/// Pearson correlation coefficient of two equal-length series, clamped to
/// [-1, 1]. `None` when either series is (numerically) constant.
pub fn pearson(a: &[f64], b: &[f64]) -> Option<f64> {
    debug_assert_eq!(a.len(), b.len());
    if a.is_empty() {
        return None;
    }
    let n = a.len() as f64;
    let mean_a = a.iter().sum::<f64>() / n;
    let mean_b = b.iter().sum::<f64>() / n;

    let mut cov = 0.0;
    let mut var_a = 0.0;
    let mut var_b = 0.0;
    for (&ai, &bi) in a.iter().zip(b) {
        let da = ai - mean_a;
        let db = bi - mean_b;
        cov += da * db;
        var_a += da * da;
        var_b += db * db;
    }

    if is_degenerate(a, var_a) || is_degenerate(b, var_b) {
        return None;
    }
    Some((cov / (var_a.sqrt() * var_b.sqrt())).clamp(-1.0, 1.0))
}

fn is_degenerate(values: &[f64], var: f64) -> bool {
    let scale = values.iter().fold(0.0f64, |m, &v| m.max(v.abs()));
    var <= (RELATIVE_DEVIATION_FLOOR * scale).powi(2) * values.len() as f64
}
