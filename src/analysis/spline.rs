use log::debug;

use crate::data::model::Spectrum;
use crate::error::SpectraError;

/// Degree of the smoothing spline. Interpolation needs `DEGREE + 1` points.
pub const DEGREE: usize = 4;

// ---------------------------------------------------------------------------
// BSpline – knots + coefficients with de Boor evaluation
// ---------------------------------------------------------------------------

/// A B-spline in knot/coefficient form.
///
/// `knots.len() == coeffs.len() + degree + 1`. Evaluation outside the
/// clamped knot range extrapolates the boundary polynomial pieces.
#[derive(Debug, Clone)]
pub struct BSpline {
    degree: usize,
    knots: Vec<f64>,
    coeffs: Vec<f64>,
}

impl BSpline {
    /// Index `m` of the knot interval containing `x`, clamped to the valid
    /// span range so out-of-domain arguments use the end pieces.
    fn span(&self, x: f64) -> usize {
        find_span(&self.knots, self.coeffs.len(), self.degree, x)
    }

    /// Evaluate at `x` using de Boor's algorithm.
    pub fn evaluate(&self, x: f64) -> f64 {
        let k = self.degree;
        let m = self.span(x);

        let mut d: Vec<f64> = (0..=k).map(|r| self.coeffs[m - k + r]).collect();
        for j in 1..=k {
            for r in (j..=k).rev() {
                let i = m - k + r;
                let denom = self.knots[i + k + 1 - j] - self.knots[i];
                let alpha = (x - self.knots[i]) / denom;
                d[r] = (1.0 - alpha) * d[r - 1] + alpha * d[r];
            }
        }
        d[k]
    }

    /// The derivative spline, one degree lower. The derivative of a
    /// degree-0 spline is identically zero.
    pub fn derivative(&self) -> BSpline {
        let k = self.degree;
        let n = self.coeffs.len();

        if k == 0 {
            return BSpline {
                degree: 0,
                knots: self.knots.clone(),
                coeffs: vec![0.0; n],
            };
        }

        let mut coeffs = Vec::with_capacity(n - 1);
        for j in 0..n - 1 {
            let denom = self.knots[j + k + 1] - self.knots[j + 1];
            let c = if denom == 0.0 {
                0.0
            } else {
                k as f64 * (self.coeffs[j + 1] - self.coeffs[j]) / denom
            };
            coeffs.push(c);
        }

        BSpline {
            degree: k - 1,
            knots: self.knots[1..self.knots.len() - 1].to_vec(),
            coeffs,
        }
    }
}

/// Knot interval lookup shared by evaluation and collocation. Returns `m`
/// with `knots[m] <= x < knots[m + 1]`, clamped to `[degree, n - 1]`.
fn find_span(knots: &[f64], n: usize, degree: usize, x: f64) -> usize {
    if x >= knots[n] {
        return n - 1;
    }
    if x <= knots[degree] {
        return degree;
    }
    let mut lo = degree;
    let mut hi = n;
    while hi - lo > 1 {
        let mid = (lo + hi) / 2;
        if knots[mid] > x {
            hi = mid;
        } else {
            lo = mid;
        }
    }
    lo
}

/// All `degree + 1` non-vanishing basis functions at `x` in span `m`
/// (Cox–de Boor recursion). `out[r]` is the value of basis `m - degree + r`.
fn basis_functions(knots: &[f64], m: usize, degree: usize, x: f64) -> Vec<f64> {
    let mut vals = vec![0.0; degree + 1];
    let mut left = vec![0.0; degree + 1];
    let mut right = vec![0.0; degree + 1];

    vals[0] = 1.0;
    for j in 1..=degree {
        left[j] = x - knots[m + 1 - j];
        right[j] = knots[m + j] - x;
        let mut saved = 0.0;
        for r in 0..j {
            let tmp = vals[r] / (right[r + 1] + left[j - r]);
            vals[r] = saved + right[r + 1] * tmp;
            saved = left[j - r] * tmp;
        }
        vals[j] = saved;
    }
    vals
}

// ---------------------------------------------------------------------------
// Banded collocation system
// ---------------------------------------------------------------------------

/// Square banded matrix stored as `n` rows of `2 * half + 1` diagonals.
struct BandMatrix {
    n: usize,
    half: usize,
    data: Vec<f64>,
}

impl BandMatrix {
    fn new(n: usize, half: usize) -> Self {
        BandMatrix {
            n,
            half,
            data: vec![0.0; n * (2 * half + 1)],
        }
    }

    fn idx(&self, row: usize, col: usize) -> usize {
        // invariant: |col - row| <= half
        row * (2 * self.half + 1) + (col + self.half - row)
    }

    fn get(&self, row: usize, col: usize) -> f64 {
        self.data[self.idx(row, col)]
    }

    fn set(&mut self, row: usize, col: usize, val: f64) {
        let i = self.idx(row, col);
        self.data[i] = val;
    }

    /// In-place LU solve without pivoting. Spline collocation matrices are
    /// totally positive, so elimination in natural order is stable and the
    /// band never widens. Returns `None` on a (numerically) singular pivot.
    fn solve(mut self, mut rhs: Vec<f64>) -> Option<Vec<f64>> {
        let n = self.n;
        let h = self.half;

        for col in 0..n {
            let pivot = self.get(col, col);
            if pivot.abs() < f64::MIN_POSITIVE {
                return None;
            }
            for row in col + 1..(col + h + 1).min(n) {
                let factor = self.get(row, col) / pivot;
                if factor == 0.0 {
                    continue;
                }
                for j in col..(col + h + 1).min(n) {
                    let val = self.get(row, j) - factor * self.get(col, j);
                    self.set(row, j, val);
                }
                rhs[row] -= factor * rhs[col];
            }
        }

        for row in (0..n).rev() {
            let mut acc = rhs[row];
            for j in row + 1..(row + h + 1).min(n) {
                acc -= self.get(row, j) * rhs[j];
            }
            rhs[row] = acc / self.get(row, row);
        }
        Some(rhs)
    }
}

/// Clamped knot vector for interpolation at the data sites: `degree + 1`
/// copies of each boundary and interior knots at sliding averages of
/// `degree` consecutive sites, which satisfies the Schoenberg–Whitney
/// condition for strictly increasing x.
fn interpolation_knots(x: &[f64], degree: usize) -> Vec<f64> {
    let n = x.len();
    let mut knots = Vec::with_capacity(n + degree + 1);

    for _ in 0..=degree {
        knots.push(x[0]);
    }
    for i in 1..n - degree {
        let avg = x[i..i + degree].iter().sum::<f64>() / degree as f64;
        knots.push(avg);
    }
    for _ in 0..=degree {
        knots.push(x[n - 1]);
    }
    knots
}

// ---------------------------------------------------------------------------
// FittedCurve – the public smoother output
// ---------------------------------------------------------------------------

/// A smooth quartic interpolant of one spectrum. Passes exactly through
/// every input point; values outside the native wavenumber range come from
/// polynomial extrapolation of the end pieces and are unreliable.
#[derive(Debug, Clone)]
pub struct FittedCurve {
    spline: BSpline,
    x_min: f64,
    x_max: f64,
}

impl FittedCurve {
    /// Fit the interpolating quartic spline to a spectrum's samples.
    pub fn fit(spectrum: &Spectrum) -> Result<FittedCurve, SpectraError> {
        spectrum.validate(DEGREE + 1)?;

        let x = &spectrum.x;
        let y = &spectrum.y;
        let n = x.len();

        let knots = interpolation_knots(x, DEGREE);

        let mut system = BandMatrix::new(n, DEGREE);
        for (i, &xi) in x.iter().enumerate() {
            let m = find_span(&knots, n, DEGREE, xi);
            let basis = basis_functions(&knots, m, DEGREE, xi);
            for (r, &v) in basis.iter().enumerate() {
                system.set(i, m - DEGREE + r, v);
            }
        }

        let coeffs = system
            .solve(y.clone())
            .ok_or_else(|| SpectraError::InvalidSpectrumData {
                label: spectrum.label.clone(),
                reason: "spline collocation system is singular".into(),
            })?;

        debug!(
            "fitted quartic spline for '{}': {} points, {} knots",
            spectrum.label,
            n,
            knots.len()
        );

        Ok(FittedCurve {
            spline: BSpline {
                degree: DEGREE,
                knots,
                coeffs,
            },
            x_min: x[0],
            x_max: x[n - 1],
        })
    }

    /// Evaluate the fit at `x`.
    pub fn evaluate(&self, x: f64) -> f64 {
        self.spline.evaluate(x)
    }

    /// Evaluate the fit at many positions (e.g. for a plot sink).
    pub fn evaluate_many(&self, xs: &[f64]) -> Vec<f64> {
        xs.iter().map(|&x| self.evaluate(x)).collect()
    }

    /// First derivative of the fit, for diagnostics.
    pub fn derivative(&self) -> BSpline {
        self.spline.derivative()
    }

    /// Native wavenumber range `(min, max)` the fit is valid over.
    pub fn domain(&self) -> (f64, f64) {
        (self.x_min, self.x_max)
    }
}
