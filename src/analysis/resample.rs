use serde::{Deserialize, Serialize};

use super::spline::FittedCurve;

// ---------------------------------------------------------------------------
// Shared resampling grid
// ---------------------------------------------------------------------------

/// Evenly spaced evaluation grid shared by every spectrum in a session,
/// endpoints included.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Grid {
    pub start: f64,
    pub stop: f64,
    pub points: usize,
}

impl Default for Grid {
    fn default() -> Self {
        Grid {
            start: 100.0,
            stop: 4500.0,
            points: 1000,
        }
    }
}

impl Grid {
    /// The grid's x-positions, `start` and `stop` inclusive.
    pub fn positions(&self) -> Vec<f64> {
        if self.points <= 1 {
            return vec![self.start];
        }
        let step = (self.stop - self.start) / (self.points - 1) as f64;
        (0..self.points)
            .map(|i| self.start + i as f64 * step)
            .collect()
    }
}

// ---------------------------------------------------------------------------
// ResampledSeries – one spectrum's fit on the shared grid
// ---------------------------------------------------------------------------

/// A fitted curve evaluated at every grid point. Values at grid positions
/// outside the spectrum's native range come from extrapolation and are
/// unreliable near the domain edges.
#[derive(Debug, Clone, PartialEq)]
pub struct ResampledSeries {
    values: Vec<f64>,
}

impl ResampledSeries {
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Evaluate a fitted curve on the shared grid.
pub fn resample(curve: &FittedCurve, grid: &Grid) -> ResampledSeries {
    ResampledSeries {
        values: grid
            .positions()
            .iter()
            .map(|&x| curve.evaluate(x))
            .collect(),
    }
}
