//! Butcher tableau representation and the shared explicit stage loop.

use crate::{Float, ode::ODE};

/// Error estimation weights of a tableau.
#[derive(Debug, Clone, Copy)]
pub enum ErrorWeights {
    /// Fixed-step method, no embedded error estimate.
    None,
    /// Embedded pair: the weighted stage sum is the local error.
    Simple(&'static [Float]),
}

/// Coefficients of an explicit Runge-Kutta method.
///
/// With `s = b.len()` stages, `c` holds the `s - 1` stage times after the
/// step start, `a` the `s - 1` lower-triangular stage-combination rows
/// (row `j` has `j + 1` entries), and `b` the propagation weights.
#[derive(Debug, Clone, Copy)]
pub struct ButcherTableau {
    pub name: &'static str,
    /// Global order of the propagated solution.
    pub order: usize,
    pub c: &'static [Float],
    pub a: &'static [&'static [Float]],
    pub b: &'static [Float],
    pub error: ErrorWeights,
    /// Dense-output weight polynomials, one row per stage. Row `s` holds the
    /// coefficients `[d1, d2, ...]` of `B_s(theta) = d1 theta + d2 theta^2 +
    /// ...`, the continuous extension of the propagation weight `b[s]`:
    /// `B_s(0) = 0`, `B_s(1) = b[s]`, and the interpolated state is
    /// `y(theta) = y0 + h * sum_s B_s(theta) k_s`.
    pub dense: &'static [&'static [Float]],
    /// First-same-as-last: the final stage is the derivative at the step end
    /// and can seed the next step.
    pub fsal: bool,
}

impl ButcherTableau {
    pub fn stages(&self) -> usize {
        self.b.len()
    }

    /// Evaluate stages 1..s. `k[0]` must already hold the derivative at the
    /// step start; `yt` is scratch of dimension n. Costs `s - 1` derivative
    /// evaluations.
    pub fn compute_stages<F>(
        &self,
        f: &F,
        x: Float,
        y: &[Float],
        h: Float,
        k: &mut [Vec<Float>],
        yt: &mut [Float],
    ) where
        F: ODE,
    {
        let n = y.len();
        for j in 1..self.stages() {
            let row = self.a[j - 1];
            for i in 0..n {
                let mut sum = 0.0;
                for (l, &a_jl) in row.iter().enumerate() {
                    sum += a_jl * k[l][i];
                }
                yt[i] = y[i] + h * sum;
            }
            f.ode(x + self.c[j - 1] * h, yt, &mut k[j]);
        }
    }

    /// Propagated state `y1 = y0 + h * sum(b[l] * k[l])`.
    pub fn propagate(&self, y: &[Float], h: Float, k: &[Vec<Float>], y1: &mut [Float]) {
        for i in 0..y.len() {
            let mut sum = 0.0;
            for (l, &b_l) in self.b.iter().enumerate() {
                sum += b_l * k[l][i];
            }
            y1[i] = y[i] + h * sum;
        }
    }

    /// Normalized embedded error estimate over the first `n_err` components.
    /// Values below 1 accept the step. Returns 0 for fixed-step tableaus.
    pub fn estimate_error(&self, h: Float, k: &[Vec<Float>], scale: &[Float], n_err: usize) -> Float {
        let e = match self.error {
            ErrorWeights::None => return 0.0,
            ErrorWeights::Simple(e) => e,
        };
        let mut err: Float = 0.0;
        for i in 0..n_err {
            let mut sum = 0.0;
            for (l, &e_l) in e.iter().enumerate() {
                sum += e_l * k[l][i];
            }
            let ratio = h * sum / scale[i];
            err += ratio * ratio;
        }
        (err / n_err as Float).sqrt()
    }
}
