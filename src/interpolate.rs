//! Dense output: interpolation of the solution inside one accepted step.

use crate::{Float, butcher::ButcherTableau};

/// Dense output for a single accepted step.
///
/// An interpolator stores the boundary states and enough stage data of one
/// step to reconstruct the method-specific interpolation polynomial in the
/// normalized variable `theta = (t - previous_time) / h`. Accuracy is only
/// guaranteed inside `[previous_time, current_time]`; setting a time outside
/// the step extrapolates with reduced accuracy but does not fail.
///
/// Interpolators own their backing arrays. Cloning one with
/// [`StepInterpolator::boxed_clone`] yields a structurally independent copy,
/// so callbacks may retain interpolators while the integrator keeps stepping.
pub trait StepInterpolator {
    /// Left end of the step.
    fn previous_time(&self) -> Float;
    /// Right end of the step.
    fn current_time(&self) -> Float;
    /// True when the step advances towards increasing time.
    fn is_forward(&self) -> bool {
        self.current_time() >= self.previous_time()
    }
    /// Move the interpolation cursor and recompute state and derivatives.
    fn set_interpolated_time(&mut self, t: Float);
    /// Current position of the interpolation cursor.
    fn interpolated_time(&self) -> Float;
    /// State at the cursor time.
    fn interpolated_state(&self) -> &[Float];
    /// Time derivative of the state at the cursor time.
    fn interpolated_derivatives(&self) -> &[Float];
    /// Deep copy with fresh backing arrays.
    fn boxed_clone(&self) -> Box<dyn StepInterpolator>;
}

/// Interpolator for the explicit Runge-Kutta methods.
///
/// The interpolated state is `y(theta) = y0 + h sum_s B_s(theta) k_s` with
/// the stage-weight polynomials `B_s` taken from the method's tableau, so
/// each tableau carries its own continuous extension (the classical cubic
/// for RK4, the quartic form for Higham-Hall 5(4), and so on). Past the
/// midpoint the same polynomial is evaluated backward from the step end,
/// which halves the cancellation error near it.
#[derive(Debug, Clone)]
pub struct RkStepInterpolator {
    x_prev: Float,
    h: Float,
    y_prev: Vec<Float>,
    y_curr: Vec<Float>,
    k: Vec<Vec<Float>>,
    dense: &'static [&'static [Float]],
    b: &'static [Float],
    weights: Vec<Float>,
    weight_dots: Vec<Float>,
    x_interp: Float,
    state: Vec<Float>,
    derivatives: Vec<Float>,
}

impl RkStepInterpolator {
    pub fn new(
        x_prev: Float,
        h: Float,
        y_prev: &[Float],
        y_curr: &[Float],
        k: &[Vec<Float>],
        tableau: &'static ButcherTableau,
    ) -> Self {
        let mut interp = Self {
            x_prev,
            h,
            y_prev: y_prev.to_vec(),
            y_curr: y_curr.to_vec(),
            k: k.to_vec(),
            dense: tableau.dense,
            b: tableau.b,
            weights: vec![0.0; tableau.dense.len()],
            weight_dots: vec![0.0; tableau.dense.len()],
            x_interp: x_prev + h,
            state: vec![0.0; y_prev.len()],
            derivatives: vec![0.0; y_prev.len()],
        };
        interp.set_interpolated_time(interp.x_interp);
        interp
    }
}

impl StepInterpolator for RkStepInterpolator {
    fn previous_time(&self) -> Float {
        self.x_prev
    }

    fn current_time(&self) -> Float {
        self.x_prev + self.h
    }

    fn set_interpolated_time(&mut self, t: Float) {
        self.x_interp = t;
        let theta = (t - self.x_prev) / self.h;
        for (s, row) in self.dense.iter().enumerate() {
            // B_s(theta) = d1 theta + d2 theta^2 + ... by Horner's rule,
            // B_s'(theta) alongside it
            let mut w = 0.0;
            let mut wd = 0.0;
            for (j, &d) in row.iter().enumerate().rev() {
                w = w * theta + d;
                wd = wd * theta + (j as Float + 1.0) * d;
            }
            self.weights[s] = theta * w;
            self.weight_dots[s] = wd;
        }
        for i in 0..self.state.len() {
            let mut dot = 0.0;
            for (s, ks) in self.k.iter().enumerate() {
                dot += self.weight_dots[s] * ks[i];
            }
            self.derivatives[i] = dot;
            if theta <= 0.5 {
                // forward from the step start
                let mut acc = 0.0;
                for (s, ks) in self.k.iter().enumerate() {
                    acc += self.weights[s] * ks[i];
                }
                self.state[i] = self.y_prev[i] + self.h * acc;
            } else {
                // backward from the step end, B_s(1) = b[s]
                let mut acc = 0.0;
                for (s, ks) in self.k.iter().enumerate() {
                    acc += (self.b[s] - self.weights[s]) * ks[i];
                }
                self.state[i] = self.y_curr[i] - self.h * acc;
            }
        }
    }

    fn interpolated_time(&self) -> Float {
        self.x_interp
    }

    fn interpolated_state(&self) -> &[Float] {
        &self.state
    }

    fn interpolated_derivatives(&self) -> &[Float] {
        &self.derivatives
    }

    fn boxed_clone(&self) -> Box<dyn StepInterpolator> {
        Box::new(self.clone())
    }
}
