//! Dense output for the Adams integrators, evaluated from the Nordsieck
//! Taylor form anchored at the step end.

use nalgebra::DMatrix;

use crate::{Float, interpolate::StepInterpolator};

/// Taylor-form interpolator over one Adams step.
///
/// With `xi = (t - x_ref) / h` the state is
/// `y(t) = y_ref + scaled * xi + sum_i nordsieck[i] * xi^(i+2)`,
/// summed from the highest order down. The reference time is the step end,
/// so `xi` is negative inside the step; evaluating at `xi = 1` extrapolates
/// one full step ahead, which is exactly the Adams predictor.
#[derive(Debug, Clone)]
pub struct NordsieckInterpolator {
    x_ref: Float,
    h: Float,
    y_ref: Vec<Float>,
    scaled: Vec<Float>,
    nordsieck: DMatrix<Float>,
    x_interp: Float,
    state: Vec<Float>,
    derivatives: Vec<Float>,
}

impl NordsieckInterpolator {
    pub fn new(
        x_ref: Float,
        h: Float,
        y_ref: &[Float],
        scaled: &[Float],
        nordsieck: &DMatrix<Float>,
    ) -> Self {
        let mut interp = Self {
            x_ref,
            h,
            y_ref: y_ref.to_vec(),
            scaled: scaled.to_vec(),
            nordsieck: nordsieck.clone(),
            x_interp: x_ref,
            state: vec![0.0; y_ref.len()],
            derivatives: vec![0.0; y_ref.len()],
        };
        interp.set_interpolated_time(x_ref);
        interp
    }
}

impl StepInterpolator for NordsieckInterpolator {
    fn previous_time(&self) -> Float {
        self.x_ref - self.h
    }

    fn current_time(&self) -> Float {
        self.x_ref
    }

    fn set_interpolated_time(&mut self, t: Float) {
        self.x_interp = t;
        let x = t - self.x_ref;
        if x == 0.0 {
            // all Taylor terms but the linear one vanish at the anchor
            for j in 0..self.state.len() {
                self.state[j] = self.y_ref[j];
                self.derivatives[j] = self.scaled[j] / self.h;
            }
            return;
        }
        let xi = x / self.h;

        // high order to low order for numerical accuracy
        self.state.iter_mut().for_each(|s| *s = 0.0);
        self.derivatives.iter_mut().for_each(|d| *d = 0.0);
        for i in (0..self.nordsieck.nrows()).rev() {
            let order = i as Float + 2.0;
            let power = xi.powi(i as i32 + 2);
            for j in 0..self.state.len() {
                let d = self.nordsieck[(i, j)] * power;
                self.state[j] += d;
                self.derivatives[j] += order * d;
            }
        }
        for j in 0..self.state.len() {
            self.state[j] += self.y_ref[j] + self.scaled[j] * xi;
            self.derivatives[j] = (self.derivatives[j] + self.scaled[j] * xi) / x;
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
