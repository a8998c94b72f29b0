//! Step-size control shared by the single-step and multistep integrators.

use crate::{Error, Float, ode::ODE, tolerance::Tolerance};

/// Accept/reject decisions and trial step sizes from local error estimates.
///
/// The controller is purely numeric state: the integrators feed it the
/// normalized error of each attempted step and it answers with the next
/// trial step size, clamped to `[min_step, max_step]` in magnitude and to
/// `[scale_min, scale_max]` in relative change.
#[derive(Clone, Debug)]
pub struct StepSizeController {
    /// Minimal step size magnitude.
    pub min_step: Float,
    /// Maximal step size magnitude.
    pub max_step: Float,
    /// Safety factor applied to the grow/shrink factor. Default is 0.9.
    pub safety: Float,
    /// Smallest allowed shrink ratio hnew/hold.
    pub scale_min: Float,
    /// Largest allowed growth ratio hnew/hold.
    pub scale_max: Float,
    /// Error exponent, -1 / order of the method.
    pub exponent: Float,
}

impl StepSizeController {
    pub fn new(
        min_step: Float,
        max_step: Float,
        order: usize,
        safety: Float,
        scale_min: Float,
        scale_max: Float,
    ) -> Self {
        Self {
            min_step: min_step.abs(),
            max_step: max_step.abs(),
            safety,
            scale_min,
            scale_max,
            exponent: -1.0 / order as Float,
        }
    }

    /// Per-component error normalization scale:
    /// `tol_i = atol_i + rtol_i * max(|y_start_i|, |y_end_i|)`.
    pub fn error_scale(
        y_start: &[Float],
        y_end: &[Float],
        atol: &Tolerance,
        rtol: &Tolerance,
    ) -> Vec<Float> {
        (0..y_start.len())
            .map(|i| atol[i] + rtol[i] * y_start[i].abs().max(y_end[i].abs()))
            .collect()
    }

    /// Compute an initial step size guess.
    ///
    /// Performs one explicit Euler probe to estimate the second derivative,
    /// then bounds the result so that
    /// `h^order * max(|y'/tol|, |y''/tol|) ~= 0.01`. Costs one derivative
    /// evaluation; the caller accounts for it.
    pub fn initialize_step<F>(
        &self,
        f: &F,
        x: Float,
        y: &[Float],
        posneg: Float,
        f0: &[Float],
        order: usize,
        atol: &Tolerance,
        rtol: &Tolerance,
    ) -> Float
    where
        F: ODE,
    {
        let n = y.len();
        let mut dnf: Float = 0.0;
        let mut dny: Float = 0.0;

        for i in 0..n {
            let sk = atol[i] + rtol[i] * y[i].abs();
            dnf += (f0[i] / sk) * (f0[i] / sk);
            dny += (y[i] / sk) * (y[i] / sk);
        }

        let mut h: Float;
        if dnf <= 1e-10 || dny <= 1e-10 {
            h = 1.0e-6;
        } else {
            h = (dny / dnf).sqrt() * 0.01;
        }
        h = h.min(self.max_step);
        h = h.abs() * posneg.signum();

        // Explicit Euler step: y1 = y + h * f0
        let mut y1 = vec![0.0; n];
        let mut f1 = vec![0.0; n];
        for i in 0..n {
            y1[i] = y[i] + h * f0[i];
        }
        f.ode(x + h, &y1, &mut f1);

        // Estimate second derivative
        let mut der2: Float = 0.0;
        for i in 0..n {
            let sk = atol[i] + rtol[i] * y[i].abs();
            let df = (f1[i] - f0[i]) / sk;
            der2 += df * df;
        }
        der2 = der2.sqrt() / h.abs();

        let der12 = der2.abs().max(dnf.sqrt());
        let h1: Float;
        if der12 <= 1.0e-15 {
            h1 = (1.0e-6 as Float).max(h.abs() * 1.0e-3);
        } else {
            h1 = (0.01 / der12).powf(1.0 / order as Float);
        }

        let h_final = (100.0 * h.abs())
            .min(h1)
            .min(self.max_step)
            .max(self.min_step);
        h_final.abs() * posneg.signum()
    }

    /// Clamp a trial step to the configured bounds.
    ///
    /// A step below `min_step` either fails or is silently promoted to
    /// `min_step`, depending on `accept_small`; promotion is used near the
    /// integration end to avoid spurious tiny final steps.
    pub fn filter_step(&self, h: Float, forward: bool, accept_small: bool) -> Result<Float, Error> {
        let mut filtered = h;
        if h.abs() < self.min_step {
            if accept_small {
                filtered = if forward { self.min_step } else { -self.min_step };
            } else {
                return Err(Error::StepTooSmall {
                    h: h.abs(),
                    min_step: self.min_step,
                });
            }
        }
        if filtered > self.max_step {
            filtered = self.max_step;
        } else if filtered < -self.max_step {
            filtered = -self.max_step;
        }
        Ok(filtered)
    }

    /// Step change factor from a normalized error estimate:
    /// `clamp(safety * error^exponent, scale_min, scale_max)`.
    pub fn grow_shrink(&self, error: Float) -> Float {
        (self.safety * error.powf(self.exponent))
            .min(self.scale_max)
            .max(self.scale_min)
    }
}
