//! A struct representing the outputted result of a numerical integrator.

use crate::{Float, status::Status};

#[derive(Clone, Debug)]
pub struct Solution {
    /// Final abscissa reached by the integration.
    pub x: Float,
    /// State at `x`.
    pub y: Vec<Float>,
    /// Last step size used (signed).
    pub h: Float,
    /// Number of derivative evaluations.
    pub nfev: usize,
    /// Number of attempted steps.
    pub nstep: usize,
    /// Number of accepted steps.
    pub naccpt: usize,
    /// Number of rejected steps.
    pub nrejct: usize,
    pub status: Status,
}

impl Solution {
    pub fn new(
        x: Float,
        y: &[Float],
        h: Float,
        nfev: usize,
        nstep: usize,
        naccpt: usize,
        nrejct: usize,
        status: Status,
    ) -> Self {
        Self {
            x,
            y: y.to_vec(),
            h,
            nfev,
            nstep,
            naccpt,
            nrejct,
            status,
        }
    }
}
