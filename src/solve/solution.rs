//! Rich solution type for solve_ivp: sampled data, stats, and dense
//! evaluation helpers.

use crate::{Float, cont::ContinuousOutputModel, status::Status};

/// Rich solution of solve_ivp: sampled data plus basic stats
pub struct IVPSolution {
    pub t: Vec<Float>,
    pub y: Vec<Vec<Float>>,
    pub nfev: usize,
    pub nstep: usize,
    pub naccpt: usize,
    pub nrejct: usize,
    pub status: Status,
    /// Continuous solution, present when dense output was requested.
    pub cont: Option<ContinuousOutputModel>,
}

impl IVPSolution {
    /// Evaluate the continuous solution at a single time.
    /// Returns None if dense output was disabled or `t` is outside the
    /// covered range.
    pub fn sol(&mut self, t: Float) -> Option<Vec<Float>> {
        let cont = self.cont.as_mut()?;
        let (a, b) = (cont.initial_time(), cont.final_time());
        if (t - a) * (t - b) > 0.0 {
            return None;
        }
        cont.set_interpolated_time(t);
        Some(cont.interpolated_state().to_vec())
    }

    /// Time span covered by the dense output if available.
    pub fn sol_span(&self) -> Option<(Float, Float)> {
        let cont = self.cont.as_ref()?;
        Some((cont.initial_time(), cont.final_time()))
    }

    /// Iterate over stored sample pairs (t_i, y_i) from the discrete output.
    pub fn iter(&self) -> impl Iterator<Item = (Float, &[Float])> {
        self.t
            .iter()
            .copied()
            .zip(self.y.iter().map(|y| y.as_slice()))
    }
}
