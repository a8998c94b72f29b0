//! Continuous output: retained dense output over a whole integration.

use crate::{
    ControlFlag, Error, Float,
    interpolate::StepInterpolator,
    solout::SolOut,
};

/// Random-access dense output over a full integration range.
///
/// The model collects an owned copy of every accepted step's interpolator.
/// Passed as the solution callback of an integrator it records the run as it
/// happens; afterwards [`ContinuousOutputModel::set_interpolated_time`]
/// positions a cursor anywhere in the covered range (queries slightly
/// outside the range extrapolate through the boundary steps) and the state
/// accessors answer from the step containing it.
///
/// Lookup cost is kept low for the common call patterns: the answering step
/// index is cached, nearby queries resolve immediately, and arbitrary jumps
/// use an inverse-quadratic estimate of the target index with a guaranteed
/// fraction of the remaining range eliminated per round.
pub struct ContinuousOutputModel {
    initial_time: Float,
    final_time: Float,
    forward: bool,
    index: usize,
    steps: Vec<Box<dyn StepInterpolator>>,
}

impl Default for ContinuousOutputModel {
    fn default() -> Self {
        Self::new()
    }
}

impl ContinuousOutputModel {
    pub fn new() -> Self {
        Self {
            initial_time: Float::NAN,
            final_time: Float::NAN,
            forward: true,
            index: 0,
            steps: Vec::new(),
        }
    }

    /// Start of the covered range.
    pub fn initial_time(&self) -> Float {
        self.initial_time
    }

    /// End of the covered range.
    pub fn final_time(&self) -> Float {
        self.final_time
    }

    /// Record one accepted step.
    pub fn handle_step(&mut self, interpolator: &dyn StepInterpolator, is_last: bool) {
        if self.steps.is_empty() {
            self.initial_time = interpolator.previous_time();
            self.forward = interpolator.is_forward();
        }
        self.steps.push(interpolator.boxed_clone());
        if is_last {
            self.final_time = interpolator.current_time();
            self.index = self.steps.len() - 1;
        }
    }

    /// Append another model covering the continuation of this one's range.
    pub fn append(&mut self, other: &ContinuousOutputModel) -> Result<(), Error> {
        if other.steps.is_empty() {
            return Ok(());
        }

        if self.steps.is_empty() {
            self.initial_time = other.initial_time;
            self.forward = other.forward;
        } else {
            let dim = self.steps[0].interpolated_state().len();
            let other_dim = other.steps[0].interpolated_state().len();
            if dim != other_dim {
                return Err(Error::DimensionMismatch {
                    expected: dim,
                    actual: other_dim,
                });
            }
            if self.forward != other.forward {
                return Err(Error::DirectionMismatch);
            }
            let last = &self.steps[self.index];
            let step = last.current_time() - last.previous_time();
            let gap = other.initial_time - last.current_time();
            let tolerance = 1.0e-3 * step.abs();
            if gap.abs() > tolerance {
                return Err(Error::ModelGap {
                    gap: gap.abs(),
                    tolerance,
                });
            }
        }

        for interpolator in &other.steps {
            self.steps.push(interpolator.boxed_clone());
        }
        self.index = self.steps.len() - 1;
        self.final_time = self.steps[self.index].current_time();
        Ok(())
    }

    /// Position the cursor. Queries outside the covered range are answered
    /// by extrapolating through the nearest boundary step.
    pub fn set_interpolated_time(&mut self, time: Float) {
        if self.steps.is_empty() {
            return;
        }

        // boundary intervals (and everything beyond them) answer directly
        let mut i_min = 0;
        let mut i_max = self.steps.len() - 1;
        if self.locate_point(time, i_min) <= 0 {
            self.index = i_min;
            self.steps[i_min].set_interpolated_time(time);
            return;
        }
        if self.locate_point(time, i_max) >= 0 {
            self.index = i_max;
            self.steps[i_max].set_interpolated_time(time);
            return;
        }

        let mut t_min = self.midpoint(i_min);
        let mut t_max = self.midpoint(i_max);

        // narrow the candidate slice, probing the cached index first
        while i_max - i_min > 5 {
            match self.locate_point(time, self.index) {
                0 => {
                    self.steps[self.index].set_interpolated_time(time);
                    return;
                }
                loc if loc < 0 => {
                    i_max = self.index;
                    t_max = self.midpoint(i_max);
                }
                _ => {
                    i_min = self.index;
                    t_min = self.midpoint(i_min);
                }
            }

            let i_med = (i_min + i_max) / 2;
            let t_med = self.midpoint(i_med);

            let estimate = if (t_med - t_min).abs() < 1e-6 || (t_max - t_med).abs() < 1e-6 {
                // midpoints too close together for the quadratic estimate
                i_med as Float
            } else {
                // inverse quadratic interpolation of index as a function of
                // time through the three known (time, index) pairs
                let d12 = t_max - t_med;
                let d23 = t_med - t_min;
                let d13 = t_max - t_min;
                let dt1 = time - t_max;
                let dt2 = time - t_med;
                let dt3 = time - t_min;
                ((dt2 * dt3 * d23) * i_max as Float - (dt1 * dt3 * d13) * i_med as Float
                    + (dt1 * dt2 * d12) * i_min as Float)
                    / (d12 * d13 * d23)
            };
            let mut index = estimate.round() as isize;

            // force at least a tenth of the slice to be eliminated
            let low = (i_min + 1).max((9 * i_min + i_max) / 10) as isize;
            let high = (i_max - 1).min((i_min + 9 * i_max) / 10) as isize;
            if index < low {
                index = low;
            } else if index > high {
                index = high;
            }
            self.index = index as usize;
        }

        // small slice, linear scan
        self.index = i_min;
        while self.index <= i_max && self.locate_point(time, self.index) > 0 {
            self.index += 1;
        }
        self.steps[self.index].set_interpolated_time(time);
    }

    /// Cursor time of the answering step.
    pub fn interpolated_time(&self) -> Float {
        match self.steps.get(self.index) {
            Some(step) => step.interpolated_time(),
            None => Float::NAN,
        }
    }

    /// State at the cursor time.
    pub fn interpolated_state(&self) -> &[Float] {
        match self.steps.get(self.index) {
            Some(step) => step.interpolated_state(),
            None => &[],
        }
    }

    /// Time derivative of the state at the cursor time.
    pub fn interpolated_derivatives(&self) -> &[Float] {
        match self.steps.get(self.index) {
            Some(step) => step.interpolated_derivatives(),
            None => &[],
        }
    }

    fn midpoint(&self, i: usize) -> Float {
        0.5 * (self.steps[i].previous_time() + self.steps[i].current_time())
    }

    /// -1 when `time` is before the step `i`, +1 when after, 0 inside,
    /// in propagation order.
    fn locate_point(&self, time: Float, i: usize) -> i32 {
        let step = &self.steps[i];
        if self.forward {
            if time < step.previous_time() {
                -1
            } else if time > step.current_time() {
                1
            } else {
                0
            }
        } else if time > step.previous_time() {
            -1
        } else if time < step.current_time() {
            1
        } else {
            0
        }
    }
}

impl SolOut for ContinuousOutputModel {
    fn solout(
        &mut self,
        _xold: Float,
        _x: Float,
        _y: &[Float],
        interpolator: &mut dyn StepInterpolator,
        is_last: bool,
    ) -> ControlFlag {
        self.handle_step(interpolator, is_last);
        ControlFlag::Continue
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpolate::RkStepInterpolator;
    use crate::rk;
    use approx::assert_relative_eq;

    // y = t^2 split into unit midpoint steps: each interpolator is exact
    fn quadratic_model(from: Float, n: usize) -> ContinuousOutputModel {
        let mut model = ContinuousOutputModel::new();
        for i in 0..n {
            let a = from + i as Float;
            let b = a + 1.0;
            let k = vec![vec![2.0 * a], vec![2.0 * a + 1.0]];
            let interp =
                RkStepInterpolator::new(a, 1.0, &[a * a], &[b * b], &k, &rk::MIDPOINT);
            model.handle_step(&interp, i == n - 1);
        }
        model
    }

    #[test]
    fn records_range_from_steps() {
        let model = quadratic_model(0.0, 10);
        assert_relative_eq!(model.initial_time(), 0.0);
        assert_relative_eq!(model.final_time(), 10.0);
    }

    #[test]
    fn queries_match_direct_interpolation() {
        let mut model = quadratic_model(0.0, 20);
        for k in 0..200 {
            let t = 0.05 + k as Float * 0.0997;
            model.set_interpolated_time(t);
            assert_relative_eq!(model.interpolated_state()[0], t * t, epsilon = 1e-10);
            assert_relative_eq!(
                model.interpolated_derivatives()[0],
                2.0 * t,
                epsilon = 1e-10
            );
        }
    }

    #[test]
    fn random_jumps_reuse_cached_index() {
        let mut model = quadratic_model(0.0, 50);
        for &t in &[42.3, 1.7, 33.0, 33.1, 0.2, 49.9, 25.0] {
            model.set_interpolated_time(t);
            assert_relative_eq!(model.interpolated_state()[0], t * t, epsilon = 1e-9);
        }
    }

    #[test]
    fn boundary_extrapolation_does_not_fail() {
        let mut model = quadratic_model(0.0, 5);
        model.set_interpolated_time(-0.5);
        assert_relative_eq!(model.interpolated_state()[0], 0.25, epsilon = 1e-10);
        model.set_interpolated_time(5.5);
        assert_relative_eq!(model.interpolated_state()[0], 30.25, epsilon = 1e-10);
    }

    #[test]
    fn append_extends_the_range() {
        let mut first = quadratic_model(0.0, 5);
        let second = quadratic_model(5.0, 5);
        first.append(&second).unwrap();
        assert_relative_eq!(first.final_time(), 10.0);
        first.set_interpolated_time(7.25);
        assert_relative_eq!(first.interpolated_state()[0], 7.25 * 7.25, epsilon = 1e-10);
    }

    #[test]
    fn append_rejects_a_gap() {
        let mut first = quadratic_model(0.0, 5);
        let second = quadratic_model(7.0, 3);
        match first.append(&second) {
            Err(Error::ModelGap { gap, .. }) => assert_relative_eq!(gap, 2.0),
            other => panic!("expected ModelGap, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn append_rejects_dimension_mismatch() {
        let mut first = quadratic_model(0.0, 2);
        let mut second = ContinuousOutputModel::new();
        let k = vec![vec![1.0, 1.0]];
        let interp =
            RkStepInterpolator::new(2.0, 1.0, &[0.0, 0.0], &[1.0, 1.0], &k, &rk::EULER);
        second.handle_step(&interp, true);
        assert!(matches!(
            first.append(&second),
            Err(Error::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn append_rejects_direction_mismatch() {
        let mut first = quadratic_model(0.0, 2);
        let mut second = ContinuousOutputModel::new();
        // a backward step starting where the first model ends
        let interp = RkStepInterpolator::new(3.0, -1.0, &[9.0], &[4.0], &[vec![5.0]], &rk::EULER);
        second.handle_step(&interp, true);
        assert!(matches!(
            first.append(&second),
            Err(Error::DirectionMismatch)
        ));
    }
}
