//! Default SolOut for solve_ivp: endpoint recording, t_eval sampling through
//! dense output, optional retained continuous output, user-callback wrapping.

use crate::{
    ControlFlag, Float,
    cont::ContinuousOutputModel,
    interpolate::StepInterpolator,
    solout::SolOut,
};

pub struct DefaultSolOut<'a, S: SolOut> {
    t_eval: Option<Vec<Float>>,
    save_endpoints: bool,
    next_idx: usize,
    started: bool,
    tol: Float,
    t: Vec<Float>,
    y: Vec<Vec<Float>>,
    cont: Option<ContinuousOutputModel>,
    user: Option<&'a mut S>,
}

impl<'a, S: SolOut> DefaultSolOut<'a, S> {
    pub fn new(
        t_eval: Option<Vec<Float>>,
        save_endpoints: bool,
        dense_output: bool,
        user: Option<&'a mut S>,
    ) -> Self {
        Self {
            t_eval,
            save_endpoints,
            next_idx: 0,
            started: false,
            tol: 1e-12,
            t: Vec::new(),
            y: Vec::new(),
            cont: dense_output.then(ContinuousOutputModel::new),
            user,
        }
    }

    pub fn into_data(self) -> (Vec<Float>, Vec<Vec<Float>>, Option<ContinuousOutputModel>) {
        (self.t, self.y, self.cont)
    }
}

impl<'a, S: SolOut> SolOut for DefaultSolOut<'a, S> {
    fn solout(
        &mut self,
        xold: Float,
        x: Float,
        y: &[Float],
        interpolator: &mut dyn StepInterpolator,
        is_last: bool,
    ) -> ControlFlag {
        let first_step = !self.started;
        self.started = true;
        let posneg = if interpolator.is_forward() { 1.0 } else { -1.0 };

        // record endpoints; the first accepted step also contributes its
        // left end, which is the initial point of the integration
        if self.save_endpoints {
            if first_step {
                interpolator.set_interpolated_time(xold);
                self.t.push(xold);
                self.y.push(interpolator.interpolated_state().to_vec());
            }
            self.t.push(x);
            self.y.push(y.to_vec());
        }

        // sample requested points inside [xold, x] through dense output
        if let Some(te) = &self.t_eval {
            let mut i = self.next_idx;
            let lower = if first_step { xold } else { xold + posneg * self.tol };
            while i < te.len() && (te[i] - x) * posneg <= self.tol {
                if (te[i] - lower) * posneg >= -self.tol {
                    interpolator.set_interpolated_time(te[i]);
                    self.t.push(te[i]);
                    self.y.push(interpolator.interpolated_state().to_vec());
                }
                i += 1;
            }
            self.next_idx = i;
        }

        if let Some(cont) = self.cont.as_mut() {
            cont.handle_step(interpolator, is_last);
        }

        // forward to the user callback if any
        if let Some(user) = self.user.as_deref_mut() {
            return user.solout(xold, x, y, interpolator, is_last);
        }

        ControlFlag::Continue
    }
}
