//! Adams multistep integrators (explicit Bashforth, implicit Moulton PECE)
//! on the Nordsieck representation, with a single-step starter.

mod bashforth;
mod interpolator;
mod moulton;
mod transformer;

pub use bashforth::adams_bashforth;
pub use interpolator::NordsieckInterpolator;
pub use moulton::adams_moulton;
pub use transformer::NordsieckTransformer;

use nalgebra::DMatrix;

use crate::{
    Args, ControlFlag, Error, Float, ODE, SolOut,
    dp::dop853,
    events::EventHandler,
    interpolate::StepInterpolator,
    solution::Solution,
    tolerance::Tolerance,
};

/// Owned multistep history between two steps.
///
/// `scaled` is `h * y'` at `step_start` and `nordsieck` holds the scaled
/// higher derivatives `[h^2/2 y'', h^3/6 y''', ...]`, one state component
/// per column. The integrators advance this state; interpolators get their
/// own copies of it.
pub(crate) struct MultistepState {
    pub step_start: Float,
    pub h: Float,
    pub y: Vec<Float>,
    pub scaled: Vec<Float>,
    pub nordsieck: DMatrix<Float>,
}

impl MultistepState {
    /// Change the step size the history is scaled for: the first derivative
    /// picks up one factor of the ratio, row `i` of the Nordsieck matrix
    /// picks up `ratio^(i+2)`.
    pub fn rescale(&mut self, h_new: Float) {
        let ratio = h_new / self.h;
        for s in &mut self.scaled {
            *s *= ratio;
        }
        let mut power = ratio * ratio;
        for i in 0..self.nordsieck.nrows() {
            for j in 0..self.nordsieck.ncols() {
                self.nordsieck[(i, j)] *= power;
            }
            power *= ratio;
        }
        self.h = h_new;
    }

    /// Adams predictor: the Nordsieck Taylor form extrapolated one full
    /// step past the anchor.
    pub fn predict_at_end(&self) -> Vec<Float> {
        let mut interp = NordsieckInterpolator::new(
            self.step_start,
            self.h,
            &self.y,
            &self.scaled,
            &self.nordsieck,
        );
        interp.set_interpolated_time(self.step_start + self.h);
        interp.interpolated_state().to_vec()
    }
}

/// Outcome of the start-up phase.
pub(crate) enum Bootstrap {
    /// The starter hit the end of the interval before gathering enough
    /// samples; its solution is the final one.
    Completed(Solution),
    /// History assembled; the second field is the number of derivative
    /// evaluations the starter spent.
    Started(MultistepState, usize),
}

/// Callback collecting start-up samples from the starter integrator.
///
/// Gathers `needed` samples of `(t, y, y')` at accepted step boundaries and
/// interrupts the starter once it has them.
struct StartupCollector {
    t: Vec<Float>,
    y: Vec<Vec<Float>>,
    y_dot: Vec<Vec<Float>>,
    needed: usize,
}

impl StartupCollector {
    fn new(needed: usize) -> Self {
        Self {
            t: Vec::with_capacity(needed),
            y: Vec::with_capacity(needed),
            y_dot: Vec::with_capacity(needed),
            needed,
        }
    }

    fn record(&mut self, t: Float, interpolator: &mut dyn StepInterpolator) {
        interpolator.set_interpolated_time(t);
        self.t.push(t);
        self.y.push(interpolator.interpolated_state().to_vec());
        self.y_dot.push(interpolator.interpolated_derivatives().to_vec());
    }
}

impl SolOut for StartupCollector {
    fn solout(
        &mut self,
        xold: Float,
        x: Float,
        _y: &[Float],
        interpolator: &mut dyn StepInterpolator,
        _is_last: bool,
    ) -> ControlFlag {
        if self.t.is_empty() {
            // first accepted step also contributes its left end
            self.record(xold, interpolator);
        }
        self.record(x, interpolator);
        if self.t.len() >= self.needed {
            ControlFlag::Interrupt
        } else {
            ControlFlag::Continue
        }
    }
}

/// Run the starter integrator from `(x, y0)` and assemble the Nordsieck
/// history from its first `n_steps + 1` sample points.
///
/// The starter is DOP853 at tolerances tightened by a factor 100, so the
/// start-up samples do not dominate the multistep error. The main loop
/// resumes from the first sample, which is `(x, y0)` itself.
#[allow(clippy::too_many_arguments)]
pub(crate) fn bootstrap<F>(
    f: &F,
    transformer: &NordsieckTransformer,
    x: Float,
    xend: Float,
    y0: &[Float],
    atol: &Tolerance,
    rtol: &Tolerance,
    hmin: Float,
    hmax: Option<Float>,
    nmax: usize,
    max_evaluations: Option<usize>,
) -> Result<Bootstrap, Error>
where
    F: ODE,
{
    let n_steps = transformer.n_steps();
    let mut collector = StartupCollector::new(n_steps + 1);
    let starter_args = Args::builder()
        .solout(&mut collector)
        .atol(atol.scaled(0.01))
        .rtol(rtol.scaled(0.01))
        .hmin(hmin)
        .maybe_hmax(hmax)
        .nmax(nmax)
        .maybe_max_evaluations(max_evaluations)
        .build();
    let solution = dop853(f, x, xend, y0, starter_args)?;

    if collector.t.len() < collector.needed {
        // interval exhausted during start-up, the starter solution is final
        return Ok(Bootstrap::Completed(solution));
    }

    let last = collector.t.len() - 1;
    let h = (collector.t[last] - collector.t[0]) / last as Float;
    log::debug!(
        "multistep start-up complete: {} samples on [{}, {}], h = {}",
        collector.t.len(),
        collector.t[0],
        collector.t[last],
        h
    );

    let scaled: Vec<Float> = collector.y_dot[0].iter().map(|d| h * d).collect();
    let nordsieck = transformer.initialize_high_order_derivatives(
        h,
        &collector.t,
        &collector.y,
        &collector.y_dot,
    )?;

    Ok(Bootstrap::Started(
        MultistepState {
            step_start: collector.t[0],
            h,
            y: collector.y[0].clone(),
            scaled,
            nordsieck,
        },
        solution.nfev,
    ))
}

/// Interval too short for a full start-up window: integrate the remainder
/// with the starter method at the caller's own tolerances, forwarding the
/// callback and the event handlers so every accepted step is still observed.
pub(crate) fn starter_fallback<F, S>(
    f: &F,
    x: Float,
    xend: Float,
    y0: &[Float],
    solout: Option<&mut S>,
    events: Vec<&mut dyn EventHandler>,
    args: &Args<'_, '_, S>,
) -> Result<Solution, Error>
where
    F: ODE,
    S: SolOut,
{
    log::debug!(
        "interval [{}, {}] too short for multistep start-up, finishing with the starter",
        x,
        xend
    );
    let fallback_args = Args::builder()
        .maybe_solout(solout)
        .events(events)
        .rtol(args.rtol.clone())
        .atol(args.atol.clone())
        .maybe_h0(args.h0)
        .maybe_hmax(args.hmax)
        .hmin(args.hmin)
        .nmax(args.nmax)
        .maybe_max_evaluations(args.max_evaluations)
        .safety_factor(args.safety_factor)
        .beta(args.beta)
        .uround(args.uround)
        .nstiff(args.nstiff)
        .maybe_error_dimension(args.error_dimension)
        .build();
    dop853(f, x, xend, y0, fallback_args)
}
