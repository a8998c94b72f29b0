//! SciPy-like solve_ivp entry point implementation

use crate::{
    Args, Error, Float, ODE, SolOut,
    adams::{adams_bashforth, adams_moulton},
    dp::dop853,
    rk::{euler, gill, higham_hall, midpoint, rk4, three_eighths},
};

use super::{
    options::{IVPOptions, Method},
    solout::DefaultSolOut,
    solution::IVPSolution,
};

/// Solve an initial value problem with SciPy-like options.
///
/// Dispatches on [`Method`], wires the default callback for endpoint
/// recording, `t_eval` sampling and dense-output retention, and returns the
/// sampled data together with the integrator statistics.
pub fn solve_ivp<F, S>(
    f: &F,
    x0: Float,
    xend: Float,
    y0: &[Float],
    mut options: IVPOptions<'_, S>,
) -> Result<IVPSolution, Error>
where
    F: ODE,
    S: SolOut,
{
    let save_endpoints = options
        .save_step_endpoints
        .unwrap_or(options.t_eval.is_none());
    let mut default_solout = DefaultSolOut::new(
        options.t_eval.take(),
        save_endpoints,
        options.dense_output,
        options.solout.take(),
    );

    let args = Args::builder()
        .solout(&mut default_solout)
        .events(std::mem::take(&mut options.events))
        .rtol(options.rtol.clone())
        .atol(options.atol.clone())
        .maybe_h0(options.first_step)
        .maybe_hmax(options.max_step)
        .hmin(options.min_step.unwrap_or(0.0))
        .maybe_nmax(options.nmax)
        .maybe_max_evaluations(options.max_evaluations)
        .build();

    // fixed-step methods fall back to a hundredth of the interval
    let h = options.first_step.unwrap_or((xend - x0) / 100.0);

    let solution = match options.method {
        Method::Euler => euler(f, x0, xend, y0, h, args)?,
        Method::Midpoint => midpoint(f, x0, xend, y0, h, args)?,
        Method::RK4 => rk4(f, x0, xend, y0, h, args)?,
        Method::ThreeEighths => three_eighths(f, x0, xend, y0, h, args)?,
        Method::Gill => gill(f, x0, xend, y0, h, args)?,
        Method::HighamHall => higham_hall(f, x0, xend, y0, args)?,
        Method::DOP853 => dop853(f, x0, xend, y0, args)?,
        Method::AdamsBashforth { n_steps } => adams_bashforth(f, x0, xend, y0, n_steps, args)?,
        Method::AdamsMoulton { n_steps } => adams_moulton(f, x0, xend, y0, n_steps, args)?,
    };

    let (t, y, cont) = default_solout.into_data();
    Ok(IVPSolution {
        t,
        y,
        nfev: solution.nfev,
        nstep: solution.nstep,
        naccpt: solution.naccpt,
        nrejct: solution.nrejct,
        status: solution.status,
        cont,
    })
}
