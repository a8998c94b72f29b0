//! Explicit Runge-Kutta integrators, fixed-step and embedded adaptive.

mod euler;
mod gill;
mod higham_hall;
mod midpoint;
mod rk4;
mod three_eighths;

pub use euler::{EULER, euler};
pub use gill::{GILL, gill};
pub use higham_hall::{HIGHAM_HALL, higham_hall};
pub use midpoint::{MIDPOINT, midpoint};
pub use rk4::{RK4, rk4};
pub use three_eighths::{THREE_EIGHTHS, three_eighths};

use crate::{
    Args, Error, Float, ODE, SolOut,
    butcher::ButcherTableau,
    events::{StepCommand, process_step},
    interpolate::RkStepInterpolator,
    solution::Solution,
    status::Status,
    step_control::StepSizeController,
};

/// Shared fixed-step driver.
///
/// Runs the tableau stage loop with the caller-fixed step `h`, landing
/// exactly on `xend`. No error estimation is performed.
pub(crate) fn integrate_fixed<F, S>(
    f: &F,
    mut x: Float,
    xend: Float,
    y0: &[Float],
    h: Float,
    tableau: &'static ButcherTableau,
    mut args: Args<'_, '_, S>,
) -> Result<Solution, Error>
where
    F: ODE,
    S: SolOut,
{
    if h == 0.0 {
        return Err(Error::InvalidStepSize(h));
    }
    let direction = (xend - x).signum();
    if h.signum() != direction {
        return Err(Error::InvalidStepSize(h));
    }

    let n = y0.len();
    args.atol.check_dimension(n)?;
    args.rtol.check_dimension(n)?;
    let mut y = y0.to_vec();
    let mut y1 = vec![0.0; n];
    let mut yt = vec![0.0; n];
    let mut k = vec![vec![0.0; n]; tableau.stages()];
    let mut solout = args.solout.take();
    let mut events = std::mem::take(&mut args.events);
    let stage_cost = tableau.stages() - 1;
    let mut nfev = 0;
    let mut nstep = 0;
    let mut status = Status::Success;

    f.ode(x, &y, &mut k[0]);
    nfev += 1;

    loop {
        if nstep >= args.nmax {
            status = Status::NeedLargerNmax;
            break;
        }
        if let Some(max) = args.max_evaluations {
            if nfev + stage_cost + 1 > max {
                return Err(Error::MaxEvaluationsExceeded { max });
            }
        }

        // adjust last step to land on xend
        let mut hs = h;
        let mut last = false;
        if (x + 1.01 * h - xend) * direction > 0.0 {
            hs = xend - x;
            last = true;
        }

        tableau.compute_stages(f, x, &y, hs, &mut k, &mut yt);
        tableau.propagate(&y, hs, &k, &mut y1);
        nfev += stage_cost;
        nstep += 1;

        let xold = x;
        x = if last { xend } else { x + hs };

        let mut interp = RkStepInterpolator::new(xold, hs, &y, &y1, &k, tableau);
        y.copy_from_slice(&y1);

        let mut reset = false;
        match process_step(&mut events, &mut solout, &mut interp, &y, last)? {
            StepCommand::Continue => {}
            StepCommand::Modified { x: xm, y: ym } => {
                x = xm;
                y.copy_from_slice(&ym);
            }
            StepCommand::Stop { x: xs, y: ys } => {
                x = xs;
                y.copy_from_slice(&ys);
                status = Status::Interrupted;
                break;
            }
            StepCommand::Reset { x: xs, y: ys } => {
                x = xs;
                y.copy_from_slice(&ys);
                reset = true;
            }
        }

        if last && !reset {
            break;
        }

        // derivative at the new point is stage 0 of the next step
        f.ode(x, &y, &mut k[0]);
        nfev += 1;
    }

    Ok(Solution::new(x, &y, h, nfev, nstep, nstep, 0, status))
}

/// Shared embedded adaptive driver.
///
/// Drives the tableau stage loop with step-size control: each attempted step
/// is accepted when its normalized embedded error estimate is below 1, else
/// the step is shrunk and retried without advancing time.
pub(crate) fn integrate_adaptive<F, S>(
    f: &F,
    mut x: Float,
    xend: Float,
    y0: &[Float],
    tableau: &'static ButcherTableau,
    mut args: Args<'_, '_, S>,
) -> Result<Solution, Error>
where
    F: ODE,
    S: SolOut,
{
    if args.safety_factor >= 1.0 || args.safety_factor <= 1e-4 {
        return Err(Error::SafetyFactorOutOfRange(args.safety_factor));
    }
    if args.uround <= 1e-35 || args.uround >= 1.0 {
        return Err(Error::URoundOutOfRange(args.uround));
    }

    let n = y0.len();
    args.atol.check_dimension(n)?;
    args.rtol.check_dimension(n)?;
    let n_err = args.error_dimension.unwrap_or(n).min(n);
    let posneg = (xend - x).signum();
    let forward = posneg > 0.0;
    let controller = StepSizeController::new(
        args.hmin,
        args.hmax.unwrap_or((xend - x).abs()),
        tableau.order,
        args.safety_factor,
        args.scale_min.unwrap_or(0.2),
        args.scale_max.unwrap_or(10.0),
    );

    let mut y = y0.to_vec();
    let mut y1 = vec![0.0; n];
    let mut yt = vec![0.0; n];
    let mut k = vec![vec![0.0; n]; tableau.stages()];
    let mut solout = args.solout.take();
    let mut events = std::mem::take(&mut args.events);
    let stage_cost = tableau.stages() - 1;
    let mut nfev = 0;
    let mut nstep = 0;
    let mut naccpt = 0;
    let mut nrejct = 0;
    let mut status = Status::Success;

    f.ode(x, &y, &mut k[0]);
    nfev += 1;

    let mut h = match args.h0 {
        Some(h0) => {
            if h0 == 0.0 || h0.signum() != posneg {
                return Err(Error::InvalidStepSize(h0));
            }
            h0
        }
        None => {
            nfev += 1;
            controller.initialize_step(
                f,
                x,
                &y,
                posneg,
                &k[0],
                tableau.order,
                &args.atol,
                &args.rtol,
            )
        }
    };

    let mut rejected = false;
    loop {
        if nstep >= args.nmax {
            status = Status::NeedLargerNmax;
            break;
        }
        // check for underflow due to machine rounding
        if 0.1 * h.abs() <= x.abs() * args.uround {
            return Err(Error::StepTooSmall {
                h: h.abs(),
                min_step: x.abs() * args.uround,
            });
        }
        if let Some(max) = args.max_evaluations {
            if nfev + stage_cost + 1 > max {
                return Err(Error::MaxEvaluationsExceeded { max });
            }
        }

        // adjust last step to land on xend
        let mut last = false;
        if (x + 1.01 * h - xend) * posneg > 0.0 {
            h = xend - x;
            last = true;
        }
        let hs = h;

        tableau.compute_stages(f, x, &y, hs, &mut k, &mut yt);
        tableau.propagate(&y, hs, &k, &mut y1);
        nfev += stage_cost;
        nstep += 1;

        let scale = StepSizeController::error_scale(&y, &y1, &args.atol, &args.rtol);
        let err = tableau.estimate_error(hs, &k, &scale, n_err);

        if err >= 1.0 {
            // step rejected, retry the same interval with a smaller step
            log::trace!("step rejected at x = {} (h = {}, err = {})", x, hs, err);
            h = controller.filter_step(hs * controller.grow_shrink(err), forward, false)?;
            if naccpt >= 1 {
                nrejct += 1;
            }
            rejected = true;
            continue;
        }

        // step accepted
        naccpt += 1;
        let xold = x;
        x = if last { xend } else { x + hs };

        let mut interp = RkStepInterpolator::new(xold, hs, &y, &y1, &k, tableau);
        y.copy_from_slice(&y1);

        let mut fresh_derivative_needed = true;
        let mut reset = false;
        match process_step(&mut events, &mut solout, &mut interp, &y, last)? {
            StepCommand::Continue => fresh_derivative_needed = !tableau.fsal,
            StepCommand::Modified { x: xm, y: ym } => {
                x = xm;
                y.copy_from_slice(&ym);
            }
            StepCommand::Stop { x: xs, y: ys } => {
                x = xs;
                y.copy_from_slice(&ys);
                status = Status::Interrupted;
                break;
            }
            StepCommand::Reset { x: xs, y: ys } => {
                x = xs;
                y.copy_from_slice(&ys);
                reset = true;
            }
        }

        if last && !reset {
            break;
        }

        if fresh_derivative_needed {
            f.ode(x, &y, &mut k[0]);
            nfev += 1;
        } else {
            let (head, tail) = k.split_at_mut(1);
            head[0].copy_from_slice(&tail[tail.len() - 1]);
        }

        // next trial step; growth is suppressed right after a rejection
        let mut hnew =
            controller.filter_step(hs * controller.grow_shrink(err), forward, last)?;
        if rejected {
            hnew = posneg * hnew.abs().min(hs.abs());
            rejected = false;
        }
        h = hnew;
    }

    Ok(Solution::new(x, &y, h, nfev, nstep, naccpt, nrejct, status))
}
