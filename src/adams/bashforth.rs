//! Adams-Bashforth explicit multistep integrator.

use nalgebra::DMatrix;

use super::{Bootstrap, NordsieckInterpolator, NordsieckTransformer, bootstrap, starter_fallback};
use crate::{
    Args, Error, Float, ODE, SolOut,
    events::{StepCommand, process_step},
    solution::Solution,
    status::Status,
    step_control::StepSizeController,
    tolerance::Tolerance,
};

/// Adams-Bashforth explicit multistep integrator of order `n_steps`.
///
/// A single-step start-up phase (DOP853 at tightened tolerances) assembles
/// the Nordsieck history, then each step costs one derivative evaluation:
/// predict by Taylor extrapolation, evaluate at the predicted point, update
/// the history. The local error is estimated from the difference between
/// the two-sided Taylor evaluations of the updated history.
pub fn adams_bashforth<F, S>(
    f: &F,
    x0: Float,
    xend: Float,
    y0: &[Float],
    n_steps: usize,
    mut args: Args<'_, '_, S>,
) -> Result<Solution, Error>
where
    F: ODE,
    S: SolOut,
{
    if n_steps < 2 {
        return Err(Error::NStepsTooSmall(n_steps));
    }
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
    let posneg = (xend - x0).signum();
    let forward = posneg > 0.0;
    let transformer = NordsieckTransformer::get_instance(n_steps)?;
    let controller = StepSizeController::new(
        args.hmin,
        args.hmax.unwrap_or((xend - x0).abs()),
        n_steps,
        args.safety_factor,
        args.scale_min.unwrap_or(0.2),
        args.scale_max.unwrap_or(10.0),
    );

    let mut solout = args.solout.take();
    let mut events = std::mem::take(&mut args.events);
    let mut y_dot = vec![0.0; n];
    let mut nfev = 0;
    let mut nstep = 0;
    let mut naccpt = 0;
    let mut nrejct = 0;
    let mut status = Status::Success;

    let mut state = match bootstrap(
        f,
        &transformer,
        x0,
        xend,
        y0,
        &args.atol,
        &args.rtol,
        args.hmin,
        args.hmax,
        args.nmax,
        args.max_evaluations,
    )? {
        Bootstrap::Completed(starter) => {
            let mut solution =
                starter_fallback(f, x0, xend, y0, solout.take(), events, &args)?;
            solution.nfev += starter.nfev;
            return Ok(solution);
        }
        Bootstrap::Started(state, cost) => {
            nfev += cost;
            state
        }
    };

    loop {
        if nstep >= args.nmax {
            status = Status::NeedLargerNmax;
            break;
        }
        // check for underflow due to machine rounding
        if 0.1 * state.h.abs() <= state.step_start.abs() * args.uround {
            return Err(Error::StepTooSmall {
                h: state.h.abs(),
                min_step: state.step_start.abs() * args.uround,
            });
        }
        if let Some(max) = args.max_evaluations {
            if nfev + 1 > max {
                return Err(Error::MaxEvaluationsExceeded { max });
            }
        }

        // adjust last step to land on xend
        let mut last = false;
        if (state.step_start + 1.01 * state.h - xend) * posneg > 0.0 {
            state.rescale(xend - state.step_start);
            last = true;
        }

        nstep += 1;

        // predict and evaluate at the step end
        let step_end = state.step_start + state.h;
        let predicted = state.predict_at_end();
        f.ode(step_end, &predicted, &mut y_dot);
        nfev += 1;

        // updated history at the step end
        let predicted_scaled: Vec<Float> = y_dot.iter().map(|d| state.h * d).collect();
        let mut predicted_nordsieck =
            transformer.update_high_order_derivatives_phase1(&state.nordsieck);
        transformer.update_high_order_derivatives_phase2(
            &state.scaled,
            &predicted_scaled,
            &mut predicted_nordsieck,
        );

        let error = error_estimation(
            &state.y,
            &predicted,
            &predicted_scaled,
            &predicted_nordsieck,
            n_err,
            &args.atol,
            &args.rtol,
        );

        if error >= 1.0 {
            // step rejected, retry from the same start with a smaller step
            log::trace!(
                "step rejected at x = {} (h = {}, err = {})",
                state.step_start,
                state.h,
                error
            );
            if naccpt >= 1 {
                nrejct += 1;
            }
            let h_new =
                controller.filter_step(state.h * controller.grow_shrink(error), forward, false)?;
            state.rescale(h_new);
            continue;
        }

        // step accepted: the predicted history becomes the current one
        naccpt += 1;
        state.step_start = step_end;
        state.y = predicted;
        state.scaled = predicted_scaled;
        state.nordsieck = predicted_nordsieck;

        let mut interp = NordsieckInterpolator::new(
            state.step_start,
            state.h,
            &state.y,
            &state.scaled,
            &state.nordsieck,
        );
        let mut reset = false;
        match process_step(&mut events, &mut solout, &mut interp, &state.y, last)? {
            StepCommand::Continue => {}
            StepCommand::Stop { x: xs, y: ys } => {
                state.step_start = xs;
                state.y = ys;
                status = Status::Interrupted;
                break;
            }
            StepCommand::Reset { x: xs, y: ys } | StepCommand::Modified { x: xs, y: ys } => {
                // the history no longer matches the state, start over
                log::debug!("multistep history reset at x = {}", xs);
                match bootstrap(
                    f,
                    &transformer,
                    xs,
                    xend,
                    &ys,
                    &args.atol,
                    &args.rtol,
                    args.hmin,
                    args.hmax,
                    args.nmax,
                    args.max_evaluations,
                )? {
                    Bootstrap::Completed(starter) => {
                        let mut solution =
                            starter_fallback(f, xs, xend, &ys, solout.take(), events, &args)?;
                        solution.nfev += nfev + starter.nfev;
                        solution.nstep += nstep;
                        solution.naccpt += naccpt;
                        solution.nrejct += nrejct;
                        return Ok(solution);
                    }
                    Bootstrap::Started(fresh, cost) => {
                        nfev += cost;
                        state = fresh;
                        reset = true;
                    }
                }
            }
        }

        if last && !reset {
            break;
        }

        if !reset {
            let h_new =
                controller.filter_step(state.h * controller.grow_shrink(error), forward, last)?;
            state.rescale(h_new);
        }
    }

    Ok(Solution::new(
        state.step_start,
        &state.y,
        state.h,
        nfev,
        nstep,
        naccpt,
        nrejct,
        status,
    ))
}

/// Error estimate from the last Taylor terms of the updated history: the
/// two-sided evaluation back to the step start differs from the stored
/// start state exactly by the truncated tail.
fn error_estimation(
    previous: &[Float],
    predicted: &[Float],
    predicted_scaled: &[Float],
    predicted_nordsieck: &DMatrix<Float>,
    n_err: usize,
    atol: &Tolerance,
    rtol: &Tolerance,
) -> Float {
    let rows = predicted_nordsieck.nrows();
    let mut error: Float = 0.0;
    for i in 0..n_err {
        let tol = atol[i] + rtol[i] * predicted[i].abs();
        // alternating-sign walk from high order to low order; the first
        // Nordsieck row always enters with a plus
        let mut variation: Float = 0.0;
        let mut sign: Float = if rows % 2 == 0 { -1.0 } else { 1.0 };
        for k in (0..rows).rev() {
            variation += sign * predicted_nordsieck[(k, i)];
            sign = -sign;
        }
        variation -= predicted_scaled[i];
        let ratio = (predicted[i] - previous[i] + variation) / tol;
        error += ratio * ratio;
    }
    (error / n_err as Float).sqrt()
}
