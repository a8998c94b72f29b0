//! Adams-Moulton implicit multistep integrator, solved in PECE form.

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

/// Adams-Moulton implicit multistep integrator of order `n_steps + 1`,
/// evaluated predictor-corrector style (PECE).
///
/// Each step predicts by Taylor extrapolation, evaluates the derivative at
/// the prediction, corrects with the implicit formula rearranged over the
/// updated history, then evaluates once more at the corrected point. The
/// error estimate is the correction itself, which makes it available before
/// the step is committed.
pub fn adams_moulton<F, S>(
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
        n_steps + 1,
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
            if nfev + 2 > max {
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

        // predict (P) and evaluate (first E)
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

        // correct (C): implicit formula rearranged over the updated history
        let (corrected, error) = correct(
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

        // step accepted: evaluate at the corrected point (second E) and
        // fold the corrected derivative into the history
        naccpt += 1;
        f.ode(step_end, &corrected, &mut y_dot);
        nfev += 1;
        let corrected_scaled: Vec<Float> = y_dot.iter().map(|d| state.h * d).collect();
        transformer.update_high_order_derivatives_phase2(
            &predicted_scaled,
            &corrected_scaled,
            &mut predicted_nordsieck,
        );

        state.step_start = step_end;
        state.y = corrected;
        state.scaled = corrected_scaled;
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

/// The Moulton correction: evaluate the updated history back at the step
/// start, where the stored state is known exactly, and rearrange for the
/// state at the step end. Returns the corrected state and the normalized
/// error, which is the distance between prediction and correction.
fn correct(
    previous: &[Float],
    predicted: &[Float],
    predicted_scaled: &[Float],
    predicted_nordsieck: &DMatrix<Float>,
    n_err: usize,
    atol: &Tolerance,
    rtol: &Tolerance,
) -> (Vec<Float>, Float) {
    let n = previous.len();
    let rows = predicted_nordsieck.nrows();

    // alternating-sign row walk: even rows subtract, odd rows add
    let mut corrected = vec![0.0 as Float; n];
    for k in 0..rows {
        let sign: Float = if k % 2 == 0 { -1.0 } else { 1.0 };
        for j in 0..n {
            corrected[j] += sign * predicted_nordsieck[(k, j)];
        }
    }
    for j in 0..n {
        corrected[j] += previous[j] + predicted_scaled[j];
    }

    let mut error: Float = 0.0;
    for i in 0..n_err {
        let y_scale = previous[i].abs().max(corrected[i].abs());
        let tol = atol[i] + rtol[i] * y_scale;
        let ratio = (corrected[i] - predicted[i]) / tol;
        error += ratio * ratio;
    }
    (corrected, (error / n_err as Float).sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn correction_reduces_to_taylor_identity() {
        // With a single-column history the corrected state is
        // previous + scaled - n0 + n1 (dyadic values keep this exact).
        let nordsieck = DMatrix::from_row_slice(2, 1, &[0.25, 0.125]);
        let (corrected, error) = correct(
            &[1.0],
            &[1.375],
            &[0.5],
            &nordsieck,
            1,
            &Tolerance::Scalar(1.0),
            &Tolerance::Scalar(0.0),
        );
        assert_relative_eq!(corrected[0], 1.375);
        assert_relative_eq!(error, 0.0);
    }
}
