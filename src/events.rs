//! Discrete event handling: switching functions checked on accepted steps.

use crate::{Error, Float, interpolate::StepInterpolator};

/// Event zero-crossing direction filter.
/// - All: any sign change triggers.
/// - Positive: only negative -> nonnegative crossings.
/// - Negative: only positive -> nonpositive crossings.
#[derive(Copy, Clone, Debug)]
pub enum EventDirection {
    All,
    Positive,
    Negative,
}

impl From<i32> for EventDirection {
    fn from(v: i32) -> Self {
        match v {
            x if x > 0 => EventDirection::Positive,
            x if x < 0 => EventDirection::Negative,
            _ => EventDirection::All,
        }
    }
}

/// Decision returned by [`EventHandler::event_occurred`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum EventAction {
    /// Keep integrating, the event was informational.
    Continue,
    /// Stop the integration at the event time.
    Stop,
    /// The handler changed the state in-place; truncate the step at the
    /// event time and restart from the modified state. Multistep methods
    /// discard their Nordsieck history and re-bootstrap.
    ResetState,
    /// The state is unchanged but its derivatives are stale; truncate and
    /// re-evaluate before continuing.
    ResetDerivatives,
}

/// A scalar switching function whose sign changes mark discrete events.
///
/// After every accepted step the integrator samples `g` at both step ends
/// (through dense output) and, when a filtered sign change is found,
/// localizes the crossing with a bracketing root refinement before asking
/// the handler how to proceed.
pub trait EventHandler {
    /// The switching function. Must be continuous inside a step.
    fn g(&mut self, x: Float, y: &[Float]) -> Float;

    /// Called once the crossing is localized. `y` is the interpolated state
    /// at the event time; mutating it only has an effect together with
    /// [`EventAction::ResetState`].
    fn event_occurred(&mut self, x: Float, y: &mut [Float], increasing: bool) -> EventAction;

    fn direction(&self) -> EventDirection {
        EventDirection::All
    }

    /// Convergence tolerance on the event time.
    fn convergence(&self) -> Float {
        1e-10
    }

    /// Iteration budget for the root refinement.
    fn max_iterations(&self) -> usize {
        100
    }
}

/// A localized event and the handler's decision about it.
pub(crate) struct EventStep {
    pub x: Float,
    pub y: Vec<Float>,
    pub action: EventAction,
}

/// Check all handlers over the step covered by `interpolator` and fire the
/// earliest triggered one. Returns `None` when no switching function crossed.
pub(crate) fn check_step(
    handlers: &mut [&mut dyn EventHandler],
    interpolator: &mut dyn StepInterpolator,
) -> Result<Option<EventStep>, Error> {
    let xold = interpolator.previous_time();
    let x = interpolator.current_time();
    let forward = interpolator.is_forward();

    // find the earliest crossing among all handlers
    let mut best: Option<(usize, Float, bool)> = None;
    for (idx, handler) in handlers.iter_mut().enumerate() {
        // a zero at (or a root residual within tolerance of) the step start
        // is the event the previous step already fired; start the bracket a
        // shifted margin inside the step so it is not localized again
        let offset = handler
            .convergence()
            .max((x - xold).abs() * 1e-7)
            .min(0.5 * (x - xold).abs());
        let a = xold + (x - xold).signum() * offset;
        interpolator.set_interpolated_time(a);
        let ga = handler.g(a, interpolator.interpolated_state());
        if ga == 0.0 {
            // the switching function rests on the surface, nothing to localize
            continue;
        }
        interpolator.set_interpolated_time(x);
        let gb = handler.g(x, interpolator.interpolated_state());
        if ga * gb > 0.0 {
            continue;
        }
        let increasing = gb >= ga;
        let triggered = match handler.direction() {
            EventDirection::All => true,
            EventDirection::Positive => increasing,
            EventDirection::Negative => !increasing,
        };
        if !triggered {
            continue;
        }
        let tol = handler.convergence();
        let max_iterations = handler.max_iterations();
        let root = bracketed_root(
            |t| {
                interpolator.set_interpolated_time(t);
                handler.g(t, interpolator.interpolated_state())
            },
            a,
            ga,
            x,
            gb,
            tol,
            max_iterations,
        )?;
        let earlier = match best {
            None => true,
            Some((_, t_best, _)) => {
                if forward {
                    root < t_best
                } else {
                    root > t_best
                }
            }
        };
        if earlier {
            best = Some((idx, root, increasing));
        }
    }

    let (idx, root, increasing) = match best {
        Some(found) => found,
        None => return Ok(None),
    };

    interpolator.set_interpolated_time(root);
    let mut y_event = interpolator.interpolated_state().to_vec();
    let action = handlers[idx].event_occurred(root, &mut y_event, increasing);
    Ok(Some(EventStep {
        x: root,
        y: y_event,
        action,
    }))
}

/// What the integrator must do after events and callbacks saw a step.
pub(crate) enum StepCommand {
    Continue,
    /// Stop at the given time and state (event asked to stop, or the
    /// callback interrupted).
    Stop { x: Float, y: Vec<Float> },
    /// Truncate the step at the given time, adopt the state, and restart
    /// with fresh derivatives (and, for multistep methods, a fresh
    /// bootstrap).
    Reset { x: Float, y: Vec<Float> },
    /// The callback substituted a solution point; derivatives must be
    /// recomputed there.
    Modified { x: Float, y: Vec<Float> },
}

/// Run event detection and the solution callback for one accepted step.
pub(crate) fn process_step<S: crate::SolOut>(
    handlers: &mut [&mut dyn EventHandler],
    solout: &mut Option<&mut S>,
    interpolator: &mut dyn StepInterpolator,
    y: &[Float],
    is_last: bool,
) -> Result<StepCommand, Error> {
    use crate::ControlFlag;

    let xold = interpolator.previous_time();
    let x = interpolator.current_time();

    let event = check_step(handlers, interpolator)?;
    if let Some(ev) = &event {
        log::debug!(
            "event at x = {} (action {:?}) inside step [{}, {}]",
            ev.x,
            ev.action,
            xold,
            x
        );
    }
    let command = match event {
        Some(EventStep {
            x: xe,
            y: ye,
            action: EventAction::Stop,
        }) => StepCommand::Stop { x: xe, y: ye },
        Some(EventStep {
            x: xe,
            y: ye,
            action: EventAction::ResetState | EventAction::ResetDerivatives,
        }) => StepCommand::Reset { x: xe, y: ye },
        Some(EventStep {
            action: EventAction::Continue,
            ..
        })
        | None => StepCommand::Continue,
    };

    let stopping = matches!(command, StepCommand::Stop { .. });
    // an event truncates the step, the callback sees it end at the event
    let (x_cb, y_cb) = match &command {
        StepCommand::Stop { x: xe, y: ye } | StepCommand::Reset { x: xe, y: ye } => {
            (*xe, ye.as_slice())
        }
        _ => (x, y),
    };
    if let Some(s) = solout.as_mut() {
        match s.solout(xold, x_cb, y_cb, interpolator, is_last || stopping) {
            ControlFlag::Interrupt => {
                if !stopping {
                    return Ok(StepCommand::Stop {
                        x: x_cb,
                        y: y_cb.to_vec(),
                    });
                }
            }
            ControlFlag::ModifiedSolution(xm, ym) => {
                // an event command from the same step takes precedence
                if matches!(command, StepCommand::Continue) {
                    return Ok(StepCommand::Modified { x: xm, y: ym });
                }
            }
            ControlFlag::Continue => {}
        }
    }
    Ok(command)
}

/// Regula falsi with Illinois damping on a bracketing interval.
fn bracketed_root(
    mut g: impl FnMut(Float) -> Float,
    mut a: Float,
    mut ga: Float,
    mut b: Float,
    mut gb: Float,
    tol: Float,
    max_iterations: usize,
) -> Result<Float, Error> {
    if ga == 0.0 {
        return Ok(a);
    }
    if gb == 0.0 {
        return Ok(b);
    }
    if ga * gb > 0.0 {
        return Err(Error::NoBracketing { a, b, ga, gb });
    }
    for _ in 0..max_iterations {
        if (b - a).abs() <= tol {
            break;
        }
        let mut c = b - gb * (b - a) / (gb - ga);
        if !c.is_finite() || (c - a) * (c - b) >= 0.0 {
            c = 0.5 * (a + b);
        }
        let gc = g(c);
        if gc == 0.0 {
            return Ok(c);
        }
        if gc * gb < 0.0 {
            a = b;
            ga = gb;
        } else {
            // Illinois: halve the retained end to avoid endpoint stalling
            ga *= 0.5;
        }
        b = c;
        gb = gc;
    }
    Ok(0.5 * (a + b))
}
