//! User defined callback hook executed after each accepted step.

use crate::{Float, interpolate::StepInterpolator};

/// Return flags for [`SolOut`].
///
/// - `Continue`: proceed with integration as normal.
/// - `Interrupt`: stop integration and return control to the caller.
/// - `ModifiedSolution(x, y)`: adopt the given abscissa and state; the
///   integrator re-evaluates derivatives there before continuing. Multistep
///   methods additionally discard their history and restart.
#[derive(Debug, Clone, PartialEq)]
pub enum ControlFlag {
    Continue,
    Interrupt,
    ModifiedSolution(Float, Vec<Float>),
}

/// Callback hook executed after each accepted step.
///
/// The callback is invoked after every accepted step. The first call covers
/// the first step, so its interpolator also gives access to the initial
/// point. The arguments are:
/// - `xold`: the previous abscissa (left end of the last accepted step),
/// - `x`: the new abscissa after the accepted step,
/// - `y`: the integrator's current solution at `x`,
/// - `interpolator`: dense output valid inside `[xold, x]`; the callback may
///   move its interpolated-time cursor freely, the integrator does not read
///   it back. The interpolator owns its data, so it can also be cloned with
///   [`StepInterpolator::boxed_clone`] and retained after the call returns.
/// - `is_last`: whether this is the final step of the integration.
///
/// Returning [`ControlFlag::Interrupt`] is the supported way to stop an
/// integration early; no error is raised and the solution reflects the state
/// at the interrupted step.
pub trait SolOut {
    fn solout(
        &mut self,
        xold: Float,
        x: Float,
        y: &[Float],
        interpolator: &mut dyn StepInterpolator,
        is_last: bool,
    ) -> ControlFlag;
}

/// No-op [`SolOut`] used as the default when no callback is supplied.
#[derive(Debug, Default, Clone, Copy)]
pub struct DummySolOut;

impl SolOut for DummySolOut {
    fn solout(
        &mut self,
        _xold: Float,
        _x: Float,
        _y: &[Float],
        _interpolator: &mut dyn StepInterpolator,
        _is_last: bool,
    ) -> ControlFlag {
        ControlFlag::Continue
    }
}
