//! Explicit midpoint (second-order Runge-Kutta) fixed-step integrator.

use crate::{
    Args, Error, Float, ODE, SolOut,
    butcher::{ButcherTableau, ErrorWeights},
    solution::Solution,
};

/// Second-order explicit midpoint tableau with quadratic dense output.
pub const MIDPOINT: ButcherTableau = ButcherTableau {
    name: "midpoint",
    order: 2,
    c: &[0.5],
    a: &[&[0.5]],
    b: &[0.0, 1.0],
    dense: &[&[1.0, -1.0], &[0.0, 1.0]],
    error: ErrorWeights::None,
    fsal: false,
};

/// Explicit midpoint fixed-step integrator.
pub fn midpoint<F, S>(
    f: &F,
    x: Float,
    xend: Float,
    y: &[Float],
    h: Float,
    args: Args<'_, '_, S>,
) -> Result<Solution, Error>
where
    F: ODE,
    S: SolOut,
{
    super::integrate_fixed(f, x, xend, y, h, &MIDPOINT, args)
}
