//! Explicit Euler fixed-step integrator.

use crate::{
    Args, Error, Float, ODE, SolOut,
    butcher::{ButcherTableau, ErrorWeights},
    solution::Solution,
};

/// First-order explicit Euler tableau. Dense output is the linear
/// interpolation along the step derivative.
pub const EULER: ButcherTableau = ButcherTableau {
    name: "Euler",
    order: 1,
    c: &[],
    a: &[],
    b: &[1.0],
    dense: &[&[1.0]],
    error: ErrorWeights::None,
    fsal: false,
};

/// Explicit Euler fixed-step integrator.
pub fn euler<F, S>(
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
    super::integrate_fixed(f, x, xend, y, h, &EULER, args)
}
