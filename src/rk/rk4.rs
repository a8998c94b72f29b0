//! Classic explicit Runge-Kutta 4 (RK4) fixed-step integrator.

use crate::{
    Args, Error, Float, ODE, SolOut,
    butcher::{ButcherTableau, ErrorWeights},
    solution::Solution,
};

/// Classical fourth-order Runge-Kutta tableau. Dense output is the cubic
/// interpolant built from the four stage derivatives.
pub const RK4: ButcherTableau = ButcherTableau {
    name: "classical RK4",
    order: 4,
    c: &[0.5, 0.5, 1.0],
    a: &[&[0.5], &[0.0, 0.5], &[0.0, 0.0, 1.0]],
    b: &[1.0 / 6.0, 1.0 / 3.0, 1.0 / 3.0, 1.0 / 6.0],
    dense: &[
        &[1.0, -1.5, 2.0 / 3.0],
        &[0.0, 1.0, -2.0 / 3.0],
        &[0.0, 1.0, -2.0 / 3.0],
        &[0.0, -0.5, 2.0 / 3.0],
    ],
    error: ErrorWeights::None,
    fsal: false,
};

/// Classical explicit Runge-Kutta 4 (RK4) fixed-step integrator.
pub fn rk4<F, S>(
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
    super::integrate_fixed(f, x, xend, y, h, &RK4, args)
}
