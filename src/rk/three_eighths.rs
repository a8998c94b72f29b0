//! 3/8 rule (fourth-order Runge-Kutta) fixed-step integrator.

use crate::{
    Args, Error, Float, ODE, SolOut,
    butcher::{ButcherTableau, ErrorWeights},
    solution::Solution,
};

/// Fourth-order 3/8 rule tableau with its cubic dense output.
pub const THREE_EIGHTHS: ButcherTableau = ButcherTableau {
    name: "3/8",
    order: 4,
    c: &[1.0 / 3.0, 2.0 / 3.0, 1.0],
    a: &[&[1.0 / 3.0], &[-1.0 / 3.0, 1.0], &[1.0, -1.0, 1.0]],
    b: &[1.0 / 8.0, 3.0 / 8.0, 3.0 / 8.0, 1.0 / 8.0],
    dense: &[
        &[1.0, -15.0 / 8.0, 1.0],
        &[0.0, 15.0 / 8.0, -1.5],
        &[0.0, 3.0 / 8.0, 0.0],
        &[0.0, -3.0 / 8.0, 0.5],
    ],
    error: ErrorWeights::None,
    fsal: false,
};

/// 3/8 rule fixed-step integrator.
pub fn three_eighths<F, S>(
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
    super::integrate_fixed(f, x, xend, y, h, &THREE_EIGHTHS, args)
}
