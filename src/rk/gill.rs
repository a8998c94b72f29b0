//! Gill fourth-order fixed-step integrator.

use crate::{
    Args, Error, Float, ODE, SolOut,
    butcher::{ButcherTableau, ErrorWeights},
    solution::Solution,
};

const SQRT_2: Float = std::f64::consts::SQRT_2 as Float;

/// Fourth-order Gill tableau, tuned to reduce round-off accumulation.
pub const GILL: ButcherTableau = ButcherTableau {
    name: "Gill",
    order: 4,
    c: &[0.5, 0.5, 1.0],
    a: &[
        &[0.5],
        &[(SQRT_2 - 1.0) / 2.0, (2.0 - SQRT_2) / 2.0],
        &[0.0, -SQRT_2 / 2.0, 1.0 + SQRT_2 / 2.0],
    ],
    b: &[
        1.0 / 6.0,
        (2.0 - SQRT_2) / 6.0,
        (2.0 + SQRT_2) / 6.0,
        1.0 / 6.0,
    ],
    dense: &[
        &[1.0, -1.5, 2.0 / 3.0],
        &[0.0, (2.0 - SQRT_2) / 2.0, (SQRT_2 - 2.0) / 3.0],
        &[0.0, (2.0 + SQRT_2) / 2.0, -(SQRT_2 + 2.0) / 3.0],
        &[0.0, -0.5, 2.0 / 3.0],
    ],
    error: ErrorWeights::None,
    fsal: false,
};

/// Gill fourth-order fixed-step integrator.
pub fn gill<F, S>(
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
    super::integrate_fixed(f, x, xend, y, h, &GILL, args)
}
