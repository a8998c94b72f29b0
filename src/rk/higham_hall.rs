//! Higham-Hall 5(4) embedded Runge-Kutta adaptive-step integrator.

use crate::{
    Args, Error, Float, ODE, SolOut,
    butcher::{ButcherTableau, ErrorWeights},
    solution::Solution,
};

/// Higham-Hall 5(4) embedded pair. The last stage is evaluated at the step
/// end with the propagation weights, so it doubles as the derivative of the
/// next step (FSAL).
pub const HIGHAM_HALL: ButcherTableau = ButcherTableau {
    name: "Higham-Hall 5(4)",
    order: 5,
    c: &[2.0 / 9.0, 1.0 / 3.0, 1.0 / 2.0, 3.0 / 5.0, 1.0, 1.0],
    a: &[
        &[2.0 / 9.0],
        &[1.0 / 12.0, 1.0 / 4.0],
        &[1.0 / 8.0, 0.0, 3.0 / 8.0],
        &[91.0 / 500.0, -27.0 / 100.0, 78.0 / 125.0, 8.0 / 125.0],
        &[-11.0 / 20.0, 27.0 / 20.0, 12.0 / 5.0, -36.0 / 5.0, 5.0],
        &[
            1.0 / 12.0,
            0.0,
            27.0 / 32.0,
            -4.0 / 3.0,
            125.0 / 96.0,
            5.0 / 48.0,
        ],
    ],
    b: &[
        1.0 / 12.0,
        0.0,
        27.0 / 32.0,
        -4.0 / 3.0,
        125.0 / 96.0,
        5.0 / 48.0,
        0.0,
    ],
    dense: &[
        &[1.0, -15.0 / 4.0, 16.0 / 3.0, -5.0 / 2.0],
        &[0.0, 0.0, 0.0, 0.0],
        &[0.0, 459.0 / 32.0, -243.0 / 8.0, 135.0 / 8.0],
        &[0.0, -22.0, 152.0 / 3.0, -30.0],
        &[0.0, 375.0 / 32.0, -625.0 / 24.0, 125.0 / 8.0],
        &[0.0, -5.0 / 16.0, 5.0 / 12.0, 0.0],
        &[0.0, 0.0, 0.0, 0.0],
    ],
    error: ErrorWeights::Simple(&[
        -1.0 / 20.0,
        0.0,
        81.0 / 160.0,
        -6.0 / 5.0,
        25.0 / 32.0,
        1.0 / 16.0,
        -1.0 / 10.0,
    ]),
    fsal: true,
};

/// Higham-Hall 5(4) adaptive-step integrator with dense output.
///
/// Uses the embedded fourth-order solution for the error estimate and the
/// shared step-size controller for accept/reject decisions.
pub fn higham_hall<F, S>(
    f: &F,
    x: Float,
    xend: Float,
    y: &[Float],
    args: Args<'_, '_, S>,
) -> Result<Solution, Error>
where
    F: ODE,
    S: SolOut,
{
    super::integrate_adaptive(f, x, xend, y, &HIGHAM_HALL, args)
}
