//! Shared fixtures for the integration tests.
#![allow(dead_code)]

use adastep::prelude::*;

/// Simple harmonic oscillator y'' = -y.
/// With y0 = (1, 0) the solution is (cos t, -sin t).
pub struct SHO;

impl ODE for SHO {
    fn ode(&self, _x: Float, y: &[Float], dydx: &mut [Float]) {
        dydx[0] = y[1];
        dydx[1] = -y[0];
    }
}

/// Exponential decay y' = -y. With y0 = 1 the solution is e^{-t}.
pub struct Decay;

impl ODE for Decay {
    fn ode(&self, _x: Float, y: &[Float], dydx: &mut [Float]) {
        dydx[0] = -y[0];
    }
}

pub fn default_opts_dense(method: Method) -> IVPOptions<'static> {
    IVPOptions::builder()
        .method(method)
        .rtol(1e-9)
        .atol(1e-9)
        .dense_output(true)
        .build()
}

pub fn tight_args() -> Args<'static, 'static> {
    Args::builder().rtol(1e-10).atol(1e-10).build()
}
