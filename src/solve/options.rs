//! Options and method selection for solve_ivp

use bon::Builder;

use crate::{
    Float,
    events::EventHandler,
    solout::{DummySolOut, SolOut},
    tolerance::Tolerance,
};

/// Integrator selection for [`solve_ivp`](super::solve_ivp).
#[derive(Clone, Copy, Debug)]
pub enum Method {
    /// Explicit Euler, fixed step
    Euler,
    /// Explicit midpoint, fixed step
    Midpoint,
    /// Classic fixed-step RK4
    RK4,
    /// Kutta's 3/8 rule, fixed step
    ThreeEighths,
    /// Gill's fourth-order method, fixed step
    Gill,
    /// Higham-Hall 5(4) adaptive RK
    HighamHall,
    /// Dormand-Prince 8(5,3) high-order adaptive RK
    DOP853,
    /// Adams-Bashforth multistep of order `n_steps`
    AdamsBashforth { n_steps: usize },
    /// Adams-Moulton PECE multistep of order `n_steps + 1`
    AdamsMoulton { n_steps: usize },
}

#[derive(Builder)]
/// Options for solve_ivp similar to SciPy
pub struct IVPOptions<'a, S: SolOut = DummySolOut> {
    /// Method to use. Default: DOP853.
    #[builder(default = Method::DOP853)]
    pub method: Method,
    /// Relative tolerance for error estimation.
    #[builder(default = 1e-6, into)]
    pub rtol: Tolerance,
    /// Absolute tolerance for error estimation.
    #[builder(default = 1e-6, into)]
    pub atol: Tolerance,
    /// Maximum number of allowed steps.
    pub nmax: Option<usize>,
    /// Ceiling on derivative evaluations.
    pub max_evaluations: Option<usize>,
    /// Points where the solution is requested, sampled through dense output.
    /// When given, step-endpoint saving defaults to off.
    pub t_eval: Option<Vec<Float>>,
    /// Optional user callback invoked after each accepted step, after the
    /// internal sampling at `t_eval`.
    pub solout: Option<&'a mut S>,
    /// Event handlers checked on every accepted step.
    #[builder(default)]
    pub events: Vec<&'a mut dyn EventHandler>,
    /// Initial step suggestion (maps to `h0`).
    pub first_step: Option<Float>,
    /// Maximum step size magnitude (maps to `hmax`).
    pub max_step: Option<Float>,
    /// Minimum step size magnitude (maps to `hmin`).
    pub min_step: Option<Float>,
    /// Retain the dense output of the whole run as a
    /// [`ContinuousOutputModel`](crate::cont::ContinuousOutputModel),
    /// queryable afterwards through
    /// [`IVPSolution::sol`](super::IVPSolution::sol). Default: false.
    #[builder(default = false)]
    pub dense_output: bool,
    /// Save step endpoints (the initial point and each accepted step).
    /// Default: true without `t_eval`, false with it.
    pub save_step_endpoints: Option<bool>,
}
