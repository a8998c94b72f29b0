//! Args for numerical integrators

use bon::Builder;

use crate::{
    Float,
    events::EventHandler,
    solout::{DummySolOut, SolOut},
    tolerance::Tolerance,
};

#[derive(Builder)]
/// Args for the numerical integrators
///
/// The callback and the event handlers carry separate borrow lifetimes so a
/// locally owned callback can be combined with handlers borrowed from an
/// outer scope.
pub struct Args<'a, 'e, S: SolOut = DummySolOut> {
    /// Solution output function, called after every accepted step.
    pub solout: Option<&'a mut S>,
    /// Event handlers whose switching functions are checked on every
    /// accepted step.
    #[builder(default)]
    pub events: Vec<&'e mut dyn EventHandler>,
    /// Relative tolerance for error estimation.
    #[builder(default = 1e-6, into)]
    pub rtol: Tolerance,
    /// Absolute tolerance for error estimation.
    #[builder(default = 1e-6, into)]
    pub atol: Tolerance,
    /// Initial step size. None will result in an initial guess computed by
    /// [`crate::StepSizeController::initialize_step`].
    pub h0: Option<Float>,
    /// Maximal step size magnitude. Default is the integration interval.
    pub hmax: Option<Float>,
    /// Minimal step size magnitude. Default is 0.
    #[builder(default = 0.0)]
    pub hmin: Float,
    /// Maximum number of allowed steps. Default is 100,000.
    #[builder(default = 100_000)]
    pub nmax: usize,
    /// Ceiling on derivative evaluations; exceeding it aborts with
    /// [`crate::Error::MaxEvaluationsExceeded`].
    pub max_evaluations: Option<usize>,
    /// Safety factor in step-size prediction. Default is 0.9.
    #[builder(default = 0.9)]
    pub safety_factor: Float,
    /// Lund stabilization exponent for the DOP853 step-size controller,
    /// in `[0, 0.2]`. 0 disables the damping.
    #[builder(default = 0.0)]
    pub beta: Float,
    /// Parameter for step size selection where scale_min <= hnew/hold <= scale_max
    pub scale_min: Option<Float>,
    /// Parameter for step size selection where scale_min <= hnew/hold <= scale_max
    pub scale_max: Option<Float>,
    /// The rounding unit, typically machine epsilon
    #[builder(default = 2.3e-16)]
    pub uround: Float,
    /// Number of steps before performing a stiffness test. Default is 1000.
    #[builder(default = 1000)]
    pub nstiff: usize,
    /// Number of leading state components participating in the error norm.
    /// Defaults to the full dimension; set this when secondary equations are
    /// appended to the primary state and should not drive step-size control.
    pub error_dimension: Option<usize>,
}
