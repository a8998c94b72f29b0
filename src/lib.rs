//! A library of numerical methods for solving initial value problems (IVPs) for
//! ordinary differential equations (ODEs).
//!
//! The crate provides two families of integrators:
//!
//! - explicit Runge-Kutta methods, both fixed-step (Euler, midpoint, classical
//!   RK4, the 3/8 rule, Gill) and embedded adaptive pairs (Higham-Hall 5(4),
//!   Dormand-Prince 8(5,3)), and
//! - multistep Adams methods (Adams-Bashforth, Adams-Moulton) built on the
//!   Nordsieck vector representation, bootstrapped by a short run of the
//!   Dormand-Prince 8(5,3) starter.
//!
//! Every accepted step produces a [`StepInterpolator`] so the solution can be
//! queried anywhere inside the step, and a [`cont::ContinuousOutputModel`] can
//! retain the interpolators of a whole integration for random-access queries
//! afterwards.

mod args;
mod butcher;
mod error;
mod events;
mod interpolate;
mod mapper;
mod ode;
mod solout;
mod solution;
mod status;
mod step_control;
mod tolerance;

pub mod adams;
pub mod cont;
pub mod dp;
pub mod prelude;
pub mod rk;
pub mod solve;

pub use args::Args;
pub use butcher::{ButcherTableau, ErrorWeights};
pub use error::Error;
pub use events::{EventAction, EventDirection, EventHandler};
pub use interpolate::StepInterpolator;
pub use mapper::{EquationsMapper, ExpandedODE, SecondaryODE};
pub use ode::ODE;
pub use solout::{ControlFlag, DummySolOut, SolOut};
pub use solution::Solution;
pub use status::Status;
pub use step_control::StepSizeController;
pub use tolerance::Tolerance;

// Prevent selecting two incompatible float precision features at once.
#[cfg(all(feature = "f32", feature = "f64"))]
compile_error!(
    "features 'f32' and 'f64' cannot both be enabled; pick exactly one Float precision feature"
);

/// Working floating point precision, selected by the `f32`/`f64` features.
#[cfg(feature = "f32")]
pub type Float = f32;
#[cfg(feature = "f64")]
pub type Float = f64;
