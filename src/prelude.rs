//! Convenient prelude: import the most commonly used traits, types, and functions.
//!
//! Bring this into scope with:
//!
//! ```rust
//! use adastep::prelude::*;
//! ```
//!
//! Re-exports included:
//! - Core traits and types: `ODE`, `StepInterpolator`, `SolOut`, `ControlFlag`,
//!   `Solution`, `Status`, `Error`, `Args`, `Tolerance`.
//! - Event handling: `EventHandler`, `EventAction`, `EventDirection`.
//! - Dense output retention: `ContinuousOutputModel`.
//! - High-level API: `solve_ivp`, `IVPOptions`, `IVPSolution`, and `Method`.

pub use crate::{
    Args, ControlFlag, Error, EventAction, EventDirection, EventHandler, Float, ODE, SolOut,
    Solution, Status, StepInterpolator, Tolerance,
};

pub use crate::cont::ContinuousOutputModel;
pub use crate::solve::{IVPOptions, IVPSolution, Method, solve_ivp};
