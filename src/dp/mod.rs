//! Dormand-Prince Runge-Kutta methods

mod dop853;

pub use dop853::{Dop853Interpolator, dop853};
