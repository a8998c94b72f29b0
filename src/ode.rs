//! Right-hand side of the differential equation system.

use crate::Float;

/// The right-hand side function y' = f(x, y) of an initial value problem.
///
/// `ode` receives the current abscissa `x` and state `y` and fills `dydx`
/// with the derivative. Integrators call it many times per step, so it
/// should not allocate. The state slice is read-only; systems with
/// parameters carry them in the implementing struct.
///
/// # Example
///
/// ```ignore
/// struct Pendulum { length: f64 }
/// impl ODE for Pendulum {
///     fn ode(&self, _x: f64, y: &[f64], dydx: &mut [f64]) {
///         dydx[0] = y[1];
///         dydx[1] = -(9.81 / self.length) * y[0].sin();
///     }
/// }
/// ```
pub trait ODE {
    fn ode(&self, x: Float, y: &[Float], dydx: &mut [Float]);
}
