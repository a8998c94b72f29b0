//! Status codes for integrators

/// Terminal status of an integration run that produced a usable state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// Reached the requested end of the integration interval.
    Success,
    /// Stopped early by a callback or an event handler.
    Interrupted,
    /// Ran out of allowed steps before reaching the end.
    NeedLargerNmax,
    /// The stiffness test fired repeatedly; the problem is probably stiff.
    ProbablyStiff,
}
