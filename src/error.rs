//! Errors for integration methods

use crate::Float;

/// Fatal conditions surfaced by the integrators.
///
/// Rejected steps are not errors; they are recovered internally by shrinking
/// the step size and retrying. Everything in this enum unwinds immediately to
/// the caller with no partial result.
#[derive(Debug, Clone)]
pub enum Error {
    /// An array supplied by the user does not match the problem dimension.
    DimensionMismatch { expected: usize, actual: usize },
    /// The controller would need a step smaller than the minimal step.
    StepTooSmall { h: Float, min_step: Float },
    /// The derivative function was called more times than allowed.
    MaxEvaluationsExceeded { max: usize },
    /// A root search was asked on an interval with no sign change.
    NoBracketing { a: Float, b: Float, ga: Float, gb: Float },
    /// An explicit step size has the wrong sign or is zero.
    InvalidStepSize(Float),
    /// Adams methods need at least two steps.
    NStepsTooSmall(usize),
    /// The multistep bootstrap least-squares system could not be solved.
    SingularSystem,
    SafetyFactorOutOfRange(Float),
    URoundOutOfRange(Float),
    /// Lund stabilization exponent outside `[0, 0.2]`.
    BetaOutOfRange(Float),
    /// Appending continuous output models with a hole between their ranges.
    ModelGap { gap: Float, tolerance: Float },
    /// Appending continuous output models with opposite propagation directions.
    DirectionMismatch,
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::DimensionMismatch { expected, actual } => {
                write!(f, "dimension mismatch (expected {}, got {})", expected, actual)
            }
            Error::StepTooSmall { h, min_step } => write!(
                f,
                "step size {} is smaller than the minimal step {}",
                h, min_step
            ),
            Error::MaxEvaluationsExceeded { max } => {
                write!(f, "maximal number of derivative evaluations ({}) exceeded", max)
            }
            Error::NoBracketing { a, b, ga, gb } => write!(
                f,
                "no sign change on [{}, {}]: g({}) = {}, g({}) = {}",
                a, b, a, ga, b, gb
            ),
            Error::InvalidStepSize(v) => write!(f, "step size h is invalid (got {})", v),
            Error::NStepsTooSmall(n) => {
                write!(f, "Adams methods need at least 2 steps (got {})", n)
            }
            Error::SingularSystem => {
                write!(f, "multistep start-up least-squares system is singular")
            }
            Error::SafetyFactorOutOfRange(v) => {
                write!(f, "safety_factor must be in (1e-4, 1.0) (got {})", v)
            }
            Error::URoundOutOfRange(v) => {
                write!(f, "uround must be in (1e-35, 1.0) (got {})", v)
            }
            Error::BetaOutOfRange(v) => {
                write!(f, "beta must be in [0.0, 0.2] (got {})", v)
            }
            Error::ModelGap { gap, tolerance } => write!(
                f,
                "hole of width {} between time ranges (tolerance {})",
                gap, tolerance
            ),
            Error::DirectionMismatch => write!(f, "propagation direction mismatch"),
        }
    }
}

impl std::error::Error for Error {}
