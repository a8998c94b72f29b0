//! Tolerance abstraction to allow scalar or vector tolerances

use std::ops::Index;

use crate::{Float, error::Error};

/// Tolerance enum to allow scalar or vector tolerances
/// using [`Into`] trait for easy conversion from `Float`, `[Float; N]`, or `Vec<Float>`
/// users do not need to know or worry this simply allows both
/// `Float` and `[Float; N]` to be passed in as arguments.
#[derive(Clone, Debug)]
pub enum Tolerance {
    Scalar(Float),
    Vector(Vec<Float>),
}

impl From<Float> for Tolerance {
    fn from(val: Float) -> Self {
        Tolerance::Scalar(val)
    }
}

impl From<&[Float]> for Tolerance {
    fn from(val: &[Float]) -> Self {
        Tolerance::Vector(val.to_vec())
    }
}

impl<const N: usize> From<[Float; N]> for Tolerance {
    fn from(val: [Float; N]) -> Self {
        Tolerance::Vector(val.to_vec())
    }
}

impl From<Vec<Float>> for Tolerance {
    fn from(val: Vec<Float>) -> Self {
        Tolerance::Vector(val)
    }
}

impl Tolerance {
    /// A vector tolerance must carry one entry per state component. Checked
    /// at integrator entry so a short vector surfaces as an error instead of
    /// an out-of-bounds access deep inside the error norm.
    pub(crate) fn check_dimension(&self, n: usize) -> Result<(), Error> {
        match self {
            Tolerance::Scalar(_) => Ok(()),
            Tolerance::Vector(vs) if vs.len() == n => Ok(()),
            Tolerance::Vector(vs) => Err(Error::DimensionMismatch {
                expected: n,
                actual: vs.len(),
            }),
        }
    }

    /// Componentwise scaling, used by the multistep starter which runs its
    /// single-step integrator at tighter tolerances than the main loop.
    pub fn scaled(&self, factor: Float) -> Tolerance {
        match self {
            Tolerance::Scalar(v) => Tolerance::Scalar(v * factor),
            Tolerance::Vector(vs) => Tolerance::Vector(vs.iter().map(|v| v * factor).collect()),
        }
    }
}

impl Index<usize> for Tolerance {
    type Output = Float;

    fn index(&self, index: usize) -> &Self::Output {
        match self {
            Tolerance::Scalar(v) => v,
            Tolerance::Vector(vs) => &vs[index],
        }
    }
}
