//! State partitioning between primary and secondary equation sets.

use crate::{Error, Float, ode::ODE};

/// Maps one equation set to a segment of a flat state array.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EquationsMapper {
    first_index: usize,
    dimension: usize,
}

impl EquationsMapper {
    pub fn new(first_index: usize, dimension: usize) -> Self {
        Self {
            first_index,
            dimension,
        }
    }

    pub fn first_index(&self) -> usize {
        self.first_index
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Copy this segment out of a complete state array.
    pub fn extract(&self, complete: &[Float], segment: &mut [Float]) -> Result<(), Error> {
        if segment.len() != self.dimension {
            return Err(Error::DimensionMismatch {
                expected: self.dimension,
                actual: segment.len(),
            });
        }
        segment.copy_from_slice(&complete[self.first_index..self.first_index + self.dimension]);
        Ok(())
    }

    /// Copy a segment into a complete state array.
    pub fn insert(&self, segment: &[Float], complete: &mut [Float]) -> Result<(), Error> {
        if segment.len() != self.dimension {
            return Err(Error::DimensionMismatch {
                expected: self.dimension,
                actual: segment.len(),
            });
        }
        complete[self.first_index..self.first_index + self.dimension].copy_from_slice(segment);
        Ok(())
    }
}

/// Equations integrated alongside a primary ODE, e.g. variational equations.
///
/// Secondary equations see the primary state and its derivative but only
/// write their own derivative segment.
pub trait SecondaryODE {
    fn dimension(&self) -> usize;

    fn ode(
        &self,
        x: Float,
        primary: &[Float],
        primary_dot: &[Float],
        secondary: &[Float],
        secondary_dot: &mut [Float],
    );
}

/// A primary ODE with zero or more appended secondary equation sets,
/// presented to the integrators as one flat system.
///
/// The segments tile the complete state: primary first, then each secondary
/// set in registration order. [`ExpandedODE::primary_dimension`] is the
/// number of leading components that should participate in error control
/// (pass it as `error_dimension` in [`crate::Args`]).
pub struct ExpandedODE<'a, F: ODE> {
    primary: &'a F,
    primary_mapper: EquationsMapper,
    secondary: Vec<&'a dyn SecondaryODE>,
    secondary_mappers: Vec<EquationsMapper>,
    total_dimension: usize,
}

impl<'a, F: ODE> ExpandedODE<'a, F> {
    pub fn new(primary: &'a F, primary_dimension: usize) -> Self {
        Self {
            primary,
            primary_mapper: EquationsMapper::new(0, primary_dimension),
            secondary: Vec::new(),
            secondary_mappers: Vec::new(),
            total_dimension: primary_dimension,
        }
    }

    /// Append a secondary equation set; returns its index.
    pub fn add_secondary(&mut self, equations: &'a dyn SecondaryODE) -> usize {
        let mapper = EquationsMapper::new(self.total_dimension, equations.dimension());
        self.total_dimension += equations.dimension();
        self.secondary.push(equations);
        self.secondary_mappers.push(mapper);
        self.secondary_mappers.len() - 1
    }

    pub fn primary_dimension(&self) -> usize {
        self.primary_mapper.dimension()
    }

    pub fn total_dimension(&self) -> usize {
        self.total_dimension
    }

    pub fn primary_mapper(&self) -> EquationsMapper {
        self.primary_mapper
    }

    pub fn secondary_mapper(&self, index: usize) -> EquationsMapper {
        self.secondary_mappers[index]
    }
}

impl<F: ODE> ODE for ExpandedODE<'_, F> {
    fn ode(&self, x: Float, y: &[Float], dydx: &mut [Float]) {
        let np = self.primary_mapper.dimension();
        let (y_primary, y_secondary) = y.split_at(np);
        let (dot_primary, dot_secondary) = dydx.split_at_mut(np);
        self.primary.ode(x, y_primary, dot_primary);
        let mut offset = 0;
        for (eqs, mapper) in self.secondary.iter().zip(&self.secondary_mappers) {
            let dim = mapper.dimension();
            eqs.ode(
                x,
                y_primary,
                dot_primary,
                &y_secondary[offset..offset + dim],
                &mut dot_secondary[offset..offset + dim],
            );
            offset += dim;
        }
    }
}
