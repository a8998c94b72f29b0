//! Transformations between multistep history and Nordsieck vectors.
//!
//! The Adams methods store their history as a Nordsieck vector of scaled
//! derivatives `[h^2/2 y'', h^3/6 y''', ...]` rather than as past states.
//! Advancing the history by one step is a linear map whose matrix depends
//! only on the number of steps, so one transformer per step count is built
//! once and shared process-wide.
//!
//! The change-of-basis matrix `P` (and everything derived from it) is
//! computed in exact rational arithmetic and converted to floating point
//! only at the very end; the entries grow combinatorially and accumulate
//! unacceptable rounding error when eliminated in `f64`.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, OnceLock};

use nalgebra::DMatrix;
use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{ToPrimitive, Zero};

use crate::{Error, Float};

static CACHE: OnceLock<Mutex<HashMap<usize, Arc<NordsieckTransformer>>>> = OnceLock::new();

/// Precomputed Nordsieck update data for a fixed number of steps.
///
/// Instances are immutable and shared behind an `Arc`; repeated and
/// concurrent [`NordsieckTransformer::get_instance`] calls for the same step
/// count return the same instance, so results are bit-identical across
/// integrations.
#[derive(Debug)]
pub struct NordsieckTransformer {
    /// Update matrix applied to the Nordsieck vector at each step advance.
    update: DMatrix<Float>,
    /// Correction coefficients folding the change of the scaled first
    /// derivative back into the higher orders.
    c1: Vec<Float>,
}

impl NordsieckTransformer {
    /// Get the transformer for the given number of steps, building and
    /// memoizing it on first use.
    pub fn get_instance(n_steps: usize) -> Result<Arc<NordsieckTransformer>, Error> {
        let cache = CACHE.get_or_init(|| Mutex::new(HashMap::new()));
        let mut guard = match cache.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        if let Some(transformer) = guard.get(&n_steps) {
            return Ok(Arc::clone(transformer));
        }
        let transformer = Arc::new(NordsieckTransformer::build(n_steps)?);
        guard.insert(n_steps, Arc::clone(&transformer));
        Ok(transformer)
    }

    fn build(n_steps: usize) -> Result<NordsieckTransformer, Error> {
        let p = build_p(n_steps);

        // c1 solves P c1 = [1, 1, ..., 1]
        let ones = vec![vec![BigRational::from_integer(BigInt::from(1))]; n_steps];
        let c1 = solve_exact(p.clone(), ones).ok_or(Error::SingularSystem)?;

        // the update matrix is P^-1 * (P with its rows shifted down one,
        // the freed top row zeroed)
        let mut shifted = vec![vec![BigRational::zero(); n_steps]; n_steps];
        for i in 1..n_steps {
            shifted[i] = p[i - 1].clone();
        }
        let update = solve_exact(p, shifted).ok_or(Error::SingularSystem)?;

        Ok(NordsieckTransformer {
            update: DMatrix::from_fn(n_steps, n_steps, |i, j| to_float(&update[i][j])),
            c1: c1.iter().map(|row| to_float(&row[0])).collect(),
        })
    }

    /// Number of steps this transformer was built for.
    pub fn n_steps(&self) -> usize {
        self.c1.len()
    }

    /// Initialize the high-order scaled derivatives from start-up samples.
    ///
    /// `t`, `y` and `y_dot` hold `n_steps + 1` samples produced by the
    /// starter integrator. Writing the Taylor expansions of `y(t_i)` and
    /// `y'(t_i)` around the first sample gives two equations per later
    /// sample in the unknown scaled derivatives (plus one extra unknown
    /// absorbing the truncation remainder), solved in the least-squares
    /// sense by QR. The remainder row is dropped from the result.
    pub fn initialize_high_order_derivatives(
        &self,
        h: Float,
        t: &[Float],
        y: &[Vec<Float>],
        y_dot: &[Vec<Float>],
    ) -> Result<DMatrix<Float>, Error> {
        let n = self.c1.len();
        let dim = y[0].len();
        let rows = 2 * (y.len() - 1);
        let cols = n + 1;

        let mut a = DMatrix::<Float>::zeros(rows, cols);
        let mut b = DMatrix::<Float>::zeros(rows, dim);
        for i in 1..y.len() {
            let di = t[i] - t[0];
            let ratio = di / h;
            // di^(k-1) / h^k for k = j + 2
            let mut dik_m1_ohk = 1.0 / h;
            for j in 0..cols {
                dik_m1_ohk *= ratio;
                a[(2 * i - 2, j)] = di * dik_m1_ohk;
                a[(2 * i - 1, j)] = (j as Float + 2.0) * dik_m1_ohk;
            }
            for k in 0..dim {
                b[(2 * i - 2, k)] = y[i][k] - y[0][k] - di * y_dot[0][k];
                b[(2 * i - 1, k)] = y_dot[i][k] - y_dot[0][k];
            }
        }

        // least squares: R x = Q^T b
        let qr = a.qr();
        qr.q_tr_mul(&mut b);
        let r = qr.r();
        let x = r
            .solve_upper_triangular(&b.rows(0, cols).into_owned())
            .ok_or(Error::SingularSystem)?;

        // keep the Nordsieck rows, drop the remainder row
        Ok(x.rows(0, n).into_owned())
    }

    /// Linear part of the Nordsieck update: multiply by the update matrix.
    pub fn update_high_order_derivatives_phase1(
        &self,
        high_order: &DMatrix<Float>,
    ) -> DMatrix<Float> {
        &self.update * high_order
    }

    /// Correction part of the Nordsieck update: fold the change of the
    /// scaled first derivative over the step into the higher orders,
    /// in place.
    pub fn update_high_order_derivatives_phase2(
        &self,
        start: &[Float],
        end: &[Float],
        high_order: &mut DMatrix<Float>,
    ) {
        for i in 0..self.c1.len() {
            let c1_i = self.c1[i];
            for j in 0..start.len() {
                high_order[(i, j)] += c1_i * (start[j] - end[j]);
            }
        }
    }
}

/// `P[i][j] = (-(i+1))^(j+1) * (j+2)`, the change of basis between the
/// multistep history and the Nordsieck vector.
fn build_p(n: usize) -> Vec<Vec<BigRational>> {
    let mut p = vec![vec![BigRational::zero(); n]; n];
    for (i, row) in p.iter_mut().enumerate() {
        let factor = BigInt::from(-(i as i64 + 1));
        let mut aj = factor.clone();
        for (j, entry) in row.iter_mut().enumerate() {
            *entry = BigRational::from_integer(&aj * BigInt::from(j as i64 + 2));
            aj *= &factor;
        }
    }
    p
}

/// Exact Gauss-Jordan solve of `A X = B` with partial pivoting. Returns
/// `None` when `A` is singular.
fn solve_exact(
    mut a: Vec<Vec<BigRational>>,
    mut b: Vec<Vec<BigRational>>,
) -> Option<Vec<Vec<BigRational>>> {
    let n = a.len();
    for col in 0..n {
        let pivot = (col..n).find(|&r| !a[r][col].is_zero())?;
        a.swap(col, pivot);
        b.swap(col, pivot);

        let inv = a[col][col].recip();
        for j in col..n {
            a[col][j] = &a[col][j] * &inv;
        }
        for j in 0..b[col].len() {
            b[col][j] = &b[col][j] * &inv;
        }

        let pivot_row = a[col].clone();
        let pivot_rhs = b[col].clone();
        for r in 0..n {
            if r == col || a[r][col].is_zero() {
                continue;
            }
            let f = a[r][col].clone();
            for j in col..n {
                let delta = &f * &pivot_row[j];
                a[r][j] = &a[r][j] - &delta;
            }
            for j in 0..pivot_rhs.len() {
                let delta = &f * &pivot_rhs[j];
                b[r][j] = &b[r][j] - &delta;
            }
        }
    }
    Some(b)
}

fn to_float(r: &BigRational) -> Float {
    r.to_f64().unwrap_or(Float::NAN) as Float
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn two_step_coefficients_are_exact() {
        // For n = 2, P = [[-2, 3], [-4, 12]]; solving by hand gives
        // c1 = [-3/4, -1/6] and update = [[-1/2, 3/4], [-1/3, 1/2]].
        let t = NordsieckTransformer::get_instance(2).unwrap();
        assert_eq!(t.n_steps(), 2);
        assert_relative_eq!(t.c1[0], -0.75);
        assert_relative_eq!(t.c1[1], -1.0 / 6.0);
        assert_relative_eq!(t.update[(0, 0)], -0.5);
        assert_relative_eq!(t.update[(0, 1)], 0.75);
        assert_relative_eq!(t.update[(1, 0)], -1.0 / 3.0);
        assert_relative_eq!(t.update[(1, 1)], 0.5);
    }

    #[test]
    fn instances_are_shared() {
        let a = NordsieckTransformer::get_instance(3).unwrap();
        let b = NordsieckTransformer::get_instance(3).unwrap();
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn concurrent_instances_are_shared() {
        let handles: Vec<_> = (0..4)
            .map(|_| std::thread::spawn(|| NordsieckTransformer::get_instance(5).unwrap()))
            .collect();
        let instances: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        for pair in instances.windows(2) {
            assert!(Arc::ptr_eq(&pair[0], &pair[1]));
        }
    }

    #[test]
    fn bootstrap_recovers_quadratic_derivatives() {
        // y = t^2: the only nonzero scaled derivative is h^2/2 y'' = h^2.
        let t = NordsieckTransformer::get_instance(2).unwrap();
        let h = 0.1;
        let ts = [0.0, 0.1, 0.2];
        let ys: Vec<Vec<Float>> = ts.iter().map(|&ti| vec![ti * ti]).collect();
        let yds: Vec<Vec<Float>> = ts.iter().map(|&ti| vec![2.0 * ti]).collect();
        let nordsieck = t
            .initialize_high_order_derivatives(h, &ts, &ys, &yds)
            .unwrap();
        assert_relative_eq!(nordsieck[(0, 0)], h * h, epsilon = 1e-12);
        assert_relative_eq!(nordsieck[(1, 0)], 0.0, epsilon = 1e-12);
    }

    #[test]
    fn phase2_folds_first_derivative_change() {
        let t = NordsieckTransformer::get_instance(2).unwrap();
        let mut high = DMatrix::from_element(2, 1, 0.0);
        t.update_high_order_derivatives_phase2(&[1.0], &[3.0], &mut high);
        // start - end = -2, scaled by c1
        assert_relative_eq!(high[(0, 0)], -0.75 * -2.0);
        assert_relative_eq!(high[(1, 0)], -1.0 / 6.0 * -2.0);
    }
}
