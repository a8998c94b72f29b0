use adastep::dp::dop853;
use adastep::prelude::*;
use adastep::rk::higham_hall;

mod common;
use common::{Decay, SHO};

#[test]
fn evaluation_budget_is_enforced() {
    let args: Args = Args::builder().max_evaluations(10).build();
    assert!(matches!(
        dop853(&SHO, 0.0, 100.0, &[1.0, 0.0], args),
        Err(Error::MaxEvaluationsExceeded { max: 10 })
    ));
    let args: Args = Args::builder().max_evaluations(10).build();
    assert!(matches!(
        higham_hall(&SHO, 0.0, 100.0, &[1.0, 0.0], args),
        Err(Error::MaxEvaluationsExceeded { max: 10 })
    ));
}

#[test]
fn step_budget_is_a_status_not_an_error() {
    let args: Args = Args::builder().rtol(1e-10).atol(1e-10).nmax(5).build();
    let sol = dop853(&SHO, 0.0, 1000.0, &[1.0, 0.0], args).unwrap();
    assert_eq!(sol.status, Status::NeedLargerNmax);
    assert!(sol.x < 1000.0);
    assert!(sol.nstep <= 5);
}

#[test]
fn safety_factor_is_validated() {
    let args: Args = Args::builder().safety_factor(1.5).build();
    assert!(matches!(
        dop853(&Decay, 0.0, 1.0, &[1.0], args),
        Err(Error::SafetyFactorOutOfRange(_))
    ));
    let args: Args = Args::builder().safety_factor(1e-5).build();
    assert!(matches!(
        dop853(&Decay, 0.0, 1.0, &[1.0], args),
        Err(Error::SafetyFactorOutOfRange(_))
    ));
}

#[test]
fn uround_is_validated() {
    let args: Args = Args::builder().uround(2.0).build();
    assert!(matches!(
        dop853(&Decay, 0.0, 1.0, &[1.0], args),
        Err(Error::URoundOutOfRange(_))
    ));
}

#[test]
fn beta_is_validated() {
    let args: Args = Args::builder().beta(0.3).build();
    assert!(matches!(
        dop853(&Decay, 0.0, 1.0, &[1.0], args),
        Err(Error::BetaOutOfRange(_))
    ));
}

#[test]
fn short_tolerance_vector_is_rejected() {
    // a vector tolerance must match the state dimension
    let args: Args = Args::builder().atol(vec![1e-6]).build();
    assert!(matches!(
        dop853(&SHO, 0.0, 1.0, &[1.0, 0.0], args),
        Err(Error::DimensionMismatch {
            expected: 2,
            actual: 1
        })
    ));
    let args: Args = Args::builder().rtol(vec![1e-6, 1e-6, 1e-6]).build();
    assert!(matches!(
        higham_hall(&SHO, 0.0, 1.0, &[1.0, 0.0], args),
        Err(Error::DimensionMismatch {
            expected: 2,
            actual: 3
        })
    ));
}

#[test]
fn min_step_bound_aborts_when_unreachable() {
    // forcing a minimal step far larger than the tolerances allow
    let args: Args = Args::builder()
        .rtol(1e-12)
        .atol(1e-12)
        .hmin(0.5)
        .h0(0.5)
        .build();
    assert!(matches!(
        higham_hall(&SHO, 0.0, 10.0, &[1.0, 0.0], args),
        Err(Error::StepTooSmall { .. })
    ));
}

#[test]
fn errors_format_for_display() {
    let err = Error::MaxEvaluationsExceeded { max: 10 };
    assert!(err.to_string().contains("10"));
    let err = Error::StepTooSmall {
        h: 1e-20,
        min_step: 1e-10,
    };
    assert!(!err.to_string().is_empty());
}
