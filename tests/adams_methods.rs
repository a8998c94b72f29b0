use adastep::adams::{adams_bashforth, adams_moulton};
use adastep::dp::dop853;
use adastep::prelude::*;

mod common;
use common::{Decay, SHO, tight_args};

#[test]
fn bashforth_rejects_single_step_order() {
    let args: Args = Args::builder().build();
    assert!(matches!(
        adams_bashforth(&Decay, 0.0, 1.0, &[1.0], 1, args),
        Err(Error::NStepsTooSmall(1))
    ));
    let args: Args = Args::builder().build();
    assert!(matches!(
        adams_moulton(&Decay, 0.0, 1.0, &[1.0], 0, args),
        Err(Error::NStepsTooSmall(0))
    ));
}

#[test]
fn bashforth_matches_exponential_decay() {
    let sol = adams_bashforth(&Decay, 0.0, 2.0, &[1.0], 6, tight_args()).unwrap();
    assert_eq!(sol.status, Status::Success);
    assert_eq!(sol.x, 2.0);
    assert!((sol.y[0] - (-2.0f64).exp()).abs() < 1e-7);
}

#[test]
fn moulton_matches_exponential_decay() {
    let sol = adams_moulton(&Decay, 0.0, 2.0, &[1.0], 5, tight_args()).unwrap();
    assert_eq!(sol.status, Status::Success);
    assert_eq!(sol.x, 2.0);
    assert!((sol.y[0] - (-2.0f64).exp()).abs() < 1e-7);
}

#[test]
fn moulton_agrees_with_dop853() {
    let reference = dop853(&SHO, 0.0, 5.0, &[1.0, 0.0], tight_args()).unwrap();
    let sol = adams_moulton(&SHO, 0.0, 5.0, &[1.0, 0.0], 7, tight_args()).unwrap();
    assert!((sol.y[0] - reference.y[0]).abs() < 1e-6);
    assert!((sol.y[1] - reference.y[1]).abs() < 1e-6);
}

#[test]
fn adams_run_includes_startup_cost() {
    // the starter contributes its own derivative evaluations and steps
    let sol = adams_bashforth(&Decay, 0.0, 1.0, &[1.0], 4, tight_args()).unwrap();
    assert!(sol.naccpt > 0);
    assert!(sol.nfev > sol.naccpt);
}

/// Counts accepted-step callbacks.
struct StepCounter {
    calls: usize,
}

impl SolOut for StepCounter {
    fn solout(
        &mut self,
        _xold: Float,
        _x: Float,
        _y: &[Float],
        _interpolator: &mut dyn StepInterpolator,
        _is_last: bool,
    ) -> ControlFlag {
        self.calls += 1;
        ControlFlag::Continue
    }
}

#[test]
fn short_interval_still_drives_the_callback() {
    // an interval shorter than the start-up window is finished by the
    // starter method, which must keep reporting accepted steps
    let mut counter = StepCounter { calls: 0 };
    let args = Args::builder()
        .solout(&mut counter)
        .rtol(1e-8)
        .atol(1e-8)
        .build();
    let sol = adams_moulton(&Decay, 0.0, 0.05, &[1.0], 12, args).unwrap();
    assert_eq!(sol.status, Status::Success);
    assert!((sol.x - 0.05).abs() < 1e-12);
    assert!((sol.y[0] - (-0.05f64).exp()).abs() < 1e-8);
    assert!(counter.calls >= 1);
}

#[test]
fn moulton_integrates_backward() {
    let x0 = 1.0;
    let sol = adams_moulton(&Decay, x0, 0.0, &[(-1.0f64).exp()], 6, tight_args()).unwrap();
    assert_eq!(sol.status, Status::Success);
    assert!((sol.y[0] - 1.0).abs() < 1e-7);
    assert!(sol.h < 0.0);
}

#[test]
fn adams_respects_step_budget() {
    let args: Args = Args::builder().rtol(1e-12).atol(1e-12).nmax(3).build();
    let sol = adams_moulton(&SHO, 0.0, 100.0, &[1.0, 0.0], 5, args).unwrap();
    assert_eq!(sol.status, Status::NeedLargerNmax);
    assert!(sol.x < 100.0);
}
