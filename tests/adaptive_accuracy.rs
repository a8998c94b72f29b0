use adastep::dp::dop853;
use adastep::prelude::*;
use adastep::rk::higham_hall;
use adastep::{ExpandedODE, SecondaryODE};

mod common;
use common::{Decay, SHO, tight_args};

#[test]
fn dop853_tracks_oscillator_over_one_period() {
    let xend = 2.0 * std::f64::consts::PI;
    let sol = dop853(&SHO, 0.0, xend, &[1.0, 0.0], tight_args()).unwrap();
    assert_eq!(sol.status, Status::Success);
    assert_eq!(sol.x, xend);
    assert!((sol.y[0] - 1.0).abs() < 1e-8);
    assert!(sol.y[1].abs() < 1e-8);
    assert_eq!(sol.naccpt + sol.nrejct, sol.nstep);
    assert!(sol.nfev > sol.nstep);
}

#[test]
fn higham_hall_tracks_oscillator_over_one_period() {
    let xend = 2.0 * std::f64::consts::PI;
    let sol = higham_hall(&SHO, 0.0, xend, &[1.0, 0.0], tight_args()).unwrap();
    assert_eq!(sol.status, Status::Success);
    assert_eq!(sol.x, xend);
    assert!((sol.y[0] - 1.0).abs() < 1e-7);
    assert!(sol.y[1].abs() < 1e-7);
    assert_eq!(sol.naccpt + sol.nrejct, sol.nstep);
}

#[test]
fn adaptive_respects_caller_first_step() {
    let args: Args = Args::builder().rtol(1e-8).atol(1e-8).h0(1e-3).build();
    let sol = dop853(&Decay, 0.0, 1.0, &[1.0], args).unwrap();
    assert_eq!(sol.status, Status::Success);
    assert!((sol.y[0] - (-1.0f64).exp()).abs() < 1e-8);
}

#[test]
fn lund_stabilization_keeps_the_accuracy() {
    // the damped controller changes the step sequence, not the answer
    let xend = 2.0 * std::f64::consts::PI;
    let args: Args = Args::builder().rtol(1e-10).atol(1e-10).beta(0.04).build();
    let sol = dop853(&SHO, 0.0, xend, &[1.0, 0.0], args).unwrap();
    assert_eq!(sol.status, Status::Success);
    assert!((sol.y[0] - 1.0).abs() < 1e-8);
    assert!(sol.y[1].abs() < 1e-8);
}

/// Stops the integration as soon as the abscissa passes a threshold.
struct StopAfter {
    threshold: Float,
}

impl SolOut for StopAfter {
    fn solout(
        &mut self,
        _xold: Float,
        x: Float,
        _y: &[Float],
        _interpolator: &mut dyn StepInterpolator,
        _is_last: bool,
    ) -> ControlFlag {
        if x >= self.threshold {
            ControlFlag::Interrupt
        } else {
            ControlFlag::Continue
        }
    }
}

#[test]
fn solout_interrupt_stops_cleanly() {
    let mut stopper = StopAfter { threshold: 1.0 };
    let args = Args::builder()
        .solout(&mut stopper)
        .rtol(1e-9)
        .atol(1e-9)
        .build();
    let sol = dop853(&SHO, 0.0, 10.0, &[1.0, 0.0], args).unwrap();
    assert_eq!(sol.status, Status::Interrupted);
    assert!(sol.x >= 1.0);
    assert!(sol.x < 10.0);
    // the returned state belongs to the interrupted abscissa
    assert!((sol.y[0] - sol.x.cos()).abs() < 1e-7);
}

/// Quadrature s' = y_0 appended to the primary system.
struct Quadrature;

impl SecondaryODE for Quadrature {
    fn dimension(&self) -> usize {
        1
    }

    fn ode(
        &self,
        _x: Float,
        primary: &[Float],
        _primary_dot: &[Float],
        _secondary: &[Float],
        secondary_dot: &mut [Float],
    ) {
        secondary_dot[0] = primary[0];
    }
}

#[test]
fn secondary_equations_ride_along() {
    // integral of e^{-t} over [0, 2] is 1 - e^{-2}
    let quadrature = Quadrature;
    let mut expanded = ExpandedODE::new(&Decay, 1);
    expanded.add_secondary(&quadrature);
    let args: Args = Args::builder()
        .rtol(1e-10)
        .atol(1e-10)
        .error_dimension(expanded.primary_dimension())
        .build();
    let sol = dop853(&expanded, 0.0, 2.0, &[1.0, 0.0], args).unwrap();
    assert_eq!(sol.status, Status::Success);
    assert!((sol.y[0] - (-2.0f64).exp()).abs() < 1e-9);
    assert!((sol.y[1] - (1.0 - (-2.0f64).exp())).abs() < 1e-8);
}

#[test]
fn dop853_interpolator_matches_solution_inside_steps() {
    let mut model = ContinuousOutputModel::new();
    let args = Args::builder()
        .solout(&mut model)
        .rtol(1e-10)
        .atol(1e-10)
        .build();
    dop853(&SHO, 0.0, 4.0, &[1.0, 0.0], args).unwrap();
    for i in 0..=40 {
        let t = 0.1 * i as Float;
        model.set_interpolated_time(t);
        let y = model.interpolated_state();
        assert!((y[0] - t.cos()).abs() < 1e-8, "state off at t = {}", t);
        let dy = model.interpolated_derivatives().to_vec();
        assert!((dy[0] + t.sin()).abs() < 1e-6, "derivative off at t = {}", t);
    }
}
