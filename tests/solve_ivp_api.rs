use adastep::prelude::*;

mod common;
use common::Decay;

#[test]
fn t_eval_controls_the_sample_grid() {
    let t_eval: Vec<Float> = (0..=10).map(|i| 0.5 * i as Float).collect();
    let options: IVPOptions = IVPOptions::builder()
        .rtol(1e-10)
        .atol(1e-10)
        .t_eval(t_eval.clone())
        .build();
    let sol = solve_ivp(&Decay, 0.0, 5.0, &[1.0], options).unwrap();
    assert_eq!(sol.status, Status::Success);
    assert_eq!(sol.t.len(), t_eval.len());
    for (i, (t, y)) in sol.iter().enumerate() {
        assert!((t - t_eval[i]).abs() < 1e-9);
        assert!((y[0] - (-t).exp()).abs() < 1e-8, "off at t = {}", t);
    }
}

#[test]
fn step_endpoints_are_recorded_by_default() {
    let options: IVPOptions = IVPOptions::builder().rtol(1e-8).atol(1e-8).build();
    let sol = solve_ivp(&Decay, 0.0, 5.0, &[1.0], options).unwrap();
    assert!(sol.t.len() >= 2);
    assert_eq!(sol.t[0], 0.0);
    assert_eq!(*sol.t.last().unwrap(), 5.0);
    assert!(sol.t.windows(2).all(|w| w[0] < w[1]));
    assert_eq!(sol.y[0][0], 1.0);
}

#[test]
fn every_method_reaches_the_end() {
    let methods = [
        Method::Euler,
        Method::Midpoint,
        Method::RK4,
        Method::ThreeEighths,
        Method::Gill,
        Method::HighamHall,
        Method::DOP853,
        Method::AdamsBashforth { n_steps: 4 },
        Method::AdamsMoulton { n_steps: 4 },
    ];
    let exact = (-1.0f64).exp();
    for method in methods {
        let options: IVPOptions = IVPOptions::builder()
            .method(method)
            .rtol(1e-8)
            .atol(1e-8)
            .build();
        let sol = solve_ivp(&Decay, 0.0, 1.0, &[1.0], options).unwrap();
        assert_eq!(sol.status, Status::Success, "{:?} did not finish", method);
        let (t, y) = sol.iter().last().unwrap();
        assert_eq!(t, 1.0);
        assert!(
            (y[0] - exact).abs() < 5e-3,
            "{:?} off by {}",
            method,
            (y[0] - exact).abs()
        );
    }
}

#[test]
fn fixed_step_methods_honor_first_step() {
    let options: IVPOptions = IVPOptions::builder()
        .method(Method::RK4)
        .first_step(0.001)
        .build();
    let sol = solve_ivp(&Decay, 0.0, 1.0, &[1.0], options).unwrap();
    // 1000 steps of size 0.001
    assert_eq!(sol.nstep, 1000);
    assert!((sol.y.last().unwrap()[0] - (-1.0f64).exp()).abs() < 1e-10);
}

#[test]
fn user_callback_can_substitute_the_state() {
    struct Frozen;
    impl ODE for Frozen {
        fn ode(&self, _x: Float, _y: &[Float], dydx: &mut [Float]) {
            dydx[0] = 0.0;
        }
    }
    struct Jump {
        fired: bool,
    }
    impl SolOut for Jump {
        fn solout(
            &mut self,
            _xold: Float,
            x: Float,
            _y: &[Float],
            _interpolator: &mut dyn StepInterpolator,
            _is_last: bool,
        ) -> ControlFlag {
            if !self.fired && x >= 0.5 {
                self.fired = true;
                return ControlFlag::ModifiedSolution(x, vec![5.0]);
            }
            ControlFlag::Continue
        }
    }

    let mut jump = Jump { fired: false };
    let options = IVPOptions::builder()
        .method(Method::RK4)
        .first_step(0.1)
        .solout(&mut jump)
        .build();
    let sol = solve_ivp(&Frozen, 0.0, 1.0, &[1.0], options).unwrap();
    assert_eq!(sol.status, Status::Success);
    let (t, y) = sol.iter().last().unwrap();
    assert_eq!(t, 1.0);
    assert_eq!(y[0], 5.0);
}

#[test]
fn user_callback_sees_every_accepted_step() {
    struct Counter {
        calls: usize,
    }
    impl SolOut for Counter {
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

    let mut counter = Counter { calls: 0 };
    let options = IVPOptions::builder()
        .rtol(1e-8)
        .atol(1e-8)
        .solout(&mut counter)
        .build();
    let sol = solve_ivp(&Decay, 0.0, 5.0, &[1.0], options).unwrap();
    // endpoints: initial point plus one per accepted step
    assert_eq!(counter.calls + 1, sol.t.len());
    assert!(counter.calls > 0);
}
