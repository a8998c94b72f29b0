use adastep::prelude::*;

mod common;
use common::{SHO, default_opts_dense};

#[test]
fn backward_integration_works() {
    let x0 = 2.0 * std::f64::consts::PI;
    let xend = 0.0;
    let y0 = [1.0, 0.0];
    for method in [
        Method::HighamHall,
        Method::DOP853,
        Method::AdamsBashforth { n_steps: 8 },
        Method::AdamsMoulton { n_steps: 7 },
    ] {
        let mut sol = solve_ivp(&SHO, x0, xend, &y0, default_opts_dense(method)).unwrap();
        // Check we got a span and can evaluate at mid
        if let Some((t0, t1)) = sol.sol_span() {
            assert!(t0 > t1); // backward span
            let mid = 0.5 * (t0 + t1);
            let y_mid = sol.sol(mid).unwrap();
            let y_ref0 = mid.cos();
            let y_ref1 = -mid.sin();
            assert!((y_mid[0] - y_ref0).abs() < 1e-6);
            assert!((y_mid[1] - y_ref1).abs() < 1e-6);
        } else {
            panic!("no dense span");
        }
    }
}

#[test]
fn dense_queries_outside_span_return_none() {
    let x0 = 0.0;
    let xend = 1.0;
    let y0 = [1.0, 0.0];
    let mut sol = solve_ivp(&SHO, x0, xend, &y0, default_opts_dense(Method::DOP853)).unwrap();
    assert!(sol.sol(-0.5).is_none());
    assert!(sol.sol(1.5).is_none());
    assert!(sol.sol(0.5).is_some());
    // both boundaries are part of the covered span
    assert!(sol.sol(0.0).is_some());
    assert!(sol.sol(1.0).is_some());
}

#[test]
fn dense_output_disabled_gives_no_span() {
    let options: IVPOptions = IVPOptions::builder().rtol(1e-9).atol(1e-9).build();
    let mut sol = solve_ivp(&SHO, 0.0, 1.0, &[1.0, 0.0], options).unwrap();
    assert!(sol.sol_span().is_none());
    assert!(sol.sol(0.5).is_none());
}
