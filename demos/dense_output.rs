//! # Example: Dense output on a harmonic oscillator
//!
//! Retain the continuous solution of a whole integration and evaluate it on
//! a fine grid afterwards, comparing against the analytic reference.

use adastep::prelude::*;
use std::f64::consts::PI;

struct SHO;

impl ODE for SHO {
    fn ode(&self, _x: f64, y: &[f64], dydx: &mut [f64]) {
        dydx[0] = y[1];
        dydx[1] = -y[0];
    }
}

fn main() {
    let f = SHO;
    let x0 = 0.0;
    let xend = 2.0 * PI; // one period
    let y0 = [1.0, 0.0];

    let options: IVPOptions = IVPOptions::builder()
        .rtol(1e-9)
        .atol(1e-9)
        .dense_output(true)
        .build();

    let mut sol = solve_ivp(&f, x0, xend, &y0, options).expect("solve_ivp failed");
    println!("Final status: {:?}", sol.status);
    println!(
        "Steps: {} (accepted {} / rejected {})",
        sol.nstep, sol.naccpt, sol.nrejct
    );

    // evaluate the continuous solution on a fine grid
    if let Some((t0, t1)) = sol.sol_span() {
        let npts = 40;
        for i in 0..=npts {
            let t = t0 + (t1 - t0) * (i as f64) / (npts as f64);
            if let Some(y) = sol.sol(t) {
                if i % 8 == 0 {
                    println!(
                        "t = {:>7.4}, y = [{:>9.6}, {:>9.6}]  ref = [{:>9.6}, {:>9.6}]",
                        t,
                        y[0],
                        y[1],
                        t.cos(),
                        -t.sin()
                    );
                }
            }
        }
    } else {
        println!("dense output was not enabled");
    }
}
