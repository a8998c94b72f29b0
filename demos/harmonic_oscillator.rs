//! # Example: Harmonic Oscillator
//!
//! Integrate y'' = -y over several periods with different methods and
//! compare the final states against the analytic solution.

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
    let xend = 6.0 * PI; // three periods
    let y0 = [1.0, 0.0];

    let methods = [
        ("Higham-Hall 5(4)", Method::HighamHall),
        ("DOP853", Method::DOP853),
        ("Adams-Bashforth (8)", Method::AdamsBashforth { n_steps: 8 }),
        ("Adams-Moulton (7)", Method::AdamsMoulton { n_steps: 7 }),
    ];

    for (name, method) in methods {
        let options: IVPOptions = IVPOptions::builder()
            .method(method)
            .rtol(1e-10)
            .atol(1e-10)
            .build();
        match solve_ivp(&f, x0, xend, &y0, options) {
            Ok(sol) => {
                let yf = sol.y.last().map(|y| y[0]).unwrap_or(f64::NAN);
                println!(
                    "{:<22} y(3T) = {:>13.10} (exact 1), error {:>9.2e}, nfev {:>5}, accepted {:>4}",
                    name,
                    yf,
                    (yf - 1.0).abs(),
                    sol.nfev,
                    sol.naccpt
                );
            }
            Err(e) => eprintln!("{:<22} failed: {}", name, e),
        }
    }
}
