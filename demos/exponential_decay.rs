//! # Example: Exponential Decay
//!
//! Solve the exponential decay equation dy/dx = -y with y(0) = 1, sampling
//! the solution at evenly spaced points through dense output.

use adastep::prelude::*;

struct Decay;

impl ODE for Decay {
    fn ode(&self, _x: f64, y: &[f64], dydx: &mut [f64]) {
        for i in 0..y.len() {
            dydx[i] = -y[i];
        }
    }
}

fn main() {
    let f = Decay;
    let x0 = 0.0;
    let xend = 5.0;
    let y0 = [1.0];
    let t_eval: Vec<f64> = (0..=50).map(|i| i as f64 * 0.1).collect();

    let options: IVPOptions = IVPOptions::builder()
        // Default method is DOP853
        .rtol(1e-8)
        .atol(1e-8)
        .t_eval(t_eval)
        .build();

    match solve_ivp(&f, x0, xend, &y0, options) {
        Ok(sol) => {
            println!("Final status: {:?}", sol.status);
            println!("Number of function evaluations: {}", sol.nfev);
            println!("Number of steps taken: {}", sol.nstep);
            println!("Number of accepted steps: {}", sol.naccpt);
            println!("Number of rejected steps: {}", sol.nrejct);

            for (ti, yi) in sol.iter() {
                println!("x = {:.4}, y = {:.8}  (exact {:.8})", ti, yi[0], (-ti).exp());
            }
        }
        Err(e) => eprintln!("Integration failed: {}", e),
    }
}
