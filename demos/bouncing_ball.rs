//! # Example: Bouncing Ball
//!
//! Event handling: a ball falls under gravity and bounces when it hits the
//! ground. The impact times are localized by the event machinery through
//! dense output; each bounce resets the state (velocity reversed and damped)
//! and the integration continues.

use adastep::prelude::*;

const G: f64 = 9.81;
const RESTITUTION: f64 = 0.8;

struct Ball;

impl ODE for Ball {
    fn ode(&self, _x: f64, y: &[f64], dydx: &mut [f64]) {
        dydx[0] = y[1]; // height
        dydx[1] = -G; // velocity
    }
}

struct Bounce {
    count: usize,
}

impl EventHandler for Bounce {
    fn g(&mut self, _x: f64, y: &[f64]) -> f64 {
        y[0]
    }

    fn event_occurred(&mut self, x: f64, y: &mut [f64], _increasing: bool) -> EventAction {
        self.count += 1;
        println!(
            "bounce {} at t = {:.6}, impact speed {:.4}",
            self.count, x, -y[1]
        );
        if self.count >= 8 {
            return EventAction::Stop;
        }
        y[0] = 0.0;
        y[1] = -RESTITUTION * y[1];
        EventAction::ResetState
    }

    fn direction(&self) -> EventDirection {
        // only falling through the ground counts
        EventDirection::Negative
    }
}

fn main() {
    let f = Ball;
    let mut bounce = Bounce { count: 0 };
    let y0 = [2.0, 0.0]; // dropped from 2 m

    let mut events: Vec<&mut dyn EventHandler> = Vec::new();
    events.push(&mut bounce);
    let options: IVPOptions = IVPOptions::builder()
        .rtol(1e-9)
        .atol(1e-9)
        .events(events)
        .build();

    match solve_ivp(&f, 0.0, 20.0, &y0, options) {
        Ok(sol) => {
            println!("Final status: {:?}", sol.status);
            if let Some((t, y)) = sol.iter().last() {
                println!("stopped at t = {:.6}, height {:.6}", t, y[0]);
            }
        }
        Err(e) => eprintln!("Integration failed: {}", e),
    }
}
