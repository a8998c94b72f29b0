use adastep::dp::dop853;
use adastep::prelude::*;

mod common;
use common::{Decay, SHO};

/// Stops when the first state component crosses a level.
struct LevelStop {
    level: Float,
}

impl EventHandler for LevelStop {
    fn g(&mut self, _x: Float, y: &[Float]) -> Float {
        y[0] - self.level
    }

    fn event_occurred(&mut self, _x: Float, _y: &mut [Float], _increasing: bool) -> EventAction {
        EventAction::Stop
    }
}

#[test]
fn stop_event_localizes_crossing() {
    // e^{-t} = 0.5 at t = ln 2
    let mut handler = LevelStop { level: 0.5 };
    let mut events: Vec<&mut dyn EventHandler> = Vec::new();
    events.push(&mut handler);
    let args: Args = Args::builder()
        .events(events)
        .rtol(1e-10)
        .atol(1e-10)
        .build();
    let sol = dop853(&Decay, 0.0, 5.0, &[1.0], args).unwrap();
    assert_eq!(sol.status, Status::Interrupted);
    assert!((sol.x - 2.0f64.ln()).abs() < 1e-8);
    assert!((sol.y[0] - 0.5).abs() < 1e-8);
}

/// Fires only on crossings in one direction.
struct DirectedStop {
    direction: EventDirection,
}

impl EventHandler for DirectedStop {
    fn g(&mut self, _x: Float, y: &[Float]) -> Float {
        y[0]
    }

    fn event_occurred(&mut self, _x: Float, _y: &mut [Float], _increasing: bool) -> EventAction {
        EventAction::Stop
    }

    fn direction(&self) -> EventDirection {
        self.direction
    }
}

#[test]
fn direction_filter_skips_opposite_crossings() {
    // cos t first crosses zero downward at pi/2, upward at 3 pi / 2
    let mut handler = DirectedStop {
        direction: EventDirection::Positive,
    };
    let mut events: Vec<&mut dyn EventHandler> = Vec::new();
    events.push(&mut handler);
    let args: Args = Args::builder()
        .events(events)
        .rtol(1e-10)
        .atol(1e-10)
        .build();
    let sol = dop853(&SHO, 0.0, 2.0 * std::f64::consts::PI, &[1.0, 0.0], args).unwrap();
    assert_eq!(sol.status, Status::Interrupted);
    assert!((sol.x - 1.5 * std::f64::consts::PI).abs() < 1e-7);
}

/// Resets the state to 1 each time it decays to 1/2, stopping on the third hit.
struct Recharge {
    hits: usize,
}

impl EventHandler for Recharge {
    fn g(&mut self, _x: Float, y: &[Float]) -> Float {
        y[0] - 0.5
    }

    fn event_occurred(&mut self, _x: Float, y: &mut [Float], _increasing: bool) -> EventAction {
        self.hits += 1;
        if self.hits >= 3 {
            EventAction::Stop
        } else {
            y[0] = 1.0;
            EventAction::ResetState
        }
    }

    fn direction(&self) -> EventDirection {
        EventDirection::Negative
    }
}

#[test]
fn reset_state_restarts_integration() {
    // each recharge shifts the next crossing by ln 2
    let mut handler = Recharge { hits: 0 };
    let mut events: Vec<&mut dyn EventHandler> = Vec::new();
    events.push(&mut handler);
    let args: Args = Args::builder()
        .events(events)
        .rtol(1e-10)
        .atol(1e-10)
        .build();
    let sol = dop853(&Decay, 0.0, 10.0, &[1.0], args).unwrap();
    assert_eq!(sol.status, Status::Interrupted);
    assert!((sol.x - 3.0 * 2.0f64.ln()).abs() < 1e-6);
    assert!((sol.y[0] - 0.5).abs() < 1e-6);
}

/// Clamps the state onto the threshold itself when it decays to 1/2.
struct ClampToLevel {
    hits: usize,
}

impl EventHandler for ClampToLevel {
    fn g(&mut self, _x: Float, y: &[Float]) -> Float {
        y[0] - 0.5
    }

    fn event_occurred(&mut self, _x: Float, y: &mut [Float], _increasing: bool) -> EventAction {
        self.hits += 1;
        y[0] = 0.5;
        EventAction::ResetState
    }
}

#[test]
fn reset_onto_the_switching_surface_fires_once() {
    // restarting exactly at g = 0 must not re-detect the same event; the
    // integration continues to xend with a single recorded hit
    let mut handler = ClampToLevel { hits: 0 };
    let mut events: Vec<&mut dyn EventHandler> = Vec::new();
    events.push(&mut handler);
    let args: Args = Args::builder()
        .events(events)
        .rtol(1e-10)
        .atol(1e-10)
        .build();
    let sol = dop853(&Decay, 0.0, 5.0, &[1.0], args).unwrap();
    assert_eq!(sol.status, Status::Success);
    assert!((sol.x - 5.0).abs() < 1e-12);
    assert_eq!(handler.hits, 1);
}

#[test]
fn reset_state_rebuilds_multistep_history() {
    let mut handler = Recharge { hits: 0 };
    let options: IVPOptions = IVPOptions::builder()
        .method(Method::AdamsMoulton { n_steps: 5 })
        .rtol(1e-10)
        .atol(1e-10)
        .events(vec![&mut handler])
        .build();
    let sol = solve_ivp(&Decay, 0.0, 10.0, &[1.0], options).unwrap();
    assert_eq!(sol.status, Status::Interrupted);
    let (t, y) = sol.iter().last().unwrap();
    assert!((t - 3.0 * 2.0f64.ln()).abs() < 1e-6);
    assert!((y[0] - 0.5).abs() < 1e-6);
}
