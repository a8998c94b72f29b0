use adastep::prelude::*;
use adastep::rk::{euler, gill, midpoint, rk4, three_eighths};

mod common;
use common::Decay;

/// Global error of a fixed-step run on y' = -y over [0, 1].
fn decay_error<I>(integrate: I, h: Float) -> Float
where
    I: Fn(&Decay, Float, Float, &[Float], Float, Args<'_, '_>) -> Result<Solution, Error>,
{
    let args: Args = Args::builder().build();
    let sol = integrate(&Decay, 0.0, 1.0, &[1.0], h, args).unwrap();
    assert_eq!(sol.status, Status::Success);
    (sol.y[0] - (-1.0f64).exp()).abs()
}

/// Halving the step must shrink the global error by about 2^p.
fn assert_order<I>(integrate: I, expected_ratio: (Float, Float))
where
    I: Fn(&Decay, Float, Float, &[Float], Float, Args<'_, '_>) -> Result<Solution, Error> + Copy,
{
    let e1 = decay_error(integrate, 0.1);
    let e2 = decay_error(integrate, 0.05);
    let ratio = e1 / e2;
    assert!(
        ratio > expected_ratio.0 && ratio < expected_ratio.1,
        "error ratio {} outside [{}, {}]",
        ratio,
        expected_ratio.0,
        expected_ratio.1
    );
}

#[test]
fn euler_is_first_order() {
    assert_order(euler, (1.6, 2.4));
}

#[test]
fn midpoint_is_second_order() {
    assert_order(midpoint, (3.2, 4.8));
}

#[test]
fn rk4_is_fourth_order() {
    assert_order(rk4, (12.0, 20.0));
}

#[test]
fn three_eighths_is_fourth_order() {
    assert_order(three_eighths, (12.0, 20.0));
}

#[test]
fn gill_is_fourth_order() {
    assert_order(gill, (12.0, 20.0));
}

#[test]
fn fixed_step_rejects_zero_or_wrong_sign_step() {
    let args: Args = Args::builder().build();
    assert!(matches!(
        rk4(&Decay, 0.0, 1.0, &[1.0], 0.0, args),
        Err(Error::InvalidStepSize(_))
    ));
    let args: Args = Args::builder().build();
    assert!(matches!(
        rk4(&Decay, 0.0, 1.0, &[1.0], -0.1, args),
        Err(Error::InvalidStepSize(_))
    ));
}

#[test]
fn fixed_step_lands_exactly_on_xend() {
    // 0.3 does not divide 1.0, the last step must be shortened
    let args: Args = Args::builder().build();
    let sol = rk4(&Decay, 0.0, 1.0, &[1.0], 0.3, args).unwrap();
    assert_eq!(sol.x, 1.0);
    assert!((sol.y[0] - (-1.0f64).exp()).abs() < 1e-5);
}
