//! Exact time derivatives of any registered trajectory.
//!
//! The trajectory is evaluated once on a [`Jet`] seeded at `t`; every derivative up to
//! [`MAX_DERIVATIVE_ORDER`] falls out of that single pass. Waypoint trajectories are piecewise
//! linear, so their derivatives are one-sided at breakpoints and zero from acceleration on.

use nalgebra::Vector4;

use crate::catalog::TrajectoryFn;
use crate::context::Context;
use crate::error::{Result, TrajectoryError};
use crate::jet::{Jet, MAX_DERIVATIVE_ORDER};

fn check_order(order: usize) -> Result<()> {
    if order > MAX_DERIVATIVE_ORDER {
        return Err(TrajectoryError::UnsupportedOrder { order, max: MAX_DERIVATIVE_ORDER });
    }
    Ok(())
}

/// Returns the `order`-th time derivative of the trajectory at `t`
///
/// # Arguments
///
/// `traj` - resolved trajectory
/// `ctx` - trajectory context
/// `t` - time in seconds
/// `order` - 0 for position, 1 for velocity, etc.
///
/// # Examples
///
/// ```
/// use quadtraj::{derivative, resolve, Context, TrajectoryType};
/// let traj = resolve(TrajectoryType::YawOnly);
/// let ctx = Context::simulation();
/// let rate = derivative(&traj, &ctx, 1.0, 1).unwrap();
/// assert!((rate[3] - std::f64::consts::PI / 10.).abs() < 1e-12);
/// ```
pub fn derivative(traj: &TrajectoryFn, ctx: &Context, t: f64, order: usize) -> Result<Vector4<f64>> {
    check_order(order)?;
    let pose = traj.eval_jet(Jet::variable(t), ctx);
    pose.derivative(order)
        .ok_or(TrajectoryError::UnsupportedOrder { order, max: MAX_DERIVATIVE_ORDER })
}

/// Returns position and every derivative up to `max_order`, indexed by order
pub fn derivatives_up_to(
    traj: &TrajectoryFn,
    ctx: &Context,
    t: f64,
    max_order: usize,
) -> Result<Vec<Vector4<f64>>> {
    check_order(max_order)?;
    let pose = traj.eval_jet(Jet::variable(t), ctx);
    (0..=max_order)
        .map(|order| {
            pose.derivative(order)
                .ok_or(TrajectoryError::UnsupportedOrder { order, max: MAX_DERIVATIVE_ORDER })
        })
        .collect()
}

/// Convenience function for `[vx, vy, vz, yaw_rate]`
pub fn velocity(traj: &TrajectoryFn, ctx: &Context, t: f64) -> Vector4<f64> {
    traj.eval_jet(Jet::variable(t), ctx)
        .derivative(1)
        .unwrap_or_else(Vector4::zeros)
}

/// Convenience function for `[ax, ay, az, yaw_accel]`
pub fn acceleration(traj: &TrajectoryFn, ctx: &Context, t: f64) -> Vector4<f64> {
    traj.eval_jet(Jet::variable(t), ctx)
        .derivative(2)
        .unwrap_or_else(Vector4::zeros)
}

/// Position and velocity from a single evaluation
pub fn position_velocity(traj: &TrajectoryFn, ctx: &Context, t: f64) -> (Vector4<f64>, Vector4<f64>) {
    let pose = traj.eval_jet(Jet::variable(t), ctx);
    (
        pose.derivative(0).unwrap_or_else(Vector4::zeros),
        pose.derivative(1).unwrap_or_else(Vector4::zeros),
    )
}

/// Binds a trajectory and context into a velocity function of time
///
/// # Examples
///
/// ```
/// use quadtraj::{resolve, velocity_fn, Context, TrajectoryType};
/// let ctx = Context::hardware();
/// let vel = velocity_fn(resolve(TrajectoryType::Hover), ctx);
/// assert_eq!(0., vel(4.2).norm());
/// ```
pub fn velocity_fn(traj: TrajectoryFn, ctx: Context) -> impl Fn(f64) -> Vector4<f64> {
    move |t| velocity(&traj, &ctx, t)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{resolve, TrajectoryType};
    use assert::close;

    const SMOOTH: [TrajectoryType; 7] = [
        TrajectoryType::Hover,
        TrajectoryType::YawOnly,
        TrajectoryType::CircleHorizontal,
        TrajectoryType::CircleVertical,
        TrajectoryType::Fig8Horizontal,
        TrajectoryType::Fig8Vertical,
        TrajectoryType::Helix,
    ];

    fn contexts() -> Vec<Context> {
        vec![
            Context::simulation(),
            Context::simulation().with_spin(true).with_double_speed(true),
            Context::hardware().with_short_variant(true),
            Context::hardware().with_spin(true),
        ]
    }

    fn central_difference(traj: &TrajectoryFn, ctx: &Context, t: f64, h: f64) -> Vector4<f64> {
        (traj.position(t + h, ctx) - traj.position(t - h, ctx)) / (2. * h)
    }

    fn assert_vec_close(expected: &Vector4<f64>, actual: &Vector4<f64>, delta: f64) {
        for idx in 0..4 {
            close(expected[idx], actual[idx], delta);
        }
    }

    #[test]
    fn velocity_matches_finite_difference() {
        let h = 1e-5;
        for ctx in contexts() {
            for kind in SMOOTH.iter() {
                let traj = resolve(*kind);
                // helix turns around at 0 and half cycle, stay clear of those kinks
                for t in [0.7, 3.3, 8.1, 16.4, 30.2, -2.9] {
                    let exact = derivative(&traj, &ctx, t, 1).unwrap();
                    assert_vec_close(&central_difference(&traj, &ctx, t, h), &exact, 1e-6);
                }
            }
        }
    }

    #[test]
    fn acceleration_matches_finite_difference_of_velocity() {
        let h = 1e-5;
        let ctx = Context::simulation();
        for kind in SMOOTH.iter() {
            let traj = resolve(*kind);
            for t in [1.3, 5.9, 12.4] {
                let fd = (velocity(&traj, &ctx, t + h) - velocity(&traj, &ctx, t - h)) / (2. * h);
                assert_vec_close(&fd, &acceleration(&traj, &ctx, t), 1e-6);
            }
        }
    }

    #[test]
    fn circle_closed_form() {
        let ctx = Context::simulation();
        let traj = resolve(TrajectoryType::CircleHorizontal);
        let w = 2. * std::f64::consts::PI / 13.;
        let r = 0.6;
        let t = 2.4;
        let d = derivatives_up_to(&traj, &ctx, t, MAX_DERIVATIVE_ORDER).unwrap();
        assert_eq!(MAX_DERIVATIVE_ORDER + 1, d.len());

        let (s, c) = (w * t).sin_cos();
        assert_vec_close(&Vector4::new(r * c, r * s, -3., 0.), &d[0], 1e-12);
        assert_vec_close(&Vector4::new(-r * w * s, r * w * c, 0., 0.), &d[1], 1e-12);
        assert_vec_close(&Vector4::new(-r * w * w * c, -r * w * w * s, 0., 0.), &d[2], 1e-12);
        assert_vec_close(&Vector4::new(r * w.powi(3) * s, -r * w.powi(3) * c, 0., 0.), &d[3], 1e-12);
        assert_vec_close(&Vector4::new(r * w.powi(4) * c, r * w.powi(4) * s, 0., 0.), &d[4], 1e-12);
    }

    #[test]
    fn derivatives_up_to_agrees_with_derivative() {
        let ctx = Context::hardware().with_spin(true);
        let traj = resolve(TrajectoryType::Fig8Horizontal);
        let all = derivatives_up_to(&traj, &ctx, 4.2, 3).unwrap();
        assert_eq!(4, all.len());
        for (order, value) in all.iter().enumerate() {
            assert_eq!(derivative(&traj, &ctx, 4.2, order).unwrap(), *value);
        }
        assert_eq!(traj.position(4.2, &ctx), all[0]);
    }

    #[test]
    fn waypoint_derivatives() {
        let ctx = Context::simulation();

        // first sawtooth segment runs from (0, 0) to (0, 0.4) in 12 s
        let traj = resolve(TrajectoryType::Sawtooth);
        let d = derivatives_up_to(&traj, &ctx, 5., 3).unwrap();
        assert_vec_close(&Vector4::new(0., 0.4 / 12., 0., 0.), &d[1], 1e-12);
        assert_vec_close(&Vector4::zeros(), &d[2], 1e-12);
        assert_vec_close(&Vector4::zeros(), &d[3], 1e-12);

        // triangle velocity flips sign across the turnaround
        let traj = resolve(TrajectoryType::Triangle);
        let before = velocity(&traj, &ctx, 55.);
        let after = velocity(&traj, &ctx, 65.);
        assert_vec_close(&-before, &after, 1e-12);
        assert!(before.norm() > 0.);
    }

    #[test]
    fn waypoint_velocity_matches_finite_difference() {
        let h = 1e-5;
        let ctx = Context::hardware().with_double_speed(true);
        for kind in [TrajectoryType::Sawtooth, TrajectoryType::Triangle] {
            let traj = resolve(kind);
            // mid-segment samples only
            for t in [2.5, 9.1, 14.5, 41.3] {
                let exact = derivative(&traj, &ctx, t, 1).unwrap();
                assert_vec_close(&central_difference(&traj, &ctx, t, h), &exact, 1e-6);
            }
        }
    }

    #[test]
    fn unsupported_order() {
        let ctx = Context::simulation();
        let traj = resolve(TrajectoryType::Helix);
        assert_eq!(
            TrajectoryError::UnsupportedOrder { order: 5, max: 4 },
            derivative(&traj, &ctx, 1., 5).unwrap_err()
        );
        assert!(matches!(
            derivatives_up_to(&traj, &ctx, 1., 9),
            Err(TrajectoryError::UnsupportedOrder { order: 9, .. })
        ));
        assert!(derivative(&traj, &ctx, 1., MAX_DERIVATIVE_ORDER).is_ok());
    }

    #[test]
    fn convenience() {
        let ctx = Context::simulation().with_spin(true);
        let traj = resolve(TrajectoryType::CircleVertical);
        let t = 6.1;
        let (pos, vel) = position_velocity(&traj, &ctx, t);
        assert_eq!(derivative(&traj, &ctx, t, 0).unwrap(), pos);
        assert_eq!(derivative(&traj, &ctx, t, 1).unwrap(), vel);
        assert_eq!(vel, velocity(&traj, &ctx, t));
        assert_eq!(derivative(&traj, &ctx, t, 2).unwrap(), acceleration(&traj, &ctx, t));

        let vel_fn = velocity_fn(traj, ctx);
        assert_eq!(vel, vel_fn(t));
        close(2. * std::f64::consts::PI / 20., vel[3], 1e-12);
    }
}
