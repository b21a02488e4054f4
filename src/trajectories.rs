//! Position-only trajectory functions.
//!
//! Every function maps `(t, context)` to a [`Pose`] in the north-east-down frame, so altitude
//! shows up as a negative `z`. The functions are generic over [`Scalar`]: evaluate with `f64`
//! for a position, or with a [`Jet`](crate::Jet) to get exact time derivatives.

use std::f64::consts::PI;
use std::fmt;
use std::fmt::Formatter;

use nalgebra::Vector4;
use serde::Serialize;

use crate::catalog::TrajectoryType;
use crate::context::Context;
use crate::jet::{Jet, Scalar};

/// Loop altitude in simulation
pub const SIM_HEIGHT: f64 = 3.0;

/// Loop altitude on hardware
pub const HARDWARE_HEIGHT: f64 = 0.85;

const SPIN_PERIOD: f64 = 20.0;
const SLOW_SPIN_PERIOD: f64 = 30.0;
const YAW_ONLY_PERIOD: f64 = 20.0;

const LOOP_PERIOD: f64 = 13.0;
const CIRCLE_RADIUS: f64 = 0.6;
const SMALL_RADIUS: f64 = 0.35;

/// Amplitude scale of the short vertical figure-8
pub const SHORT_SCALE: f64 = 0.5;

const HELIX_RADIUS: f64 = 0.6;
const HELIX_TURNS: f64 = 3.0;
const HELIX_CYCLE: f64 = 45.0;
const HELIX_SIM_FLOOR: f64 = 2.0;
const HELIX_HARDWARE_CEILING: f64 = 2.6;

const SAWTOOTH_FLIGHT_TIME: f64 = 120.0;
const SAWTOOTH_POINTS: [[f64; 2]; 11] = [
    [0.0, 0.0],
    [0.0, 0.4],
    [0.4, -0.4],
    [0.4, 0.4],
    [0.4, -0.4],
    [0.0, 0.4],
    [0.0, -0.4],
    [-0.4, 0.4],
    [-0.4, -0.4],
    [-0.4, 0.4],
    [0.0, -0.4],
];

const TRIANGLE_SIDE: f64 = 0.8;
const TRIANGLE_EDGE_TIME: f64 = 20.0;

/// A position and heading target
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Pose<S> {
    pub x: S,
    pub y: S,
    pub z: S,
    pub yaw: S,
}

impl<S> Pose<S> {
    pub fn new(x: S, y: S, z: S, yaw: S) -> Pose<S> {
        Pose { x, y, z, yaw }
    }
}

impl Pose<f64> {
    pub fn to_vector(&self) -> Vector4<f64> {
        Vector4::new(self.x, self.y, self.z, self.yaw)
    }

    pub fn is_finite(&self) -> bool {
        self.to_vector().iter().all(|v| v.is_finite())
    }
}

impl Pose<Jet> {
    /// Returns the `order`-th time derivative of every component
    pub fn derivative(&self, order: usize) -> Option<Vector4<f64>> {
        Some(Vector4::new(
            self.x.derivative(order)?,
            self.y.derivative(order)?,
            self.z.derivative(order)?,
            self.yaw.derivative(order)?,
        ))
    }
}

impl From<Pose<f64>> for Vector4<f64> {
    fn from(pose: Pose<f64>) -> Vector4<f64> {
        pose.to_vector()
    }
}

impl fmt::Display for Pose<f64> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "Pose(x: {}, y: {}, z: {}, yaw: {})", self.x, self.y, self.z, self.yaw)
    }
}

/// Angular rate for one revolution per `period`, zero when the period is degenerate
pub fn angular_rate(period: f64) -> f64 {
    if period > 0. && period.is_finite() {
        2. * PI / period
    } else {
        0.
    }
}

/// Folds `t` into `[0, period)`; a degenerate period pins the phase at zero
///
/// The shift is piecewise constant, so derivatives carried by `t` pass through unchanged.
pub fn wrap<S: Scalar>(t: S, period: f64) -> S {
    if !(period > 0. && period.is_finite()) {
        return S::constant(0.);
    }
    let cycles = (t.value() / period).floor();
    t - cycles * period
}

/// Loop altitude for the context's operating mode
pub fn height(ctx: &Context) -> f64 {
    if ctx.simulation_mode() {
        SIM_HEIGHT
    } else {
        HARDWARE_HEIGHT
    }
}

fn speed_scaled(period: f64, ctx: &Context) -> f64 {
    if ctx.double_speed() {
        period / 2.
    } else {
        period
    }
}

fn spin_yaw<S: Scalar>(t: S, ctx: &Context, spin_period: f64) -> S {
    if ctx.spin_enabled() {
        t * angular_rate(spin_period)
    } else {
        S::constant(0.)
    }
}

// phase angle of a loop, in [0, 2 pi)
fn loop_phase<S: Scalar>(t: S, ctx: &Context) -> S {
    let period = speed_scaled(LOOP_PERIOD, ctx);
    wrap(t, period) * angular_rate(period)
}

/// A fixed list of XY waypoints visited at a constant time per segment
#[derive(Debug, Clone, Copy)]
pub struct WaypointSchedule<'a> {
    points: &'a [[f64; 2]],
    segment_time: f64,
}

impl<'a> WaypointSchedule<'a> {
    pub fn new(points: &'a [[f64; 2]], segment_time: f64) -> WaypointSchedule<'a> {
        WaypointSchedule { points, segment_time }
    }

    pub fn segments(&self) -> usize {
        self.points.len().saturating_sub(1)
    }

    /// Time to travel from the first to the last waypoint
    pub fn period(&self) -> f64 {
        self.segments() as f64 * self.segment_time
    }

    /// Interpolates the schedule at `local`, which is expected in `[0, period]`
    pub fn at<S: Scalar>(&self, local: S) -> [S; 2] {
        let first = self.points.first().copied().unwrap_or([0., 0.]);
        let segments = self.segments();
        if segments == 0 || !(self.segment_time > 0. && self.segment_time.is_finite()) {
            return [S::constant(first[0]), S::constant(first[1])];
        }

        let idx = (local.value() / self.segment_time).floor() as isize;
        let idx = idx.clamp(0, segments as isize - 1) as usize;
        let alpha = (local - idx as f64 * self.segment_time) / self.segment_time;

        let [x0, y0] = self.points[idx];
        let [x1, y1] = self.points[idx + 1];
        [alpha * (x1 - x0) + x0, alpha * (y1 - y0) + y0]
    }

    /// Plays the schedule forward, then jumps straight back to the first waypoint
    pub fn sawtooth<S: Scalar>(&self, t: S) -> [S; 2] {
        self.at(wrap(t, self.period()))
    }

    /// Plays the schedule forward, then retraces it back to the first waypoint
    pub fn ping_pong<S: Scalar>(&self, t: S) -> [S; 2] {
        let period = self.period();
        let local = wrap(t, 2. * period);
        if local.value() <= period {
            self.at(local)
        } else {
            self.at(-local + 2. * period)
        }
    }
}

/// Holds the hover preset selected by the context; yaws at a constant rate when spinning
pub fn hover<S: Scalar>(t: S, ctx: &Context) -> Pose<S> {
    let [x, y, z] = ctx.hover_submode().position();
    Pose::new(
        S::constant(x),
        S::constant(y),
        S::constant(z),
        spin_yaw(t, ctx, SPIN_PERIOD),
    )
}

/// Stationary above the origin, yawing one turn per 20 s (10 s at double speed)
pub fn yaw_only<S: Scalar>(t: S, ctx: &Context) -> Pose<S> {
    let period = speed_scaled(YAW_ONLY_PERIOD, ctx);
    Pose::new(
        S::constant(0.),
        S::constant(0.),
        S::constant(-height(ctx)),
        t * angular_rate(period),
    )
}

pub fn circle_horizontal<S: Scalar>(t: S, ctx: &Context) -> Pose<S> {
    let phase = loop_phase(t, ctx);
    Pose::new(
        phase.cos() * CIRCLE_RADIUS,
        phase.sin() * CIRCLE_RADIUS,
        S::constant(-height(ctx)),
        spin_yaw(t, ctx, SPIN_PERIOD),
    )
}

pub fn circle_vertical<S: Scalar>(t: S, ctx: &Context) -> Pose<S> {
    let phase = loop_phase(t, ctx);
    Pose::new(
        phase.cos() * SMALL_RADIUS,
        S::constant(0.),
        -(phase.sin() * SMALL_RADIUS) - height(ctx),
        spin_yaw(t, ctx, SPIN_PERIOD),
    )
}

/// Figure-8 in the horizontal plane, two lobes along x per loop
pub fn fig8_horizontal<S: Scalar>(t: S, ctx: &Context) -> Pose<S> {
    let phase = loop_phase(t, ctx);
    Pose::new(
        (phase * 2_f64).sin() * SMALL_RADIUS,
        phase.sin() * SMALL_RADIUS,
        S::constant(-height(ctx)),
        spin_yaw(t, ctx, SPIN_PERIOD),
    )
}

/// Figure-8 in the x-z plane; the short variant shrinks it by [`SHORT_SCALE`]
pub fn fig8_vertical<S: Scalar>(t: S, ctx: &Context) -> Pose<S> {
    let phase = loop_phase(t, ctx);
    let radius = if ctx.short_variant() {
        SMALL_RADIUS * SHORT_SCALE
    } else {
        SMALL_RADIUS
    };
    Pose::new(
        (phase * 2_f64).sin() * radius,
        S::constant(0.),
        -(phase.sin() * radius) - height(ctx),
        spin_yaw(t, ctx, SPIN_PERIOD),
    )
}

/// Circles while climbing for half a cycle, then unwinds while descending
pub fn helix<S: Scalar>(t: S, ctx: &Context) -> Pose<S> {
    let (floor, ceiling) = if ctx.simulation_mode() {
        (HELIX_SIM_FLOOR, SIM_HEIGHT)
    } else {
        (HARDWARE_HEIGHT, HELIX_HARDWARE_CEILING)
    };
    let cycle = speed_scaled(HELIX_CYCLE, ctx);
    let half = cycle / 2.;

    // 0 at the floor, 1 at the ceiling
    let progress = if !(half > 0. && half.is_finite()) {
        S::constant(0.)
    } else {
        let local = wrap(t, cycle);
        if local.value() <= half {
            local / half
        } else {
            (-local + cycle) / half
        }
    };

    let theta = progress * (2. * PI * HELIX_TURNS);
    let altitude = progress * (ceiling - floor) + floor;
    Pose::new(
        theta.cos() * HELIX_RADIUS,
        theta.sin() * HELIX_RADIUS,
        -altitude,
        spin_yaw(t, ctx, SLOW_SPIN_PERIOD),
    )
}

fn sawtooth_schedule(ctx: &Context) -> WaypointSchedule<'static> {
    let flight_time = speed_scaled(SAWTOOTH_FLIGHT_TIME, ctx);
    WaypointSchedule::new(&SAWTOOTH_POINTS, flight_time / (SAWTOOTH_POINTS.len() - 1) as f64)
}

/// Zig-zags through fixed waypoints and snaps back to the start every cycle
pub fn sawtooth<S: Scalar>(t: S, ctx: &Context) -> Pose<S> {
    let [x, y] = sawtooth_schedule(ctx).sawtooth(t);
    Pose::new(x, y, S::constant(-height(ctx)), spin_yaw(t, ctx, SLOW_SPIN_PERIOD))
}

fn triangle_points() -> [[f64; 2]; 4] {
    let half_side = TRIANGLE_SIDE / 2.;
    let h = (TRIANGLE_SIDE * TRIANGLE_SIDE - half_side * half_side).sqrt();
    [
        [0.0, h / 2.],
        [half_side, -h / 2.],
        [-half_side, -h / 2.],
        [0.0, h / 2.],
    ]
}

/// Flies an equilateral triangle, then flies it again in reverse
pub fn triangle<S: Scalar>(t: S, ctx: &Context) -> Pose<S> {
    let points = triangle_points();
    let schedule = WaypointSchedule::new(&points, speed_scaled(TRIANGLE_EDGE_TIME, ctx));
    let [x, y] = schedule.ping_pong(t);
    Pose::new(x, y, S::constant(-height(ctx)), spin_yaw(t, ctx, SPIN_PERIOD))
}

/// Period after which the position repeats, `None` for trajectories that never move
///
/// Yaw repeats with the same period only when spin is disabled.
pub fn natural_period(kind: TrajectoryType, ctx: &Context) -> Option<f64> {
    match kind {
        TrajectoryType::Hover | TrajectoryType::YawOnly => None,
        TrajectoryType::CircleHorizontal
        | TrajectoryType::CircleVertical
        | TrajectoryType::Fig8Horizontal
        | TrajectoryType::Fig8Vertical => Some(speed_scaled(LOOP_PERIOD, ctx)),
        TrajectoryType::Helix => Some(speed_scaled(HELIX_CYCLE, ctx)),
        TrajectoryType::Sawtooth => Some(sawtooth_schedule(ctx).period()),
        TrajectoryType::Triangle => Some(6. * speed_scaled(TRIANGLE_EDGE_TIME, ctx)),
    }
}
