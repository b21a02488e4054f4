use std::fmt;
use std::fmt::Formatter;
use std::str::FromStr;

use nalgebra::Vector4;
use serde::{Deserialize, Serialize};

use crate::context::Context;
use crate::error::{Result, TrajectoryError};
use crate::jet::Jet;
use crate::trajectories::{self, Pose};

/// The supported trajectories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum TrajectoryType {
    Hover,
    YawOnly,
    CircleHorizontal,
    CircleVertical,
    Fig8Horizontal,
    Fig8Vertical,
    Helix,
    Sawtooth,
    Triangle,
}

impl TrajectoryType {
    pub const ALL: [TrajectoryType; 9] = [
        TrajectoryType::Hover,
        TrajectoryType::YawOnly,
        TrajectoryType::CircleHorizontal,
        TrajectoryType::CircleVertical,
        TrajectoryType::Fig8Horizontal,
        TrajectoryType::Fig8Vertical,
        TrajectoryType::Helix,
        TrajectoryType::Sawtooth,
        TrajectoryType::Triangle,
    ];

    /// Name used in configuration files and on the command line
    pub fn name(self) -> &'static str {
        match self {
            TrajectoryType::Hover => "hover",
            TrajectoryType::YawOnly => "yaw_only",
            TrajectoryType::CircleHorizontal => "circle_horz",
            TrajectoryType::CircleVertical => "circle_vert",
            TrajectoryType::Fig8Horizontal => "fig8_horz",
            TrajectoryType::Fig8Vertical => "fig8_vert",
            TrajectoryType::Helix => "helix",
            TrajectoryType::Sawtooth => "sawtooth",
            TrajectoryType::Triangle => "triangle",
        }
    }

    /// Period after which the position repeats, see [`trajectories::natural_period`]
    pub fn period(self, ctx: &Context) -> Option<f64> {
        trajectories::natural_period(self, ctx)
    }
}

impl fmt::Display for TrajectoryType {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for TrajectoryType {
    type Err = TrajectoryError;

    fn from_str(name: &str) -> Result<TrajectoryType> {
        TrajectoryType::ALL
            .iter()
            .copied()
            .find(|kind| kind.name() == name)
            .ok_or_else(|| TrajectoryError::UnknownTrajectoryType(name.to_string()))
    }
}

impl TryFrom<String> for TrajectoryType {
    type Error = TrajectoryError;

    fn try_from(name: String) -> Result<TrajectoryType> {
        name.parse()
    }
}

impl From<TrajectoryType> for String {
    fn from(kind: TrajectoryType) -> String {
        kind.name().to_string()
    }
}

/// A resolved trajectory: the same function instantiated for plain values and for jets
#[derive(Clone, Copy)]
pub struct TrajectoryFn {
    kind: TrajectoryType,
    value: fn(f64, &Context) -> Pose<f64>,
    jet: fn(Jet, &Context) -> Pose<Jet>,
}

impl TrajectoryFn {
    pub fn kind(&self) -> TrajectoryType {
        self.kind
    }

    /// Returns the pose at time `t`
    pub fn eval(&self, t: f64, ctx: &Context) -> Pose<f64> {
        (self.value)(t, ctx)
    }

    /// Returns the pose at time `t` as `[x, y, z, yaw]`
    pub fn position(&self, t: f64, ctx: &Context) -> Vector4<f64> {
        self.eval(t, ctx).to_vector()
    }

    /// Evaluates the trajectory on a jet, carrying time derivatives along
    pub fn eval_jet(&self, t: Jet, ctx: &Context) -> Pose<Jet> {
        (self.jet)(t, ctx)
    }
}

impl fmt::Debug for TrajectoryFn {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("TrajectoryFn").field("kind", &self.kind).finish()
    }
}

macro_rules! registered {
    ($kind:ident, $func:ident) => {
        TrajectoryFn {
            kind: TrajectoryType::$kind,
            value: trajectories::$func::<f64>,
            jet: trajectories::$func::<Jet>,
        }
    };
}

/// Returns the trajectory function for a catalog entry
///
/// # Examples
///
/// ```
/// use quadtraj::{resolve, Context, TrajectoryType};
/// let traj = resolve(TrajectoryType::CircleHorizontal);
/// let ctx = Context::simulation();
/// let pose = traj.eval(0., &ctx);
/// assert_eq!(-3.0, pose.z);
/// ```
pub fn resolve(kind: TrajectoryType) -> TrajectoryFn {
    match kind {
        TrajectoryType::Hover => registered!(Hover, hover),
        TrajectoryType::YawOnly => registered!(YawOnly, yaw_only),
        TrajectoryType::CircleHorizontal => registered!(CircleHorizontal, circle_horizontal),
        TrajectoryType::CircleVertical => registered!(CircleVertical, circle_vertical),
        TrajectoryType::Fig8Horizontal => registered!(Fig8Horizontal, fig8_horizontal),
        TrajectoryType::Fig8Vertical => registered!(Fig8Vertical, fig8_vertical),
        TrajectoryType::Helix => registered!(Helix, helix),
        TrajectoryType::Sawtooth => registered!(Sawtooth, sawtooth),
        TrajectoryType::Triangle => registered!(Triangle, triangle),
    }
}

/// Returns the trajectory function registered under a configuration name
///
/// # Examples
///
/// ```
/// use quadtraj::{resolve_name, TrajectoryError};
/// assert!(resolve_name("fig8_vert").is_ok());
/// assert!(matches!(resolve_name("spiral"), Err(TrajectoryError::UnknownTrajectoryType(_))));
/// ```
pub fn resolve_name(name: &str) -> Result<TrajectoryFn> {
    Ok(resolve(name.parse()?))
}
