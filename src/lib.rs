/*!
# quadtraj

**quadtraj** provides position-only reference trajectories for a quadrotor. Each trajectory is a
pure function of time and a small immutable [`Context`], returning `(x, y, z, yaw)` in the
north-east-down frame. Velocity, acceleration and higher derivatives are never stored: they are
computed exactly from the position function with forward-mode automatic differentiation.

## Features
* nine trajectories: hover, yaw only, horizontal/vertical circles and figure-8s, helix,
  sawtooth and triangle
* exact derivatives up to snap for every trajectory
* receding-horizon sampling with optional derivatives, exportable as `nalgebra` matrices
* contexts and trajectory names loadable from any `serde` format

## Using **quadtraj**

```
use quadtraj::{derivatives_up_to, horizon, resolve, Context, TrajectoryType};

let traj = resolve(TrajectoryType::CircleHorizontal);
let ctx = Context::simulation().with_spin(true);

// position at a point in time, perhaps for a position controller
let t = 2.4;
let pose = traj.eval(t, &ctx);
println!("Desired pose at {} is {}", t, pose);

// position, velocity and acceleration from a single evaluation
let d = derivatives_up_to(&traj, &ctx, t, 2).unwrap();
println!("Velocity {}, acceleration {}", d[1], d[2]);

// twenty future states 50 ms apart, with velocities, for a predictive controller
let h = horizon(&traj, &ctx, t, 0.05, 20, 1).unwrap();
let positions = h.positions();
assert_eq!((20, 4), positions.shape());
```

Trajectories can also be chosen by name, for example from a configuration file:

```
use quadtraj::{resolve_name, Context};

let ctx: Context = serde_json::from_str(r#"{"sim": true, "hover_mode": 6}"#).unwrap();
let traj = resolve_name("hover").unwrap();
assert_eq!(-4.0, traj.eval(0., &ctx).z);
```
 */

pub mod catalog;
pub mod context;
pub mod diff;
pub mod error;
pub mod horizon;
pub mod jet;
pub mod trajectories;

pub use catalog::{resolve, resolve_name, TrajectoryFn, TrajectoryType};
pub use context::{Context, ContextConfig, HoverMode};
pub use diff::{
    acceleration, derivative, derivatives_up_to, position_velocity, velocity, velocity_fn,
};
pub use error::{Result, TrajectoryError};
pub use horizon::{horizon, horizon_span, Horizon, Sample};
pub use jet::{Jet, Scalar, MAX_DERIVATIVE_ORDER};
pub use trajectories::{Pose, HARDWARE_HEIGHT, SIM_HEIGHT};
