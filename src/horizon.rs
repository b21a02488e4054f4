//! Future (or past) reference states for receding-horizon control.

use log::debug;
use nalgebra::{DMatrix, Vector4};

use crate::catalog::TrajectoryFn;
use crate::context::Context;
use crate::diff::derivatives_up_to;
use crate::error::{Result, TrajectoryError};

/// One horizon sample: its time and derivatives `0..=order`
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    t: f64,
    derivatives: Vec<Vector4<f64>>,
}

impl Sample {
    pub fn t(&self) -> f64 {
        self.t
    }

    pub fn derivatives(&self) -> &[Vector4<f64>] {
        &self.derivatives
    }

    pub fn position(&self) -> Vector4<f64> {
        self.derivatives[0]
    }

    /// Returns `None` if the horizon was generated without velocities
    pub fn velocity(&self) -> Option<Vector4<f64>> {
        self.derivatives.get(1).copied()
    }

    pub fn derivative(&self, order: usize) -> Option<Vector4<f64>> {
        self.derivatives.get(order).copied()
    }
}

/// An ordered, finite run of samples
#[derive(Debug, Clone, PartialEq)]
pub struct Horizon {
    order: usize,
    samples: Vec<Sample>,
}

impl Horizon {
    /// Highest derivative order carried by each sample
    pub fn order(&self) -> usize {
        self.order
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Sample> {
        self.samples.iter()
    }

    pub fn times(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.t).collect()
    }

    /// Returns a `len x 4` matrix with one derivative order per row, `None` above [`Horizon::order`]
    pub fn matrix(&self, order: usize) -> Option<DMatrix<f64>> {
        if order > self.order {
            return None;
        }
        let mut m = DMatrix::zeros(self.samples.len(), 4);
        for (row, sample) in self.samples.iter().enumerate() {
            m.set_row(row, &sample.derivatives[order].transpose());
        }
        Some(m)
    }

    /// Convenience function for the `len x 4` position matrix
    pub fn positions(&self) -> DMatrix<f64> {
        self.matrix(0).unwrap_or_else(|| DMatrix::zeros(0, 4))
    }

    /// Convenience function for the `len x 4` velocity matrix
    pub fn velocities(&self) -> Option<DMatrix<f64>> {
        self.matrix(1)
    }
}

impl<'a> IntoIterator for &'a Horizon {
    type Item = &'a Sample;
    type IntoIter = std::slice::Iter<'a, Sample>;

    fn into_iter(self) -> Self::IntoIter {
        self.samples.iter()
    }
}

impl IntoIterator for Horizon {
    type Item = Sample;
    type IntoIter = std::vec::IntoIter<Sample>;

    fn into_iter(self) -> Self::IntoIter {
        self.samples.into_iter()
    }
}

fn sample_at(traj: &TrajectoryFn, ctx: &Context, times: &[f64], order: usize) -> Result<Horizon> {
    let samples = times
        .iter()
        .map(|&t| {
            Ok(Sample {
                t,
                derivatives: derivatives_up_to(traj, ctx, t, order)?,
            })
        })
        .collect::<Result<Vec<Sample>>>()?;
    Ok(Horizon { order, samples })
}

fn check_finite(name: &str, value: f64) -> Result<()> {
    if !value.is_finite() {
        return Err(TrajectoryError::InvalidHorizonParameters(format!(
            "{} must be finite, got {}",
            name, value
        )));
    }
    Ok(())
}

fn check_count(count: usize) -> Result<()> {
    if count < 1 {
        return Err(TrajectoryError::InvalidHorizonParameters(
            "sample count must be at least 1".to_string(),
        ));
    }
    Ok(())
}

/// Samples the trajectory at `t0, t0 + dt, ..., t0 + (count - 1) dt`
///
/// # Arguments
///
/// `traj` - resolved trajectory
/// `ctx` - trajectory context
/// `t0` - first sample time
/// `dt` - time step, negative to look back
/// `count` - number of samples, at least 1
/// `order` - highest derivative carried by each sample, 0 for positions only
///
/// # Examples
///
/// ```
/// use quadtraj::{horizon, resolve, Context, TrajectoryType};
/// let traj = resolve(TrajectoryType::Fig8Horizontal);
/// let ctx = Context::simulation();
/// let h = horizon(&traj, &ctx, 2.0, 0.1, 20, 1).unwrap();
/// assert_eq!(20, h.len());
/// assert_eq!(traj.position(2.5, &ctx), h.samples()[5].position());
/// ```
pub fn horizon(
    traj: &TrajectoryFn,
    ctx: &Context,
    t0: f64,
    dt: f64,
    count: usize,
    order: usize,
) -> Result<Horizon> {
    check_count(count)?;
    check_finite("t0", t0)?;
    check_finite("dt", dt)?;

    debug!(
        "Sampling {} horizon of {} steps from t = {} with dt = {}",
        traj.kind(),
        count,
        t0,
        dt
    );

    let times: Vec<f64> = (0..count).map(|k| t0 + k as f64 * dt).collect();
    sample_at(traj, ctx, &times, order)
}

/// Samples `count` evenly spaced times covering `[t_start, t_start + span]`
///
/// A single sample sits at `t_start`.
pub fn horizon_span(
    traj: &TrajectoryFn,
    ctx: &Context,
    t_start: f64,
    span: f64,
    count: usize,
    order: usize,
) -> Result<Horizon> {
    check_count(count)?;
    check_finite("t_start", t_start)?;
    check_finite("span", span)?;

    debug!(
        "Sampling {} horizon of {} steps over [{}, {}]",
        traj.kind(),
        count,
        t_start,
        t_start + span
    );

    let times: Vec<f64> = if count == 1 {
        vec![t_start]
    } else {
        let step = span / (count - 1) as f64;
        (0..count)
            .map(|k| {
                if k == count - 1 {
                    t_start + span
                } else {
                    t_start + k as f64 * step
                }
            })
            .collect()
    };
    sample_at(traj, ctx, &times, order)
}
