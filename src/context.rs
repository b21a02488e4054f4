use std::fmt;
use std::fmt::Formatter;

use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::error::{Result, TrajectoryError};

/// Preset hover positions, numbered 1 to 8 in configuration files
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum HoverMode {
    Origin,
    East,
    North,
    NorthEast,
    HighOrigin,
    HighNorthEast,
    FarEast,
    MidNorthEast,
}

impl HoverMode {
    pub const ALL: [HoverMode; 8] = [
        HoverMode::Origin,
        HoverMode::East,
        HoverMode::North,
        HoverMode::NorthEast,
        HoverMode::HighOrigin,
        HoverMode::HighNorthEast,
        HoverMode::FarEast,
        HoverMode::MidNorthEast,
    ];

    /// The 1-based preset number
    pub fn number(self) -> u8 {
        match self {
            HoverMode::Origin => 1,
            HoverMode::East => 2,
            HoverMode::North => 3,
            HoverMode::NorthEast => 4,
            HoverMode::HighOrigin => 5,
            HoverMode::HighNorthEast => 6,
            HoverMode::FarEast => 7,
            HoverMode::MidNorthEast => 8,
        }
    }

    /// Hover point `[x, y, z]` in the north-east-down frame
    pub fn position(self) -> [f64; 3] {
        match self {
            HoverMode::Origin => [0.0, 0.0, -0.9],
            HoverMode::East => [0.0, 0.8, -0.9],
            HoverMode::North => [0.8, 0.0, -0.8],
            HoverMode::NorthEast => [0.8, 0.8, -0.8],
            HoverMode::HighOrigin => [0.0, 0.0, -10.0],
            HoverMode::HighNorthEast => [1.0, 1.0, -4.0],
            HoverMode::FarEast => [0.0, 10.0, -5.0],
            HoverMode::MidNorthEast => [1.0, 1.0, -3.0],
        }
    }

    /// Whether the preset fits a real flight area; the others are simulation only
    pub fn hardware_safe(self) -> bool {
        self.number() <= 4
    }
}

impl TryFrom<u8> for HoverMode {
    type Error = TrajectoryError;

    fn try_from(number: u8) -> Result<HoverMode> {
        HoverMode::ALL
            .iter()
            .copied()
            .find(|mode| mode.number() == number)
            .ok_or_else(|| {
                warn!("Rejected hover mode #{}", number);
                TrajectoryError::InvalidConfiguration(format!(
                    "hover mode #{} not found, expected 1 to 8",
                    number
                ))
            })
    }
}

impl From<HoverMode> for u8 {
    fn from(mode: HoverMode) -> u8 {
        mode.number()
    }
}

impl fmt::Display for HoverMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} (#{})", self, self.number())
    }
}

/// Immutable settings every trajectory function reads alongside the time
///
/// # Examples
///
/// ```
/// use quadtraj::{Context, HoverMode};
/// let ctx = Context::new(true, HoverMode::FarEast).unwrap()
///     .with_spin(true)
///     .with_double_speed(true);
/// assert!(ctx.spin_enabled());
///
/// // far presets are not allowed on hardware
/// assert!(Context::new(false, HoverMode::FarEast).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ContextConfig", into = "ContextConfig")]
pub struct Context {
    simulation_mode: bool,
    hover_submode: HoverMode,
    spin_enabled: bool,
    double_speed: bool,
    short_variant: bool,
}

impl Context {
    /// Creates a context with all toggles off
    ///
    /// # Arguments
    ///
    /// `simulation_mode` - true in simulation, false on hardware
    /// `hover_submode` - hover preset, only presets 1 to 4 are accepted on hardware
    pub fn new(simulation_mode: bool, hover_submode: HoverMode) -> Result<Context> {
        Context::check(simulation_mode, hover_submode)?;
        info!(
            "Trajectory context for {} with hover mode {}",
            if simulation_mode { "simulation" } else { "hardware" },
            hover_submode
        );
        Ok(Context {
            simulation_mode,
            hover_submode,
            spin_enabled: false,
            double_speed: false,
            short_variant: false,
        })
    }

    /// Simulation context hovering at the origin preset
    pub fn simulation() -> Context {
        Context { simulation_mode: true, ..Context::hardware() }
    }

    /// Hardware context hovering at the origin preset
    pub fn hardware() -> Context {
        Context {
            simulation_mode: false,
            hover_submode: HoverMode::Origin,
            spin_enabled: false,
            double_speed: false,
            short_variant: false,
        }
    }

    fn check(simulation_mode: bool, hover_submode: HoverMode) -> Result<()> {
        if !simulation_mode && !hover_submode.hardware_safe() {
            warn!("Rejected hover mode {} on hardware", hover_submode);
            return Err(TrajectoryError::InvalidConfiguration(format!(
                "hover mode {} is only available in simulation",
                hover_submode
            )));
        }
        Ok(())
    }

    pub fn with_hover_submode(self, hover_submode: HoverMode) -> Result<Context> {
        Context::check(self.simulation_mode, hover_submode)?;
        Ok(Context { hover_submode, ..self })
    }

    pub fn with_spin(self, spin_enabled: bool) -> Context {
        Context { spin_enabled, ..self }
    }

    pub fn with_double_speed(self, double_speed: bool) -> Context {
        Context { double_speed, ..self }
    }

    pub fn with_short_variant(self, short_variant: bool) -> Context {
        Context { short_variant, ..self }
    }

    pub fn simulation_mode(&self) -> bool {
        self.simulation_mode
    }

    pub fn hover_submode(&self) -> HoverMode {
        self.hover_submode
    }

    pub fn spin_enabled(&self) -> bool {
        self.spin_enabled
    }

    pub fn double_speed(&self) -> bool {
        self.double_speed
    }

    pub fn short_variant(&self) -> bool {
        self.short_variant
    }
}

impl fmt::Display for Context {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Context(sim: {}, hover: {}, spin: {}, double_speed: {}, short: {})",
            self.simulation_mode,
            self.hover_submode.number(),
            self.spin_enabled,
            self.double_speed,
            self.short_variant
        )
    }
}

/// Serialized form of a [`Context`], validated on conversion
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContextConfig {
    #[serde(alias = "sim")]
    simulation_mode: bool,
    #[serde(default = "default_hover_number", alias = "hover_mode")]
    hover_submode: u8,
    #[serde(default, alias = "spin")]
    spin_enabled: bool,
    #[serde(default)]
    double_speed: bool,
    #[serde(default, alias = "short")]
    short_variant: bool,
}

fn default_hover_number() -> u8 {
    HoverMode::Origin.number()
}

impl TryFrom<ContextConfig> for Context {
    type Error = TrajectoryError;

    fn try_from(config: ContextConfig) -> Result<Context> {
        let hover_submode = HoverMode::try_from(config.hover_submode)?;
        Ok(Context::new(config.simulation_mode, hover_submode)?
            .with_spin(config.spin_enabled)
            .with_double_speed(config.double_speed)
            .with_short_variant(config.short_variant))
    }
}

impl From<Context> for ContextConfig {
    fn from(ctx: Context) -> ContextConfig {
        ContextConfig {
            simulation_mode: ctx.simulation_mode,
            hover_submode: ctx.hover_submode.number(),
            spin_enabled: ctx.spin_enabled,
            double_speed: ctx.double_speed,
            short_variant: ctx.short_variant,
        }
    }
}
