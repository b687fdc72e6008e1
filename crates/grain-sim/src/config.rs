//! Simulation configuration, validation, and error types.
//!
//! [`SimulationConfig`] gathers every user-facing knob of a session: the
//! grid, one block per engine, the seed, and display settings.
//! [`validate()`](SimulationConfig::validate) checks all of them up front so
//! a [`Simulation`](crate::Simulation) is never built from bad input.

use std::error::Error;
use std::fmt;

use grain_core::GrainError;
use grain_engines::{EnergyDistribution, NucleationSchedule, NucleationSites};
use grain_space::{Grid, Neighborhood};
use grain_view::palette;
use grain_view::render::{self, MAX_ZOOM};

// ── GridConfig ─────────────────────────────────────────────────────

/// Lattice dimensions and boundary policy.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GridConfig {
    /// Cells per row. Default: 100.
    pub width: u32,
    /// Rows. Default: 100.
    pub height: u32,
    /// Wrap at the edges. Default: false.
    pub periodic: bool,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            width: 100,
            height: 100,
            periodic: false,
        }
    }
}

impl GridConfig {
    /// Check the dimensions.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::EmptyGrid {
                width: self.width,
                height: self.height,
            });
        }
        if self.width > Grid::MAX_DIM || self.height > Grid::MAX_DIM {
            return Err(ConfigError::Grid(GrainError::invalid(format!(
                "grid {}x{} exceeds the maximum dimension {}",
                self.width,
                self.height,
                Grid::MAX_DIM
            ))));
        }
        Ok(())
    }
}

// ── CaConfig ───────────────────────────────────────────────────────

/// Cellular automata settings.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CaConfig {
    /// Growth kernel. Default: von Neumann.
    pub neighborhood: Neighborhood,
    /// Inclusion radius in cells. Default: 3.
    pub inclusion_radius: u32,
    /// Grains seeded by `add_random_grains`. Default: 10.
    pub grains: usize,
    /// Merge selected grains under a fresh id instead of deleting them.
    /// Default: false.
    pub change_id: bool,
}

impl Default for CaConfig {
    fn default() -> Self {
        Self {
            neighborhood: Neighborhood::VonNeumann,
            inclusion_radius: 3,
            grains: 10,
            change_id: false,
        }
    }
}

// ── McConfig ───────────────────────────────────────────────────────

/// Monte Carlo settings.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct McConfig {
    /// Energy and proposal kernel. Default: von Neumann.
    pub neighborhood: Neighborhood,
    /// Grains seeded by `init`. Default: 50.
    pub grains: usize,
    /// Sweeps per run. Default: 10.
    pub steps: usize,
    /// Metropolis `kT`. Default: 0.
    pub temperature: f64,
}

impl Default for McConfig {
    fn default() -> Self {
        Self {
            neighborhood: Neighborhood::VonNeumann,
            grains: 50,
            steps: 10,
            temperature: 0.0,
        }
    }
}

// ── SrxConfig ──────────────────────────────────────────────────────

/// Static recrystallization settings.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SrxConfig {
    /// Front kernel. Default: von Neumann.
    pub neighborhood: Neighborhood,
    /// Nominal stored energy. Default: 5.0.
    pub energy_value: f64,
    /// Energy spread around the nominal value. Default: uniform, ±10%.
    pub distribution: EnergyDistribution,
    /// Nucleation site strategy. Default: uniform.
    pub site_selection: NucleationSites,
    /// When nuclei are added during a run.
    pub schedule: NucleationSchedule,
    /// Sweeps per run. Default: 20.
    pub steps: usize,
    /// Paint recrystallized cells in the highlight colour. Default: false.
    pub highlight_recrystallized: bool,
}

impl Default for SrxConfig {
    fn default() -> Self {
        Self {
            neighborhood: Neighborhood::VonNeumann,
            energy_value: 5.0,
            distribution: EnergyDistribution::default(),
            site_selection: NucleationSites::Uniform,
            schedule: NucleationSchedule::default(),
            steps: 20,
            highlight_recrystallized: false,
        }
    }
}

// ── ConfigError ────────────────────────────────────────────────────

/// Errors detected during [`SimulationConfig::validate()`].
#[derive(Clone, Debug, PartialEq)]
pub enum ConfigError {
    /// Grid has a zero dimension.
    EmptyGrid {
        /// Configured width.
        width: u32,
        /// Configured height.
        height: u32,
    },
    /// Inclusion radius is zero.
    InvalidRadius {
        /// The configured radius.
        value: u32,
    },
    /// A grain or nucleation count is zero.
    InvalidCount {
        /// Which count.
        what: &'static str,
    },
    /// Energy value or distribution parameter is negative or not finite.
    InvalidEnergy {
        /// Description of the problem.
        reason: String,
    },
    /// Nucleation schedule is unusable.
    InvalidSchedule {
        /// Description of the problem.
        reason: String,
    },
    /// Monte Carlo temperature is negative or not finite.
    InvalidTemperature {
        /// The invalid value.
        value: f64,
    },
    /// Palette size out of range.
    InvalidPalette {
        /// The configured size.
        size: usize,
    },
    /// Zoom factor out of range.
    InvalidZoom {
        /// The configured zoom.
        value: u32,
    },
    /// The zoomed frame for this grid does not fit in memory.
    FrameTooLarge {
        /// Grid width in cells.
        width: u32,
        /// Grid height in cells.
        height: u32,
        /// The configured zoom.
        zoom: u32,
    },
    /// Grid construction failed.
    Grid(GrainError),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyGrid { width, height } => {
                write!(f, "grid {width}x{height} has zero cells")
            }
            Self::InvalidRadius { value } => {
                write!(f, "inclusion radius must be at least 1, got {value}")
            }
            Self::InvalidCount { what } => write!(f, "{what} must be at least 1"),
            Self::InvalidEnergy { reason } => write!(f, "invalid energy: {reason}"),
            Self::InvalidSchedule { reason } => {
                write!(f, "invalid nucleation schedule: {reason}")
            }
            Self::InvalidTemperature { value } => {
                write!(f, "temperature must be finite and >= 0, got {value}")
            }
            Self::InvalidPalette { size } => write!(
                f,
                "palette size must be in 1..={}, got {size}",
                palette::MAX_SIZE
            ),
            Self::InvalidZoom { value } => {
                write!(f, "zoom must be in 1..={MAX_ZOOM}, got {value}")
            }
            Self::FrameTooLarge {
                width,
                height,
                zoom,
            } => write!(f, "frame for a {width}x{height} grid at zoom {zoom} is too large"),
            Self::Grid(e) => write!(f, "grid: {e}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Grid(e) => Some(e),
            _ => None,
        }
    }
}

impl From<GrainError> for ConfigError {
    fn from(e: GrainError) -> Self {
        Self::Grid(e)
    }
}

// ── SimulationConfig ───────────────────────────────────────────────

/// Everything needed to build a [`Simulation`](crate::Simulation).
#[derive(Clone, Debug, PartialEq)]
pub struct SimulationConfig {
    /// Lattice.
    pub grid: GridConfig,
    /// Cellular automata.
    pub ca: CaConfig,
    /// Monte Carlo.
    pub mc: McConfig,
    /// Static recrystallization.
    pub srx: SrxConfig,
    /// Seed for the session's random generator. Default: 0.
    pub seed: u64,
    /// Number of distinct grain colours. Default: 256.
    pub palette_size: usize,
    /// Pixels per cell edge. Default: 4.
    pub zoom: u32,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            grid: GridConfig::default(),
            ca: CaConfig::default(),
            mc: McConfig::default(),
            srx: SrxConfig::default(),
            seed: 0,
            palette_size: palette::DEFAULT_SIZE,
            zoom: 4,
        }
    }
}

impl SimulationConfig {
    /// Check every section, reporting the first problem found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.grid.validate()?;

        // CA
        if self.ca.inclusion_radius == 0 {
            return Err(ConfigError::InvalidRadius {
                value: self.ca.inclusion_radius,
            });
        }
        if self.ca.grains == 0 {
            return Err(ConfigError::InvalidCount { what: "ca grains" });
        }

        // MC
        if self.mc.grains == 0 {
            return Err(ConfigError::InvalidCount { what: "mc grains" });
        }
        if !self.mc.temperature.is_finite() || self.mc.temperature < 0.0 {
            return Err(ConfigError::InvalidTemperature {
                value: self.mc.temperature,
            });
        }

        // SRX
        let energy = self.srx.energy_value;
        if !energy.is_finite() || energy < 0.0 {
            return Err(ConfigError::InvalidEnergy {
                reason: format!("energy value must be finite and >= 0, got {energy}"),
            });
        }
        self.srx
            .distribution
            .validate()
            .map_err(|e| ConfigError::InvalidEnergy {
                reason: reason_of(e),
            })?;
        self.srx
            .schedule
            .validate()
            .map_err(|e| ConfigError::InvalidSchedule {
                reason: reason_of(e),
            })?;

        // Display
        if self.palette_size == 0 || self.palette_size > palette::MAX_SIZE {
            return Err(ConfigError::InvalidPalette {
                size: self.palette_size,
            });
        }
        if self.zoom == 0 || self.zoom > MAX_ZOOM {
            return Err(ConfigError::InvalidZoom { value: self.zoom });
        }
        render::frame_size(self.grid.width, self.grid.height, self.zoom).map_err(|_| {
            ConfigError::FrameTooLarge {
                width: self.grid.width,
                height: self.grid.height,
                zoom: self.zoom,
            }
        })?;
        Ok(())
    }
}

fn reason_of(e: GrainError) -> String {
    match e {
        GrainError::InvalidArgument { reason } => reason,
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert_eq!(SimulationConfig::default().validate(), Ok(()));
    }

    #[test]
    fn empty_grid_rejected() {
        let mut cfg = SimulationConfig::default();
        cfg.grid.height = 0;
        assert_eq!(
            cfg.validate(),
            Err(ConfigError::EmptyGrid {
                width: 100,
                height: 0
            })
        );
    }

    #[test]
    fn oversized_grid_rejected() {
        let mut cfg = SimulationConfig::default();
        cfg.grid.width = Grid::MAX_DIM + 1;
        assert!(matches!(cfg.validate(), Err(ConfigError::Grid(_))));
    }

    #[test]
    fn zero_counts_rejected() {
        let mut cfg = SimulationConfig::default();
        cfg.ca.grains = 0;
        assert_eq!(
            cfg.validate(),
            Err(ConfigError::InvalidCount { what: "ca grains" })
        );

        let mut cfg = SimulationConfig::default();
        cfg.mc.grains = 0;
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::InvalidCount { .. })
        ));
    }

    #[test]
    fn zero_radius_rejected() {
        let mut cfg = SimulationConfig::default();
        cfg.ca.inclusion_radius = 0;
        assert_eq!(cfg.validate(), Err(ConfigError::InvalidRadius { value: 0 }));
    }

    #[test]
    fn bad_temperature_rejected() {
        let mut cfg = SimulationConfig::default();
        cfg.mc.temperature = -0.5;
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::InvalidTemperature { .. })
        ));
    }

    #[test]
    fn bad_energy_rejected() {
        let mut cfg = SimulationConfig::default();
        cfg.srx.energy_value = f64::INFINITY;
        assert!(matches!(cfg.validate(), Err(ConfigError::InvalidEnergy { .. })));

        let mut cfg = SimulationConfig::default();
        cfg.srx.distribution = EnergyDistribution::Normal { std_dev: -1.0 };
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("std_dev"), "{err}");
    }

    #[test]
    fn bad_schedule_rejected() {
        let mut cfg = SimulationConfig::default();
        cfg.srx.schedule.every_steps = 0;
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::InvalidSchedule { .. })
        ));
    }

    #[test]
    fn display_settings_rejected() {
        let mut cfg = SimulationConfig::default();
        cfg.palette_size = 0;
        assert_eq!(cfg.validate(), Err(ConfigError::InvalidPalette { size: 0 }));

        let mut cfg = SimulationConfig::default();
        cfg.zoom = 0;
        assert_eq!(cfg.validate(), Err(ConfigError::InvalidZoom { value: 0 }));
    }

    #[test]
    fn oversized_frame_rejected() {
        let mut cfg = SimulationConfig::default();
        cfg.grid.width = Grid::MAX_DIM;
        cfg.grid.height = 1;
        cfg.zoom = MAX_ZOOM;
        assert_eq!(
            cfg.validate(),
            Err(ConfigError::FrameTooLarge {
                width: Grid::MAX_DIM,
                height: 1,
                zoom: MAX_ZOOM
            })
        );
    }

    #[test]
    fn grid_errors_convert() {
        let e: ConfigError = GrainError::invalid("x").into();
        assert!(e.source().is_some());
    }
}
