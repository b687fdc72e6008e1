//! Stored-energy distributions for static recrystallization.
//!
//! Every distribution is centred on a caller-supplied value. Spreads are
//! relative to that value, so one configuration works for any energy
//! scale. Samples are clamped at zero.

use grain_core::GrainError;
use rand::Rng;

/// Default relative half-width of [`EnergyDistribution::Uniform`].
pub const DEFAULT_UNIFORM_SPREAD: f64 = 0.1;

/// Default relative standard deviation of [`EnergyDistribution::Normal`].
pub const DEFAULT_NORMAL_STD_DEV: f64 = 0.1;

/// Default boundary multiplier of [`EnergyDistribution::Heterogeneous`].
pub const DEFAULT_BOUNDARY_FACTOR: f64 = 2.0;

/// How stored energy is assigned around a nominal value.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum EnergyDistribution {
    /// Every cell receives exactly the nominal value.
    Constant,
    /// `U[value * (1 - spread), value * (1 + spread)]`.
    Uniform {
        /// Relative half-width.
        spread: f64,
    },
    /// `N(value, (value * std_dev)²)`, clamped at zero.
    Normal {
        /// Relative standard deviation.
        std_dev: f64,
    },
    /// Grain-boundary cells receive `value * boundary_factor`, interior
    /// cells receive `value`.
    Heterogeneous {
        /// Multiplier applied on grain boundaries.
        boundary_factor: f64,
    },
}

impl Default for EnergyDistribution {
    fn default() -> Self {
        Self::Uniform {
            spread: DEFAULT_UNIFORM_SPREAD,
        }
    }
}

impl EnergyDistribution {
    /// Check the spread parameter.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if the parameter is negative or not finite.
    pub fn validate(&self) -> Result<(), GrainError> {
        let (name, v) = match *self {
            Self::Constant => return Ok(()),
            Self::Uniform { spread } => ("spread", spread),
            Self::Normal { std_dev } => ("std_dev", std_dev),
            Self::Heterogeneous { boundary_factor } => ("boundary_factor", boundary_factor),
        };
        if !v.is_finite() || v < 0.0 {
            return Err(GrainError::invalid(format!(
                "{name} must be finite and >= 0, got {v}"
            )));
        }
        Ok(())
    }

    /// True if sampling depends on whether the cell sits on a grain
    /// boundary.
    pub fn needs_boundaries(&self) -> bool {
        matches!(self, Self::Heterogeneous { .. })
    }

    /// Draw one energy for a cell.
    pub fn sample<R: Rng + ?Sized>(&self, value: f64, on_boundary: bool, rng: &mut R) -> f64 {
        let e = match *self {
            Self::Constant => value,
            Self::Uniform { spread } => {
                let u: f64 = rng.random::<f64>() * 2.0 - 1.0;
                value * (1.0 + spread * u)
            }
            Self::Normal { std_dev } => value + value * std_dev * box_muller(rng),
            Self::Heterogeneous { boundary_factor } => {
                if on_boundary {
                    value * boundary_factor
                } else {
                    value
                }
            }
        };
        e.max(0.0)
    }
}

/// Standard normal sample via the Box-Muller transform.
fn box_muller<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    let u1: f64 = rng.random::<f64>().max(1e-300); // avoid ln(0)
    let u2: f64 = rng.random();
    (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos()
}
