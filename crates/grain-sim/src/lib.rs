//! Interactive grain growth sessions.
//!
//! A [`Simulation`] owns one grid, the three growth engines, a seeded
//! generator, a renderer and the click-tool dispatcher. It is the layer a
//! front end talks to: build it from a validated [`SimulationConfig`], call
//! engine operations, forward clicks, and pull RGBA frames.
//!
//! ```
//! use grain_sim::{Simulation, SimulationConfig};
//!
//! let mut config = SimulationConfig::default();
//! config.grid.width = 32;
//! config.grid.height = 32;
//! config.ca.grains = 5;
//!
//! let mut sim = Simulation::new(config).unwrap();
//! sim.add_random_grains().unwrap();
//! sim.grow_until_stalled();
//! assert!(sim.grid().is_full());
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod config;
pub mod simulation;
pub mod tool;

pub use config::{CaConfig, ConfigError, GridConfig, McConfig, SimulationConfig, SrxConfig};
pub use simulation::Simulation;
pub use tool::{ClickOutcome, Tool, ToolDispatcher};
