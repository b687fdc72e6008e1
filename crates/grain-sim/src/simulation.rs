//! The interactive simulation session.

use grain_core::{GrainError, GrainId};
use grain_engines::{CellularAutomata, MonteCarlo, Recrystallization};
use grain_space::Grid;
use grain_view::{Palette, Renderer};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info};

use crate::config::{CaConfig, ConfigError, GridConfig, McConfig, SimulationConfig, SrxConfig};
use crate::tool::{ClickOutcome, Tool, ToolDispatcher};

/// A grid, the three engines working on it, and everything needed to
/// drive and draw them.
///
/// All randomness (palette shuffle, seeding, Monte Carlo trials, energy,
/// nucleation) comes from one generator seeded from the configuration, so
/// a session replays exactly for a given seed and call sequence.
#[derive(Debug)]
pub struct Simulation {
    config: SimulationConfig,
    grid: Grid,
    ca: CellularAutomata,
    mc: MonteCarlo,
    srx: Recrystallization,
    rng: ChaCha8Rng,
    renderer: Renderer,
    tools: ToolDispatcher,
}

impl Simulation {
    /// Validate `config` and build a session with an empty grid.
    pub fn new(config: SimulationConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
        let palette = Palette::new(&mut rng, config.palette_size)?;
        let mut renderer = Renderer::new(palette).with_zoom(config.zoom)?;
        renderer.set_highlight_recrystallized(config.srx.highlight_recrystallized);

        let grid = new_grid(&config.grid)?;
        let mut sim = Self {
            ca: CellularAutomata::new(config.ca.neighborhood),
            mc: MonteCarlo::new(config.mc.neighborhood).with_temperature(config.mc.temperature)?,
            srx: srx_engine(&config.srx)?,
            tools: ToolDispatcher::new(config.ca.inclusion_radius, config.ca.change_id),
            config,
            grid,
            rng,
            renderer,
        };
        sim.bind_engines();
        info!(
            width = sim.grid.width(),
            height = sim.grid.height(),
            edge = ?sim.grid.edge_behavior(),
            seed = sim.config.seed,
            "simulation created"
        );
        Ok(sim)
    }

    fn bind_engines(&mut self) {
        self.ca.bind(&self.grid);
        self.mc.bind(&self.grid);
        self.srx.bind(&self.grid);
    }

    // ── Accessors ───────────────────────────────────────────────

    /// Current configuration.
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// The grid.
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// The cellular automata engine.
    pub fn ca(&self) -> &CellularAutomata {
        &self.ca
    }

    /// The Monte Carlo engine.
    pub fn mc(&self) -> &MonteCarlo {
        &self.mc
    }

    /// The recrystallization engine.
    pub fn srx(&self) -> &Recrystallization {
        &self.srx
    }

    /// The renderer.
    pub fn renderer(&self) -> &Renderer {
        &self.renderer
    }

    /// The active tool.
    pub fn active_tool(&self) -> Tool {
        self.tools.active()
    }

    // ── Reconfiguration ─────────────────────────────────────────

    /// Replace the grid with a fresh empty one and rebind every engine.
    /// Any selection in progress is discarded.
    pub fn resize(&mut self, grid: GridConfig) -> Result<(), ConfigError> {
        let mut next = self.config.clone();
        next.grid = grid;
        next.validate()?;
        self.grid = new_grid(&grid)?;
        self.config = next;
        self.tools.reset();
        self.bind_engines();
        debug!(width = grid.width, height = grid.height, periodic = grid.periodic, "grid rebuilt");
        Ok(())
    }

    /// Apply new cellular automata settings.
    pub fn set_ca_config(&mut self, ca: CaConfig) -> Result<(), ConfigError> {
        let mut next = self.config.clone();
        next.ca = ca;
        next.validate()?;
        self.ca.set_neighborhood(ca.neighborhood);
        self.tools.set_inclusion_radius(ca.inclusion_radius);
        self.tools.set_change_id(ca.change_id);
        self.config = next;
        Ok(())
    }

    /// Apply new Monte Carlo settings.
    pub fn set_mc_config(&mut self, mc: McConfig) -> Result<(), ConfigError> {
        let mut next = self.config.clone();
        next.mc = mc;
        next.validate()?;
        self.mc.set_neighborhood(mc.neighborhood);
        self.mc = self.mc.clone().with_temperature(mc.temperature)?;
        self.config = next;
        Ok(())
    }

    /// Apply new recrystallization settings. Nucleation and step counters
    /// carry over.
    pub fn set_srx_config(&mut self, srx: SrxConfig) -> Result<(), ConfigError> {
        let mut next = self.config.clone();
        next.srx = srx;
        next.validate()?;
        self.srx.set_neighborhood(srx.neighborhood);
        self.srx = self
            .srx
            .clone()
            .with_distribution(srx.distribution)?
            .with_site_selection(srx.site_selection);
        self.renderer
            .set_highlight_recrystallized(srx.highlight_recrystallized);
        self.config = next;
        Ok(())
    }

    /// Change the zoom factor.
    pub fn set_zoom(&mut self, zoom: u32) -> Result<(), ConfigError> {
        let mut next = self.config.clone();
        next.zoom = zoom;
        next.validate()?;
        let renderer = self
            .renderer
            .clone()
            .with_zoom(zoom)
            .map_err(|_| ConfigError::InvalidZoom { value: zoom })?;
        self.renderer = renderer;
        self.config = next;
        Ok(())
    }

    // ── Cellular automata ───────────────────────────────────────

    /// Seed the configured number of random grains.
    pub fn add_random_grains(&mut self) -> Result<Vec<GrainId>, GrainError> {
        self.ca
            .add_random_grains(&mut self.grid, &mut self.rng, self.config.ca.grains)
    }

    /// One growth sweep. Returns true iff any cell changed.
    pub fn ca_step(&mut self) -> bool {
        self.ca.step(&mut self.grid)
    }

    /// Grow until stalled. Returns the number of productive sweeps.
    pub fn grow_until_stalled(&mut self) -> usize {
        self.ca.grow_until_stalled(&mut self.grid)
    }

    // ── Monte Carlo ─────────────────────────────────────────────

    /// Reseed the grid with the configured number of grains.
    pub fn mc_init(&mut self) -> Result<Vec<GrainId>, GrainError> {
        self.mc
            .init(&mut self.grid, &mut self.rng, self.config.mc.grains)
    }

    /// One Monte Carlo sweep.
    pub fn mc_step(&mut self) {
        self.mc.step(&mut self.grid, &mut self.rng);
    }

    /// Run the configured number of Monte Carlo sweeps.
    pub fn mc_run(&mut self) {
        self.mc
            .run(&mut self.grid, &mut self.rng, self.config.mc.steps);
    }

    // ── Recrystallization ───────────────────────────────────────

    /// Assign stored energy around the configured value.
    pub fn srx_add_energy(&mut self) -> Result<(), GrainError> {
        self.srx
            .add_energy(&mut self.grid, &mut self.rng, self.config.srx.energy_value)
    }

    /// Add `count` nuclei.
    pub fn srx_add_nucleations(&mut self, count: usize) -> Result<Vec<GrainId>, GrainError> {
        self.srx.add_nucleations(&mut self.grid, &mut self.rng, count)
    }

    /// One recrystallization sweep.
    pub fn srx_step(&mut self) {
        self.srx.step(&mut self.grid);
    }

    /// Run a full recrystallization with the configured energy, schedule
    /// and step count. Returns the number of nuclei added.
    pub fn srx_simulate(&mut self) -> Result<usize, GrainError> {
        let cfg = self.config.srx;
        self.srx.simulate(
            &mut self.grid,
            &mut self.rng,
            cfg.energy_value,
            cfg.steps,
            &cfg.schedule,
        )
    }

    // ── Tools ───────────────────────────────────────────────────

    /// Switch to `tool`, or turn it off if already active. Returns the
    /// merged id when ending a selection merges grains.
    pub fn activate_tool(&mut self, tool: Tool) -> Option<GrainId> {
        self.tools.activate(tool, &mut self.ca, &mut self.grid)
    }

    /// Apply the active tool at cell `(x, y)`.
    pub fn click_cell(&mut self, x: u32, y: u32) -> Result<ClickOutcome, GrainError> {
        self.tools.click(&mut self.ca, &mut self.grid, x, y)
    }

    /// Apply the active tool at frame pixel `(px, py)`.
    pub fn click_pixel(&mut self, px: u32, py: u32) -> Result<ClickOutcome, GrainError> {
        let (x, y) = self.renderer.pixel_to_cell(px, py);
        self.click_cell(x, y)
    }

    // ── Rendering ───────────────────────────────────────────────

    /// Frame size in pixels.
    pub fn frame_size(&self) -> Result<(u32, u32), GrainError> {
        self.renderer.frame_size(&self.grid)
    }

    /// Render the grid as a row-major RGBA8 frame.
    pub fn render_rgba(&self) -> Result<Vec<u8>, GrainError> {
        self.renderer.render_rgba(&self.grid)
    }
}

fn new_grid(cfg: &GridConfig) -> Result<Grid, GrainError> {
    Grid::new(cfg.width, cfg.height, cfg.periodic)
}

fn srx_engine(cfg: &SrxConfig) -> Result<Recrystallization, GrainError> {
    Ok(Recrystallization::new(cfg.neighborhood)
        .with_distribution(cfg.distribution)?
        .with_site_selection(cfg.site_selection))
}

#[cfg(test)]
mod tests {
    use super::*;
    use grain_core::CellState;
    use grain_engines::{NucleationMode, NucleationSchedule, NucleationSites};
    use grain_view::render::MAX_ZOOM;

    fn small() -> SimulationConfig {
        let mut cfg = SimulationConfig::default();
        cfg.grid = GridConfig {
            width: 10,
            height: 8,
            periodic: true,
        };
        cfg.ca.grains = 4;
        cfg.mc.grains = 6;
        cfg.mc.steps = 3;
        cfg.zoom = 2;
        cfg
    }

    #[test]
    fn invalid_config_is_rejected() {
        let mut cfg = small();
        cfg.zoom = 0;
        assert!(matches!(
            Simulation::new(cfg),
            Err(ConfigError::InvalidZoom { value: 0 })
        ));
    }

    #[test]
    fn engines_bound_to_session_grid() {
        let sim = Simulation::new(small()).unwrap();
        let id = Some(sim.grid().instance_id());
        assert_eq!(sim.ca().bound_grid(), id);
        assert_eq!(sim.mc().bound_grid(), id);
        assert_eq!(sim.srx().bound_grid(), id);
    }

    #[test]
    fn resize_rebinds_and_clears() {
        let mut sim = Simulation::new(small()).unwrap();
        sim.add_random_grains().unwrap();
        sim.activate_tool(Tool::SelectGrain);
        let before = sim.grid().instance_id();

        sim.resize(GridConfig {
            width: 4,
            height: 4,
            periodic: false,
        })
        .unwrap();
        assert_ne!(sim.grid().instance_id(), before);
        assert_eq!(sim.ca().bound_grid(), Some(sim.grid().instance_id()));
        assert_eq!(sim.active_tool(), Tool::None);
        assert!(!sim.ca().is_selecting());
        assert_eq!(sim.grid().count_state(CellState::Empty), 16);
    }

    #[test]
    fn resize_rejects_empty_grid() {
        let mut sim = Simulation::new(small()).unwrap();
        let err = sim.resize(GridConfig {
            width: 0,
            height: 3,
            periodic: false,
        });
        assert!(matches!(err, Err(ConfigError::EmptyGrid { .. })));
        assert_eq!(sim.grid().width(), 10);
    }

    #[test]
    fn ca_fills_periodic_grid() {
        let mut sim = Simulation::new(small()).unwrap();
        assert_eq!(sim.add_random_grains().unwrap().len(), 4);
        assert!(sim.grow_until_stalled() > 0);
        assert!(sim.grid().is_full());
        assert!(!sim.ca_step());
    }

    #[test]
    fn click_pixel_uses_zoom() {
        let mut sim = Simulation::new(small()).unwrap();
        sim.activate_tool(Tool::AddSquareInclusion);
        let mut ca = sim.config().ca;
        ca.inclusion_radius = 1;
        sim.set_ca_config(ca).unwrap();
        // Pixel (5, 5) at zoom 2 is cell (2, 2).
        assert_eq!(sim.click_pixel(5, 5).unwrap(), ClickOutcome::Inclusion(9));
        assert!(sim.grid().cell_at(2, 2).unwrap().is_inclusion());
        assert!(sim.grid().cell_at(1, 1).unwrap().is_inclusion());
    }

    #[test]
    fn frame_matches_zoomed_grid() {
        let sim = Simulation::new(small()).unwrap();
        assert_eq!(sim.frame_size().unwrap(), (20, 16));
        assert_eq!(sim.render_rgba().unwrap().len(), 20 * 16 * 4);
    }

    #[test]
    fn set_zoom_validates() {
        let mut sim = Simulation::new(small()).unwrap();
        assert!(sim.set_zoom(0).is_err());
        sim.set_zoom(3).unwrap();
        assert_eq!(sim.frame_size().unwrap(), (30, 24));
    }

    #[test]
    fn resize_rejects_unrenderable_grid() {
        let mut sim = Simulation::new(small()).unwrap();
        sim.set_zoom(MAX_ZOOM).unwrap();
        let err = sim.resize(GridConfig {
            width: Grid::MAX_DIM,
            height: 1,
            periodic: false,
        });
        assert!(matches!(err, Err(ConfigError::FrameTooLarge { .. })));
        assert_eq!(sim.config().grid.width, 10);
        assert_eq!(sim.frame_size().unwrap(), (10 * MAX_ZOOM, 8 * MAX_ZOOM));
    }

    #[test]
    fn srx_settings_reach_engine_and_renderer() {
        let mut sim = Simulation::new(small()).unwrap();
        assert!(!sim.renderer().highlights_recrystallized());
        let mut srx = sim.config().srx;
        srx.highlight_recrystallized = true;
        srx.site_selection = NucleationSites::EnergyWeighted;
        sim.set_srx_config(srx).unwrap();
        assert!(sim.renderer().highlights_recrystallized());
        assert_eq!(sim.srx().site_selection(), NucleationSites::EnergyWeighted);
    }

    #[test]
    fn steeply_increasing_schedule_runs_to_completion() {
        let mut cfg = small();
        cfg.srx.steps = 5;
        cfg.srx.schedule = NucleationSchedule {
            mode: NucleationMode::Increasing,
            initial: 1,
            delta: usize::MAX,
            every_steps: 1,
            additions: 3,
        };
        let mut sim = Simulation::new(cfg).unwrap();
        sim.add_random_grains().unwrap();
        sim.grow_until_stalled();
        // One nucleus and its four neighbours recrystallize in the first
        // sweep; the second addition takes the remaining 75 cells.
        assert_eq!(sim.srx_simulate().unwrap(), 76);
        assert_eq!(sim.srx().nucleation_count(), 76);
        assert!(sim.grid().cells().iter().all(|c| c.recrystallized));
    }
}
