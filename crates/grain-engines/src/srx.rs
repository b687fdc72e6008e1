//! Static recrystallization (SRX).
//!
//! Deformed cells carry stored energy. Nuclei are strain-free grains that
//! spawn on unrecrystallized cells; each [`step`](Recrystallization::step)
//! advances every recrystallization front by one kernel shell, consuming
//! the stored energy of the cells it sweeps. Energy is zeroed, never moved,
//! so the grid total only ever falls.

use grain_core::{Cell, GrainError, GrainId, GridInstanceId};
use grain_space::{Grid, Neighborhood};
use rand::Rng;
use tracing::{debug, trace};

use crate::binding::Binding;
use crate::energy::EnergyDistribution;
use crate::nucleation::{NucleationSchedule, NucleationSites};
use crate::sampling;

/// Static recrystallization engine.
#[derive(Clone, Debug, Default)]
pub struct Recrystallization {
    neighborhood: Neighborhood,
    distribution: EnergyDistribution,
    sites: NucleationSites,
    binding: Binding,
    nucleations: usize,
    steps: u64,
}

impl Recrystallization {
    /// Create an engine with the given kernel, the default uniform energy
    /// distribution and uniform nucleation sites.
    pub fn new(neighborhood: Neighborhood) -> Self {
        Self {
            neighborhood,
            ..Self::default()
        }
    }

    /// Use `distribution` for [`add_energy`](Self::add_energy).
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if the distribution parameter is invalid.
    pub fn with_distribution(
        mut self,
        distribution: EnergyDistribution,
    ) -> Result<Self, GrainError> {
        distribution.validate()?;
        self.distribution = distribution;
        Ok(self)
    }

    /// Use `sites` for [`add_nucleations`](Self::add_nucleations).
    pub fn with_site_selection(mut self, sites: NucleationSites) -> Self {
        self.sites = sites;
        self
    }

    /// Kernel used by the recrystallization front.
    pub fn neighborhood(&self) -> Neighborhood {
        self.neighborhood
    }

    /// Change the kernel.
    pub fn set_neighborhood(&mut self, neighborhood: Neighborhood) {
        self.neighborhood = neighborhood;
    }

    /// Energy distribution.
    pub fn distribution(&self) -> EnergyDistribution {
        self.distribution
    }

    /// Nucleation site strategy.
    pub fn site_selection(&self) -> NucleationSites {
        self.sites
    }

    /// Nuclei added on the bound grid.
    pub fn nucleation_count(&self) -> usize {
        self.nucleations
    }

    /// Sweeps run on the bound grid.
    pub fn steps_taken(&self) -> u64 {
        self.steps
    }

    /// Bind to `grid`, resetting the nucleation and step counters.
    pub fn bind(&mut self, grid: &Grid) {
        self.binding.sync(grid);
        self.reset_counters();
    }

    /// Grid this engine last operated on.
    pub fn bound_grid(&self) -> Option<GridInstanceId> {
        self.binding.bound()
    }

    fn reset_counters(&mut self) {
        self.nucleations = 0;
        self.steps = 0;
    }

    fn sync(&mut self, grid: &Grid) {
        if self.binding.sync(grid) {
            self.reset_counters();
        }
    }

    // ── Energy ──────────────────────────────────────────────────

    /// Give every unrecrystallized, non-inclusion cell a stored energy
    /// drawn around `value`. Recrystallized cells keep zero energy, so
    /// calling this again only re-samples cells still awaiting the front.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if `value` is negative or not finite.
    pub fn add_energy<R: Rng + ?Sized>(
        &mut self,
        grid: &mut Grid,
        rng: &mut R,
        value: f64,
    ) -> Result<(), GrainError> {
        if !value.is_finite() || value < 0.0 {
            return Err(GrainError::invalid(format!(
                "energy value must be finite and >= 0, got {value}"
            )));
        }
        self.sync(grid);

        let boundaries = if self.distribution.needs_boundaries() {
            self.boundary_mask(grid)
        } else {
            vec![false; grid.cell_count()]
        };
        let distribution = self.distribution;
        let mut assigned = 0usize;
        for (cell, &on_boundary) in grid.cells_mut().iter_mut().zip(&boundaries) {
            if cell.is_inclusion() || cell.recrystallized {
                continue;
            }
            cell.stored_energy = distribution.sample(value, on_boundary, rng);
            assigned += 1;
        }
        debug!(
            grid = %grid.instance_id(),
            value,
            ?distribution,
            cells = assigned,
            "stored energy assigned"
        );
        Ok(())
    }

    fn boundary_mask(&self, grid: &Grid) -> Vec<bool> {
        let cells = grid.cells();
        (0..grid.cell_count())
            .map(|i| {
                grid.neighbour_indices(i, self.neighborhood)
                    .iter()
                    .any(|&n| cells[n].state != cells[i].state)
            })
            .collect()
    }

    // ── Nucleation ──────────────────────────────────────────────

    /// Turn `count` unrecrystallized, non-inclusion cells into new
    /// recrystallized single-cell grains with zero energy. Returns the new
    /// ids.
    ///
    /// Fails with `InsufficientSpace`, leaving the grid untouched, when
    /// fewer than `count` cells are eligible.
    pub fn add_nucleations<R: Rng + ?Sized>(
        &mut self,
        grid: &mut Grid,
        rng: &mut R,
        count: usize,
    ) -> Result<Vec<GrainId>, GrainError> {
        sampling::require_positive(count, "nucleation count")?;
        self.sync(grid);
        let (eligible, energies) = eligible_cells(grid);
        let picked = self.sites.choose(rng, &eligible, &energies, count)?;

        let mut ids = Vec::with_capacity(picked.len());
        for i in picked {
            let id = grid.allocate_grain_id();
            grid.cells_mut()[i] = Cell::recrystallized(id);
            ids.push(id);
        }
        self.nucleations += ids.len();
        debug!(grid = %grid.instance_id(), count, total = self.nucleations, "nucleations added");
        Ok(ids)
    }

    // ── Growth ──────────────────────────────────────────────────

    /// Run one synchronous recrystallization sweep.
    ///
    /// Every unrecrystallized, non-inclusion cell with a recrystallized
    /// neighbour adopts the first such neighbour's id in kernel order,
    /// becomes recrystallized and loses its stored energy.
    pub fn step(&mut self, grid: &mut Grid) {
        self.sync(grid);
        let snapshot: Vec<Cell> = grid.cells().to_vec();
        let changes: Vec<(usize, GrainId)> = snapshot
            .iter()
            .enumerate()
            .filter(|(_, c)| !c.is_inclusion() && !c.recrystallized)
            .filter_map(|(i, _)| {
                grid.neighbour_indices(i, self.neighborhood)
                    .iter()
                    .map(|&n| &snapshot[n])
                    .find(|n| n.recrystallized)
                    .and_then(Cell::grain_id)
                    .map(|id| (i, id))
            })
            .collect();

        let cells = grid.cells_mut();
        for &(i, id) in &changes {
            cells[i] = Cell::recrystallized(id);
        }
        self.steps += 1;
        trace!(changed = changes.len(), "srx sweep");
    }

    /// Run a full recrystallization: assign energy around `energy`, then
    /// run `steps` sweeps, adding nuclei before the sweeps `schedule`
    /// names.
    ///
    /// Additions are clamped to the number of eligible cells and skipped
    /// once none remain. Returns the number of nuclei added.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` for an invalid energy value or schedule,
    /// before anything is mutated.
    pub fn simulate<R: Rng + ?Sized>(
        &mut self,
        grid: &mut Grid,
        rng: &mut R,
        energy: f64,
        steps: usize,
        schedule: &NucleationSchedule,
    ) -> Result<usize, GrainError> {
        schedule.validate()?;
        self.add_energy(grid, rng, energy)?;

        let plan = schedule.plan(steps);
        let mut planned = plan.iter().peekable();
        let mut added = 0;
        for step in 0..steps {
            if let Some(&(_, count)) = planned.next_if(|&&(at, _)| at == step) {
                let available = eligible_cells(grid).0.len();
                let count = count.min(available);
                if count > 0 {
                    added += self.add_nucleations(grid, rng, count)?.len();
                }
            }
            self.step(grid);
        }
        debug!(grid = %grid.instance_id(), steps, nuclei = added, "srx run finished");
        Ok(added)
    }
}

/// Unrecrystallized, non-inclusion cells and their stored energies.
fn eligible_cells(grid: &Grid) -> (Vec<usize>, Vec<f64>) {
    grid.cells()
        .iter()
        .enumerate()
        .filter(|(_, c)| !c.is_inclusion() && !c.recrystallized)
        .map(|(i, c)| (i, c.stored_energy))
        .unzip()
}
