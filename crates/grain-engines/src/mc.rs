//! Potts-model Monte Carlo grain growth.
//!
//! One [`step`](MonteCarlo::step) is `width * height` independent trials.
//! Each trial picks a random grain cell and proposes the id of a random
//! neighbour. The local boundary energy is the number of neighbours whose
//! state differs from the cell's; a proposal is accepted when it does not
//! raise that energy.
//!
//! With a positive temperature `kT`, energy-raising proposals are also
//! accepted with Metropolis probability `exp(-ΔE / kT)`. The default `kT`
//! is zero, under which the total boundary mismatch of the grid never
//! increases.

use grain_core::{Cell, CellState, GrainError, GrainId, GridInstanceId};
use grain_space::{Grid, Neighborhood};
use rand::Rng;
use tracing::{debug, trace};

use crate::binding::Binding;
use crate::sampling;

/// Monte Carlo boundary migration engine.
#[derive(Clone, Debug, Default)]
pub struct MonteCarlo {
    neighborhood: Neighborhood,
    temperature: f64,
    binding: Binding,
}

impl MonteCarlo {
    /// Create a zero-temperature engine using the given kernel.
    pub fn new(neighborhood: Neighborhood) -> Self {
        Self {
            neighborhood,
            ..Self::default()
        }
    }

    /// Set the Metropolis temperature `kT` (default 0).
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if `kt` is negative or not finite.
    pub fn with_temperature(mut self, kt: f64) -> Result<Self, GrainError> {
        if !kt.is_finite() || kt < 0.0 {
            return Err(GrainError::invalid(format!(
                "temperature must be finite and >= 0, got {kt}"
            )));
        }
        self.temperature = kt;
        Ok(self)
    }

    /// Kernel used for energy evaluation and proposals.
    pub fn neighborhood(&self) -> Neighborhood {
        self.neighborhood
    }

    /// Change the kernel.
    pub fn set_neighborhood(&mut self, neighborhood: Neighborhood) {
        self.neighborhood = neighborhood;
    }

    /// Metropolis temperature `kT`.
    pub fn temperature(&self) -> f64 {
        self.temperature
    }

    /// Bind to `grid`.
    pub fn bind(&mut self, grid: &Grid) {
        self.binding.sync(grid);
    }

    /// Grid this engine last operated on.
    pub fn bound_grid(&self) -> Option<GridInstanceId> {
        self.binding.bound()
    }

    /// Clear every non-inclusion cell, then seed `count` new grains on
    /// distinct cells chosen uniformly at random.
    ///
    /// Fails before clearing anything if `count` is zero or exceeds the
    /// number of non-inclusion cells.
    pub fn init<R: Rng + ?Sized>(
        &mut self,
        grid: &mut Grid,
        rng: &mut R,
        count: usize,
    ) -> Result<Vec<GrainId>, GrainError> {
        self.binding.sync(grid);
        sampling::require_positive(count, "grain count")?;
        let available = grid.cells().iter().filter(|c| !c.is_inclusion()).count();
        sampling::require_space(count, available)?;

        for cell in grid.cells_mut().iter_mut().filter(|c| !c.is_inclusion()) {
            *cell = Cell::EMPTY;
        }
        let ids = sampling::seed_grains(grid, rng, count)?;
        debug!(grid = %grid.instance_id(), count, "monte carlo initialised");
        Ok(ids)
    }

    /// Perform `width * height` trial reassignments.
    pub fn step<R: Rng + ?Sized>(&mut self, grid: &mut Grid, rng: &mut R) {
        self.binding.sync(grid);
        let accepted = self.sweep(grid, rng);
        trace!(accepted, "mc sweep");
    }

    /// Run `steps` sweeps.
    pub fn run<R: Rng + ?Sized>(&mut self, grid: &mut Grid, rng: &mut R, steps: usize) {
        for _ in 0..steps {
            self.step(grid, rng);
        }
        debug!(grid = %grid.instance_id(), steps, "monte carlo run finished");
    }

    fn sweep<R: Rng + ?Sized>(&self, grid: &mut Grid, rng: &mut R) -> usize {
        // Trials never turn a grain cell into anything else, so the
        // candidate list stays valid for the whole sweep.
        let grains: Vec<usize> = grid
            .cells()
            .iter()
            .enumerate()
            .filter(|(_, c)| c.grain_id().is_some())
            .map(|(i, _)| i)
            .collect();
        if grains.is_empty() {
            return 0;
        }

        let mut accepted = 0;
        for _ in 0..grid.cell_count() {
            let i = grains[rng.random_range(0..grains.len())];
            let neighbours = grid.neighbour_indices(i, self.neighborhood);
            if neighbours.is_empty() {
                continue;
            }
            let cells = grid.cells();
            let current = cells[i].state;
            let proposal = cells[neighbours[rng.random_range(0..neighbours.len())]].state;
            if !matches!(proposal, CellState::Grain(_)) || proposal == current {
                continue;
            }

            let mismatch = |s: CellState| {
                neighbours
                    .iter()
                    .filter(|&&n| cells[n].state != s)
                    .count()
            };
            let e0 = mismatch(current);
            let e1 = mismatch(proposal);
            if self.accept(e0, e1, rng) {
                grid.cells_mut()[i].state = proposal;
                accepted += 1;
            }
        }
        accepted
    }

    fn accept<R: Rng + ?Sized>(&self, e0: usize, e1: usize, rng: &mut R) -> bool {
        if e1 <= e0 {
            return true;
        }
        if self.temperature == 0.0 {
            return false;
        }
        let delta = (e1 - e0) as f64;
        rng.random::<f64>() < (-delta / self.temperature).exp()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use grain_test_utils::{grain_ids, grid_from_ascii, seeded_rng, to_ascii, total_mismatch};

    #[test]
    fn temperature_validation() {
        assert!(MonteCarlo::default().with_temperature(-1.0).is_err());
        assert!(MonteCarlo::default().with_temperature(f64::NAN).is_err());
        let mc = MonteCarlo::default().with_temperature(0.5).unwrap();
        assert_eq!(mc.temperature(), 0.5);
    }

    #[test]
    fn init_clears_grains_but_keeps_inclusions() {
        let mut grid = grid_from_ascii(
            "11#
             22#
             33#",
            false,
        );
        let mut mc = MonteCarlo::default();
        let mut rng = seeded_rng(11);
        let ids = mc.init(&mut grid, &mut rng, 2).unwrap();
        assert_eq!(ids, vec![GrainId(4), GrainId(5)]);
        assert_eq!(grain_ids(&grid).len(), 2);
        assert_eq!(grid.count_state(CellState::Inclusion), 3);
        assert_eq!(grid.count_state(CellState::Empty), 4);
    }

    #[test]
    fn init_rejects_overdraw_without_clearing() {
        let mut grid = grid_from_ascii("1#", false);
        let mut mc = MonteCarlo::default();
        let mut rng = seeded_rng(11);
        assert_eq!(
            mc.init(&mut grid, &mut rng, 2),
            Err(GrainError::InsufficientSpace {
                requested: 2,
                available: 1
            })
        );
        assert_eq!(to_ascii(&grid), "1#");
    }

    #[test]
    fn isolated_minority_cell_is_absorbed() {
        // The lone 2 has four neighbours of id 1. Any proposal drawn from
        // them removes all mismatch, so it flips on its first trial.
        let mut grid = grid_from_ascii(
            "111
             121
             111",
            true,
        );
        let mut mc = MonteCarlo::default();
        let mut rng = seeded_rng(5);
        for _ in 0..20 {
            mc.step(&mut grid, &mut rng);
        }
        assert_eq!(to_ascii(&grid), "111\n111\n111");
    }

    #[test]
    fn uniform_grid_is_stable() {
        let mut grid = grid_from_ascii("111\n111", false);
        let mut mc = MonteCarlo::new(Neighborhood::Moore);
        let mut rng = seeded_rng(1);
        mc.run(&mut grid, &mut rng, 5);
        assert_eq!(to_ascii(&grid), "111\n111");
    }

    #[test]
    fn never_adopts_empty_or_inclusion() {
        let mut grid = grid_from_ascii(
            ".#.
             #1#
             .#.",
            false,
        );
        let mut mc = MonteCarlo::new(Neighborhood::Moore);
        let mut rng = seeded_rng(9);
        mc.run(&mut grid, &mut rng, 10);
        assert_eq!(grid.cell_at(1, 1).unwrap().grain_id(), Some(GrainId(1)));
    }

    #[test]
    fn step_on_empty_grid_is_no_op() {
        let mut grid = Grid::new(4, 4, false).unwrap();
        let mut mc = MonteCarlo::default();
        let mut rng = seeded_rng(1);
        mc.step(&mut grid, &mut rng);
        assert!(grid.cells().iter().all(|c| *c == Cell::EMPTY));
    }

    #[test]
    fn zero_temperature_never_raises_mismatch() {
        let mut grid = grid_from_ascii(
            "1122
             1322
             3344
             3344",
            true,
        );
        let mut mc = MonteCarlo::default();
        let mut rng = seeded_rng(21);
        let mut prev = total_mismatch(&grid, Neighborhood::VonNeumann);
        for _ in 0..10 {
            mc.step(&mut grid, &mut rng);
            let now = total_mismatch(&grid, Neighborhood::VonNeumann);
            assert!(now <= prev, "mismatch rose from {prev} to {now}");
            prev = now;
        }
    }

    #[test]
    fn same_seed_same_result() {
        let run = |seed: u64| {
            let mut grid = Grid::new(12, 12, true).unwrap();
            let mut mc = MonteCarlo::new(Neighborhood::Moore);
            let mut rng = seeded_rng(seed);
            mc.init(&mut grid, &mut rng, 144).unwrap();
            mc.run(&mut grid, &mut rng, 3);
            grid.cells().to_vec()
        };
        assert_eq!(run(99), run(99));
    }
}
