//! Nucleation site selection and nucleation schedules.

use grain_core::GrainError;
use rand::seq::index;
use rand::Rng;

use crate::sampling;

/// How nucleation sites are chosen among eligible cells.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum NucleationSites {
    /// Uniformly at random, without replacement.
    #[default]
    Uniform,
    /// Without replacement, with probability proportional to stored
    /// energy. Zero-energy cells are only used once every positive-energy
    /// cell has been taken.
    EnergyWeighted,
}

impl NucleationSites {
    /// Choose `count` distinct entries of `candidates`. `energies[k]` is the
    /// stored energy of `candidates[k]`.
    pub(crate) fn choose<R: Rng + ?Sized>(
        self,
        rng: &mut R,
        candidates: &[usize],
        energies: &[f64],
        count: usize,
    ) -> Result<Vec<usize>, GrainError> {
        debug_assert_eq!(candidates.len(), energies.len());
        match self {
            Self::Uniform => sampling::sample_distinct(rng, candidates, count),
            Self::EnergyWeighted => weighted(rng, candidates, energies, count),
        }
    }
}

/// Efraimidis-Spirakis weighted sampling without replacement: each
/// positive-weight item gets key `ln(u) / w` and the largest keys win.
fn weighted<R: Rng + ?Sized>(
    rng: &mut R,
    candidates: &[usize],
    energies: &[f64],
    count: usize,
) -> Result<Vec<usize>, GrainError> {
    sampling::require_space(count, candidates.len())?;

    let mut keyed = Vec::new();
    let mut weightless = Vec::new();
    for (&cell, &w) in candidates.iter().zip(energies) {
        if w > 0.0 {
            let u = 1.0 - rng.random::<f64>();
            keyed.push((u.ln() / w, cell));
        } else {
            weightless.push(cell);
        }
    }
    keyed.sort_by(|a, b| b.0.total_cmp(&a.0));

    let mut out: Vec<usize> = keyed.iter().take(count).map(|&(_, cell)| cell).collect();
    let missing = count - out.len();
    if missing > 0 {
        out.extend(
            index::sample(rng, weightless.len(), missing)
                .into_iter()
                .map(|k| weightless[k]),
        );
    }
    Ok(out)
}

/// How the nucleation count evolves across additions.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum NucleationMode {
    /// A single addition at step 0.
    #[default]
    AtStart,
    /// `initial` nuclei at every addition.
    Constant,
    /// The count grows by `delta` after each addition, saturating at
    /// `usize::MAX`.
    Increasing,
    /// The count shrinks by `delta` after each addition, stopping at zero.
    Decreasing,
}

/// When and how many nuclei a recrystallization run adds.
///
/// An addition happens at step `i` when `i % every_steps == 0`, until
/// `additions` additions have happened.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NucleationSchedule {
    /// Evolution of the count between additions.
    pub mode: NucleationMode,
    /// Nuclei in the first addition.
    pub initial: usize,
    /// Change in count between additions (`Increasing`/`Decreasing`).
    pub delta: usize,
    /// Interval between additions, in steps.
    pub every_steps: usize,
    /// Maximum number of additions. Ignored for `AtStart`.
    pub additions: usize,
}

impl Default for NucleationSchedule {
    fn default() -> Self {
        Self {
            mode: NucleationMode::AtStart,
            initial: 10,
            delta: 5,
            every_steps: 5,
            additions: 3,
        }
    }
}

impl NucleationSchedule {
    /// A schedule that adds `count` nuclei once, before the first step.
    pub fn at_start(count: usize) -> Self {
        Self {
            mode: NucleationMode::AtStart,
            initial: count,
            ..Self::default()
        }
    }

    /// Check the schedule.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if `initial` or `every_steps` is zero.
    pub fn validate(&self) -> Result<(), GrainError> {
        sampling::require_positive(self.initial, "initial nucleation count")?;
        sampling::require_positive(self.every_steps, "nucleation interval")?;
        Ok(())
    }

    /// Effective number of additions.
    pub fn additions(&self) -> usize {
        match self.mode {
            NucleationMode::AtStart => 1,
            _ => self.additions,
        }
    }

    /// `(step, count)` pairs for a run of `steps` steps. Additions whose
    /// count has decreased to zero still consume an addition slot but are
    /// omitted.
    pub fn plan(&self, steps: usize) -> Vec<(usize, usize)> {
        let every = self.every_steps.max(1);
        let mut plan = Vec::new();
        let mut count = self.initial;
        let mut added = 0;
        for step in (0..steps).step_by(every) {
            if added >= self.additions() {
                break;
            }
            added += 1;
            if count > 0 {
                plan.push((step, count));
            }
            count = match self.mode {
                NucleationMode::AtStart | NucleationMode::Constant => count,
                NucleationMode::Increasing => count.saturating_add(self.delta),
                NucleationMode::Decreasing => count.saturating_sub(self.delta),
            };
        }
        plan
    }
}
