//! Distinct uniform sampling shared by grain seeding and nucleation.

use grain_core::{Cell, GrainError, GrainId};
use grain_space::Grid;
use rand::seq::index;
use rand::Rng;

/// Reject a zero count before anything is touched.
pub(crate) fn require_positive(count: usize, what: &str) -> Result<(), GrainError> {
    if count == 0 {
        return Err(GrainError::invalid(format!("{what} must be >= 1")));
    }
    Ok(())
}

/// Fail with `InsufficientSpace` unless `available >= requested`.
pub(crate) fn require_space(requested: usize, available: usize) -> Result<(), GrainError> {
    if available < requested {
        return Err(GrainError::InsufficientSpace {
            requested,
            available,
        });
    }
    Ok(())
}

/// Pick `count` distinct entries of `candidates` uniformly without
/// replacement.
pub(crate) fn sample_distinct<R: Rng + ?Sized>(
    rng: &mut R,
    candidates: &[usize],
    count: usize,
) -> Result<Vec<usize>, GrainError> {
    require_space(count, candidates.len())?;
    Ok(index::sample(rng, candidates.len(), count)
        .into_iter()
        .map(|k| candidates[k])
        .collect())
}

/// Indices of every empty cell, in row-major order.
pub(crate) fn empty_cells(grid: &Grid) -> Vec<usize> {
    grid.cells()
        .iter()
        .enumerate()
        .filter(|(_, c)| c.state.is_empty())
        .map(|(i, _)| i)
        .collect()
}

/// Turn `count` randomly chosen empty cells into new single-cell grains.
pub(crate) fn seed_grains<R: Rng + ?Sized>(
    grid: &mut Grid,
    rng: &mut R,
    count: usize,
) -> Result<Vec<GrainId>, GrainError> {
    require_positive(count, "grain count")?;
    let empty = empty_cells(grid);
    let picked = sample_distinct(rng, &empty, count)?;
    let mut ids = Vec::with_capacity(picked.len());
    for i in picked {
        let id = grid.allocate_grain_id();
        grid.cells_mut()[i] = Cell::grain(id);
        ids.push(id);
    }
    Ok(ids)
}

#[cfg(test)]
mod tests {
    use super::*;
    use grain_test_utils::seeded_rng;

    #[test]
    fn sample_distinct_returns_unique_candidates() {
        let mut rng = seeded_rng(1);
        let candidates: Vec<usize> = (100..120).collect();
        let mut picked = sample_distinct(&mut rng, &candidates, 20).unwrap();
        picked.sort_unstable();
        assert_eq!(picked, candidates);
    }

    #[test]
    fn sample_distinct_rejects_overdraw() {
        let mut rng = seeded_rng(1);
        assert_eq!(
            sample_distinct(&mut rng, &[1, 2], 3),
            Err(GrainError::InsufficientSpace {
                requested: 3,
                available: 2
            })
        );
    }

    #[test]
    fn zero_count_is_invalid() {
        assert!(matches!(
            require_positive(0, "grain count"),
            Err(GrainError::InvalidArgument { .. })
        ));
    }
}
