//! Test utilities and fixtures for grain development.
//!
//! Provides an ASCII grid builder for compact scenario setup, a seeded
//! generator constructor, and the invariant measures that property tests
//! assert on (boundary mismatch, total stored energy, grain id sets).

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

use std::collections::BTreeSet;

use grain_core::{Cell, CellState, GrainId};
use grain_space::{Grid, Neighborhood};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// A deterministic generator for tests.
pub fn seeded_rng(seed: u64) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(seed)
}

/// Build a grid from rows of characters.
///
/// - `.` empty
/// - `#` inclusion
/// - `1`..`9` grain ids 1 to 9
/// - `a`..`z` grain ids 10 to 35
///
/// Leading and trailing whitespace on each row is ignored, blank rows are
/// skipped. Panics on ragged rows or unknown characters.
pub fn grid_from_ascii(text: &str, periodic: bool) -> Grid {
    let rows: Vec<&str> = text
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();
    assert!(!rows.is_empty(), "ascii grid has no rows");
    let width = rows[0].chars().count();
    let mut grid = Grid::new(width as u32, rows.len() as u32, periodic).unwrap();
    for (y, row) in rows.iter().enumerate() {
        assert_eq!(row.chars().count(), width, "ragged row {y}: {row:?}");
        for (x, ch) in row.chars().enumerate() {
            let cell = match ch {
                '.' => Cell::EMPTY,
                '#' => Cell::INCLUSION,
                '1'..='9' => Cell::grain(GrainId(u64::from(ch as u8 - b'0'))),
                'a'..='z' => Cell::grain(GrainId(u64::from(ch as u8 - b'a') + 10)),
                other => panic!("unknown ascii cell {other:?}"),
            };
            grid.set_cell(x as u32, y as u32, cell).unwrap();
        }
    }
    grid
}

/// Render a grid in the [`grid_from_ascii`] alphabet. Ids above 35 render
/// as `?`.
pub fn to_ascii(grid: &Grid) -> String {
    let mut out = String::new();
    for (i, cell) in grid.cells().iter().enumerate() {
        if i > 0 && i % grid.width() as usize == 0 {
            out.push('\n');
        }
        out.push(match cell.state {
            CellState::Empty => '.',
            CellState::Inclusion => '#',
            CellState::Grain(GrainId(id @ 1..=9)) => (b'0' + id as u8) as char,
            CellState::Grain(GrainId(id @ 10..=35)) => (b'a' + (id - 10) as u8) as char,
            CellState::Grain(_) => '?',
        });
    }
    out
}

/// Sum over every cell of the neighbours (kernel order, with multiplicity)
/// whose state differs from the cell's own. Each mismatched pair counts
/// twice, once from each side.
pub fn total_mismatch(grid: &Grid, kernel: Neighborhood) -> usize {
    let cells = grid.cells();
    (0..grid.cell_count())
        .map(|i| {
            grid.neighbour_indices(i, kernel)
                .iter()
                .filter(|&&n| cells[n].state != cells[i].state)
                .count()
        })
        .sum()
}

/// Total stored energy across the grid.
pub fn total_energy(grid: &Grid) -> f64 {
    grid.cells().iter().map(|c| c.stored_energy).sum()
}

/// Distinct grain ids present on the grid.
pub fn grain_ids(grid: &Grid) -> BTreeSet<GrainId> {
    grid.cells().iter().filter_map(Cell::grain_id).collect()
}

/// Cells that are neither inclusions nor recrystallized.
pub fn unrecrystallized_count(grid: &Grid) -> usize {
    grid.cells()
        .iter()
        .filter(|c| !c.is_inclusion() && !c.recrystallized)
        .count()
}
