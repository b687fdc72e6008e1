//! Neighbourhood kernels: fixed, ordered lists of `(dx, dy)` offsets.

use grain_core::GrainError;

/// North, south, west, east.
const VON_NEUMANN: [(i32, i32); 4] = [(0, -1), (0, 1), (-1, 0), (1, 0)];

/// The four cardinals followed by NW, NE, SW, SE.
const MOORE: [(i32, i32); 8] = [
    (0, -1),
    (0, 1),
    (-1, 0),
    (1, 0),
    (-1, -1),
    (1, -1),
    (-1, 1),
    (1, 1),
];

/// Cardinals plus the NW/SE diagonal.
const HEXAGONAL_LEFT: [(i32, i32); 6] = [(0, -1), (0, 1), (-1, 0), (1, 0), (-1, -1), (1, 1)];

/// Cardinals plus the NE/SW diagonal.
const HEXAGONAL_RIGHT: [(i32, i32); 6] = [(0, -1), (0, 1), (-1, 0), (1, 0), (1, -1), (-1, 1)];

/// A neighbourhood kernel.
///
/// Every kernel is symmetric: if `(dx, dy)` is an offset then so is
/// `(-dx, -dy)`. The neighbour relation is therefore symmetric on any grid,
/// which the Monte Carlo energy bookkeeping relies on.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Neighborhood {
    /// 4-connected orthogonal kernel.
    #[default]
    VonNeumann,
    /// 8-connected kernel including diagonals.
    Moore,
    /// 6-connected kernel with the NW/SE diagonal.
    HexagonalLeft,
    /// 6-connected kernel with the NE/SW diagonal.
    HexagonalRight,
}

impl Neighborhood {
    /// All kernels in index order.
    pub const ALL: [Neighborhood; 4] = [
        Self::VonNeumann,
        Self::Moore,
        Self::HexagonalLeft,
        Self::HexagonalRight,
    ];

    /// Select a kernel by caller-supplied index. Index 0 is the default.
    pub fn from_index(index: usize) -> Result<Self, GrainError> {
        Self::ALL.get(index).copied().ok_or_else(|| {
            GrainError::invalid(format!(
                "neighbourhood index {index} out of range, expected 0..{}",
                Self::ALL.len()
            ))
        })
    }

    /// The index that selects this kernel.
    pub fn index(self) -> usize {
        match self {
            Self::VonNeumann => 0,
            Self::Moore => 1,
            Self::HexagonalLeft => 2,
            Self::HexagonalRight => 3,
        }
    }

    /// Ordered `(dx, dy)` offsets.
    pub fn offsets(self) -> &'static [(i32, i32)] {
        match self {
            Self::VonNeumann => &VON_NEUMANN,
            Self::Moore => &MOORE,
            Self::HexagonalLeft => &HEXAGONAL_LEFT,
            Self::HexagonalRight => &HEXAGONAL_RIGHT,
        }
    }

    /// Number of offsets, i.e. the neighbour count of an interior cell.
    pub fn degree(self) -> usize {
        self.offsets().len()
    }
}
