//! Spatial edge (boundary) behavior for the lattice.

/// How the grid treats neighbours that fall off an edge.
///
/// # Examples
///
/// ```
/// use grain_space::{EdgeBehavior, Grid, Neighborhood};
///
/// // Absorb: corner has 2 neighbours, interior has 4.
/// let absorb = Grid::with_edge(4, 4, EdgeBehavior::Absorb).unwrap();
/// assert_eq!(absorb.neighbours_of(0, 0, Neighborhood::VonNeumann).unwrap().len(), 2);
/// assert_eq!(absorb.neighbours_of(1, 1, Neighborhood::VonNeumann).unwrap().len(), 4);
///
/// // Wrap: every cell has exactly 4 neighbours (torus).
/// let wrap = Grid::with_edge(4, 4, EdgeBehavior::Wrap).unwrap();
/// assert_eq!(wrap.neighbours_of(0, 0, Neighborhood::VonNeumann).unwrap().len(), 4);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum EdgeBehavior {
    /// Out-of-bounds neighbour wraps to the opposite side (periodic).
    Wrap,
    /// Out-of-bounds neighbour is omitted (fewer neighbours at edges).
    #[default]
    Absorb,
}

impl EdgeBehavior {
    /// `Wrap` when `periodic`, otherwise `Absorb`.
    pub fn from_periodic(periodic: bool) -> Self {
        if periodic {
            Self::Wrap
        } else {
            Self::Absorb
        }
    }

    /// True for [`EdgeBehavior::Wrap`].
    pub fn is_periodic(self) -> bool {
        matches!(self, Self::Wrap)
    }

    /// Resolve a single axis value against an axis of length `len`.
    /// Returns `None` for an out-of-bounds value under `Absorb`.
    pub fn resolve_axis(self, val: i64, len: u32) -> Option<u32> {
        let n = i64::from(len);
        if (0..n).contains(&val) {
            return Some(val as u32);
        }
        match self {
            Self::Absorb => None,
            Self::Wrap => Some(val.rem_euclid(n) as u32),
        }
    }
}
