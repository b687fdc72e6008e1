//! Inclusion footprints.

/// Shape of an inclusion stamped onto the grid.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum InclusionShape {
    /// Euclidean disk: `dx² + dy² <= r²`.
    #[default]
    Circle,
    /// Chebyshev square: `max(|dx|, |dy|) <= r`.
    Square,
}

impl InclusionShape {
    /// Whether the offset `(dx, dy)` from the centre lies inside a shape of
    /// the given radius.
    pub fn covers(self, dx: i64, dy: i64, radius: u32) -> bool {
        let r = i64::from(radius);
        match self {
            Self::Circle => dx * dx + dy * dy <= r * r,
            Self::Square => dx.abs().max(dy.abs()) <= r,
        }
    }
}
