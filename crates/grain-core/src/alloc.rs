//! Grain id allocation.

use crate::error::GrainError;
use crate::id::GrainId;

/// Issues strictly increasing grain ids for the lifetime of one grid.
///
/// Ids are never reused, even after the grain that carried one is
/// deleted. [`observe`](Self::observe) keeps the counter ahead of ids that
/// were written to the grid directly.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GrainIdAllocator {
    next: u64,
}

impl GrainIdAllocator {
    /// A fresh allocator whose first id is [`GrainId::FIRST`].
    pub fn new() -> Self {
        Self {
            next: GrainId::FIRST.0,
        }
    }

    /// Issue the next id.
    pub fn allocate(&mut self) -> GrainId {
        let id = GrainId(self.next);
        self.next += 1;
        id
    }

    /// Record an id that entered the grid without going through
    /// [`allocate`](Self::allocate), so it is never issued again.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` for ids above [`GrainId::MAX`]; the
    /// counter is left unchanged.
    pub fn observe(&mut self, id: GrainId) -> Result<(), GrainError> {
        if id > GrainId::MAX {
            return Err(GrainError::invalid(format!(
                "grain id {id} exceeds the maximum {}",
                GrainId::MAX
            )));
        }
        if id.0 >= self.next {
            self.next = id.0 + 1;
        }
        Ok(())
    }

    /// The id the next call to [`allocate`](Self::allocate) will return.
    pub fn peek(&self) -> GrainId {
        GrainId(self.next)
    }

    /// Highest id issued or observed so far, `None` if nothing was issued.
    pub fn last_issued(&self) -> Option<GrainId> {
        (self.next > GrainId::FIRST.0).then(|| GrainId(self.next - 1))
    }
}

impl Default for GrainIdAllocator {
    fn default() -> Self {
        Self::new()
    }
}
