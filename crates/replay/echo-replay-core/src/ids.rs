//! Stable identifiers for raw replay lines.

use serde::{Deserialize, Serialize};

/// Zero-based line number a raw line had when the replay was loaded.
///
/// Positional frame indices shift down when a line is discarded; a `LineId`
/// never changes, so collaborators can detect renumbering.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
pub struct LineId(pub u32);

/// Monotonic allocator handing out `LineId`s in load order.
#[derive(Default, Debug)]
pub struct LineIdAllocator {
    next: u32,
}

impl LineIdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn alloc(&mut self) -> LineId {
        let id = LineId(self.next);
        self.next = self.next.wrapping_add(1);
        id
    }
}
