//! Playback cursor over a [`Game`].
//!
//! Model:
//! - The cursor remembers the index `i` of the segment `[frame(i), frame(i+1)]`
//!   it last sampled.
//! - `sample(at)` rewinds while `frame(i).timestamp > at`, advances while
//!   `frame(i+1).timestamp <= at`, then blends the pair.
//! - Monotonic playback touches one or two frames per call.

use chrono::NaiveDateTime;

use crate::blend::blend;
use crate::cache::Game;
use crate::error::ReplayError;
use crate::model::Snapshot;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Playhead {
    index: usize,
}

fn stamp(game: &mut Game, index: usize) -> Result<Option<NaiveDateTime>, ReplayError> {
    match game.get_frame(index) {
        Ok(frame) => Ok(Some(frame.timestamp)),
        Err(ReplayError::FrameOutOfRange { .. }) => Ok(None),
        Err(e) => Err(e),
    }
}

impl Playhead {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index of the left frame of the current segment.
    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }

    #[inline]
    pub fn rewind(&mut self) {
        self.index = 0;
    }

    /// Snapshot of the replay at `at`, clamped to the first and last frames.
    pub fn sample(&mut self, game: &mut Game, at: NaiveDateTime) -> Result<Snapshot, ReplayError> {
        // Settle on a valid frame; discards may have shrunk the replay.
        while stamp(game, self.index)?.is_none() {
            self.index = game.frame_count().saturating_sub(1);
        }

        while self.index > 0 {
            match stamp(game, self.index)? {
                Some(ts) if ts > at => self.index -= 1,
                Some(_) => break,
                None => self.index = game.frame_count().saturating_sub(1),
            }
        }

        loop {
            let (current, next) = game.get_frame_pair(self.index)?;
            match next {
                Some(next) if next.timestamp <= at => self.index += 1,
                Some(next) => return Ok(blend(current, next, at)),
                None => return Ok(current.clone()),
            }
        }
    }
}
