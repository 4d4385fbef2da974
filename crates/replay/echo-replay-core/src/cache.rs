//! Frame cache: raw replay lines with lazily materialized snapshots.
//!
//! `Game` owns the raw lines and a parallel sequence of snapshot slots. A slot
//! is filled on first access and never changes afterwards. A line that fails to
//! parse is discarded: it and its slot are removed, every later index shifts
//! down by one, and the lookup retries at the same index.
//!
//! Indices are therefore only stable between calls that cannot discard. Each
//! slot also carries the [`LineId`] its line had at load time, which never
//! changes.
//!
//! `Game` is single-owner: every mutating lookup takes `&mut self`.

use std::io::BufRead;

use chrono::NaiveDateTime;
use tracing::{debug, error, warn};

use crate::config::ReplayConfig;
use crate::error::ReplayError;
use crate::ids::{LineId, LineIdAllocator};
use crate::model::Snapshot;
use crate::parse::parse_line;

/// A loaded replay.
#[derive(Debug)]
pub struct Game {
    cfg: ReplayConfig,
    raw_lines: Vec<String>,
    frames: Vec<Option<Snapshot>>,
    line_ids: Vec<LineId>,
}

impl Game {
    /// Build a game from an ordered sequence of raw lines with the default config.
    pub fn load<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::with_config(lines, ReplayConfig::default())
    }

    /// Build a game from an ordered sequence of raw lines.
    pub fn with_config<I, S>(lines: I, cfg: ReplayConfig) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let raw_lines: Vec<String> = lines.into_iter().map(Into::into).collect();
        let mut ids = LineIdAllocator::new();
        let line_ids = raw_lines.iter().map(|_| ids.alloc()).collect();
        let frames = vec![None; raw_lines.len()];
        debug!(lines = raw_lines.len(), "loaded replay lines");
        Self {
            cfg,
            raw_lines,
            frames,
            line_ids,
        }
    }

    /// Split buffered replay text into lines (`\n`, optional trailing `\r`).
    pub fn from_str_lines(text: &str) -> Self {
        Self::load(text.lines())
    }

    /// Read every line of a buffered reader.
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self, ReplayError> {
        Self::from_reader_with_config(reader, ReplayConfig::default())
    }

    pub fn from_reader_with_config<R: BufRead>(
        reader: R,
        cfg: ReplayConfig,
    ) -> Result<Self, ReplayError> {
        let lines = reader.lines().collect::<Result<Vec<_>, _>>()?;
        Ok(Self::with_config(lines, cfg))
    }

    #[inline]
    pub fn config(&self) -> &ReplayConfig {
        &self.cfg
    }

    /// Number of lines not yet discarded.
    #[inline]
    pub fn frame_count(&self) -> usize {
        self.raw_lines.len()
    }

    /// Number of slots already materialized.
    pub fn cached_count(&self) -> usize {
        self.frames.iter().filter(|f| f.is_some()).count()
    }

    /// Load-time line number of the frame currently at `index`.
    #[inline]
    pub fn line_id(&self, index: usize) -> Option<LineId> {
        self.line_ids.get(index).copied()
    }

    /// Raw text of the line currently at `index`.
    #[inline]
    pub fn raw_line(&self, index: usize) -> Option<&str> {
        self.raw_lines.get(index).map(String::as_str)
    }

    /// Snapshot at `index` if it has already been materialized.
    #[inline]
    pub fn cached_frame(&self, index: usize) -> Option<&Snapshot> {
        self.frames.get(index).and_then(Option::as_ref)
    }

    /// Snapshot at `index`, parsing it on first access.
    ///
    /// Lines that fail to parse are discarded until one at `index` succeeds.
    /// Fails with `NoValidFrames` when every line is gone, or
    /// `FrameOutOfRange` when discards leave `index` past the end.
    pub fn get_frame(&mut self, index: usize) -> Result<&Snapshot, ReplayError> {
        self.materialize(index)?;
        self.frames[index].as_ref().ok_or(ReplayError::FrameOutOfRange {
            index,
            count: self.raw_lines.len(),
        })
    }

    /// Frames at `index` and `index + 1`, the pair a playback driver blends.
    /// The second is `None` at the end of the replay.
    pub fn get_frame_pair(
        &mut self,
        index: usize,
    ) -> Result<(&Snapshot, Option<&Snapshot>), ReplayError> {
        self.materialize(index)?;
        // Discards at index + 1 only shift later slots, so `index` stays put.
        let has_next = match self.materialize(index + 1) {
            Ok(()) => true,
            Err(ReplayError::FrameOutOfRange { .. }) => false,
            Err(e) => return Err(e),
        };
        let current = self.frames[index].as_ref().ok_or(ReplayError::FrameOutOfRange {
            index,
            count: self.raw_lines.len(),
        })?;
        let next = if has_next {
            self.frames[index + 1].as_ref()
        } else {
            None
        };
        Ok((current, next))
    }

    /// Parse every remaining line, returning the number of surviving frames.
    pub fn materialize_all(&mut self) -> Result<usize, ReplayError> {
        let mut index = 0;
        while index < self.raw_lines.len() {
            match self.materialize(index) {
                Ok(()) => index += 1,
                Err(ReplayError::FrameOutOfRange { .. }) => break,
                Err(e) => return Err(e),
            }
        }
        if self.raw_lines.is_empty() {
            return Err(ReplayError::NoValidFrames);
        }
        Ok(self.raw_lines.len())
    }

    /// Timestamp of the first valid frame.
    pub fn first_timestamp(&mut self) -> Result<NaiveDateTime, ReplayError> {
        self.get_frame(0).map(|f| f.timestamp)
    }

    /// Timestamp of the last valid frame.
    pub fn last_timestamp(&mut self) -> Result<NaiveDateTime, ReplayError> {
        loop {
            let Some(last) = self.raw_lines.len().checked_sub(1) else {
                return Err(ReplayError::NoValidFrames);
            };
            match self.materialize(last) {
                Ok(()) => return self.get_frame(last).map(|f| f.timestamp),
                // The last line was discarded; try the new last one.
                Err(ReplayError::FrameOutOfRange { .. }) => continue,
                Err(e) => return Err(e),
            }
        }
    }

    /// Ensure slot `index` is populated, discarding failed lines in place.
    fn materialize(&mut self, index: usize) -> Result<(), ReplayError> {
        while index < self.raw_lines.len() {
            if self.frames[index].is_some() {
                return Ok(());
            }
            match parse_line(&self.raw_lines[index], &self.cfg) {
                Ok(snapshot) => {
                    self.frames[index] = Some(snapshot);
                    return Ok(());
                }
                Err(e) if e.is_line_level() => self.discard(index, &e),
                Err(e) => return Err(e),
            }
        }

        if self.raw_lines.is_empty() {
            error!("replay contains no valid arena frames");
            Err(ReplayError::NoValidFrames)
        } else {
            Err(ReplayError::FrameOutOfRange {
                index,
                count: self.raw_lines.len(),
            })
        }
    }

    fn discard(&mut self, index: usize, reason: &ReplayError) {
        let line = self.line_ids.remove(index);
        self.raw_lines.remove(index);
        self.frames.remove(index);
        if self.cfg.log_discards {
            warn!(index, line = line.0, error = %reason, "discarded frame");
        }
    }
}
