//! echo-replay-core: replay log ingestion and snapshot interpolation.
//!
//! A recorded match is a sequence of tab-delimited lines `timestamp \t json`.
//! [`Game`] owns the raw lines and materializes [`Snapshot`]s lazily, discarding
//! lines that fail to parse. [`blend_frames`] synthesizes a snapshot between two
//! recorded ones; [`Playhead`] drives both for monotonic playback.

pub mod blend;
pub mod cache;
pub mod config;
pub mod error;
pub mod ids;
pub mod model;
pub mod parse;
pub mod playback;
pub mod transform;
pub mod vec3;

// Re-exports for consumers (playback drivers, renderers)
pub use blend::{blend, blend_frames, blend_ratio, Blend};
pub use cache::Game;
pub use config::ReplayConfig;
pub use error::ReplayError;
pub use ids::LineId;
pub use model::{
    DiscState, LastScore, Playspace, PlayerState, Snapshot, Stats, TeamColor, TeamState,
};
pub use parse::{normalize_timestamp, parse_line, parse_timestamp};
pub use playback::Playhead;
pub use transform::{resolve_transform, Transform};
pub use vec3::Vec3;
