//! Loader configuration for echo-replay-core.

use serde::{Deserialize, Serialize};

/// Payloads at or below this many bytes are heartbeat ticks, not gameplay.
pub const DEFAULT_MIN_PAYLOAD_LEN: usize = 800;

/// Configuration for line parsing and cache diagnostics.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReplayConfig {
    /// A payload must be strictly longer than this to count as arena data.
    pub min_payload_len: usize,
    /// Emit a `warn!` for every discarded line.
    pub log_discards: bool,
}

impl Default for ReplayConfig {
    fn default() -> Self {
        Self {
            min_payload_len: DEFAULT_MIN_PAYLOAD_LEN,
            log_discards: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let cfg: ReplayConfig = serde_json::from_str(r#"{ "log_discards": false }"#).unwrap();
        assert_eq!(cfg.min_payload_len, DEFAULT_MIN_PAYLOAD_LEN);
        assert!(!cfg.log_discards);
    }
}
