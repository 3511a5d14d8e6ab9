//! Host configuration.

use std::path::PathBuf;
use std::time::Duration;

/// Host tick cadence (~60 frames per second).
pub const FRAME_INTERVAL: Duration = Duration::from_millis(16);

/// Configuration for selecting and driving a core.
#[derive(Debug, Clone)]
pub struct NdsConfig {
    /// Backend modules tried before the default search order.
    pub backend_paths: Vec<PathBuf>,
    /// Skip native binding and use the synthetic core.
    pub force_synthetic: bool,
    /// Seed for synthetic register data. `None` seeds from the OS.
    pub seed: Option<u64>,
    /// Program image loaded at startup.
    pub program: Option<PathBuf>,
    /// Delay between host ticks when pacing in real time.
    pub frame_interval: Duration,
}

impl Default for NdsConfig {
    fn default() -> Self {
        Self {
            backend_paths: Vec::new(),
            force_synthetic: false,
            seed: None,
            program: None,
            frame_interval: FRAME_INTERVAL,
        }
    }
}
