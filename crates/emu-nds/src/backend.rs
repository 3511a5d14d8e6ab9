//! Startup backend selection.
//!
//! The backend is chosen once: a bound and initialized native module if
//! one is available, the synthetic core otherwise. Either way the host
//! gets a working core.

use std::path::{Path, PathBuf};

use emu_core::{Observable, Value};
use log::{error, info};

use crate::config::NdsConfig;
use crate::emulator::{EmulatorCore, QUERY_PATHS};
use crate::error::CoreError;
use crate::frame::FrameState;
use crate::native::{self, NativeCore, NativeModule};
use crate::synthetic::SyntheticCore;

/// The active core.
#[derive(Debug)]
pub enum Backend {
    Synthetic(SyntheticCore),
    Native(NativeCore),
}

impl Backend {
    /// Pick a backend according to `config`.
    ///
    /// Never fails: a missing module or a failed initialization both fall
    /// back to the synthetic core.
    #[must_use]
    pub fn select(config: &NdsConfig) -> Self {
        if config.force_synthetic {
            info!("native backend disabled, using synthetic core");
            return Self::synthetic(config.seed);
        }
        let mut candidates = config.backend_paths.clone();
        candidates.extend(native::default_candidates());
        Self::select_from(&candidates, config.seed)
    }

    /// Bind the first usable module among `candidates`, or fall back.
    #[must_use]
    pub fn select_from(candidates: &[PathBuf], seed: Option<u64>) -> Self {
        match native::bind(candidates) {
            Ok(module) => Self::from_module(module, seed),
            Err(_) => Self::synthetic(seed),
        }
    }

    /// Wrap an already bound module, falling back if it fails to initialize.
    #[must_use]
    pub fn from_module(module: NativeModule, seed: Option<u64>) -> Self {
        match Self::try_native(module) {
            Ok(backend) => backend,
            Err(e) => {
                error!("{e}; falling back to synthetic core");
                Self::synthetic(seed)
            }
        }
    }

    /// Wrap an already bound module, reporting initialization failure.
    pub fn try_native(module: NativeModule) -> Result<Self, CoreError> {
        let core = NativeCore::new(module)?;
        info!("native backend core loaded");
        Ok(Self::Native(core))
    }

    /// Synthetic backend, seeded when `seed` is given.
    #[must_use]
    pub fn synthetic(seed: Option<u64>) -> Self {
        Self::Synthetic(seed.map_or_else(SyntheticCore::new, SyntheticCore::seeded))
    }

    /// Short human-readable backend name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Synthetic(_) => "synthetic",
            Self::Native(_) => "native",
        }
    }

    #[must_use]
    pub fn is_native(&self) -> bool {
        matches!(self, Self::Native(_))
    }

    fn core(&self) -> &dyn EmulatorCore {
        match self {
            Self::Synthetic(core) => core,
            Self::Native(core) => core,
        }
    }

    fn core_mut(&mut self) -> &mut dyn EmulatorCore {
        match self {
            Self::Synthetic(core) => core,
            Self::Native(core) => core,
        }
    }
}

impl EmulatorCore for Backend {
    fn load_program(&mut self, path: &Path) -> Result<(), CoreError> {
        self.core_mut().load_program(path)
    }

    fn reset(&mut self) {
        self.core_mut().reset();
    }

    fn step_frame(&mut self) {
        self.core_mut().step_frame();
    }

    fn state(&self) -> &FrameState {
        self.core().state()
    }
}

impl Observable for Backend {
    fn query(&self, path: &str) -> Option<Value> {
        match path {
            "backend" => Some(self.name().into()),
            _ => self.state().query(path),
        }
    }

    fn query_paths(&self) -> &'static [&'static str] {
        QUERY_PATHS
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forced_synthetic() {
        let config = NdsConfig {
            force_synthetic: true,
            ..NdsConfig::default()
        };
        let backend = Backend::select(&config);
        assert_eq!(backend.name(), "synthetic");
        assert!(!backend.is_native());
    }

    #[test]
    fn missing_module_falls_back() {
        let candidates = [
            PathBuf::from("/nonexistent/emu-nds/libnogba.so"),
            PathBuf::from("/nonexistent/emu-nds/nogba.dll"),
        ];
        let mut backend = Backend::select_from(&candidates, Some(3));
        assert_eq!(backend.name(), "synthetic");
        assert!(!backend.is_native());
        backend.step_frame();
        assert_eq!(backend.frame_counter(), 1);
    }

    #[test]
    fn no_candidates_falls_back() {
        let backend = Backend::select_from(&[], None);
        assert_eq!(backend.name(), "synthetic");
    }

    #[test]
    fn backend_query() {
        let backend = Backend::synthetic(Some(1));
        assert_eq!(backend.query("backend"), Some(Value::from("synthetic")));
        assert_eq!(backend.query("frame_count"), Some(Value::U64(0)));
        for path in backend.query_paths() {
            if !path.contains('<') {
                assert!(backend.query(path).is_some() || *path == "program", "{path}");
            }
        }
    }
}
