//! Locating and binding a backend module.
//!
//! Candidates are tried in order. A candidate counts only if it opens and
//! exports every entry point in the ABI table; a module with some symbols
//! missing is skipped, never used partially. Not finding any module is an
//! ordinary outcome and is reported as `BindError::NotFound`.

use std::env;
use std::fmt;
use std::path::{Path, PathBuf};

use libloading::{Library, Symbol};
use log::{debug, info, warn};

use super::abi::{self, EntryPoints};
use crate::error::{BindError, ProbeError};

/// Base name of the backend module.
pub const MODULE_NAME: &str = "nogba";

/// Windows-style module file name.
pub const WINDOWS_FILE_NAME: &str = "nogba.dll";

/// Unix-style module file name.
pub const UNIX_FILE_NAME: &str = "libnogba.so";

/// Default search order.
///
/// 1. The platform's own file name, resolved by the system loader.
/// 2. The Windows-style name next to the running executable.
/// 3. The Unix-style name next to the running executable.
#[must_use]
pub fn default_candidates() -> Vec<PathBuf> {
    let mut candidates = vec![PathBuf::from(libloading::library_filename(MODULE_NAME))];
    if let Some(dir) = env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
    {
        candidates.push(dir.join(WINDOWS_FILE_NAME));
        candidates.push(dir.join(UNIX_FILE_NAME));
    }
    candidates
}

/// A bound backend module.
///
/// Holds the library open for as long as the entry points are in use.
/// Only one module should be live per process; replacing the backend
/// means dropping the core that owns this and binding again.
pub struct NativeModule {
    entry: EntryPoints,
    origin: Option<PathBuf>,
    _library: Option<Library>,
}

impl NativeModule {
    /// Wrap entry points that are already resident in the process, such as
    /// a statically linked backend.
    ///
    /// # Safety
    ///
    /// Each function must honour the ABI table: register reads write
    /// exactly 17 words, framebuffer reads exactly 256x192 halfwords, and
    /// `load_program` only reads its argument up to the NUL terminator.
    #[must_use]
    pub unsafe fn from_entry_points(entry: EntryPoints) -> Self {
        Self {
            entry,
            origin: None,
            _library: None,
        }
    }

    pub(crate) fn entry_points(&self) -> EntryPoints {
        self.entry
    }

    /// File the module was loaded from, if it came from disk.
    #[must_use]
    pub fn origin(&self) -> Option<&Path> {
        self.origin.as_deref()
    }
}

impl fmt::Debug for NativeModule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NativeModule")
            .field("origin", &self.origin)
            .finish_non_exhaustive()
    }
}

fn resolve<T: Copy>(library: &Library, symbol: &'static str) -> Result<T, ProbeError> {
    // SAFETY: `T` is the function pointer type the ABI table gives for
    // `symbol`.
    let sym: Symbol<T> = unsafe { library.get(symbol.as_bytes()) }
        .map_err(|source| ProbeError::MissingEntryPoint { symbol, source })?;
    Ok(*sym)
}

fn resolve_all(library: &Library) -> Result<EntryPoints, ProbeError> {
    Ok(EntryPoints {
        init: resolve(library, abi::SYM_INIT)?,
        reset: resolve(library, abi::SYM_RESET)?,
        load_program: resolve(library, abi::SYM_LOAD_PROGRAM)?,
        step_frame: resolve(library, abi::SYM_STEP_FRAME)?,
        read_arm9_registers: resolve(library, abi::SYM_ARM9_REGISTERS)?,
        read_arm7_registers: resolve(library, abi::SYM_ARM7_REGISTERS)?,
        read_top_framebuffer: resolve(library, abi::SYM_TOP_FRAMEBUFFER)?,
        read_bottom_framebuffer: resolve(library, abi::SYM_BOTTOM_FRAMEBUFFER)?,
    })
}

/// Open one candidate and resolve the whole ABI.
pub fn probe(path: &Path) -> Result<NativeModule, ProbeError> {
    // SAFETY: loading runs the module's initialisers. Backend modules are
    // trusted native code by contract.
    let library = unsafe { Library::new(path) }.map_err(ProbeError::Open)?;
    let entry = resolve_all(&library)?;
    Ok(NativeModule {
        entry,
        origin: Some(path.to_path_buf()),
        _library: Some(library),
    })
}

/// Bind the first usable candidate.
pub fn bind(candidates: &[PathBuf]) -> Result<NativeModule, BindError> {
    for path in candidates {
        match probe(path) {
            Ok(module) => {
                info!(
                    "bound native backend {} (ABI v{})",
                    path.display(),
                    abi::ABI_VERSION
                );
                return Ok(module);
            }
            Err(e @ ProbeError::MissingEntryPoint { .. }) => {
                warn!("skipping {}: {e}", path.display());
            }
            Err(e) => {
                debug!("no backend at {}: {e}", path.display());
            }
        }
    }
    warn!("native backend library not found, falling back to synthetic core");
    Err(BindError::NotFound {
        candidates: candidates.to_vec(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_candidates_cover_both_conventions() {
        let candidates = default_candidates();
        assert_eq!(
            candidates[0],
            PathBuf::from(libloading::library_filename(MODULE_NAME))
        );
        assert!(candidates.iter().any(|p| p.ends_with(WINDOWS_FILE_NAME)));
        assert!(candidates.iter().any(|p| p.ends_with(UNIX_FILE_NAME)));
    }

    #[test]
    fn missing_module_is_not_found() {
        let candidates = vec![
            PathBuf::from("/nonexistent/emu-nds/libnogba.so"),
            PathBuf::from("/nonexistent/emu-nds/nogba.dll"),
        ];
        match bind(&candidates) {
            Err(BindError::NotFound { candidates: tried }) => assert_eq!(tried, candidates),
            Ok(_) => panic!("bound a module that does not exist"),
        }
    }

    #[test]
    fn empty_candidate_list_is_not_found() {
        assert!(matches!(bind(&[]), Err(BindError::NotFound { .. })));
    }

    #[test]
    fn probe_reports_open_failure() {
        let result = probe(Path::new("/nonexistent/emu-nds/libnogba.so"));
        assert!(matches!(result, Err(ProbeError::Open(_))));
    }

    #[cfg(all(target_os = "linux", target_env = "gnu"))]
    #[test]
    fn library_without_abi_is_rejected() {
        // libc opens fine but exports none of the backend symbols.
        match probe(Path::new("libc.so.6")) {
            Err(ProbeError::MissingEntryPoint { symbol, .. }) => {
                assert_eq!(symbol, abi::SYM_INIT);
            }
            other => panic!("unexpected probe result: {other:?}"),
        }
    }
}
