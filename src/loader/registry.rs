//! Process-wide registry of opened FFmpeg libraries

use std::ffi::c_void;
use std::path::{Path, PathBuf};
use std::ptr::NonNull;
use std::sync::atomic::{AtomicU64, Ordering};

use once_cell::sync::Lazy;
use parking_lot::RwLock;

use super::backend::{DynamicLibrary, LibraryLoader, SystemLoader};
use super::slot::OnceSlot;
use super::{LibraryId, LoadError, LoadResult, LoaderConfig};

static GLOBAL: Lazy<Registry> = Lazy::new(Registry::from_env);

/// Locates, opens and caches FFmpeg shared libraries
///
/// Each library is opened at most once and stays open for as long as the
/// registry lives. The global registry, used by every generated wrapper, lives
/// for the whole process.
pub struct Registry {
  loader: Box<dyn LibraryLoader>,
  config: RwLock<LoaderConfig>,
  epoch: AtomicU64,
  libraries: [OnceSlot<Box<dyn DynamicLibrary>>; LibraryId::COUNT],
}

impl Registry {
  /// Registry using the system dynamic linker
  pub fn new(config: LoaderConfig) -> Self {
    Self::with_loader(SystemLoader, config)
  }

  /// Registry configured from `FFMPEG_<NAME>_PATH` and `FFMPEG_LIB_DIR`
  pub fn from_env() -> Self {
    Self::new(LoaderConfig::from_env())
  }

  pub fn with_loader(loader: impl LibraryLoader + 'static, config: LoaderConfig) -> Self {
    Self {
      loader: Box::new(loader),
      config: RwLock::new(config),
      epoch: AtomicU64::new(0),
      libraries: std::array::from_fn(|_| OnceSlot::new()),
    }
  }

  /// The registry every generated wrapper binds through
  pub fn global() -> &'static Registry {
    &GLOBAL
  }

  /// Snapshot of the current configuration
  pub fn config(&self) -> LoaderConfig {
    self.config.read().clone()
  }

  /// Configuration generation; bumped by every setter
  pub fn epoch(&self) -> u64 {
    self.epoch.load(Ordering::Acquire)
  }

  /// Use exactly `path` for `id`
  ///
  /// Must happen before the library is first used. Once a library is loaded
  /// it stays loaded, so this returns [`LoadError::AlreadyLoaded`].
  pub fn set_library_path(&self, id: LibraryId, path: impl Into<PathBuf>) -> LoadResult<()> {
    let path = path.into();
    // Serialized with any load of `id` in progress
    self.slot(id).with_init_lock(|loaded| {
      if loaded {
        return Err(LoadError::AlreadyLoaded(id));
      }
      tracing::debug!(
        target: "ffmpeg_dynload",
        library = %id,
        path = %path.display(),
        "library path override set"
      );
      self.config.write().set_library_path(id, path);
      self.epoch.fetch_add(1, Ordering::AcqRel);
      Ok(())
    })
  }

  /// Look for libraries in `dir` before the system search path
  ///
  /// Only affects libraries that are not loaded yet.
  pub fn set_library_dir(&self, dir: impl Into<PathBuf>) {
    let dir = dir.into();
    tracing::debug!(
      target: "ffmpeg_dynload",
      dir = %dir.display(),
      "library search directory set"
    );
    self.config.write().set_search_dir(dir);
    self.epoch.fetch_add(1, Ordering::AcqRel);
  }

  pub fn is_loaded(&self, id: LibraryId) -> bool {
    self.slot(id).get().is_some()
  }

  /// Path a loaded library was opened from
  pub fn loaded_path(&self, id: LibraryId) -> Option<&Path> {
    self.slot(id).get().map(|library| library.path())
  }

  /// Open `id` (and its dependencies) if needed
  pub fn library(&self, id: LibraryId) -> LoadResult<&dyn DynamicLibrary> {
    if let Some(library) = self.slot(id).get() {
      return Ok(&**library);
    }

    let epoch = self.epoch();
    self
      .slot(id)
      .get_or_try_init(epoch, || self.open(id))
      .map(|library| &**library)
  }

  /// Open several libraries up front
  pub fn preload(&self, ids: &[LibraryId]) -> LoadResult<()> {
    for id in ids {
      self.library(*id)?;
    }
    Ok(())
  }

  /// Resolve `name` in library `id`
  ///
  /// This performs a lookup every time; caching is the caller's job
  /// (see [`Symbol`](super::Symbol)).
  pub fn resolve(&self, id: LibraryId, name: &'static str) -> LoadResult<NonNull<c_void>> {
    let library = self.library(id)?;
    let address = library
      .symbol(name)
      .map_err(|reason| LoadError::SymbolNotFound {
        library: id,
        symbol: name,
        reason,
      })?;

    NonNull::new(address).ok_or_else(|| LoadError::SymbolNotFound {
      library: id,
      symbol: name,
      reason: "symbol resolved to a null address".to_string(),
    })
  }

  fn slot(&self, id: LibraryId) -> &OnceSlot<Box<dyn DynamicLibrary>> {
    &self.libraries[id as usize]
  }

  fn open(&self, id: LibraryId) -> LoadResult<Box<dyn DynamicLibrary>> {
    let mut dependency_error = None;
    for dep in id.dependencies() {
      if let Err(e) = self.library(*dep) {
        tracing::debug!(
          target: "ffmpeg_dynload",
          library = %id,
          dependency = %dep,
          error = %e,
          "dependency not loaded, trying the library anyway"
        );
        dependency_error.get_or_insert(e);
      }
    }

    let candidates = self.config.read().candidates(id);
    let mut reason = String::from("no candidate paths");

    for path in &candidates {
      tracing::debug!(
        target: "ffmpeg_dynload",
        library = %id,
        path = %path.display(),
        "trying to open library"
      );
      match self.loader.open(path) {
        Ok(library) => {
          tracing::info!(
            target: "ffmpeg_dynload",
            library = %id,
            path = %path.display(),
            "loaded FFmpeg library"
          );
          return Ok(library);
        }
        Err(e) => reason = e,
      }
    }

    tracing::debug!(target: "ffmpeg_dynload", library = %id, %reason, "failed to open library");
    match dependency_error {
      Some(source) => Err(LoadError::DependencyFailed {
        library: id,
        source: Box::new(source),
      }),
      None => Err(LoadError::LibraryNotFound {
        library: id,
        attempted: candidates,
        reason,
      }),
    }
  }
}

impl std::fmt::Debug for Registry {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    let loaded: Vec<_> = LibraryId::ALL
      .iter()
      .filter(|id| self.is_loaded(**id))
      .collect();
    f.debug_struct("Registry")
      .field("config", &*self.config.read())
      .field("epoch", &self.epoch())
      .field("loaded", &loaded)
      .finish()
  }
}

// ============================================================================
// Process-wide configuration
// ============================================================================

/// Set an explicit path for `id` on the global registry
pub fn set_library_path(id: LibraryId, path: impl Into<PathBuf>) -> LoadResult<()> {
  Registry::global().set_library_path(id, path)
}

/// Set the directory searched for default library names on the global registry
pub fn set_library_dir(dir: impl Into<PathBuf>) {
  Registry::global().set_library_dir(dir)
}

/// Open the given libraries on the global registry
pub fn preload(ids: &[LibraryId]) -> LoadResult<()> {
  Registry::global().preload(ids)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::loader::testing::FakeLoader;
  use std::sync::Barrier;
  use std::time::Duration;

  #[test]
  fn test_override_path_is_used() {
    let loader = FakeLoader::new().with_library("/custom/libavutil.so", &[]);
    let registry = Registry::with_loader(
      loader.clone(),
      LoaderConfig::new().with_library_path(LibraryId::Avutil, "/custom/libavutil.so"),
    );

    let library = registry.library(LibraryId::Avutil).unwrap();
    assert_eq!(library.path(), Path::new("/custom/libavutil.so"));
    assert_eq!(loader.open_attempts(), vec![PathBuf::from("/custom/libavutil.so")]);
  }

  #[test]
  fn test_override_set_after_construction() {
    let loader = FakeLoader::new().with_library("/late/libavutil.so", &[]);
    let registry = Registry::with_loader(loader.clone(), LoaderConfig::new());

    registry
      .set_library_path(LibraryId::Avutil, "/late/libavutil.so")
      .unwrap();
    registry.library(LibraryId::Avutil).unwrap();

    assert_eq!(loader.open_attempts(), vec![PathBuf::from("/late/libavutil.so")]);
    assert_eq!(
      registry.loaded_path(LibraryId::Avutil),
      Some(Path::new("/late/libavutil.so"))
    );
  }

  #[test]
  fn test_library_opened_once() {
    let loader = FakeLoader::new().with_library("/ff/libavutil.so", &[]);
    let registry = Registry::with_loader(
      loader.clone(),
      LoaderConfig::new().with_library_path(LibraryId::Avutil, "/ff/libavutil.so"),
    );

    for _ in 0..5 {
      registry.library(LibraryId::Avutil).unwrap();
    }
    assert_eq!(loader.open_attempts().len(), 1);
  }

  #[test]
  fn test_dependencies_open_first() {
    let loader = FakeLoader::new()
      .with_library("/ff/libavutil.so", &[])
      .with_library("/ff/libavcodec.so", &[])
      .with_library("/ff/libavformat.so", &[]);
    let config = LoaderConfig::new()
      .with_library_path(LibraryId::Avutil, "/ff/libavutil.so")
      .with_library_path(LibraryId::Avcodec, "/ff/libavcodec.so")
      .with_library_path(LibraryId::Avformat, "/ff/libavformat.so");
    let registry = Registry::with_loader(loader.clone(), config);

    registry.library(LibraryId::Avformat).unwrap();

    assert_eq!(
      loader.open_attempts(),
      vec![
        PathBuf::from("/ff/libavutil.so"),
        PathBuf::from("/ff/libavcodec.so"),
        PathBuf::from("/ff/libavformat.so"),
      ]
    );
    assert!(registry.is_loaded(LibraryId::Avutil));
    assert!(registry.is_loaded(LibraryId::Avcodec));
  }

  #[test]
  fn test_avcodec_override_loads_without_swresample() {
    let loader = FakeLoader::new()
      .with_library("/ff/libavutil.so", &[])
      .with_library("/ff/libavcodec.so", &[]);
    let config = LoaderConfig::new()
      .with_library_path(LibraryId::Avutil, "/ff/libavutil.so")
      .with_library_path(LibraryId::Avcodec, "/ff/libavcodec.so");
    let registry = Registry::with_loader(loader.clone(), config);

    let library = registry.library(LibraryId::Avcodec).unwrap();
    assert_eq!(library.path(), Path::new("/ff/libavcodec.so"));
    assert!(loader
      .open_attempts()
      .contains(&PathBuf::from("/ff/libavcodec.so")));
    assert!(!registry.is_loaded(LibraryId::Swresample));
  }

  #[test]
  fn test_missing_dependency_does_not_block_override() {
    let loader = FakeLoader::new().with_library("/ff/libswscale.so", &[]);
    let registry = Registry::with_loader(
      loader.clone(),
      LoaderConfig::new()
        .with_library_path(LibraryId::Avutil, "/nope/libavutil.so")
        .with_library_path(LibraryId::Swscale, "/ff/libswscale.so"),
    );

    let library = registry.library(LibraryId::Swscale).unwrap();
    assert_eq!(library.path(), Path::new("/ff/libswscale.so"));
    assert_eq!(
      loader.open_attempts(),
      vec![PathBuf::from("/nope/libavutil.so"), PathBuf::from("/ff/libswscale.so")]
    );
    assert!(!registry.is_loaded(LibraryId::Avutil));
  }

  #[test]
  fn test_missing_library_error_names_library_and_paths() {
    let registry = Registry::with_loader(
      FakeLoader::new(),
      LoaderConfig::new().with_library_path(LibraryId::Avutil, "/missing/libavutil.so"),
    );

    let err = registry.library(LibraryId::Avutil).err().unwrap();
    match &err {
      LoadError::LibraryNotFound {
        library, attempted, ..
      } => {
        assert_eq!(*library, LibraryId::Avutil);
        assert_eq!(attempted, &vec![PathBuf::from("/missing/libavutil.so")]);
      }
      other => panic!("unexpected error: {other:?}"),
    }
    assert!(err.to_string().contains("libavutil"));
  }

  #[test]
  fn test_dependency_failure_is_reported_when_library_also_fails() {
    let registry = Registry::with_loader(
      FakeLoader::new(),
      LoaderConfig::new()
        .with_library_path(LibraryId::Avutil, "/nope/libavutil.so")
        .with_library_path(LibraryId::Swscale, "/nope/libswscale.so"),
    );

    let err = registry.library(LibraryId::Swscale).err().unwrap();
    match &err {
      LoadError::DependencyFailed { library, source } => {
        assert_eq!(*library, LibraryId::Swscale);
        assert_eq!(source.library(), Some(LibraryId::Avutil));
      }
      other => panic!("unexpected error: {other:?}"),
    }
    assert!(!registry.is_loaded(LibraryId::Swscale));
  }

  #[test]
  fn test_corrected_override_recovers_after_failure() {
    let loader = FakeLoader::new().with_library("/good/libavutil.so", &[]);
    let registry = Registry::with_loader(
      loader.clone(),
      LoaderConfig::new().with_library_path(LibraryId::Avutil, "/bad/libavutil.so"),
    );

    assert!(registry.library(LibraryId::Avutil).is_err());
    // Same configuration: the cached failure is returned without reopening
    assert!(registry.library(LibraryId::Avutil).is_err());
    assert_eq!(loader.open_attempts().len(), 1);

    registry
      .set_library_path(LibraryId::Avutil, "/good/libavutil.so")
      .unwrap();
    let library = registry.library(LibraryId::Avutil).unwrap();
    assert_eq!(library.path(), Path::new("/good/libavutil.so"));
  }

  #[test]
  fn test_override_after_load_is_rejected() {
    let loader = FakeLoader::new().with_library("/ff/libavutil.so", &[]);
    let registry = Registry::with_loader(
      loader,
      LoaderConfig::new().with_library_path(LibraryId::Avutil, "/ff/libavutil.so"),
    );
    registry.library(LibraryId::Avutil).unwrap();

    assert_eq!(
      registry.set_library_path(LibraryId::Avutil, "/other/libavutil.so"),
      Err(LoadError::AlreadyLoaded(LibraryId::Avutil))
    );
    assert_eq!(
      registry.config().library_path(LibraryId::Avutil),
      Some(Path::new("/ff/libavutil.so"))
    );
  }

  #[test]
  fn test_resolve_missing_symbol() {
    let loader = FakeLoader::new().with_library("/ff/libavutil.so", &[]);
    let registry = Registry::with_loader(
      loader,
      LoaderConfig::new().with_library_path(LibraryId::Avutil, "/ff/libavutil.so"),
    );

    let err = registry.resolve(LibraryId::Avutil, "av_not_a_function").unwrap_err();
    assert!(matches!(
      err,
      LoadError::SymbolNotFound {
        library: LibraryId::Avutil,
        symbol: "av_not_a_function",
        ..
      }
    ));
  }

  #[test]
  fn test_null_symbol_address_is_not_found() {
    let loader = FakeLoader::new().with_library("/ff/libavutil.so", &[("av_null_symbol", 0)]);
    let registry = Registry::with_loader(
      loader,
      LoaderConfig::new().with_library_path(LibraryId::Avutil, "/ff/libavutil.so"),
    );

    match registry.resolve(LibraryId::Avutil, "av_null_symbol").unwrap_err() {
      LoadError::SymbolNotFound {
        library,
        symbol,
        reason,
      } => {
        assert_eq!(library, LibraryId::Avutil);
        assert_eq!(symbol, "av_null_symbol");
        assert!(reason.contains("null address"), "unexpected reason: {reason}");
      }
      other => panic!("unexpected error: {other:?}"),
    }
  }

  #[test]
  fn test_search_dir_candidates_tried_in_order() {
    let names = LibraryId::Avutil.default_file_names();
    let wanted = PathBuf::from("/opt/ff").join(&names[1]);
    let loader = FakeLoader::new().with_library(wanted.clone(), &[]);
    let registry = Registry::with_loader(
      loader.clone(),
      LoaderConfig::new().with_search_dir("/opt/ff"),
    );

    registry.library(LibraryId::Avutil).unwrap();
    assert_eq!(
      loader.open_attempts(),
      vec![PathBuf::from("/opt/ff").join(&names[0]), wanted]
    );
  }

  #[test]
  fn test_search_dir_set_after_failure_recovers() {
    let wanted = Path::new("/opt/ff").join(&LibraryId::Avutil.default_file_names()[0]);
    let loader = FakeLoader::new().with_library(wanted.clone(), &[]);
    let registry = Registry::with_loader(loader.clone(), LoaderConfig::new());

    let err = registry.library(LibraryId::Avutil).err().unwrap();
    assert!(matches!(err, LoadError::LibraryNotFound { .. }));
    // Cached until the configuration changes
    let attempts = loader.open_attempts().len();
    assert!(registry.library(LibraryId::Avutil).is_err());
    assert_eq!(loader.open_attempts().len(), attempts);

    let epoch = registry.epoch();
    registry.set_library_dir("/opt/ff");
    assert!(registry.epoch() > epoch);

    let library = registry.library(LibraryId::Avutil).unwrap();
    assert_eq!(library.path(), wanted.as_path());
    assert_eq!(registry.loaded_path(LibraryId::Avutil), Some(wanted.as_path()));
  }

  #[test]
  fn test_override_during_load_is_rejected() {
    let loader = FakeLoader::new()
      .with_library("/ff/libavutil.so", &[])
      .with_open_delay(Duration::from_millis(100));
    let registry = Registry::with_loader(
      loader.clone(),
      LoaderConfig::new().with_library_path(LibraryId::Avutil, "/ff/libavutil.so"),
    );
    let barrier = Barrier::new(2);

    let (loaded, overridden) = crossbeam::thread::scope(|scope| {
      let loading = scope.spawn(|_| {
        barrier.wait();
        registry.library(LibraryId::Avutil).map(|library| library.path().to_path_buf())
      });
      let overriding = scope.spawn(|_| {
        barrier.wait();
        // The open above is recorded before it sleeps
        while loader.open_attempts().is_empty() {
          std::thread::yield_now();
        }
        registry.set_library_path(LibraryId::Avutil, "/other/libavutil.so")
      });
      (loading.join().unwrap(), overriding.join().unwrap())
    })
    .unwrap();

    assert_eq!(loaded.unwrap(), PathBuf::from("/ff/libavutil.so"));
    assert_eq!(overridden, Err(LoadError::AlreadyLoaded(LibraryId::Avutil)));
    assert_eq!(
      registry.config().library_path(LibraryId::Avutil),
      registry.loaded_path(LibraryId::Avutil)
    );
  }
}
