//! In-memory loader used by the unit tests

use std::collections::HashMap;
use std::ffi::c_void;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;

use super::backend::{DynamicLibrary, LibraryLoader};

/// Loader serving fake libraries whose symbols point at Rust functions
#[derive(Clone, Default)]
pub(crate) struct FakeLoader {
  inner: Arc<Inner>,
}

#[derive(Default)]
struct Inner {
  libraries: Mutex<HashMap<PathBuf, HashMap<&'static str, usize>>>,
  opens: Mutex<Vec<PathBuf>>,
  resolves: Arc<AtomicUsize>,
  resolve_delay: Mutex<Option<Duration>>,
  open_delay: Mutex<Option<Duration>>,
}

impl FakeLoader {
  pub(crate) fn new() -> Self {
    Self::default()
  }

  /// Serve a library at `path` exporting `symbols` (name, address)
  pub(crate) fn with_library(
    self,
    path: impl Into<PathBuf>,
    symbols: &[(&'static str, usize)],
  ) -> Self {
    self
      .inner
      .libraries
      .lock()
      .insert(path.into(), symbols.iter().copied().collect());
    self
  }

  /// Sleep inside every symbol lookup, to widen race windows
  pub(crate) fn with_resolve_delay(self, delay: Duration) -> Self {
    *self.inner.resolve_delay.lock() = Some(delay);
    self
  }

  /// Sleep inside every open, to keep a load in progress
  pub(crate) fn with_open_delay(self, delay: Duration) -> Self {
    *self.inner.open_delay.lock() = Some(delay);
    self
  }

  /// Every path passed to `open`, in order
  pub(crate) fn open_attempts(&self) -> Vec<PathBuf> {
    self.inner.opens.lock().clone()
  }

  /// Number of symbol lookups performed
  pub(crate) fn resolve_count(&self) -> usize {
    self.inner.resolves.load(Ordering::SeqCst)
  }
}

impl LibraryLoader for FakeLoader {
  fn open(&self, path: &Path) -> Result<Box<dyn DynamicLibrary>, String> {
    self.inner.opens.lock().push(path.to_path_buf());
    let delay = *self.inner.open_delay.lock();
    if let Some(delay) = delay {
      std::thread::sleep(delay);
    }
    let symbols = self
      .inner
      .libraries
      .lock()
      .get(path)
      .cloned()
      .ok_or_else(|| format!("{}: cannot open shared object file", path.display()))?;

    Ok(Box::new(FakeLibrary {
      path: path.to_path_buf(),
      symbols,
      resolves: Arc::clone(&self.inner.resolves),
      delay: *self.inner.resolve_delay.lock(),
    }))
  }
}

struct FakeLibrary {
  path: PathBuf,
  symbols: HashMap<&'static str, usize>,
  resolves: Arc<AtomicUsize>,
  delay: Option<Duration>,
}

impl DynamicLibrary for FakeLibrary {
  fn path(&self) -> &Path {
    &self.path
  }

  fn symbol(&self, name: &str) -> Result<*mut c_void, String> {
    self.resolves.fetch_add(1, Ordering::SeqCst);
    if let Some(delay) = self.delay {
      std::thread::sleep(delay);
    }
    self
      .symbols
      .get(name)
      .map(|address| *address as *mut c_void)
      .ok_or_else(|| format!("undefined symbol: {name}"))
  }
}
