//! Lazily bound native function pointers

use std::ffi::c_void;
use std::fmt;
use std::mem;

use super::slot::OnceSlot;
use super::{LibraryId, LoadResult, Registry};

/// A native function resolved by name on first use and cached afterwards
///
/// `F` is the `unsafe extern "C" fn` pointer type of the native prototype.
/// Generated wrappers keep one `static Symbol` each and bind it through
/// [`Registry::global`]. A given `Symbol` must always be used with the same
/// registry, since the first one it binds against wins.
pub struct Symbol<F> {
  library: LibraryId,
  name: &'static str,
  slot: OnceSlot<F>,
}

impl<F: Copy> Symbol<F> {
  /// # Safety
  /// `F` must be a function pointer type whose signature and calling
  /// convention match the symbol `name` exported by `library`.
  pub const unsafe fn new(library: LibraryId, name: &'static str) -> Self {
    Self {
      library,
      name,
      slot: OnceSlot::new(),
    }
  }

  /// The bound function, resolving it first if needed
  #[inline]
  pub fn get(&self, registry: &Registry) -> LoadResult<F> {
    if let Some(f) = self.slot.get() {
      return Ok(*f);
    }
    self.bind(registry)
  }

  #[cold]
  fn bind(&self, registry: &Registry) -> LoadResult<F> {
    let epoch = registry.epoch();
    self
      .slot
      .get_or_try_init(epoch, || {
        let address = registry.resolve(self.library, self.name)?;
        tracing::debug!(
          target: "ffmpeg_dynload",
          library = %self.library,
          symbol = self.name,
          "bound symbol"
        );
        // SAFETY: `new` requires `F` to be a function pointer for this symbol
        Ok(unsafe { cast_fn::<F>(address.as_ptr()) })
      })
      .copied()
  }

  pub fn is_bound(&self) -> bool {
    self.slot.get().is_some()
  }

  pub fn name(&self) -> &'static str {
    self.name
  }

  pub fn library(&self) -> LibraryId {
    self.library
  }
}

impl<F> fmt::Debug for Symbol<F> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Symbol")
      .field("library", &self.library)
      .field("name", &self.name)
      .field("bound", &self.slot.get().is_some())
      .finish()
  }
}

unsafe fn cast_fn<F: Copy>(address: *mut c_void) -> F {
  assert_eq!(
    mem::size_of::<F>(),
    mem::size_of::<*mut c_void>(),
    "symbol type must be a plain function pointer"
  );
  unsafe { mem::transmute_copy::<*mut c_void, F>(&address) }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::loader::testing::FakeLoader;
  use crate::loader::{LoadError, LoaderConfig};
  use std::os::raw::{c_int, c_uint};
  use std::sync::{Arc, Barrier};
  use std::time::Duration;

  type VersionFn = unsafe extern "C" fn() -> c_uint;
  type AddFn = unsafe extern "C" fn(c_int, c_int) -> c_int;

  extern "C" fn fake_version() -> c_uint {
    (59 << 16) | (39 << 8) | 100
  }

  extern "C" fn fake_add(a: c_int, b: c_int) -> c_int {
    a + b
  }

  const AVUTIL: &str = "/fake/libavutil.so";

  fn avutil_loader() -> FakeLoader {
    FakeLoader::new().with_library(
      AVUTIL,
      &[
        ("avutil_version", fake_version as usize),
        ("fake_add", fake_add as usize),
      ],
    )
  }

  fn registry(loader: &FakeLoader) -> Registry {
    Registry::with_loader(
      loader.clone(),
      LoaderConfig::new().with_library_path(LibraryId::Avutil, AVUTIL),
    )
  }

  #[test]
  fn test_bound_call_goes_through() {
    let loader = avutil_loader();
    let registry = registry(&loader);
    let symbol: Symbol<AddFn> = unsafe { Symbol::new(LibraryId::Avutil, "fake_add") };

    assert!(!symbol.is_bound());
    let add = symbol.get(&registry).unwrap();
    assert_eq!(unsafe { add(2, 40) }, 42);
    assert!(symbol.is_bound());
  }

  #[test]
  fn test_resolution_happens_once() {
    let loader = avutil_loader();
    let registry = registry(&loader);
    let symbol: Symbol<VersionFn> = unsafe { Symbol::new(LibraryId::Avutil, "avutil_version") };

    for _ in 0..100 {
      let version = symbol.get(&registry).unwrap();
      assert_eq!(unsafe { version() } >> 16, 59);
    }

    assert_eq!(loader.resolve_count(), 1);
    assert_eq!(loader.open_attempts().len(), 1);
  }

  #[test]
  fn test_concurrent_first_calls_bind_once() {
    const THREADS: usize = 16;
    let loader = avutil_loader().with_resolve_delay(Duration::from_millis(20));
    let registry = registry(&loader);
    let symbol: Symbol<AddFn> = unsafe { Symbol::new(LibraryId::Avutil, "fake_add") };
    let barrier = Arc::new(Barrier::new(THREADS));

    let results: Vec<usize> = crossbeam::thread::scope(|scope| {
      let handles: Vec<_> = (0..THREADS)
        .map(|_| {
          let barrier = Arc::clone(&barrier);
          let symbol = &symbol;
          let registry = &registry;
          scope.spawn(move |_| {
            barrier.wait();
            let f = symbol.get(registry).unwrap();
            assert_eq!(unsafe { f(1, 1) }, 2);
            f as usize
          })
        })
        .collect();
      handles.into_iter().map(|h| h.join().unwrap()).collect()
    })
    .unwrap();

    assert_eq!(loader.resolve_count(), 1);
    assert!(results.iter().all(|address| *address == fake_add as usize));
  }

  #[test]
  fn test_concurrent_first_calls_share_failure() {
    const THREADS: usize = 8;
    let loader = avutil_loader().with_resolve_delay(Duration::from_millis(20));
    let registry = registry(&loader);
    let symbol: Symbol<VersionFn> = unsafe { Symbol::new(LibraryId::Avutil, "av_missing") };
    let barrier = Arc::new(Barrier::new(THREADS));

    let errors: Vec<LoadError> = crossbeam::thread::scope(|scope| {
      let handles: Vec<_> = (0..THREADS)
        .map(|_| {
          let barrier = Arc::clone(&barrier);
          let symbol = &symbol;
          let registry = &registry;
          scope.spawn(move |_| {
            barrier.wait();
            symbol.get(registry).unwrap_err()
          })
        })
        .collect();
      handles.into_iter().map(|h| h.join().unwrap()).collect()
    })
    .unwrap();

    assert_eq!(loader.resolve_count(), 1);
    assert!(errors.iter().all(|e| e == &errors[0]));
    assert!(matches!(
      &errors[0],
      LoadError::SymbolNotFound {
        symbol: "av_missing",
        ..
      }
    ));
  }

  #[test]
  fn test_missing_library_surfaces_and_recovers() {
    let loader = avutil_loader();
    let registry = Registry::with_loader(
      loader.clone(),
      LoaderConfig::new().with_library_path(LibraryId::Avutil, "/wrong/libavutil.so"),
    );
    let symbol: Symbol<VersionFn> = unsafe { Symbol::new(LibraryId::Avutil, "avutil_version") };

    let err = symbol.get(&registry).unwrap_err();
    assert_eq!(err.library(), Some(LibraryId::Avutil));
    assert!(err.to_string().contains("/wrong/libavutil.so"));
    assert!(!symbol.is_bound());

    registry.set_library_path(LibraryId::Avutil, AVUTIL).unwrap();
    let version = symbol.get(&registry).unwrap();
    assert_eq!(unsafe { version() }, fake_version());
  }
}
