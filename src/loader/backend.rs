//! Dynamic library abstraction
//!
//! The rest of the crate only talks to [`LibraryLoader`] and
//! [`DynamicLibrary`]. [`SystemLoader`] is the real implementation on top of
//! `libloading`; tests substitute their own.

use std::ffi::c_void;
use std::path::{Path, PathBuf};

/// An opened shared library
pub trait DynamicLibrary: Send + Sync {
  /// Path the library was opened from
  fn path(&self) -> &Path;

  /// Address of an exported symbol
  ///
  /// The returned pointer may be null if the library exports the name with a
  /// null value; callers treat that as not found.
  fn symbol(&self, name: &str) -> Result<*mut c_void, String>;
}

/// Opens shared libraries by path or bare file name
pub trait LibraryLoader: Send + Sync {
  fn open(&self, path: &Path) -> Result<Box<dyn DynamicLibrary>, String>;
}

/// Loader backed by the platform dynamic linker (`dlopen` / `LoadLibraryW`)
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemLoader;

impl LibraryLoader for SystemLoader {
  fn open(&self, path: &Path) -> Result<Box<dyn DynamicLibrary>, String> {
    // SAFETY: opening a library runs its initialisers. FFmpeg's initialisers
    // only set up internal tables and have no preconditions on the caller.
    let library = unsafe { libloading::Library::new(path) }.map_err(|e| e.to_string())?;
    Ok(Box::new(SystemLibrary {
      path: path.to_path_buf(),
      library,
    }))
  }
}

struct SystemLibrary {
  path: PathBuf,
  library: libloading::Library,
}

impl DynamicLibrary for SystemLibrary {
  fn path(&self) -> &Path {
    &self.path
  }

  fn symbol(&self, name: &str) -> Result<*mut c_void, String> {
    // SAFETY: the symbol is read as an untyped address; it is only ever
    // called through a pointer type declared to match the C prototype.
    unsafe {
      self
        .library
        .get::<*mut c_void>(name.as_bytes())
        .map(|symbol| *symbol)
        .map_err(|e| e.to_string())
    }
  }
}

impl std::fmt::Debug for SystemLibrary {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("SystemLibrary")
      .field("path", &self.path)
      .finish()
  }
}
