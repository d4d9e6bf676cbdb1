#![deny(clippy::all)]

//! FFmpeg bindings loaded at runtime
//!
//! Every FFmpeg function in [`ffi`] is resolved from its shared library the
//! first time it is called, so nothing links against FFmpeg at build time.
//! Where the libraries come from is decided by [`loader`]: explicit paths, a
//! search directory, `FFMPEG_<NAME>_PATH` / `FFMPEG_LIB_DIR`, then the system
//! loader's default search.

#[macro_use]
mod macros;

// Library location and lazy symbol binding
pub mod loader;

// FFmpeg C bindings (hand-written, no bindgen)
pub mod ffi;

// Safe wrappers (RAII)
pub mod codec;

pub mod error;
pub mod log;
pub mod version;

// Node.js host binding
#[cfg(feature = "node")]
pub mod node;

pub use error::{Error, Result};
pub use loader::{preload, set_library_dir, set_library_path, LibraryId, LoadError, Registry};
pub use version::{configuration, license, version, versions, LibraryVersion};
