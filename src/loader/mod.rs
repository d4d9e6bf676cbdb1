//! Runtime loading of the FFmpeg shared libraries
//!
//! Libraries are located through [`LoaderConfig`] and opened once per
//! [`Registry`]. Each native function is a [`Symbol`] resolved by name on first
//! call and cached for the life of the process.
//!
//! ```no_run
//! use ffmpeg_dynload::loader::{self, LibraryId};
//!
//! loader::set_library_dir("/opt/ffmpeg/lib");
//! loader::set_library_path(LibraryId::Avcodec, "/opt/ffmpeg/lib/libavcodec.so.61")?;
//! let version = unsafe { ffmpeg_dynload::ffi::avcodec::avcodec_version()? };
//! # Ok::<(), ffmpeg_dynload::loader::LoadError>(())
//! ```

pub mod backend;
pub mod config;
pub mod error;
pub mod library;
pub mod registry;
mod slot;
pub mod symbol;

#[cfg(test)]
pub(crate) mod testing;

pub use backend::{DynamicLibrary, LibraryLoader, SystemLoader};
pub use config::LoaderConfig;
pub use error::{LoadError, LoadResult};
pub use library::LibraryId;
pub use registry::{preload, set_library_dir, set_library_path, Registry};
pub use symbol::Symbol;
