//! Node.js host binding
//!
//! Exposes library location and version queries to JavaScript so a host can
//! point the loader at a bundled FFmpeg before anything calls into it.

use napi::{Error as NapiError, Result as NapiResult, Status};
use napi_derive::napi;

use crate::loader::{self, LibraryId, LoadError, Registry};
use crate::{ffi, version};

impl From<crate::Error> for NapiError {
  fn from(e: crate::Error) -> Self {
    let status = match e {
      crate::Error::InvalidArgument(_) => Status::InvalidArg,
      _ => Status::GenericFailure,
    };
    NapiError::new(status, e.to_string())
  }
}

fn load_error(e: LoadError) -> NapiError {
  let status = match e {
    LoadError::UnknownLibrary(_) => Status::InvalidArg,
    _ => Status::GenericFailure,
  };
  NapiError::new(status, e.to_string())
}

/// Runtime information about one FFmpeg library
#[napi(object)]
pub struct LibraryInfo {
  /// Logical name (e.g., "avcodec")
  pub name: String,
  /// Version as "major.minor.micro", absent when the library failed to load
  pub version: Option<String>,
  /// Path the library was opened from
  pub path: Option<String>,
  /// Load failure, if any
  pub error: Option<String>,
}

/// Use an explicit file for one library
///
/// e.g., `setLibraryPath("avcodec", "/opt/ffmpeg/lib/libavcodec.so.61")`
///
/// Must be called before the library is first used.
#[napi]
pub fn set_library_path(name: String, path: String) -> NapiResult<()> {
  let library: LibraryId = name.parse().map_err(load_error)?;
  loader::set_library_path(library, path).map_err(load_error)
}

/// Directory searched for every library without an explicit path
#[napi]
pub fn set_library_dir(dir: String) {
  loader::set_library_dir(dir);
}

/// Load every library and report its version, path or error
#[napi]
pub fn library_versions() -> Vec<LibraryInfo> {
  let registry = Registry::global();
  version::versions()
    .into_iter()
    .map(|(library, result)| {
      let path = registry
        .loaded_path(library)
        .map(|p| p.to_string_lossy().into_owned());
      match result {
        Ok(v) => LibraryInfo {
          name: library.name().to_string(),
          version: Some(v.to_string()),
          path,
          error: None,
        },
        Err(e) => LibraryInfo {
          name: library.name().to_string(),
          version: None,
          path,
          error: Some(e.to_string()),
        },
      }
    })
    .collect()
}

/// Names of the libraries loaded so far, without loading anything new
#[napi]
pub fn loaded_libraries() -> Vec<String> {
  let registry = Registry::global();
  LibraryId::ALL
    .iter()
    .filter(|&&library| registry.is_loaded(library))
    .map(|library| library.name().to_string())
    .collect()
}

/// Hardware device types supported by the loaded libavutil (e.g., "vaapi", "cuda")
#[napi]
pub fn available_hardware_devices() -> NapiResult<Vec<String>> {
  let mut names = Vec::new();
  for device_type in ffi::avutil::available_hwdevice_types()? {
    if let Some(name) = ffi::avutil::hwdevice_type_name(device_type)? {
      names.push(name);
    }
  }
  Ok(names)
}
