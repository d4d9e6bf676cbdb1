//! Library path configuration
//!
//! Decides which file paths are tried for each FFmpeg library. Explicit
//! overrides win; otherwise the platform default names are tried, first in the
//! configured search directory and then through the system loader path.

use std::collections::HashMap;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use super::LibraryId;

/// Environment variable naming a directory that holds the FFmpeg libraries
pub const LIB_DIR_ENV: &str = "FFMPEG_LIB_DIR";

/// Where to look for the FFmpeg shared libraries
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LoaderConfig {
  overrides: HashMap<LibraryId, PathBuf>,
  search_dir: Option<PathBuf>,
}

impl LoaderConfig {
  pub fn new() -> Self {
    Self::default()
  }

  /// Build from the process environment
  ///
  /// Reads `FFMPEG_<NAME>_PATH` for every library and `FFMPEG_LIB_DIR`.
  pub fn from_env() -> Self {
    Self::from_env_vars(std::env::vars_os())
  }

  /// Build from an explicit set of environment variables
  pub fn from_env_vars<I>(vars: I) -> Self
  where
    I: IntoIterator<Item = (OsString, OsString)>,
  {
    let vars: HashMap<OsString, OsString> = vars.into_iter().collect();
    let mut config = Self::new();

    for id in LibraryId::ALL {
      if let Some(path) = vars.get(&OsString::from(id.env_var())) {
        if !path.is_empty() {
          config.overrides.insert(id, PathBuf::from(path));
        }
      }
    }

    if let Some(dir) = vars.get(&OsString::from(LIB_DIR_ENV)) {
      if !dir.is_empty() {
        config.search_dir = Some(PathBuf::from(dir));
      }
    }

    config
  }

  /// Use exactly this file for the given library
  pub fn with_library_path(mut self, id: LibraryId, path: impl Into<PathBuf>) -> Self {
    self.set_library_path(id, path);
    self
  }

  /// Look for default file names in this directory first
  pub fn with_search_dir(mut self, dir: impl Into<PathBuf>) -> Self {
    self.set_search_dir(dir);
    self
  }

  pub fn set_library_path(&mut self, id: LibraryId, path: impl Into<PathBuf>) {
    self.overrides.insert(id, path.into());
  }

  pub fn set_search_dir(&mut self, dir: impl Into<PathBuf>) {
    self.search_dir = Some(dir.into());
  }

  pub fn library_path(&self, id: LibraryId) -> Option<&Path> {
    self.overrides.get(&id).map(PathBuf::as_path)
  }

  pub fn search_dir(&self) -> Option<&Path> {
    self.search_dir.as_deref()
  }

  /// Paths to try, in order, for the running platform
  pub fn candidates(&self, id: LibraryId) -> Vec<PathBuf> {
    self.candidates_with(id, &id.default_file_names())
  }

  fn candidates_with(&self, id: LibraryId, file_names: &[String]) -> Vec<PathBuf> {
    if let Some(path) = self.overrides.get(&id) {
      return vec![path.clone()];
    }

    let mut candidates = Vec::with_capacity(file_names.len() * 2);
    if let Some(dir) = &self.search_dir {
      candidates.extend(file_names.iter().map(|name| dir.join(name)));
    }
    candidates.extend(file_names.iter().map(PathBuf::from));
    candidates
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn vars(pairs: &[(&str, &str)]) -> Vec<(OsString, OsString)> {
    pairs
      .iter()
      .map(|(k, v)| (OsString::from(k), OsString::from(v)))
      .collect()
  }

  #[test]
  fn test_override_is_the_only_candidate() {
    let config = LoaderConfig::new()
      .with_search_dir("/opt/ffmpeg/lib")
      .with_library_path(LibraryId::Avcodec, "/custom/libavcodec.so");

    assert_eq!(
      config.candidates(LibraryId::Avcodec),
      vec![PathBuf::from("/custom/libavcodec.so")]
    );
  }

  #[test]
  fn test_search_dir_precedes_system_names() {
    let config = LoaderConfig::new().with_search_dir("/opt/ffmpeg/lib");
    let names = LibraryId::Avutil.file_names_for("linux");
    let candidates = config.candidates_with(LibraryId::Avutil, &names);

    assert_eq!(
      candidates,
      vec![
        PathBuf::from("/opt/ffmpeg/lib/libavutil.so.59"),
        PathBuf::from("/opt/ffmpeg/lib/libavutil.so.58"),
        PathBuf::from("/opt/ffmpeg/lib/libavutil.so"),
        PathBuf::from("libavutil.so.59"),
        PathBuf::from("libavutil.so.58"),
        PathBuf::from("libavutil.so"),
      ]
    );
  }

  #[test]
  fn test_defaults_without_config() {
    let config = LoaderConfig::new();
    let names = LibraryId::Swscale.file_names_for("windows");
    assert_eq!(
      config.candidates_with(LibraryId::Swscale, &names),
      vec![
        PathBuf::from("swscale-8.dll"),
        PathBuf::from("swscale-7.dll"),
        PathBuf::from("swscale.dll"),
      ]
    );
  }

  #[test]
  fn test_from_env_vars() {
    let config = LoaderConfig::from_env_vars(vars(&[
      ("FFMPEG_AVFORMAT_PATH", "/x/libavformat.so.61"),
      ("FFMPEG_AVCODEC_PATH", ""),
      ("FFMPEG_LIB_DIR", "/x"),
      ("UNRELATED", "1"),
    ]));

    assert_eq!(
      config.library_path(LibraryId::Avformat),
      Some(Path::new("/x/libavformat.so.61"))
    );
    assert_eq!(config.library_path(LibraryId::Avcodec), None);
    assert_eq!(config.search_dir(), Some(Path::new("/x")));
  }
}
