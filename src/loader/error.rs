//! Loader error type

use std::path::PathBuf;

use super::LibraryId;

/// Result type for anything that has to bind a native symbol
pub type LoadResult<T> = Result<T, LoadError>;

/// Failure to locate a library or resolve one of its symbols
///
/// Cloneable so a cached failure can be handed to every caller that races on
/// the same binding.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum LoadError {
  #[error("failed to load lib{library} (tried {}): {reason}", display_paths(.attempted))]
  LibraryNotFound {
    library: LibraryId,
    attempted: Vec<PathBuf>,
    reason: String,
  },

  #[error("cannot load lib{library}: dependency failed: {source}")]
  DependencyFailed {
    library: LibraryId,
    #[source]
    source: Box<LoadError>,
  },

  #[error("symbol {symbol} not found in lib{library}: {reason}")]
  SymbolNotFound {
    library: LibraryId,
    symbol: &'static str,
    reason: String,
  },

  #[error("lib{0} is already loaded; path overrides must be set before first use")]
  AlreadyLoaded(LibraryId),

  #[error("unknown FFmpeg library: {0}")]
  UnknownLibrary(String),
}

impl LoadError {
  /// The library this error is about, if any
  pub fn library(&self) -> Option<LibraryId> {
    match self {
      Self::LibraryNotFound { library, .. }
      | Self::DependencyFailed { library, .. }
      | Self::SymbolNotFound { library, .. } => Some(*library),
      Self::AlreadyLoaded(library) => Some(*library),
      Self::UnknownLibrary(_) => None,
    }
  }
}

fn display_paths(paths: &[PathBuf]) -> String {
  if paths.is_empty() {
    return "no candidate paths".to_string();
  }
  paths
    .iter()
    .map(|p| p.display().to_string())
    .collect::<Vec<_>>()
    .join(", ")
}
