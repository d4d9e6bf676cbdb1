//! Crate-level error type for the safe helpers

use thiserror::Error;

use crate::ffi::FFmpegError;
use crate::loader::LoadError;

/// Errors returned by the safe helpers
#[derive(Debug, Clone, Error)]
pub enum Error {
  /// A library or symbol could not be loaded
  #[error(transparent)]
  Load(#[from] LoadError),

  /// FFmpeg returned a negative error code
  #[error(transparent)]
  Ffmpeg(#[from] FFmpegError),

  /// An FFmpeg allocator returned NULL
  #[error("failed to allocate {0}")]
  AllocationFailed(&'static str),

  #[error("invalid argument: {0}")]
  InvalidArgument(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
  /// The native FFmpeg code, if this error came from FFmpeg
  pub fn ffmpeg_code(&self) -> Option<i32> {
    match self {
      Error::Ffmpeg(e) => Some(e.code),
      _ => None,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::ffi::error::AVERROR_EINVAL;
  use crate::loader::LibraryId;

  #[test]
  fn test_from_load_error() {
    let err: Error = LoadError::AlreadyLoaded(LibraryId::Avcodec).into();
    assert!(matches!(err, Error::Load(LoadError::AlreadyLoaded(LibraryId::Avcodec))));
    assert_eq!(err.ffmpeg_code(), None);
  }

  #[test]
  fn test_from_ffmpeg_error() {
    let err: Error = FFmpegError::new(AVERROR_EINVAL, "Invalid argument").into();
    assert_eq!(err.ffmpeg_code(), Some(AVERROR_EINVAL));
    assert!(err.to_string().contains("Invalid argument"));
  }

  #[test]
  fn test_display() {
    assert_eq!(
      Error::AllocationFailed("AVPacket").to_string(),
      "failed to allocate AVPacket"
    );
  }
}
