//! Runtime version, configuration and license queries
//!
//! FFmpeg packs library versions as `AV_VERSION_INT(major, minor, micro)`.
//! [`version`] decodes that value and warns once per library when the loaded
//! major version is not one these bindings mirror.

use std::fmt;
use std::os::raw::{c_char, c_uint};
use std::sync::atomic::{AtomicBool, Ordering};

use crate::ffi::{
  self, avcodec, avdevice, avfilter, avformat, avutil, postproc, swresample, swscale,
};
use crate::loader::{LibraryId, LoadResult};
use crate::Result;

/// Decoded `AV_VERSION_INT` value
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LibraryVersion {
  pub major: u32,
  pub minor: u32,
  pub micro: u32,
}

impl LibraryVersion {
  pub const fn new(major: u32, minor: u32, micro: u32) -> Self {
    Self { major, minor, micro }
  }

  /// Decode a packed `AV_VERSION_INT`
  pub const fn from_int(value: u32) -> Self {
    Self {
      major: value >> 16,
      minor: (value >> 8) & 0xff,
      micro: value & 0xff,
    }
  }

  /// Pack back into the `AV_VERSION_INT` layout
  pub const fn as_int(self) -> u32 {
    (self.major << 16) | (self.minor << 8) | self.micro
  }

  /// Whether the struct mirrors in [`ffi`] match this major version of `library`
  pub fn is_supported(self, library: LibraryId) -> bool {
    library.supported_majors().contains(&self.major)
  }
}

impl fmt::Display for LibraryVersion {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}.{}.{}", self.major, self.minor, self.micro)
  }
}

static MISMATCH_REPORTED: [AtomicBool; LibraryId::COUNT] =
  [const { AtomicBool::new(false) }; LibraryId::COUNT];

/// Runtime version of a library, loading it if needed
pub fn version(library: LibraryId) -> Result<LibraryVersion> {
  let raw = unsafe { raw_version(library)? };
  let version = LibraryVersion::from_int(raw);

  if !version.is_supported(library)
    && !MISMATCH_REPORTED[library as usize].swap(true, Ordering::Relaxed)
  {
    tracing::warn!(
      target: "ffmpeg_dynload",
      library = %library,
      expected = ?library.supported_majors(),
      found = %version,
      "loaded library has an unexpected major version"
    );
  }

  Ok(version)
}

/// Versions of every library, in load order
///
/// A library that cannot be loaded reports its error instead of aborting the
/// whole query.
pub fn versions() -> Vec<(LibraryId, Result<LibraryVersion>)> {
  LibraryId::ALL
    .iter()
    .map(|&library| (library, version(library)))
    .collect()
}

/// Build-time `./configure` line of a library
pub fn configuration(library: LibraryId) -> Result<String> {
  let ptr = unsafe { raw_configuration(library)? };
  Ok(unsafe { ffi::cstr_to_string(ptr) }.unwrap_or_default())
}

/// License a library was built under (e.g. "LGPL version 2.1 or later")
pub fn license(library: LibraryId) -> Result<String> {
  let ptr = unsafe { raw_license(library)? };
  Ok(unsafe { ffi::cstr_to_string(ptr) }.unwrap_or_default())
}

/// FFmpeg release string (e.g. "7.1" or a git describe)
pub fn ffmpeg_version_info() -> Result<String> {
  let ptr = unsafe { avutil::av_version_info()? };
  Ok(unsafe { ffi::cstr_to_string(ptr) }.unwrap_or_default())
}

unsafe fn raw_version(library: LibraryId) -> LoadResult<c_uint> {
  unsafe {
    match library {
      LibraryId::Avutil => avutil::avutil_version(),
      LibraryId::Avcodec => avcodec::avcodec_version(),
      LibraryId::Avformat => avformat::avformat_version(),
      LibraryId::Avdevice => avdevice::avdevice_version(),
      LibraryId::Avfilter => avfilter::avfilter_version(),
      LibraryId::Swscale => swscale::swscale_version(),
      LibraryId::Swresample => swresample::swresample_version(),
      LibraryId::Postproc => postproc::postproc_version(),
    }
  }
}

unsafe fn raw_configuration(library: LibraryId) -> LoadResult<*const c_char> {
  unsafe {
    match library {
      LibraryId::Avutil => avutil::avutil_configuration(),
      LibraryId::Avcodec => avcodec::avcodec_configuration(),
      LibraryId::Avformat => avformat::avformat_configuration(),
      LibraryId::Avdevice => avdevice::avdevice_configuration(),
      LibraryId::Avfilter => avfilter::avfilter_configuration(),
      LibraryId::Swscale => swscale::swscale_configuration(),
      LibraryId::Swresample => swresample::swresample_configuration(),
      LibraryId::Postproc => postproc::postproc_configuration(),
    }
  }
}

unsafe fn raw_license(library: LibraryId) -> LoadResult<*const c_char> {
  unsafe {
    match library {
      LibraryId::Avutil => avutil::avutil_license(),
      LibraryId::Avcodec => avcodec::avcodec_license(),
      LibraryId::Avformat => avformat::avformat_license(),
      LibraryId::Avdevice => avdevice::avdevice_license(),
      LibraryId::Avfilter => avfilter::avfilter_license(),
      LibraryId::Swscale => swscale::swscale_license(),
      LibraryId::Swresample => swresample::swresample_license(),
      LibraryId::Postproc => postproc::postproc_license(),
    }
  }
}
