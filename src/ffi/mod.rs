//! Hand-written FFmpeg C bindings (no bindgen)
//!
//! One module per FFmpeg library. Every function keeps its native C signature
//! but is bound lazily from the shared library on first call, so each wrapper
//! returns a [`LoadResult`](crate::loader::LoadResult) around the native return
//! value. Struct mirrors and opaque handles live in [`types`].

pub mod avcodec;
pub mod avdevice;
pub mod avfilter;
pub mod avformat;
pub mod avutil;
pub mod error;
pub mod postproc;
pub mod swresample;
pub mod swscale;
pub mod types;

pub use error::{check_error, FFmpegError, FFmpegResult};
pub use types::*;

use std::ffi::{CStr, CString};
use std::os::raw::c_char;

/// Convert a Rust string for an FFmpeg `const char *` parameter
///
/// Interior NUL bytes are rejected as [`Error::InvalidArgument`](crate::Error::InvalidArgument).
pub(crate) fn to_cstring(s: &str) -> crate::Result<CString> {
  CString::new(s)
    .map_err(|_| crate::Error::InvalidArgument(format!("string contains NUL: {s:?}")))
}

/// Copy a NUL-terminated string owned by FFmpeg
///
/// # Safety
/// `ptr` must be NULL or point to a valid NUL-terminated string.
pub(crate) unsafe fn cstr_to_string(ptr: *const c_char) -> Option<String> {
  if ptr.is_null() {
    return None;
  }
  Some(unsafe { CStr::from_ptr(ptr) }.to_string_lossy().into_owned())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_to_cstring_rejects_interior_nul() {
    assert_eq!(to_cstring("h264").unwrap().as_bytes(), b"h264");
    match to_cstring("bad\0name") {
      Err(crate::Error::InvalidArgument(msg)) => assert!(msg.contains("NUL"), "{msg}"),
      other => panic!("unexpected result: {other:?}"),
    }
  }

  #[test]
  fn test_cstr_to_string() {
    assert_eq!(unsafe { cstr_to_string(std::ptr::null()) }, None);
    let name = c"libx264";
    assert_eq!(unsafe { cstr_to_string(name.as_ptr()) }.as_deref(), Some("libx264"));
  }
}
