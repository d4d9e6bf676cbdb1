//! libpostproc function declarations

use super::types::*;
use crate::loader::LibraryId;
use std::os::raw::{c_char, c_int, c_uint};

dynamic_functions! {
  LibraryId::Postproc;

  /// Return the LIBPOSTPROC_VERSION_INT constant
  pub fn postproc_version() -> c_uint;

  /// Return the libpostproc build-time configuration
  pub fn postproc_configuration() -> *const c_char;

  /// Return the libpostproc license
  pub fn postproc_license() -> *const c_char;

  /// Allocate a postprocessing context for the given frame size
  ///
  /// `flags` combines a `PP_FORMAT_*` chroma format with CPU caps.
  pub fn pp_get_context(width: c_int, height: c_int, flags: c_int) -> *mut PPContext;

  /// Free a context returned by pp_get_context
  pub fn pp_free_context(pp_context: *mut PPContext);

  /// Parse a filter description (e.g. "hb:a,vb:a,dr:a") into a mode
  ///
  /// # Arguments
  /// * `name` - Filter chain description
  /// * `quality` - 0 to PP_QUALITY_MAX
  pub fn pp_get_mode_by_name_and_quality(name: *const c_char, quality: c_int) -> *mut PPMode;

  /// Free a mode returned by pp_get_mode_by_name_and_quality
  pub fn pp_free_mode(mode: *mut PPMode);

  /// Postprocess a planar frame
  pub fn pp_postprocess(
    src: *const *const u8,
    src_stride: *const c_int,
    dst: *const *mut u8,
    dst_stride: *const c_int,
    horizontal_size: c_int,
    vertical_size: c_int,
    qp_store: *const i8,
    qp_stride: c_int,
    mode: *mut PPMode,
    pp_context: *mut PPContext,
    pict_type: c_int,
  );
}

/// Highest quality accepted by `pp_get_mode_by_name_and_quality`
pub const PP_QUALITY_MAX: c_int = 6;

/// Let libpostproc pick CPU optimizations
pub const PP_CPU_CAPS_AUTO: c_int = 0x0008_0000;

pub const PP_FORMAT: c_int = 0x0000_0008;
pub const PP_FORMAT_420: c_int = 0x0000_0011 | PP_FORMAT;
pub const PP_FORMAT_422: c_int = 0x0000_0001 | PP_FORMAT;
pub const PP_FORMAT_411: c_int = 0x0000_0002 | PP_FORMAT;
pub const PP_FORMAT_444: c_int = PP_FORMAT;
pub const PP_FORMAT_440: c_int = 0x0000_0010 | PP_FORMAT;
