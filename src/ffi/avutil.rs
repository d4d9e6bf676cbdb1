//! libavutil function declarations
//!
//! Provides utility functions for memory, frames, dictionaries, logging and
//! hardware device contexts.

use super::types::*;
use crate::loader::LibraryId;
use std::os::raw::{c_char, c_int, c_uint, c_void};

dynamic_functions! {
  LibraryId::Avutil;

  // ========================================================================
  // Library Information
  // ========================================================================

  /// Return the LIBAVUTIL_VERSION_INT constant
  pub fn avutil_version() -> c_uint;

  /// Return the libavutil build-time configuration
  pub fn avutil_configuration() -> *const c_char;

  /// Return the libavutil license
  pub fn avutil_license() -> *const c_char;

  /// Return an informative version string (e.g. "7.1")
  pub fn av_version_info() -> *const c_char;

  // ========================================================================
  // Frame Management
  // ========================================================================

  /// Allocate an AVFrame and set its fields to default values
  pub fn av_frame_alloc() -> *mut AVFrame;

  /// Free the frame and any dynamically allocated objects in it
  pub fn av_frame_free(frame: *mut *mut AVFrame);

  /// Set up a new reference to the data described by the frame
  pub fn av_frame_ref(dst: *mut AVFrame, src: *const AVFrame) -> c_int;

  /// Unreference all buffers referenced by frame and reset to defaults
  pub fn av_frame_unref(frame: *mut AVFrame);

  /// Create a new frame that references the same data as src
  pub fn av_frame_clone(src: *const AVFrame) -> *mut AVFrame;

  /// Allocate new buffers for audio or video data
  ///
  /// # Arguments
  /// * `frame` - Frame with format, width/height or nb_samples/ch_layout set
  /// * `align` - Buffer size alignment (0 for default)
  pub fn av_frame_get_buffer(frame: *mut AVFrame, align: c_int) -> c_int;

  /// Ensure the frame is writable, copying data if needed
  pub fn av_frame_make_writable(frame: *mut AVFrame) -> c_int;

  /// Copy frame data from src to dst
  pub fn av_frame_copy(dst: *mut AVFrame, src: *const AVFrame) -> c_int;

  /// Copy only "metadata" fields from src to dst (pts, duration, etc)
  pub fn av_frame_copy_props(dst: *mut AVFrame, src: *const AVFrame) -> c_int;

  /// Check if the frame is writable
  pub fn av_frame_is_writable(frame: *mut AVFrame) -> c_int;

  // ========================================================================
  // Memory Allocation
  // ========================================================================

  /// Allocate a memory block with alignment suitable for all memory accesses
  pub fn av_malloc(size: usize) -> *mut c_void;

  /// Allocate a zeroed memory block with alignment suitable for all memory accesses
  pub fn av_mallocz(size: usize) -> *mut c_void;

  /// Allocate, reallocate, or free a block of memory
  pub fn av_realloc(ptr: *mut c_void, size: usize) -> *mut c_void;

  /// Free a memory block which has been allocated with av_malloc
  pub fn av_free(ptr: *mut c_void);

  /// Free a memory block which has been allocated with av_malloc and set the pointer to NULL
  pub fn av_freep(ptr: *mut c_void);

  /// Duplicate a C string into av_malloc'ed memory
  pub fn av_strdup(s: *const c_char) -> *mut c_char;

  // ========================================================================
  // Buffer Reference Management
  // ========================================================================

  /// Allocate an AVBuffer of the given size
  pub fn av_buffer_alloc(size: usize) -> *mut AVBufferRef;

  /// Create a new reference to an AVBuffer
  pub fn av_buffer_ref(buf: *const AVBufferRef) -> *mut AVBufferRef;

  /// Free a given reference and automatically free the buffer if no more refs
  pub fn av_buffer_unref(buf: *mut *mut AVBufferRef);

  /// Check if the buffer is writable (only one reference)
  pub fn av_buffer_is_writable(buf: *const AVBufferRef) -> c_int;

  /// Get the opaque pointer passed when the buffer was created
  pub fn av_buffer_get_opaque(buf: *const AVBufferRef) -> *mut c_void;

  // ========================================================================
  // Image Utilities
  // ========================================================================

  /// Get the required buffer size for an image with given dimensions and format
  ///
  /// # Arguments
  /// * `pix_fmt` - Pixel format
  /// * `width` - Image width
  /// * `height` - Image height
  /// * `align` - Line size alignment (typically 1)
  pub fn av_image_get_buffer_size(
    pix_fmt: c_int,
    width: c_int,
    height: c_int,
    align: c_int,
  ) -> c_int;

  /// Fill plane data pointers and linesizes for an image with given parameters
  pub fn av_image_fill_arrays(
    dst_data: *mut *mut u8,
    dst_linesize: *mut c_int,
    src: *const u8,
    pix_fmt: c_int,
    width: c_int,
    height: c_int,
    align: c_int,
  ) -> c_int;

  /// Copy image data from src to dst
  pub fn av_image_copy(
    dst_data: *const *mut u8,
    dst_linesizes: *const c_int,
    src_data: *const *const u8,
    src_linesizes: *const c_int,
    pix_fmt: c_int,
    width: c_int,
    height: c_int,
  );

  /// Copy image data to a buffer
  pub fn av_image_copy_to_buffer(
    dst: *mut u8,
    dst_size: c_int,
    src_data: *const *const u8,
    src_linesizes: *const c_int,
    pix_fmt: c_int,
    width: c_int,
    height: c_int,
    align: c_int,
  ) -> c_int;

  // ========================================================================
  // Pixel / Sample Format Information
  // ========================================================================

  /// Short name of a pixel format, or NULL if unknown
  pub fn av_get_pix_fmt_name(pix_fmt: c_int) -> *const c_char;

  /// Pixel format for a name, or AV_PIX_FMT_NONE
  pub fn av_get_pix_fmt(name: *const c_char) -> c_int;

  /// Short name of a sample format, or NULL if unknown
  pub fn av_get_sample_fmt_name(sample_fmt: c_int) -> *const c_char;

  /// Bytes per sample, or 0 if unknown
  pub fn av_get_bytes_per_sample(sample_fmt: c_int) -> c_int;

  /// Whether a sample format is planar
  pub fn av_sample_fmt_is_planar(sample_fmt: c_int) -> c_int;

  // ========================================================================
  // Channel Layouts
  // ========================================================================

  /// Initialize a channel layout with the default layout for a channel count
  pub fn av_channel_layout_default(ch_layout: *mut AVChannelLayout, nb_channels: c_int);

  /// Free any allocated data in the channel layout and reset it
  pub fn av_channel_layout_uninit(channel_layout: *mut AVChannelLayout);

  /// Initialize a native-order layout from a channel mask
  pub fn av_channel_layout_from_mask(channel_layout: *mut AVChannelLayout, mask: u64) -> c_int;

  /// Describe a channel layout (e.g. "stereo") into buf
  pub fn av_channel_layout_describe(
    channel_layout: *const AVChannelLayout,
    buf: *mut c_char,
    buf_size: usize,
  ) -> c_int;

  /// Compare two layouts; 0 when equal
  pub fn av_channel_layout_compare(
    chl: *const AVChannelLayout,
    chl1: *const AVChannelLayout,
  ) -> c_int;

  // ========================================================================
  // Error Handling
  // ========================================================================

  /// Put a description of the AVERROR code errnum in errbuf
  ///
  /// # Returns
  /// 0 on success, negative if no description was found
  pub fn av_strerror(errnum: c_int, errbuf: *mut c_char, errbuf_size: usize) -> c_int;

  // ========================================================================
  // Time/Timestamp Utilities
  // ========================================================================

  /// Rescale a 64-bit integer by 2 rational numbers
  pub fn av_rescale_q(a: i64, bq: AVRational, cq: AVRational) -> i64;

  /// Rescale a 64-bit integer by 2 rational numbers with rounding
  pub fn av_rescale_q_rnd(a: i64, bq: AVRational, cq: AVRational, rnd: c_int) -> i64;

  /// Compare two timestamps
  pub fn av_compare_ts(ts_a: i64, tb_a: AVRational, ts_b: i64, tb_b: AVRational) -> c_int;

  // ========================================================================
  // Dictionary (Options)
  // ========================================================================

  /// Set an entry in the dictionary
  pub fn av_dict_set(
    pm: *mut *mut AVDictionary,
    key: *const c_char,
    value: *const c_char,
    flags: c_int,
  ) -> c_int;

  /// Set an integer entry in the dictionary
  pub fn av_dict_set_int(
    pm: *mut *mut AVDictionary,
    key: *const c_char,
    value: i64,
    flags: c_int,
  ) -> c_int;

  /// Get a dictionary entry with matching key
  pub fn av_dict_get(
    m: *const AVDictionary,
    key: *const c_char,
    prev: *const AVDictionaryEntry,
    flags: c_int,
  ) -> *mut AVDictionaryEntry;

  /// Iterate over all entries; pass NULL to start
  pub fn av_dict_iterate(
    m: *const AVDictionary,
    prev: *const AVDictionaryEntry,
  ) -> *const AVDictionaryEntry;

  /// Number of entries in the dictionary
  pub fn av_dict_count(m: *const AVDictionary) -> c_int;

  /// Copy entries from src into dst
  pub fn av_dict_copy(dst: *mut *mut AVDictionary, src: *const AVDictionary, flags: c_int) -> c_int;

  /// Free all memory allocated for an AVDictionary
  pub fn av_dict_free(m: *mut *mut AVDictionary);

  // ========================================================================
  // Options
  // ========================================================================

  /// Set an option on an AVOptions-enabled object
  pub fn av_opt_set(
    obj: *mut c_void,
    name: *const c_char,
    val: *const c_char,
    search_flags: c_int,
  ) -> c_int;

  /// Set an integer option
  pub fn av_opt_set_int(obj: *mut c_void, name: *const c_char, val: i64, search_flags: c_int) -> c_int;

  /// Set a sample format option
  pub fn av_opt_set_sample_fmt(
    obj: *mut c_void,
    name: *const c_char,
    fmt: c_int,
    search_flags: c_int,
  ) -> c_int;

  /// Set a channel layout option
  pub fn av_opt_set_chlayout(
    obj: *mut c_void,
    name: *const c_char,
    layout: *const AVChannelLayout,
    search_flags: c_int,
  ) -> c_int;

  // ========================================================================
  // Logging
  // ========================================================================

  /// Set the logging level
  pub fn av_log_set_level(level: c_int);

  /// Get the current logging level
  pub fn av_log_get_level() -> c_int;

  /// Set log flags (AV_LOG_SKIP_REPEATED, AV_LOG_PRINT_LEVEL)
  pub fn av_log_set_flags(arg: c_int);

  // ========================================================================
  // Hardware Device Context
  // ========================================================================

  /// Create a hardware device context for the specified type
  ///
  /// # Arguments
  /// * `device_ctx` - On success, pointer to the created context
  /// * `type_` - Hardware device type
  /// * `device` - Device name (e.g., "/dev/dri/renderD128" for VAAPI, NULL for default)
  /// * `opts` - Options dictionary (can be NULL)
  /// * `flags` - Currently unused, should be 0
  pub fn av_hwdevice_ctx_create(
    device_ctx: *mut *mut AVBufferRef,
    type_: c_int,
    device: *const c_char,
    opts: *mut AVDictionary,
    flags: c_int,
  ) -> c_int;

  /// Allocate a hardware device context of the given type
  pub fn av_hwdevice_ctx_alloc(type_: c_int) -> *mut AVBufferRef;

  /// Finalize the device context before use
  pub fn av_hwdevice_ctx_init(ref_: *mut AVBufferRef) -> c_int;

  /// Iterate over supported device types
  ///
  /// Pass AV_HWDEVICE_TYPE_NONE to start; returns NONE when done
  pub fn av_hwdevice_iterate_types(prev: c_int) -> c_int;

  /// Get the string name of a hardware device type
  pub fn av_hwdevice_get_type_name(type_: c_int) -> *const c_char;

  /// Get hardware device type from name
  pub fn av_hwdevice_find_type_by_name(name: *const c_char) -> c_int;

  // ========================================================================
  // Hardware Frames Context
  // ========================================================================

  /// Allocate a hardware frames context for a given device
  pub fn av_hwframe_ctx_alloc(device_ctx: *mut AVBufferRef) -> *mut AVBufferRef;

  /// Finalize the hardware frames context before use
  pub fn av_hwframe_ctx_init(ref_: *mut AVBufferRef) -> c_int;

  /// Allocate a new frame from the hardware frames pool
  pub fn av_hwframe_get_buffer(hwframe_ctx: *mut AVBufferRef, frame: *mut AVFrame, flags: c_int) -> c_int;

  /// Copy data between hardware and software frames
  ///
  /// If src is a HW frame and dst a SW frame this downloads, the other way round uploads
  pub fn av_hwframe_transfer_data(dst: *mut AVFrame, src: *const AVFrame, flags: c_int) -> c_int;

  /// Get constraints on hardware frames for a device/configuration
  pub fn av_hwdevice_get_hwframe_constraints(
    device_ctx: *mut AVBufferRef,
    hwconfig: *const c_void,
  ) -> *mut AVHWFramesConstraints;

  /// Free an AVHWFramesConstraints structure
  pub fn av_hwframe_constraints_free(constraints: *mut *mut AVHWFramesConstraints);

  /// Map a hardware frame to a software frame
  pub fn av_hwframe_map(dst: *mut AVFrame, src: *const AVFrame, flags: c_int) -> c_int;
}

// ============================================================================
// Logging Levels
// ============================================================================

pub mod log_level {
  use std::os::raw::c_int;

  pub const QUIET: c_int = -8;
  pub const PANIC: c_int = 0;
  pub const FATAL: c_int = 8;
  pub const ERROR: c_int = 16;
  pub const WARNING: c_int = 24;
  pub const INFO: c_int = 32;
  pub const VERBOSE: c_int = 40;
  pub const DEBUG: c_int = 48;
  pub const TRACE: c_int = 56;
}

/// Log flags for `av_log_set_flags`
pub mod log_flag {
  use std::os::raw::c_int;

  pub const SKIP_REPEATED: c_int = 1;
  pub const PRINT_LEVEL: c_int = 2;
}

// ============================================================================
// Dictionary Flags
// ============================================================================

pub mod dict_flag {
  use std::os::raw::c_int;

  pub const MATCH_CASE: c_int = 1;
  pub const IGNORE_SUFFIX: c_int = 2;
  pub const DONT_STRDUP_KEY: c_int = 4;
  pub const DONT_STRDUP_VAL: c_int = 8;
  pub const DONT_OVERWRITE: c_int = 16;
  pub const APPEND: c_int = 32;
  pub const MULTIKEY: c_int = 64;
}

// ============================================================================
// Rounding Modes
// ============================================================================

pub mod rounding {
  use std::os::raw::c_int;

  pub const ZERO: c_int = 0;
  pub const INF: c_int = 1;
  pub const DOWN: c_int = 2;
  pub const UP: c_int = 3;
  pub const NEAR_INF: c_int = 5;
  pub const PASS_MINMAX: c_int = 8192;
}

// ============================================================================
// Hardware Frame Map Flags
// ============================================================================

/// Map for reading
pub const AV_HWFRAME_MAP_READ: c_int = 1 << 0;

/// Map for writing
pub const AV_HWFRAME_MAP_WRITE: c_int = 1 << 1;

/// Map for overwriting (discard previous contents)
pub const AV_HWFRAME_MAP_OVERWRITE: c_int = 1 << 2;

/// Mapping will be done directly without copying
pub const AV_HWFRAME_MAP_DIRECT: c_int = 1 << 3;

// ============================================================================
// Helper Functions
// ============================================================================

/// Get the size in bytes needed for a video frame
pub fn image_buffer_size(format: AVPixelFormat, width: i32, height: i32) -> crate::Result<usize> {
  let size = unsafe { av_image_get_buffer_size(format.as_raw(), width, height, 1)? };
  let size = super::check_error(size)?;
  Ok(size as usize)
}

/// Name FFmpeg uses for a pixel format
pub fn pixel_format_name(format: AVPixelFormat) -> crate::Result<Option<String>> {
  let ptr = unsafe { av_get_pix_fmt_name(format.as_raw())? };
  Ok(unsafe { super::cstr_to_string(ptr) })
}

/// Name FFmpeg uses for a sample format
pub fn sample_format_name(format: AVSampleFormat) -> crate::Result<Option<String>> {
  let ptr = unsafe { av_get_sample_fmt_name(format.as_raw())? };
  Ok(unsafe { super::cstr_to_string(ptr) })
}

/// Hardware device types supported by the loaded libavutil
pub fn available_hwdevice_types() -> crate::Result<Vec<AVHWDeviceType>> {
  let mut types = Vec::new();
  let mut current = unsafe { av_hwdevice_iterate_types(AVHWDeviceType::None.as_raw())? };

  while current != AVHWDeviceType::None.as_raw() {
    if let Some(ty) = AVHWDeviceType::from_raw(current) {
      types.push(ty);
    }
    current = unsafe { av_hwdevice_iterate_types(current)? };
  }

  Ok(types)
}

/// Get hardware device type name
pub fn hwdevice_type_name(device_type: AVHWDeviceType) -> crate::Result<Option<String>> {
  let ptr = unsafe { av_hwdevice_get_type_name(device_type.as_raw())? };
  Ok(unsafe { super::cstr_to_string(ptr) })
}

/// Check whether a hardware device type is supported by the loaded libavutil
pub fn is_hwdevice_available(device_type: AVHWDeviceType) -> crate::Result<bool> {
  Ok(available_hwdevice_types()?.contains(&device_type))
}
