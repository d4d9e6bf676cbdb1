//! libavcodec function declarations
//!
//! Provides encoding and decoding functionality.

use super::types::*;
use crate::loader::LibraryId;
use std::os::raw::{c_char, c_int, c_uint, c_void};
use std::ptr::NonNull;

dynamic_functions! {
  LibraryId::Avcodec;

  // ========================================================================
  // Library Information
  // ========================================================================

  /// Return the LIBAVCODEC_VERSION_INT constant
  pub fn avcodec_version() -> c_uint;

  /// Return the libavcodec build-time configuration
  pub fn avcodec_configuration() -> *const c_char;

  /// Return the libavcodec license
  pub fn avcodec_license() -> *const c_char;

  // ========================================================================
  // Codec Discovery
  // ========================================================================

  /// Find an encoder by codec ID
  pub fn avcodec_find_encoder(id: c_int) -> *const AVCodec;

  /// Find an encoder by name (e.g., "libx264", "h264_videotoolbox")
  pub fn avcodec_find_encoder_by_name(name: *const c_char) -> *const AVCodec;

  /// Find a decoder by codec ID
  pub fn avcodec_find_decoder(id: c_int) -> *const AVCodec;

  /// Find a decoder by name
  pub fn avcodec_find_decoder_by_name(name: *const c_char) -> *const AVCodec;

  /// Iterate over all registered codecs
  ///
  /// `opaque` must point to a NULL-initialized pointer that FFmpeg uses as
  /// the iteration state.
  pub fn av_codec_iterate(opaque: *mut *mut c_void) -> *const AVCodec;

  /// Whether the codec is an encoder
  pub fn av_codec_is_encoder(codec: *const AVCodec) -> c_int;

  /// Whether the codec is a decoder
  pub fn av_codec_is_decoder(codec: *const AVCodec) -> c_int;

  // ========================================================================
  // Codec Context Lifecycle
  // ========================================================================

  /// Allocate an AVCodecContext and set its fields to default values
  pub fn avcodec_alloc_context3(codec: *const AVCodec) -> *mut AVCodecContext;

  /// Free the codec context and everything associated with it
  pub fn avcodec_free_context(avctx: *mut *mut AVCodecContext);

  /// Initialize the AVCodecContext to use the given AVCodec
  pub fn avcodec_open2(
    avctx: *mut AVCodecContext,
    codec: *const AVCodec,
    options: *mut *mut AVDictionary,
  ) -> c_int;

  /// Close a given AVCodecContext and free all data associated with it
  /// (but not the AVCodecContext itself)
  ///
  /// Deprecated in libavcodec 61 in favour of `avcodec_free_context`.
  pub fn avcodec_close(avctx: *mut AVCodecContext) -> c_int;

  // ========================================================================
  // Encoding (send frame, receive packet)
  // ========================================================================

  /// Supply a raw video frame to the encoder
  ///
  /// # Arguments
  /// * `avctx` - Codec context
  /// * `frame` - AVFrame containing the raw video data, or NULL to flush
  ///
  /// # Returns
  /// * 0 on success
  /// * AVERROR(EAGAIN) - output not available, must read with receive_packet first
  /// * AVERROR_EOF - encoder has been flushed, no more output
  /// * AVERROR(EINVAL) - codec not opened, or requires flush
  /// * AVERROR(ENOMEM) - failed to add packet to queue
  pub fn avcodec_send_frame(avctx: *mut AVCodecContext, frame: *const AVFrame) -> c_int;

  /// Read encoded data from the encoder
  ///
  /// # Returns
  /// * 0 on success
  /// * AVERROR(EAGAIN) - output not available, must send more input
  /// * AVERROR_EOF - encoder has been fully flushed
  /// * AVERROR(EINVAL) - codec not opened
  pub fn avcodec_receive_packet(avctx: *mut AVCodecContext, avpkt: *mut AVPacket) -> c_int;

  // ========================================================================
  // Decoding (send packet, receive frame)
  // ========================================================================

  /// Supply raw packet data to the decoder
  ///
  /// # Arguments
  /// * `avctx` - Codec context
  /// * `avpkt` - AVPacket containing compressed data, or NULL to flush
  ///
  /// # Returns
  /// * 0 on success
  /// * AVERROR(EAGAIN) - output not available, must read with receive_frame first
  /// * AVERROR_EOF - decoder has been flushed
  /// * AVERROR(EINVAL) - codec not opened
  /// * AVERROR(ENOMEM) - failed to add packet to queue
  pub fn avcodec_send_packet(avctx: *mut AVCodecContext, avpkt: *const AVPacket) -> c_int;

  /// Return decoded output data from the decoder
  pub fn avcodec_receive_frame(avctx: *mut AVCodecContext, frame: *mut AVFrame) -> c_int;

  // ========================================================================
  // Codec Control
  // ========================================================================

  /// Reset the internal codec state / flush internal buffers
  /// Should be called when seeking or switching to a different stream
  pub fn avcodec_flush_buffers(avctx: *mut AVCodecContext);

  // ========================================================================
  // Packet Management
  // ========================================================================

  /// Allocate an AVPacket and set its fields to default values
  pub fn av_packet_alloc() -> *mut AVPacket;

  /// Free the packet, if the packet is reference counted, it will be unreferenced first
  pub fn av_packet_free(pkt: *mut *mut AVPacket);

  /// Wipe the packet. Unreference the buffer and reset fields to defaults
  pub fn av_packet_unref(pkt: *mut AVPacket);

  /// Create a new packet that references the same data as src
  pub fn av_packet_ref(dst: *mut AVPacket, src: *const AVPacket) -> c_int;

  /// Create a new packet referencing the same data, allocated with av_packet_alloc
  pub fn av_packet_clone(src: *const AVPacket) -> *mut AVPacket;

  /// Copy only the properties (timestamps, flags, side data) of a packet
  pub fn av_packet_copy_props(dst: *mut AVPacket, src: *const AVPacket) -> c_int;

  /// Ensure the packet data is reference counted and writable
  pub fn av_packet_make_writable(pkt: *mut AVPacket) -> c_int;

  /// Convert timing fields from one timebase to another
  pub fn av_packet_rescale_ts(pkt: *mut AVPacket, tb_src: AVRational, tb_dst: AVRational);

  /// Allocate new buffer for the packet with size bytes
  pub fn av_new_packet(pkt: *mut AVPacket, size: c_int) -> c_int;

  /// Reduce packet size, correctly zeroing padding
  pub fn av_shrink_packet(pkt: *mut AVPacket, size: c_int);

  /// Increase packet size, correctly zeroing padding
  pub fn av_grow_packet(pkt: *mut AVPacket, grow_by: c_int) -> c_int;

  /// Get side data from a packet
  ///
  /// # Arguments
  /// * `pkt` - packet to get side data from
  /// * `type_` - type of side data to get
  /// * `size` - pointer to store size of side data
  ///
  /// # Returns
  /// Pointer to side data, or NULL if not found
  pub fn av_packet_get_side_data(pkt: *const AVPacket, type_: c_int, size: *mut usize) -> *const u8;

  /// Allocate new side data for a packet
  ///
  /// # Returns
  /// Pointer to newly allocated side data, or NULL on failure
  pub fn av_packet_new_side_data(pkt: *mut AVPacket, type_: c_int, size: usize) -> *mut u8;

  /// Human readable name of a packet side data type
  pub fn av_packet_side_data_name(type_: c_int) -> *const c_char;

  // ========================================================================
  // Codec Names and Types
  // ========================================================================

  /// Get the name of a codec
  pub fn avcodec_get_name(id: c_int) -> *const c_char;

  /// Get the media type (AVMEDIA_TYPE_*) of a codec
  pub fn avcodec_get_type(codec_id: c_int) -> c_int;

  // ========================================================================
  // Codec Parameters
  // ========================================================================

  /// Allocate a new AVCodecParameters with default values
  pub fn avcodec_parameters_alloc() -> *mut AVCodecParameters;

  /// Free an AVCodecParameters instance and everything associated with it
  pub fn avcodec_parameters_free(par: *mut *mut AVCodecParameters);

  /// Copy the contents of src to dst
  pub fn avcodec_parameters_copy(dst: *mut AVCodecParameters, src: *const AVCodecParameters) -> c_int;

  /// Fill the parameters struct based on the values from the supplied codec context
  pub fn avcodec_parameters_from_context(
    par: *mut AVCodecParameters,
    codec: *const AVCodecContext,
  ) -> c_int;

  /// Fill the codec context based on the values from the supplied codec parameters
  pub fn avcodec_parameters_to_context(
    codec: *mut AVCodecContext,
    par: *const AVCodecParameters,
  ) -> c_int;

  // ========================================================================
  // Hardware Configuration
  // ========================================================================

  /// Retrieve supported hardware configurations for a codec
  ///
  /// Returns NULL once `index` runs past the last configuration.
  pub fn avcodec_get_hw_config(codec: *const AVCodec, index: c_int) -> *const AVCodecHWConfig;
}

// ============================================================================
// Packet Side Data Types
// ============================================================================

pub mod packet_side_data {
  use std::os::raw::c_int;

  pub const PALETTE: c_int = 0;
  pub const NEW_EXTRADATA: c_int = 1;
  pub const PARAM_CHANGE: c_int = 2;
  pub const H263_MB_INFO: c_int = 3;
  pub const REPLAYGAIN: c_int = 4;
  pub const DISPLAYMATRIX: c_int = 5;
  pub const STEREO3D: c_int = 6;
  pub const AUDIO_SERVICE_TYPE: c_int = 7;
  pub const QUALITY_STATS: c_int = 8;
  pub const FALLBACK_TRACK: c_int = 9;
  pub const CPB_PROPERTIES: c_int = 10;
  pub const SKIP_SAMPLES: c_int = 11;
  pub const JP_DUALMONO: c_int = 12;
  pub const STRINGS_METADATA: c_int = 13;
  pub const SUBTITLE_POSITION: c_int = 14;
  pub const MATROSKA_BLOCKADDITIONAL: c_int = 15;
  pub const WEBVTT_IDENTIFIER: c_int = 16;
  pub const WEBVTT_SETTINGS: c_int = 17;
  pub const METADATA_UPDATE: c_int = 18;
}

/// Extra bytes FFmpeg requires at the end of packet buffers
pub const AV_INPUT_BUFFER_PADDING_SIZE: usize = 64;

// ============================================================================
// Helper Functions
// ============================================================================

/// Find encoder by AVCodecID enum
pub fn find_encoder(codec_id: AVCodecID) -> crate::Result<Option<NonNull<AVCodec>>> {
  let codec = unsafe { avcodec_find_encoder(codec_id.as_raw())? };
  Ok(NonNull::new(codec as *mut AVCodec))
}

/// Find decoder by AVCodecID enum
pub fn find_decoder(codec_id: AVCodecID) -> crate::Result<Option<NonNull<AVCodec>>> {
  let codec = unsafe { avcodec_find_decoder(codec_id.as_raw())? };
  Ok(NonNull::new(codec as *mut AVCodec))
}

/// Find encoder by name
pub fn find_encoder_by_name(name: &str) -> crate::Result<Option<NonNull<AVCodec>>> {
  let c_name = super::to_cstring(name)?;
  let codec = unsafe { avcodec_find_encoder_by_name(c_name.as_ptr())? };
  Ok(NonNull::new(codec as *mut AVCodec))
}

/// Find decoder by name
pub fn find_decoder_by_name(name: &str) -> crate::Result<Option<NonNull<AVCodec>>> {
  let c_name = super::to_cstring(name)?;
  let codec = unsafe { avcodec_find_decoder_by_name(c_name.as_ptr())? };
  Ok(NonNull::new(codec as *mut AVCodec))
}

/// Canonical FFmpeg name of a codec id (e.g. "h264")
pub fn codec_name(codec_id: AVCodecID) -> crate::Result<Option<String>> {
  let ptr = unsafe { avcodec_get_name(codec_id.as_raw())? };
  Ok(unsafe { super::cstr_to_string(ptr) })
}
