//! libavdevice function declarations
//!
//! Capture and playback devices exposed as libavformat input/output formats.

use super::types::*;
use crate::loader::LibraryId;
use std::os::raw::{c_char, c_int, c_uint};

dynamic_functions! {
  LibraryId::Avdevice;

  /// Return the LIBAVDEVICE_VERSION_INT constant
  pub fn avdevice_version() -> c_uint;

  /// Return the libavdevice build-time configuration
  pub fn avdevice_configuration() -> *const c_char;

  /// Return the libavdevice license
  pub fn avdevice_license() -> *const c_char;

  /// Initialize libavdevice and register all the input and output devices
  pub fn avdevice_register_all();

  /// Audio input devices iterator; pass NULL to get the first one
  pub fn av_input_audio_device_next(d: *const AVInputFormat) -> *const AVInputFormat;

  /// Video input devices iterator; pass NULL to get the first one
  pub fn av_input_video_device_next(d: *const AVInputFormat) -> *const AVInputFormat;

  /// Audio output devices iterator; pass NULL to get the first one
  pub fn av_output_audio_device_next(d: *const AVOutputFormat) -> *const AVOutputFormat;

  /// Video output devices iterator; pass NULL to get the first one
  pub fn av_output_video_device_next(d: *const AVOutputFormat) -> *const AVOutputFormat;

  /// List devices available to an opened device context
  ///
  /// # Returns
  /// Number of devices, or a negative AVERROR
  pub fn avdevice_list_devices(s: *mut AVFormatContext, device_list: *mut *mut AVDeviceInfoList) -> c_int;

  /// Free a list returned by avdevice_list_devices
  pub fn avdevice_free_list_devices(device_list: *mut *mut AVDeviceInfoList);
}
