//! Core FFmpeg type definitions
//!
//! Most FFmpeg structs are opaque (zero-sized) so that no version-specific
//! layout is assumed. A few small structs whose public layout has been stable
//! since FFmpeg 6 are mirrored field for field.

use std::marker::PhantomData;
use std::os::raw::{c_char, c_int, c_void};

macro_rules! opaque_types {
  ($($(#[$meta:meta])* $name:ident;)*) => {
    $(
      $(#[$meta])*
      #[repr(C)]
      pub struct $name {
        _opaque: [u8; 0],
        _marker: PhantomData<(*mut u8, std::marker::PhantomPinned)>,
      }
    )*
  };
}

// ============================================================================
// Rational Number
// ============================================================================

/// Rational number for time bases and frame rates
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AVRational {
  /// Numerator
  pub num: c_int,
  /// Denominator
  pub den: c_int,
}

impl AVRational {
  pub const fn new(num: c_int, den: c_int) -> Self {
    Self { num, den }
  }

  pub fn as_f64(&self) -> f64 {
    if self.den == 0 {
      0.0
    } else {
      self.num as f64 / self.den as f64
    }
  }

  /// Microsecond time base (1/1000000), FFmpeg's AV_TIME_BASE_Q
  pub const MICROSECONDS: Self = Self {
    num: 1,
    den: 1_000_000,
  };
}

// ============================================================================
// Codec IDs
// ============================================================================

/// Commonly used codec IDs
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AVCodecID {
  None = 0,
  // Video
  Mpeg2Video = 2,
  H264 = 27,
  Vp8 = 139,
  Vp9 = 167,
  Hevc = 173,
  Av1 = 226,
  // Audio
  PcmS16le = 65536,
  Mp3 = 86017,
  Aac = 86018,
  Vorbis = 86021,
  Flac = 86028,
  Opus = 86076,
}

impl AVCodecID {
  /// Get the raw FFmpeg codec ID value
  pub fn as_raw(&self) -> c_int {
    *self as c_int
  }
}

// ============================================================================
// Pixel Formats
// ============================================================================

/// Video pixel formats (common subset)
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AVPixelFormat {
  None = -1,
  // Planar YUV formats
  Yuv420p = 0,
  Yuv422p = 4,
  Yuv444p = 5,
  Yuva420p = 33,
  // Semi-planar formats
  Nv12 = 23,
  Nv21 = 24,
  // RGB formats
  Rgb24 = 2,
  Bgr24 = 3,
  Argb = 25,
  Rgba = 26,
  Abgr = 27,
  Bgra = 28,
  Gray8 = 8,
}

impl AVPixelFormat {
  /// Get the raw FFmpeg pixel format value
  pub fn as_raw(&self) -> c_int {
    *self as c_int
  }

  /// Number of planes for this pixel format
  pub fn num_planes(&self) -> usize {
    match self {
      Self::Yuv420p | Self::Yuv422p | Self::Yuv444p => 3,
      Self::Yuva420p => 4,
      Self::Nv12 | Self::Nv21 => 2,
      Self::Rgb24
      | Self::Bgr24
      | Self::Rgba
      | Self::Bgra
      | Self::Argb
      | Self::Abgr
      | Self::Gray8 => 1,
      Self::None => 0,
    }
  }
}

// ============================================================================
// Sample Formats
// ============================================================================

/// Audio sample formats
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AVSampleFormat {
  None = -1,
  U8 = 0,
  S16 = 1,
  S32 = 2,
  Flt = 3,
  Dbl = 4,
  U8p = 5,
  S16p = 6,
  S32p = 7,
  Fltp = 8,
  Dblp = 9,
  S64 = 10,
  S64p = 11,
}

impl AVSampleFormat {
  pub fn as_raw(&self) -> c_int {
    *self as c_int
  }

  /// Whether samples for each channel live in their own plane
  pub fn is_planar(&self) -> bool {
    matches!(
      self,
      Self::U8p | Self::S16p | Self::S32p | Self::Fltp | Self::Dblp | Self::S64p
    )
  }

  /// Bytes per sample
  pub fn bytes_per_sample(&self) -> usize {
    match self {
      Self::None => 0,
      Self::U8 | Self::U8p => 1,
      Self::S16 | Self::S16p => 2,
      Self::S32 | Self::S32p | Self::Flt | Self::Fltp => 4,
      Self::Dbl | Self::Dblp | Self::S64 | Self::S64p => 8,
    }
  }
}

// ============================================================================
// Hardware Device Types
// ============================================================================

/// Hardware acceleration device types
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AVHWDeviceType {
  None = 0,
  Vdpau = 1,
  Cuda = 2,
  Vaapi = 3,
  Dxva2 = 4,
  Qsv = 5,
  Videotoolbox = 6,
  D3d11va = 7,
  Drm = 8,
  Opencl = 9,
  Mediacodec = 10,
  Vulkan = 11,
  D3d12va = 12,
}

impl AVHWDeviceType {
  /// Get the raw FFmpeg hardware device type value
  pub fn as_raw(&self) -> c_int {
    *self as c_int
  }

  pub fn from_raw(raw: c_int) -> Option<Self> {
    Some(match raw {
      0 => Self::None,
      1 => Self::Vdpau,
      2 => Self::Cuda,
      3 => Self::Vaapi,
      4 => Self::Dxva2,
      5 => Self::Qsv,
      6 => Self::Videotoolbox,
      7 => Self::D3d11va,
      8 => Self::Drm,
      9 => Self::Opencl,
      10 => Self::Mediacodec,
      11 => Self::Vulkan,
      12 => Self::D3d12va,
      _ => return None,
    })
  }
}

// ============================================================================
// Mirrored Structs
// ============================================================================

/// Packet side data entry
#[repr(C)]
#[derive(Clone, Copy, Debug)]
pub struct AVPacketSideData {
  pub data: *mut u8,
  pub size: usize,
  pub type_: c_int,
}

/// Compressed data packet (FFmpeg 6.0+ layout)
///
/// Must be allocated with `av_packet_alloc`; fields may be read and written
/// directly, ownership of `buf`/`data` stays with FFmpeg.
#[repr(C)]
#[derive(Debug)]
pub struct AVPacket {
  pub buf: *mut AVBufferRef,
  pub pts: i64,
  pub dts: i64,
  pub data: *mut u8,
  pub size: c_int,
  pub stream_index: c_int,
  pub flags: c_int,
  pub side_data: *mut AVPacketSideData,
  pub side_data_elems: c_int,
  pub duration: i64,
  pub pos: i64,
  pub opaque: *mut c_void,
  pub opaque_ref: *mut AVBufferRef,
  pub time_base: AVRational,
}

/// Dictionary entry returned by `av_dict_get` / `av_dict_iterate`
#[repr(C)]
#[derive(Debug)]
pub struct AVDictionaryEntry {
  pub key: *mut c_char,
  pub value: *mut c_char,
}

/// Channel layout payload: a bit mask for native order, a map otherwise
#[repr(C)]
#[derive(Clone, Copy)]
pub union AVChannelLayoutU {
  pub mask: u64,
  pub map: *mut c_void,
}

/// Audio channel layout (FFmpeg 5.1+)
#[repr(C)]
#[derive(Clone, Copy)]
pub struct AVChannelLayout {
  pub order: c_int,
  pub nb_channels: c_int,
  pub u: AVChannelLayoutU,
  pub opaque: *mut c_void,
}

impl Default for AVChannelLayout {
  fn default() -> Self {
    Self {
      order: channel_order::UNSPEC,
      nb_channels: 0,
      u: AVChannelLayoutU { mask: 0 },
      opaque: std::ptr::null_mut(),
    }
  }
}

impl std::fmt::Debug for AVChannelLayout {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    let mut s = f.debug_struct("AVChannelLayout");
    s.field("order", &self.order)
      .field("nb_channels", &self.nb_channels);
    if self.order == channel_order::NATIVE {
      // SAFETY: native order always stores the mask variant
      s.field("mask", &format_args!("{:#x}", unsafe { self.u.mask }));
    }
    s.finish()
  }
}

/// Channel orderings for [`AVChannelLayout::order`]
pub mod channel_order {
  use std::os::raw::c_int;

  pub const UNSPEC: c_int = 0;
  pub const NATIVE: c_int = 1;
  pub const CUSTOM: c_int = 2;
  pub const AMBISONIC: c_int = 3;
}

// ============================================================================
// Opaque FFmpeg Types
// ============================================================================

opaque_types! {
  /// Codec implementation descriptor
  AVCodec;
  /// Encoder/decoder instance
  AVCodecContext;
  /// Uncompressed video/audio data
  AVFrame;
  /// Reference-counted buffer
  AVBufferRef;
  /// Key-value options
  AVDictionary;
  /// Stream codec parameters
  AVCodecParameters;
  /// Software scaler context
  SwsContext;
  /// Scaler filter
  SwsFilter;
  /// Software resampler context
  SwrContext;
  /// Hardware frames pool
  AVHWFramesContext;
  /// Hardware frames constraints
  AVHWFramesConstraints;
  /// Codec hardware config
  AVCodecHWConfig;
  /// Muxer/demuxer context
  AVFormatContext;
  /// Output format descriptor
  AVOutputFormat;
  /// Input format descriptor
  AVInputFormat;
  /// I/O abstraction
  AVIOContext;
  /// Stream within a container
  AVStream;
  /// Filter descriptor
  AVFilter;
  /// Filter instance inside a graph
  AVFilterContext;
  /// Filter graph
  AVFilterGraph;
  /// Filter graph endpoint list used by the graph parser
  AVFilterInOut;
  /// Device info list
  AVDeviceInfoList;
  /// Postprocessing context (`pp_context`)
  PPContext;
  /// Postprocessing mode (`pp_mode`)
  PPMode;
}

// ============================================================================
// Constants
// ============================================================================

/// No timestamp value
pub const AV_NOPTS_VALUE: i64 = 0x8000000000000000u64 as i64;

/// Internal time base (microseconds)
pub const AV_TIME_BASE: c_int = 1_000_000;

/// Packet flags
pub mod pkt_flag {
  use std::os::raw::c_int;

  pub const KEY: c_int = 0x0001;
  pub const CORRUPT: c_int = 0x0002;
  pub const DISCARD: c_int = 0x0004;
  pub const TRUSTED: c_int = 0x0008;
  pub const DISPOSABLE: c_int = 0x0010;
}

/// Media types
pub mod media_type {
  use std::os::raw::c_int;

  pub const UNKNOWN: c_int = -1;
  pub const VIDEO: c_int = 0;
  pub const AUDIO: c_int = 1;
  pub const DATA: c_int = 2;
  pub const SUBTITLE: c_int = 3;
  pub const ATTACHMENT: c_int = 4;
}
