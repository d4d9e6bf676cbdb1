//! Calls into a real FFmpeg install
//!
//! Every test returns early with a notice when the libraries cannot be
//! loaded, so the suite passes on machines without FFmpeg.

use std::ffi::CStr;
use std::os::raw::c_char;
use std::ptr;

use ffmpeg_dynload::codec::{Dictionary, Packet};
use ffmpeg_dynload::ffi::avutil::{self, dict_flag};
use ffmpeg_dynload::ffi::error::{AVERROR_EINVAL, AVERROR_EOF};
use ffmpeg_dynload::ffi::{
  self, avcodec, channel_order, AVChannelLayout, AVCodecID, AVRational, FFmpegError,
};
use ffmpeg_dynload::log::{self, LogLevel};
use ffmpeg_dynload::{preload, version, LibraryId, Registry};

fn init_tracing() {
  let _ = tracing_subscriber::fmt()
    .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
    .with_test_writer()
    .try_init();
}

fn ffmpeg_available(libraries: &[LibraryId]) -> bool {
  init_tracing();
  match preload(libraries) {
    Ok(()) => true,
    Err(e) => {
      eprintln!("skipping, FFmpeg not available: {e}");
      false
    }
  }
}

#[test]
fn version_query_matches_native_value() {
  if !ffmpeg_available(&[LibraryId::Avutil]) {
    return;
  }

  let raw = unsafe { avutil::avutil_version() }.unwrap();
  let decoded = version(LibraryId::Avutil).unwrap();
  assert_eq!(decoded.as_int(), raw);
  assert!(decoded.major >= 56, "unexpectedly old libavutil: {decoded}");

  assert!(Registry::global().is_loaded(LibraryId::Avutil));
  assert!(Registry::global().loaded_path(LibraryId::Avutil).is_some());

  let license = ffmpeg_dynload::license(LibraryId::Avutil).unwrap();
  assert!(license.contains("GPL"), "unexpected license: {license}");
}

#[test]
fn dependencies_are_loaded_first() {
  if !ffmpeg_available(&[LibraryId::Avcodec]) {
    return;
  }

  let registry = Registry::global();
  for dep in LibraryId::Avcodec.dependencies() {
    assert!(registry.is_loaded(*dep), "{dep} should be loaded before avcodec");
  }
}

#[test]
fn error_strings_come_from_av_strerror() {
  if !ffmpeg_available(&[LibraryId::Avutil]) {
    return;
  }

  assert_eq!(FFmpegError::from_code(AVERROR_EOF).message, "End of file");
  assert_eq!(FFmpegError::from_code(AVERROR_EINVAL).message, "Invalid argument");
}

#[test]
fn packet_fields_written_by_ffmpeg_read_back() {
  if !ffmpeg_available(&[LibraryId::Avcodec]) {
    return;
  }

  let mut pkt = Packet::from_slice(b"\x00\x00\x00\x01\x67").unwrap();
  assert_eq!(pkt.size(), 5);
  assert_eq!(pkt.as_slice(), b"\x00\x00\x00\x01\x67");

  pkt.set_pts(2);
  pkt.set_dts(1);
  pkt.set_duration(1);
  pkt.rescale_ts(AVRational::new(1, 25), AVRational::new(1, 1000)).unwrap();
  assert_eq!((pkt.pts(), pkt.dts(), pkt.duration()), (80, 40, 40));

  // av_packet_unref resets every field through the native layout
  pkt.unref().unwrap();
  assert!(pkt.is_empty());
  assert!(pkt.data().is_null());
  assert_eq!(pkt.pts(), ffi::AV_NOPTS_VALUE);
}

#[test]
fn dictionary_entries_read_through_mirror() {
  if !ffmpeg_available(&[LibraryId::Avutil]) {
    return;
  }

  let mut dict = Dictionary::from_pairs([("preset", "medium"), ("profile", "high")]).unwrap();
  dict.set_int("g", 60).unwrap();

  let key = c"profile";
  let entry =
    unsafe { avutil::av_dict_get(dict.as_ptr(), key.as_ptr(), ptr::null(), dict_flag::MATCH_CASE) }
      .unwrap();
  assert!(!entry.is_null());
  let value = unsafe { CStr::from_ptr((*entry).value) };
  assert_eq!(value.to_str().unwrap(), "high");

  assert_eq!(dict.len().unwrap(), 3);
  assert_eq!(dict.get("g").unwrap().as_deref(), Some("60"));
}

#[test]
fn channel_layout_filled_by_ffmpeg() {
  if !ffmpeg_available(&[LibraryId::Avutil]) {
    return;
  }

  let mut layout = AVChannelLayout::default();
  unsafe { avutil::av_channel_layout_default(&mut layout, 2) }.unwrap();
  assert_eq!(layout.order, channel_order::NATIVE);
  assert_eq!(layout.nb_channels, 2);
  // AV_CH_LAYOUT_STEREO = FRONT_LEFT | FRONT_RIGHT
  assert_eq!(unsafe { layout.u.mask }, 0x3);

  let mut buf = [0 as c_char; 64];
  let ret =
    unsafe { avutil::av_channel_layout_describe(&layout, buf.as_mut_ptr(), buf.len()) }.unwrap();
  assert!(ret > 0);
  assert_eq!(unsafe { CStr::from_ptr(buf.as_ptr()) }.to_str().unwrap(), "stereo");

  unsafe { avutil::av_channel_layout_uninit(&mut layout) }.unwrap();
}

#[test]
fn codec_lookup() {
  if !ffmpeg_available(&[LibraryId::Avcodec]) {
    return;
  }

  assert_eq!(avcodec::codec_name(AVCodecID::H264).unwrap().as_deref(), Some("h264"));
  assert!(avcodec::find_decoder_by_name("definitely-not-a-codec").unwrap().is_none());
  assert!(avcodec::find_decoder_by_name("bad\0name").is_err());
}

#[test]
fn log_level_round_trip() {
  if !ffmpeg_available(&[LibraryId::Avutil]) {
    return;
  }

  let previous = log::level().unwrap();
  log::set_level(LogLevel::Error).unwrap();
  assert_eq!(log::level().unwrap(), LogLevel::Error);
  log::set_level(previous).unwrap();
}
