//! Safe wrapper around FFmpeg AVPacket
//!
//! Provides RAII-based memory management for encoded data. Fields are read
//! straight from the [`AVPacket`] mirror; allocation and freeing always go
//! through libavcodec.

use crate::ffi::{
  self,
  avcodec::{
    av_new_packet, av_packet_alloc, av_packet_free, av_packet_get_side_data,
    av_packet_new_side_data, av_packet_ref, av_packet_rescale_ts, av_packet_unref,
  },
  pkt_flag, AVPacket, AVRational,
};
use crate::{Error, Result};
use std::os::raw::c_int;
use std::ptr::{self, NonNull};

/// Safe wrapper around AVPacket with RAII cleanup
pub struct Packet {
  ptr: NonNull<AVPacket>,
}

impl Packet {
  /// Allocate a new empty packet
  pub fn new() -> Result<Self> {
    let ptr = unsafe { av_packet_alloc()? };
    NonNull::new(ptr)
      .map(|ptr| Self { ptr })
      .ok_or(Error::AllocationFailed("AVPacket"))
  }

  /// Allocate a packet holding a copy of `data`
  pub fn from_slice(data: &[u8]) -> Result<Self> {
    let size = c_int::try_from(data.len())
      .map_err(|_| Error::InvalidArgument(format!("packet of {} bytes is too large", data.len())))?;

    let mut pkt = Self::new()?;
    let ret = unsafe { av_new_packet(pkt.as_mut_ptr(), size)? };
    ffi::check_error(ret)?;

    if !data.is_empty() {
      // av_new_packet allocated `size` bytes plus zeroed padding
      unsafe { ptr::copy_nonoverlapping(data.as_ptr(), pkt.raw().data, data.len()) };
    }
    Ok(pkt)
  }

  /// Create a Packet from a raw pointer (takes ownership)
  ///
  /// # Safety
  /// The pointer must be a valid AVPacket allocated by `av_packet_alloc`
  pub unsafe fn from_raw(ptr: *mut AVPacket) -> Option<Self> {
    NonNull::new(ptr).map(|ptr| Self { ptr })
  }

  /// Get the raw pointer (for FFmpeg API calls)
  #[inline]
  pub fn as_ptr(&self) -> *const AVPacket {
    self.ptr.as_ptr()
  }

  /// Get the mutable raw pointer (for FFmpeg API calls)
  #[inline]
  pub fn as_mut_ptr(&mut self) -> *mut AVPacket {
    self.ptr.as_ptr()
  }

  /// Consume the Packet and return the raw pointer
  /// The caller is responsible for freeing the packet
  pub fn into_raw(self) -> *mut AVPacket {
    let ptr = self.ptr.as_ptr();
    std::mem::forget(self);
    ptr
  }

  #[inline]
  fn raw(&self) -> &AVPacket {
    // SAFETY: ptr came from av_packet_alloc and is owned by self
    unsafe { self.ptr.as_ref() }
  }

  #[inline]
  fn raw_mut(&mut self) -> &mut AVPacket {
    // SAFETY: as above, and &mut self guarantees exclusive access
    unsafe { self.ptr.as_mut() }
  }

  // ========================================================================
  // Data Access
  // ========================================================================

  /// Get pointer to packet data
  pub fn data(&self) -> *const u8 {
    self.raw().data
  }

  /// Get packet data as a slice
  pub fn as_slice(&self) -> &[u8] {
    let ptr = self.data();
    let size = self.size();
    if ptr.is_null() || size <= 0 {
      &[]
    } else {
      unsafe { std::slice::from_raw_parts(ptr, size as usize) }
    }
  }

  /// Get packet size in bytes
  #[inline]
  pub fn size(&self) -> i32 {
    self.raw().size
  }

  /// Check if packet has data
  #[inline]
  pub fn is_empty(&self) -> bool {
    self.size() == 0
  }

  /// Copy packet data to a new Vec
  pub fn to_vec(&self) -> Vec<u8> {
    self.as_slice().to_vec()
  }

  // ========================================================================
  // Timestamps
  // ========================================================================

  /// Get presentation timestamp
  #[inline]
  pub fn pts(&self) -> i64 {
    self.raw().pts
  }

  /// Set presentation timestamp
  #[inline]
  pub fn set_pts(&mut self, pts: i64) {
    self.raw_mut().pts = pts;
  }

  /// Get decoding timestamp
  #[inline]
  pub fn dts(&self) -> i64 {
    self.raw().dts
  }

  /// Set decoding timestamp
  #[inline]
  pub fn set_dts(&mut self, dts: i64) {
    self.raw_mut().dts = dts;
  }

  /// Get duration
  #[inline]
  pub fn duration(&self) -> i64 {
    self.raw().duration
  }

  /// Set duration
  #[inline]
  pub fn set_duration(&mut self, duration: i64) {
    self.raw_mut().duration = duration;
  }

  /// Time base of the timestamps, 0/1 when unset
  #[inline]
  pub fn time_base(&self) -> AVRational {
    self.raw().time_base
  }

  #[inline]
  pub fn set_time_base(&mut self, time_base: AVRational) {
    self.raw_mut().time_base = time_base;
  }

  /// Convert pts, dts and duration from one time base to another
  pub fn rescale_ts(&mut self, from: AVRational, to: AVRational) -> Result<()> {
    unsafe { av_packet_rescale_ts(self.as_mut_ptr(), from, to)? };
    Ok(())
  }

  // ========================================================================
  // Stream Info
  // ========================================================================

  #[inline]
  pub fn stream_index(&self) -> i32 {
    self.raw().stream_index
  }

  #[inline]
  pub fn set_stream_index(&mut self, index: i32) {
    self.raw_mut().stream_index = index;
  }

  /// Byte position in the source stream, -1 if unknown
  #[inline]
  pub fn pos(&self) -> i64 {
    self.raw().pos
  }

  // ========================================================================
  // Flags
  // ========================================================================

  /// Get packet flags
  #[inline]
  pub fn flags(&self) -> i32 {
    self.raw().flags
  }

  /// Set packet flags
  #[inline]
  pub fn set_flags(&mut self, flags: i32) {
    self.raw_mut().flags = flags;
  }

  /// Check if this is a key frame packet
  #[inline]
  pub fn is_key(&self) -> bool {
    (self.flags() & pkt_flag::KEY) != 0
  }

  /// Check if packet is corrupted
  #[inline]
  pub fn is_corrupt(&self) -> bool {
    (self.flags() & pkt_flag::CORRUPT) != 0
  }

  // ========================================================================
  // Side Data
  // ========================================================================

  /// Side data of the given type (see `ffi::avcodec::packet_side_data`)
  pub fn side_data(&self, kind: i32) -> Result<Option<&[u8]>> {
    let mut size = 0usize;
    let data = unsafe { av_packet_get_side_data(self.as_ptr(), kind, &mut size)? };
    if data.is_null() {
      return Ok(None);
    }
    Ok(Some(unsafe { std::slice::from_raw_parts(data, size) }))
  }

  /// Attach a copy of `data` as side data of the given type
  pub fn add_side_data(&mut self, kind: i32, data: &[u8]) -> Result<()> {
    let dst = unsafe { av_packet_new_side_data(self.as_mut_ptr(), kind, data.len())? };
    if dst.is_null() {
      return Err(Error::AllocationFailed("AVPacket side data"));
    }
    unsafe { ptr::copy_nonoverlapping(data.as_ptr(), dst, data.len()) };
    Ok(())
  }

  /// Number of side data entries attached to the packet
  #[inline]
  pub fn side_data_len(&self) -> usize {
    self.raw().side_data_elems.max(0) as usize
  }

  // ========================================================================
  // Lifecycle
  // ========================================================================

  /// Unreference the packet data
  pub fn unref(&mut self) -> Result<()> {
    unsafe { av_packet_unref(self.as_mut_ptr())? };
    Ok(())
  }

  /// Create a new reference to this packet's data
  pub fn try_clone(&self) -> Result<Self> {
    let mut new_pkt = Self::new()?;
    let ret = unsafe { av_packet_ref(new_pkt.as_mut_ptr(), self.as_ptr())? };
    ffi::check_error(ret)?;
    Ok(new_pkt)
  }
}

impl Drop for Packet {
  fn drop(&mut self) {
    let mut ptr = self.ptr.as_ptr();
    if let Err(e) = unsafe { av_packet_free(&mut ptr) } {
      tracing::warn!(target: "ffmpeg_dynload", error = %e, "leaking AVPacket");
    }
  }
}

// Packet data can be sent between threads
unsafe impl Send for Packet {}

impl std::fmt::Debug for Packet {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Packet")
      .field("size", &self.size())
      .field("pts", &self.pts())
      .field("dts", &self.dts())
      .field("stream_index", &self.stream_index())
      .field("is_key", &self.is_key())
      .finish()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::ffi::avcodec::packet_side_data;
  use crate::ffi::AV_NOPTS_VALUE;

  // These run against the system FFmpeg and are skipped when it is missing
  fn packet() -> Option<Packet> {
    match Packet::new() {
      Ok(pkt) => Some(pkt),
      Err(e) => {
        eprintln!("skipping: {e}");
        None
      }
    }
  }

  #[test]
  fn test_packet_allocation() {
    let Some(pkt) = packet() else { return };
    assert!(pkt.is_empty());
    assert_eq!(pkt.size(), 0);
    assert_eq!(pkt.pts(), AV_NOPTS_VALUE);
    assert_eq!(pkt.pos(), -1);
  }

  #[test]
  fn test_fields_round_trip() {
    let Some(mut pkt) = packet() else { return };
    pkt.set_pts(90_000);
    pkt.set_dts(87_000);
    pkt.set_duration(3_000);
    pkt.set_stream_index(1);
    pkt.set_flags(pkt_flag::KEY);

    assert_eq!(pkt.pts(), 90_000);
    assert_eq!(pkt.dts(), 87_000);
    assert_eq!(pkt.duration(), 3_000);
    assert_eq!(pkt.stream_index(), 1);
    assert!(pkt.is_key());
    assert!(!pkt.is_corrupt());
  }

  #[test]
  fn test_data_and_clone() {
    if packet().is_none() {
      return;
    }
    let payload = [0u8, 0, 0, 1, 0x65, 0x88];
    let pkt = Packet::from_slice(&payload).unwrap();
    assert_eq!(pkt.as_slice(), &payload);

    let copy = pkt.try_clone().unwrap();
    assert_eq!(copy.to_vec(), payload);
    // av_packet_ref shares the refcounted buffer
    assert_eq!(copy.data(), pkt.data());
  }

  #[test]
  fn test_side_data() {
    let Some(mut pkt) = packet() else { return };
    assert!(pkt.side_data(packet_side_data::SKIP_SAMPLES).unwrap().is_none());

    pkt.add_side_data(packet_side_data::SKIP_SAMPLES, &[1, 2, 3, 4]).unwrap();
    assert_eq!(pkt.side_data_len(), 1);
    assert_eq!(
      pkt.side_data(packet_side_data::SKIP_SAMPLES).unwrap(),
      Some(&[1u8, 2, 3, 4][..])
    );
  }

  #[test]
  fn test_rescale_ts() {
    let Some(mut pkt) = packet() else { return };
    pkt.set_pts(1);
    pkt.set_dts(1);
    pkt.rescale_ts(AVRational::new(1, 30), AVRational::new(1, 90_000)).unwrap();
    assert_eq!(pkt.pts(), 3_000);
    assert_eq!(pkt.dts(), 3_000);
  }
}
