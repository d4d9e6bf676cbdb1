//! Safe wrapper around FFmpeg AVDictionary
//!
//! An empty dictionary is a NULL pointer on the FFmpeg side; the first
//! `av_dict_set` allocates it.

use crate::ffi::{
  self,
  avutil::{
    av_dict_copy, av_dict_count, av_dict_free, av_dict_get, av_dict_iterate, av_dict_set,
    av_dict_set_int, dict_flag,
  },
  AVDictionary,
};
use crate::Result;
use std::ffi::CStr;
use std::ptr;

/// Owned key/value options, passed to FFmpeg as `AVDictionary **`
pub struct Dictionary {
  ptr: *mut AVDictionary,
}

impl Dictionary {
  /// Create an empty dictionary (no allocation until the first insert)
  pub fn new() -> Self {
    Self { ptr: ptr::null_mut() }
  }

  /// Build a dictionary from key/value pairs
  pub fn from_pairs<K, V, I>(pairs: I) -> Result<Self>
  where
    K: AsRef<str>,
    V: AsRef<str>,
    I: IntoIterator<Item = (K, V)>,
  {
    let mut dict = Self::new();
    for (key, value) in pairs {
      dict.set(key.as_ref(), value.as_ref())?;
    }
    Ok(dict)
  }

  /// Take ownership of a dictionary allocated by FFmpeg
  ///
  /// # Safety
  /// `ptr` must be NULL or a dictionary that is not freed elsewhere
  pub unsafe fn from_raw(ptr: *mut AVDictionary) -> Self {
    Self { ptr }
  }

  /// Give up ownership; the caller must free the result with `av_dict_free`
  pub fn into_raw(self) -> *mut AVDictionary {
    let ptr = self.ptr;
    std::mem::forget(self);
    ptr
  }

  #[inline]
  pub fn as_ptr(&self) -> *const AVDictionary {
    self.ptr
  }

  /// Pointer to pass where FFmpeg takes `AVDictionary **options`
  ///
  /// FFmpeg may replace the dictionary, e.g. `avcodec_open2` leaves only the
  /// options it did not consume.
  #[inline]
  pub fn as_mut_ptr(&mut self) -> *mut *mut AVDictionary {
    &mut self.ptr
  }

  /// Set `key` to `value`, replacing any previous value
  pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
    let key = ffi::to_cstring(key)?;
    let value = ffi::to_cstring(value)?;
    let ret = unsafe { av_dict_set(&mut self.ptr, key.as_ptr(), value.as_ptr(), 0)? };
    ffi::check_error(ret)?;
    Ok(())
  }

  /// Set `key` to the decimal representation of `value`
  pub fn set_int(&mut self, key: &str, value: i64) -> Result<()> {
    let key = ffi::to_cstring(key)?;
    let ret = unsafe { av_dict_set_int(&mut self.ptr, key.as_ptr(), value, 0)? };
    ffi::check_error(ret)?;
    Ok(())
  }

  /// Remove `key`; missing keys are ignored
  pub fn remove(&mut self, key: &str) -> Result<()> {
    if self.ptr.is_null() {
      return Ok(());
    }
    let key = ffi::to_cstring(key)?;
    let ret = unsafe { av_dict_set(&mut self.ptr, key.as_ptr(), ptr::null(), 0)? };
    ffi::check_error(ret)?;
    Ok(())
  }

  /// Value stored under `key` (case-sensitive)
  pub fn get(&self, key: &str) -> Result<Option<String>> {
    if self.ptr.is_null() {
      return Ok(None);
    }
    let key = ffi::to_cstring(key)?;
    let entry = unsafe { av_dict_get(self.ptr, key.as_ptr(), ptr::null(), dict_flag::MATCH_CASE)? };
    if entry.is_null() {
      return Ok(None);
    }
    Ok(Some(unsafe { lossy((*entry).value) }))
  }

  pub fn len(&self) -> Result<usize> {
    if self.ptr.is_null() {
      return Ok(0);
    }
    Ok(unsafe { av_dict_count(self.ptr)? }.max(0) as usize)
  }

  pub fn is_empty(&self) -> bool {
    self.ptr.is_null() || matches!(self.len(), Ok(0))
  }

  /// All entries in insertion order
  pub fn entries(&self) -> Result<Vec<(String, String)>> {
    let mut entries = Vec::new();
    if self.ptr.is_null() {
      return Ok(entries);
    }

    let mut entry = ptr::null();
    loop {
      entry = unsafe { av_dict_iterate(self.ptr, entry)? };
      if entry.is_null() {
        break;
      }
      let (key, value) = unsafe { ((*entry).key, (*entry).value) };
      entries.push(unsafe { (lossy(key), lossy(value)) });
    }
    Ok(entries)
  }

  /// Deep copy of the dictionary
  pub fn try_clone(&self) -> Result<Self> {
    let mut copy = Self::new();
    if !self.ptr.is_null() {
      let ret = unsafe { av_dict_copy(&mut copy.ptr, self.ptr, 0)? };
      ffi::check_error(ret)?;
    }
    Ok(copy)
  }
}

impl Default for Dictionary {
  fn default() -> Self {
    Self::new()
  }
}

impl Drop for Dictionary {
  fn drop(&mut self) {
    if self.ptr.is_null() {
      return;
    }
    if let Err(e) = unsafe { av_dict_free(&mut self.ptr) } {
      tracing::warn!(target: "ffmpeg_dynload", error = %e, "leaking AVDictionary");
    }
  }
}

unsafe impl Send for Dictionary {}

impl std::fmt::Debug for Dictionary {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self.entries() {
      Ok(entries) => f.debug_map().entries(entries).finish(),
      Err(_) => f.debug_struct("Dictionary").field("ptr", &self.ptr).finish(),
    }
  }
}

unsafe fn lossy(ptr: *const std::os::raw::c_char) -> String {
  if ptr.is_null() {
    return String::new();
  }
  unsafe { CStr::from_ptr(ptr) }.to_string_lossy().into_owned()
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::Error;

  #[test]
  fn test_empty_dictionary_needs_no_library() {
    let dict = Dictionary::new();
    assert!(dict.is_empty());
    assert_eq!(dict.len().unwrap(), 0);
    assert_eq!(dict.get("preset").unwrap(), None);
    assert!(dict.entries().unwrap().is_empty());
    assert!(dict.as_ptr().is_null());
  }

  #[test]
  fn test_rejects_interior_nul() {
    let mut dict = Dictionary::new();
    let err = dict.set("bad\0key", "x").unwrap_err();
    assert!(matches!(err, Error::InvalidArgument(_)));
  }

  #[test]
  fn test_set_get_iterate() {
    let mut dict = Dictionary::new();
    if let Err(e) = dict.set("preset", "fast") {
      eprintln!("skipping: {e}");
      return;
    }
    dict.set_int("crf", 23).unwrap();
    dict.set("tune", "zerolatency").unwrap();

    assert_eq!(dict.len().unwrap(), 3);
    assert_eq!(dict.get("crf").unwrap().as_deref(), Some("23"));
    assert_eq!(dict.get("PRESET").unwrap(), None);

    dict.remove("tune").unwrap();
    assert_eq!(
      dict.entries().unwrap(),
      vec![
        ("preset".to_string(), "fast".to_string()),
        ("crf".to_string(), "23".to_string()),
      ]
    );

    let copy = dict.try_clone().unwrap();
    assert_ne!(copy.as_ptr(), dict.as_ptr());
    assert_eq!(copy.entries().unwrap(), dict.entries().unwrap());
  }
}
