//! Control over FFmpeg's own log output

use std::os::raw::c_int;

use crate::ffi::avutil::{self, log_level};
use crate::Result;

/// FFmpeg log levels, from quietest to most verbose
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LogLevel {
  Quiet,
  Panic,
  Fatal,
  Error,
  Warning,
  Info,
  Verbose,
  Debug,
  Trace,
}

impl LogLevel {
  pub const fn as_raw(self) -> c_int {
    match self {
      LogLevel::Quiet => log_level::QUIET,
      LogLevel::Panic => log_level::PANIC,
      LogLevel::Fatal => log_level::FATAL,
      LogLevel::Error => log_level::ERROR,
      LogLevel::Warning => log_level::WARNING,
      LogLevel::Info => log_level::INFO,
      LogLevel::Verbose => log_level::VERBOSE,
      LogLevel::Debug => log_level::DEBUG,
      LogLevel::Trace => log_level::TRACE,
    }
  }

  /// Map a raw level to the closest named level at or below it
  pub const fn from_raw(level: c_int) -> Self {
    match level {
      l if l < log_level::PANIC => LogLevel::Quiet,
      l if l < log_level::FATAL => LogLevel::Panic,
      l if l < log_level::ERROR => LogLevel::Fatal,
      l if l < log_level::WARNING => LogLevel::Error,
      l if l < log_level::INFO => LogLevel::Warning,
      l if l < log_level::VERBOSE => LogLevel::Info,
      l if l < log_level::DEBUG => LogLevel::Verbose,
      l if l < log_level::TRACE => LogLevel::Debug,
      _ => LogLevel::Trace,
    }
  }
}

/// Set the level below which FFmpeg drops its log messages
pub fn set_level(level: LogLevel) -> Result<()> {
  unsafe { avutil::av_log_set_level(level.as_raw())? };
  tracing::debug!(target: "ffmpeg_dynload", ?level, "set FFmpeg log level");
  Ok(())
}

/// Current FFmpeg log level
pub fn level() -> Result<LogLevel> {
  let raw = unsafe { avutil::av_log_get_level()? };
  Ok(LogLevel::from_raw(raw))
}
