//! Logical FFmpeg library identifiers and platform file naming

use std::fmt;
use std::str::FromStr;

use super::LoadError;

/// One of the FFmpeg shared libraries this crate can bind against
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LibraryId {
  Avutil,
  Avcodec,
  Avformat,
  Avdevice,
  Avfilter,
  Swscale,
  Swresample,
  Postproc,
}

impl LibraryId {
  pub(crate) const COUNT: usize = 8;

  /// Every library, in dependency order (dependencies first)
  pub const ALL: [LibraryId; Self::COUNT] = [
    LibraryId::Avutil,
    LibraryId::Swresample,
    LibraryId::Swscale,
    LibraryId::Postproc,
    LibraryId::Avcodec,
    LibraryId::Avformat,
    LibraryId::Avfilter,
    LibraryId::Avdevice,
  ];

  /// Logical name, which is also the file stem without the `lib` prefix
  pub const fn name(self) -> &'static str {
    match self {
      Self::Avutil => "avutil",
      Self::Avcodec => "avcodec",
      Self::Avformat => "avformat",
      Self::Avdevice => "avdevice",
      Self::Avfilter => "avfilter",
      Self::Swscale => "swscale",
      Self::Swresample => "swresample",
      Self::Postproc => "postproc",
    }
  }

  /// Major versions this crate binds against, newest first
  ///
  /// FFmpeg 7.x then FFmpeg 6.x.
  pub const fn supported_majors(self) -> &'static [u32] {
    match self {
      Self::Avutil => &[59, 58],
      Self::Avcodec => &[61, 60],
      Self::Avformat => &[61, 60],
      Self::Avdevice => &[61, 60],
      Self::Avfilter => &[10, 9],
      Self::Swscale => &[8, 7],
      Self::Swresample => &[5, 4],
      Self::Postproc => &[58, 57],
    }
  }

  /// Major version shipped with FFmpeg 7.1
  pub const fn major_version(self) -> u32 {
    self.supported_majors()[0]
  }

  /// Libraries this one links against, opened first when possible
  pub const fn dependencies(self) -> &'static [LibraryId] {
    match self {
      Self::Avutil => &[],
      Self::Avcodec
      | Self::Avfilter
      | Self::Swscale
      | Self::Swresample
      | Self::Postproc => &[Self::Avutil],
      Self::Avformat => &[Self::Avutil, Self::Avcodec],
      Self::Avdevice => &[Self::Avutil, Self::Avcodec, Self::Avformat, Self::Avfilter],
    }
  }

  /// Environment variable holding an explicit path for this library
  ///
  /// e.g. `FFMPEG_AVCODEC_PATH`
  pub fn env_var(self) -> String {
    format!("FFMPEG_{}_PATH", self.name().to_ascii_uppercase())
  }

  /// Platform default file names for the running OS
  ///
  /// One versioned name per supported major, newest first, then the
  /// unversioned name.
  pub fn default_file_names(self) -> Vec<String> {
    self.file_names_for(std::env::consts::OS)
  }

  /// File names for the given target OS (as in `std::env::consts::OS`)
  pub fn file_names_for(self, os: &str) -> Vec<String> {
    let name = self.name();
    let versioned = |major: &u32| match os {
      "windows" => format!("{name}-{major}.dll"),
      "macos" | "ios" => format!("lib{name}.{major}.dylib"),
      _ => format!("lib{name}.so.{major}"),
    };
    let unversioned = match os {
      "windows" => format!("{name}.dll"),
      "macos" | "ios" => format!("lib{name}.dylib"),
      _ => format!("lib{name}.so"),
    };

    let mut names: Vec<String> = self.supported_majors().iter().map(versioned).collect();
    names.push(unversioned);
    names
  }
}

impl fmt::Display for LibraryId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.name())
  }
}

impl FromStr for LibraryId {
  type Err = LoadError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let lower = s.trim().to_ascii_lowercase();
    let name = lower.strip_prefix("lib").unwrap_or(&lower);
    match name {
      "avutil" => Ok(Self::Avutil),
      "avcodec" => Ok(Self::Avcodec),
      "avformat" => Ok(Self::Avformat),
      "avdevice" => Ok(Self::Avdevice),
      "avfilter" => Ok(Self::Avfilter),
      "swscale" | "avswscale" => Ok(Self::Swscale),
      "swresample" | "avswresample" => Ok(Self::Swresample),
      "postproc" | "avpostproc" => Ok(Self::Postproc),
      _ => Err(LoadError::UnknownLibrary(s.to_string())),
    }
  }
}
