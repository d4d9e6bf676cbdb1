//! Build script for ffmpeg-dynload
//!
//! FFmpeg is never linked at build time; symbols are resolved at runtime.
//! The only build step is the NAPI-RS setup for the optional Node.js surface.

fn main() {
  #[cfg(feature = "node")]
  napi_build::setup();

  println!("cargo:rerun-if-changed=build.rs");
}
