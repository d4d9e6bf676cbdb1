//! Library overrides on the global registry
//!
//! Lives in its own test binary so the bogus path cannot leak into other
//! tests sharing the process-wide registry.

use ffmpeg_dynload::ffi::avfilter;
use ffmpeg_dynload::loader::{self, LibraryId, LoadError, Registry};

#[test]
fn wrong_override_fails_then_corrected_override_loads() {
  let _ = tracing_subscriber::fmt().with_test_writer().try_init();

  let bogus = "/nonexistent/ffmpeg/libavfilter-override";
  loader::set_library_path(LibraryId::Avfilter, bogus).unwrap();

  let err = unsafe { avfilter::avfilter_version() }.unwrap_err();
  match &err {
    // libavutil is missing too, and is reported instead
    LoadError::DependencyFailed { .. } => {
      eprintln!("skipping, FFmpeg not available: {err}");
      return;
    }
    LoadError::LibraryNotFound { library, attempted, .. } => {
      assert_eq!(*library, LibraryId::Avfilter);
      assert_eq!(attempted.len(), 1, "an override is the only path attempted");
      assert_eq!(attempted[0].to_str(), Some(bogus));
    }
    other => panic!("unexpected error: {other}"),
  }

  // Same configuration, same cached failure
  assert_eq!(unsafe { avfilter::avfilter_version() }.unwrap_err(), err);

  let epoch = Registry::global().epoch();
  let default_name = LibraryId::Avfilter.default_file_names().remove(0);
  loader::set_library_path(LibraryId::Avfilter, &default_name).unwrap();
  assert!(Registry::global().epoch() > epoch);

  match unsafe { avfilter::avfilter_version() } {
    Ok(raw) => {
      assert!(LibraryId::Avfilter.supported_majors().contains(&(raw >> 16)));
      assert!(matches!(
        loader::set_library_path(LibraryId::Avfilter, bogus),
        Err(LoadError::AlreadyLoaded(LibraryId::Avfilter))
      ));
    }
    Err(e) => eprintln!("skipping, libavfilter not available: {e}"),
  }
}
