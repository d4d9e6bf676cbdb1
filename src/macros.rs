//! Wrapper generation for lazily bound FFmpeg functions

/// Declare FFmpeg functions that are resolved from a shared library on first
/// call.
///
/// Each prototype becomes a `pub unsafe fn` with the same arguments whose
/// result is wrapped in [`LoadResult`](crate::loader::LoadResult). The function
/// owns a `static` [`Symbol`](crate::loader::Symbol) bound through
/// [`Registry::global`](crate::loader::Registry::global).
///
/// ```ignore
/// dynamic_functions! {
///   LibraryId::Avutil;
///
///   /// Return the LIBAVUTIL_VERSION_INT constant
///   pub fn avutil_version() -> c_uint;
/// }
/// ```
macro_rules! dynamic_functions {
  (@ret) => { () };
  (@ret $ret:ty) => { $ret };

  (
    $library:expr;
    $(
      $(#[$meta:meta])*
      pub fn $name:ident($($arg:ident: $ty:ty),* $(,)?) $(-> $ret:ty)?;
    )*
  ) => {
    $(
      $(#[$meta])*
      #[allow(non_snake_case, clippy::too_many_arguments, clippy::missing_safety_doc)]
      #[inline]
      pub unsafe fn $name($($arg: $ty),*) -> $crate::loader::LoadResult<dynamic_functions!(@ret $($ret)?)> {
        static SYMBOL: $crate::loader::Symbol<
          unsafe extern "C" fn($($ty),*) -> dynamic_functions!(@ret $($ret)?),
        > = unsafe { $crate::loader::Symbol::new($library, stringify!($name)) };

        let f = SYMBOL.get($crate::loader::Registry::global())?;
        Ok(unsafe { f($($arg),*) })
      }
    )*
  };
}
