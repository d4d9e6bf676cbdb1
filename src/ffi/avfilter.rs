//! libavfilter function declarations
//!
//! Provides filter lookup and filter graph construction.

use super::types::*;
use crate::loader::LibraryId;
use std::os::raw::{c_char, c_int, c_uint, c_void};
use std::ptr::NonNull;

dynamic_functions! {
  LibraryId::Avfilter;

  // ========================================================================
  // Library Information
  // ========================================================================

  /// Return the LIBAVFILTER_VERSION_INT constant
  pub fn avfilter_version() -> c_uint;

  /// Return the libavfilter build-time configuration
  pub fn avfilter_configuration() -> *const c_char;

  /// Return the libavfilter license
  pub fn avfilter_license() -> *const c_char;

  // ========================================================================
  // Filter Lookup
  // ========================================================================

  /// Get a filter definition matching the given name
  ///
  /// # Returns
  /// The filter definition, or NULL if none found
  pub fn avfilter_get_by_name(name: *const c_char) -> *const AVFilter;

  /// Iterate over all registered filters
  pub fn av_filter_iterate(opaque: *mut *mut c_void) -> *const AVFilter;

  // ========================================================================
  // Graph Lifecycle
  // ========================================================================

  /// Allocate a filter graph
  pub fn avfilter_graph_alloc() -> *mut AVFilterGraph;

  /// Free a graph, destroy its links, and set *graph to NULL
  pub fn avfilter_graph_free(graph: *mut *mut AVFilterGraph);

  /// Create and add a filter instance into an existing graph
  ///
  /// # Arguments
  /// * `filt_ctx` - Receives the created filter instance
  /// * `filt` - Filter definition to instantiate
  /// * `name` - Instance name
  /// * `args` - Option string passed to the filter
  /// * `opaque` - Passed to the filter's init callback
  /// * `graph_ctx` - Graph the instance is added to
  pub fn avfilter_graph_create_filter(
    filt_ctx: *mut *mut AVFilterContext,
    filt: *const AVFilter,
    name: *const c_char,
    args: *const c_char,
    opaque: *mut c_void,
    graph_ctx: *mut AVFilterGraph,
  ) -> c_int;

  /// Add a graph described by a string to a graph
  ///
  /// `inputs` and `outputs` are updated to the unlinked pads on return.
  pub fn avfilter_graph_parse_ptr(
    graph: *mut AVFilterGraph,
    filters: *const c_char,
    inputs: *mut *mut AVFilterInOut,
    outputs: *mut *mut AVFilterInOut,
    log_ctx: *mut c_void,
  ) -> c_int;

  /// Check validity and configure all the links and formats in the graph
  pub fn avfilter_graph_config(graphctx: *mut AVFilterGraph, log_ctx: *mut c_void) -> c_int;

  /// Dump a graph into a human-readable string, freed with av_free
  pub fn avfilter_graph_dump(graph: *mut AVFilterGraph, options: *const c_char) -> *mut c_char;

  /// Link two filters together
  pub fn avfilter_link(
    src: *mut AVFilterContext,
    srcpad: c_uint,
    dst: *mut AVFilterContext,
    dstpad: c_uint,
  ) -> c_int;

  // ========================================================================
  // Graph Endpoints
  // ========================================================================

  /// Allocate a single AVFilterInOut entry
  pub fn avfilter_inout_alloc() -> *mut AVFilterInOut;

  /// Free the supplied list of AVFilterInOut and set *inout to NULL
  pub fn avfilter_inout_free(inout: *mut *mut AVFilterInOut);

  // ========================================================================
  // Buffer Source / Sink
  // ========================================================================

  /// Add a frame to the buffer source
  pub fn av_buffersrc_add_frame_flags(ctx: *mut AVFilterContext, frame: *mut AVFrame, flags: c_int) -> c_int;

  /// Get a frame with filtered data from a sink and put it in frame
  pub fn av_buffersink_get_frame(ctx: *mut AVFilterContext, frame: *mut AVFrame) -> c_int;
}

/// Flags for `av_buffersrc_add_frame_flags`
pub mod buffersrc_flag {
  use std::os::raw::c_int;

  /// Do not check for format changes
  pub const NO_CHECK_FORMAT: c_int = 1;
  /// Immediately push the frame to the output
  pub const PUSH: c_int = 4;
  /// Keep a reference to the frame
  pub const KEEP_REF: c_int = 8;
}

/// Find a filter by name (e.g. "scale", "aresample")
pub fn find_filter(name: &str) -> crate::Result<Option<NonNull<AVFilter>>> {
  let c_name = super::to_cstring(name)?;
  let filter = unsafe { avfilter_get_by_name(c_name.as_ptr())? };
  Ok(NonNull::new(filter as *mut AVFilter))
}
