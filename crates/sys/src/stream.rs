use std::os::raw::{c_int, c_void};

use crate::base::cef_base_ref_counted_t;

/// Implemented by the client to feed a stream reader.
///
/// Methods may be called on any thread.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct cef_read_handler_t {
	pub base: cef_base_ref_counted_t,
	/// Reads up to `n` items of `size` bytes into `ptr`. Returns the number of
	/// items read.
	pub read: Option<
		unsafe extern "C" fn(self_: *mut cef_read_handler_t, ptr: *mut c_void, size: usize, n: usize)
			-> usize,
	>,
	/// Returns 0 on success.
	pub seek:
		Option<unsafe extern "C" fn(self_: *mut cef_read_handler_t, offset: i64, whence: c_int) -> c_int>,
	pub tell: Option<unsafe extern "C" fn(self_: *mut cef_read_handler_t) -> i64>,
	pub eof: Option<unsafe extern "C" fn(self_: *mut cef_read_handler_t) -> c_int>,
	pub may_block: Option<unsafe extern "C" fn(self_: *mut cef_read_handler_t) -> c_int>,
}

/// Engine stream over a byte buffer or a client read handler.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct cef_stream_reader_t {
	pub base: cef_base_ref_counted_t,
	pub read: Option<
		unsafe extern "C" fn(self_: *mut cef_stream_reader_t, ptr: *mut c_void, size: usize, n: usize)
			-> usize,
	>,
	/// Returns 0 on success.
	pub seek: Option<
		unsafe extern "C" fn(self_: *mut cef_stream_reader_t, offset: i64, whence: c_int) -> c_int,
	>,
	pub tell: Option<unsafe extern "C" fn(self_: *mut cef_stream_reader_t) -> i64>,
	pub eof: Option<unsafe extern "C" fn(self_: *mut cef_stream_reader_t) -> c_int>,
	pub may_block: Option<unsafe extern "C" fn(self_: *mut cef_stream_reader_t) -> c_int>,
}
