use std::os::raw::{c_char, c_int, c_void};

use crate::request::cef_request_t;
use crate::request_context::cef_request_context_t;
use crate::stream::{cef_read_handler_t, cef_stream_reader_t};
use crate::string::{
	char16_t, cef_string_list_t, cef_string_map_t, cef_string_multimap_t, cef_string_t,
	cef_string_userfree_utf16_t,
};
use crate::types::cef_thread_id_t;
use crate::values::{cef_binary_value_t, cef_dictionary_value_t, cef_list_value_t, cef_value_t};

/// API hash these bindings were generated against, as returned by
/// `cef_api_hash(0)`.
pub const CEF_API_HASH_UNIVERSAL: &str = "b8e1ec8a1cd1bd1a5ea2ac6f5bca8d8c9e0e6d7b";

/// Global entry points exported by the engine library.
///
/// Field names match the exported symbols without their `cef_` prefix.
#[derive(Clone, Copy)]
pub struct CefApi {
	// Strings.
	/// Sets `output` from `len` units at `src`. When `copy` is 0 the buffer is
	/// borrowed and no destructor is installed.
	pub string_utf16_set: unsafe extern "C" fn(
		src: *const char16_t,
		src_len: usize,
		output: *mut cef_string_t,
		copy: c_int,
	) -> c_int,
	pub string_utf16_clear: unsafe extern "C" fn(str_: *mut cef_string_t),
	pub string_userfree_utf16_alloc: unsafe extern "C" fn() -> cef_string_userfree_utf16_t,
	pub string_userfree_utf16_free: unsafe extern "C" fn(str_: cef_string_userfree_utf16_t),

	// String lists.
	pub string_list_alloc: unsafe extern "C" fn() -> cef_string_list_t,
	pub string_list_size: unsafe extern "C" fn(list: cef_string_list_t) -> usize,
	pub string_list_value:
		unsafe extern "C" fn(list: cef_string_list_t, index: usize, value: *mut cef_string_t) -> c_int,
	pub string_list_append: unsafe extern "C" fn(list: cef_string_list_t, value: *const cef_string_t),
	pub string_list_clear: unsafe extern "C" fn(list: cef_string_list_t),
	pub string_list_free: unsafe extern "C" fn(list: cef_string_list_t),

	// String maps.
	pub string_map_alloc: unsafe extern "C" fn() -> cef_string_map_t,
	pub string_map_size: unsafe extern "C" fn(map: cef_string_map_t) -> usize,
	pub string_map_find: unsafe extern "C" fn(
		map: cef_string_map_t,
		key: *const cef_string_t,
		value: *mut cef_string_t,
	) -> c_int,
	pub string_map_key:
		unsafe extern "C" fn(map: cef_string_map_t, index: usize, key: *mut cef_string_t) -> c_int,
	pub string_map_value:
		unsafe extern "C" fn(map: cef_string_map_t, index: usize, value: *mut cef_string_t) -> c_int,
	pub string_map_append: unsafe extern "C" fn(
		map: cef_string_map_t,
		key: *const cef_string_t,
		value: *const cef_string_t,
	) -> c_int,
	pub string_map_clear: unsafe extern "C" fn(map: cef_string_map_t),
	pub string_map_free: unsafe extern "C" fn(map: cef_string_map_t),

	// String multimaps.
	pub string_multimap_alloc: unsafe extern "C" fn() -> cef_string_multimap_t,
	pub string_multimap_size: unsafe extern "C" fn(map: cef_string_multimap_t) -> usize,
	pub string_multimap_find_count:
		unsafe extern "C" fn(map: cef_string_multimap_t, key: *const cef_string_t) -> usize,
	pub string_multimap_enumerate: unsafe extern "C" fn(
		map: cef_string_multimap_t,
		key: *const cef_string_t,
		value_index: usize,
		value: *mut cef_string_t,
	) -> c_int,
	pub string_multimap_key:
		unsafe extern "C" fn(map: cef_string_multimap_t, index: usize, key: *mut cef_string_t) -> c_int,
	pub string_multimap_value: unsafe extern "C" fn(
		map: cef_string_multimap_t,
		index: usize,
		value: *mut cef_string_t,
	) -> c_int,
	pub string_multimap_append: unsafe extern "C" fn(
		map: cef_string_multimap_t,
		key: *const cef_string_t,
		value: *const cef_string_t,
	) -> c_int,
	pub string_multimap_clear: unsafe extern "C" fn(map: cef_string_multimap_t),
	pub string_multimap_free: unsafe extern "C" fn(map: cef_string_multimap_t),

	// Object factories. Each returns a new reference or null.
	pub binary_value_create:
		unsafe extern "C" fn(data: *const c_void, data_size: usize) -> *mut cef_binary_value_t,
	pub dictionary_value_create: unsafe extern "C" fn() -> *mut cef_dictionary_value_t,
	pub list_value_create: unsafe extern "C" fn() -> *mut cef_list_value_t,
	pub value_create: unsafe extern "C" fn() -> *mut cef_value_t,
	pub request_create: unsafe extern "C" fn() -> *mut cef_request_t,
	pub request_context_get_global_context: unsafe extern "C" fn() -> *mut cef_request_context_t,
	/// `other` is borrowed; the new context shares its storage.
	pub request_context_create_context:
		unsafe extern "C" fn(other: *mut cef_request_context_t) -> *mut cef_request_context_t,
	pub stream_reader_create_for_data:
		unsafe extern "C" fn(data: *mut c_void, size: usize) -> *mut cef_stream_reader_t,
	pub stream_reader_create_for_handler:
		unsafe extern "C" fn(handler: *mut cef_read_handler_t) -> *mut cef_stream_reader_t,

	// Threads and versioning.
	pub currently_on: unsafe extern "C" fn(thread_id: cef_thread_id_t) -> c_int,
	/// Returns a static NUL-terminated string. Entry 0 is the universal hash.
	pub api_hash: unsafe extern "C" fn(entry: c_int) -> *const c_char,
}

impl std::fmt::Debug for CefApi {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("CefApi").finish_non_exhaustive()
	}
}
