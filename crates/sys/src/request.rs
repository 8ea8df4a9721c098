use std::os::raw::c_int;

use crate::base::cef_base_ref_counted_t;
use crate::string::{cef_string_multimap_t, cef_string_t, cef_string_userfree_t};

/// A network request. Setters fail silently on read-only requests.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct cef_request_t {
	pub base: cef_base_ref_counted_t,
	pub is_read_only: Option<unsafe extern "C" fn(self_: *mut cef_request_t) -> c_int>,
	pub get_url: Option<unsafe extern "C" fn(self_: *mut cef_request_t) -> cef_string_userfree_t>,
	pub set_url: Option<unsafe extern "C" fn(self_: *mut cef_request_t, url: *const cef_string_t)>,
	pub get_method: Option<unsafe extern "C" fn(self_: *mut cef_request_t) -> cef_string_userfree_t>,
	pub set_method:
		Option<unsafe extern "C" fn(self_: *mut cef_request_t, method: *const cef_string_t)>,
	/// Header names are matched case-insensitively.
	pub get_header_by_name: Option<
		unsafe extern "C" fn(self_: *mut cef_request_t, name: *const cef_string_t)
			-> cef_string_userfree_t,
	>,
	pub set_header_by_name: Option<
		unsafe extern "C" fn(
			self_: *mut cef_request_t,
			name: *const cef_string_t,
			value: *const cef_string_t,
			overwrite: c_int,
		),
	>,
	/// Fills `header_map`, which stays owned by the caller.
	pub get_header_map:
		Option<unsafe extern "C" fn(self_: *mut cef_request_t, header_map: cef_string_multimap_t)>,
	pub set_header_map:
		Option<unsafe extern "C" fn(self_: *mut cef_request_t, header_map: cef_string_multimap_t)>,
	pub get_identifier: Option<unsafe extern "C" fn(self_: *mut cef_request_t) -> u64>,
}
