use std::os::raw::c_int;

use crate::base::cef_base_ref_counted_t;
use crate::callbacks::{cef_completion_callback_t, cef_resolve_callback_t};
use crate::string::{cef_string_list_t, cef_string_t, cef_string_userfree_t};
use crate::values::{cef_dictionary_value_t, cef_value_t};

/// Isolated browsing state (cookies, cache, preferences).
///
/// Preference methods must be called on the UI thread.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct cef_request_context_t {
	pub base: cef_base_ref_counted_t,
	pub is_same: Option<
		unsafe extern "C" fn(self_: *mut cef_request_context_t, other: *mut cef_request_context_t)
			-> c_int,
	>,
	pub is_sharing_with: Option<
		unsafe extern "C" fn(self_: *mut cef_request_context_t, other: *mut cef_request_context_t)
			-> c_int,
	>,
	pub is_global: Option<unsafe extern "C" fn(self_: *mut cef_request_context_t) -> c_int>,
	pub get_cache_path:
		Option<unsafe extern "C" fn(self_: *mut cef_request_context_t) -> cef_string_userfree_t>,
	/// Returns 0 on error.
	pub clear_scheme_handler_factories:
		Option<unsafe extern "C" fn(self_: *mut cef_request_context_t) -> c_int>,
	pub purge_plugin_list_cache:
		Option<unsafe extern "C" fn(self_: *mut cef_request_context_t, reload_pages: c_int)>,
	pub has_preference: Option<
		unsafe extern "C" fn(self_: *mut cef_request_context_t, name: *const cef_string_t) -> c_int,
	>,
	/// Returns a read-only copy, or null when the preference does not exist.
	pub get_preference: Option<
		unsafe extern "C" fn(self_: *mut cef_request_context_t, name: *const cef_string_t)
			-> *mut cef_value_t,
	>,
	pub get_all_preferences: Option<
		unsafe extern "C" fn(self_: *mut cef_request_context_t, include_defaults: c_int)
			-> *mut cef_dictionary_value_t,
	>,
	pub can_set_preference: Option<
		unsafe extern "C" fn(self_: *mut cef_request_context_t, name: *const cef_string_t) -> c_int,
	>,
	/// A null `value` restores the default. On failure `error` receives a
	/// description and 0 is returned.
	pub set_preference: Option<
		unsafe extern "C" fn(
			self_: *mut cef_request_context_t,
			name: *const cef_string_t,
			value: *mut cef_value_t,
			error: *mut cef_string_t,
		) -> c_int,
	>,
	pub clear_certificate_exceptions: Option<
		unsafe extern "C" fn(
			self_: *mut cef_request_context_t,
			callback: *mut cef_completion_callback_t,
		),
	>,
	pub clear_http_auth_credentials: Option<
		unsafe extern "C" fn(
			self_: *mut cef_request_context_t,
			callback: *mut cef_completion_callback_t,
		),
	>,
	pub close_all_connections: Option<
		unsafe extern "C" fn(
			self_: *mut cef_request_context_t,
			callback: *mut cef_completion_callback_t,
		),
	>,
	pub resolve_host: Option<
		unsafe extern "C" fn(
			self_: *mut cef_request_context_t,
			origin: *const cef_string_t,
			callback: *mut cef_resolve_callback_t,
		),
	>,
	pub did_load_extension: Option<
		unsafe extern "C" fn(self_: *mut cef_request_context_t, extension_id: *const cef_string_t)
			-> c_int,
	>,
	/// Fills `extension_ids`. Returns 0 when extensions are unavailable.
	pub get_extensions: Option<
		unsafe extern "C" fn(self_: *mut cef_request_context_t, extension_ids: cef_string_list_t)
			-> c_int,
	>,
	pub has_extension: Option<
		unsafe extern "C" fn(self_: *mut cef_request_context_t, extension_id: *const cef_string_t)
			-> c_int,
	>,
}
