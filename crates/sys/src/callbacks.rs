use crate::base::cef_base_ref_counted_t;
use crate::string::cef_string_list_t;
use crate::types::cef_errorcode_t;

/// Implemented by the client; notified once an asynchronous operation ends.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct cef_completion_callback_t {
	pub base: cef_base_ref_counted_t,
	pub on_complete: Option<unsafe extern "C" fn(self_: *mut cef_completion_callback_t)>,
}

/// Implemented by the client; receives host resolution results.
///
/// `resolved_ips` is borrowed for the duration of the call.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct cef_resolve_callback_t {
	pub base: cef_base_ref_counted_t,
	pub on_resolve_completed: Option<
		unsafe extern "C" fn(
			self_: *mut cef_resolve_callback_t,
			result: cef_errorcode_t,
			resolved_ips: cef_string_list_t,
		),
	>,
}

/// Implemented by the engine; lets the client continue or cancel a pending
/// request.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct cef_callback_t {
	pub base: cef_base_ref_counted_t,
	pub cont: Option<unsafe extern "C" fn(self_: *mut cef_callback_t)>,
	pub cancel: Option<unsafe extern "C" fn(self_: *mut cef_callback_t)>,
}
