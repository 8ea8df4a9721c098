use std::os::raw::c_int;

/// Header shared by every reference-counted engine object.
///
/// The refcount itself lives behind the object and is only reachable through
/// these functions.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct cef_base_ref_counted_t {
	/// Size of the full structure, including this header.
	pub size: usize,
	/// Increments the reference count.
	pub add_ref: Option<unsafe extern "C" fn(self_: *mut cef_base_ref_counted_t)>,
	/// Decrements the reference count. Returns 1 when the object was destroyed.
	pub release: Option<unsafe extern "C" fn(self_: *mut cef_base_ref_counted_t) -> c_int>,
	/// Returns 1 when the count is exactly one.
	pub has_one_ref: Option<unsafe extern "C" fn(self_: *mut cef_base_ref_counted_t) -> c_int>,
	/// Returns 1 when the count is at least one.
	pub has_at_least_one_ref:
		Option<unsafe extern "C" fn(self_: *mut cef_base_ref_counted_t) -> c_int>,
}

impl cef_base_ref_counted_t {
	/// Header with every function unset.
	pub const fn empty(size: usize) -> Self {
		Self {
			size,
			add_ref: None,
			release: None,
			has_one_ref: None,
			has_at_least_one_ref: None,
		}
	}
}
