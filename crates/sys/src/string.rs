use std::ptr;

pub type char16_t = u16;

/// Length-prefixed UTF-16 string.
///
/// `dtor` is set when the buffer is owned by this struct and must be called
/// (through `cef_string_utf16_clear`) to release it.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct cef_string_utf16_t {
	pub str_: *mut char16_t,
	pub length: usize,
	pub dtor: Option<unsafe extern "C" fn(str_: *mut char16_t)>,
}

impl Default for cef_string_utf16_t {
	fn default() -> Self {
		Self {
			str_: ptr::null_mut(),
			length: 0,
			dtor: None,
		}
	}
}

pub type cef_string_t = cef_string_utf16_t;

/// String allocated by the callee; the caller frees it once.
pub type cef_string_userfree_utf16_t = *mut cef_string_utf16_t;
pub type cef_string_userfree_t = cef_string_userfree_utf16_t;

#[repr(C)]
pub struct _cef_string_list_t {
	_unused: [u8; 0],
}

#[repr(C)]
pub struct _cef_string_map_t {
	_unused: [u8; 0],
}

#[repr(C)]
pub struct _cef_string_multimap_t {
	_unused: [u8; 0],
}

pub type cef_string_list_t = *mut _cef_string_list_t;
pub type cef_string_map_t = *mut _cef_string_map_t;
pub type cef_string_multimap_t = *mut _cef_string_multimap_t;
