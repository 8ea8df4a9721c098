//! Binary, dictionary, list and variant values.
//!
//! A value is either owned by nobody (root), owned by a parent container
//! (`is_owned` returns 1), or invalid after its data was moved or destroyed.
//! Setting a complex value into a container transfers ownership when the
//! source is a root value (the source becomes invalid) and copies it when the
//! source is owned by another container.

use std::os::raw::{c_int, c_void};

use crate::base::cef_base_ref_counted_t;
use crate::string::{cef_string_list_t, cef_string_t, cef_string_userfree_t};
use crate::types::cef_value_type_t;

#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct cef_binary_value_t {
	pub base: cef_base_ref_counted_t,
	pub is_valid: Option<unsafe extern "C" fn(self_: *mut cef_binary_value_t) -> c_int>,
	pub is_owned: Option<unsafe extern "C" fn(self_: *mut cef_binary_value_t) -> c_int>,
	pub is_same: Option<
		unsafe extern "C" fn(self_: *mut cef_binary_value_t, that: *mut cef_binary_value_t) -> c_int,
	>,
	pub is_equal: Option<
		unsafe extern "C" fn(self_: *mut cef_binary_value_t, that: *mut cef_binary_value_t) -> c_int,
	>,
	pub copy: Option<unsafe extern "C" fn(self_: *mut cef_binary_value_t) -> *mut cef_binary_value_t>,
	pub get_size: Option<unsafe extern "C" fn(self_: *mut cef_binary_value_t) -> usize>,
	/// Copies up to `buffer_size` bytes starting at `data_offset`. Returns the
	/// number of bytes copied.
	pub get_data: Option<
		unsafe extern "C" fn(
			self_: *mut cef_binary_value_t,
			buffer: *mut c_void,
			buffer_size: usize,
			data_offset: usize,
		) -> usize,
	>,
}

#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct cef_dictionary_value_t {
	pub base: cef_base_ref_counted_t,
	pub is_valid: Option<unsafe extern "C" fn(self_: *mut cef_dictionary_value_t) -> c_int>,
	pub is_owned: Option<unsafe extern "C" fn(self_: *mut cef_dictionary_value_t) -> c_int>,
	pub is_read_only: Option<unsafe extern "C" fn(self_: *mut cef_dictionary_value_t) -> c_int>,
	pub is_same: Option<
		unsafe extern "C" fn(
			self_: *mut cef_dictionary_value_t,
			that: *mut cef_dictionary_value_t,
		) -> c_int,
	>,
	pub is_equal: Option<
		unsafe extern "C" fn(
			self_: *mut cef_dictionary_value_t,
			that: *mut cef_dictionary_value_t,
		) -> c_int,
	>,
	pub copy: Option<
		unsafe extern "C" fn(
			self_: *mut cef_dictionary_value_t,
			exclude_empty_children: c_int,
		) -> *mut cef_dictionary_value_t,
	>,
	pub get_size: Option<unsafe extern "C" fn(self_: *mut cef_dictionary_value_t) -> usize>,
	pub clear: Option<unsafe extern "C" fn(self_: *mut cef_dictionary_value_t) -> c_int>,
	pub has_key: Option<
		unsafe extern "C" fn(self_: *mut cef_dictionary_value_t, key: *const cef_string_t) -> c_int,
	>,
	pub get_keys: Option<
		unsafe extern "C" fn(self_: *mut cef_dictionary_value_t, keys: cef_string_list_t) -> c_int,
	>,
	pub remove: Option<
		unsafe extern "C" fn(self_: *mut cef_dictionary_value_t, key: *const cef_string_t) -> c_int,
	>,
	pub get_type: Option<
		unsafe extern "C" fn(
			self_: *mut cef_dictionary_value_t,
			key: *const cef_string_t,
		) -> cef_value_type_t,
	>,
	pub get_value: Option<
		unsafe extern "C" fn(
			self_: *mut cef_dictionary_value_t,
			key: *const cef_string_t,
		) -> *mut cef_value_t,
	>,
	pub get_bool: Option<
		unsafe extern "C" fn(self_: *mut cef_dictionary_value_t, key: *const cef_string_t) -> c_int,
	>,
	pub get_int: Option<
		unsafe extern "C" fn(self_: *mut cef_dictionary_value_t, key: *const cef_string_t) -> c_int,
	>,
	pub get_double: Option<
		unsafe extern "C" fn(self_: *mut cef_dictionary_value_t, key: *const cef_string_t) -> f64,
	>,
	pub get_string: Option<
		unsafe extern "C" fn(
			self_: *mut cef_dictionary_value_t,
			key: *const cef_string_t,
		) -> cef_string_userfree_t,
	>,
	pub get_binary: Option<
		unsafe extern "C" fn(
			self_: *mut cef_dictionary_value_t,
			key: *const cef_string_t,
		) -> *mut cef_binary_value_t,
	>,
	pub get_dictionary: Option<
		unsafe extern "C" fn(
			self_: *mut cef_dictionary_value_t,
			key: *const cef_string_t,
		) -> *mut cef_dictionary_value_t,
	>,
	pub get_list: Option<
		unsafe extern "C" fn(
			self_: *mut cef_dictionary_value_t,
			key: *const cef_string_t,
		) -> *mut cef_list_value_t,
	>,
	pub set_value: Option<
		unsafe extern "C" fn(
			self_: *mut cef_dictionary_value_t,
			key: *const cef_string_t,
			value: *mut cef_value_t,
		) -> c_int,
	>,
	pub set_null: Option<
		unsafe extern "C" fn(self_: *mut cef_dictionary_value_t, key: *const cef_string_t) -> c_int,
	>,
	pub set_bool: Option<
		unsafe extern "C" fn(
			self_: *mut cef_dictionary_value_t,
			key: *const cef_string_t,
			value: c_int,
		) -> c_int,
	>,
	pub set_int: Option<
		unsafe extern "C" fn(
			self_: *mut cef_dictionary_value_t,
			key: *const cef_string_t,
			value: c_int,
		) -> c_int,
	>,
	pub set_double: Option<
		unsafe extern "C" fn(
			self_: *mut cef_dictionary_value_t,
			key: *const cef_string_t,
			value: f64,
		) -> c_int,
	>,
	pub set_string: Option<
		unsafe extern "C" fn(
			self_: *mut cef_dictionary_value_t,
			key: *const cef_string_t,
			value: *const cef_string_t,
		) -> c_int,
	>,
	pub set_binary: Option<
		unsafe extern "C" fn(
			self_: *mut cef_dictionary_value_t,
			key: *const cef_string_t,
			value: *mut cef_binary_value_t,
		) -> c_int,
	>,
	pub set_dictionary: Option<
		unsafe extern "C" fn(
			self_: *mut cef_dictionary_value_t,
			key: *const cef_string_t,
			value: *mut cef_dictionary_value_t,
		) -> c_int,
	>,
	pub set_list: Option<
		unsafe extern "C" fn(
			self_: *mut cef_dictionary_value_t,
			key: *const cef_string_t,
			value: *mut cef_list_value_t,
		) -> c_int,
	>,
}

#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct cef_list_value_t {
	pub base: cef_base_ref_counted_t,
	pub is_valid: Option<unsafe extern "C" fn(self_: *mut cef_list_value_t) -> c_int>,
	pub is_owned: Option<unsafe extern "C" fn(self_: *mut cef_list_value_t) -> c_int>,
	pub is_read_only: Option<unsafe extern "C" fn(self_: *mut cef_list_value_t) -> c_int>,
	pub is_same: Option<
		unsafe extern "C" fn(self_: *mut cef_list_value_t, that: *mut cef_list_value_t) -> c_int,
	>,
	pub is_equal: Option<
		unsafe extern "C" fn(self_: *mut cef_list_value_t, that: *mut cef_list_value_t) -> c_int,
	>,
	pub copy: Option<unsafe extern "C" fn(self_: *mut cef_list_value_t) -> *mut cef_list_value_t>,
	pub set_size: Option<unsafe extern "C" fn(self_: *mut cef_list_value_t, size: usize) -> c_int>,
	pub get_size: Option<unsafe extern "C" fn(self_: *mut cef_list_value_t) -> usize>,
	pub clear: Option<unsafe extern "C" fn(self_: *mut cef_list_value_t) -> c_int>,
	pub remove: Option<unsafe extern "C" fn(self_: *mut cef_list_value_t, index: usize) -> c_int>,
	pub get_type:
		Option<unsafe extern "C" fn(self_: *mut cef_list_value_t, index: usize) -> cef_value_type_t>,
	pub get_value:
		Option<unsafe extern "C" fn(self_: *mut cef_list_value_t, index: usize) -> *mut cef_value_t>,
	pub get_bool: Option<unsafe extern "C" fn(self_: *mut cef_list_value_t, index: usize) -> c_int>,
	pub get_int: Option<unsafe extern "C" fn(self_: *mut cef_list_value_t, index: usize) -> c_int>,
	pub get_double: Option<unsafe extern "C" fn(self_: *mut cef_list_value_t, index: usize) -> f64>,
	pub get_string: Option<
		unsafe extern "C" fn(self_: *mut cef_list_value_t, index: usize) -> cef_string_userfree_t,
	>,
	pub get_binary: Option<
		unsafe extern "C" fn(self_: *mut cef_list_value_t, index: usize) -> *mut cef_binary_value_t,
	>,
	pub get_dictionary: Option<
		unsafe extern "C" fn(
			self_: *mut cef_list_value_t,
			index: usize,
		) -> *mut cef_dictionary_value_t,
	>,
	pub get_list: Option<
		unsafe extern "C" fn(self_: *mut cef_list_value_t, index: usize) -> *mut cef_list_value_t,
	>,
	pub set_value: Option<
		unsafe extern "C" fn(
			self_: *mut cef_list_value_t,
			index: usize,
			value: *mut cef_value_t,
		) -> c_int,
	>,
	pub set_null: Option<unsafe extern "C" fn(self_: *mut cef_list_value_t, index: usize) -> c_int>,
	pub set_bool:
		Option<unsafe extern "C" fn(self_: *mut cef_list_value_t, index: usize, value: c_int) -> c_int>,
	pub set_int:
		Option<unsafe extern "C" fn(self_: *mut cef_list_value_t, index: usize, value: c_int) -> c_int>,
	pub set_double:
		Option<unsafe extern "C" fn(self_: *mut cef_list_value_t, index: usize, value: f64) -> c_int>,
	pub set_string: Option<
		unsafe extern "C" fn(
			self_: *mut cef_list_value_t,
			index: usize,
			value: *const cef_string_t,
		) -> c_int,
	>,
	pub set_binary: Option<
		unsafe extern "C" fn(
			self_: *mut cef_list_value_t,
			index: usize,
			value: *mut cef_binary_value_t,
		) -> c_int,
	>,
	pub set_dictionary: Option<
		unsafe extern "C" fn(
			self_: *mut cef_list_value_t,
			index: usize,
			value: *mut cef_dictionary_value_t,
		) -> c_int,
	>,
	pub set_list: Option<
		unsafe extern "C" fn(
			self_: *mut cef_list_value_t,
			index: usize,
			value: *mut cef_list_value_t,
		) -> c_int,
	>,
}

/// Variant wrapper around any of the value types.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct cef_value_t {
	pub base: cef_base_ref_counted_t,
	pub is_valid: Option<unsafe extern "C" fn(self_: *mut cef_value_t) -> c_int>,
	pub is_owned: Option<unsafe extern "C" fn(self_: *mut cef_value_t) -> c_int>,
	pub is_read_only: Option<unsafe extern "C" fn(self_: *mut cef_value_t) -> c_int>,
	pub is_same: Option<unsafe extern "C" fn(self_: *mut cef_value_t, that: *mut cef_value_t) -> c_int>,
	pub is_equal:
		Option<unsafe extern "C" fn(self_: *mut cef_value_t, that: *mut cef_value_t) -> c_int>,
	pub copy: Option<unsafe extern "C" fn(self_: *mut cef_value_t) -> *mut cef_value_t>,
	pub get_type: Option<unsafe extern "C" fn(self_: *mut cef_value_t) -> cef_value_type_t>,
	pub get_bool: Option<unsafe extern "C" fn(self_: *mut cef_value_t) -> c_int>,
	pub get_int: Option<unsafe extern "C" fn(self_: *mut cef_value_t) -> c_int>,
	pub get_double: Option<unsafe extern "C" fn(self_: *mut cef_value_t) -> f64>,
	pub get_string: Option<unsafe extern "C" fn(self_: *mut cef_value_t) -> cef_string_userfree_t>,
	pub get_binary: Option<unsafe extern "C" fn(self_: *mut cef_value_t) -> *mut cef_binary_value_t>,
	pub get_dictionary:
		Option<unsafe extern "C" fn(self_: *mut cef_value_t) -> *mut cef_dictionary_value_t>,
	pub get_list: Option<unsafe extern "C" fn(self_: *mut cef_value_t) -> *mut cef_list_value_t>,
	pub set_null: Option<unsafe extern "C" fn(self_: *mut cef_value_t) -> c_int>,
	pub set_bool: Option<unsafe extern "C" fn(self_: *mut cef_value_t, value: c_int) -> c_int>,
	pub set_int: Option<unsafe extern "C" fn(self_: *mut cef_value_t, value: c_int) -> c_int>,
	pub set_double: Option<unsafe extern "C" fn(self_: *mut cef_value_t, value: f64) -> c_int>,
	pub set_string:
		Option<unsafe extern "C" fn(self_: *mut cef_value_t, value: *const cef_string_t) -> c_int>,
	pub set_binary:
		Option<unsafe extern "C" fn(self_: *mut cef_value_t, value: *mut cef_binary_value_t) -> c_int>,
	pub set_dictionary: Option<
		unsafe extern "C" fn(self_: *mut cef_value_t, value: *mut cef_dictionary_value_t) -> c_int,
	>,
	pub set_list:
		Option<unsafe extern "C" fn(self_: *mut cef_value_t, value: *mut cef_list_value_t) -> c_int>,
}
