//! UTF-16 string marshalling.
//!
//! Three shapes cross the ABI:
//!
//! - Arguments: [`CefStringArg`] owns the encoded units and lends a
//!   [`NativeStr`] whose lifetime is tied to them, so the buffer cannot be
//!   read after the call returns.
//! - Userfree results: [`UserFreeString`] frees the callee's allocation
//!   exactly once, on drop. [`UserFreeString::into_string`] consumes it, so a
//!   result cannot be decoded twice.
//! - Out-parameters: [`OutString`] starts empty, receives a copy from the
//!   engine, and is cleared on drop.
//!
//! A missing string (`None`) travels as a null buffer with length 0 and an
//! empty string as a non-null buffer with length 0; both directions keep them
//! apart.

use std::marker::PhantomData;
use std::ptr;
use std::slice;

use cefglue_sys::{CefApi, cef_string_t, cef_string_userfree_t};

use crate::error::{Error, Result};

/// Largest string, in UTF-16 units, accepted in either direction.
pub const MAX_STRING_UNITS: usize = i32::MAX as usize;

/// An encoded string argument.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CefStringArg {
	units: Option<Vec<u16>>,
}

impl CefStringArg {
	/// Encodes `value`. Fails with [`Error::TooLarge`] above
	/// [`MAX_STRING_UNITS`].
	pub fn new(value: Option<&str>) -> Result<Self> {
		let Some(value) = value else {
			return Ok(Self { units: None });
		};
		// UTF-16 never needs more units than UTF-8 needs bytes.
		if value.len() > MAX_STRING_UNITS {
			let len = value.encode_utf16().count();
			if len > MAX_STRING_UNITS {
				return Err(Error::TooLarge {
					what: "string",
					len,
					max: MAX_STRING_UNITS,
				});
			}
		}
		Ok(Self {
			units: Some(value.encode_utf16().collect()),
		})
	}

	/// Encodes a present string.
	pub fn text(value: &str) -> Result<Self> {
		Self::new(Some(value))
	}

	pub fn is_none(&self) -> bool {
		self.units.is_none()
	}

	/// Length in UTF-16 units.
	pub fn len(&self) -> usize {
		self.units.as_ref().map_or(0, Vec::len)
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	/// Borrows the encoded units as a native string.
	pub fn as_native(&self) -> NativeStr<'_> {
		let raw = match &self.units {
			None => cef_string_t::default(),
			Some(units) => cef_string_t {
				// An empty Vec still yields a dangling, non-null pointer.
				str_: units.as_ptr().cast_mut(),
				length: units.len(),
				dtor: None,
			},
		};
		NativeStr {
			raw,
			_units: PhantomData,
		}
	}
}

/// A borrowed native string, valid while the [`CefStringArg`] it came from is.
#[repr(transparent)]
#[derive(Debug)]
pub struct NativeStr<'a> {
	raw: cef_string_t,
	_units: PhantomData<&'a [u16]>,
}

impl NativeStr<'_> {
	/// Pointer to pass as a `const cef_string_t*` argument.
	pub fn as_ptr(&self) -> *const cef_string_t {
		&self.raw
	}

	pub fn raw(&self) -> &cef_string_t {
		&self.raw
	}

	/// True when this encodes a missing string.
	pub fn is_null(&self) -> bool {
		self.raw.str_.is_null()
	}

	pub fn len(&self) -> usize {
		self.raw.length
	}

	pub fn is_empty(&self) -> bool {
		self.raw.length == 0
	}
}

/// Copies a native string into a Rust `String`.
///
/// Null pointers and null buffers decode as `None`.
///
/// # Safety
///
/// `ptr` must be null or point to a string whose buffer holds `length` units.
pub unsafe fn decode(ptr: *const cef_string_t) -> Result<Option<String>> {
	if ptr.is_null() {
		return Ok(None);
	}
	let raw = unsafe { &*ptr };
	unsafe { decode_units(raw.str_, raw.length) }
}

unsafe fn decode_units(units: *const u16, length: usize) -> Result<Option<String>> {
	if units.is_null() {
		return Ok(None);
	}
	if length > MAX_STRING_UNITS {
		return Err(Error::TooLarge {
			what: "string",
			len: length,
			max: MAX_STRING_UNITS,
		});
	}
	if length == 0 {
		return Ok(Some(String::new()));
	}
	let units = unsafe { slice::from_raw_parts(units, length) };
	Ok(Some(String::from_utf16(units)?))
}

/// A string the callee allocated, freed exactly once on drop.
pub struct UserFreeString {
	ptr: cef_string_userfree_t,
	free: unsafe extern "C" fn(cef_string_userfree_t),
}

impl UserFreeString {
	/// Takes ownership of a userfree result.
	///
	/// # Safety
	///
	/// `ptr` must be null or a userfree string not owned by anything else.
	pub unsafe fn from_raw(api: &CefApi, ptr: cef_string_userfree_t) -> Self {
		Self {
			ptr,
			free: api.string_userfree_utf16_free,
		}
	}

	pub fn is_null(&self) -> bool {
		self.ptr.is_null()
	}

	/// Copies the contents out, then frees the native string.
	pub fn into_string(self) -> Result<Option<String>> {
		// SAFETY: the pointer stays valid until `self` drops below.
		unsafe { decode(self.ptr) }
	}
}

impl Drop for UserFreeString {
	fn drop(&mut self) {
		let ptr = std::mem::replace(&mut self.ptr, ptr::null_mut());
		if !ptr.is_null() {
			unsafe { (self.free)(ptr) };
		}
	}
}

/// Decodes a userfree result and frees it.
///
/// # Safety
///
/// As for [`UserFreeString::from_raw`].
pub unsafe fn take_userfree(api: &CefApi, ptr: cef_string_userfree_t) -> Result<Option<String>> {
	unsafe { UserFreeString::from_raw(api, ptr) }.into_string()
}

/// An empty string for the engine to write into; cleared on drop.
pub struct OutString {
	raw: cef_string_t,
	clear: unsafe extern "C" fn(*mut cef_string_t),
}

impl OutString {
	pub fn new(api: &CefApi) -> Self {
		Self {
			raw: cef_string_t::default(),
			clear: api.string_utf16_clear,
		}
	}

	/// Pointer to pass as a `cef_string_t*` out-parameter.
	pub fn as_mut_ptr(&mut self) -> *mut cef_string_t {
		&mut self.raw
	}

	pub fn is_null(&self) -> bool {
		self.raw.str_.is_null()
	}

	/// Copies the current contents out.
	pub fn to_string_opt(&self) -> Result<Option<String>> {
		unsafe { decode(&self.raw) }
	}

	/// Copies the contents out, then clears the native buffer.
	pub fn into_string(self) -> Result<Option<String>> {
		self.to_string_opt()
	}
}

impl Drop for OutString {
	fn drop(&mut self) {
		unsafe { (self.clear)(&mut self.raw) };
	}
}

#[cfg(test)]
mod tests {
	use cefglue_testkit::FakeEngine;

	use super::*;

	#[test]
	fn test_none_and_empty_are_distinct() {
		let none = CefStringArg::new(None).unwrap();
		let empty = CefStringArg::text("").unwrap();

		let none_native = none.as_native();
		let empty_native = empty.as_native();
		assert_eq!(none_native.len(), 0);
		assert_eq!(empty_native.len(), 0);
		assert!(none_native.is_null());
		assert!(!empty_native.is_null());

		assert_eq!(unsafe { decode(none_native.as_ptr()) }.unwrap(), None);
		assert_eq!(
			unsafe { decode(empty_native.as_ptr()) }.unwrap(),
			Some(String::new())
		);
		assert_eq!(unsafe { decode(ptr::null()) }.unwrap(), None);
	}

	#[test]
	fn test_round_trip_non_bmp() {
		for text in ["hello", "grüße", "日本語", "emoji 🦀 crab", "a\0b"] {
			let arg = CefStringArg::text(text).unwrap();
			let native = arg.as_native();
			assert_eq!(native.len(), text.encode_utf16().count());
			assert_eq!(
				unsafe { decode(native.as_ptr()) }.unwrap().as_deref(),
				Some(text)
			);
		}
	}

	#[test]
	fn test_invalid_utf16_is_rejected() {
		let units = [0x0061, 0xD800];
		let raw = cef_string_t {
			str_: units.as_ptr().cast_mut(),
			length: units.len(),
			dtor: None,
		};
		let err = unsafe { decode(&raw) }.unwrap_err();
		assert!(err.is_marshal());
	}

	#[test]
	fn test_oversized_length_is_rejected() {
		let unit = 0u16;
		let raw = cef_string_t {
			str_: (&unit as *const u16).cast_mut(),
			length: MAX_STRING_UNITS + 1,
			dtor: None,
		};
		assert!(matches!(
			unsafe { decode(&raw) },
			Err(Error::TooLarge { what: "string", .. })
		));
	}

	#[test]
	fn test_userfree_freed_once() {
		let engine = FakeEngine::new();
		let api = engine.api();

		let ptr = engine.userfree("payload");
		let value = unsafe { take_userfree(&api, ptr) }.unwrap();
		assert_eq!(value.as_deref(), Some("payload"));

		let unread = unsafe { UserFreeString::from_raw(&api, engine.userfree("dropped")) };
		drop(unread);

		let null = unsafe { take_userfree(&api, ptr::null_mut()) }.unwrap();
		assert_eq!(null, None);

		let stats = engine.stats();
		assert_eq!(stats.userfree_allocs, 2);
		assert_eq!(stats.userfree_frees, 2);
		assert_eq!(stats.double_frees, 0);
	}

	#[test]
	fn test_out_string_receives_copy() {
		let engine = FakeEngine::new();
		let api = engine.api();
		let source = CefStringArg::text("copied").unwrap();

		let mut out = OutString::new(&api);
		assert!(out.is_null());
		let native = source.as_native();
		unsafe { (api.string_utf16_set)(native.raw().str_, native.len(), out.as_mut_ptr(), 1) };
		drop(source);
		assert_eq!(out.into_string().unwrap().as_deref(), Some("copied"));
	}
}
