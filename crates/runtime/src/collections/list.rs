use cefglue_sys::{CefApi, cef_string_list_t};

use crate::error::{Error, Result};
use crate::string::{CefStringArg, OutString};

/// An owned `cef_string_list_t`.
pub struct StringList<'a> {
	api: &'a CefApi,
	raw: cef_string_list_t,
}

impl<'a> StringList<'a> {
	/// Allocates an empty list.
	pub fn new(api: &'a CefApi) -> Result<Self> {
		let raw = unsafe { (api.string_list_alloc)() };
		if raw.is_null() {
			return Err(Error::CreateFailed {
				type_name: "StringList",
			});
		}
		Ok(Self { api, raw })
	}

	/// Allocates a list holding `items`, in order.
	pub fn from_items<S: AsRef<str>>(api: &'a CefApi, items: &[S]) -> Result<Self> {
		let list = Self::new(api)?;
		for item in items {
			list.push(item.as_ref())?;
		}
		Ok(list)
	}

	pub fn push(&self, value: &str) -> Result<()> {
		let value = CefStringArg::text(value)?;
		unsafe { (self.api.string_list_append)(self.raw, value.as_native().as_ptr()) };
		Ok(())
	}

	pub fn as_raw(&self) -> cef_string_list_t {
		self.raw
	}

	pub fn len(&self) -> usize {
		unsafe { (self.api.string_list_size)(self.raw) }
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	pub fn to_vec(&self) -> Result<Vec<String>> {
		unsafe { read_string_list(self.api, self.raw) }
	}
}

impl Drop for StringList<'_> {
	fn drop(&mut self) {
		unsafe { (self.api.string_list_free)(self.raw) };
	}
}

/// Copies a list the caller does not own, such as a callback argument.
///
/// A null list reads as empty.
///
/// # Safety
///
/// `raw` must be null or a live list for the duration of the call.
pub unsafe fn read_string_list(api: &CefApi, raw: cef_string_list_t) -> Result<Vec<String>> {
	if raw.is_null() {
		return Ok(Vec::new());
	}
	let size = unsafe { (api.string_list_size)(raw) };
	let mut items = Vec::with_capacity(size);
	for index in 0..size {
		let mut value = OutString::new(api);
		if unsafe { (api.string_list_value)(raw, index, value.as_mut_ptr()) } != 0 {
			items.push(value.into_string()?.unwrap_or_default());
		}
	}
	Ok(items)
}
