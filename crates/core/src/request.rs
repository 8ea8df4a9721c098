use cefglue_runtime::collections::StringMultimap;
use cefglue_runtime::string::take_userfree;
use cefglue_runtime::{Affinity, CefStringArg, Result, Runtime, native_call};
use cefglue_sys::cef_request_t;
use indexmap::IndexMap;

use crate::proxy::proxy;

proxy! {
	/// An HTTP request.
	///
	/// Requests the engine hands out may be read-only; setters on those are
	/// ignored. Wrapping the same native request twice yields the same
	/// instance while the identity cache is on.
	Request => cef_request_t, affinity = Affinity::Any
}

impl Request {
	/// Creates an empty, writable request.
	pub fn create(rt: &Runtime) -> Result<Self> {
		let ptr = unsafe { (rt.api().request_create)() };
		unsafe { Self::create_from(rt, ptr) }
	}

	pub fn is_read_only(&self) -> Result<bool> {
		let ptr = self.to_native()?;
		Ok(native_call!(ptr, is_read_only())? != 0)
	}

	pub fn url(&self) -> Result<Option<String>> {
		let ptr = self.to_native()?;
		let raw = native_call!(ptr, get_url())?;
		unsafe { take_userfree(self.runtime().api(), raw) }
	}

	pub fn set_url(&self, url: &str) -> Result<()> {
		let ptr = self.to_native()?;
		let url = CefStringArg::text(url)?;
		let url = url.as_native();
		native_call!(ptr, set_url(url.as_ptr()))
	}

	pub fn method(&self) -> Result<Option<String>> {
		let ptr = self.to_native()?;
		let raw = native_call!(ptr, get_method())?;
		unsafe { take_userfree(self.runtime().api(), raw) }
	}

	pub fn set_method(&self, method: &str) -> Result<()> {
		let ptr = self.to_native()?;
		let method = CefStringArg::text(method)?;
		let method = method.as_native();
		native_call!(ptr, set_method(method.as_ptr()))
	}

	/// First value of the named header, matched case-insensitively.
	pub fn header_by_name(&self, name: &str) -> Result<Option<String>> {
		let ptr = self.to_native()?;
		let name = CefStringArg::text(name)?;
		let name = name.as_native();
		let raw = native_call!(ptr, get_header_by_name(name.as_ptr()))?;
		unsafe { take_userfree(self.runtime().api(), raw) }
	}

	/// Sets a header. Without `overwrite` an existing value is kept.
	pub fn set_header_by_name(&self, name: &str, value: &str, overwrite: bool) -> Result<()> {
		let ptr = self.to_native()?;
		let name = CefStringArg::text(name)?;
		let value = CefStringArg::text(value)?;
		let (name, value) = (name.as_native(), value.as_native());
		native_call!(ptr, set_header_by_name(name.as_ptr(), value.as_ptr(), i32::from(overwrite)))
	}

	/// All headers, grouped by name in engine order.
	pub fn header_map(&self) -> Result<IndexMap<String, Vec<String>>> {
		let ptr = self.to_native()?;
		let headers = StringMultimap::new(self.runtime().api())?;
		native_call!(ptr, get_header_map(headers.as_raw()))?;
		headers.to_map()
	}

	/// Replaces every header.
	pub fn set_header_map(&self, headers: &IndexMap<String, Vec<String>>) -> Result<()> {
		let ptr = self.to_native()?;
		let headers = StringMultimap::from_map(self.runtime().api(), headers)?;
		native_call!(ptr, set_header_map(headers.as_raw()))
	}

	/// Engine-assigned id, unique within the process.
	pub fn identifier(&self) -> Result<u64> {
		let ptr = self.to_native()?;
		native_call!(ptr, get_identifier())
	}
}
