use cefglue_sys::{CefApi, cef_string_map_t};
use indexmap::IndexMap;

use crate::error::{Error, Result};
use crate::string::{CefStringArg, OutString};

/// An owned `cef_string_map_t`.
pub struct StringMap<'a> {
	api: &'a CefApi,
	raw: cef_string_map_t,
}

impl<'a> StringMap<'a> {
	pub fn new(api: &'a CefApi) -> Result<Self> {
		let raw = unsafe { (api.string_map_alloc)() };
		if raw.is_null() {
			return Err(Error::CreateFailed {
				type_name: "StringMap",
			});
		}
		Ok(Self { api, raw })
	}

	pub fn from_map<K, V>(api: &'a CefApi, entries: impl IntoIterator<Item = (K, V)>) -> Result<Self>
	where
		K: AsRef<str>,
		V: AsRef<str>,
	{
		let map = Self::new(api)?;
		for (key, value) in entries {
			map.insert(key.as_ref(), value.as_ref())?;
		}
		Ok(map)
	}

	/// Appends an entry. Fails with [`Error::EntryRejected`] if the engine
	/// refuses it.
	pub fn insert(&self, key: &str, value: &str) -> Result<()> {
		let native_key = CefStringArg::text(key)?;
		let value = CefStringArg::text(value)?;
		let ok = unsafe {
			(self.api.string_map_append)(
				self.raw,
				native_key.as_native().as_ptr(),
				value.as_native().as_ptr(),
			)
		};
		if ok == 0 {
			return Err(Error::EntryRejected {
				collection: "StringMap",
				key: key.to_string(),
			});
		}
		Ok(())
	}

	pub fn get(&self, key: &str) -> Result<Option<String>> {
		let key = CefStringArg::text(key)?;
		let mut value = OutString::new(self.api);
		let found = unsafe { (self.api.string_map_find)(self.raw, key.as_native().as_ptr(), value.as_mut_ptr()) };
		if found == 0 {
			return Ok(None);
		}
		Ok(Some(value.into_string()?.unwrap_or_default()))
	}

	pub fn as_raw(&self) -> cef_string_map_t {
		self.raw
	}

	pub fn len(&self) -> usize {
		unsafe { (self.api.string_map_size)(self.raw) }
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	/// Copies the entries out in native iteration order.
	pub fn to_map(&self) -> Result<IndexMap<String, String>> {
		let size = self.len();
		let mut entries = IndexMap::with_capacity(size);
		for index in 0..size {
			let mut key = OutString::new(self.api);
			let mut value = OutString::new(self.api);
			unsafe {
				if (self.api.string_map_key)(self.raw, index, key.as_mut_ptr()) == 0
					|| (self.api.string_map_value)(self.raw, index, value.as_mut_ptr()) == 0
				{
					continue;
				}
			}
			entries.insert(
				key.into_string()?.unwrap_or_default(),
				value.into_string()?.unwrap_or_default(),
			);
		}
		Ok(entries)
	}
}

impl Drop for StringMap<'_> {
	fn drop(&mut self) {
		unsafe { (self.api.string_map_free)(self.raw) };
	}
}
