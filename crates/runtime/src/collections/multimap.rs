use cefglue_sys::{CefApi, cef_string_multimap_t};
use indexmap::IndexMap;

use crate::error::{Error, Result};
use crate::string::{CefStringArg, OutString};

/// An owned `cef_string_multimap_t`, e.g. HTTP headers.
///
/// Keys may repeat; [`StringMultimap::to_map`] groups values per key in the
/// order the engine iterates them.
pub struct StringMultimap<'a> {
	api: &'a CefApi,
	raw: cef_string_multimap_t,
}

impl<'a> StringMultimap<'a> {
	pub fn new(api: &'a CefApi) -> Result<Self> {
		let raw = unsafe { (api.string_multimap_alloc)() };
		if raw.is_null() {
			return Err(Error::CreateFailed {
				type_name: "StringMultimap",
			});
		}
		Ok(Self { api, raw })
	}

	/// Builds a multimap from grouped values, appending each value in order.
	pub fn from_map(api: &'a CefApi, entries: &IndexMap<String, Vec<String>>) -> Result<Self> {
		let map = Self::new(api)?;
		for (key, values) in entries {
			for value in values {
				map.append(key, value)?;
			}
		}
		Ok(map)
	}

	pub fn from_pairs<K, V>(api: &'a CefApi, pairs: impl IntoIterator<Item = (K, V)>) -> Result<Self>
	where
		K: AsRef<str>,
		V: AsRef<str>,
	{
		let map = Self::new(api)?;
		for (key, value) in pairs {
			map.append(key.as_ref(), value.as_ref())?;
		}
		Ok(map)
	}

	/// Appends a value under `key`. Fails with [`Error::EntryRejected`] if the
	/// engine refuses it.
	pub fn append(&self, key: &str, value: &str) -> Result<()> {
		let native_key = CefStringArg::text(key)?;
		let value = CefStringArg::text(value)?;
		let ok = unsafe {
			(self.api.string_multimap_append)(
				self.raw,
				native_key.as_native().as_ptr(),
				value.as_native().as_ptr(),
			)
		};
		if ok == 0 {
			return Err(Error::EntryRejected {
				collection: "StringMultimap",
				key: key.to_string(),
			});
		}
		Ok(())
	}

	/// All values stored under `key`.
	pub fn get_all(&self, key: &str) -> Result<Vec<String>> {
		let key = CefStringArg::text(key)?;
		let key = key.as_native();
		let count = unsafe { (self.api.string_multimap_find_count)(self.raw, key.as_ptr()) };
		let mut values = Vec::with_capacity(count);
		for index in 0..count {
			let mut value = OutString::new(self.api);
			if unsafe {
				(self.api.string_multimap_enumerate)(self.raw, key.as_ptr(), index, value.as_mut_ptr())
			} != 0
			{
				values.push(value.into_string()?.unwrap_or_default());
			}
		}
		Ok(values)
	}

	pub fn as_raw(&self) -> cef_string_multimap_t {
		self.raw
	}

	/// Number of key/value pairs.
	pub fn len(&self) -> usize {
		unsafe { (self.api.string_multimap_size)(self.raw) }
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	pub fn to_map(&self) -> Result<IndexMap<String, Vec<String>>> {
		let size = self.len();
		let mut entries: IndexMap<String, Vec<String>> = IndexMap::new();
		for index in 0..size {
			let mut key = OutString::new(self.api);
			let mut value = OutString::new(self.api);
			unsafe {
				if (self.api.string_multimap_key)(self.raw, index, key.as_mut_ptr()) == 0
					|| (self.api.string_multimap_value)(self.raw, index, value.as_mut_ptr()) == 0
				{
					continue;
				}
			}
			entries
				.entry(key.into_string()?.unwrap_or_default())
				.or_default()
				.push(value.into_string()?.unwrap_or_default());
		}
		Ok(entries)
	}
}

impl Drop for StringMultimap<'_> {
	fn drop(&mut self) {
		unsafe { (self.api.string_multimap_free)(self.raw) };
	}
}
