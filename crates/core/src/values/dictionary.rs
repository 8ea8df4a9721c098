use cefglue_runtime::collections::StringList;
use cefglue_runtime::string::take_userfree;
use cefglue_runtime::{Affinity, CefStringArg, Result, Runtime, native_call};
use cefglue_sys::{cef_dictionary_value_t, cef_string_t};

use super::{BinaryValue, ListValue, Value, ValueType};
use crate::proxy::proxy;

proxy! {
	/// A string-keyed map of values.
	///
	/// Getters for binaries, dictionaries and lists return embedded views;
	/// setters taking a root-owned container move it in.
	DictionaryValue => cef_dictionary_value_t, affinity = Affinity::Any
}

impl DictionaryValue {
	/// Creates an empty, writable, root-owned dictionary.
	pub fn create(rt: &Runtime) -> Result<Self> {
		let ptr = unsafe { (rt.api().dictionary_value_create)() };
		unsafe { Self::create_from(rt, ptr) }
	}

	fn with_key<R>(
		&self,
		key: &str,
		f: impl FnOnce(*mut cef_dictionary_value_t, *const cef_string_t) -> Result<R>,
	) -> Result<R> {
		let ptr = self.to_native()?;
		let key = CefStringArg::text(key)?;
		let native = key.as_native();
		f(ptr, native.as_ptr())
	}

	pub fn is_valid(&self) -> Result<bool> {
		let ptr = self.to_native()?;
		Ok(native_call!(ptr, is_valid())? != 0)
	}

	pub fn is_owned(&self) -> Result<bool> {
		let ptr = self.to_native()?;
		Ok(native_call!(ptr, is_owned())? != 0)
	}

	pub fn is_read_only(&self) -> Result<bool> {
		let ptr = self.to_native()?;
		Ok(native_call!(ptr, is_read_only())? != 0)
	}

	pub fn is_same(&self, other: &DictionaryValue) -> Result<bool> {
		let ptr = self.to_native()?;
		let that = other.to_native()?;
		Ok(native_call!(ptr, is_same(that))? != 0)
	}

	/// Deep comparison.
	pub fn is_equal(&self, other: &DictionaryValue) -> Result<bool> {
		let ptr = self.to_native()?;
		let that = other.to_native()?;
		Ok(native_call!(ptr, is_equal(that))? != 0)
	}

	/// Returns a writable, root-owned deep copy. With `exclude_empty_children`
	/// empty nested dictionaries and lists are left out.
	pub fn copy(&self, exclude_empty_children: bool) -> Result<DictionaryValue> {
		let ptr = self.to_native()?;
		let copy = native_call!(ptr, copy(i32::from(exclude_empty_children)))?;
		unsafe { Self::create_from(self.runtime(), copy) }
	}

	pub fn len(&self) -> Result<usize> {
		let ptr = self.to_native()?;
		native_call!(ptr, get_size())
	}

	pub fn is_empty(&self) -> Result<bool> {
		Ok(self.len()? == 0)
	}

	/// Removes every entry, invalidating embedded views of them.
	pub fn clear(&self) -> Result<bool> {
		let ptr = self.to_native()?;
		Ok(native_call!(ptr, clear())? != 0)
	}

	pub fn has_key(&self, key: &str) -> Result<bool> {
		self.with_key(key, |ptr, key| Ok(native_call!(ptr, has_key(key))? != 0))
	}

	pub fn keys(&self) -> Result<Vec<String>> {
		let ptr = self.to_native()?;
		let keys = StringList::new(self.runtime().api())?;
		if native_call!(ptr, get_keys(keys.as_raw()))? == 0 {
			return Ok(Vec::new());
		}
		keys.to_vec()
	}

	pub fn remove(&self, key: &str) -> Result<bool> {
		self.with_key(key, |ptr, key| Ok(native_call!(ptr, remove(key))? != 0))
	}

	/// [`ValueType::Invalid`] when the key is missing.
	pub fn get_type(&self, key: &str) -> Result<ValueType> {
		self.with_key(key, |ptr, key| Ok(ValueType::from_raw(native_call!(ptr, get_type(key))?)))
	}

	/// The entry as a variant. For containers the variant is embedded.
	pub fn get_value(&self, key: &str) -> Result<Option<Value>> {
		self.with_key(key, |ptr, key| {
			let value = native_call!(ptr, get_value(key))?;
			Ok(unsafe { Value::from_native_owned_or_null(self.runtime(), value) })
		})
	}

	pub fn get_bool(&self, key: &str) -> Result<bool> {
		self.with_key(key, |ptr, key| Ok(native_call!(ptr, get_bool(key))? != 0))
	}

	pub fn get_int(&self, key: &str) -> Result<i32> {
		self.with_key(key, |ptr, key| native_call!(ptr, get_int(key)))
	}

	pub fn get_double(&self, key: &str) -> Result<f64> {
		self.with_key(key, |ptr, key| native_call!(ptr, get_double(key)))
	}

	/// `None` when the key is missing, is not a string, or holds a null string.
	pub fn get_string(&self, key: &str) -> Result<Option<String>> {
		self.with_key(key, |ptr, key| {
			let raw = native_call!(ptr, get_string(key))?;
			unsafe { take_userfree(self.runtime().api(), raw) }
		})
	}

	pub fn get_binary(&self, key: &str) -> Result<Option<BinaryValue>> {
		self.with_key(key, |ptr, key| {
			let value = native_call!(ptr, get_binary(key))?;
			Ok(unsafe { BinaryValue::from_native_owned_or_null(self.runtime(), value) })
		})
	}

	pub fn get_dictionary(&self, key: &str) -> Result<Option<DictionaryValue>> {
		self.with_key(key, |ptr, key| {
			let value = native_call!(ptr, get_dictionary(key))?;
			Ok(unsafe { DictionaryValue::from_native_owned_or_null(self.runtime(), value) })
		})
	}

	pub fn get_list(&self, key: &str) -> Result<Option<ListValue>> {
		self.with_key(key, |ptr, key| {
			let value = native_call!(ptr, get_list(key))?;
			Ok(unsafe { ListValue::from_native_owned_or_null(self.runtime(), value) })
		})
	}

	/// Stores `value`, moving it in when it is root-owned.
	pub fn set_value(&self, key: &str, value: &Value) -> Result<bool> {
		let value = value.to_native()?;
		self.with_key(key, |ptr, key| Ok(native_call!(ptr, set_value(key, value))? != 0))
	}

	pub fn set_null(&self, key: &str) -> Result<bool> {
		self.with_key(key, |ptr, key| Ok(native_call!(ptr, set_null(key))? != 0))
	}

	pub fn set_bool(&self, key: &str, value: bool) -> Result<bool> {
		self.with_key(key, |ptr, key| Ok(native_call!(ptr, set_bool(key, i32::from(value)))? != 0))
	}

	pub fn set_int(&self, key: &str, value: i32) -> Result<bool> {
		self.with_key(key, |ptr, key| Ok(native_call!(ptr, set_int(key, value))? != 0))
	}

	pub fn set_double(&self, key: &str, value: f64) -> Result<bool> {
		self.with_key(key, |ptr, key| Ok(native_call!(ptr, set_double(key, value))? != 0))
	}

	/// Stores a string. `None` stores a null string, which reads back as `None`.
	pub fn set_string(&self, key: &str, value: Option<&str>) -> Result<bool> {
		let value = CefStringArg::new(value)?;
		let value = value.as_native();
		self.with_key(key, |ptr, key| Ok(native_call!(ptr, set_string(key, value.as_ptr()))? != 0))
	}

	/// Stores `value`, moving it in when it is root-owned.
	pub fn set_binary(&self, key: &str, value: &BinaryValue) -> Result<bool> {
		let value = value.to_native()?;
		self.with_key(key, |ptr, key| Ok(native_call!(ptr, set_binary(key, value))? != 0))
	}

	/// Stores `value`, moving it in when it is root-owned. Inserting a
	/// dictionary into itself or its own subtree fails.
	pub fn set_dictionary(&self, key: &str, value: &DictionaryValue) -> Result<bool> {
		let value = value.to_native()?;
		self.with_key(key, |ptr, key| Ok(native_call!(ptr, set_dictionary(key, value))? != 0))
	}

	/// Stores `value`, moving it in when it is root-owned.
	pub fn set_list(&self, key: &str, value: &ListValue) -> Result<bool> {
		let value = value.to_native()?;
		self.with_key(key, |ptr, key| Ok(native_call!(ptr, set_list(key, value))? != 0))
	}
}
