use cefglue_runtime::string::take_userfree;
use cefglue_runtime::{Affinity, CefStringArg, Result, Runtime, native_call};
use cefglue_sys::cef_list_value_t;

use super::{BinaryValue, DictionaryValue, Value, ValueType};
use crate::proxy::proxy;

proxy! {
	/// An index-addressed sequence of values.
	///
	/// Setting past the end grows the list, filling the gap with nulls.
	ListValue => cef_list_value_t, affinity = Affinity::Any
}

impl ListValue {
	/// Creates an empty, writable, root-owned list.
	pub fn create(rt: &Runtime) -> Result<Self> {
		let ptr = unsafe { (rt.api().list_value_create)() };
		unsafe { Self::create_from(rt, ptr) }
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

	pub fn is_same(&self, other: &ListValue) -> Result<bool> {
		let ptr = self.to_native()?;
		let that = other.to_native()?;
		Ok(native_call!(ptr, is_same(that))? != 0)
	}

	/// Deep comparison.
	pub fn is_equal(&self, other: &ListValue) -> Result<bool> {
		let ptr = self.to_native()?;
		let that = other.to_native()?;
		Ok(native_call!(ptr, is_equal(that))? != 0)
	}

	/// Returns a writable, root-owned deep copy.
	pub fn copy(&self) -> Result<ListValue> {
		let ptr = self.to_native()?;
		let copy = native_call!(ptr, copy())?;
		unsafe { Self::create_from(self.runtime(), copy) }
	}

	/// Grows with nulls or truncates to `size` entries.
	pub fn set_size(&self, size: usize) -> Result<bool> {
		let ptr = self.to_native()?;
		Ok(native_call!(ptr, set_size(size))? != 0)
	}

	pub fn len(&self) -> Result<usize> {
		let ptr = self.to_native()?;
		native_call!(ptr, get_size())
	}

	pub fn is_empty(&self) -> Result<bool> {
		Ok(self.len()? == 0)
	}

	pub fn clear(&self) -> Result<bool> {
		let ptr = self.to_native()?;
		Ok(native_call!(ptr, clear())? != 0)
	}

	/// Removes the entry at `index`, shifting later entries down.
	pub fn remove(&self, index: usize) -> Result<bool> {
		let ptr = self.to_native()?;
		Ok(native_call!(ptr, remove(index))? != 0)
	}

	/// [`ValueType::Invalid`] when `index` is out of range.
	pub fn get_type(&self, index: usize) -> Result<ValueType> {
		let ptr = self.to_native()?;
		Ok(ValueType::from_raw(native_call!(ptr, get_type(index))?))
	}

	pub fn get_value(&self, index: usize) -> Result<Option<Value>> {
		let ptr = self.to_native()?;
		let value = native_call!(ptr, get_value(index))?;
		Ok(unsafe { Value::from_native_owned_or_null(self.runtime(), value) })
	}

	pub fn get_bool(&self, index: usize) -> Result<bool> {
		let ptr = self.to_native()?;
		Ok(native_call!(ptr, get_bool(index))? != 0)
	}

	pub fn get_int(&self, index: usize) -> Result<i32> {
		let ptr = self.to_native()?;
		native_call!(ptr, get_int(index))
	}

	pub fn get_double(&self, index: usize) -> Result<f64> {
		let ptr = self.to_native()?;
		native_call!(ptr, get_double(index))
	}

	pub fn get_string(&self, index: usize) -> Result<Option<String>> {
		let ptr = self.to_native()?;
		let raw = native_call!(ptr, get_string(index))?;
		unsafe { take_userfree(self.runtime().api(), raw) }
	}

	pub fn get_binary(&self, index: usize) -> Result<Option<BinaryValue>> {
		let ptr = self.to_native()?;
		let value = native_call!(ptr, get_binary(index))?;
		Ok(unsafe { BinaryValue::from_native_owned_or_null(self.runtime(), value) })
	}

	pub fn get_dictionary(&self, index: usize) -> Result<Option<DictionaryValue>> {
		let ptr = self.to_native()?;
		let value = native_call!(ptr, get_dictionary(index))?;
		Ok(unsafe { DictionaryValue::from_native_owned_or_null(self.runtime(), value) })
	}

	pub fn get_list(&self, index: usize) -> Result<Option<ListValue>> {
		let ptr = self.to_native()?;
		let value = native_call!(ptr, get_list(index))?;
		Ok(unsafe { ListValue::from_native_owned_or_null(self.runtime(), value) })
	}

	pub fn set_value(&self, index: usize, value: &Value) -> Result<bool> {
		let ptr = self.to_native()?;
		let value = value.to_native()?;
		Ok(native_call!(ptr, set_value(index, value))? != 0)
	}

	pub fn set_null(&self, index: usize) -> Result<bool> {
		let ptr = self.to_native()?;
		Ok(native_call!(ptr, set_null(index))? != 0)
	}

	pub fn set_bool(&self, index: usize, value: bool) -> Result<bool> {
		let ptr = self.to_native()?;
		Ok(native_call!(ptr, set_bool(index, i32::from(value)))? != 0)
	}

	pub fn set_int(&self, index: usize, value: i32) -> Result<bool> {
		let ptr = self.to_native()?;
		Ok(native_call!(ptr, set_int(index, value))? != 0)
	}

	pub fn set_double(&self, index: usize, value: f64) -> Result<bool> {
		let ptr = self.to_native()?;
		Ok(native_call!(ptr, set_double(index, value))? != 0)
	}

	pub fn set_string(&self, index: usize, value: Option<&str>) -> Result<bool> {
		let ptr = self.to_native()?;
		let value = CefStringArg::new(value)?;
		let value = value.as_native();
		Ok(native_call!(ptr, set_string(index, value.as_ptr()))? != 0)
	}

	pub fn set_binary(&self, index: usize, value: &BinaryValue) -> Result<bool> {
		let ptr = self.to_native()?;
		let value = value.to_native()?;
		Ok(native_call!(ptr, set_binary(index, value))? != 0)
	}

	pub fn set_dictionary(&self, index: usize, value: &DictionaryValue) -> Result<bool> {
		let ptr = self.to_native()?;
		let value = value.to_native()?;
		Ok(native_call!(ptr, set_dictionary(index, value))? != 0)
	}

	/// Inserting a list into itself or its own subtree fails.
	pub fn set_list(&self, index: usize, value: &ListValue) -> Result<bool> {
		let ptr = self.to_native()?;
		let value = value.to_native()?;
		Ok(native_call!(ptr, set_list(index, value))? != 0)
	}
}
