use cefglue_runtime::string::take_userfree;
use cefglue_runtime::{Affinity, CefStringArg, Result, Runtime, native_call};
use cefglue_sys::cef_value_t;

use super::{BinaryValue, DictionaryValue, ListValue, ValueType};
use crate::proxy::proxy;

proxy! {
	/// A variant holding any value type.
	///
	/// A variant read from a container is embedded; assigning a container to
	/// it replaces the slot in the parent.
	Value => cef_value_t, affinity = Affinity::Any
}

impl Value {
	/// Creates a root-owned variant holding null.
	pub fn create(rt: &Runtime) -> Result<Self> {
		let ptr = unsafe { (rt.api().value_create)() };
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

	/// True when both variants hold the same container.
	pub fn is_same(&self, other: &Value) -> Result<bool> {
		let ptr = self.to_native()?;
		let that = other.to_native()?;
		Ok(native_call!(ptr, is_same(that))? != 0)
	}

	pub fn is_equal(&self, other: &Value) -> Result<bool> {
		let ptr = self.to_native()?;
		let that = other.to_native()?;
		Ok(native_call!(ptr, is_equal(that))? != 0)
	}

	pub fn copy(&self) -> Result<Value> {
		let ptr = self.to_native()?;
		let copy = native_call!(ptr, copy())?;
		unsafe { Self::create_from(self.runtime(), copy) }
	}

	pub fn value_type(&self) -> Result<ValueType> {
		let ptr = self.to_native()?;
		Ok(ValueType::from_raw(native_call!(ptr, get_type())?))
	}

	pub fn get_bool(&self) -> Result<bool> {
		let ptr = self.to_native()?;
		Ok(native_call!(ptr, get_bool())? != 0)
	}

	pub fn get_int(&self) -> Result<i32> {
		let ptr = self.to_native()?;
		native_call!(ptr, get_int())
	}

	pub fn get_double(&self) -> Result<f64> {
		let ptr = self.to_native()?;
		native_call!(ptr, get_double())
	}

	pub fn get_string(&self) -> Result<Option<String>> {
		let ptr = self.to_native()?;
		let raw = native_call!(ptr, get_string())?;
		unsafe { take_userfree(self.runtime().api(), raw) }
	}

	/// Embedded view of the held binary, if any.
	pub fn get_binary(&self) -> Result<Option<BinaryValue>> {
		let ptr = self.to_native()?;
		let value = native_call!(ptr, get_binary())?;
		Ok(unsafe { BinaryValue::from_native_owned_or_null(self.runtime(), value) })
	}

	/// Embedded view of the held dictionary, if any.
	pub fn get_dictionary(&self) -> Result<Option<DictionaryValue>> {
		let ptr = self.to_native()?;
		let value = native_call!(ptr, get_dictionary())?;
		Ok(unsafe { DictionaryValue::from_native_owned_or_null(self.runtime(), value) })
	}

	/// Embedded view of the held list, if any.
	pub fn get_list(&self) -> Result<Option<ListValue>> {
		let ptr = self.to_native()?;
		let value = native_call!(ptr, get_list())?;
		Ok(unsafe { ListValue::from_native_owned_or_null(self.runtime(), value) })
	}

	pub fn set_null(&self) -> Result<bool> {
		let ptr = self.to_native()?;
		Ok(native_call!(ptr, set_null())? != 0)
	}

	pub fn set_bool(&self, value: bool) -> Result<bool> {
		let ptr = self.to_native()?;
		Ok(native_call!(ptr, set_bool(i32::from(value)))? != 0)
	}

	pub fn set_int(&self, value: i32) -> Result<bool> {
		let ptr = self.to_native()?;
		Ok(native_call!(ptr, set_int(value))? != 0)
	}

	pub fn set_double(&self, value: f64) -> Result<bool> {
		let ptr = self.to_native()?;
		Ok(native_call!(ptr, set_double(value))? != 0)
	}

	pub fn set_string(&self, value: Option<&str>) -> Result<bool> {
		let ptr = self.to_native()?;
		let value = CefStringArg::new(value)?;
		let value = value.as_native();
		Ok(native_call!(ptr, set_string(value.as_ptr()))? != 0)
	}

	/// Stores `value`, moving it in when it is root-owned.
	pub fn set_binary(&self, value: &BinaryValue) -> Result<bool> {
		let ptr = self.to_native()?;
		let value = value.to_native()?;
		Ok(native_call!(ptr, set_binary(value))? != 0)
	}

	/// Stores `value`, moving it in when it is root-owned.
	pub fn set_dictionary(&self, value: &DictionaryValue) -> Result<bool> {
		let ptr = self.to_native()?;
		let value = value.to_native()?;
		Ok(native_call!(ptr, set_dictionary(value))? != 0)
	}

	/// Stores `value`, moving it in when it is root-owned.
	pub fn set_list(&self, value: &ListValue) -> Result<bool> {
		let ptr = self.to_native()?;
		let value = value.to_native()?;
		Ok(native_call!(ptr, set_list(value))? != 0)
	}
}
