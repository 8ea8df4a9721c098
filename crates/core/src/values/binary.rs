use cefglue_runtime::{Affinity, Result, Runtime, native_call};
use cefglue_sys::cef_binary_value_t;

use crate::proxy::proxy;

proxy! {
	/// An immutable byte buffer.
	BinaryValue => cef_binary_value_t, affinity = Affinity::Any
}

impl BinaryValue {
	/// Creates a root-owned buffer holding a copy of `data`.
	pub fn create(rt: &Runtime, data: &[u8]) -> Result<Self> {
		let ptr = unsafe { (rt.api().binary_value_create)(data.as_ptr().cast(), data.len()) };
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

	/// True when both proxies view the same underlying data.
	pub fn is_same(&self, other: &BinaryValue) -> Result<bool> {
		let ptr = self.to_native()?;
		let that = other.to_native()?;
		Ok(native_call!(ptr, is_same(that))? != 0)
	}

	/// True when both buffers hold the same bytes.
	pub fn is_equal(&self, other: &BinaryValue) -> Result<bool> {
		let ptr = self.to_native()?;
		let that = other.to_native()?;
		Ok(native_call!(ptr, is_equal(that))? != 0)
	}

	/// Returns a root-owned copy.
	pub fn copy(&self) -> Result<BinaryValue> {
		let ptr = self.to_native()?;
		let copy = native_call!(ptr, copy())?;
		unsafe { Self::create_from(self.runtime(), copy) }
	}

	pub fn len(&self) -> Result<usize> {
		let ptr = self.to_native()?;
		native_call!(ptr, get_size())
	}

	pub fn is_empty(&self) -> Result<bool> {
		Ok(self.len()? == 0)
	}

	/// Copies bytes starting at `offset` into `buffer`. Returns how many were
	/// copied.
	pub fn get_data(&self, buffer: &mut [u8], offset: usize) -> Result<usize> {
		if buffer.is_empty() {
			return Ok(0);
		}
		let ptr = self.to_native()?;
		native_call!(ptr, get_data(buffer.as_mut_ptr().cast(), buffer.len(), offset))
	}

	/// Copies the whole buffer out.
	pub fn to_vec(&self) -> Result<Vec<u8>> {
		let mut bytes = vec![0; self.len()?];
		let copied = self.get_data(&mut bytes, 0)?;
		bytes.truncate(copied);
		Ok(bytes)
	}
}
