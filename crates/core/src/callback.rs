use cefglue_runtime::{Affinity, Result, native_call};
use cefglue_sys::cef_callback_t;

use crate::proxy::proxy;

proxy! {
	/// Lets the client resume or abandon a pending engine request.
	///
	/// Call exactly one of [`Callback::cont`] or [`Callback::cancel`], once.
	Callback => cef_callback_t, affinity = Affinity::Any
}

impl Callback {
	/// Continues processing.
	pub fn cont(&self) -> Result<()> {
		let ptr = self.to_native()?;
		native_call!(ptr, cont())
	}

	/// Cancels processing.
	pub fn cancel(&self) -> Result<()> {
		let ptr = self.to_native()?;
		native_call!(ptr, cancel())
	}
}
