use std::sync::Arc;

use cefglue_runtime::callback::{dispatch, export};
use cefglue_runtime::{NativeRef, Runtime};
use cefglue_sys::{cef_base_ref_counted_t, cef_completion_callback_t};

/// Notified once when an asynchronous engine operation finishes.
///
/// Called on the UI thread. Closures implement this trait.
pub trait CompletionCallback: Send + Sync + 'static {
	fn on_complete(&self);
}

impl<F> CompletionCallback for F
where
	F: Fn() + Send + Sync + 'static,
{
	fn on_complete(&self) {
		self()
	}
}

unsafe extern "C" fn on_complete<H: CompletionCallback>(self_: *mut cef_completion_callback_t) {
	unsafe {
		dispatch::<_, H, (), _>(self_, "CompletionCallback::on_complete", |handler, _| {
			handler.on_complete();
		})
	}
}

pub(crate) fn export_completion<H: CompletionCallback>(
	rt: &Runtime,
	handler: H,
) -> NativeRef<cef_completion_callback_t> {
	let vtable = cef_completion_callback_t {
		base: cef_base_ref_counted_t::empty(0),
		on_complete: Some(on_complete::<H>),
	};
	export(rt, Arc::new(handler), vtable)
}
