use std::sync::Arc;

use cefglue_runtime::callback::{dispatch, export};
use cefglue_runtime::collections::read_string_list;
use cefglue_runtime::{NativeRef, Runtime};
use cefglue_sys::{cef_base_ref_counted_t, cef_errorcode_t, cef_resolve_callback_t, cef_string_list_t};

use crate::net_error::NetError;

/// Receives the outcome of [`RequestContext::resolve_host`](crate::RequestContext::resolve_host).
///
/// Called on the UI thread. Closures implement this trait.
pub trait ResolveCallback: Send + Sync + 'static {
	/// `resolved_ips` is empty unless `result` is [`NetError::NONE`].
	fn on_resolve_completed(&self, result: NetError, resolved_ips: Vec<String>);
}

impl<F> ResolveCallback for F
where
	F: Fn(NetError, Vec<String>) + Send + Sync + 'static,
{
	fn on_resolve_completed(&self, result: NetError, resolved_ips: Vec<String>) {
		self(result, resolved_ips)
	}
}

unsafe extern "C" fn on_resolve_completed<H: ResolveCallback>(
	self_: *mut cef_resolve_callback_t,
	result: cef_errorcode_t,
	resolved_ips: cef_string_list_t,
) {
	unsafe {
		dispatch::<_, H, (), _>(self_, "ResolveCallback::on_resolve_completed", |handler, rt| {
			// The list is borrowed from the engine for this call only.
			let ips = match read_string_list(rt.api(), resolved_ips) {
				Ok(ips) => ips,
				Err(err) => {
					tracing::warn!(%err, "dropping unreadable resolved address list");
					Vec::new()
				}
			};
			handler.on_resolve_completed(NetError::from_raw(result), ips);
		})
	}
}

pub(crate) fn export_resolve<H: ResolveCallback>(rt: &Runtime, handler: H) -> NativeRef<cef_resolve_callback_t> {
	let vtable = cef_resolve_callback_t {
		base: cef_base_ref_counted_t::empty(0),
		on_resolve_completed: Some(on_resolve_completed::<H>),
	};
	export(rt, Arc::new(handler), vtable)
}
