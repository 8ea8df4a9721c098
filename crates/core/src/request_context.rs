use std::ptr;

use cefglue_runtime::collections::StringList;
use cefglue_runtime::string::{OutString, take_userfree};
use cefglue_runtime::{Affinity, CefStringArg, Error, Result, Runtime, ThreadId, native_call};
use cefglue_sys::{cef_request_context_t, cef_string_t};

use crate::handlers::{CompletionCallback, ResolveCallback, export_completion, export_resolve};
use crate::proxy::proxy;
use crate::values::{DictionaryValue, Value};

proxy! {
	/// Isolated network, cookie and preference state.
	///
	/// Most methods may be called from any thread. Preference and extension
	/// methods must run on the UI thread and fail with
	/// [`Error::WrongThread`] elsewhere while thread checks are enabled.
	RequestContext => cef_request_context_t, affinity = Affinity::Any
}

/// Outcome of [`RequestContext::set_preference`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreferenceUpdate {
	Applied,
	/// The engine refused the change and said why.
	Rejected(String),
}

impl PreferenceUpdate {
	pub fn is_applied(&self) -> bool {
		matches!(self, PreferenceUpdate::Applied)
	}
}

impl RequestContext {
	/// Where preference and extension methods may run.
	pub const PREFERENCES_AFFINITY: Affinity = Affinity::Only(ThreadId::Ui);

	/// The context shared by browsers that were not given one.
	pub fn global(rt: &Runtime) -> Result<Self> {
		let ptr = unsafe { (rt.api().request_context_get_global_context)() };
		unsafe { Self::create_from(rt, ptr) }
	}

	/// Creates a context. With `other` the new context shares its storage.
	pub fn create_context(rt: &Runtime, other: Option<&RequestContext>) -> Result<Self> {
		let other = match other {
			Some(other) => other.to_native()?,
			None => ptr::null_mut(),
		};
		let ptr = unsafe { (rt.api().request_context_create_context)(other) };
		unsafe { Self::create_from(rt, ptr) }
	}

	fn on_ui(&self, operation: &'static str) -> Result<*mut cef_request_context_t> {
		let ptr = self.to_native()?;
		self.runtime().ensure_affinity(Self::PREFERENCES_AFFINITY, operation)?;
		Ok(ptr)
	}

	fn with_name<R>(
		&self,
		operation: &'static str,
		name: &str,
		f: impl FnOnce(*mut cef_request_context_t, *const cef_string_t) -> Result<R>,
	) -> Result<R> {
		let ptr = self.on_ui(operation)?;
		let name = CefStringArg::text(name)?;
		let native = name.as_native();
		f(ptr, native.as_ptr())
	}

	/// True when both wrap the same context.
	pub fn is_same(&self, other: &RequestContext) -> Result<bool> {
		let ptr = self.to_native()?;
		let that = other.to_native()?;
		Ok(native_call!(ptr, is_same(that))? != 0)
	}

	/// True when both share storage.
	pub fn is_sharing_with(&self, other: &RequestContext) -> Result<bool> {
		let ptr = self.to_native()?;
		let that = other.to_native()?;
		Ok(native_call!(ptr, is_sharing_with(that))? != 0)
	}

	pub fn is_global(&self) -> Result<bool> {
		let ptr = self.to_native()?;
		Ok(native_call!(ptr, is_global())? != 0)
	}

	/// On-disk cache directory; `None` for an in-memory context.
	pub fn cache_path(&self) -> Result<Option<String>> {
		let ptr = self.to_native()?;
		let raw = native_call!(ptr, get_cache_path())?;
		unsafe { take_userfree(self.runtime().api(), raw) }
	}

	/// Unregisters every scheme handler factory. Returns false on error.
	pub fn clear_scheme_handler_factories(&self) -> Result<bool> {
		let ptr = self.to_native()?;
		Ok(native_call!(ptr, clear_scheme_handler_factories())? != 0)
	}

	/// Tells renderers to drop their plugin list cache, reloading pages
	/// with plugins when `reload_pages` is set.
	pub fn purge_plugin_list_cache(&self, reload_pages: bool) -> Result<()> {
		let ptr = self.to_native()?;
		native_call!(ptr, purge_plugin_list_cache(i32::from(reload_pages)))
	}

	pub fn has_preference(&self, name: &str) -> Result<bool> {
		self.with_name("RequestContext::has_preference", name, |ptr, name| {
			Ok(native_call!(ptr, has_preference(name))? != 0)
		})
	}

	/// Current value of a preference, or `None` when it does not exist.
	pub fn get_preference(&self, name: &str) -> Result<Option<Value>> {
		self.with_name("RequestContext::get_preference", name, |ptr, name| {
			let value = native_call!(ptr, get_preference(name))?;
			Ok(unsafe { Value::from_native_owned_or_null(self.runtime(), value) })
		})
	}

	/// Every preference as a nested dictionary, optionally with defaults.
	pub fn get_all_preferences(&self, include_defaults: bool) -> Result<Option<DictionaryValue>> {
		let ptr = self.on_ui("RequestContext::get_all_preferences")?;
		let dict = native_call!(ptr, get_all_preferences(i32::from(include_defaults)))?;
		Ok(unsafe { DictionaryValue::from_native_owned_or_null(self.runtime(), dict) })
	}

	pub fn can_set_preference(&self, name: &str) -> Result<bool> {
		self.with_name("RequestContext::can_set_preference", name, |ptr, name| {
			Ok(native_call!(ptr, can_set_preference(name))? != 0)
		})
	}

	/// Sets a preference. `None` restores its default.
	pub fn set_preference(&self, name: &str, value: Option<&Value>) -> Result<PreferenceUpdate> {
		let value = match value {
			Some(value) => value.to_native()?,
			None => ptr::null_mut(),
		};
		let mut error = OutString::new(self.runtime().api());
		let applied = self.with_name("RequestContext::set_preference", name, |ptr, name| {
			Ok(native_call!(ptr, set_preference(name, value, error.as_mut_ptr()))? != 0)
		})?;
		if applied {
			return Ok(PreferenceUpdate::Applied);
		}
		let reason = error.into_string()?.unwrap_or_default();
		tracing::debug!(%reason, "preference update rejected");
		Ok(PreferenceUpdate::Rejected(reason))
	}

	/// Clears certificate exceptions added by the user. `callback` runs on
	/// the UI thread once done.
	pub fn clear_certificate_exceptions<H: CompletionCallback>(&self, callback: Option<H>) -> Result<()> {
		let ptr = self.to_native()?;
		let callback = callback.map(|handler| export_completion(self.runtime(), handler));
		let raw = callback.as_ref().map_or(ptr::null_mut(), |native| native.get());
		native_call!(ptr, clear_certificate_exceptions(raw))
	}

	/// Clears HTTP auth credentials collected while handling auth
	/// challenges. `callback` runs on the UI thread once done.
	pub fn clear_http_auth_credentials<H: CompletionCallback>(&self, callback: Option<H>) -> Result<()> {
		let ptr = self.to_native()?;
		let callback = callback.map(|handler| export_completion(self.runtime(), handler));
		let raw = callback.as_ref().map_or(ptr::null_mut(), |native| native.get());
		native_call!(ptr, clear_http_auth_credentials(raw))
	}

	/// Closes all idle and active connections. `callback` runs on the UI
	/// thread once done.
	pub fn close_all_connections<H: CompletionCallback>(&self, callback: Option<H>) -> Result<()> {
		let ptr = self.to_native()?;
		let callback = callback.map(|handler| export_completion(self.runtime(), handler));
		let raw = callback.as_ref().map_or(ptr::null_mut(), |native| native.get());
		native_call!(ptr, close_all_connections(raw))
	}

	/// Resolves `origin` to a list of addresses and reports them to
	/// `callback` on the UI thread.
	pub fn resolve_host<H: ResolveCallback>(&self, origin: &str, callback: H) -> Result<()> {
		if origin.is_empty() {
			return Err(Error::NullArgument("origin"));
		}
		let ptr = self.to_native()?;
		let origin = CefStringArg::text(origin)?;
		let origin = origin.as_native();
		let callback = export_resolve(self.runtime(), callback);
		native_call!(ptr, resolve_host(origin.as_ptr(), callback.get()))
	}

	/// Ids of loaded extensions, or `None` when extensions are unavailable.
	pub fn extensions(&self) -> Result<Option<Vec<String>>> {
		let ptr = self.on_ui("RequestContext::extensions")?;
		let ids = StringList::new(self.runtime().api())?;
		if native_call!(ptr, get_extensions(ids.as_raw()))? == 0 {
			return Ok(None);
		}
		ids.to_vec().map(Some)
	}

	/// True when this context loaded the extension itself, as opposed to
	/// sharing storage with the context that did.
	pub fn did_load_extension(&self, id: &str) -> Result<bool> {
		self.with_name("RequestContext::did_load_extension", id, |ptr, id| {
			Ok(native_call!(ptr, did_load_extension(id))? != 0)
		})
	}

	pub fn has_extension(&self, id: &str) -> Result<bool> {
		self.with_name("RequestContext::has_extension", id, |ptr, id| {
			Ok(native_call!(ptr, has_extension(id))? != 0)
		})
	}
}
