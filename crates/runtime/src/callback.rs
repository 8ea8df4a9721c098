//! Exports Rust handlers to the engine as native callback objects.
//!
//! [`export`] boxes a [`Trampoline`] whose first field is the native vtable,
//! so the engine sees an ordinary ref-counted object. The Rust handler is not
//! stored in the trampoline: it lives in the runtime's [`CallbackTable`] under
//! a [`CallbackToken`], and the trampoline only carries the token. When the
//! engine drops the last reference the trampoline is freed and the table
//! entry removed, which drops the handler.
//!
//! Every entry point runs through [`guard`], so a panicking handler never
//! unwinds into native code.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering, fence};

use cefglue_sys::cef_base_ref_counted_t;
use dashmap::DashMap;

use crate::handle::{NativeRef, RefCounted};
use crate::runtime::Runtime;
use crate::settings::PanicPolicy;

/// Stable key of an exported handler in the [`CallbackTable`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CallbackToken(u64);

impl CallbackToken {
	pub fn get(self) -> u64 {
		self.0
	}
}

/// Handlers currently referenced by the engine.
pub struct CallbackTable {
	handlers: DashMap<CallbackToken, Arc<dyn Any + Send + Sync>>,
	next: AtomicU64,
	panics: AtomicU64,
}

impl Default for CallbackTable {
	fn default() -> Self {
		Self::new()
	}
}

impl CallbackTable {
	pub fn new() -> Self {
		Self {
			handlers: DashMap::new(),
			next: AtomicU64::new(1),
			panics: AtomicU64::new(0),
		}
	}

	pub fn insert(&self, handler: Arc<dyn Any + Send + Sync>) -> CallbackToken {
		let token = CallbackToken(self.next.fetch_add(1, Ordering::Relaxed));
		self.handlers.insert(token, handler);
		token
	}

	pub fn get<H: Any + Send + Sync>(&self, token: CallbackToken) -> Option<Arc<H>> {
		let handler = self.handlers.get(&token)?.value().clone();
		handler.downcast::<H>().ok()
	}

	/// Removes the handler. Returns false if it was already gone.
	pub fn remove(&self, token: CallbackToken) -> bool {
		// The handler is dropped after the shard lock is released.
		self.handlers.remove(&token).is_some()
	}

	pub fn contains(&self, token: CallbackToken) -> bool {
		self.handlers.contains_key(&token)
	}

	pub fn len(&self) -> usize {
		self.handlers.len()
	}

	pub fn is_empty(&self) -> bool {
		self.handlers.is_empty()
	}

	/// Panics caught at the ABI boundary so far.
	pub fn panic_count(&self) -> u64 {
		self.panics.load(Ordering::Relaxed)
	}

	fn record_panic(&self) {
		self.panics.fetch_add(1, Ordering::Relaxed);
	}
}

impl std::fmt::Debug for CallbackTable {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("CallbackTable")
			.field("handlers", &self.handlers.len())
			.field("panics", &self.panic_count())
			.finish()
	}
}

/// Native object backing one exported handler.
#[repr(C)]
pub struct Trampoline<C> {
	raw: C,
	refs: AtomicUsize,
	token: CallbackToken,
	rt: Runtime,
}

/// Exports `handler` behind the vtable `C`.
///
/// `vtable` supplies the method slots; its refcount header is overwritten.
/// The returned reference is the initial one: pass it to the engine (which
/// adds its own references) and drop it afterwards.
pub fn export<C, H>(rt: &Runtime, handler: Arc<H>, vtable: C) -> NativeRef<C>
where
	C: RefCounted,
	H: Any + Send + Sync,
{
	let token = rt.callbacks().insert(handler);
	let trampoline = Box::new(Trampoline {
		raw: vtable,
		refs: AtomicUsize::new(1),
		token,
		rt: rt.clone(),
	});
	let ptr = Box::into_raw(trampoline).cast::<C>();
	// SAFETY: `C` starts with the refcount header and the box is live.
	unsafe {
		*C::base(ptr) = cef_base_ref_counted_t {
			size: size_of::<C>(),
			add_ref: Some(add_ref::<C>),
			release: Some(release::<C>),
			has_one_ref: Some(has_one_ref::<C>),
			has_at_least_one_ref: Some(has_at_least_one_ref::<C>),
		};
	}
	tracing::debug!(r#type = C::TYPE_NAME, token = token.get(), "exported callback");
	unsafe { NativeRef::owned(ptr) }
}

/// Looks up the token of an exported object.
///
/// # Safety
///
/// `ptr` must have been returned by [`export`] and still be alive.
pub unsafe fn token_of<C: RefCounted>(ptr: *mut C) -> CallbackToken {
	unsafe { (*ptr.cast::<Trampoline<C>>()).token }
}

/// Runs `f` with the handler behind an exported object.
///
/// Returns `R::default()` when the handler is gone or panicked.
///
/// # Safety
///
/// `self_` must be null or an object created by [`export`] with vtable `C`.
pub unsafe fn dispatch<C, H, R, F>(self_: *mut C, site: &'static str, f: F) -> R
where
	C: RefCounted,
	H: Any + Send + Sync,
	R: Default,
	F: FnOnce(&H, &Runtime) -> R,
{
	if self_.is_null() {
		return R::default();
	}
	let trampoline = unsafe { &*self_.cast::<Trampoline<C>>() };
	let rt = &trampoline.rt;
	let Some(handler) = rt.callbacks().get::<H>(trampoline.token) else {
		tracing::warn!(
			r#type = C::TYPE_NAME,
			site,
			token = trampoline.token.get(),
			"callback invoked after its handler was removed"
		);
		return R::default();
	};
	guard(rt, site, || f(&handler, rt))
}

/// Runs `f`, converting a panic into the runtime's [`PanicPolicy`].
pub fn guard<R: Default>(rt: &Runtime, site: &'static str, f: impl FnOnce() -> R) -> R {
	match panic::catch_unwind(AssertUnwindSafe(f)) {
		Ok(value) => value,
		Err(payload) => {
			rt.callbacks().record_panic();
			let message = panic_message(payload.as_ref());
			tracing::error!(site, reason = message, "panic in callback handler");
			match rt.settings().callback_panic {
				PanicPolicy::LogAndSwallow => R::default(),
				PanicPolicy::Abort => std::process::abort(),
			}
		}
	}
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
	if let Some(message) = payload.downcast_ref::<&'static str>() {
		message
	} else if let Some(message) = payload.downcast_ref::<String>() {
		message
	} else {
		"<non-string panic payload>"
	}
}

unsafe extern "C" fn add_ref<C: RefCounted>(base: *mut cef_base_ref_counted_t) {
	let trampoline = unsafe { &*base.cast::<Trampoline<C>>() };
	trampoline.refs.fetch_add(1, Ordering::Relaxed);
}

unsafe extern "C" fn release<C: RefCounted>(base: *mut cef_base_ref_counted_t) -> i32 {
	let ptr = base.cast::<Trampoline<C>>();
	let previous = unsafe { (*ptr).refs.fetch_sub(1, Ordering::Release) };
	if previous != 1 {
		return 0;
	}
	fence(Ordering::Acquire);
	// SAFETY: this was the last reference; nothing else can reach the box.
	let trampoline = unsafe { Box::from_raw(ptr) };
	let Trampoline { token, rt, .. } = *trampoline;
	tracing::debug!(r#type = C::TYPE_NAME, token = token.get(), "released callback");
	guard(&rt, "release", || rt.callbacks().remove(token));
	1
}

unsafe extern "C" fn has_one_ref<C: RefCounted>(base: *mut cef_base_ref_counted_t) -> i32 {
	let trampoline = unsafe { &*base.cast::<Trampoline<C>>() };
	i32::from(trampoline.refs.load(Ordering::Acquire) == 1)
}

unsafe extern "C" fn has_at_least_one_ref<C: RefCounted>(base: *mut cef_base_ref_counted_t) -> i32 {
	let trampoline = unsafe { &*base.cast::<Trampoline<C>>() };
	i32::from(trampoline.refs.load(Ordering::Acquire) >= 1)
}

#[cfg(test)]
mod tests;
