//! Raw reference-count plumbing shared by proxies and exported callbacks.

use std::ptr;
use std::sync::atomic::{AtomicPtr, Ordering};

use cefglue_sys as sys;
use sys::cef_base_ref_counted_t;

/// A native struct whose first field is [`cef_base_ref_counted_t`].
///
/// # Safety
///
/// Implementors must be `#[repr(C)]` with the refcount header at offset 0, so
/// that a pointer to the struct is also a valid pointer to its header.
pub unsafe trait RefCounted: Sized + 'static {
	/// Proxy-facing name used in errors and logs.
	const TYPE_NAME: &'static str;

	/// Whether owned wrappers of this type are deduplicated by the
	/// [`crate::HandleRegistry`].
	const CACHE_IDENTITY: bool = false;

	fn base(ptr: *mut Self) -> *mut cef_base_ref_counted_t {
		ptr.cast()
	}
}

macro_rules! ref_counted {
	($($ty:ty => $name:literal $(, cache = $cache:literal)?;)*) => {
		$(
			unsafe impl RefCounted for $ty {
				const TYPE_NAME: &'static str = $name;
				$(const CACHE_IDENTITY: bool = $cache;)?
			}
		)*
	};
}

ref_counted! {
	sys::cef_binary_value_t => "BinaryValue";
	sys::cef_dictionary_value_t => "DictionaryValue";
	sys::cef_list_value_t => "ListValue";
	sys::cef_value_t => "Value";
	sys::cef_request_t => "Request", cache = true;
	sys::cef_request_context_t => "RequestContext", cache = true;
	sys::cef_stream_reader_t => "StreamReader";
	sys::cef_read_handler_t => "ReadHandler";
	sys::cef_callback_t => "Callback";
	sys::cef_completion_callback_t => "CompletionCallback";
	sys::cef_resolve_callback_t => "ResolveCallback";
}

#[doc(hidden)]
pub fn type_name_of<T: RefCounted>(_: *mut T) -> &'static str {
	T::TYPE_NAME
}

/// Increments the native refcount.
///
/// # Safety
///
/// `ptr` must point to a live object.
pub unsafe fn add_ref<T: RefCounted>(ptr: *mut T) {
	let base = T::base(ptr);
	if let Some(add_ref) = unsafe { (*base).add_ref } {
		unsafe { add_ref(base) };
	}
}

/// Decrements the native refcount. Returns true when the object was destroyed.
///
/// # Safety
///
/// `ptr` must point to a live object and the caller must own one reference.
pub unsafe fn release<T: RefCounted>(ptr: *mut T) -> bool {
	let base = T::base(ptr);
	match unsafe { (*base).release } {
		Some(release) => unsafe { release(base) != 0 },
		None => false,
	}
}

/// # Safety
///
/// `ptr` must point to a live object.
pub unsafe fn has_one_ref<T: RefCounted>(ptr: *mut T) -> bool {
	let base = T::base(ptr);
	match unsafe { (*base).has_one_ref } {
		Some(has_one_ref) => unsafe { has_one_ref(base) != 0 },
		None => false,
	}
}

/// Whether a wrapper is responsible for one native reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ownership {
	/// Holds one reference, released on teardown.
	Owned,
	/// Borrows the caller's reference for the duration of a native call.
	Borrowed,
}

/// A native pointer plus the reference it is responsible for.
///
/// The pointer is swapped to null on [`NativeRef::release`], so teardown runs
/// at most once no matter how many times it is requested.
pub struct NativeRef<T: RefCounted> {
	ptr: AtomicPtr<T>,
	ownership: Ownership,
}

// SAFETY: the engine's refcounting is atomic; thread affinity of individual
// methods is enforced by the proxies that call them.
unsafe impl<T: RefCounted> Send for NativeRef<T> {}
unsafe impl<T: RefCounted> Sync for NativeRef<T> {}

impl<T: RefCounted> NativeRef<T> {
	/// Adopts one reference the caller already holds.
	///
	/// # Safety
	///
	/// `ptr` must be non-null and the caller must transfer one reference.
	pub unsafe fn owned(ptr: *mut T) -> Self {
		Self {
			ptr: AtomicPtr::new(ptr),
			ownership: Ownership::Owned,
		}
	}

	/// Wraps `ptr` without touching its refcount.
	///
	/// # Safety
	///
	/// `ptr` must stay alive for as long as this value is used.
	pub unsafe fn borrowed(ptr: *mut T) -> Self {
		Self {
			ptr: AtomicPtr::new(ptr),
			ownership: Ownership::Borrowed,
		}
	}

	/// Returns the pointer, or null after [`NativeRef::release`].
	pub fn get(&self) -> *mut T {
		self.ptr.load(Ordering::Acquire)
	}

	pub fn ownership(&self) -> Ownership {
		self.ownership
	}

	pub fn is_released(&self) -> bool {
		self.get().is_null()
	}

	/// Drops this value's claim on the object. Returns true if this call did
	/// the teardown.
	pub fn release(&self) -> bool {
		let ptr = self.ptr.swap(ptr::null_mut(), Ordering::AcqRel);
		if ptr.is_null() {
			return false;
		}
		if self.ownership == Ownership::Owned {
			// SAFETY: the pointer was live and this value owned one reference.
			unsafe { release(ptr) };
		}
		true
	}

	/// Gives up the reference without releasing it.
	pub fn into_raw(self) -> *mut T {
		let ptr = self.ptr.swap(ptr::null_mut(), Ordering::AcqRel);
		std::mem::forget(self);
		ptr
	}
}

impl<T: RefCounted> Drop for NativeRef<T> {
	fn drop(&mut self) {
		self.release();
	}
}

impl<T: RefCounted> std::fmt::Debug for NativeRef<T> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("NativeRef")
			.field("type", &T::TYPE_NAME)
			.field("ptr", &self.get())
			.field("ownership", &self.ownership)
			.finish()
	}
}

/// Calls a vtable method on a native object.
///
/// Evaluates to `Ok(return_value)`, or `Err(Error::MissingMethod)` when the
/// slot is unset. The pointer must be live; arguments are passed through
/// unchanged.
#[macro_export]
macro_rules! native_call {
	($ptr:expr, $method:ident ( $($arg:expr),* $(,)? )) => {{
		let ptr = $ptr;
		// SAFETY: callers pass a pointer obtained from a live handle.
		match unsafe { (*ptr).$method } {
			Some(method) => Ok(unsafe { method(ptr $(, $arg)*) }),
			None => Err($crate::Error::MissingMethod {
				type_name: $crate::type_name_of(ptr),
				method: stringify!($method),
			}),
		}
	}};
}

#[cfg(test)]
mod tests {
	use cefglue_testkit::FakeEngine;

	use super::*;

	#[test]
	fn test_owned_release_runs_once() {
		let engine = FakeEngine::new();
		let api = engine.api();
		let ptr = unsafe { (api.request_create)() };
		assert_eq!(engine.stats().live_objects, 1);

		let native = unsafe { NativeRef::owned(ptr) };
		assert!(native.release());
		assert!(!native.release());
		assert!(native.is_released());
		drop(native);

		let stats = engine.stats();
		assert_eq!(stats.live_objects, 0);
		assert_eq!(stats.over_releases, 0);
	}

	#[test]
	fn test_borrowed_never_releases() {
		let engine = FakeEngine::new();
		let api = engine.api();
		let ptr = unsafe { (api.request_create)() };

		drop(unsafe { NativeRef::borrowed(ptr) });
		assert_eq!(engine.stats().live_objects, 1);

		drop(unsafe { NativeRef::owned(ptr) });
		assert_eq!(engine.stats().live_objects, 0);
	}

	#[test]
	fn test_native_call_reports_missing_method() {
		let mut raw = sys::cef_callback_t {
			base: cef_base_ref_counted_t::empty(size_of::<sys::cef_callback_t>()),
			cont: None,
			cancel: None,
		};
		let ptr: *mut sys::cef_callback_t = &mut raw;
		let result: crate::Result<()> = native_call!(ptr, cont());
		match result {
			Err(crate::Error::MissingMethod { type_name, method }) => {
				assert_eq!(type_name, "Callback");
				assert_eq!(method, "cont");
			}
			other => panic!("unexpected result: {other:?}"),
		}
	}
}
