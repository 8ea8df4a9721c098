//! Shared shape of the typed proxies.

/// Declares a proxy struct over `Handle<$raw>` with the common constructors
/// and accessors.
macro_rules! proxy {
	($(#[$meta:meta])* $name:ident => $raw:ty, affinity = $affinity:expr) => {
		$(#[$meta])*
		#[derive(Clone, PartialEq, Eq, Hash)]
		pub struct $name {
			handle: ::cefglue_runtime::Handle<$raw>,
		}

		#[allow(dead_code)]
		impl $name {
			/// Threads this proxy's methods may be called from.
			pub const AFFINITY: ::cefglue_runtime::Affinity = $affinity;

			/// Wraps a pointer the engine lent for the duration of a call.
			///
			/// Returns the cached owning instance when there is one.
			///
			/// # Safety
			///
			/// `ptr` must be live for as long as the proxy is used, which is at
			/// most the enclosing native call unless it is cloned.
			pub unsafe fn from_native(
				rt: &::cefglue_runtime::Runtime,
				ptr: *mut $raw,
			) -> ::cefglue_runtime::Result<Self> {
				let handle = unsafe { ::cefglue_runtime::Handle::from_native(rt, ptr) }?;
				Ok(Self { handle })
			}

			/// Like `from_native`, mapping null to `None`.
			///
			/// # Safety
			///
			/// As for `from_native`.
			pub unsafe fn from_native_or_null(rt: &::cefglue_runtime::Runtime, ptr: *mut $raw) -> Option<Self> {
				unsafe { ::cefglue_runtime::Handle::from_native_or_null(rt, ptr) }.map(|handle| Self { handle })
			}

			/// Adopts the reference a native getter returned.
			///
			/// # Safety
			///
			/// `ptr` must be null or a live object carrying one reference for
			/// the caller.
			pub unsafe fn from_native_owned(
				rt: &::cefglue_runtime::Runtime,
				ptr: *mut $raw,
			) -> ::cefglue_runtime::Result<Self> {
				let handle = unsafe { ::cefglue_runtime::Handle::from_native_owned(rt, ptr) }?;
				Ok(Self { handle })
			}

			/// Like `from_native_owned`, mapping null to `None`.
			///
			/// # Safety
			///
			/// As for `from_native_owned`.
			pub unsafe fn from_native_owned_or_null(
				rt: &::cefglue_runtime::Runtime,
				ptr: *mut $raw,
			) -> Option<Self> {
				unsafe { ::cefglue_runtime::Handle::from_native_owned_or_null(rt, ptr) }
					.map(|handle| Self { handle })
			}

			/// Adopts the single reference a native factory returned.
			pub(crate) unsafe fn create_from(
				rt: &::cefglue_runtime::Runtime,
				ptr: *mut $raw,
			) -> ::cefglue_runtime::Result<Self> {
				let handle = unsafe { ::cefglue_runtime::Handle::create(rt, ptr) }?;
				Ok(Self { handle })
			}

			pub fn handle(&self) -> &::cefglue_runtime::Handle<$raw> {
				&self.handle
			}

			/// Raw pointer for a native call. Fails after `dispose` or when
			/// called off the thread `AFFINITY` names.
			pub fn to_native(&self) -> ::cefglue_runtime::Result<*mut $raw> {
				let ptr = self.handle.to_native()?;
				self.runtime().ensure_affinity(Self::AFFINITY, stringify!($name))?;
				Ok(ptr)
			}

			pub fn runtime(&self) -> &::cefglue_runtime::Runtime {
				self.handle.runtime()
			}

			pub fn ownership(&self) -> ::cefglue_runtime::Ownership {
				self.handle.ownership()
			}

			/// Returns an owned proxy for the same object, taking a reference
			/// if this one is borrowed.
			pub fn retain(&self) -> ::cefglue_runtime::Result<Self> {
				Ok(Self {
					handle: self.handle.retain()?,
				})
			}

			/// Releases the native reference now. Idempotent; clones sharing
			/// this instance are disposed too.
			pub fn dispose(&self) {
				self.handle.dispose();
			}

			pub fn is_disposed(&self) -> bool {
				self.handle.is_disposed()
			}
		}

		impl ::std::fmt::Debug for $name {
			fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
				::std::fmt::Debug::fmt(&self.handle, f)
			}
		}
	};
}

pub(crate) use proxy;

#[cfg(test)]
mod tests {
	use cefglue_runtime::{Affinity, Error, Runtime, Settings, ThreadId, native_call};
	use cefglue_sys::{TID_UI, cef_callback_t};
	use cefglue_testkit::FakeEngine;

	proxy! {
		UiCallback => cef_callback_t, affinity = Affinity::Only(ThreadId::Ui)
	}

	impl UiCallback {
		fn cont(&self) -> cefglue_runtime::Result<()> {
			let ptr = self.to_native()?;
			native_call!(ptr, cont())
		}
	}

	#[test]
	fn test_declared_affinity_guards_native_calls() {
		let engine = FakeEngine::new();
		let rt = Runtime::new(engine.api(), Settings::default()).unwrap();
		let (ptr, calls) = engine.callback();
		let callback = unsafe { UiCallback::from_native_owned(&rt, ptr) }.unwrap();

		let err = callback.cont().unwrap_err();
		assert!(matches!(
			err,
			Error::WrongThread {
				expected: ThreadId::Ui,
				operation: "UiCallback"
			}
		));
		assert_eq!(calls.continued(), 0);

		engine.run_on(TID_UI, || callback.cont()).unwrap();
		assert_eq!(calls.continued(), 1);
		drop(callback);
		assert_eq!(engine.stats().live_objects, 0);
	}
}
