//! Generic wrapper around one native reference.
//!
//! [`Handle<T>`] is the base every typed proxy is built on. It records
//! whether it owns a reference ([`Ownership::Owned`]) or borrows the caller's
//! ([`Ownership::Borrowed`]) and releases exactly what it owns on teardown.
//!
//! Owned handles of types with [`RefCounted::CACHE_IDENTITY`] are registered
//! in the runtime's [`HandleRegistry`](crate::HandleRegistry), so wrapping the
//! same native object twice yields the same instance while it is alive.
//! Borrowed handles are never registered: they must not outlive the native
//! call that produced them, and cloning one takes a reference of its own.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::handle::{self, NativeRef, Ownership, RefCounted};
use crate::registry::RegistryKey;
use crate::runtime::Runtime;

struct HandleInner<T: RefCounted> {
	rt: Runtime,
	native: NativeRef<T>,
	key: RegistryKey,
	instance: Option<u64>,
}

impl<T: RefCounted> HandleInner<T> {
	fn unregister(&self) {
		if let Some(instance) = self.instance {
			self.rt.registry().unregister(self.key, instance);
		}
	}
}

impl<T: RefCounted> Drop for HandleInner<T> {
	fn drop(&mut self) {
		// The address may be reused once released, so unregister first.
		self.unregister();
		self.native.release();
	}
}

/// A typed wrapper around a native `T`.
///
/// Clones of an owned handle share one instance and one native reference.
pub struct Handle<T: RefCounted> {
	inner: Arc<HandleInner<T>>,
}

impl<T: RefCounted> Handle<T> {
	/// Adopts the single reference a native factory returned.
	///
	/// # Safety
	///
	/// `ptr` must be null or a live `T` carrying one reference for the caller.
	pub unsafe fn create(rt: &Runtime, ptr: *mut T) -> Result<Self> {
		if ptr.is_null() {
			return Err(Error::CreateFailed {
				type_name: T::TYPE_NAME,
			});
		}
		Ok(unsafe { Self::adopt(rt, ptr) })
	}

	/// Adopts the reference a native getter returned.
	///
	/// On an identity-cache hit the extra reference is released and the cached
	/// instance is returned.
	///
	/// # Safety
	///
	/// As for [`Handle::create`].
	pub unsafe fn from_native_owned(rt: &Runtime, ptr: *mut T) -> Result<Self> {
		if ptr.is_null() {
			return Err(Error::NullHandle {
				type_name: T::TYPE_NAME,
			});
		}
		Ok(unsafe { Self::adopt(rt, ptr) })
	}

	/// Like [`Handle::from_native_owned`], mapping null to `None`.
	///
	/// # Safety
	///
	/// As for [`Handle::create`].
	pub unsafe fn from_native_owned_or_null(rt: &Runtime, ptr: *mut T) -> Option<Self> {
		if ptr.is_null() {
			None
		} else {
			Some(unsafe { Self::adopt(rt, ptr) })
		}
	}

	/// Wraps a pointer the engine lent for the duration of a call.
	///
	/// Returns the cached owned instance if there is one; otherwise a borrowed
	/// handle that leaves the refcount alone.
	///
	/// # Safety
	///
	/// `ptr` must be live for as long as the returned handle is used, which is
	/// at most the enclosing native call unless it is cloned.
	pub unsafe fn from_native(rt: &Runtime, ptr: *mut T) -> Result<Self> {
		if ptr.is_null() {
			return Err(Error::NullHandle {
				type_name: T::TYPE_NAME,
			});
		}
		let key = RegistryKey::of(ptr);
		if Self::caches(rt) {
			if let Some(inner) = rt.registry().get::<HandleInner<T>>(key) {
				tracing::trace!(r#type = T::TYPE_NAME, "identity cache hit for borrowed handle");
				return Ok(Self { inner });
			}
		}
		Ok(Self {
			inner: Arc::new(HandleInner {
				rt: rt.clone(),
				native: unsafe { NativeRef::borrowed(ptr) },
				key,
				instance: None,
			}),
		})
	}

	/// Like [`Handle::from_native`], mapping null to `None`.
	///
	/// # Safety
	///
	/// As for [`Handle::from_native`].
	pub unsafe fn from_native_or_null(rt: &Runtime, ptr: *mut T) -> Option<Self> {
		if ptr.is_null() {
			None
		} else {
			unsafe { Self::from_native(rt, ptr) }.ok()
		}
	}

	fn caches(rt: &Runtime) -> bool {
		T::CACHE_IDENTITY && rt.settings().identity_cache
	}

	/// Takes over one reference to a non-null `ptr`.
	unsafe fn adopt(rt: &Runtime, ptr: *mut T) -> Self {
		let key = RegistryKey::of(ptr);
		if !Self::caches(rt) {
			tracing::trace!(r#type = T::TYPE_NAME, "wrapping owned handle");
			return Self {
				inner: Arc::new(HandleInner {
					rt: rt.clone(),
					native: unsafe { NativeRef::owned(ptr) },
					key,
					instance: None,
				}),
			};
		}

		let (inner, hit) = rt.registry().get_or_register(key, |instance| {
			Arc::new(HandleInner {
				rt: rt.clone(),
				// SAFETY: the caller transferred one reference for `ptr`.
				native: unsafe { NativeRef::owned(ptr) },
				key,
				instance: Some(instance),
			})
		});
		if hit {
			// The cached wrapper already owns a reference; drop the duplicate.
			unsafe { handle::release(ptr) };
			tracing::debug!(r#type = T::TYPE_NAME, addr = key.addr(), "identity cache hit");
		} else {
			tracing::debug!(r#type = T::TYPE_NAME, addr = key.addr(), "registered owned handle");
		}
		Self { inner }
	}

	/// Returns the raw pointer for the next native call.
	pub fn to_native(&self) -> Result<*mut T> {
		let ptr = self.inner.native.get();
		if ptr.is_null() {
			Err(Error::Disposed {
				type_name: T::TYPE_NAME,
			})
		} else {
			Ok(ptr)
		}
	}

	/// Releases the native reference now instead of on drop.
	///
	/// Idempotent. Every clone sharing this instance observes the disposal.
	pub fn dispose(&self) {
		self.inner.unregister();
		if self.inner.native.release() {
			tracing::debug!(r#type = T::TYPE_NAME, addr = self.inner.key.addr(), "disposed handle");
		}
	}

	pub fn is_disposed(&self) -> bool {
		self.inner.native.is_released()
	}

	pub fn ownership(&self) -> Ownership {
		self.inner.native.ownership()
	}

	pub fn runtime(&self) -> &Runtime {
		&self.inner.rt
	}

	/// Address of the wrapped object. Stays stable after dispose.
	pub fn addr(&self) -> usize {
		self.inner.key.addr()
	}

	/// True when both handles are the same wrapper instance.
	pub fn same_instance(&self, other: &Self) -> bool {
		Arc::ptr_eq(&self.inner, &other.inner)
	}

	/// True when this handle's native object has exactly one reference.
	pub fn has_one_ref(&self) -> Result<bool> {
		let ptr = self.to_native()?;
		Ok(unsafe { handle::has_one_ref(ptr) })
	}

	/// Returns an owned handle to the same object.
	///
	/// Owned handles share their instance. A borrowed handle takes a new
	/// reference, so the result may outlive the call it was lent for.
	pub fn retain(&self) -> Result<Self> {
		if self.ownership() == Ownership::Owned {
			return Ok(Self {
				inner: Arc::clone(&self.inner),
			});
		}
		let ptr = self.to_native()?;
		// SAFETY: the borrowed pointer is live for the current call.
		unsafe {
			handle::add_ref(ptr);
			Ok(Self::adopt(&self.inner.rt, ptr))
		}
	}
}

impl<T: RefCounted> Clone for Handle<T> {
	fn clone(&self) -> Self {
		self.retain().unwrap_or_else(|_| Self {
			inner: Arc::clone(&self.inner),
		})
	}
}

impl<T: RefCounted> PartialEq for Handle<T> {
	fn eq(&self, other: &Self) -> bool {
		self.addr() == other.addr()
	}
}

impl<T: RefCounted> Eq for Handle<T> {}

impl<T: RefCounted> Hash for Handle<T> {
	fn hash<H: Hasher>(&self, state: &mut H) {
		self.addr().hash(state);
	}
}

impl<T: RefCounted> fmt::Debug for Handle<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct(T::TYPE_NAME)
			.field("addr", &format_args!("{:#x}", self.addr()))
			.field("ownership", &self.ownership())
			.field("disposed", &self.is_disposed())
			.finish()
	}
}

#[cfg(test)]
mod tests;
