//! Identity cache for native handles.
//!
//! Maps a native address (plus wrapper type) to the one live owning wrapper
//! for it. Entries hold [`Weak`] references, so the registry never keeps a
//! wrapper or its native object alive; a wrapper removes its own entry when it
//! is dropped or disposed.
//!
//! Each registration carries an instance id. Removal only succeeds for the
//! matching id, so a wrapper dropped late never evicts a newer wrapper that
//! reused the same address.

use std::any::{Any, TypeId};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use dashmap::DashMap;
use dashmap::mapref::entry::Entry as MapEntry;

static NEXT_INSTANCE_ID: AtomicU64 = AtomicU64::new(1);

/// Returns a new process-unique wrapper instance id.
pub fn next_instance_id() -> u64 {
	NEXT_INSTANCE_ID.fetch_add(1, Ordering::Relaxed)
}

/// Cache key: native address and the Rust type of the wrapper.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RegistryKey {
	addr: usize,
	type_id: TypeId,
}

impl RegistryKey {
	pub fn of<T: 'static>(ptr: *mut T) -> Self {
		Self {
			addr: ptr as usize,
			type_id: TypeId::of::<T>(),
		}
	}

	pub fn addr(&self) -> usize {
		self.addr
	}
}

struct Entry {
	instance: u64,
	wrapper: Weak<dyn Any + Send + Sync>,
}

/// Thread-safe registry of live wrappers by native address.
///
/// Never drop an upgraded wrapper while a map guard is held: the last drop of
/// a wrapper unregisters it, which would need the same shard lock.
#[derive(Default)]
pub struct HandleRegistry {
	entries: DashMap<RegistryKey, Entry>,
}

impl HandleRegistry {
	pub fn new() -> Self {
		Self::default()
	}

	/// Returns the live wrapper registered for `key`.
	pub fn get<W: Any + Send + Sync>(&self, key: RegistryKey) -> Option<Arc<W>> {
		let weak = self.entries.get(&key)?.wrapper.clone();
		weak.upgrade()?.downcast::<W>().ok()
	}

	/// Returns the live wrapper for `key`, or registers the one built by
	/// `make`. The flag is true on a cache hit.
	pub fn get_or_register<W, F>(&self, key: RegistryKey, make: F) -> (Arc<W>, bool)
	where
		W: Any + Send + Sync,
		F: FnOnce(u64) -> Arc<W>,
	{
		match self.entries.entry(key) {
			MapEntry::Occupied(mut occupied) => {
				if let Some(existing) = occupied.get().wrapper.upgrade() {
					match existing.downcast::<W>() {
						Ok(existing) => return (existing, true),
						Err(other) => {
							// Keys include the TypeId, so this cannot happen; keep the
							// stray Arc alive until the guard is gone.
							drop(occupied);
							drop(other);
							let instance = next_instance_id();
							let wrapper = make(instance);
							self.insert(key, instance, &wrapper);
							return (wrapper, false);
						}
					}
				}
				let instance = next_instance_id();
				let wrapper = make(instance);
				let weak = Arc::downgrade(&wrapper);
				let weak: Weak<dyn Any + Send + Sync> = weak;
				occupied.insert(Entry {
					instance,
					wrapper: weak,
				});
				(wrapper, false)
			}
			MapEntry::Vacant(vacant) => {
				let instance = next_instance_id();
				let wrapper = make(instance);
				let weak = Arc::downgrade(&wrapper);
				let weak: Weak<dyn Any + Send + Sync> = weak;
				vacant.insert(Entry {
					instance,
					wrapper: weak,
				});
				(wrapper, false)
			}
		}
	}

	/// Registers `wrapper` under `key` unless a different live wrapper is
	/// already there. Returns true if registered.
	pub fn register<W: Any + Send + Sync>(
		&self,
		key: RegistryKey,
		instance: u64,
		wrapper: &Arc<W>,
	) -> bool {
		let weak = Arc::downgrade(wrapper);
		let weak: Weak<dyn Any + Send + Sync> = weak;
		match self.entries.entry(key) {
			MapEntry::Occupied(mut occupied) => match occupied.get().wrapper.upgrade() {
				Some(existing) => {
					let same = Arc::as_ptr(&existing).cast::<()>() == Arc::as_ptr(wrapper).cast::<()>();
					drop(occupied);
					drop(existing);
					same
				}
				None => {
					occupied.insert(Entry {
						instance,
						wrapper: weak,
					});
					true
				}
			},
			MapEntry::Vacant(vacant) => {
				vacant.insert(Entry {
					instance,
					wrapper: weak,
				});
				true
			}
		}
	}

	fn insert<W: Any + Send + Sync>(&self, key: RegistryKey, instance: u64, wrapper: &Arc<W>) {
		let weak = Arc::downgrade(wrapper);
		let weak: Weak<dyn Any + Send + Sync> = weak;
		self.entries.insert(
			key,
			Entry {
				instance,
				wrapper: weak,
			},
		);
	}

	/// Removes the entry for `key` if it still belongs to `instance`.
	pub fn unregister(&self, key: RegistryKey, instance: u64) -> bool {
		self.entries
			.remove_if(&key, |_, entry| entry.instance == instance)
			.is_some()
	}

	/// Number of entries, including ones whose wrapper is being dropped.
	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	/// Number of entries whose wrapper is still alive.
	pub fn live_count(&self) -> usize {
		self.entries
			.iter()
			.filter(|entry| entry.value().wrapper.strong_count() > 0)
			.count()
	}

	pub fn clear(&self) {
		self.entries.clear();
	}
}

impl std::fmt::Debug for HandleRegistry {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("HandleRegistry")
			.field("entries", &self.entries.len())
			.finish()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	struct Wrapper(u32);

	fn key(addr: usize) -> RegistryKey {
		RegistryKey::of(addr as *mut Wrapper)
	}

	#[test]
	fn test_get_or_register_deduplicates() {
		let registry = HandleRegistry::new();
		let (first, hit) = registry.get_or_register(key(0x10), |_| Arc::new(Wrapper(1)));
		assert!(!hit);
		let (second, hit) = registry.get_or_register(key(0x10), |_| Arc::new(Wrapper(2)));
		assert!(hit);
		assert!(Arc::ptr_eq(&first, &second));
		assert_eq!(second.0, 1);
	}

	#[test]
	fn test_dead_entry_is_replaced() {
		let registry = HandleRegistry::new();
		let (first, _) = registry.get_or_register(key(0x20), |_| Arc::new(Wrapper(1)));
		drop(first);
		assert!(registry.get::<Wrapper>(key(0x20)).is_none());
		assert_eq!(registry.live_count(), 0);

		let (second, hit) = registry.get_or_register(key(0x20), |_| Arc::new(Wrapper(2)));
		assert!(!hit);
		assert_eq!(second.0, 2);
	}

	#[test]
	fn test_stale_unregister_keeps_newer_entry() {
		let registry = HandleRegistry::new();
		let mut old_instance = 0;
		let (old, _) = registry.get_or_register(key(0x30), |instance| {
			old_instance = instance;
			Arc::new(Wrapper(1))
		});
		drop(old);
		let (new, _) = registry.get_or_register(key(0x30), |_| Arc::new(Wrapper(2)));

		assert!(!registry.unregister(key(0x30), old_instance));
		let cached = registry.get::<Wrapper>(key(0x30)).unwrap();
		assert!(Arc::ptr_eq(&cached, &new));
	}

	#[test]
	fn test_register_refuses_to_replace_live_wrapper() {
		let registry = HandleRegistry::new();
		let a = Arc::new(Wrapper(1));
		let b = Arc::new(Wrapper(2));
		assert!(registry.register(key(0x40), next_instance_id(), &a));
		assert!(registry.register(key(0x40), next_instance_id(), &a));
		assert!(!registry.register(key(0x40), next_instance_id(), &b));
		assert_eq!(registry.get::<Wrapper>(key(0x40)).unwrap().0, 1);
	}

	#[test]
	fn test_keys_are_per_type() {
		struct Other;
		let registry = HandleRegistry::new();
		let (_a, _) = registry.get_or_register(key(0x50), |_| Arc::new(Wrapper(1)));
		let other_key = RegistryKey::of(0x50 as *mut Other);
		assert!(registry.get::<Other>(other_key).is_none());
		assert_ne!(key(0x50), other_key);
	}

	#[test]
	fn test_concurrent_registration_yields_one_instance() {
		let registry = Arc::new(HandleRegistry::new());
		let handles: Vec<_> = (0..8)
			.map(|i| {
				let registry = Arc::clone(&registry);
				std::thread::spawn(move || {
					let (wrapper, _) =
						registry.get_or_register(key(0x60), |_| Arc::new(Wrapper(i)));
					wrapper
				})
			})
			.collect();
		let wrappers: Vec<Arc<Wrapper>> = handles.into_iter().map(|h| h.join().unwrap()).collect();
		for wrapper in &wrappers[1..] {
			assert!(Arc::ptr_eq(&wrappers[0], wrapper));
		}
		assert_eq!(registry.len(), 1);
	}
}
