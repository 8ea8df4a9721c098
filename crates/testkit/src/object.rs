//! Ref-counted fake objects.
//!
//! Objects are never freed: on the last release they are marked dead and
//! their [`FakeState::destroy`] hook runs, but the memory stays mapped. This
//! keeps over-releases and calls on released objects observable (they are
//! counted in [`Stats`]) instead of undefined.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use cefglue_sys::cef_base_ref_counted_t;

use crate::stats::Stats;

/// Per-type state behind a fake object.
pub(crate) trait FakeState: Send + Sync + 'static {
	/// Runs once when the refcount reaches zero.
	fn destroy(&self) {}
}

pub(crate) struct Header {
	refs: AtomicUsize,
	dead: AtomicBool,
	stats: Arc<Stats>,
}

#[repr(C)]
pub(crate) struct FakeObject<C, S> {
	raw: C,
	header: Header,
	state: S,
}

/// Allocates an object with one reference and installs the refcount header.
pub(crate) fn new_object<C, S: FakeState>(stats: &Arc<Stats>, raw: C, state: S) -> *mut C {
	let object = Box::new(FakeObject {
		raw,
		header: Header {
			refs: AtomicUsize::new(1),
			dead: AtomicBool::new(false),
			stats: Arc::clone(stats),
		},
		state,
	});
	let ptr = Box::into_raw(object);
	// SAFETY: every vtable struct starts with the refcount header.
	unsafe {
		*ptr.cast::<cef_base_ref_counted_t>() = cef_base_ref_counted_t {
			size: size_of::<C>(),
			add_ref: Some(add_ref::<C, S>),
			release: Some(release::<C, S>),
			has_one_ref: Some(has_one_ref::<C, S>),
			has_at_least_one_ref: Some(has_at_least_one_ref::<C, S>),
		};
	}
	stats.object_created();
	ptr.cast()
}

unsafe fn object<'a, C: 'a, S: 'a>(ptr: *mut C) -> &'a FakeObject<C, S> {
	unsafe { &*ptr.cast::<FakeObject<C, S>>() }
}

/// Returns the state of a live object, or `None` (counted as a use after
/// release) for a dead or null one.
pub(crate) unsafe fn state<'a, C: 'a, S: 'a>(ptr: *mut C) -> Option<&'a S> {
	if ptr.is_null() {
		return None;
	}
	let object = unsafe { object::<C, S>(ptr) };
	if object.header.dead.load(Ordering::Acquire) {
		object.header.stats.use_after_release();
		return None;
	}
	Some(&object.state)
}

/// Returns the state without the liveness check.
pub(crate) unsafe fn state_unchecked<'a, C: 'a, S: 'a>(ptr: *mut C) -> &'a S {
	unsafe { &object::<C, S>(ptr).state }
}

pub(crate) unsafe fn stats_of<C, S>(ptr: *mut C) -> Arc<Stats> {
	unsafe { Arc::clone(&object::<C, S>(ptr).header.stats) }
}

/// Current refcount of a fake object created by this crate.
///
/// # Safety
///
/// `ptr` must come from this crate's engine, not from an exported callback.
pub unsafe fn ref_count<C>(ptr: *mut C) -> usize {
	// `FakeObject` is `repr(C)`, so the header sits right after `raw`.
	let offset = size_of::<C>().next_multiple_of(align_of::<Header>());
	let header = unsafe { &*ptr.cast::<u8>().add(offset).cast::<Header>() };
	header.refs.load(Ordering::Acquire)
}

unsafe extern "C" fn add_ref<C, S>(base: *mut cef_base_ref_counted_t) {
	let object = unsafe { object::<C, S>(base.cast()) };
	if object.header.dead.load(Ordering::Acquire) {
		object.header.stats.use_after_release();
		return;
	}
	object.header.refs.fetch_add(1, Ordering::Relaxed);
}

unsafe extern "C" fn release<C, S: FakeState>(base: *mut cef_base_ref_counted_t) -> i32 {
	let object = unsafe { object::<C, S>(base.cast()) };
	let header = &object.header;
	let mut current = header.refs.load(Ordering::Acquire);
	loop {
		if current == 0 {
			header.stats.over_release();
			return 0;
		}
		match header
			.refs
			.compare_exchange(current, current - 1, Ordering::AcqRel, Ordering::Acquire)
		{
			Ok(_) => break,
			Err(actual) => current = actual,
		}
	}
	if current != 1 {
		return 0;
	}
	header.dead.store(true, Ordering::Release);
	header.stats.object_destroyed();
	object.state.destroy();
	1
}

unsafe extern "C" fn has_one_ref<C, S>(base: *mut cef_base_ref_counted_t) -> i32 {
	let object = unsafe { object::<C, S>(base.cast()) };
	i32::from(object.header.refs.load(Ordering::Acquire) == 1)
}

unsafe extern "C" fn has_at_least_one_ref<C, S>(base: *mut cef_base_ref_counted_t) -> i32 {
	let object = unsafe { object::<C, S>(base.cast()) };
	i32::from(object.header.refs.load(Ordering::Acquire) >= 1)
}

/// Releases a reference through the object's own header.
pub(crate) unsafe fn release_raw<C>(ptr: *mut C) {
	let base = ptr.cast::<cef_base_ref_counted_t>();
	if let Some(release) = unsafe { (*base).release } {
		unsafe { release(base) };
	}
}

pub(crate) unsafe fn add_ref_raw<C>(ptr: *mut C) {
	let base = ptr.cast::<cef_base_ref_counted_t>();
	if let Some(add_ref) = unsafe { (*base).add_ref } {
		unsafe { add_ref(base) };
	}
}

/// Raw pointer that may cross threads inside queued tasks.
pub(crate) struct SendPtr<T>(pub(crate) *mut T);

// SAFETY: the pointee is a ref-counted object with atomic refcounting.
unsafe impl<T> Send for SendPtr<T> {}
unsafe impl<T> Sync for SendPtr<T> {}

impl<T> SendPtr<T> {
	/// Closures must capture the wrapper through this, not the field.
	pub(crate) fn get(self) -> *mut T {
		self.0
	}
}

impl<T> Clone for SendPtr<T> {
	fn clone(&self) -> Self {
		*self
	}
}

impl<T> Copy for SendPtr<T> {}
