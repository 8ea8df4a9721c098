use std::sync::atomic::AtomicUsize;

use cefglue_sys::cef_completion_callback_t;
use cefglue_testkit::FakeEngine;

use super::*;
use crate::handle;
use crate::settings::Settings;

#[derive(Default)]
struct Counter {
	hits: AtomicUsize,
}

struct Panicker;

unsafe extern "C" fn count(self_: *mut cef_completion_callback_t) {
	unsafe {
		dispatch::<_, Counter, (), _>(self_, "on_complete", |counter, _| {
			counter.hits.fetch_add(1, Ordering::SeqCst);
		})
	}
}

unsafe extern "C" fn explode(self_: *mut cef_completion_callback_t) {
	unsafe { dispatch::<_, Panicker, (), _>(self_, "on_complete", |_, _| panic!("handler failed")) }
}

fn vtable(on_complete: unsafe extern "C" fn(*mut cef_completion_callback_t)) -> cef_completion_callback_t {
	cef_completion_callback_t {
		base: cef_base_ref_counted_t::empty(0),
		on_complete: Some(on_complete),
	}
}

fn invoke(ptr: *mut cef_completion_callback_t) {
	let result: crate::Result<()> = crate::native_call!(ptr, on_complete());
	result.unwrap();
}

fn runtime(engine: &FakeEngine) -> Runtime {
	Runtime::new(engine.api(), Settings::default()).unwrap()
}

#[test]
fn test_handler_lives_until_last_native_release() {
	let engine = FakeEngine::new();
	let rt = runtime(&engine);
	let counter = Arc::new(Counter::default());

	let native = export(&rt, Arc::clone(&counter), vtable(count));
	let ptr = native.get();
	assert_eq!(rt.callbacks().len(), 1);
	assert!(unsafe { handle::has_one_ref(ptr) });

	invoke(ptr);
	assert_eq!(counter.hits.load(Ordering::SeqCst), 1);

	// The engine keeps its own reference past the exporting call.
	unsafe { handle::add_ref(ptr) };
	drop(native);
	assert_eq!(rt.callbacks().len(), 1);
	invoke(ptr);
	assert_eq!(counter.hits.load(Ordering::SeqCst), 2);

	assert!(unsafe { handle::release(ptr) });
	assert!(rt.callbacks().is_empty());
	assert_eq!(Arc::strong_count(&counter), 1);
}

#[test]
fn test_panic_is_contained() {
	let engine = FakeEngine::new();
	let rt = runtime(&engine);

	let native = export(&rt, Arc::new(Panicker), vtable(explode));
	invoke(native.get());
	invoke(native.get());
	assert_eq!(rt.callbacks().panic_count(), 2);
	assert_eq!(rt.callbacks().len(), 1);

	drop(native);
	assert!(rt.callbacks().is_empty());
}

#[test]
fn test_dispatch_after_handler_removed_is_noop() {
	let engine = FakeEngine::new();
	let rt = runtime(&engine);
	let counter = Arc::new(Counter::default());

	let native = export(&rt, Arc::clone(&counter), vtable(count));
	let token = unsafe { token_of(native.get()) };
	assert!(rt.callbacks().contains(token));
	assert!(rt.callbacks().remove(token));

	invoke(native.get());
	assert_eq!(counter.hits.load(Ordering::SeqCst), 0);
	assert_eq!(rt.callbacks().panic_count(), 0);
	drop(native);
	assert_eq!(Arc::strong_count(&counter), 1);
}

#[test]
fn test_dispatch_with_wrong_handler_type_is_noop() {
	let engine = FakeEngine::new();
	let rt = runtime(&engine);

	let native = export(&rt, Arc::new(Panicker), vtable(count));
	invoke(native.get());
	assert_eq!(rt.callbacks().panic_count(), 0);
}

#[test]
fn test_guard_passes_values_through() {
	let engine = FakeEngine::new();
	let rt = runtime(&engine);

	assert_eq!(guard(&rt, "test", || 7), 7);
	let swallowed: i32 = guard(&rt, "test", || panic!("boom"));
	assert_eq!(swallowed, 0);
	assert_eq!(rt.callbacks().panic_count(), 1);
}

#[test]
fn test_tokens_are_unique() {
	let table = CallbackTable::new();
	let a = table.insert(Arc::new(1u8));
	let b = table.insert(Arc::new(2u8));
	assert_ne!(a, b);
	assert_eq!(table.get::<u8>(b).as_deref(), Some(&2));
	assert!(table.get::<u16>(b).is_none());
	assert_eq!(table.len(), 2);
}
