use std::ptr;

use cefglue_sys::{cef_binary_value_t, cef_request_t};
use cefglue_testkit::{FakeEngine, ref_count};

use super::*;
use crate::settings::Settings;

fn runtime(engine: &FakeEngine) -> Runtime {
	Runtime::new(engine.api(), Settings::default()).unwrap()
}

#[test]
fn test_owned_handle_released_on_drop() {
	let engine = FakeEngine::new();
	let rt = runtime(&engine);
	let api = engine.api();

	let request = unsafe { Handle::create(&rt, (api.request_create)()) }.unwrap();
	assert_eq!(request.ownership(), Ownership::Owned);
	assert_eq!(rt.registry().len(), 1);
	assert!(request.has_one_ref().unwrap());

	drop(request);
	let stats = engine.stats();
	assert_eq!(stats.live_objects, 0);
	assert_eq!(stats.over_releases, 0);
	assert!(rt.registry().is_empty());
}

#[test]
fn test_identity_cache_returns_same_instance() {
	let engine = FakeEngine::new();
	let rt = runtime(&engine);
	let api = engine.api();

	let ptr = unsafe { (api.request_create)() };
	let first = unsafe { Handle::create(&rt, ptr) }.unwrap();

	// A getter hands out a fresh reference to the same object.
	unsafe { handle::add_ref(ptr) };
	let second = unsafe { Handle::from_native_owned(&rt, ptr) }.unwrap();

	assert!(first.same_instance(&second));
	assert_eq!(unsafe { ref_count(ptr) }, 1);

	drop(first);
	assert_eq!(engine.stats().live_objects, 1);
	drop(second);
	assert_eq!(engine.stats().live_objects, 0);
	assert_eq!(engine.stats().over_releases, 0);
}

#[test]
fn test_identity_cache_can_be_disabled() {
	let engine = FakeEngine::new();
	let settings = Settings {
		identity_cache: false,
		..Settings::default()
	};
	let rt = Runtime::new(engine.api(), settings).unwrap();
	let api = engine.api();

	let ptr = unsafe { (api.request_create)() };
	let first = unsafe { Handle::create(&rt, ptr) }.unwrap();
	unsafe { handle::add_ref(ptr) };
	let second = unsafe { Handle::from_native_owned(&rt, ptr) }.unwrap();

	assert!(!first.same_instance(&second));
	assert_eq!(first, second);
	assert_eq!(unsafe { ref_count(ptr) }, 2);
	assert!(rt.registry().is_empty());

	drop((first, second));
	assert_eq!(engine.stats().live_objects, 0);
}

#[test]
fn test_uncached_type_wraps_separately() {
	let engine = FakeEngine::new();
	let rt = runtime(&engine);
	let api = engine.api();

	let ptr = unsafe { (api.binary_value_create)(ptr::null(), 0) };
	let first: Handle<cef_binary_value_t> = unsafe { Handle::create(&rt, ptr) }.unwrap();
	unsafe { handle::add_ref(ptr) };
	let second = unsafe { Handle::from_native_owned(&rt, ptr) }.unwrap();

	assert!(!first.same_instance(&second));
	assert!(rt.registry().is_empty());
	drop((first, second));
	assert_eq!(engine.stats().live_objects, 0);
}

#[test]
fn test_borrowed_handle_leaves_refcount_alone() {
	let engine = FakeEngine::new();
	let rt = runtime(&engine);
	let api = engine.api();

	let ptr = unsafe { (api.request_create)() };
	let borrowed: Handle<cef_request_t> = unsafe { Handle::from_native(&rt, ptr) }.unwrap();
	assert_eq!(borrowed.ownership(), Ownership::Borrowed);
	assert!(rt.registry().is_empty());

	drop(borrowed);
	assert_eq!(unsafe { ref_count(ptr) }, 1);
	assert!(unsafe { handle::release(ptr) });
	assert_eq!(engine.stats().live_objects, 0);
}

#[test]
fn test_borrowed_lookup_finds_cached_owner() {
	let engine = FakeEngine::new();
	let rt = runtime(&engine);
	let api = engine.api();

	let owned = unsafe { Handle::create(&rt, (api.request_create)()) }.unwrap();
	let ptr = owned.to_native().unwrap();
	let lent = unsafe { Handle::from_native(&rt, ptr) }.unwrap();

	assert!(lent.same_instance(&owned));
	assert_eq!(lent.ownership(), Ownership::Owned);
	assert_eq!(unsafe { ref_count(ptr) }, 1);
}

#[test]
fn test_retain_borrowed_takes_reference() {
	let engine = FakeEngine::new();
	let rt = runtime(&engine);
	let api = engine.api();

	let ptr = unsafe { (api.request_create)() };
	let borrowed: Handle<cef_request_t> = unsafe { Handle::from_native(&rt, ptr) }.unwrap();
	let kept = borrowed.retain().unwrap();
	assert_eq!(kept.ownership(), Ownership::Owned);
	assert_eq!(unsafe { ref_count(ptr) }, 2);

	drop(borrowed);
	drop(kept);
	assert_eq!(unsafe { ref_count(ptr) }, 1);
	unsafe { handle::release(ptr) };
	assert_eq!(engine.stats().live_objects, 0);
}

#[test]
fn test_clone_of_owned_shares_instance() {
	let engine = FakeEngine::new();
	let rt = runtime(&engine);
	let api = engine.api();

	let request: Handle<cef_request_t> = unsafe { Handle::create(&rt, (api.request_create)()) }.unwrap();
	let copy = request.clone();
	assert!(copy.same_instance(&request));
	assert!(request.has_one_ref().unwrap());
}

#[test]
fn test_dispose_is_idempotent() {
	let engine = FakeEngine::new();
	let rt = runtime(&engine);
	let api = engine.api();

	let request: Handle<cef_request_t> = unsafe { Handle::create(&rt, (api.request_create)()) }.unwrap();
	let clone = request.clone();
	request.dispose();
	request.dispose();

	assert!(request.is_disposed());
	assert!(clone.is_disposed());
	assert!(matches!(
		request.to_native(),
		Err(Error::Disposed {
			type_name: "Request"
		})
	));
	assert!(rt.registry().is_empty());

	drop((request, clone));
	let stats = engine.stats();
	assert_eq!(stats.live_objects, 0);
	assert_eq!(stats.over_releases, 0);
}

#[test]
fn test_dispose_then_rewrap_gets_new_instance() {
	let engine = FakeEngine::new();
	let rt = runtime(&engine);
	let api = engine.api();

	let ptr = unsafe { (api.request_create)() };
	unsafe { handle::add_ref(ptr) };
	let first = unsafe { Handle::create(&rt, ptr) }.unwrap();
	first.dispose();

	let second = unsafe { Handle::from_native_owned(&rt, ptr) }.unwrap();
	assert!(!second.same_instance(&first));
	assert!(!second.is_disposed());
	drop(second);
	assert_eq!(engine.stats().live_objects, 0);
}

#[test]
fn test_null_pointers() {
	let engine = FakeEngine::new();
	let rt = runtime(&engine);

	let created = unsafe { Handle::<cef_request_t>::create(&rt, ptr::null_mut()) };
	assert!(matches!(created, Err(Error::CreateFailed { type_name: "Request" })));

	let owned = unsafe { Handle::<cef_request_t>::from_native_owned(&rt, ptr::null_mut()) };
	assert!(matches!(owned, Err(Error::NullHandle { .. })));
	assert!(owned.unwrap_err().is_precondition());

	assert!(unsafe { Handle::<cef_request_t>::from_native_owned_or_null(&rt, ptr::null_mut()) }.is_none());
	assert!(unsafe { Handle::<cef_request_t>::from_native_or_null(&rt, ptr::null_mut()) }.is_none());
}
