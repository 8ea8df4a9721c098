// Integration tests for the engine continue/cancel callback and for owned
// versus borrowed wrapping.

mod common;

use cef::{Callback, Error, Ownership};
use cefglue_testkit::ref_count;
use common::{assert_clean, setup};

#[test]
fn test_continue_and_cancel_reach_engine() {
	let (engine, rt) = setup();
	{
		let (ptr, probe) = engine.callback();
		let callback = unsafe { Callback::from_native_owned(&rt, ptr) }.unwrap();
		callback.cont().unwrap();
		assert_eq!(probe.continued(), 1);
		assert_eq!(probe.cancelled(), 0);

		let (ptr, probe) = engine.callback();
		let callback = unsafe { Callback::from_native_owned(&rt, ptr) }.unwrap();
		callback.cancel().unwrap();
		assert_eq!(probe.cancelled(), 1);
	}
	assert_clean(&engine, 0);
}

#[test]
fn test_dispose_releases_once() {
	let (engine, rt) = setup();
	let (ptr, probe) = engine.callback();
	let callback = unsafe { Callback::from_native_owned(&rt, ptr) }.unwrap();
	callback.dispose();
	assert_eq!(engine.stats().live_objects, 0);

	let err = callback.cont().unwrap_err();
	assert!(matches!(err, Error::Disposed { type_name: "Callback" }));
	assert_eq!(probe.continued(), 0);
	drop(callback);
	assert_clean(&engine, 0);
}

#[test]
fn test_borrowed_wrapper_leaves_refcount_alone() {
	let (engine, rt) = setup();
	{
		let (ptr, probe) = engine.callback();
		let owner = unsafe { Callback::from_native_owned(&rt, ptr) }.unwrap();

		let lent = unsafe { Callback::from_native(&rt, ptr) }.unwrap();
		assert_eq!(lent.ownership(), Ownership::Borrowed);
		lent.cont().unwrap();
		assert_eq!(probe.continued(), 1);
		drop(lent);
		assert_eq!(unsafe { ref_count(ptr) }, 1);

		// Retaining a borrowed wrapper takes a reference of its own.
		let lent = unsafe { Callback::from_native(&rt, ptr) }.unwrap();
		let kept = lent.retain().unwrap();
		assert_eq!(kept.ownership(), Ownership::Owned);
		assert_eq!(unsafe { ref_count(ptr) }, 2);
		drop((lent, kept));
		assert_eq!(unsafe { ref_count(ptr) }, 1);
		drop(owner);
	}
	assert_clean(&engine, 0);
}

#[test]
fn test_null_pointers_are_rejected() {
	let (engine, rt) = setup();
	let err = unsafe { Callback::from_native_owned(&rt, std::ptr::null_mut()) }.unwrap_err();
	assert!(matches!(err, Error::NullHandle { .. }));
	assert!(unsafe { Callback::from_native_or_null(&rt, std::ptr::null_mut()) }.is_none());
	assert_clean(&engine, 0);
}
