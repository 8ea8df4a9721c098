// Integration tests for request contexts: sharing, UI-thread preferences,
// async completions and host resolution.

mod common;

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use cef::{Error, NetError, PreferenceUpdate, RequestContext, Settings, ThreadId, Value};
use cefglue_sys::TID_UI;
use cefglue_testkit::FakeEngine;
use common::{assert_clean, setup, setup_with};
use parking_lot::Mutex;

// The engine keeps its own reference to the global context.
const GLOBAL: i64 = 1;

#[test]
fn test_global_and_created_contexts() {
	let (engine, rt) = setup();
	{
		let global = RequestContext::global(&rt).expect("global context");
		assert!(global.is_global().unwrap());
		assert!(global.is_same(&global).unwrap());

		let again = RequestContext::global(&rt).unwrap();
		assert!(again.handle().same_instance(global.handle()));

		let shared = RequestContext::create_context(&rt, Some(&global)).unwrap();
		assert!(!shared.is_global().unwrap());
		assert!(shared.is_sharing_with(&global).unwrap());
		assert!(!shared.is_same(&global).unwrap());

		let isolated = RequestContext::create_context(&rt, None).unwrap();
		assert!(!isolated.is_sharing_with(&global).unwrap());
		let path = isolated.cache_path().unwrap().expect("cache path");
		assert!(path.starts_with("/fake/cache/"), "unexpected cache path {path}");
	}
	assert_clean(&engine, GLOBAL);
}

#[test]
fn test_preferences_on_ui_thread() {
	let (engine, rt) = setup();
	engine.run_on(TID_UI, || {
		let context = RequestContext::create_context(&rt, None).unwrap();
		let name = "webkit.webprefs.default_font_size";

		assert!(context.has_preference(name).unwrap());
		assert!(context.can_set_preference(name).unwrap());
		assert!(!context.has_preference("no.such.pref").unwrap());
		assert!(context.get_preference("no.such.pref").unwrap().is_none());

		let current = context.get_preference(name).unwrap().expect("font size");
		assert!(current.is_read_only().unwrap());
		assert_eq!(current.get_int().unwrap(), 16);

		let value = Value::create(&rt).unwrap();
		value.set_int(20).unwrap();
		assert_eq!(context.set_preference(name, Some(&value)).unwrap(), PreferenceUpdate::Applied);
		assert_eq!(context.get_preference(name).unwrap().unwrap().get_int().unwrap(), 20);

		assert!(context.set_preference(name, None).unwrap().is_applied());
		assert_eq!(context.get_preference(name).unwrap().unwrap().get_int().unwrap(), 16);
	});
	assert_eq!(engine.stats().thread_violations, 0);
	assert_clean(&engine, 0);
}

#[test]
fn test_rejected_preference_reports_reason() {
	let (engine, rt) = setup();
	engine.run_on(TID_UI, || {
		let context = RequestContext::create_context(&rt, None).unwrap();
		let value = Value::create(&rt).unwrap();
		value.set_bool(true).unwrap();

		let PreferenceUpdate::Rejected(reason) =
			context.set_preference("webkit.webprefs.default_font_size", Some(&value)).unwrap()
		else {
			panic!("type mismatch should be rejected");
		};
		assert!(reason.contains("type"), "unexpected reason: {reason}");

		let update = context.set_preference("no.such.pref", Some(&value)).unwrap();
		assert!(matches!(update, PreferenceUpdate::Rejected(ref reason) if reason.contains("unregistered")));
	});
	assert_clean(&engine, 0);
}

#[test]
fn test_all_preferences_nest_by_name() {
	let (engine, rt) = setup();
	engine.run_on(TID_UI, || {
		let context = RequestContext::create_context(&rt, None).unwrap();
		let explicit = context.get_all_preferences(false).unwrap().expect("preferences");
		assert!(explicit.is_empty().unwrap());

		let all = context.get_all_preferences(true).unwrap().expect("preferences");
		let webprefs = all
			.get_dictionary("webkit")
			.unwrap()
			.and_then(|webkit| webkit.get_dictionary("webprefs").unwrap())
			.expect("webkit.webprefs");
		assert_eq!(webprefs.get_int("default_font_size").unwrap(), 16);
		assert_eq!(
			all.get_dictionary("intl").unwrap().unwrap().get_string("accept_languages").unwrap().as_deref(),
			Some("en-US,en")
		);
	});
	assert_clean(&engine, 0);
}

#[test]
fn test_preferences_off_ui_thread_are_rejected_early() {
	let (engine, rt) = setup();
	{
		let context = RequestContext::create_context(&rt, None).unwrap();
		let err = context.has_preference("intl.accept_languages").unwrap_err();
		assert!(matches!(
			err,
			Error::WrongThread {
				expected: ThreadId::Ui,
				..
			}
		));
		assert!(err.is_precondition());
		assert!(context.get_all_preferences(true).is_err());
		assert!(context.extensions().is_err());
		assert!(context.did_load_extension("pdf-viewer").is_err());

		// Thread-agnostic methods still work.
		assert!(!context.is_global().unwrap());
	}
	assert_eq!(engine.stats().thread_violations, 0);
	assert_clean(&engine, 0);
}

#[test]
fn test_thread_checks_can_be_disabled() {
	let settings = Settings {
		enforce_thread_affinity: false,
		..Settings::default()
	};
	let (engine, rt) = setup_with(FakeEngine::new(), settings);
	{
		let context = RequestContext::create_context(&rt, None).unwrap();
		// The engine refuses the call itself.
		assert!(!context.has_preference("intl.accept_languages").unwrap());
	}
	assert_eq!(engine.stats().thread_violations, 1);
	assert_clean(&engine, 0);
}

#[test]
fn test_completion_runs_on_ui_thread() {
	let (engine, rt) = setup();
	let calls = Arc::new(AtomicUsize::new(0));
	{
		let context = RequestContext::global(&rt).unwrap();
		let seen = Arc::clone(&calls);
		let cb_rt = rt.clone();
		context
			.clear_certificate_exceptions(Some(move || {
				assert!(cb_rt.currently_on(ThreadId::Ui));
				seen.fetch_add(1, Ordering::SeqCst);
			}))
			.unwrap();
		context.close_all_connections(None::<fn()>).unwrap();

		assert_eq!(calls.load(Ordering::SeqCst), 0);
		assert_eq!(engine.pending(), 1);
		assert_eq!(engine.run_pending(), 1);
		assert_eq!(calls.load(Ordering::SeqCst), 1);
	}
	assert!(rt.callbacks().is_empty());
	assert_eq!(rt.callbacks().panic_count(), 0);
	assert_clean(&engine, GLOBAL);
}

#[test]
fn test_clear_http_auth_credentials_completes_on_ui_thread() {
	let (engine, rt) = setup();
	let calls = Arc::new(AtomicUsize::new(0));
	{
		let context = RequestContext::create_context(&rt, None).unwrap();
		let seen = Arc::clone(&calls);
		let cb_rt = rt.clone();
		context
			.clear_http_auth_credentials(Some(move || {
				assert!(cb_rt.currently_on(ThreadId::Ui));
				seen.fetch_add(1, Ordering::SeqCst);
			}))
			.unwrap();
		context.clear_http_auth_credentials(None::<fn()>).unwrap();

		assert_eq!(rt.callbacks().len(), 1);
		assert_eq!(engine.run_pending(), 1);
		assert_eq!(calls.load(Ordering::SeqCst), 1);
	}
	assert!(rt.callbacks().is_empty());
	assert_clean(&engine, 0);
}

#[test]
fn test_scheme_factories_and_plugin_cache_work_off_ui_thread() {
	let (engine, rt) = setup();
	{
		let context = RequestContext::create_context(&rt, None).unwrap();
		assert!(context.clear_scheme_handler_factories().unwrap());
		context.purge_plugin_list_cache(true).unwrap();
		context.purge_plugin_list_cache(false).unwrap();
		assert_eq!(engine.stats().plugin_cache_purges, 2);

		context.dispose();
		assert!(matches!(
			context.clear_scheme_handler_factories(),
			Err(Error::Disposed { .. })
		));
	}
	assert_eq!(engine.stats().thread_violations, 0);
	assert_clean(&engine, 0);
}

#[test]
fn test_resolve_host() {
	let (engine, rt) = setup();
	let results = Arc::new(Mutex::new(Vec::new()));
	{
		let context = RequestContext::global(&rt).unwrap();
		for origin in ["http://localhost:8080/", "https://unknown.invalid/"] {
			let results = Arc::clone(&results);
			context
				.resolve_host(origin, move |result: NetError, ips: Vec<String>| {
					results.lock().push((result, ips));
				})
				.unwrap();
		}
		assert_eq!(engine.run_pending(), 2);
	}
	let results = results.lock();
	assert_eq!(results[0], (NetError::NONE, vec!["127.0.0.1".to_string(), "::1".to_string()]));
	assert_eq!(results[1], (NetError::NAME_NOT_RESOLVED, Vec::new()));
	assert!(rt.callbacks().is_empty());
	assert_clean(&engine, GLOBAL);
}

#[test]
fn test_resolve_host_requires_origin() {
	let (engine, rt) = setup();
	{
		let context = RequestContext::global(&rt).unwrap();
		let err = context.resolve_host("", |_: NetError, _: Vec<String>| {}).unwrap_err();
		assert!(matches!(err, Error::NullArgument("origin")));
		assert_eq!(engine.pending(), 0);
	}
	assert!(rt.callbacks().is_empty());
	assert_clean(&engine, GLOBAL);
}

#[test]
fn test_extensions() {
	let engine = FakeEngine::builder().extension("pdf-viewer").build();
	let (engine, rt) = setup_with(engine, Settings::default());
	engine.run_on(TID_UI, || {
		let context = RequestContext::global(&rt).unwrap();
		assert_eq!(context.extensions().unwrap(), Some(vec!["pdf-viewer".to_string()]));
		assert!(context.has_extension("pdf-viewer").unwrap());
		assert!(!context.has_extension("other").unwrap());
		assert!(context.did_load_extension("pdf-viewer").unwrap());

		// A created context can reach the extension but did not load it.
		let created = RequestContext::create_context(&rt, None).unwrap();
		assert!(created.has_extension("pdf-viewer").unwrap());
		assert!(!created.did_load_extension("pdf-viewer").unwrap());
	});
	assert_clean(&engine, GLOBAL);
}
