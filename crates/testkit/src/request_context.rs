//! Request contexts with a small registered preference set.
//!
//! Preference methods only work when the calling thread acts as the UI
//! thread; other calls are counted as thread violations and fail. Async
//! completions are posted to the engine's task queue and delivered by
//! [`crate::FakeEngine::run_pending`].

use std::collections::BTreeMap;
use std::mem;
use std::net::IpAddr;
use std::ptr;
use std::sync::Arc;

use cefglue_sys::{
	ERR_NAME_NOT_RESOLVED, ERR_NONE, TID_UI, cef_base_ref_counted_t, cef_completion_callback_t,
	cef_dictionary_value_t, cef_request_context_t, cef_resolve_callback_t, cef_string_list_t,
	cef_string_t, cef_string_userfree_t, cef_value_t,
};
use parking_lot::Mutex;

use crate::engine::{EngineState, TaskQueue, current, on_thread};
use crate::object::{FakeState, SendPtr, add_ref_raw, new_object, release_raw, state, stats_of};
use crate::stats::Stats;
use crate::strings::{append_units, new_list, read_string, string_list_free, userfree_str, write_str};
use crate::values::{Plain, plain_dictionary, plain_value, read_value};

/// Preference storage, shared by contexts created from one another.
struct Prefs {
	defaults: BTreeMap<String, Plain>,
	values: BTreeMap<String, Plain>,
}

impl Prefs {
	fn registered() -> Self {
		let defaults = BTreeMap::from([
			("browser.enable_spellchecking".to_string(), Plain::Bool(true)),
			("intl.accept_languages".to_string(), Plain::string("en-US,en")),
			("webkit.webprefs.default_font_size".to_string(), Plain::Int(16)),
		]);
		Self {
			defaults,
			values: BTreeMap::new(),
		}
	}

	fn get(&self, name: &str) -> Option<&Plain> {
		self.values.get(name).or_else(|| self.defaults.get(name))
	}

	/// Preferences nested by their dotted names.
	fn nested(&self, include_defaults: bool) -> BTreeMap<String, Plain> {
		let mut root = BTreeMap::new();
		for name in self.defaults.keys() {
			let value = match self.values.get(name) {
				Some(value) => value,
				None if include_defaults => &self.defaults[name],
				None => continue,
			};
			insert_path(&mut root, name, value.clone());
		}
		root
	}
}

fn insert_path(root: &mut BTreeMap<String, Plain>, name: &str, value: Plain) {
	let mut map = root;
	let mut parts = name.split('.').peekable();
	while let Some(part) = parts.next() {
		if parts.peek().is_none() {
			map.insert(part.to_string(), value);
			return;
		}
		let entry = map
			.entry(part.to_string())
			.or_insert_with(|| Plain::Dict(BTreeMap::new()));
		if !matches!(entry, Plain::Dict(_)) {
			*entry = Plain::Dict(BTreeMap::new());
		}
		let Plain::Dict(next) = entry else {
			return;
		};
		map = next;
	}
}

fn type_name(value: &Plain) -> &'static str {
	match value {
		Plain::Null => "null",
		Plain::Bool(_) => "bool",
		Plain::Int(_) => "int",
		Plain::Double(_) => "double",
		Plain::String(_) => "string",
		Plain::Binary(_) => "binary",
		Plain::Dict(_) => "dictionary",
		Plain::List(_) => "list",
	}
}

struct ContextState {
	global: bool,
	cache_path: String,
	prefs: Arc<Mutex<Prefs>>,
	tasks: Arc<TaskQueue>,
	extensions: Arc<Vec<String>>,
}

impl FakeState for ContextState {}

fn vtable() -> cef_request_context_t {
	cef_request_context_t {
		base: cef_base_ref_counted_t::empty(0),
		is_same: Some(is_same),
		is_sharing_with: Some(is_sharing_with),
		is_global: Some(is_global),
		get_cache_path: Some(get_cache_path),
		clear_scheme_handler_factories: Some(clear_scheme_handler_factories),
		purge_plugin_list_cache: Some(purge_plugin_list_cache),
		has_preference: Some(has_preference),
		get_preference: Some(get_preference),
		get_all_preferences: Some(get_all_preferences),
		can_set_preference: Some(can_set_preference),
		set_preference: Some(set_preference),
		clear_certificate_exceptions: Some(clear_certificate_exceptions),
		clear_http_auth_credentials: Some(clear_http_auth_credentials),
		close_all_connections: Some(close_all_connections),
		resolve_host: Some(resolve_host),
		did_load_extension: Some(did_load_extension),
		get_extensions: Some(get_extensions),
		has_extension: Some(has_extension),
	}
}

pub(crate) fn new_global_context(engine: &Arc<EngineState>) -> *mut cef_request_context_t {
	let state = ContextState {
		global: true,
		cache_path: String::new(),
		prefs: Arc::new(Mutex::new(Prefs::registered())),
		tasks: Arc::clone(&engine.tasks),
		extensions: Arc::clone(&engine.extensions),
	};
	new_object(&engine.stats, vtable(), state)
}

pub(crate) unsafe extern "C" fn request_context_get_global_context() -> *mut cef_request_context_t {
	current().global_context()
}

pub(crate) unsafe extern "C" fn request_context_create_context(
	other: *mut cef_request_context_t,
) -> *mut cef_request_context_t {
	let engine = current();
	let prefs = match unsafe { context(other) } {
		Some(other) => Arc::clone(&other.prefs),
		None => Arc::new(Mutex::new(Prefs::registered())),
	};
	let state = ContextState {
		global: false,
		cache_path: format!("/fake/cache/ctx-{}", engine.next_context_id()),
		prefs,
		tasks: Arc::clone(&engine.tasks),
		extensions: Arc::clone(&engine.extensions),
	};
	new_object(&engine.stats, vtable(), state)
}

unsafe fn context<'a>(ptr: *mut cef_request_context_t) -> Option<&'a ContextState> {
	unsafe { state::<_, ContextState>(ptr) }
}

unsafe fn context_stats(ptr: *mut cef_request_context_t) -> Arc<Stats> {
	unsafe { stats_of::<_, ContextState>(ptr) }
}

/// The context, if the caller is on the UI thread.
unsafe fn on_ui<'a>(ptr: *mut cef_request_context_t, method: &'static str) -> Option<&'a ContextState> {
	let context = unsafe { context(ptr) }?;
	if on_thread(TID_UI) {
		return Some(context);
	}
	unsafe { context_stats(ptr) }.thread_violation();
	tracing::warn!(method, "request context preference call off the UI thread");
	None
}

unsafe extern "C" fn is_same(self_: *mut cef_request_context_t, other: *mut cef_request_context_t) -> i32 {
	i32::from(self_ == other && unsafe { context(self_) }.is_some())
}

unsafe extern "C" fn is_sharing_with(self_: *mut cef_request_context_t, other: *mut cef_request_context_t) -> i32 {
	match unsafe { (context(self_), context(other)) } {
		(Some(a), Some(b)) => i32::from(Arc::ptr_eq(&a.prefs, &b.prefs)),
		_ => 0,
	}
}

unsafe extern "C" fn is_global(self_: *mut cef_request_context_t) -> i32 {
	i32::from(unsafe { context(self_) }.is_some_and(|c| c.global))
}

unsafe extern "C" fn get_cache_path(self_: *mut cef_request_context_t) -> cef_string_userfree_t {
	let Some(c) = (unsafe { context(self_) }) else {
		return ptr::null_mut();
	};
	userfree_str(&unsafe { context_stats(self_) }, Some(&c.cache_path))
}

unsafe extern "C" fn clear_scheme_handler_factories(self_: *mut cef_request_context_t) -> i32 {
	i32::from(unsafe { context(self_) }.is_some())
}

unsafe extern "C" fn purge_plugin_list_cache(self_: *mut cef_request_context_t, _reload_pages: i32) {
	if unsafe { context(self_) }.is_some() {
		unsafe { context_stats(self_) }.plugin_cache_purge();
	}
}

unsafe extern "C" fn has_preference(self_: *mut cef_request_context_t, name: *const cef_string_t) -> i32 {
	let (Some(c), Some(name)) = (unsafe { on_ui(self_, "has_preference") }, unsafe { read_string(name) }) else {
		return 0;
	};
	i32::from(c.prefs.lock().defaults.contains_key(&name))
}

unsafe extern "C" fn get_preference(self_: *mut cef_request_context_t, name: *const cef_string_t) -> *mut cef_value_t {
	let (Some(c), Some(name)) = (unsafe { on_ui(self_, "get_preference") }, unsafe { read_string(name) }) else {
		return ptr::null_mut();
	};
	let value = c.prefs.lock().get(&name).cloned();
	match value {
		Some(value) => plain_value(&unsafe { context_stats(self_) }, &value, true),
		None => ptr::null_mut(),
	}
}

unsafe extern "C" fn get_all_preferences(
	self_: *mut cef_request_context_t,
	include_defaults: i32,
) -> *mut cef_dictionary_value_t {
	let Some(c) = (unsafe { on_ui(self_, "get_all_preferences") }) else {
		return ptr::null_mut();
	};
	let nested = c.prefs.lock().nested(include_defaults != 0);
	plain_dictionary(&unsafe { context_stats(self_) }, &nested, true)
}

unsafe extern "C" fn can_set_preference(self_: *mut cef_request_context_t, name: *const cef_string_t) -> i32 {
	unsafe { has_preference(self_, name) }
}

unsafe extern "C" fn set_preference(
	self_: *mut cef_request_context_t,
	name: *const cef_string_t,
	value: *mut cef_value_t,
	error: *mut cef_string_t,
) -> i32 {
	let fail = |message: &str| {
		unsafe { write_str(error, Some(message)) };
		0
	};
	let Some(c) = (unsafe { on_ui(self_, "set_preference") }) else {
		return fail("preferences can only be modified on the UI thread");
	};
	let Some(name) = (unsafe { read_string(name) }) else {
		return fail("preference name is required");
	};
	let mut guard = c.prefs.lock();
	let prefs = &mut *guard;
	let Some(default) = prefs.defaults.get(&name) else {
		return fail(&format!("Trying to modify an unregistered preference: {name}"));
	};
	if value.is_null() {
		prefs.values.remove(&name);
		return 1;
	}
	let Some(value) = (unsafe { read_value(value) }) else {
		return fail("invalid value");
	};
	if mem::discriminant(&value) != mem::discriminant(default) {
		return fail(&format!(
			"Trying to set a preference of type {} to value of type {}",
			type_name(default),
			type_name(&value)
		));
	}
	prefs.values.insert(name, value);
	1
}

/// Posts `on_complete` to the UI thread, holding a reference until it runs.
unsafe fn complete_later(self_: *mut cef_request_context_t, callback: *mut cef_completion_callback_t) {
	let (Some(c), false) = (unsafe { context(self_) }, callback.is_null()) else {
		return;
	};
	unsafe { add_ref_raw(callback) };
	let callback = SendPtr(callback);
	c.tasks.post(TID_UI, move || {
		let callback = callback.get();
		unsafe {
			if let Some(on_complete) = (*callback).on_complete {
				on_complete(callback);
			}
			release_raw(callback);
		}
	});
}

unsafe extern "C" fn clear_certificate_exceptions(
	self_: *mut cef_request_context_t,
	callback: *mut cef_completion_callback_t,
) {
	unsafe { complete_later(self_, callback) };
}

unsafe extern "C" fn clear_http_auth_credentials(
	self_: *mut cef_request_context_t,
	callback: *mut cef_completion_callback_t,
) {
	unsafe { complete_later(self_, callback) };
}

unsafe extern "C" fn close_all_connections(
	self_: *mut cef_request_context_t,
	callback: *mut cef_completion_callback_t,
) {
	unsafe { complete_later(self_, callback) };
}

/// Host part of an origin such as `https://example.com:8443/`.
fn host_of(origin: &str) -> &str {
	let rest = origin.split_once("://").map_or(origin, |(_, rest)| rest);
	let authority = rest.split(['/', '?', '#']).next().unwrap_or(rest);
	if let Some(bracketed) = authority.strip_prefix('[') {
		return bracketed.split(']').next().unwrap_or(bracketed);
	}
	authority.split(':').next().unwrap_or(authority)
}

fn resolve(host: &str) -> Option<Vec<String>> {
	if host.eq_ignore_ascii_case("localhost") {
		return Some(vec!["127.0.0.1".to_string(), "::1".to_string()]);
	}
	host.parse::<IpAddr>().ok().map(|ip| vec![ip.to_string()])
}

unsafe extern "C" fn resolve_host(
	self_: *mut cef_request_context_t,
	origin: *const cef_string_t,
	callback: *mut cef_resolve_callback_t,
) {
	let (Some(c), false) = (unsafe { context(self_) }, callback.is_null()) else {
		return;
	};
	let origin = unsafe { read_string(origin) }.unwrap_or_default();
	let resolved = resolve(host_of(&origin));
	let stats = unsafe { context_stats(self_) };
	unsafe { add_ref_raw(callback) };
	let callback = SendPtr(callback);
	c.tasks.post(TID_UI, move || {
		let callback = callback.get();
		let (result, ips) = match resolved {
			Some(ips) => (ERR_NONE, ips),
			None => (ERR_NAME_NOT_RESOLVED, Vec::new()),
		};
		let list = new_list(&stats);
		for ip in &ips {
			let units: Vec<u16> = ip.encode_utf16().collect();
			unsafe { append_units(list, &units) };
		}
		unsafe {
			if let Some(on_resolve_completed) = (*callback).on_resolve_completed {
				on_resolve_completed(callback, result, list);
			}
			string_list_free(list);
			release_raw(callback);
		}
	});
}

unsafe extern "C" fn get_extensions(self_: *mut cef_request_context_t, extension_ids: cef_string_list_t) -> i32 {
	let Some(c) = (unsafe { context(self_) }) else {
		return 0;
	};
	for id in c.extensions.iter() {
		let units: Vec<u16> = id.encode_utf16().collect();
		unsafe { append_units(extension_ids, &units) };
	}
	1
}

unsafe extern "C" fn has_extension(self_: *mut cef_request_context_t, extension_id: *const cef_string_t) -> i32 {
	let (Some(c), Some(id)) = (unsafe { context(self_) }, unsafe { read_string(extension_id) }) else {
		return 0;
	};
	i32::from(c.extensions.contains(&id))
}

/// Engine-installed extensions count as loaded by the global context only.
unsafe extern "C" fn did_load_extension(self_: *mut cef_request_context_t, extension_id: *const cef_string_t) -> i32 {
	let (Some(c), Some(id)) = (unsafe { on_ui(self_, "did_load_extension") }, unsafe { read_string(extension_id) }) else {
		return 0;
	};
	i32::from(c.global && c.extensions.contains(&id))
}
