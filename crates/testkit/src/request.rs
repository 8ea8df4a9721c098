use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use cefglue_sys::{
	cef_base_ref_counted_t, cef_request_t, cef_string_multimap_t, cef_string_t, cef_string_userfree_t,
};
use parking_lot::Mutex;

use crate::engine::current_stats;
use crate::object::{FakeState, new_object, state, stats_of};
use crate::stats::Stats;
use crate::strings::{append_pair, read_pairs, read_string, userfree_str};

static NEXT_REQUEST_ID: AtomicU64 = AtomicU64::new(1);

#[derive(Default)]
struct RequestData {
	url: String,
	method: String,
	headers: Vec<(String, String)>,
}

struct RequestState {
	id: u64,
	read_only: bool,
	data: Mutex<RequestData>,
}

impl FakeState for RequestState {}

pub(crate) fn new_request(stats: &Arc<Stats>, url: Option<&str>, read_only: bool) -> *mut cef_request_t {
	let raw = cef_request_t {
		base: cef_base_ref_counted_t::empty(0),
		is_read_only: Some(is_read_only),
		get_url: Some(get_url),
		set_url: Some(set_url),
		get_method: Some(get_method),
		set_method: Some(set_method),
		get_header_by_name: Some(get_header_by_name),
		set_header_by_name: Some(set_header_by_name),
		get_header_map: Some(get_header_map),
		set_header_map: Some(set_header_map),
		get_identifier: Some(get_identifier),
	};
	let data = RequestData {
		url: url.unwrap_or_default().to_string(),
		method: "GET".to_string(),
		headers: Vec::new(),
	};
	new_object(
		stats,
		raw,
		RequestState {
			id: NEXT_REQUEST_ID.fetch_add(1, Ordering::Relaxed),
			read_only,
			data: Mutex::new(data),
		},
	)
}

pub(crate) unsafe extern "C" fn request_create() -> *mut cef_request_t {
	new_request(&current_stats(), None, false)
}

unsafe fn request<'a>(ptr: *mut cef_request_t) -> Option<&'a RequestState> {
	unsafe { state::<_, RequestState>(ptr) }
}

unsafe fn writable<'a>(ptr: *mut cef_request_t) -> Option<&'a RequestState> {
	unsafe { request(ptr) }.filter(|r| !r.read_only)
}

unsafe fn result(ptr: *mut cef_request_t, value: Option<&str>) -> cef_string_userfree_t {
	let stats = unsafe { stats_of::<_, RequestState>(ptr) };
	userfree_str(&stats, value)
}

unsafe extern "C" fn is_read_only(self_: *mut cef_request_t) -> i32 {
	i32::from(unsafe { request(self_) }.is_some_and(|r| r.read_only))
}

unsafe extern "C" fn get_url(self_: *mut cef_request_t) -> cef_string_userfree_t {
	let Some(r) = (unsafe { request(self_) }) else {
		return std::ptr::null_mut();
	};
	let url = r.data.lock().url.clone();
	unsafe { result(self_, Some(&url)) }
}

unsafe extern "C" fn set_url(self_: *mut cef_request_t, url: *const cef_string_t) {
	if let Some(r) = unsafe { writable(self_) } {
		r.data.lock().url = unsafe { read_string(url) }.unwrap_or_default();
	}
}

unsafe extern "C" fn get_method(self_: *mut cef_request_t) -> cef_string_userfree_t {
	let Some(r) = (unsafe { request(self_) }) else {
		return std::ptr::null_mut();
	};
	let method = r.data.lock().method.clone();
	unsafe { result(self_, Some(&method)) }
}

unsafe extern "C" fn set_method(self_: *mut cef_request_t, method: *const cef_string_t) {
	if let Some(r) = unsafe { writable(self_) } {
		r.data.lock().method = unsafe { read_string(method) }.unwrap_or_default();
	}
}

unsafe extern "C" fn get_header_by_name(self_: *mut cef_request_t, name: *const cef_string_t) -> cef_string_userfree_t {
	let (Some(r), Some(name)) = (unsafe { request(self_) }, unsafe { read_string(name) }) else {
		return std::ptr::null_mut();
	};
	let found = r
		.data
		.lock()
		.headers
		.iter()
		.find(|(k, _)| k.eq_ignore_ascii_case(&name))
		.map(|(_, v)| v.clone());
	unsafe { result(self_, found.as_deref()) }
}

unsafe extern "C" fn set_header_by_name(
	self_: *mut cef_request_t,
	name: *const cef_string_t,
	value: *const cef_string_t,
	overwrite: i32,
) {
	let (Some(r), Some(name)) = (unsafe { writable(self_) }, unsafe { read_string(name) }) else {
		return;
	};
	let value = unsafe { read_string(value) }.unwrap_or_default();
	let mut data = r.data.lock();
	let exists = data.headers.iter().any(|(k, _)| k.eq_ignore_ascii_case(&name));
	if exists && overwrite == 0 {
		return;
	}
	data.headers.retain(|(k, _)| !k.eq_ignore_ascii_case(&name));
	data.headers.push((name, value));
}

unsafe extern "C" fn get_header_map(self_: *mut cef_request_t, header_map: cef_string_multimap_t) {
	let Some(r) = (unsafe { request(self_) }) else {
		return;
	};
	let headers = r.data.lock().headers.clone();
	for (name, value) in &headers {
		unsafe { append_pair(header_map, name, value) };
	}
}

unsafe extern "C" fn set_header_map(self_: *mut cef_request_t, header_map: cef_string_multimap_t) {
	if let Some(r) = unsafe { writable(self_) } {
		r.data.lock().headers = unsafe { read_pairs(header_map) };
	}
}

unsafe extern "C" fn get_identifier(self_: *mut cef_request_t) -> u64 {
	unsafe { request(self_) }.map_or(0, |r| r.id)
}
