//! String and string-collection entry points.
//!
//! Owned UTF-16 buffers carry their length in a hidden prefix so the
//! single-argument destructor can free them. Userfree strings and collections
//! are flagged rather than freed, so a second free is counted instead of
//! corrupting memory.

use std::alloc::{self, Layout};
use std::ptr;
use std::slice;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use cefglue_sys::{
	char16_t, cef_string_list_t, cef_string_map_t, cef_string_multimap_t, cef_string_t,
	cef_string_userfree_utf16_t, cef_string_utf16_t,
};
use parking_lot::Mutex;

use crate::engine::current_stats;
use crate::stats::Stats;

const PREFIX: usize = size_of::<usize>();

fn buffer_layout(len: usize) -> Layout {
	Layout::from_size_align(PREFIX + len * size_of::<u16>(), align_of::<usize>())
		.expect("string buffer layout")
}

/// Copies `units` into a new prefixed buffer. Never returns null.
fn alloc_units(units: &[u16]) -> *mut u16 {
	let layout = buffer_layout(units.len());
	unsafe {
		let base = alloc::alloc(layout);
		if base.is_null() {
			alloc::handle_alloc_error(layout);
		}
		base.cast::<usize>().write(units.len());
		let data = base.add(PREFIX).cast::<u16>();
		ptr::copy_nonoverlapping(units.as_ptr(), data, units.len());
		data
	}
}

unsafe extern "C" fn free_units(data: *mut char16_t) {
	if data.is_null() {
		return;
	}
	unsafe {
		let base = data.cast::<u8>().sub(PREFIX);
		let len = base.cast::<usize>().read();
		alloc::dealloc(base, buffer_layout(len));
	}
}

/// Reads a string argument. Null pointers and null buffers read as `None`.
pub(crate) unsafe fn read_units(s: *const cef_string_t) -> Option<Vec<u16>> {
	if s.is_null() {
		return None;
	}
	let s = unsafe { &*s };
	if s.str_.is_null() {
		return None;
	}
	if s.length == 0 {
		return Some(Vec::new());
	}
	Some(unsafe { slice::from_raw_parts(s.str_, s.length) }.to_vec())
}

pub(crate) unsafe fn read_string(s: *const cef_string_t) -> Option<String> {
	unsafe { read_units(s) }.map(|units| String::from_utf16_lossy(&units))
}

/// Replaces the contents of `out` with a copy of `units`.
pub(crate) unsafe fn write_units(out: *mut cef_string_t, units: Option<&[u16]>) {
	if out.is_null() {
		return;
	}
	unsafe {
		string_utf16_clear(out);
		*out = match units {
			None => cef_string_utf16_t::default(),
			Some(units) => cef_string_utf16_t {
				str_: alloc_units(units),
				length: units.len(),
				dtor: Some(free_units),
			},
		};
	}
}

pub(crate) unsafe fn write_str(out: *mut cef_string_t, value: Option<&str>) {
	let units: Option<Vec<u16>> = value.map(|v| v.encode_utf16().collect());
	unsafe { write_units(out, units.as_deref()) };
}

pub(crate) unsafe extern "C" fn string_utf16_set(
	src: *const char16_t,
	src_len: usize,
	output: *mut cef_string_t,
	copy: i32,
) -> i32 {
	if output.is_null() {
		return 0;
	}
	unsafe {
		string_utf16_clear(output);
		if src.is_null() {
			return 1;
		}
		if copy != 0 {
			let units = if src_len == 0 {
				&[][..]
			} else {
				slice::from_raw_parts(src, src_len)
			};
			write_units(output, Some(units));
		} else {
			*output = cef_string_utf16_t {
				str_: src.cast_mut(),
				length: src_len,
				dtor: None,
			};
		}
	}
	1
}

pub(crate) unsafe extern "C" fn string_utf16_clear(s: *mut cef_string_t) {
	if s.is_null() {
		return;
	}
	unsafe {
		if let Some(dtor) = (*s).dtor {
			dtor((*s).str_);
		}
		*s = cef_string_utf16_t::default();
	}
}

/// Userfree string; `s` must stay the first field.
#[repr(C)]
struct UserFree {
	s: cef_string_utf16_t,
	freed: AtomicBool,
	stats: Arc<Stats>,
}

/// Allocates a userfree string holding `units`, or null for `None`.
pub(crate) fn userfree(stats: &Arc<Stats>, units: Option<&[u16]>) -> cef_string_userfree_utf16_t {
	let Some(units) = units else {
		return ptr::null_mut();
	};
	let userfree = Box::new(UserFree {
		s: cef_string_utf16_t {
			str_: alloc_units(units),
			length: units.len(),
			dtor: Some(free_units),
		},
		freed: AtomicBool::new(false),
		stats: Arc::clone(stats),
	});
	stats.userfree_alloc();
	Box::into_raw(userfree).cast()
}

pub(crate) fn userfree_str(stats: &Arc<Stats>, value: Option<&str>) -> cef_string_userfree_utf16_t {
	let units: Option<Vec<u16>> = value.map(|v| v.encode_utf16().collect());
	userfree(stats, units.as_deref())
}

pub(crate) unsafe extern "C" fn string_userfree_utf16_alloc() -> cef_string_userfree_utf16_t {
	let stats = current_stats();
	let userfree = Box::new(UserFree {
		s: cef_string_utf16_t::default(),
		freed: AtomicBool::new(false),
		stats: Arc::clone(&stats),
	});
	stats.userfree_alloc();
	Box::into_raw(userfree).cast()
}

pub(crate) unsafe extern "C" fn string_userfree_utf16_free(s: cef_string_userfree_utf16_t) {
	if s.is_null() {
		return;
	}
	let userfree = unsafe { &mut *s.cast::<UserFree>() };
	if userfree.freed.swap(true, Ordering::AcqRel) {
		userfree.stats.double_free();
		return;
	}
	unsafe { string_utf16_clear(&mut userfree.s) };
	userfree.stats.userfree_free();
}

// Lists.

pub(crate) struct FakeList {
	pub(crate) items: Mutex<Vec<Vec<u16>>>,
	freed: AtomicBool,
	stats: Arc<Stats>,
}

pub(crate) unsafe fn list<'a>(raw: cef_string_list_t) -> Option<&'a FakeList> {
	if raw.is_null() {
		None
	} else {
		Some(unsafe { &*raw.cast::<FakeList>() })
	}
}

pub(crate) fn new_list(stats: &Arc<Stats>) -> cef_string_list_t {
	stats.list_alloc();
	Box::into_raw(Box::new(FakeList {
		items: Mutex::new(Vec::new()),
		freed: AtomicBool::new(false),
		stats: Arc::clone(stats),
	}))
	.cast()
}

pub(crate) unsafe fn append_units(raw: cef_string_list_t, units: &[u16]) {
	if let Some(list) = unsafe { list(raw) } {
		list.items.lock().push(units.to_vec());
	}
}

pub(crate) unsafe extern "C" fn string_list_alloc() -> cef_string_list_t {
	new_list(&current_stats())
}

pub(crate) unsafe extern "C" fn string_list_size(raw: cef_string_list_t) -> usize {
	unsafe { list(raw) }.map_or(0, |list| list.items.lock().len())
}

pub(crate) unsafe extern "C" fn string_list_value(
	raw: cef_string_list_t,
	index: usize,
	value: *mut cef_string_t,
) -> i32 {
	let Some(list) = (unsafe { list(raw) }) else {
		return 0;
	};
	let items = list.items.lock();
	match items.get(index) {
		Some(units) => {
			unsafe { write_units(value, Some(units)) };
			1
		}
		None => 0,
	}
}

pub(crate) unsafe extern "C" fn string_list_append(raw: cef_string_list_t, value: *const cef_string_t) {
	let units = unsafe { read_units(value) }.unwrap_or_default();
	unsafe { append_units(raw, &units) };
}

pub(crate) unsafe extern "C" fn string_list_clear(raw: cef_string_list_t) {
	if let Some(list) = unsafe { list(raw) } {
		list.items.lock().clear();
	}
}

pub(crate) unsafe extern "C" fn string_list_free(raw: cef_string_list_t) {
	let Some(list) = (unsafe { list(raw) }) else {
		return;
	};
	if list.freed.swap(true, Ordering::AcqRel) {
		list.stats.double_free();
		return;
	}
	list.items.lock().clear();
	list.stats.list_free();
}

// Maps and multimaps share one representation: ordered key/value pairs.

pub(crate) struct FakePairs {
	pub(crate) pairs: Mutex<Vec<(Vec<u16>, Vec<u16>)>>,
	freed: AtomicBool,
	multi: bool,
	stats: Arc<Stats>,
}

impl FakePairs {
	fn new(stats: &Arc<Stats>, multi: bool) -> *mut FakePairs {
		if multi {
			stats.multimap_alloc();
		} else {
			stats.map_alloc();
		}
		Box::into_raw(Box::new(FakePairs {
			pairs: Mutex::new(Vec::new()),
			freed: AtomicBool::new(false),
			multi,
			stats: Arc::clone(stats),
		}))
	}

	fn free(&self) {
		if self.freed.swap(true, Ordering::AcqRel) {
			self.stats.double_free();
			return;
		}
		self.pairs.lock().clear();
		if self.multi {
			self.stats.multimap_free();
		} else {
			self.stats.map_free();
		}
	}
}

pub(crate) unsafe fn pairs<'a, T>(raw: *mut T) -> Option<&'a FakePairs> {
	if raw.is_null() {
		None
	} else {
		Some(unsafe { &*raw.cast::<FakePairs>() })
	}
}

unsafe fn pairs_size<T>(raw: *mut T) -> usize {
	unsafe { pairs(raw) }.map_or(0, |p| p.pairs.lock().len())
}

unsafe fn pairs_key<T>(raw: *mut T, index: usize, out: *mut cef_string_t) -> i32 {
	let Some(p) = (unsafe { pairs(raw) }) else {
		return 0;
	};
	let pairs = p.pairs.lock();
	match pairs.get(index) {
		Some((key, _)) => {
			unsafe { write_units(out, Some(key)) };
			1
		}
		None => 0,
	}
}

unsafe fn pairs_value<T>(raw: *mut T, index: usize, out: *mut cef_string_t) -> i32 {
	let Some(p) = (unsafe { pairs(raw) }) else {
		return 0;
	};
	let pairs = p.pairs.lock();
	match pairs.get(index) {
		Some((_, value)) => {
			unsafe { write_units(out, Some(value)) };
			1
		}
		None => 0,
	}
}

unsafe fn pairs_append<T>(raw: *mut T, key: *const cef_string_t, value: *const cef_string_t) -> i32 {
	let Some(p) = (unsafe { pairs(raw) }) else {
		return 0;
	};
	// Entries need a key.
	let Some(key) = (unsafe { read_units(key) }).filter(|key| !key.is_empty()) else {
		return 0;
	};
	let value = unsafe { read_units(value) }.unwrap_or_default();
	p.pairs.lock().push((key, value));
	1
}

pub(crate) fn new_multimap(stats: &Arc<Stats>) -> cef_string_multimap_t {
	FakePairs::new(stats, true).cast()
}

pub(crate) unsafe extern "C" fn string_map_alloc() -> cef_string_map_t {
	FakePairs::new(&current_stats(), false).cast()
}

pub(crate) unsafe extern "C" fn string_map_size(map: cef_string_map_t) -> usize {
	unsafe { pairs_size(map) }
}

pub(crate) unsafe extern "C" fn string_map_find(
	map: cef_string_map_t,
	key: *const cef_string_t,
	value: *mut cef_string_t,
) -> i32 {
	let (Some(p), Some(key)) = (unsafe { pairs(map) }, unsafe { read_units(key) }) else {
		return 0;
	};
	let pairs = p.pairs.lock();
	match pairs.iter().find(|(k, _)| *k == key) {
		Some((_, found)) => {
			unsafe { write_units(value, Some(found)) };
			1
		}
		None => 0,
	}
}

pub(crate) unsafe extern "C" fn string_map_key(
	map: cef_string_map_t,
	index: usize,
	key: *mut cef_string_t,
) -> i32 {
	unsafe { pairs_key(map, index, key) }
}

pub(crate) unsafe extern "C" fn string_map_value(
	map: cef_string_map_t,
	index: usize,
	value: *mut cef_string_t,
) -> i32 {
	unsafe { pairs_value(map, index, value) }
}

pub(crate) unsafe extern "C" fn string_map_append(
	map: cef_string_map_t,
	key: *const cef_string_t,
	value: *const cef_string_t,
) -> i32 {
	unsafe { pairs_append(map, key, value) }
}

pub(crate) unsafe extern "C" fn string_map_clear(map: cef_string_map_t) {
	if let Some(p) = unsafe { pairs(map) } {
		p.pairs.lock().clear();
	}
}

pub(crate) unsafe extern "C" fn string_map_free(map: cef_string_map_t) {
	if let Some(p) = unsafe { pairs(map) } {
		p.free();
	}
}

pub(crate) unsafe extern "C" fn string_multimap_alloc() -> cef_string_multimap_t {
	new_multimap(&current_stats())
}

pub(crate) unsafe extern "C" fn string_multimap_size(map: cef_string_multimap_t) -> usize {
	unsafe { pairs_size(map) }
}

pub(crate) unsafe extern "C" fn string_multimap_find_count(
	map: cef_string_multimap_t,
	key: *const cef_string_t,
) -> usize {
	let (Some(p), Some(key)) = (unsafe { pairs(map) }, unsafe { read_units(key) }) else {
		return 0;
	};
	p.pairs.lock().iter().filter(|(k, _)| *k == key).count()
}

pub(crate) unsafe extern "C" fn string_multimap_enumerate(
	map: cef_string_multimap_t,
	key: *const cef_string_t,
	value_index: usize,
	value: *mut cef_string_t,
) -> i32 {
	let (Some(p), Some(key)) = (unsafe { pairs(map) }, unsafe { read_units(key) }) else {
		return 0;
	};
	let pairs = p.pairs.lock();
	match pairs.iter().filter(|(k, _)| *k == key).nth(value_index) {
		Some((_, found)) => {
			unsafe { write_units(value, Some(found)) };
			1
		}
		None => 0,
	}
}

pub(crate) unsafe extern "C" fn string_multimap_key(
	map: cef_string_multimap_t,
	index: usize,
	key: *mut cef_string_t,
) -> i32 {
	unsafe { pairs_key(map, index, key) }
}

pub(crate) unsafe extern "C" fn string_multimap_value(
	map: cef_string_multimap_t,
	index: usize,
	value: *mut cef_string_t,
) -> i32 {
	unsafe { pairs_value(map, index, value) }
}

pub(crate) unsafe extern "C" fn string_multimap_append(
	map: cef_string_multimap_t,
	key: *const cef_string_t,
	value: *const cef_string_t,
) -> i32 {
	unsafe { pairs_append(map, key, value) }
}

pub(crate) unsafe extern "C" fn string_multimap_clear(map: cef_string_multimap_t) {
	if let Some(p) = unsafe { pairs(map) } {
		p.pairs.lock().clear();
	}
}

pub(crate) unsafe extern "C" fn string_multimap_free(map: cef_string_multimap_t) {
	if let Some(p) = unsafe { pairs(map) } {
		p.free();
	}
}

pub(crate) unsafe fn append_pair<T>(raw: *mut T, key: &str, value: &str) {
	if let Some(p) = unsafe { pairs(raw) } {
		p.pairs
			.lock()
			.push((key.encode_utf16().collect(), value.encode_utf16().collect()));
	}
}

pub(crate) unsafe fn read_pairs<T>(raw: *mut T) -> Vec<(String, String)> {
	let Some(p) = (unsafe { pairs(raw) }) else {
		return Vec::new();
	};
	p.pairs
		.lock()
		.iter()
		.map(|(k, v)| (String::from_utf16_lossy(k), String::from_utf16_lossy(v)))
		.collect()
}
