//! Binary, dictionary, list and variant values.
//!
//! Container contents live in shared [`Node`]s. A wrapper object is either
//! the root of its node (it owns the tree) or an embedded view returned by a
//! getter. Inserting a root wrapper moves its node into the container and
//! detaches the wrapper; inserting an embedded one copies the subtree.
//! Replacing, removing or destroying a root invalidates the subtree, which
//! every view observes through [`Node::valid`].

use std::collections::BTreeMap;
use std::mem;
use std::os::raw::c_void;
use std::ptr;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use cefglue_sys::{
	VTYPE_BINARY, VTYPE_BOOL, VTYPE_DICTIONARY, VTYPE_DOUBLE, VTYPE_INT, VTYPE_INVALID, VTYPE_LIST,
	VTYPE_NULL, VTYPE_STRING, cef_base_ref_counted_t, cef_binary_value_t, cef_dictionary_value_t,
	cef_list_value_t, cef_string_list_t, cef_string_t, cef_string_userfree_t, cef_value_t,
	cef_value_type_t,
};
use parking_lot::Mutex;

use crate::engine::current_stats;
use crate::object::{FakeState, new_object, state, stats_of};
use crate::stats::Stats;
use crate::strings::{append_units, read_string, read_units, userfree};

type Map = BTreeMap<String, Data>;

pub(crate) struct Node<T> {
	valid: AtomicBool,
	read_only: bool,
	data: Mutex<T>,
}

impl<T> Node<T> {
	fn new(data: T, read_only: bool) -> Arc<Self> {
		Arc::new(Self {
			valid: AtomicBool::new(true),
			read_only,
			data: Mutex::new(data),
		})
	}
}

fn addr<T>(node: &Arc<Node<T>>) -> *const () {
	Arc::as_ptr(node).cast()
}

/// One slot of a container or variant.
#[derive(Clone)]
pub(crate) enum Data {
	Null,
	Bool(bool),
	Int(i32),
	Double(f64),
	String(Option<Vec<u16>>),
	Binary(Arc<Node<Vec<u8>>>),
	Dict(Arc<Node<Map>>),
	List(Arc<Node<Vec<Data>>>),
}

impl Data {
	fn value_type(&self) -> cef_value_type_t {
		match self {
			Data::Null => VTYPE_NULL,
			Data::Bool(_) => VTYPE_BOOL,
			Data::Int(_) => VTYPE_INT,
			Data::Double(_) => VTYPE_DOUBLE,
			Data::String(_) => VTYPE_STRING,
			Data::Binary(_) => VTYPE_BINARY,
			Data::Dict(_) => VTYPE_DICTIONARY,
			Data::List(_) => VTYPE_LIST,
		}
	}

	fn node_addr(&self) -> Option<*const ()> {
		match self {
			Data::Binary(node) => Some(addr(node)),
			Data::Dict(node) => Some(addr(node)),
			Data::List(node) => Some(addr(node)),
			_ => None,
		}
	}

	// Children are cloned out so no two node locks are ever held together.
	fn children(&self) -> Vec<Data> {
		match self {
			Data::Dict(node) => node.data.lock().values().cloned().collect(),
			Data::List(node) => node.data.lock().clone(),
			_ => Vec::new(),
		}
	}

	fn invalidate(&self) {
		match self {
			Data::Binary(node) => node.valid.store(false, Ordering::Release),
			Data::Dict(node) => node.valid.store(false, Ordering::Release),
			Data::List(node) => node.valid.store(false, Ordering::Release),
			_ => return,
		}
		for child in self.children() {
			child.invalidate();
		}
	}

	fn contains(&self, target: *const ()) -> bool {
		self.node_addr() == Some(target) || self.children().iter().any(|c| c.contains(target))
	}

	pub(crate) fn snapshot(&self) -> Plain {
		match self {
			Data::Null => Plain::Null,
			Data::Bool(v) => Plain::Bool(*v),
			Data::Int(v) => Plain::Int(*v),
			Data::Double(v) => Plain::Double(*v),
			Data::String(v) => Plain::String(v.clone()),
			Data::Binary(node) => Plain::Binary(node.data.lock().clone()),
			Data::Dict(node) => {
				let entries: Vec<(String, Data)> = node
					.data
					.lock()
					.iter()
					.map(|(k, v)| (k.clone(), v.clone()))
					.collect();
				Plain::Dict(entries.into_iter().map(|(k, v)| (k, v.snapshot())).collect())
			}
			Data::List(node) => {
				let items = node.data.lock().clone();
				Plain::List(items.iter().map(Data::snapshot).collect())
			}
		}
	}
}

/// Lock-free deep copy of a value tree.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Plain {
	Null,
	Bool(bool),
	Int(i32),
	Double(f64),
	String(Option<Vec<u16>>),
	Binary(Vec<u8>),
	Dict(BTreeMap<String, Plain>),
	List(Vec<Plain>),
}

impl Plain {
	pub(crate) fn string(value: &str) -> Self {
		Plain::String(Some(value.encode_utf16().collect()))
	}

	pub(crate) fn build(&self, read_only: bool) -> Data {
		match self {
			Plain::Null => Data::Null,
			Plain::Bool(v) => Data::Bool(*v),
			Plain::Int(v) => Data::Int(*v),
			Plain::Double(v) => Data::Double(*v),
			Plain::String(v) => Data::String(v.clone()),
			Plain::Binary(v) => Data::Binary(Node::new(v.clone(), read_only)),
			Plain::Dict(map) => Data::Dict(Self::build_map(map, read_only)),
			Plain::List(items) => Data::List(Self::build_list(items, read_only)),
		}
	}

	fn build_map(map: &BTreeMap<String, Plain>, read_only: bool) -> Arc<Node<Map>> {
		let map = map
			.iter()
			.map(|(k, v)| (k.clone(), v.build(read_only)))
			.collect();
		Node::new(map, read_only)
	}

	fn build_list(items: &[Plain], read_only: bool) -> Arc<Node<Vec<Data>>> {
		Node::new(items.iter().map(|v| v.build(read_only)).collect(), read_only)
	}

	fn is_empty_container(&self) -> bool {
		match self {
			Plain::Dict(map) => map.is_empty(),
			Plain::List(items) => items.is_empty(),
			_ => false,
		}
	}

	fn prune_map(map: &BTreeMap<String, Plain>) -> BTreeMap<String, Plain> {
		map.iter()
			.map(|(k, v)| (k.clone(), v.pruned()))
			.filter(|(_, v)| !v.is_empty_container())
			.collect()
	}

	fn pruned(&self) -> Plain {
		match self {
			Plain::Dict(map) => Plain::Dict(Self::prune_map(map)),
			other => other.clone(),
		}
	}
}

/// Node-backed complex value kinds.
pub(crate) trait Kind: Sized + Send + 'static {
	fn wrap(node: Arc<Node<Self>>) -> Data;
}

impl Kind for Vec<u8> {
	fn wrap(node: Arc<Node<Self>>) -> Data {
		Data::Binary(node)
	}
}

impl Kind for Map {
	fn wrap(node: Arc<Node<Self>>) -> Data {
		Data::Dict(node)
	}
}

impl Kind for Vec<Data> {
	fn wrap(node: Arc<Node<Self>>) -> Data {
		Data::List(node)
	}
}

pub(crate) struct Wrapper<T> {
	node: Arc<Node<T>>,
	owned: bool,
	detached: AtomicBool,
}

impl<T: Kind> Wrapper<T> {
	fn new(node: Arc<Node<T>>, owned: bool) -> Self {
		Self {
			node,
			owned,
			detached: AtomicBool::new(false),
		}
	}

	fn is_valid(&self) -> bool {
		!self.detached.load(Ordering::Acquire) && self.node.valid.load(Ordering::Acquire)
	}

	fn data(&self) -> Data {
		T::wrap(Arc::clone(&self.node))
	}

	/// What a container stores when this wrapper is inserted.
	fn incoming(&self) -> Option<Incoming<'_>> {
		if !self.is_valid() {
			return None;
		}
		if self.owned {
			Some(Incoming::copy(self.data().snapshot()))
		} else {
			Some(Incoming {
				data: self.data(),
				transfer: Some(&self.detached),
			})
		}
	}
}

impl<T: Kind> FakeState for Wrapper<T> {
	fn destroy(&self) {
		if !self.owned && !self.detached.load(Ordering::Acquire) {
			self.data().invalidate();
		}
	}
}

pub(crate) struct ValueState {
	data: Mutex<Data>,
	owned: bool,
	read_only: bool,
	detached: AtomicBool,
}

impl ValueState {
	fn is_valid(&self) -> bool {
		!self.detached.load(Ordering::Acquire)
	}

	fn current(&self) -> Data {
		self.data.lock().clone()
	}

	fn incoming(&self) -> Option<Incoming<'_>> {
		if !self.is_valid() {
			return None;
		}
		let data = self.current();
		if self.owned || self.read_only {
			Some(Incoming::copy(data.snapshot()))
		} else {
			Some(Incoming {
				data,
				transfer: Some(&self.detached),
			})
		}
	}
}

impl FakeState for ValueState {
	fn destroy(&self) {
		if !self.owned && self.is_valid() {
			self.current().invalidate();
		}
	}
}

/// Data about to be stored, plus the flag to set if it is being moved.
struct Incoming<'a> {
	data: Data,
	transfer: Option<&'a AtomicBool>,
}

impl Incoming<'_> {
	fn simple(data: Data) -> Self {
		Self {
			data,
			transfer: None,
		}
	}

	fn copy(plain: Plain) -> Self {
		Self::simple(plain.build(false))
	}

	fn commit(self) -> Data {
		if let Some(flag) = self.transfer {
			flag.store(true, Ordering::Release);
		}
		self.data
	}
}

// Object construction.

pub(crate) fn new_binary(stats: &Arc<Stats>, node: Arc<Node<Vec<u8>>>, owned: bool) -> *mut cef_binary_value_t {
	new_object(stats, binary_vtable(), Wrapper::new(node, owned))
}

pub(crate) fn new_dictionary(stats: &Arc<Stats>, node: Arc<Node<Map>>, owned: bool) -> *mut cef_dictionary_value_t {
	new_object(stats, dictionary_vtable(), Wrapper::new(node, owned))
}

pub(crate) fn new_list(stats: &Arc<Stats>, node: Arc<Node<Vec<Data>>>, owned: bool) -> *mut cef_list_value_t {
	new_object(stats, list_vtable(), Wrapper::new(node, owned))
}

pub(crate) fn new_value(stats: &Arc<Stats>, data: Data, owned: bool, read_only: bool) -> *mut cef_value_t {
	new_object(
		stats,
		value_vtable(),
		ValueState {
			data: Mutex::new(data),
			owned,
			read_only,
			detached: AtomicBool::new(false),
		},
	)
}

/// Root value holding a copy of `plain`.
pub(crate) fn plain_value(stats: &Arc<Stats>, plain: &Plain, read_only: bool) -> *mut cef_value_t {
	new_value(stats, plain.build(read_only), false, read_only)
}

/// Root dictionary holding a copy of `map`.
pub(crate) fn plain_dictionary(
	stats: &Arc<Stats>,
	map: &BTreeMap<String, Plain>,
	read_only: bool,
) -> *mut cef_dictionary_value_t {
	new_dictionary(stats, Plain::build_map(map, read_only), false)
}

/// Snapshot of a value argument, without taking it over.
pub(crate) unsafe fn read_value(ptr: *mut cef_value_t) -> Option<Plain> {
	let value = unsafe { value(ptr) }?;
	value.is_valid().then(|| value.current().snapshot())
}

pub(crate) unsafe extern "C" fn binary_value_create(data: *const c_void, size: usize) -> *mut cef_binary_value_t {
	if data.is_null() && size > 0 {
		return ptr::null_mut();
	}
	let bytes = if size == 0 {
		Vec::new()
	} else {
		unsafe { std::slice::from_raw_parts(data.cast::<u8>(), size) }.to_vec()
	};
	new_binary(&current_stats(), Node::new(bytes, false), false)
}

pub(crate) unsafe extern "C" fn dictionary_value_create() -> *mut cef_dictionary_value_t {
	new_dictionary(&current_stats(), Node::new(Map::new(), false), false)
}

pub(crate) unsafe extern "C" fn list_value_create() -> *mut cef_list_value_t {
	new_list(&current_stats(), Node::new(Vec::new(), false), false)
}

pub(crate) unsafe extern "C" fn value_create() -> *mut cef_value_t {
	new_value(&current_stats(), Data::Null, false, false)
}

// Shared getter conversions.

fn as_bool(data: Option<Data>) -> i32 {
	i32::from(matches!(data, Some(Data::Bool(true))))
}

fn as_int(data: Option<Data>) -> i32 {
	match data {
		Some(Data::Int(v)) => v,
		_ => 0,
	}
}

fn as_double(data: Option<Data>) -> f64 {
	match data {
		Some(Data::Double(v)) => v,
		Some(Data::Int(v)) => f64::from(v),
		_ => 0.0,
	}
}

fn as_string(stats: &Arc<Stats>, data: Option<Data>) -> cef_string_userfree_t {
	match data {
		Some(Data::String(units)) => userfree(stats, units.as_deref()),
		_ => ptr::null_mut(),
	}
}

fn as_binary(stats: &Arc<Stats>, data: Option<Data>) -> *mut cef_binary_value_t {
	match data {
		Some(Data::Binary(node)) => new_binary(stats, node, true),
		_ => ptr::null_mut(),
	}
}

fn as_dictionary(stats: &Arc<Stats>, data: Option<Data>) -> *mut cef_dictionary_value_t {
	match data {
		Some(Data::Dict(node)) => new_dictionary(stats, node, true),
		_ => ptr::null_mut(),
	}
}

fn as_list(stats: &Arc<Stats>, data: Option<Data>) -> *mut cef_list_value_t {
	match data {
		Some(Data::List(node)) => new_list(stats, node, true),
		_ => ptr::null_mut(),
	}
}

fn as_value(stats: &Arc<Stats>, data: Option<Data>, read_only: bool) -> *mut cef_value_t {
	match data {
		Some(data) => new_value(stats, data, true, read_only),
		None => ptr::null_mut(),
	}
}

// Binary.

unsafe fn binary<'a>(ptr: *mut cef_binary_value_t) -> Option<&'a Wrapper<Vec<u8>>> {
	unsafe { state::<cef_binary_value_t, Wrapper<Vec<u8>>>(ptr) }
}

unsafe fn live_binary<'a>(ptr: *mut cef_binary_value_t) -> Option<&'a Wrapper<Vec<u8>>> {
	unsafe { binary(ptr) }.filter(|w| w.is_valid())
}

fn binary_vtable() -> cef_binary_value_t {
	cef_binary_value_t {
		base: cef_base_ref_counted_t::empty(0),
		is_valid: Some(binary_is_valid),
		is_owned: Some(binary_is_owned),
		is_same: Some(binary_is_same),
		is_equal: Some(binary_is_equal),
		copy: Some(binary_copy),
		get_size: Some(binary_get_size),
		get_data: Some(binary_get_data),
	}
}

unsafe extern "C" fn binary_is_valid(self_: *mut cef_binary_value_t) -> i32 {
	i32::from(unsafe { live_binary(self_) }.is_some())
}

unsafe extern "C" fn binary_is_owned(self_: *mut cef_binary_value_t) -> i32 {
	i32::from(unsafe { binary(self_) }.is_some_and(|w| w.owned))
}

unsafe extern "C" fn binary_is_same(self_: *mut cef_binary_value_t, that: *mut cef_binary_value_t) -> i32 {
	match unsafe { (live_binary(self_), live_binary(that)) } {
		(Some(a), Some(b)) => i32::from(Arc::ptr_eq(&a.node, &b.node)),
		_ => 0,
	}
}

unsafe extern "C" fn binary_is_equal(self_: *mut cef_binary_value_t, that: *mut cef_binary_value_t) -> i32 {
	match unsafe { (live_binary(self_), live_binary(that)) } {
		(Some(a), Some(b)) if Arc::ptr_eq(&a.node, &b.node) => 1,
		(Some(a), Some(b)) => {
			let left = a.node.data.lock().clone();
			i32::from(left == *b.node.data.lock())
		}
		_ => 0,
	}
}

unsafe extern "C" fn binary_copy(self_: *mut cef_binary_value_t) -> *mut cef_binary_value_t {
	let Some(w) = (unsafe { live_binary(self_) }) else {
		return ptr::null_mut();
	};
	let bytes = w.node.data.lock().clone();
	let stats = unsafe { stats_of::<_, Wrapper<Vec<u8>>>(self_) };
	new_binary(&stats, Node::new(bytes, false), false)
}

unsafe extern "C" fn binary_get_size(self_: *mut cef_binary_value_t) -> usize {
	unsafe { live_binary(self_) }.map_or(0, |w| w.node.data.lock().len())
}

unsafe extern "C" fn binary_get_data(
	self_: *mut cef_binary_value_t,
	buffer: *mut c_void,
	buffer_size: usize,
	data_offset: usize,
) -> usize {
	let Some(w) = (unsafe { live_binary(self_) }) else {
		return 0;
	};
	if buffer.is_null() {
		return 0;
	}
	let bytes = w.node.data.lock();
	if data_offset >= bytes.len() {
		return 0;
	}
	let count = buffer_size.min(bytes.len() - data_offset);
	unsafe { ptr::copy_nonoverlapping(bytes.as_ptr().add(data_offset), buffer.cast::<u8>(), count) };
	count
}

// Dictionary.

unsafe fn dict<'a>(ptr: *mut cef_dictionary_value_t) -> Option<&'a Wrapper<Map>> {
	unsafe { state::<cef_dictionary_value_t, Wrapper<Map>>(ptr) }
}

unsafe fn live_dict<'a>(ptr: *mut cef_dictionary_value_t) -> Option<&'a Wrapper<Map>> {
	unsafe { dict(ptr) }.filter(|w| w.is_valid())
}

unsafe fn dict_stats(ptr: *mut cef_dictionary_value_t) -> Arc<Stats> {
	unsafe { stats_of::<_, Wrapper<Map>>(ptr) }
}

unsafe fn dict_get(self_: *mut cef_dictionary_value_t, key: *const cef_string_t) -> Option<Data> {
	let w = unsafe { live_dict(self_) }?;
	let key = unsafe { read_string(key) }?;
	w.node.data.lock().get(&key).cloned()
}

unsafe fn dict_set(
	self_: *mut cef_dictionary_value_t,
	key: *const cef_string_t,
	incoming: Option<Incoming<'_>>,
) -> i32 {
	let (Some(w), Some(key), Some(incoming)) = (unsafe { live_dict(self_) }, unsafe { read_string(key) }, incoming)
	else {
		return 0;
	};
	if w.node.read_only || incoming.data.contains(addr(&w.node)) {
		return 0;
	}
	let data = incoming.commit();
	let old = w.node.data.lock().insert(key, data);
	if let Some(old) = old {
		old.invalidate();
	}
	1
}

fn dictionary_vtable() -> cef_dictionary_value_t {
	cef_dictionary_value_t {
		base: cef_base_ref_counted_t::empty(0),
		is_valid: Some(dict_is_valid),
		is_owned: Some(dict_is_owned),
		is_read_only: Some(dict_is_read_only),
		is_same: Some(dict_is_same),
		is_equal: Some(dict_is_equal),
		copy: Some(dict_copy),
		get_size: Some(dict_get_size),
		clear: Some(dict_clear),
		has_key: Some(dict_has_key),
		get_keys: Some(dict_get_keys),
		remove: Some(dict_remove),
		get_type: Some(dict_get_type),
		get_value: Some(dict_get_value),
		get_bool: Some(dict_get_bool),
		get_int: Some(dict_get_int),
		get_double: Some(dict_get_double),
		get_string: Some(dict_get_string),
		get_binary: Some(dict_get_binary),
		get_dictionary: Some(dict_get_dictionary),
		get_list: Some(dict_get_list),
		set_value: Some(dict_set_value),
		set_null: Some(dict_set_null),
		set_bool: Some(dict_set_bool),
		set_int: Some(dict_set_int),
		set_double: Some(dict_set_double),
		set_string: Some(dict_set_string),
		set_binary: Some(dict_set_binary),
		set_dictionary: Some(dict_set_dictionary),
		set_list: Some(dict_set_list),
	}
}

unsafe extern "C" fn dict_is_valid(self_: *mut cef_dictionary_value_t) -> i32 {
	i32::from(unsafe { live_dict(self_) }.is_some())
}

unsafe extern "C" fn dict_is_owned(self_: *mut cef_dictionary_value_t) -> i32 {
	i32::from(unsafe { dict(self_) }.is_some_and(|w| w.owned))
}

unsafe extern "C" fn dict_is_read_only(self_: *mut cef_dictionary_value_t) -> i32 {
	i32::from(unsafe { dict(self_) }.is_some_and(|w| w.node.read_only))
}

unsafe extern "C" fn dict_is_same(self_: *mut cef_dictionary_value_t, that: *mut cef_dictionary_value_t) -> i32 {
	match unsafe { (live_dict(self_), live_dict(that)) } {
		(Some(a), Some(b)) => i32::from(Arc::ptr_eq(&a.node, &b.node)),
		_ => 0,
	}
}

unsafe extern "C" fn dict_is_equal(self_: *mut cef_dictionary_value_t, that: *mut cef_dictionary_value_t) -> i32 {
	match unsafe { (live_dict(self_), live_dict(that)) } {
		(Some(a), Some(b)) => i32::from(a.data().snapshot() == b.data().snapshot()),
		_ => 0,
	}
}

unsafe extern "C" fn dict_copy(
	self_: *mut cef_dictionary_value_t,
	exclude_empty_children: i32,
) -> *mut cef_dictionary_value_t {
	let Some(w) = (unsafe { live_dict(self_) }) else {
		return ptr::null_mut();
	};
	let Plain::Dict(mut map) = w.data().snapshot() else {
		return ptr::null_mut();
	};
	if exclude_empty_children != 0 {
		map = Plain::prune_map(&map);
	}
	plain_dictionary(&unsafe { dict_stats(self_) }, &map, false)
}

unsafe extern "C" fn dict_get_size(self_: *mut cef_dictionary_value_t) -> usize {
	unsafe { live_dict(self_) }.map_or(0, |w| w.node.data.lock().len())
}

unsafe extern "C" fn dict_clear(self_: *mut cef_dictionary_value_t) -> i32 {
	let Some(w) = (unsafe { live_dict(self_) }).filter(|w| !w.node.read_only) else {
		return 0;
	};
	let old = mem::take(&mut *w.node.data.lock());
	for data in old.values() {
		data.invalidate();
	}
	1
}

unsafe extern "C" fn dict_has_key(self_: *mut cef_dictionary_value_t, key: *const cef_string_t) -> i32 {
	i32::from(unsafe { dict_get(self_, key) }.is_some())
}

unsafe extern "C" fn dict_get_keys(self_: *mut cef_dictionary_value_t, keys: cef_string_list_t) -> i32 {
	let Some(w) = (unsafe { live_dict(self_) }) else {
		return 0;
	};
	let names: Vec<String> = w.node.data.lock().keys().cloned().collect();
	for name in names {
		let units: Vec<u16> = name.encode_utf16().collect();
		unsafe { append_units(keys, &units) };
	}
	1
}

unsafe extern "C" fn dict_remove(self_: *mut cef_dictionary_value_t, key: *const cef_string_t) -> i32 {
	let (Some(w), Some(key)) = (unsafe { live_dict(self_) }, unsafe { read_string(key) }) else {
		return 0;
	};
	if w.node.read_only {
		return 0;
	}
	let removed = w.node.data.lock().remove(&key);
	match removed {
		Some(old) => {
			old.invalidate();
			1
		}
		None => 0,
	}
}

unsafe extern "C" fn dict_get_type(self_: *mut cef_dictionary_value_t, key: *const cef_string_t) -> cef_value_type_t {
	unsafe { dict_get(self_, key) }.map_or(VTYPE_INVALID, |d| d.value_type())
}

unsafe extern "C" fn dict_get_value(self_: *mut cef_dictionary_value_t, key: *const cef_string_t) -> *mut cef_value_t {
	let read_only = unsafe { dict(self_) }.is_some_and(|w| w.node.read_only);
	as_value(&unsafe { dict_stats(self_) }, unsafe { dict_get(self_, key) }, read_only)
}

unsafe extern "C" fn dict_get_bool(self_: *mut cef_dictionary_value_t, key: *const cef_string_t) -> i32 {
	as_bool(unsafe { dict_get(self_, key) })
}

unsafe extern "C" fn dict_get_int(self_: *mut cef_dictionary_value_t, key: *const cef_string_t) -> i32 {
	as_int(unsafe { dict_get(self_, key) })
}

unsafe extern "C" fn dict_get_double(self_: *mut cef_dictionary_value_t, key: *const cef_string_t) -> f64 {
	as_double(unsafe { dict_get(self_, key) })
}

unsafe extern "C" fn dict_get_string(
	self_: *mut cef_dictionary_value_t,
	key: *const cef_string_t,
) -> cef_string_userfree_t {
	as_string(&unsafe { dict_stats(self_) }, unsafe { dict_get(self_, key) })
}

unsafe extern "C" fn dict_get_binary(
	self_: *mut cef_dictionary_value_t,
	key: *const cef_string_t,
) -> *mut cef_binary_value_t {
	as_binary(&unsafe { dict_stats(self_) }, unsafe { dict_get(self_, key) })
}

unsafe extern "C" fn dict_get_dictionary(
	self_: *mut cef_dictionary_value_t,
	key: *const cef_string_t,
) -> *mut cef_dictionary_value_t {
	as_dictionary(&unsafe { dict_stats(self_) }, unsafe { dict_get(self_, key) })
}

unsafe extern "C" fn dict_get_list(self_: *mut cef_dictionary_value_t, key: *const cef_string_t) -> *mut cef_list_value_t {
	as_list(&unsafe { dict_stats(self_) }, unsafe { dict_get(self_, key) })
}

unsafe extern "C" fn dict_set_value(
	self_: *mut cef_dictionary_value_t,
	key: *const cef_string_t,
	value: *mut cef_value_t,
) -> i32 {
	let incoming = unsafe { self::value(value) }.and_then(ValueState::incoming);
	unsafe { dict_set(self_, key, incoming) }
}

unsafe extern "C" fn dict_set_null(self_: *mut cef_dictionary_value_t, key: *const cef_string_t) -> i32 {
	unsafe { dict_set(self_, key, Some(Incoming::simple(Data::Null))) }
}

unsafe extern "C" fn dict_set_bool(self_: *mut cef_dictionary_value_t, key: *const cef_string_t, value: i32) -> i32 {
	unsafe { dict_set(self_, key, Some(Incoming::simple(Data::Bool(value != 0)))) }
}

unsafe extern "C" fn dict_set_int(self_: *mut cef_dictionary_value_t, key: *const cef_string_t, value: i32) -> i32 {
	unsafe { dict_set(self_, key, Some(Incoming::simple(Data::Int(value)))) }
}

unsafe extern "C" fn dict_set_double(self_: *mut cef_dictionary_value_t, key: *const cef_string_t, value: f64) -> i32 {
	unsafe { dict_set(self_, key, Some(Incoming::simple(Data::Double(value)))) }
}

unsafe extern "C" fn dict_set_string(
	self_: *mut cef_dictionary_value_t,
	key: *const cef_string_t,
	value: *const cef_string_t,
) -> i32 {
	let data = Data::String(unsafe { read_units(value) });
	unsafe { dict_set(self_, key, Some(Incoming::simple(data))) }
}

unsafe extern "C" fn dict_set_binary(
	self_: *mut cef_dictionary_value_t,
	key: *const cef_string_t,
	value: *mut cef_binary_value_t,
) -> i32 {
	let incoming = unsafe { binary(value) }.and_then(Wrapper::incoming);
	unsafe { dict_set(self_, key, incoming) }
}

unsafe extern "C" fn dict_set_dictionary(
	self_: *mut cef_dictionary_value_t,
	key: *const cef_string_t,
	value: *mut cef_dictionary_value_t,
) -> i32 {
	let incoming = unsafe { dict(value) }.and_then(Wrapper::incoming);
	unsafe { dict_set(self_, key, incoming) }
}

unsafe extern "C" fn dict_set_list(
	self_: *mut cef_dictionary_value_t,
	key: *const cef_string_t,
	value: *mut cef_list_value_t,
) -> i32 {
	let incoming = unsafe { list(value) }.and_then(Wrapper::incoming);
	unsafe { dict_set(self_, key, incoming) }
}

// List.

unsafe fn list<'a>(ptr: *mut cef_list_value_t) -> Option<&'a Wrapper<Vec<Data>>> {
	unsafe { state::<cef_list_value_t, Wrapper<Vec<Data>>>(ptr) }
}

unsafe fn live_list<'a>(ptr: *mut cef_list_value_t) -> Option<&'a Wrapper<Vec<Data>>> {
	unsafe { list(ptr) }.filter(|w| w.is_valid())
}

unsafe fn list_stats(ptr: *mut cef_list_value_t) -> Arc<Stats> {
	unsafe { stats_of::<_, Wrapper<Vec<Data>>>(ptr) }
}

unsafe fn list_get(self_: *mut cef_list_value_t, index: usize) -> Option<Data> {
	let w = unsafe { live_list(self_) }?;
	w.node.data.lock().get(index).cloned()
}

unsafe fn list_set(self_: *mut cef_list_value_t, index: usize, incoming: Option<Incoming<'_>>) -> i32 {
	let (Some(w), Some(incoming)) = (unsafe { live_list(self_) }, incoming) else {
		return 0;
	};
	if w.node.read_only || incoming.data.contains(addr(&w.node)) {
		return 0;
	}
	let data = incoming.commit();
	let old = {
		let mut items = w.node.data.lock();
		if index >= items.len() {
			items.resize(index + 1, Data::Null);
		}
		mem::replace(&mut items[index], data)
	};
	old.invalidate();
	1
}

fn list_vtable() -> cef_list_value_t {
	cef_list_value_t {
		base: cef_base_ref_counted_t::empty(0),
		is_valid: Some(list_is_valid),
		is_owned: Some(list_is_owned),
		is_read_only: Some(list_is_read_only),
		is_same: Some(list_is_same),
		is_equal: Some(list_is_equal),
		copy: Some(list_copy),
		set_size: Some(list_set_size),
		get_size: Some(list_get_size),
		clear: Some(list_clear),
		remove: Some(list_remove),
		get_type: Some(list_get_type),
		get_value: Some(list_get_value),
		get_bool: Some(list_get_bool),
		get_int: Some(list_get_int),
		get_double: Some(list_get_double),
		get_string: Some(list_get_string),
		get_binary: Some(list_get_binary),
		get_dictionary: Some(list_get_dictionary),
		get_list: Some(list_get_list),
		set_value: Some(list_set_value),
		set_null: Some(list_set_null),
		set_bool: Some(list_set_bool),
		set_int: Some(list_set_int),
		set_double: Some(list_set_double),
		set_string: Some(list_set_string),
		set_binary: Some(list_set_binary),
		set_dictionary: Some(list_set_dictionary),
		set_list: Some(list_set_list),
	}
}

unsafe extern "C" fn list_is_valid(self_: *mut cef_list_value_t) -> i32 {
	i32::from(unsafe { live_list(self_) }.is_some())
}

unsafe extern "C" fn list_is_owned(self_: *mut cef_list_value_t) -> i32 {
	i32::from(unsafe { list(self_) }.is_some_and(|w| w.owned))
}

unsafe extern "C" fn list_is_read_only(self_: *mut cef_list_value_t) -> i32 {
	i32::from(unsafe { list(self_) }.is_some_and(|w| w.node.read_only))
}

unsafe extern "C" fn list_is_same(self_: *mut cef_list_value_t, that: *mut cef_list_value_t) -> i32 {
	match unsafe { (live_list(self_), live_list(that)) } {
		(Some(a), Some(b)) => i32::from(Arc::ptr_eq(&a.node, &b.node)),
		_ => 0,
	}
}

unsafe extern "C" fn list_is_equal(self_: *mut cef_list_value_t, that: *mut cef_list_value_t) -> i32 {
	match unsafe { (live_list(self_), live_list(that)) } {
		(Some(a), Some(b)) => i32::from(a.data().snapshot() == b.data().snapshot()),
		_ => 0,
	}
}

unsafe extern "C" fn list_copy(self_: *mut cef_list_value_t) -> *mut cef_list_value_t {
	let Some(w) = (unsafe { live_list(self_) }) else {
		return ptr::null_mut();
	};
	let Plain::List(items) = w.data().snapshot() else {
		return ptr::null_mut();
	};
	new_list(&unsafe { list_stats(self_) }, Plain::build_list(&items, false), false)
}

unsafe extern "C" fn list_set_size(self_: *mut cef_list_value_t, size: usize) -> i32 {
	let Some(w) = (unsafe { live_list(self_) }).filter(|w| !w.node.read_only) else {
		return 0;
	};
	let removed = {
		let mut items = w.node.data.lock();
		if size < items.len() {
			items.split_off(size)
		} else {
			items.resize(size, Data::Null);
			Vec::new()
		}
	};
	for data in &removed {
		data.invalidate();
	}
	1
}

unsafe extern "C" fn list_get_size(self_: *mut cef_list_value_t) -> usize {
	unsafe { live_list(self_) }.map_or(0, |w| w.node.data.lock().len())
}

unsafe extern "C" fn list_clear(self_: *mut cef_list_value_t) -> i32 {
	unsafe { list_set_size(self_, 0) }
}

unsafe extern "C" fn list_remove(self_: *mut cef_list_value_t, index: usize) -> i32 {
	let Some(w) = (unsafe { live_list(self_) }).filter(|w| !w.node.read_only) else {
		return 0;
	};
	let removed = {
		let mut items = w.node.data.lock();
		(index < items.len()).then(|| items.remove(index))
	};
	match removed {
		Some(old) => {
			old.invalidate();
			1
		}
		None => 0,
	}
}

unsafe extern "C" fn list_get_type(self_: *mut cef_list_value_t, index: usize) -> cef_value_type_t {
	unsafe { list_get(self_, index) }.map_or(VTYPE_INVALID, |d| d.value_type())
}

unsafe extern "C" fn list_get_value(self_: *mut cef_list_value_t, index: usize) -> *mut cef_value_t {
	let read_only = unsafe { list(self_) }.is_some_and(|w| w.node.read_only);
	as_value(&unsafe { list_stats(self_) }, unsafe { list_get(self_, index) }, read_only)
}

unsafe extern "C" fn list_get_bool(self_: *mut cef_list_value_t, index: usize) -> i32 {
	as_bool(unsafe { list_get(self_, index) })
}

unsafe extern "C" fn list_get_int(self_: *mut cef_list_value_t, index: usize) -> i32 {
	as_int(unsafe { list_get(self_, index) })
}

unsafe extern "C" fn list_get_double(self_: *mut cef_list_value_t, index: usize) -> f64 {
	as_double(unsafe { list_get(self_, index) })
}

unsafe extern "C" fn list_get_string(self_: *mut cef_list_value_t, index: usize) -> cef_string_userfree_t {
	as_string(&unsafe { list_stats(self_) }, unsafe { list_get(self_, index) })
}

unsafe extern "C" fn list_get_binary(self_: *mut cef_list_value_t, index: usize) -> *mut cef_binary_value_t {
	as_binary(&unsafe { list_stats(self_) }, unsafe { list_get(self_, index) })
}

unsafe extern "C" fn list_get_dictionary(self_: *mut cef_list_value_t, index: usize) -> *mut cef_dictionary_value_t {
	as_dictionary(&unsafe { list_stats(self_) }, unsafe { list_get(self_, index) })
}

unsafe extern "C" fn list_get_list(self_: *mut cef_list_value_t, index: usize) -> *mut cef_list_value_t {
	as_list(&unsafe { list_stats(self_) }, unsafe { list_get(self_, index) })
}

unsafe extern "C" fn list_set_value(self_: *mut cef_list_value_t, index: usize, value: *mut cef_value_t) -> i32 {
	let incoming = unsafe { self::value(value) }.and_then(ValueState::incoming);
	unsafe { list_set(self_, index, incoming) }
}

unsafe extern "C" fn list_set_null(self_: *mut cef_list_value_t, index: usize) -> i32 {
	unsafe { list_set(self_, index, Some(Incoming::simple(Data::Null))) }
}

unsafe extern "C" fn list_set_bool(self_: *mut cef_list_value_t, index: usize, value: i32) -> i32 {
	unsafe { list_set(self_, index, Some(Incoming::simple(Data::Bool(value != 0)))) }
}

unsafe extern "C" fn list_set_int(self_: *mut cef_list_value_t, index: usize, value: i32) -> i32 {
	unsafe { list_set(self_, index, Some(Incoming::simple(Data::Int(value)))) }
}

unsafe extern "C" fn list_set_double(self_: *mut cef_list_value_t, index: usize, value: f64) -> i32 {
	unsafe { list_set(self_, index, Some(Incoming::simple(Data::Double(value)))) }
}

unsafe extern "C" fn list_set_string(self_: *mut cef_list_value_t, index: usize, value: *const cef_string_t) -> i32 {
	let data = Data::String(unsafe { read_units(value) });
	unsafe { list_set(self_, index, Some(Incoming::simple(data))) }
}

unsafe extern "C" fn list_set_binary(self_: *mut cef_list_value_t, index: usize, value: *mut cef_binary_value_t) -> i32 {
	let incoming = unsafe { binary(value) }.and_then(Wrapper::incoming);
	unsafe { list_set(self_, index, incoming) }
}

unsafe extern "C" fn list_set_dictionary(
	self_: *mut cef_list_value_t,
	index: usize,
	value: *mut cef_dictionary_value_t,
) -> i32 {
	let incoming = unsafe { dict(value) }.and_then(Wrapper::incoming);
	unsafe { list_set(self_, index, incoming) }
}

unsafe extern "C" fn list_set_list(self_: *mut cef_list_value_t, index: usize, value: *mut cef_list_value_t) -> i32 {
	let incoming = unsafe { list(value) }.and_then(Wrapper::incoming);
	unsafe { list_set(self_, index, incoming) }
}

// Variant.

unsafe fn value<'a>(ptr: *mut cef_value_t) -> Option<&'a ValueState> {
	unsafe { state::<cef_value_t, ValueState>(ptr) }
}

unsafe fn live_value<'a>(ptr: *mut cef_value_t) -> Option<&'a ValueState> {
	unsafe { value(ptr) }.filter(|v| v.is_valid())
}

unsafe fn value_stats(ptr: *mut cef_value_t) -> Arc<Stats> {
	unsafe { stats_of::<_, ValueState>(ptr) }
}

unsafe fn value_get(self_: *mut cef_value_t) -> Option<Data> {
	unsafe { live_value(self_) }.map(ValueState::current)
}

unsafe fn value_set(self_: *mut cef_value_t, incoming: Option<Incoming<'_>>) -> i32 {
	let (Some(v), Some(incoming)) = (unsafe { live_value(self_) }, incoming) else {
		return 0;
	};
	if v.read_only {
		return 0;
	}
	let data = incoming.commit();
	let old = mem::replace(&mut *v.data.lock(), data);
	if !v.owned {
		old.invalidate();
	}
	1
}

fn value_vtable() -> cef_value_t {
	cef_value_t {
		base: cef_base_ref_counted_t::empty(0),
		is_valid: Some(value_is_valid),
		is_owned: Some(value_is_owned),
		is_read_only: Some(value_is_read_only),
		is_same: Some(value_is_same),
		is_equal: Some(value_is_equal),
		copy: Some(value_copy),
		get_type: Some(value_get_type),
		get_bool: Some(value_get_bool),
		get_int: Some(value_get_int),
		get_double: Some(value_get_double),
		get_string: Some(value_get_string),
		get_binary: Some(value_get_binary),
		get_dictionary: Some(value_get_dictionary),
		get_list: Some(value_get_list),
		set_null: Some(value_set_null),
		set_bool: Some(value_set_bool),
		set_int: Some(value_set_int),
		set_double: Some(value_set_double),
		set_string: Some(value_set_string),
		set_binary: Some(value_set_binary),
		set_dictionary: Some(value_set_dictionary),
		set_list: Some(value_set_list),
	}
}

unsafe extern "C" fn value_is_valid(self_: *mut cef_value_t) -> i32 {
	i32::from(unsafe { live_value(self_) }.is_some())
}

unsafe extern "C" fn value_is_owned(self_: *mut cef_value_t) -> i32 {
	i32::from(unsafe { value(self_) }.is_some_and(|v| v.owned))
}

unsafe extern "C" fn value_is_read_only(self_: *mut cef_value_t) -> i32 {
	i32::from(unsafe { value(self_) }.is_some_and(|v| v.read_only))
}

unsafe extern "C" fn value_is_same(self_: *mut cef_value_t, that: *mut cef_value_t) -> i32 {
	if self_ == that {
		return i32::from(unsafe { live_value(self_) }.is_some());
	}
	match unsafe { (value_get(self_), value_get(that)) } {
		(Some(a), Some(b)) => i32::from(a.node_addr().is_some() && a.node_addr() == b.node_addr()),
		_ => 0,
	}
}

unsafe extern "C" fn value_is_equal(self_: *mut cef_value_t, that: *mut cef_value_t) -> i32 {
	match unsafe { (value_get(self_), value_get(that)) } {
		(Some(a), Some(b)) => i32::from(a.snapshot() == b.snapshot()),
		_ => 0,
	}
}

unsafe extern "C" fn value_copy(self_: *mut cef_value_t) -> *mut cef_value_t {
	match unsafe { value_get(self_) } {
		Some(data) => plain_value(&unsafe { value_stats(self_) }, &data.snapshot(), false),
		None => ptr::null_mut(),
	}
}

unsafe extern "C" fn value_get_type(self_: *mut cef_value_t) -> cef_value_type_t {
	unsafe { value_get(self_) }.map_or(VTYPE_INVALID, |d| d.value_type())
}

unsafe extern "C" fn value_get_bool(self_: *mut cef_value_t) -> i32 {
	as_bool(unsafe { value_get(self_) })
}

unsafe extern "C" fn value_get_int(self_: *mut cef_value_t) -> i32 {
	as_int(unsafe { value_get(self_) })
}

unsafe extern "C" fn value_get_double(self_: *mut cef_value_t) -> f64 {
	as_double(unsafe { value_get(self_) })
}

unsafe extern "C" fn value_get_string(self_: *mut cef_value_t) -> cef_string_userfree_t {
	as_string(&unsafe { value_stats(self_) }, unsafe { value_get(self_) })
}

unsafe extern "C" fn value_get_binary(self_: *mut cef_value_t) -> *mut cef_binary_value_t {
	as_binary(&unsafe { value_stats(self_) }, unsafe { value_get(self_) })
}

unsafe extern "C" fn value_get_dictionary(self_: *mut cef_value_t) -> *mut cef_dictionary_value_t {
	as_dictionary(&unsafe { value_stats(self_) }, unsafe { value_get(self_) })
}

unsafe extern "C" fn value_get_list(self_: *mut cef_value_t) -> *mut cef_list_value_t {
	as_list(&unsafe { value_stats(self_) }, unsafe { value_get(self_) })
}

unsafe extern "C" fn value_set_null(self_: *mut cef_value_t) -> i32 {
	unsafe { value_set(self_, Some(Incoming::simple(Data::Null))) }
}

unsafe extern "C" fn value_set_bool(self_: *mut cef_value_t, value: i32) -> i32 {
	unsafe { value_set(self_, Some(Incoming::simple(Data::Bool(value != 0)))) }
}

unsafe extern "C" fn value_set_int(self_: *mut cef_value_t, value: i32) -> i32 {
	unsafe { value_set(self_, Some(Incoming::simple(Data::Int(value)))) }
}

unsafe extern "C" fn value_set_double(self_: *mut cef_value_t, value: f64) -> i32 {
	unsafe { value_set(self_, Some(Incoming::simple(Data::Double(value)))) }
}

unsafe extern "C" fn value_set_string(self_: *mut cef_value_t, value: *const cef_string_t) -> i32 {
	let data = Data::String(unsafe { read_units(value) });
	unsafe { value_set(self_, Some(Incoming::simple(data))) }
}

unsafe extern "C" fn value_set_binary(self_: *mut cef_value_t, value: *mut cef_binary_value_t) -> i32 {
	let incoming = unsafe { binary(value) }.and_then(Wrapper::incoming);
	unsafe { value_set(self_, incoming) }
}

unsafe extern "C" fn value_set_dictionary(self_: *mut cef_value_t, value: *mut cef_dictionary_value_t) -> i32 {
	let incoming = unsafe { dict(value) }.and_then(Wrapper::incoming);
	unsafe { value_set(self_, incoming) }
}

unsafe extern "C" fn value_set_list(self_: *mut cef_value_t, value: *mut cef_list_value_t) -> i32 {
	let incoming = unsafe { list(value) }.and_then(Wrapper::incoming);
	unsafe { value_set(self_, incoming) }
}
