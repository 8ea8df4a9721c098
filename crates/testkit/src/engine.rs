//! The fake engine instance and its per-thread context.
//!
//! Global entry points in [`CefApi`] are plain function pointers, so they
//! find their engine through a thread-local stack: building an engine makes
//! it current on the building thread, and [`FakeEngine::enter`] makes it
//! current on another. Calls made with no current engine go to a shared
//! default instance.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::ffi::{CString, c_char};
use std::marker::PhantomData;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, LazyLock, Weak};

use cefglue_sys::{
	CEF_API_HASH_UNIVERSAL, CefApi, cef_callback_t, cef_request_context_t, cef_request_t,
	cef_string_list_t, cef_string_userfree_t, cef_thread_id_t,
};
use parking_lot::Mutex;

use crate::callback::{CallbackProbe, new_callback};
use crate::object::{SendPtr, release_raw};
use crate::request::new_request;
use crate::request_context::new_global_context;
use crate::stats::{Stats, StatsSnapshot};
use crate::strings::{append_units, userfree};

thread_local! {
	static CURRENT: RefCell<Vec<Weak<EngineState>>> = const { RefCell::new(Vec::new()) };
	static THREAD: Cell<Option<cef_thread_id_t>> = const { Cell::new(None) };
}

static DEFAULT: LazyLock<FakeEngine> = LazyLock::new(|| FakeEngine::builder().detached().build());

type Task = Box<dyn FnOnce() + Send>;

/// Work the engine posts to one of its named threads.
#[derive(Default)]
pub(crate) struct TaskQueue {
	tasks: Mutex<VecDeque<(cef_thread_id_t, Task)>>,
}

impl TaskQueue {
	pub(crate) fn post(&self, thread: cef_thread_id_t, task: impl FnOnce() + Send + 'static) {
		self.tasks.lock().push_back((thread, Box::new(task)));
	}

	fn pop(&self) -> Option<(cef_thread_id_t, Task)> {
		self.tasks.lock().pop_front()
	}

	fn len(&self) -> usize {
		self.tasks.lock().len()
	}
}

pub(crate) struct EngineState {
	pub(crate) stats: Arc<Stats>,
	pub(crate) tasks: Arc<TaskQueue>,
	pub(crate) extensions: Arc<Vec<String>>,
	api_hash: CString,
	global_context: Mutex<Option<SendPtr<cef_request_context_t>>>,
	next_context_id: AtomicU64,
}

impl EngineState {
	pub(crate) fn next_context_id(&self) -> u64 {
		self.next_context_id.fetch_add(1, Ordering::Relaxed)
	}

	/// Returns a new reference to the engine's global request context.
	pub(crate) fn global_context(self: &Arc<Self>) -> *mut cef_request_context_t {
		let mut slot = self.global_context.lock();
		let ptr = match *slot {
			Some(ptr) => ptr.get(),
			None => {
				let ptr = new_global_context(self);
				*slot = Some(SendPtr(ptr));
				ptr
			}
		};
		unsafe { crate::object::add_ref_raw(ptr) };
		ptr
	}
}

impl Drop for EngineState {
	fn drop(&mut self) {
		if let Some(ptr) = self.global_context.get_mut().take() {
			unsafe { release_raw(ptr.get()) };
		}
	}
}

/// Engine current on this thread, or the shared default.
pub(crate) fn current() -> Arc<EngineState> {
	let found = CURRENT.with(|stack| stack.borrow().iter().rev().find_map(Weak::upgrade));
	found.unwrap_or_else(|| Arc::clone(&DEFAULT.state))
}

pub(crate) fn current_stats() -> Arc<Stats> {
	Arc::clone(&current().stats)
}

/// Whether the calling thread is acting as the given engine thread.
pub(crate) fn on_thread(thread: cef_thread_id_t) -> bool {
	THREAD.with(|current| current.get() == Some(thread))
}

pub(crate) unsafe extern "C" fn currently_on(thread: cef_thread_id_t) -> i32 {
	i32::from(on_thread(thread))
}

pub(crate) unsafe extern "C" fn api_hash(_entry: i32) -> *const c_char {
	// The string lives as long as the engine, which outlives its callers.
	current().api_hash.as_ptr()
}

/// Makes an engine current on this thread until dropped.
#[must_use = "the engine stops being current when the guard drops"]
pub struct EngineGuard {
	_not_send: PhantomData<*const ()>,
}

impl Drop for EngineGuard {
	fn drop(&mut self) {
		CURRENT.with(|stack| {
			stack.borrow_mut().pop();
		});
	}
}

/// In-process fake of the engine library.
///
/// Cheap to clone; clones share state. Objects created through
/// [`FakeEngine::api`] record their allocations in this engine's [`Stats`].
#[derive(Clone)]
pub struct FakeEngine {
	state: Arc<EngineState>,
}

impl std::fmt::Debug for FakeEngine {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("FakeEngine")
			.field("stats", &self.stats())
			.field("pending", &self.pending())
			.finish()
	}
}

impl Default for FakeEngine {
	fn default() -> Self {
		Self::new()
	}
}

impl FakeEngine {
	/// Builds an engine and makes it current on the calling thread.
	pub fn new() -> Self {
		Self::builder().build()
	}

	pub fn builder() -> FakeEngineBuilder {
		FakeEngineBuilder::default()
	}

	/// The global entry point table.
	pub fn api(&self) -> CefApi {
		crate::api_table()
	}

	pub fn stats(&self) -> StatsSnapshot {
		self.state.stats.snapshot()
	}

	/// Makes this engine current on the calling thread.
	pub fn enter(&self) -> EngineGuard {
		CURRENT.with(|stack| stack.borrow_mut().push(Arc::downgrade(&self.state)));
		EngineGuard {
			_not_send: PhantomData,
		}
	}

	/// Runs `f` as if on the engine thread `thread`, with this engine current.
	pub fn run_on<R>(&self, thread: cef_thread_id_t, f: impl FnOnce() -> R) -> R {
		struct Restore(Option<cef_thread_id_t>);

		impl Drop for Restore {
			fn drop(&mut self) {
				THREAD.with(|current| current.set(self.0));
			}
		}

		let _guard = self.enter();
		let _restore = Restore(THREAD.with(|current| current.replace(Some(thread))));
		f()
	}

	/// Runs queued tasks, including ones they post, on their target threads.
	/// Returns how many ran.
	pub fn run_pending(&self) -> usize {
		let mut ran = 0;
		while let Some((thread, task)) = self.state.tasks.pop() {
			self.run_on(thread, task);
			ran += 1;
		}
		tracing::trace!(ran, "ran pending engine tasks");
		ran
	}

	/// Number of queued tasks.
	pub fn pending(&self) -> usize {
		self.state.tasks.len()
	}

	/// Creates an engine-side continue/cancel callback.
	pub fn callback(&self) -> (*mut cef_callback_t, CallbackProbe) {
		new_callback(&self.state.stats)
	}

	/// Creates a read-only request, as the engine hands out for in-flight
	/// navigations.
	pub fn read_only_request(&self, url: &str) -> *mut cef_request_t {
		new_request(&self.state.stats, Some(url), true)
	}

	/// Returns a new reference to the global request context.
	pub fn global_context(&self) -> *mut cef_request_context_t {
		self.state.global_context()
	}

	/// Allocates a userfree string, as an engine method result would.
	pub fn userfree(&self, value: &str) -> cef_string_userfree_t {
		let units: Vec<u16> = value.encode_utf16().collect();
		userfree(&self.state.stats, Some(&units))
	}

	/// Appends raw units to a string list, bypassing validation.
	pub fn append_raw_units(&self, list: cef_string_list_t, units: &[u16]) {
		unsafe { append_units(list, units) };
	}
}

/// Configures a [`FakeEngine`].
#[derive(Debug, Clone)]
pub struct FakeEngineBuilder {
	api_hash: String,
	extensions: Vec<String>,
	make_current: bool,
}

impl Default for FakeEngineBuilder {
	fn default() -> Self {
		Self {
			api_hash: CEF_API_HASH_UNIVERSAL.to_string(),
			extensions: Vec::new(),
			make_current: true,
		}
	}
}

impl FakeEngineBuilder {
	/// Hash reported by `api_hash(0)`.
	pub fn api_hash(mut self, hash: &str) -> Self {
		self.api_hash = hash.to_string();
		self
	}

	/// Adds an installed extension id.
	pub fn extension(mut self, id: &str) -> Self {
		self.extensions.push(id.to_string());
		self
	}

	fn detached(mut self) -> Self {
		self.make_current = false;
		self
	}

	pub fn build(self) -> FakeEngine {
		let api_hash = CString::new(self.api_hash).expect("api hash must not contain NUL");
		let engine = FakeEngine {
			state: Arc::new(EngineState {
				stats: Arc::new(Stats::default()),
				tasks: Arc::new(TaskQueue::default()),
				extensions: Arc::new(self.extensions),
				api_hash,
				global_context: Mutex::new(None),
				next_context_id: AtomicU64::new(1),
			}),
		};
		if self.make_current {
			let weak = Arc::downgrade(&engine.state);
			CURRENT.with(|stack| {
				let mut stack = stack.borrow_mut();
				stack.retain(|entry| entry.strong_count() > 0);
				stack.push(weak);
			});
		}
		engine
	}
}
