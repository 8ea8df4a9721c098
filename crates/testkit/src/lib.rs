//! In-process fake of the CEF C ABI.
//!
//! [`FakeEngine`] implements the object model behind [`CefApi`] in Rust, so
//! the runtime and proxies can be tested without the engine library:
//!
//! - Objects carry instrumented refcounts. Over-releases and calls on
//!   released objects are counted in [`StatsSnapshot`] instead of crashing.
//! - Userfree strings and string collections count allocations and frees,
//!   so leaks and double frees show up as unbalanced stats.
//! - Threads are simulated: [`FakeEngine::run_on`] makes the calling thread
//!   act as a named engine thread, and async completions wait in a queue
//!   until [`FakeEngine::run_pending`].
//!
//! # Example
//!
//! ```no_run
//! use cefglue_testkit::FakeEngine;
//!
//! let engine = FakeEngine::new();
//! let api = engine.api();
//! let request = unsafe { (api.request_create)() };
//! assert_eq!(engine.stats().live_objects, 1);
//! # let _ = request;
//! ```

mod callback;
mod engine;
mod object;
mod request;
mod request_context;
mod stats;
mod stream;
mod strings;
mod values;

use std::sync::Once;

use cefglue_sys::CefApi;
use tracing_subscriber::EnvFilter;

pub use callback::CallbackProbe;
pub use engine::{EngineGuard, FakeEngine, FakeEngineBuilder};
pub use object::ref_count;
pub use stats::{Stats, StatsSnapshot};

fn api_table() -> CefApi {
	CefApi {
		string_utf16_set: strings::string_utf16_set,
		string_utf16_clear: strings::string_utf16_clear,
		string_userfree_utf16_alloc: strings::string_userfree_utf16_alloc,
		string_userfree_utf16_free: strings::string_userfree_utf16_free,
		string_list_alloc: strings::string_list_alloc,
		string_list_size: strings::string_list_size,
		string_list_value: strings::string_list_value,
		string_list_append: strings::string_list_append,
		string_list_clear: strings::string_list_clear,
		string_list_free: strings::string_list_free,
		string_map_alloc: strings::string_map_alloc,
		string_map_size: strings::string_map_size,
		string_map_find: strings::string_map_find,
		string_map_key: strings::string_map_key,
		string_map_value: strings::string_map_value,
		string_map_append: strings::string_map_append,
		string_map_clear: strings::string_map_clear,
		string_map_free: strings::string_map_free,
		string_multimap_alloc: strings::string_multimap_alloc,
		string_multimap_size: strings::string_multimap_size,
		string_multimap_find_count: strings::string_multimap_find_count,
		string_multimap_enumerate: strings::string_multimap_enumerate,
		string_multimap_key: strings::string_multimap_key,
		string_multimap_value: strings::string_multimap_value,
		string_multimap_append: strings::string_multimap_append,
		string_multimap_clear: strings::string_multimap_clear,
		string_multimap_free: strings::string_multimap_free,
		binary_value_create: values::binary_value_create,
		dictionary_value_create: values::dictionary_value_create,
		list_value_create: values::list_value_create,
		value_create: values::value_create,
		request_create: request::request_create,
		request_context_get_global_context: request_context::request_context_get_global_context,
		request_context_create_context: request_context::request_context_create_context,
		stream_reader_create_for_data: stream::stream_reader_create_for_data,
		stream_reader_create_for_handler: stream::stream_reader_create_for_handler,
		currently_on: engine::currently_on,
		api_hash: engine::api_hash,
	}
}

/// Installs a test-friendly tracing subscriber once per process.
///
/// The filter comes from `RUST_LOG` and defaults to `warn`.
pub fn init_tracing() {
	static INIT: Once = Once::new();
	INIT.call_once(|| {
		let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
		let _ = tracing_subscriber::fmt()
			.with_env_filter(filter)
			.with_test_writer()
			.try_init();
	});
}
