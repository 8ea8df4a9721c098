//! The injectable runtime every proxy carries, plus the optional process-wide
//! instance.
//!
//! Lifecycle of the process-wide instance:
//!
//! 1. [`Runtime::load`] (or [`Runtime::new`] with a supplied API table) checks
//!    the API hash.
//! 2. [`initialize`] installs it; [`global`] hands out clones.
//! 3. [`shutdown`] removes it, reports wrappers and exported callbacks still
//!    alive, and clears the identity cache.
//! 4. The library unloads once the last clone (held by proxies and exported
//!    callbacks) is dropped.

use std::ffi::CStr;
use std::path::Path;
use std::sync::Arc;

use cefglue_sys::{CEF_API_HASH_UNIVERSAL, CefApi};
use parking_lot::RwLock;

use crate::callback::CallbackTable;
use crate::error::{Error, Result};
use crate::library::CefLibrary;
use crate::registry::HandleRegistry;
use crate::settings::Settings;
use crate::thread::{Affinity, ThreadId};

struct RuntimeInner {
	api: CefApi,
	settings: Settings,
	registry: HandleRegistry,
	callbacks: CallbackTable,
	// Dropped last so the API table never dangles.
	library: Option<CefLibrary>,
}

/// Shared state for one engine instance.
///
/// Cheap to clone. Tests build one per fake engine; applications usually
/// install a single one with [`initialize`].
#[derive(Clone)]
pub struct Runtime {
	inner: Arc<RuntimeInner>,
}

impl Runtime {
	/// Builds a runtime over an API table supplied by the caller.
	pub fn new(api: CefApi, settings: Settings) -> Result<Self> {
		Self::build(api, settings, None)
	}

	/// Opens the engine library at `path` and builds a runtime over it.
	pub fn load(path: impl AsRef<Path>, settings: Settings) -> Result<Self> {
		let library = CefLibrary::open(path)?;
		let api = library.api();
		Self::build(api, settings, Some(library))
	}

	fn build(api: CefApi, settings: Settings, library: Option<CefLibrary>) -> Result<Self> {
		if settings.check_api_hash {
			check_api_hash(&api)?;
		}
		tracing::debug!(?settings, "runtime created");
		Ok(Self {
			inner: Arc::new(RuntimeInner {
				api,
				settings,
				registry: HandleRegistry::new(),
				callbacks: CallbackTable::new(),
				library,
			}),
		})
	}

	pub fn api(&self) -> &CefApi {
		&self.inner.api
	}

	pub fn settings(&self) -> &Settings {
		&self.inner.settings
	}

	pub fn registry(&self) -> &HandleRegistry {
		&self.inner.registry
	}

	pub fn callbacks(&self) -> &CallbackTable {
		&self.inner.callbacks
	}

	pub fn library(&self) -> Option<&CefLibrary> {
		self.inner.library.as_ref()
	}

	/// True when called on the given engine thread.
	pub fn currently_on(&self, thread: ThreadId) -> bool {
		// SAFETY: `cef_currently_on` has no preconditions.
		unsafe { (self.inner.api.currently_on)(thread.as_raw()) != 0 }
	}

	/// Fails with [`Error::WrongThread`] unless called on `expected`.
	///
	/// Always passes when thread affinity enforcement is disabled.
	pub fn ensure_thread(&self, expected: ThreadId, operation: &'static str) -> Result<()> {
		if !self.inner.settings.enforce_thread_affinity || self.currently_on(expected) {
			return Ok(());
		}
		tracing::warn!(%expected, operation, "call made on the wrong engine thread");
		Err(Error::WrongThread {
			expected,
			operation,
		})
	}

	/// Checks `affinity` for `operation`. [`Affinity::Any`] always passes.
	pub fn ensure_affinity(&self, affinity: Affinity, operation: &'static str) -> Result<()> {
		match affinity.thread() {
			Some(expected) => self.ensure_thread(expected, operation),
			None => Ok(()),
		}
	}

	pub fn ptr_eq(&self, other: &Runtime) -> bool {
		Arc::ptr_eq(&self.inner, &other.inner)
	}
}

impl std::fmt::Debug for Runtime {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Runtime")
			.field("settings", &self.inner.settings)
			.field("registry", &self.inner.registry)
			.field("callbacks", &self.inner.callbacks)
			.field("library", &self.inner.library)
			.finish()
	}
}

fn check_api_hash(api: &CefApi) -> Result<()> {
	// SAFETY: returns a static NUL-terminated string or null.
	let raw = unsafe { (api.api_hash)(0) };
	let actual = if raw.is_null() {
		String::new()
	} else {
		unsafe { CStr::from_ptr(raw) }.to_string_lossy().into_owned()
	};
	if actual.eq_ignore_ascii_case(CEF_API_HASH_UNIVERSAL) {
		Ok(())
	} else {
		Err(Error::ApiMismatch {
			expected: CEF_API_HASH_UNIVERSAL,
			actual,
		})
	}
}

static GLOBAL: RwLock<Option<Runtime>> = parking_lot::const_rwlock(None);

/// Installs `rt` as the process-wide runtime.
pub fn initialize(rt: Runtime) -> Result<()> {
	let mut global = GLOBAL.write();
	if global.is_some() {
		return Err(Error::AlreadyInitialized);
	}
	*global = Some(rt);
	tracing::debug!("global runtime initialized");
	Ok(())
}

/// Returns the process-wide runtime.
pub fn global() -> Result<Runtime> {
	GLOBAL.read().clone().ok_or(Error::NotInitialized)
}

/// Removes the process-wide runtime and clears its identity cache.
///
/// Wrappers and exported callbacks still alive keep the runtime (and the
/// library) loaded until they are dropped; they are reported here.
pub fn shutdown() -> Result<()> {
	let rt = GLOBAL.write().take().ok_or(Error::NotInitialized)?;
	let wrappers = rt.registry().live_count();
	if wrappers > 0 {
		tracing::warn!(wrappers, "cached wrappers still alive at shutdown");
	}
	let callbacks = rt.callbacks().len();
	if callbacks > 0 {
		tracing::warn!(callbacks, "exported callbacks still referenced at shutdown");
	}
	rt.registry().clear();
	tracing::debug!("global runtime shut down");
	Ok(())
}

#[cfg(test)]
mod tests {
	use cefglue_testkit::FakeEngine;

	use super::*;

	#[test]
	fn test_api_hash_mismatch_is_rejected() {
		let engine = FakeEngine::builder().api_hash("0000").build();
		let err = Runtime::new(engine.api(), Settings::default()).unwrap_err();
		assert!(err.is_lifecycle());
		match err {
			Error::ApiMismatch { actual, .. } => assert_eq!(actual, "0000"),
			other => panic!("unexpected error: {other}"),
		}

		let settings = Settings {
			check_api_hash: false,
			..Settings::default()
		};
		assert!(Runtime::new(engine.api(), settings).is_ok());
	}

	#[test]
	fn test_api_hash_compares_case_insensitively() {
		let engine = FakeEngine::builder()
			.api_hash(&CEF_API_HASH_UNIVERSAL.to_ascii_uppercase())
			.build();
		assert!(Runtime::new(engine.api(), Settings::default()).is_ok());
	}

	#[test]
	fn test_ensure_thread_checks_engine_thread() {
		let engine = FakeEngine::new();
		let rt = Runtime::new(engine.api(), Settings::default()).unwrap();

		let err = rt.ensure_thread(ThreadId::Ui, "test").unwrap_err();
		assert!(err.is_precondition());
		engine.run_on(ThreadId::Ui.as_raw(), || {
			assert!(rt.currently_on(ThreadId::Ui));
			rt.ensure_thread(ThreadId::Ui, "test").unwrap();
		});
	}

	#[test]
	fn test_ensure_thread_disabled_always_passes() {
		let engine = FakeEngine::new();
		let settings = Settings {
			enforce_thread_affinity: false,
			..Settings::default()
		};
		let rt = Runtime::new(engine.api(), settings).unwrap();
		rt.ensure_thread(ThreadId::Ui, "test").unwrap();
	}

	#[test]
	fn test_ensure_affinity_follows_declared_thread() {
		let engine = FakeEngine::new();
		let rt = Runtime::new(engine.api(), Settings::default()).unwrap();

		rt.ensure_affinity(Affinity::Any, "test").unwrap();
		let err = rt.ensure_affinity(Affinity::Only(ThreadId::Ui), "test").unwrap_err();
		assert!(matches!(
			err,
			Error::WrongThread {
				expected: ThreadId::Ui,
				operation: "test"
			}
		));
		engine.run_on(ThreadId::Ui.as_raw(), || {
			rt.ensure_affinity(Affinity::Only(ThreadId::Ui), "test").unwrap();
		});
	}

	#[test]
	fn test_global_lifecycle() {
		let engine = FakeEngine::new();
		let rt = Runtime::new(engine.api(), Settings::default()).unwrap();

		assert!(matches!(shutdown(), Err(Error::NotInitialized)));
		initialize(rt.clone()).unwrap();
		assert!(matches!(initialize(rt.clone()), Err(Error::AlreadyInitialized)));
		assert!(global().unwrap().ptr_eq(&rt));
		shutdown().unwrap();
		assert!(matches!(global(), Err(Error::NotInitialized)));
	}
}
