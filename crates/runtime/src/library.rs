//! Resolves the engine entry points from the shared library.

use std::path::{Path, PathBuf};

use cefglue_sys::CefApi;
use libloading::Library;

use crate::error::{Error, Result};

/// An open engine library and the API table resolved from it.
///
/// The function pointers in [`CefLibrary::api`] are only valid while this
/// value is alive; [`crate::Runtime::load`] keeps it inside the runtime.
pub struct CefLibrary {
	api: CefApi,
	path: PathBuf,
	_library: Library,
}

impl CefLibrary {
	/// Opens the library at `path` and resolves every `cef_*` entry point.
	pub fn open(path: impl AsRef<Path>) -> Result<Self> {
		let path = path.as_ref();
		// SAFETY: loading runs the library's initializers; the engine library
		// has none with preconditions beyond being loaded once per process.
		let library = unsafe { Library::new(path) }.map_err(|source| Error::LibraryLoad {
			path: path.to_path_buf(),
			source,
		})?;
		// SAFETY: every field type matches the exported C signature.
		let api = unsafe { resolve(&library)? };
		tracing::debug!(path = %path.display(), "loaded engine library");
		Ok(Self {
			api,
			path: path.to_path_buf(),
			_library: library,
		})
	}

	pub fn api(&self) -> CefApi {
		self.api
	}

	pub fn path(&self) -> &Path {
		&self.path
	}
}

impl std::fmt::Debug for CefLibrary {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("CefLibrary").field("path", &self.path).finish()
	}
}

/// Looks up one symbol and copies the function pointer out of it.
unsafe fn symbol<T: Copy>(library: &Library, name: &'static str) -> Result<T> {
	// SAFETY: the caller guarantees `T` matches the symbol's real type.
	let sym = unsafe { library.get::<T>(name.as_bytes()) }
		.map_err(|source| Error::MissingSymbol { symbol: name, source })?;
	Ok(*sym)
}

macro_rules! resolve_api {
	($library:expr, { $($field:ident),* $(,)? }) => {
		CefApi {
			$($field: unsafe { symbol($library, concat!("cef_", stringify!($field)))? },)*
		}
	};
}

unsafe fn resolve(library: &Library) -> Result<CefApi> {
	Ok(resolve_api!(library, {
		string_utf16_set,
		string_utf16_clear,
		string_userfree_utf16_alloc,
		string_userfree_utf16_free,
		string_list_alloc,
		string_list_size,
		string_list_value,
		string_list_append,
		string_list_clear,
		string_list_free,
		string_map_alloc,
		string_map_size,
		string_map_find,
		string_map_key,
		string_map_value,
		string_map_append,
		string_map_clear,
		string_map_free,
		string_multimap_alloc,
		string_multimap_size,
		string_multimap_find_count,
		string_multimap_enumerate,
		string_multimap_key,
		string_multimap_value,
		string_multimap_append,
		string_multimap_clear,
		string_multimap_free,
		binary_value_create,
		dictionary_value_create,
		list_value_create,
		value_create,
		request_create,
		request_context_get_global_context,
		request_context_create_context,
		stream_reader_create_for_data,
		stream_reader_create_for_handler,
		currently_on,
		api_hash,
	}))
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_open_missing_library_reports_path() {
		let err = CefLibrary::open("/nonexistent/libcef.so").unwrap_err();
		assert!(err.is_lifecycle());
		match err {
			Error::LibraryLoad { path, .. } => assert_eq!(path, Path::new("/nonexistent/libcef.so")),
			other => panic!("unexpected error: {other}"),
		}
	}
}
