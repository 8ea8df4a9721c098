//! Error types for the proxy runtime.

use std::path::PathBuf;
use std::string::FromUtf16Error;

use thiserror::Error;

use crate::thread::ThreadId;

/// Result type alias for proxy operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised on the Rust side of the ABI boundary.
///
/// Native operation failures are not errors: they are returned as `bool`,
/// `Option`, or a typed outcome exactly as the engine reports them.
#[derive(Debug, Error)]
pub enum Error {
	/// A required argument was missing or empty.
	#[error("Argument '{0}' must not be null or empty")]
	NullArgument(&'static str),

	/// The proxy was disposed before this call.
	#[error("{type_name} was used after dispose")]
	Disposed { type_name: &'static str },

	/// A null pointer was passed where a native object is required.
	#[error("Cannot wrap a null {type_name} handle")]
	NullHandle { type_name: &'static str },

	/// A native factory returned null.
	#[error("Engine failed to create {type_name}")]
	CreateFailed { type_name: &'static str },

	/// A thread-affine method was called on the wrong engine thread.
	#[error("{operation} must be called on the {expected} thread")]
	WrongThread {
		expected: ThreadId,
		operation: &'static str,
	},

	/// A vtable slot the proxy needs is unset.
	#[error("{type_name} does not implement '{method}'")]
	MissingMethod {
		type_name: &'static str,
		method: &'static str,
	},

	/// The engine produced a string that is not valid UTF-16.
	#[error("Invalid UTF-16 from engine: {0}")]
	InvalidUtf16(#[from] FromUtf16Error),

	/// A buffer exceeds what the ABI can describe.
	#[error("{what} length {len} exceeds the limit of {max}")]
	TooLarge {
		what: &'static str,
		len: usize,
		max: usize,
	},

	/// The engine refused to add an entry to a string collection.
	#[error("{collection} rejected the entry for key '{key}'")]
	EntryRejected { collection: &'static str, key: String },

	/// A value container was moved into a parent or its parent was destroyed.
	#[error("{type_name} is no longer valid")]
	InvalidValue { type_name: &'static str },

	/// The engine shared library could not be opened.
	#[error("Failed to load engine library '{}': {source}", .path.display())]
	LibraryLoad {
		path: PathBuf,
		source: libloading::Error,
	},

	/// The engine shared library lacks an entry point.
	#[error("Engine library does not export '{symbol}': {source}")]
	MissingSymbol {
		symbol: &'static str,
		source: libloading::Error,
	},

	/// The loaded library was built for a different API revision.
	#[error("Engine API hash mismatch: expected {expected}, library reports '{actual}'")]
	ApiMismatch {
		expected: &'static str,
		actual: String,
	},

	/// [`crate::initialize`] was called twice.
	#[error("Runtime is already initialized")]
	AlreadyInitialized,

	/// [`crate::global`] was called before [`crate::initialize`].
	#[error("Runtime is not initialized")]
	NotInitialized,

	/// JSON serialization/deserialization error.
	#[error("JSON error: {0}")]
	Json(#[from] serde_json::Error),

	/// A value cannot be represented on the other side of a conversion.
	#[error("Unsupported value: {0}")]
	UnsupportedValue(String),
}

impl Error {
	/// Returns true for misuse detected before any native call was made.
	pub fn is_precondition(&self) -> bool {
		matches!(
			self,
			Error::NullArgument(_)
				| Error::Disposed { .. }
				| Error::NullHandle { .. }
				| Error::WrongThread { .. }
		)
	}

	/// Returns true for string or buffer conversion failures.
	pub fn is_marshal(&self) -> bool {
		matches!(
			self,
			Error::InvalidUtf16(_)
				| Error::TooLarge { .. }
				| Error::EntryRejected { .. }
				| Error::UnsupportedValue(_)
		)
	}

	/// Returns true for library loading and runtime setup failures.
	pub fn is_lifecycle(&self) -> bool {
		matches!(
			self,
			Error::LibraryLoad { .. }
				| Error::MissingSymbol { .. }
				| Error::ApiMismatch { .. }
				| Error::AlreadyInitialized
				| Error::NotInitialized
		)
	}

	/// Returns the proxy type name this error refers to, if any.
	pub fn type_name(&self) -> Option<&'static str> {
		match self {
			Error::Disposed { type_name }
			| Error::NullHandle { type_name }
			| Error::CreateFailed { type_name }
			| Error::MissingMethod { type_name, .. }
			| Error::InvalidValue { type_name } => Some(type_name),
			_ => None,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_precondition_classification() {
		assert!(Error::NullArgument("name").is_precondition());
		assert!(Error::Disposed { type_name: "Request" }.is_precondition());
		assert!(
			Error::WrongThread {
				expected: ThreadId::Ui,
				operation: "set_preference",
			}
			.is_precondition()
		);
		assert!(!Error::CreateFailed { type_name: "Request" }.is_precondition());
	}

	#[test]
	fn test_marshal_classification() {
		let utf16 = String::from_utf16(&[0xD800]).unwrap_err();
		assert!(Error::from(utf16).is_marshal());
		assert!(
			Error::TooLarge {
				what: "string",
				len: 1,
				max: 0,
			}
			.is_marshal()
		);
		assert!(!Error::NotInitialized.is_marshal());
	}

	#[test]
	fn test_display_messages() {
		let err = Error::WrongThread {
			expected: ThreadId::Ui,
			operation: "RequestContext::set_preference",
		};
		assert_eq!(
			err.to_string(),
			"RequestContext::set_preference must be called on the UI thread"
		);
		assert_eq!(
			Error::Disposed { type_name: "Request" }.to_string(),
			"Request was used after dispose"
		);
		assert_eq!(
			Error::InvalidValue {
				type_name: "BinaryValue"
			}
			.type_name(),
			Some("BinaryValue")
		);
	}
}
