use std::fmt;

use cefglue_sys as sys;

/// A network error code reported by the engine.
///
/// Codes outside the named constants are kept as-is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NetError(i32);

impl NetError {
	pub const NONE: NetError = NetError(sys::ERR_NONE);
	pub const FAILED: NetError = NetError(sys::ERR_FAILED);
	pub const ABORTED: NetError = NetError(sys::ERR_ABORTED);
	pub const INVALID_ARGUMENT: NetError = NetError(sys::ERR_INVALID_ARGUMENT);
	pub const NAME_NOT_RESOLVED: NetError = NetError(sys::ERR_NAME_NOT_RESOLVED);

	pub const fn from_raw(code: sys::cef_errorcode_t) -> Self {
		NetError(code)
	}

	pub const fn code(self) -> i32 {
		self.0
	}

	pub const fn is_ok(self) -> bool {
		self.0 == sys::ERR_NONE
	}

	fn name(self) -> Option<&'static str> {
		Some(match self.0 {
			sys::ERR_NONE => "NONE",
			sys::ERR_FAILED => "FAILED",
			sys::ERR_ABORTED => "ABORTED",
			sys::ERR_INVALID_ARGUMENT => "INVALID_ARGUMENT",
			sys::ERR_NAME_NOT_RESOLVED => "NAME_NOT_RESOLVED",
			_ => return None,
		})
	}
}

impl fmt::Display for NetError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self.name() {
			Some(name) => write!(f, "ERR_{name} ({})", self.0),
			None => write!(f, "net error {}", self.0),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_display_names_known_codes() {
		assert_eq!(NetError::NAME_NOT_RESOLVED.to_string(), "ERR_NAME_NOT_RESOLVED (-105)");
		assert_eq!(NetError::from_raw(-999).to_string(), "net error -999");
	}

	#[test]
	fn test_is_ok() {
		assert!(NetError::NONE.is_ok());
		assert!(!NetError::from_raw(sys::ERR_FAILED).is_ok());
		assert_eq!(NetError::ABORTED.code(), -3);
	}
}
