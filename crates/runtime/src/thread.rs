//! Engine thread identifiers and per-type affinity contracts.

use std::fmt;

use cefglue_sys as sys;

/// Named threads of the engine's browser process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ThreadId {
	Ui,
	FileBackground,
	FileUserVisible,
	FileUserBlocking,
	ProcessLauncher,
	Io,
	Renderer,
}

impl ThreadId {
	pub const fn as_raw(self) -> sys::cef_thread_id_t {
		match self {
			ThreadId::Ui => sys::TID_UI,
			ThreadId::FileBackground => sys::TID_FILE_BACKGROUND,
			ThreadId::FileUserVisible => sys::TID_FILE_USER_VISIBLE,
			ThreadId::FileUserBlocking => sys::TID_FILE_USER_BLOCKING,
			ThreadId::ProcessLauncher => sys::TID_PROCESS_LAUNCHER,
			ThreadId::Io => sys::TID_IO,
			ThreadId::Renderer => sys::TID_RENDERER,
		}
	}

	pub const fn from_raw(raw: sys::cef_thread_id_t) -> Option<Self> {
		Some(match raw {
			sys::TID_UI => ThreadId::Ui,
			sys::TID_FILE_BACKGROUND => ThreadId::FileBackground,
			sys::TID_FILE_USER_VISIBLE => ThreadId::FileUserVisible,
			sys::TID_FILE_USER_BLOCKING => ThreadId::FileUserBlocking,
			sys::TID_PROCESS_LAUNCHER => ThreadId::ProcessLauncher,
			sys::TID_IO => ThreadId::Io,
			sys::TID_RENDERER => ThreadId::Renderer,
			_ => return None,
		})
	}
}

impl fmt::Display for ThreadId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(match self {
			ThreadId::Ui => "UI",
			ThreadId::FileBackground => "FILE_BACKGROUND",
			ThreadId::FileUserVisible => "FILE_USER_VISIBLE",
			ThreadId::FileUserBlocking => "FILE_USER_BLOCKING",
			ThreadId::ProcessLauncher => "PROCESS_LAUNCHER",
			ThreadId::Io => "IO",
			ThreadId::Renderer => "RENDERER",
		})
	}
}

/// Where a proxy method may be called from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Affinity {
	/// Safe on any thread.
	Any,
	/// Only on the named engine thread.
	Only(ThreadId),
}

impl Affinity {
	pub fn thread(self) -> Option<ThreadId> {
		match self {
			Affinity::Any => None,
			Affinity::Only(thread) => Some(thread),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_raw_round_trip() {
		for thread in [
			ThreadId::Ui,
			ThreadId::FileBackground,
			ThreadId::FileUserVisible,
			ThreadId::FileUserBlocking,
			ThreadId::ProcessLauncher,
			ThreadId::Io,
			ThreadId::Renderer,
		] {
			assert_eq!(ThreadId::from_raw(thread.as_raw()), Some(thread));
		}
		assert_eq!(ThreadId::from_raw(42), None);
	}

	#[test]
	fn test_affinity_thread() {
		assert_eq!(Affinity::Any.thread(), None);
		assert_eq!(Affinity::Only(ThreadId::Io).thread(), Some(ThreadId::Io));
	}
}
