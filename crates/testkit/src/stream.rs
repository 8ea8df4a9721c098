use std::os::raw::c_void;
use std::ptr;

use cefglue_sys::{SEEK_CUR, SEEK_END, SEEK_SET, cef_base_ref_counted_t, cef_read_handler_t, cef_stream_reader_t};
use parking_lot::Mutex;

use crate::engine::current_stats;
use crate::object::{FakeState, SendPtr, add_ref_raw, new_object, release_raw, state};

struct Cursor {
	bytes: Vec<u8>,
	pos: usize,
}

enum ReaderState {
	Data(Mutex<Cursor>),
	/// Holds one reference to the client handler.
	Handler(SendPtr<cef_read_handler_t>),
}

impl FakeState for ReaderState {
	fn destroy(&self) {
		if let ReaderState::Handler(handler) = self {
			unsafe { release_raw(handler.get()) };
		}
	}
}

fn vtable() -> cef_stream_reader_t {
	cef_stream_reader_t {
		base: cef_base_ref_counted_t::empty(0),
		read: Some(read),
		seek: Some(seek),
		tell: Some(tell),
		eof: Some(eof),
		may_block: Some(may_block),
	}
}

pub(crate) unsafe extern "C" fn stream_reader_create_for_data(data: *mut c_void, size: usize) -> *mut cef_stream_reader_t {
	if data.is_null() && size > 0 {
		return ptr::null_mut();
	}
	let bytes = if size == 0 {
		Vec::new()
	} else {
		unsafe { std::slice::from_raw_parts(data.cast::<u8>(), size) }.to_vec()
	};
	let cursor = Cursor { bytes, pos: 0 };
	new_object(&current_stats(), vtable(), ReaderState::Data(Mutex::new(cursor)))
}

pub(crate) unsafe extern "C" fn stream_reader_create_for_handler(
	handler: *mut cef_read_handler_t,
) -> *mut cef_stream_reader_t {
	if handler.is_null() {
		return ptr::null_mut();
	}
	unsafe { add_ref_raw(handler) };
	new_object(&current_stats(), vtable(), ReaderState::Handler(SendPtr(handler)))
}

unsafe fn reader<'a>(ptr: *mut cef_stream_reader_t) -> Option<&'a ReaderState> {
	unsafe { state::<_, ReaderState>(ptr) }
}

unsafe extern "C" fn read(self_: *mut cef_stream_reader_t, out: *mut c_void, size: usize, n: usize) -> usize {
	match unsafe { reader(self_) } {
		Some(ReaderState::Data(cursor)) => {
			if size == 0 || out.is_null() {
				return 0;
			}
			let mut cursor = cursor.lock();
			let remaining = cursor.bytes.len() - cursor.pos;
			let items = n.min(remaining / size);
			let count = items * size;
			unsafe { ptr::copy_nonoverlapping(cursor.bytes.as_ptr().add(cursor.pos), out.cast::<u8>(), count) };
			cursor.pos += count;
			items
		}
		Some(ReaderState::Handler(handler)) => {
			let handler = handler.get();
			match unsafe { (*handler).read } {
				Some(read) => unsafe { read(handler, out, size, n) },
				None => 0,
			}
		}
		None => 0,
	}
}

unsafe extern "C" fn seek(self_: *mut cef_stream_reader_t, offset: i64, whence: i32) -> i32 {
	match unsafe { reader(self_) } {
		Some(ReaderState::Data(cursor)) => {
			let mut cursor = cursor.lock();
			let base = match whence {
				SEEK_SET => 0,
				SEEK_CUR => cursor.pos as i64,
				SEEK_END => cursor.bytes.len() as i64,
				_ => return -1,
			};
			match base.checked_add(offset) {
				Some(pos) if (0..=cursor.bytes.len() as i64).contains(&pos) => {
					cursor.pos = pos as usize;
					0
				}
				_ => -1,
			}
		}
		Some(ReaderState::Handler(handler)) => {
			let handler = handler.get();
			match unsafe { (*handler).seek } {
				Some(seek) => unsafe { seek(handler, offset, whence) },
				None => -1,
			}
		}
		None => -1,
	}
}

unsafe extern "C" fn tell(self_: *mut cef_stream_reader_t) -> i64 {
	match unsafe { reader(self_) } {
		Some(ReaderState::Data(cursor)) => cursor.lock().pos as i64,
		Some(ReaderState::Handler(handler)) => {
			let handler = handler.get();
			match unsafe { (*handler).tell } {
				Some(tell) => unsafe { tell(handler) },
				None => -1,
			}
		}
		None => -1,
	}
}

unsafe extern "C" fn eof(self_: *mut cef_stream_reader_t) -> i32 {
	match unsafe { reader(self_) } {
		Some(ReaderState::Data(cursor)) => {
			let cursor = cursor.lock();
			i32::from(cursor.pos >= cursor.bytes.len())
		}
		Some(ReaderState::Handler(handler)) => {
			let handler = handler.get();
			match unsafe { (*handler).eof } {
				Some(eof) => unsafe { eof(handler) },
				None => 1,
			}
		}
		None => 1,
	}
}

unsafe extern "C" fn may_block(self_: *mut cef_stream_reader_t) -> i32 {
	match unsafe { reader(self_) } {
		Some(ReaderState::Handler(handler)) => {
			let handler = handler.get();
			match unsafe { (*handler).may_block } {
				Some(may_block) => unsafe { may_block(handler) },
				None => 0,
			}
		}
		_ => 0,
	}
}
