use std::io::SeekFrom;
use std::os::raw::c_void;
use std::slice;
use std::sync::Arc;

use cefglue_runtime::callback::{dispatch, export};
use cefglue_runtime::{NativeRef, Runtime};
use cefglue_sys::{SEEK_CUR, SEEK_END, SEEK_SET, cef_base_ref_counted_t, cef_read_handler_t};

/// Supplies the bytes behind a [`StreamReader`](crate::StreamReader).
///
/// Methods may be called on any thread, so state lives behind interior
/// mutability.
pub trait ReadHandler: Send + Sync + 'static {
	/// Fills `buf` from the current position. Returns the number of bytes
	/// written; 0 means end of data.
	fn read(&self, buf: &mut [u8]) -> usize;

	/// Moves the position. Returns false if `pos` is out of range.
	fn seek(&self, pos: SeekFrom) -> bool;

	fn tell(&self) -> i64;

	fn eof(&self) -> bool;

	/// Whether reads may block on I/O.
	fn may_block(&self) -> bool {
		false
	}
}

fn seek_from(offset: i64, whence: i32) -> Option<SeekFrom> {
	match whence {
		SEEK_SET => u64::try_from(offset).ok().map(SeekFrom::Start),
		SEEK_CUR => Some(SeekFrom::Current(offset)),
		SEEK_END => Some(SeekFrom::End(offset)),
		_ => None,
	}
}

unsafe extern "C" fn read<H: ReadHandler>(self_: *mut cef_read_handler_t, ptr: *mut c_void, size: usize, n: usize) -> usize {
	let Some(len) = size.checked_mul(n).filter(|len| *len > 0 && !ptr.is_null()) else {
		return 0;
	};
	unsafe {
		dispatch::<_, H, usize, _>(self_, "ReadHandler::read", |handler, _| {
			// SAFETY: the engine passes a writable buffer of `size * n` bytes.
			let buf = slice::from_raw_parts_mut(ptr.cast::<u8>(), len);
			handler.read(buf).min(len) / size
		})
	}
}

unsafe extern "C" fn seek<H: ReadHandler>(self_: *mut cef_read_handler_t, offset: i64, whence: i32) -> i32 {
	let Some(pos) = seek_from(offset, whence) else {
		return -1;
	};
	let moved = unsafe { dispatch::<_, H, bool, _>(self_, "ReadHandler::seek", |handler, _| handler.seek(pos)) };
	if moved { 0 } else { -1 }
}

unsafe extern "C" fn tell<H: ReadHandler>(self_: *mut cef_read_handler_t) -> i64 {
	unsafe { dispatch::<_, H, i64, _>(self_, "ReadHandler::tell", |handler, _| handler.tell()) }
}

unsafe extern "C" fn eof<H: ReadHandler>(self_: *mut cef_read_handler_t) -> i32 {
	unsafe { dispatch::<_, H, i32, _>(self_, "ReadHandler::eof", |handler, _| i32::from(handler.eof())) }
}

unsafe extern "C" fn may_block<H: ReadHandler>(self_: *mut cef_read_handler_t) -> i32 {
	unsafe {
		dispatch::<_, H, i32, _>(self_, "ReadHandler::may_block", |handler, _| i32::from(handler.may_block()))
	}
}

pub(crate) fn export_read_handler<H: ReadHandler>(rt: &Runtime, handler: H) -> NativeRef<cef_read_handler_t> {
	let vtable = cef_read_handler_t {
		base: cef_base_ref_counted_t::empty(0),
		read: Some(read::<H>),
		seek: Some(seek::<H>),
		tell: Some(tell::<H>),
		eof: Some(eof::<H>),
		may_block: Some(may_block::<H>),
	};
	export(rt, Arc::new(handler), vtable)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_seek_from_whence() {
		assert_eq!(seek_from(4, SEEK_SET), Some(SeekFrom::Start(4)));
		assert_eq!(seek_from(-1, SEEK_SET), None);
		assert_eq!(seek_from(-2, SEEK_CUR), Some(SeekFrom::Current(-2)));
		assert_eq!(seek_from(0, SEEK_END), Some(SeekFrom::End(0)));
		assert_eq!(seek_from(0, 7), None);
	}
}
