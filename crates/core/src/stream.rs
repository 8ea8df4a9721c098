use std::io::{self, SeekFrom};

use cefglue_runtime::{Affinity, Result, Runtime, native_call};
use cefglue_sys::{SEEK_CUR, SEEK_END, SEEK_SET, cef_stream_reader_t};

use crate::handlers::{ReadHandler, export_read_handler};
use crate::proxy::proxy;

const READ_CHUNK: usize = 8 * 1024;

proxy! {
	/// A readable byte stream over a buffer or a [`ReadHandler`].
	///
	/// Also usable through [`std::io::Read`] and [`std::io::Seek`].
	StreamReader => cef_stream_reader_t, affinity = Affinity::Any
}

impl StreamReader {
	/// Creates a stream over a copy of `data`.
	pub fn create_for_data(rt: &Runtime, data: &[u8]) -> Result<Self> {
		let ptr = unsafe { (rt.api().stream_reader_create_for_data)(data.as_ptr().cast_mut().cast(), data.len()) };
		unsafe { Self::create_from(rt, ptr) }
	}

	/// Creates a stream that pulls from `handler`.
	///
	/// The stream keeps the handler alive; it is dropped once the engine
	/// releases its last reference.
	pub fn create_for_handler<H: ReadHandler>(rt: &Runtime, handler: H) -> Result<Self> {
		let native = export_read_handler(rt, handler);
		let ptr = unsafe { (rt.api().stream_reader_create_for_handler)(native.get()) };
		// The stream took its own reference; `native` drops ours.
		unsafe { Self::create_from(rt, ptr) }
	}

	/// Reads into `buf`. Returns the number of bytes read; 0 at end of data.
	pub fn read(&self, buf: &mut [u8]) -> Result<usize> {
		if buf.is_empty() {
			return Ok(0);
		}
		let ptr = self.to_native()?;
		native_call!(ptr, read(buf.as_mut_ptr().cast(), 1, buf.len()))
	}

	/// Reads until a read returns 0 and returns everything read.
	pub fn read_to_end(&self) -> Result<Vec<u8>> {
		let mut out = Vec::new();
		let mut chunk = vec![0; READ_CHUNK];
		loop {
			let n = self.read(&mut chunk)?;
			if n == 0 {
				return Ok(out);
			}
			out.extend_from_slice(&chunk[..n]);
		}
	}

	/// Moves the read position. Returns false if the target is out of range.
	pub fn seek(&self, pos: SeekFrom) -> Result<bool> {
		let ptr = self.to_native()?;
		let (offset, whence) = match pos {
			SeekFrom::Start(offset) => match i64::try_from(offset) {
				Ok(offset) => (offset, SEEK_SET),
				Err(_) => return Ok(false),
			},
			SeekFrom::Current(offset) => (offset, SEEK_CUR),
			SeekFrom::End(offset) => (offset, SEEK_END),
		};
		Ok(native_call!(ptr, seek(offset, whence))? == 0)
	}

	/// Current position, or -1 if the source cannot tell.
	pub fn tell(&self) -> Result<i64> {
		let ptr = self.to_native()?;
		native_call!(ptr, tell())
	}

	pub fn eof(&self) -> Result<bool> {
		let ptr = self.to_native()?;
		Ok(native_call!(ptr, eof())? != 0)
	}

	/// Whether reads may block on I/O.
	pub fn may_block(&self) -> Result<bool> {
		let ptr = self.to_native()?;
		Ok(native_call!(ptr, may_block())? != 0)
	}
}

impl io::Read for StreamReader {
	fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
		StreamReader::read(self, buf).map_err(io::Error::other)
	}
}

impl io::Seek for StreamReader {
	fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
		if !StreamReader::seek(self, pos).map_err(io::Error::other)? {
			return Err(io::Error::new(io::ErrorKind::InvalidInput, "seek out of range"));
		}
		let pos = self.tell().map_err(io::Error::other)?;
		u64::try_from(pos).map_err(|_| io::Error::other("stream cannot report its position"))
	}
}
