// Integration tests for stream readers over buffers and Rust read handlers.

mod common;

use std::io::{Read, Seek, SeekFrom};

use cef::{ReadHandler, StreamReader};
use common::{assert_clean, setup};
use parking_lot::Mutex;

#[test]
fn test_data_stream_read_and_seek() {
	let (engine, rt) = setup();
	{
		let reader = StreamReader::create_for_data(&rt, b"hello world").expect("create stream");
		assert!(!reader.may_block().unwrap());

		let mut buf = [0u8; 5];
		assert_eq!(reader.read(&mut buf).unwrap(), 5);
		assert_eq!(&buf, b"hello");
		assert_eq!(reader.tell().unwrap(), 5);
		assert_eq!(reader.read(&mut []).unwrap(), 0);

		assert!(reader.seek(SeekFrom::Start(6)).unwrap());
		assert_eq!(reader.read_to_end().unwrap(), b"world");
		assert!(reader.eof().unwrap());

		assert!(!reader.seek(SeekFrom::End(1)).unwrap());
		assert!(!reader.seek(SeekFrom::Start(u64::MAX)).unwrap());
		assert!(reader.seek(SeekFrom::Current(-5)).unwrap());
		assert_eq!(reader.tell().unwrap(), 6);
	}
	assert_clean(&engine, 0);
}

#[test]
fn test_stream_implements_io_traits() {
	let (engine, rt) = setup();
	{
		let mut reader = StreamReader::create_for_data(&rt, b"line one\nline two").unwrap();
		let mut text = String::new();
		reader.read_to_string(&mut text).unwrap();
		assert_eq!(text, "line one\nline two");

		assert_eq!(Seek::seek(&mut reader, SeekFrom::Start(5)).unwrap(), 5);
		let err = Seek::seek(&mut reader, SeekFrom::Current(-10)).unwrap_err();
		assert_eq!(err.kind(), std::io::ErrorKind::InvalidInput);
	}
	assert_clean(&engine, 0);
}

/// In-memory source with its own cursor.
struct Chunks {
	data: Vec<u8>,
	pos: Mutex<usize>,
}

impl Chunks {
	fn new(data: &[u8]) -> Self {
		Self {
			data: data.to_vec(),
			pos: Mutex::new(0),
		}
	}
}

impl ReadHandler for Chunks {
	fn read(&self, buf: &mut [u8]) -> usize {
		let mut pos = self.pos.lock();
		// Hand out at most three bytes per call.
		let n = buf.len().min(3).min(self.data.len() - *pos);
		buf[..n].copy_from_slice(&self.data[*pos..*pos + n]);
		*pos += n;
		n
	}

	fn seek(&self, pos: SeekFrom) -> bool {
		let mut current = self.pos.lock();
		let target = match pos {
			SeekFrom::Start(offset) => i64::try_from(offset).unwrap_or(i64::MAX),
			SeekFrom::Current(offset) => *current as i64 + offset,
			SeekFrom::End(offset) => self.data.len() as i64 + offset,
		};
		if !(0..=self.data.len() as i64).contains(&target) {
			return false;
		}
		*current = target as usize;
		true
	}

	fn tell(&self) -> i64 {
		*self.pos.lock() as i64
	}

	fn eof(&self) -> bool {
		*self.pos.lock() >= self.data.len()
	}

	fn may_block(&self) -> bool {
		true
	}
}

#[test]
fn test_handler_stream_reads_through_rust() {
	let (engine, rt) = setup();
	{
		let reader = StreamReader::create_for_handler(&rt, Chunks::new(b"abcdefgh")).unwrap();
		assert!(reader.may_block().unwrap());
		assert_eq!(rt.callbacks().len(), 1);

		assert_eq!(reader.read_to_end().unwrap(), b"abcdefgh");
		assert!(reader.eof().unwrap());

		assert!(reader.seek(SeekFrom::Current(-3)).unwrap());
		assert_eq!(reader.tell().unwrap(), 5);
		assert!(!reader.seek(SeekFrom::Start(100)).unwrap());

		let mut buf = [0u8; 8];
		assert_eq!(reader.read(&mut buf).unwrap(), 3);
		assert_eq!(&buf[..3], b"fgh");
	}
	// The engine's release of the stream drops the handler.
	assert!(rt.callbacks().is_empty());
	assert_clean(&engine, 0);
}

struct Panics;

impl ReadHandler for Panics {
	fn read(&self, _buf: &mut [u8]) -> usize {
		panic!("source failed");
	}

	fn seek(&self, _pos: SeekFrom) -> bool {
		false
	}

	fn tell(&self) -> i64 {
		-1
	}

	fn eof(&self) -> bool {
		false
	}
}

#[test]
fn test_handler_panic_reads_as_end_of_data() {
	let (engine, rt) = setup();
	{
		let reader = StreamReader::create_for_handler(&rt, Panics).unwrap();
		let mut buf = [0u8; 4];
		assert_eq!(reader.read(&mut buf).unwrap(), 0);
		assert_eq!(rt.callbacks().panic_count(), 1);
		assert!(!reader.may_block().unwrap());
		assert_eq!(reader.tell().unwrap(), -1);
	}
	assert!(rt.callbacks().is_empty());
	assert_clean(&engine, 0);
}
