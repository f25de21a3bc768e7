//! A sequential big-endian reader over an in-memory buffer.
//!
//! Unlike [`std::io::Read`] based readers, a [`Cursor`] never returns an error from a single read. Instead it has a
//! sticky failure state: once a read would go past the end of the buffer, that read and every read after it returns
//! the zero value of its width and leaves the position untouched. Callers check [`Cursor::failed`] at the points
//! where a value is actually used.

/// Reads big-endian values from a byte slice, starting at some offset.
#[derive(Debug, Clone)]
pub struct Cursor<'a> {
	bytes: &'a [u8],
	position: usize,
	failed: bool,
}

impl<'a> Cursor<'a> {
	/// Creates a cursor over `bytes`, with the first read happening at `offset`.
	///
	/// An `offset` past the end of `bytes` gives a cursor for which every read fails.
	pub fn new(bytes: &'a [u8], offset: usize) -> Cursor<'a> {
		Cursor { bytes, position: offset, failed: false }
	}

	/// The offset of the next byte to be read, counted from the start of the buffer.
	pub fn position(&self) -> usize {
		self.position
	}

	/// The number of bytes left before the end of the buffer.
	pub fn remaining(&self) -> usize {
		self.bytes.len().saturating_sub(self.position)
	}

	/// `true` once a read went past the end of the buffer.
	pub fn failed(&self) -> bool {
		self.failed
	}

	/// The single place that checks the length. Every other read goes through here.
	fn take(&mut self, n: usize) -> Option<&'a [u8]> {
		if self.failed || self.remaining() < n {
			self.failed = true;
			return None;
		}
		let slice = &self.bytes[self.position..self.position + n];
		self.position += n;
		Some(slice)
	}

	fn take_n<const N: usize>(&mut self) -> [u8; N] {
		let mut buf = [0u8; N];
		if let Some(slice) = self.take(N) {
			buf.copy_from_slice(slice);
		}
		buf
	}

	pub fn read_u8(&mut self) -> u8 {
		u8::from_be_bytes(self.take_n())
	}

	pub fn read_u16(&mut self) -> u16 {
		u16::from_be_bytes(self.take_n())
	}

	pub fn read_u32(&mut self) -> u32 {
		u32::from_be_bytes(self.take_n())
	}

	pub fn read_u64(&mut self) -> u64 {
		u64::from_be_bytes(self.take_n())
	}

	/// Reads `n` raw bytes. Gives an empty slice on failure.
	pub fn read_bytes(&mut self, n: usize) -> &'a [u8] {
		self.take(n).unwrap_or(&[])
	}

	/// Advances by `n` bytes without looking at them. Fails just like a read of `n` bytes would.
	pub fn skip(&mut self, n: usize) {
		let _ = self.take(n);
	}
}

#[cfg(test)]
mod testing {
	use pretty_assertions::assert_eq;
	use crate::cursor::Cursor;

	#[test]
	fn reads_big_endian() {
		let bytes = [0xca, 0xfe, 0xba, 0xbe, 0x00, 0x34, 0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08, 0x09];
		let mut cursor = Cursor::new(&bytes, 0);

		assert_eq!(cursor.read_u32(), 0xcafe_babe);
		assert_eq!(cursor.read_u16(), 52);
		assert_eq!(cursor.read_u8(), 1);
		assert_eq!(cursor.read_u64(), 0x0203_0405_0607_0809);
		assert!(!cursor.failed());
		assert_eq!(cursor.remaining(), 0);
	}

	#[test]
	fn starts_at_offset() {
		let bytes = [0xff, 0xff, 0x00, 0x2a];
		let mut cursor = Cursor::new(&bytes, 2);

		assert_eq!(cursor.position(), 2);
		assert_eq!(cursor.read_u16(), 42);
		assert!(!cursor.failed());
	}

	#[test]
	fn failure_is_sticky() {
		let bytes = [0x12, 0x34, 0x56];
		let mut cursor = Cursor::new(&bytes, 0);

		assert_eq!(cursor.read_u16(), 0x1234);
		// only one byte is left, so this fails and doesn't move
		assert_eq!(cursor.read_u16(), 0);
		assert!(cursor.failed());
		assert_eq!(cursor.position(), 2);

		// the remaining byte would fit, but the cursor already failed
		assert_eq!(cursor.read_u8(), 0);
		assert_eq!(cursor.position(), 2);
		assert_eq!(cursor.read_bytes(1), &[] as &[u8]);
	}

	#[test]
	fn skip_and_bytes_are_checked() {
		let bytes = [1, 2, 3, 4];
		let mut cursor = Cursor::new(&bytes, 0);

		assert_eq!(cursor.read_bytes(2), &[1, 2]);
		cursor.skip(1);
		assert_eq!(cursor.position(), 3);
		cursor.skip(usize::MAX);
		assert!(cursor.failed());
		assert_eq!(cursor.position(), 3);
	}

	#[test]
	fn offset_past_the_end() {
		let bytes = [1, 2];
		let mut cursor = Cursor::new(&bytes, 10);

		assert_eq!(cursor.remaining(), 0);
		assert_eq!(cursor.read_u8(), 0);
		assert!(cursor.failed());
	}
}
