use log::{debug, trace, warn};
use crate::access::AccessFlags;
use crate::cursor::Cursor;
use crate::layout::{DecodeError, Item, Token};
use crate::pool::{ConstantPool, EntryKind, PoolEntry};
use crate::version::Version;

/// Which kind of member a member table holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MemberKind {
	Field,
	Method,
}

/// Emits the tokens while reading through a [`Cursor`].
///
/// Groups are opened with a width of zero and get their width when closed. If a read fails, the error is passed up
/// with `?` and the groups still open are closed by [`LayoutReader::finish`].
pub(crate) struct LayoutReader<'a> {
	bytes: &'a [u8],
	cursor: Cursor<'a>,
	tokens: Vec<Token>,
	/// Indices into `tokens` of the groups not closed yet.
	open: Vec<usize>,
	pool: ConstantPool,
}

impl<'a> LayoutReader<'a> {
	pub(crate) fn new(bytes: &'a [u8]) -> LayoutReader<'a> {
		LayoutReader {
			bytes,
			cursor: Cursor::new(bytes, 0),
			tokens: Vec::new(),
			open: Vec::new(),
			pool: ConstantPool::default(),
		}
	}

	fn open(&mut self, item: Item) -> usize {
		self.open_at(self.cursor.position(), item)
	}

	fn open_at(&mut self, offset: usize, item: Item) -> usize {
		let index = self.tokens.len();
		self.push(offset, 0, item);
		self.open.push(index);
		index
	}

	fn push(&mut self, offset: usize, width: usize, item: Item) {
		self.tokens.push(Token { offset, width, depth: self.open.len(), item });
	}

	/// Closes `group` at the current position.
	fn close(&mut self, group: usize) {
		let end = self.cursor.position();
		while let Some(index) = self.open.pop() {
			self.tokens[index].width = end - self.tokens[index].offset;
			if index == group {
				break;
			}
		}
	}

	/// Closes all groups deeper than `depth` at `end`, the offset of a failed read.
	///
	/// A group that didn't get any content is dropped, so that a group never claims to be there when none of its
	/// parts could be read.
	fn close_after_failure(&mut self, depth: usize, end: usize) {
		while self.open.len() > depth {
			let Some(index) = self.open.pop() else { break };
			if index == self.tokens.len() - 1 {
				self.tokens.pop();
			} else {
				self.tokens[index].width = end.saturating_sub(self.tokens[index].offset);
			}
		}
	}

	fn set_item(&mut self, group: usize, item: Item) {
		self.tokens[group].item = item;
	}

	/// Reads one value and emits a token for it.
	///
	/// If the cursor fails, there's no token and the error gives the offset the value would have started at.
	pub(crate) fn leaf<T>(
		&mut self,
		read: impl FnOnce(&mut Cursor<'a>) -> T,
		item: impl FnOnce(&T) -> Item,
	) -> Result<T, DecodeError> {
		let offset = self.cursor.position();
		let value = read(&mut self.cursor);
		if self.cursor.failed() {
			return Err(DecodeError::Truncated { offset });
		}
		let width = self.cursor.position() - offset;
		let item = item(&value);
		self.push(offset, width, item);
		Ok(value)
	}

	pub(crate) fn u8(&mut self, item: fn(u8) -> Item) -> Result<u8, DecodeError> {
		self.leaf(Cursor::read_u8, |&value| item(value))
	}

	pub(crate) fn u16(&mut self, item: fn(u16) -> Item) -> Result<u16, DecodeError> {
		self.leaf(Cursor::read_u16, |&value| item(value))
	}

	pub(crate) fn u32(&mut self, item: fn(u32) -> Item) -> Result<u32, DecodeError> {
		self.leaf(Cursor::read_u32, |&value| item(value))
	}

	/// Reads `length` bytes as one token. A length of zero gives no token.
	fn bytes(&mut self, length: usize, item: Item) -> Result<&'a [u8], DecodeError> {
		if length == 0 {
			return Ok(&[]);
		}
		self.leaf(|c| c.read_bytes(length), |_| item)
	}

	/// Closes every group at the failure, or at the end of the data if there's none, and hands out the results.
	pub(crate) fn finish(mut self, failure: Option<&DecodeError>) -> (Vec<Token>, ConstantPool) {
		match failure {
			Some(failure) => {
				self.close_after_failure(1, failure.offset());
				// the class file group spans everything, the part not decoded included
				if let Some(root) = self.tokens.first_mut() {
					root.width = self.bytes.len();
				}
				self.open.clear();
			},
			None => {
				if let Some(&root) = self.open.first() {
					self.close(root);
				}
			},
		}
		(self.tokens, self.pool)
	}

	/// Reads the whole class file, starting with the magic number.
	pub(crate) fn read_class(&mut self) -> Result<(), DecodeError> {
		self.open(Item::ClassFile);
		self.u32(Item::Magic)?;

		self.read_version()?;
		self.read_constant_pool()?;
		self.read_access_flags()?;
		self.u16(Item::ThisClass)?;
		self.u16(Item::SuperClass)?;
		self.read_interfaces()?;
		self.read_members(MemberKind::Field)?;
		self.read_members(MemberKind::Method)?;
		self.read_attributes(false)?;

		let remaining = self.cursor.remaining();
		if remaining > 0 {
			debug!("{remaining} bytes after the end of the class file");
			self.bytes(remaining, Item::TrailingBytes)?;
		}
		Ok(())
	}

	/// Reads both version parts at once, there's no version if one of them is missing.
	fn read_version(&mut self) -> Result<(), DecodeError> {
		let offset = self.cursor.position();
		let minor = self.cursor.read_u16();
		let major = self.cursor.read_u16();
		if self.cursor.failed() {
			return Err(DecodeError::Truncated { offset });
		}

		let group = self.open_at(offset, Item::Version(Version::new(major, minor)));
		self.push(offset, 2, Item::MinorVersion(minor));
		self.push(offset + 2, 2, Item::MajorVersion(major));
		self.close(group);
		Ok(())
	}

	fn read_constant_pool(&mut self) -> Result<(), DecodeError> {
		let group = self.open(Item::ConstantPool { entries: 0 });
		let count = self.u16(Item::PoolCount)?;
		self.pool = ConstantPool::new(count);
		trace!("reading constant pool with count {count}");

		let mut entries = 0;
		let mut index = 1;
		while index < count {
			let start = self.cursor.position();
			let tag = self.cursor.read_u8();
			if self.cursor.failed() {
				return Err(DecodeError::Truncated { offset: start });
			}

			let Some(kind) = EntryKind::from_tag(tag) else {
				// without knowing the tag there's no way to know where the next entry starts
				warn!("unknown constant pool tag {tag} for entry {index} at offset {start}, stopping");
				return Err(DecodeError::MalformedConstantPool { index, tag, offset: start });
			};

			let entry = self.open_at(start, Item::PoolEntry { index, kind });
			self.push(start, 1, Item::Tag(tag));
			let value = PoolEntry::read(kind, self)?;
			self.close(entry);
			self.pool.push(value);

			entries += 1;
			self.set_item(group, Item::ConstantPool { entries });
			// a long or double in the last slot makes this go past count, that's fine
			index = index.saturating_add(kind.slots());
		}

		self.close(group);
		Ok(())
	}

	fn read_access_flags(&mut self) -> Result<(), DecodeError> {
		let offset = self.cursor.position();
		let bits = self.cursor.read_u16();
		if self.cursor.failed() {
			return Err(DecodeError::Truncated { offset });
		}
		let flags = AccessFlags::from(bits);

		let group = self.open_at(offset, Item::AccessFlags(flags));
		// big-endian: the flags below 0x0100 live in the second byte, so those come last
		let (high, low): (Vec<(u16, &str)>, Vec<(u16, &str)>) = AccessFlags::NAMED.into_iter()
			.partition(|&(mask, _)| mask >= 0x0100);
		for (mask, _) in high {
			self.push(offset, 1, Item::AccessFlag { mask, set: flags.contains(mask) });
		}
		for (mask, _) in low {
			self.push(offset + 1, 1, Item::AccessFlag { mask, set: flags.contains(mask) });
		}
		self.close(group);
		Ok(())
	}

	fn read_interfaces(&mut self) -> Result<(), DecodeError> {
		let group = self.open(Item::Interfaces);
		let count = self.u16(Item::InterfacesCount)?;
		for _ in 0..count {
			self.u16(Item::Interface)?;
		}
		self.close(group);
		Ok(())
	}

	fn read_members(&mut self, kind: MemberKind) -> Result<(), DecodeError> {
		let (group_item, count_item): (Item, fn(u16) -> Item) = match kind {
			MemberKind::Field => (Item::Fields, Item::FieldsCount),
			MemberKind::Method => (Item::Methods, Item::MethodsCount),
		};
		let member_item = |number, name_index| match kind {
			MemberKind::Field => Item::Field { number, name_index },
			MemberKind::Method => Item::Method { number, name_index },
		};

		let group = self.open(group_item);
		let count = self.u16(count_item)?;
		trace!("reading {count} {kind:?} entries");
		for number in 0..count {
			let member = self.open(member_item(number, None));
			self.leaf(Cursor::read_u16, |&bits| Item::MemberAccessFlags(AccessFlags::from(bits)))?;
			let name_index = self.u16(Item::MemberName)?;
			self.set_item(member, member_item(number, Some(name_index)));
			self.u16(Item::MemberDescriptor)?;
			self.read_attributes(kind == MemberKind::Method)?;
			self.close(member);
		}
		self.close(group);
		Ok(())
	}

	/// Reads an attribute table. Only for methods, `code_allowed` is set and a `Code` attribute is looked into,
	/// everything else is skipped by its length.
	fn read_attributes(&mut self, code_allowed: bool) -> Result<(), DecodeError> {
		let group = self.open(Item::Attributes);
		let count = self.u16(Item::AttributesCount)?;
		for _ in 0..count {
			let attribute = self.open(Item::Attribute { name_index: None });
			let name_index = self.u16(Item::AttributeName)?;
			self.set_item(attribute, Item::Attribute { name_index: Some(name_index) });
			let length = self.u32(Item::AttributeLength)?;

			let is_code = code_allowed && self.pool.get_utf8(name_index).is_ok_and(|name| name == "Code");
			if is_code {
				self.read_code(length as usize)?;
			} else {
				debug!("skipping attribute {name_index} with {length} bytes at offset {}", self.cursor.position());
				self.bytes(length as usize, Item::AttributeBody)?;
			}
			self.close(attribute);
		}
		self.close(group);
		Ok(())
	}

	/// Reads the body of a `Code` attribute with a cursor that ends where the attribute says it ends.
	///
	/// Problems inside the body don't stop the decode: the declared length tells us where the next structure starts.
	fn read_code(&mut self, length: usize) -> Result<(), DecodeError> {
		let start = self.cursor.position();
		if self.cursor.remaining() < length {
			return Err(DecodeError::Truncated { offset: start });
		}
		let end = start + length;

		let outer = std::mem::replace(&mut self.cursor, Cursor::new(&self.bytes[..end], start));
		let depth = self.open.len();
		let code = self.open(Item::Code);

		if let Err(e) = self.read_code_body() {
			warn!("Code attribute at offset {start} doesn't fit into its {length} bytes: {e}");
			self.close_after_failure(depth + 1, e.offset());
			self.cursor = Cursor::new(&self.bytes[..end], e.offset());
		}
		let leftover = self.cursor.remaining();
		if leftover > 0 {
			debug!("{leftover} bytes left over in Code attribute at offset {start}");
			self.bytes(leftover, Item::TrailingBytes)?;
		}
		self.close(code);

		self.cursor = outer;
		self.cursor.skip(length);
		Ok(())
	}

	fn read_code_body(&mut self) -> Result<(), DecodeError> {
		self.u16(Item::MaxStack)?;
		self.u16(Item::MaxLocals)?;
		let code_length = self.u32(Item::CodeLength)?;
		// an empty instruction array still gets its token, to tell it apart from a missing one
		self.leaf(|c| c.read_bytes(code_length as usize), |_| Item::Instructions)?;

		let table = self.open(Item::ExceptionTable);
		let count = self.u16(Item::ExceptionTableLength)?;
		for _ in 0..count {
			let handler = self.open(Item::ExceptionHandler);
			self.u16(Item::StartPc)?;
			self.u16(Item::EndPc)?;
			self.u16(Item::HandlerPc)?;
			self.u16(Item::CatchType)?;
			self.close(handler);
		}
		self.close(table);

		self.read_attributes(false)
	}
}
