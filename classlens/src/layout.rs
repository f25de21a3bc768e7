//! The one decode pass over a class file.
//!
//! [`read_layout`] walks the bytes once and describes them as a stream of [`Token`]s in pre-order: a group token
//! (like a method) comes before the tokens of what it contains, and its `depth` is one less than theirs. Every token
//! knows where it starts and how many bytes it covers. Both the [`ClassModel`] and the provenance tree are built from
//! this stream, so there's exactly one place that knows how the format is laid out.
//!
//! A decode that fails part way still keeps every token read until then, see [`ClassLayout::failure`].
use std::sync::Arc;
use log::trace;
use crate::access::AccessFlags;
use crate::cursor::Cursor;
use crate::model::ClassModel;
use crate::pool::{ConstantPool, EntryKind};
use crate::version::Version;

pub(crate) mod reader;

/// The magic number every class file starts with.
pub const MAGIC: u32 = 0xCAFE_BABE;

/// The reason a decode stopped.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
	#[error("not a class file: expected magic number cafebabe, got {:?}", hex::encode(found))]
	WrongMagic { found: Vec<u8> },
	#[error("unexpected end of data: a read at offset {offset} needed more bytes than are left")]
	Truncated { offset: usize },
	#[error("malformed constant pool: entry {index} at offset {offset} has unknown tag {tag}")]
	MalformedConstantPool { index: u16, tag: u8, offset: usize },
}

impl DecodeError {
	/// The offset of the first byte that couldn't be decoded.
	pub fn offset(&self) -> usize {
		match *self {
			DecodeError::WrongMagic { .. } => 0,
			DecodeError::Truncated { offset } => offset,
			DecodeError::MalformedConstantPool { offset, .. } => offset,
		}
	}
}

/// What a [`Token`] stands for, together with the decoded value, if it has one.
///
/// Variants without a value are groups, their contents follow as tokens of greater depth.
#[derive(Debug, Clone, PartialEq)]
pub enum Item {
	ClassFile,
	Magic(u32),
	Version(Version),
	MinorVersion(u16),
	MajorVersion(u16),

	/// `entries` counts the entries decoded so far, not the slots.
	ConstantPool { entries: usize },
	PoolCount(u16),
	PoolEntry { index: u16, kind: EntryKind },
	Tag(u8),
	Utf8Length(u16),
	Utf8Text(String),
	Integer(i32),
	Float(f32),
	Long(i64),
	Double(f64),
	NameIndex(u16),
	ClassIndex(u16),
	StringIndex(u16),
	NameAndTypeIndex(u16),
	DescriptorIndex(u16),
	ReferenceKind(u8),
	ReferenceIndex(u16),
	BootstrapMethodIndex(u16),

	/// The access flags of the class. The group covers the two bytes, its children are one [`Item::AccessFlag`]
	/// per named flag.
	AccessFlags(AccessFlags),
	AccessFlag { mask: u16, set: bool },
	ThisClass(u16),
	SuperClass(u16),
	Interfaces,
	InterfacesCount(u16),
	Interface(u16),

	Fields,
	FieldsCount(u16),
	Field { number: u16, name_index: Option<u16> },
	Methods,
	MethodsCount(u16),
	Method { number: u16, name_index: Option<u16> },
	MemberAccessFlags(AccessFlags),
	MemberName(u16),
	MemberDescriptor(u16),

	Attributes,
	AttributesCount(u16),
	Attribute { name_index: Option<u16> },
	AttributeName(u16),
	AttributeLength(u32),
	/// The body of an attribute we don't look into.
	AttributeBody,

	Code,
	MaxStack(u16),
	MaxLocals(u16),
	CodeLength(u32),
	Instructions,
	ExceptionTable,
	ExceptionTableLength(u16),
	ExceptionHandler,
	StartPc(u16),
	EndPc(u16),
	HandlerPc(u16),
	CatchType(u16),

	/// Bytes after the end of a structure that still belong to the enclosing one.
	TrailingBytes,
}

/// A decoded piece of the class file.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
	pub offset: usize,
	pub width: usize,
	pub depth: usize,
	pub item: Item,
}

impl Token {
	pub fn end(&self) -> usize {
		self.offset + self.width
	}
}

/// The result of decoding a class file, as far as it got.
#[derive(Debug, Clone)]
pub struct ClassLayout<'a> {
	bytes: &'a [u8],
	tokens: Vec<Token>,
	pool: Arc<ConstantPool>,
	failure: Option<DecodeError>,
}

impl<'a> ClassLayout<'a> {
	pub fn bytes(&self) -> &'a [u8] {
		self.bytes
	}

	pub fn tokens(&self) -> &[Token] {
		&self.tokens
	}

	pub fn pool(&self) -> &Arc<ConstantPool> {
		&self.pool
	}

	/// The error that stopped the decode, if it stopped before the end.
	///
	/// Everything in [`ClassLayout::tokens`] was read from the data, but values after [`DecodeError::offset`] are
	/// missing. A [`ClassModel`] built from such a layout is partial.
	pub fn failure(&self) -> Option<&DecodeError> {
		self.failure.as_ref()
	}

	pub fn is_complete(&self) -> bool {
		self.failure.is_none()
	}

	/// Builds the class model out of the tokens, even if the decode failed. Check [`ClassLayout::failure`] before
	/// trusting it.
	pub fn model(&self) -> ClassModel {
		ClassModel::from_layout(self)
	}
}

/// Decodes the structure of a class file.
///
/// Only gives an error if the data doesn't start with [`MAGIC`]. Every other problem is recorded in
/// [`ClassLayout::failure`] and the tokens read before it are kept.
pub fn read_layout(bytes: &[u8]) -> Result<ClassLayout<'_>, DecodeError> {
	let mut cursor = Cursor::new(bytes, 0);
	let magic = cursor.read_u32();
	if cursor.failed() || magic != MAGIC {
		let found = bytes[..bytes.len().min(4)].to_vec();
		return Err(DecodeError::WrongMagic { found });
	}

	let mut reader = reader::LayoutReader::new(bytes);
	let failure = reader.read_class().err();
	if let Some(failure) = &failure {
		trace!("decoding stopped at {}: {failure}", failure.offset());
	}
	let (tokens, pool) = reader.finish(failure.as_ref());

	Ok(ClassLayout {
		bytes,
		tokens,
		pool: Arc::new(pool),
		failure,
	})
}
