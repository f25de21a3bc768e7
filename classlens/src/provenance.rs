//! The byte view of a class file: which byte range means what.
use std::iter::Peekable;
use std::slice::Iter;
use log::debug;
use serde::Serialize;
use crate::access::AccessFlags;
use crate::hex_tokens::hex_tokens;
use crate::layout::{read_layout, ClassLayout, Item, Token};
use crate::pool::{ConstantPool, PoolError};

/// A labeled byte range `[start_offset, end_offset)` of the input.
///
/// Children lie within their parent and are ordered by their start. They don't overlap, except for the children of
/// the access flags, which each cover the byte their bit is in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
	/// Unique within one tree, counting up from zero in pre-order.
	pub id: usize,
	pub start_offset: usize,
	pub end_offset: usize,
	pub label: String,
	pub children: Vec<Section>,
}

/// Everything needed to show a class file next to its hex dump.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Inspection {
	/// One two character token per input byte.
	pub hex: Vec<String>,
	pub sections: Vec<Section>,
	/// Why decoding stopped early, if it did.
	pub error: Option<String>,
}

/// Decodes `bytes` and describes them. Never fails: any problem ends up in [`Inspection::error`].
pub fn inspect(bytes: &[u8]) -> Inspection {
	let hex = hex_tokens(bytes);
	match read_layout(bytes) {
		Ok(layout) => Inspection {
			hex,
			sections: layout.sections(),
			error: layout.failure().map(ToString::to_string),
		},
		Err(e) => {
			debug!("not inspecting: {e}");
			Inspection { hex, sections: Vec::new(), error: Some(e.to_string()) }
		},
	}
}

impl ClassLayout<'_> {
	/// Builds the section tree. If the decode failed, the root gets a last child covering what's left.
	pub fn sections(&self) -> Vec<Section> {
		let mut builder = SectionBuilder { pool: self.pool(), next_id: 0 };

		let mut tokens = self.tokens().iter().peekable();
		let mut roots = builder.children(&mut tokens, 0);

		if let (Some(failure), Some(root)) = (self.failure(), roots.last_mut()) {
			root.children.push(Section {
				id: builder.next_id(),
				start_offset: failure.offset(),
				end_offset: self.bytes().len(),
				label: format!("decoding stopped: {failure}"),
				children: Vec::new(),
			});
		}

		roots
	}
}

struct SectionBuilder<'p> {
	pool: &'p ConstantPool,
	next_id: usize,
}

impl SectionBuilder<'_> {
	fn next_id(&mut self) -> usize {
		let id = self.next_id;
		self.next_id += 1;
		id
	}

	fn children(&mut self, tokens: &mut Peekable<Iter<Token>>, depth: usize) -> Vec<Section> {
		let mut sections = Vec::new();
		while let Some(token) = tokens.next_if(|token| token.depth == depth) {
			let id = self.next_id();
			let label = self.label(token);
			let children = self.children(tokens, depth + 1);
			sections.push(Section {
				id,
				start_offset: token.offset,
				end_offset: token.end(),
				label,
				children,
			});
		}
		sections
	}

	fn utf8(&self, index: u16) -> String {
		quoted(self.pool.get_utf8(index))
	}

	fn class(&self, index: u16) -> String {
		quoted(self.pool.get_class_name(index))
	}

	fn label(&self, token: &Token) -> String {
		match &token.item {
			Item::ClassFile => "class file".to_owned(),
			Item::Magic(magic) => format!("magic number {magic:#010x}"),
			Item::Version(version) => match version.release() {
				Some(release) => format!("version {version} ({release})"),
				None => format!("version {version}"),
			},
			Item::MinorVersion(minor) => format!("minor version: {minor}"),
			Item::MajorVersion(major) => format!("major version: {major}"),

			Item::ConstantPool { entries } => format!("constant pool with {entries} items"),
			Item::PoolCount(count) => format!("constant pool count: {count}"),
			Item::PoolEntry { index, kind } => format!("[{index}] {}", kind.description()),
			Item::Tag(tag) => format!("tag: {tag}"),
			Item::Utf8Length(length) => format!("length: {length}"),
			Item::Utf8Text(string) => format!("string: {string:?}"),
			Item::Integer(value) => format!("value: {value}"),
			Item::Float(value) => format!("value: {value}"),
			Item::Long(value) => format!("value: {value}"),
			Item::Double(value) => format!("value: {value}"),
			Item::NameIndex(index) => format!("name index: {index}{}", self.utf8(*index)),
			Item::ClassIndex(index) => format!("class info index: {index}{}", self.class(*index)),
			Item::StringIndex(index) => format!("UTF-8 constant index: {index}{}", self.utf8(*index)),
			Item::NameAndTypeIndex(index) => {
				let resolved = match self.pool.get_name_and_type(*index) {
					Ok((name, descriptor)) => format!(" ({name} {descriptor})"),
					Err(_) => String::new(),
				};
				format!("name and type index: {index}{resolved}")
			},
			Item::DescriptorIndex(index) => format!("descriptor index: {index}{}", self.utf8(*index)),
			Item::ReferenceKind(kind) => match reference_kind_name(*kind) {
				Some(name) => format!("reference kind: {kind} ({name})"),
				None => format!("reference kind: {kind}"),
			},
			Item::ReferenceIndex(index) => format!("reference index: {index}"),
			Item::BootstrapMethodIndex(index) => format!("bootstrap method attribute index: {index}"),

			Item::AccessFlags(flags) => format!("access flags: {:#06x}", flags.bits()),
			Item::AccessFlag { mask, set } => {
				let name = AccessFlags::name_of(*mask).unwrap_or("unknown");
				format!("{mask:#06x} {name}: {set}")
			},
			Item::ThisClass(index) => format!("constant pool index for this class: {index}{}", self.class(*index)),
			Item::SuperClass(0) => "constant pool index for super class: 0 (none)".to_owned(),
			Item::SuperClass(index) => format!("constant pool index for super class: {index}{}", self.class(*index)),
			Item::Interfaces => "interfaces".to_owned(),
			Item::InterfacesCount(count) => format!("class implements {count} interfaces"),
			Item::Interface(index) => format!("constant pool index for interface: {index}{}", self.class(*index)),

			Item::Fields => "fields".to_owned(),
			Item::FieldsCount(count) => format!("field count: {count}"),
			Item::Field { number, name_index } => self.member("field", *number, *name_index),
			Item::Methods => "methods".to_owned(),
			Item::MethodsCount(count) => format!("method count: {count}"),
			Item::Method { number, name_index } => self.member("method", *number, *name_index),
			Item::MemberAccessFlags(flags) => {
				let names: Vec<_> = AccessFlags::NAMED.iter()
					.filter(|(mask, _)| flags.contains(*mask))
					.map(|(_, name)| *name)
					.collect();
				if names.is_empty() {
					format!("access flags: {:#06x}", flags.bits())
				} else {
					format!("access flags: {:#06x} ({})", flags.bits(), names.join(" "))
				}
			},
			Item::MemberName(index) => format!("name index: {index}{}", self.utf8(*index)),
			Item::MemberDescriptor(index) => format!("descriptor index: {index}{}", self.utf8(*index)),

			Item::Attributes => "attributes".to_owned(),
			Item::AttributesCount(count) => format!("attribute count: {count}"),
			Item::Attribute { name_index: Some(index) } => match self.pool.get_utf8(*index) {
				Ok(name) => format!("attribute {name}"),
				Err(_) => format!("attribute #{index}"),
			},
			Item::Attribute { name_index: None } => "attribute".to_owned(),
			Item::AttributeName(index) => format!("attribute name index: {index}{}", self.utf8(*index)),
			Item::AttributeLength(length) => format!("attribute length: {length}"),
			Item::AttributeBody => format!("attribute body, {} bytes skipped", token.width),

			Item::Code => "code".to_owned(),
			Item::MaxStack(value) => format!("max stack: {value}"),
			Item::MaxLocals(value) => format!("max locals: {value}"),
			Item::CodeLength(length) => format!("code length: {length}"),
			Item::Instructions => format!("instructions, {} bytes", token.width),
			Item::ExceptionTable => "exception table".to_owned(),
			Item::ExceptionTableLength(length) => format!("exception table length: {length}"),
			Item::ExceptionHandler => "exception handler".to_owned(),
			Item::StartPc(pc) => format!("start pc: {pc}"),
			Item::EndPc(pc) => format!("end pc: {pc}"),
			Item::HandlerPc(pc) => format!("handler pc: {pc}"),
			Item::CatchType(0) => "catch type: 0 (any)".to_owned(),
			Item::CatchType(index) => format!("catch type: {index}{}", self.class(*index)),

			Item::TrailingBytes => format!("trailing bytes, {} bytes", token.width),
		}
	}

	fn member(&self, kind: &str, number: u16, name_index: Option<u16>) -> String {
		match name_index.map(|index| self.pool.get_utf8(index)) {
			Some(Ok(name)) => format!("{kind} {number}: {name}"),
			_ => format!("{kind} {number}"),
		}
	}
}

/// Formats a resolved name to be appended to a label, or nothing if it didn't resolve.
fn quoted(resolved: Result<&str, PoolError>) -> String {
	match resolved {
		Ok(string) => format!(" ({string:?})"),
		Err(_) => String::new(),
	}
}

fn reference_kind_name(kind: u8) -> Option<&'static str> {
	Some(match kind {
		1 => "getField",
		2 => "getStatic",
		3 => "putField",
		4 => "putStatic",
		5 => "invokeVirtual",
		6 => "invokeStatic",
		7 => "invokeSpecial",
		8 => "newInvokeSpecial",
		9 => "invokeInterface",
		_ => return None,
	})
}
