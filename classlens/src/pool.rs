//! The constant pool: a typed arena of tagged entries, addressed by 1-based index.
//!
//! Entries only ever point at other entries by index. Following such an index goes through the checked accessors
//! on [`ConstantPool`], which return a [`PoolError`] instead of panicking when the index doesn't lead to what the
//! referring entry promised.
use std::fmt::{Display, Formatter};
use java_string::JavaString;
use crate::cursor::Cursor;
use crate::layout::{DecodeError, Item};
use crate::layout::reader::LayoutReader;

/// The kind of a constant pool entry, as given by its tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryKind {
	Utf8,
	Integer,
	Float,
	Long,
	Double,
	Class,
	String,
	FieldRef,
	MethodRef,
	InterfaceMethodRef,
	NameAndType,
	MethodHandle,
	MethodType,
	InvokeDynamic,
}

impl EntryKind {
	pub fn from_tag(tag: u8) -> Option<EntryKind> {
		Some(match tag {
			1 => EntryKind::Utf8,
			3 => EntryKind::Integer,
			4 => EntryKind::Float,
			5 => EntryKind::Long,
			6 => EntryKind::Double,
			7 => EntryKind::Class,
			8 => EntryKind::String,
			9 => EntryKind::FieldRef,
			10 => EntryKind::MethodRef,
			11 => EntryKind::InterfaceMethodRef,
			12 => EntryKind::NameAndType,
			15 => EntryKind::MethodHandle,
			16 => EntryKind::MethodType,
			18 => EntryKind::InvokeDynamic,
			_ => return None,
		})
	}

	pub fn tag(self) -> u8 {
		match self {
			EntryKind::Utf8 => 1,
			EntryKind::Integer => 3,
			EntryKind::Float => 4,
			EntryKind::Long => 5,
			EntryKind::Double => 6,
			EntryKind::Class => 7,
			EntryKind::String => 8,
			EntryKind::FieldRef => 9,
			EntryKind::MethodRef => 10,
			EntryKind::InterfaceMethodRef => 11,
			EntryKind::NameAndType => 12,
			EntryKind::MethodHandle => 15,
			EntryKind::MethodType => 16,
			EntryKind::InvokeDynamic => 18,
		}
	}

	/// `true` for the 8 byte constants, which also take up the slot after them.
	pub fn is_wide(self) -> bool {
		matches!(self, EntryKind::Long | EntryKind::Double)
	}

	/// The number of logical pool slots an entry of this kind uses.
	pub fn slots(self) -> u16 {
		if self.is_wide() { 2 } else { 1 }
	}

	/// The name used in labels, like `UTF-8 string` or `method ref`.
	pub fn description(self) -> &'static str {
		match self {
			EntryKind::Utf8 => "UTF-8 string",
			EntryKind::Integer => "int",
			EntryKind::Float => "float",
			EntryKind::Long => "long",
			EntryKind::Double => "double",
			EntryKind::Class => "class info",
			EntryKind::String => "string constant",
			EntryKind::FieldRef => "field ref",
			EntryKind::MethodRef => "method ref",
			EntryKind::InterfaceMethodRef => "interface method ref",
			EntryKind::NameAndType => "name and type",
			EntryKind::MethodHandle => "method handle",
			EntryKind::MethodType => "method type",
			EntryKind::InvokeDynamic => "invoke dynamic",
		}
	}
}

impl Display for EntryKind {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		let name = match self {
			EntryKind::Utf8 => "Utf8",
			EntryKind::Integer => "Integer",
			EntryKind::Float => "Float",
			EntryKind::Long => "Long",
			EntryKind::Double => "Double",
			EntryKind::Class => "Class",
			EntryKind::String => "String",
			EntryKind::FieldRef => "FieldRef",
			EntryKind::MethodRef => "MethodRef",
			EntryKind::InterfaceMethodRef => "InterfaceMethodRef",
			EntryKind::NameAndType => "NameAndType",
			EntryKind::MethodHandle => "MethodHandle",
			EntryKind::MethodType => "MethodType",
			EntryKind::InvokeDynamic => "InvokeDynamic",
		};
		f.write_str(name)
	}
}

/// A failed hop while following an index into the constant pool.
///
/// Every variant is a malformed cross-reference: the index is stored in the class file, but doesn't lead to the kind
/// of entry the referring structure needs.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PoolError {
	#[error("constant pool index 0 doesn't refer to any entry")]
	Absent,
	#[error("constant pool index {index} out of bounds for pool of {len} slots")]
	OutOfBounds { index: u16, len: usize },
	#[error("constant pool index {index} is the unusable second slot of the {wide} entry at {}", index - 1)]
	UnusableSlot { index: u16, wide: EntryKind },
	#[error("constant pool entry {index} is `{found}`, expected `{expected}`")]
	DanglingCrossReference { index: u16, expected: EntryKind, found: EntryKind },
}

/// A decoded constant pool entry.
///
/// This graph shows what refers to what (by index):
/// ```txt
/// Long  Double  Utf8  Integer  Float
///      __________/\_______________
///     /      /     \    \         \
/// String  Class  NameAndType  MethodType
///           |      |      \
///           FieldRef    InvokeDynamic
///           MethodRef
///       InterfaceMethodRef
///              |
///         MethodHandle
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum PoolEntry {
	Utf8 { string: String },
	Integer { value: i32 },
	Float { bits: u32 },
	Long { value: i64 },
	Double { bits: u64 },
	Class { name_index: u16 },
	String { string_index: u16 },
	FieldRef { class_index: u16, name_and_type_index: u16 },
	MethodRef { class_index: u16, name_and_type_index: u16 },
	InterfaceMethodRef { class_index: u16, name_and_type_index: u16 },
	NameAndType { name_index: u16, descriptor_index: u16 },
	MethodHandle { reference_kind: u8, reference_index: u16 },
	MethodType { descriptor_index: u16 },
	InvokeDynamic { bootstrap_method_attr_index: u16, name_and_type_index: u16 },
}

/// Decodes the contents of an `Utf8` entry.
///
/// Class files store strings as "modified UTF-8". If that fails to decode into a proper string (for example because
/// of unpaired surrogates), we fall back to a lossy conversion, as the text is only ever displayed or compared.
pub(crate) fn decode_text(bytes: &[u8]) -> String {
	match JavaString::from_modified_utf8(bytes.to_vec()).map(JavaString::into_string) {
		Ok(Ok(string)) => string,
		_ => String::from_utf8_lossy(bytes).into_owned(),
	}
}

impl PoolEntry {
	/// Reads the payload of an entry whose tag was already read, emitting one token per value.
	pub(crate) fn read(kind: EntryKind, reader: &mut LayoutReader) -> Result<PoolEntry, DecodeError> {
		Ok(match kind {
			EntryKind::Utf8 => {
				let length = reader.u16(Item::Utf8Length)?;
				let string = reader.leaf(
					|c| decode_text(c.read_bytes(length as usize)),
					|string| Item::Utf8Text(string.clone())
				)?;
				PoolEntry::Utf8 { string }
			},
			EntryKind::Integer => {
				let value = reader.leaf(|c| c.read_u32() as i32, |&value| Item::Integer(value))?;
				PoolEntry::Integer { value }
			},
			EntryKind::Float => {
				let bits = reader.leaf(Cursor::read_u32, |&bits| Item::Float(f32::from_bits(bits)))?;
				PoolEntry::Float { bits }
			},
			EntryKind::Long => {
				let value = reader.leaf(
					|c| {
						let high = c.read_u32() as i64;
						let low = c.read_u32() as i64;
						(high << 32) | low
					},
					|&value| Item::Long(value)
				)?;
				PoolEntry::Long { value }
			},
			EntryKind::Double => {
				let bits = reader.leaf(Cursor::read_u64, |&bits| Item::Double(f64::from_bits(bits)))?;
				PoolEntry::Double { bits }
			},
			EntryKind::Class => PoolEntry::Class {
				name_index: reader.u16(Item::NameIndex)?,
			},
			EntryKind::String => PoolEntry::String {
				string_index: reader.u16(Item::StringIndex)?,
			},
			EntryKind::FieldRef => PoolEntry::FieldRef {
				class_index: reader.u16(Item::ClassIndex)?,
				name_and_type_index: reader.u16(Item::NameAndTypeIndex)?,
			},
			EntryKind::MethodRef => PoolEntry::MethodRef {
				class_index: reader.u16(Item::ClassIndex)?,
				name_and_type_index: reader.u16(Item::NameAndTypeIndex)?,
			},
			EntryKind::InterfaceMethodRef => PoolEntry::InterfaceMethodRef {
				class_index: reader.u16(Item::ClassIndex)?,
				name_and_type_index: reader.u16(Item::NameAndTypeIndex)?,
			},
			EntryKind::NameAndType => PoolEntry::NameAndType {
				name_index: reader.u16(Item::NameIndex)?,
				descriptor_index: reader.u16(Item::DescriptorIndex)?,
			},
			EntryKind::MethodHandle => PoolEntry::MethodHandle {
				reference_kind: reader.u8(Item::ReferenceKind)?,
				reference_index: reader.u16(Item::ReferenceIndex)?,
			},
			EntryKind::MethodType => PoolEntry::MethodType {
				descriptor_index: reader.u16(Item::DescriptorIndex)?,
			},
			EntryKind::InvokeDynamic => PoolEntry::InvokeDynamic {
				bootstrap_method_attr_index: reader.u16(Item::BootstrapMethodIndex)?,
				name_and_type_index: reader.u16(Item::NameAndTypeIndex)?,
			},
		})
	}

	pub fn kind(&self) -> EntryKind {
		match self {
			PoolEntry::Utf8 { .. } => EntryKind::Utf8,
			PoolEntry::Integer { .. } => EntryKind::Integer,
			PoolEntry::Float { .. } => EntryKind::Float,
			PoolEntry::Long { .. } => EntryKind::Long,
			PoolEntry::Double { .. } => EntryKind::Double,
			PoolEntry::Class { .. } => EntryKind::Class,
			PoolEntry::String { .. } => EntryKind::String,
			PoolEntry::FieldRef { .. } => EntryKind::FieldRef,
			PoolEntry::MethodRef { .. } => EntryKind::MethodRef,
			PoolEntry::InterfaceMethodRef { .. } => EntryKind::InterfaceMethodRef,
			PoolEntry::NameAndType { .. } => EntryKind::NameAndType,
			PoolEntry::MethodHandle { .. } => EntryKind::MethodHandle,
			PoolEntry::MethodType { .. } => EntryKind::MethodType,
			PoolEntry::InvokeDynamic { .. } => EntryKind::InvokeDynamic,
		}
	}

	/// The pool indices this entry refers to directly. The bootstrap method index of `InvokeDynamic` isn't one, it
	/// points into the `BootstrapMethods` attribute.
	pub fn references(&self) -> Vec<u16> {
		match *self {
			PoolEntry::Utf8 { .. } | PoolEntry::Integer { .. } | PoolEntry::Float { .. } |
			PoolEntry::Long { .. } | PoolEntry::Double { .. } => Vec::new(),
			PoolEntry::Class { name_index } => vec![name_index],
			PoolEntry::String { string_index } => vec![string_index],
			PoolEntry::FieldRef { class_index, name_and_type_index } |
			PoolEntry::MethodRef { class_index, name_and_type_index } |
			PoolEntry::InterfaceMethodRef { class_index, name_and_type_index } => vec![class_index, name_and_type_index],
			PoolEntry::NameAndType { name_index, descriptor_index } => vec![name_index, descriptor_index],
			PoolEntry::MethodHandle { reference_index, .. } => vec![reference_index],
			PoolEntry::MethodType { descriptor_index } => vec![descriptor_index],
			PoolEntry::InvokeDynamic { name_and_type_index, .. } => vec![name_and_type_index],
		}
	}
}

/// A resolved field, method or interface method reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemberRef<'p> {
	pub class: &'p str,
	pub name: &'p str,
	pub descriptor: &'p str,
}

/// A resolved `MethodHandle` entry: the reference kind and the entry it refers to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MethodHandleRef<'p> {
	pub reference_kind: u8,
	pub reference_index: u16,
	pub reference: &'p PoolEntry,
}

/// A resolved `InvokeDynamic` entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvokeDynamicRef<'p> {
	pub bootstrap_method_attr_index: u16,
	pub name: &'p str,
	pub descriptor: &'p str,
}

/// The constant pool of one class file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConstantPool {
	/// The `constant_pool_count` item as stored in the class file.
	declared_count: u16,
	/// We store a [`None`] for the zero index, as well as for the upper indices of [`PoolEntry::Long`] and
	/// [`PoolEntry::Double`]. If decoding stopped early, this is shorter than `declared_count`.
	inner: Vec<Option<PoolEntry>>,
}

impl ConstantPool {
	pub(crate) fn new(declared_count: u16) -> ConstantPool {
		ConstantPool { declared_count, inner: vec![None] }
	}

	/// Appends the entry for the next index, and the unusable slot after it for 8 byte constants.
	pub(crate) fn push(&mut self, entry: PoolEntry) {
		let wide = entry.kind().is_wide();
		self.inner.push(Some(entry));
		if wide && self.inner.len() < self.declared_count as usize {
			self.inner.push(None);
		}
	}

	pub fn declared_count(&self) -> u16 {
		self.declared_count
	}

	/// The number of slots decoded, including the reserved slot 0.
	pub fn len(&self) -> usize {
		self.inner.len()
	}

	/// `true` if no entry at all was decoded.
	pub fn is_empty(&self) -> bool {
		self.inner.len() <= 1
	}

	/// `true` if every entry the class file announced was decoded.
	pub fn is_complete(&self) -> bool {
		self.inner.len() >= self.declared_count as usize
	}

	/// Iterates over the decoded entries with their index. Unusable slots are left out.
	pub fn iter(&self) -> impl Iterator<Item = (u16, &PoolEntry)> {
		self.inner.iter()
			.enumerate()
			.filter_map(|(index, entry)| entry.as_ref().map(|entry| (index as u16, entry)))
	}

	pub fn get(&self, index: u16) -> Result<&PoolEntry, PoolError> {
		if index == 0 {
			return Err(PoolError::Absent);
		}
		match self.inner.get(index as usize) {
			Some(Some(entry)) => Ok(entry),
			Some(None) => {
				let wide = self.inner.get(index as usize - 1)
					.and_then(Option::as_ref)
					.map(PoolEntry::kind)
					.unwrap_or(EntryKind::Long);
				Err(PoolError::UnusableSlot { index, wide })
			},
			None => Err(PoolError::OutOfBounds { index, len: self.inner.len() }),
		}
	}

	pub fn get_utf8(&self, index: u16) -> Result<&str, PoolError> {
		let entry = self.get(index)?;
		let PoolEntry::Utf8 { string } = entry else {
			return Err(mismatch(index, EntryKind::Utf8, entry));
		};
		Ok(string)
	}

	pub fn get_integer(&self, index: u16) -> Result<i32, PoolError> {
		let entry = self.get(index)?;
		let PoolEntry::Integer { value } = *entry else {
			return Err(mismatch(index, EntryKind::Integer, entry));
		};
		Ok(value)
	}

	pub fn get_float(&self, index: u16) -> Result<f32, PoolError> {
		let entry = self.get(index)?;
		let PoolEntry::Float { bits } = *entry else {
			return Err(mismatch(index, EntryKind::Float, entry));
		};
		Ok(f32::from_bits(bits))
	}

	pub fn get_long(&self, index: u16) -> Result<i64, PoolError> {
		let entry = self.get(index)?;
		let PoolEntry::Long { value } = *entry else {
			return Err(mismatch(index, EntryKind::Long, entry));
		};
		Ok(value)
	}

	pub fn get_double(&self, index: u16) -> Result<f64, PoolError> {
		let entry = self.get(index)?;
		let PoolEntry::Double { bits } = *entry else {
			return Err(mismatch(index, EntryKind::Double, entry));
		};
		Ok(f64::from_bits(bits))
	}

	/// Follows `Class` → `Utf8`.
	pub fn get_class_name(&self, index: u16) -> Result<&str, PoolError> {
		let entry = self.get(index)?;
		let PoolEntry::Class { name_index } = *entry else {
			return Err(mismatch(index, EntryKind::Class, entry));
		};
		self.get_utf8(name_index)
	}

	/// Like [`ConstantPool::get_class_name`], but index 0 gives `None`, as for the super class of `java/lang/Object`.
	pub fn get_optional_class_name(&self, index: u16) -> Result<Option<&str>, PoolError> {
		if index == 0 {
			Ok(None)
		} else {
			self.get_class_name(index).map(Some)
		}
	}

	/// Follows `String` → `Utf8`.
	pub fn get_string(&self, index: u16) -> Result<&str, PoolError> {
		let entry = self.get(index)?;
		let PoolEntry::String { string_index } = *entry else {
			return Err(mismatch(index, EntryKind::String, entry));
		};
		self.get_utf8(string_index)
	}

	/// Follows `NameAndType` → (`Utf8`, `Utf8`).
	pub fn get_name_and_type(&self, index: u16) -> Result<(&str, &str), PoolError> {
		let entry = self.get(index)?;
		let PoolEntry::NameAndType { name_index, descriptor_index } = *entry else {
			return Err(mismatch(index, EntryKind::NameAndType, entry));
		};
		Ok((self.get_utf8(name_index)?, self.get_utf8(descriptor_index)?))
	}

	fn member_ref(&self, class_index: u16, name_and_type_index: u16) -> Result<MemberRef<'_>, PoolError> {
		let class = self.get_class_name(class_index)?;
		let (name, descriptor) = self.get_name_and_type(name_and_type_index)?;
		Ok(MemberRef { class, name, descriptor })
	}

	pub fn get_field_ref(&self, index: u16) -> Result<MemberRef<'_>, PoolError> {
		let entry = self.get(index)?;
		let PoolEntry::FieldRef { class_index, name_and_type_index } = *entry else {
			return Err(mismatch(index, EntryKind::FieldRef, entry));
		};
		self.member_ref(class_index, name_and_type_index)
	}

	pub fn get_method_ref(&self, index: u16) -> Result<MemberRef<'_>, PoolError> {
		let entry = self.get(index)?;
		let PoolEntry::MethodRef { class_index, name_and_type_index } = *entry else {
			return Err(mismatch(index, EntryKind::MethodRef, entry));
		};
		self.member_ref(class_index, name_and_type_index)
	}

	pub fn get_interface_method_ref(&self, index: u16) -> Result<MemberRef<'_>, PoolError> {
		let entry = self.get(index)?;
		let PoolEntry::InterfaceMethodRef { class_index, name_and_type_index } = *entry else {
			return Err(mismatch(index, EntryKind::InterfaceMethodRef, entry));
		};
		self.member_ref(class_index, name_and_type_index)
	}

	/// Follows `MethodType` → `Utf8`, giving the method descriptor.
	pub fn get_method_type(&self, index: u16) -> Result<&str, PoolError> {
		let entry = self.get(index)?;
		let PoolEntry::MethodType { descriptor_index } = *entry else {
			return Err(mismatch(index, EntryKind::MethodType, entry));
		};
		self.get_utf8(descriptor_index)
	}

	pub fn get_method_handle(&self, index: u16) -> Result<MethodHandleRef<'_>, PoolError> {
		let entry = self.get(index)?;
		let PoolEntry::MethodHandle { reference_kind, reference_index } = *entry else {
			return Err(mismatch(index, EntryKind::MethodHandle, entry));
		};
		let reference = self.get(reference_index)?;
		Ok(MethodHandleRef { reference_kind, reference_index, reference })
	}

	pub fn get_invoke_dynamic(&self, index: u16) -> Result<InvokeDynamicRef<'_>, PoolError> {
		let entry = self.get(index)?;
		let PoolEntry::InvokeDynamic { bootstrap_method_attr_index, name_and_type_index } = *entry else {
			return Err(mismatch(index, EntryKind::InvokeDynamic, entry));
		};
		let (name, descriptor) = self.get_name_and_type(name_and_type_index)?;
		Ok(InvokeDynamicRef { bootstrap_method_attr_index, name, descriptor })
	}
}

fn mismatch(index: u16, expected: EntryKind, found: &PoolEntry) -> PoolError {
	PoolError::DanglingCrossReference { index, expected, found: found.kind() }
}

#[cfg(test)]
mod testing {
	use pretty_assertions::assert_eq;
	use crate::pool::{ConstantPool, EntryKind, MemberRef, PoolEntry, PoolError};

	fn utf8(s: &str) -> PoolEntry {
		PoolEntry::Utf8 { string: s.to_owned() }
	}

	fn pool(count: u16, entries: Vec<PoolEntry>) -> ConstantPool {
		let mut pool = ConstantPool::new(count);
		for entry in entries {
			pool.push(entry);
		}
		pool
	}

	fn example() -> ConstantPool {
		pool(12, vec![
			/* 1 */ utf8("org/example/Main"),
			/* 2 */ PoolEntry::Class { name_index: 1 },
			/* 3 */ utf8("run"),
			/* 4 */ utf8("()V"),
			/* 5 */ PoolEntry::NameAndType { name_index: 3, descriptor_index: 4 },
			/* 6 */ PoolEntry::MethodRef { class_index: 2, name_and_type_index: 5 },
			/* 7 */ PoolEntry::Long { value: -2 },
			/* 9 */ PoolEntry::String { string_index: 3 },
			/* 10 */ PoolEntry::MethodHandle { reference_kind: 5, reference_index: 6 },
			/* 11 */ PoolEntry::InterfaceMethodRef { class_index: 2, name_and_type_index: 5 },
		])
	}

	#[test]
	fn follows_chains() {
		let pool = example();

		assert_eq!(pool.get_class_name(2), Ok("org/example/Main"));
		assert_eq!(pool.get_name_and_type(5), Ok(("run", "()V")));
		assert_eq!(pool.get_method_ref(6), Ok(MemberRef { class: "org/example/Main", name: "run", descriptor: "()V" }));
		assert_eq!(pool.get_interface_method_ref(11).map(|r| r.name), Ok("run"));
		assert_eq!(pool.get_long(7), Ok(-2));
		assert_eq!(pool.get_string(9), Ok("run"));

		let handle = pool.get_method_handle(10).map(|h| (h.reference_kind, h.reference.kind()));
		assert_eq!(handle, Ok((5, EntryKind::MethodRef)));
	}

	#[test]
	fn wrong_kind_is_an_error() {
		let pool = example();

		assert_eq!(
			pool.get_class_name(1),
			Err(PoolError::DanglingCrossReference { index: 1, expected: EntryKind::Class, found: EntryKind::Utf8 })
		);
		// the method ref points at a class, and that is right, but the field ref accessor expects something else
		assert_eq!(
			pool.get_field_ref(6),
			Err(PoolError::DanglingCrossReference { index: 6, expected: EntryKind::FieldRef, found: EntryKind::MethodRef })
		);
	}

	#[test]
	fn wide_entries_take_two_slots() {
		let pool = example();

		assert_eq!(pool.get(8), Err(PoolError::UnusableSlot { index: 8, wide: EntryKind::Long }));
		assert_eq!(pool.get_utf8(8), Err(PoolError::UnusableSlot { index: 8, wide: EntryKind::Long }));
		assert_eq!(pool.get(9).map(PoolEntry::kind), Ok(EntryKind::String));
		assert_eq!(pool.iter().count(), 10);
		assert!(pool.is_complete());
	}

	#[test]
	fn absent_and_out_of_bounds() {
		let pool = example();

		assert_eq!(pool.get(0), Err(PoolError::Absent));
		assert_eq!(pool.get_optional_class_name(0), Ok(None));
		assert_eq!(pool.get(12), Err(PoolError::OutOfBounds { index: 12, len: 12 }));
	}

	#[test]
	fn wide_entry_in_last_slot() {
		let pool = pool(2, vec![PoolEntry::Double { bits: 1.5f64.to_bits() }]);

		assert_eq!(pool.get_double(1), Ok(1.5));
		assert_eq!(pool.get(2), Err(PoolError::OutOfBounds { index: 2, len: 2 }));
	}

	#[test]
	fn references() {
		let pool = example();

		assert_eq!(pool.get(6).map(PoolEntry::references), Ok(vec![2, 5]));
		assert_eq!(pool.get(1).map(PoolEntry::references), Ok(vec![]));
	}

	#[test]
	fn tags_round_trip() {
		for tag in 0..=u8::MAX {
			if let Some(kind) = EntryKind::from_tag(tag) {
				assert_eq!(kind.tag(), tag);
			}
		}
		assert_eq!(EntryKind::from_tag(2), None);
		assert_eq!(EntryKind::from_tag(17), None);
	}
}
