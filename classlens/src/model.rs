//! The symbol view of a class file.
use std::sync::Arc;
use crate::access::AccessFlags;
use crate::layout::{read_layout, ClassLayout, DecodeError, Item, Token};
use crate::pool::{ConstantPool, PoolError};
use crate::signature::{parse_signature, DescriptorError, TypeMarker};
use crate::version::Version;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ModelError {
	#[error("could not find field {name:?} in class {class:?}")]
	NoSuchField { class: String, name: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
	pub access_flags: AccessFlags,
	pub name_index: u16,
	pub descriptor_index: u16,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Method {
	pub access_flags: AccessFlags,
	pub name_index: u16,
	pub descriptor_index: u16,
	/// The kinds of the parameters, followed by the one of the return type.
	pub signature: Result<Vec<TypeMarker>, DescriptorError>,
	/// The first `Code` attribute of the method, if there's one.
	pub code: Option<Code>,
}

impl Method {
	pub fn is_static(&self) -> bool {
		self.access_flags.is_static()
	}

	pub fn is_native(&self) -> bool {
		self.access_flags.is_native()
	}

	/// The number of parameters, or [`None`] if the descriptor couldn't be parsed.
	pub fn arg_count(&self) -> Option<usize> {
		self.signature.as_ref().ok().map(|markers| markers.len().saturating_sub(1))
	}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Code {
	pub max_stack: u16,
	pub max_locals: u16,
	/// The bytecode, not looked into.
	pub instructions: Vec<u8>,
	pub exception_handlers: Vec<ExceptionHandler>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExceptionHandler {
	pub start_pc: u16,
	pub end_pc: u16,
	pub handler_pc: u16,
	pub catch_type: CatchType,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatchType {
	/// A catch type of zero, used for `finally`.
	Any,
	Class { index: u16, name: Result<String, PoolError> },
}

impl CatchType {
	fn resolve(index: u16, pool: &ConstantPool) -> CatchType {
		if index == 0 {
			CatchType::Any
		} else {
			let name = pool.get_class_name(index).map(str::to_owned);
			CatchType::Class { index, name }
		}
	}
}

/// The result of [`ClassModel::resolve_method`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodLookup<'m> {
	pub method: Option<&'m Method>,
	/// Every method of the class, like `org/example/Main::run()V`, to say what would have been there.
	pub available: Vec<String>,
}

/// A decoded class file, with the constant pool to resolve its indices against.
///
/// All indices are stored as in the class file. Use methods like [`ClassModel::name`] or
/// [`ClassModel::method_name`] to follow them, these give a [`PoolError`] if the index leads nowhere useful.
#[derive(Debug, Clone)]
pub struct ClassModel {
	pool: Arc<ConstantPool>,
	version: Version,
	access_flags: AccessFlags,
	this_class: u16,
	super_class: u16,
	interfaces: Vec<u16>,
	fields: Vec<Field>,
	methods: Vec<Method>,
}

impl ClassModel {
	/// Decodes a class file, failing on any problem.
	///
	/// Use [`read_layout`] and [`ClassLayout::model`] to get what could be decoded of a broken class file.
	pub fn read(bytes: &[u8]) -> Result<ClassModel, DecodeError> {
		let layout = read_layout(bytes)?;
		if let Some(failure) = layout.failure() {
			return Err(failure.clone());
		}
		Ok(layout.model())
	}

	pub(crate) fn from_layout(layout: &ClassLayout) -> ClassModel {
		let mut builder = ModelBuilder::default();
		for token in layout.tokens() {
			builder.accept(token, layout.bytes());
		}
		builder.finish(layout.pool().clone())
	}

	pub fn pool(&self) -> &ConstantPool {
		&self.pool
	}

	pub fn version(&self) -> Version {
		self.version
	}

	pub fn access_flags(&self) -> AccessFlags {
		self.access_flags
	}

	pub fn this_class(&self) -> u16 {
		self.this_class
	}

	pub fn super_class(&self) -> u16 {
		self.super_class
	}

	pub fn interfaces(&self) -> &[u16] {
		&self.interfaces
	}

	pub fn fields(&self) -> &[Field] {
		&self.fields
	}

	pub fn methods(&self) -> &[Method] {
		&self.methods
	}

	/// The name of this class, like `org/example/Main`.
	pub fn name(&self) -> Result<&str, PoolError> {
		self.pool.get_class_name(self.this_class)
	}

	/// The name of the super class. Only `java/lang/Object` has none.
	pub fn super_name(&self) -> Result<Option<&str>, PoolError> {
		self.pool.get_optional_class_name(self.super_class)
	}

	pub fn interface_names(&self) -> Result<Vec<&str>, PoolError> {
		self.interfaces.iter()
			.map(|&index| self.pool.get_class_name(index))
			.collect()
	}

	pub fn field_name(&self, field: &Field) -> Result<&str, PoolError> {
		self.pool.get_utf8(field.name_index)
	}

	pub fn field_descriptor(&self, field: &Field) -> Result<&str, PoolError> {
		self.pool.get_utf8(field.descriptor_index)
	}

	pub fn method_name(&self, method: &Method) -> Result<&str, PoolError> {
		self.pool.get_utf8(method.name_index)
	}

	pub fn method_descriptor(&self, method: &Method) -> Result<&str, PoolError> {
		self.pool.get_utf8(method.descriptor_index)
	}

	/// Finds the first field with that name. Fields whose name can't be resolved are never found.
	pub fn get_field(&self, name: &str) -> Result<&Field, ModelError> {
		self.fields.iter()
			.find(|field| self.field_name(field) == Ok(name))
			.ok_or_else(|| ModelError::NoSuchField {
				class: self.name().unwrap_or("<unknown>").to_owned(),
				name: name.to_owned(),
			})
	}

	pub fn has_method_called(&self, name: &str) -> bool {
		self.methods.iter()
			.any(|method| self.method_name(method) == Ok(name))
	}

	/// Finds the method with that name and descriptor.
	///
	/// The returned [`MethodLookup`] also lists every method of the class, for telling a user what they could have
	/// meant instead.
	pub fn resolve_method(&self, name: &str, descriptor: &str) -> MethodLookup<'_> {
		let method = self.methods.iter()
			.find(|method| self.method_name(method) == Ok(name) && self.method_descriptor(method) == Ok(descriptor));

		let available = self.methods.iter()
			.map(|method| self.describe_method(method))
			.collect();

		MethodLookup { method, available }
	}

	/// Formats a method like `org/example/Main::run()V`. Parts that can't be resolved are shown as their index.
	pub fn describe_method(&self, method: &Method) -> String {
		let class = self.name().map_or_else(|_| format!("#{}", self.this_class), str::to_owned);
		let name = self.method_name(method).map_or_else(|_| format!("#{}", method.name_index), str::to_owned);
		let descriptor = self.method_descriptor(method)
			.map_or_else(|_| format!("#{}", method.descriptor_index), str::to_owned);
		format!("{class}::{name}{descriptor}")
	}
}

#[derive(Debug, Default)]
struct MethodParts {
	access_flags: AccessFlags,
	name_index: u16,
	descriptor_index: u16,
	code: Option<CodeParts>,
}

/// The parts of a `Code` attribute seen so far. Only complete parts make it into the model.
#[derive(Debug, Default)]
struct CodeParts {
	max_stack: Option<u16>,
	max_locals: Option<u16>,
	instructions: Option<Vec<u8>>,
	handler_count: Option<u16>,
	handlers: Vec<HandlerParts>,
}

#[derive(Debug, Default)]
struct HandlerParts {
	start_pc: Option<u16>,
	end_pc: Option<u16>,
	handler_pc: Option<u16>,
	catch_type: Option<u16>,
}

/// Collects the values of the tokens, in stream order.
#[derive(Debug, Default)]
struct ModelBuilder {
	version: Option<Version>,
	access_flags: AccessFlags,
	this_class: u16,
	super_class: u16,
	interfaces: Vec<u16>,
	fields: Vec<Field>,
	methods: Vec<MethodParts>,
	in_methods: bool,
	/// Set while inside the first `Code` attribute of the current method.
	in_code: bool,
}

impl ModelBuilder {
	fn code(&mut self) -> Option<&mut CodeParts> {
		if !self.in_code {
			return None;
		}
		self.methods.last_mut().and_then(|method| method.code.as_mut())
	}

	fn handler(&mut self) -> Option<&mut HandlerParts> {
		self.code().and_then(|code| code.handlers.last_mut())
	}

	fn accept(&mut self, token: &Token, bytes: &[u8]) {
		match token.item {
			Item::Version(version) => self.version = Some(version),
			Item::AccessFlags(flags) => self.access_flags = flags,
			Item::ThisClass(index) => self.this_class = index,
			Item::SuperClass(index) => self.super_class = index,
			Item::Interface(index) => self.interfaces.push(index),

			Item::Methods => self.in_methods = true,
			Item::Field { .. } => self.fields.push(Field {
				access_flags: AccessFlags::default(),
				name_index: 0,
				descriptor_index: 0,
			}),
			Item::Method { .. } => {
				self.in_code = false;
				self.methods.push(MethodParts::default());
			},
			Item::MemberAccessFlags(flags) => {
				if self.in_methods {
					if let Some(method) = self.methods.last_mut() { method.access_flags = flags; }
				} else if let Some(field) = self.fields.last_mut() {
					field.access_flags = flags;
				}
			},
			Item::MemberName(index) => {
				if self.in_methods {
					if let Some(method) = self.methods.last_mut() { method.name_index = index; }
				} else if let Some(field) = self.fields.last_mut() {
					field.name_index = index;
				}
			},
			Item::MemberDescriptor(index) => {
				if self.in_methods {
					if let Some(method) = self.methods.last_mut() { method.descriptor_index = index; }
				} else if let Some(field) = self.fields.last_mut() {
					field.descriptor_index = index;
				}
			},

			Item::Code => {
				self.in_code = false;
				if let Some(method) = self.methods.last_mut() {
					if method.code.is_none() {
						method.code = Some(CodeParts::default());
						self.in_code = true;
					}
				}
			},
			Item::MaxStack(value) => if let Some(code) = self.code() { code.max_stack = Some(value) },
			Item::MaxLocals(value) => if let Some(code) = self.code() { code.max_locals = Some(value) },
			Item::Instructions => if let Some(code) = self.code() {
				code.instructions = bytes.get(token.offset..token.end()).map(<[u8]>::to_vec);
			},
			Item::ExceptionTableLength(count) => if let Some(code) = self.code() { code.handler_count = Some(count) },
			Item::ExceptionHandler => if let Some(code) = self.code() { code.handlers.push(HandlerParts::default()) },
			Item::StartPc(value) => if let Some(handler) = self.handler() { handler.start_pc = Some(value) },
			Item::EndPc(value) => if let Some(handler) = self.handler() { handler.end_pc = Some(value) },
			Item::HandlerPc(value) => if let Some(handler) = self.handler() { handler.handler_pc = Some(value) },
			Item::CatchType(value) => if let Some(handler) = self.handler() { handler.catch_type = Some(value) },

			_ => {},
		}
	}

	fn finish(self, pool: Arc<ConstantPool>) -> ClassModel {
		let methods = self.methods.into_iter()
			.map(|parts| {
				let signature = pool.get_utf8(parts.descriptor_index)
					.map_err(DescriptorError::from)
					.and_then(parse_signature);
				let code = parts.code.and_then(|code| code.finish(&pool));
				Method {
					access_flags: parts.access_flags,
					name_index: parts.name_index,
					descriptor_index: parts.descriptor_index,
					signature,
					code,
				}
			})
			.collect();

		ClassModel {
			version: self.version.unwrap_or(Version::new(0, 0)),
			access_flags: self.access_flags,
			this_class: self.this_class,
			super_class: self.super_class,
			interfaces: self.interfaces,
			fields: self.fields,
			methods,
			pool,
		}
	}
}

impl CodeParts {
	/// Gives [`None`] if any part is missing, a handler table with fewer handlers than announced included.
	fn finish(self, pool: &ConstantPool) -> Option<Code> {
		if self.handlers.len() != self.handler_count? as usize {
			return None;
		}
		let exception_handlers = self.handlers.into_iter()
			.map(|handler| Some(ExceptionHandler {
				start_pc: handler.start_pc?,
				end_pc: handler.end_pc?,
				handler_pc: handler.handler_pc?,
				catch_type: CatchType::resolve(handler.catch_type?, pool),
			}))
			.collect::<Option<Vec<_>>>()?;

		Some(Code {
			max_stack: self.max_stack?,
			max_locals: self.max_locals?,
			instructions: self.instructions?,
			exception_handlers,
		})
	}
}

#[cfg(test)]
mod testing {
	use pretty_assertions::assert_eq;
	use anyhow::Result;
	use raw_class_file::{flags, AttributeInfo, ClassFile, CpInfo, ExceptionTableEntry, FieldInfo, MethodInfo};
	use crate::model::{CatchType, ClassModel, ModelError};
	use crate::pool::{EntryKind, PoolError};
	use crate::signature::{DescriptorError, TypeMarker};
	use crate::version::Version;

	fn utf8(s: &str) -> CpInfo {
		CpInfo::Utf8 { bytes: s.as_bytes().to_vec() }
	}

	fn class() -> ClassFile {
		ClassFile {
			minor_version: 0,
			major_version: 52,
			constant_pool: vec![
				/* 1 */ utf8("org/example/Main"),
				/* 2 */ CpInfo::Class { name_index: 1 },
				/* 3 */ utf8("java/lang/Object"),
				/* 4 */ CpInfo::Class { name_index: 3 },
				/* 5 */ utf8("count"),
				/* 6 */ utf8("I"),
				/* 7 */ utf8("main"),
				/* 8 */ utf8("([Ljava/lang/String;)V"),
				/* 9 */ utf8("Code"),
				/* 10 */ utf8("java/io/IOException"),
				/* 11 */ CpInfo::Class { name_index: 10 },
				/* 12 */ utf8("broken"),
				/* 13 */ utf8("(Q)V"),
			],
			access_flags: flags::ACC_PUBLIC | flags::ACC_SUPER,
			this_class: 2,
			super_class: 4,
			interfaces: vec![],
			fields: vec![
				FieldInfo { access_flags: flags::ACC_PRIVATE, name_index: 5, descriptor_index: 6, attributes: vec![] },
			],
			methods: vec![
				MethodInfo {
					access_flags: flags::ACC_PUBLIC | flags::ACC_STATIC,
					name_index: 7,
					descriptor_index: 8,
					attributes: vec![
						AttributeInfo::Code {
							attribute_name_index: 9,
							max_stack: 2,
							max_locals: 1,
							code: vec![0x00, 0x00, 0xb1],
							exception_table: vec![
								ExceptionTableEntry { start_pc: 0, end_pc: 2, handler_pc: 2, catch_type: 11 },
								ExceptionTableEntry { start_pc: 0, end_pc: 2, handler_pc: 2, catch_type: 0 },
								ExceptionTableEntry { start_pc: 0, end_pc: 2, handler_pc: 2, catch_type: 1 },
							],
							attributes: vec![],
						},
					],
				},
				MethodInfo {
					access_flags: flags::ACC_NATIVE,
					name_index: 12,
					descriptor_index: 13,
					attributes: vec![],
				},
			],
			attributes: vec![],
		}
	}

	#[test]
	fn names() -> Result<()> {
		let model = ClassModel::read(&class().to_bytes())?;

		assert_eq!(model.version(), Version::V1_8);
		assert!(model.access_flags().is_public());
		assert_eq!(model.name(), Ok("org/example/Main"));
		assert_eq!(model.super_name(), Ok(Some("java/lang/Object")));
		assert_eq!(model.interface_names(), Ok(vec![]));
		Ok(())
	}

	#[test]
	fn methods() -> Result<()> {
		let model = ClassModel::read(&class().to_bytes())?;

		let main = &model.methods()[0];
		assert!(main.is_static());
		assert!(!main.is_native());
		assert_eq!(main.signature, Ok(vec![TypeMarker::Reference, TypeMarker::Void]));
		assert_eq!(main.arg_count(), Some(1));
		assert!(model.has_method_called("main"));
		assert!(!model.has_method_called("<init>"));

		let broken = &model.methods()[1];
		assert!(broken.is_native());
		assert!(broken.code.is_none());
		assert!(matches!(broken.signature, Err(DescriptorError::MalformedDescriptor { character: 'Q', .. })));
		assert_eq!(broken.arg_count(), None);
		Ok(())
	}

	#[test]
	fn code() -> Result<()> {
		let model = ClassModel::read(&class().to_bytes())?;

		let code = model.methods()[0].code.as_ref().ok_or_else(|| anyhow::anyhow!("no code"))?;
		assert_eq!(code.max_stack, 2);
		assert_eq!(code.max_locals, 1);
		assert_eq!(code.instructions, vec![0x00, 0x00, 0xb1]);

		let catch_types: Vec<_> = code.exception_handlers.iter().map(|h| h.catch_type.clone()).collect();
		assert_eq!(
			catch_types,
			vec![
				CatchType::Class { index: 11, name: Ok("java/io/IOException".to_owned()) },
				CatchType::Any,
				CatchType::Class {
					index: 1,
					name: Err(PoolError::DanglingCrossReference { index: 1, expected: EntryKind::Class, found: EntryKind::Utf8 }),
				},
			]
		);
		Ok(())
	}

	#[test]
	fn lookups() -> Result<()> {
		let model = ClassModel::read(&class().to_bytes())?;

		let lookup = model.resolve_method("main", "([Ljava/lang/String;)V");
		assert_eq!(lookup.method.map(|m| m.name_index), Some(7));

		let lookup = model.resolve_method("main", "()V");
		assert_eq!(lookup.method, None);
		assert_eq!(
			lookup.available,
			vec![
				"org/example/Main::main([Ljava/lang/String;)V".to_owned(),
				"org/example/Main::broken(Q)V".to_owned(),
			]
		);

		assert_eq!(model.get_field("count").map(|f| f.descriptor_index), Ok(6));
		assert_eq!(
			model.get_field("missing"),
			Err(ModelError::NoSuchField { class: "org/example/Main".to_owned(), name: "missing".to_owned() })
		);
		Ok(())
	}
}
