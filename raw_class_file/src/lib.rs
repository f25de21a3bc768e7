//! This crate contains a direct binary representation of a java class file, for building test inputs.
//!
//! Use the [Java Virtual Machine Specification, Chapter 4](https://docs.oracle.com/javase/specs/jvms/se21/html/jvms-4.html)
//! to build a class file. No format checking is done when creating a `Vec<u8>`, so this can also be used to build
//! broken class files: the [`AttributeInfo::Other`] variant writes whatever bytes it's given, even for a `Code`
//! attribute.
//!
//! This code creates the same class as `javac` would, if ran on the class
//! ```java,ignore
//! package org.example;
//!
//! class Main {}
//! ```
//! without the `LineNumberTable`:
//! ```
//! # use pretty_assertions::assert_eq;
//! use raw_class_file::{AttributeInfo, ClassFile, CpInfo, flags, insn, MethodInfo};
//! let class = ClassFile {
//!     minor_version: 0,
//!     major_version: 52,
//!     constant_pool: vec![
//!         // the constant pool indices start at 1, not at 0
//!         CpInfo::Methodref { class_index: 3, name_and_type_index: 10 },
//!         CpInfo::Class { name_index: 11 },
//!         CpInfo::Class { name_index: 12 },
//!         CpInfo::Utf8 { bytes: b"<init>".to_vec() },
//!         CpInfo::Utf8 { bytes: b"()V".to_vec() },
//!         CpInfo::Utf8 { bytes: b"Code".to_vec() },
//!         CpInfo::Utf8 { bytes: b"LineNumberTable".to_vec() },
//!         CpInfo::Utf8 { bytes: b"SourceFile".to_vec() },
//!         CpInfo::Utf8 { bytes: b"Main.java".to_vec() },
//!         CpInfo::NameAndType { name_index: 4, descriptor_index: 5 },
//!         CpInfo::Utf8 { bytes: b"org/example/Main".to_vec() },
//!         CpInfo::Utf8 { bytes: b"java/lang/Object".to_vec() },
//!     ],
//!     access_flags: flags::ACC_SUPER,
//!     this_class: 2,
//!     super_class: 3,
//!     interfaces: vec![],
//!     fields: vec![],
//!     methods: vec![
//!         MethodInfo {
//!             access_flags: 0,
//!             name_index: 4,
//!             descriptor_index: 5,
//!             attributes: vec![
//!                 AttributeInfo::Code {
//!                     attribute_name_index: 6,
//!                     max_stack: 1,
//!                     max_locals: 1,
//!                     code: vec![
//!                         insn::aload_0,
//!                         insn::invokespecial, 0, 1,
//!                         insn::r#return,
//!                     ],
//!                     exception_table: vec![],
//!                     attributes: vec![],
//!                 },
//!             ],
//!         }
//!     ],
//!     attributes: vec![
//!         AttributeInfo::SourceFile {
//!             attribute_name_index: 8,
//!             sourcefile_index: 9,
//!         }
//!     ],
//! };
//!
//! let bytes = class.to_bytes();
//!
//! assert_eq!(&bytes[0..4], &[0xca, 0xfe, 0xba, 0xbe]);
//! assert_eq!(bytes.len(), class.length());
//! ```
//!
//! The [ClassFile::length] function gives the computed length of a class file, useful for computing offsets in
//! tests.

/// Appends big-endian values.
trait Out {
	fn u1(&mut self, value: u8);
	fn u2(&mut self, value: u16);
	fn u4(&mut self, value: u32);
	/// Writes the length of a table as `u2`. Tables longer than that can't be represented.
	fn len_u2(&mut self, len: usize) {
		self.u2(len as u16);
	}
}

impl Out for Vec<u8> {
	fn u1(&mut self, value: u8) {
		self.push(value);
	}
	fn u2(&mut self, value: u16) {
		self.extend_from_slice(&value.to_be_bytes());
	}
	fn u4(&mut self, value: u32) {
		self.extend_from_slice(&value.to_be_bytes());
	}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassFile {
	pub minor_version: u16,
	pub major_version: u16,
	pub constant_pool: Vec<CpInfo>,
	pub access_flags: u16,
	pub this_class: u16,
	pub super_class: u16,
	pub interfaces: Vec<u16>,
	pub fields: Vec<FieldInfo>,
	pub methods: Vec<MethodInfo>,
	pub attributes: Vec<AttributeInfo>,
}

impl ClassFile {
	/// Converts the class file to binary representation.
	pub fn to_bytes(&self) -> Vec<u8> {
		let mut vec = Vec::new();
		self.write(&mut vec);
		vec
	}

	/// The length of the class file produced by [`Self::to_bytes`], in bytes.
	pub fn length(&self) -> usize {
		self.to_bytes().len()
	}

	/// The `constant_pool_count` item: one more than the number of slots, with `Long` and `Double` taking two.
	pub fn constant_pool_count(&self) -> u16 {
		let slots: usize = self.constant_pool.iter().map(CpInfo::slots).sum();
		(slots + 1) as u16
	}

	fn write(&self, out: &mut Vec<u8>) {
		out.u4(0xCAFEBABE);
		out.u2(self.minor_version);
		out.u2(self.major_version);
		out.u2(self.constant_pool_count());
		for entry in &self.constant_pool {
			entry.write(out);
		}
		out.u2(self.access_flags);
		out.u2(self.this_class);
		out.u2(self.super_class);
		out.len_u2(self.interfaces.len());
		for interface in &self.interfaces {
			out.u2(*interface);
		}
		out.len_u2(self.fields.len());
		for field in &self.fields {
			field.write(out);
		}
		out.len_u2(self.methods.len());
		for method in &self.methods {
			method.write(out);
		}
		write_attributes(&self.attributes, out);
	}
}

pub mod flags {
	pub const ACC_PUBLIC: u16       = 0x0001; // class, field, method, inner class
	pub const ACC_PRIVATE: u16      = 0x0002; // field, method, inner class
	pub const ACC_STATIC: u16       = 0x0008; // field, method, inner class
	pub const ACC_FINAL: u16        = 0x0010; // class, field, method, inner class, parameter
	pub const ACC_SUPER: u16        = 0x0020; // class
	pub const ACC_NATIVE: u16       = 0x0100; // method
	pub const ACC_INTERFACE: u16    = 0x0200; // class, inner class
	pub const ACC_ABSTRACT: u16     = 0x0400; // class, method, inner class
	pub const ACC_SYNTHETIC: u16    = 0x1000; // class, field, method, inner class, parameter, module, module requires, module exports, module opens
	pub const ACC_ANNOTATION: u16   = 0x2000; // class, inner class
	pub const ACC_ENUM: u16         = 0x4000; // class, field, inner class
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CpInfo {
	Class { name_index: u16 },
	Fieldref { class_index: u16, name_and_type_index: u16 },
	Methodref { class_index: u16, name_and_type_index: u16 },
	InterfaceMethodref { class_index: u16, name_and_type_index: u16 },
	String { string_index: u16 },
	Integer { bytes: u32 },
	Float { bytes: u32 },
	/// Takes up two constant pool slots.
	Long { high_bytes: u32, low_bytes: u32 },
	/// Takes up two constant pool slots.
	Double { high_bytes: u32, low_bytes: u32 },
	NameAndType { name_index: u16, descriptor_index: u16 },
	Utf8 { bytes: Vec<u8> },
	MethodHandle { reference_kind: u8, reference_index: u16 },
	MethodType { descriptor_index: u16 },
	InvokeDynamic { bootstrap_method_attr_index: u16, name_and_type_index: u16 },
}

impl CpInfo {
	fn slots(&self) -> usize {
		match self {
			CpInfo::Long { .. } | CpInfo::Double { .. } => 2,
			_ => 1,
		}
	}

	fn write(&self, out: &mut Vec<u8>) {
		match self {
			CpInfo::Class { name_index } => {
				out.u1(7);
				out.u2(*name_index);
			},
			CpInfo::Fieldref { class_index, name_and_type_index } => {
				out.u1(9);
				out.u2(*class_index);
				out.u2(*name_and_type_index);
			},
			CpInfo::Methodref { class_index, name_and_type_index } => {
				out.u1(10);
				out.u2(*class_index);
				out.u2(*name_and_type_index);
			},
			CpInfo::InterfaceMethodref { class_index, name_and_type_index } => {
				out.u1(11);
				out.u2(*class_index);
				out.u2(*name_and_type_index);
			},
			CpInfo::String { string_index } => {
				out.u1(8);
				out.u2(*string_index);
			},
			CpInfo::Integer { bytes } => {
				out.u1(3);
				out.u4(*bytes);
			},
			CpInfo::Float { bytes } => {
				out.u1(4);
				out.u4(*bytes);
			},
			CpInfo::Long { high_bytes, low_bytes } => {
				out.u1(5);
				out.u4(*high_bytes);
				out.u4(*low_bytes);
			},
			CpInfo::Double { high_bytes, low_bytes } => {
				out.u1(6);
				out.u4(*high_bytes);
				out.u4(*low_bytes);
			},
			CpInfo::NameAndType { name_index, descriptor_index } => {
				out.u1(12);
				out.u2(*name_index);
				out.u2(*descriptor_index);
			},
			CpInfo::Utf8 { bytes } => {
				out.u1(1);
				out.len_u2(bytes.len());
				out.extend_from_slice(bytes);
			},
			CpInfo::MethodHandle { reference_kind, reference_index } => {
				out.u1(15);
				out.u1(*reference_kind);
				out.u2(*reference_index);
			},
			CpInfo::MethodType { descriptor_index } => {
				out.u1(16);
				out.u2(*descriptor_index);
			},
			CpInfo::InvokeDynamic { bootstrap_method_attr_index, name_and_type_index } => {
				out.u1(18);
				out.u2(*bootstrap_method_attr_index);
				out.u2(*name_and_type_index);
			},
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldInfo {
	pub access_flags: u16,
	pub name_index: u16,
	pub descriptor_index: u16,
	pub attributes: Vec<AttributeInfo>,
}

impl FieldInfo {
	fn write(&self, out: &mut Vec<u8>) {
		out.u2(self.access_flags);
		out.u2(self.name_index);
		out.u2(self.descriptor_index);
		write_attributes(&self.attributes, out);
	}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodInfo {
	pub access_flags: u16,
	pub name_index: u16,
	pub descriptor_index: u16,
	pub attributes: Vec<AttributeInfo>,
}

impl MethodInfo {
	fn write(&self, out: &mut Vec<u8>) {
		out.u2(self.access_flags);
		out.u2(self.name_index);
		out.u2(self.descriptor_index);
		write_attributes(&self.attributes, out);
	}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttributeInfo {
	ConstantValue {
		attribute_name_index: u16,
		constantvalue_index: u16,
	},
	Code {
		attribute_name_index: u16,
		max_stack: u16,
		max_locals: u16,
		code: Vec<u8>,
		exception_table: Vec<ExceptionTableEntry>,
		attributes: Vec<AttributeInfo>,
	},
	SourceFile {
		attribute_name_index: u16,
		sourcefile_index: u16,
	},
	/// Any attribute, written as its name index, the length of `info` and `info`.
	Other {
		attribute_name_index: u16,
		info: Vec<u8>,
	},
}

fn write_attributes(attributes: &[AttributeInfo], out: &mut Vec<u8>) {
	out.len_u2(attributes.len());
	for attribute in attributes {
		attribute.write(out);
	}
}

impl AttributeInfo {
	fn write(&self, out: &mut Vec<u8>) {
		let (attribute_name_index, info) = match self {
			AttributeInfo::ConstantValue { attribute_name_index, constantvalue_index } => {
				(*attribute_name_index, constantvalue_index.to_be_bytes().to_vec())
			},
			AttributeInfo::Code { attribute_name_index, max_stack, max_locals, code, exception_table, attributes } => {
				let mut info = Vec::new();
				info.u2(*max_stack);
				info.u2(*max_locals);
				info.u4(code.len() as u32);
				info.extend_from_slice(code);
				info.len_u2(exception_table.len());
				for entry in exception_table {
					info.u2(entry.start_pc);
					info.u2(entry.end_pc);
					info.u2(entry.handler_pc);
					info.u2(entry.catch_type);
				}
				write_attributes(attributes, &mut info);
				(*attribute_name_index, info)
			},
			AttributeInfo::SourceFile { attribute_name_index, sourcefile_index } => {
				(*attribute_name_index, sourcefile_index.to_be_bytes().to_vec())
			},
			AttributeInfo::Other { attribute_name_index, info } => (*attribute_name_index, info.clone()),
		};
		out.u2(attribute_name_index);
		out.u4(info.len() as u32);
		out.extend_from_slice(&info);
	}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExceptionTableEntry {
	pub start_pc: u16,
	pub end_pc: u16,
	pub handler_pc: u16,
	pub catch_type: u16,
}

#[allow(non_upper_case_globals)]
pub mod insn {
	pub const nop: u8 = 0x00;
	pub const aconst_null: u8 = 0x01;
	pub const iconst_0: u8 = 0x03;
	pub const iconst_1: u8 = 0x04;
	pub const ldc: u8 = 0x12;
	pub const iload_0: u8 = 0x1a;
	pub const aload_0: u8 = 0x2a;
	pub const astore_1: u8 = 0x4c;
	pub const iadd: u8 = 0x60;
	pub const ireturn: u8 = 0xac;
	pub const areturn: u8 = 0xb0;
	pub const r#return: u8 = 0xb1;
	pub const getstatic: u8 = 0xb2;
	pub const invokevirtual: u8 = 0xb6;
	pub const invokespecial: u8 = 0xb7;
	pub const invokestatic: u8 = 0xb8;
	pub const athrow: u8 = 0xbf;
}
