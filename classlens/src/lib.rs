//! Decoding of java class files into two views of the same bytes.
//!
//! The [symbol view](model::ClassModel) gives the constant pool, access flags, fields, methods and their code,
//! with checked resolution of constant pool indices. The [byte view](provenance::Section) tells for every decoded
//! value which bytes it came from, as a tree of labeled ranges.
//!
//! Both are built from the one decode pass in [`layout`]:
//! ```
//! # use anyhow::Result;
//! # fn main() -> Result<()> {
//! # let bytes = raw_class_file::ClassFile {
//! #     minor_version: 0, major_version: 52,
//! #     constant_pool: vec![
//! #         raw_class_file::CpInfo::Utf8 { bytes: b"org/example/Main".to_vec() },
//! #         raw_class_file::CpInfo::Class { name_index: 1 },
//! #     ],
//! #     access_flags: 0x0021, this_class: 2, super_class: 0,
//! #     interfaces: vec![], fields: vec![], methods: vec![], attributes: vec![],
//! # }.to_bytes();
//! let layout = classlens::layout::read_layout(&bytes)?;
//!
//! let model = layout.model();
//! assert_eq!(model.name()?, "org/example/Main");
//!
//! let sections = layout.sections();
//! assert_eq!(sections[0].label, "class file");
//! assert_eq!(sections[0].end_offset, bytes.len());
//! # Ok(())
//! # }
//! ```

pub mod access;
pub mod cursor;
pub mod hex_tokens;
pub mod layout;
pub mod model;
pub mod pool;
pub mod provenance;
pub mod signature;
pub mod version;

pub use layout::{read_layout, ClassLayout, DecodeError};
pub use model::ClassModel;
pub use provenance::{inspect, Inspection, Section};
