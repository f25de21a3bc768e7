use pretty_assertions::assert_eq;
use anyhow::{anyhow, Result};
use classlens::{inspect, read_layout, ClassModel, DecodeError, Section};
use classlens::pool::{EntryKind, PoolError};
use classlens::signature::DescriptorError;
use raw_class_file::{flags, AttributeInfo, ClassFile, CpInfo, MethodInfo};

fn utf8(s: &str) -> CpInfo {
	CpInfo::Utf8 { bytes: s.as_bytes().to_vec() }
}

fn class(constant_pool: Vec<CpInfo>, this_class: u16, methods: Vec<MethodInfo>) -> ClassFile {
	ClassFile {
		minor_version: 0,
		major_version: 52,
		constant_pool,
		access_flags: flags::ACC_SUPER,
		this_class,
		super_class: 0,
		interfaces: vec![],
		fields: vec![],
		methods,
		attributes: vec![],
	}
}

/// `Hi` as the only string and class name. The `H` is at offset 13.
fn hi() -> ClassFile {
	class(vec![utf8("Hi"), CpInfo::Class { name_index: 1 }], 2, vec![])
}

/// A class with one method `m()V`, whose `Code` attribute has the given body.
fn with_code_body(body: Vec<u8>) -> ClassFile {
	class(
		vec![
			/* 1 */ utf8("A"),
			/* 2 */ CpInfo::Class { name_index: 1 },
			/* 3 */ utf8("m"),
			/* 4 */ utf8("()V"),
			/* 5 */ utf8("Code"),
		],
		2,
		vec![
			MethodInfo {
				access_flags: 0,
				name_index: 3,
				descriptor_index: 4,
				attributes: vec![AttributeInfo::Other { attribute_name_index: 5, info: body }],
			},
		],
	)
}

fn labels(section: &Section) -> Vec<&str> {
	section.children.iter().map(|child| child.label.as_str()).collect()
}

fn find<'a>(section: &'a Section, label: &str) -> Option<&'a Section> {
	if section.label.starts_with(label) {
		return Some(section);
	}
	section.children.iter().find_map(|child| find(child, label))
}

fn root(sections: &[Section]) -> Result<&Section> {
	assert_eq!(sections.len(), 1);
	sections.first().ok_or_else(|| anyhow!("no root section"))
}

fn check_contained(section: &Section) {
	for child in &section.children {
		assert!(section.start_offset <= child.start_offset && child.end_offset <= section.end_offset, "{child:?}");
		assert!(child.start_offset <= child.end_offset, "{child:?}");
		check_contained(child);
	}
}

#[test]
fn wrong_magic() {
	let bytes = [0xca, 0xfe, 0xba, 0xbf, 0, 0, 0, 52];

	assert_eq!(read_layout(&bytes).err(), Some(DecodeError::WrongMagic { found: vec![0xca, 0xfe, 0xba, 0xbf] }));
	assert_eq!(ClassModel::read(&bytes).err(), Some(DecodeError::WrongMagic { found: vec![0xca, 0xfe, 0xba, 0xbf] }));

	let inspection = inspect(&bytes);
	assert_eq!(inspection.sections, vec![]);
	assert_eq!(inspection.hex.len(), 8);
	assert!(inspection.error.is_some());
}

#[test]
fn shorter_than_magic() {
	assert_eq!(read_layout(&[0xca, 0xfe]).err(), Some(DecodeError::WrongMagic { found: vec![0xca, 0xfe] }));
	assert_eq!(read_layout(&[]).err(), Some(DecodeError::WrongMagic { found: vec![] }));
	assert_eq!(inspect(&[]).sections, vec![]);
}

#[test]
fn short_version() -> Result<()> {
	let bytes = [0xca, 0xfe, 0xba, 0xbe, 0, 0, 0];
	let inspection = inspect(&bytes);

	let root = root(&inspection.sections)?;
	assert_eq!((root.start_offset, root.end_offset), (0, 7));
	assert_eq!(root.children.len(), 2);
	assert_eq!(root.children[0].label, "magic number 0xcafebabe");
	assert_eq!((root.children[0].start_offset, root.children[0].end_offset), (0, 4));
	assert!(root.children[1].label.starts_with("decoding stopped"));
	assert_eq!((root.children[1].start_offset, root.children[1].end_offset), (4, 7));
	assert!(find(root, "version").is_none());

	assert_eq!(ClassModel::read(&bytes).err(), Some(DecodeError::Truncated { offset: 4 }));
	Ok(())
}

#[test]
fn truncated_utf8() -> Result<()> {
	let bytes = hi().to_bytes();
	let bytes = &bytes[..14];

	let layout = read_layout(bytes)?;
	assert_eq!(layout.failure(), Some(&DecodeError::Truncated { offset: 13 }));
	assert_eq!(layout.pool().get_utf8(1), Err(PoolError::OutOfBounds { index: 1, len: 1 }));
	assert_eq!(layout.model().name(), Err(PoolError::Absent));

	let sections = layout.sections();
	let root = root(&sections)?;
	check_contained(root);
	assert_eq!((root.start_offset, root.end_offset), (0, 14));

	let pool = find(root, "constant pool with").ok_or_else(|| anyhow!("no pool"))?;
	assert_eq!((pool.start_offset, pool.end_offset), (8, 13));
	let entry = find(root, "[1] UTF-8 string").ok_or_else(|| anyhow!("no entry"))?;
	assert_eq!((entry.start_offset, entry.end_offset), (10, 13));
	// no text was read, so there's no section for it
	assert_eq!(labels(entry), vec!["tag: 1", "length: 2"]);

	let stop = root.children.last().ok_or_else(|| anyhow!("no children"))?;
	assert!(stop.label.starts_with("decoding stopped: unexpected end of data"));
	assert_eq!((stop.start_offset, stop.end_offset), (13, 14));
	Ok(())
}

#[test]
fn unknown_pool_tag() -> Result<()> {
	let mut bytes = vec![0xca, 0xfe, 0xba, 0xbe, 0, 0, 0, 52, 0, 3];
	bytes.extend_from_slice(&[1, 0, 1, b'A']);
	bytes.extend_from_slice(&[2, 0, 0, 0, 0]);

	let layout = read_layout(&bytes)?;
	assert_eq!(layout.failure(), Some(&DecodeError::MalformedConstantPool { index: 2, tag: 2, offset: 14 }));
	assert_eq!(layout.pool().get_utf8(1), Ok("A"));
	assert_eq!(layout.pool().declared_count(), 3);
	assert!(!layout.pool().is_complete());

	let sections = layout.sections();
	let root = root(&sections)?;
	check_contained(root);
	let pool = find(root, "constant pool with").ok_or_else(|| anyhow!("no pool"))?;
	assert_eq!(pool.label, "constant pool with 1 items");
	assert_eq!((pool.start_offset, pool.end_offset), (8, 14));

	let stop = root.children.last().ok_or_else(|| anyhow!("no children"))?;
	assert_eq!(stop.label, "decoding stopped: malformed constant pool: entry 2 at offset 14 has unknown tag 2");
	assert_eq!((stop.start_offset, stop.end_offset), (14, bytes.len()));
	Ok(())
}

#[test]
fn reference_into_upper_half_of_long() -> Result<()> {
	let bytes = class(
		vec![
			/* 1 */ CpInfo::Long { high_bytes: 0, low_bytes: 5 },
			/* 3 */ CpInfo::Class { name_index: 2 },
		],
		3,
		vec![],
	).to_bytes();

	let model = ClassModel::read(&bytes)?;
	assert_eq!(model.pool().get_long(1), Ok(5));
	assert_eq!(model.name(), Err(PoolError::UnusableSlot { index: 2, wide: EntryKind::Long }));
	Ok(())
}

#[test]
fn double_in_last_slot() -> Result<()> {
	let mut bytes = class(
		vec![
			/* 1 */ utf8("A"),
			/* 2 */ CpInfo::Class { name_index: 1 },
			/* 3 */ CpInfo::Double { high_bytes: 0, low_bytes: 0 },
		],
		2,
		vec![],
	).to_bytes();
	// declare one slot less, so the double's upper half is past the end
	bytes[9] = 4;

	let model = ClassModel::read(&bytes)?;
	assert_eq!(model.name(), Ok("A"));
	assert_eq!(model.pool().get_double(3), Ok(0.0));
	assert_eq!(model.pool().get(4), Err(PoolError::OutOfBounds { index: 4, len: 4 }));
	Ok(())
}

#[test]
fn wrong_kind_reference() -> Result<()> {
	let bytes = class(vec![utf8("A"), CpInfo::Class { name_index: 1 }], 1, vec![]).to_bytes();

	let model = ClassModel::read(&bytes)?;
	assert_eq!(
		model.name(),
		Err(PoolError::DanglingCrossReference { index: 1, expected: EntryKind::Class, found: EntryKind::Utf8 })
	);
	Ok(())
}

#[test]
fn code_over_runs_its_length() -> Result<()> {
	// max stack, max locals, code length of 10, but just one byte of code
	let bytes = with_code_body(vec![0, 1, 0, 1, 0, 0, 0, 10, 0xb1]).to_bytes();

	let layout = read_layout(&bytes)?;
	assert!(layout.is_complete());

	let sections = layout.sections();
	let root = root(&sections)?;
	check_contained(root);
	assert_eq!(root.end_offset, bytes.len());
	let code = find(root, "code").ok_or_else(|| anyhow!("no code"))?;
	assert_eq!(labels(code), vec!["max stack: 1", "max locals: 1", "code length: 10", "trailing bytes, 1 bytes"]);

	// the class attributes after the method are still found
	assert_eq!(root.children.last().map(|s| s.label.as_str()), Some("attributes"));

	let model = layout.model();
	assert_eq!(model.methods().len(), 1);
	assert_eq!(model.methods()[0].code, None);
	Ok(())
}

#[test]
fn exception_table_over_runs_code_length() -> Result<()> {
	let body = vec![
		0, 1, 0, 1, 0, 0, 0, 1, 0xb1, // max stack, max locals, code
		0, 2, // two handlers announced
		0, 0, 0, 1, 0, 1, 0, 0, // but only one fits
	];
	let bytes = with_code_body(body).to_bytes();

	let layout = read_layout(&bytes)?;
	assert!(layout.is_complete());

	let sections = layout.sections();
	let root = root(&sections)?;
	check_contained(root);
	let table = find(root, "exception table").ok_or_else(|| anyhow!("no exception table"))?;
	assert_eq!(labels(table), vec!["exception table length: 2", "exception handler"]);

	// the method is there, but without code, as its handler table is incomplete
	let model = layout.model();
	assert_eq!(model.methods().len(), 1);
	assert_eq!(model.methods()[0].code, None);
	Ok(())
}

#[test]
fn code_under_runs_its_length() -> Result<()> {
	let body = vec![
		0, 1, 0, 1, 0, 0, 0, 1, 0xb1, // max stack, max locals, code
		0, 0, // exception table
		0, 0, // attributes
		0xde, 0xad,
	];
	let bytes = with_code_body(body).to_bytes();

	let layout = read_layout(&bytes)?;
	assert!(layout.is_complete());

	let sections = layout.sections();
	let root = root(&sections)?;
	let code = find(root, "code").ok_or_else(|| anyhow!("no code"))?;
	assert_eq!(
		labels(code),
		vec![
			"max stack: 1", "max locals: 1", "code length: 1", "instructions, 1 bytes",
			"exception table", "attributes", "trailing bytes, 2 bytes",
		]
	);

	let model = layout.model();
	let code = model.methods()[0].code.as_ref().ok_or_else(|| anyhow!("no code"))?;
	assert_eq!(code.instructions, vec![0xb1]);
	assert_eq!(code.exception_handlers, vec![]);
	Ok(())
}

#[test]
fn attribute_longer_than_data() -> Result<()> {
	let mut file = hi();
	file.constant_pool.push(utf8("Custom"));
	file.attributes.push(AttributeInfo::Other { attribute_name_index: 3, info: vec![1, 2, 3, 4] });
	let bytes = file.to_bytes();
	let bytes = &bytes[..bytes.len() - 2];

	let layout = read_layout(bytes)?;
	let Some(DecodeError::Truncated { offset }) = layout.failure() else {
		return Err(anyhow!("expected a truncation, got {:?}", layout.failure()));
	};
	assert_eq!(*offset, bytes.len() - 2);

	let sections = layout.sections();
	let root = root(&sections)?;
	check_contained(root);
	let attribute = find(root, "attribute Custom").ok_or_else(|| anyhow!("no attribute"))?;
	assert_eq!(labels(attribute), vec!["attribute name index: 3 (\"Custom\")", "attribute length: 4"]);
	Ok(())
}

#[test]
fn bad_descriptor_stays_with_its_method() -> Result<()> {
	let bytes = class(
		vec![
			/* 1 */ utf8("A"),
			/* 2 */ CpInfo::Class { name_index: 1 },
			/* 3 */ utf8("bad"),
			/* 4 */ utf8("(L"),
			/* 5 */ utf8("good"),
			/* 6 */ utf8("(JD)I"),
		],
		2,
		vec![
			MethodInfo { access_flags: 0, name_index: 3, descriptor_index: 4, attributes: vec![] },
			MethodInfo { access_flags: flags::ACC_STATIC, name_index: 5, descriptor_index: 6, attributes: vec![] },
			MethodInfo { access_flags: 0, name_index: 5, descriptor_index: 2, attributes: vec![] },
		],
	).to_bytes();

	let model = ClassModel::read(&bytes)?;
	assert_eq!(
		model.methods()[0].signature,
		Err(DescriptorError::UnterminatedReference { descriptor: "(L".to_owned(), position: 1 })
	);
	assert_eq!(model.methods()[1].arg_count(), Some(2));
	assert_eq!(
		model.methods()[2].signature,
		Err(DescriptorError::Unresolvable(
			PoolError::DanglingCrossReference { index: 2, expected: EntryKind::Utf8, found: EntryKind::Class }
		))
	);
	Ok(())
}
