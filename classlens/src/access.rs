use std::fmt::{Debug, Formatter};

/// The `access_flags` item of a class, field or method.
///
/// The bit values are shared between the three, so one type is enough. We only name the bits that are meaningful on
/// a class, plus `static` and `native`, which the method helpers need.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct AccessFlags(u16);

impl AccessFlags {
	pub const PUBLIC: u16     = 0x0001;
	pub const STATIC: u16     = 0x0008;
	pub const FINAL: u16      = 0x0010;
	pub const SUPER: u16      = 0x0020;
	pub const NATIVE: u16     = 0x0100;
	pub const INTERFACE: u16  = 0x0200;
	pub const ABSTRACT: u16   = 0x0400;
	pub const SYNTHETIC: u16  = 0x1000;
	pub const ANNOTATION: u16 = 0x2000;
	pub const ENUM: u16       = 0x4000;

	/// Every named flag, ordered by bit value.
	pub const NAMED: [(u16, &'static str); 10] = [
		(AccessFlags::PUBLIC, "public"),
		(AccessFlags::STATIC, "static"),
		(AccessFlags::FINAL, "final"),
		(AccessFlags::SUPER, "super"),
		(AccessFlags::NATIVE, "native"),
		(AccessFlags::INTERFACE, "interface"),
		(AccessFlags::ABSTRACT, "abstract"),
		(AccessFlags::SYNTHETIC, "synthetic"),
		(AccessFlags::ANNOTATION, "annotation"),
		(AccessFlags::ENUM, "enum"),
	];

	pub fn bits(self) -> u16 {
		self.0
	}

	pub fn contains(self, mask: u16) -> bool {
		self.0 & mask != 0
	}

	pub fn name_of(mask: u16) -> Option<&'static str> {
		AccessFlags::NAMED.iter()
			.find(|(bit, _)| *bit == mask)
			.map(|(_, name)| *name)
	}

	pub fn is_public(self) -> bool { self.contains(AccessFlags::PUBLIC) }
	pub fn is_static(self) -> bool { self.contains(AccessFlags::STATIC) }
	pub fn is_final(self) -> bool { self.contains(AccessFlags::FINAL) }
	pub fn is_super(self) -> bool { self.contains(AccessFlags::SUPER) }
	pub fn is_native(self) -> bool { self.contains(AccessFlags::NATIVE) }
	pub fn is_interface(self) -> bool { self.contains(AccessFlags::INTERFACE) }
	pub fn is_abstract(self) -> bool { self.contains(AccessFlags::ABSTRACT) }
	pub fn is_synthetic(self) -> bool { self.contains(AccessFlags::SYNTHETIC) }
	pub fn is_annotation(self) -> bool { self.contains(AccessFlags::ANNOTATION) }
	pub fn is_enum(self) -> bool { self.contains(AccessFlags::ENUM) }
}

impl From<u16> for AccessFlags {
	fn from(access_flags: u16) -> Self {
		AccessFlags(access_flags)
	}
}

impl Debug for AccessFlags {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		write!(f, "AccessFlags({:#06x} ", self.0)?;
		for (mask, name) in AccessFlags::NAMED {
			if self.contains(mask) {
				write!(f, "{name} ")?;
			}
		}
		f.write_str(")")
	}
}
