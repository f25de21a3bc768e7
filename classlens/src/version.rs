use std::cmp::Ordering;
use std::fmt::{Display, Formatter};

/// Represents a class file version.
///
/// Take a look at [the list of class file versions](https://docs.oracle.com/javase/specs/jvms/se21/html/jvms-4.html#jvms-4.1-200-B.2).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Version {
	pub major: u16,
	pub minor: u16,
}

impl Version {
	pub const V1_1: Version = Version::new(45, 3);
	pub const V1_8: Version = Version::new(52, 0);
	pub const V11: Version = Version::new(55, 0);
	pub const V17: Version = Version::new(61, 0);
	pub const V21: Version = Version::new(65, 0);

	pub const fn new(major: u16, minor: u16) -> Version {
		Version { major, minor }
	}

	/// The Java release that introduced this major version, like `Java 8` or `Java 21`.
	///
	/// Gives [`None`] for major versions from before 1.1 or for ones we don't know about yet.
	pub fn release(self) -> Option<String> {
		match self.major {
			45 => Some("Java 1.1".to_owned()),
			46..=48 => Some(format!("Java 1.{}", self.major - 44)),
			49..=70 => Some(format!("Java {}", self.major - 44)),
			_ => None,
		}
	}
}

impl PartialOrd for Version {
	fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
		Some(self.cmp(other))
	}
}

impl Ord for Version {
	fn cmp(&self, other: &Self) -> Ordering {
		self.major.cmp(&other.major)
			.then_with(|| self.minor.cmp(&other.minor))
	}
}

impl Display for Version {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}.{}", self.major, self.minor)
	}
}
