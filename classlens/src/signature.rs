//! Turning method descriptors into the kinds of their parameters and return value.
use std::fmt::{Display, Formatter};
use crate::pool::PoolError;

/// The kind of a parameter or return value, with all reference and array types collapsed into one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeMarker {
	Byte,
	Char,
	Double,
	Float,
	Int,
	Long,
	Short,
	Boolean,
	Void,
	Reference,
}

impl Display for TypeMarker {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		f.write_str(match self {
			TypeMarker::Byte => "byte",
			TypeMarker::Char => "char",
			TypeMarker::Double => "double",
			TypeMarker::Float => "float",
			TypeMarker::Int => "int",
			TypeMarker::Long => "long",
			TypeMarker::Short => "short",
			TypeMarker::Boolean => "boolean",
			TypeMarker::Void => "void",
			TypeMarker::Reference => "reference",
		})
	}
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DescriptorError {
	#[error("unexpected char {character:?} at {position} in descriptor {descriptor:?}")]
	MalformedDescriptor { descriptor: String, character: char, position: usize },
	#[error("class name starting at {position} in descriptor {descriptor:?} isn't terminated by `;`")]
	UnterminatedReference { descriptor: String, position: usize },
	#[error("descriptor can't be resolved: {0}")]
	Unresolvable(#[from] PoolError),
}

/// Parses a method descriptor like `(I[Ljava/lang/String;)V` into markers, here `[int, reference, void]`.
///
/// Array dimensions and the parentheses don't produce a marker, so `[I` gives [`TypeMarker::Int`]. The last marker is
/// the one of the return type.
pub fn parse_signature(descriptor: &str) -> Result<Vec<TypeMarker>, DescriptorError> {
	let mut markers = Vec::new();

	let mut chars = descriptor.char_indices();
	while let Some((position, char)) = chars.next() {
		let marker = match char {
			'(' | ')' | '[' => continue,
			'B' => TypeMarker::Byte,
			'C' => TypeMarker::Char,
			'D' => TypeMarker::Double,
			'F' => TypeMarker::Float,
			'I' => TypeMarker::Int,
			'J' => TypeMarker::Long,
			'S' => TypeMarker::Short,
			'Z' => TypeMarker::Boolean,
			'V' => TypeMarker::Void,
			'L' => {
				// we don't care about the class name
				if !chars.by_ref().any(|(_, char)| char == ';') {
					return Err(DescriptorError::UnterminatedReference { descriptor: descriptor.to_owned(), position });
				}
				TypeMarker::Reference
			},
			character => {
				return Err(DescriptorError::MalformedDescriptor { descriptor: descriptor.to_owned(), character, position });
			},
		};
		markers.push(marker);
	}

	Ok(markers)
}
