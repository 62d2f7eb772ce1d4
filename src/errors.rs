//! Contains error types used throughout the library.



//		Packages

use core::num::TryFromIntError;
use thiserror::Error as ThisError;



//		Enums

//		BitVectorError
/// Represents all possible errors that can occur when building, converting,
/// or combining [`BitVector`](crate::BitVector)s.
#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
#[non_exhaustive]
pub enum BitVectorError {
	/// The incoming value is empty, e.g. an empty string or bit sequence. A
	/// bit vector always has a width of at least one bit.
	#[error("Empty value")]
	EmptyValue,

	/// The incoming byte is not a valid bit, i.e. neither `0` nor `1`.
	#[error("Invalid bit: {0}")]
	InvalidBit(u8),

	/// The incoming character is not a valid binary digit.
	#[error("Invalid digit: {0}")]
	InvalidDigit(char),

	/// The target width of a zero-extension is not strictly greater than the
	/// current width.
	#[error("Invalid width: cannot zero-extend {current} bits to {target} bits")]
	InvalidWidth {
		/// The width of the bit vector being extended.
		current: usize,
		/// The requested width.
		target:  usize,
	},

	/// The value is not a valid integer for the destination type.
	#[error("Invalid integer for destination type: {0}")]
	TryFromIntError(#[from] TryFromIntError),

	/// The incoming value is negative, which is not allowed by the destination
	/// type.
	#[error("Value is negative")]
	ValueIsNegative,

	/// The value is too large to be converted to the destination type.
	#[error("Value too large")]
	ValueTooLarge,

	/// The operands of a binary operation have different widths.
	#[error("Width mismatch: {left} bits vs {right} bits")]
	WidthMismatch {
		/// The width of the left-hand operand.
		left:  usize,
		/// The width of the right-hand operand.
		right: usize,
	},
}
