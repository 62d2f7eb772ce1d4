//! The BitVector crate provides an immutable, fixed-width sequence of bits,
//! with two's-complement conversion to and from integers, bitwise boolean
//! operations, and ripple-carry addition.
//!
//! ```
//! use bitvector::BitVector;
//!
//! let a = BitVector::from_unsigned(11_u8).unwrap();
//! let b = BitVector::from_unsigned(5_u8).unwrap().zero_extend_to_match(&a).unwrap();
//! let sum = a.add(&b).unwrap();
//! assert_eq!(sum.to_string(), "10000");
//! assert_eq!(sum.to_number().unwrap(), 16);
//!
//! assert_eq!(BitVector::from_signed(-5).to_string(), "1011");
//! ```



//		Global configuration

//	Customisations of the standard linting configuration
#![allow(clippy::items_after_test_module, reason = "Not needed with separated tests")]

//	Lints specifically disabled for unit tests
#![cfg_attr(test, allow(
	non_snake_case,
	clippy::cast_lossless,
	clippy::cast_possible_truncation,
	clippy::cognitive_complexity,
	clippy::default_numeric_fallback,
	clippy::expect_used,
	clippy::indexing_slicing,
	clippy::missing_assert_message,
	clippy::missing_panics_doc,
	clippy::panic,
	clippy::unwrap_in_result,
	clippy::unwrap_used,
	reason = "Not useful in unit tests"
))]



//		Modules

mod bit_vector;
mod errors;



//		Packages

pub use bit_vector::BitVector;
pub use errors::BitVectorError;
