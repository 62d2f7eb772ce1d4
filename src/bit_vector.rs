//! Fixed-width bit vector type.



//		Modules

#[cfg(test)]
#[path = "tests/bit_vector.rs"]
mod tests;



//		Packages

use crate::errors::BitVectorError;
use bytes::{BufMut, BytesMut};
use core::{
	error::Error,
	fmt::{Binary, Debug, Display, Formatter, self},
	ops::Not,
	str::FromStr,
};
use serde::{
	Deserialize,
	Deserializer,
	Serialize,
	Serializer,
	de::{Error as SerdeError, SeqAccess, Unexpected, Visitor},
};
use serde_json::Error as JsonError;
use std::io::{Error as IoError, ErrorKind as IoErrorKind};
use tokio_postgres::types::{FromSql, IsNull, ToSql, Type, to_sql_checked};



//		Structs

//		BitVector
/// An immutable, fixed-width sequence of bits.
///
/// Bits are stored most-significant first, so index `0` is the sign bit when
/// the value is interpreted as two's-complement. The width is fixed when the
/// vector is constructed and is always at least one bit. No operation mutates
/// a vector; every operation returns a new one.
///
/// # Arithmetic
///
/// Addition is a ripple-carry adder over two vectors of equal width, and the
/// result is always one bit wider than the operands, with the final carry-out
/// as the new most-significant bit. Nothing is ever wrapped or truncated, so
/// callers that need a fixed-width result must discard the extra bit
/// themselves.
///
/// # Width matching
///
/// Binary operations ([`and()`](Self::and()), [`or()`](Self::or()),
/// [`xor()`](Self::xor()), [`add()`](Self::add())) require both operands to
/// have the same width, and return [`BitVectorError::WidthMismatch`]
/// otherwise. Use [`zero_extend()`](Self::zero_extend()) or
/// [`zero_extend_to_match()`](Self::zero_extend_to_match()) to widen the
/// narrower operand first.
///
/// # Conversion
///
/// Values can be built from any unsigned or signed integer up to 128 bits,
/// and read back as [`u128`] (plain magnitude) or [`i128`]
/// (two's-complement). Vectors wider than 128 bits are supported, and convert
/// successfully as long as the value they hold fits the target type.
///
#[derive(Clone, Eq, Hash, PartialEq)]
pub struct BitVector(Vec<bool>);

//󰭅		BitVector
impl BitVector {
	//		Constructors

	//		new
	/// Creates a new [`BitVector`] from a sequence of bits, most-significant
	/// bit first.
	///
	/// # Parameters
	///
	/// * `bits` - The bits to wrap. The number of bits becomes the width.
	///
	/// # Errors
	///
	/// Returns [`BitVectorError::EmptyValue`] if no bits are supplied.
	///
	pub fn new(bits: Vec<bool>) -> Result<Self, BitVectorError> {
		if bits.is_empty() {
			return Err(BitVectorError::EmptyValue);
		}
		Ok(Self(bits))
	}

	//		from_signed
	/// Creates the minimal two's-complement representation of an integer.
	///
	/// The width is one more than the width of the unsigned magnitude, to
	/// leave room for the sign bit. Zero is represented as a single `0` bit.
	///
	/// Negative values are built by negating the magnitude: the magnitude is
	/// zero-extended by one bit, inverted, and has one added to it, after
	/// which the carry-out of the addition is dropped.
	///
	/// # Parameters
	///
	/// * `value` - The integer to represent.
	///
	pub fn from_signed<T: Into<i128>>(value: T) -> Self {
		let value = value.into();
		if value == 0 {
			return Self(vec![false]);
		}

		let extended = Self::from_u128(value.unsigned_abs()).with_leading_zeros(1);
		if value > 0 {
			return extended;
		}

		let one = Self::from_u128(1).with_leading_zeros(extended.width() - 1);
		(!extended).ripple_add(&one).without_leading_bit()
	}

	//		from_unsigned
	/// Creates the minimal-width unsigned representation of an integer.
	///
	/// The bits are produced by greedy subtraction of descending powers of
	/// two, starting from the highest power that fits. Zero is represented as a
	/// single `0` bit.
	///
	/// # Parameters
	///
	/// * `value` - The integer to represent. Any integer type that converts to
	///             [`u128`] is accepted.
	///
	/// # Errors
	///
	/// Returns [`BitVectorError::ValueIsNegative`] if the value is negative.
	///
	pub fn from_unsigned<T: TryInto<u128>>(value: T) -> Result<Self, BitVectorError> {
		value.try_into().map(Self::from_u128).map_err(|_| BitVectorError::ValueIsNegative)
	}

	//		Public methods

	//		add
	/// Adds two bit vectors of equal width.
	///
	/// The bits are added pairwise from the least-significant end, with the
	/// carry rippling towards the most-significant end. The result is one bit
	/// wider than the operands, holding the final carry-out as its
	/// most-significant bit, so the unsigned value of the result is always the
	/// exact sum of the unsigned values of the operands.
	///
	/// # Parameters
	///
	/// * `other` - The bit vector to add to `self`.
	///
	/// # Errors
	///
	/// Returns [`BitVectorError::WidthMismatch`] if the widths differ.
	///
	pub fn add(&self, other: &Self) -> Result<Self, BitVectorError> {
		self.check_width(other)?;
		Ok(self.ripple_add(other))
	}

	//		and
	/// Bitwise AND of two bit vectors of equal width.
	///
	/// # Errors
	///
	/// Returns [`BitVectorError::WidthMismatch`] if the widths differ.
	///
	pub fn and(&self, other: &Self) -> Result<Self, BitVectorError> {
		self.zip_with(other, |a, b| a & b)
	}

	//		as_slice
	/// Represents the bits as a slice, most-significant bit first.
	#[must_use]
	pub fn as_slice(&self) -> &[bool] {
		&self.0
	}

	//		bit
	/// Gets the value of a specific bit.
	///
	/// Returns [`None`] if the position is out of range.
	///
	/// # Parameters
	///
	/// * `pos` - The position of the bit to get, where `0` is the
	///           most-significant bit.
	///
	#[must_use]
	pub fn bit(&self, pos: usize) -> Option<bool> {
		self.0.get(pos).copied()
	}

	//		from_json
	/// Deserialises a JSON string into a bit vector.
	///
	/// Both a string of binary digits and an array of bits are accepted, e.g.
	/// `"1010"` or `[1, 0, 1, 0]`.
	///
	/// # Parameters
	///
	/// * `json` - The JSON string to deserialise.
	///
	/// # Errors
	///
	/// If the JSON string is invalid, or the bits inside the JSON are invalid,
	/// then an error will be returned.
	///
	pub fn from_json(json: &str) -> Result<Self, JsonError> {
		serde_json::from_str(json)
	}

	//		into_vec
	/// Consumes the bit vector and returns its bits, most-significant first.
	#[must_use]
	pub fn into_vec(self) -> Vec<bool> {
		self.0
	}

	//		is_negative
	/// Determines if the sign bit, i.e. the most-significant bit, is set.
	#[must_use]
	pub fn is_negative(&self) -> bool {
		self.0.first().copied().unwrap_or(false)
	}

	//		or
	/// Bitwise OR of two bit vectors of equal width.
	///
	/// # Errors
	///
	/// Returns [`BitVectorError::WidthMismatch`] if the widths differ.
	///
	pub fn or(&self, other: &Self) -> Result<Self, BitVectorError> {
		self.zip_with(other, |a, b| a | b)
	}

	//		parse
	/// Parses a string of binary digits into a bit vector.
	///
	/// This is a convenience wrapper around the [`FromStr`] implementation.
	///
	/// # Errors
	///
	/// See [`FromStr`](#impl-FromStr-for-BitVector).
	///
	pub fn parse(s: &str) -> Result<Self, BitVectorError> {
		s.parse()
	}

	//		to_json
	/// Serialises the bit vector to a JSON string of binary digits.
	///
	/// # Errors
	///
	/// If the value cannot be serialised for whatever reason, an error will be
	/// returned. In reality this should be infallible.
	///
	pub fn to_json(&self) -> Result<String, JsonError> {
		serde_json::to_string(self)
	}

	//		to_number
	/// Interprets the bits as an unsigned integer.
	///
	/// Each set bit at position `i` contributes `2^(width - 1 - i)`. Leading
	/// zeros beyond 128 bits are allowed.
	///
	/// # Errors
	///
	/// Returns [`BitVectorError::ValueTooLarge`] if the value does not fit in a
	/// [`u128`].
	///
	pub fn to_number(&self) -> Result<u128, BitVectorError> {
		let width = self.width();
		self.0.iter()
			.enumerate()
			.filter(|&(_, &bit)| bit)
			.try_fold(0_u128, |total, (pos, _)| {
				u32::try_from(width - 1 - pos)
					.ok()
					.filter(|&exponent| exponent < u128::BITS)
					.map(|exponent| total + (1_u128 << exponent))
					.ok_or(BitVectorError::ValueTooLarge)
			})
	}

	//		to_signed_number
	/// Interprets the bits as a two's-complement signed integer.
	///
	/// When the sign bit is clear this is the same as
	/// [`to_number()`](Self::to_number()). When it is set, the negation of
	/// [`from_signed()`](Self::from_signed()) is reversed: an all-ones vector
	/// is added (subtracting one), the result is inverted, the overflow bit is
	/// dropped, and the remaining magnitude is negated.
	///
	/// # Errors
	///
	/// Returns [`BitVectorError::ValueTooLarge`] if the value does not fit in
	/// an [`i128`].
	///
	pub fn to_signed_number(&self) -> Result<i128, BitVectorError> {
		if !self.is_negative() {
			return i128::try_from(self.to_number()?).map_err(|_| BitVectorError::ValueTooLarge);
		}

		let all_ones  = Self(vec![true; self.width()]);
		let magnitude = (!self.ripple_add(&all_ones)).without_leading_bit().to_number()?;
		0_i128.checked_sub_unsigned(magnitude).ok_or(BitVectorError::ValueTooLarge)
	}

	//		width
	/// The number of bits in the vector. This is always at least one.
	#[must_use]
	pub fn width(&self) -> usize {
		self.0.len()
	}

	//		xor
	/// Bitwise XOR of two bit vectors of equal width.
	///
	/// # Errors
	///
	/// Returns [`BitVectorError::WidthMismatch`] if the widths differ.
	///
	pub fn xor(&self, other: &Self) -> Result<Self, BitVectorError> {
		self.zip_with(other, |a, b| a ^ b)
	}

	//		zero_extend
	/// Widens the bit vector by prepending zero bits.
	///
	/// The unsigned value is unchanged. Extending to the current width is not
	/// a no-op, and is rejected in the same way as narrowing.
	///
	/// # Parameters
	///
	/// * `width` - The new width, which must be strictly greater than the
	///             current width.
	///
	/// # Errors
	///
	/// Returns [`BitVectorError::InvalidWidth`] if `width` is not greater than
	/// the current width.
	///
	pub fn zero_extend(&self, width: usize) -> Result<Self, BitVectorError> {
		if width <= self.width() {
			return Err(BitVectorError::InvalidWidth { current: self.width(), target: width });
		}
		Ok(self.with_leading_zeros(width - self.width()))
	}

	//		zero_extend_to_match
	/// Widens the bit vector to the width of another one.
	///
	/// # Errors
	///
	/// Returns [`BitVectorError::InvalidWidth`] if `other` is not wider than
	/// `self`.
	///
	pub fn zero_extend_to_match(&self, other: &Self) -> Result<Self, BitVectorError> {
		self.zero_extend(other.width())
	}

	//		Private methods

	//		check_width
	/// Ensures that two operands have the same width.
	fn check_width(&self, other: &Self) -> Result<(), BitVectorError> {
		if self.width() == other.width() {
			Ok(())
		} else {
			Err(BitVectorError::WidthMismatch { left: self.width(), right: other.width() })
		}
	}

	//		from_u128
	/// Greedy power-of-two decomposition of an unsigned integer.
	fn from_u128(value: u128) -> Self {
		if value == 0 {
			return Self(vec![false]);
		}

		let highest       = u128::BITS - 1 - value.leading_zeros();
		let mut remainder = value;
		Self((0..=highest).rev().map(|exponent| {
			let place = 1_u128 << exponent;
			if remainder >= place {
				remainder -= place;
				true
			} else {
				false
			}
		}).collect())
	}

	//		ripple_add
	/// Ripple-carry addition of two operands already known to be the same
	/// width. The result is one bit wider.
	fn ripple_add(&self, other: &Self) -> Self {
		let mut carry = false;
		let mut bits  = Vec::with_capacity(self.width() + 1);

		for (&a, &b) in self.0.iter().rev().zip(other.0.iter().rev()) {
			let sum  = a ^ b;
			let half = a & b;
			bits.push(sum ^ carry);
			carry    = half | (sum & carry);
		}
		bits.push(carry);
		bits.reverse();
		Self(bits)
	}

	//		with_leading_zeros
	fn with_leading_zeros(&self, count: usize) -> Self {
		let mut bits = vec![false; count];
		bits.extend_from_slice(&self.0);
		Self(bits)
	}

	//		without_leading_bit
	/// Drops the most-significant bit. Only called on results of
	/// [`ripple_add()`](Self::ripple_add()), which are at least two bits wide.
	fn without_leading_bit(mut self) -> Self {
		_ = self.0.remove(0);
		self
	}

	//		zip_with
	/// Applies a boolean operator to each pair of bits at matching positions.
	fn zip_with<F>(&self, other: &Self, op: F) -> Result<Self, BitVectorError>
	where
		F: Fn(bool, bool) -> bool,
	{
		self.check_width(other)?;
		Ok(Self(self.0.iter().zip(&other.0).map(|(&a, &b)| op(a, b)).collect()))
	}
}

//󰭅		Binary
impl Binary for BitVector {
	//		fmt
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		if f.alternate() {
			write!(f, "0b")?;
		}
		Display::fmt(self, f)
	}
}

//󰭅		Debug
impl Debug for BitVector {
	//		fmt
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		write!(f, "BitVector::<{}>({})", self.width(), self)
	}
}

//󰭅		Deserialize
impl<'de> Deserialize<'de> for BitVector {
	fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
	where
		D: Deserializer<'de>,
	{
		if deserializer.is_human_readable() {
			//	Accept both bit strings and arrays of bits
			deserializer.deserialize_any(BitVectorVisitor)
		} else {
			deserializer.deserialize_str(BitVectorVisitor)
		}
	}
}

//󰭅		Display
impl Display for BitVector {
	//		fmt
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		for &bit in &self.0 {
			write!(f, "{}", u8::from(bit))?;
		}
		Ok(())
	}
}

//󰭅		From: BitVector -> Vec<bool>
impl From<BitVector> for Vec<bool> {
	//		from
	fn from(v: BitVector) -> Self {
		v.0
	}
}

//󰭅		FromSql
impl<'a> FromSql<'a> for BitVector {
	//		from_sql
	fn from_sql(ty: &Type, raw: &'a [u8]) -> Result<Self, Box<dyn Error + Sync + Send>> {
		match ty {
			&Type::BIT | &Type::VARBIT => {},
			unknown                    => return Err(invalid_data(format!("Invalid type for BitVector: {unknown}"))),
		}

		//	Wire format: big-endian i32 bit count, then the bits packed MSB-first
		let (header, payload) = raw.split_first_chunk::<4>()
			.ok_or_else(|| invalid_data("Bit string header is truncated"))?
		;
		let count = i32::from_be_bytes(*header);
		let width = usize::try_from(count)
			.map_err(|_| invalid_data(format!("Invalid bit count: {count}")))?
		;
		if payload.len() != width.div_ceil(8) {
			return Err(invalid_data(format!(
				"Bit count {width} does not match payload of {} bytes",
				payload.len(),
			)));
		}

		let bits = payload.iter()
			.flat_map(|&byte| (0..8_u8).rev().map(move |shift| (byte >> shift) & 1 == 1))
			.take(width)
			.collect()
		;
		Self::new(bits).map_err(Into::into)
	}

	//		accepts
	fn accepts(ty: &Type) -> bool {
		matches!(*ty, Type::BIT | Type::VARBIT)
	}
}

//󰭅		FromStr
impl FromStr for BitVector {
	type Err = BitVectorError;

	//		from_str
	/// Parses a string of binary digits, most-significant bit first.
	///
	/// Surrounding whitespace is ignored, an optional `0b` prefix is accepted,
	/// and underscores may be used as separators.
	///
	/// # Errors
	///
	/// Returns [`BitVectorError::EmptyValue`] if there are no digits, and
	/// [`BitVectorError::InvalidDigit`] for any character other than `0`, `1`,
	/// or `_`.
	///
	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let trimmed = s.trim();
		let digits  = trimmed.strip_prefix("0b").or_else(|| trimmed.strip_prefix("0B")).unwrap_or(trimmed);

		let bits = digits.chars()
			.filter(|&c| c != '_')
			.map(|c| match c {
				'0' => Ok(false),
				'1' => Ok(true),
				_   => Err(BitVectorError::InvalidDigit(c)),
			})
			.collect::<Result<Vec<_>, _>>()?
		;
		Self::new(bits)
	}
}

//󰭅		Not
impl Not for BitVector {
	type Output = Self;

	//		not
	fn not(self) -> Self::Output {
		Self(self.0.into_iter().map(|bit| !bit).collect())
	}
}

//󰭅		Not: &BitVector
impl Not for &BitVector {
	type Output = BitVector;

	//		not
	fn not(self) -> Self::Output {
		BitVector(self.0.iter().map(|&bit| !bit).collect())
	}
}

//󰭅		Serialize
impl Serialize for BitVector {
	//		serialize
	fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: Serializer,
	{
		serializer.collect_str(self)
	}
}

//󰭅		ToSql
impl ToSql for BitVector {
	//		to_sql
	fn to_sql(&self, _ty: &Type, out: &mut BytesMut) -> Result<IsNull, Box<dyn Error + Sync + Send>> {
		let count = i32::try_from(self.width())?;
		out.reserve(4 + self.width().div_ceil(8));
		out.put_i32(count);

		//	Unused low bits of the final byte stay zero
		for chunk in self.0.chunks(8) {
			out.put_u8(chunk.iter().enumerate().fold(0_u8, |byte, (pos, &bit)| byte | (u8::from(bit) << (7 - pos))));
		}
		Ok(IsNull::No)
	}

	//		accepts
	fn accepts(ty: &Type) -> bool {
		matches!(*ty, Type::BIT | Type::VARBIT)
	}

	to_sql_checked!();
}

//󰭅		TryFrom: &[u8] -> BitVector
impl TryFrom<&[u8]> for BitVector {
	type Error = BitVectorError;

	//		try_from
	/// Builds a bit vector from bytes that are each either `0` or `1`.
	fn try_from(v: &[u8]) -> Result<Self, Self::Error> {
		v.iter()
			.map(|&byte| match byte {
				0     => Ok(false),
				1     => Ok(true),
				other => Err(BitVectorError::InvalidBit(other)),
			})
			.collect::<Result<Vec<_>, _>>()
			.and_then(Self::new)
	}
}

//󰭅		TryFrom: &str -> BitVector
impl TryFrom<&str> for BitVector {
	type Error = BitVectorError;

	//		try_from
	fn try_from(v: &str) -> Result<Self, Self::Error> {
		v.parse()
	}
}

//󰭅		TryFrom: Vec<bool> -> BitVector
impl TryFrom<Vec<bool>> for BitVector {
	type Error = BitVectorError;

	//		try_from
	fn try_from(v: Vec<bool>) -> Result<Self, Self::Error> {
		Self::new(v)
	}
}

//󰭅		TryFrom: &BitVector -> i32
impl TryFrom<&BitVector> for i32 {
	type Error = BitVectorError;

	//		try_from
	fn try_from(v: &BitVector) -> Result<Self, Self::Error> {
		Ok(Self::try_from(v.to_signed_number()?)?)
	}
}

//󰭅		TryFrom: &BitVector -> i64
impl TryFrom<&BitVector> for i64 {
	type Error = BitVectorError;

	//		try_from
	fn try_from(v: &BitVector) -> Result<Self, Self::Error> {
		Ok(Self::try_from(v.to_signed_number()?)?)
	}
}

//󰭅		TryFrom: &BitVector -> i128
impl TryFrom<&BitVector> for i128 {
	type Error = BitVectorError;

	//		try_from
	fn try_from(v: &BitVector) -> Result<Self, Self::Error> {
		v.to_signed_number()
	}
}

//󰭅		TryFrom: &BitVector -> u32
impl TryFrom<&BitVector> for u32 {
	type Error = BitVectorError;

	//		try_from
	fn try_from(v: &BitVector) -> Result<Self, Self::Error> {
		Ok(Self::try_from(v.to_number()?)?)
	}
}

//󰭅		TryFrom: &BitVector -> u64
impl TryFrom<&BitVector> for u64 {
	type Error = BitVectorError;

	//		try_from
	fn try_from(v: &BitVector) -> Result<Self, Self::Error> {
		Ok(Self::try_from(v.to_number()?)?)
	}
}

//󰭅		TryFrom: &BitVector -> u128
impl TryFrom<&BitVector> for u128 {
	type Error = BitVectorError;

	//		try_from
	fn try_from(v: &BitVector) -> Result<Self, Self::Error> {
		v.to_number()
	}
}



//		Visitors

//		BitVectorVisitor
/// Visitor accepting either a bit string or a sequence of bits.
struct BitVectorVisitor;

//󰭅		Visitor
impl<'de> Visitor<'de> for BitVectorVisitor {
	type Value = BitVector;

	//		expecting
	fn expecting(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
		formatter.write_str("a string of binary digits or a sequence of bits")
	}

	//		visit_seq
	fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
	where
		A: SeqAccess<'de>,
	{
		let mut bits = Vec::with_capacity(seq.size_hint().unwrap_or(0));
		while let Some(BitElement(bit)) = seq.next_element()? {
			bits.push(bit);
		}
		BitVector::new(bits).map_err(SerdeError::custom)
	}

	//		visit_str
	fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
	where
		E: SerdeError,
	{
		v.parse().map_err(E::custom)
	}
}

//		BitElement
/// A single element of a bit sequence, given as a boolean or as `0`/`1`.
struct BitElement(bool);

//󰭅		Deserialize
impl<'de> Deserialize<'de> for BitElement {
	fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
	where
		D: Deserializer<'de>,
	{
		deserializer.deserialize_any(BitElementVisitor)
	}
}

//		BitElementVisitor
struct BitElementVisitor;

//󰭅		Visitor
impl Visitor<'_> for BitElementVisitor {
	type Value = BitElement;

	//		expecting
	fn expecting(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
		formatter.write_str("a boolean, 0, or 1")
	}

	//		visit_bool
	fn visit_bool<E>(self, v: bool) -> Result<Self::Value, E>
	where
		E: SerdeError,
	{
		Ok(BitElement(v))
	}

	//		visit_i64
	fn visit_i64<E>(self, v: i64) -> Result<Self::Value, E>
	where
		E: SerdeError,
	{
		match v {
			0 => Ok(BitElement(false)),
			1 => Ok(BitElement(true)),
			_ => Err(E::invalid_value(Unexpected::Signed(v), &self)),
		}
	}

	//		visit_u64
	fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E>
	where
		E: SerdeError,
	{
		match v {
			0 => Ok(BitElement(false)),
			1 => Ok(BitElement(true)),
			_ => Err(E::invalid_value(Unexpected::Unsigned(v), &self)),
		}
	}
}



//		Functions

//		invalid_data
/// Wraps a message as an [`IoErrorKind::InvalidData`] error for the
/// PostgreSQL conversions.
fn invalid_data(message: impl Into<String>) -> Box<dyn Error + Sync + Send> {
	Box::new(IoError::new(IoErrorKind::InvalidData, message.into()))
}
