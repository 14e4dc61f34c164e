//! Exact decimal numbers: arbitrary-size mantissa with a decimal scale

use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, Sub};
use rug::{Integer, ops::Pow};
use crate::errors::{ArithError, SyntaxError};

///exact decimal, value is `man / 10^scale`
#[derive(Clone, Debug)]
pub struct Number {
	man: Integer,
	scale: u32
}

#[inline(always)]
///10^n
fn ten_pow(n: u32) -> Integer {
	Integer::from(10).pow(n)
}

impl Number {
	pub fn zero() -> Self {
		Self {man: Integer::ZERO, scale: 0}
	}

	pub fn one() -> Self {
		Self {man: Integer::from(1), scale: 0}
	}

	///number of fractional decimal digits
	pub fn scale(&self) -> u32 {self.scale}

	pub fn is_zero(&self) -> bool {self.man == 0}

	pub fn is_negative(&self) -> bool {self.man < 0}

	///mantissa at another scale, truncating if the scale shrinks
	fn man_at(&self, scale: u32) -> Integer {
		match scale.cmp(&self.scale) {
			Ordering::Equal => self.man.clone(),
			Ordering::Greater => self.man.clone() * ten_pow(scale - self.scale),
			Ordering::Less => self.man.clone() / ten_pow(self.scale - scale),
		}
	}

	///drop fractional digits beyond `scale`, never extends
	fn truncated(self, scale: u32) -> Self {
		if scale >= self.scale {self}
		else {
			Self {man: self.man_at(scale), scale}
		}
	}

	///true if there is no fractional part, regardless of scale
	pub fn is_integer(&self) -> bool {
		self.scale == 0 || self.man.clone() % ten_pow(self.scale) == 0
	}

	///integer part, truncated toward zero
	pub fn to_integer(&self) -> Integer {
		self.man_at(0)
	}

	///exact conversion, None if fractional or out of range
	pub fn to_u32(&self) -> Option<u32> {
		if self.is_integer() {self.to_integer().to_u32()} else {None}
	}

	///exact conversion, None if fractional or out of range
	pub fn to_usize(&self) -> Option<usize> {
		if self.is_integer() {self.to_integer().to_usize()} else {None}
	}

	///exact conversion, None if fractional or out of range
	pub fn to_i64(&self) -> Option<i64> {
		if self.is_integer() {self.to_integer().to_i64()} else {None}
	}

	///count of decimal digits, at least the scale; 0 has none
	pub fn digits(&self) -> usize {
		if self.is_zero() {return 0;}
		let len = self.man.clone().abs().to_string().len();
		len.max(self.scale as usize)
	}

	///upper estimate of decimal digits in the mantissa, at least 1
	pub fn digit_bound(&self) -> u64 {
		let bits = u64::from(self.man.significant_bits()).max(1);
		(bits * 30103).div_ceil(100_000)
	}

	///product truncated to the larger of `k` and both operand scales
	pub fn mul(&self, rhs: &Self, k: u32) -> Self {
		let full = Self {
			man: self.man.clone() * &rhs.man,
			scale: self.scale.saturating_add(rhs.scale)
		};
		full.truncated(k.max(self.scale).max(rhs.scale))
	}

	///quotient truncated toward zero at scale `k`
	pub fn div(&self, rhs: &Self, k: u32) -> Result<Self, ArithError> {
		if rhs.is_zero() {return Err(ArithError::DivisionByZero);}
		let num = self.man.clone() * ten_pow(rhs.scale.saturating_add(k));
		let den = rhs.man.clone() * ten_pow(self.scale);
		Ok(Self {man: num / den, scale: k})
	}

	///quotient at scale `k` and the exact remainder left by it
	pub fn div_rem(&self, rhs: &Self, k: u32) -> Result<(Self, Self), ArithError> {
		let quot = self.div(rhs, k)?;
		let back = Self {
			man: rhs.man.clone() * &quot.man,
			scale: rhs.scale.saturating_add(k)
		};
		let rem = self - &back;
		Ok((quot, rem))
	}

	pub fn rem(&self, rhs: &Self, k: u32) -> Result<Self, ArithError> {
		Ok(self.div_rem(rhs, k)?.1)
	}

	///integer power; negative exponents divide at scale `k`
	pub fn pow(&self, exp: &Self, k: u32) -> Result<Self, ArithError> {
		let bad = || ArithError::InvalidExponent(exp.to_string());
		if !exp.is_integer() {return Err(bad());}
		let e = exp.to_integer();
		let mag = e.clone().abs().to_u32().ok_or_else(bad)?;
		let full = Self {
			man: self.man.clone().pow(mag),
			scale: self.scale.checked_mul(mag).ok_or_else(bad)?
		};
		if e < 0 {
			if self.is_zero() {return Err(ArithError::DivisionByZero);}
			Self::one().div(&full, k)
		}
		else {
			Ok(full.truncated(k.max(self.scale)))
		}
	}

	///(self ^ exp) mod modulus on the integer parts
	pub fn pow_mod(&self, exp: &Self, modulus: &Self) -> Result<Self, ArithError> {
		let m = modulus.to_integer();
		if m == 0 {return Err(ArithError::DivisionByZero);}
		let e = exp.to_integer();
		if e < 0 {return Err(ArithError::InvalidExponent(exp.to_string()));}
		self.to_integer().pow_mod(&e, &m)
			.map(Self::from)
			.map_err(|_| ArithError::InvalidExponent(exp.to_string()))
	}

	///square root truncated at the larger of `k` and own scale
	pub fn sqrt(&self, k: u32) -> Result<Self, ArithError> {
		if self.is_negative() {return Err(ArithError::NegativeSquareRoot(self.to_string()));}
		let scale = k.max(self.scale);
		let wide = self.man.clone() * ten_pow(scale.saturating_mul(2) - self.scale);
		Ok(Self {man: wide.sqrt(), scale})
	}

	///parse literal text in the given radix
	///
	///Digits are `0-9A-F`, at most one `.`, and an optional leading `_` for negative numbers.
	///Fractional digits in other radices are converted exactly, then truncated to as many decimal digits as were written.
	///A lone `_` or `.` is zero.
	pub fn parse(text: &str, radix: u32) -> Result<Self, SyntaxError> {
		let (neg, body) = match text.strip_prefix('_') {
			Some(b) => (true, b),
			None => (false, text)
		};
		let (ipart, fpart) = body.split_once('.').unwrap_or((body, ""));

		let mut man = Integer::ZERO;
		for c in ipart.chars().chain(fpart.chars()) {
			let d = c.to_digit(16)
				.filter(|d| *d < radix)
				.ok_or(SyntaxError::InvalidDigit {digit: c, radix})?;
			man *= radix;
			man += d;
		}

		let scale = u32::try_from(fpart.len()).unwrap_or(u32::MAX);
		if radix != 10 && scale > 0 {
			man = man * ten_pow(scale) / Integer::from(radix).pow(scale);	//rescale fraction to decimal digits
		}
		if neg {man = -man;}
		Ok(Self {man, scale})
	}

	///render in the given radix, `_` marks negative numbers
	///
	///Radix 10 prints exactly `scale` fractional digits,
	///other radices print as many uppercase digits as needed to cover the scale.
	pub fn to_string_radix(&self, radix: u32) -> String {
		let mut out = String::from(if self.is_negative() {"_"} else {""});
		let abs = self.man.clone().abs();

		if radix == 10 {
			let digits = abs.to_string();
			if self.scale == 0 {
				out.push_str(&digits);
			}
			else {
				let s = self.scale as usize;
				let padded = format!("{digits:0>width$}", width = s + 1);	//leading zero for |n| < 1
				let (ipart, fpart) = padded.split_at(padded.len() - s);
				out.push_str(ipart);
				out.push('.');
				out.push_str(fpart);
			}
			return out;
		}

		let unit = ten_pow(self.scale);
		let (ipart, mut frac) = abs.div_rem(unit.clone());
		out.push_str(&ipart.to_string_radix(radix as i32).to_uppercase());
		if self.scale > 0 {
			out.push('.');
			let mut span = Integer::from(1);
			while span < unit {
				span *= radix;
				frac *= radix;
				let (d, r) = frac.div_rem(unit.clone());
				let d = d.to_u32().and_then(|d| char::from_digit(d, radix)).unwrap_or('0');
				out.push(d.to_ascii_uppercase());
				frac = r;
			}
		}
		out
	}
}

impl From<Integer> for Number {
	fn from(man: Integer) -> Self {
		Self {man, scale: 0}
	}
}

impl From<u32> for Number {
	fn from(n: u32) -> Self {
		Self::from(Integer::from(n))
	}
}

impl From<usize> for Number {
	fn from(n: usize) -> Self {
		Self::from(Integer::from(n))
	}
}

impl Add for &Number {
	type Output = Number;
	fn add(self, rhs: Self) -> Number {
		let scale = self.scale.max(rhs.scale);
		Number {man: self.man_at(scale) + rhs.man_at(scale), scale}
	}
}

impl Sub for &Number {
	type Output = Number;
	fn sub(self, rhs: Self) -> Number {
		let scale = self.scale.max(rhs.scale);
		Number {man: self.man_at(scale) - rhs.man_at(scale), scale}
	}
}

impl Ord for Number {
	fn cmp(&self, other: &Self) -> Ordering {
		let scale = self.scale.max(other.scale);
		self.man_at(scale).cmp(&other.man_at(scale))
	}
}

impl PartialOrd for Number {
	fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
		Some(self.cmp(other))
	}
}

///by value: 1.50 == 1.5
impl PartialEq for Number {
	fn eq(&self, other: &Self) -> bool {
		self.cmp(other) == Ordering::Equal
	}
}

impl Eq for Number {}

impl fmt::Display for Number {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.to_string_radix(10))
	}
}
