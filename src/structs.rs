//! Stack objects and evaluation state

use std::rc::Rc;
use crate::{Number, regs::Registers, errors::ConfigError};

///macro text, shared between stack and registers without copying
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Macro(Rc<str>);
impl Macro {
	pub fn new(text: &str) -> Self {
		Self(Rc::from(text))
	}

	pub fn text(&self) -> &str {&self.0}

	pub(crate) fn shared(&self) -> Rc<str> {Rc::clone(&self.0)}
}

///basic object: either number or macro
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Obj {
	Num(Number),
	Mac(Macro)
}
impl Default for Obj {
	fn default() -> Self {Obj::Num(Number::zero())}
}
impl Obj {
	///numbers in output radix `obase`, macros in brackets
	pub fn render(&self, obase: u32) -> String {
		match self {
			Obj::Num(n) => n.to_string_radix(obase),
			Obj::Mac(m) => format!("[{}]", m.text()),
		}
	}

	pub fn as_num(&self) -> Option<&Number> {
		if let Obj::Num(n) = self {Some(n)} else {None}
	}
}

///context parameters: precision K, input radix I, output radix O
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Params {
	k: u32,
	i: u32,
	o: u32
}
impl Default for Params {
	///(K, I, O) = (0, 10, 10)
	fn default() -> Self {
		Self {k: 0, i: 10, o: 10}
	}
}

///accepted radix range
const RADIX: std::ops::RangeInclusive<u32> = 2..=16;

impl Params {
	///checked edit of precision
	pub fn set_k(&mut self, n: &Number) -> Result<(), ConfigError> {
		self.k = n.to_u32().ok_or_else(|| ConfigError::InvalidPrecision(n.to_string()))?;
		Ok(())
	}
	///checked edit of input radix
	pub fn set_i(&mut self, n: &Number) -> Result<(), ConfigError> {
		self.i = radix('i', n)?;
		Ok(())
	}
	///checked edit of output radix
	pub fn set_o(&mut self, n: &Number) -> Result<(), ConfigError> {
		self.o = radix('o', n)?;
		Ok(())
	}

	pub fn k(&self) -> u32 {self.k}
	pub fn i(&self) -> u32 {self.i}
	pub fn o(&self) -> u32 {self.o}
}

fn radix(cmd: char, n: &Number) -> Result<u32, ConfigError> {
	n.to_u32()
		.filter(|r| RADIX.contains(r))
		.ok_or_else(|| ConfigError::InvalidRadix {cmd, value: n.to_string()})
}

///resource ceilings for one evaluation
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Limits {
	///nested macro frames
	pub max_depth: usize,
	///executed tokens
	pub max_steps: u64,
	///highest register array index
	pub max_index: usize,
	///decimal digits one operation may build, precision included
	pub max_digits: u64
}
impl Default for Limits {
	fn default() -> Self {
		Self {
			max_depth: 4096,
			max_steps: 10_000_000,
			max_index: 1_048_575,
			max_digits: 1_000_000
		}
	}
}

///Bundled state for one evaluation: main stack, registers, parameters, limits.
///
///A fresh or [reset](State::reset) state is required for every run,
///nothing carries over from one script text to the next.
#[derive(Clone, Debug, Default)]
pub struct State {
	///main stack
	pub(crate) mstk: Vec<Obj>,
	pub(crate) regs: Registers,
	pub(crate) par: Params,
	pub(crate) lim: Limits
}
impl State {
	///custom initial (K, I, O), cleaner than running `k i o` first
	pub fn custom_params(mut self, k: u32, i: u32, o: u32) -> Result<Self, ConfigError> {
		self.par.set_k(&Number::from(k))?;
		self.par.set_i(&Number::from(i))?;
		self.par.set_o(&Number::from(o))?;
		Ok(self)
	}

	pub fn custom_limits(mut self, lim: Limits) -> Self {
		self.lim = lim;
		self
	}

	///main stack, bottom first
	pub fn stack(&self) -> &[Obj] {&self.mstk}

	pub fn registers(&self) -> &Registers {&self.regs}

	pub fn params(&self) -> Params {self.par}

	pub fn limits(&self) -> Limits {self.lim}

	///main stack rendered in the current output radix, bottom first
	pub fn render(&self) -> Vec<String> {
		self.mstk.iter().map(|o| o.render(self.par.o())).collect()
	}

	///back to default stack, registers and parameters, limits are kept
	pub fn reset(&mut self) {
		let lim = self.lim;
		*self = Self::default().custom_limits(lim);
	}
}
