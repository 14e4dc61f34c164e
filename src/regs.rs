//! Register store: one value and one array per single-character name

use std::collections::HashMap;
use crate::{Obj, Number, errors::TypeError};

///register object, value plus associated array
#[derive(Clone, Debug, Default)]
pub struct RegObj {
	///principal object
	pub o: Obj,
	///associated array
	pub a: Vec<Obj>
}

///registers are touched on first write, reads of untouched ones give the default object
#[derive(Clone, Debug, Default)]
pub struct Registers(HashMap<char, RegObj>);

impl Registers {
	///current value, zero if never set
	pub fn get(&self, id: char) -> Obj {
		self.value(id).cloned().unwrap_or_default()
	}

	///borrowed value, None if never set
	pub fn value(&self, id: char) -> Option<&Obj> {
		self.0.get(&id).map(|r| &r.o)
	}

	pub fn set(&mut self, id: char, o: Obj) {
		self.0.entry(id).or_default().o = o;
	}

	///array slot, zero if unset or out of range
	pub fn array_get(&self, id: char, idx: usize) -> Obj {
		self.0.get(&id)
			.and_then(|r| r.a.get(idx))
			.cloned()
			.unwrap_or_default()
	}

	///store into array slot, extending with zeros as needed
	pub fn array_set(&mut self, id: char, idx: usize, o: Obj) {
		let a = &mut self.0.entry(id).or_default().a;
		if idx >= a.len() {
			a.resize(idx + 1, Obj::default());
		}
		a[idx] = o;
	}

	///number of registers touched so far
	pub fn len(&self) -> usize {self.0.len()}

	pub fn is_empty(&self) -> bool {self.0.is_empty()}
}

///validate an array index: a non-negative integer no larger than `max`
pub fn index(n: &Number, max: usize) -> Result<usize, TypeError> {
	n.to_usize()
		.filter(|i| *i <= max)
		.ok_or_else(|| TypeError::InvalidIndex(n.to_string()))
}
