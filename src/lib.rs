//! Evaluation engine for the dc stack calculator language.
//!
//! A script is evaluated against a [State] in one synchronous call. Every run starts from a fresh context,
//! since callers re-evaluate the whole script text on each edit.
//!
//! ```
//! let ev = vdc::evaluate("3 [d 1 - d 0 <m] sm lmx");
//! assert!(ev.error.is_none());
//! assert_eq!(ev.render(), ["3", "2", "1", "0"]);
//! ```

pub mod errors;
pub mod lex;
pub mod num;
pub mod regs;
pub mod structs;

use std::rc::Rc;
use log::{debug, trace};
use phf::phf_map;

pub use errors::Error;
pub use num::Number;
pub use structs::{Limits, Macro, Obj, Params, State};

use errors::{ArithError, RuntimeError, StackError, SyntaxError, TypeError};
use lex::{Cmp, Lexer, Token};

///argument signatures: depth and types checked before anything is popped
#[derive(Clone, Copy, Debug)]
enum CmdSig {
	Nil,
	Ax,
	An,
	AxBx,
	AxBn,
	AnBn,
	AnBnCn
}
use CmdSig::*;
impl CmdSig {
	///aka argument count
	fn adicity(&self) -> usize {
		match self {
			Nil => 0,
			Ax|An => 1,
			AxBx|AxBn|AnBn => 2,
			AnBnCn => 3
		}
	}

	///correction messages
	fn correct(&self) -> &'static str {
		match self {
			Nil|Ax|AxBx => "",
			An => "must be a number",
			AxBn => "2nd must be a number",
			AnBn => "must be two numbers",
			AnBnCn => "must be three numbers",
		}
	}

	///whether the top arguments (deepest first) fit
	fn fits(&self, args: &[Obj]) -> bool {
		let num = |o: &Obj| o.as_num().is_some();
		match self {
			Nil|Ax|AxBx => true,
			An|AnBn|AnBnCn => args.iter().all(num),
			AxBn => args.get(1).is_some_and(num),
		}
	}
}

///every known command; anything else is an unknown command once reached
static CMD_SIGS: phf::Map<char, CmdSig> = phf_map! {
	'+' => CmdSig::AnBn,
	'-' => CmdSig::AnBn,
	'*' => CmdSig::AnBn,
	'/' => CmdSig::AnBn,
	'%' => CmdSig::AnBn,
	'~' => CmdSig::AnBn,
	'^' => CmdSig::AnBn,
	'|' => CmdSig::AnBnCn,
	'v' => CmdSig::An,
	'd' => CmdSig::Ax,
	'r' => CmdSig::AxBx,
	'c' => CmdSig::Nil,
	'R' => CmdSig::An,
	'z' => CmdSig::Nil,
	'Z' => CmdSig::Ax,
	'X' => CmdSig::Ax,
	's' => CmdSig::Ax,
	'l' => CmdSig::Nil,
	'S' => CmdSig::AxBn,
	':' => CmdSig::AxBn,
	'L' => CmdSig::An,
	';' => CmdSig::An,
	'<' => CmdSig::AnBn,
	'>' => CmdSig::AnBn,
	'=' => CmdSig::AnBn,
	'x' => CmdSig::Ax,
	'k' => CmdSig::An,
	'i' => CmdSig::An,
	'o' => CmdSig::An,
	'K' => CmdSig::Nil,
	'I' => CmdSig::Nil,
	'O' => CmdSig::Nil,
	'q' => CmdSig::Nil,
	'Q' => CmdSig::An,
	'p' => CmdSig::Nil,
	'f' => CmdSig::Nil,
	'n' => CmdSig::Ax,
	'P' => CmdSig::Ax,
};

///what the frame loop does after a command
enum Flow {
	Next,
	///run macro text in a new frame
	Call(Rc<str>),
	///drop this many frames
	Unwind(usize),
	Quit
}

///one level of execution: text and cursor
struct Frame {
	text: Rc<str>,
	pos: usize
}

///Result of one evaluation: the state as it stood when execution stopped, and the error that stopped it, if any.
///
///No mutation is rolled back on error.
#[derive(Debug)]
pub struct Evaluation {
	pub state: State,
	pub error: Option<Error>
}
impl Evaluation {
	///main stack, bottom first
	pub fn final_stack(&self) -> &[Obj] {self.state.stack()}

	///main stack rendered in the final output radix, bottom first
	pub fn render(&self) -> Vec<String> {self.state.render()}
}

///Evaluates a script in a fresh default context.
pub fn evaluate(script: &str) -> Evaluation {
	evaluate_in(State::default(), script)
}

///Evaluates a script in the given context, which the caller is expected to have created or reset for this run.
pub fn evaluate_in(mut st: State, script: &str) -> Evaluation {
	debug!("evaluating {} bytes", script.len());
	let error = exec(&mut st, script).err();
	match &error {
		Some(e) => {debug!("evaluation aborted with {}: {e}", e.kind());},
		None => {debug!("evaluation finished, stack depth {}", st.mstk.len());}
	}
	Evaluation {state: st, error}
}

///Executes a script on the given state.
///
///Runs until the text is exhausted, `q`/`Q` stops it, or an error occurs.
///Quitting is not an error. On error, the state keeps whatever it held at the failure point.
///
///Macro calls push frames onto an explicit call stack bounded by [Limits::max_depth].
///A call made as the last command of a frame replaces that frame,
///so loops written as tail recursion run in constant depth and are bounded by [Limits::max_steps] instead.
pub fn exec(st: &mut State, script: &str) -> Result<(), Error> {
	let mut frames = vec![Frame {text: Rc::from(script), pos: 0}];
	let mut steps: u64 = 0;

	while let Some(top) = frames.last_mut() {
		let text = Rc::clone(&top.text);
		let mut lex = Lexer::at(&text, top.pos);
		let tok = match lex.next() {
			Some(tok) => tok?,
			None => {
				frames.pop();	//fall through to caller
				continue;
			}
		};
		top.pos = lex.pos();

		steps += 1;
		if steps > st.lim.max_steps {
			return Err(RuntimeError::StepLimitExceeded(st.lim.max_steps).into());
		}
		trace!("depth {} step {steps}: {tok:?}", frames.len());

		match step(st, tok)? {
			Flow::Next => {},
			Flow::Call(mac) => {
				if lex.at_end() {
					frames.pop();	//optimize tail call
				}
				if frames.len() > st.lim.max_depth {
					return Err(RuntimeError::RecursionLimitExceeded(st.lim.max_depth).into());
				}
				frames.push(Frame {text: mac, pos: 0});
			},
			Flow::Unwind(n) => {
				frames.truncate(frames.len().saturating_sub(n));
			},
			Flow::Quit => {
				frames.clear();
			}
		}
	}
	Ok(())
}

///execute one token
fn step(st: &mut State, tok: Token) -> Result<Flow, Error> {
	let cmd = match tok {
		Token::Num(lit) => {
			st.mstk.push(Obj::Num(Number::parse(lit, st.par.i())?));
			return Ok(Flow::Next);
		},
		Token::Mac(body) => {
			st.mstk.push(Obj::Mac(Macro::new(body)));
			return Ok(Flow::Next);
		},
		Token::Cmd(c)|Token::Reg(c, _) => c,
		Token::Cond(cmp, _, _) => cmp.sym()
	};

	let sig = CMD_SIGS.get(&cmd).copied().ok_or(SyntaxError::UnknownCommand(cmd))?;
	check(st, cmd, sig)?;

	match tok {
		Token::Reg(_, r) => register(st, cmd, r),
		Token::Cond(cmp, inv, r) => conditional(st, cmp, inv, r),
		_ => command(st, cmd)
	}
}

///check stack depth and argument types without consuming anything
fn check(st: &State, cmd: char, sig: CmdSig) -> Result<(), Error> {
	let adi = sig.adicity();
	let len = st.mstk.len();
	if len < adi {
		return Err(StackError::Underflow {cmd, needed: adi, found: len}.into());
	}
	if !sig.fits(&st.mstk[len - adi..]) {
		return Err(TypeError::WrongType {cmd, expected: sig.correct()}.into());
	}
	Ok(())
}

impl State {
	fn pop(&mut self, cmd: char) -> Result<Obj, Error> {
		self.mstk.pop().ok_or(StackError::Underflow {cmd, needed: 1, found: 0}.into())
	}

	fn pop_num(&mut self, cmd: char) -> Result<Number, Error> {
		match self.pop(cmd)? {
			Obj::Num(n) => Ok(n),
			o => {
				self.mstk.push(o);
				Err(TypeError::WrongType {cmd, expected: CmdSig::An.correct()}.into())
			}
		}
	}

	fn push_num(&mut self, n: Number) {
		self.mstk.push(Obj::Num(n));
	}

	///fail if an operation would build more digits than the limit allows
	fn within(&self, cmd: char, digits: u64) -> Result<(), RuntimeError> {
		let limit = self.lim.max_digits;
		if digits > limit {Err(RuntimeError::SizeLimitExceeded {cmd, limit})} else {Ok(())}
	}

	///push operands back in their original order, then fail
	fn restore<E: Into<Error>>(&mut self, args: Vec<Number>, e: E) -> Result<Flow, Error> {
		self.mstk.extend(args.into_iter().map(Obj::Num));
		Err(e.into())
	}
}

///upper estimate of the digits `a <cmd> b` works with before truncation
fn work_digits(cmd: char, a: &Number, b: &Number, k: u32) -> u64 {
	let (sa, sb, k) = (u64::from(a.scale()), u64::from(b.scale()), u64::from(k));
	match cmd {
		'*' => a.digit_bound() + b.digit_bound() + sa + sb,
		'/'|'%'|'~' => a.digit_bound() + b.digit_bound() + sa + sb + k,
		'^' => {
			let e = b.to_integer().abs().to_u64().unwrap_or(u64::MAX);
			(a.digit_bound() + sa).saturating_mul(e).saturating_add(k)
		},
		_ => 0
	}
}

///pop two numbers, push the result; operands stay on error
fn binary<F>(st: &mut State, cmd: char, f: F) -> Result<Flow, Error>
	where F: FnOnce(&Number, &Number, u32) -> Result<Number, ArithError> {
	let b = st.pop_num(cmd)?;
	let a = st.pop_num(cmd)?;
	if let Err(e) = st.within(cmd, work_digits(cmd, &a, &b, st.par.k())) {
		return st.restore(vec![a, b], e);
	}
	match f(&a, &b, st.par.k()) {
		Ok(res) => {
			st.push_num(res);
			Ok(Flow::Next)
		},
		Err(e) => st.restore(vec![a, b], e)
	}
}

///commands that need neither a register nor a comparison
fn command(st: &mut State, cmd: char) -> Result<Flow, Error> {
	match cmd {
		/*----------------
			ARITHMETIC
		----------------*/
		'+' => binary(st, cmd, |a, b, _| Ok(a + b)),
		'-' => binary(st, cmd, |a, b, _| Ok(a - b)),
		'*' => binary(st, cmd, |a, b, k| Ok(a.mul(b, k))),
		'/' => binary(st, cmd, |a, b, k| a.div(b, k)),
		'%' => binary(st, cmd, |a, b, k| a.rem(b, k)),
		'^' => binary(st, cmd, |a, b, k| a.pow(b, k)),

		//quotient and remainder
		'~' => {
			let b = st.pop_num(cmd)?;
			let a = st.pop_num(cmd)?;
			if let Err(e) = st.within(cmd, work_digits(cmd, &a, &b, st.par.k())) {
				return st.restore(vec![a, b], e);
			}
			match a.div_rem(&b, st.par.k()) {
				Ok((quot, rem)) => {
					st.push_num(quot);
					st.push_num(rem);
					Ok(Flow::Next)
				},
				Err(e) => st.restore(vec![a, b], e)
			}
		},

		//modular exponentiation
		'|' => {
			let c = st.pop_num(cmd)?;
			let b = st.pop_num(cmd)?;
			let a = st.pop_num(cmd)?;
			match a.pow_mod(&b, &c) {
				Ok(res) => {
					st.push_num(res);
					Ok(Flow::Next)
				},
				Err(e) => st.restore(vec![a, b, c], e)
			}
		},

		//square root
		'v' => {
			let a = st.pop_num(cmd)?;
			let wide = 2 * u64::from(st.par.k().max(a.scale()));
			if let Err(e) = st.within(cmd, a.digit_bound() + wide) {
				return st.restore(vec![a], e);
			}
			match a.sqrt(st.par.k()) {
				Ok(res) => {
					st.push_num(res);
					Ok(Flow::Next)
				},
				Err(e) => st.restore(vec![a], e)
			}
		},
		/*------------------------
			STACK MANIPULATION
		------------------------*/
		//duplicate top of stack
		'd' => {
			let top = st.pop(cmd)?;
			st.mstk.push(top.clone());
			st.mstk.push(top);
			Ok(Flow::Next)
		},

		//swap top 2 objects
		'r' => {
			let len = st.mstk.len();
			st.mstk.swap(len - 2, len - 1);
			Ok(Flow::Next)
		},

		//clear stack
		'c' => {
			st.mstk.clear();
			Ok(Flow::Next)
		},

		//rotate top n objects
		'R' => {
			let a = st.pop_num(cmd)?;
			let Some(n) = a.to_i64() else {
				let value = a.to_string();
				return st.restore(vec![a], TypeError::InvalidCount {cmd, value});
			};
			let len = st.mstk.len();
			let num = usize::try_from(n.unsigned_abs()).unwrap_or(usize::MAX).min(len);	//rotate what is there
			if num > 1 {
				let sl = &mut st.mstk[len - num..];
				if n > 0 {
					sl.rotate_left(1);	//n-th object comes up to the top
				}
				else {
					sl.rotate_right(1);	//top goes down to depth n
				}
			}
			Ok(Flow::Next)
		},

		//push stack depth
		'z' => {
			let depth = st.mstk.len();
			st.push_num(Number::from(depth));
			Ok(Flow::Next)
		},

		//digit count of number or length of macro
		'Z' => {
			let len = match st.pop(cmd)? {
				Obj::Num(n) => n.digits(),
				Obj::Mac(m) => m.text().chars().count()
			};
			st.push_num(Number::from(len));
			Ok(Flow::Next)
		},

		//scale of number, macros have none
		'X' => {
			let scale = match st.pop(cmd)? {
				Obj::Num(n) => n.scale(),
				Obj::Mac(_) => 0
			};
			st.push_num(Number::from(scale));
			Ok(Flow::Next)
		},
		/*----------------
			PARAMETERS
		----------------*/
		'k'|'i'|'o' => {
			let a = st.pop_num(cmd)?;
			let res = match cmd {
				'k' => st.within(cmd, a.to_u32().map_or(0, u64::from))
					.map_err(Error::from)
					.and_then(|()| st.par.set_k(&a).map_err(Error::from)),
				'i' => st.par.set_i(&a).map_err(Error::from),
				_ => st.par.set_o(&a).map_err(Error::from)
			};
			match res {
				Ok(()) => Ok(Flow::Next),
				Err(e) => st.restore(vec![a], e)
			}
		},

		'K' => {
			st.push_num(Number::from(st.par.k()));
			Ok(Flow::Next)
		},

		'I' => {
			st.push_num(Number::from(st.par.i()));
			Ok(Flow::Next)
		},

		'O' => {
			st.push_num(Number::from(st.par.o()));
			Ok(Flow::Next)
		},
		/*------------
			MACROS
		------------*/
		//execute macro, numbers go back unchanged
		'x' => {
			match st.pop(cmd)? {
				Obj::Mac(m) => Ok(Flow::Call(m.shared())),
				n => {
					st.mstk.push(n);
					Ok(Flow::Next)
				}
			}
		},

		//stop evaluation
		'q' => Ok(Flow::Quit),

		//leave n levels
		'Q' => {
			let a = st.pop_num(cmd)?;
			match a.to_usize() {
				Some(n) => Ok(Flow::Unwind(n)),
				None => {
					let value = a.to_string();
					st.restore(vec![a], TypeError::InvalidCount {cmd, value})
				}
			}
		},
		/*--------------
			PRINTING
		--------------*/
		//the whole stack is always visible to the caller
		'p'|'f' => Ok(Flow::Next),

		//print-and-pop, only the pop remains
		'n'|'P' => {
			st.pop(cmd)?;
			Ok(Flow::Next)
		},

		_ => Err(SyntaxError::UnknownCommand(cmd).into())
	}
}

///register transfers
fn register(st: &mut State, cmd: char, r: char) -> Result<Flow, Error> {
	match cmd {
		's' => {
			let a = st.pop(cmd)?;
			st.regs.set(r, a);
		},

		'l' => {
			let o = st.regs.get(r);
			st.mstk.push(o);
		},

		//value index S/:
		'S'|':' => {
			let b = st.pop_num(cmd)?;
			let idx = match regs::index(&b, st.lim.max_index) {
				Ok(i) => i,
				Err(e) => {return st.restore(vec![b], e);}
			};
			let a = st.pop(cmd)?;
			st.regs.array_set(r, idx, a);
		},

		//index L/;
		'L'|';' => {
			let a = st.pop_num(cmd)?;
			let idx = match regs::index(&a, st.lim.max_index) {
				Ok(i) => i,
				Err(e) => {return st.restore(vec![a], e);}
			};
			let o = st.regs.array_get(r, idx);
			st.mstk.push(o);
		},

		_ => {return Err(SyntaxError::UnknownCommand(cmd).into());}
	}
	Ok(Flow::Next)
}

///pop top and second, run register `r` if `top <cmp> second` holds (inverted by `!`)
fn conditional(st: &mut State, cmp: Cmp, inv: bool, r: char) -> Result<Flow, Error> {
	let cmd = cmp.sym();
	let top = st.pop_num(cmd)?;
	let second = st.pop_num(cmd)?;
	let holds = match cmp {
		Cmp::Lt => top < second,
		Cmp::Gt => top > second,
		Cmp::Eq => top == second
	};
	if holds == inv {
		return Ok(Flow::Next);
	}
	match st.regs.value(r) {
		Some(Obj::Mac(m)) => Ok(Flow::Call(m.shared())),
		_ => st.restore(vec![second, top], TypeError::NotAMacro(r))
	}
}
