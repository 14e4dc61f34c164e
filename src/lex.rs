//! Lazy tokenizer over script or macro text
//!
//! Tokens borrow from the text they were read from. A lexer can be restarted at any byte offset,
//! which is how execution frames resume after a nested macro returns.

use lazy_static::lazy_static;
use regex::Regex;
use crate::errors::SyntaxError;

lazy_static! {
	///numeric literal: optional `_`, digits, at most one `.`
	static ref NUM_LIT: Regex = Regex::new(r"^_?[0-9A-F]*(?:\.[0-9A-F]*)?").unwrap();
}

///comparison performed by a conditional
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Cmp {
	Lt,
	Gt,
	Eq
}
impl Cmp {
	fn of(c: char) -> Option<Self> {
		match c {
			'<' => Some(Self::Lt),
			'>' => Some(Self::Gt),
			'=' => Some(Self::Eq),
			_ => None
		}
	}

	///command character
	pub fn sym(&self) -> char {
		match self {
			Self::Lt => '<',
			Self::Gt => '>',
			Self::Eq => '=',
		}
	}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Token<'a> {
	///numeric literal, parsed on dispatch with the input radix in force then
	Num(&'a str),
	///macro body without the outer brackets
	Mac(&'a str),
	///any other single character, validated on dispatch
	Cmd(char),
	///register command and register name
	Reg(char, char),
	///comparison, inverted, register name
	Cond(Cmp, bool, char)
}

///commands followed by a register name
const REG_CMDS: &str = "sSlL:;";

pub struct Lexer<'a> {
	src: &'a str,
	pos: usize
}
impl<'a> Lexer<'a> {
	pub fn new(src: &'a str) -> Self {
		Self::at(src, 0)
	}

	///resume at byte offset `pos`
	pub fn at(src: &'a str, pos: usize) -> Self {
		Self {src, pos: pos.min(src.len())}
	}

	///byte offset of the next unread character
	pub fn pos(&self) -> usize {self.pos}

	///true if only whitespace and comments remain
	pub fn at_end(&mut self) -> bool {
		self.skip_trivia();
		self.pos >= self.src.len()
	}

	fn peek(&self) -> Option<char> {
		self.src[self.pos..].chars().next()
	}

	fn bump(&mut self) -> Option<char> {
		let c = self.peek()?;
		self.pos += c.len_utf8();
		Some(c)
	}

	fn skip_trivia(&mut self) {
		while let Some(c) = self.peek() {
			if c.is_whitespace() {
				self.pos += c.len_utf8();
			}
			else if c == '#' {	//comment runs to end of line
				let rest = &self.src[self.pos..];
				self.pos += rest.find('\n').unwrap_or(rest.len());
			}
			else {break;}
		}
	}

	///register name is the next character, whatever it is
	fn reg_name(&mut self, cmd: char) -> Result<char, SyntaxError> {
		self.bump().ok_or(SyntaxError::MissingRegister(cmd))
	}

	///scan a bracketed macro, `start` is the offset of the opening bracket
	fn mac(&mut self, start: usize) -> Result<Token<'a>, SyntaxError> {
		let src = self.src;
		let body_start = self.pos;
		let mut nest: usize = 1;
		for (i, c) in src[body_start..].char_indices() {
			match c {
				'[' => {nest += 1;},
				']' => {
					nest -= 1;
					if nest == 0 {
						self.pos = body_start + i + 1;
						return Ok(Token::Mac(&src[body_start..body_start + i]));
					}
				},
				_ => {}
			}
		}
		self.pos = src.len();
		Err(SyntaxError::UnterminatedMacro {offset: start})
	}
}

impl<'a> Iterator for Lexer<'a> {
	type Item = Result<Token<'a>, SyntaxError>;

	fn next(&mut self) -> Option<Self::Item> {
		self.skip_trivia();
		let src = self.src;
		let start = self.pos;
		let c = self.bump()?;
		Some(match c {
			'0'..='9'|'A'..='F'|'.'|'_' => {
				let len = NUM_LIT.find(&src[start..]).map_or(c.len_utf8(), |m| m.end());
				self.pos = start + len;
				Ok(Token::Num(&src[start..self.pos]))
			},
			'[' => self.mac(start),
			']' => Err(SyntaxError::UnmatchedBracket {offset: start}),
			'!' => {
				if let Some(cmp) = self.peek().and_then(Cmp::of) {
					self.pos += 1;
					self.reg_name(cmp.sym()).map(|r| Token::Cond(cmp, true, r))
				}
				else {Ok(Token::Cmd('!'))}
			},
			_ => {
				if let Some(cmp) = Cmp::of(c) {
					self.reg_name(c).map(|r| Token::Cond(cmp, false, r))
				}
				else if REG_CMDS.contains(c) {
					self.reg_name(c).map(|r| Token::Reg(c, r))
				}
				else {Ok(Token::Cmd(c))}
			}
		})
	}
}
