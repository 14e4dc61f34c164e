//! Error taxonomy, one enum per kind

use thiserror::Error;

///any failure that aborts an evaluation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
	#[error(transparent)]
	Syntax(#[from] SyntaxError),

	#[error(transparent)]
	Stack(#[from] StackError),

	#[error(transparent)]
	Arith(#[from] ArithError),

	#[error(transparent)]
	Config(#[from] ConfigError),

	#[error(transparent)]
	Type(#[from] TypeError),

	#[error(transparent)]
	Runtime(#[from] RuntimeError),
}

impl Error {
	///short name of the error kind
	pub fn kind(&self) -> &'static str {
		match self {
			Self::Syntax(_) => "syntax error",
			Self::Stack(_) => "stack error",
			Self::Arith(_) => "arithmetic error",
			Self::Config(_) => "config error",
			Self::Type(_) => "type error",
			Self::Runtime(_) => "runtime error",
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyntaxError {
	///offset of the opening bracket within the executing text
	#[error("missing closing bracket for '[' at offset {offset}")]
	UnterminatedMacro {offset: usize},

	#[error("unmatched ']' at offset {offset}")]
	UnmatchedBracket {offset: usize},

	#[error("invalid command: {0:?}")]
	UnknownCommand(char),

	#[error("command '{0}' needs a register name")]
	MissingRegister(char),

	#[error("digit '{digit}' is too high for input radix {radix}")]
	InvalidDigit {digit: char, radix: u32},
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StackError {
	#[error("command '{cmd}' needs {needed} value(s), stack has {found}")]
	Underflow {cmd: char, needed: usize, found: usize},
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArithError {
	#[error("division by zero")]
	DivisionByZero,

	#[error("v: square root of negative number {0}")]
	NegativeSquareRoot(String),

	#[error("invalid exponent {0}")]
	InvalidExponent(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
	#[error("{cmd}: radix must be an integer in [2, 16], got {value}")]
	InvalidRadix {cmd: char, value: String},

	#[error("k: precision must be a non-negative integer, got {0}")]
	InvalidPrecision(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TypeError {
	#[error("wrong argument type for command '{cmd}': {expected}")]
	WrongType {cmd: char, expected: &'static str},

	#[error("invalid array index {0}")]
	InvalidIndex(String),

	#[error("{cmd}: invalid count {value}")]
	InvalidCount {cmd: char, value: String},

	#[error("register '{0}' does not hold a macro")]
	NotAMacro(char),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuntimeError {
	#[error("macro nesting exceeded {0} levels")]
	RecursionLimitExceeded(usize),

	#[error("evaluation exceeded {0} steps")]
	StepLimitExceeded(u64),

	#[error("command '{cmd}' would exceed {limit} digits")]
	SizeLimitExceeded {cmd: char, limit: u64},
}
