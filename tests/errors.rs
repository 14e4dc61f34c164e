use vdc::{Error, Limits, State, evaluate, evaluate_in};
use vdc::errors::{ArithError, ConfigError, RuntimeError, StackError, SyntaxError, TypeError};

///evaluate expecting failure, return the error and the stack left behind
fn fail(script: &str) -> (Error, Vec<String>) {
	let ev = evaluate(script);
	let stack = ev.render();
	match ev.error {
		Some(e) => (e, stack),
		None => panic!("{script:?} succeeded with {stack:?}")
	}
}

#[test]
fn division_by_zero_keeps_operands() {
	assert_eq!(fail("5 0 /"), (Error::Arith(ArithError::DivisionByZero), vec!["5".into(), "0".into()]));
	assert_eq!(fail("5 0 %").1, ["5", "0"]);
	assert_eq!(fail("5 0 ~").1, ["5", "0"]);
	assert_eq!(fail("1 5 0 |").1, ["1", "5", "0"]);
}

#[test]
fn underflow_consumes_nothing() {
	assert_eq!(fail("+").0, Error::Stack(StackError::Underflow {cmd: '+', needed: 2, found: 0}));
	assert_eq!(fail("1 +"), (Error::Stack(StackError::Underflow {cmd: '+', needed: 2, found: 1}), vec!["1".into()]));
	assert_eq!(fail("d").0, Error::Stack(StackError::Underflow {cmd: 'd', needed: 1, found: 0}));
	assert_eq!(fail("1 r").1, ["1"]);
	assert_eq!(fail("[a] <b").1, ["[a]"]);
}

#[test]
fn arithmetic_errors() {
	assert_eq!(fail("_4 v"), (Error::Arith(ArithError::NegativeSquareRoot("_4".into())), vec!["_4".into()]));
	assert_eq!(fail("2 0.5 ^").0, Error::Arith(ArithError::InvalidExponent("0.5".into())));
	assert_eq!(fail("0 _1 ^").0, Error::Arith(ArithError::DivisionByZero));
	assert_eq!(fail("2 3 _1 |").1, ["2", "3", "_1"]);
}

#[test]
fn wrong_types() {
	assert_eq!(
		fail("[a] 1 +"),
		(Error::Type(TypeError::WrongType {cmd: '+', expected: "must be two numbers"}), vec!["[a]".into(), "1".into()])
	);
	assert!(matches!(fail("[a] v").0, Error::Type(TypeError::WrongType {cmd: 'v', ..})));
	assert!(matches!(fail("1 [i] Sa").0, Error::Type(TypeError::WrongType {cmd: 'S', ..})));
	assert!(matches!(fail("[k] k").0, Error::Type(_)));
}

#[test]
fn config_errors() {
	assert_eq!(fail("1 i"), (Error::Config(ConfigError::InvalidRadix {cmd: 'i', value: "1".into()}), vec!["1".into()]));
	assert_eq!(fail("17 o").0, Error::Config(ConfigError::InvalidRadix {cmd: 'o', value: "17".into()}));
	assert_eq!(fail("_1 k").0, Error::Config(ConfigError::InvalidPrecision("_1".into())));
	assert_eq!(fail("1.5 k").0, Error::Config(ConfigError::InvalidPrecision("1.5".into())));
	assert!(State::default().custom_params(0, 1, 10).is_err());
}

#[test]
fn array_index_errors() {
	assert_eq!(fail("1 _1 Sa"), (Error::Type(TypeError::InvalidIndex("_1".into())), vec!["1".into(), "_1".into()]));
	assert_eq!(fail("0.5 La").0, Error::Type(TypeError::InvalidIndex("0.5".into())));
	let st = State::default().custom_limits(Limits {max_index: 9, ..Limits::default()});
	let ev = evaluate_in(st, "1 10 Sa");
	assert_eq!(ev.error, Some(Error::Type(TypeError::InvalidIndex("10".into()))));
}

#[test]
fn conditional_on_number_register() {
	assert_eq!(fail("5 sa 2 1 <a"), (Error::Type(TypeError::NotAMacro('a')), vec!["2".into(), "1".into()]));
	assert!(evaluate("2 1 >a").error.is_none());	//untaken branch never looks at the register
}

#[test]
fn syntax_errors_are_lazy() {
	assert_eq!(fail("1 2 ? 3"), (Error::Syntax(SyntaxError::UnknownCommand('?')), vec!["1".into(), "2".into()]));
	assert_eq!(fail("1 2 + ["), (Error::Syntax(SyntaxError::UnterminatedMacro {offset: 6}), vec!["3".into()]));
	assert_eq!(fail("1 ]").0, Error::Syntax(SyntaxError::UnmatchedBracket {offset: 2}));
	assert_eq!(fail("1 s"), (Error::Syntax(SyntaxError::MissingRegister('s')), vec!["1".into()]));
	assert_eq!(fail("8 i 19").0, Error::Syntax(SyntaxError::InvalidDigit {digit: '9', radix: 8}));
	assert_eq!(fail("1 !x").0, Error::Syntax(SyntaxError::UnknownCommand('!')));
	assert_eq!(fail("[?] x").0, Error::Syntax(SyntaxError::UnknownCommand('?')));
}

#[test]
fn count_errors() {
	assert!(matches!(fail("_1 Q").0, Error::Type(TypeError::InvalidCount {cmd: 'Q', ..})));
	assert_eq!(fail("1 2 1.5 R"), (Error::Type(TypeError::InvalidCount {cmd: 'R', value: "1.5".into()}), vec!["1".into(), "2".into(), "1.5".into()]));
	assert_eq!(fail("R").0, Error::Stack(StackError::Underflow {cmd: 'R', needed: 1, found: 0}));
}

#[test]
fn recursion_limit() {
	let st = State::default().custom_limits(Limits {max_depth: 50, ..Limits::default()});
	let ev = evaluate_in(st, "[lax 1] sa lax");
	assert_eq!(ev.error, Some(Error::Runtime(RuntimeError::RecursionLimitExceeded(50))));
}

#[test]
fn step_limit_stops_endless_loop() {
	let st = State::default().custom_limits(Limits {max_steps: 1000, ..Limits::default()});
	let ev = evaluate_in(st, "[lax] sa lax");
	assert_eq!(ev.error, Some(Error::Runtime(RuntimeError::StepLimitExceeded(1000))));
}

#[test]
fn huge_precision_is_refused() {
	let limit = Limits::default().max_digits;
	assert_eq!(
		fail("4000000000k 1 3 /"),
		(Error::Runtime(RuntimeError::SizeLimitExceeded {cmd: 'k', limit}), vec!["4000000000".into()])
	);
	assert_eq!(evaluate("4000000000k K").error.map(|e| e.kind()), Some("runtime error"));

	//precision set around the check still cannot reach the big-integer work
	let st = State::default().custom_params(4_000_000_000, 10, 10).unwrap();
	let ev = evaluate_in(st.clone(), "1 3 /");
	assert_eq!(ev.error, Some(Error::Runtime(RuntimeError::SizeLimitExceeded {cmd: '/', limit})));
	assert_eq!(ev.render(), ["1", "3"]);
	let ev = evaluate_in(st, "2 v");
	assert_eq!(ev.error, Some(Error::Runtime(RuntimeError::SizeLimitExceeded {cmd: 'v', limit})));
}

#[test]
fn huge_power_is_refused() {
	let limit = Limits::default().max_digits;
	assert_eq!(
		fail("100000000000000000000 4294967295 ^"),
		(
			Error::Runtime(RuntimeError::SizeLimitExceeded {cmd: '^', limit}),
			vec!["100000000000000000000".into(), "4294967295".into()]
		)
	);
	assert_eq!(fail("0.1 4294967295 ^").0, Error::Runtime(RuntimeError::SizeLimitExceeded {cmd: '^', limit}));
	assert_eq!(fail("1 4294967295 ^").0, Error::Runtime(RuntimeError::SizeLimitExceeded {cmd: '^', limit}));
	assert_eq!(evaluate("_1 999999 ^").render(), ["_1"]);
}

#[test]
fn repeated_squaring_hits_digit_limit() {
	let st = State::default().custom_limits(Limits {max_digits: 1000, ..Limits::default()});
	let ev = evaluate_in(st, "2 [d * lax] sa lax");
	assert_eq!(ev.error, Some(Error::Runtime(RuntimeError::SizeLimitExceeded {cmd: '*', limit: 1000})));
	assert_eq!(ev.state.stack().len(), 2);
}

#[test]
fn no_rollback_after_failure() {
	let ev = evaluate("5 sx 1 sy 0 0 / 7 sx");
	assert!(ev.error.is_some());
	assert_eq!(ev.state.registers().get('x').render(10), "5");
	assert_eq!(ev.state.registers().get('y').render(10), "1");
}

#[test]
fn error_kinds() {
	assert_eq!(fail("+").0.kind(), "stack error");
	assert_eq!(fail("1 0 /").0.kind(), "arithmetic error");
	assert_eq!(fail("?").0.kind(), "syntax error");
	assert_eq!(fail("1 0 /").0.to_string(), "division by zero");
}
