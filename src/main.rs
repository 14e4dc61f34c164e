use std::io::Read;
use std::process::ExitCode;
use log::warn;
use vdc::{Limits, State, evaluate_in};

const HELPMSG: &str = r##"vdc - evaluator for the dc stack calculator language

Evaluates one script from a clean context and prints the final stack, top first.
Nothing is printed while the script runs; the stack is the output.

Command line options:
(order/position of --flags doesn't matter)

<nothing>
	Reads the script from standard input.

--expr|-e EXPR1 [EXPR2] ...
	Expression mode, expressions are joined by newlines and evaluated as one script.

[--file|-f] FILE1 [FILE2] ...
	File mode, contents of the files are joined and evaluated as one script.
	-f is optional: If at least one option is provided without any --flags, file mode is implied.

--depth N
	Maximum macro nesting depth (default 4096).

--steps N
	Maximum number of executed commands (default 10000000).

--digits N
	Maximum decimal digits a single operation may build, also caps the precision (default 1000000).

--help|-h
	Ignores all other options and prints this help message.

Log output is controlled by RUST_LOG, e.g. RUST_LOG=vdc=debug."##;

fn main() -> ExitCode {
	env_logger::init();

	//parse options
	let (mut e, mut f, mut h) = (false, false, false);
	let mut lim = Limits::default();
	let mut names: Vec<String> = Vec::new();
	let mut args = std::env::args().skip(1);	//skip name of binary
	while let Some(arg) = args.next() {
		if let Some(flag) = arg.strip_prefix("--") {	//long option
			match flag {
				"expr" => {e=true;}
				"file" => {f=true;}
				"help" => {h=true;}
				"depth"|"steps"|"digits" => {
					let Some(n) = args.next().and_then(|v| v.parse::<u64>().ok()) else {
						eprintln!("! --{flag} needs a non-negative integer");
						return ExitCode::from(2);
					};
					match flag {
						"depth" => {lim.max_depth = usize::try_from(n).unwrap_or(usize::MAX);}
						"steps" => {lim.max_steps = n;}
						_ => {lim.max_digits = n;}
					}
				}
				_ => {
					eprintln!("! Unrecognized option: --{flag}, use -h for help");
					return ExitCode::from(2);
				}
			}
			continue;
		}
		if arg.len() > 1 && arg.starts_with('-') {	//short option, multiple at once possible
			for flag in arg.chars().skip(1) {
				match flag {
					'e' => {e=true;}
					'f' => {f=true;}
					'h' => {h=true;}
					_ => {
						eprintln!("! Unrecognized option: -{flag}, use -h for help");
						return ExitCode::from(2);
					}
				}
			}
			continue;
		}
		names.push(arg);
	}

	if h {
		println!("{HELPMSG}");
		return ExitCode::SUCCESS;
	}

	let script = match (e, f) {
		(true, true) => {
			eprintln!("! Invalid options: both -e and -f present");
			return ExitCode::from(2);
		}
		(true, false) => {
			if names.is_empty() {
				eprintln!("! No expression provided");
				return ExitCode::from(2);
			}
			names.join("\n")
		}
		(false, _) if names.is_empty() => {
			if f {
				eprintln!("! No file name provided");
				return ExitCode::from(2);
			}
			let mut script = String::new();
			if let Err(err) = std::io::stdin().read_to_string(&mut script) {
				eprintln!("! Unable to read standard input: {err}");
				return ExitCode::from(2);
			}
			script
		}
		(false, _) => {
			let mut script = String::new();
			for file in &names {
				match std::fs::read_to_string(file) {
					Ok(text) => {
						script.push_str(&text);
						script.push('\n');
					}
					Err(err) => {
						eprintln!("! Unable to read file \"{file}\": {err}");
						return ExitCode::from(2);
					}
				}
			}
			script
		}
	};

	let ev = evaluate_in(State::default().custom_limits(lim), &script);
	for line in ev.render().iter().rev() {
		println!("{line}");
	}
	match ev.error {
		Some(err) => {
			warn!("evaluation stopped with {} object(s) on the stack", ev.state.stack().len());
			eprintln!("! {}: {err}", err.kind());
			ExitCode::FAILURE
		}
		None => ExitCode::SUCCESS
	}
}
