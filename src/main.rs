mod builtin;
mod eval;
mod global;
mod job;
mod parser;
mod signal;
mod types;

use std::io;
use std::process;
use io::BufRead;
use io::Write;

use global::{Fatal, Flow, State};
use types::Argv;

fn eval_single<R: BufRead, W: Write>(state: &mut State<R, W>, argv: &Argv) -> Result<Flow, Fatal> {
	let command = parser::resolve(argv);
	match eval::eval_command(&command) {
		Ok(_) => {
			let line = format!("{}{}\n", state.config.diagnostic_prefix, command);
			state.write(line.as_bytes())?;
		},
		Err(e) => global::report(global::NAME, &e),
	}
	Ok(Flow::Continue)
}

fn eval_pipeline<R: BufRead, W: Write>(state: &mut State<R, W>, head: &Argv) -> Result<Flow, Fatal> {
	let continuation_prompt = state.config.continuation_prompt;
	state.write(continuation_prompt)?;
	let tail = match state.read_line() {
		Ok(Some(line)) => parser::parse(&line),
		Ok(None) => Argv::new(),
		Err(e) => {
			global::report(&format!("{}: read", global::NAME), &e);
			return Ok(Flow::Continue);
		},
	};
	if tail.is_empty() {
		global::report(global::NAME, &"missing command after '|'");
		return Ok(Flow::Continue);
	}
	if let Err(e) = eval::eval_pipeline(&parser::resolve_pipeline(head, &tail)) {
		global::report(global::NAME, &e);
	}
	Ok(Flow::Continue)
}

fn step<R: BufRead, W: Write>(state: &mut State<R, W>) -> Result<Flow, Fatal> {
	let prompt = state.config.prompt;
	state.write(prompt)?;
	let line = match state.read_line().map_err(Fatal::Read)? {
		Some(line) => line,
		None => return builtin::builtin_exit(state),
	};
	if line.is_empty() {
		return Ok(Flow::Continue);
	}
	if let Some(builtin) = builtin::match_builtin(&line) {
		return builtin(state);
	}
	let argv = parser::parse(&line);
	if argv.is_empty() {
		Ok(Flow::Continue)
	} else if parser::is_pipe_head(&argv) {
		eval_pipeline(state, &argv)
	} else {
		eval_single(state, &argv)
	}
}

fn run<R: BufRead, W: Write>(state: &mut State<R, W>) -> Result<(), Fatal> {
	while step(state)? == Flow::Continue {}
	Ok(())
}

fn main() {
	if let Err(e) = signal::ignore_interrupt() {
		global::report(&format!("{}: sigaction", global::NAME), &e);
		process::exit(1);
	}
	let stdin = io::stdin();
	let mut state = State::new(stdin.lock(), io::stdout(), global::Config::default());
	if let Err(e) = run(&mut state) {
		global::report(global::NAME, &e);
		process::exit(1);
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::{env,fs};
	use std::io::Cursor;

	fn run_lines(input: &[u8]) -> String {
		let mut state = State::new(Cursor::new(input.to_vec()), vec![], global::Config::default());
		run(&mut state).unwrap();
		String::from_utf8(state.output().clone()).unwrap()
	}

	#[test]
	fn exit_ends_the_loop() {
		assert_eq!(run_lines(b"exit\nnever reached\n"), "$ Exiting...\n");
	}

	#[test]
	fn end_of_input_ends_the_loop() {
		assert_eq!(run_lines(b""), "$ Exiting...\n");
	}

	#[test]
	fn blank_lines_just_prompt_again() {
		assert_eq!(run_lines(b"\n \t \nexit\n"), "$ $ $ Exiting...\n");
	}

	#[test]
	fn single_command_reports_its_arguments() {
		assert_eq!(run_lines(b"true a b\nexit\n"),
			"$ Arguments after execution: \"true\" \"a\" \"b\" NULL\n$ Exiting...\n");
	}

	#[test]
	fn redirected_command_reports_only_exec_arguments() {
		let path = env::temp_dir().join(format!("minish-main-{}", process::id()));
		let input = format!("echo hello > {}\nexit\n", path.display());
		let output = run_lines(input.as_bytes());
		assert_eq!(output, "$ Arguments after execution: \"echo\" \"hello\" NULL\n$ Exiting...\n");
		assert_eq!(fs::read_to_string(&path).unwrap(), "hello\n");
		let _ = fs::remove_file(&path);
	}

	#[test]
	fn exit_with_arguments_is_an_ordinary_command() {
		let output = run_lines(b"exit now\nexit\n");
		assert!(output.contains("\"exit\" \"now\" NULL\n"));
		assert!(output.ends_with("$ Exiting...\n"));
	}

	#[test]
	fn pipeline_without_second_command_is_abandoned() {
		assert_eq!(run_lines(b"echo hi |\n   \nexit\n"), "$ > $ Exiting...\n");
	}

	#[test]
	fn pipeline_reads_its_second_stage() {
		let path = env::temp_dir().join(format!("minish-main-pipe-{}", process::id()));
		let head = format!("echo hello > {} |\n", path.display());
		// The producer keeps `>` as an argument: no redirection on pipeline stages.
		let input = format!("{}true\nexit\n", head);
		assert_eq!(run_lines(input.as_bytes()), "$ > $ Exiting...\n");
		assert!(!path.exists());
	}

	struct Broken;
	impl Write for Broken {
		fn write(&mut self, _: &[u8]) -> io::Result<usize> {
			Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
		}
		fn flush(&mut self) -> io::Result<()> {
			Ok(())
		}
	}

	#[test]
	fn write_failure_is_fatal() {
		let mut state = State::new(Cursor::new(b"true\n".to_vec()), Broken, global::Config::default());
		match run(&mut state) {
			Err(Fatal::Write(_)) => (),
			other => panic!("unexpected {:?}", other),
		}
	}

	#[test]
	fn prompts_come_from_config() {
		let config = global::Config { prompt: b"% ", ..global::Config::default() };
		let mut state = State::new(Cursor::new(b"\nexit\n".to_vec()), vec![], config);
		run(&mut state).unwrap();
		assert_eq!(state.output(), &b"% % Exiting...\n".to_vec());
	}
}
