use crate::global;

use std::io::{BufRead,Write};

pub fn builtin_exit<R: BufRead, W: Write>(state: &mut global::State<R, W>) -> Result<global::Flow, global::Fatal> {
	let farewell = state.config.farewell;
	state.write(farewell)?;
	Ok(global::Flow::Exit)
}

/// Built-ins are matched against the whole line, not its first word:
/// `exit now` or ` exit` are left to `execvp`.
pub fn match_builtin<R: BufRead, W: Write>(line: &[u8]) -> Option<fn(&mut global::State<R, W>) -> Result<global::Flow, global::Fatal>> {
	match line {
		b"exit" => Some(builtin_exit),
		_ => None,
	}
}
