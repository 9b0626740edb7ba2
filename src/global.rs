use std::{error,fmt,io};
use std::io::{BufRead,Read,Write};

pub const NAME: &'static str = "minish";

pub const PROMPT: &'static [u8] = b"$ ";
pub const CONTINUATION_PROMPT: &'static [u8] = b"> ";
pub const FAREWELL: &'static [u8] = b"Exiting...\n";
pub const DIAGNOSTIC_PREFIX: &'static str = "Arguments after execution: ";
pub const LINE_MAX: usize = 1024;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
	pub prompt: &'static [u8],
	pub continuation_prompt: &'static [u8],
	pub farewell: &'static [u8],
	pub diagnostic_prefix: &'static str,
	/// Longest line returned by one read; the rest comes back as the next line.
	pub line_max: usize,
}

impl Default for Config {
	fn default() -> Config {
		Config {
			prompt: PROMPT,
			continuation_prompt: CONTINUATION_PROMPT,
			farewell: FAREWELL,
			diagnostic_prefix: DIAGNOSTIC_PREFIX,
			line_max: LINE_MAX,
		}
	}
}

/// Errors that end the interpreter.
#[derive(Debug)]
pub enum Fatal {
	Read(io::Error),
	Write(io::Error),
}
impl fmt::Display for Fatal {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		match *self {
			Fatal::Read(ref e) => write!(f, "read: {}", e),
			Fatal::Write(ref e) => write!(f, "write: {}", e),
		}
	}
}
impl error::Error for Fatal {
	fn source(&self) -> Option<&(dyn error::Error + 'static)> {
		match *self {
			Fatal::Read(ref e) => Some(e),
			Fatal::Write(ref e) => Some(e),
		}
	}
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Flow { Continue, Exit }

pub struct State<R, W> {
	pub config: Config,
	input: R,
	output: W,
}

impl<R: BufRead, W: Write> State<R, W> {
	pub fn new(input: R, output: W, config: Config) -> State<R, W> {
		State { config: config, input: input, output: output }
	}

	/// Reads one line without its trailing newline. `None` means end of input.
	pub fn read_line(&mut self) -> io::Result<Option<Vec<u8>>> {
		let mut line: Vec<u8> = vec![];
		let n = (&mut self.input).take(self.config.line_max as u64).read_until(b'\n', &mut line)?;
		if n == 0 {
			return Ok(None);
		}
		if line.last() == Some(&b'\n') {
			line.pop();
		}
		Ok(Some(line))
	}

	/// Writes and flushes, so nothing is left buffered when a child is forked.
	pub fn write(&mut self, bytes: &[u8]) -> Result<(), Fatal> {
		self.output.write_all(bytes).map_err(Fatal::Write)?;
		self.output.flush().map_err(Fatal::Write)
	}

	#[cfg(test)]
	pub fn output(&self) -> &W {
		&self.output
	}
}

/// One line on stderr. Failing to write it is not worth reporting.
pub fn report(context: &str, e: &dyn fmt::Display) {
	let _ = writeln!(&mut io::stderr(), "{}: {}", context, e);
}
