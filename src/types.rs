use std::ffi::{CStr, CString};
use std::fmt;
use std::os::unix::io::RawFd;

pub const MAX_ARGS: usize = 16;

pub const REDIRECT_MARKER: &'static [u8] = b">";
pub const PIPE_MARKER: &'static [u8] = b"|";

/// Owned words of one command line, at most `MAX_ARGS` of them.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Argv {
	words: Vec<CString>,
}

impl Argv {
	pub fn new() -> Argv {
		Argv { words: Vec::with_capacity(MAX_ARGS) }
	}

	pub fn push(&mut self, word: CString) {
		self.words.push(word);
	}

	pub fn len(&self) -> usize {
		self.words.len()
	}

	pub fn is_empty(&self) -> bool {
		self.words.is_empty()
	}

	pub fn words(&self) -> &[CString] {
		&self.words
	}

	pub fn last_is(&self, marker: &[u8]) -> bool {
		self.words.last().map_or(false, |w| w.as_bytes() == marker)
	}
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct Redirect<'a> {
	pub target: &'a CStr,
	pub from: RawFd,
}

/// The part of an `Argv` handed to exec, plus how the child's descriptors are set up.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct Command<'a> {
	pub arguments: &'a [CString],
	pub redirect: Option<Redirect<'a>>,
}

impl<'a> Command<'a> {
	pub fn name(&self) -> Option<&'a CStr> {
		self.arguments.first().map(|w| w.as_c_str())
	}
}

/// Renders the arguments the way the loop reports them after a command ran:
/// every word quoted, then `NULL`.
impl<'a> fmt::Display for Command<'a> {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		for word in self.arguments {
			write!(f, "\"{}\" ", word.to_string_lossy())?;
		}
		write!(f, "NULL")
	}
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct Pipeline<'a> {
	pub producer: Command<'a>,
	pub consumer: Command<'a>,
}
