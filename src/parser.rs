use std::ffi::CString;

use libc;

use crate::types::*;

struct Parser<'a> {
	line: &'a [u8],
	i: usize,
}

impl<'a> Parser<'a> {
	fn proceed_while<F>(&mut self, f: F) where F: Fn(u8) -> bool {
		while let Some(c) = self.line.get(self.i) {
			if !f(*c) { break; }
			self.i += 1;
		}
	}

	// Same set as C's isspace in the "C" locale.
	fn is_whitespace(c: u8) -> bool {
		match c {
			b' ' | b'\t' | b'\n' | b'\x0b' | b'\x0c' | b'\r' => true,
			_ => false,
		}
	}

	fn is_letter(c: u8) -> bool {
		!Parser::is_whitespace(c)
	}

	fn skip_whitespaces(&mut self) {
		self.proceed_while(Parser::is_whitespace);
	}

	fn read_word(&mut self) -> &'a [u8] {
		let orig = self.i;
		self.proceed_while(Parser::is_letter);
		&self.line[orig .. self.i]
	}

	fn parse_argv(&mut self) -> Argv {
		let mut argv = Argv::new();
		while argv.len() < MAX_ARGS {
			self.skip_whitespaces();
			let word = self.read_word();
			if word.is_empty() {
				break;
			}
			// `parse` cut the line at its first NUL, so no word can contain one.
			if let Ok(word) = CString::new(word) {
				argv.push(word);
			}
		}
		argv
	}
}

/// Splits `line` into at most `MAX_ARGS` whitespace-separated words.
///
/// Anything from the first NUL byte on is ignored, as a C string would be.
/// Words past the limit are dropped.
pub fn parse(line: &[u8]) -> Argv {
	let end = line.iter().position(|&c| c == 0).unwrap_or(line.len());
	let mut parser = Parser { line: &line[.. end], i: 0 };
	parser.parse_argv()
}

/// True when the line ends in a lone `|` after at least one other word,
/// meaning the next line is the second stage of a pipeline.
pub fn is_pipe_head(argv: &Argv) -> bool {
	argv.len() > 1 && argv.last_is(PIPE_MARKER)
}

/// Finds a well-formed output redirection: the last `>` in the vector,
/// followed by exactly one filename and nothing else.
///
/// Returns the marker's position. A `>` in any other shape is not a
/// redirection and stays an ordinary argument.
pub fn find_redirect(words: &[CString]) -> Option<usize> {
	let pos = words.iter().rposition(|w| w.as_bytes() == REDIRECT_MARKER)?;
	if pos + 2 == words.len() {
		Some(pos)
	} else {
		None
	}
}

/// The command for the single-command path, with redirection resolved.
pub fn resolve(argv: &Argv) -> Command<'_> {
	let words = argv.words();
	match find_redirect(words) {
		Some(pos) => Command {
			arguments: &words[.. pos],
			redirect: Some(Redirect { target: words[pos + 1].as_c_str(), from: libc::STDOUT_FILENO }),
		},
		None => Command { arguments: words, redirect: None },
	}
}

/// Pairs the first line (ending in `|`) with the second.
/// The marker is stripped from the producer; the consumer is taken as is.
pub fn resolve_pipeline<'a>(head: &'a Argv, tail: &'a Argv) -> Pipeline<'a> {
	let words = head.words();
	let producer = if head.last_is(PIPE_MARKER) { &words[.. words.len() - 1] } else { words };
	Pipeline {
		producer: Command { arguments: producer, redirect: None },
		consumer: Command { arguments: tail.words(), redirect: None },
	}
}
