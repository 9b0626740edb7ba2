use crate::global;
use crate::job;
use crate::signal;
use crate::types::*;

use std::{error,fmt,fs,io};
use std::convert::Infallible;
use std::ffi::OsStr;
use std::os::unix::ffi::OsStrExt;
use std::os::unix::io::{IntoRawFd,RawFd};
use nix;
use nix::unistd;
use libc;

const EXEC_FAILURE: libc::c_int = 127;
const SETUP_FAILURE: libc::c_int = 1;

#[derive(Debug)]
pub enum ExecError {
	NixError(nix::Error),
	IoError(io::Error),
	EmptyCommand,
}
impl From<nix::Error> for ExecError {
	fn from(e: nix::Error) -> ExecError {
		ExecError::NixError(e)
	}
}
impl From<io::Error> for ExecError {
	fn from(e: io::Error) -> ExecError {
		ExecError::IoError(e)
	}
}
impl fmt::Display for ExecError {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		match *self {
			ExecError::NixError(ref e) => write!(f, "{}", e.desc()),
			ExecError::IoError(ref e) => write!(f, "{}", e),
			ExecError::EmptyCommand => write!(f, "empty command"),
		}
	}
}
impl error::Error for ExecError {
	fn source(&self) -> Option<&(dyn error::Error + 'static)> {
		match *self {
			ExecError::NixError(ref e) => Some(e),
			ExecError::IoError(ref e) => Some(e),
			ExecError::EmptyCommand => None,
		}
	}
}

/// Both ends of the pipe between the two stages. Dropping it closes
/// whatever is still open in the process that drops it.
#[derive(Debug)]
pub struct PipeEnds {
	read: RawFd,
	write: RawFd,
	open: bool,
}

impl PipeEnds {
	pub fn open() -> nix::Result<PipeEnds> {
		let (read, write) = unistd::pipe()?;
		Ok(PipeEnds { read: read.into_raw_fd(), write: write.into_raw_fd(), open: true })
	}

	pub fn close(&mut self) {
		if self.open {
			let _ = unistd::close(self.read);
			let _ = unistd::close(self.write);
			self.open = false;
		}
	}
}

impl Drop for PipeEnds {
	fn drop(&mut self) {
		self.close();
	}
}

/// How a child sets up its standard descriptors before exec.
/// Each role closes the descriptor it does not use, then moves the one it
/// does onto the standard descriptor.
#[derive(Debug, Clone, Copy)]
pub enum Wiring<'a> {
	Inherit,
	Redirect(Redirect<'a>),
	PipeWrite(&'a PipeEnds),
	PipeRead(&'a PipeEnds),
}

impl<'a> Wiring<'a> {
	pub fn for_command(command: &Command<'a>) -> Wiring<'a> {
		match command.redirect {
			Some(redirect) => Wiring::Redirect(redirect),
			None => Wiring::Inherit,
		}
	}

	fn apply(self) -> Result<(), ExecError> {
		match self {
			Wiring::Inherit => Ok(()),
			Wiring::Redirect(redirect) => {
				let file = fs::OpenOptions::new()
					.write(true)
					.create(true)
					.truncate(true)
					.open(OsStr::from_bytes(redirect.target.to_bytes()))?;
				splice(None, file.into_raw_fd(), redirect.from)
			},
			Wiring::PipeWrite(pipe) => splice(Some(pipe.read), pipe.write, libc::STDOUT_FILENO),
			Wiring::PipeRead(pipe) => splice(Some(pipe.write), pipe.read, libc::STDIN_FILENO),
		}
	}
}

fn splice(unused: Option<RawFd>, fd: RawFd, onto: RawFd) -> Result<(), ExecError> {
	if let Some(unused) = unused {
		unistd::close(unused)?;
	}
	if fd != onto {
		unistd::dup2(fd, onto)?;
		unistd::close(fd)?;
	}
	Ok(())
}

fn do_exec_command(command: &Command) -> Result<Infallible, ExecError> {
	let name = command.name().ok_or(ExecError::EmptyCommand)?;
	match unistd::execvp(name, command.arguments)? {}
}

fn exec_command(command: &Command, wiring: Wiring) -> ! {
	let name = command.name().map_or("".into(), |n| n.to_string_lossy());
	let setup = signal::default_interrupt()
		.and_then(|_| signal::restore_broken_pipe())
		.map_err(ExecError::from)
		.and_then(|_| wiring.apply());
	let status = match setup {
		Err(e) => {
			global::report(&name, &e);
			SETUP_FAILURE
		},
		Ok(()) => match do_exec_command(command) {
			Ok(never) => match never {},
			Err(e) => {
				global::report(&name, &e);
				EXEC_FAILURE
			},
		},
	};
	unsafe{ libc::_exit(status) }
}

fn spawn_command(job_builder: &mut job::JobBuilder, command: &Command, wiring: Wiring) -> Result<(), ExecError> {
	match job_builder.push_fork()? {
		unistd::ForkResult::Parent{..} => Ok(()),
		unistd::ForkResult::Child => exec_command(command, wiring),
	}
}

/// Runs one command to completion.
pub fn eval_command(command: &Command) -> Result<job::Job, ExecError> {
	let mut job_builder = job::JobBuilder::new(1);
	spawn_command(&mut job_builder, command, Wiring::for_command(command))?;
	Ok(job_builder.build().wait()?)
}

/// Runs `producer | consumer` and waits for both, producer first.
///
/// The parent's copies of the pipe are closed as soon as both children
/// exist, so the consumer sees EOF once the producer is gone. A failed
/// second fork still reaps the first child before the error is returned.
pub fn eval_pipeline(pipeline: &Pipeline) -> Result<job::Job, ExecError> {
	let mut pipe = PipeEnds::open()?;
	let mut job_builder = job::JobBuilder::new(2);
	let spawned = spawn_command(&mut job_builder, &pipeline.producer, Wiring::PipeWrite(&pipe))
		.and_then(|_| spawn_command(&mut job_builder, &pipeline.consumer, Wiring::PipeRead(&pipe)));
	pipe.close();
	let job = job_builder.build().wait()?;
	spawned?;
	Ok(job)
}
