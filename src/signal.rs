use nix;
use nix::sys::signal::{self, SaFlags, SigAction, SigHandler, SigSet, Signal};

fn set_disposition(sig: Signal, handler: SigHandler) -> nix::Result<()> {
	let action = SigAction::new(handler, SaFlags::empty(), SigSet::empty());
	// Only SIG_IGN and SIG_DFL are ever installed, so no handler code can run.
	unsafe { signal::sigaction(sig, &action) }?;
	Ok(())
}

/// The interpreter itself keeps running when the operator hits ^C.
pub fn ignore_interrupt() -> nix::Result<()> {
	set_disposition(Signal::SIGINT, SigHandler::SigIgn)
}

/// Called in a child between fork and exec. An ignored disposition would
/// survive exec, so the job would become unkillable from the terminal.
pub fn default_interrupt() -> nix::Result<()> {
	set_disposition(Signal::SIGINT, SigHandler::SigDfl)
}

/// The Rust runtime starts with SIGPIPE ignored, and exec keeps ignored
/// dispositions. Children get it back so `yes | head -1` ends the way it
/// does in sh; the interpreter keeps seeing EPIPE as a write error.
pub fn restore_broken_pipe() -> nix::Result<()> {
	set_disposition(Signal::SIGPIPE, SigHandler::SigDfl)
}
