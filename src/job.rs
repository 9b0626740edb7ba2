use nix;
use nix::errno::Errno;
use nix::unistd::{self, Pid};
use nix::sys::wait::{self, WaitStatus};

#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Copy)]
pub enum State { Active, Stopped, Terminated }

pub trait WaitStatusExt {
	fn state(self) -> State;
}

impl WaitStatusExt for WaitStatus {
	fn state(self) -> State {
		match self {
			WaitStatus::Exited(..) | WaitStatus::Signaled(..) => State::Terminated,
			WaitStatus::Continued(..) | WaitStatus::StillAlive => State::Active,
			_ => State::Stopped,
		}
	}
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct Process {
	pub pid: Pid,
	pub status: WaitStatus,
}

/// Children spawned for one command line, in the order they were forked.
#[derive(Debug)]
pub struct Job {
	pub processes: Vec<Process>,
}

impl Job {
	pub fn state(&self) -> State {
		self.processes.iter().map(|pr| pr.status.state()).min().unwrap_or(State::Terminated)
	}

	/// Blocks on every child in spawn order. Each child is waited on exactly once.
	pub fn wait(mut self) -> nix::Result<Job> {
		for pr in self.processes.iter_mut() {
			let pid = pr.pid;
			pr.status = syscall(|| wait::waitpid(pid, None))?;
		}
		debug_assert_eq!(self.state(), State::Terminated);
		Ok(self)
	}
}

#[derive(Debug)]
pub struct JobBuilder {
	imp: Job,
}

impl JobBuilder {
	pub fn new(size_hint: usize) -> JobBuilder {
		JobBuilder {
			imp: Job { processes: Vec::with_capacity(size_hint) }
		}
	}

	pub fn push_fork(&mut self) -> nix::Result<unistd::ForkResult> {
		// The interpreter runs a single thread, so the child may keep going
		// in Rust code until it execs.
		let r = unsafe { unistd::fork() }?;
		if let unistd::ForkResult::Parent{ child } = r {
			self.imp.processes.push(Process { pid: child, status: WaitStatus::StillAlive });
		}
		Ok(r)
	}

	pub fn build(self) -> Job {
		self.imp
	}
}

/// Retries a call interrupted by a signal.
fn syscall<F, T>(f: F) -> nix::Result<T> where F: Fn() -> nix::Result<T> {
	loop {
		match f() {
			Err(Errno::EINTR) => (),
			result => return result,
		}
	}
}
