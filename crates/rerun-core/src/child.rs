use std::process::Stdio;

use nix::errno::Errno;
use nix::sys::signal::{kill, killpg};
use nix::unistd::Pid;
use tokio::process::{Child, Command};
use tokio::task::JoinHandle;

use crate::error::Error;
use crate::types::{CancelPolicy, CommandSpec};

/// The single live invocation owned by the restart loop.
pub struct RunningChild {
	child: Child,
	policy: CancelPolicy,
}

/// A child that has been told to stop. Its exit is reaped in the background.
pub struct Canceled {
	pid: Option<u32>,
	reaper: JoinHandle<()>,
}

/// Starts `spec` with stdout/stderr inherited and stdin on the null device.
///
/// Stdin is never shared with the child since it carries the trigger feed.
pub fn start(spec: &CommandSpec, policy: CancelPolicy) -> Result<RunningChild, Error> {
	let mut cmd = Command::new(spec.program());
	cmd.args(spec.args())
		.stdin(Stdio::null())
		.stdout(Stdio::inherit())
		.stderr(Stdio::inherit());

	if policy.process_group {
		cmd.process_group(0);
	}

	let child = cmd.spawn().map_err(|source| Error::Spawn {
		program: spec.program().to_string(),
		source,
	})?;

	Ok(RunningChild { child, policy })
}

impl RunningChild {
	pub fn id(&self) -> Option<u32> {
		self.child.id()
	}

	/// Requests termination without waiting for it.
	///
	/// A child that already exited on its own is not signalled, unless it leads
	/// its own process group: orphans left in the group are signalled anyway.
	/// Delivery failures are logged, never returned: the loop moves on regardless.
	pub fn cancel(self) -> Canceled {
		let RunningChild { mut child, policy } = self;
		let pid = child.id();

		// The leader stays an unreaped zombie until try_wait, so its pgid is still valid here.
		if policy.process_group {
			if let Some(pid) = pid {
				deliver(pid, policy);
			}
		}

		match child.try_wait() {
			Ok(Some(status)) => {
				tracing::debug!("pid {} already exited ({})", pid.unwrap_or(0), status);
			}
			Ok(None) if !policy.process_group => {
				if let Some(pid) = pid {
					deliver(pid, policy);
				}
			}
			Ok(None) => {}
			Err(e) => tracing::warn!("failed to poll child: {}", e),
		}

		let reaper = tokio::spawn(async move {
			match child.wait().await {
				Ok(status) => tracing::debug!("pid {} exited ({})", pid.unwrap_or(0), status),
				Err(e) => tracing::debug!("failed to reap pid {}: {}", pid.unwrap_or(0), e),
			}
		});

		Canceled { pid, reaper }
	}
}

impl Canceled {
	pub fn pid(&self) -> Option<u32> {
		self.pid
	}

	/// Resolves once the canceled child has been reaped.
	pub async fn exited(self) {
		if let Err(e) = self.reaper.await {
			tracing::warn!("reaper task failed: {}", e);
		}
	}
}

fn deliver(pid: u32, policy: CancelPolicy) {
	match signal(pid, policy) {
		Ok(()) => {}
		Err(Error::Signal { source: Errno::ESRCH, .. }) => {
			tracing::debug!("pid {} already gone", pid);
		}
		Err(e) => tracing::warn!("{}", e),
	}
}

fn signal(pid: u32, policy: CancelPolicy) -> Result<(), Error> {
	let target = Pid::from_raw(pid as i32);
	let result = if policy.process_group {
		killpg(target, policy.signal)
	} else {
		kill(target, policy.signal)
	};
	result.map_err(|source| Error::Signal { pid, source })
}
