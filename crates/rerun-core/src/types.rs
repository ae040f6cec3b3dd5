use std::fmt;
use std::io;
use std::str::FromStr;

use nix::sys::signal::Signal;

use crate::error::Error;

/// Program and arguments for one invocation. Fixed for the lifetime of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
	program: String,
	args: Vec<String>,
}

impl CommandSpec {
	/// Builds a spec from an argv whose first element is the program.
	pub fn from_argv<I, S>(argv: I) -> Result<Self, Error>
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		let mut argv = argv.into_iter().map(Into::into);
		let program = argv
			.next()
			.ok_or_else(|| Error::Usage("must provide command to run".to_string()))?;
		Ok(Self {
			program,
			args: argv.collect(),
		})
	}

	pub fn program(&self) -> &str {
		&self.program
	}

	pub fn args(&self) -> &[String] {
		&self.args
	}

	pub fn argv(&self) -> Vec<&str> {
		std::iter::once(self.program.as_str())
			.chain(self.args.iter().map(String::as_str))
			.collect()
	}
}

impl fmt::Display for CommandSpec {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{:?}", self.argv())
	}
}

/// How a superseded child is told to stop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CancelPolicy {
	pub signal: Signal,
	/// Start children in their own process group and signal the whole group.
	pub process_group: bool,
	/// Wait for the canceled child to exit before moving on.
	pub wait: bool,
}

impl Default for CancelPolicy {
	fn default() -> Self {
		Self {
			signal: Signal::SIGKILL,
			process_group: false,
			wait: false,
		}
	}
}

/// Parses `TERM`, `sigterm` or `SIGTERM` style names.
pub fn parse_signal(name: &str) -> Result<Signal, Error> {
	let upper = name.trim().to_ascii_uppercase();
	let full = if upper.starts_with("SIG") {
		upper
	} else {
		format!("SIG{}", upper)
	};
	Signal::from_str(&full).map_err(|_| Error::Usage(format!("unknown signal: {}", name)))
}

/// One unit of input from the trigger reader.
#[derive(Debug)]
pub enum TriggerEvent {
	/// A complete line arrived.
	Fire,
	/// The stream ended cleanly.
	Closed,
	/// Reading the stream failed.
	Failed(io::Error),
}

impl TriggerEvent {
	pub fn is_terminal(&self) -> bool {
		!matches!(self, TriggerEvent::Fire)
	}
}

/// What happened over the life of a run.
#[derive(Debug, Default)]
pub struct RunSummary {
	/// Children that started successfully.
	pub started: usize,
	/// Starts that failed, logged and skipped until the next trigger.
	pub start_failures: usize,
	/// Cancellations issued. Equals `started` once the run has returned.
	pub canceled: usize,
	/// Set when the trigger stream ended with a read error.
	pub error: Option<Error>,
}
