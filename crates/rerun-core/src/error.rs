use std::io;

/// Errors from starting, signalling and feeding the restart loop.
#[derive(Debug)]
pub enum Error {
	/// Invalid invocation (no command, unknown signal name).
	Usage(String),
	/// The child process could not be started.
	Spawn { program: String, source: io::Error },
	/// A cancellation signal could not be delivered.
	Signal { pid: u32, source: nix::Error },
	/// IO error on the trigger stream.
	Io(io::Error),
}

impl std::fmt::Display for Error {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Error::Usage(msg) => write!(f, "{}", msg),
			Error::Spawn { program, source } => write!(f, "failed to start {:?}: {}", program, source),
			Error::Signal { pid, source } => write!(f, "failed to signal pid {}: {}", pid, source),
			Error::Io(e) => write!(f, "read error: {}", e),
		}
	}
}

impl std::error::Error for Error {
	fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
		match self {
			Error::Usage(_) => None,
			Error::Spawn { source, .. } => Some(source),
			Error::Signal { source, .. } => Some(source),
			Error::Io(e) => Some(e),
		}
	}
}

impl From<io::Error> for Error {
	fn from(e: io::Error) -> Self {
		Error::Io(e)
	}
}
