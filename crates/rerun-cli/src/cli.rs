use clap::error::ErrorKind;
use clap::Parser;
use nix::sys::signal::Signal;
use rerun_core::{parse_signal, CancelPolicy, CommandSpec, SupervisorConfig};

const USAGE: &str = "rerun runs the passed command for each line in standard input.
Previous invocations of the command are cancelled.

Usage:
	rerun [command]

Example:
	chokidar . | rerun go run main.go";

const HELP_TEMPLATE: &str = "{before-help}Flags:\n{options}";

#[derive(Debug, Parser)]
#[command(name = "rerun", version, before_help = USAGE, help_template = HELP_TEMPLATE)]
pub struct Cli {
	/// Signal sent to the previous invocation on each trigger
	#[arg(short, long, default_value = "KILL", value_parser = parse_signal)]
	pub signal: Signal,

	/// Start each invocation in its own process group and signal the whole group
	#[arg(short = 'g', long)]
	pub process_group: bool,

	/// Wait for the previous invocation to exit before starting the next
	#[arg(short, long)]
	pub wait: bool,

	/// Log child exit statuses
	#[arg(short, long)]
	pub verbose: bool,

	/// Command to run, followed by its arguments
	#[arg(value_name = "COMMAND", trailing_var_arg = true, allow_hyphen_values = true)]
	pub command: Vec<String>,
}

impl Cli {
	/// Parses process arguments. Help goes to stderr, like the rest of our output.
	pub fn parse_or_exit() -> Self {
		match Self::try_parse() {
			Ok(cli) => cli,
			Err(e) if e.kind() == ErrorKind::DisplayHelp => {
				eprint!("{}", e.render());
				std::process::exit(0);
			}
			Err(e) => e.exit(),
		}
	}

	pub fn into_config(self) -> Result<SupervisorConfig, rerun_core::Error> {
		Ok(SupervisorConfig {
			command: CommandSpec::from_argv(self.command)?,
			cancel: CancelPolicy {
				signal: self.signal,
				process_group: self.process_group,
				wait: self.wait,
			},
		})
	}
}
