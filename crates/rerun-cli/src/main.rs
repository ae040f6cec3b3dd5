mod cli;

use rerun_core::Supervisor;
use tracing::Level;

#[tokio::main]
async fn main() {
	let cli = cli::Cli::parse_or_exit();
	init_logging(cli.verbose);

	let config = match cli.into_config() {
		Ok(config) => config,
		Err(e) => {
			tracing::error!("{}", e);
			std::process::exit(1);
		}
	};

	let supervisor = Supervisor::new(config);
	supervisor
		.run_stream_until(tokio::io::stdin(), async {
			let _ = tokio::signal::ctrl_c().await;
		})
		.await;

	// After an interrupt the stdin reader is still blocked on a read that the
	// runtime cannot cancel, so leave without waiting for it.
	std::process::exit(0);
}

/// Plain lines on stderr: no timestamp, level or target.
fn init_logging(verbose: bool) {
	let level = if verbose { Level::DEBUG } else { Level::INFO };
	tracing_subscriber::fmt()
		.with_max_level(level)
		.with_writer(std::io::stderr)
		.without_time()
		.with_level(false)
		.with_target(false)
		.init();
}
