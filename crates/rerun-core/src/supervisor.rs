use std::future::Future;

use tokio::io::AsyncRead;
use tokio::sync::mpsc;

use crate::child::{self, RunningChild};
use crate::error::Error;
use crate::trigger;
use crate::types::*;

pub struct SupervisorConfig {
	pub command: CommandSpec,
	pub cancel: CancelPolicy,
}

/// Keeps at most one invocation of the configured command alive, restarting
/// it on every trigger.
pub struct Supervisor {
	pub config: SupervisorConfig,
}

impl Supervisor {
	pub fn new(config: SupervisorConfig) -> Self {
		Self { config }
	}

	/// Reads triggers from `input` until it ends or fails.
	pub async fn run_stream<R>(&self, input: R) -> RunSummary
	where
		R: AsyncRead + Unpin + Send + 'static,
	{
		self.run_stream_until(input, std::future::pending()).await
	}

	/// Like [`Supervisor::run_stream`], but also stops when `shutdown` resolves.
	pub async fn run_stream_until<R, F>(&self, input: R, shutdown: F) -> RunSummary
	where
		R: AsyncRead + Unpin + Send + 'static,
		F: Future<Output = ()>,
	{
		let (events, reader) = trigger::spawn(input);
		let summary = self.run_until(events, shutdown).await;
		// Finished unless shutdown won the race, in which case it is parked on a read.
		if reader.is_finished() {
			if let Err(e) = reader.await {
				tracing::warn!("trigger reader failed: {}", e);
			}
		}
		summary
	}

	pub async fn run(&self, events: mpsc::Receiver<TriggerEvent>) -> RunSummary {
		self.run_until(events, std::future::pending()).await
	}

	/// The restart loop. Each iteration starts one child, waits for the next
	/// event, then cancels that child before acting on the event.
	pub async fn run_until<F>(
		&self,
		mut events: mpsc::Receiver<TriggerEvent>,
		shutdown: F,
	) -> RunSummary
	where
		F: Future<Output = ()>,
	{
		tokio::pin!(shutdown);
		let mut summary = RunSummary::default();

		loop {
			let current = self.start(&mut summary);

			let event = tokio::select! {
				event = events.recv() => event.unwrap_or(TriggerEvent::Closed),
				_ = &mut shutdown => {
					tracing::info!("shutting down");
					TriggerEvent::Closed
				}
			};

			if let Some(child) = current {
				self.cancel(child).await;
				summary.canceled += 1;
			}

			match event {
				TriggerEvent::Fire => continue,
				TriggerEvent::Closed => return summary,
				TriggerEvent::Failed(e) => {
					let err = Error::from(e);
					tracing::error!("{}", err);
					summary.error = Some(err);
					return summary;
				}
			}
		}
	}

	fn start(&self, summary: &mut RunSummary) -> Option<RunningChild> {
		tracing::info!("running {}", self.config.command);
		match child::start(&self.config.command, self.config.cancel) {
			Ok(child) => {
				summary.started += 1;
				Some(child)
			}
			Err(e) => {
				tracing::error!("{}", e);
				summary.start_failures += 1;
				None
			}
		}
	}

	async fn cancel(&self, child: RunningChild) {
		let canceled = child.cancel();
		if self.config.cancel.wait {
			canceled.exited().await;
		}
	}
}
