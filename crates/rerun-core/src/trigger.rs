use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::types::TriggerEvent;

/// Handoff depth between the reader and the restart loop.
pub const CHANNEL_CAPACITY: usize = 1;

/// Spawns a reader task over `input` and returns the receiving end of its events.
pub fn spawn<R>(input: R) -> (mpsc::Receiver<TriggerEvent>, JoinHandle<()>)
where
	R: AsyncRead + Unpin + Send + 'static,
{
	let (tx, rx) = mpsc::channel(CHANNEL_CAPACITY);
	let handle = tokio::spawn(read_triggers(input, tx));
	(rx, handle)
}

/// Sends one `Fire` per newline-terminated line, then exactly one terminal
/// event. A trailing fragment without a newline does not fire.
pub async fn read_triggers<R>(input: R, tx: mpsc::Sender<TriggerEvent>)
where
	R: AsyncRead + Unpin,
{
	let mut reader = BufReader::new(input);
	let mut line = Vec::new();

	loop {
		line.clear();
		let event = match reader.read_until(b'\n', &mut line).await {
			Ok(_) if line.last() == Some(&b'\n') => TriggerEvent::Fire,
			Ok(_) => TriggerEvent::Closed,
			Err(e) => TriggerEvent::Failed(e),
		};

		let terminal = event.is_terminal();
		if tx.send(event).await.is_err() {
			tracing::debug!("trigger receiver gone, stopping reader");
			return;
		}
		if terminal {
			tracing::debug!("trigger stream finished");
			return;
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::io;
	use std::pin::Pin;
	use std::task::{Context, Poll};
	use tokio::io::{AsyncWriteExt, ReadBuf};

	struct BrokenPipe;

	impl AsyncRead for BrokenPipe {
		fn poll_read(
			self: Pin<&mut Self>,
			_cx: &mut Context<'_>,
			_buf: &mut ReadBuf<'_>,
		) -> Poll<io::Result<()>> {
			Poll::Ready(Err(io::ErrorKind::BrokenPipe.into()))
		}
	}

	fn tag(event: &TriggerEvent) -> &'static str {
		match event {
			TriggerEvent::Fire => "fire",
			TriggerEvent::Closed => "closed",
			TriggerEvent::Failed(_) => "failed",
		}
	}

	async fn collect<R: AsyncRead + Unpin>(input: R) -> Vec<TriggerEvent> {
		let (tx, mut rx) = mpsc::channel(16);
		read_triggers(input, tx).await;
		let mut events = Vec::new();
		while let Some(event) = rx.recv().await {
			events.push(event);
		}
		events
	}

	#[tokio::test]
	async fn every_line_fires_including_empty() {
		let events = collect(&b"src/main.rs\n\n  \nlast\n"[..]).await;
		let tags: Vec<_> = events.iter().map(tag).collect();
		assert_eq!(tags, vec!["fire", "fire", "fire", "fire", "closed"]);
	}

	#[tokio::test]
	async fn empty_stream_only_closes() {
		let events = collect(&b""[..]).await;
		let tags: Vec<_> = events.iter().map(tag).collect();
		assert_eq!(tags, vec!["closed"]);
	}

	#[tokio::test]
	async fn trailing_fragment_does_not_fire() {
		let events = collect(&b"one\ntwo"[..]).await;
		let tags: Vec<_> = events.iter().map(tag).collect();
		assert_eq!(tags, vec!["fire", "closed"]);
	}

	#[tokio::test]
	async fn non_utf8_lines_fire() {
		let events = collect(&b"\xff\xfe\n"[..]).await;
		let tags: Vec<_> = events.iter().map(tag).collect();
		assert_eq!(tags, vec!["fire", "closed"]);
	}

	#[tokio::test]
	async fn read_error_is_terminal() {
		let events = collect(BrokenPipe).await;
		assert_eq!(events.len(), 1);
		match &events[0] {
			TriggerEvent::Failed(e) => assert_eq!(e.kind(), io::ErrorKind::BrokenPipe),
			other => panic!("expected failure, got {:?}", other),
		}
	}

	#[tokio::test]
	async fn stops_when_receiver_dropped() {
		let (tx, rx) = mpsc::channel(1);
		drop(rx);
		// Would loop forever on an endless stream if the send error were ignored.
		read_triggers(tokio::io::repeat(b'\n'), tx).await;
	}

	#[tokio::test]
	async fn delivers_in_order_through_single_slot() {
		let (mut writer, reader) = tokio::io::duplex(64);
		let (mut rx, handle) = spawn(reader);

		writer.write_all(b"a\nb\n").await.unwrap();
		assert!(matches!(rx.recv().await, Some(TriggerEvent::Fire)));
		assert!(matches!(rx.recv().await, Some(TriggerEvent::Fire)));

		drop(writer);
		assert!(matches!(rx.recv().await, Some(TriggerEvent::Closed)));
		assert!(rx.recv().await.is_none());
		handle.await.unwrap();
	}
}
