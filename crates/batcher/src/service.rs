//! Watch-and-flush service
//!
//! Runs the two concurrent activities of the batcher on one task: the
//! filesystem event stream and the periodic flush tick, merged with the
//! stop signal into a single message stream.

use crate::{BatcherError, ChangeBatcher, UploadSink};
use async_channel as chan;
use futures::StreamExt;
use futures_concurrency::stream::Merge;
use skiff_fs_events::{FsEvent, FsEventWatcher};
use std::pin::pin;
use std::time::Duration;
use tokio::{
	spawn,
	task::JoinHandle,
	time::{interval_at, Instant, MissedTickBehavior},
};
use tokio_stream::wrappers::IntervalStream;
use tracing::{debug, error, info, trace};

/// Owns the watcher subscription and the flush loop for one batcher.
pub struct ChangeBatcherService {
	handle: Option<JoinHandle<()>>,
	stop_tx: chan::Sender<()>,
}

impl ChangeBatcherService {
	/// Subscribe to the batcher's watch root and start the loop.
	///
	/// Fails if the watch root is missing; there is nothing sensible to
	/// do in that case but exit before the loop ever starts.
	pub fn start<S: UploadSink + 'static>(
		batcher: ChangeBatcher<S>,
		flush_interval: Duration,
	) -> Result<Self, BatcherError> {
		let watcher = FsEventWatcher::new(batcher.root(), true)?;
		let (stop_tx, stop_rx) = chan::bounded(1);

		info!(
			root = %batcher.root().display(),
			interval_secs = flush_interval.as_secs_f64(),
			key = batcher.destination_key(),
			"Watching for changes"
		);

		let handle = spawn(Self::run(watcher, batcher, flush_interval, stop_rx));

		Ok(Self {
			handle: Some(handle),
			stop_tx,
		})
	}

	async fn run<S: UploadSink>(
		watcher: FsEventWatcher,
		batcher: ChangeBatcher<S>,
		flush_interval: Duration,
		stop_rx: chan::Receiver<()>,
	) {
		enum StreamMessage {
			NewEvent(FsEvent),
			Tick,
			Stop,
		}

		let events_rx = watcher.events();

		let mut flush_tick = interval_at(Instant::now() + flush_interval, flush_interval);
		// In case of doubt check: https://docs.rs/tokio/latest/tokio/time/enum.MissedTickBehavior.html
		flush_tick.set_missed_tick_behavior(MissedTickBehavior::Delay);

		let mut msg_stream = pin!((
			events_rx.map(StreamMessage::NewEvent),
			IntervalStream::new(flush_tick).map(|_| StreamMessage::Tick),
			stop_rx.map(|()| StreamMessage::Stop),
		)
			.merge());

		while let Some(msg) = msg_stream.next().await {
			match msg {
				StreamMessage::NewEvent(event) => {
					// Directory-only events carry no upload obligation
					if event.is_directory {
						trace!(path = %event.path.display(), "Ignoring directory event");
						continue;
					}
					batcher.record(event.path).await;
				}

				StreamMessage::Tick => {
					if let Err(e) = batcher.flush_cycle().await {
						error!(?e, "Flush cycle failed; pending changes kept for retry;");
					}
				}

				StreamMessage::Stop => {
					debug!("Change batcher received stop signal");
					break;
				}
			}
		}

		info!("Change batcher service stopped");
	}

	/// Signal the loop to stop and wait for it to wind down. An
	/// in-flight flush is allowed to finish; no final partial batch is
	/// uploaded.
	pub async fn stop(mut self) {
		self.stop_tx.send(()).await.ok();
		if let Some(handle) = self.handle.take() {
			if let Err(e) = handle.await {
				if e.is_panic() {
					error!(?e, "Change batcher task panicked;");
				}
			}
		}
	}
}
