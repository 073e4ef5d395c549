//! Bounded-channel adapter for async consumers
//!
//! A single blocking task drives a [`LocusRecords`] iterator and pushes each
//! item into a bounded `mpsc` channel. The producer only runs ahead of the
//! consumer by the channel capacity and stops once the receiver is dropped.

use crate::models::LocusRecord;
use crate::reader::{LocusRecords, ParseSummary};
use loci_common::{LociError, Result};
use std::io::BufRead;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::debug;

/// Receiving half of a record channel plus its producer task
pub struct RecordChannel {
    pub receiver: mpsc::Receiver<Result<LocusRecord>>,
    producer: JoinHandle<ParseSummary>,
}

impl RecordChannel {
    pub async fn recv(&mut self) -> Option<Result<LocusRecord>> {
        self.receiver.recv().await
    }

    /// Wait for the producer and return its run summary
    ///
    /// Drops the receiver first, so calling this before the channel is
    /// drained stops production early.
    pub async fn finish(self) -> Result<ParseSummary> {
        drop(self.receiver);
        self.producer
            .await
            .map_err(|e| LociError::Channel(format!("producer task failed: {}", e)))
    }
}

/// Move `records` onto a blocking task feeding a channel of `capacity` slots
pub fn spawn_records<R>(records: LocusRecords<R>, capacity: usize) -> RecordChannel
where
    R: BufRead + Send + 'static,
{
    let (tx, receiver) = mpsc::channel(capacity.max(1));

    let producer = tokio::task::spawn_blocking(move || {
        let mut records = records;
        for item in records.by_ref() {
            let is_err = item.is_err();
            if tx.blocking_send(item).is_err() {
                debug!("record receiver dropped, stopping producer");
                break;
            }
            if is_err {
                break;
            }
        }
        records.into_summary()
    });

    RecordChannel { receiver, producer }
}
