//! Bounded FIFO of pending ride requests.
//!
//! Any number of producers hold a [`RequestSender`]; the dispatcher owns the
//! single [`RequestReceiver`]. Producers wait while the queue is full. The
//! queue closes once every sender is dropped, and the receiver then yields the
//! remaining items followed by `None`.

use tokio::sync::mpsc;

use crate::error::DispatchError;
use crate::request::RideRequest;

/// Reference queue depth.
pub const DEFAULT_QUEUE_CAPACITY: usize = 100;

pub fn request_queue(capacity: usize) -> (RequestSender, RequestReceiver) {
    let (tx, rx) = mpsc::channel(capacity.max(1));
    (RequestSender { tx }, RequestReceiver { rx })
}

#[derive(Debug, Clone)]
pub struct RequestSender {
    tx: mpsc::Sender<RideRequest>,
}

impl RequestSender {
    /// Push a request, waiting for room if the queue is full.
    ///
    /// Fails only when the receiver is gone. Callers treat that as a broken
    /// shutdown sequence, not as a recoverable condition.
    pub async fn enqueue(&self, request: RideRequest) -> Result<(), DispatchError> {
        let request_id = request.id;
        self.tx
            .send(request)
            .await
            .map_err(|_| DispatchError::QueueClosed { request_id })
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

#[derive(Debug)]
pub struct RequestReceiver {
    rx: mpsc::Receiver<RideRequest>,
}

impl RequestReceiver {
    /// Next request in arrival order, or `None` once the queue is closed and
    /// drained.
    pub async fn next(&mut self) -> Option<RideRequest> {
        self.rx.recv().await
    }

    /// Stop accepting new requests. Already queued requests are still
    /// delivered.
    pub fn close(&mut self) {
        self.rx.close();
    }
}
