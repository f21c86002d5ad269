//! Background thread running a blocking [`RecordSource`].
//!
//! Requests go in over one channel, completions come back over another; the
//! event loop polls completions without blocking.

use super::RecordSource;
use crate::model::{FetchCompletion, FetchRequest};
use std::io;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender, TryRecvError};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::{debug, warn};

/// Owns the fetch thread and both channel ends.
///
/// Dropping the worker closes the request channel and joins the thread.
#[derive(Debug)]
pub struct FetchWorker {
    requests: Option<Sender<FetchRequest>>,
    completions: Receiver<FetchCompletion>,
    handle: Option<JoinHandle<()>>,
}

impl FetchWorker {
    /// Start the worker thread.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the thread cannot be spawned.
    pub fn spawn(source: Arc<dyn RecordSource>) -> io::Result<Self> {
        let (request_tx, request_rx) = mpsc::channel::<FetchRequest>();
        let (completion_tx, completion_rx) = mpsc::channel();

        let handle = thread::Builder::new()
            .name("pagesel-fetch".to_string())
            .spawn(move || {
                for request in request_rx {
                    let result = source.fetch(request.offset(), &request.params);
                    let completion = FetchCompletion {
                        ticket: request.ticket,
                        result,
                    };
                    if completion_tx.send(completion).is_err() {
                        break;
                    }
                }
                debug!("Fetch worker stopped");
            })?;

        Ok(Self {
            requests: Some(request_tx),
            completions: completion_rx,
            handle: Some(handle),
        })
    }

    /// Queue a request. Returns false if the worker has stopped.
    pub fn dispatch(&self, request: FetchRequest) -> bool {
        let Some(requests) = &self.requests else {
            return false;
        };
        match requests.send(request) {
            Ok(()) => true,
            Err(_) => {
                warn!("Fetch worker is gone; request dropped");
                false
            }
        }
    }

    /// Next finished completion, without blocking.
    pub fn try_recv(&self) -> Option<FetchCompletion> {
        match self.completions.try_recv() {
            Ok(completion) => Some(completion),
            Err(TryRecvError::Empty | TryRecvError::Disconnected) => None,
        }
    }

    /// Every finished completion, without blocking.
    pub fn drain(&self) -> Vec<FetchCompletion> {
        std::iter::from_fn(|| self.try_recv()).collect()
    }

    /// Wait up to `timeout` for the next completion.
    pub fn recv_timeout(&self, timeout: Duration) -> Option<FetchCompletion> {
        match self.completions.recv_timeout(timeout) {
            Ok(completion) => Some(completion),
            Err(RecvTimeoutError::Timeout | RecvTimeoutError::Disconnected) => None,
        }
    }
}

impl Drop for FetchWorker {
    fn drop(&mut self) {
        self.requests.take();
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                warn!("Fetch worker panicked");
            }
        }
    }
}
