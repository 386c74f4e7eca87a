//! Background execution for the expensive filters.
//!
//! A [`FilterRequest`] owns its source buffer and is moved onto the rayon
//! pool; the finished [`FilterResponse`] comes back over an mpsc channel.
//! Nothing is shared between the two sides while the job runs. The caller
//! polls for the response from its own loop.
//!
//! Only one job may be in flight per worker. Requests carry the caller's
//! image generation so a result computed for a replaced image can be
//! recognized and dropped.

use std::panic::{self, AssertUnwindSafe};
use std::sync::mpsc;

use tracing::{debug, warn};

use super::FilterKind;
use crate::error::EditorError;
use crate::pixels::PixelBuffer;

/// Work order for the background worker.
#[derive(Debug)]
pub struct FilterRequest {
    /// Image generation the source was taken from
    pub generation: u64,
    pub kind: FilterKind,
    pub source: PixelBuffer,
}

/// Finished job.
#[derive(Debug)]
pub struct FilterResponse {
    pub generation: u64,
    pub kind: FilterKind,
    pub output: PixelBuffer,
}

/// Single-slot background filter runner.
pub struct FilterWorker {
    sender: mpsc::Sender<FilterResponse>,
    receiver: mpsc::Receiver<FilterResponse>,
    /// Generation of the job in flight, if any.
    in_flight: Option<u64>,
}

impl Default for FilterWorker {
    fn default() -> Self {
        Self::new()
    }
}

impl FilterWorker {
    pub fn new() -> Self {
        let (sender, receiver) = mpsc::channel();
        Self {
            sender,
            receiver,
            in_flight: None,
        }
    }

    /// A job has been dispatched and its response not yet collected.
    pub fn is_busy(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Hand a request to the pool. Refused while another job is in flight.
    pub fn dispatch(&mut self, request: FilterRequest) -> Result<(), EditorError> {
        if self.is_busy() {
            return Err(EditorError::FilterBusy);
        }
        self.in_flight = Some(request.generation);
        debug!(
            filter = request.kind.name(),
            generation = request.generation,
            width = request.source.width(),
            height = request.source.height(),
            "dispatching filter job"
        );

        let sender = self.sender.clone();
        rayon::spawn(move || {
            let FilterRequest {
                generation,
                kind,
                source,
            } = request;
            let output = match panic::catch_unwind(AssertUnwindSafe(|| kind.apply(&source))) {
                Ok(output) => output,
                Err(_) => {
                    // Hand the source back untouched so the caller is not left waiting
                    warn!(filter = kind.name(), "filter job panicked");
                    source
                }
            };
            let _ = sender.send(FilterResponse {
                generation,
                kind,
                output,
            });
        });
        Ok(())
    }

    /// Collect the response if the job has finished.
    pub fn try_recv(&mut self) -> Option<FilterResponse> {
        self.in_flight?;
        match self.receiver.try_recv() {
            Ok(response) => {
                self.in_flight = None;
                Some(response)
            }
            Err(_) => None,
        }
    }

    /// Block until the in-flight job finishes. `None` when nothing was dispatched.
    pub fn wait(&mut self) -> Option<FilterResponse> {
        self.in_flight?;
        let response = self.receiver.recv().ok();
        self.in_flight = None;
        response
    }
}
