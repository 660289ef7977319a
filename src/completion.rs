//! Host-thread completion delivery
//!
//! A worker thread finishing a saved-model run must never touch the handle
//! registries or invoke host callbacks itself. Instead each run request gets a
//! single-use [`CompletionTicket`]; the worker moves the request outcome into
//! it once, and the host thread drains the shared queue, registers output
//! tensors and fires the callback there. Consuming the ticket by value makes
//! more than one delivery per request unrepresentable.

use crate::error::BridgeResult;
use crate::tensor::TensorInfo;
use crate::ModelId;
use crossbeam::channel::{unbounded, Receiver, Sender};

/// Host completion callback for one saved-model run request
///
/// Invoked exactly once, on the host thread, with either the registered output
/// tensor handles or the error that ended the run.
pub type RunCallback = Box<dyn FnOnce(BridgeResult<Vec<TensorInfo>>) + Send + 'static>;

/// Finished run carried from a worker back to the host thread
///
/// Holds the raw engine tensors; registration happens host-side when the
/// queue is drained.
pub(crate) struct Completion<T> {
    pub model_id: ModelId,
    pub outcome: BridgeResult<Vec<T>>,
    pub callback: RunCallback,
}

/// Queue of finished runs, drained only by the host thread
pub(crate) struct CompletionQueue<T> {
    tx: Sender<Completion<T>>,
    rx: Receiver<Completion<T>>,
}

impl<T> CompletionQueue<T> {
    pub fn new() -> Self {
        let (tx, rx) = unbounded();
        Self { tx, rx }
    }

    /// Issue the single-use delivery ticket for a new run request
    pub fn ticket(&self, model_id: ModelId, callback: RunCallback) -> CompletionTicket<T> {
        CompletionTicket {
            tx: self.tx.clone(),
            model_id,
            callback,
        }
    }

    /// Take the next finished run, if any
    pub fn try_next(&self) -> Option<Completion<T>> {
        self.rx.try_recv().ok()
    }
}

/// Single-use handle delivering one run outcome back to the host thread
pub(crate) struct CompletionTicket<T> {
    tx: Sender<Completion<T>>,
    model_id: ModelId,
    callback: RunCallback,
}

impl<T> CompletionTicket<T> {
    /// Deliver the outcome; consumes the ticket
    pub fn complete(self, outcome: BridgeResult<Vec<T>>) {
        // The receiver only disappears when the bridge itself is gone; the
        // outcome has nowhere to go then.
        let _ = self.tx.send(Completion {
            model_id: self.model_id,
            outcome,
            callback: self.callback,
        });
    }
}
