//! The bridge instance
//!
//! [`Bridge`] owns the two handle registries, the worker pool and the
//! completion queue, and implements every boundary operation the host layer
//! exposes. Synchronous operations (tensor create/delete/read, op execution,
//! model load/delete) run entirely on the host thread; only saved-model runs
//! are handed to the pool.
//!
//! The registries are mutated exclusively from the host thread — output
//! tensors of a run are registered when the host drains
//! [`Bridge::poll_completions`], never by the worker — so they need no locks.

use crate::completion::{Completion, CompletionQueue, RunCallback};
use crate::config::BridgeConfig;
use crate::engine::{Engine, OpAttr};
use crate::error::{BridgeError, BridgeResult};
use crate::pool::WorkerPool;
use crate::registry::HandleRegistry;
use crate::tensor::{Dtype, TensorData, TensorInfo};
use crate::{ModelId, TensorId};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// A loaded saved model: the engine session plus its load parameters
///
/// Registry entries are `Arc`-shared with in-flight runs. Deleting the model
/// removes the mapping immediately; the session itself is closed when the last
/// reference drops, so a run already submitted keeps executing against a live
/// session.
pub struct ModelEntry<E: Engine> {
    engine: Arc<E>,
    session: Option<E::Session>,
    export_dir: PathBuf,
    tags: String,
}

impl<E: Engine> ModelEntry<E> {
    fn new(engine: Arc<E>, session: E::Session, export_dir: PathBuf, tags: String) -> Self {
        Self {
            engine,
            session: Some(session),
            export_dir,
            tags,
        }
    }

    /// The live engine session
    pub fn session(&self) -> &E::Session {
        // Only vacated by Drop; no live reference can observe that.
        self.session.as_ref().expect("session taken outside drop")
    }

    /// Export directory the model was loaded from
    pub fn export_dir(&self) -> &Path {
        &self.export_dir
    }

    /// Tag set the model was loaded with
    pub fn tags(&self) -> &str {
        &self.tags
    }
}

impl<E: Engine> Drop for ModelEntry<E> {
    fn drop(&mut self) {
        if let Some(session) = self.session.take() {
            self.engine.close_session(session);
        }
    }
}

/// The bridge between the host layer and the native engine
///
/// Constructed once at host initialization and torn down at shutdown; all
/// methods except the worker-side run body execute on the host thread.
pub struct Bridge<E: Engine> {
    engine: Arc<E>,
    tensors: HandleRegistry<E::Tensor>,
    models: HandleRegistry<Arc<ModelEntry<E>>>,
    pool: WorkerPool,
    completions: CompletionQueue<E::Tensor>,
    is_gpu_device: bool,
}

impl<E: Engine> Bridge<E> {
    /// Initialize the bridge around an engine instance
    pub fn new(engine: E, config: &BridgeConfig) -> BridgeResult<Self> {
        let engine = Arc::new(engine);
        let pool = WorkerPool::new(config.worker_threads)?;
        let is_gpu_device = engine.uses_gpu();
        info!(
            workers = pool.thread_count(),
            gpu = is_gpu_device,
            version = %engine.version(),
            "bridge initialized"
        );
        Ok(Self {
            engine,
            tensors: HandleRegistry::new("tensor"),
            models: HandleRegistry::new("saved model"),
            pool,
            completions: CompletionQueue::new(),
            is_gpu_device,
        })
    }

    /// Create a tensor from host data and register it
    pub fn create_tensor(
        &mut self,
        shape: &[i64],
        dtype: Dtype,
        data: TensorData,
    ) -> BridgeResult<TensorId> {
        data.check_shape(shape, dtype)?;
        let tensor = self.engine.create_tensor(shape, dtype, data)?;
        Ok(self.tensors.insert(tensor))
    }

    /// Remove a tensor mapping and release the native resource
    pub fn delete_tensor(&mut self, id: TensorId) -> BridgeResult<()> {
        let tensor = self.tensors.remove(id)?;
        self.engine.destroy_tensor(tensor);
        Ok(())
    }

    /// Copy a tensor's contents into a flat host buffer
    pub fn tensor_data(&self, id: TensorId) -> BridgeResult<TensorData> {
        self.engine.tensor_data(self.tensors.resolve(id)?)
    }

    /// Execute an eager operator and register its outputs
    pub fn execute_op(
        &mut self,
        op_name: &str,
        attrs: &[OpAttr],
        input_ids: &[TensorId],
        num_outputs: usize,
    ) -> BridgeResult<Vec<TensorInfo>> {
        if op_name.is_empty() {
            return Err(BridgeError::invalid_argument("Op name must not be empty"));
        }
        let inputs = input_ids
            .iter()
            .map(|&id| self.tensors.resolve(id))
            .collect::<BridgeResult<Vec<_>>>()?;
        let outputs = self
            .engine
            .execute_op(op_name, attrs, &inputs, num_outputs)?;
        self.register_outputs(outputs)
    }

    /// Load a saved model and register its session
    pub fn load_model(&mut self, export_dir: &Path, tags: &str) -> BridgeResult<ModelId> {
        let session = self.engine.load_model(export_dir, tags).map_err(|e| {
            warn!(path = %export_dir.display(), tags, error = %e, "saved model load failed");
            e
        })?;
        let entry = Arc::new(ModelEntry::new(
            Arc::clone(&self.engine),
            session,
            export_dir.to_path_buf(),
            tags.to_string(),
        ));
        let id = self.models.insert(entry);
        info!(id, path = %export_dir.display(), tags, "saved model loaded");
        Ok(id)
    }

    /// Remove a model mapping; the session closes once no run holds it
    pub fn delete_model(&mut self, id: ModelId) -> BridgeResult<()> {
        self.models.remove(id)?;
        info!(id, "saved model deleted");
        Ok(())
    }

    /// Submit an asynchronous saved-model run
    ///
    /// Handle resolution and input staging happen here, on the calling thread;
    /// any invalid handle rejects the call synchronously and the callback is
    /// never invoked. On success the call returns as soon as the job is
    /// queued; the outcome arrives through [`Bridge::poll_completions`].
    pub fn run_model(
        &mut self,
        model_id: ModelId,
        inputs: &[(String, TensorId)],
        output_names: &[String],
        callback: RunCallback,
    ) -> BridgeResult<()> {
        let entry = Arc::clone(self.models.resolve(model_id)?);
        if output_names.is_empty() {
            return Err(BridgeError::invalid_argument(
                "Run requires at least one output name",
            ));
        }
        let mut staged = Vec::with_capacity(inputs.len());
        for (name, id) in inputs {
            let tensor = self.tensors.resolve(*id)?;
            staged.push((name.clone(), self.engine.stage_input(tensor)?));
        }

        let ticket = self.completions.ticket(model_id, callback);
        let engine = Arc::clone(&self.engine);
        let output_names = output_names.to_vec();
        self.pool.submit(move || {
            let result = catch_unwind(AssertUnwindSafe(|| {
                engine.run_session(entry.session(), staged, &output_names)
            }));
            let outcome = match result {
                Ok(outcome) => outcome,
                Err(_) => Err(BridgeError::native("Session run panicked in engine")),
            };
            ticket.complete(outcome);
        })?;
        debug!(model_id, "saved model run submitted");
        Ok(())
    }

    /// Deliver finished runs: register outputs and fire callbacks
    ///
    /// Must be called from the host thread; returns the number of callbacks
    /// invoked. Each pending run is delivered exactly once, success or
    /// failure.
    pub fn poll_completions(&mut self) -> usize {
        let mut delivered = 0;
        while let Some(completion) = self.completions.try_next() {
            let Completion {
                model_id,
                outcome,
                callback,
            } = completion;
            let result = match outcome {
                Ok(tensors) => self.register_outputs(tensors),
                Err(e) => {
                    warn!(model_id, error = %e, "saved model run failed");
                    Err(e)
                }
            };
            debug!(model_id, ok = result.is_ok(), "saved model run delivered");
            callback(result);
            delivered += 1;
        }
        delivered
    }

    /// Number of currently loaded saved models
    pub fn model_count(&self) -> usize {
        self.models.len()
    }

    /// Number of currently registered tensors
    pub fn tensor_count(&self) -> usize {
        self.tensors.len()
    }

    /// Whether the engine context lives on a GPU device
    pub fn is_using_gpu(&self) -> bool {
        self.is_gpu_device
    }

    /// Version string of the wrapped native library
    pub fn engine_version(&self) -> String {
        self.engine.version()
    }

    /// Register freshly produced engine tensors, returning their handles
    ///
    /// Metadata is collected for every tensor before any is registered; if the
    /// engine fails to describe one, none are registered and all are released.
    fn register_outputs(&mut self, outputs: Vec<E::Tensor>) -> BridgeResult<Vec<TensorInfo>> {
        let metas = outputs
            .iter()
            .map(|t| self.engine.tensor_meta(t))
            .collect::<BridgeResult<Vec<_>>>();
        let metas = match metas {
            Ok(metas) => metas,
            Err(e) => {
                for tensor in outputs {
                    self.engine.destroy_tensor(tensor);
                }
                return Err(e);
            }
        };
        Ok(outputs
            .into_iter()
            .zip(metas)
            .map(|(tensor, meta)| TensorInfo {
                id: self.tensors.insert(tensor),
                shape: meta.shape,
                dtype: meta.dtype,
            })
            .collect())
    }
}
