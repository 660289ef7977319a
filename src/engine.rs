//! Engine trait seam
//!
//! The wrapped native library is reached exclusively through the [`Engine`]
//! trait. Operator kernels, graph execution, device placement and tensor memory
//! layout all live behind this boundary; the bridge only forwards validated
//! calls and tracks the resources the engine hands back.

use crate::error::BridgeResult;
use crate::tensor::{Dtype, TensorData, TensorMeta};
use std::path::Path;

/// A typed operator attribute record
///
/// Attribute kinds mirror the set the engine exports for eager op execution:
/// string, int, float, bool, type and shape.
#[derive(Clone, Debug, PartialEq)]
pub struct OpAttr {
    pub name: String,
    pub value: AttrValue,
}

/// Value of an operator attribute
#[derive(Clone, Debug, PartialEq)]
pub enum AttrValue {
    S(String),
    I(i64),
    F(f32),
    B(bool),
    Type(Dtype),
    Shape(Vec<i64>),
}

impl OpAttr {
    pub fn new<S: Into<String>>(name: S, value: AttrValue) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

/// The native eager-execution engine and saved-model loader
///
/// Implementations wrap the external library's C structures in RAII types and
/// report failures as [`BridgeError::NativeExecution`] statuses rather than
/// crashing. The bridge owns the handle tables; the engine owns the memory
/// behind every resource it returns.
///
/// `run_session` is the only operation invoked from worker threads, so
/// `Session` must be shareable across threads. Whether concurrent runs against
/// one session are actually safe is the engine's contract to declare through
/// that bound; everything else is called from the host thread.
///
/// [`BridgeError::NativeExecution`]: crate::error::BridgeError::NativeExecution
pub trait Engine: Send + Sync + 'static {
    /// An eager tensor resource owned by the engine
    type Tensor: Send + 'static;
    /// A loaded saved-model session (session plus graph in the native library)
    type Session: Send + Sync + 'static;
    /// A detached input value for one run request
    ///
    /// Staging decouples a run from the eager tensor it was built from, so the
    /// host may delete the tensor while the run is in flight. Dropping a staged
    /// value releases any per-request native resources it holds.
    type Staged: Send + 'static;

    /// Allocate a tensor with the given shape, dtype and contents
    fn create_tensor(
        &self,
        shape: &[i64],
        dtype: Dtype,
        data: TensorData,
    ) -> BridgeResult<Self::Tensor>;

    /// Copy a tensor's contents back into a flat host buffer
    fn tensor_data(&self, tensor: &Self::Tensor) -> BridgeResult<TensorData>;

    /// Query a tensor's shape and dtype
    fn tensor_meta(&self, tensor: &Self::Tensor) -> BridgeResult<TensorMeta>;

    /// Release a tensor resource
    fn destroy_tensor(&self, tensor: Self::Tensor);

    /// Execute an eager operator, producing `num_outputs` new tensors
    fn execute_op(
        &self,
        op_name: &str,
        attrs: &[OpAttr],
        inputs: &[&Self::Tensor],
        num_outputs: usize,
    ) -> BridgeResult<Vec<Self::Tensor>>;

    /// Load a saved model from an export directory with the given tag set
    fn load_model(&self, export_dir: &Path, tags: &str) -> BridgeResult<Self::Session>;

    /// Release a loaded session and its graph
    fn close_session(&self, session: Self::Session);

    /// Detach an eager tensor into a run-request input value
    fn stage_input(&self, tensor: &Self::Tensor) -> BridgeResult<Self::Staged>;

    /// Run the session's graph; blocks for the duration of the native call
    ///
    /// Consumes the staged inputs; the engine releases them once the call
    /// finishes. Produces one new eager tensor per requested output name.
    fn run_session(
        &self,
        session: &Self::Session,
        inputs: Vec<(String, Self::Staged)>,
        output_names: &[String],
    ) -> BridgeResult<Vec<Self::Tensor>>;

    /// Whether the engine placed its context on a GPU device
    fn uses_gpu(&self) -> bool;

    /// Version string of the wrapped library
    fn version(&self) -> String;
}
