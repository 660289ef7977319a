//! # Tensor Bridge
//!
//! A native bridge core exposing a machine-learning engine's tensor and
//! model-execution primitives to a host scripting environment. The bridge is a
//! thin marshalling layer: it validates arguments crossing the boundary, maps
//! opaque integer handles to native resources, and forwards calls into an
//! external eager-execution engine and saved-model loader reached through the
//! [`Engine`] trait. The building blocks:
//!
//! - **Handle registries**: stable, host-representable integer IDs for native
//!   tensors and loaded models, with guaranteed no-dangling lookups
//! - **Worker pool**: fixed-size background threads for blocking saved-model
//!   runs, sized once at initialization
//! - **Completion delivery**: single-use per-request tickets carrying run
//!   outcomes back to the host thread, exactly once each
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use tensor_bridge::{Bridge, BridgeConfig, Dtype, TensorData};
//!
//! let mut bridge = Bridge::new(engine, &BridgeConfig::default())?;
//!
//! let id = bridge.create_tensor(&[2, 2], Dtype::Float,
//!     TensorData::Float(vec![1.0, 2.0, 3.0, 4.0]))?;
//!
//! let model = bridge.load_model("models/classifier".as_ref(), "serve")?;
//! bridge.run_model(model, &[("input".into(), id)], &["scores".into()],
//!     Box::new(|result| println!("{:?}", result)))?;
//!
//! // From the host event loop:
//! bridge.poll_completions();
//! ```

pub mod bridge;
mod completion;
pub mod config;
pub mod engine;
pub mod error;
pub mod pool;
pub mod registry;
pub mod tensor;

// Re-export commonly used types for easy access
pub use bridge::{Bridge, ModelEntry};
pub use completion::RunCallback;
pub use config::BridgeConfig;
pub use engine::{AttrValue, Engine, OpAttr};
pub use error::{BridgeError, BridgeResult};
pub use pool::WorkerPool;
pub use registry::HandleRegistry;
pub use tensor::{Dtype, TensorData, TensorInfo, TensorMeta};

/// Opaque handle for a native tensor resource
pub type TensorId = i32;

/// Opaque handle for a loaded saved model
pub type ModelId = i32;
