// Scripted in-memory engine for bridge integration tests.
//
// Tensors are plain host buffers, sessions scale their first input by a
// factor parsed from the export directory name ("model_x3" -> 3.0), and
// special output names trigger failure paths:
//   "boom"  - native failure status
//   "panic" - panic inside the engine call
#![allow(dead_code)]

use parking_lot::Mutex;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tensor_bridge::{
    AttrValue, BridgeError, BridgeResult, Dtype, Engine, OpAttr, TensorData, TensorMeta,
};

#[derive(Clone, Debug)]
pub struct MockTensor {
    pub shape: Vec<i64>,
    pub dtype: Dtype,
    pub data: TensorData,
}

pub struct MockSession {
    pub name: String,
    pub scale: f32,
}

pub struct MockEngine {
    pub gpu: bool,
    pub run_delay: Duration,
    pub destroyed_tensors: Arc<AtomicUsize>,
    pub closed_sessions: Arc<AtomicUsize>,
    pub native_calls: Arc<AtomicUsize>,
    pub run_log: Arc<Mutex<Vec<String>>>,
}

impl MockEngine {
    pub fn new() -> Self {
        Self {
            gpu: false,
            run_delay: Duration::from_millis(0),
            destroyed_tensors: Arc::new(AtomicUsize::new(0)),
            closed_sessions: Arc::new(AtomicUsize::new(0)),
            native_calls: Arc::new(AtomicUsize::new(0)),
            run_log: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn with_run_delay(mut self, delay: Duration) -> Self {
        self.run_delay = delay;
        self
    }

    pub fn with_gpu(mut self) -> Self {
        self.gpu = true;
        self
    }

    fn float_values(tensor: &MockTensor) -> BridgeResult<&[f32]> {
        match &tensor.data {
            TensorData::Float(values) => Ok(values),
            _ => Err(BridgeError::native("Mock engine runs float inputs only")),
        }
    }

    fn scale_factor(export_dir: &Path) -> f32 {
        export_dir
            .file_name()
            .and_then(|name| name.to_str())
            .and_then(|name| name.rsplit_once("_x"))
            .and_then(|(_, factor)| factor.parse().ok())
            .unwrap_or(1.0)
    }
}

impl Engine for MockEngine {
    type Tensor = MockTensor;
    type Session = MockSession;
    type Staged = MockTensor;

    fn create_tensor(
        &self,
        shape: &[i64],
        dtype: Dtype,
        data: TensorData,
    ) -> BridgeResult<Self::Tensor> {
        Ok(MockTensor {
            shape: shape.to_vec(),
            dtype,
            data,
        })
    }

    fn tensor_data(&self, tensor: &Self::Tensor) -> BridgeResult<TensorData> {
        Ok(tensor.data.clone())
    }

    fn tensor_meta(&self, tensor: &Self::Tensor) -> BridgeResult<TensorMeta> {
        Ok(TensorMeta {
            shape: tensor.shape.clone(),
            dtype: tensor.dtype,
        })
    }

    fn destroy_tensor(&self, _tensor: Self::Tensor) {
        self.destroyed_tensors.fetch_add(1, Ordering::SeqCst);
    }

    fn execute_op(
        &self,
        op_name: &str,
        attrs: &[OpAttr],
        inputs: &[&Self::Tensor],
        num_outputs: usize,
    ) -> BridgeResult<Vec<Self::Tensor>> {
        self.native_calls.fetch_add(1, Ordering::SeqCst);
        match op_name {
            "Identity" => {
                let input = inputs
                    .first()
                    .ok_or_else(|| BridgeError::native("Identity expects one input"))?;
                Ok((0..num_outputs).map(|_| (*input).clone()).collect())
            }
            "AddN" => {
                let first = inputs
                    .first()
                    .ok_or_else(|| BridgeError::native("AddN expects at least one input"))?;
                let mut sum = Self::float_values(first)?.to_vec();
                for input in &inputs[1..] {
                    for (acc, value) in sum.iter_mut().zip(Self::float_values(input)?) {
                        *acc += value;
                    }
                }
                Ok(vec![MockTensor {
                    shape: first.shape.clone(),
                    dtype: Dtype::Float,
                    data: TensorData::Float(sum),
                }])
            }
            "Fill" => {
                let shape = attrs
                    .iter()
                    .find_map(|a| match (&*a.name, &a.value) {
                        ("dims", AttrValue::Shape(dims)) => Some(dims.clone()),
                        _ => None,
                    })
                    .ok_or_else(|| BridgeError::native("Fill expects a dims shape attr"))?;
                let value = attrs
                    .iter()
                    .find_map(|a| match (&*a.name, &a.value) {
                        ("value", AttrValue::F(v)) => Some(*v),
                        _ => None,
                    })
                    .ok_or_else(|| BridgeError::native("Fill expects a value float attr"))?;
                let count: i64 = shape.iter().product();
                Ok(vec![MockTensor {
                    shape,
                    dtype: Dtype::Float,
                    data: TensorData::Float(vec![value; count as usize]),
                }])
            }
            other => Err(BridgeError::native(format!(
                "Op type not registered '{}'",
                other
            ))),
        }
    }

    fn load_model(&self, export_dir: &Path, tags: &str) -> BridgeResult<Self::Session> {
        if tags != "serve" {
            return Err(BridgeError::native(format!(
                "Could not find meta graph def matching supplied tags: '{}'",
                tags
            )));
        }
        Ok(MockSession {
            name: export_dir.display().to_string(),
            scale: Self::scale_factor(export_dir),
        })
    }

    fn close_session(&self, _session: Self::Session) {
        self.closed_sessions.fetch_add(1, Ordering::SeqCst);
    }

    fn stage_input(&self, tensor: &Self::Tensor) -> BridgeResult<Self::Staged> {
        Ok(tensor.clone())
    }

    fn run_session(
        &self,
        session: &Self::Session,
        inputs: Vec<(String, Self::Staged)>,
        output_names: &[String],
    ) -> BridgeResult<Vec<Self::Tensor>> {
        self.native_calls.fetch_add(1, Ordering::SeqCst);
        if !self.run_delay.is_zero() {
            std::thread::sleep(self.run_delay);
        }
        self.run_log.lock().push(session.name.clone());

        let mut outputs = Vec::with_capacity(output_names.len());
        for name in output_names {
            match name.as_str() {
                "boom" => {
                    return Err(BridgeError::native(format!(
                        "Output node 'boom' failed in {}",
                        session.name
                    )))
                }
                "panic" => panic!("mock engine fault"),
                _ => {}
            }
            let tensor = match inputs.first() {
                Some((_, input)) => {
                    let scaled = Self::float_values(input)?
                        .iter()
                        .map(|v| v * session.scale)
                        .collect();
                    MockTensor {
                        shape: input.shape.clone(),
                        dtype: Dtype::Float,
                        data: TensorData::Float(scaled),
                    }
                }
                None => MockTensor {
                    shape: vec![1],
                    dtype: Dtype::Float,
                    data: TensorData::Float(vec![session.scale]),
                },
            };
            outputs.push(tensor);
        }
        Ok(outputs)
    }

    fn uses_gpu(&self) -> bool {
        self.gpu
    }

    fn version(&self) -> String {
        "mock-engine 2.4.0".to_string()
    }
}
