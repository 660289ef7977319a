//! Tensor boundary types
//!
//! Provides the element type enumeration with the engine's integer wire codes,
//! the typed host-side data buffers that cross the boundary, and the metadata
//! records returned for newly registered tensors.

use crate::error::{BridgeError, BridgeResult};
use crate::TensorId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Element type of a tensor
///
/// Discriminants are the engine's own dtype codes, exported to the host layer
/// as plain integers.
#[repr(i32)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Dtype {
    /// 32-bit floating point
    Float = 1,
    /// Signed 32-bit integer
    Int32 = 3,
    /// Unsigned 8-bit integer
    Uint8 = 4,
    /// Variable-length byte string
    String = 7,
    /// Single-precision complex, stored as interleaved real/imaginary floats
    Complex64 = 8,
    /// Signed 64-bit integer
    Int64 = 9,
    /// Boolean
    Bool = 10,
    /// Opaque engine resource; cannot be created from host data
    Resource = 20,
}

impl Dtype {
    /// Parse an integer dtype code coming from the host layer
    pub fn from_code(code: i32) -> BridgeResult<Self> {
        match code {
            1 => Ok(Dtype::Float),
            3 => Ok(Dtype::Int32),
            4 => Ok(Dtype::Uint8),
            7 => Ok(Dtype::String),
            8 => Ok(Dtype::Complex64),
            9 => Ok(Dtype::Int64),
            10 => Ok(Dtype::Bool),
            20 => Ok(Dtype::Resource),
            _ => Err(BridgeError::invalid_argument(format!(
                "Unknown dtype code: {}",
                code
            ))),
        }
    }

    /// The integer code exported to the host layer
    #[inline]
    pub const fn code(&self) -> i32 {
        *self as i32
    }
}

impl fmt::Display for Dtype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Dtype::Float => "float32",
            Dtype::Int32 => "int32",
            Dtype::Uint8 => "uint8",
            Dtype::String => "string",
            Dtype::Complex64 => "complex64",
            Dtype::Int64 => "int64",
            Dtype::Bool => "bool",
            Dtype::Resource => "resource",
        };
        write!(f, "{}", name)
    }
}

/// Flat, typed host-side tensor contents
///
/// The host's marshalling layer hands the bridge already-typed buffers; the
/// bridge checks them against the requested shape and dtype before the engine
/// ever sees them.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum TensorData {
    Float(Vec<f32>),
    Int32(Vec<i32>),
    Int64(Vec<i64>),
    Uint8(Vec<u8>),
    Bool(Vec<bool>),
    String(Vec<String>),
}

impl TensorData {
    /// Number of values in the buffer
    pub fn len(&self) -> usize {
        match self {
            TensorData::Float(v) => v.len(),
            TensorData::Int32(v) => v.len(),
            TensorData::Int64(v) => v.len(),
            TensorData::Uint8(v) => v.len(),
            TensorData::Bool(v) => v.len(),
            TensorData::String(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether this buffer kind can back a tensor of the given dtype
    ///
    /// Complex64 tensors are backed by a float buffer holding interleaved
    /// real/imaginary pairs.
    pub fn backs(&self, dtype: Dtype) -> bool {
        matches!(
            (self, dtype),
            (TensorData::Float(_), Dtype::Float)
                | (TensorData::Float(_), Dtype::Complex64)
                | (TensorData::Int32(_), Dtype::Int32)
                | (TensorData::Int64(_), Dtype::Int64)
                | (TensorData::Uint8(_), Dtype::Uint8)
                | (TensorData::Bool(_), Dtype::Bool)
                | (TensorData::String(_), Dtype::String)
        )
    }

    /// Validate this buffer against a requested shape and dtype
    ///
    /// Checks run before any native call: a resource tensor cannot be created
    /// from host data, the buffer kind must back the dtype, and the value count
    /// must match the shape's element count (doubled for complex64).
    pub fn check_shape(&self, shape: &[i64], dtype: Dtype) -> BridgeResult<()> {
        if dtype == Dtype::Resource {
            return Err(BridgeError::invalid_argument(
                "Resource tensors cannot be created from host data",
            ));
        }
        if !self.backs(dtype) {
            return Err(BridgeError::invalid_argument(format!(
                "Buffer kind does not match dtype {}",
                dtype
            )));
        }
        if shape.iter().any(|&d| d < 0) {
            return Err(BridgeError::invalid_argument(format!(
                "Shape contains a negative dimension: {:?}",
                shape
            )));
        }
        let elements: i64 = shape.iter().product();
        let expected = match dtype {
            Dtype::Complex64 => elements as usize * 2,
            _ => elements as usize,
        };
        if self.len() != expected {
            return Err(BridgeError::invalid_argument(format!(
                "Shape {:?} expects {} values but buffer holds {}",
                shape,
                expected,
                self.len()
            )));
        }
        Ok(())
    }
}

/// Shape and dtype of a native tensor, as reported by the engine
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TensorMeta {
    pub shape: Vec<i64>,
    pub dtype: Dtype,
}

/// Handle and metadata for a newly registered tensor
///
/// Returned to the host for every output of an operator execution or a
/// saved-model run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TensorInfo {
    pub id: TensorId,
    pub shape: Vec<i64>,
    pub dtype: Dtype,
}
