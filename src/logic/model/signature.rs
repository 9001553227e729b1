//! Model signature - declared input shape, element type and output size

use ort::session::Session;
use ort::tensor::TensorElementType;
use ort::value::ValueType;
use serde::Serialize;

use super::InferenceError;

/// Used when the model leaves height or width dynamic.
pub const DEFAULT_INPUT_SIZE: u32 = 224;

/// Channel position in a 4D image tensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TensorLayout {
    /// `[batch, height, width, channels]`
    Nhwc,
    /// `[batch, channels, height, width]`
    Nchw,
}

/// Declared input element type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum InputElement {
    /// Pixels rescaled to [0, 1].
    F32,
    /// Pixels cast directly.
    U8,
    /// Pixels cast directly (wrapping).
    I8,
}

impl InputElement {
    fn from_ort(ty: TensorElementType) -> Result<Self, InferenceError> {
        match ty {
            TensorElementType::Float32 => Ok(Self::F32),
            TensorElementType::Uint8 => Ok(Self::U8),
            TensorElementType::Int8 => Ok(Self::I8),
            other => Err(InferenceError::Unsupported(format!(
                "input element type {:?}",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModelSignature {
    pub input_name: String,
    pub output_name: String,
    pub width: u32,
    pub height: u32,
    pub layout: TensorLayout,
    pub element: InputElement,
    /// Number of output scores, if the model declares it statically.
    pub output_len: Option<usize>,
}

impl ModelSignature {
    /// Read the first input and first output of a loaded session.
    pub fn from_session(session: &Session) -> Result<Self, InferenceError> {
        let input = session
            .inputs
            .first()
            .ok_or_else(|| InferenceError::Unsupported("model has no inputs".into()))?;
        let output = session
            .outputs
            .first()
            .ok_or_else(|| InferenceError::Unsupported("model has no outputs".into()))?;

        let (element, input_dims) = match &input.input_type {
            ValueType::Tensor { ty, shape, .. } => {
                (InputElement::from_ort(*ty)?, shape.iter().copied().collect::<Vec<i64>>())
            }
            other => {
                return Err(InferenceError::Unsupported(format!(
                    "input is not a tensor: {:?}",
                    other
                )))
            }
        };

        let output_len = match &output.output_type {
            ValueType::Tensor { shape, .. } => static_len(shape.iter().copied()),
            _ => None,
        };

        let (layout, height, width) = image_dims(&input_dims)?;

        Ok(Self {
            input_name: input.name.clone(),
            output_name: output.name.clone(),
            width,
            height,
            layout,
            element,
            output_len,
        })
    }
}

/// Layout and spatial size from a 4D input shape. A channel axis of 3 decides the layout.
pub fn image_dims(dims: &[i64]) -> Result<(TensorLayout, u32, u32), InferenceError> {
    if dims.len() != 4 {
        return Err(InferenceError::Unsupported(format!(
            "expected 4D image input, got {}D",
            dims.len()
        )));
    }

    let (layout, h, w) = if dims[3] == 3 {
        (TensorLayout::Nhwc, dims[1], dims[2])
    } else if dims[1] == 3 {
        (TensorLayout::Nchw, dims[2], dims[3])
    } else {
        return Err(InferenceError::Unsupported(format!(
            "no 3-channel axis in input shape {:?}",
            dims
        )));
    };

    Ok((layout, spatial(h), spatial(w)))
}

fn spatial(dim: i64) -> u32 {
    if dim > 0 {
        dim as u32
    } else {
        DEFAULT_INPUT_SIZE
    }
}

/// Product of the non-batch dimensions, or `None` if any is dynamic.
/// A 1D output is taken as the score vector itself.
fn static_len(dims: impl Iterator<Item = i64>) -> Option<usize> {
    let dims: Vec<i64> = dims.collect();
    let scores = match dims.as_slice() {
        [] => return None,
        [only] => std::slice::from_ref(only),
        [_, tail @ ..] => tail,
    };
    if scores.iter().any(|&d| d <= 0) {
        return None;
    }
    Some(scores.iter().product::<i64>() as usize)
}
