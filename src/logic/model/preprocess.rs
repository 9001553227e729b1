//! Image → input tensor conversion

use image::imageops::{self, FilterType};
use image::RgbImage;
use ndarray::Array4;

use super::signature::{InputElement, ModelSignature, TensorLayout};
use super::InferenceError;

/// Batched input tensor in the model's declared element type.
#[derive(Debug, Clone, PartialEq)]
pub enum InputTensor {
    F32(Array4<f32>),
    U8(Array4<u8>),
    I8(Array4<i8>),
}

impl InputTensor {
    #[cfg(test)]
    pub fn shape(&self) -> &[usize] {
        match self {
            InputTensor::F32(a) => a.shape(),
            InputTensor::U8(a) => a.shape(),
            InputTensor::I8(a) => a.shape(),
        }
    }
}

/// Resize to the declared input size, convert, and add the batch dimension.
pub fn prepare_input(img: &RgbImage, signature: &ModelSignature) -> Result<InputTensor, InferenceError> {
    if img.width() == 0 || img.height() == 0 {
        return Err(InferenceError::Preprocess("image has no pixels".into()));
    }

    let resized = if img.dimensions() == (signature.width, signature.height) {
        img.clone()
    } else {
        imageops::resize(img, signature.width, signature.height, FilterType::Triangle)
    };

    let tensor = match signature.element {
        InputElement::F32 => {
            InputTensor::F32(to_array(&resized, signature.layout, |v| v as f32 / 255.0))
        }
        InputElement::U8 => InputTensor::U8(to_array(&resized, signature.layout, |v| v)),
        InputElement::I8 => InputTensor::I8(to_array(&resized, signature.layout, |v| v as i8)),
    };

    Ok(tensor)
}

fn to_array<T>(img: &RgbImage, layout: TensorLayout, convert: impl Fn(u8) -> T) -> Array4<T> {
    let (w, h) = (img.width() as usize, img.height() as usize);
    match layout {
        TensorLayout::Nhwc => Array4::from_shape_fn((1, h, w, 3), |(_, y, x, c)| {
            convert(img.get_pixel(x as u32, y as u32)[c])
        }),
        TensorLayout::Nchw => Array4::from_shape_fn((1, 3, h, w), |(_, c, y, x)| {
            convert(img.get_pixel(x as u32, y as u32)[c])
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    fn signature(layout: TensorLayout, element: InputElement) -> ModelSignature {
        ModelSignature {
            input_name: "input".into(),
            output_name: "output".into(),
            width: 4,
            height: 2,
            layout,
            element,
            output_len: Some(38),
        }
    }

    #[test]
    fn test_nhwc_f32_rescaled() {
        let img = RgbImage::from_pixel(16, 16, Rgb([255, 0, 51]));
        let input = prepare_input(&img, &signature(TensorLayout::Nhwc, InputElement::F32)).unwrap();
        assert_eq!(input.shape(), &[1, 2, 4, 3]);

        let InputTensor::F32(array) = input else {
            panic!("expected f32 tensor");
        };
        assert!((array[[0, 1, 3, 0]] - 1.0).abs() < 1e-6);
        assert_eq!(array[[0, 1, 3, 1]], 0.0);
        assert!((array[[0, 0, 0, 2]] - 0.2).abs() < 1e-6);
    }

    #[test]
    fn test_nchw_u8_cast_directly() {
        let img = RgbImage::from_pixel(4, 2, Rgb([10, 20, 30]));
        let input = prepare_input(&img, &signature(TensorLayout::Nchw, InputElement::U8)).unwrap();
        assert_eq!(input.shape(), &[1, 3, 2, 4]);

        let InputTensor::U8(array) = input else {
            panic!("expected u8 tensor");
        };
        assert_eq!(array[[0, 0, 1, 2]], 10);
        assert_eq!(array[[0, 1, 0, 0]], 20);
        assert_eq!(array[[0, 2, 1, 3]], 30);
    }

    #[test]
    fn test_empty_image_rejected() {
        let img = RgbImage::new(0, 0);
        let err = prepare_input(&img, &signature(TensorLayout::Nhwc, InputElement::F32));
        assert!(matches!(err, Err(InferenceError::Preprocess(_))));
    }
}
