//! Image preprocessing - decode, resize, normalize into a model tensor

use std::str::FromStr;

use image::{imageops::FilterType, DynamicImage, RgbImage};
use ndarray::Array4;
use serde::Serialize;

use super::engine::InferenceError;

/// Model input edge length (square)
pub const INPUT_SIZE: u32 = 224;

/// Channel placement in the input tensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TensorLayout {
    /// `[1, H, W, 3]` (Keras export)
    Nhwc,
    /// `[1, 3, H, W]`
    Nchw,
}

impl FromStr for TensorLayout {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "nhwc" => Ok(TensorLayout::Nhwc),
            "nchw" => Ok(TensorLayout::Nchw),
            other => Err(format!("unknown tensor layout: {}", other)),
        }
    }
}

/// Decode uploaded bytes into an image
pub fn decode_image(bytes: &[u8]) -> Result<DynamicImage, InferenceError> {
    image::load_from_memory(bytes).map_err(|e| InferenceError::Decode(e.to_string()))
}

/// RGB, nearest-neighbour resize to `size`x`size`
pub fn resize_rgb(image: &DynamicImage, size: u32) -> RgbImage {
    let rgb = image.to_rgb8();
    if rgb.width() == size && rgb.height() == size {
        return rgb;
    }
    image::imageops::resize(&rgb, size, size, FilterType::Nearest)
}

/// Build a batch-of-one tensor with pixels scaled to `[0, 1]`
pub fn to_tensor(image: &DynamicImage, size: u32, layout: TensorLayout) -> Array4<f32> {
    let rgb = resize_rgb(image, size);
    let side = size as usize;

    match layout {
        TensorLayout::Nhwc => Array4::from_shape_fn((1, side, side, 3), |(_, y, x, c)| {
            rgb.get_pixel(x as u32, y as u32)[c] as f32 / 255.0
        }),
        TensorLayout::Nchw => Array4::from_shape_fn((1, 3, side, side), |(_, c, y, x)| {
            rgb.get_pixel(x as u32, y as u32)[c] as f32 / 255.0
        }),
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use image::{ImageFormat, Rgb};
    use std::io::Cursor;

    pub(crate) fn png_bytes(image: RgbImage) -> Vec<u8> {
        let mut buf = Vec::new();
        DynamicImage::ImageRgb8(image)
            .write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
            .unwrap();
        buf
    }

    #[test]
    fn test_black_image_is_all_zero() {
        let bytes = png_bytes(RgbImage::new(INPUT_SIZE, INPUT_SIZE));
        let image = decode_image(&bytes).unwrap();
        let tensor = to_tensor(&image, INPUT_SIZE, TensorLayout::Nhwc);

        assert_eq!(tensor.shape(), &[1, 224, 224, 3]);
        assert!(tensor.iter().all(|v| *v == 0.0));
    }

    #[test]
    fn test_resize_and_scale() {
        let image = DynamicImage::ImageRgb8(RgbImage::from_pixel(10, 30, Rgb([255, 51, 0])));
        let tensor = to_tensor(&image, INPUT_SIZE, TensorLayout::Nhwc);

        assert_eq!(tensor.shape(), &[1, 224, 224, 3]);
        assert_eq!(tensor[[0, 100, 100, 0]], 1.0);
        assert_eq!(tensor[[0, 100, 100, 1]], 0.2);
        assert_eq!(tensor[[0, 100, 100, 2]], 0.0);
    }

    #[test]
    fn test_channels_first_layout() {
        let image = DynamicImage::ImageRgb8(RgbImage::from_pixel(4, 4, Rgb([0, 255, 0])));
        let tensor = to_tensor(&image, 4, TensorLayout::Nchw);

        assert_eq!(tensor.shape(), &[1, 3, 4, 4]);
        assert_eq!(tensor[[0, 0, 1, 1]], 0.0);
        assert_eq!(tensor[[0, 1, 1, 1]], 1.0);
    }

    #[test]
    fn test_grayscale_is_expanded_to_rgb() {
        let gray = image::GrayImage::from_pixel(8, 8, image::Luma([255]));
        let tensor = to_tensor(&DynamicImage::ImageLuma8(gray), 8, TensorLayout::Nhwc);
        assert!(tensor.iter().all(|v| *v == 1.0));
    }

    #[test]
    fn test_undecodable_bytes() {
        let result = decode_image(b"definitely not an image");
        assert!(matches!(result, Err(InferenceError::Decode(_))));
    }

    #[test]
    fn test_layout_parse() {
        assert_eq!("NHWC".parse::<TensorLayout>(), Ok(TensorLayout::Nhwc));
        assert_eq!(" nchw ".parse::<TensorLayout>(), Ok(TensorLayout::Nchw));
        assert!("hwc".parse::<TensorLayout>().is_err());
    }
}
