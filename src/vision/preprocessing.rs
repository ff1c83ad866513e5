// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Image preprocessing for the gesture classifier
//!
//! Converts an arbitrary photo into the `[1, IMG_SIZE, IMG_SIZE, 1]` tensor
//! the CNN was trained on. The threshold pipeline makes the classifier robust
//! to lighting: the hand ends up as dark edges on a white background, which is
//! what the grayscale training set looks like.

use image::{DynamicImage, GrayImage, Luma};
use ndarray::Array4;
use thiserror::Error;

use super::filters::{self, BorderMode};

/// Side length of the square model input
pub const IMG_SIZE: u32 = 64;

/// Gaussian blur kernel applied before thresholding
pub const BLUR_KERNEL: usize = 5;

/// Neighbourhood used for the adaptive threshold local mean
pub const THRESHOLD_BLOCK_SIZE: usize = 11;

/// Constant subtracted from the local mean
pub const THRESHOLD_C: f64 = 2.0;

/// Value written for pixels that pass the threshold
pub const THRESHOLD_MAX_VALUE: u8 = 255;

/// Square structuring element for the noise-removing open
pub const MORPH_KERNEL: usize = 3;

#[derive(Debug, Error, PartialEq)]
pub enum PreprocessError {
    #[error("Invalid preprocessing config: {0}")]
    InvalidConfig(String),

    #[error("Image has no pixels ({0}x{1})")]
    EmptyImage(u32, u32),
}

/// Which transform to apply before resizing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreprocessMode {
    /// grayscale -> blur -> adaptive threshold -> open -> resize -> normalize
    Threshold,
    /// grayscale -> resize -> normalize (images already in training style)
    Plain,
}

#[derive(Debug, Clone)]
pub struct PreprocessConfig {
    pub img_size: u32,
    pub blur_kernel: usize,
    pub threshold_block_size: usize,
    pub threshold_c: f64,
    pub morph_kernel: usize,
    pub mode: PreprocessMode,
}

impl Default for PreprocessConfig {
    fn default() -> Self {
        Self {
            img_size: IMG_SIZE,
            blur_kernel: BLUR_KERNEL,
            threshold_block_size: THRESHOLD_BLOCK_SIZE,
            threshold_c: THRESHOLD_C,
            morph_kernel: MORPH_KERNEL,
            mode: PreprocessMode::Threshold,
        }
    }
}

impl PreprocessConfig {
    pub fn with_img_size(mut self, img_size: u32) -> Self {
        self.img_size = img_size;
        self
    }

    pub fn with_mode(mut self, mode: PreprocessMode) -> Self {
        self.mode = mode;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), PreprocessError> {
        if self.img_size == 0 {
            return Err(PreprocessError::InvalidConfig(
                "img_size must be greater than 0".to_string(),
            ));
        }
        if self.blur_kernel == 0 || self.blur_kernel % 2 == 0 {
            return Err(PreprocessError::InvalidConfig(format!(
                "blur_kernel must be odd, got {}",
                self.blur_kernel
            )));
        }
        if self.threshold_block_size < 3 || self.threshold_block_size % 2 == 0 {
            return Err(PreprocessError::InvalidConfig(format!(
                "threshold_block_size must be odd and >= 3, got {}",
                self.threshold_block_size
            )));
        }
        if self.morph_kernel == 0 || self.morph_kernel % 2 == 0 {
            return Err(PreprocessError::InvalidConfig(format!(
                "morph_kernel must be odd, got {}",
                self.morph_kernel
            )));
        }
        if !self.threshold_c.is_finite() {
            return Err(PreprocessError::InvalidConfig(
                "threshold_c must be finite".to_string(),
            ));
        }
        Ok(())
    }
}

/// Output of the pipeline
#[derive(Debug, Clone)]
pub struct Prepared {
    /// NHWC tensor `[1, img_size, img_size, 1]` with values in `[0, 1]`
    pub tensor: Array4<f32>,
    /// Binary image after adaptive thresholding (threshold mode only)
    pub thresholded: Option<GrayImage>,
}

/// Stateless image-to-tensor transform
#[derive(Debug, Clone)]
pub struct Preprocessor {
    config: PreprocessConfig,
}

impl Preprocessor {
    pub fn new(config: PreprocessConfig) -> Result<Self, PreprocessError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &PreprocessConfig {
        &self.config
    }

    /// Run the configured pipeline on a decoded image
    pub fn prepare(&self, image: &DynamicImage) -> Result<Prepared, PreprocessError> {
        let (width, height) = (image.width(), image.height());
        if width == 0 || height == 0 {
            return Err(PreprocessError::EmptyImage(width, height));
        }

        let gray = to_grayscale(image);

        let (mask, thresholded) = match self.config.mode {
            PreprocessMode::Plain => (gray, None),
            PreprocessMode::Threshold => {
                let blurred =
                    filters::gaussian_blur(&gray, self.config.blur_kernel, BorderMode::Reflect101);
                let thresh = filters::adaptive_threshold_gaussian(
                    &blurred,
                    THRESHOLD_MAX_VALUE,
                    self.config.threshold_block_size,
                    self.config.threshold_c,
                );
                let opened = filters::morph_open(&thresh, self.config.morph_kernel);
                (opened, Some(thresh))
            }
        };

        let size = self.config.img_size;
        let resized = filters::resize_linear(&mask, size, size);

        Ok(Prepared {
            tensor: to_tensor(&resized),
            thresholded,
        })
    }
}

/// Convert any decoded image to 8-bit luma with BT.601 weights
///
/// Alpha is dropped rather than blended.
pub fn to_grayscale(image: &DynamicImage) -> GrayImage {
    if let DynamicImage::ImageLuma8(gray) = image {
        return gray.clone();
    }

    let rgb = image.to_rgb8();
    let mut gray = GrayImage::new(rgb.width(), rgb.height());
    for (out, px) in gray.pixels_mut().zip(rgb.pixels()) {
        *out = Luma([filters::bt601_luma(px[0], px[1], px[2])]);
    }
    gray
}

/// Scale to `[0, 1]` and lay out as NHWC `[1, H, W, 1]`
pub fn to_tensor(image: &GrayImage) -> Array4<f32> {
    let (width, height) = image.dimensions();
    let mut tensor = Array4::zeros((1, height as usize, width as usize, 1));

    for (x, y, pixel) in image.enumerate_pixels() {
        tensor[[0, y as usize, x as usize, 0]] = pixel[0] as f32 / 255.0;
    }

    tensor
}
