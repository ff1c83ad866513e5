// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Inspection helpers for debugging what the classifier actually sees

use anyhow::{Context, Result};
use image::imageops::{self, FilterType};
use image::{DynamicImage, GrayImage};
use std::fmt;
use std::path::Path;

use super::preprocessing::to_grayscale;

/// Characters from dark to light
pub const ASCII_RAMP: &str = "@%#*+=-:. ";

/// Default side length of the ASCII rendering
pub const ASCII_SIZE: u32 = 48;

/// File name of the decoded upload written to the debug directory
pub const DEBUG_INPUT_FILE: &str = "debug_input.jpg";

/// File name of the thresholded mask written to the debug directory
pub const DEBUG_THRESH_FILE: &str = "debug_thresh.jpg";

/// Render an image as `size` lines of `size` characters
pub fn ascii_art(image: &DynamicImage, size: u32) -> String {
    let gray = to_grayscale(image);
    let resized = imageops::resize(&gray, size, size, FilterType::CatmullRom);
    let ramp: Vec<char> = ASCII_RAMP.chars().collect();
    let steps = (ramp.len() - 1) as f32;

    let mut out = String::with_capacity(((size + 1) * size) as usize);
    for row in resized.rows() {
        for pixel in row {
            let index = (pixel[0] as f32 / 255.0 * steps) as usize;
            out.push(ramp[index.min(ramp.len() - 1)]);
        }
        out.push('\n');
    }
    out
}

/// Pixel statistics on a `[0, 1]` scale
#[derive(Debug, Clone, PartialEq)]
pub struct ImageStats {
    pub width: u32,
    pub height: u32,
    pub mean: f32,
    pub std_dev: f32,
    pub min: f32,
    pub max: f32,
    /// Average of the four corner pixels, a rough background estimate
    pub corner_average: f32,
}

impl ImageStats {
    pub fn from_image(image: &DynamicImage) -> Option<Self> {
        Self::from_gray(&to_grayscale(image))
    }

    /// `None` for images without pixels
    pub fn from_gray(gray: &GrayImage) -> Option<Self> {
        let (width, height) = gray.dimensions();
        if width == 0 || height == 0 {
            return None;
        }

        let values: Vec<f64> = gray.pixels().map(|p| p[0] as f64 / 255.0).collect();
        let count = values.len() as f64;
        let mean = values.iter().sum::<f64>() / count;
        let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / count;
        let min = values.iter().cloned().fold(f64::INFINITY, f64::min);
        let max = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);

        let corners = [
            gray.get_pixel(0, 0)[0],
            gray.get_pixel(width - 1, 0)[0],
            gray.get_pixel(0, height - 1)[0],
            gray.get_pixel(width - 1, height - 1)[0],
        ];
        let corner_average =
            corners.iter().map(|&c| c as f64 / 255.0).sum::<f64>() / corners.len() as f64;

        Some(Self {
            width,
            height,
            mean: mean as f32,
            std_dev: variance.sqrt() as f32,
            min: min as f32,
            max: max as f32,
            corner_average: corner_average as f32,
        })
    }

    /// Whether the background looks light (dark hand on white)
    pub fn has_light_background(&self) -> bool {
        self.corner_average > 0.5
    }
}

impl fmt::Display for ImageStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Size: {}x{}", self.width, self.height)?;
        writeln!(f, "Mean pixel value: {:.4}", self.mean)?;
        writeln!(f, "Std Dev: {:.4}", self.std_dev)?;
        writeln!(f, "Min: {:.4}, Max: {:.4}", self.min, self.max)?;
        write!(
            f,
            "Corner average (approx background): {:.4}",
            self.corner_average
        )
    }
}

/// Persist the decoded upload and its thresholded mask for later inspection
pub fn write_debug_images(
    dir: &Path,
    input: &DynamicImage,
    thresholded: Option<&GrayImage>,
) -> Result<()> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create debug directory {}", dir.display()))?;

    let input_path = dir.join(DEBUG_INPUT_FILE);
    input
        .to_rgb8()
        .save(&input_path)
        .with_context(|| format!("Failed to write {}", input_path.display()))?;

    if let Some(thresh) = thresholded {
        let thresh_path = dir.join(DEBUG_THRESH_FILE);
        thresh
            .save(&thresh_path)
            .with_context(|| format!("Failed to write {}", thresh_path.display()))?;
    }

    Ok(())
}
