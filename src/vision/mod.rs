// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Vision processing module for CPU-based image analysis
//!
//! This module provides:
//! - Decoding of uploaded photos
//! - The threshold pipeline that turns a photo into a classifier tensor
//! - Inspection helpers (ASCII rendering, pixel statistics, debug dumps)

pub mod filters;
pub mod image_utils;
pub mod inspect;
pub mod preprocessing;

pub use image_utils::{decode_image_bytes, detect_format, load_image_file, ImageError, ImageInfo};
pub use inspect::{ascii_art, write_debug_images, ImageStats};
pub use preprocessing::{
    PreprocessConfig, PreprocessError, PreprocessMode, Prepared, Preprocessor, IMG_SIZE,
};
