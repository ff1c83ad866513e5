// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Low-level filters used by the gesture preprocessing pipeline
//!
//! Kernel derivation, border handling and threshold comparison follow the
//! conventions of the tooling the classifier was trained against, so that a
//! photo uploaded here produces the same binary mask the network saw.

use image::{GrayImage, Luma};
use imageproc::distance_transform::Norm;
use imageproc::morphology;

/// Fixed binomial kernels used when sigma is derived from a small kernel size
const SMALL_GAUSSIAN_KERNELS: [&[f64]; 4] = [
    &[1.0],
    &[0.25, 0.5, 0.25],
    &[0.0625, 0.25, 0.375, 0.25, 0.0625],
    &[
        0.03125, 0.109375, 0.21875, 0.28125, 0.21875, 0.109375, 0.03125,
    ],
];

/// How pixels outside the image are synthesized during convolution
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BorderMode {
    /// `cb|abcd|cb` - mirror without repeating the edge pixel
    Reflect101,
    /// `aa|abcd|dd` - repeat the edge pixel
    Replicate,
}

impl BorderMode {
    /// Map a possibly out-of-range coordinate into `0..len`
    pub fn resolve(self, index: isize, len: usize) -> usize {
        let len = len as isize;
        if len <= 1 {
            return 0;
        }

        match self {
            BorderMode::Replicate => index.clamp(0, len - 1) as usize,
            BorderMode::Reflect101 => {
                let mut i = index;
                // Kernels wider than the image bounce more than once
                while i < 0 || i >= len {
                    if i < 0 {
                        i = -i;
                    }
                    if i >= len {
                        i = 2 * (len - 1) - i;
                    }
                }
                i as usize
            }
        }
    }
}

/// Build a normalized 1-D Gaussian kernel
///
/// A non-positive `sigma` means "derive it from the kernel size": sizes 1, 3,
/// 5 and 7 use fixed binomial weights, larger sizes use
/// `sigma = 0.3 * ((ksize - 1) * 0.5 - 1) + 0.8`.
pub fn gaussian_kernel(ksize: usize, sigma: f64) -> Vec<f32> {
    debug_assert!(ksize % 2 == 1, "kernel size must be odd");

    if sigma <= 0.0 && ksize <= 7 {
        return SMALL_GAUSSIAN_KERNELS[ksize / 2]
            .iter()
            .map(|&w| w as f32)
            .collect();
    }

    let sigma = if sigma > 0.0 {
        sigma
    } else {
        0.3 * ((ksize as f64 - 1.0) * 0.5 - 1.0) + 0.8
    };
    let scale = -0.5 / (sigma * sigma);
    let center = (ksize as f64 - 1.0) * 0.5;

    let weights: Vec<f64> = (0..ksize)
        .map(|i| {
            let x = i as f64 - center;
            (scale * x * x).exp()
        })
        .collect();
    let sum: f64 = weights.iter().sum();

    weights.into_iter().map(|w| (w / sum) as f32).collect()
}

/// Convolve with `kernel` horizontally then vertically, rounding to u8
pub fn separable_filter(image: &GrayImage, kernel: &[f32], border: BorderMode) -> GrayImage {
    let (width, height) = image.dimensions();
    let (w, h) = (width as usize, height as usize);
    if w == 0 || h == 0 {
        return image.clone();
    }

    let radius = (kernel.len() / 2) as isize;
    let src = image.as_raw();

    let mut horizontal = vec![0.0f32; w * h];
    for y in 0..h {
        let row = &src[y * w..(y + 1) * w];
        for x in 0..w {
            let mut acc = 0.0f32;
            for (k, weight) in kernel.iter().enumerate() {
                let sx = border.resolve(x as isize + k as isize - radius, w);
                acc += row[sx] as f32 * weight;
            }
            horizontal[y * w + x] = acc;
        }
    }

    let mut output = GrayImage::new(width, height);
    for y in 0..h {
        for x in 0..w {
            let mut acc = 0.0f32;
            for (k, weight) in kernel.iter().enumerate() {
                let sy = border.resolve(y as isize + k as isize - radius, h);
                acc += horizontal[sy * w + x] * weight;
            }
            output.put_pixel(x as u32, y as u32, Luma([saturate_u8(acc)]));
        }
    }

    output
}

/// Gaussian blur with a square `ksize x ksize` kernel and derived sigma
pub fn gaussian_blur(image: &GrayImage, ksize: usize, border: BorderMode) -> GrayImage {
    let kernel = gaussian_kernel(ksize, 0.0);
    separable_filter(image, &kernel, border)
}

/// Binary adaptive threshold against a Gaussian-weighted local mean
///
/// A pixel becomes `max_value` when `src - mean > -ceil(c)`, otherwise 0.
/// The local mean is taken over a `block_size x block_size` neighbourhood
/// with replicated borders.
pub fn adaptive_threshold_gaussian(
    image: &GrayImage,
    max_value: u8,
    block_size: usize,
    c: f64,
) -> GrayImage {
    let mean = gaussian_blur(image, block_size, BorderMode::Replicate);
    let delta = c.ceil() as i32;

    let mut output = GrayImage::new(image.width(), image.height());
    for ((out, src), local) in output
        .pixels_mut()
        .zip(image.pixels())
        .zip(mean.pixels())
    {
        let diff = src[0] as i32 - local[0] as i32;
        out[0] = if diff > -delta { max_value } else { 0 };
    }

    output
}

/// Morphological open (erode then dilate) with a square structuring element
///
/// Nonzero pixels are foreground. `ksize` is the side of the square, so 3
/// removes isolated specks one pixel wide.
pub fn morph_open(image: &GrayImage, ksize: usize) -> GrayImage {
    let radius = (ksize / 2).min(u8::MAX as usize) as u8;
    if radius == 0 {
        return image.clone();
    }
    morphology::open(image, Norm::LInf, radius)
}

/// Fixed-point precision of the bilinear resize coefficients
const RESIZE_COEF_BITS: u32 = 11;
const RESIZE_COEF_SCALE: i32 = 1 << RESIZE_COEF_BITS;

/// Source taps for one output coordinate: two indices and their fixed-point weights
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct LinearTap {
    i0: usize,
    i1: usize,
    w0: i32,
    w1: i32,
}

/// Sample positions `(d + 0.5) * scale - 0.5`, clamped to the edge pixels
fn linear_taps(src_len: usize, dst_len: usize) -> Vec<LinearTap> {
    let scale = src_len as f64 / dst_len as f64;

    (0..dst_len)
        .map(|d| {
            let pos = ((d as f64 + 0.5) * scale - 0.5) as f32;
            let floor = pos.floor();
            let mut index = floor as isize;
            let mut frac = pos - floor;

            if index < 0 {
                index = 0;
                frac = 0.0;
            }
            if index >= src_len as isize - 1 {
                index = src_len as isize - 1;
                frac = 0.0;
            }

            let w1 = (frac * RESIZE_COEF_SCALE as f32).round() as i32;
            let i0 = index as usize;
            LinearTap {
                i0,
                i1: (i0 + 1).min(src_len - 1),
                w0: RESIZE_COEF_SCALE - w1,
                w1,
            }
        })
        .collect()
}

/// Bilinear resize sampling the 2x2 neighbourhood of each output pixel
///
/// No antialiasing: a downscale reads only the two nearest source pixels per
/// axis, so thin mask edges survive instead of being averaged away. Weights
/// are 11-bit fixed point and the result is rounded once after both passes.
pub fn resize_linear(image: &GrayImage, width: u32, height: u32) -> GrayImage {
    let (src_w, src_h) = (image.width() as usize, image.height() as usize);
    if src_w == 0 || src_h == 0 || width == 0 || height == 0 {
        return GrayImage::new(width, height);
    }

    let (dst_w, dst_h) = (width as usize, height as usize);
    let xtaps = linear_taps(src_w, dst_w);
    let ytaps = linear_taps(src_h, dst_h);
    let src = image.as_raw();

    let mut horizontal = vec![0i64; src_h * dst_w];
    for y in 0..src_h {
        let row = &src[y * src_w..(y + 1) * src_w];
        for (x, tap) in xtaps.iter().enumerate() {
            horizontal[y * dst_w + x] =
                (row[tap.i0] as i32 * tap.w0 + row[tap.i1] as i32 * tap.w1) as i64;
        }
    }

    let shift = 2 * RESIZE_COEF_BITS;
    let round = 1i64 << (shift - 1);

    let mut output = GrayImage::new(width, height);
    for (y, tap) in ytaps.iter().enumerate() {
        let row0 = &horizontal[tap.i0 * dst_w..(tap.i0 + 1) * dst_w];
        let row1 = &horizontal[tap.i1 * dst_w..(tap.i1 + 1) * dst_w];
        for x in 0..dst_w {
            let acc = row0[x] * tap.w0 as i64 + row1[x] * tap.w1 as i64;
            let value = ((acc + round) >> shift).clamp(0, 255) as u8;
            output.put_pixel(x as u32, y as u32, Luma([value]));
        }
    }

    output
}

/// Convert an RGB triple to luma with BT.601 weights
pub fn bt601_luma(r: u8, g: u8, b: u8) -> u8 {
    let weighted = 299 * r as u32 + 587 * g as u32 + 114 * b as u32;
    ((weighted + 500) / 1000) as u8
}

fn saturate_u8(value: f32) -> u8 {
    value.round().clamp(0.0, 255.0) as u8
}
