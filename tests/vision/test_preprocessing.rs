// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! End-to-end preprocessing tests on encoded uploads

use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use sign_gesture_node::vision::{
    decode_image_bytes, PreprocessConfig, PreprocessMode, Preprocessor,
};
use std::io::Cursor;

fn encode(img: RgbImage, format: ImageFormat) -> Vec<u8> {
    let mut buf = Cursor::new(Vec::new());
    DynamicImage::ImageRgb8(img).write_to(&mut buf, format).unwrap();
    buf.into_inner()
}

/// Dark hand-like blob with fingers on a light wall
fn gesture_photo() -> RgbImage {
    let mut img = RgbImage::from_pixel(200, 160, Rgb([235, 232, 228]));
    for y in 70..140 {
        for x in 60..140 {
            img.put_pixel(x, y, Rgb([150, 110, 90]));
        }
    }
    for finger in 0..4u32 {
        let x0 = 64 + finger * 20;
        for y in 20..70 {
            for x in x0..x0 + 12 {
                img.put_pixel(x, y, Rgb([150, 110, 90]));
            }
        }
    }
    img
}

#[test]
fn test_png_upload_to_tensor() {
    let bytes = encode(gesture_photo(), ImageFormat::Png);
    let (image, info) = decode_image_bytes(&bytes).unwrap();
    assert_eq!((info.width, info.height), (200, 160));

    let prepared = Preprocessor::new(PreprocessConfig::default())
        .unwrap()
        .prepare(&image)
        .unwrap();

    assert_eq!(prepared.tensor.shape(), &[1, 64, 64, 1]);
    assert!(prepared.tensor.iter().all(|v| (0.0..=1.0).contains(v)));

    // Flat wall and flat skin threshold to white; only outlines go black
    let thresh = prepared.thresholded.unwrap();
    let black = thresh.pixels().filter(|p| p[0] == 0).count();
    assert!(black > 0);
    assert!(black < (thresh.width() * thresh.height()) as usize / 2);
    assert_eq!(thresh.get_pixel(5, 5)[0], 255);
}

#[test]
fn test_jpeg_upload_to_tensor() {
    let bytes = encode(gesture_photo(), ImageFormat::Jpeg);
    let (image, _) = decode_image_bytes(&bytes).unwrap();

    let prepared = Preprocessor::new(PreprocessConfig::default())
        .unwrap()
        .prepare(&image)
        .unwrap();
    assert_eq!(prepared.tensor.shape(), &[1, 64, 64, 1]);
}

#[test]
fn test_plain_mode_keeps_intensity() {
    let bytes = encode(gesture_photo(), ImageFormat::Png);
    let (image, _) = decode_image_bytes(&bytes).unwrap();

    let prepared = Preprocessor::new(PreprocessConfig::default().with_mode(PreprocessMode::Plain))
        .unwrap()
        .prepare(&image)
        .unwrap();

    assert!(prepared.thresholded.is_none());
    // Top-left corner is the light wall
    assert!(prepared.tensor[[0, 0, 0, 0]] > 0.85);
    // Centre of the palm is darker
    assert!(prepared.tensor[[0, 45, 32, 0]] < 0.6);
}

#[test]
fn test_threshold_and_plain_differ() {
    let bytes = encode(gesture_photo(), ImageFormat::Png);
    let (image, _) = decode_image_bytes(&bytes).unwrap();

    let threshold = Preprocessor::new(PreprocessConfig::default())
        .unwrap()
        .prepare(&image)
        .unwrap();
    let plain = Preprocessor::new(PreprocessConfig::default().with_mode(PreprocessMode::Plain))
        .unwrap()
        .prepare(&image)
        .unwrap();

    assert_ne!(threshold.tensor, plain.tensor);
}
