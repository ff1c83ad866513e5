// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Inspection helpers against images on disk

use image::{GrayImage, Luma};
use sign_gesture_node::vision::{ascii_art, load_image_file, ImageStats};

#[test]
fn test_stats_from_saved_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("half.png");

    let mut gray = GrayImage::from_pixel(10, 10, Luma([255]));
    for y in 0..10 {
        for x in 0..5 {
            gray.put_pixel(x, y, Luma([0]));
        }
    }
    gray.save(&path).unwrap();

    let (image, info) = load_image_file(&path).unwrap();
    assert_eq!((info.width, info.height), (10, 10));

    let stats = ImageStats::from_image(&image).unwrap();
    assert!((stats.mean - 0.5).abs() < 1e-6);
    assert!((stats.std_dev - 0.5).abs() < 1e-6);
    assert_eq!(stats.min, 0.0);
    assert_eq!(stats.max, 1.0);
    assert!((stats.corner_average - 0.5).abs() < 1e-6);
}

#[test]
fn test_ascii_from_saved_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("black.png");
    GrayImage::from_pixel(30, 30, Luma([0])).save(&path).unwrap();

    let (image, _) = load_image_file(&path).unwrap();
    let art = ascii_art(&image, 48);

    assert_eq!(art.lines().count(), 48);
    assert!(art.lines().all(|line| line == "@".repeat(48)));
}
