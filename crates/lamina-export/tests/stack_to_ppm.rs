//! Integration test: stack in-memory PNGs through the full pipeline and export to PPM text.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use lamina_core::{ReduceMode, StackConfig};

/// Encode a uniform RGB image as a PNG byte buffer.
fn rgb_png(width: u32, height: u32, pixel: [u8; 3]) -> Vec<u8> {
    let img = image::RgbImage::from_pixel(width, height, image::Rgb(pixel));
    let mut buf = Vec::new();
    let encoder = image::codecs::png::PngEncoder::new(&mut buf);
    image::ImageEncoder::write_image(
        encoder,
        img.as_raw(),
        img.width(),
        img.height(),
        image::ExtendedColorType::Rgb8,
    )
    .unwrap();
    buf
}

/// Encode a uniform grayscale image as a PNG byte buffer.
fn gray_png(width: u32, height: u32, value: u8) -> Vec<u8> {
    let img = image::GrayImage::from_pixel(width, height, image::Luma([value]));
    let mut buf = Vec::new();
    let encoder = image::codecs::png::PngEncoder::new(&mut buf);
    image::ImageEncoder::write_image(
        encoder,
        img.as_raw(),
        img.width(),
        img.height(),
        image::ExtendedColorType::L8,
    )
    .unwrap();
    buf
}

#[test]
fn mean_stack_of_rgb_images_exports_as_p3() {
    let a = rgb_png(2, 2, [10, 100, 200]);
    let b = rgb_png(2, 2, [21, 101, 201]);

    let outcome = lamina_core::stack(&[&a, &b], &StackConfig::default()).expect("stack succeeds");
    assert_eq!(outcome.accepted, 2);

    let text = lamina_export::to_ppm(&outcome.composite).expect("export succeeds");
    let mut lines = text.lines();
    assert_eq!(lines.next(), Some("P3"));
    assert_eq!(lines.next(), Some("2 2"));
    assert_eq!(lines.next(), Some("255"));
    // (10+21)/2 = 15.5 rounds up to 16; other channels round exactly.
    for line in lines {
        assert_eq!(line, "16 101 201");
    }
}

#[test]
fn median_stack_of_gray_images_exports_as_p2() {
    let inputs = [gray_png(3, 1, 250), gray_png(3, 1, 10), gray_png(3, 1, 255)];
    let refs: Vec<&[u8]> = inputs.iter().map(Vec::as_slice).collect();

    let config = StackConfig {
        mode: ReduceMode::Median,
    };
    let outcome = lamina_core::stack(&refs, &config).expect("stack succeeds");

    let text = lamina_export::to_ppm(&outcome.composite).expect("export succeeds");
    // Sorted [10, 250, 255], mid = 1 -> 250 at every position.
    assert_eq!(text, "P2\n3 1\n255\n250\n250\n250\n");
}

#[test]
fn skipped_inputs_do_not_reach_the_artifact() {
    let good = gray_png(2, 2, 40);
    let mismatched = gray_png(4, 4, 200);
    let corrupt: &[u8] = &[0x00, 0x01];

    let outcome = lamina_core::stack(&[&good, &mismatched, corrupt], &StackConfig::default())
        .expect("stack succeeds");
    assert_eq!(outcome.accepted, 1);
    assert_eq!(outcome.skipped.len(), 2);

    let text = lamina_export::to_ppm(&outcome.composite).expect("export succeeds");
    // Only the accepted image contributes: identity output.
    assert_eq!(text, "P2\n2 2\n255\n40\n40\n40\n40\n");
}
