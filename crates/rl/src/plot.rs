//! Minimal line chart of the training curve, written as a PNG.

use image::{ImageResult, Rgb, RgbImage};
use std::path::Path;

const WIDTH: u32 = 640;
const HEIGHT: u32 = 480;
const MARGIN: u32 = 40;

const BACKGROUND: Rgb<u8> = Rgb([255, 255, 255]);
const AXIS: Rgb<u8> = Rgb([0, 0, 0]);
const LINE: Rgb<u8> = Rgb([31, 119, 180]);

/// Draws `ys` against the iteration index and saves it to `path`.
///
/// The y axis spans the data range (padded when flat); the x axis spans
/// `0..ys.len() - 1`.
///
/// # Errors
///
/// Returns any encoding or I/O error from `image`.
pub fn export_plot(ys: &[f32], path: &Path) -> ImageResult<()> {
    render(ys).save(path)
}

/// Renders the chart in memory.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_possible_wrap)]
pub fn render(ys: &[f32]) -> RgbImage {
    let mut img = RgbImage::from_pixel(WIDTH, HEIGHT, BACKGROUND);
    let (left, right, top, bottom) = (MARGIN, WIDTH - MARGIN, MARGIN, HEIGHT - MARGIN);

    for x in left..=right {
        img.put_pixel(x, bottom, AXIS);
    }
    for y in top..=bottom {
        img.put_pixel(left, y, AXIS);
    }

    let finite: Vec<f32> = ys.iter().copied().filter(|v| v.is_finite()).collect();
    if finite.is_empty() {
        return img;
    }
    let mut lo = finite.iter().copied().fold(f32::INFINITY, f32::min);
    let mut hi = finite.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    if (hi - lo).abs() < f32::EPSILON {
        lo -= 1.0;
        hi += 1.0;
    }

    let span_x = (right - left) as f32;
    let span_y = (bottom - top) as f32;
    let last = ys.len().saturating_sub(1).max(1) as f32;
    let to_pixel = |i: usize, v: f32| -> (i64, i64) {
        let px = left as f32 + i as f32 / last * span_x;
        let py = bottom as f32 - (v - lo) / (hi - lo) * span_y;
        (px.round() as i64, py.round() as i64)
    };

    let points: Vec<(i64, i64)> = ys
        .iter()
        .enumerate()
        .filter(|(_, v)| v.is_finite())
        .map(|(i, &v)| to_pixel(i, v))
        .collect();
    if let [only] = points.as_slice() {
        put(&mut img, *only, LINE);
    }
    for pair in points.windows(2) {
        draw_line(&mut img, pair[0], pair[1], LINE);
    }
    img
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn put(img: &mut RgbImage, (x, y): (i64, i64), color: Rgb<u8>) {
    if x >= 0 && y >= 0 && (x as u32) < img.width() && (y as u32) < img.height() {
        img.put_pixel(x as u32, y as u32, color);
    }
}

/// Bresenham line between two pixel coordinates.
fn draw_line(
    img: &mut RgbImage,
    (mut x0, mut y0): (i64, i64),
    (x1, y1): (i64, i64),
    color: Rgb<u8>,
) {
    let dx = (x1 - x0).abs();
    let dy = -(y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;
    loop {
        put(img, (x0, y0), color);
        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}
