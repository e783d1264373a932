//! Pixel sampling with bilinear and Lanczos3 interpolation.
//!
//! The compositor renders by inverse mapping: for every destination pixel
//! it asks which image-space point lands there and samples the source at
//! that point.
//! - **Bilinear**: fast, used for on-screen frames
//! - **Lanczos3**: sharper, used for export
//!
//! Image-space coordinates follow the pixel-area convention: pixel `(i, j)`
//! covers `[i, i+1) x [j, j+1)` and its center sits at `(i + 0.5, j + 0.5)`.
//! A point outside `[0, w) x [0, h)` is not covered by the image and samples
//! to `None`, which the compositor leaves transparent.

use image::RgbaImage;

/// Interpolation filter for resampling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InterpolationFilter {
    /// Fast bilinear interpolation - good for frame rendering.
    #[default]
    Bilinear,
    /// High-quality Lanczos3 interpolation - good for export.
    Lanczos3,
}

/// Sample the image at an image-space point.
///
/// Returns `None` when the point is not covered by the image.
pub fn sample(image: &RgbaImage, x: f64, y: f64, filter: InterpolationFilter) -> Option<[u8; 4]> {
    let (w, h) = (image.width() as f64, image.height() as f64);
    if !(x >= 0.0 && x < w && y >= 0.0 && y < h) {
        return None;
    }

    // Shift to pixel-center coordinates.
    let (cx, cy) = (x - 0.5, y - 0.5);
    Some(match filter {
        InterpolationFilter::Bilinear => sample_bilinear(image, cx, cy),
        InterpolationFilter::Lanczos3 => sample_lanczos3(image, cx, cy),
    })
}

/// Get a pixel as [f64; 4], clamping coordinates to the image edge.
#[inline]
fn get_pixel_f64(image: &RgbaImage, px: i64, py: i64) -> [f64; 4] {
    let px = px.clamp(0, image.width() as i64 - 1) as u32;
    let py = py.clamp(0, image.height() as i64 - 1) as u32;
    let p = image.get_pixel(px, py).0;
    [p[0] as f64, p[1] as f64, p[2] as f64, p[3] as f64]
}

/// Bilinear interpolation over the 4 nearest pixel centers.
fn sample_bilinear(image: &RgbaImage, x: f64, y: f64) -> [u8; 4] {
    let x0 = x.floor() as i64;
    let y0 = y.floor() as i64;

    // Fractional distances
    let fx = x - x0 as f64;
    let fy = y - y0 as f64;

    let p00 = get_pixel_f64(image, x0, y0);
    let p10 = get_pixel_f64(image, x0 + 1, y0);
    let p01 = get_pixel_f64(image, x0, y0 + 1);
    let p11 = get_pixel_f64(image, x0 + 1, y0 + 1);

    let mut result = [0u8; 4];
    for i in 0..4 {
        let v = p00[i] * (1.0 - fx) * (1.0 - fy)
            + p10[i] * fx * (1.0 - fy)
            + p01[i] * (1.0 - fx) * fy
            + p11[i] * fx * fy;
        result[i] = v.clamp(0.0, 255.0).round() as u8;
    }

    result
}

/// Lanczos3 interpolation over a 6x6 neighborhood.
fn sample_lanczos3(image: &RgbaImage, x: f64, y: f64) -> [u8; 4] {
    let x0 = x.floor() as i64;
    let y0 = y.floor() as i64;

    let mut sum = [0.0f64; 4];
    let mut weight_sum = 0.0;

    for ky in -2..=3 {
        for kx in -2..=3 {
            let px = x0 + kx;
            let py = y0 + ky;
            let weight = lanczos_weight(x - px as f64, 3.0) * lanczos_weight(y - py as f64, 3.0);

            let pixel = get_pixel_f64(image, px, py);
            for i in 0..4 {
                sum[i] += pixel[i] * weight;
            }
            weight_sum += weight;
        }
    }

    if weight_sum.abs() < f64::EPSILON {
        return sample_bilinear(image, x, y);
    }

    let mut result = [0u8; 4];
    for i in 0..4 {
        result[i] = (sum[i] / weight_sum).clamp(0.0, 255.0).round() as u8;
    }
    result
}

/// Lanczos kernel weight function.
///
/// ```text
/// L(x) = sinc(x) * sinc(x/a)  for |x| < a
/// L(x) = 0                     for |x| >= a
/// ```
fn lanczos_weight(x: f64, a: f64) -> f64 {
    if x.abs() < f64::EPSILON {
        return 1.0;
    }
    if x.abs() >= a {
        return 0.0;
    }

    let pi_x = std::f64::consts::PI * x;
    let pi_x_a = pi_x / a;
    (a * pi_x.sin() * pi_x_a.sin()) / (pi_x * pi_x)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gradient(width: u32, height: u32) -> RgbaImage {
        RgbaImage::from_fn(width, height, |x, y| {
            let v = ((x + y) * 8) as u8;
            image::Rgba([v, v, v, 255])
        })
    }

    #[test]
    fn test_outside_is_uncovered() {
        let img = gradient(10, 10);
        for filter in [InterpolationFilter::Bilinear, InterpolationFilter::Lanczos3] {
            assert!(sample(&img, -0.01, 5.0, filter).is_none());
            assert!(sample(&img, 5.0, 10.0, filter).is_none());
            assert!(sample(&img, f64::NAN, 5.0, filter).is_none());
        }
    }

    #[test]
    fn test_pixel_center_is_exact() {
        let img = gradient(10, 10);
        let p = sample(&img, 3.5, 4.5, InterpolationFilter::Bilinear).unwrap();
        assert_eq!(p, [56, 56, 56, 255]);
        let p = sample(&img, 3.5, 4.5, InterpolationFilter::Lanczos3).unwrap();
        assert_eq!(p, [56, 56, 56, 255]);
    }

    #[test]
    fn test_edges_clamp() {
        let img = gradient(4, 4);
        // Corner of the image: neighbors outside clamp to the edge pixel.
        let p = sample(&img, 0.0, 0.0, InterpolationFilter::Bilinear).unwrap();
        assert_eq!(p, [0, 0, 0, 255]);
    }

    #[test]
    fn test_bilinear_midpoint() {
        let img = RgbaImage::from_fn(2, 1, |x, _| {
            if x == 0 {
                image::Rgba([0, 0, 0, 255])
            } else {
                image::Rgba([200, 100, 50, 255])
            }
        });
        let p = sample(&img, 1.0, 0.5, InterpolationFilter::Bilinear).unwrap();
        assert_eq!(p, [100, 50, 25, 255]);
    }

    #[test]
    fn test_lanczos_uniform_image_is_stable() {
        let img = RgbaImage::from_pixel(8, 8, image::Rgba([90, 120, 30, 200]));
        let p = sample(&img, 3.3, 4.7, InterpolationFilter::Lanczos3).unwrap();
        assert_eq!(p, [90, 120, 30, 200]);
    }

    #[test]
    fn test_single_pixel_image() {
        let img = RgbaImage::from_pixel(1, 1, image::Rgba([7, 8, 9, 255]));
        for filter in [InterpolationFilter::Bilinear, InterpolationFilter::Lanczos3] {
            assert_eq!(sample(&img, 0.2, 0.9, filter), Some([7, 8, 9, 255]));
        }
    }

    #[test]
    fn test_lanczos_weight_at_zero() {
        let w = lanczos_weight(0.0, 3.0);
        assert!((w - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_lanczos_weight_at_boundary() {
        let w = lanczos_weight(3.0, 3.0);
        assert!(w.abs() < f64::EPSILON);
    }

    #[test]
    fn test_lanczos_weight_symmetry() {
        let w1 = lanczos_weight(1.5, 3.0);
        let w2 = lanczos_weight(-1.5, 3.0);
        assert!((w1 - w2).abs() < 1e-10);
    }
}
