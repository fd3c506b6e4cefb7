//! pixmill-test - Regression test framework for pixmill
//!
//! Every `tests/*_reg.rs` file in the workspace drives its checks through
//! [`RegParams`], which numbers each comparison, records failures and
//! prints a summary on [`RegParams::cleanup`]. Two modes are supported:
//!
//! - **Compare**: Run every comparison and report failures (default)
//! - **Display**: Additionally print each compared value
//!
//! The engines work on raw buffers only, so fixtures are synthesized here
//! instead of being loaded from image files.
//!
//! # Usage
//!
//! ```ignore
//! use pixmill_test::{RegParams, uniform_image};
//!
//! let mut rp = RegParams::new("resize");
//! let image = uniform_image(4, 4, PixelFormat::Rgb, &[200, 100, 50]).unwrap();
//! rp.compare_values(200.0, image.pixel(0, 0)[0] as f64, 0.0);
//! assert!(rp.cleanup());
//! ```
//!
//! # Environment Variables
//!
//! - `REGTEST_MODE`: Set to "compare" or "display"

mod error;
mod params;

pub use error::{TestError, TestResult};
pub use params::{RegParams, RegTestMode};

use pixmill_core::{NativeImage, PixelFormat};

/// Write raw sample values into the pixel at `(x, y)`.
///
/// # Errors
///
/// Returns [`TestError::SampleCount`] if `samples` does not hold one value
/// per channel, or [`TestError::SampleRange`] if a value exceeds the sample
/// depth of the format.
pub fn set_pixel_raw(image: &mut NativeImage, x: u32, y: u32, samples: &[u16]) -> TestResult<()> {
    let format = image.format();
    check_samples(format, samples)?;
    let bpp = format.bytes_per_pixel();
    let start = x as usize * bpp;
    let pixel = &mut image.row_mut(y)[start..start + bpp];
    if format.is_16bit() {
        for (dst, value) in pixel.chunks_exact_mut(2).zip(samples) {
            dst.copy_from_slice(&value.to_ne_bytes());
        }
    } else {
        for (dst, &value) in pixel.iter_mut().zip(samples) {
            *dst = value as u8;
        }
    }
    Ok(())
}

/// Read the raw sample values of the pixel at `(x, y)`.
pub fn pixel_raw(image: &NativeImage, x: u32, y: u32) -> Vec<u16> {
    let pixel = image.pixel(x, y);
    if image.format().is_16bit() {
        pixel
            .chunks_exact(2)
            .map(|s| u16::from_ne_bytes([s[0], s[1]]))
            .collect()
    } else {
        pixel.iter().map(|&s| s as u16).collect()
    }
}

fn check_samples(format: PixelFormat, samples: &[u16]) -> TestResult<()> {
    if samples.len() != format.channels() {
        return Err(TestError::SampleCount {
            format,
            expected: format.channels(),
            actual: samples.len(),
        });
    }
    let max = format.max_value();
    if let Some(&value) = samples.iter().find(|&&v| v as u32 > max) {
        return Err(TestError::SampleRange { format, value, max });
    }
    Ok(())
}

/// Create an image where every pixel holds the same raw samples.
pub fn uniform_image(
    width: u32,
    height: u32,
    format: PixelFormat,
    samples: &[u16],
) -> TestResult<NativeImage> {
    check_samples(format, samples)?;
    let mut image = NativeImage::new(width, height, format)?;
    for y in 0..height {
        for x in 0..width {
            set_pixel_raw(&mut image, x, y, samples)?;
        }
    }
    Ok(image)
}

/// Create an image with a distinct ramp in every channel.
///
/// Channel 0 rises left to right, channel 1 top to bottom, channel 2 along
/// the diagonal and channel 3 falls left to right. Each ramp spans the full
/// sample range of the format.
pub fn gradient_image(width: u32, height: u32, format: PixelFormat) -> TestResult<NativeImage> {
    let mut image = NativeImage::new(width, height, format)?;
    let max = format.max_value() as u64;
    let ramp = |pos: u32, extent: u32| -> u16 {
        if extent <= 1 {
            0
        } else {
            (pos as u64 * max / (extent as u64 - 1)) as u16
        }
    };
    let mut samples = vec![0u16; format.channels()];
    for y in 0..height {
        for x in 0..width {
            let all = [
                ramp(x, width),
                ramp(y, height),
                ramp(x + y, width + height - 1),
                max as u16 - ramp(x, width),
            ];
            samples.copy_from_slice(&all[..format.channels()]);
            set_pixel_raw(&mut image, x, y, &samples)?;
        }
    }
    Ok(image)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniform_image() {
        let image = uniform_image(3, 2, PixelFormat::Rgb16, &[1, 1000, 65535]).unwrap();
        for y in 0..2 {
            for x in 0..3 {
                assert_eq!(pixel_raw(&image, x, y), vec![1, 1000, 65535]);
            }
        }
    }

    #[test]
    fn test_sample_validation() {
        assert!(matches!(
            uniform_image(1, 1, PixelFormat::Rgb, &[1, 2]),
            Err(TestError::SampleCount {
                expected: 3,
                actual: 2,
                ..
            })
        ));
        assert!(matches!(
            uniform_image(1, 1, PixelFormat::Grey, &[256]),
            Err(TestError::SampleRange { value: 256, .. })
        ));
    }

    #[test]
    fn test_gradient_image_ramps() {
        let image = gradient_image(5, 3, PixelFormat::Rgba).unwrap();
        assert_eq!(pixel_raw(&image, 0, 0), vec![0, 0, 0, 255]);
        assert_eq!(pixel_raw(&image, 4, 2), vec![255, 255, 255, 0]);
        assert_eq!(pixel_raw(&image, 2, 1)[1], 127);
    }
}
