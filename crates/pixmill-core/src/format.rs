//! Pixel format table
//!
//! Every image handled by pixmill stores its samples in one of eight
//! interleaved layouts: grey, grey+alpha, RGB and RGBA, each with 8-bit or
//! 16-bit samples. This module describes those layouts and converts single
//! pixels between their packed bytes and normalized `f32` channel values.
//!
//! # Sample encoding
//!
//! - 8-bit samples are plain bytes.
//! - 16-bit samples are native-endian `u16`. Codecs that carry big-endian
//!   samples on the wire swap them before handing the buffer over (see
//!   [`NativeImage::swap_sample_bytes`](crate::NativeImage::swap_sample_bytes)).
//!
//! Unpacking maps a raw sample `r` to `r / max`. Packing maps a normalized
//! value `v` to `v * max + 0.5`, clamps it to `[0, max]` and truncates.
//!
//! # Dispatch
//!
//! Whole-image loops should not branch on the format per pixel. Two ways to
//! resolve the format once are provided:
//!
//! - [`PixelFormat::codec`] returns a [`PixelCodec`] holding plain function
//!   pointers.
//! - [`with_pixel_layout!`](crate::with_pixel_layout) expands a block once
//!   per format with a [`PixelLayout`] type in scope, for fully
//!   monomorphized loops.

use crate::error::{Error, Result};
use std::fmt;
use std::marker::PhantomData;
use std::str::FromStr;

/// Largest channel count of any supported format.
pub const MAX_CHANNELS: usize = 4;

/// Pixel format (channel layout and sample depth)
///
/// Channel order is luminance/red first, then green (or alpha for the
/// two-channel formats), blue, and alpha last.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PixelFormat {
    /// 8-bit luminance
    Grey,
    /// 8-bit luminance + alpha
    GreyAlpha,
    /// 8-bit red, green, blue
    Rgb,
    /// 8-bit red, green, blue, alpha
    Rgba,
    /// 16-bit luminance
    Grey16,
    /// 16-bit luminance + alpha
    GreyAlpha16,
    /// 16-bit red, green, blue
    Rgb16,
    /// 16-bit red, green, blue, alpha
    Rgba16,
}

impl PixelFormat {
    /// Every supported format, 8-bit formats first.
    pub const ALL: [PixelFormat; 8] = [
        PixelFormat::Grey,
        PixelFormat::GreyAlpha,
        PixelFormat::Rgb,
        PixelFormat::Rgba,
        PixelFormat::Grey16,
        PixelFormat::GreyAlpha16,
        PixelFormat::Rgb16,
        PixelFormat::Rgba16,
    ];

    /// Number of channels per pixel (1 to 4).
    #[inline]
    pub fn channels(self) -> usize {
        match self {
            Self::Grey | Self::Grey16 => 1,
            Self::GreyAlpha | Self::GreyAlpha16 => 2,
            Self::Rgb | Self::Rgb16 => 3,
            Self::Rgba | Self::Rgba16 => 4,
        }
    }

    /// Bytes per channel sample (1 or 2).
    #[inline]
    pub fn sample_size(self) -> usize {
        if self.is_16bit() { 2 } else { 1 }
    }

    /// Bytes per pixel, always `channels() * sample_size()`.
    #[inline]
    pub fn bytes_per_pixel(self) -> usize {
        self.channels() * self.sample_size()
    }

    /// Largest raw sample value.
    #[inline]
    pub fn max_value(self) -> u32 {
        if self.is_16bit() { 65535 } else { 255 }
    }

    /// Whether samples are 16 bits wide.
    #[inline]
    pub fn is_16bit(self) -> bool {
        matches!(
            self,
            Self::Grey16 | Self::GreyAlpha16 | Self::Rgb16 | Self::Rgba16
        )
    }

    /// Whether the last channel is alpha.
    #[inline]
    pub fn has_alpha(self) -> bool {
        matches!(self.channels(), 2 | 4)
    }

    /// Lower-case name, as accepted by [`FromStr`].
    pub fn name(self) -> &'static str {
        match self {
            Self::Grey => "grey",
            Self::GreyAlpha => "greya",
            Self::Rgb => "rgb",
            Self::Rgba => "rgba",
            Self::Grey16 => "grey16",
            Self::GreyAlpha16 => "greya16",
            Self::Rgb16 => "rgb16",
            Self::Rgba16 => "rgba16",
        }
    }

    /// Format with the given channel count and sample size, if any.
    pub fn from_layout(channels: usize, sample_size: usize) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|f| f.channels() == channels && f.sample_size() == sample_size)
    }

    /// Conventional row stride: one row of pixels rounded up to 4 bytes.
    ///
    /// Returns `None` if the stride does not fit in `u32`.
    pub fn row_stride(self, width: u32) -> Option<u32> {
        let row = width.checked_mul(self.bytes_per_pixel() as u32)?;
        Some(row.checked_add(3)? & !3)
    }

    /// Resolve the conversion table entry for this format.
    pub fn codec(self) -> PixelCodec {
        crate::with_pixel_layout!(self, |L| PixelCodec::of::<L>())
    }

    /// Unpack one pixel into normalized channel values.
    ///
    /// `src` must hold at least `bytes_per_pixel()` bytes and `out` at least
    /// `channels()` values.
    #[inline]
    pub fn unpack(self, src: &[u8], out: &mut [f32]) {
        (self.codec().unpack)(src, out)
    }

    /// Pack normalized channel values into one pixel.
    ///
    /// `values` must hold at least `channels()` values and `dst` at least
    /// `bytes_per_pixel()` bytes.
    #[inline]
    pub fn pack(self, values: &[f32], dst: &mut [u8]) {
        (self.codec().pack)(values, dst)
    }
}

impl fmt::Display for PixelFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PixelFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "grey" | "gray" => Ok(Self::Grey),
            "greya" | "graya" => Ok(Self::GreyAlpha),
            "rgb" => Ok(Self::Rgb),
            "rgba" => Ok(Self::Rgba),
            "grey16" | "gray16" => Ok(Self::Grey16),
            "greya16" | "graya16" => Ok(Self::GreyAlpha16),
            "rgb16" => Ok(Self::Rgb16),
            "rgba16" => Ok(Self::Rgba16),
            _ => Err(Error::UnknownFormat(s.to_string())),
        }
    }
}

/// One channel sample type (`u8` or `u16`).
pub trait Sample: Copy + Send + Sync + 'static {
    /// Size of one sample in bytes.
    const SIZE: usize;
    /// Largest raw value, as `f32`.
    const MAX: f32;

    /// Read one raw sample from the front of `src`.
    fn load(src: &[u8]) -> f32;

    /// Write `raw`, already clamped to `[0, MAX]`, to the front of `dst`.
    fn store(raw: f32, dst: &mut [u8]);
}

impl Sample for u8 {
    const SIZE: usize = 1;
    const MAX: f32 = 255.0;

    #[inline(always)]
    fn load(src: &[u8]) -> f32 {
        src[0] as f32
    }

    #[inline(always)]
    fn store(raw: f32, dst: &mut [u8]) {
        dst[0] = raw as u8;
    }
}

impl Sample for u16 {
    const SIZE: usize = 2;
    const MAX: f32 = 65535.0;

    #[inline(always)]
    fn load(src: &[u8]) -> f32 {
        u16::from_ne_bytes([src[0], src[1]]) as f32
    }

    #[inline(always)]
    fn store(raw: f32, dst: &mut [u8]) {
        dst[..2].copy_from_slice(&(raw as u16).to_ne_bytes());
    }
}

/// Compile-time description of one pixel format.
///
/// Implemented by [`Layout`]; use the `Grey8` ... `Rgba16` aliases.
pub trait PixelLayout: 'static {
    /// The runtime format this layout describes.
    const FORMAT: PixelFormat;
    /// Channels per pixel.
    const CHANNELS: usize;
    /// Bytes per pixel.
    const BYTES: usize;

    /// Unpack the pixel at the front of `src` into `out[..CHANNELS]`.
    fn unpack(src: &[u8], out: &mut [f32]);

    /// Pack `values[..CHANNELS]` into the pixel at the front of `dst`.
    fn pack(values: &[f32], dst: &mut [u8]);
}

/// Interleaved layout of `N` channels of sample type `S`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Layout<S, const N: usize>(PhantomData<S>);

const fn format_for(sample_size: usize, channels: usize) -> PixelFormat {
    match (sample_size, channels) {
        (1, 1) => PixelFormat::Grey,
        (1, 2) => PixelFormat::GreyAlpha,
        (1, 3) => PixelFormat::Rgb,
        (1, 4) => PixelFormat::Rgba,
        (2, 1) => PixelFormat::Grey16,
        (2, 2) => PixelFormat::GreyAlpha16,
        (2, 3) => PixelFormat::Rgb16,
        (2, 4) => PixelFormat::Rgba16,
        _ => panic!("unsupported pixel layout"),
    }
}

impl<S: Sample, const N: usize> PixelLayout for Layout<S, N> {
    const FORMAT: PixelFormat = format_for(S::SIZE, N);
    const CHANNELS: usize = N;
    const BYTES: usize = N * S::SIZE;

    #[inline(always)]
    fn unpack(src: &[u8], out: &mut [f32]) {
        for (value, sample) in out[..N].iter_mut().zip(src.chunks_exact(S::SIZE)) {
            *value = S::load(sample) / S::MAX;
        }
    }

    #[inline(always)]
    fn pack(values: &[f32], dst: &mut [u8]) {
        for (value, sample) in values[..N].iter().zip(dst.chunks_exact_mut(S::SIZE)) {
            let raw = (value * S::MAX + 0.5).clamp(0.0, S::MAX);
            S::store(raw, sample);
        }
    }
}

/// 8-bit grey layout
pub type Grey8 = Layout<u8, 1>;
/// 8-bit grey with alpha layout
pub type GreyAlpha8 = Layout<u8, 2>;
/// 8-bit RGB layout
pub type Rgb8 = Layout<u8, 3>;
/// 8-bit RGBA layout
pub type Rgba8 = Layout<u8, 4>;
/// 16-bit grey layout
pub type Grey16 = Layout<u16, 1>;
/// 16-bit grey with alpha layout
pub type GreyAlpha16 = Layout<u16, 2>;
/// 16-bit RGB layout
pub type Rgb16 = Layout<u16, 3>;
/// 16-bit RGBA layout
pub type Rgba16 = Layout<u16, 4>;

/// Run a block with the [`PixelLayout`] type of a runtime format in scope.
///
/// The format is matched once; the block is compiled separately for every
/// layout, so loops inside it carry no per-pixel format branches.
///
/// ```
/// use pixmill_core::{PixelFormat, PixelLayout, with_pixel_layout};
///
/// let bytes = with_pixel_layout!(PixelFormat::Rgb16, |L| L::BYTES);
/// assert_eq!(bytes, 6);
/// ```
#[macro_export]
macro_rules! with_pixel_layout {
    ($format:expr, |$layout:ident| $body:expr) => {
        match $format {
            $crate::PixelFormat::Grey => {
                type $layout = $crate::format::Grey8;
                $body
            }
            $crate::PixelFormat::GreyAlpha => {
                type $layout = $crate::format::GreyAlpha8;
                $body
            }
            $crate::PixelFormat::Rgb => {
                type $layout = $crate::format::Rgb8;
                $body
            }
            $crate::PixelFormat::Rgba => {
                type $layout = $crate::format::Rgba8;
                $body
            }
            $crate::PixelFormat::Grey16 => {
                type $layout = $crate::format::Grey16;
                $body
            }
            $crate::PixelFormat::GreyAlpha16 => {
                type $layout = $crate::format::GreyAlpha16;
                $body
            }
            $crate::PixelFormat::Rgb16 => {
                type $layout = $crate::format::Rgb16;
                $body
            }
            $crate::PixelFormat::Rgba16 => {
                type $layout = $crate::format::Rgba16;
                $body
            }
        }
    };
}

/// Runtime table entry for one pixel format.
///
/// Resolved once per whole-image call; the function pointers are the
/// monomorphized [`PixelLayout`] routines of the format.
#[derive(Debug, Clone, Copy)]
pub struct PixelCodec {
    /// Format described by this entry
    pub format: PixelFormat,
    /// Channels per pixel
    pub channels: usize,
    /// Bytes per pixel
    pub bytes_per_pixel: usize,
    /// Packed bytes to normalized values
    pub unpack: fn(&[u8], &mut [f32]),
    /// Normalized values to packed bytes
    pub pack: fn(&[f32], &mut [u8]),
}

impl PixelCodec {
    /// Table entry for a compile-time layout.
    pub fn of<L: PixelLayout>() -> Self {
        PixelCodec {
            format: L::FORMAT,
            channels: L::CHANNELS,
            bytes_per_pixel: L::BYTES,
            unpack: L::unpack,
            pack: L::pack,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_table() {
        for format in PixelFormat::ALL {
            assert_eq!(
                format.bytes_per_pixel(),
                format.channels() * format.sample_size()
            );
            let codec = format.codec();
            assert_eq!(codec.format, format);
            assert_eq!(codec.channels, format.channels());
            assert_eq!(codec.bytes_per_pixel, format.bytes_per_pixel());
        }
        assert_eq!(PixelFormat::Rgba16.bytes_per_pixel(), 8);
        assert_eq!(PixelFormat::GreyAlpha.bytes_per_pixel(), 2);
        assert!(PixelFormat::GreyAlpha16.has_alpha());
        assert!(!PixelFormat::Rgb.has_alpha());
    }

    #[test]
    fn test_row_stride_alignment() {
        assert_eq!(PixelFormat::Rgb.row_stride(1), Some(4));
        assert_eq!(PixelFormat::Rgb.row_stride(4), Some(12));
        assert_eq!(PixelFormat::Grey.row_stride(5), Some(8));
        assert_eq!(PixelFormat::Rgba16.row_stride(3), Some(24));
        assert_eq!(PixelFormat::Rgba.row_stride(u32::MAX), None);
    }

    #[test]
    fn test_parse_names() {
        for format in PixelFormat::ALL {
            assert_eq!(format.name().parse::<PixelFormat>().unwrap(), format);
            assert_eq!(format.to_string(), format.name());
        }
        assert_eq!("GRAY".parse::<PixelFormat>().unwrap(), PixelFormat::Grey);
        assert!(matches!(
            "cmyk".parse::<PixelFormat>(),
            Err(Error::UnknownFormat(_))
        ));
    }

    #[test]
    fn test_from_layout() {
        assert_eq!(PixelFormat::from_layout(3, 2), Some(PixelFormat::Rgb16));
        assert_eq!(PixelFormat::from_layout(2, 1), Some(PixelFormat::GreyAlpha));
        assert_eq!(PixelFormat::from_layout(5, 1), None);
    }

    #[test]
    fn test_unpack_pack_8bit() {
        let src = [0u8, 128, 255];
        let mut values = [0.0f32; MAX_CHANNELS];
        PixelFormat::Rgb.unpack(&src, &mut values);
        assert_eq!(values[0], 0.0);
        assert!((values[1] - 128.0 / 255.0).abs() < 1e-6);
        assert_eq!(values[2], 1.0);

        let mut dst = [0u8; 3];
        PixelFormat::Rgb.pack(&values, &mut dst);
        assert_eq!(dst, src);
    }

    #[test]
    fn test_pack_clamps_and_rounds() {
        let mut dst = [0u8; 4];
        PixelFormat::Rgba.pack(&[-0.5, 1.5, 0.5, 100.0 / 255.0], &mut dst);
        assert_eq!(dst, [0, 255, 128, 100]);
    }

    #[test]
    fn test_unpack_pack_16bit_native_endian() {
        let raw: [u16; 2] = [1000, 65535];
        let mut src = [0u8; 4];
        src[..2].copy_from_slice(&raw[0].to_ne_bytes());
        src[2..].copy_from_slice(&raw[1].to_ne_bytes());

        let mut values = [0.0f32; MAX_CHANNELS];
        PixelFormat::GreyAlpha16.unpack(&src, &mut values);
        assert!((values[0] - 1000.0 / 65535.0).abs() < 1e-6);
        assert_eq!(values[1], 1.0);

        let mut dst = [0u8; 4];
        PixelFormat::GreyAlpha16.pack(&values, &mut dst);
        assert_eq!(dst, src);
    }

    #[test]
    fn test_every_8bit_value_survives_unpack_pack() {
        let mut values = [0.0f32; MAX_CHANNELS];
        let mut dst = [0u8; 1];
        for v in 0..=255u8 {
            Grey8::unpack(&[v], &mut values);
            Grey8::pack(&values, &mut dst);
            assert_eq!(dst[0], v);
        }
    }

    #[test]
    fn test_layout_macro_matches_codec() {
        for format in PixelFormat::ALL {
            let (fmt, bytes) = with_pixel_layout!(format, |L| (L::FORMAT, L::BYTES));
            assert_eq!(fmt, format);
            assert_eq!(bytes, format.bytes_per_pixel());
        }
    }
}
