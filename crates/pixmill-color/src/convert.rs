//! Pixel format conversion
//!
//! Converts images between any two of the eight pixel formats. Each pixel
//! is unpacked to normalized channel values, remapped by a [`ChannelRule`]
//! chosen from the source and destination channel counts, and packed at the
//! destination sample depth.
//!
//! # Channel rules
//!
//! Channel 0 is luminance or red, channel 1 is alpha (two-channel formats)
//! or green, channel 2 is blue and channel 3 is alpha. `L` is the luma of
//! channels 0..3 under the [`ColorSettings`] weights.
//!
//! | src -> dst | result |
//! |---|---|
//! | N -> N | copy |
//! | 1 -> 2 | `s0, 1` |
//! | 1 -> 3 | `s0, s0, s0` |
//! | 1 -> 4 | `s0, s0, s0, 1` |
//! | 2 -> 1 | `s0` |
//! | 2 -> 3 | `s0, s1, 0` |
//! | 2 -> 4 | `s0, s0, s0, s1` |
//! | 3 -> 1 | `L` |
//! | 3 -> 2 | `L, 1` |
//! | 3 -> 4 | `s0, s1, s2, 1` |
//! | 4 -> 1 | `L` |
//! | 4 -> 2 | `L, s3` |
//! | 4 -> 3 | `s0, s1, s2` |

use crate::settings::{ColorSettings, ConvertOptions};
use crate::ColorResult;
use pixmill_core::{
    ImageView, ImageViewMut, MAX_CHANNELS, NativeImage, PixelFormat, PixelLayout,
    with_pixel_layout,
};

type Channels = [f32; MAX_CHANNELS];

/// Channel mapping between two channel counts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelRule {
    /// Same channel count, values pass through
    Identity,
    /// 1 -> 2
    GreyToGreyAlpha,
    /// 1 -> 3
    GreyToRgb,
    /// 1 -> 4
    GreyToRgba,
    /// 2 -> 1
    GreyAlphaToGrey,
    /// 2 -> 3
    GreyAlphaToRgb,
    /// 2 -> 4
    GreyAlphaToRgba,
    /// 3 -> 1
    RgbToGrey,
    /// 3 -> 2
    RgbToGreyAlpha,
    /// 3 -> 4
    RgbToRgba,
    /// 4 -> 1
    RgbaToGrey,
    /// 4 -> 2
    RgbaToGreyAlpha,
    /// 4 -> 3
    RgbaToRgb,
}

impl ChannelRule {
    /// Rule converting `src` pixels into `dst` pixels.
    pub fn for_formats(src: PixelFormat, dst: PixelFormat) -> Self {
        Self::for_channels(src.channels(), dst.channels())
    }

    /// Rule for a pair of channel counts.
    ///
    /// # Panics
    ///
    /// Panics if either count is outside `1..=4`.
    pub fn for_channels(src_channels: usize, dst_channels: usize) -> Self {
        match (src_channels, dst_channels) {
            (s, d) if s == d && (1..=MAX_CHANNELS).contains(&s) => Self::Identity,
            (1, 2) => Self::GreyToGreyAlpha,
            (1, 3) => Self::GreyToRgb,
            (1, 4) => Self::GreyToRgba,
            (2, 1) => Self::GreyAlphaToGrey,
            (2, 3) => Self::GreyAlphaToRgb,
            (2, 4) => Self::GreyAlphaToRgba,
            (3, 1) => Self::RgbToGrey,
            (3, 2) => Self::RgbToGreyAlpha,
            (3, 4) => Self::RgbToRgba,
            (4, 1) => Self::RgbaToGrey,
            (4, 2) => Self::RgbaToGreyAlpha,
            (4, 3) => Self::RgbaToRgb,
            (s, d) => panic!("no channel rule for {s} -> {d} channels"),
        }
    }

    /// Apply the rule to one pixel.
    #[inline]
    pub fn apply(self, settings: &ColorSettings, s: &Channels, d: &mut Channels) {
        (self.mapper())(settings, s, d)
    }

    /// Resolve the rule to a plain function, once per image.
    fn mapper(self) -> fn(&ColorSettings, &Channels, &mut Channels) {
        match self {
            Self::Identity => |_, s, d| *d = *s,
            Self::GreyToGreyAlpha => |_, s, d| {
                d[0] = s[0];
                d[1] = 1.0;
            },
            Self::GreyToRgb => |_, s, d| {
                d[..3].fill(s[0]);
            },
            Self::GreyToRgba => |_, s, d| {
                d[..3].fill(s[0]);
                d[3] = 1.0;
            },
            Self::GreyAlphaToGrey => |_, s, d| d[0] = s[0],
            Self::GreyAlphaToRgb => |_, s, d| {
                d[0] = s[0];
                d[1] = s[1];
                d[2] = 0.0;
            },
            Self::GreyAlphaToRgba => |_, s, d| {
                d[..3].fill(s[0]);
                d[3] = s[1];
            },
            Self::RgbToGrey | Self::RgbaToGrey => |c, s, d| d[0] = c.luma(s[0], s[1], s[2]),
            Self::RgbToGreyAlpha => |c, s, d| {
                d[0] = c.luma(s[0], s[1], s[2]);
                d[1] = 1.0;
            },
            Self::RgbToRgba => |_, s, d| {
                d[..3].copy_from_slice(&s[..3]);
                d[3] = 1.0;
            },
            Self::RgbaToGreyAlpha => |c, s, d| {
                d[0] = c.luma(s[0], s[1], s[2]);
                d[1] = s[3];
            },
            Self::RgbaToRgb => |_, s, d| d[..3].copy_from_slice(&s[..3]),
        }
    }
}

/// Convert one pixel between formats.
///
/// `src_pixel` must hold one `src_format` pixel and `dst_pixel` room for
/// one `dst_format` pixel.
pub fn convert_pixel(
    settings: &ColorSettings,
    src_format: PixelFormat,
    src_pixel: &[u8],
    dst_format: PixelFormat,
    dst_pixel: &mut [u8],
) {
    let mut s = [0.0; MAX_CHANNELS];
    let mut d = [0.0; MAX_CHANNELS];
    src_format.unpack(src_pixel, &mut s);
    ChannelRule::for_formats(src_format, dst_format).apply(settings, &s, &mut d);
    dst_format.pack(&d, dst_pixel);
}

/// Convert every pixel of `src` into the pre-allocated `dst`.
///
/// Identical formats are copied row by row without unpacking.
///
/// # Panics
///
/// Panics if the images differ in width or height.
pub fn convert_image(settings: &ColorSettings, src: &ImageView<'_>, dst: &mut ImageViewMut<'_>) {
    assert!(
        src.width() == dst.width() && src.height() == dst.height(),
        "convert_image: {}x{} source into {}x{} destination",
        src.width(),
        src.height(),
        dst.width(),
        dst.height()
    );

    if src.format() == dst.format() {
        for y in 0..src.height() {
            dst.row_mut(y).copy_from_slice(src.row(y));
        }
        return;
    }

    let rule = ChannelRule::for_formats(src.format(), dst.format()).mapper();
    with_pixel_layout!(src.format(), |S| {
        with_pixel_layout!(dst.format(), |D| convert_rows::<S, D>(settings, rule, src, dst))
    })
}

fn convert_rows<S: PixelLayout, D: PixelLayout>(
    settings: &ColorSettings,
    rule: fn(&ColorSettings, &Channels, &mut Channels),
    src: &ImageView<'_>,
    dst: &mut ImageViewMut<'_>,
) {
    let mut s = [0.0; MAX_CHANNELS];
    let mut d = [0.0; MAX_CHANNELS];
    for y in 0..src.height() {
        let src_row = src.row(y);
        let dst_row = dst.row_mut(y);
        for (sp, dp) in src_row
            .chunks_exact(S::BYTES)
            .zip(dst_row.chunks_exact_mut(D::BYTES))
        {
            S::unpack(sp, &mut s);
            rule(settings, &s, &mut d);
            D::pack(&d, dp);
        }
    }
}

/// Convert an image to `target_format`, allocating the result.
///
/// # Errors
///
/// Returns [`ColorError::InvalidWeights`](crate::ColorError::InvalidWeights)
/// if the luma weights in `options` cannot be renormalized.
///
/// # Examples
///
/// ```
/// use pixmill_color::{ConvertOptions, convert};
/// use pixmill_core::{NativeImage, PixelFormat};
///
/// let mut image = NativeImage::new(1, 1, PixelFormat::Grey).unwrap();
/// image.row_mut(0)[0] = 128;
/// let rgb = convert(&image, PixelFormat::Rgb, &ConvertOptions::default()).unwrap();
/// assert_eq!(rgb.pixel(0, 0), &[128, 128, 128]);
/// ```
pub fn convert<'a>(
    image: impl Into<ImageView<'a>>,
    target_format: PixelFormat,
    options: &ConvertOptions,
) -> ColorResult<NativeImage> {
    let src = image.into();
    let settings = options.settings()?;
    log::debug!(
        "convert {}x{} {} -> {}",
        src.width(),
        src.height(),
        src.format(),
        target_format
    );

    let mut dst = NativeImage::new(src.width(), src.height(), target_format)?;
    convert_image(&settings, &src, &mut dst.view_mut());
    Ok(dst)
}

/// Convert an image to the format named by `target_format`.
///
/// # Errors
///
/// Returns a [`Core`](crate::ColorError::Core) error wrapping
/// [`UnknownFormat`](pixmill_core::Error::UnknownFormat) for an
/// unrecognized name, otherwise as [`convert`].
pub fn convert_by_name<'a>(
    image: impl Into<ImageView<'a>>,
    target_format: &str,
    options: &ConvertOptions,
) -> ColorResult<NativeImage> {
    let format: PixelFormat = target_format.parse()?;
    convert(image, format, options)
}
