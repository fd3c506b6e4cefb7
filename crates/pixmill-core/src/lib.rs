//! pixmill-core - Basic data structures for raw image processing
//!
//! This crate provides the data model shared by the pixmill engines:
//!
//! - [`PixelFormat`] - The closed set of supported pixel layouts, with
//!   per-pixel unpack/pack to normalized `f32` channel values
//! - [`PixelLayout`] / [`Layout`] - Compile-time layouts for monomorphized
//!   whole-image loops, selected with [`with_pixel_layout!`]
//! - [`NativeImage`] - An owned raw image buffer
//! - [`ImageView`] / [`ImageViewMut`] - Validated borrowed buffers
//!
//! # Example
//!
//! ```
//! use pixmill_core::{NativeImage, PixelFormat};
//!
//! let mut image = NativeImage::new(2, 2, PixelFormat::Rgba).unwrap();
//! image.row_mut(0)[..4].copy_from_slice(&[255, 0, 0, 255]);
//! assert_eq!(image.pixel(0, 0), &[255, 0, 0, 255]);
//! ```

pub mod error;
pub mod format;
pub mod image;

pub use error::{Error, Result};
pub use format::{Layout, MAX_CHANNELS, PixelCodec, PixelFormat, PixelLayout, Sample};
pub use image::{ImageView, ImageViewMut, NativeImage};
