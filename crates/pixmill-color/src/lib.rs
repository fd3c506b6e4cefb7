//! pixmill-color - Pixel format and channel conversion
//!
//! This crate converts raw images between the eight pixel formats of
//! `pixmill-core`:
//!
//! - **Channel conversion** ([`convert`]): the full channel-count matrix
//!   between grey, grey+alpha, RGB and RGBA, with bit-depth repacking
//! - **Luma weights** ([`settings`]): renormalized weights used when color
//!   is reduced to grey
//!
//! # Example
//!
//! ```
//! use pixmill_color::{ConvertOptions, convert};
//! use pixmill_core::{NativeImage, PixelFormat};
//!
//! let mut image = NativeImage::new(1, 1, PixelFormat::Rgba).unwrap();
//! image.row_mut(0).copy_from_slice(&[10, 20, 30, 255]);
//! let grey = convert(&image, PixelFormat::GreyAlpha, &ConvertOptions::default()).unwrap();
//! assert_eq!(grey.pixel(0, 0), &[18, 255]);
//! ```

pub mod convert;
pub mod error;
pub mod settings;

// Re-export core types
pub use pixmill_core;

pub use convert::{ChannelRule, convert, convert_by_name, convert_image, convert_pixel};
pub use error::{ColorError, ColorResult};
pub use settings::{BT601_BLUE, BT601_GREEN, BT601_RED, ColorSettings, ConvertOptions};
