//! pixmill - Raster resizing and pixel format conversion
//!
//! pixmill operates on already-decoded raw images: a byte buffer plus a
//! width, height, row stride and pixel format. It provides two engines:
//!
//! - Filtered resizing ([`transform`]): box, triangle, cubic, Catmull-Rom,
//!   Mitchell and Lanczos kernels with a bounded-memory separable pipeline
//! - Format conversion ([`color`]): any of grey, grey+alpha, RGB and RGBA
//!   at 8 or 16 bits per sample into any other, with configurable luma
//!   weights
//!
//! Each operation is available as a blocking call ([`resize_sync`],
//! [`convert_sync`]) and as a request queued on a worker pool
//! ([`Dispatcher`]). Both produce identical output.
//!
//! Decoding and encoding container formats is left to other crates; 16-bit
//! samples are expected in native byte order.
//!
//! # Example
//!
//! ```
//! use pixmill::{ConvertOptions, NativeImage, PixelFormat, ResizeOptions};
//!
//! let image = NativeImage::new(64, 48, PixelFormat::Rgba).unwrap();
//! let small = pixmill::resize_sync(&image, 16, 12, &ResizeOptions::default()).unwrap();
//! let grey = pixmill::convert_sync(&small, PixelFormat::Grey, &ConvertOptions::default()).unwrap();
//! assert_eq!((grey.width(), grey.height()), (16, 12));
//! ```

// Re-export core types (primary data structures used everywhere)
pub use pixmill_core::*;

// Re-export engine crates as modules to avoid name conflicts
pub use pixmill_color as color;
pub use pixmill_transform as transform;

pub use pixmill_color::{ColorSettings, ConvertOptions};
pub use pixmill_transform::{FilterKind, ResizeOptions};

mod error;
pub mod task;

pub use error::{Error, Result};
pub use task::{Dispatcher, DispatcherOptions, TaskHandle, convert_sync, resize_sync};
