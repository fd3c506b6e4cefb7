//! pixmill-transform - Filtered image resampling
//!
//! This crate resizes raw images with a separable two-pass convolution:
//!
//! - **Filter kernels** ([`filter`]): box, triangle, cubic, Catmull-Rom,
//!   Mitchell and Lanczos-2, with an optional scale factor
//! - **Contribution tables** ([`contrib`]): per-axis source bands and
//!   normalized weights, computed before any pixel is read
//! - **Resize** ([`resize`](mod@resize)): the bounded-memory row pipeline
//!   and the allocating entry point
//!
//! # Example
//!
//! ```
//! use pixmill_core::{NativeImage, PixelFormat};
//! use pixmill_transform::{ResizeOptions, resize};
//!
//! let image = NativeImage::new(640, 480, PixelFormat::Rgba).unwrap();
//! let thumb = resize(&image, 160, 120, &ResizeOptions::default()).unwrap();
//! assert_eq!(thumb.format(), PixelFormat::Rgba);
//! ```

pub mod contrib;
mod error;
pub mod filter;
pub mod resize;

// Re-export core types
pub use pixmill_core;

pub use contrib::{ContribRange, Contributions};
pub use error::{TransformError, TransformResult};
pub use filter::{FilterKind, ScaledFilter};
pub use resize::{DEFAULT_FILTER_SCALE, ResizeOptions, resize, resize_image};
