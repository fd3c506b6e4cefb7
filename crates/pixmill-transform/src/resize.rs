//! Separable filtered resize
//!
//! Resizes an image in two 1-D passes: every needed source row is first
//! resized horizontally into a float row, then each destination row is the
//! weighted sum of the horizontally-resized rows in its vertical band.
//!
//! Horizontally-resized rows live in a ring indexed by `source_row %
//! capacity`. Destination rows are produced top to bottom and each source
//! row is resized exactly once, when the first destination row that needs
//! it comes up. The ring holds `ceil(2 * fsupport)` rows, never fewer than
//! the widest vertical window and never more than the source height, so
//! memory stays proportional to the kernel size or the image, whichever is
//! smaller.
//!
//! All arithmetic is `f32`; taps are accumulated in source order, so
//! results are reproducible across runs and threads.

use crate::contrib::Contributions;
use crate::filter::{FilterKind, ScaledFilter};
use crate::{TransformError, TransformResult};
use pixmill_core::{ImageView, ImageViewMut, NativeImage, PixelLayout, with_pixel_layout};

/// Filter scale used when no filter is named.
pub const DEFAULT_FILTER_SCALE: f32 = 0.70;

/// Options for [`resize`]
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ResizeOptions {
    /// Filter kernel; `None` selects a softened cubic
    pub filter: Option<FilterKind>,
    /// Kernel scale factor; defaults to 0.70 without a filter and 1.0 with
    /// one
    pub filter_scale: Option<f32>,
}

impl ResizeOptions {
    /// Create options with the default filter
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the filter kernel
    pub fn with_filter(mut self, filter: FilterKind) -> Self {
        self.filter = Some(filter);
        self
    }

    /// Set the filter scale factor
    pub fn with_filter_scale(mut self, scale: f32) -> Self {
        self.filter_scale = Some(scale);
        self
    }

    /// Resolve the options into a scaled kernel.
    ///
    /// # Errors
    ///
    /// Returns [`TransformError::InvalidFilterScale`] if the scale is not
    /// finite and positive.
    pub fn scaled_filter(&self) -> TransformResult<ScaledFilter> {
        let (kind, default_scale) = match self.filter {
            Some(kind) => (kind, 1.0),
            None => (FilterKind::Cubic, DEFAULT_FILTER_SCALE),
        };
        ScaledFilter::new(kind, self.filter_scale.unwrap_or(default_scale))
    }
}

/// Fixed-capacity ring of horizontally-resized rows
struct RowRing {
    data: Vec<f32>,
    row_len: usize,
    capacity: usize,
}

impl RowRing {
    fn new(capacity: usize, row_len: usize) -> Self {
        Self {
            data: vec![0.0; capacity * row_len],
            row_len,
            capacity,
        }
    }

    #[inline]
    fn slot(&self, src_row: usize) -> usize {
        (src_row % self.capacity) * self.row_len
    }

    #[inline]
    fn row(&self, src_row: usize) -> &[f32] {
        let start = self.slot(src_row);
        &self.data[start..start + self.row_len]
    }

    #[inline]
    fn row_mut(&mut self, src_row: usize) -> &mut [f32] {
        let start = self.slot(src_row);
        &mut self.data[start..start + self.row_len]
    }
}

/// Resize `src` into the pre-allocated `dst`.
///
/// The destination dimensions are the target size.
///
/// # Panics
///
/// Panics if the formats differ.
pub fn resize_image(filter: &ScaledFilter, src: &ImageView<'_>, dst: &mut ImageViewMut<'_>) {
    assert_eq!(
        src.format(),
        dst.format(),
        "resize_image: source and destination formats differ"
    );

    let columns = Contributions::new(filter, src.width(), dst.width());
    let rows = Contributions::new(filter, src.height(), dst.height());
    with_pixel_layout!(src.format(), |L| resize_rows::<L>(&columns, &rows, src, dst))
}

fn resize_rows<L: PixelLayout>(
    columns: &Contributions,
    rows: &Contributions,
    src: &ImageView<'_>,
    dst: &mut ImageViewMut<'_>,
) {
    let row_len = dst.width() as usize * L::CHANNELS;
    let capacity = ((2.0 * rows.fsupport()).ceil() as usize)
        .max(rows.max_window())
        .min(src.height() as usize);
    let mut ring = RowRing::new(capacity, row_len);
    let mut unpacked = vec![0.0f32; src.width() as usize * L::CHANNELS];
    let mut out = vec![0.0f32; row_len];

    let mut next_src = rows.ranges()[0].left;
    for y in 0..dst.height() {
        let (range, weights) = rows.get(y as usize);

        while next_src <= range.right {
            let src_row = src.row(next_src as u32);
            for (px, values) in src_row
                .chunks_exact(L::BYTES)
                .zip(unpacked.chunks_exact_mut(L::CHANNELS))
            {
                L::unpack(px, values);
            }
            resize_horizontal::<L>(columns, &unpacked, ring.row_mut(next_src));
            next_src += 1;
        }

        out.fill(0.0);
        for (tap, &w) in (range.left..=range.right).zip(weights) {
            for (o, &v) in out.iter_mut().zip(ring.row(tap)) {
                *o += w * v;
            }
        }

        for (px, values) in dst
            .row_mut(y)
            .chunks_exact_mut(L::BYTES)
            .zip(out.chunks_exact(L::CHANNELS))
        {
            L::pack(values, px);
        }
    }
}

fn resize_horizontal<L: PixelLayout>(columns: &Contributions, src: &[f32], dst: &mut [f32]) {
    for ((range, weights), out) in columns.iter().zip(dst.chunks_exact_mut(L::CHANNELS)) {
        out.fill(0.0);
        for (tap, &w) in (range.left..=range.right).zip(weights) {
            let start = tap * L::CHANNELS;
            for (o, &v) in out.iter_mut().zip(&src[start..start + L::CHANNELS]) {
                *o += w * v;
            }
        }
    }
}

/// Resize an image to `width x height`, allocating the result.
///
/// # Errors
///
/// Returns [`TransformError::InvalidDimensions`] if `width` or `height` is
/// 0, or [`TransformError::InvalidFilterScale`] for a bad filter scale.
///
/// # Examples
///
/// ```
/// use pixmill_core::{NativeImage, PixelFormat};
/// use pixmill_transform::{FilterKind, ResizeOptions, resize};
///
/// let image = NativeImage::new(8, 6, PixelFormat::Rgb).unwrap();
/// let options = ResizeOptions::new().with_filter(FilterKind::Lanczos);
/// let small = resize(&image, 4, 3, &options).unwrap();
/// assert_eq!((small.width(), small.height()), (4, 3));
/// ```
pub fn resize<'a>(
    image: impl Into<ImageView<'a>>,
    width: u32,
    height: u32,
    options: &ResizeOptions,
) -> TransformResult<NativeImage> {
    let src = image.into();
    if width == 0 || height == 0 {
        return Err(TransformError::InvalidDimensions { width, height });
    }
    let filter = options.scaled_filter()?;
    log::debug!(
        "resize {}x{} {} -> {}x{} with {} (scale {})",
        src.width(),
        src.height(),
        src.format(),
        width,
        height,
        filter.kind(),
        filter.scale()
    );

    let mut dst = NativeImage::new(width, height, src.format())?;
    resize_image(&filter, &src, &mut dst.view_mut());
    Ok(dst)
}
