//! Raw image buffers
//!
//! A raw image is a flat byte buffer plus a `width x height x stride x
//! format` descriptor. Row `y` starts at byte `y * stride` and holds
//! `width * bytes_per_pixel` bytes of interleaved samples; any bytes between
//! the end of a row and the next row start are padding.
//!
//! # Types
//!
//! - [`NativeImage`] owns its buffer. Images allocated here use the
//!   conventional stride (one row rounded up to 4 bytes).
//! - [`ImageView`] borrows a buffer read-only. It is `Copy`, so engines
//!   take it by value.
//! - [`ImageViewMut`] borrows a buffer for writing.
//!
//! All three validate their geometry once at construction: non-zero
//! dimensions, `stride >= width * bytes_per_pixel`, and a buffer of at least
//! `(height - 1) * stride + width * bytes_per_pixel` bytes (the last row
//! needs no trailing padding). Row accessors can then slice without
//! re-deriving offsets.

use crate::error::{Error, Result};
use crate::format::PixelFormat;

/// Validate a buffer geometry and return the bytes used by one row.
fn check_geometry(
    len: usize,
    width: u32,
    height: u32,
    stride: u32,
    format: PixelFormat,
) -> Result<usize> {
    if width == 0 || height == 0 {
        return Err(Error::InvalidDimension { width, height });
    }
    let too_large = Error::TooLarge {
        width,
        height,
        stride,
    };
    let min = width
        .checked_mul(format.bytes_per_pixel() as u32)
        .ok_or_else(|| too_large.clone())?;
    if stride < min {
        return Err(Error::StrideTooShort { stride, min });
    }
    let required = (height as usize - 1)
        .checked_mul(stride as usize)
        .and_then(|n| n.checked_add(min as usize))
        .ok_or(too_large)?;
    if len < required {
        return Err(Error::BufferTooSmall { len, required });
    }
    Ok(min as usize)
}

/// Read the raw sample at the front of `bytes`.
#[inline]
fn raw_sample(bytes: &[u8], sample_size: usize) -> i32 {
    if sample_size == 2 {
        u16::from_ne_bytes([bytes[0], bytes[1]]) as i32
    } else {
        bytes[0] as i32
    }
}

/// Read-only view of a raw image buffer.
#[derive(Debug, Clone, Copy)]
pub struct ImageView<'a> {
    data: &'a [u8],
    width: u32,
    height: u32,
    stride: u32,
    format: PixelFormat,
    row_bytes: usize,
}

impl<'a> ImageView<'a> {
    /// Wrap a borrowed buffer.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDimension`], [`Error::StrideTooShort`],
    /// [`Error::BufferTooSmall`] or [`Error::TooLarge`] if the geometry does
    /// not fit the buffer.
    pub fn new(
        data: &'a [u8],
        width: u32,
        height: u32,
        stride: u32,
        format: PixelFormat,
    ) -> Result<Self> {
        let row_bytes = check_geometry(data.len(), width, height, stride, format)?;
        Ok(ImageView {
            data,
            width,
            height,
            stride,
            format,
            row_bytes,
        })
    }

    /// Image width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Image height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Bytes between the starts of consecutive rows.
    #[inline]
    pub fn stride(&self) -> u32 {
        self.stride
    }

    /// Pixel format.
    #[inline]
    pub fn format(&self) -> PixelFormat {
        self.format
    }

    /// Bytes of pixel data in one row (`width * bytes_per_pixel`).
    #[inline]
    pub fn row_bytes(&self) -> usize {
        self.row_bytes
    }

    /// The whole underlying buffer, padding included.
    #[inline]
    pub fn data(&self) -> &'a [u8] {
        self.data
    }

    /// Pixel bytes of row `y`.
    ///
    /// # Panics
    ///
    /// Panics if `y >= height`.
    #[inline]
    pub fn row(&self, y: u32) -> &'a [u8] {
        assert!(y < self.height, "row {y} out of range");
        let start = y as usize * self.stride as usize;
        &self.data[start..start + self.row_bytes]
    }

    /// Iterate over the pixel bytes of every row, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &'a [u8]> + '_ {
        (0..self.height).map(move |y| self.row(y))
    }

    /// Bytes of the pixel at `(x, y)`.
    ///
    /// # Panics
    ///
    /// Panics if the coordinates are out of bounds.
    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> &'a [u8] {
        assert!(x < self.width, "column {x} out of range");
        let bpp = self.format.bytes_per_pixel();
        let start = x as usize * bpp;
        &self.row(y)[start..start + bpp]
    }

    /// View of the `width x height` rectangle at `(x, y)`.
    ///
    /// The sub-view shares this view's buffer and stride.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RegionOutOfBounds`] if the rectangle is empty or
    /// extends past the image.
    pub fn sub_view(&self, x: u32, y: u32, width: u32, height: u32) -> Result<ImageView<'a>> {
        let fits = width > 0
            && height > 0
            && x.checked_add(width).is_some_and(|r| r <= self.width)
            && y.checked_add(height).is_some_and(|b| b <= self.height);
        if !fits {
            return Err(Error::RegionOutOfBounds {
                x,
                y,
                width,
                height,
                image_width: self.width,
                image_height: self.height,
            });
        }
        let offset =
            y as usize * self.stride as usize + x as usize * self.format.bytes_per_pixel();
        ImageView::new(
            &self.data[offset..],
            width,
            height,
            self.stride,
            self.format,
        )
    }

    /// Whether both images have the same format, size and pixel bytes.
    ///
    /// Row padding is ignored.
    pub fn equal_pixels(&self, other: &ImageView<'_>) -> bool {
        self.format == other.format
            && self.width == other.width
            && self.height == other.height
            && self.rows().zip(other.rows()).all(|(a, b)| a == b)
    }

    /// Mean absolute difference between corresponding raw samples.
    ///
    /// Returns `None` if the formats or dimensions differ.
    pub fn avg_channel_diff(&self, other: &ImageView<'_>) -> Option<f64> {
        if self.format != other.format || self.width != other.width || self.height != other.height
        {
            return None;
        }
        let sample_size = self.format.sample_size();
        let mut total = 0u64;
        for (a, b) in self.rows().zip(other.rows()) {
            for (sa, sb) in a.chunks_exact(sample_size).zip(b.chunks_exact(sample_size)) {
                total += (raw_sample(sa, sample_size) - raw_sample(sb, sample_size)).unsigned_abs()
                    as u64;
            }
        }
        let samples = self.height as u64 * self.width as u64 * self.format.channels() as u64;
        Some(total as f64 / samples as f64)
    }

    /// Copy the overlapping top-left region into `dst`.
    ///
    /// Copies `min(width)` by `min(height)` pixels.
    ///
    /// # Errors
    ///
    /// Returns [`Error::FormatMismatch`] if the formats differ.
    pub fn copy_to(&self, dst: &mut ImageViewMut<'_>) -> Result<()> {
        if self.format != dst.format {
            return Err(Error::FormatMismatch(self.format, dst.format));
        }
        let bytes = self.width.min(dst.width) as usize * self.format.bytes_per_pixel();
        for y in 0..self.height.min(dst.height) {
            dst.row_mut(y)[..bytes].copy_from_slice(&self.row(y)[..bytes]);
        }
        Ok(())
    }

    /// Copy the pixels into a freshly allocated image with the conventional
    /// stride.
    pub fn to_owned_image(&self) -> Result<NativeImage> {
        let mut image = NativeImage::new(self.width, self.height, self.format)?;
        self.copy_to(&mut image.view_mut())?;
        Ok(image)
    }
}

/// Writable view of a raw image buffer.
#[derive(Debug)]
pub struct ImageViewMut<'a> {
    data: &'a mut [u8],
    width: u32,
    height: u32,
    stride: u32,
    format: PixelFormat,
    row_bytes: usize,
}

impl<'a> ImageViewMut<'a> {
    /// Wrap a mutably borrowed buffer.
    ///
    /// # Errors
    ///
    /// Same geometry checks as [`ImageView::new`].
    pub fn new(
        data: &'a mut [u8],
        width: u32,
        height: u32,
        stride: u32,
        format: PixelFormat,
    ) -> Result<Self> {
        let row_bytes = check_geometry(data.len(), width, height, stride, format)?;
        Ok(ImageViewMut {
            data,
            width,
            height,
            stride,
            format,
            row_bytes,
        })
    }

    /// Image width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Image height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Bytes between the starts of consecutive rows.
    #[inline]
    pub fn stride(&self) -> u32 {
        self.stride
    }

    /// Pixel format.
    #[inline]
    pub fn format(&self) -> PixelFormat {
        self.format
    }

    /// Bytes of pixel data in one row.
    #[inline]
    pub fn row_bytes(&self) -> usize {
        self.row_bytes
    }

    /// Read-only reborrow.
    pub fn as_view(&self) -> ImageView<'_> {
        ImageView {
            data: &*self.data,
            width: self.width,
            height: self.height,
            stride: self.stride,
            format: self.format,
            row_bytes: self.row_bytes,
        }
    }

    /// Pixel bytes of row `y`.
    ///
    /// # Panics
    ///
    /// Panics if `y >= height`.
    #[inline]
    pub fn row(&self, y: u32) -> &[u8] {
        assert!(y < self.height, "row {y} out of range");
        let start = y as usize * self.stride as usize;
        &self.data[start..start + self.row_bytes]
    }

    /// Mutable pixel bytes of row `y`.
    ///
    /// # Panics
    ///
    /// Panics if `y >= height`.
    #[inline]
    pub fn row_mut(&mut self, y: u32) -> &mut [u8] {
        assert!(y < self.height, "row {y} out of range");
        let start = y as usize * self.stride as usize;
        &mut self.data[start..start + self.row_bytes]
    }

    /// Byte-swap every 16-bit sample in place; no-op for 8-bit formats.
    pub fn swap_sample_bytes(&mut self) {
        if !self.format.is_16bit() {
            return;
        }
        for y in 0..self.height {
            for sample in self.row_mut(y).chunks_exact_mut(2) {
                sample.swap(0, 1);
            }
        }
    }
}

/// Raw image that owns its buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NativeImage {
    data: Vec<u8>,
    width: u32,
    height: u32,
    stride: u32,
    format: PixelFormat,
}

impl NativeImage {
    /// Allocate a zeroed image with the conventional 4-byte aligned stride.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDimension`] if width or height is 0, or
    /// [`Error::TooLarge`] if the buffer size overflows.
    ///
    /// # Examples
    ///
    /// ```
    /// use pixmill_core::{NativeImage, PixelFormat};
    ///
    /// let image = NativeImage::new(3, 2, PixelFormat::Rgb).unwrap();
    /// assert_eq!(image.stride(), 12);
    /// assert_eq!(image.data().len(), 24);
    /// ```
    pub fn new(width: u32, height: u32, format: PixelFormat) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidDimension { width, height });
        }
        let stride = format.row_stride(width).ok_or(Error::TooLarge {
            width,
            height,
            stride: 0,
        })?;
        Self::with_stride(width, height, stride, format)
    }

    /// Allocate a zeroed image with an explicit stride.
    ///
    /// The buffer holds `height * stride` bytes.
    pub fn with_stride(width: u32, height: u32, stride: u32, format: PixelFormat) -> Result<Self> {
        let len = (height as usize)
            .checked_mul(stride as usize)
            .ok_or(Error::TooLarge {
                width,
                height,
                stride,
            })?;
        check_geometry(len, width, height, stride, format)?;
        log::trace!("allocating {width}x{height} {format} image, stride {stride}");
        Ok(NativeImage {
            data: vec![0u8; len],
            width,
            height,
            stride,
            format,
        })
    }

    /// Take ownership of a caller-filled buffer.
    ///
    /// # Errors
    ///
    /// Same geometry checks as [`ImageView::new`].
    pub fn from_raw(
        data: Vec<u8>,
        width: u32,
        height: u32,
        stride: u32,
        format: PixelFormat,
    ) -> Result<Self> {
        check_geometry(data.len(), width, height, stride, format)?;
        Ok(NativeImage {
            data,
            width,
            height,
            stride,
            format,
        })
    }

    /// Image width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Image height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Bytes between the starts of consecutive rows.
    #[inline]
    pub fn stride(&self) -> u32 {
        self.stride
    }

    /// Pixel format.
    #[inline]
    pub fn format(&self) -> PixelFormat {
        self.format
    }

    /// The whole buffer, padding included.
    #[inline]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Mutable access to the whole buffer.
    #[inline]
    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Release the buffer.
    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    /// Read-only view of the whole image.
    pub fn view(&self) -> ImageView<'_> {
        ImageView {
            data: &self.data,
            width: self.width,
            height: self.height,
            stride: self.stride,
            format: self.format,
            row_bytes: self.width as usize * self.format.bytes_per_pixel(),
        }
    }

    /// Writable view of the whole image.
    pub fn view_mut(&mut self) -> ImageViewMut<'_> {
        ImageViewMut {
            row_bytes: self.width as usize * self.format.bytes_per_pixel(),
            data: &mut self.data,
            width: self.width,
            height: self.height,
            stride: self.stride,
            format: self.format,
        }
    }

    /// Pixel bytes of row `y`.
    #[inline]
    pub fn row(&self, y: u32) -> &[u8] {
        self.view().row(y)
    }

    /// Mutable pixel bytes of row `y`.
    ///
    /// # Panics
    ///
    /// Panics if `y >= height`.
    #[inline]
    pub fn row_mut(&mut self, y: u32) -> &mut [u8] {
        assert!(y < self.height, "row {y} out of range");
        let start = y as usize * self.stride as usize;
        let len = self.width as usize * self.format.bytes_per_pixel();
        &mut self.data[start..start + len]
    }

    /// Bytes of the pixel at `(x, y)`.
    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> &[u8] {
        self.view().pixel(x, y)
    }

    /// See [`ImageView::sub_view`].
    pub fn sub_view(&self, x: u32, y: u32, width: u32, height: u32) -> Result<ImageView<'_>> {
        self.view().sub_view(x, y, width, height)
    }

    /// See [`ImageView::equal_pixels`].
    pub fn equal_pixels(&self, other: &NativeImage) -> bool {
        self.view().equal_pixels(&other.view())
    }

    /// See [`ImageView::avg_channel_diff`].
    pub fn avg_channel_diff(&self, other: &NativeImage) -> Option<f64> {
        self.view().avg_channel_diff(&other.view())
    }

    /// See [`ImageView::copy_to`].
    pub fn copy_to(&self, dst: &mut NativeImage) -> Result<()> {
        self.view().copy_to(&mut dst.view_mut())
    }

    /// See [`ImageViewMut::swap_sample_bytes`].
    pub fn swap_sample_bytes(&mut self) {
        self.view_mut().swap_sample_bytes()
    }
}

impl<'a> From<&'a NativeImage> for ImageView<'a> {
    fn from(image: &'a NativeImage) -> Self {
        image.view()
    }
}

impl<'a> From<&'a mut NativeImage> for ImageViewMut<'a> {
    fn from(image: &'a mut NativeImage) -> Self {
        image.view_mut()
    }
}
