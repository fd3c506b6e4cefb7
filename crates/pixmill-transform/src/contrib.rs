//! Per-axis contribution tables
//!
//! Before any pixel is touched, each axis of a resize gets a table that
//! lists, for every destination coordinate, the contiguous band of source
//! coordinates feeding it and their normalized weights.
//!
//! For an axis resized from `src_size` to `dst_size` with kernel support
//! `s`:
//!
//! - `scale = src_size / dst_size`
//! - `fscale = max(scale, 1, 1 / s)`: the kernel is widened when
//!   minifying, never narrowed when magnifying
//! - `fsupport = s * fscale`
//! - destination coordinate `i` is centered at `(i + 0.5) * scale`; its
//!   band is `ceil(center - fsupport) ..= floor(center + fsupport)`,
//!   clipped to the source, with zero-weight taps trimmed from both ends
//!
//! An axis whose size does not change maps every coordinate to itself with
//! weight 1.

use crate::filter::ScaledFilter;

/// Source band feeding one destination coordinate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContribRange {
    /// First contributing source coordinate
    pub left: usize,
    /// Last contributing source coordinate (inclusive)
    pub right: usize,
    /// Index of the weight for `left` in the shared weight storage
    pub weights_offset: usize,
}

impl ContribRange {
    /// Number of contributing taps.
    #[inline]
    pub fn len(&self) -> usize {
        self.right - self.left + 1
    }

    /// Always false; every band holds at least one tap.
    #[inline]
    pub fn is_empty(&self) -> bool {
        false
    }
}

/// Contribution table for one axis
#[derive(Debug, Clone)]
pub struct Contributions {
    ranges: Vec<ContribRange>,
    weights: Vec<f32>,
    fsupport: f32,
}

impl Contributions {
    /// Build the table for resizing an axis from `src_size` to `dst_size`.
    ///
    /// # Panics
    ///
    /// Panics if either size is 0, or if a band ends up with a zero total
    /// weight (a malformed kernel).
    pub fn new(filter: &ScaledFilter, src_size: u32, dst_size: u32) -> Self {
        assert!(src_size > 0 && dst_size > 0, "empty resize axis");

        let scale = src_size as f32 / dst_size as f32;
        let support = filter.support();
        let fscale = scale.max(1.0).max(1.0 / support);
        let fsupport = support * fscale;

        // Same-size axes copy samples so that they stay exact.
        if src_size == dst_size {
            return Self::identity(src_size as usize, fsupport);
        }

        let iscale = 1.0 / fscale;
        let last = (src_size - 1) as f32;
        let mut ranges = Vec::with_capacity(dst_size as usize);
        // A band never spans more than the source, however wide the kernel.
        let max_taps = ((2.0 * fsupport).ceil() as usize)
            .saturating_add(1)
            .min(src_size as usize);
        let mut weights = Vec::with_capacity(dst_size as usize * max_taps);

        for i in 0..dst_size {
            let center = (i as f32 + 0.5) * scale;
            let mut left = (center - fsupport).ceil().max(0.0) as usize;
            let mut right = (center + fsupport).floor().min(last) as usize;
            while left < right && filter.eval((center - left as f32) * iscale) == 0.0 {
                left += 1;
            }
            while right > left && filter.eval((center - right as f32) * iscale) == 0.0 {
                right -= 1;
            }

            let weights_offset = weights.len();
            let mut total = 0.0f32;
            for tap in left..=right {
                let w = filter.eval((center - tap as f32) * iscale);
                weights.push(w);
                total += w;
            }
            assert!(
                total != 0.0,
                "zero total weight at coordinate {i} ({} taps)",
                right - left + 1
            );
            let normalize = 1.0 / total;
            for w in &mut weights[weights_offset..] {
                *w *= normalize;
            }

            ranges.push(ContribRange {
                left,
                right,
                weights_offset,
            });
        }

        log::trace!(
            "contributions {src_size} -> {dst_size}: scale {scale}, fsupport {fsupport}, {} weights",
            weights.len()
        );

        Self {
            ranges,
            weights,
            fsupport,
        }
    }

    fn identity(size: usize, fsupport: f32) -> Self {
        Self {
            ranges: (0..size)
                .map(|i| ContribRange {
                    left: i,
                    right: i,
                    weights_offset: i,
                })
                .collect(),
            weights: vec![1.0; size],
            fsupport,
        }
    }

    /// Number of destination coordinates.
    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    /// Whether the table has no coordinates.
    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    /// All bands, in destination order.
    pub fn ranges(&self) -> &[ContribRange] {
        &self.ranges
    }

    /// Band and weights of destination coordinate `i`.
    #[inline]
    pub fn get(&self, i: usize) -> (&ContribRange, &[f32]) {
        let range = &self.ranges[i];
        let start = range.weights_offset;
        (range, &self.weights[start..start + range.len()])
    }

    /// Iterate over bands and their weights, in destination order.
    pub fn iter(&self) -> impl Iterator<Item = (&ContribRange, &[f32])> + '_ {
        (0..self.ranges.len()).map(move |i| self.get(i))
    }

    /// Widened kernel support used on this axis.
    pub fn fsupport(&self) -> f32 {
        self.fsupport
    }

    /// Largest number of source coordinates that must be held at once when
    /// destination coordinates are produced in order.
    ///
    /// Counts from each band's `left` to the furthest `right` reached so
    /// far.
    pub fn max_window(&self) -> usize {
        let mut furthest = 0;
        let mut widest = 0;
        for range in &self.ranges {
            furthest = furthest.max(range.right);
            widest = widest.max(furthest - range.left + 1);
        }
        widest
    }
}
