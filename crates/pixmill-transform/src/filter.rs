//! Resampling filter kernels
//!
//! Each kernel is a function `f(x)` of the distance between a destination
//! sample center and a source tap, measured in source pixels, together with
//! a support radius outside which `f(x) = 0`.
//!
//! | Filter | Support | `f(x)` for `\|x\| <= support` |
//! |---|---|---|
//! | Box | 0.5 | `1` |
//! | Triangle | 1 | `1 - \|x\|` |
//! | Cubic | 2 | `1 - x^2 (0.75 - 0.25\|x\|)` |
//! | Catmull-Rom | 2 | Mitchell-Netravali, `B = 0`, `C = 0.5` |
//! | Mitchell | 2 | Mitchell-Netravali, `B = C = 1/3` |
//! | Lanczos | 2 | `2 sin(pi x) sin(pi x / 2) / (pi x)^2`, `1` at 0 |

use crate::{TransformError, TransformResult};
use std::f32::consts::PI;
use std::fmt;
use std::str::FromStr;

/// Filter kernel selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterKind {
    /// Nearest-neighbor box
    Box,
    /// Linear tent
    Triangle,
    /// Smooth cubic without negative lobes
    Cubic,
    /// Interpolating cubic (sharp)
    CatmullRom,
    /// Mitchell-Netravali cubic (balanced)
    Mitchell,
    /// Two-lobe Lanczos window
    Lanczos,
}

impl FilterKind {
    /// Every filter kind.
    pub const ALL: [FilterKind; 6] = [
        FilterKind::Box,
        FilterKind::Triangle,
        FilterKind::Cubic,
        FilterKind::CatmullRom,
        FilterKind::Mitchell,
        FilterKind::Lanczos,
    ];

    /// Radius beyond which the kernel is zero.
    pub fn support(self) -> f32 {
        match self {
            Self::Box => 0.5,
            Self::Triangle => 1.0,
            Self::Cubic | Self::CatmullRom | Self::Mitchell | Self::Lanczos => 2.0,
        }
    }

    /// Evaluate the kernel at distance `x`.
    pub fn eval(self, x: f32) -> f32 {
        let ax = x.abs();
        if ax > self.support() {
            return 0.0;
        }
        match self {
            Self::Box => 1.0,
            Self::Triangle => 1.0 - ax,
            Self::Cubic => 1.0 - ax * ax * (0.75 - 0.25 * ax),
            Self::CatmullRom => mitchell_netravali(0.0, 0.5, ax),
            Self::Mitchell => mitchell_netravali(1.0 / 3.0, 1.0 / 3.0, ax),
            Self::Lanczos => {
                let px = x * PI;
                let px2 = px * px;
                if px2 == 0.0 {
                    1.0
                } else {
                    2.0 * px.sin() * (px / 2.0).sin() / px2
                }
            }
        }
    }

    /// Name accepted by [`FromStr`].
    pub fn name(self) -> &'static str {
        match self {
            Self::Box => "box",
            Self::Triangle => "triangle",
            Self::Cubic => "cubic",
            Self::CatmullRom => "catmulrom",
            Self::Mitchell => "mitchel",
            Self::Lanczos => "lanczos",
        }
    }
}

/// Piecewise cubic of the Mitchell-Netravali family at `x >= 0`.
fn mitchell_netravali(b: f32, c: f32, x: f32) -> f32 {
    if x < 1.0 {
        let a3 = (12.0 - 9.0 * b - 6.0 * c) / 6.0;
        let a2 = (-18.0 + 12.0 * b + 6.0 * c) / 6.0;
        let a0 = (6.0 - 2.0 * b) / 6.0;
        a0 + x * x * (a2 + x * a3)
    } else {
        let b3 = (-b - 6.0 * c) / 6.0;
        let b2 = (6.0 * b + 30.0 * c) / 6.0;
        let b1 = (-12.0 * b - 48.0 * c) / 6.0;
        let b0 = (8.0 * b + 24.0 * c) / 6.0;
        b0 + x * (b1 + x * (b2 + x * b3))
    }
}

impl fmt::Display for FilterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for FilterKind {
    type Err = TransformError;

    fn from_str(s: &str) -> TransformResult<Self> {
        match s.to_ascii_lowercase().as_str() {
            "box" => Ok(Self::Box),
            "triangle" => Ok(Self::Triangle),
            "cubic" => Ok(Self::Cubic),
            "catmulrom" | "catmullrom" | "catmull-rom" => Ok(Self::CatmullRom),
            "mitchel" | "mitchell" => Ok(Self::Mitchell),
            "lanczos" | "lanczos2" => Ok(Self::Lanczos),
            _ => Err(TransformError::UnknownFilter(s.to_string())),
        }
    }
}

/// A kernel stretched by a scale factor.
///
/// Support grows by `scale`; the kernel is evaluated at `x / scale` and
/// divided by `scale`, so values above 1 blur and values below 1 sharpen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaledFilter {
    kind: FilterKind,
    scale: f32,
}

impl ScaledFilter {
    /// Wrap `kind` with a scale factor.
    ///
    /// # Errors
    ///
    /// Returns [`TransformError::InvalidFilterScale`] unless `scale` is
    /// finite and greater than 0.
    pub fn new(kind: FilterKind, scale: f32) -> TransformResult<Self> {
        if !(scale.is_finite() && scale > 0.0) {
            return Err(TransformError::InvalidFilterScale(scale));
        }
        Ok(Self { kind, scale })
    }

    /// The wrapped kernel.
    pub fn kind(&self) -> FilterKind {
        self.kind
    }

    /// The scale factor.
    pub fn scale(&self) -> f32 {
        self.scale
    }

    /// Support radius of the stretched kernel.
    pub fn support(&self) -> f32 {
        self.kind.support() * self.scale
    }

    /// Evaluate the stretched kernel at distance `x`.
    #[inline]
    pub fn eval(&self, x: f32) -> f32 {
        self.kind.eval(x / self.scale) / self.scale
    }
}

impl From<FilterKind> for ScaledFilter {
    fn from(kind: FilterKind) -> Self {
        Self { kind, scale: 1.0 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kernels_at_origin() {
        for kind in [FilterKind::Box, FilterKind::Triangle, FilterKind::Cubic] {
            assert_eq!(kind.eval(0.0), 1.0);
        }
        assert_eq!(FilterKind::Lanczos.eval(0.0), 1.0);
        assert_eq!(FilterKind::CatmullRom.eval(0.0), 1.0);
        // (6 - 2B) / 6 with B = 1/3
        assert!((FilterKind::Mitchell.eval(0.0) - 8.0 / 9.0).abs() < 1e-6);
    }

    #[test]
    fn test_kernels_zero_outside_support() {
        for kind in FilterKind::ALL {
            assert_eq!(kind.eval(kind.support() + 0.01), 0.0);
            assert_eq!(kind.eval(-kind.support() - 0.01), 0.0);
        }
        assert_eq!(FilterKind::Box.eval(0.5), 1.0);
    }

    #[test]
    fn test_kernels_symmetric() {
        for kind in FilterKind::ALL {
            for x in [0.1f32, 0.5, 0.9, 1.3, 1.7] {
                assert!((kind.eval(x) - kind.eval(-x)).abs() < 1e-6, "{kind} at {x}");
            }
        }
    }

    #[test]
    fn test_interpolating_kernels() {
        // Catmull-Rom and Lanczos vanish at non-zero integers
        for kind in [FilterKind::CatmullRom, FilterKind::Lanczos] {
            assert!(kind.eval(1.0).abs() < 1e-6);
            assert!(kind.eval(2.0).abs() < 1e-6);
        }
        assert!((FilterKind::Triangle.eval(0.25) - 0.75).abs() < 1e-6);
        assert!((FilterKind::Cubic.eval(1.0) - 0.5).abs() < 1e-6);
        assert!(FilterKind::Cubic.eval(2.0).abs() < 1e-6);
        // Mitchell at 1: (8B + 24C)/6 + ... = B/6
        assert!((FilterKind::Mitchell.eval(1.0) - 1.0 / 18.0).abs() < 1e-6);
    }

    #[test]
    fn test_scaled_filter() {
        let filter = ScaledFilter::new(FilterKind::Triangle, 2.0).unwrap();
        assert_eq!(filter.support(), 2.0);
        assert!((filter.eval(1.0) - 0.25).abs() < 1e-6);
        assert_eq!(filter.eval(2.5), 0.0);

        let unit = ScaledFilter::from(FilterKind::Cubic);
        assert_eq!(unit.eval(0.7), FilterKind::Cubic.eval(0.7));
    }

    #[test]
    fn test_scaled_filter_rejects_bad_scale() {
        for scale in [0.0, -1.0, f32::NAN, f32::INFINITY] {
            assert!(matches!(
                ScaledFilter::new(FilterKind::Box, scale),
                Err(TransformError::InvalidFilterScale(_))
            ));
        }
    }

    #[test]
    fn test_parse_names() {
        for kind in FilterKind::ALL {
            assert_eq!(kind.name().parse::<FilterKind>().unwrap(), kind);
        }
        assert_eq!(
            "Catmull-Rom".parse::<FilterKind>().unwrap(),
            FilterKind::CatmullRom
        );
        assert_eq!("mitchell".parse::<FilterKind>().unwrap(), FilterKind::Mitchell);
        assert!(matches!(
            "gaussian".parse::<FilterKind>(),
            Err(TransformError::UnknownFilter(_))
        ));
    }
}
