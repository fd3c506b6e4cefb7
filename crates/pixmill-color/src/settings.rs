//! Luma weights for channel reduction
//!
//! Converting a color image (3 or 4 channels) to grey (1 or 2 channels)
//! computes `L = r * r_weight + g * g_weight + b * b_weight`. The weights
//! are renormalized to sum to 1 so any positive triple can be supplied.

use crate::{ColorError, ColorResult};

/// ITU-R BT.601 red weight
pub const BT601_RED: f32 = 0.299;
/// ITU-R BT.601 green weight
pub const BT601_GREEN: f32 = 0.587;
/// ITU-R BT.601 blue weight
pub const BT601_BLUE: f32 = 0.114;

/// Renormalized luma weights
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorSettings {
    r_weight: f32,
    g_weight: f32,
    b_weight: f32,
}

impl ColorSettings {
    /// Build settings from raw weights, renormalized to sum to 1.
    ///
    /// # Errors
    ///
    /// Returns [`ColorError::InvalidWeights`] if a weight is not finite or
    /// the weights do not sum to a positive value.
    pub fn new(r_weight: f32, g_weight: f32, b_weight: f32) -> ColorResult<Self> {
        if !(r_weight.is_finite() && g_weight.is_finite() && b_weight.is_finite()) {
            return Err(ColorError::InvalidWeights(format!(
                "weights must be finite, got ({r_weight}, {g_weight}, {b_weight})"
            )));
        }
        let sum = r_weight + g_weight + b_weight;
        if !(sum > 0.0 && sum.is_finite()) {
            return Err(ColorError::InvalidWeights(format!(
                "weights must sum to a positive value, got {sum}"
            )));
        }
        Ok(Self {
            r_weight: r_weight / sum,
            g_weight: g_weight / sum,
            b_weight: b_weight / sum,
        })
    }

    /// Red weight after renormalization.
    pub fn r_weight(&self) -> f32 {
        self.r_weight
    }

    /// Green weight after renormalization.
    pub fn g_weight(&self) -> f32 {
        self.g_weight
    }

    /// Blue weight after renormalization.
    pub fn b_weight(&self) -> f32 {
        self.b_weight
    }

    /// Luma of normalized red, green and blue values.
    #[inline]
    pub fn luma(&self, r: f32, g: f32, b: f32) -> f32 {
        r * self.r_weight + g * self.g_weight + b * self.b_weight
    }
}

impl Default for ColorSettings {
    fn default() -> Self {
        let sum = BT601_RED + BT601_GREEN + BT601_BLUE;
        Self {
            r_weight: BT601_RED / sum,
            g_weight: BT601_GREEN / sum,
            b_weight: BT601_BLUE / sum,
        }
    }
}

/// Options for [`convert`](crate::convert)
///
/// Unset weights take their BT.601 default before renormalization.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ConvertOptions {
    /// Red luma weight
    pub red_weight: Option<f32>,
    /// Green luma weight
    pub green_weight: Option<f32>,
    /// Blue luma weight
    pub blue_weight: Option<f32>,
}

impl ConvertOptions {
    /// Create options with all weights at their defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the red luma weight
    pub fn with_red_weight(mut self, weight: f32) -> Self {
        self.red_weight = Some(weight);
        self
    }

    /// Set the green luma weight
    pub fn with_green_weight(mut self, weight: f32) -> Self {
        self.green_weight = Some(weight);
        self
    }

    /// Set the blue luma weight
    pub fn with_blue_weight(mut self, weight: f32) -> Self {
        self.blue_weight = Some(weight);
        self
    }

    /// Set all three luma weights
    pub fn with_weights(self, red: f32, green: f32, blue: f32) -> Self {
        self.with_red_weight(red)
            .with_green_weight(green)
            .with_blue_weight(blue)
    }

    /// Resolve the options into renormalized settings.
    ///
    /// # Errors
    ///
    /// See [`ColorSettings::new`].
    pub fn settings(&self) -> ColorResult<ColorSettings> {
        ColorSettings::new(
            self.red_weight.unwrap_or(BT601_RED),
            self.green_weight.unwrap_or(BT601_GREEN),
            self.blue_weight.unwrap_or(BT601_BLUE),
        )
    }
}
