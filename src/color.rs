//! Color types and shading helpers.
//!
//! Colors are carried as exact rational channels in `[0, 1]` for the whole
//! shading computation and only quantized to 8-bit when written into the
//! raster buffer.

use crate::rational::{rat_i, Rat};
use num_traits::{ToPrimitive, Zero};

/// RGB color with exact rational channels in `[0, 1]`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Color {
    pub r: Rat,
    pub g: Rat,
    pub b: Rat,
}

impl Color {
    pub fn new(r: Rat, g: Rat, b: Rat) -> Self {
        Self { r, g, b }
    }

    pub fn black() -> Self {
        Self::new(Rat::zero(), Rat::zero(), Rat::zero())
    }

    pub fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        let ch = |v: u8| Rat::new((v as i64).into(), 255.into());
        Self::new(ch(r), ch(g), ch(b))
    }

    /// Channel-wise scaling, used by the diffuse shading pass.
    pub fn scaled(&self, factor: &Rat) -> Color {
        Color::new(&self.r * factor, &self.g * factor, &self.b * factor)
    }

    /// Quantizes to 8-bit channels, rounding to nearest and clamping to the
    /// representable range.
    pub fn to_rgb8(&self) -> [u8; 3] {
        let ch = |v: &Rat| {
            let clamped = v.clone().max(rat_i(0)).min(rat_i(1));
            (clamped * rat_i(255))
                .round()
                .to_integer()
                .to_u8()
                .unwrap_or(255)
        };
        [ch(&self.r), ch(&self.g), ch(&self.b)]
    }
}
