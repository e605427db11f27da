/// RGB color used by the renderer for text, background, cursor and scroll indicator
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn black() -> Self {
        Self::new(0, 0, 0)
    }

    pub fn white() -> Self {
        Self::new(255, 255, 255)
    }

    /// Build a color from a packed `0xRRGGBB` value (as written in the config file)
    pub fn from_hex(value: u32) -> Self {
        Self::new(
            ((value >> 16) & 0xff) as u8,
            ((value >> 8) & 0xff) as u8,
            (value & 0xff) as u8,
        )
    }

    /// Blend this color over `base` with the given alpha (0.0 - 1.0)
    ///
    /// Used for translucent overlays such as the scroll indicator, since the
    /// canvas is composed without an alpha channel.
    pub fn blend_over(self, base: Color, alpha: f32) -> Self {
        let alpha = alpha.clamp(0.0, 1.0);
        let mix = |top: u8, bottom: u8| -> u8 {
            (top as f32 * alpha + bottom as f32 * (1.0 - alpha)).round() as u8
        };
        Self::new(mix(self.r, base.r), mix(self.g, base.g), mix(self.b, base.b))
    }
}
