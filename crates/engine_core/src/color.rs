//! 8-bit RGB colors handed to the renderer.

/// An sRGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const RED: Rgb = Rgb(255, 0, 0);
    pub const GRAY: Rgb = Rgb(100, 100, 100);
    pub const ORANGE: Rgb = Rgb(255, 165, 0);
    pub const YELLOW: Rgb = Rgb(255, 255, 0);
}
