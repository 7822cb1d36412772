use glam::*;

use crate::Error;

/// The number of bits of the packed identity allocated to the face index.
pub const FACE_INDEX_BITS: u32 = 16;

/// The number of face indices a single mark can encode.
///
/// This is a hard capacity limit of the 24-bit color identity layout, validated
/// at mark registration time. Face indices past this range would alias into the
/// mark id bits and corrupt picking results.
pub const FACE_CAPACITY: usize = 1 << FACE_INDEX_BITS;

/// The number of mark ids the identity layout can encode.
///
/// Id 0 is the background sentinel, leaving ids 1 to 255. The 24-bit color
/// space allocates 8 bits to the mark id and 16 bits to the face index, so
/// extending past 255 marks requires re-deriving the whole bit split.
pub const MARK_CAPACITY: usize = 255;

/// An object-and-face identity packed into a 24-bit color.
///
/// The layout is `(mark_id << 16) | face_index`, so the red channel carries the
/// mark id and the green and blue channels carry the face index. The all-zero
/// color is reserved to mean "no mark".
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, bytemuck::Pod, bytemuck::Zeroable)]
pub struct IdentityColor(pub u32);

impl IdentityColor {
    /// The background sentinel.
    pub const BACKGROUND: Self = Self(0);

    /// Encode a mark id and face index into an identity color.
    pub const fn encode(mark_id: u8, face_index: u16) -> Self {
        Self(((mark_id as u32) << FACE_INDEX_BITS) | face_index as u32)
    }

    /// Decode the identity color into a mark id and face index.
    pub const fn decode(self) -> (u8, u16) {
        (
            (self.0 >> FACE_INDEX_BITS) as u8,
            (self.0 & (FACE_CAPACITY as u32 - 1)) as u16,
        )
    }

    /// Get the mark id.
    pub const fn mark_id(self) -> u8 {
        (self.0 >> FACE_INDEX_BITS) as u8
    }

    /// Get the face index.
    pub const fn face_index(self) -> u16 {
        (self.0 & (FACE_CAPACITY as u32 - 1)) as u16
    }

    /// Whether this is the background sentinel.
    pub const fn is_background(self) -> bool {
        self.0 == 0
    }

    /// Get the identity as an RGB color, one channel per packed byte.
    pub const fn to_rgb8(self) -> Rgb8 {
        Rgb8::new(
            (self.0 >> 16) as u8,
            (self.0 >> 8) as u8,
            self.0 as u8,
        )
    }

    /// Reconstruct the identity from an RGB color readback.
    pub const fn from_rgb8(rgb: Rgb8) -> Self {
        Self(((rgb.r as u32) << 16) | ((rgb.g as u32) << 8) | rgb.b as u32)
    }
}

/// An 8-bit-per-channel RGB color.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Rgb8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb8 {
    pub const WHITE: Self = Self::new(255, 255, 255);
    pub const BLACK: Self = Self::new(0, 0, 0);

    /// Create a new color.
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse a `#RRGGBB` hex color.
    pub fn from_hex(hex: &str) -> Result<Self, Error> {
        let digits = hex
            .strip_prefix('#')
            .ok_or_else(|| Error::InvalidHexColor(hex.to_string()))?;
        if digits.len() != 6 {
            return Err(Error::InvalidHexColor(hex.to_string()));
        }

        let value = u32::from_str_radix(digits, 16)
            .map_err(|_| Error::InvalidHexColor(hex.to_string()))?;

        Ok(Self::new(
            (value >> 16) as u8,
            (value >> 8) as u8,
            value as u8,
        ))
    }

    /// Format as a `#RRGGBB` hex color.
    pub fn to_hex(self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }

    /// Per-channel linear interpolation, with `t` clamped to `[0, 1]`.
    pub fn lerp(self, other: Self, t: f32) -> Self {
        let t = t.clamp(0.0, 1.0);
        let channel = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t).round() as u8;
        Self::new(
            channel(self.r, other.r),
            channel(self.g, other.g),
            channel(self.b, other.b),
        )
    }

    /// Get the color as normalized linear-space RGB.
    pub fn to_linear(self) -> Vec3 {
        self.to_vec3().map(srgb_to_linear)
    }

    /// Create a color from normalized linear-space RGB.
    pub fn from_linear(linear: Vec3) -> Self {
        Self::from_vec3(linear.map(linear_to_srgb))
    }

    /// Get the color as normalized RGB without any transfer conversion.
    pub fn to_vec3(self) -> Vec3 {
        Vec3::new(self.r as f32, self.g as f32, self.b as f32) / 255.0
    }

    /// Create a color from normalized RGB without any transfer conversion.
    pub fn from_vec3(v: Vec3) -> Self {
        let v = (v.clamp(Vec3::ZERO, Vec3::ONE) * 255.0).round();
        Self::new(v.x as u8, v.y as u8, v.z as u8)
    }

    /// Get the color as RGBA bytes with full alpha, as stored in vertex colors.
    pub const fn to_rgba(self) -> [u8; 4] {
        [self.r, self.g, self.b, 255]
    }
}

/// The sRGB transfer function.
pub fn linear_to_srgb(c: f32) -> f32 {
    if c <= 0.0031308 {
        c * 12.92
    } else {
        1.055 * c.powf(1.0 / 2.4) - 0.055
    }
}

/// The inverse sRGB transfer function.
pub fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}
