//! Colors, WCAG luminance/contrast, and the canvas palettes.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;

/// RGBA color. Stored as 4 × f32 [0.0, 1.0]; serialized as a hex string.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

/// Helper to parse a single hex digit.
fn hex_val(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' => Some(c - b'a' + 10),
        b'A'..=b'F' => Some(c - b'A' + 10),
        _ => None,
    }
}

impl Color {
    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb8(r: u8, g: u8, b: u8) -> Self {
        Self::rgba(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0, 1.0)
    }

    /// Parse a hex color string: `#RGB`, `#RRGGBB`, `#RRGGBBAA`.
    /// The leading `#` is optional.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim();
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        let bytes = hex.as_bytes();
        let pair =
            |i: usize| -> Option<u8> { Some(hex_val(bytes[i])? << 4 | hex_val(bytes[i + 1])?) };

        match bytes.len() {
            3 => {
                let r = hex_val(bytes[0])?;
                let g = hex_val(bytes[1])?;
                let b = hex_val(bytes[2])?;
                Some(Self::rgb8(r * 17, g * 17, b * 17))
            }
            6 => Some(Self::rgb8(pair(0)?, pair(2)?, pair(4)?)),
            8 => {
                let base = Self::rgb8(pair(0)?, pair(2)?, pair(4)?);
                Some(base.with_alpha(pair(6)? as f32 / 255.0))
            }
            _ => None,
        }
    }

    pub fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }

    fn channels8(&self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a].map(|c| (c.clamp(0.0, 1.0) * 255.0).round() as u8)
    }

    /// Emit as `#RRGGBB`, or `#RRGGBBAA` when not fully opaque.
    pub fn to_hex(&self) -> String {
        let [r, g, b, a] = self.channels8();
        if a == 255 {
            format!("#{r:02X}{g:02X}{b:02X}")
        } else {
            format!("#{r:02X}{g:02X}{b:02X}{a:02X}")
        }
    }

    /// CSS `rgba(...)` form for Canvas2D fill/stroke styles.
    pub fn to_css(&self) -> String {
        let [r, g, b, _] = self.channels8();
        format!("rgba({r}, {g}, {b}, {:.3})", self.a.clamp(0.0, 1.0))
    }

    /// WCAG 2.x relative luminance of the color (alpha ignored).
    pub fn relative_luminance(&self) -> f64 {
        relative_luminance(self.r as f64, self.g as f64, self.b as f64)
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Color::from_hex(&s)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid hex color: {s:?}")))
    }
}

/// sRGB channel (0..1) → linear light.
pub fn srgb_to_linear(c: f64) -> f64 {
    if c <= 0.039_28 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

/// WCAG relative luminance of an sRGB triple in 0..1.
pub fn relative_luminance(r: f64, g: f64, b: f64) -> f64 {
    0.2126 * srgb_to_linear(r) + 0.7152 * srgb_to_linear(g) + 0.0722 * srgb_to_linear(b)
}

/// WCAG contrast ratio `(max(L1, L2) + 0.05) / (min(L1, L2) + 0.05)`.
pub fn contrast_ratio(l1: f64, l2: f64) -> f64 {
    let (hi, lo) = if l1 >= l2 { (l1, l2) } else { (l2, l1) };
    (hi + 0.05) / (lo + 0.05)
}

// ─── Palettes ────────────────────────────────────────────────────────────

/// Candidate outline colors for `auto` mode.
pub const AUTO_PALETTE: [Color; 8] = [
    Color::rgb8(0xFF, 0xFF, 0xFF),
    Color::rgb8(0x00, 0x00, 0x00),
    Color::rgb8(0xFF, 0xD6, 0x0A),
    Color::rgb8(0x00, 0xE5, 0xFF),
    Color::rgb8(0xFF, 0x2D, 0xAA),
    Color::rgb8(0x32, 0xD7, 0x4B),
    Color::rgb8(0xFF, 0x3B, 0x30),
    Color::rgb8(0x1E, 0x40, 0xFF),
];

/// Luminance assumed when no image data is available.
pub const FALLBACK_LUMINANCE: f64 = 0.5;

/// Pick the palette entry with the highest contrast against `background`.
///
/// Ties keep the earlier palette entry, so the choice is deterministic.
pub fn best_contrast_color(background: f64) -> Color {
    let mut best = AUTO_PALETTE[0];
    let mut best_ratio = f64::NEG_INFINITY;
    for candidate in AUTO_PALETTE {
        let ratio = contrast_ratio(candidate.relative_luminance(), background);
        if ratio > best_ratio {
            best = candidate;
            best_ratio = ratio;
        }
    }
    best
}

/// Color used for labels with no assigned color.
pub const DEFAULT_LABEL_COLOR: Color = Color::rgb8(0x4F, 0xC3, 0xF7);

/// Built-in label colors, keyed by lowercase label.
const BUILTIN_LABEL_COLORS: &[(&str, Color)] = &[
    ("product", Color::rgb8(0x34, 0xC7, 0x59)),
    ("price", Color::rgb8(0xFF, 0x3B, 0x30)),
    ("discount", Color::rgb8(0xFF, 0x95, 0x00)),
    ("promo", Color::rgb8(0xFF, 0x95, 0x00)),
    ("brand", Color::rgb8(0x00, 0x7A, 0xFF)),
    ("title", Color::rgb8(0xAF, 0x52, 0xDE)),
    ("logo", Color::rgb8(0x5A, 0xC8, 0xFA)),
    ("text", Color::rgb8(0xFF, 0xCC, 0x00)),
    ("image", Color::rgb8(0xFF, 0x2D, 0x55)),
];

/// Color for `label` in `label` mode.
///
/// Lookup is case-insensitive; `overrides` (keys lowercase) win over the
/// built-in table, and unknown labels get [`DEFAULT_LABEL_COLOR`].
pub fn label_color(label: &str, overrides: &BTreeMap<String, Color>) -> Color {
    let key = label.trim().to_lowercase();
    if let Some(color) = overrides.get(&key) {
        return *color;
    }
    BUILTIN_LABEL_COLORS
        .iter()
        .find(|(name, _)| *name == key)
        .map(|(_, color)| *color)
        .unwrap_or(DEFAULT_LABEL_COLOR)
}
