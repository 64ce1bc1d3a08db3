//! Canvas display configuration.
//!
//! The host persists this (local storage, user settings, ...); the canvas
//! only reads it and echoes changes back. Values coming from outside are
//! clamped into their valid ranges by [`CanvasConfig::sanitized`].

use crate::color::Color;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ─── Crosshair ───────────────────────────────────────────────────────────

pub const CROSSHAIR_ARM_MIN: f64 = 8.0;
pub const CROSSHAIR_ARM_MAX: f64 = 96.0;
pub const CROSSHAIR_WIDTH_MIN: f64 = 0.5;
pub const CROSSHAIR_WIDTH_MAX: f64 = 4.0;

/// Step used by the grow/shrink crosshair shortcuts.
pub const CROSSHAIR_ARM_STEP: f64 = 8.0;

/// How annotation outlines are colored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    /// Pick the palette color with the best contrast against the pixels under each box.
    #[default]
    Auto,
    /// One color per label.
    Label,
    /// A single user-chosen color.
    Custom,
}

impl ColorMode {
    /// Next mode in the `auto → label → custom` cycle.
    pub fn next(self) -> Self {
        match self {
            ColorMode::Auto => ColorMode::Label,
            ColorMode::Label => ColorMode::Custom,
            ColorMode::Custom => ColorMode::Auto,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ColorMode::Auto => "auto",
            ColorMode::Label => "label",
            ColorMode::Custom => "custom",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto" => Some(ColorMode::Auto),
            "label" => Some(ColorMode::Label),
            "custom" => Some(ColorMode::Custom),
            _ => None,
        }
    }
}

/// Draw-mode crosshair geometry, in screen pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CrosshairConfig {
    pub arm_length: f64,
    pub stroke_width: f64,
}

impl Default for CrosshairConfig {
    fn default() -> Self {
        Self {
            arm_length: 24.0,
            stroke_width: 1.0,
        }
    }
}

impl CrosshairConfig {
    pub fn sanitized(self) -> Self {
        let defaults = Self::default();
        Self {
            arm_length: clamp_or(
                self.arm_length,
                CROSSHAIR_ARM_MIN,
                CROSSHAIR_ARM_MAX,
                defaults.arm_length,
            ),
            stroke_width: clamp_or(
                self.stroke_width,
                CROSSHAIR_WIDTH_MIN,
                CROSSHAIR_WIDTH_MAX,
                defaults.stroke_width,
            ),
        }
    }
}

fn clamp_or(v: f64, min: f64, max: f64, fallback: f64) -> f64 {
    if v.is_finite() { v.clamp(min, max) } else { fallback }
}

// ─── Canvas config ───────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CanvasConfig {
    pub color_mode: ColorMode,
    /// Outline color in `custom` mode.
    pub custom_color: Color,
    /// Per-label overrides for `label` mode. Keys are matched case-insensitively.
    pub label_colors: BTreeMap<String, Color>,
    pub crosshair: CrosshairConfig,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            color_mode: ColorMode::default(),
            custom_color: Color::rgb8(0xFF, 0x3B, 0x30),
            label_colors: BTreeMap::new(),
            crosshair: CrosshairConfig::default(),
        }
    }
}

impl CanvasConfig {
    /// Clamp ranges and lowercase label keys.
    pub fn sanitized(mut self) -> Self {
        self.crosshair = self.crosshair.sanitized();
        self.label_colors = self
            .label_colors
            .into_iter()
            .map(|(label, color)| (label.trim().to_lowercase(), color))
            .collect();
        self
    }
}
