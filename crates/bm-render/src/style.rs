//! Outline color resolution for the three color modes.

use bm_core::color::{FALLBACK_LUMINANCE, best_contrast_color, contrast_ratio, label_color};
use bm_core::{CanvasConfig, Color, ColorMode, LuminanceMap, Rect};

/// Outline stroke width of an unselected box, in screen pixels.
pub const STROKE_WIDTH_PX: f64 = 2.0;
/// Outline stroke width of the selected box, in screen pixels.
pub const SELECTED_STROKE_WIDTH_PX: f64 = 3.0;
/// Gap between the selected box and its halo, in screen pixels.
pub const HALO_OFFSET_PX: f64 = 3.0;
/// Dash pattern `[on, off]` of the halo, in screen pixels.
pub const HALO_DASH_PX: [f64; 2] = [6.0, 4.0];

const WHITE: Color = Color::rgb8(0xFF, 0xFF, 0xFF);
const BLACK: Color = Color::rgb8(0x00, 0x00, 0x00);

/// Resolve the outline color of a box with `label` covering `rect` (image pixels).
///
/// In `auto` mode the average luminance under the rect comes from the
/// integral map; without one the mid-grey fallback is used.
pub fn box_color(
    label: &str,
    rect: &Rect,
    config: &CanvasConfig,
    luminance: Option<&LuminanceMap>,
) -> Color {
    match config.color_mode {
        ColorMode::Label => label_color(label, &config.label_colors),
        ColorMode::Custom => config.custom_color,
        ColorMode::Auto => {
            let background = luminance
                .map(|map| map.average(rect))
                .unwrap_or(FALLBACK_LUMINANCE);
            best_contrast_color(background)
        }
    }
}

/// Black or white, whichever stands out more against `color`.
pub fn contrasting_ink(color: Color) -> Color {
    let l = color.relative_luminance();
    let on_white = contrast_ratio(l, WHITE.relative_luminance());
    let on_black = contrast_ratio(l, BLACK.relative_luminance());
    if on_white >= on_black {
        WHITE
    } else {
        BLACK
    }
}
