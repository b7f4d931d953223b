//! 2D rendering module
//!
//! World drawing is written once against the [`Surface`] trait. The browser
//! build backs it with a Canvas 2D context; tests record the calls instead.

#[cfg(target_arch = "wasm32")]
pub mod canvas;
pub mod draw;
pub mod recorder;

use glam::Vec2;

use crate::sim::Rect;

#[cfg(target_arch = "wasm32")]
pub use canvas::CanvasSurface;
pub use draw::render_world;
pub use recorder::{DrawCmd, RecordingSurface};

/// Linear RGBA, each channel in 0..=1
pub type Rgba = [f32; 4];

/// Opaque colour from 0xRRGGBB
pub const fn rgb(hex: u32) -> Rgba {
    [
        ((hex >> 16) & 0xff) as f32 / 255.0,
        ((hex >> 8) & 0xff) as f32 / 255.0,
        (hex & 0xff) as f32 / 255.0,
        1.0,
    ]
}

/// Same colour, different alpha
pub const fn with_alpha(c: Rgba, a: f32) -> Rgba {
    [c[0], c[1], c[2], a]
}

/// Immediate-mode drawing target in screen coordinates
pub trait Surface {
    /// Fill the whole target
    fn clear(&mut self, color: Rgba);
    fn fill_rect(&mut self, rect: Rect, color: Rgba);
    fn stroke_rect(&mut self, rect: Rect, color: Rgba, width: f32);
    /// Diagonal gradient from the top-left to the bottom-right corner
    fn gradient_rect(&mut self, rect: Rect, stops: &[(f32, Rgba)]);
    fn circle(&mut self, center: Vec2, radius: f32, color: Rgba);
    fn line(&mut self, from: Vec2, to: Vec2, color: Rgba, width: f32);
    /// Filled closed polygon
    fn polygon(&mut self, points: &[Vec2], color: Rgba);
    fn text(&mut self, pos: Vec2, text: &str, color: Rgba, size: f32);
    /// Global alpha for every following call
    fn set_alpha(&mut self, alpha: f32);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rgb_channels() {
        assert_eq!(rgb(0xff0000), [1.0, 0.0, 0.0, 1.0]);
        assert_eq!(rgb(0x00ff00)[1], 1.0);
        assert_eq!(rgb(0x000000), [0.0, 0.0, 0.0, 1.0]);
        assert_eq!(with_alpha(rgb(0xffffff), 0.5)[3], 0.5);
    }
}
