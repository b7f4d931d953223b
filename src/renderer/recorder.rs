//! Surface that records calls instead of drawing
//!
//! Used by tests and by the headless native build.

use glam::Vec2;

use super::{Rgba, Surface};
use crate::sim::Rect;

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCmd {
    Clear(Rgba),
    FillRect(Rect, Rgba),
    StrokeRect(Rect, Rgba),
    Gradient(Rect),
    Circle { center: Vec2, radius: f32, color: Rgba },
    Line { from: Vec2, to: Vec2, color: Rgba },
    Polygon { points: Vec<Vec2>, color: Rgba },
    Text { pos: Vec2, text: String },
    Alpha(f32),
}

#[derive(Debug, Default)]
pub struct RecordingSurface {
    pub commands: Vec<DrawCmd>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self, pred: impl Fn(&DrawCmd) -> bool) -> usize {
        self.commands.iter().filter(|c| pred(c)).count()
    }

    /// Every text string drawn, in order
    pub fn texts(&self) -> Vec<&str> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                DrawCmd::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Whether any filled rect used `color`
    pub fn filled_with(&self, color: Rgba) -> bool {
        self.commands
            .iter()
            .any(|c| matches!(c, DrawCmd::FillRect(_, c) if *c == color))
    }
}

impl Surface for RecordingSurface {
    fn clear(&mut self, color: Rgba) {
        self.commands.push(DrawCmd::Clear(color));
    }

    fn fill_rect(&mut self, rect: Rect, color: Rgba) {
        self.commands.push(DrawCmd::FillRect(rect, color));
    }

    fn stroke_rect(&mut self, rect: Rect, color: Rgba, _width: f32) {
        self.commands.push(DrawCmd::StrokeRect(rect, color));
    }

    fn gradient_rect(&mut self, rect: Rect, _stops: &[(f32, Rgba)]) {
        self.commands.push(DrawCmd::Gradient(rect));
    }

    fn circle(&mut self, center: Vec2, radius: f32, color: Rgba) {
        self.commands.push(DrawCmd::Circle {
            center,
            radius,
            color,
        });
    }

    fn line(&mut self, from: Vec2, to: Vec2, color: Rgba, _width: f32) {
        self.commands.push(DrawCmd::Line { from, to, color });
    }

    fn polygon(&mut self, points: &[Vec2], color: Rgba) {
        self.commands.push(DrawCmd::Polygon {
            points: points.to_vec(),
            color,
        });
    }

    fn text(&mut self, pos: Vec2, text: &str, _color: Rgba, _size: f32) {
        self.commands.push(DrawCmd::Text {
            pos,
            text: text.to_string(),
        });
    }

    fn set_alpha(&mut self, alpha: f32) {
        self.commands.push(DrawCmd::Alpha(alpha));
    }
}
