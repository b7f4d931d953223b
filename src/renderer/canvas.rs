//! Canvas 2D backend

use std::f64::consts::TAU;

use glam::Vec2;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use super::{Rgba, Surface};
use crate::sim::Rect;

fn css(c: Rgba) -> String {
    format!(
        "rgba({}, {}, {}, {})",
        (c[0] * 255.0).round() as u8,
        (c[1] * 255.0).round() as u8,
        (c[2] * 255.0).round() as u8,
        c[3]
    )
}

pub struct CanvasSurface {
    ctx: CanvasRenderingContext2d,
    width: f64,
    height: f64,
}

impl CanvasSurface {
    pub fn new(canvas: &HtmlCanvasElement) -> Option<Self> {
        let ctx = canvas
            .get_context("2d")
            .ok()
            .flatten()?
            .dyn_into::<CanvasRenderingContext2d>()
            .ok()?;
        Some(Self {
            ctx,
            width: f64::from(canvas.width()),
            height: f64::from(canvas.height()),
        })
    }

    /// Pick up a canvas resize
    pub fn resize(&mut self, width: u32, height: u32) {
        self.width = f64::from(width);
        self.height = f64::from(height);
    }
}

impl Surface for CanvasSurface {
    fn clear(&mut self, color: Rgba) {
        self.ctx.set_fill_style_str(&css(color));
        self.ctx.fill_rect(0.0, 0.0, self.width, self.height);
    }

    fn fill_rect(&mut self, r: Rect, color: Rgba) {
        self.ctx.set_fill_style_str(&css(color));
        self.ctx
            .fill_rect(r.x as f64, r.y as f64, r.w as f64, r.h as f64);
    }

    fn stroke_rect(&mut self, r: Rect, color: Rgba, width: f32) {
        self.ctx.set_stroke_style_str(&css(color));
        self.ctx.set_line_width(width as f64);
        self.ctx
            .stroke_rect(r.x as f64, r.y as f64, r.w as f64, r.h as f64);
    }

    fn gradient_rect(&mut self, r: Rect, stops: &[(f32, Rgba)]) {
        let g = self.ctx.create_linear_gradient(
            r.x as f64,
            r.y as f64,
            r.right() as f64,
            r.bottom() as f64,
        );
        for (offset, color) in stops {
            g.add_color_stop(*offset, &css(*color)).ok();
        }
        self.ctx.set_fill_style_canvas_gradient(&g);
        self.ctx
            .fill_rect(r.x as f64, r.y as f64, r.w as f64, r.h as f64);
    }

    fn circle(&mut self, c: Vec2, radius: f32, color: Rgba) {
        self.ctx.set_fill_style_str(&css(color));
        self.ctx.begin_path();
        self.ctx
            .arc(c.x as f64, c.y as f64, radius as f64, 0.0, TAU)
            .ok();
        self.ctx.fill();
    }

    fn line(&mut self, from: Vec2, to: Vec2, color: Rgba, width: f32) {
        self.ctx.set_stroke_style_str(&css(color));
        self.ctx.set_line_width(width as f64);
        self.ctx.begin_path();
        self.ctx.move_to(from.x as f64, from.y as f64);
        self.ctx.line_to(to.x as f64, to.y as f64);
        self.ctx.stroke();
    }

    fn polygon(&mut self, points: &[Vec2], color: Rgba) {
        let Some((first, rest)) = points.split_first() else {
            return;
        };
        self.ctx.set_fill_style_str(&css(color));
        self.ctx.begin_path();
        self.ctx.move_to(first.x as f64, first.y as f64);
        for p in rest {
            self.ctx.line_to(p.x as f64, p.y as f64);
        }
        self.ctx.close_path();
        self.ctx.fill();
    }

    fn text(&mut self, pos: Vec2, text: &str, color: Rgba, size: f32) {
        self.ctx
            .set_font(&format!("{}px 'Courier New', monospace", size));
        self.ctx.set_fill_style_str(&css(color));
        self.ctx.fill_text(text, pos.x as f64, pos.y as f64).ok();
    }

    fn set_alpha(&mut self, alpha: f32) {
        self.ctx.set_global_alpha(alpha as f64);
    }
}
