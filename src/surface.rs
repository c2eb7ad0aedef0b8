use std::f64::consts::PI;

use web_sys::{CanvasRenderingContext2d, HtmlImageElement};

use crate::geometry::Rect;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SpriteKind {
    Player,
    Truck,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Baseline {
    Top,
    Middle,
    Alphabetic,
    Bottom,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextStyle<'a> {
    pub font: &'a str,
    pub color: &'a str,
    pub align: Align,
    pub baseline: Baseline,
}

/// The drawing operations the game needs. Colours are CSS colour strings.
pub trait Surface {
    fn fill_rect(&mut self, rect: Rect, color: &str);
    fn fill_vertical_gradient(&mut self, rect: Rect, top: &str, bottom: &str);
    fn stroke_polyline(&mut self, points: &[(f64, f64)], color: &str, line_width: f64);
    fn fill_circle(&mut self, cx: f64, cy: f64, radius: f64, color: &str);
    fn fill_text(&mut self, text: &str, x: f64, y: f64, style: TextStyle<'_>);
    fn measure_text(&mut self, text: &str, font: &str) -> f64;
    /// Draws a sprite into `rect`, rotated by `rotation` radians about the rect's centre.
    fn draw_sprite(&mut self, sprite: SpriteKind, rect: Rect, rotation: f64);
}

pub struct Sprites {
    pub player: HtmlImageElement,
    pub truck: HtmlImageElement,
}

impl Sprites {
    pub fn truck_size(&self) -> (u32, u32) {
        (self.truck.natural_width(), self.truck.natural_height())
    }

    fn image(&self, sprite: SpriteKind) -> &HtmlImageElement {
        match sprite {
            SpriteKind::Player => &self.player,
            SpriteKind::Truck => &self.truck,
        }
    }
}

pub struct CanvasSurface<'a> {
    ctx: &'a CanvasRenderingContext2d,
    sprites: &'a Sprites,
}

impl<'a> CanvasSurface<'a> {
    pub fn new(ctx: &'a CanvasRenderingContext2d, sprites: &'a Sprites) -> Self {
        Self { ctx, sprites }
    }
}

fn align_name(align: Align) -> &'static str {
    match align {
        Align::Left => "left",
        Align::Center => "center",
    }
}

fn baseline_name(baseline: Baseline) -> &'static str {
    match baseline {
        Baseline::Top => "top",
        Baseline::Middle => "middle",
        Baseline::Alphabetic => "alphabetic",
        Baseline::Bottom => "bottom",
    }
}

impl Surface for CanvasSurface<'_> {
    fn fill_rect(&mut self, rect: Rect, color: &str) {
        self.ctx.set_fill_style_str(color);
        self.ctx.fill_rect(rect.x, rect.y, rect.width, rect.height);
    }

    fn fill_vertical_gradient(&mut self, rect: Rect, top: &str, bottom: &str) {
        let gradient = self
            .ctx
            .create_linear_gradient(0.0, rect.y, 0.0, rect.bottom());
        let _ = gradient.add_color_stop(0.0, top);
        let _ = gradient.add_color_stop(1.0, bottom);
        self.ctx.set_fill_style_canvas_gradient(&gradient);
        self.ctx.fill_rect(rect.x, rect.y, rect.width, rect.height);
    }

    fn stroke_polyline(&mut self, points: &[(f64, f64)], color: &str, line_width: f64) {
        let Some((first, rest)) = points.split_first() else {
            return;
        };
        self.ctx.save();
        self.ctx.set_stroke_style_str(color);
        self.ctx.set_line_width(line_width);
        self.ctx.begin_path();
        self.ctx.move_to(first.0, first.1);
        for (x, y) in rest {
            self.ctx.line_to(*x, *y);
        }
        self.ctx.stroke();
        self.ctx.restore();
    }

    fn fill_circle(&mut self, cx: f64, cy: f64, radius: f64, color: &str) {
        self.ctx.set_fill_style_str(color);
        self.ctx.begin_path();
        if self.ctx.arc(cx, cy, radius, 0.0, PI * 2.0).is_ok() {
            self.ctx.fill();
        }
    }

    fn fill_text(&mut self, text: &str, x: f64, y: f64, style: TextStyle<'_>) {
        self.ctx.save();
        self.ctx.set_font(style.font);
        self.ctx.set_fill_style_str(style.color);
        self.ctx.set_text_align(align_name(style.align));
        self.ctx.set_text_baseline(baseline_name(style.baseline));
        let _ = self.ctx.fill_text(text, x, y);
        self.ctx.restore();
    }

    fn measure_text(&mut self, text: &str, font: &str) -> f64 {
        self.ctx.save();
        self.ctx.set_font(font);
        let width = self
            .ctx
            .measure_text(text)
            .map(|metrics| metrics.width())
            .unwrap_or(0.0);
        self.ctx.restore();
        width
    }

    fn draw_sprite(&mut self, sprite: SpriteKind, rect: Rect, rotation: f64) {
        let image = self.sprites.image(sprite);
        if !image.complete() || image.natural_width() == 0 {
            return;
        }

        if rotation == 0.0 {
            let _ = self.ctx.draw_image_with_html_image_element_and_dw_and_dh(
                image,
                rect.x,
                rect.y,
                rect.width,
                rect.height,
            );
            return;
        }

        self.ctx.save();
        let _ = self
            .ctx
            .translate(rect.x + rect.width * 0.5, rect.y + rect.height * 0.5);
        let _ = self.ctx.rotate(rotation);
        let _ = self.ctx.draw_image_with_html_image_element_and_dw_and_dh(
            image,
            -rect.width * 0.5,
            -rect.height * 0.5,
            rect.width,
            rect.height,
        );
        self.ctx.restore();
    }
}
