//! [`Surface`] implementation on top of an egui painter

use crate::renderer::{Bitmap, Color, FontStyle, Point, Rect, Surface};
use egui::text::{LayoutJob, TextFormat};
use egui::{Color32, ColorImage, FontId, Pos2, Stroke, TextureHandle, TextureOptions};
use std::collections::HashMap;

/// GPU textures of decoded page images, keyed by bitmap id
pub type TextureCache = HashMap<u64, TextureHandle>;

/// Draws layout output with a monospace font into one egui painter
pub struct EguiSurface<'a> {
    painter: &'a egui::Painter,
    textures: &'a mut TextureCache,
    font: FontId,
    char_width: f32,
    line_height: f32,
}

impl<'a> EguiSurface<'a> {
    pub fn new(painter: &'a egui::Painter, textures: &'a mut TextureCache, font_size: f32) -> Self {
        let font = FontId::monospace(font_size);
        let galley = painter.layout_no_wrap("M".to_string(), font.clone(), Color32::BLACK);
        let size = galley.size();
        Self {
            painter,
            textures,
            font,
            char_width: size.x.max(1.0),
            line_height: size.y.max(1.0),
        }
    }

    fn texture(&mut self, bitmap: &Bitmap) -> egui::TextureId {
        let painter = self.painter;
        let ctx = painter.ctx();
        self.textures
            .entry(bitmap.id())
            .or_insert_with(|| {
                let size = [bitmap.width() as usize, bitmap.height() as usize];
                let image = ColorImage::from_rgba_unmultiplied(size, bitmap.pixels());
                ctx.load_texture(format!("bitmap-{}", bitmap.id()), image, TextureOptions::LINEAR)
            })
            .id()
    }
}

impl Surface for EguiSurface<'_> {
    fn measure(&self, text: &str, _font: FontStyle) -> (f32, f32) {
        (text.chars().count() as f32 * self.char_width, self.line_height)
    }

    fn draw_text(&mut self, text: &str, font: FontStyle, color: Color, rect: Rect) {
        let color = color32(color);
        let job = LayoutJob::single_section(
            text.to_string(),
            TextFormat {
                font_id: self.font.clone(),
                color,
                italics: font.italic,
                ..Default::default()
            },
        );
        let galley = self.painter.layout_job(job);
        let pos = Pos2::new(rect.x, rect.y);
        if font.bold {
            // double strike, one pixel apart
            self.painter.galley(pos + egui::vec2(1.0, 0.0), galley.clone(), color);
        }
        self.painter.galley(pos, galley, color);
    }

    fn draw_image(&mut self, bitmap: &Bitmap, rect: Rect) {
        let texture = self.texture(bitmap);
        let uv = egui::Rect::from_min_max(Pos2::ZERO, Pos2::new(1.0, 1.0));
        self.painter.image(texture, egui_rect(rect), uv, Color32::WHITE);
    }

    fn draw_rect(&mut self, rect: Rect, color: Color) {
        self.painter.rect_filled(egui_rect(rect), 0.0, color32(color));
    }

    fn draw_line(&mut self, from: Point, to: Point, color: Color) {
        self.painter.line_segment(
            [Pos2::new(from.x, from.y), Pos2::new(to.x, to.y)],
            Stroke::new(1.0, color32(color)),
        );
    }
}

pub fn color32(color: Color) -> Color32 {
    Color32::from_rgba_unmultiplied(color.r, color.g, color.b, color.a)
}

pub fn egui_rect(rect: Rect) -> egui::Rect {
    egui::Rect::from_min_size(Pos2::new(rect.x, rect.y), egui::vec2(rect.width, rect.height))
}

pub fn page_rect(rect: egui::Rect) -> Rect {
    Rect::new(rect.min.x, rect.min.y, rect.width(), rect.height())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_conversion_round_trips() {
        let rect = Rect::new(3.0, 4.0, 50.0, 20.0);
        assert_eq!(page_rect(egui_rect(rect)), rect);
    }

    #[test]
    fn test_color_conversion() {
        assert_eq!(color32(Color::LINK), Color32::from_rgb(0, 0, 238));
    }
}
