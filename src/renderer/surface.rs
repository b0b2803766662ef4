//! Drawing and measurement primitives consumed by the layout engine

use super::bitmap::Bitmap;

/// RGBA colour
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const LINK: Color = Color::rgb(0, 0, 238);
    pub const FIELD: Color = Color::rgb(225, 225, 225);
    pub const RULE: Color = Color::rgb(170, 170, 170);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }
}

/// Rectangle for positioning
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Half-open containment: the right and bottom edges are outside
    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

/// Active font style
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct FontStyle {
    pub bold: bool,
    pub italic: bool,
}

impl FontStyle {
    pub const REGULAR: FontStyle = FontStyle {
        bold: false,
        italic: false,
    };
}

/// Rendering surface: font metrics plus the draw calls layout issues
pub trait Surface {
    /// Size of `text` in the given style; fonts are monospace
    fn measure(&self, text: &str, font: FontStyle) -> (f32, f32);
    fn draw_text(&mut self, text: &str, font: FontStyle, color: Color, rect: Rect);
    fn draw_image(&mut self, bitmap: &Bitmap, rect: Rect);
    fn draw_rect(&mut self, rect: Rect, color: Color);
    fn draw_line(&mut self, from: Point, to: Point, color: Color);
}

/// A draw call captured by [`RecordingSurface`]
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Text {
        text: String,
        font: FontStyle,
        color: Color,
        rect: Rect,
    },
    Image {
        bitmap_id: u64,
        rect: Rect,
    },
    Rect {
        rect: Rect,
        color: Color,
    },
    Line {
        from: Point,
        to: Point,
        color: Color,
    },
}

/// Fixed-metric surface that records what would have been drawn
#[derive(Debug, Clone)]
pub struct RecordingSurface {
    char_width: f32,
    line_height: f32,
    commands: Vec<DrawCommand>,
}

impl RecordingSurface {
    pub fn new(char_width: f32, line_height: f32) -> Self {
        Self {
            char_width,
            line_height,
            commands: Vec::new(),
        }
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }

    /// Text calls reassembled into lines, top to bottom
    pub fn text_lines(&self) -> Vec<String> {
        let mut runs: Vec<(f32, f32, &str)> = self
            .commands
            .iter()
            .filter_map(|command| match command {
                DrawCommand::Text { text, rect, .. } => Some((rect.y, rect.x, text.as_str())),
                _ => None,
            })
            .collect();
        runs.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.total_cmp(&b.1)));

        let mut lines: Vec<(f32, String)> = Vec::new();
        for (y, x, text) in runs {
            let column = (x / self.char_width).round().max(0.0) as usize;
            match lines.last_mut() {
                Some((line_y, line)) if *line_y == y => {
                    let used = line.chars().count();
                    if column > used {
                        line.extend(std::iter::repeat_n(' ', column - used));
                    }
                    line.push_str(text);
                }
                _ => {
                    let mut line = " ".repeat(column);
                    line.push_str(text);
                    lines.push((y, line));
                }
            }
        }
        lines.into_iter().map(|(_, line)| line.trim_end().to_string()).collect()
    }
}

impl Default for RecordingSurface {
    fn default() -> Self {
        Self::new(8.0, 16.0)
    }
}

impl Surface for RecordingSurface {
    fn measure(&self, text: &str, _font: FontStyle) -> (f32, f32) {
        (text.chars().count() as f32 * self.char_width, self.line_height)
    }

    fn draw_text(&mut self, text: &str, font: FontStyle, color: Color, rect: Rect) {
        self.commands.push(DrawCommand::Text {
            text: text.to_string(),
            font,
            color,
            rect,
        });
    }

    fn draw_image(&mut self, bitmap: &Bitmap, rect: Rect) {
        self.commands.push(DrawCommand::Image {
            bitmap_id: bitmap.id(),
            rect,
        });
    }

    fn draw_rect(&mut self, rect: Rect, color: Color) {
        self.commands.push(DrawCommand::Rect { rect, color });
    }

    fn draw_line(&mut self, from: Point, to: Point, color: Color) {
        self.commands.push(DrawCommand::Line { from, to, color });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_contains_is_half_open() {
        let rect = Rect::new(10.0, 10.0, 20.0, 5.0);
        assert!(rect.contains(10.0, 10.0));
        assert!(rect.contains(29.9, 14.9));
        assert!(!rect.contains(30.0, 12.0));
        assert!(!rect.contains(15.0, 15.0));
    }

    #[test]
    fn test_recording_measure_is_monospace() {
        let surface = RecordingSurface::new(8.0, 16.0);
        assert_eq!(surface.measure("abc", FontStyle::REGULAR), (24.0, 16.0));
        assert_eq!(surface.measure("", FontStyle::REGULAR), (0.0, 16.0));
    }

    #[test]
    fn test_text_lines_rebuilds_rows() {
        let mut surface = RecordingSurface::new(8.0, 16.0);
        surface.draw_text("world", FontStyle::REGULAR, Color::BLACK, Rect::new(48.0, 0.0, 40.0, 16.0));
        surface.draw_text("hello", FontStyle::REGULAR, Color::BLACK, Rect::new(0.0, 0.0, 40.0, 16.0));
        surface.draw_text("next", FontStyle::REGULAR, Color::BLACK, Rect::new(0.0, 16.0, 32.0, 16.0));
        assert_eq!(surface.text_lines(), vec!["hello world", "next"]);
    }
}
