//! Layout engine: instruction list to draw calls and hit regions
//!
//! A pass walks the instruction list once with a [`LayoutState`] cursor.
//! Every instruction updates the cursor whether or not it is visible, so
//! positions further down the page stay correct; only instructions that
//! intersect the viewport reach the surface.

use super::bitmap::Bitmap;
use super::instruction::{FieldId, Instruction, InstructionList, StyleKind};
use super::surface::{Color, FontStyle, Point, Rect, Surface};
use super::wrap::TextWrapper;

/// Fixed layout parameters
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutConfig {
    /// Space between the viewport edge and the content, on every side
    pub margin: f32,
    pub separator_gap: f32,
    pub image_gap: f32,
    pub field_width_chars: usize,
    /// Draw a horizontal rule in the middle of each separator gap
    pub separator_rule: bool,
    pub text_color: Color,
    pub link_color: Color,
    pub field_color: Color,
    pub rule_color: Color,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            margin: 10.0,
            separator_gap: 8.0,
            image_gap: 8.0,
            field_width_chars: 40,
            separator_rule: false,
            text_color: Color::BLACK,
            link_color: Color::LINK,
            field_color: Color::FIELD,
            rule_color: Color::RULE,
        }
    }
}

/// What a click on a hit region leads to
#[derive(Debug, Clone, PartialEq)]
pub enum HitTarget {
    /// Unresolved `href`
    Link(String),
    Field(FieldId),
}

/// Clickable screen area
#[derive(Debug, Clone, PartialEq)]
pub struct HitRegion {
    pub rect: Rect,
    pub target: HitTarget,
}

/// Result of one pass
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayoutOutput {
    pub hit_regions: Vec<HitRegion>,
    /// Total height of the laid-out page, margins included
    pub page_height: f32,
}

/// Hyperlink between its begin and end markers
#[derive(Debug, Clone)]
struct OpenLink {
    target: String,
    x: f32,
    y: f32,
    /// Some text has been laid out since the begin marker
    placed: bool,
}

/// Cursor state for one pass; rebuilt at the page origin every time
#[derive(Debug, Clone)]
pub struct LayoutState {
    /// Horizontal position in screen pixels
    pub x: f32,
    /// Vertical position from the top of the page
    pub y: f32,
    pub left: f32,
    pub right: f32,
    pub color: Color,
    styles: Vec<StyleKind>,
    /// The previous block-level gap has not been followed by content yet
    separated: bool,
    link: Option<OpenLink>,
    viewport: Rect,
    scroll: f32,
    char_width: f32,
    line_height: f32,
}

impl LayoutState {
    fn new(config: &LayoutConfig, viewport: Rect, scroll: f32, char_width: f32, line_height: f32) -> Self {
        let left = viewport.x + config.margin;
        Self {
            x: left,
            y: config.margin,
            left,
            right: (viewport.right() - config.margin).max(left + char_width),
            color: config.text_color,
            styles: Vec::new(),
            separated: true,
            link: None,
            viewport,
            scroll,
            char_width,
            line_height,
        }
    }

    /// Style from every open `StyleBegin`
    pub fn font(&self) -> FontStyle {
        FontStyle {
            bold: self.styles.contains(&StyleKind::Bold),
            italic: self.styles.contains(&StyleKind::Italic),
        }
    }

    /// Page offset to screen coordinate
    pub fn screen_y(&self, y: f32) -> f32 {
        self.viewport.y + y - self.scroll
    }

    /// Whether the page band `[y, y + height)` intersects the viewport
    pub fn is_visible(&self, y: f32, height: f32) -> bool {
        let top = self.screen_y(y);
        top < self.viewport.bottom() && top + height > self.viewport.y
    }

    /// Move to the start of a fresh line unless already there
    fn break_line(&mut self) {
        if self.x > self.left {
            self.y += self.line_height;
            self.x = self.left;
        }
    }
}

/// Lays out instruction lists onto a [`Surface`]
#[derive(Debug, Clone, Default)]
pub struct LayoutEngine {
    config: LayoutConfig,
}

impl LayoutEngine {
    pub fn new(config: LayoutConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Lay out a page.
    ///
    /// `field_values` holds the current text of each form field, indexed
    /// by [`FieldId`]. With `draw == false` nothing reaches the surface but
    /// hit regions and the page height are still computed.
    pub fn layout(
        &self,
        list: &InstructionList,
        field_values: &[String],
        viewport: Rect,
        scroll: f32,
        surface: &mut dyn Surface,
        draw: bool,
    ) -> LayoutOutput {
        let (char_width, line_height) = surface.measure("M", FontStyle::REGULAR);
        let char_width = if char_width > 0.0 { char_width } else { 1.0 };
        let line_height = if line_height > 0.0 { line_height } else { 1.0 };

        let mut state = LayoutState::new(&self.config, viewport, scroll, char_width, line_height);
        let mut output = LayoutOutput::default();

        for instruction in list {
            match instruction {
                Instruction::Text(text) => self.text(&mut state, text, surface, draw),
                Instruction::Separator => self.separator(&mut state, surface, draw),
                Instruction::StyleBegin(kind) => state.styles.push(*kind),
                Instruction::StyleEnd => {
                    state.styles.pop();
                }
                Instruction::HyperlinkBegin(target) => {
                    state.link = Some(OpenLink {
                        target: target.clone(),
                        x: state.x,
                        y: state.y,
                        placed: false,
                    });
                    state.color = self.config.link_color;
                }
                Instruction::HyperlinkEnd => {
                    if let Some(link) = state.link.take() {
                        for rect in link_rects(&state, link.x, link.y) {
                            output.hit_regions.push(HitRegion {
                                rect,
                                target: HitTarget::Link(link.target.clone()),
                            });
                        }
                    }
                    state.color = self.config.text_color;
                }
                Instruction::Image(bitmap) => self.image(&mut state, bitmap, surface, draw),
                Instruction::FormField(id) => {
                    let value = field_values
                        .get(id.index())
                        .map(String::as_str)
                        .unwrap_or_default();
                    let region = self.form_field(&mut state, *id, value, surface, draw);
                    output.hit_regions.push(region);
                }
            }
        }

        let trailing_line = if state.x > state.left { line_height } else { 0.0 };
        output.page_height = state.y + trailing_line + self.config.margin;
        output
    }

    fn text(&self, state: &mut LayoutState, text: &str, surface: &mut dyn Surface, draw: bool) {
        let wrapper = TextWrapper::new(state.left, state.right, state.char_width);
        // A link whose first word wraps starts on the next line
        if let Some(link) = state.link.as_mut().filter(|link| !link.placed) {
            link.placed = true;
            if wrapper.breaks_before(text, state.x) {
                link.x = state.left;
                link.y = state.y + state.line_height;
            }
        }
        // Text starting below the viewport can only go further down
        let cursor = if draw && state.screen_y(state.y) < state.viewport.bottom() {
            let (segments, cursor) = wrapper.wrap(text, state.x);
            let font = state.font();
            for segment in segments {
                let y = state.y + segment.line as f32 * state.line_height;
                if state.is_visible(y, state.line_height) {
                    let rect = Rect::new(segment.x, state.screen_y(y), segment.width, state.line_height);
                    surface.draw_text(segment.text, font, state.color, rect);
                }
            }
            cursor
        } else {
            wrapper.measure(text, state.x)
        };
        state.x = cursor.x;
        state.y += cursor.lines as f32 * state.line_height;
        state.separated = false;
    }

    fn separator(&self, state: &mut LayoutState, surface: &mut dyn Surface, draw: bool) {
        if state.separated {
            return;
        }
        state.break_line();
        let rule_y = state.y + self.config.separator_gap / 2.0;
        if draw && self.config.separator_rule && state.is_visible(rule_y, 1.0) {
            let y = state.screen_y(rule_y);
            surface.draw_line(
                Point { x: state.left, y },
                Point { x: state.right, y },
                self.config.rule_color,
            );
        }
        state.y += self.config.separator_gap;
        state.separated = true;
    }

    fn image(&self, state: &mut LayoutState, bitmap: &Bitmap, surface: &mut dyn Surface, draw: bool) {
        state.break_line();
        let available = state.right - state.left;
        let (width, height) = (bitmap.width() as f32, bitmap.height() as f32);
        // Shrink to the content width, never enlarge
        let scale = if width > available && width > 0.0 {
            available / width
        } else {
            1.0
        };
        let (width, height) = (width * scale, height * scale);
        if draw && state.is_visible(state.y, height) {
            let rect = Rect::new(state.left, state.screen_y(state.y), width, height);
            surface.draw_image(bitmap, rect);
        }
        state.y += height + self.config.image_gap;
        state.separated = false;
    }

    fn form_field(
        &self,
        state: &mut LayoutState,
        id: FieldId,
        value: &str,
        surface: &mut dyn Surface,
        draw: bool,
    ) -> HitRegion {
        state.break_line();
        let width = (self.config.field_width_chars as f32 * state.char_width).min(state.right - state.left);
        let rect = Rect::new(state.left, state.screen_y(state.y), width, state.line_height);
        if draw && state.is_visible(state.y, state.line_height) {
            surface.draw_rect(rect, self.config.field_color);
            let columns = (width / state.char_width) as usize;
            // Keep the end of long values in view, like a text box would
            let skip = value.chars().count().saturating_sub(columns);
            let shown: String = value.chars().skip(skip).collect();
            if !shown.is_empty() {
                let text_rect = Rect::new(rect.x, rect.y, shown.chars().count() as f32 * state.char_width, rect.height);
                surface.draw_text(&shown, FontStyle::REGULAR, self.config.text_color, text_rect);
            }
        }
        state.y += 2.0 * state.line_height;
        state.separated = false;
        HitRegion {
            rect,
            target: HitTarget::Field(id),
        }
    }
}

/// Screen rectangles covering a hyperlink from `(start_x, start_y)` to the
/// current cursor: one when it stays on a line, otherwise a first-line
/// tail, a full-width middle band (if any lines lie between) and a
/// last-line head. Empty rectangles are dropped.
fn link_rects(state: &LayoutState, start_x: f32, start_y: f32) -> Vec<Rect> {
    let lh = state.line_height;
    let (end_x, end_y) = (state.x, state.y);
    let mut rects = Vec::with_capacity(3);

    if end_y == start_y {
        rects.push(Rect::new(start_x, state.screen_y(start_y), end_x - start_x, lh));
    } else {
        rects.push(Rect::new(start_x, state.screen_y(start_y), state.right - start_x, lh));
        let middle_top = start_y + lh;
        if end_y > middle_top {
            rects.push(Rect::new(
                state.left,
                state.screen_y(middle_top),
                state.right - state.left,
                end_y - middle_top,
            ));
        }
        rects.push(Rect::new(state.left, state.screen_y(end_y), end_x - state.left, lh));
    }

    rects.retain(|r| r.width > 0.0 && r.height > 0.0);
    rects
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::instruction::{FormDescriptor, FormField};
    use crate::renderer::surface::{DrawCommand, RecordingSurface};

    // 8x16 glyphs, no margin, 10 columns by 4 lines on screen
    fn engine() -> LayoutEngine {
        LayoutEngine::new(LayoutConfig {
            margin: 0.0,
            ..LayoutConfig::default()
        })
    }

    fn viewport() -> Rect {
        Rect::new(0.0, 0.0, 80.0, 64.0)
    }

    fn list(instructions: Vec<Instruction>) -> InstructionList {
        let mut list = InstructionList::new();
        for instruction in instructions {
            list.push(instruction);
        }
        list
    }

    fn text(s: &str) -> Instruction {
        Instruction::Text(s.to_string())
    }

    fn link(target: &str, label: &str) -> Vec<Instruction> {
        vec![
            Instruction::HyperlinkBegin(target.to_string()),
            text(label),
            Instruction::HyperlinkEnd,
        ]
    }

    fn run(list: &InstructionList, scroll: f32) -> (LayoutOutput, RecordingSurface) {
        let mut surface = RecordingSurface::new(8.0, 16.0);
        let output = engine().layout(list, &[], viewport(), scroll, &mut surface, true);
        (output, surface)
    }

    fn text_rects(surface: &RecordingSurface) -> Vec<(String, Rect)> {
        surface
            .commands()
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Text { text, rect, .. } => Some((text.clone(), *rect)),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_single_line_link_one_region() {
        let mut instructions = vec![text("ab ")];
        instructions.extend(link("/x", "cd"));
        let (output, _) = run(&list(instructions), 0.0);
        assert_eq!(
            output.hit_regions,
            vec![HitRegion {
                rect: Rect::new(24.0, 0.0, 16.0, 16.0),
                target: HitTarget::Link("/x".to_string()),
            }]
        );
    }

    #[test]
    fn test_two_line_link_two_regions() {
        let mut instructions = vec![text("abcd ")];
        instructions.extend(link("/x", "efg hij"));
        let (output, _) = run(&list(instructions), 0.0);
        let rects: Vec<Rect> = output.hit_regions.iter().map(|r| r.rect).collect();
        assert_eq!(
            rects,
            vec![
                Rect::new(40.0, 0.0, 40.0, 16.0),
                Rect::new(0.0, 16.0, 24.0, 16.0),
            ]
        );
    }

    #[test]
    fn test_long_link_three_regions() {
        let mut instructions = vec![text("abcd ")];
        instructions.extend(link("/x", "efg hijklmno pqrstuvw xyz"));
        let (output, _) = run(&list(instructions), 0.0);
        let rects: Vec<Rect> = output.hit_regions.iter().map(|r| r.rect).collect();
        assert_eq!(rects.len(), 3);
        assert_eq!(rects[0], Rect::new(40.0, 0.0, 40.0, 16.0));
        // lines 1 and 2 fully covered
        assert_eq!(rects[1], Rect::new(0.0, 16.0, 80.0, 32.0));
        assert_eq!(rects[2], Rect::new(0.0, 48.0, 24.0, 16.0));
    }

    #[test]
    fn test_styled_run_wraps_before_overflowing_word() {
        let page = list(vec![
            text("abcdefg "),
            Instruction::StyleBegin(StyleKind::Bold),
            text("there"),
            Instruction::StyleEnd,
        ]);
        let (_, surface) = run(&page, 0.0);
        assert_eq!(
            text_rects(&surface),
            vec![
                ("abcdefg ".to_string(), Rect::new(0.0, 0.0, 64.0, 16.0)),
                ("there".to_string(), Rect::new(0.0, 16.0, 40.0, 16.0)),
            ]
        );
    }

    #[test]
    fn test_link_wrapped_before_first_word_starts_on_next_line() {
        let mut instructions = vec![text("abcdefghi ")];
        instructions.extend(link("/x", "ab cd"));
        let (output, _) = run(&list(instructions), 0.0);
        let rects: Vec<Rect> = output.hit_regions.iter().map(|r| r.rect).collect();
        assert_eq!(rects, vec![Rect::new(0.0, 16.0, 40.0, 16.0)]);
    }

    #[test]
    fn test_link_from_line_end_spanning_two_lines_two_regions() {
        let mut instructions = vec![text("abcdefghi ")];
        instructions.extend(link("/x", "ab cdefghijk"));
        let (output, surface) = run(&list(instructions), 0.0);
        let rects: Vec<Rect> = output.hit_regions.iter().map(|r| r.rect).collect();
        assert_eq!(
            rects,
            vec![
                Rect::new(0.0, 16.0, 80.0, 16.0),
                Rect::new(0.0, 32.0, 72.0, 16.0),
            ]
        );
        assert!(text_rects(&surface).iter().all(|(_, r)| r.right() <= 80.0));
    }

    #[test]
    fn test_link_color_applies_inside_link_only() {
        let mut instructions = link("/x", "in");
        instructions.push(text(" out"));
        let (_, surface) = run(&list(instructions), 0.0);
        let colors: Vec<Color> = surface
            .commands()
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Text { color, .. } => Some(*color),
                _ => None,
            })
            .collect();
        assert_eq!(colors, vec![Color::LINK, Color::BLACK]);
    }

    #[test]
    fn test_nested_styles() {
        let instructions = list(vec![
            Instruction::StyleBegin(StyleKind::Bold),
            Instruction::StyleBegin(StyleKind::Italic),
            text("a"),
            Instruction::StyleEnd,
            text("b"),
            Instruction::StyleEnd,
            text("c"),
        ]);
        let (_, surface) = run(&instructions, 0.0);
        let fonts: Vec<FontStyle> = surface
            .commands()
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Text { font, .. } => Some(*font),
                _ => None,
            })
            .collect();
        assert_eq!(
            fonts,
            vec![
                FontStyle { bold: true, italic: true },
                FontStyle { bold: true, italic: false },
                FontStyle::REGULAR,
            ]
        );
    }

    #[test]
    fn test_separators_collapse() {
        let single = list(vec![text("a"), Instruction::Separator, text("b")]);
        let many = list(vec![
            text("a"),
            Instruction::Separator,
            Instruction::Separator,
            Instruction::Separator,
            text("b"),
        ]);
        let (_, single_surface) = run(&single, 0.0);
        let (_, many_surface) = run(&many, 0.0);
        let expected = Rect::new(0.0, 16.0 + 8.0, 8.0, 16.0);
        assert_eq!(text_rects(&single_surface)[1].1, expected);
        assert_eq!(text_rects(&many_surface)[1].1, expected);
    }

    #[test]
    fn test_leading_separator_adds_no_gap() {
        let (_, surface) = run(&list(vec![Instruction::Separator, text("a")]), 0.0);
        assert_eq!(text_rects(&surface)[0].1.y, 0.0);
    }

    #[test]
    fn test_separator_rule_drawn_when_enabled() {
        let engine = LayoutEngine::new(LayoutConfig {
            margin: 0.0,
            separator_rule: true,
            ..LayoutConfig::default()
        });
        let mut surface = RecordingSurface::new(8.0, 16.0);
        let instructions = list(vec![text("a"), Instruction::Separator, text("b")]);
        engine.layout(&instructions, &[], viewport(), 0.0, &mut surface, true);
        assert!(surface
            .commands()
            .iter()
            .any(|c| matches!(c, DrawCommand::Line { from, .. } if from.y == 20.0)));
    }

    #[test]
    fn test_culling_draws_only_visible_lines() {
        // ten one-line paragraphs, 24px apart
        let mut instructions = Vec::new();
        for i in 0..10 {
            instructions.push(Instruction::Separator);
            instructions.push(text(&format!("line{i}")));
        }
        let page = list(instructions);
        let (output, surface) = run(&page, 48.0);
        let drawn: Vec<String> = text_rects(&surface).into_iter().map(|(t, _)| t).collect();
        assert_eq!(drawn, vec!["line2", "line3", "line4"]);
        assert_eq!(text_rects(&surface)[0].1.y, 0.0);
        assert_eq!(output.page_height, 9.0 * 24.0 + 16.0);
    }

    #[test]
    fn test_measure_only_pass_matches_drawing_pass() {
        let mut instructions = vec![text("some words that wrap around ")];
        instructions.extend(link("/x", "a link that wraps too"));
        instructions.push(Instruction::Separator);
        instructions.extend(link("/y", "tail"));
        let page = list(instructions);

        let (drawn, _) = run(&page, 0.0);
        let mut surface = RecordingSurface::new(8.0, 16.0);
        let measured = engine().layout(&page, &[], viewport(), 0.0, &mut surface, false);
        assert!(surface.commands().is_empty());
        assert_eq!(drawn, measured);
    }

    #[test]
    fn test_scroll_shifts_hit_regions() {
        let page = list(link("/x", "ab"));
        let (output, _) = run(&page, 10.0);
        assert_eq!(output.hit_regions[0].rect.y, -10.0);
    }

    #[test]
    fn test_image_breaks_line_and_scales_down() {
        let bitmap = Bitmap::from_rgba(160, 40, vec![0; 160 * 40 * 4]);
        let page = list(vec![text("x"), Instruction::Image(bitmap.clone()), text("after")]);
        let (_, surface) = run(&page, 0.0);
        assert!(surface.commands().contains(&DrawCommand::Image {
            bitmap_id: bitmap.id(),
            rect: Rect::new(0.0, 16.0, 80.0, 20.0),
        }));
        // 16 (first line) + 20 (image) + 8 (gap)
        assert_eq!(text_rects(&surface)[1].1, Rect::new(0.0, 44.0, 40.0, 16.0));
    }

    #[test]
    fn test_small_image_keeps_size() {
        let bitmap = Bitmap::from_rgba(8, 8, vec![0; 8 * 8 * 4]);
        let page = list(vec![Instruction::Image(bitmap.clone())]);
        let (output, surface) = run(&page, 0.0);
        assert!(surface.commands().contains(&DrawCommand::Image {
            bitmap_id: bitmap.id(),
            rect: Rect::new(0.0, 0.0, 8.0, 8.0),
        }));
        assert_eq!(output.page_height, 16.0);
    }

    #[test]
    fn test_form_field_region_and_advance() {
        let mut page = InstructionList::new();
        page.push(text("Search:"));
        let form = page.add_form(FormDescriptor::default());
        let id = page.push_field(FormField {
            name: "q".into(),
            form,
            initial_value: String::new(),
        });
        page.push(text("below"));

        let mut surface = RecordingSurface::new(8.0, 16.0);
        let values = vec!["rust".to_string()];
        let output = engine().layout(&page, &values, viewport(), 0.0, &mut surface, true);

        assert_eq!(
            output.hit_regions,
            vec![HitRegion {
                rect: Rect::new(0.0, 16.0, 80.0, 16.0),
                target: HitTarget::Field(id),
            }]
        );
        let texts = text_rects(&surface);
        assert_eq!(texts[1], ("rust".to_string(), Rect::new(0.0, 16.0, 32.0, 16.0)));
        // field line plus one spare line
        assert_eq!(texts[2].1.y, 48.0);
    }

    #[test]
    fn test_unterminated_link_yields_no_region() {
        let page = list(vec![Instruction::HyperlinkBegin("/x".into()), text("dangling")]);
        let (output, _) = run(&page, 0.0);
        assert!(output.hit_regions.is_empty());
    }
}
