//! Greedy word wrapping for monospace text
//!
//! Text is scanned left to right while remembering the last whitespace
//! seen on the current line. When a character crosses the right margin the
//! line breaks at that whitespace; a word with no whitespace before the
//! margin overflows instead of being split. `\n` always breaks. A run that
//! starts partway along a line may also break before its first word, since
//! the whitespace ending the previous run is a break point too.

/// One laid-out piece of a line
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineSegment<'a> {
    pub text: &'a str,
    /// Left edge of the segment
    pub x: f32,
    /// Lines below the starting line (0 = the line the text started on)
    pub line: usize,
    pub width: f32,
}

/// Where the cursor ends up after a run of text
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WrapCursor {
    pub x: f32,
    /// Line breaks taken
    pub lines: usize,
}

/// Wrapping bounds for one layout pass
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextWrapper {
    left: f32,
    right: f32,
    char_width: f32,
}

impl TextWrapper {
    /// `left`/`right` are the content edges; `char_width` the glyph advance
    pub fn new(left: f32, right: f32, char_width: f32) -> Self {
        Self {
            left,
            right,
            char_width,
        }
    }

    /// Break `text` starting at `start_x`, returning the segments to draw
    pub fn wrap<'a>(&self, text: &'a str, start_x: f32) -> (Vec<LineSegment<'a>>, WrapCursor) {
        let mut segments = Vec::new();
        let cursor = self.break_lines(text, start_x, |segment| segments.push(segment));
        (segments, cursor)
    }

    /// Same line breaks as [`wrap`](Self::wrap), without collecting segments
    pub fn measure(&self, text: &str, start_x: f32) -> WrapCursor {
        self.break_lines(text, start_x, |_| {})
    }

    /// Whether a run starting at `start_x` moves to a fresh line before its
    /// first character
    pub fn breaks_before(&self, text: &str, start_x: f32) -> bool {
        if start_x <= self.left {
            return false;
        }
        let first_word = text.chars().take_while(|c| !c.is_whitespace()).count();
        first_word > 0 && start_x + first_word as f32 * self.char_width > self.right
    }

    fn break_lines<'a>(
        &self,
        text: &'a str,
        start_x: f32,
        mut emit: impl FnMut(LineSegment<'a>),
    ) -> WrapCursor {
        let cw = self.char_width;
        let (mut x, mut line) = if self.breaks_before(text, start_x) {
            (self.left, 1)
        } else {
            (start_x, 0)
        };
        let mut seg_start = 0;
        let mut seg_x = x;
        // (byte offset, byte length) of the last whitespace on this line
        let mut last_space: Option<(usize, usize)> = None;

        let mut flush = |from: usize, to: usize, seg_x: f32, line: usize| {
            let piece = &text[from..to];
            if !piece.is_empty() {
                emit(LineSegment {
                    text: piece,
                    x: seg_x,
                    line,
                    width: piece.chars().count() as f32 * cw,
                });
            }
        };

        for (i, ch) in text.char_indices() {
            if ch == '\n' {
                flush(seg_start, i, seg_x, line);
                line += 1;
                x = self.left;
                seg_start = i + 1;
                seg_x = self.left;
                last_space = None;
                continue;
            }
            if ch.is_whitespace() {
                last_space = Some((i, ch.len_utf8()));
            }
            x += cw;
            if x <= self.right {
                continue;
            }
            if let Some((space, len)) = last_space.take() {
                flush(seg_start, space, seg_x, line);
                line += 1;
                seg_start = space + len;
                seg_x = self.left;
                let carried = text[seg_start..i + ch.len_utf8()].chars().count();
                x = self.left + carried as f32 * cw;
            }
        }
        flush(seg_start, text.len(), seg_x, line);

        WrapCursor { x, lines: line }
    }
}
