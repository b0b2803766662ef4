//! Browsing session: navigation state machine tying loads, history and
//! form submission together
//!
//! A load runs every stage in order on the calling thread:
//! 1. Fetch the document through the [`Fetcher`]
//! 2. Parse it into an element tree
//! 3. Simplify the tree into an instruction list (fetching images)
//! 4. Lay it out once, measure-only, to produce hit regions
//!
//! The previous page is dropped before step 1 and the new one is only
//! installed once every step has succeeded.

mod event;
mod form;
mod history;
mod page;

pub use event::{EventOutcome, InputEvent, Key};
pub use form::{FORM_CONTENT_TYPE, submission};
pub use history::History;
pub use page::Page;

use crate::config::ViewerConfig;
use crate::network::{Fetcher, HttpClient, Request, address};
use crate::renderer::{
    FieldId, FontStyle, HitRegion, HitTarget, HtmlParser, ImageDecoder, LayoutEngine, RasterDecoder,
    Rect, RecordingSurface, Simplifier, Surface,
};
use crate::utils::Result;

/// Where the session is in its load cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavState {
    /// No page installed: initial state, or after a failed load
    Idle,
    /// A load is running
    Loading,
    /// A page is installed and laid out
    Rendered,
}

/// A single-window browsing session
pub struct Session {
    fetcher: Box<dyn Fetcher>,
    decoder: Box<dyn ImageDecoder>,
    parser: HtmlParser,
    layout: LayoutEngine,
    state: NavState,
    history: History,
    page: Option<Page>,
    hit_regions: Vec<HitRegion>,
    viewport: Rect,
    scroll: f32,
    page_height: f32,
    /// Glyph size of the last surface rendered to
    metrics: (f32, f32),
    scroll_step: f32,
    focused: Option<FieldId>,
}

impl Session {
    /// Create an idle session
    pub fn new(config: &ViewerConfig, fetcher: Box<dyn Fetcher>, decoder: Box<dyn ImageDecoder>) -> Self {
        Self {
            fetcher,
            decoder,
            parser: HtmlParser::new(),
            layout: LayoutEngine::new(config.layout()),
            state: NavState::Idle,
            history: History::new(),
            page: None,
            hit_regions: Vec::new(),
            viewport: Rect::new(0.0, 0.0, config.window_width as f32, config.window_height as f32),
            scroll: 0.0,
            page_height: 0.0,
            metrics: RecordingSurface::default().measure("M", FontStyle::REGULAR),
            scroll_step: config.scroll_step,
            focused: None,
        }
    }

    /// Create a session fetching over HTTP and decoding raster images
    pub fn with_network(config: &ViewerConfig) -> Result<Self> {
        let client = HttpClient::new(config)?;
        Ok(Self::new(config, Box::new(client), Box::new(RasterDecoder)))
    }

    pub fn state(&self) -> NavState {
        self.state
    }

    pub fn page(&self) -> Option<&Page> {
        self.page.as_ref()
    }

    pub fn title(&self) -> Option<&str> {
        self.page.as_ref().and_then(Page::title)
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn scroll(&self) -> f32 {
        self.scroll
    }

    pub fn page_height(&self) -> f32 {
        self.page_height
    }

    pub fn viewport(&self) -> Rect {
        self.viewport
    }

    pub fn focused_field(&self) -> Option<FieldId> {
        self.focused
    }

    /// Hit regions of the most recent layout pass
    pub fn current_hit_regions(&self) -> &[HitRegion] {
        &self.hit_regions
    }

    /// Load an address typed by the user; a missing scheme means `https`
    pub fn open(&mut self, typed: &str) -> Result<()> {
        let url = address::normalize_typed(typed)?;
        self.navigate(Request::get(url), true)
    }

    /// Load `target`, resolved against the current page
    pub fn load(&mut self, target: &str) -> Result<()> {
        let base = self.page.as_ref().map(Page::url);
        let url = address::resolve(base, target)?;
        self.navigate(Request::get(url), true)
    }

    /// Reload the previous history entry; a no-op with one entry or none
    pub fn go_back(&mut self) -> Result<bool> {
        let Some(url) = self.history.back().cloned() else {
            log::debug!("No earlier page to go back to");
            return Ok(false);
        };
        self.navigate(Request::get(url), false)?;
        Ok(true)
    }

    /// Submit the form owning `field` with that field's current value
    pub fn submit_form(&mut self, field: FieldId) -> Result<()> {
        let Some(page) = &self.page else {
            return Ok(());
        };
        let request = form::submission(
            page.instructions(),
            field,
            page.field_value(field),
            page.url(),
        )?;
        self.navigate(request, true)
    }

    /// Follow whatever lies under `(x, y)`: a link loads its target, a
    /// field takes focus
    pub fn handle_click(&mut self, x: f32, y: f32) -> Result<EventOutcome> {
        let target = self
            .hit_regions
            .iter()
            .find(|region| region.rect.contains(x, y))
            .map(|region| region.target.clone());
        match target {
            Some(HitTarget::Link(href)) => {
                self.load(&href)?;
                Ok(EventOutcome::Navigated)
            }
            Some(HitTarget::Field(id)) => {
                self.focused = Some(id);
                Ok(EventOutcome::Redraw)
            }
            None if self.focused.take().is_some() => Ok(EventOutcome::Redraw),
            None => Ok(EventOutcome::Ignored),
        }
    }

    /// Track a new viewport size and lay the page out again
    pub fn handle_resize(&mut self, width: f32, height: f32) {
        self.viewport.width = width.max(0.0);
        self.viewport.height = height.max(0.0);
        self.relayout();
        let clamped = self.scroll.clamp(0.0, self.max_scroll());
        if clamped != self.scroll {
            self.scroll = clamped;
            self.relayout();
        }
    }

    /// Scroll by `delta` pixels, staying within the page.
    ///
    /// Returns whether the offset changed.
    pub fn scroll_by(&mut self, delta: f32) -> bool {
        let scroll = (self.scroll + delta).clamp(0.0, self.max_scroll());
        if scroll == self.scroll {
            return false;
        }
        self.scroll = scroll;
        self.relayout();
        true
    }

    /// Lay out the current page onto `surface`.
    ///
    /// With `draw == false` only the hit regions and page height are
    /// updated. Returns the hit regions of this pass.
    pub fn render(&mut self, surface: &mut dyn Surface, viewport: Rect, scroll: f32, draw: bool) -> &[HitRegion] {
        self.viewport = viewport;
        self.scroll = scroll;
        self.metrics = surface.measure("M", FontStyle::REGULAR);
        match &self.page {
            Some(page) => {
                let output = self.layout.layout(
                    page.instructions(),
                    page.field_values(),
                    viewport,
                    scroll,
                    surface,
                    draw,
                );
                self.hit_regions = output.hit_regions;
                self.page_height = output.page_height;
            }
            None => {
                self.hit_regions.clear();
                self.page_height = 0.0;
            }
        }
        &self.hit_regions
    }

    /// Dispatch one input event
    pub fn handle_event(&mut self, event: InputEvent) -> Result<EventOutcome> {
        match event {
            InputEvent::Key(key) => self.handle_key(key),
            InputEvent::Click { x, y } => self.handle_click(x, y),
            InputEvent::Text(text) => Ok(self.type_text(&text)),
            InputEvent::Scroll(delta) => Ok(redraw_if(self.scroll_by(delta))),
            InputEvent::Resize { width, height } => {
                self.handle_resize(width, height);
                Ok(EventOutcome::Redraw)
            }
            InputEvent::Quit => Ok(EventOutcome::Quit),
        }
    }

    fn handle_key(&mut self, key: Key) -> Result<EventOutcome> {
        let page_step = (self.viewport.height - self.metrics.1).max(self.scroll_step);
        let outcome = match key {
            Key::Up => redraw_if(self.scroll_by(-self.scroll_step)),
            Key::Down => redraw_if(self.scroll_by(self.scroll_step)),
            Key::PageUp => redraw_if(self.scroll_by(-page_step)),
            Key::PageDown => redraw_if(self.scroll_by(page_step)),
            Key::Home => redraw_if(self.scroll_by(-self.scroll)),
            Key::End => redraw_if(self.scroll_by(self.max_scroll() - self.scroll)),
            Key::Escape => redraw_if(self.focused.take().is_some()),
            Key::Backspace => match self.focused {
                Some(field) => {
                    let changed = self
                        .page
                        .as_mut()
                        .and_then(|page| page.field_value_mut(field))
                        .and_then(String::pop)
                        .is_some();
                    redraw_if(changed)
                }
                None => navigated_if(self.go_back()?),
            },
            Key::Enter => match self.focused {
                Some(field) => {
                    self.submit_form(field)?;
                    EventOutcome::Navigated
                }
                None => EventOutcome::Ignored,
            },
            Key::Back => navigated_if(self.go_back()?),
        };
        Ok(outcome)
    }

    fn type_text(&mut self, text: &str) -> EventOutcome {
        let Some(field) = self.focused else {
            return EventOutcome::Ignored;
        };
        let Some(value) = self.page.as_mut().and_then(|page| page.field_value_mut(field)) else {
            return EventOutcome::Ignored;
        };
        let before = value.len();
        value.extend(text.chars().filter(|c| !c.is_control()));
        redraw_if(value.len() != before)
    }

    /// Run `request` through the whole load cycle and install the result
    fn navigate(&mut self, request: Request, record: bool) -> Result<()> {
        self.page = None;
        self.hit_regions.clear();
        self.focused = None;
        self.scroll = 0.0;
        self.page_height = 0.0;
        self.state = NavState::Loading;
        log::info!("Loading {}", request.url());

        match self.build_page(&request) {
            Ok(page) => {
                if record {
                    self.history.push(request.url().clone());
                }
                log::info!(
                    "Rendered {} ({} instructions)",
                    page.url(),
                    page.instructions().len()
                );
                self.page = Some(page);
                self.state = NavState::Rendered;
                self.relayout();
                Ok(())
            }
            Err(err) => {
                self.state = NavState::Idle;
                Err(err)
            }
        }
    }

    fn build_page(&self, request: &Request) -> Result<Page> {
        let response = self.fetcher.fetch(request)?;
        let base = response.final_url().unwrap_or(request.url()).clone();
        let document = self.parser.parse(response.body(), &base)?;
        let simplified = Simplifier::new(&base, self.fetcher.as_ref(), self.decoder.as_ref())
            .simplify_document(&document);
        Ok(Page::new(base, simplified))
    }

    /// Refresh hit regions and page height without drawing
    fn relayout(&mut self) {
        let (char_width, line_height) = self.metrics;
        let mut measurer = RecordingSurface::new(char_width, line_height);
        let (viewport, scroll) = (self.viewport, self.scroll);
        self.render(&mut measurer, viewport, scroll, false);
    }

    fn max_scroll(&self) -> f32 {
        (self.page_height - self.viewport.height).max(0.0)
    }
}

fn redraw_if(changed: bool) -> EventOutcome {
    if changed {
        EventOutcome::Redraw
    } else {
        EventOutcome::Ignored
    }
}

fn navigated_if(navigated: bool) -> EventOutcome {
    if navigated {
        EventOutcome::Navigated
    } else {
        EventOutcome::Ignored
    }
}
