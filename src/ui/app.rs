//! Main viewer application using eframe/egui

use super::painter::{EguiSurface, TextureCache, color32, page_rect};
use crate::config::ViewerConfig;
use crate::engine::{EventOutcome, InputEvent, Key, Session};
use crate::renderer::Color;
use crate::utils::Result;
use eframe::egui;

/// Work that may load a page
#[derive(Debug, Clone, PartialEq)]
enum Action {
    Open(String),
    Event(InputEvent),
}

/// An action held back until a frame showing the busy indicator has been
/// painted, since loading blocks the UI thread
#[derive(Debug)]
struct Deferred {
    action: Action,
    indicator_painted: bool,
}

/// Main viewer application
pub struct ViewerApp {
    config: ViewerConfig,
    session: Session,
    /// URL bar content
    address: String,
    pending: Option<Deferred>,
    /// Last fatal load error, shown in the status bar
    error: Option<String>,
    textures: TextureCache,
    content_size: egui::Vec2,
}

impl ViewerApp {
    /// Create the application; the home page loads on the first frames
    pub fn new(config: ViewerConfig, session: Session) -> Self {
        let address = config.home_url.clone();
        Self {
            pending: Some(Deferred {
                action: Action::Open(address.clone()),
                indicator_painted: false,
            }),
            address,
            config,
            session,
            error: None,
            textures: TextureCache::new(),
            content_size: egui::Vec2::ZERO,
        }
    }

    fn defer(&mut self, action: Action) {
        if self.pending.is_none() {
            self.pending = Some(Deferred {
                action,
                indicator_painted: false,
            });
        }
    }

    fn run_pending(&mut self, ctx: &egui::Context) {
        if !self.pending.as_ref().is_some_and(|d| d.indicator_painted) {
            return;
        }
        let Some(deferred) = self.pending.take() else {
            return;
        };
        let result = match deferred.action {
            Action::Open(typed) => self.session.open(&typed).map(|()| EventOutcome::Navigated),
            Action::Event(event) => self.session.handle_event(event),
        };
        self.finish(ctx, result);
    }

    fn apply(&mut self, ctx: &egui::Context, event: InputEvent) {
        let result = self.session.handle_event(event);
        self.finish(ctx, result);
    }

    fn finish(&mut self, ctx: &egui::Context, result: Result<EventOutcome>) {
        match result {
            Ok(EventOutcome::Navigated) => {
                self.error = None;
                self.textures.clear();
                if let Some(page) = self.session.page() {
                    self.address = page.url().to_string();
                }
                let title = match self.session.title() {
                    Some(title) => format!("{title} - {}", crate::NAME),
                    None => crate::NAME.to_string(),
                };
                ctx.send_viewport_cmd(egui::ViewportCommand::Title(title));
            }
            Ok(EventOutcome::Quit) => ctx.send_viewport_cmd(egui::ViewportCommand::Close),
            Ok(EventOutcome::Redraw | EventOutcome::Ignored) => {}
            Err(err) => {
                log::error!("Page load failed: {err}");
                self.error = Some(err.to_string());
                self.textures.clear();
            }
        }
    }

    /// Render the toolbar
    fn render_toolbar(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            let back = ui.add_enabled(self.session.history().can_go_back(), egui::Button::new("←"));
            if back.clicked() {
                self.defer(Action::Event(InputEvent::Key(Key::Back)));
            }

            let response = ui.add(
                egui::TextEdit::singleline(&mut self.address)
                    .desired_width(ui.available_width())
                    .hint_text("Enter address"),
            );
            if response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                self.defer(Action::Open(self.address.clone()));
            }
        });
    }

    fn render_status(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            if let Some(deferred) = &mut self.pending {
                ui.spinner();
                ui.label("Loading…");
                deferred.indicator_painted = true;
            } else if let Some(error) = &self.error {
                ui.colored_label(egui::Color32::RED, error);
            } else if let Some(page) = self.session.page() {
                ui.label(format!("Ready - {}", page.url()));
            } else {
                ui.label("Ready");
            }
        });
    }

    /// Render the page area
    fn render_content(&mut self, ui: &mut egui::Ui) {
        let rect = ui.available_rect_before_wrap();
        let response = ui.allocate_rect(rect, egui::Sense::click());
        let painter = ui.painter_at(rect);
        painter.rect_filled(rect, 0.0, color32(Color::WHITE));

        if rect.size() != self.content_size {
            self.content_size = rect.size();
            self.session.handle_resize(rect.width(), rect.height());
        }
        if self.pending.is_none() {
            self.handle_input(ui, &response);
        }

        let scroll = self.session.scroll();
        let mut surface = EguiSurface::new(&painter, &mut self.textures, self.config.font_size);
        self.session.render(&mut surface, page_rect(rect), scroll, true);
    }

    /// Keys that can start a page load get the busy indicator first
    fn may_navigate(&self, key: Key) -> bool {
        let focused = self.session.focused_field().is_some();
        match key {
            Key::Back => true,
            Key::Backspace => !focused,
            Key::Enter => focused,
            _ => false,
        }
    }

    fn handle_input(&mut self, ui: &egui::Ui, response: &egui::Response) {
        let ctx = ui.ctx().clone();
        if response.clicked() {
            if let Some(pos) = response.interact_pointer_pos() {
                self.defer(Action::Event(InputEvent::Click { x: pos.x, y: pos.y }));
            }
        }

        let wheel = ui.input(|i| i.smooth_scroll_delta.y);
        if wheel != 0.0 {
            self.apply(&ctx, InputEvent::Scroll(-wheel));
        }

        // The address bar owns the keyboard while it has focus
        if ctx.wants_keyboard_input() {
            return;
        }
        let events = ui.input(|i| i.events.clone());
        for event in events {
            match event {
                egui::Event::Text(text) => self.apply(&ctx, InputEvent::Text(text)),
                egui::Event::Key {
                    key,
                    pressed: true,
                    modifiers,
                    ..
                } => match map_key(key, modifiers) {
                    Some(key) if self.may_navigate(key) => {
                        self.defer(Action::Event(InputEvent::Key(key)));
                    }
                    Some(key) => self.apply(&ctx, InputEvent::Key(key)),
                    None => {}
                },
                _ => {}
            }
        }
    }
}

/// Keys the session understands
fn map_key(key: egui::Key, modifiers: egui::Modifiers) -> Option<Key> {
    let key = match key {
        egui::Key::ArrowLeft if modifiers.alt => Key::Back,
        egui::Key::ArrowUp => Key::Up,
        egui::Key::ArrowDown => Key::Down,
        egui::Key::PageUp => Key::PageUp,
        egui::Key::PageDown => Key::PageDown,
        egui::Key::Home => Key::Home,
        egui::Key::End => Key::End,
        egui::Key::Backspace => Key::Backspace,
        egui::Key::Enter => Key::Enter,
        egui::Key::Escape => Key::Escape,
        _ => return None,
    };
    Some(key)
}

impl eframe::App for ViewerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        ctx.set_visuals(egui::Visuals::light());
        self.run_pending(ctx);

        // Top panel with toolbar
        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            self.render_toolbar(ui);
        });

        // Status bar
        egui::TopBottomPanel::bottom("status").show(ctx, |ui| {
            self.render_status(ui);
        });

        // Main content area
        egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| {
                self.render_content(ui);
            });

        if self.pending.is_some() {
            ctx.request_repaint();
        }
    }
}

/// Run the viewer application
pub fn run(config: ViewerConfig, session: Session) -> eframe::Result<()> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([config.window_width as f32, config.window_height as f32])
            .with_min_inner_size([320.0, 240.0])
            .with_title(crate::NAME),
        ..Default::default()
    };

    eframe::run_native(
        crate::NAME,
        options,
        Box::new(|_cc| Ok(Box::new(ViewerApp::new(config, session)))),
    )
}
