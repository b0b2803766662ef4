//! Viewer window for Wisp
//!
//! A toolbar with a back button and address bar, the page area painted
//! through [`EguiSurface`], and a status bar showing load progress.

mod app;
mod painter;

pub use app::{ViewerApp, run};
pub use painter::{EguiSurface, TextureCache};
