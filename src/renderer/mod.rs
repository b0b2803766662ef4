//! Rendering pipeline for Wisp
//!
//! HTML is parsed into a small DOM, simplified into a flat instruction
//! list, then laid out onto a [`Surface`] with word wrapping.

mod bitmap;
mod classify;
mod dom;
pub mod html;
mod instruction;
mod layout;
mod simplify;
mod surface;
pub mod wrap;

pub use bitmap::{Bitmap, ImageDecoder, RasterDecoder};
pub use classify::{SemanticAction, classify};
pub use dom::{Document, ElementData, Node, NodeType};
pub use html::HtmlParser;
pub use instruction::{
    FieldId, FormDescriptor, FormField, FormId, FormMethod, Instruction, InstructionList, StyleKind,
};
pub use layout::{HitRegion, HitTarget, LayoutConfig, LayoutEngine, LayoutOutput, LayoutState};
pub use simplify::{SimplifiedPage, Simplifier};
pub use surface::{Color, DrawCommand, FontStyle, Point, Rect, RecordingSurface, Surface};
pub use wrap::{LineSegment, TextWrapper, WrapCursor};
