//! Element tree to instruction list reduction
//!
//! Each element is handled according to its [`SemanticAction`]: style and
//! block elements wrap their children in matching begin/end or separator
//! instructions, script-like elements vanish with their content, and
//! anything unrecognised is unwrapped so its children still render.

use super::bitmap::{Bitmap, ImageDecoder};
use super::classify::{SemanticAction, classify};
use super::dom::{Document, ElementData, Node, NodeType};
use super::instruction::{
    FormDescriptor, FormField, FormId, FormMethod, Instruction, InstructionList, StyleKind,
};
use crate::network::{Fetcher, Request, address};
use crate::utils::Result;
use url::Url;

/// Output of simplifying one document
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SimplifiedPage {
    /// Text of the last `<title>`, whitespace-normalised
    pub title: Option<String>,
    pub instructions: InstructionList,
}

/// Context inherited from ancestors during the walk
#[derive(Debug, Clone, Copy, Default)]
struct Scope {
    /// Innermost enclosing `<form>`
    form: Option<FormId>,
    /// Inside an `<a href>`; nested anchors are unwrapped
    in_link: bool,
}

/// Reduces one page's element tree; images are fetched while walking
pub struct Simplifier<'a> {
    base_url: &'a Url,
    fetcher: &'a dyn Fetcher,
    decoder: &'a dyn ImageDecoder,
    title: Option<String>,
}

impl<'a> Simplifier<'a> {
    pub fn new(base_url: &'a Url, fetcher: &'a dyn Fetcher, decoder: &'a dyn ImageDecoder) -> Self {
        Self {
            base_url,
            fetcher,
            decoder,
            title: None,
        }
    }

    /// Simplify a whole document
    pub fn simplify_document(mut self, document: &Document) -> SimplifiedPage {
        let instructions = self.simplify(&document.root, InstructionList::new());
        log::debug!(
            "Simplified {} into {} instructions",
            self.base_url,
            instructions.len()
        );
        SimplifiedPage {
            title: self.title,
            instructions,
        }
    }

    /// Instructions for `node`, followed by `tail`
    pub fn simplify(&mut self, node: &Node, tail: InstructionList) -> InstructionList {
        let mut out = InstructionList::new();
        self.visit(node, Scope::default(), &mut out);
        out.append(tail);
        out
    }

    fn visit(&mut self, node: &Node, scope: Scope, out: &mut InstructionList) {
        match &node.node_type {
            NodeType::Text(content) => push_text(content, out),
            NodeType::Element(data) => self.element(node, data, scope, out),
            NodeType::Document | NodeType::Comment(_) => self.children(node, scope, out),
        }
    }

    fn children(&mut self, node: &Node, scope: Scope, out: &mut InstructionList) {
        for child in &node.children {
            self.visit(child, scope, out);
        }
    }

    fn element(&mut self, node: &Node, data: &ElementData, scope: Scope, out: &mut InstructionList) {
        match classify(&data.tag_name) {
            SemanticAction::Bold | SemanticAction::Emphasis => {
                self.styled(StyleKind::Bold, node, scope, out);
            }
            SemanticAction::Italic => self.styled(StyleKind::Italic, node, scope, out),
            SemanticAction::Heading(_) => {
                out.push(Instruction::Separator);
                self.styled(StyleKind::Bold, node, scope, out);
                out.push(Instruction::Separator);
            }
            SemanticAction::Paragraph | SemanticAction::TableRow => {
                out.push(Instruction::Separator);
                self.children(node, scope, out);
                out.push(Instruction::Separator);
            }
            SemanticAction::LineBreak => {
                out.push(Instruction::Text("\n".to_string()));
                self.children(node, scope, out);
            }
            SemanticAction::Anchor => match data.get_attribute("href") {
                Some(href) if !scope.in_link => {
                    out.push(Instruction::HyperlinkBegin(href.to_string()));
                    let inner = Scope {
                        in_link: true,
                        ..scope
                    };
                    self.children(node, inner, out);
                    out.push(Instruction::HyperlinkEnd);
                }
                _ => self.children(node, scope, out),
            },
            SemanticAction::Image => self.image(data, out),
            SemanticAction::Form => {
                let form = out.add_form(FormDescriptor {
                    name: data.get_attribute("name").map(str::to_string),
                    action: data.get_attribute("action").map(str::to_string),
                    method: FormMethod::from_attribute(data.get_attribute("method")),
                });
                let inner = Scope {
                    form: Some(form),
                    ..scope
                };
                self.children(node, inner, out);
            }
            SemanticAction::Input => input(data, scope, out),
            SemanticAction::Title => {
                let title = normalize_whitespace(&node.text_content());
                self.title = Some(title.trim().to_string());
            }
            SemanticAction::Script | SemanticAction::Style => {}
            SemanticAction::Unwrap => self.children(node, scope, out),
        }
    }

    fn styled(&mut self, kind: StyleKind, node: &Node, scope: Scope, out: &mut InstructionList) {
        out.push(Instruction::StyleBegin(kind));
        self.children(node, scope, out);
        out.push(Instruction::StyleEnd);
    }

    fn image(&self, data: &ElementData, out: &mut InstructionList) {
        let Some(src) = data.get_attribute("src") else {
            log::debug!("Dropping <img> without src");
            return;
        };
        match self.load_image(src) {
            Ok(bitmap) => out.push(Instruction::Image(bitmap)),
            Err(e) => log::debug!("Dropping image {src}: {e}"),
        }
    }

    fn load_image(&self, src: &str) -> Result<Bitmap> {
        let url = address::resolve(Some(self.base_url), src)?;
        let response = self.fetcher.fetch(&Request::get(url))?;
        self.decoder.decode(response.body())
    }
}

fn input(data: &ElementData, scope: Scope, out: &mut InstructionList) {
    let kind = data.get_attribute("type");
    let supported = kind.is_none_or(|kind| {
        kind.eq_ignore_ascii_case("text") || kind.eq_ignore_ascii_case("search")
    });
    if !supported {
        log::debug!("Dropping unsupported <input type={kind:?}>");
        return;
    }
    // A field outside any form submits to the current page
    let form = match scope.form {
        Some(form) => form,
        None => out.add_form(FormDescriptor::default()),
    };
    out.push_field(FormField {
        name: data.get_attribute("name").unwrap_or_default().to_string(),
        form,
        initial_value: data.get_attribute("value").unwrap_or_default().to_string(),
    });
}

fn push_text(content: &str, out: &mut InstructionList) {
    if content.chars().all(char::is_whitespace) {
        return;
    }
    out.push(Instruction::Text(normalize_whitespace(content)));
}

/// Newlines become spaces and whitespace runs collapse to one space
fn normalize_whitespace(content: &str) -> String {
    let mut out = String::with_capacity(content.len());
    let mut in_space = false;
    for ch in content.chars() {
        if ch.is_whitespace() {
            if !in_space {
                out.push(' ');
            }
            in_space = true;
        } else {
            out.push(ch);
            in_space = false;
        }
    }
    out
}
