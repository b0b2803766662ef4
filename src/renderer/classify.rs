//! Tag classification
//!
//! Maps an element name to what the simplification engine does with it.
//! Lookup is a direct, case-insensitive name match, so two different tags
//! can never share an action by accident.

/// What the simplification engine does with an element
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SemanticAction {
    Paragraph,
    Anchor,
    Italic,
    Bold,
    /// `<em>`, rendered bold
    Emphasis,
    LineBreak,
    Script,
    Style,
    /// `<h1>` .. `<h6>`
    Heading(u8),
    Image,
    Form,
    Input,
    TableRow,
    Title,
    /// Unknown element: drop the markup, keep the children
    Unwrap,
}

/// Classify a tag name
pub fn classify(tag_name: &str) -> SemanticAction {
    match tag_name.to_ascii_lowercase().as_str() {
        "p" => SemanticAction::Paragraph,
        "a" => SemanticAction::Anchor,
        "i" => SemanticAction::Italic,
        "b" | "strong" => SemanticAction::Bold,
        "em" => SemanticAction::Emphasis,
        "br" => SemanticAction::LineBreak,
        "script" => SemanticAction::Script,
        "style" => SemanticAction::Style,
        "h1" => SemanticAction::Heading(1),
        "h2" => SemanticAction::Heading(2),
        "h3" => SemanticAction::Heading(3),
        "h4" => SemanticAction::Heading(4),
        "h5" => SemanticAction::Heading(5),
        "h6" => SemanticAction::Heading(6),
        "img" => SemanticAction::Image,
        "form" => SemanticAction::Form,
        "input" => SemanticAction::Input,
        "tr" => SemanticAction::TableRow,
        "title" => SemanticAction::Title,
        _ => SemanticAction::Unwrap,
    }
}
