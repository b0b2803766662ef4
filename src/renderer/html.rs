//! HTML5 parser implementation using html5ever

use super::dom::{Document, ElementData, Node, NodeType};
use crate::utils::{RenderError, Result};
use html5ever::tendril::TendrilSink;
use html5ever::{ParseOpts, parse_document};
use markup5ever_rcdom::{Handle, NodeData, RcDom};
use url::Url;

/// HTML5 parser producing an owned element tree
#[derive(Clone, Default)]
pub struct HtmlParser {
    opts: ParseOpts,
}

impl HtmlParser {
    /// Create a new HTML parser
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse fetched bytes into a document.
    ///
    /// Invalid UTF-8 is replaced rather than rejected; only a failure to
    /// read the byte stream is reported as a parse error.
    pub fn parse(&self, bytes: &[u8], base_url: &Url) -> Result<Document> {
        log::debug!("Parsing {} bytes from {}", bytes.len(), base_url);

        let mut input = bytes;
        let dom = parse_document(RcDom::default(), self.opts.clone())
            .from_utf8()
            .read_from(&mut input)
            .map_err(|e| RenderError::HtmlParse(format!("{base_url}: {e}")))?;

        let mut document = Document::new();
        for child in dom.document.children.borrow().iter() {
            if let Some(node) = convert_node(child) {
                document.root.add_child(node);
            }
        }
        Ok(document)
    }
}

/// Convert an rcdom node (and its subtree) into our tree
fn convert_node(handle: &Handle) -> Option<Node> {
    let node_type = match &handle.data {
        NodeData::Element { name, attrs, .. } => {
            let mut data = ElementData::new(name.local.to_string().to_ascii_lowercase());
            for attr in attrs.borrow().iter() {
                data.set_attribute(attr.name.local.to_string(), attr.value.to_string());
            }
            NodeType::Element(data)
        }
        NodeData::Text { contents } => NodeType::Text(contents.borrow().to_string()),
        NodeData::Comment { contents } => NodeType::Comment(contents.to_string()),
        NodeData::Document => NodeType::Document,
        NodeData::Doctype { .. } | NodeData::ProcessingInstruction { .. } => return None,
    };

    let mut node = Node::new(node_type);
    for child in handle.children.borrow().iter() {
        if let Some(child) = convert_node(child) {
            node.add_child(child);
        }
    }
    Some(node)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("https://x.test/").unwrap()
    }

    fn find<'a>(node: &'a Node, tag: &str) -> Option<&'a Node> {
        if node.as_element().is_some_and(|e| e.tag_name == tag) {
            return Some(node);
        }
        node.children.iter().find_map(|c| find(c, tag))
    }

    #[test]
    fn test_parse_empty_html() {
        let doc = HtmlParser::new().parse(b"", &base()).unwrap();
        // html5ever still synthesizes <html><head><body>
        assert!(find(&doc.root, "body").is_some());
    }

    #[test]
    fn test_parse_with_attributes() {
        let doc = HtmlParser::new()
            .parse(br#"<a href="/next" id="main">Next</a>"#, &base())
            .unwrap();
        let anchor = find(&doc.root, "a").unwrap();
        assert_eq!(anchor.as_element().unwrap().get_attribute("href"), Some("/next"));
        assert_eq!(anchor.text_content(), "Next");
    }

    #[test]
    fn test_tag_names_lowercased() {
        let doc = HtmlParser::new().parse(b"<P>Shout</P>", &base()).unwrap();
        assert!(find(&doc.root, "p").is_some());
    }

    #[test]
    fn test_comments_kept_doctype_dropped() {
        let doc = HtmlParser::new()
            .parse(b"<!DOCTYPE html><body><!-- note --><p>x</p></body>", &base())
            .unwrap();
        let body = find(&doc.root, "body").unwrap();
        assert!(matches!(body.children[0].node_type, NodeType::Comment(_)));
    }

    #[test]
    fn test_parse_malformed_html() {
        // html5ever recovers from unclosed tags
        let doc = HtmlParser::new()
            .parse(b"<p>Unclosed paragraph<div>Another", &base())
            .unwrap();
        assert!(find(&doc.root, "div").is_some());
    }

    #[test]
    fn test_invalid_utf8_is_replaced() {
        let doc = HtmlParser::new().parse(b"<p>caf\xe9</p>", &base()).unwrap();
        let p = find(&doc.root, "p").unwrap();
        assert!(p.text_content().starts_with("caf"));
    }
}
