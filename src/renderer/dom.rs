//! Element tree handed from the parser to the simplification engine

use std::collections::HashMap;

/// Node types in the element tree
#[derive(Debug, Clone, PartialEq)]
pub enum NodeType {
    /// Document root
    Document,
    /// Element node (e.g., <p>)
    Element(ElementData),
    /// Text node
    Text(String),
    /// Comment node
    Comment(String),
}

/// Data for element nodes
#[derive(Debug, Clone, PartialEq)]
pub struct ElementData {
    /// Tag name as written in the source
    pub tag_name: String,
    /// Element attributes
    pub attributes: HashMap<String, String>,
}

impl ElementData {
    /// Create a new element
    pub fn new(tag_name: impl Into<String>) -> Self {
        Self {
            tag_name: tag_name.into(),
            attributes: HashMap::new(),
        }
    }

    /// Get an attribute value
    pub fn get_attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// Set an attribute value
    pub fn set_attribute(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.attributes.insert(name.into(), value.into());
    }
}

/// A node in the element tree
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    /// Node type and data
    pub node_type: NodeType,
    /// Child nodes
    pub children: Vec<Node>,
}

impl Node {
    /// Create a new node
    pub fn new(node_type: NodeType) -> Self {
        Self {
            node_type,
            children: Vec::new(),
        }
    }

    /// Create an element node
    pub fn element(tag_name: impl Into<String>) -> Self {
        Self::new(NodeType::Element(ElementData::new(tag_name)))
    }

    /// Create a text node
    pub fn text(content: impl Into<String>) -> Self {
        Self::new(NodeType::Text(content.into()))
    }

    /// Builder helper: set an attribute on an element node
    pub fn with_attribute(mut self, name: &str, value: &str) -> Self {
        if let NodeType::Element(data) = &mut self.node_type {
            data.set_attribute(name, value);
        }
        self
    }

    /// Builder helper: append a child
    pub fn with_child(mut self, child: Node) -> Self {
        self.children.push(child);
        self
    }

    /// Add a child node
    pub fn add_child(&mut self, child: Node) {
        self.children.push(child);
    }

    /// Get element data if this is an element
    pub fn as_element(&self) -> Option<&ElementData> {
        match &self.node_type {
            NodeType::Element(data) => Some(data),
            _ => None,
        }
    }

    /// Concatenated text of every descendant text node, in document order
    pub fn text_content(&self) -> String {
        let mut text = String::new();
        self.collect_text(&mut text);
        text
    }

    fn collect_text(&self, out: &mut String) {
        if let NodeType::Text(content) = &self.node_type {
            out.push_str(content);
        }
        for child in &self.children {
            child.collect_text(out);
        }
    }
}

/// A parsed document
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    /// Root node
    pub root: Node,
}

impl Document {
    /// Create a new empty document
    pub fn new() -> Self {
        Self {
            root: Node::new(NodeType::Document),
        }
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}
